// Shader Management
// Generates and compiles the WGSL for the constant-add kernel
// Responsibilities:
// - Generate WGSL with both operands baked in as constants
// - Compile shader source into GPU shader modules

use web_sys::{GpuDevice, GpuShaderModule};

pub const ENTRY_POINT: &str = "main";

/// Bind group 0, binding 0: the one-element result buffer.
pub const RESULT_BINDING: u32 = 0;

pub struct ShaderManager;

impl ShaderManager {
    pub fn create_shader_module(device: &GpuDevice, source: &str, label: &str) -> GpuShaderModule {
        let descriptor = web_sys::GpuShaderModuleDescriptor::new(source);
        descriptor.set_label(label);
        device.create_shader_module(&descriptor)
    }
}

/// Only invocation 0 writes, so any workgroup size leaves a single store.
/// The operands are private vars rather than consts: a constant sum that
/// overflows u32 is a shader-creation error, a runtime one wraps.
pub fn add_constants_shader(lhs: u32, rhs: u32, workgroup_size: u32) -> String {
    format!(r#"
var<private> lhs: u32 = {lhs}u;
var<private> rhs: u32 = {rhs}u;

@group(0) @binding({binding}) var<storage, read_write> result: array<u32>;

@compute @workgroup_size({workgroup_size})
fn {entry}(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    if (global_id.x != 0u) {{
        return;
    }}
    result[0] = lhs + rhs;
}}
"#,
        lhs = lhs,
        rhs = rhs,
        binding = RESULT_BINDING,
        workgroup_size = workgroup_size,
        entry = ENTRY_POINT,
    )
}
