// Compute Pipeline Management
// Creates and manages the WebGPU compute pipeline for the add kernel
// Responsibilities:
// - Build the bind group layout for the result buffer
// - Create the pipeline layout and compute pipeline
// - Create bind groups and bind the pipeline on a compute pass

use web_sys::{GpuBindGroup, GpuBindGroupLayout, GpuBuffer, GpuComputePassEncoder, GpuComputePipeline, GpuDevice};

use crate::error::Result;
use crate::gpu::shaders::{ShaderManager, ENTRY_POINT, RESULT_BINDING};

pub struct ComputePipeline {
    pipeline: GpuComputePipeline,
    bind_group_layout: GpuBindGroupLayout,
    label: String,
}

impl ComputePipeline {
    pub fn new(device: &GpuDevice, shader_source: &str, label: &str) -> Result<Self> {
        let shader = ShaderManager::create_shader_module(device, shader_source, &format!("{} shader", label));

        // Result buffer (read-write storage)
        let entries = js_sys::Array::new();
        let result_entry = web_sys::GpuBindGroupLayoutEntry::new(RESULT_BINDING, web_sys::gpu_shader_stage::COMPUTE);
        let result_buffer_layout = web_sys::GpuBufferBindingLayout::new();
        result_buffer_layout.set_type(web_sys::GpuBufferBindingType::Storage);
        result_entry.set_buffer(&result_buffer_layout);
        entries.push(&result_entry);

        let bind_group_layout_desc = web_sys::GpuBindGroupLayoutDescriptor::new(&entries);
        bind_group_layout_desc.set_label(&format!("{} bind group layout", label));
        let bind_group_layout = device.create_bind_group_layout(&bind_group_layout_desc)?;

        let layouts = js_sys::Array::of1(&bind_group_layout);
        let pipeline_layout_desc = web_sys::GpuPipelineLayoutDescriptor::new(&layouts);
        pipeline_layout_desc.set_label(&format!("{} pipeline layout", label));
        let pipeline_layout = device.create_pipeline_layout(&pipeline_layout_desc);

        let compute_stage = web_sys::GpuProgrammableStage::new(&shader);
        compute_stage.set_entry_point(ENTRY_POINT);

        let compute_pipeline_desc = web_sys::GpuComputePipelineDescriptor::new(&pipeline_layout, &compute_stage);
        compute_pipeline_desc.set_label(&format!("{} pipeline", label));
        let pipeline = device.create_compute_pipeline(&compute_pipeline_desc);

        Ok(Self {
            pipeline,
            bind_group_layout,
            label: label.to_string(),
        })
    }

    pub fn bind_group(&self, device: &GpuDevice, result_buffer: &GpuBuffer) -> GpuBindGroup {
        let entries = js_sys::Array::new();
        let binding = web_sys::GpuBufferBinding::new(result_buffer);
        entries.push(&web_sys::GpuBindGroupEntry::new(RESULT_BINDING, &binding));

        let bind_group_desc = web_sys::GpuBindGroupDescriptor::new(&entries, &self.bind_group_layout);
        bind_group_desc.set_label(&format!("{} bind group", self.label));
        device.create_bind_group(&bind_group_desc)
    }

    pub fn bind(&self, pass: &GpuComputePassEncoder) {
        pass.set_pipeline(&self.pipeline);
    }
}
