// WebGPU Utilities
// Helper functions for common WebGPU operations
// - Command encoder creation
// - Command buffer submission
// - Validation error scopes

use wasm_bindgen::JsCast;
use web_sys::{GpuCommandEncoder, GpuDevice, GpuQueue};

use crate::error::Result;

pub fn create_encoder(device: &GpuDevice, label: &str) -> GpuCommandEncoder {
    let descriptor = web_sys::GpuCommandEncoderDescriptor::new();
    descriptor.set_label(label);
    device.create_command_encoder_with_descriptor(&descriptor)
}

pub fn submit(queue: &GpuQueue, encoder: GpuCommandEncoder) {
    queue.submit(&js_sys::Array::of1(&encoder.finish()));
}

/// Pops the innermost error scope; `None` when nothing was captured.
pub async fn pop_validation_error(device: &GpuDevice) -> Result<Option<String>> {
    let error = wasm_bindgen_futures::JsFuture::from(device.pop_error_scope()).await?;
    if error.is_null() || error.is_undefined() {
        return Ok(None);
    }
    let error: web_sys::GpuError = error.unchecked_into();
    Ok(Some(error.message()))
}
