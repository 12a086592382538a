// GPU Buffers
// Creates the result and readback buffers and maps results back to the CPU
// - Storage buffer: written by the shader, copied out (STORAGE | COPY_SRC)
// - Readback buffer: copy target the CPU can map (COPY_DST | MAP_READ)

use web_sys::{GpuBuffer, GpuDevice};

use crate::error::{ComputeError, Result};

/// The shader writes a single u32.
pub const RESULT_LEN: usize = 1;
pub const RESULT_BYTES: usize = RESULT_LEN * std::mem::size_of::<u32>();

fn create_buffer(device: &GpuDevice, label: &str, len: usize, usage: u32) -> Result<GpuBuffer> {
    let size = len * std::mem::size_of::<u32>();
    let buffer = device.create_buffer(&{
        let desc = web_sys::GpuBufferDescriptor::new(size as f64, usage);
        desc.set_label(label);
        desc.set_mapped_at_creation(false);
        desc
    })?;
    Ok(buffer)
}

pub fn create_storage_buffer(device: &GpuDevice, label: &str, len: usize) -> Result<GpuBuffer> {
    create_buffer(
        device,
        label,
        len,
        web_sys::gpu_buffer_usage::STORAGE | web_sys::gpu_buffer_usage::COPY_SRC,
    )
}

pub fn create_readback_buffer(device: &GpuDevice, label: &str, len: usize) -> Result<GpuBuffer> {
    create_buffer(
        device,
        label,
        len,
        web_sys::gpu_buffer_usage::COPY_DST | web_sys::gpu_buffer_usage::MAP_READ,
    )
}

/// Maps `buffer` for reading and returns its first `len` u32 values.
/// The buffer is unmapped again before returning, even when the size is off.
pub async fn read_u32s(buffer: &GpuBuffer, len: usize) -> Result<Vec<u32>> {
    let map_promise = buffer.map_async(web_sys::gpu_map_mode::READ);
    wasm_bindgen_futures::JsFuture::from(map_promise).await?;

    let bytes = match buffer.get_mapped_range() {
        Ok(range) => js_sys::Uint8Array::new(&range).to_vec(),
        Err(e) => {
            buffer.unmap();
            return Err(e.into());
        }
    };
    buffer.unmap();

    let expected = len * std::mem::size_of::<u32>();
    if bytes.len() != expected {
        return Err(ComputeError::ReadbackSize {
            expected,
            actual: bytes.len(),
        });
    }
    decode_u32s(&bytes)
}

/// Little-endian u32 decoding of a mapped range.
pub fn decode_u32s(bytes: &[u8]) -> Result<Vec<u32>> {
    let width = std::mem::size_of::<u32>();
    if bytes.len() % width != 0 {
        return Err(ComputeError::ReadbackSize {
            expected: bytes.len() - bytes.len() % width,
            actual: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(width)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
