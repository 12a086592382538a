use std::fmt;

use web_sys::GpuBuffer;

use crate::config::ComputeConfig;
use crate::error::{ComputeError, Result};
use crate::gpu::buffer::{create_readback_buffer, create_storage_buffer, read_u32s, RESULT_BYTES, RESULT_LEN};
use crate::gpu::context::GpuContext;
use crate::gpu::pipeline::ComputePipeline;
use crate::gpu::shaders::add_constants_shader;
use crate::gpu::utils::{create_encoder, pop_validation_error, submit};

/// What came back from one dispatch, next to the CPU reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeOutcome {
    pub lhs: u32,
    pub rhs: u32,
    pub value: u32,
    pub expected: u32,
}

impl ComputeOutcome {
    pub fn is_correct(&self) -> bool {
        self.value == self.expected
    }
}

impl fmt::Display for ComputeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.lhs, self.rhs, self.value)?;
        if !self.is_correct() {
            write!(f, " (expected {})", self.expected)?;
        }
        Ok(())
    }
}

/// Buffers of one dispatch; both are destroyed once the run is over.
struct DispatchBuffers {
    result: GpuBuffer,
    readback: GpuBuffer,
}

impl DispatchBuffers {
    fn destroy(&self) {
        self.result.destroy();
        self.readback.destroy();
    }
}

/// Steps 1-6: pipeline, buffers, compute pass, copy, submit.
fn encode_and_submit(context: &GpuContext, config: &ComputeConfig) -> Result<DispatchBuffers> {
    let device = &context.device;

    let source = add_constants_shader(config.lhs, config.rhs, config.workgroup_size);
    let pipeline = ComputePipeline::new(device, &source, &config.label)?;

    let result = create_storage_buffer(device, &config.label_for("result buffer"), RESULT_LEN)?;
    let readback = match create_readback_buffer(device, &config.label_for("readback buffer"), RESULT_LEN) {
        Ok(buffer) => buffer,
        Err(e) => {
            result.destroy();
            return Err(e);
        }
    };
    let buffers = DispatchBuffers { result, readback };
    let bind_group = pipeline.bind_group(device, &buffers.result);

    let command_encoder = create_encoder(device, &config.label_for("encoder"));

    let pass_descriptor = web_sys::GpuComputePassDescriptor::new();
    pass_descriptor.set_label(&config.label_for("pass"));
    let compute_pass = command_encoder.begin_compute_pass_with_descriptor(&pass_descriptor);
    pipeline.bind(&compute_pass);
    compute_pass.set_bind_group(0, Some(&bind_group));
    compute_pass.dispatch_workgroups(1);
    compute_pass.end();

    if let Err(e) = command_encoder.copy_buffer_to_buffer_with_u32_and_u32_and_u32(
        &buffers.result,
        0,
        &buffers.readback,
        0,
        RESULT_BYTES as u32,
    ) {
        buffers.destroy();
        return Err(e.into());
    }

    submit(&context.queue, command_encoder);
    Ok(buffers)
}

/// A captured validation error outranks whatever the encode step returned;
/// `discard` releases resources that will not be used.
fn check_validation<T>(
    encoded: Result<T>,
    validation: Option<String>,
    discard: impl FnOnce(T),
) -> Result<T> {
    match (encoded, validation) {
        (Ok(value), None) => Ok(value),
        (Ok(value), Some(message)) => {
            discard(value);
            Err(ComputeError::Gpu(format!("validation failed: {}", message)))
        }
        (Err(_), Some(message)) => Err(ComputeError::Gpu(format!("validation failed: {}", message))),
        (Err(e), None) => Err(e),
    }
}

/// Runs the constant-add kernel once and reads the sum back.
pub async fn run_add(context: &GpuContext, config: &ComputeConfig) -> Result<ComputeOutcome> {
    config.validate()?;

    context.device.push_error_scope(web_sys::GpuErrorFilter::Validation);
    let encoded = encode_and_submit(context, config);
    let validation = match pop_validation_error(&context.device).await {
        Ok(validation) => validation,
        Err(e) => {
            if let Ok(buffers) = &encoded {
                buffers.destroy();
            }
            return Err(e);
        }
    };
    let buffers = check_validation(encoded, validation, |buffers| buffers.destroy())?;

    let values = read_u32s(&buffers.readback, RESULT_LEN).await;
    buffers.destroy();
    let values = values?;

    let value = values.first().copied().ok_or(ComputeError::ReadbackSize {
        expected: RESULT_BYTES,
        actual: 0,
    })?;

    let outcome = ComputeOutcome {
        lhs: config.lhs,
        rhs: config.rhs,
        value,
        expected: config.expected_sum(),
    };

    if outcome.is_correct() {
        console_log!("{}", outcome);
    } else {
        console_error!("GPU result mismatch: {}", outcome);
    }
    Ok(outcome)
}
