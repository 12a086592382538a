//! Error type for the compute run.
//!
//! | Error          | Meaning                                        |
//! |----------------|------------------------------------------------|
//! | Unsupported    | `navigator.gpu` missing, WebGPU not available |
//! | NoAdapter      | `requestAdapter()` resolved to null            |
//! | DeviceRequest  | `requestDevice()` rejected                     |
//! | InvalidConfig  | page configuration could not be used           |
//! | Gpu            | any other JS exception or rejected promise     |
//! | ReadbackSize   | mapped range has an unexpected byte length     |
//!
//! Values convert to and from `JsValue` so `?` works on both sides of the
//! wasm-bindgen boundary.

use std::fmt;

use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// The browser exposes no WebGPU entry point.
    Unsupported,

    /// WebGPU is present but no adapter could be provided.
    NoAdapter,

    /// The adapter refused to create a logical device.
    DeviceRequest(String),

    /// Configuration JSON was malformed or out of range.
    InvalidConfig(String),

    /// A WebGPU call threw or its promise rejected.
    Gpu(String),

    /// The mapped readback range did not hold the expected number of bytes.
    ReadbackSize { expected: usize, actual: usize },
}

impl fmt::Display for ComputeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeError::Unsupported => {
                write!(f, "WebGPU is not supported in this browser")
            }
            ComputeError::NoAdapter => {
                write!(f, "No suitable GPU adapter found")
            }
            ComputeError::DeviceRequest(msg) => {
                write!(f, "Failed to create GPU device: {}", msg)
            }
            ComputeError::InvalidConfig(msg) => {
                write!(f, "Invalid compute config: {}", msg)
            }
            ComputeError::Gpu(msg) => {
                write!(f, "WebGPU error: {}", msg)
            }
            ComputeError::ReadbackSize { expected, actual } => {
                write!(
                    f,
                    "Readback size mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for ComputeError {}

pub type Result<T> = std::result::Result<T, ComputeError>;

impl ComputeError {
    /// Host limitations: retrying on the same page cannot succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ComputeError::Unsupported | ComputeError::NoAdapter)
    }

    /// The device may be lost or in a bad state; drop the cached context.
    pub fn invalidates_context(&self) -> bool {
        matches!(self, ComputeError::Gpu(_) | ComputeError::ReadbackSize { .. })
    }
}

/// Best-effort text of a thrown JS value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl From<JsValue> for ComputeError {
    fn from(value: JsValue) -> Self {
        ComputeError::Gpu(js_error_message(&value))
    }
}

impl From<ComputeError> for JsValue {
    fn from(err: ComputeError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

impl From<serde_json::Error> for ComputeError {
    fn from(err: serde_json::Error) -> Self {
        ComputeError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            ComputeError::Unsupported,
            ComputeError::NoAdapter,
            ComputeError::DeviceRequest("limits exceeded".into()),
            ComputeError::InvalidConfig("workgroup_size".into()),
            ComputeError::Gpu("OperationError".into()),
            ComputeError::ReadbackSize { expected: 4, actual: 8 },
        ];

        for err in &errors {
            let msg = format!("{}", err);
            assert!(!msg.is_empty(), "Display for {:?} should not be empty", err);
            match err {
                ComputeError::Unsupported => assert!(msg.contains("not supported"), "{}", msg),
                ComputeError::NoAdapter => assert!(msg.contains("adapter"), "{}", msg),
                ComputeError::DeviceRequest(_) => {
                    assert!(msg.contains("device"), "{}", msg);
                    assert!(msg.contains("limits exceeded"), "{}", msg);
                }
                ComputeError::InvalidConfig(_) => {
                    assert!(msg.contains("config"), "{}", msg);
                    assert!(msg.contains("workgroup_size"), "{}", msg);
                }
                ComputeError::Gpu(_) => assert!(msg.contains("OperationError"), "{}", msg),
                ComputeError::ReadbackSize { .. } => {
                    assert!(msg.contains("expected 4"), "{}", msg);
                    assert!(msg.contains("got 8"), "{}", msg);
                }
            }
        }
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ComputeError::Unsupported.is_fatal());
        assert!(ComputeError::NoAdapter.is_fatal());
        assert!(!ComputeError::DeviceRequest("lost".into()).is_fatal());
        assert!(!ComputeError::Gpu("x".into()).is_fatal());
        assert!(!ComputeError::InvalidConfig("x".into()).is_fatal());
        assert!(!ComputeError::ReadbackSize { expected: 4, actual: 0 }.is_fatal());
    }

    #[test]
    fn test_context_invalidation() {
        assert!(ComputeError::Gpu("device lost".into()).invalidates_context());
        assert!(ComputeError::ReadbackSize { expected: 4, actual: 0 }.invalidates_context());
        // Config problems leave a healthy device behind
        assert!(!ComputeError::InvalidConfig("label".into()).invalidates_context());
        // No context was ever cached for these
        assert!(!ComputeError::Unsupported.invalidates_context());
        assert!(!ComputeError::NoAdapter.invalidates_context());
        assert!(!ComputeError::DeviceRequest("x".into()).invalidates_context());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: ComputeError = json_err.into();
        assert!(matches!(err, ComputeError::InvalidConfig(_)));
    }
}
