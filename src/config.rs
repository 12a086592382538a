// Run configuration
// Read from a JSON <script id="compute-config"> block in the host page.
// Every field is optional; missing ones fall back to ComputeConfig::default().

use serde::{Deserialize, Serialize};

use crate::error::{ComputeError, Result};

pub const CONFIG_ELEMENT_ID: &str = "compute-config";

/// WebGPU caps `maxComputeInvocationsPerWorkgroup` at 256 by default.
pub const MAX_WORKGROUP_SIZE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    LowPower,
    #[default]
    HighPerformance,
}

impl PowerPreference {
    pub fn to_web(self) -> web_sys::GpuPowerPreference {
        match self {
            PowerPreference::LowPower => web_sys::GpuPowerPreference::LowPower,
            PowerPreference::HighPerformance => web_sys::GpuPowerPreference::HighPerformance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComputeConfig {
    pub lhs: u32,
    pub rhs: u32,
    pub workgroup_size: u32,
    pub power_preference: PowerPreference,
    /// Prefix for every GPU object label.
    pub label: String,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            lhs: 1,
            rhs: 2,
            workgroup_size: 1,
            power_preference: PowerPreference::HighPerformance,
            label: "add".to_string(),
        }
    }
}

impl ComputeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ComputeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workgroup_size == 0 || self.workgroup_size > MAX_WORKGROUP_SIZE {
            return Err(ComputeError::InvalidConfig(format!(
                "workgroup_size must be in 1..={}, got {}",
                MAX_WORKGROUP_SIZE, self.workgroup_size
            )));
        }
        if self.label.is_empty() {
            return Err(ComputeError::InvalidConfig("label must not be empty".into()));
        }
        Ok(())
    }

    /// CPU reference for the shader's result; WGSL u32 addition wraps.
    pub fn expected_sum(&self) -> u32 {
        self.lhs.wrapping_add(self.rhs)
    }

    pub fn label_for(&self, object: &str) -> String {
        format!("{} {}", self.label, object)
    }
}

/// A page without a window or document cannot host WebGPU at all.
pub fn host_document(window: Option<web_sys::Window>) -> Result<web_sys::Document> {
    window
        .and_then(|window| window.document())
        .ok_or(ComputeError::Unsupported)
}

/// Reads the page's config block. No block means defaults.
pub fn load_config() -> Result<ComputeConfig> {
    let document = host_document(web_sys::window())?;

    match document.get_element_by_id(CONFIG_ELEMENT_ID) {
        Some(element) => {
            let text = element.text_content().unwrap_or_default();
            if text.trim().is_empty() {
                Ok(ComputeConfig::default())
            } else {
                ComputeConfig::from_json(&text)
            }
        }
        None => Ok(ComputeConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComputeConfig::default();
        assert_eq!(config.lhs, 1);
        assert_eq!(config.rhs, 2);
        assert_eq!(config.workgroup_size, 1);
        assert_eq!(config.power_preference, PowerPreference::HighPerformance);
        assert_eq!(config.expected_sum(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = ComputeConfig::from_json("{}").unwrap();
        assert_eq!(config, ComputeConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config =
            ComputeConfig::from_json(r#"{ "lhs": 40, "power_preference": "low-power" }"#).unwrap();
        assert_eq!(config.lhs, 40);
        assert_eq!(config.rhs, 2);
        assert_eq!(config.power_preference, PowerPreference::LowPower);
        assert_eq!(config.expected_sum(), 42);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ComputeConfig::from_json(r#"{ "lhs": 1, "operands": [1, 2] }"#).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidConfig(_)));
    }

    #[test]
    fn test_workgroup_size_bounds() {
        assert!(ComputeConfig::from_json(r#"{ "workgroup_size": 0 }"#).is_err());
        assert!(ComputeConfig::from_json(r#"{ "workgroup_size": 257 }"#).is_err());
        assert!(ComputeConfig::from_json(r#"{ "workgroup_size": 256 }"#).is_ok());
        assert!(ComputeConfig::from_json(r#"{ "workgroup_size": 64 }"#).is_ok());
    }

    #[test]
    fn test_empty_label_rejected() {
        let err = ComputeConfig::from_json(r#"{ "label": "" }"#).unwrap_err();
        assert!(err.to_string().contains("label"), "{}", err);
    }

    #[test]
    fn test_expected_sum_wraps() {
        let config = ComputeConfig {
            lhs: u32::MAX,
            rhs: 2,
            ..ComputeConfig::default()
        };
        assert_eq!(config.expected_sum(), 1);
    }

    #[test]
    fn test_power_preference_serialization() {
        assert_eq!(
            serde_json::to_string(&PowerPreference::HighPerformance).unwrap(),
            "\"high-performance\""
        );
        assert_eq!(
            serde_json::to_string(&PowerPreference::LowPower).unwrap(),
            "\"low-power\""
        );
    }

    #[test]
    fn test_missing_window_is_unsupported() {
        let err = host_document(None).unwrap_err();
        assert_eq!(err, ComputeError::Unsupported);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_label_for() {
        let config = ComputeConfig::default();
        assert_eq!(config.label_for("result buffer"), "add result buffer");
    }
}
