//! Deserialization types for declaring controls in a YAML control script
//!
//! ```yaml
//! shared: &slider
//!   range: [0, 10]
//!   step: 1
//!
//! size:
//!   type: int_slider
//!   <<: *slider
//!   default: 5
//!   update: on_commit
//!
//! fill:
//!   type: color
//!   default: "#ff0000"
//! ```
//!
//! Entries without a `type` (like `shared` above) are anchors for YAML merge
//! keys and are skipped. An entry with a `type` that does not parse is an
//! error.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_yml::Value;
use thiserror::Error;
use yaml_merge_keys::merge_keys_serde_yml;

use super::error::ControlError;
use super::ui_controls::{
    Bounds, ControlConfig, ControlKind, ControlValue, UpdateMode,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read control script '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse control script: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("failed to process YAML merge keys: {0}")]
    MergeKeys(String),

    #[error("control `{name}`: {reason}")]
    InvalidControl { name: String, reason: String },

    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Uses [`IndexMap`] so we maintain the exact order of controls that are
/// declared in yaml
pub type ConfigFile = IndexMap<String, Value>;

#[derive(Deserialize, Debug)]
pub struct ScriptedControlConfig {
    #[serde(rename = "type")]
    pub control_type: ControlKind,
    #[serde(default)]
    pub label: Option<String>,
    /// Overrides the yaml key as the control id
    #[serde(default)]
    pub var: Option<String>,
    #[serde(default)]
    pub range: Option<[f64; 2]>,
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub update: UpdateMode,
}

impl ScriptedControlConfig {
    pub fn into_control_config(
        self,
        name: &str,
    ) -> Result<ControlConfig, ConfigError> {
        let id = self.var.clone().unwrap_or_else(|| name.to_string());
        let invalid = |reason: String| ConfigError::InvalidControl {
            name: name.to_string(),
            reason,
        };

        let bounds = match self.control_type {
            ControlKind::IntSlider | ControlKind::FloatSlider => {
                let [min, max] = self.range.unwrap_or([0.0, 1.0]);
                let step = self.step.unwrap_or(
                    if self.control_type == ControlKind::IntSlider {
                        1.0
                    } else {
                        0.000_1
                    },
                );
                Some(Bounds::new(min, max, step))
            }
            _ if self.range.is_some() || self.step.is_some() => {
                return Err(invalid(format!(
                    "{} does not take a range or step",
                    self.control_type
                )));
            }
            _ => None,
        };

        let value = match self.default {
            Some(value) => yaml_to_control_value(&value).ok_or_else(|| {
                invalid(format!("unsupported default value {:?}", value))
            })?,
            None => implicit_default(self.control_type, bounds, &self.options),
        };

        let config = ControlConfig {
            id,
            label: self.label,
            kind: self.control_type,
            bounds,
            options: self.options,
            value,
            update_mode: self.update,
        };

        config.validate()?;
        Ok(config)
    }
}

fn implicit_default(
    kind: ControlKind,
    bounds: Option<Bounds>,
    options: &[String],
) -> ControlValue {
    let min = bounds.map_or(0.0, |b| b.min);
    match kind {
        ControlKind::IntSlider => ControlValue::Int(min as i64),
        ControlKind::FloatSlider => ControlValue::Float(min),
        ControlKind::Text => ControlValue::from(""),
        ControlKind::Checkbox => ControlValue::Bool(false),
        ControlKind::Select => {
            ControlValue::from(options.first().map_or("", String::as_str))
        }
        ControlKind::Color => ControlValue::from("#000000"),
    }
}

fn yaml_to_control_value(value: &Value) -> Option<ControlValue> {
    match value {
        Value::Bool(b) => Some(ControlValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(ControlValue::Int)
            .or_else(|| n.as_f64().map(ControlValue::Float)),
        Value::String(s) => Some(ControlValue::from(s.as_str())),
        _ => None,
    }
}

/// Parses a control script into configs in declaration order
pub fn parse_control_script(
    source: &str,
) -> Result<Vec<ControlConfig>, ConfigError> {
    let raw: Value = serde_yml::from_str(source)?;
    let merged = merge_keys_serde_yml(raw)
        .map_err(|err| ConfigError::MergeKeys(err.to_string()))?;
    let file: ConfigFile = serde_yml::from_value(merged)?;

    let mut configs = Vec::new();
    for (name, entry) in file {
        if entry.get("type").is_none() {
            debug!("Skipping non-control entry `{}`", name);
            continue;
        }
        let control: ScriptedControlConfig = serde_yml::from_value(entry)
            .map_err(|err| ConfigError::InvalidControl {
                name: name.clone(),
                reason: err.to_string(),
            })?;
        configs.push(control.into_control_config(&name)?);
    }

    Ok(configs)
}

pub fn load_control_script(
    path: &Path,
) -> Result<Vec<ControlConfig>, ConfigError> {
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_control_script(&source)
}
