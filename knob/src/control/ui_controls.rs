//! Control definitions: what kind of input a control is, its bounds, its
//! initial value and when it reports changes.
//!
//! Sketches usually declare these with [`ControlConfig`]'s constructors or a
//! YAML control script (see [`crate::control::config`]) and hand them to a
//! [`ControlRegistry`](crate::control::ControlRegistry).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ControlError;
use crate::framework::color::{Rgb, hex_to_rgb};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Rgb(Rgb),
}

impl ControlValue {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ControlValue::Float(v) => Some(*v),
            ControlValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ControlValue::Int(v) => Some(*v),
            ControlValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let ControlValue::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        if let ControlValue::String(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_rgb(&self) -> Option<Rgb> {
        match self {
            ControlValue::Rgb(rgb) => Some(*rgb),
            ControlValue::String(s) => hex_to_rgb(s).ok(),
            _ => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            ControlValue::Bool(_) => "bool",
            ControlValue::Int(_) => "int",
            ControlValue::Float(_) => "float",
            ControlValue::String(_) => "string",
            ControlValue::Rgb(_) => "rgb",
        }
    }
}

impl Default for ControlValue {
    fn default() -> Self {
        Self::Float(0.0)
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Bool(v) => write!(f, "{}", v),
            ControlValue::Int(v) => write!(f, "{}", v),
            ControlValue::Float(v) => write!(f, "{}", v),
            ControlValue::String(v) => write!(f, "{}", v),
            ControlValue::Rgb(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for ControlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for ControlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ControlValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<bool> for ControlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for ControlValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Rgb> for ControlValue {
    fn from(value: Rgb) -> Self {
        Self::Rgb(value)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    IntSlider,
    FloatSlider,
    Text,
    Checkbox,
    Select,
    Color,
}

impl ControlKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::IntSlider | Self::FloatSlider)
    }

    fn expected(self) -> &'static str {
        match self {
            Self::IntSlider => "an integer",
            Self::FloatSlider => "a number",
            Self::Text => "a string",
            Self::Checkbox => "a bool",
            Self::Select => "one of its options",
            Self::Color => "a `#rrggbb` colour",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IntSlider => "int_slider",
            Self::FloatSlider => "float_slider",
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Color => "color",
        };
        f.write_str(name)
    }
}

/// When a control reports changes to its listeners
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Every intermediate change (e.g. each step of a slider drag)
    #[default]
    Immediate,
    /// Only once the interaction is finished (e.g. pointer release)
    OnCommit,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ControlConfig {
    pub id: String,
    pub label: Option<String>,
    pub kind: ControlKind,
    pub bounds: Option<Bounds>,
    pub options: Vec<String>,
    /// Represents the initial value of this control and will not be updated
    /// after instantiation
    pub value: ControlValue,
    pub update_mode: UpdateMode,
}

impl ControlConfig {
    fn new(id: &str, kind: ControlKind, value: ControlValue) -> Self {
        Self {
            id: id.to_string(),
            label: None,
            kind,
            bounds: None,
            options: vec![],
            value,
            update_mode: UpdateMode::Immediate,
        }
    }

    pub fn int_slider(
        id: &str,
        value: i64,
        range: (i64, i64),
        step: i64,
    ) -> Self {
        Self {
            bounds: Some(Bounds::new(range.0 as f64, range.1 as f64, step as f64)),
            ..Self::new(id, ControlKind::IntSlider, ControlValue::Int(value))
        }
    }

    pub fn float_slider(
        id: &str,
        value: f64,
        range: (f64, f64),
        step: f64,
    ) -> Self {
        Self {
            bounds: Some(Bounds::new(range.0, range.1, step)),
            ..Self::new(id, ControlKind::FloatSlider, ControlValue::Float(value))
        }
    }

    /// Convenience version of [`Self::float_slider`] with default [0.0, 1.0]
    /// range.
    pub fn slider_n(id: &str, value: f64) -> Self {
        Self::float_slider(id, value, (0.0, 1.0), 0.001)
    }

    pub fn text(id: &str, value: &str) -> Self {
        Self::new(id, ControlKind::Text, ControlValue::from(value))
    }

    pub fn checkbox(id: &str, value: bool) -> Self {
        Self::new(id, ControlKind::Checkbox, ControlValue::Bool(value))
    }

    pub fn select<S>(id: &str, value: &str, options: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            options: options.iter().map(|s| s.as_ref().to_string()).collect(),
            ..Self::new(id, ControlKind::Select, ControlValue::from(value))
        }
    }

    pub fn color(id: &str, hex: &str) -> Self {
        Self::new(id, ControlKind::Color, ControlValue::from(hex))
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_update_mode(mut self, update_mode: UpdateMode) -> Self {
        self.update_mode = update_mode;
        self
    }

    pub fn on_commit(self) -> Self {
        self.with_update_mode(UpdateMode::OnCommit)
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Checks bounds and options against the kind, then the initial value
    /// against the bounds.
    pub fn validate(&self) -> Result<(), ControlError> {
        let id = &self.id;

        if self.kind.is_numeric() {
            let Some(bounds) = self.bounds else {
                return Err(ControlError::invalid_bounds(
                    id,
                    format!("{} requires a range", self.kind),
                ));
            };
            if !(bounds.min.is_finite()
                && bounds.max.is_finite()
                && bounds.step.is_finite())
            {
                return Err(ControlError::invalid_bounds(
                    id,
                    "bounds must be finite",
                ));
            }
            if bounds.min > bounds.max {
                return Err(ControlError::invalid_bounds(
                    id,
                    format!("min {} is greater than max {}", bounds.min, bounds.max),
                ));
            }
            if bounds.step <= 0.0 {
                return Err(ControlError::invalid_bounds(
                    id,
                    format!("step must be positive, got {}", bounds.step),
                ));
            }
            if self.kind == ControlKind::IntSlider
                && [bounds.min, bounds.max, bounds.step]
                    .iter()
                    .any(|v| v.fract() != 0.0)
            {
                return Err(ControlError::invalid_bounds(
                    id,
                    "int_slider bounds must be whole numbers",
                ));
            }
        } else if self.bounds.is_some() {
            return Err(ControlError::invalid_bounds(
                id,
                format!("{} does not take a range", self.kind),
            ));
        }

        match self.kind {
            ControlKind::Select if self.options.is_empty() => {
                return Err(ControlError::invalid_bounds(
                    id,
                    "select requires at least one option",
                ));
            }
            ControlKind::Select => {}
            _ if !self.options.is_empty() => {
                return Err(ControlError::invalid_bounds(
                    id,
                    format!("{} does not take options", self.kind),
                ));
            }
            _ => {}
        }

        self.check_value(&self.value).map(|_| ())
    }

    /// Validates `value` for this control and returns it in the control's
    /// canonical variant (e.g. an integral float becomes `Int` for an int
    /// slider).
    pub fn check_value(
        &self,
        value: &ControlValue,
    ) -> Result<ControlValue, ControlError> {
        let mismatch = || ControlError::TypeMismatch {
            id: self.id.clone(),
            expected: self.kind.expected(),
            got: format!("{} `{}`", value.variant_name(), value),
        };

        match self.kind {
            ControlKind::IntSlider => {
                let v = value.as_int().ok_or_else(mismatch)?;
                self.check_range(v as f64)?;
                Ok(ControlValue::Int(v))
            }
            ControlKind::FloatSlider => {
                let v = value.as_float().ok_or_else(mismatch)?;
                if !v.is_finite() {
                    return Err(mismatch());
                }
                self.check_range(v)?;
                Ok(ControlValue::Float(v))
            }
            ControlKind::Text => {
                value.as_string().ok_or_else(mismatch)?;
                Ok(value.clone())
            }
            ControlKind::Checkbox => {
                Ok(ControlValue::Bool(value.as_bool().ok_or_else(mismatch)?))
            }
            ControlKind::Select => {
                let v = value.as_string().ok_or_else(mismatch)?;
                if !self.options.iter().any(|o| o == v) {
                    return Err(ControlError::InvalidChoice {
                        id: self.id.clone(),
                        value: v.to_string(),
                        options: self.options.clone(),
                    });
                }
                Ok(value.clone())
            }
            ControlKind::Color => match value {
                ControlValue::String(s) if hex_to_rgb(s).is_ok() => {
                    Ok(value.clone())
                }
                ControlValue::Rgb(rgb) => Ok(ControlValue::String(rgb.to_hex())),
                _ => Err(mismatch()),
            },
        }
    }

    fn check_range(&self, value: f64) -> Result<(), ControlError> {
        match self.bounds {
            Some(bounds) if !bounds.contains(value) => {
                Err(ControlError::OutOfRange {
                    id: self.id.clone(),
                    value,
                    min: bounds.min,
                    max: bounds.max,
                })
            }
            _ => Ok(()),
        }
    }

    /// Parses raw text (e.g. from the command line) into a value for this
    /// control, then validates it.
    pub fn parse_value(&self, raw: &str) -> Result<ControlValue, ControlError> {
        let raw = raw.trim();
        let mismatch = || ControlError::TypeMismatch {
            id: self.id.clone(),
            expected: self.kind.expected(),
            got: format!("`{}`", raw),
        };

        let value = match self.kind {
            ControlKind::IntSlider => {
                ControlValue::Int(raw.parse::<i64>().map_err(|_| mismatch())?)
            }
            ControlKind::FloatSlider => {
                ControlValue::Float(raw.parse::<f64>().map_err(|_| mismatch())?)
            }
            ControlKind::Checkbox => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => ControlValue::Bool(true),
                "false" | "0" | "no" | "off" => ControlValue::Bool(false),
                _ => return Err(mismatch()),
            },
            ControlKind::Text | ControlKind::Select | ControlKind::Color => {
                ControlValue::from(raw)
            }
        };

        self.check_value(&value)
    }
}

/// Collects [`ControlConfig`]s in declaration order.
///
/// ```rust
/// let registry = ControlBuilder::new()
///     .int_slider("size", 5, (0, 10), 1)
///     .color("fill", "#ff0000")
///     .build()?;
/// ```
#[derive(Default)]
pub struct ControlBuilder {
    controls: Vec<ControlConfig>,
}

impl ControlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control(mut self, control: ControlConfig) -> Self {
        self.controls.push(control);
        self
    }

    pub fn int_slider(
        self,
        id: &str,
        value: i64,
        range: (i64, i64),
        step: i64,
    ) -> Self {
        self.control(ControlConfig::int_slider(id, value, range, step))
    }

    pub fn float_slider(
        self,
        id: &str,
        value: f64,
        range: (f64, f64),
        step: f64,
    ) -> Self {
        self.control(ControlConfig::float_slider(id, value, range, step))
    }

    pub fn slider_n(self, id: &str, value: f64) -> Self {
        self.control(ControlConfig::slider_n(id, value))
    }

    pub fn text(self, id: &str, value: &str) -> Self {
        self.control(ControlConfig::text(id, value))
    }

    pub fn checkbox(self, id: &str, value: bool) -> Self {
        self.control(ControlConfig::checkbox(id, value))
    }

    pub fn select<S>(self, id: &str, value: &str, options: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        self.control(ControlConfig::select(id, value, options))
    }

    pub fn color(self, id: &str, hex: &str) -> Self {
        self.control(ControlConfig::color(id, hex))
    }

    pub fn configs(self) -> Vec<ControlConfig> {
        self.controls
    }

    pub fn build(
        self,
    ) -> Result<crate::control::ControlRegistry, ControlError> {
        crate::control::ControlRegistry::from_configs(self.controls)
    }
}
