//! Picks a control for a render parameter from the shape of its default.
//!
//! Every rule lives in [`infer_control`]:
//!
//! | default shape              | control      | bounds                          |
//! |----------------------------|--------------|---------------------------------|
//! | `Bool(b)`                  | checkbox     |                                 |
//! | `Int(v)`, `v > 0`          | int slider   | `[-v, 3v]`, step 1              |
//! | `Int(v)`, `v < 0`          | int slider   | `[3v, -v]`, step 1              |
//! | `Int(0)`                   | int slider   | `[0, 1]`, step 1                |
//! | `Float(v)`                 | float slider | as `Int`, step 0.1              |
//! | `IntRange(min, max, step)` | int slider   | given, step 1 unless given      |
//! | `FloatRange(..)`           | float slider | given, step `(max - min) / 100` |
//! | `Text("#rgb"/"#rrggbb")`   | color        |                                 |
//! | `Text(s)`                  | text         |                                 |
//! | `Choices([a, ..])`         | select       | value `a`                       |
//!
//! Ranges start at their midpoint (snapped to the step for ints). Empty
//! choices and inverted ranges are errors.

use thiserror::Error;

use super::error::ControlError;
use super::ui_controls::{ControlConfig, ControlValue};
use crate::framework::color::is_hex_color;

const FLOAT_STEP: f64 = 0.1;
const RANGE_DIVISIONS: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub enum DefaultShape {
    Bool(bool),
    Int(i64),
    Float(f64),
    IntRange {
        min: i64,
        max: i64,
        step: Option<i64>,
    },
    FloatRange {
        min: f64,
        max: f64,
        step: Option<f64>,
    },
    Text(String),
    Choices(Vec<String>),
}

impl DefaultShape {
    pub fn int_range(min: i64, max: i64) -> Self {
        Self::IntRange {
            min,
            max,
            step: None,
        }
    }

    pub fn float_range(min: f64, max: f64) -> Self {
        Self::FloatRange {
            min,
            max,
            step: None,
        }
    }

    pub fn choices<S: AsRef<str>>(options: &[S]) -> Self {
        Self::Choices(options.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// The value a render function should receive when this shape is used as
    /// a plain default rather than as a control hint
    pub fn default_value(&self) -> Option<ControlValue> {
        match self {
            Self::Bool(v) => Some(ControlValue::Bool(*v)),
            Self::Int(v) => Some(ControlValue::Int(*v)),
            Self::Float(v) => Some(ControlValue::Float(*v)),
            Self::IntRange { min, max, step } => {
                Some(ControlValue::Int(int_midpoint(*min, *max, step.unwrap_or(1))))
            }
            Self::FloatRange { min, max, .. } => {
                Some(ControlValue::Float((min + max) / 2.0))
            }
            Self::Text(s) => Some(ControlValue::from(s.as_str())),
            Self::Choices(options) => {
                options.first().map(|s| ControlValue::from(s.as_str()))
            }
        }
    }
}

impl From<bool> for DefaultShape {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultShape {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for DefaultShape {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for DefaultShape {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<(i64, i64)> for DefaultShape {
    fn from((min, max): (i64, i64)) -> Self {
        Self::int_range(min, max)
    }
}

impl From<(i64, i64, i64)> for DefaultShape {
    fn from((min, max, step): (i64, i64, i64)) -> Self {
        Self::IntRange {
            min,
            max,
            step: Some(step),
        }
    }
}

impl From<(f64, f64)> for DefaultShape {
    fn from((min, max): (f64, f64)) -> Self {
        Self::float_range(min, max)
    }
}

impl From<(f64, f64, f64)> for DefaultShape {
    fn from((min, max, step): (f64, f64, f64)) -> Self {
        Self::FloatRange {
            min,
            max,
            step: Some(step),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("`{0}` has no choices to pick from")]
    EmptyChoices(String),

    #[error(transparent)]
    Control(#[from] ControlError),
}

/// Builds the control for `param` described by the table in the module docs
pub fn infer_control(
    param: &str,
    default: &DefaultShape,
) -> Result<ControlConfig, InferenceError> {
    let config = match default {
        DefaultShape::Bool(v) => ControlConfig::checkbox(param, *v),
        DefaultShape::Int(v) => {
            let (min, max) = around(*v as f64);
            ControlConfig::int_slider(param, *v, (min as i64, max as i64), 1)
        }
        DefaultShape::Float(v) => {
            ControlConfig::float_slider(param, *v, around(*v), FLOAT_STEP)
        }
        DefaultShape::IntRange { min, max, step } => {
            let step = step.unwrap_or(1);
            let value = int_midpoint(*min, *max, step);
            ControlConfig::int_slider(param, value, (*min, *max), step)
        }
        DefaultShape::FloatRange { min, max, step } => {
            let step = step.unwrap_or_else(|| {
                let step = (max - min) / RANGE_DIVISIONS;
                if step > 0.0 { step } else { FLOAT_STEP }
            });
            ControlConfig::float_slider(
                param,
                (min + max) / 2.0,
                (*min, *max),
                step,
            )
        }
        DefaultShape::Text(s) if is_hex_color(s) => ControlConfig::color(param, s),
        DefaultShape::Text(s) => ControlConfig::text(param, s),
        DefaultShape::Choices(options) => {
            let Some(first) = options.first() else {
                return Err(InferenceError::EmptyChoices(param.to_string()));
            };
            ControlConfig::select(param, first, options.as_slice())
        }
    };

    config.validate()?;
    Ok(config)
}

fn around(value: f64) -> (f64, f64) {
    if value > 0.0 {
        (-value, 3.0 * value)
    } else if value < 0.0 {
        (3.0 * value, -value)
    } else {
        (0.0, 1.0)
    }
}

fn int_midpoint(min: i64, max: i64, step: i64) -> i64 {
    if step <= 0 || max < min {
        return min;
    }
    // Wide enough for the span of any two i64s; the result lies in [min, max]
    let (min, max, step) = (min as i128, max as i128, step as i128);
    (min + ((max - min) / 2 / step) * step) as i64
}
