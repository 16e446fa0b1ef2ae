//! Render functions: a named body plus the parameters it takes.
//!
//! ```rust
//! let square = RenderFn::new("square", |args| {
//!     let size = args.float("size")?;
//!     let mut page = Page::new(100.0, 100.0);
//!     page.fill(args.rgb("fill")?).rect(0.0, 0.0, size, size);
//!     Ok(page.finish())
//! })
//! .param("size")
//! .param_spec(ParamSpec::with_default("fill", "#ff0000").transform(ValueTransform::HexToRgb));
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::control::ControlValue;
use crate::framework::color::{Rgb, hex_to_rgb};
use crate::render::Scene;

/// Per-invocation failure. Reported to the output surface; never fatal to the
/// binding that produced it.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("{0}")]
    Failed(String),

    #[error("render function panicked: {0}")]
    Panicked(String),

    #[error("could not transform `{param}`: {reason}")]
    Transform { param: String, reason: String },

    #[error("missing argument `{0}`")]
    MissingArgument(String),

    #[error("argument `{param}` is not {expected}")]
    WrongType {
        param: String,
        expected: &'static str,
    },
}

impl RenderError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

pub type TransformFn = dyn Fn(&ControlValue) -> Result<ControlValue, String>;

/// Converts a control's raw value before the render function sees it
#[derive(Clone)]
pub enum ValueTransform {
    /// `"#rrggbb"` to [`ControlValue::Rgb`]
    HexToRgb,
    Custom(Rc<TransformFn>),
}

impl ValueTransform {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ControlValue) -> Result<ControlValue, String> + 'static,
    {
        Self::Custom(Rc::new(f))
    }

    pub fn apply(
        &self,
        param: &str,
        value: &ControlValue,
    ) -> Result<ControlValue, RenderError> {
        let result = match self {
            ValueTransform::HexToRgb => match value {
                ControlValue::Rgb(_) => Ok(value.clone()),
                ControlValue::String(s) => hex_to_rgb(s)
                    .map(ControlValue::Rgb)
                    .map_err(|e| e.to_string()),
                other => Err(format!("expected a hex string, got {}", other)),
            },
            ValueTransform::Custom(f) => f(value),
        };

        result.map_err(|reason| RenderError::Transform {
            param: param.to_string(),
            reason,
        })
    }
}

impl fmt::Debug for ValueTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HexToRgb => f.write_str("HexToRgb"),
            Self::Custom(_) => f.write_str("Custom(<function>)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParamSpec {
    name: String,
    default: Option<ControlValue>,
    transform: Option<ValueTransform>,
}

impl ParamSpec {
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: None,
            transform: None,
        }
    }

    pub fn with_default(name: &str, default: impl Into<ControlValue>) -> Self {
        Self {
            default: Some(default.into()),
            ..Self::required(name)
        }
    }

    pub fn transform(mut self, transform: ValueTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&ControlValue> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Keyword arguments handed to a render function
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    values: IndexMap<String, ControlValue>,
}

impl Args {
    pub fn new(values: IndexMap<String, ControlValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Result<&ControlValue, RenderError> {
        self.values
            .get(name)
            .ok_or_else(|| RenderError::MissingArgument(name.to_string()))
    }

    pub fn float(&self, name: &str) -> Result<f64, RenderError> {
        self.typed(name, "a number", ControlValue::as_float)
    }

    pub fn int(&self, name: &str) -> Result<i64, RenderError> {
        self.typed(name, "an integer", ControlValue::as_int)
    }

    pub fn bool(&self, name: &str) -> Result<bool, RenderError> {
        self.typed(name, "a bool", ControlValue::as_bool)
    }

    pub fn string(&self, name: &str) -> Result<&str, RenderError> {
        let value = self.get(name)?;
        value.as_string().ok_or_else(|| RenderError::WrongType {
            param: name.to_string(),
            expected: "a string",
        })
    }

    pub fn rgb(&self, name: &str) -> Result<Rgb, RenderError> {
        self.typed(name, "a colour", ControlValue::as_rgb)
    }

    fn typed<T>(
        &self,
        name: &str,
        expected: &'static str,
        f: impl Fn(&ControlValue) -> Option<T>,
    ) -> Result<T, RenderError> {
        f(self.get(name)?).ok_or_else(|| RenderError::WrongType {
            param: name.to_string(),
            expected,
        })
    }

    pub fn values(&self) -> &IndexMap<String, ControlValue> {
        &self.values
    }

    pub fn into_values(self) -> IndexMap<String, ControlValue> {
        self.values
    }
}

pub type RenderBody = dyn Fn(&Args) -> Result<Scene, RenderError>;

#[derive(Clone)]
pub struct RenderFn {
    name: String,
    params: Vec<ParamSpec>,
    body: Rc<RenderBody>,
}

impl RenderFn {
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&Args) -> Result<Scene, RenderError> + 'static,
    {
        Self {
            name: name.to_string(),
            params: vec![],
            body: Rc::new(body),
        }
    }

    /// Adds a required parameter
    pub fn param(self, name: &str) -> Self {
        self.param_spec(ParamSpec::required(name))
    }

    pub fn param_default(
        self,
        name: &str,
        default: impl Into<ControlValue>,
    ) -> Self {
        self.param_spec(ParamSpec::with_default(name, default))
    }

    /// Adds `spec`, replacing an earlier parameter of the same name
    pub fn param_spec(mut self, spec: ParamSpec) -> Self {
        match self.params.iter_mut().find(|p| p.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.params.push(spec),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param_named(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.is_required())
    }

    /// Fills in defaults for parameters missing from `values` and applies
    /// each parameter's transform. Values for undeclared names are dropped.
    pub fn prepare_args(
        &self,
        values: &IndexMap<String, ControlValue>,
    ) -> Result<Args, RenderError> {
        let mut prepared = IndexMap::with_capacity(self.params.len());

        for param in &self.params {
            let value = values
                .get(&param.name)
                .or(param.default.as_ref())
                .ok_or_else(|| RenderError::MissingArgument(param.name.clone()))?;

            let value = match &param.transform {
                Some(transform) => transform.apply(&param.name, value)?,
                None => value.clone(),
            };

            prepared.insert(param.name.clone(), value);
        }

        Ok(Args::new(prepared))
    }

    pub fn call(&self, args: &Args) -> Result<Scene, RenderError> {
        (self.body)(args)
    }
}

impl fmt::Debug for RenderFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Page;

    fn square() -> RenderFn {
        RenderFn::new("square", |args| {
            let size = args.float("size")?;
            let mut page = Page::new(100.0, 100.0);
            page.fill(args.rgb("fill")?).rect(0.0, 0.0, size, size);
            Ok(page.finish())
        })
        .param("size")
        .param_spec(
            ParamSpec::with_default("fill", "#ff0000")
                .transform(ValueTransform::HexToRgb),
        )
    }

    fn values(pairs: &[(&str, ControlValue)]) -> IndexMap<String, ControlValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_and_transforms() {
        let render_fn = square();
        let args = render_fn
            .prepare_args(&values(&[("size", ControlValue::Int(5))]))
            .unwrap();

        assert_eq!(args.int("size"), Ok(5));
        assert_eq!(
            args.get("fill"),
            Ok(&ControlValue::Rgb(Rgb::new(255, 0, 0)))
        );

        let scene = render_fn.call(&args).unwrap();
        assert_eq!(scene.shapes()[0].style.fill, Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn test_missing_required() {
        let err = square().prepare_args(&IndexMap::new()).unwrap_err();
        assert_eq!(err, RenderError::MissingArgument("size".into()));
    }

    #[test]
    fn test_bad_transform_input() {
        let err = square()
            .prepare_args(&values(&[
                ("size", ControlValue::Int(5)),
                ("fill", ControlValue::from("crimson")),
            ]))
            .unwrap_err();
        assert!(matches!(err, RenderError::Transform { .. }));
    }

    #[test]
    fn test_custom_transform() {
        let double = ValueTransform::custom(|v| {
            v.as_float()
                .map(|f| ControlValue::Float(f * 2.0))
                .ok_or_else(|| "not a number".to_string())
        });
        assert_eq!(
            double.apply("x", &ControlValue::Int(2)),
            Ok(ControlValue::Float(4.0))
        );
        assert!(double.apply("x", &ControlValue::Bool(true)).is_err());
    }

    #[test]
    fn test_wrong_type_accessor() {
        let args = Args::new(values(&[("size", ControlValue::from("big"))]));
        assert_eq!(
            args.float("size"),
            Err(RenderError::WrongType {
                param: "size".into(),
                expected: "a number",
            })
        );
        assert_eq!(
            args.bool("nope"),
            Err(RenderError::MissingArgument("nope".into()))
        );
    }

    #[test]
    fn test_param_spec_replaces_duplicate() {
        let render_fn = square().param_default("size", 3);
        assert_eq!(render_fn.params().len(), 2);
        assert_eq!(render_fn.required_params().count(), 0);
        assert_eq!(
            render_fn.param_named("size").and_then(ParamSpec::default),
            Some(&ControlValue::Int(3))
        );
    }
}
