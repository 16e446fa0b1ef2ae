//! A running sketch: its controls, the dispatcher and the one handle that
//! redraws the sketch into its slot.

use std::rc::Rc;

use log::info;
use thiserror::Error;

use super::dispatcher::{DispatchError, HandleId, HandleStats, RenderDispatcher};
use super::registry::{SketchConfig, SketchEntry, SketchRegistry};
use super::surface::SharedSurface;
use crate::control::{ConfigError, ControlError, ControlRegistry, ControlValue};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no sketch named `{0}`")]
    UnknownSketch(String),

    #[error("expected `name=value`, got `{0}`")]
    BadAssignment(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub struct SketchSession {
    config: &'static SketchConfig,
    controls: Rc<ControlRegistry>,
    dispatcher: RenderDispatcher,
    handle: HandleId,
}

impl SketchSession {
    /// Creates the sketch's controls, binds its render function to the slot
    /// named after the sketch and draws once
    pub fn start(
        entry: &SketchEntry,
        surface: SharedSurface,
    ) -> Result<Self, SessionError> {
        let sketch = entry.init();
        let controls = Rc::new(ControlRegistry::from_configs(sketch.controls()?)?);
        let dispatcher = RenderDispatcher::new(&controls);

        let render_fn = sketch.render_fn();
        let binding = sketch.binding(&render_fn, &controls);
        let handle =
            dispatcher.bind(render_fn, binding, surface, entry.config.name)?;

        info!(
            "Started `{}` with controls {:?}",
            entry.config.display_name,
            controls.ids()
        );

        dispatcher.render_now(handle)?;

        Ok(Self {
            config: entry.config,
            controls,
            dispatcher,
            handle,
        })
    }

    pub fn start_named(
        registry: &SketchRegistry,
        name: &str,
        surface: SharedSurface,
    ) -> Result<Self, SessionError> {
        let entry = registry
            .get(name)
            .ok_or_else(|| SessionError::UnknownSketch(name.to_string()))?;
        Self::start(entry, surface)
    }

    pub fn config(&self) -> &'static SketchConfig {
        self.config
    }

    pub fn controls(&self) -> &Rc<ControlRegistry> {
        &self.controls
    }

    pub fn slot(&self) -> &str {
        self.config.name
    }

    /// Sets a control from its textual form, e.g. `"8"` or `"#00ff00"`
    pub fn set(&self, id: &str, raw: &str) -> Result<(), SessionError> {
        let value = self.parse(id, raw)?;
        self.controls.set_value(id, value)?;
        Ok(())
    }

    /// Applies `name=value`
    pub fn assign(&self, assignment: &str) -> Result<(), SessionError> {
        let (id, raw) = parse_assignment(assignment)?;
        self.set(id, raw)
    }

    /// One interaction step followed by nothing else; on-commit controls
    /// buffer it until [`Self::commit`]
    pub fn interact(&self, id: &str, raw: &str) -> Result<(), SessionError> {
        let value = self.parse(id, raw)?;
        self.controls.interact(id, value)?;
        Ok(())
    }

    pub fn commit(&self, id: &str) -> Result<bool, SessionError> {
        Ok(self.controls.commit(id)?)
    }

    /// A drag across `values` ending in a release
    pub fn drag(&self, id: &str, values: &[&str]) -> Result<(), SessionError> {
        for raw in values {
            self.interact(id, raw)?;
        }
        self.commit(id)?;
        Ok(())
    }

    pub fn values(&self) -> indexmap::IndexMap<String, ControlValue> {
        self.controls.values()
    }

    pub fn stats(&self) -> HandleStats {
        self.dispatcher.stats(self.handle).unwrap_or_default()
    }

    pub fn render(&self) -> Result<(), SessionError> {
        Ok(self.dispatcher.render_now(self.handle)?)
    }

    fn parse(&self, id: &str, raw: &str) -> Result<ControlValue, SessionError> {
        let config = self
            .controls
            .config(id)
            .ok_or_else(|| ControlError::UnknownControl(id.to_string()))?;
        Ok(config.parse_value(raw)?)
    }
}

/// Splits `name=value` at the first `=`
pub fn parse_assignment(s: &str) -> Result<(&str, &str), SessionError> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim(), value.trim()))
        }
        _ => Err(SessionError::BadAssignment(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlBuilder, ControlConfig};
    use crate::render::Page;
    use crate::runtime::registry::Sketch;
    use crate::runtime::render_fn::RenderFn;
    use crate::runtime::surface::MemorySurface;

    static CONFIG: SketchConfig = SketchConfig {
        name: "bar",
        display_name: "Bar",
        w: 100,
        h: 10,
    };

    struct Bar;

    impl Sketch for Bar {
        fn controls(&self) -> Result<Vec<ControlConfig>, ConfigError> {
            Ok(ControlBuilder::new()
                .control(ControlConfig::int_slider("len", 5, (0, 100), 1).on_commit())
                .checkbox("hollow", false)
                .configs())
        }

        fn render_fn(&self) -> RenderFn {
            RenderFn::new("bar", |args| {
                let mut page = Page::new(100.0, 10.0);
                if args.bool("hollow")? {
                    page.fill(None);
                }
                page.rect(0.0, 0.0, args.float("len")?, 10.0);
                Ok(page.finish())
            })
            .param("len")
            .param("hollow")
        }
    }

    fn registry() -> SketchRegistry {
        let mut registry = SketchRegistry::new();
        registry.register(&CONFIG, || Box::new(Bar)).unwrap();
        registry
    }

    #[test]
    fn test_start_draws_once() {
        let surface = MemorySurface::shared();
        let session =
            SketchSession::start_named(&registry(), "bar", surface.clone())
                .unwrap();

        assert_eq!(session.slot(), "bar");
        assert_eq!(session.stats().invocations, 1);
        assert!(surface.borrow().artifact("bar").is_some());
    }

    #[test]
    fn test_unknown_sketch() {
        let result = SketchSession::start_named(
            &registry(),
            "nope",
            MemorySurface::shared(),
        );
        assert!(matches!(result, Err(SessionError::UnknownSketch(_))));
    }

    #[test]
    fn test_assign_parses_by_kind() {
        let surface = MemorySurface::shared();
        let session =
            SketchSession::start_named(&registry(), "bar", surface.clone())
                .unwrap();

        session.assign("len=40").unwrap();
        session.assign("hollow = on").unwrap();
        assert_eq!(session.controls().int("len"), 40);
        assert!(session.controls().bool("hollow"));
        assert_eq!(session.stats().invocations, 3);

        assert!(matches!(
            session.assign("len=lots"),
            Err(SessionError::Control(ControlError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            session.assign("len"),
            Err(SessionError::BadAssignment(_))
        ));
    }

    #[test]
    fn test_drag_renders_once_on_release() {
        let surface = MemorySurface::shared();
        let session =
            SketchSession::start_named(&registry(), "bar", surface.clone())
                .unwrap();

        session.drag("len", &["10", "20", "30"]).unwrap();
        assert_eq!(session.stats().invocations, 2);
        assert_eq!(
            surface
                .borrow()
                .artifact("bar")
                .and_then(|a| a.tag("len"))
                .cloned(),
            Some(ControlValue::Int(30))
        );
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("size=8").unwrap(), ("size", "8"));
        assert_eq!(parse_assignment("fill=#f00").unwrap(), ("fill", "#f00"));
        assert!(parse_assignment("=8").is_err());
    }
}
