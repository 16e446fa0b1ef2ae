//! One-call interactivity: create a control for each parameter, bind them
//! and draw once.

use std::rc::Rc;

use log::info;

use super::dispatcher::{Binding, DispatchError, HandleId, RenderDispatcher};
use super::render_fn::RenderFn;
use super::surface::SharedSurface;
use crate::control::{
    ControlError, ControlRegistry, ControlValue, DefaultShape, infer_control,
};
use crate::framework::util::uuid_5;

#[derive(Clone, Debug, PartialEq)]
pub struct Interactive {
    pub handle: HandleId,
    pub slot: String,
    /// Created control ids in parameter order, `<slot>.<param>`
    pub controls: Vec<String>,
}

/// Creates one control per parameter of `render_fn` and binds them.
///
/// A parameter's control comes from its entry in `hints` if there is one,
/// otherwise from the shape of its declared default (see
/// [`crate::control::inference`]). Parameters with neither are left unbound,
/// which fails with [`DispatchError::UnboundParameter`] if they are required.
/// Control ids are namespaced by `slot` so several interactive displays can
/// share one registry; without a slot one is generated. A failed call
/// creates no controls.
pub fn interact(
    registry: &Rc<ControlRegistry>,
    dispatcher: &RenderDispatcher,
    render_fn: RenderFn,
    hints: &[(&str, DefaultShape)],
    surface: SharedSurface,
    slot: Option<&str>,
) -> Result<Interactive, DispatchError> {
    let slot = slot
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| format!("{}-{}", render_fn.name(), uuid_5()));

    for (name, _) in hints {
        if render_fn.param_named(name).is_none() {
            return Err(DispatchError::UnknownParameter {
                render_fn: render_fn.name().to_string(),
                param: name.to_string(),
            });
        }
    }

    let mut configs = vec![];
    for param in render_fn.params() {
        let shape = hints
            .iter()
            .find(|(name, _)| *name == param.name())
            .map(|(_, shape)| shape.clone())
            .or_else(|| param.default().and_then(shape_of));

        let Some(shape) = shape else {
            continue;
        };

        let mut config = infer_control(param.name(), &shape)?;
        config.id = format!("{}.{}", slot, param.name());
        config.label = Some(param.name().to_string());
        configs.push((param.name().to_string(), config));
    }

    // Everything that can fail is checked before the registry is touched
    if let Some(param) = render_fn
        .required_params()
        .find(|p| !configs.iter().any(|(name, _)| name == p.name()))
    {
        return Err(DispatchError::UnboundParameter {
            render_fn: render_fn.name().to_string(),
            param: param.name().to_string(),
        });
    }
    if let Some((_, config)) = configs.iter().find(|(_, c)| registry.has(&c.id)) {
        return Err(ControlError::DuplicateControl(config.id.clone()).into());
    }

    let mut binding = Binding::new();
    let mut controls = vec![];
    for (param, config) in configs {
        let id = registry.create(config)?;
        binding = binding.bind(&param, &id);
        controls.push(id);
    }

    let handle = dispatcher.bind(render_fn, binding, surface, &slot)?;
    info!("Interactive `{}` with controls {:?}", slot, controls);
    dispatcher.render_now(handle)?;

    Ok(Interactive {
        handle,
        slot,
        controls,
    })
}

/// Reads a default value as a control hint. Colours already converted to RGB
/// have no control of their own.
pub fn shape_of(value: &ControlValue) -> Option<DefaultShape> {
    match value {
        ControlValue::Bool(v) => Some(DefaultShape::Bool(*v)),
        ControlValue::Int(v) => Some(DefaultShape::Int(*v)),
        ControlValue::Float(v) => Some(DefaultShape::Float(*v)),
        ControlValue::String(s) => Some(DefaultShape::Text(s.clone())),
        ControlValue::Rgb(rgb) => Some(DefaultShape::Text(rgb.to_hex())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlConfig, ControlKind};
    use crate::render::Page;
    use crate::runtime::surface::MemorySurface;

    fn ellipse() -> RenderFn {
        RenderFn::new("ellipse", |args| {
            let mut page = Page::new(100.0, 100.0);
            page.fill(args.rgb("fill")?)
                .oval(0.0, 0.0, args.float("w")?, args.float("h")?);
            Ok(page.finish())
        })
        .param("w")
        .param_default("h", 20)
        .param_default("fill", "#00ff00")
    }

    #[test]
    fn test_interact_infers_and_renders() {
        let registry = Rc::new(ControlRegistry::new());
        let dispatcher = RenderDispatcher::new(&registry);
        let surface = MemorySurface::shared();

        let interactive = interact(
            &registry,
            &dispatcher,
            ellipse(),
            &[("w", DefaultShape::int_range(0, 100))],
            surface.clone(),
            Some("e"),
        )
        .unwrap();

        assert_eq!(interactive.controls, vec!["e.w", "e.h", "e.fill"]);
        assert_eq!(
            registry.config("e.w").map(|c| c.kind),
            Some(ControlKind::IntSlider)
        );
        assert_eq!(
            registry.config("e.fill").map(|c| c.kind),
            Some(ControlKind::Color)
        );
        assert_eq!(surface.borrow().display_count(), 1);

        registry.set_value("e.w", 80).unwrap();
        let surface = surface.borrow();
        assert_eq!(surface.display_count(), 2);
        assert_eq!(
            surface.artifact("e").and_then(|a| a.tag("w")).cloned(),
            Some(ControlValue::Int(80))
        );
    }

    #[test]
    fn test_interact_requires_hint_or_default() {
        let registry = Rc::new(ControlRegistry::new());
        let dispatcher = RenderDispatcher::new(&registry);
        let err = interact(
            &registry,
            &dispatcher,
            ellipse(),
            &[],
            MemorySurface::shared(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::UnboundParameter { .. }));
    }

    #[test]
    fn test_failed_interact_leaves_registry_untouched() {
        let registry = Rc::new(ControlRegistry::new());
        let dispatcher = RenderDispatcher::new(&registry);

        // `h` and `fill` have defaults, `w` has nothing
        let err = interact(
            &registry,
            &dispatcher,
            ellipse(),
            &[],
            MemorySurface::shared(),
            Some("e"),
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::UnboundParameter { .. }));
        assert!(registry.ids().is_empty());

        let interactive = interact(
            &registry,
            &dispatcher,
            ellipse(),
            &[("w", DefaultShape::Int(10))],
            MemorySurface::shared(),
            Some("e"),
        )
        .unwrap();
        assert_eq!(interactive.controls, vec!["e.w", "e.h", "e.fill"]);
    }

    #[test]
    fn test_interact_slot_collision_creates_nothing() {
        let registry = Rc::new(ControlRegistry::new());
        registry
            .create(ControlConfig::int_slider("e.fill", 0, (0, 1), 1))
            .unwrap();
        let dispatcher = RenderDispatcher::new(&registry);

        let err = interact(
            &registry,
            &dispatcher,
            ellipse(),
            &[("w", DefaultShape::Int(10))],
            MemorySurface::shared(),
            Some("e"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Control(ControlError::DuplicateControl(
                "e.fill".into()
            ))
        );
        assert_eq!(registry.ids(), vec!["e.fill"]);
    }

    #[test]
    fn test_interact_rejects_unknown_hint() {
        let registry = Rc::new(ControlRegistry::new());
        let dispatcher = RenderDispatcher::new(&registry);
        let err = interact(
            &registry,
            &dispatcher,
            ellipse(),
            &[("depth", DefaultShape::Int(3))],
            MemorySurface::shared(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownParameter { .. }));
    }

    #[test]
    fn test_generated_slot_names() {
        let registry = Rc::new(ControlRegistry::new());
        let dispatcher = RenderDispatcher::new(&registry);
        let a = interact(
            &registry,
            &dispatcher,
            ellipse(),
            &[("w", DefaultShape::Int(10))],
            MemorySurface::shared(),
            None,
        )
        .unwrap();
        assert!(a.slot.starts_with("ellipse-"));
        assert!(a.controls.iter().all(|c| c.starts_with(&a.slot)));
    }

    #[test]
    fn test_shape_of() {
        assert_eq!(
            shape_of(&ControlValue::Float(0.5)),
            Some(DefaultShape::Float(0.5))
        );
        assert_eq!(
            shape_of(&ControlValue::from("#fff")),
            Some(DefaultShape::Text("#fff".into()))
        );
    }
}
