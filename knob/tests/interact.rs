mod support;

use std::rc::Rc;

use knob::prelude::*;

#[test]
fn interact_builds_controls_from_defaults() {
    let registry = Rc::new(ControlRegistry::new());
    let dispatcher = RenderDispatcher::new(&registry);
    let surface = MemorySurface::shared();

    let render_fn = RenderFn::new("rings", |args| {
        let mut page = Page::new(100.0, 100.0);
        page.fill(None).stroke(args.rgb("color")?);
        for i in 0..args.int("count")? {
            page.circle(50.0, 50.0, args.float("gap")? * (i + 1) as f64);
        }
        if args.bool("border")? {
            page.rect(0.0, 0.0, 100.0, 100.0);
        }
        Ok(page.finish())
    })
    .param_default("count", 3)
    .param_default("gap", 4.5)
    .param_default("border", false)
    .param_default("color", "#336699")
    .param_default("label", "rings")
    .param("mode");

    let interactive = interact(
        &registry,
        &dispatcher,
        render_fn,
        &[("mode", DefaultShape::choices(&["solid", "dashed"]))],
        surface.clone(),
        Some("rings"),
    )
    .unwrap();

    let kinds: Vec<_> = interactive
        .controls
        .iter()
        .filter_map(|id| registry.config(id).map(|c| c.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ControlKind::IntSlider,
            ControlKind::FloatSlider,
            ControlKind::Checkbox,
            ControlKind::Color,
            ControlKind::Text,
            ControlKind::Select,
        ]
    );

    let count = registry.config("rings.count").unwrap();
    let bounds = count.bounds.unwrap();
    assert_eq!((bounds.min, bounds.max, bounds.step), (-3.0, 9.0, 1.0));
    assert_eq!(registry.string("rings.mode"), "solid");

    assert_eq!(surface.borrow().display_count(), 1);
    registry.set_value("rings.count", 5).unwrap();

    let surface = surface.borrow();
    let artifact = surface.artifact("rings").unwrap();
    assert_eq!(artifact.scene().shapes().len(), 5);
    assert_eq!(artifact.sequence(), 2);
}

#[test]
fn two_interactive_displays_share_a_registry() {
    let registry = Rc::new(ControlRegistry::new());
    let dispatcher = RenderDispatcher::new(&registry);
    let surface = MemorySurface::shared();

    let a = interact(
        &registry,
        &dispatcher,
        support::square(),
        &[("size", DefaultShape::int_range(0, 10))],
        surface.clone(),
        None,
    )
    .unwrap();
    let b = interact(
        &registry,
        &dispatcher,
        support::square(),
        &[("size", DefaultShape::int_range(0, 10))],
        surface.clone(),
        None,
    )
    .unwrap();

    assert_ne!(a.slot, b.slot);
    assert_eq!(registry.ids().len(), 4);
    assert_eq!(
        registry.get_value(&a.controls[0]),
        Ok(ControlValue::Int(5))
    );

    registry.set_value(&b.controls[0], 2).unwrap();
    let surface = surface.borrow();
    assert_eq!(surface.display_count(), 3);
    assert_eq!(
        surface.artifact(&b.slot).and_then(|x| x.tag("size")),
        Some(&ControlValue::Int(2))
    );
    assert_eq!(
        surface.artifact(&a.slot).and_then(|x| x.tag("size")),
        Some(&ControlValue::Int(5))
    );
}
