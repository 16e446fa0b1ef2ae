mod support;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use knob::prelude::*;
use support::{Rig, square};

fn size_control() -> Vec<ControlConfig> {
    ControlBuilder::new()
        .int_slider("size", 5, (0, 10), 1)
        .configs()
}

#[test]
fn square_redraws_into_the_same_slot() {
    let rig = Rig::new(size_control());
    let handle = rig.bind(square(), Binding::identity(&["size"]), "out");

    rig.dispatcher.render_now(handle).unwrap();
    assert_eq!(rig.display_count(), 1);
    assert_eq!(rig.tag("out", "size"), Some(ControlValue::Int(5)));

    rig.registry.set_value("size", 8).unwrap();

    let surface = rig.surface.borrow();
    assert_eq!(surface.display_count(), 2);
    assert_eq!(surface.slot_count(), 1);
    let artifact = surface.artifact("out").unwrap();
    assert_eq!(artifact.tag("size"), Some(&ControlValue::Int(8)));
    assert_eq!(artifact.render_fn(), "square");
    assert!(artifact.markup().contains("width=\"8\""));
    assert!(artifact.markup().contains("fill=\"#ff0000\""));
}

#[test]
fn out_of_range_value_does_not_render() {
    let rig = Rig::new(size_control());
    let handle = rig.bind(square(), Binding::identity(&["size"]), "out");

    let err = rig.registry.set_value("size", 11).unwrap_err();
    assert!(matches!(err, ControlError::OutOfRange { .. }));
    assert_eq!(rig.registry.get_value("size"), Ok(ControlValue::Int(5)));
    assert_eq!(rig.dispatcher.stats(handle).unwrap().invocations, 0);
}

#[test]
fn triggers_during_a_render_coalesce_to_the_latest() {
    let registry = Rc::new(
        ControlRegistry::from_configs(size_control()).unwrap(),
    );
    let dispatcher = RenderDispatcher::new(&registry);
    let surface = MemorySurface::shared();
    let seen = Rc::new(RefCell::new(vec![]));

    let render_fn = {
        let registry = registry.clone();
        let seen = seen.clone();
        let first = Cell::new(true);
        RenderFn::new("nudge", move |args| {
            seen.borrow_mut().push(args.int("size")?);
            if first.replace(false) {
                registry.set_value("size", 7).map_err(|e| RenderError::failed(e.to_string()))?;
                registry.set_value("size", 9).map_err(|e| RenderError::failed(e.to_string()))?;
            }
            Ok(Page::new(10.0, 10.0).finish())
        })
        .param("size")
    };

    let handle = dispatcher
        .bind(render_fn, Binding::identity(&["size"]), surface.clone(), "out")
        .unwrap();

    registry.set_value("size", 6).unwrap();

    assert_eq!(*seen.borrow(), vec![6, 9]);
    let stats = dispatcher.stats(handle).unwrap();
    assert_eq!(stats.invocations, 2);
    assert_eq!(stats.coalesced, 1);
    assert!(!dispatcher.is_in_flight(handle));
    assert!(dispatcher.pending(handle).is_none());
    assert_eq!(
        surface.borrow().artifact("out").map(Artifact::sequence),
        Some(2)
    );
}

#[test]
fn snapshot_covers_every_bound_control() {
    let rig = Rig::new(
        ControlBuilder::new()
            .int_slider("size", 5, (0, 10), 1)
            .color("tint", "#00ff00")
            .configs(),
    );
    let binding = Binding::new().bind("size", "size").bind("fill", "tint");
    let handle = rig.bind(square(), binding, "out");

    rig.registry.set_value("tint", "#0000ff").unwrap();
    assert_eq!(rig.tag("out", "size"), Some(ControlValue::Int(5)));
    assert_eq!(
        rig.tag("out", "fill"),
        Some(ControlValue::Rgb(Rgb::new(0, 0, 255)))
    );
    assert_eq!(rig.dispatcher.stats(handle).unwrap().invocations, 1);
}

#[test]
fn failures_are_reported_and_the_handle_survives() {
    let rig = Rig::new(size_control());
    let render_fn = RenderFn::new("fragile", |args| {
        match args.int("size")? {
            0 => Err(RenderError::failed("size must be positive")),
            1 => panic!("size one is cursed"),
            n => {
                let mut page = Page::new(10.0, 10.0);
                page.rect(0.0, 0.0, n as f64, n as f64);
                Ok(page.finish())
            }
        }
    })
    .param("size");
    let handle = rig.bind(render_fn, Binding::identity(&["size"]), "out");

    rig.registry.set_value("size", 0).unwrap();
    assert_eq!(
        rig.surface.borrow().error("out"),
        Some("size must be positive")
    );

    rig.registry.set_value("size", 1).unwrap();
    assert!(
        rig.surface
            .borrow()
            .error("out")
            .is_some_and(|e| e.contains("cursed"))
    );

    rig.registry.set_value("size", 4).unwrap();
    assert_eq!(rig.tag("out", "size"), Some(ControlValue::Int(4)));

    let stats = rig.dispatcher.stats(handle).unwrap();
    assert_eq!(stats.invocations, 3);
    assert_eq!(stats.failures, 2);
    assert_eq!(rig.surface.borrow().error_count(), 2);
}

#[test]
fn bind_rejects_unbound_required_parameter() {
    let rig = Rig::new(size_control());
    let err = rig
        .dispatcher
        .bind(square(), Binding::new(), rig.surface.clone(), "out")
        .unwrap_err();
    assert_eq!(
        err,
        DispatchError::UnboundParameter {
            render_fn: "square".into(),
            param: "size".into(),
        }
    );
    assert_eq!(rig.registry.listener_count("size"), 0);
}

#[test]
fn on_commit_controls_render_on_release() {
    let rig = Rig::new(vec![
        ControlConfig::int_slider("size", 5, (0, 10), 1).on_commit(),
    ]);
    let handle = rig.bind(square(), Binding::identity(&["size"]), "out");

    for v in [6, 7, 8] {
        rig.registry.interact("size", v).unwrap();
    }
    assert_eq!(rig.display_count(), 0);
    assert_eq!(rig.registry.pending("size"), Some(ControlValue::Int(8)));

    assert!(rig.registry.commit("size").unwrap());
    assert_eq!(rig.display_count(), 1);
    assert_eq!(rig.tag("out", "size"), Some(ControlValue::Int(8)));
    assert!(!rig.registry.commit("size").unwrap());
    assert_eq!(rig.dispatcher.stats(handle).unwrap().invocations, 1);
}

#[test]
fn two_handles_share_a_control() {
    let rig = Rig::new(size_control());
    rig.bind(square(), Binding::identity(&["size"]), "left");
    rig.bind(square(), Binding::identity(&["size"]), "right");

    rig.registry.set_value("size", 3).unwrap();
    assert_eq!(rig.tag("left", "size"), Some(ControlValue::Int(3)));
    assert_eq!(rig.tag("right", "size"), Some(ControlValue::Int(3)));
    assert_eq!(rig.display_count(), 2);
}

#[test]
fn channel_surface_streams_artifacts() {
    let registry = Rc::new(
        ControlRegistry::from_configs(size_control()).unwrap(),
    );
    let dispatcher = RenderDispatcher::new(&registry);
    let (tx, rx) = surface_channel();
    let surface: SharedSurface = Rc::new(RefCell::new(ChannelSurface::new(tx)));

    dispatcher
        .bind(square(), Binding::identity(&["size"]), surface, "out")
        .unwrap();
    registry.set_value("size", 2).unwrap();
    registry.set_value("size", 3).unwrap();

    let sizes: Vec<_> = rx
        .try_iter()
        .filter_map(|event| match event {
            SurfaceEvent::Displayed { artifact, .. } => {
                artifact.tag("size").and_then(ControlValue::as_int)
            }
            SurfaceEvent::Failed { .. } => None,
        })
        .collect();
    assert_eq!(sizes, vec![2, 3]);
}
