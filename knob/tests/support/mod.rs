#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use knob::prelude::*;

pub type Surface = Rc<RefCell<MemorySurface>>;

pub fn square() -> RenderFn {
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

pub struct Rig {
    pub registry: Rc<ControlRegistry>,
    pub dispatcher: RenderDispatcher,
    pub surface: Surface,
}

impl Rig {
    pub fn new(configs: Vec<ControlConfig>) -> Self {
        let registry = Rc::new(ControlRegistry::from_configs(configs).unwrap());
        let dispatcher = RenderDispatcher::new(&registry);
        Self {
            registry,
            dispatcher,
            surface: MemorySurface::shared(),
        }
    }

    pub fn bind(&self, render_fn: RenderFn, binding: Binding, slot: &str) -> HandleId {
        self.dispatcher
            .bind(render_fn, binding, self.surface.clone(), slot)
            .unwrap()
    }

    pub fn tag(&self, slot: &str, name: &str) -> Option<ControlValue> {
        self.surface
            .borrow()
            .artifact(slot)
            .and_then(|a| a.tag(name))
            .cloned()
    }

    pub fn display_count(&self) -> usize {
        self.surface.borrow().display_count()
    }
}
