use knob::prelude::*;

use crate::sketches::support::{PAGE_SIZE, color_param, page};

pub static SKETCH_CONFIG: SketchConfig = SketchConfig {
    name: "ellipse",
    display_name: "Ellipse",
    w: PAGE_SIZE * 2,
    h: PAGE_SIZE,
};

pub struct Ellipse;

impl Sketch for Ellipse {
    fn controls(&self) -> Result<Vec<ControlConfig>, ConfigError> {
        Ok(ControlBuilder::new()
            .float_slider("w", 120.0, (1.0, 200.0), 1.0)
            .float_slider("h", 60.0, (1.0, 100.0), 1.0)
            .color("fill", "#3366cc")
            .checkbox("outline", false)
            .slider_n("opacity", 1.0)
            .configs())
    }

    fn render_fn(&self) -> RenderFn {
        RenderFn::new("ellipse", |args| {
            let mut page = page(&SKETCH_CONFIG);
            let (w, h) = (args.float("w")?, args.float("h")?);
            let (x, y) = ((page.width() - w) / 2.0, (page.height() - h) / 2.0);

            if args.bool("outline")? {
                page.fill(None).stroke(args.rgb("fill")?).stroke_width(2.0);
            } else {
                page.fill(args.rgb("fill")?);
            }
            page.opacity(args.float("opacity")?).oval(x, y, w, h);

            Ok(page.finish())
        })
        .param("w")
        .param("h")
        .param_spec(color_param("fill", "#3366cc"))
        .param_default("outline", false)
        .param_default("opacity", 1.0)
    }
}

pub fn init() -> Ellipse {
    Ellipse
}
