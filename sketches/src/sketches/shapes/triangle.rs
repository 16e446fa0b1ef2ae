use knob::prelude::*;

use crate::sketches::support::{PAGE_SIZE, color_param, page, regular_points};

pub static SKETCH_CONFIG: SketchConfig = SketchConfig {
    name: "triangle",
    display_name: "Triangle",
    w: PAGE_SIZE,
    h: PAGE_SIZE,
};

pub struct Triangle;

impl Sketch for Triangle {
    fn controls(&self) -> Result<Vec<ControlConfig>, ConfigError> {
        Ok(ControlBuilder::new()
            .float_slider("radius", 40.0, (0.0, 50.0), 0.5)
            .control(
                ControlConfig::float_slider("rotation", 0.0, (0.0, 360.0), 1.0)
                    .on_commit(),
            )
            .color("fill", "#22aa55")
            .configs())
    }

    fn render_fn(&self) -> RenderFn {
        RenderFn::new("triangle", |args| {
            let mut page = page(&SKETCH_CONFIG);
            let center = (page.width() / 2.0, page.height() / 2.0);
            let points = regular_points(
                center,
                args.float("radius")?,
                3,
                args.float("rotation")?,
            );
            page.fill(args.rgb("fill")?).polygon(&points);
            Ok(page.finish())
        })
        .param("radius")
        .param_default("rotation", 0.0)
        .param_spec(color_param("fill", "#22aa55"))
    }
}

pub fn init() -> Triangle {
    Triangle
}
