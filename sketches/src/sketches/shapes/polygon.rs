use knob::prelude::*;

use crate::sketches::support::{PAGE_SIZE, color_param, page, regular_points};

pub static SKETCH_CONFIG: SketchConfig = SketchConfig {
    name: "polygon",
    display_name: "Polygon",
    w: PAGE_SIZE,
    h: PAGE_SIZE,
};

pub struct Polygon {
    control_script: &'static str,
}

impl Sketch for Polygon {
    fn controls(&self) -> Result<Vec<ControlConfig>, ConfigError> {
        parse_control_script(self.control_script)
    }

    fn render_fn(&self) -> RenderFn {
        RenderFn::new("polygon", |args| {
            let mut page = page(&SKETCH_CONFIG);
            let center = (page.width() / 2.0, page.height() / 2.0);
            let sides = args.int("sides")?.max(3) as usize;
            let radius = args.float("radius")?;

            let points = if args.bool("star")? {
                let inner = lerp(0.0, radius, args.float("inner")?);
                star_points(center, radius, inner, sides)
            } else {
                regular_points(center, radius, sides, 0.0)
            };

            page.fill(args.rgb("fill")?);
            match args.string("outline")? {
                "thin" => page.stroke(Rgb::BLACK).stroke_width(1.0),
                "thick" => page.stroke(Rgb::BLACK).stroke_width(4.0),
                _ => page.stroke(None),
            };
            page.polygon(&points);

            Ok(page.finish())
        })
        .param("sides")
        .param("radius")
        .param_default("inner", 0.5)
        .param_default("star", false)
        .param_spec(color_param("fill", "#8844cc"))
        .param_default("outline", "thin")
    }
}

/// Alternates outer and inner vertices
fn star_points(
    center: (f64, f64),
    outer: f64,
    inner: f64,
    tips: usize,
) -> Vec<(f64, f64)> {
    let outer_points = regular_points(center, outer, tips, 0.0);
    let inner_points =
        regular_points(center, inner, tips, 180.0 / tips as f64);
    outer_points
        .into_iter()
        .zip(inner_points)
        .flat_map(|(o, i)| [o, i])
        .collect()
}

pub fn init() -> Polygon {
    Polygon {
        control_script: include_str!("polygon.yaml"),
    }
}
