use knob::prelude::*;

use crate::sketches::support::{PAGE_SIZE, page};

pub static SKETCH_CONFIG: SketchConfig = SketchConfig {
    name: "circles",
    display_name: "Circles",
    w: PAGE_SIZE * 2,
    h: PAGE_SIZE * 2,
};

const PALETTES: &[(&str, &[&str])] = &[
    ("warm", &["#e63946", "#f4a261", "#e9c46a"]),
    ("cool", &["#1d3557", "#457b9d", "#a8dadc"]),
    ("mono", &["#111111", "#555555", "#999999"]),
];

pub struct Circles;

impl Sketch for Circles {
    fn controls(&self) -> Result<Vec<ControlConfig>, ConfigError> {
        let palettes: Vec<&str> = PALETTES.iter().map(|(name, _)| *name).collect();
        Ok(ControlBuilder::new()
            .int_slider("count", 24, (1, 200), 1)
            .int_slider("seed", 42, (0, 9999), 1)
            .float_slider("max_radius", 16.0, (2.0, 50.0), 0.5)
            .select("palette", "warm", palettes.as_slice())
            .checkbox("jitter_opacity", false)
            .configs())
    }

    fn render_fn(&self) -> RenderFn {
        RenderFn::new("circles", |args| {
            let mut page = page(&SKETCH_CONFIG);
            let count = args.int("count")?.max(0) as usize;
            let max_radius = args.float("max_radius")?;
            let jitter = args.bool("jitter_opacity")?;
            let colors = palette(args.string("palette")?)?;
            let (w, h) = (page.width(), page.height());

            with_seed(args.int("seed")?.unsigned_abs(), |rng| {
                for _ in 0..count {
                    let r = random_range(rng, 1.0, max_radius);
                    let x = random_range(rng, r, w - r);
                    let y = random_range(rng, r, h - r);
                    let i = random_index(rng, colors.len());
                    let opacity = if jitter {
                        random_within_range_stepped(rng, 0.3, 1.0, 0.1)
                    } else {
                        1.0
                    };
                    page.fill(colors[i]).opacity(opacity).circle(x, y, r);
                }
            });

            Ok(page.finish())
        })
        .param("count")
        .param("seed")
        .param("max_radius")
        .param_default("palette", "warm")
        .param_default("jitter_opacity", false)
    }
}

fn palette(name: &str) -> Result<Vec<Rgb>, RenderError> {
    let (_, hexes) = PALETTES
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| RenderError::failed(format!("unknown palette `{}`", name)))?;

    hexes
        .iter()
        .map(|hex| {
            hex_to_rgb(hex).map_err(|e| RenderError::failed(e.to_string()))
        })
        .collect()
}

pub fn init() -> Circles {
    Circles
}
