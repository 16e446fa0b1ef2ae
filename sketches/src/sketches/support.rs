use knob::prelude::*;

pub const PAGE_SIZE: u32 = 100;

/// Blank white page sized to the sketch
pub fn page(config: &SketchConfig) -> Page {
    let mut page = Page::new(config.w as f64, config.h as f64);
    page.background(Rgb::WHITE);
    page
}

/// A colour parameter taking a hex string from its control
pub fn color_param(name: &str, default: &str) -> ParamSpec {
    ParamSpec::with_default(name, default).transform(ValueTransform::HexToRgb)
}

/// `sides` points evenly spaced on a circle, the first pointing up
pub fn regular_points(
    center: (f64, f64),
    radius: f64,
    sides: usize,
    rotation_degrees: f64,
) -> Vec<(f64, f64)> {
    let offset = rotation_degrees.to_radians() - std::f64::consts::FRAC_PI_2;
    (0..sides)
        .map(|i| {
            let angle = offset + std::f64::consts::TAU * i as f64 / sides as f64;
            (
                center.0 + radius * angle.cos(),
                center.1 + radius * angle.sin(),
            )
        })
        .collect()
}
