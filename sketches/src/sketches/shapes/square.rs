use knob::prelude::*;

use crate::sketches::support::{PAGE_SIZE, color_param, page};

pub static SKETCH_CONFIG: SketchConfig = SketchConfig {
    name: "square",
    display_name: "Square",
    w: PAGE_SIZE,
    h: PAGE_SIZE,
};

pub struct Square;

impl Sketch for Square {
    fn controls(&self) -> Result<Vec<ControlConfig>, ConfigError> {
        Ok(ControlBuilder::new()
            .int_slider("size", 5, (0, 10), 1)
            .color("fill", "#ff0000")
            .configs())
    }

    fn render_fn(&self) -> RenderFn {
        RenderFn::new("square", |args| {
            let mut page = page(&SKETCH_CONFIG);
            let unit = page.width() / 10.0;
            let side = args.float("size")? * unit;
            let offset = (page.width() - side) / 2.0;
            page.fill(args.rgb("fill")?).rect(offset, offset, side, side);
            Ok(page.finish())
        })
        .param("size")
        .param_spec(color_param("fill", "#ff0000"))
    }
}

pub fn init() -> Square {
    Square
}

#[cfg(test)]
mod tests {
    use knob::render::Shape;

    use super::*;

    #[test]
    fn test_square_is_centered() {
        let render_fn = init().render_fn();
        let values = [("size".to_string(), ControlValue::Int(8))]
            .into_iter()
            .collect();
        let args = render_fn.prepare_args(&values).unwrap();
        let scene = render_fn.call(&args).unwrap();

        assert_eq!(
            scene.shapes()[0].shape,
            Shape::Rect {
                x: 10.0,
                y: 10.0,
                w: 80.0,
                h: 80.0
            }
        );
    }
}
