use ::svg::Document;
use ::svg::Node;
use ::svg::node::element::{Circle, Ellipse, Line, Polygon, Rectangle};

use super::scene::{Scene, Shape, Style};

pub fn to_document(scene: &Scene) -> Document {
    let (w, h) = (scene.width(), scene.height());
    let mut document = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    if let Some(background) = scene.background() {
        document = document.add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", w)
                .set("height", h)
                .set("fill", background.to_hex()),
        );
    }

    for styled in scene.shapes() {
        match &styled.shape {
            Shape::Rect { x, y, w, h } => {
                let node = Rectangle::new()
                    .set("x", *x)
                    .set("y", *y)
                    .set("width", *w)
                    .set("height", *h);
                document = document.add(apply_style(node, &styled.style));
            }
            Shape::Oval { x, y, w, h } => {
                let node = Ellipse::new()
                    .set("cx", x + w / 2.0)
                    .set("cy", y + h / 2.0)
                    .set("rx", w.abs() / 2.0)
                    .set("ry", h.abs() / 2.0);
                document = document.add(apply_style(node, &styled.style));
            }
            Shape::Circle { cx, cy, r } => {
                let node = Circle::new()
                    .set("cx", *cx)
                    .set("cy", *cy)
                    .set("r", r.abs());
                document = document.add(apply_style(node, &styled.style));
            }
            Shape::Polygon { points } => {
                let node = Polygon::new().set("points", points_attr(points));
                document = document.add(apply_style(node, &styled.style));
            }
            Shape::Line { x1, y1, x2, y2 } => {
                let node = Line::new()
                    .set("x1", *x1)
                    .set("y1", *y1)
                    .set("x2", *x2)
                    .set("y2", *y2);
                document = document.add(apply_style(node, &styled.style));
            }
        }
    }

    document
}

/// Serialises `scene` to standalone SVG markup
pub fn to_svg(scene: &Scene) -> String {
    to_document(scene).to_string()
}

fn apply_style<N: Node>(mut node: N, style: &Style) -> N {
    node.assign(
        "fill",
        style.fill.map_or_else(|| "none".to_string(), |c| c.to_hex()),
    );
    if let Some(stroke) = style.stroke {
        node.assign("stroke", stroke.to_hex());
        node.assign("stroke-width", style.stroke_width);
    }
    if style.opacity < 1.0 {
        node.assign("opacity", style.opacity);
    }
    node
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::color::Rgb;
    use crate::render::scene::Page;

    #[test]
    fn test_empty_scene() {
        let svg = to_svg(&Page::new(200.0, 100.0).finish());
        assert!(svg.contains("<svg"));
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("height=\"100\""));
        assert!(svg.contains("viewBox=\"0 0 200 100\""));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn test_shapes_and_styles() {
        let mut page = Page::new(100.0, 100.0);
        page.background(Rgb::WHITE);
        page.fill(Rgb::new(255, 0, 0)).rect(10.0, 10.0, 20.0, 30.0);
        page.fill(None)
            .stroke(Rgb::new(0, 0, 255))
            .stroke_width(3.0)
            .oval(0.0, 0.0, 40.0, 20.0);
        page.opacity(0.5).circle(50.0, 50.0, 5.0);
        page.polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.5)]);

        let svg = to_svg(&page.finish());
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(svg.contains("fill=\"#ff0000\""));
        assert!(svg.contains("<ellipse"));
        assert!(svg.contains("rx=\"20\""));
        assert!(svg.contains("ry=\"10\""));
        assert!(svg.contains("stroke=\"#0000ff\""));
        assert!(svg.contains("stroke-width=\"3\""));
        assert!(svg.contains("opacity=\"0.5\""));
        assert!(svg.contains("points=\"0,0 10,0 5,8.5\""));
        assert!(svg.contains("fill=\"none\""));
    }
}
