//! A page of styled shapes.
//!
//! [`Page`] is the mutable drawing surface a render function works with. It
//! keeps a current fill and stroke like most immediate-mode drawing APIs and
//! every shape captures the style in effect when it was added. [`Page::finish`]
//! freezes it into an immutable [`Scene`].

use serde::Serialize;

use crate::framework::color::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Rgb::BLACK),
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    /// Ellipse inscribed in the given bounding box
    Oval {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Polygon {
        points: Vec<(f64, f64)>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Oval { .. } => "oval",
            Shape::Circle { .. } => "circle",
            Shape::Polygon { .. } => "polygon",
            Shape::Line { .. } => "line",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StyledShape {
    pub shape: Shape,
    pub style: Style,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    width: f64,
    height: f64,
    background: Option<Rgb>,
    shapes: Vec<StyledShape>,
}

impl Scene {
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn background(&self) -> Option<Rgb> {
        self.background
    }

    pub fn shapes(&self) -> &[StyledShape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Page {
    width: f64,
    height: f64,
    background: Option<Rgb>,
    style: Style,
    shapes: Vec<StyledShape>,
}

impl Page {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            style: Style::default(),
            shapes: vec![],
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn background(&mut self, color: Rgb) -> &mut Self {
        self.background = Some(color);
        self
    }

    /// `None` disables filling
    pub fn fill(&mut self, color: impl Into<Option<Rgb>>) -> &mut Self {
        self.style.fill = color.into();
        self
    }

    /// `None` disables stroking
    pub fn stroke(&mut self, color: impl Into<Option<Rgb>>) -> &mut Self {
        self.style.stroke = color.into();
        self
    }

    pub fn stroke_width(&mut self, width: f64) -> &mut Self {
        self.style.stroke_width = width.max(0.0);
        self
    }

    pub fn opacity(&mut self, opacity: f64) -> &mut Self {
        self.style.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.push(Shape::Rect { x, y, w, h })
    }

    pub fn oval(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.push(Shape::Oval { x, y, w, h })
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64) -> &mut Self {
        self.push(Shape::Circle { cx, cy, r })
    }

    pub fn polygon(&mut self, points: &[(f64, f64)]) -> &mut Self {
        self.push(Shape::Polygon {
            points: points.to_vec(),
        })
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64)) -> &mut Self {
        self.push(Shape::Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
        })
    }

    fn push(&mut self, shape: Shape) -> &mut Self {
        self.shapes.push(StyledShape {
            shape,
            style: self.style,
        });
        self
    }

    pub fn finish(self) -> Scene {
        Scene {
            width: self.width,
            height: self.height,
            background: self.background,
            shapes: self.shapes,
        }
    }
}
