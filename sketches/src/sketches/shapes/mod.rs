pub mod ellipse;
pub mod polygon;
pub mod square;
pub mod triangle;
