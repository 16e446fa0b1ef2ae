pub mod artifact;
pub mod scene;
pub mod svg;

pub use artifact::Artifact;
pub use scene::{Page, Scene, Shape, Style, StyledShape};
