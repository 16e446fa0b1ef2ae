pub mod generative;
pub mod shapes;
pub mod support;
