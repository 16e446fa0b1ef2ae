pub mod config;
pub mod error;
pub mod inference;
pub mod registry;
pub mod ui_controls;

pub use config::*;
pub use error::*;
pub use inference::*;
pub use registry::*;
pub use ui_controls::*;
