pub mod control;
pub mod framework;
pub mod prelude;
#[path = "runtime/registration_macros.rs"]
mod registration_macros;
pub mod render;
pub mod runtime;

pub use runtime::dispatcher::RenderDispatcher;
pub use runtime::interact::interact;
