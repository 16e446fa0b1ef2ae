pub mod app;
pub mod dispatcher;
pub mod events;
pub mod interact;
pub mod registry;
pub mod render_fn;
pub mod surface;
