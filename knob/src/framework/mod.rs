pub mod color;
pub mod logging;
pub mod prelude;
pub mod sampling;
pub mod util;
