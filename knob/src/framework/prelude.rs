pub use crate::framework::color::{Rgb, hex_to_rgb, is_hex_color};
pub use crate::framework::logging::init_logger;
pub use crate::framework::logging::{debug, error, info, trace, warn};
pub use crate::framework::sampling::{
    random_index, random_range, random_within_range_stepped, with_seed,
};
pub use crate::framework::util::HashMap;
pub use crate::framework::util::constrain;
pub use crate::framework::util::lerp;
pub use crate::framework::util::uuid;
pub use crate::ternary;
