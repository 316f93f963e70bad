/*

This is intended to quickly import commonly used modules across
the crate.

*/

// Almost every module uses tracing, so I'm adding it here
pub use smart_default::SmartDefault;
pub use serde::{Deserialize, Serialize};
pub use tracing::{debug, error, info, warn};

pub use crate::aabb::Aabb;
pub use crate::image::{Color, Image};
pub use crate::numeric::*;
pub use crate::random::{RandomEngine, random_float};
