//! Value types and pure layout helpers shared by every other module.
//!
//! # Coordinate System
//!
//! - All values are in points (`f64`), origin at the top-left corner
//! - `x` grows to the right, `y` grows downward
//! - Types are `Copy`; every operation returns a new value

mod fit;
mod types;

pub use fit::{center_rect, fit_scale, inset};
pub use types::{Point, Rect, Size};
