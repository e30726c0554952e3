//! Viewport transform: widget bounds, image size and pan/zoom state.
//!
//! The widget lays its image out in three nested rectangles:
//!
//! ```text
//!  - - widget bounds - - - - - - - - - - -
//! |   - - aspect rect - - - - - - - - -   |
//! |  |  handle margin                  |  |
//! |  |   - - scroll rect (viewport) -  |  |
//! |  |  |  zoomed image content     |  |  |
//! |  |   - - - - - - - - - - - - - -   |  |
//! |   - - - - - - - - - - - - - - - - -   |
//!  - - - - - - - - - - - - - - - - - - - -
//! ```
//!
//! The aspect rect is centered in the widget and preserves the image aspect
//! ratio; the scroll rect is the aspect rect minus the handle margin reserved
//! for crop-frame handles. Content offsets are measured in zoomed points, so
//! dividing by the zoom scale yields natural-image pixels.

mod placement;
mod state;

pub use placement::{compute_placement, AspectPlacement};
pub use state::{PanStep, ViewportState, MAX_ZOOM_SCALE};
