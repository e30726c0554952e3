//! Aspect placement of the viewport inside the widget bounds.

use serde::{Deserialize, Serialize};

use crate::geometry::{center_rect, fit_scale, inset, Rect, Size};

use super::MAX_ZOOM_SCALE;

/// Derived layout of the viewport inside the widget.
///
/// Always a pure function of the widget bounds, the image size and the handle
/// margin; it is recomputed rather than stored across layout passes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AspectPlacement {
    /// Aspect container in widget-local coordinates (includes the handle margin).
    pub aspect_rect: Rect,
    /// Viewport rectangle in aspect-container coordinates.
    pub scroll_rect: Rect,
    /// Scale at which the whole image fits the viewport, capped at 1:1.
    pub scale: f64,
}

/// Lay out an image of `natural_size` inside a widget of `bounds_size`.
///
/// `handle_offset` is the margin kept free around the viewport for crop-frame
/// handles (zero when the crop frame is hidden). Images are never upscaled:
/// the fit scale is capped at `1.0`.
///
/// An empty image yields the all-zero placement.
pub fn compute_placement(bounds_size: Size, natural_size: Size, handle_offset: f64) -> AspectPlacement {
    if natural_size.is_empty() {
        return AspectPlacement::default();
    }

    let bounds = Rect::from_size(bounds_size);
    let available = inset(bounds, handle_offset, handle_offset).size;
    let scale = fit_scale(natural_size, available).min(MAX_ZOOM_SCALE);

    let aspect_size = natural_size.scaled(scale).outset(handle_offset);
    let aspect_rect = center_rect(aspect_size, bounds);
    let scroll_rect = inset(Rect::from_size(aspect_size), handle_offset, handle_offset);

    AspectPlacement {
        aspect_rect,
        scroll_rect,
        scale,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
