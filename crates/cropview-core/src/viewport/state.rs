//! Live pan/zoom state of the viewport.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};

use super::AspectPlacement;

/// Largest zoom scale. The viewport never magnifies past one image pixel per point.
pub const MAX_ZOOM_SCALE: f64 = 1.0;

/// Floor applied to the fit scale so the zoom stays strictly positive even
/// before the widget has been laid out.
const MIN_ZOOM_FLOOR: f64 = 1e-6;

/// Pan/zoom state of the viewport.
///
/// Fields are private so the clamping invariants always hold:
/// `min_zoom_scale <= zoom_scale <= MAX_ZOOM_SCALE` and each offset component
/// lies in `[0, max(0, content * zoom - bounds)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    bounds_size: Size,
    offset: Point,
    zoom_scale: f64,
    min_zoom_scale: f64,
    content_size: Size,
}

/// Result of a pan step: the clamped state plus the offset that was asked for.
///
/// When a gesture ends with `requested != state.offset()`, the host animates
/// the content from `requested` back to the clamped offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanStep {
    pub state: ViewportState,
    pub requested: Point,
}

impl PanStep {
    /// True when the requested offset had to be clamped.
    pub fn overshoots(&self) -> bool {
        self.requested != self.state.offset
    }
}

impl ViewportState {
    /// Viewport showing the whole image: zoomed to the fit scale, offset at the origin.
    pub fn fitted(placement: &AspectPlacement, content_size: Size) -> Self {
        let min_zoom_scale = placement.scale.clamp(MIN_ZOOM_FLOOR, MAX_ZOOM_SCALE);
        Self {
            bounds_size: placement.scroll_rect.size,
            offset: Point::ZERO,
            zoom_scale: min_zoom_scale,
            min_zoom_scale,
            content_size,
        }
    }

    /// Adopt a new placement, resetting the zoom to its fit scale and
    /// clamping the current offset into the new range.
    pub fn refitted(&self, placement: &AspectPlacement) -> Self {
        let fitted = Self::fitted(placement, self.content_size);
        Self {
            offset: fitted.clamp_offset(self.offset),
            ..fitted
        }
    }

    pub fn bounds_size(&self) -> Size {
        self.bounds_size
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale
    }

    pub fn min_zoom_scale(&self) -> f64 {
        self.min_zoom_scale
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Size of the content in points at the current zoom.
    pub fn content_extent(&self) -> Size {
        self.content_size.scaled(self.zoom_scale)
    }

    /// Largest valid offset on each axis.
    pub fn max_offset(&self) -> Point {
        let extent = self.content_extent();
        Point::new(
            (extent.width - self.bounds_size.width).max(0.0),
            (extent.height - self.bounds_size.height).max(0.0),
        )
    }

    /// True when the zoomed content is wider than the viewport.
    pub fn scrolls_horizontally(&self) -> bool {
        self.content_extent().width > self.bounds_size.width
    }

    /// True when the zoomed content is taller than the viewport.
    pub fn scrolls_vertically(&self) -> bool {
        self.content_extent().height > self.bounds_size.height
    }

    /// Clamp `offset` into the valid range for the current zoom.
    pub fn clamp_offset(&self, offset: Point) -> Point {
        let max = self.max_offset();
        Point::new(
            clamp_axis(offset.x, max.x),
            clamp_axis(offset.y, max.y),
        )
    }

    /// Multiply the zoom by `delta`, clamped to `[min_zoom_scale, MAX_ZOOM_SCALE]`.
    ///
    /// The offset is re-clamped because the content extent changes with zoom.
    /// A non-finite delta leaves the state untouched.
    pub fn apply_zoom_delta(&self, delta: f64) -> Self {
        if !delta.is_finite() {
            return *self;
        }

        let zoom_scale = (self.zoom_scale * delta).clamp(self.min_zoom_scale, MAX_ZOOM_SCALE);
        let zoomed = Self {
            zoom_scale,
            ..*self
        };
        Self {
            offset: zoomed.clamp_offset(self.offset),
            ..zoomed
        }
    }

    /// Move the content by `delta` (a finger moving right pulls the offset left).
    pub fn apply_pan_delta(&self, delta: Point) -> PanStep {
        self.with_requested_offset(self.offset - delta)
    }

    /// Move to `requested`, clamped into range.
    pub fn with_requested_offset(&self, requested: Point) -> PanStep {
        PanStep {
            state: Self {
                offset: self.clamp_offset(requested),
                ..*self
            },
            requested,
        }
    }

    /// The visible viewport as a rectangle in content (zoomed point) coordinates.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.bounds_size)
    }

    /// Map the viewport, or a crop rectangle laid over it, into natural-image pixels.
    ///
    /// Without `overlay_rect` the whole visible viewport is mapped. With it,
    /// the overlay-local rectangle is shifted by the content offset first.
    /// The result is fractional; see [`Rect::to_pixel_rect`] for the
    /// truncating conversion used at extraction time.
    ///
    /// [`Rect::to_pixel_rect`]: crate::geometry::Rect::to_pixel_rect
    pub fn image_rect_from_viewport(&self, overlay_rect: Option<Rect>) -> Rect {
        let zoom = self.zoom_scale;
        match overlay_rect {
            Some(overlay) => Rect::new(
                (self.offset.x + overlay.origin.x) / zoom,
                (self.offset.y + overlay.origin.y) / zoom,
                overlay.size.width / zoom,
                overlay.size.height / zoom,
            ),
            None => Rect::from_origin_size(
                self.offset.scaled_down(zoom),
                Size::new(
                    self.bounds_size.width / zoom,
                    self.bounds_size.height / zoom,
                ),
            ),
        }
    }
}

#[inline]
fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
