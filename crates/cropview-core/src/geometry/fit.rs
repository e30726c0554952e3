//! Aspect-fit scaling and rectangle placement helpers.
//!
//! These are total functions: the only degenerate input they guard against is
//! empty content, for which [`fit_scale`] returns `0.0`.

use super::{Point, Rect, Size};

/// Largest scale at which `content` fits entirely inside `container`.
///
/// Returns `0.0` when `content` has no area. Negative container dimensions
/// are treated as zero.
///
/// # Example
///
/// ```ignore
/// let s = fit_scale(Size::new(400.0, 300.0), Size::new(200.0, 200.0));
/// assert_eq!(s, 0.5);
/// ```
pub fn fit_scale(content: Size, container: Size) -> f64 {
    if content.is_empty() {
        return 0.0;
    }

    let sx = container.width.max(0.0) / content.width;
    let sy = container.height.max(0.0) / content.height;
    sx.min(sy)
}

/// Rectangle of size `inner` sharing the center point of `outer`.
///
/// No scaling is applied; `inner` may be larger than `outer`, in which case
/// the result overhangs it equally on both sides.
pub fn center_rect(inner: Size, outer: Rect) -> Rect {
    let origin = Point::new(
        outer.origin.x + (outer.size.width - inner.width) / 2.0,
        outer.origin.y + (outer.size.height - inner.height) / 2.0,
    );
    Rect::from_origin_size(origin, inner)
}

/// Shrink `rect` by `dx` on the left and right and by `dy` on the top and
/// bottom. Negative insets expand it.
///
/// The result is not clamped: an inset larger than half a dimension yields a
/// negative size, and callers are responsible for passing sensible values.
pub fn inset(rect: Rect, dx: f64, dy: f64) -> Rect {
    Rect::new(
        rect.origin.x + dx,
        rect.origin.y + dy,
        rect.size.width - dx * 2.0,
        rect.size.height - dy * 2.0,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
