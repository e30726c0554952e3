//! Crop-frame model: the draggable, resizable crop rectangle.
//!
//! The frame lives in overlay-local coordinates. The overlay covers the
//! viewport exactly, so its bounds are the viewport size and its origin is the
//! viewport's top-left corner, independent of pan and zoom.
//!
//! Every operation returns a new state whose rectangle is fully inside the
//! overlay and no smaller than the minimum size (or the overlay itself, when
//! the overlay is smaller than the minimum).

mod handle;

pub use handle::Handle;

use serde::{Deserialize, Serialize};

use crate::geometry::{center_rect, Point, Rect, Size};

/// State of the crop frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFrameState {
    rect: Rect,
    min_size: Size,
    overlay_bounds: Size,
    visible: bool,
    animating: bool,
}

/// Interior grid line positions for rendering, in overlay coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridLines {
    /// X positions of the vertical lines.
    pub vertical: Vec<f64>,
    /// Y positions of the horizontal lines.
    pub horizontal: Vec<f64>,
}

/// Initial crop rectangle: `fraction` of the overlay in each dimension,
/// centered. Fractions are clamped to `(0, 1]`.
pub fn default_frame(overlay_bounds: Size, fraction: f64) -> Rect {
    let fraction = if fraction.is_finite() && fraction > 0.0 {
        fraction.min(1.0)
    } else {
        1.0
    };
    center_rect(overlay_bounds.scaled(fraction), Rect::from_size(overlay_bounds))
}

impl CropFrameState {
    /// A hidden frame over `overlay_bounds`, sized by [`default_frame`].
    pub fn new(overlay_bounds: Size, min_size: Size, default_fraction: f64) -> Self {
        let state = Self {
            rect: Rect::ZERO,
            min_size: min_size.max(Size::ZERO),
            overlay_bounds: overlay_bounds.max(Size::ZERO),
            visible: false,
            animating: false,
        };
        state.with_rect(default_frame(state.overlay_bounds, default_fraction))
    }

    /// Crop rectangle in overlay coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn overlay_bounds(&self) -> Size {
        self.overlay_bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn with_visibility(self, visible: bool, animating: bool) -> Self {
        Self {
            visible,
            animating,
            ..self
        }
    }

    /// Minimum size actually enforceable inside the current overlay.
    fn effective_min(&self) -> Size {
        self.min_size.min(self.overlay_bounds)
    }

    /// Clamp an arbitrary rectangle: size first, then position.
    fn clamp_rect(&self, rect: Rect) -> Rect {
        let bounds = self.overlay_bounds;
        let min = self.effective_min();

        let width = finite_or(rect.size.width, bounds.width)
            .max(min.width)
            .min(bounds.width);
        let height = finite_or(rect.size.height, bounds.height)
            .max(min.height)
            .min(bounds.height);
        let x = finite_or(rect.origin.x, 0.0).min(bounds.width - width).max(0.0);
        let y = finite_or(rect.origin.y, 0.0).min(bounds.height - height).max(0.0);

        Rect::new(x, y, width, height)
    }

    /// Replace the rectangle, subject to the same clamping as drags.
    pub fn with_rect(self, rect: Rect) -> Self {
        Self {
            rect: self.clamp_rect(rect),
            ..self
        }
    }

    /// Drag `handle` by `delta`.
    ///
    /// Only the edges named by the handle move, each independently. A moving
    /// edge stops at the overlay boundary and never comes closer than the
    /// minimum size to its opposite edge, which stays put.
    pub fn apply_handle_drag(self, handle: Handle, delta: Point) -> Self {
        let dx = finite_or(delta.x, 0.0);
        let dy = finite_or(delta.y, 0.0);
        let bounds = self.overlay_bounds;
        let min = self.effective_min();

        let mut left = self.rect.min_x();
        let mut top = self.rect.min_y();
        let mut right = self.rect.max_x();
        let mut bottom = self.rect.max_y();

        if handle.moves_left() {
            left = (left + dx).min(right - min.width).max(0.0);
        } else if handle.moves_right() {
            right = (right + dx).max(left + min.width).min(bounds.width);
        }

        if handle.moves_top() {
            top = (top + dy).min(bottom - min.height).max(0.0);
        } else if handle.moves_bottom() {
            bottom = (bottom + dy).max(top + min.height).min(bounds.height);
        }

        Self {
            rect: Rect::from_edges(left, top, right, bottom),
            ..self
        }
    }

    /// Translate the whole frame by `delta`, stopping at the overlay edges.
    pub fn apply_move(self, delta: Point) -> Self {
        let dx = finite_or(delta.x, 0.0);
        let dy = finite_or(delta.y, 0.0);
        let size = self.rect.size;
        let x = (self.rect.min_x() + dx)
            .min(self.overlay_bounds.width - size.width)
            .max(0.0);
        let y = (self.rect.min_y() + dy)
            .min(self.overlay_bounds.height - size.height)
            .max(0.0);

        Self {
            rect: Rect::from_origin_size(Point::new(x, y), size),
            ..self
        }
    }

    /// Move the frame into a resized overlay, scaling the rectangle by the
    /// same factors as the overlay.
    pub fn with_overlay_bounds(self, overlay_bounds: Size) -> Self {
        let overlay_bounds = overlay_bounds.max(Size::ZERO);
        let old = self.overlay_bounds;
        let rect = if old.is_empty() {
            Rect::from_size(overlay_bounds)
        } else {
            let sx = overlay_bounds.width / old.width;
            let sy = overlay_bounds.height / old.height;
            Rect::new(
                self.rect.min_x() * sx,
                self.rect.min_y() * sy,
                self.rect.size.width * sx,
                self.rect.size.height * sy,
            )
        };

        Self {
            overlay_bounds,
            ..self
        }
        .with_rect(rect)
    }

    /// Positions of the `lines - 1` evenly spaced interior grid lines in
    /// each direction. Zero or one line yields no interior lines.
    pub fn grid_lines(&self, lines: u8) -> GridLines {
        if lines < 2 {
            return GridLines::default();
        }

        let n = f64::from(lines);
        let r = self.rect;
        GridLines {
            vertical: (1..lines)
                .map(|i| r.min_x() + r.size.width * f64::from(i) / n)
                .collect(),
            horizontal: (1..lines)
                .map(|i| r.min_y() + r.size.height * f64::from(i) / n)
                .collect(),
        }
    }
}

#[inline]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame(rect: Rect, min: f64) -> CropFrameState {
        CropFrameState::new(Size::new(200.0, 200.0), Size::new(min, min), 1.0).with_rect(rect)
    }

    #[test]
    fn test_default_frame() {
        let bounds = Size::new(200.0, 100.0);
        assert_eq!(default_frame(bounds, 1.0), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(default_frame(bounds, 0.5), Rect::new(50.0, 25.0, 100.0, 50.0));
        // Out-of-range fractions fall back to the whole overlay
        assert_eq!(default_frame(bounds, 0.0), Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(default_frame(bounds, 3.0), Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_new_frame_is_hidden() {
        let f = CropFrameState::new(Size::new(300.0, 200.0), Size::new(60.0, 60.0), 1.0);
        assert!(!f.is_visible());
        assert!(!f.is_animating());
        assert_eq!(f.rect(), Rect::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_se_drag_clamps_to_min_size() {
        let f = frame(Rect::new(20.0, 20.0, 40.0, 40.0), 30.0);
        let dragged = f.apply_handle_drag(Handle::SE, Point::new(-100.0, -100.0));
        assert_eq!(dragged.rect().size, Size::new(30.0, 30.0));
        assert_eq!(dragged.rect().origin, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_nw_drag_keeps_opposite_corner() {
        let f = frame(Rect::new(50.0, 50.0, 100.0, 100.0), 30.0);
        let dragged = f.apply_handle_drag(Handle::NW, Point::new(-80.0, 10.0));
        let r = dragged.rect();
        assert_eq!(r.min_x(), 0.0);
        assert_eq!(r.min_y(), 60.0);
        assert_eq!(r.max_x(), 150.0);
        assert_eq!(r.max_y(), 150.0);
    }

    #[test]
    fn test_edge_drag_moves_one_edge() {
        let f = frame(Rect::new(50.0, 50.0, 100.0, 100.0), 30.0);

        let east = f.apply_handle_drag(Handle::E, Point::new(25.0, 40.0)).rect();
        assert_eq!(east, Rect::new(50.0, 50.0, 125.0, 100.0));

        let north = f.apply_handle_drag(Handle::N, Point::new(25.0, -10.0)).rect();
        assert_eq!(north, Rect::new(50.0, 40.0, 100.0, 110.0));
    }

    #[test]
    fn test_drag_stops_at_overlay_edge() {
        let f = frame(Rect::new(50.0, 50.0, 100.0, 100.0), 30.0);
        let r = f.apply_handle_drag(Handle::SE, Point::new(500.0, 500.0)).rect();
        assert_eq!(r, Rect::new(50.0, 50.0, 150.0, 150.0));
    }

    #[test]
    fn test_move_clamps_inside_overlay() {
        let f = frame(Rect::new(50.0, 50.0, 100.0, 100.0), 30.0);
        assert_eq!(
            f.apply_move(Point::new(20.0, -10.0)).rect(),
            Rect::new(70.0, 40.0, 100.0, 100.0)
        );
        assert_eq!(
            f.apply_move(Point::new(500.0, -500.0)).rect(),
            Rect::new(100.0, 0.0, 100.0, 100.0)
        );
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let f = frame(Rect::new(50.0, 50.0, 100.0, 100.0), 30.0);
        assert_eq!(f.apply_move(Point::new(f64::NAN, f64::INFINITY)), f);
        assert_eq!(f.apply_handle_drag(Handle::SW, Point::new(f64::NAN, f64::NAN)), f);
    }

    #[test]
    fn test_with_rect_clamps() {
        let f = frame(Rect::new(0.0, 0.0, 100.0, 100.0), 30.0);
        assert_eq!(
            f.with_rect(Rect::new(-20.0, 190.0, 10.0, 500.0)).rect(),
            Rect::new(0.0, 0.0, 30.0, 200.0)
        );
        assert_eq!(
            f.with_rect(Rect::new(180.0, 10.0, 50.0, 50.0)).rect(),
            Rect::new(150.0, 10.0, 50.0, 50.0)
        );
    }

    #[test]
    fn test_overlay_smaller_than_min_size() {
        let f = CropFrameState::new(Size::new(20.0, 100.0), Size::new(60.0, 60.0), 1.0);
        assert_eq!(f.rect(), Rect::new(0.0, 0.0, 20.0, 100.0));
        let shrunk = f.apply_handle_drag(Handle::S, Point::new(0.0, -90.0));
        assert_eq!(shrunk.rect().size, Size::new(20.0, 60.0));
    }

    #[test]
    fn test_with_overlay_bounds_scales_rect() {
        let f = frame(Rect::new(20.0, 40.0, 100.0, 60.0), 30.0);
        let rotated = f.with_overlay_bounds(Size::new(100.0, 400.0));
        let r = rotated.rect();
        assert_relative_eq!(r.min_x(), 10.0);
        assert_relative_eq!(r.min_y(), 80.0);
        assert_relative_eq!(r.size.width, 50.0);
        assert_relative_eq!(r.size.height, 120.0);
        assert_eq!(rotated.overlay_bounds(), Size::new(100.0, 400.0));
    }

    #[test]
    fn test_grid_lines() {
        let f = frame(Rect::new(0.0, 30.0, 90.0, 60.0), 30.0);
        let grid = f.grid_lines(3);
        assert_eq!(grid.vertical, vec![30.0, 60.0]);
        assert_eq!(grid.horizontal, vec![50.0, 70.0]);
        assert_eq!(f.grid_lines(1), GridLines::default());
        assert_eq!(f.grid_lines(0), GridLines::default());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn handle_strategy() -> impl Strategy<Value = Handle> {
        prop::sample::select(Handle::ALL.to_vec())
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Drag(Handle, Point),
        Move(Point),
        Set(Rect),
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        let delta = (-400.0f64..=400.0, -400.0f64..=400.0).prop_map(|(x, y)| Point::new(x, y));
        prop_oneof![
            (handle_strategy(), delta.clone()).prop_map(|(h, d)| Edit::Drag(h, d)),
            delta.prop_map(Edit::Move),
            (
                -200.0f64..=600.0,
                -200.0f64..=600.0,
                -50.0f64..=800.0,
                -50.0f64..=800.0
            )
                .prop_map(|(x, y, w, h)| Edit::Set(Rect::new(x, y, w, h))),
        ]
    }

    fn satisfies_invariants(f: &CropFrameState) -> bool {
        let r = f.rect();
        let min = f.min_size().min(f.overlay_bounds());
        Rect::from_size(f.overlay_bounds()).contains_rect(&r, EPSILON)
            && r.size.width >= min.width - EPSILON
            && r.size.height >= min.height - EPSILON
    }

    proptest! {
        /// Property: Any edit sequence keeps the frame inside the overlay and above min size.
        #[test]
        fn prop_edits_preserve_invariants(
            (bw, bh) in (40.0f64..=1000.0, 40.0f64..=1000.0),
            min in 0.0f64..=120.0,
            fraction in 0.1f64..=1.0,
            edits in prop::collection::vec(edit_strategy(), 1..25),
        ) {
            let mut f = CropFrameState::new(Size::new(bw, bh), Size::new(min, min), fraction);
            prop_assert!(satisfies_invariants(&f));
            for edit in edits {
                f = match edit {
                    Edit::Drag(h, d) => f.apply_handle_drag(h, d),
                    Edit::Move(d) => f.apply_move(d),
                    Edit::Set(r) => f.with_rect(r),
                };
                prop_assert!(satisfies_invariants(&f), "violated after edit: {:?}", f);
            }
        }

        /// Property: Moving never changes the frame size.
        #[test]
        fn prop_move_preserves_size(
            dx in -500.0f64..=500.0,
            dy in -500.0f64..=500.0,
        ) {
            let f = CropFrameState::new(Size::new(300.0, 200.0), Size::new(30.0, 30.0), 0.5);
            let moved = f.apply_move(Point::new(dx, dy));
            prop_assert_eq!(moved.rect().size, f.rect().size);
        }

        /// Property: Handles leave the edges they do not name untouched.
        #[test]
        fn prop_handle_moves_only_its_edges(
            handle in handle_strategy(),
            dx in -300.0f64..=300.0,
            dy in -300.0f64..=300.0,
        ) {
            let f = CropFrameState::new(Size::new(400.0, 400.0), Size::new(30.0, 30.0), 0.5);
            let before = f.rect();
            let after = f.apply_handle_drag(handle, Point::new(dx, dy)).rect();
            if !handle.moves_left() { prop_assert_eq!(after.min_x(), before.min_x()); }
            if !handle.moves_right() { prop_assert!((after.max_x() - before.max_x()).abs() < EPSILON); }
            if !handle.moves_top() { prop_assert_eq!(after.min_y(), before.min_y()); }
            if !handle.moves_bottom() { prop_assert!((after.max_y() - before.max_y()).abs() < EPSILON); }
        }
    }
}
