//! Interaction controller: owns all widget state and applies gestures to it.
//!
//! The controller is the single writer of the image descriptor, the viewport
//! and the crop frame. Hosts feed it layout passes and normalized gestures,
//! read the derived crop rectangles back, and subscribe to change events.
//!
//! # Transitions
//!
//! Show and hide are asynchronous: the controller enters `Showing`/`Hiding`,
//! the host animates, then calls [`CropperController::complete_transition`].
//! Non-animated calls complete immediately. Layout changes that arrive
//! mid-transition are queued and applied on completion.

mod events;
mod gesture;
mod mode;

pub use events::{CropRects, CropperEvent, EventKind, Observers, SubscriptionId};
pub use gesture::pinch_zoom_factor;
pub use mode::{CropFrameMode, Transition};

use tracing::{debug, trace};

use crate::config::CropperConfig;
use crate::error::{CropError, Result};
use crate::frame::{CropFrameState, GridLines, Handle};
use crate::geometry::{Point, Rect, Size};
use crate::image_source::{ImageDescriptor, ImageSource, PixelRect};
use crate::viewport::{compute_placement, AspectPlacement, PanStep, ViewportState};

/// Layout inputs received while a transition was in flight.
#[derive(Debug, Clone, Copy, Default)]
struct PendingGeometry {
    bounds: Option<Size>,
    image: Option<ImageDescriptor>,
}

/// Owner of the cropper state.
#[derive(Debug)]
pub struct CropperController {
    config: CropperConfig,
    widget_bounds: Size,
    descriptor: ImageDescriptor,
    placement: AspectPlacement,
    viewport: ViewportState,
    frame: Option<CropFrameState>,
    mode: CropFrameMode,
    pending: PendingGeometry,
    /// Distance the pan gesture in progress has been dragged past the edge.
    pan_overshoot: Point,
    observers: Observers,
}

impl CropperController {
    /// Create a controller for `descriptor` inside a widget of `widget_bounds`.
    ///
    /// Fails when the image has no area or the config is invalid. With
    /// `config.show_crop_frame` set, the crop frame is shown without animation.
    pub fn new(descriptor: ImageDescriptor, widget_bounds: Size, config: CropperConfig) -> Result<Self> {
        config.validate()?;
        descriptor.validate()?;

        let placement = compute_placement(widget_bounds, descriptor.natural_size, 0.0);
        let viewport = ViewportState::fitted(&placement, descriptor.natural_size);
        let show = config.show_crop_frame;

        let mut controller = Self {
            config,
            widget_bounds,
            descriptor,
            placement,
            viewport,
            frame: None,
            mode: CropFrameMode::Hidden,
            pending: PendingGeometry::default(),
            pan_overshoot: Point::ZERO,
            observers: Observers::new(),
        };
        if show {
            controller.show(false);
        }
        Ok(controller)
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn mode(&self) -> CropFrameMode {
        self.mode
    }

    pub fn descriptor(&self) -> ImageDescriptor {
        self.descriptor
    }

    pub fn widget_bounds(&self) -> Size {
        self.widget_bounds
    }

    pub fn placement(&self) -> AspectPlacement {
        self.placement
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// The crop frame, once it has been shown at least once.
    pub fn frame(&self) -> Option<&CropFrameState> {
        self.frame.as_ref()
    }

    pub fn is_crop_frame_active(&self) -> bool {
        self.mode == CropFrameMode::Active
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self, kind: EventKind, callback: impl FnMut(&CropperEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(kind, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: CropperEvent) {
        self.observers.emit(&event);
    }

    fn notify_scroll(&mut self) {
        self.emit(CropperEvent::ScrollChanged {
            offset: self.viewport.offset(),
        });
        self.notify_crop_rect();
    }

    fn notify_crop_rect(&mut self) {
        let rects = self.current_crop_rect();
        self.emit(CropperEvent::CropRectChanged(rects));
    }

    fn notify_geometry(&mut self) {
        self.emit(CropperEvent::ZoomChanged {
            zoom_scale: self.viewport.zoom_scale(),
        });
        self.notify_scroll();
    }

    fn set_mode(&mut self, mode: CropFrameMode) {
        debug!(from = %self.mode, to = %mode, "Crop frame mode changed");
        self.mode = mode;
        self.emit(CropperEvent::ModeChanged { mode });
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    fn handle_offset(&self) -> f64 {
        if self.mode.reserves_handle_margin() {
            self.config.handle_offset()
        } else {
            0.0
        }
    }

    /// Recompute the placement. Returns false when nothing changed.
    fn layout(&mut self) -> bool {
        let placement = compute_placement(
            self.widget_bounds,
            self.descriptor.natural_size,
            self.handle_offset(),
        );
        if placement == self.placement {
            return false;
        }

        debug!(
            aspect = ?placement.aspect_rect,
            scroll = ?placement.scroll_rect,
            scale = placement.scale,
            "Viewport placement refreshed"
        );

        self.placement = placement;
        self.viewport = self.viewport.refitted(&placement);
        self.pan_overshoot = Point::ZERO;
        let overlay_bounds = self.viewport.bounds_size();
        self.frame = self.frame.map(|f| f.with_overlay_bounds(overlay_bounds));
        true
    }

    /// Feed the widget size from a layout pass.
    ///
    /// Deferred until the current transition completes, if one is in flight.
    pub fn set_bounds(&mut self, widget_bounds: Size) {
        if self.mode.is_transitioning() {
            trace!(bounds = ?widget_bounds, mode = %self.mode, "Deferring bounds change");
            self.pending.bounds = Some(widget_bounds);
            return;
        }

        self.widget_bounds = widget_bounds;
        if self.layout() {
            self.notify_geometry();
        }
    }

    /// Recompute geometry for the current bounds.
    ///
    /// Idempotent: returns false, without notifying, when the placement is
    /// unchanged or a transition is in flight.
    pub fn refresh(&mut self) -> bool {
        if self.mode.is_transitioning() {
            trace!(mode = %self.mode, "Skipping refresh during transition");
            return false;
        }

        let changed = self.layout();
        if changed {
            self.notify_geometry();
        }
        changed
    }

    /// Replace the image. Resets the viewport to the full-fit placement and
    /// the crop frame, if any, to its default rectangle.
    ///
    /// Fails with [`CropError::InvalidImage`] for an image with no area.
    /// Deferred until the current transition completes, if one is in flight.
    pub fn set_image(&mut self, descriptor: ImageDescriptor) -> Result<()> {
        descriptor.validate()?;

        if self.mode.is_transitioning() {
            trace!(size = ?descriptor.natural_size, mode = %self.mode, "Deferring image replace");
            self.pending.image = Some(descriptor);
            return Ok(());
        }

        self.apply_image(descriptor);
        self.notify_geometry();
        Ok(())
    }

    fn apply_image(&mut self, descriptor: ImageDescriptor) {
        debug!(size = ?descriptor.natural_size, "Image replaced");

        self.descriptor = descriptor;
        self.placement = compute_placement(
            self.widget_bounds,
            descriptor.natural_size,
            self.handle_offset(),
        );
        self.viewport = ViewportState::fitted(&self.placement, descriptor.natural_size);
        self.pan_overshoot = Point::ZERO;
        self.frame = self.frame.map(|f| self.default_frame().with_visibility(f.is_visible(), f.is_animating()));
    }

    fn default_frame(&self) -> CropFrameState {
        CropFrameState::new(
            self.viewport.bounds_size(),
            self.config.min_frame_size,
            self.config.default_frame_fraction,
        )
    }

    fn apply_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if let Some(descriptor) = pending.image {
            self.apply_image(descriptor);
        }
        if let Some(bounds) = pending.bounds {
            self.widget_bounds = bounds;
        }
    }

    // ------------------------------------------------------------------
    // Crop frame transitions
    // ------------------------------------------------------------------

    /// Start showing the crop frame.
    ///
    /// The layout switches to the margined placement at once so the host can
    /// animate toward it; the frame becomes interactive on completion.
    /// Returns false, doing nothing, unless the frame is `Hidden`.
    pub fn show(&mut self, animated: bool) -> bool {
        let Some(next) = self.mode.next(Transition::Show) else {
            trace!(mode = %self.mode, "Ignoring show request");
            return false;
        };

        self.set_mode(next);
        self.layout();

        let overlay_bounds = self.viewport.bounds_size();
        let frame = match self.frame {
            Some(frame) => frame.with_overlay_bounds(overlay_bounds),
            None => self.default_frame(),
        };
        self.frame = Some(frame.with_visibility(false, true));
        self.notify_geometry();

        if !animated {
            self.complete_transition();
        }
        true
    }

    /// Start hiding the crop frame.
    ///
    /// The frame is taken down first; the layout drops the handle margin on
    /// completion. Returns false, doing nothing, unless the frame is `Active`.
    pub fn hide(&mut self, animated: bool) -> bool {
        let Some(next) = self.mode.next(Transition::Hide) else {
            trace!(mode = %self.mode, "Ignoring hide request");
            return false;
        };

        self.set_mode(next);
        self.frame = self.frame.map(|f| f.with_visibility(true, true));
        self.notify_crop_rect();

        if !animated {
            self.complete_transition();
        }
        true
    }

    /// Finish the transition in flight. Returns false when there is none.
    pub fn complete_transition(&mut self) -> bool {
        let Some(next) = self.mode.next(Transition::Complete) else {
            trace!(mode = %self.mode, "No transition to complete");
            return false;
        };

        let visible = next == CropFrameMode::Active;
        self.frame = self.frame.map(|f| f.with_visibility(visible, false));
        self.set_mode(next);

        self.apply_pending();
        self.layout();
        self.notify_geometry();
        true
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Apply a raw pinch factor, eased through [`pinch_zoom_factor`].
    pub fn on_pinch(&mut self, raw_scale: f64) {
        let before = self.viewport;
        self.viewport = before.apply_zoom_delta(pinch_zoom_factor(raw_scale));
        self.pan_overshoot = Point::ZERO;

        if self.viewport.zoom_scale() != before.zoom_scale() {
            self.emit(CropperEvent::ZoomChanged {
                zoom_scale: self.viewport.zoom_scale(),
            });
        }
        if self.viewport != before {
            self.notify_scroll();
        }
    }

    /// Apply a pan translation.
    ///
    /// Each step moves the current offset by `delta` and clamps it. Axes on
    /// which the content fits the viewport do not move. The part of the drag
    /// clamped away past an edge is accumulated for the gesture, and reset on
    /// an axis as soon as the content moves on it again. When the gesture
    /// ends with an overshoot, a [`CropperEvent::PanSettled`] tells the host
    /// to animate back to the clamped offset.
    pub fn on_pan(&mut self, delta: Point, ended: bool) -> PanStep {
        let delta = Point::new(
            if self.viewport.scrolls_horizontally() { finite_or_zero(delta.x) } else { 0.0 },
            if self.viewport.scrolls_vertically() { finite_or_zero(delta.y) } else { 0.0 },
        );

        let before = self.viewport.offset();
        let step = self.viewport.apply_pan_delta(delta);
        let after = step.state.offset();
        let clamped_away = step.requested - after;
        self.pan_overshoot = Point::new(
            accumulate_overshoot(self.pan_overshoot.x, clamped_away.x, after.x != before.x),
            accumulate_overshoot(self.pan_overshoot.y, clamped_away.y, after.y != before.y),
        );

        let moved = step.state != self.viewport;
        self.viewport = step.state;
        if moved {
            self.notify_scroll();
        }

        let gesture = PanStep {
            state: step.state,
            requested: after + self.pan_overshoot,
        };
        if ended {
            self.pan_overshoot = Point::ZERO;
            if gesture.overshoots() {
                debug!(from = ?gesture.requested, to = ?after, "Pan settled past edge");
                self.emit(CropperEvent::PanSettled {
                    from: gesture.requested,
                    to: after,
                });
            }
        }
        gesture
    }

    fn active_frame(&self, operation: &'static str) -> Result<CropFrameState> {
        match (self.mode, self.frame) {
            (CropFrameMode::Active, Some(frame)) => Ok(frame),
            _ => Err(CropError::InvalidState {
                operation,
                mode: self.mode,
            }),
        }
    }

    fn update_frame(&mut self, frame: CropFrameState) -> CropRects {
        let changed = self.frame != Some(frame);
        self.frame = Some(frame);
        if changed {
            self.notify_crop_rect();
        }
        self.current_crop_rect()
    }

    /// Drag a resize handle. Only legal while the frame is `Active`.
    pub fn on_frame_resize(&mut self, handle: Handle, delta: Point) -> Result<CropRects> {
        let frame = self.active_frame("resize crop frame")?;
        Ok(self.update_frame(frame.apply_handle_drag(handle, delta)))
    }

    /// Drag the whole frame. Only legal while the frame is `Active`.
    pub fn on_frame_move(&mut self, delta: Point) -> Result<CropRects> {
        let frame = self.active_frame("move crop frame")?;
        Ok(self.update_frame(frame.apply_move(delta)))
    }

    /// Programmatically place the crop frame, clamped like a drag.
    /// Only legal while the frame is `Active`.
    pub fn set_crop_rect(&mut self, rect: Rect) -> Result<CropRects> {
        let frame = self.active_frame("set crop rect")?;
        Ok(self.update_frame(frame.with_rect(rect)))
    }

    /// Handle under `point` (overlay coordinates), using the configured finger size.
    pub fn handle_at(&self, point: Point) -> Option<Handle> {
        let frame = self.active_frame("hit-test handles").ok()?;
        Handle::hit_test(&frame.rect(), point, self.config.finger_size)
    }

    /// Grid line positions for the active frame, when the grid is enabled.
    pub fn grid_lines(&self) -> Option<GridLines> {
        if !self.config.grid {
            return None;
        }
        let frame = self.active_frame("draw grid").ok()?;
        Some(frame.grid_lines(self.config.grid_lines))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The crop rectangle in overlay and natural-image coordinates.
    ///
    /// Uses the crop frame while it is `Active`, otherwise the whole visible
    /// viewport.
    pub fn current_crop_rect(&self) -> CropRects {
        match (self.mode, self.frame) {
            (CropFrameMode::Active, Some(frame)) => CropRects {
                overlay: frame.rect(),
                image: self.viewport.image_rect_from_viewport(Some(frame.rect())),
            },
            _ => CropRects {
                overlay: self.viewport.visible_rect(),
                image: self.viewport.image_rect_from_viewport(None),
            },
        }
    }

    pub fn crop_rect(&self) -> Rect {
        self.current_crop_rect().overlay
    }

    pub fn crop_image_rect(&self) -> Rect {
        self.current_crop_rect().image
    }

    /// Integer pixel box of the current crop, truncated toward zero and
    /// clamped to the image.
    pub fn crop_pixel_rect(&self) -> Result<PixelRect> {
        let size = self.descriptor.natural_size;
        clamp_to_source(self.crop_image_rect().to_pixel_rect(), size)
    }

    /// Cut the current crop out of `source`.
    ///
    /// The pixel box is clamped to the source's own size before extraction.
    pub fn extract_cropped_region<S: ImageSource>(&self, source: &S) -> Result<S::Output> {
        let rect = clamp_to_source(self.crop_image_rect().to_pixel_rect(), source.natural_size())?;
        debug!(%rect, "Extracting cropped region");
        source.extract(rect)
    }
}

fn clamp_to_source(rect: PixelRect, size: Size) -> Result<PixelRect> {
    let (width, height) = (size.width as u32, size.height as u32);
    rect.clamped_to(width, height).ok_or(CropError::OutOfBounds {
        rect,
        image_width: width,
        image_height: height,
    })
}

#[inline]
fn accumulate_overshoot(total: f64, step: f64, moved: bool) -> f64 {
    if moved {
        step
    } else {
        total + step
    }
}

#[inline]
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
