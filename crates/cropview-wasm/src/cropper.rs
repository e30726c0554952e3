//! WASM bindings for the interactive cropper.
//!
//! `JsImageCropper` owns a core `CropperController`. The host page feeds it
//! layout sizes and gesture deltas from its pointer handlers, draws from the
//! rectangles it exposes, and calls `complete_transition` when its show/hide
//! animation finishes.

use crate::types::{JsDecodedImage, JsRect};
use cropview_core::{
    CropError, CropperConfig, CropperController, CropperEvent, EventKind, Handle, ImageDescriptor,
    Point, Rect, Size, SubscriptionId,
};
use wasm_bindgen::prelude::*;

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Interactive image cropper.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const cropper = new JsImageCropper(el.clientWidth, el.clientHeight, image.width, image.height);
/// cropper.subscribe('crop_rect_changed', (e) => redraw(e.overlay));
/// cropper.show(false);
/// cropper.on_frame_resize('se', dx, dy);
/// const cropped = cropper.cropped_image(image);
/// ```
#[wasm_bindgen]
pub struct JsImageCropper {
    inner: CropperController,
    subscriptions: Vec<SubscriptionId>,
}

#[wasm_bindgen]
impl JsImageCropper {
    /// Create a cropper with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        image_width: f64,
        image_height: f64,
    ) -> Result<JsImageCropper, JsValue> {
        Self::build(width, height, image_width, image_height, CropperConfig::default())
    }

    /// Create a cropper from a configuration object, e.g.
    /// `{ finger_size: 44, grid_lines: 4 }`. Missing fields take their defaults.
    pub fn with_config(
        width: f64,
        height: f64,
        image_width: f64,
        image_height: f64,
        config: JsValue,
    ) -> Result<JsImageCropper, JsValue> {
        let config: CropperConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))?;
        config.validate().map_err(to_js_error)?;
        Self::build(width, height, image_width, image_height, config)
    }

    /// Create a cropper from a TOML configuration document.
    pub fn with_toml_config(
        width: f64,
        height: f64,
        image_width: f64,
        image_height: f64,
        source: &str,
    ) -> Result<JsImageCropper, JsValue> {
        let config = CropperConfig::from_toml_str(source).map_err(to_js_error)?;
        Self::build(width, height, image_width, image_height, config)
    }

    /// Feed the widget size from a layout pass.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.inner.set_bounds(Size::new(width, height));
    }

    /// Recompute layout for the current size, e.g. after a rotation.
    pub fn refresh(&mut self) -> bool {
        self.inner.refresh()
    }

    /// Replace the image, resetting zoom, pan and the crop frame.
    pub fn set_image(&mut self, image_width: f64, image_height: f64) -> Result<(), JsValue> {
        self.inner
            .set_image(ImageDescriptor::new(Size::new(image_width, image_height)))
            .map_err(to_js_error)
    }

    pub fn show(&mut self, animated: bool) -> bool {
        self.inner.show(animated)
    }

    pub fn hide(&mut self, animated: bool) -> bool {
        self.inner.hide(animated)
    }

    /// Call when the host's show or hide animation has finished.
    pub fn complete_transition(&mut self) -> bool {
        self.inner.complete_transition()
    }

    /// Current crop-frame mode: "hidden", "showing", "active" or "hiding".
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.inner.mode().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn zoom_scale(&self) -> f64 {
        self.inner.viewport().zoom_scale()
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.viewport().offset().x
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.viewport().offset().y
    }

    /// Rectangle the image (plus handle margin) occupies in the widget.
    pub fn aspect_rect(&self) -> JsRect {
        self.inner.placement().aspect_rect.into()
    }

    /// Viewport rectangle inside the aspect rectangle.
    pub fn scroll_rect(&self) -> JsRect {
        self.inner.placement().scroll_rect.into()
    }

    pub fn on_pinch(&mut self, scale: f64) {
        self.inner.on_pinch(scale);
    }

    /// Pan by a translation delta. Returns true when the gesture has been
    /// dragged past the content edge and should bounce back.
    pub fn on_pan(&mut self, dx: f64, dy: f64, ended: bool) -> bool {
        self.inner.on_pan(Point::new(dx, dy), ended).overshoots()
    }

    /// Drag a crop-frame handle ("n", "se", ...). Returns the new crop rect.
    pub fn on_frame_resize(&mut self, handle: &str, dx: f64, dy: f64) -> Result<JsRect, JsValue> {
        let handle: Handle = handle.parse().map_err(to_js_error)?;
        self.inner
            .on_frame_resize(handle, Point::new(dx, dy))
            .map(|rects| rects.overlay.into())
            .map_err(to_js_error)
    }

    pub fn on_frame_move(&mut self, dx: f64, dy: f64) -> Result<JsRect, JsValue> {
        self.inner
            .on_frame_move(Point::new(dx, dy))
            .map(|rects| rects.overlay.into())
            .map_err(to_js_error)
    }

    pub fn set_crop_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<JsRect, JsValue> {
        self.inner
            .set_crop_rect(Rect::new(x, y, width, height))
            .map(|rects| rects.overlay.into())
            .map_err(to_js_error)
    }

    /// Handle under an overlay-local point, if any.
    pub fn handle_at(&self, x: f64, y: f64) -> Option<String> {
        self.inner
            .handle_at(Point::new(x, y))
            .map(|h| h.as_str().to_string())
    }

    /// Crop rectangle in overlay coordinates.
    pub fn crop_rect(&self) -> JsRect {
        self.inner.crop_rect().into()
    }

    /// Crop rectangle in natural-image pixels.
    pub fn crop_image_rect(&self) -> JsRect {
        self.inner.crop_image_rect().into()
    }

    /// Both crop rectangles as `{ overlay, image }`.
    pub fn crop_rects(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.current_crop_rect())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Grid line positions as `{ vertical, horizontal }`, or `null` when no
    /// grid is drawn.
    pub fn grid_lines(&self) -> Result<JsValue, JsValue> {
        match self.inner.grid_lines() {
            Some(grid) => {
                serde_wasm_bindgen::to_value(&grid).map_err(|e| JsValue::from_str(&e.to_string()))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Cut the current crop out of `image`.
    pub fn cropped_image(&self, image: &JsDecodedImage) -> Result<JsDecodedImage, JsValue> {
        self.inner
            .extract_cropped_region(&image.to_decoded())
            .map(JsDecodedImage::from_decoded)
            .map_err(to_js_error)
    }

    /// Call `callback` with every event of `kind` ("scroll_changed",
    /// "zoom_changed", "crop_rect_changed", "pan_settled", "mode_changed").
    /// Returns an id for `unsubscribe`.
    pub fn subscribe(&mut self, kind: &str, callback: js_sys::Function) -> Result<u64, JsValue> {
        let kind: EventKind = kind.parse().map_err(to_js_error)?;
        let id = self
            .inner
            .subscribe(kind, move |event| deliver(&callback, event));
        self.subscriptions.push(id);
        Ok(id.get())
    }

    pub fn unsubscribe(&mut self, id: u64) -> bool {
        let Some(index) = self.subscriptions.iter().position(|s| s.get() == id) else {
            return false;
        };
        let subscription = self.subscriptions.swap_remove(index);
        self.inner.unsubscribe(subscription)
    }
}

impl JsImageCropper {
    fn build(
        width: f64,
        height: f64,
        image_width: f64,
        image_height: f64,
        config: CropperConfig,
    ) -> Result<JsImageCropper, JsValue> {
        let inner = CropperController::new(
            ImageDescriptor::new(Size::new(image_width, image_height)),
            Size::new(width, height),
            config,
        )
        .map_err(to_js_error)?;
        Ok(Self {
            inner,
            subscriptions: Vec::new(),
        })
    }
}

/// Forward an event to a JS callback. Failures are logged to the console
/// rather than unwinding through the controller.
fn deliver(callback: &js_sys::Function, event: &CropperEvent) {
    let result = serde_wasm_bindgen::to_value(event)
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(|value| callback.call1(&JsValue::NULL, &value));
    if let Err(err) = result {
        web_sys::console::warn_1(&err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> JsDecodedImage {
        let pixels: Vec<u8> = (0..(width * height * 3) as usize)
            .map(|i| (i % 256) as u8)
            .collect();
        JsDecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_new_fits_image() {
        let cropper = JsImageCropper::new(200.0, 200.0, 400.0, 300.0).unwrap();
        assert_eq!(cropper.mode(), "hidden");
        assert_eq!(cropper.zoom_scale(), 0.5);

        let aspect = cropper.aspect_rect();
        assert_eq!((aspect.x(), aspect.y()), (0.0, 25.0));
        assert_eq!((aspect.width(), aspect.height()), (200.0, 150.0));

        let image = cropper.crop_image_rect();
        assert_eq!((image.width(), image.height()), (400.0, 300.0));
    }

    #[test]
    fn test_show_and_hide() {
        let mut cropper = JsImageCropper::new(200.0, 200.0, 400.0, 300.0).unwrap();
        assert!(cropper.show(true));
        assert_eq!(cropper.mode(), "showing");
        assert!(cropper.complete_transition());
        assert_eq!(cropper.mode(), "active");

        assert!(cropper.hide(false));
        assert_eq!(cropper.mode(), "hidden");
    }

    #[test]
    fn test_frame_editing() {
        let mut cropper = JsImageCropper::new(430.0, 430.0, 400.0, 400.0).unwrap();
        cropper.show(false);

        let r = cropper.set_crop_rect(100.0, 100.0, 100.0, 100.0).unwrap();
        assert_eq!((r.x(), r.y(), r.width(), r.height()), (100.0, 100.0, 100.0, 100.0));

        let r = cropper.on_frame_resize("se", 20.0, 10.0).unwrap();
        assert_eq!((r.width(), r.height()), (120.0, 110.0));

        let r = cropper.on_frame_move(-150.0, 0.0).unwrap();
        assert_eq!(r.x(), 0.0);
        assert_eq!(cropper.crop_rect(), r);

        assert_eq!(cropper.handle_at(0.0, 100.0).as_deref(), Some("nw"));
        assert_eq!(cropper.handle_at(60.0, 150.0), None);
    }

    #[test]
    fn test_cropped_image() {
        let mut cropper = JsImageCropper::new(430.0, 430.0, 400.0, 400.0).unwrap();
        cropper.show(false);
        cropper.set_crop_rect(10.0, 20.0, 100.0, 80.0).unwrap();

        let out = cropper.cropped_image(&test_image(400, 400)).unwrap();
        assert_eq!(out.width(), 100);
        assert_eq!(out.height(), 80);
        assert_eq!(out.byte_length(), 100 * 80 * 3);
    }

    #[test]
    fn test_pan_overshoot() {
        let mut cropper = JsImageCropper::new(200.0, 200.0, 400.0, 300.0).unwrap();
        for _ in 0..40 {
            cropper.on_pinch(2.0);
        }
        assert_eq!(cropper.zoom_scale(), 1.0);

        assert!(!cropper.on_pan(-50.0, -20.0, false));
        assert_eq!((cropper.offset_x(), cropper.offset_y()), (50.0, 20.0));
        assert!(cropper.on_pan(100.0, 0.0, true));
        assert_eq!(cropper.offset_x(), 0.0);
    }

    #[test]
    fn test_toml_config() {
        let cropper =
            JsImageCropper::with_toml_config(200.0, 200.0, 100.0, 100.0, "show_crop_frame = true")
                .unwrap();
        assert_eq!(cropper.mode(), "active");
    }

    #[test]
    fn test_set_bounds_and_image() {
        let mut cropper = JsImageCropper::new(200.0, 200.0, 400.0, 300.0).unwrap();
        cropper.set_bounds(400.0, 400.0);
        assert_eq!(cropper.zoom_scale(), 1.0);
        assert!(!cropper.refresh());

        cropper.set_image(800.0, 400.0).unwrap();
        assert_eq!(cropper.zoom_scale(), 0.5);
    }

    #[test]
    fn test_unsubscribe_unknown_id() {
        let mut cropper = JsImageCropper::new(200.0, 200.0, 400.0, 300.0).unwrap();
        assert!(!cropper.unsubscribe(7));
    }
}

/// WASM-specific tests that require JsValue.
///
/// Error paths and callbacks build `JsValue`s, which only work on wasm32
/// targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestConfig {
        finger_size: f64,
        grid_lines: u8,
    }

    #[wasm_bindgen_test]
    fn test_with_config_object() {
        let config = serde_wasm_bindgen::to_value(&TestConfig {
            finger_size: 40.0,
            grid_lines: 4,
        })
        .unwrap();
        let mut cropper = JsImageCropper::with_config(200.0, 200.0, 100.0, 100.0, config).unwrap();
        cropper.show(false);
        assert!(!cropper.grid_lines().unwrap().is_null());
    }

    #[wasm_bindgen_test]
    fn test_invalid_inputs() {
        assert!(JsImageCropper::new(200.0, 200.0, 0.0, 100.0).is_err());

        let invalid = serde_wasm_bindgen::to_value(&"not a config").unwrap();
        assert!(JsImageCropper::with_config(200.0, 200.0, 100.0, 100.0, invalid).is_err());

        let mut cropper = JsImageCropper::new(200.0, 200.0, 100.0, 100.0).unwrap();
        assert!(cropper.set_crop_rect(0.0, 0.0, 80.0, 80.0).is_err());
        cropper.show(false);
        assert!(cropper.on_frame_resize("middle", 1.0, 1.0).is_err());
        assert!(cropper.subscribe("resize", js_sys::Function::new_no_args("")).is_err());
    }

    #[wasm_bindgen_test]
    fn test_subscribe_receives_events() {
        let mut cropper = JsImageCropper::new(200.0, 200.0, 100.0, 100.0).unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| {
            counter.set(counter.get() + 1);
        });
        let callback: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();

        let id = cropper.subscribe("mode_changed", callback).unwrap();
        cropper.show(false);
        assert_eq!(calls.get(), 2);

        assert!(cropper.unsubscribe(id));
        cropper.hide(false);
        assert_eq!(calls.get(), 2);
        drop(closure);
    }

    #[wasm_bindgen_test]
    fn test_crop_rects_object() {
        let cropper = JsImageCropper::new(200.0, 200.0, 100.0, 100.0).unwrap();
        let rects = cropper.crop_rects().unwrap();
        assert!(rects.is_object());
        assert!(cropper.grid_lines().unwrap().is_null());
    }
}
