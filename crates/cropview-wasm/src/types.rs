//! WASM-compatible wrapper types for image data and rectangles.
//!
//! These wrap the core cropview types and handle the conversion between Rust
//! and JavaScript data representations.

use cropview_core::{DecodedImage, Rect};
use wasm_bindgen::prelude::*;

/// A decoded RGB image for JavaScript.
///
/// The pixel data lives in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`, so keep the image on the WASM side until you need to draw it.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an image from dimensions and RGB pixel data
    /// (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array. This copies the buffer.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer releases the memory otherwise.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core image. Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// An axis-aligned rectangle for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl JsRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl From<Rect> for JsRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.origin.x,
            y: rect.origin.y,
            width: rect.size.width,
            height: rect.size.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_decoded_round_trip() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8];
        let js_img = JsDecodedImage::from_decoded(DecodedImage::new(2, 1, pixels.clone()));
        let decoded = js_img.to_decoded();
        assert_eq!((decoded.width, decoded.height), (2, 1));
        assert_eq!(decoded.pixels, pixels);
        assert_eq!(js_img.pixels(), pixels);
    }

    #[test]
    fn test_js_rect_from_rect() {
        let r = JsRect::from(Rect::new(1.5, 2.0, 30.0, 40.25));
        assert_eq!(r.x(), 1.5);
        assert_eq!(r.y(), 2.0);
        assert_eq!(r.width(), 30.0);
        assert_eq!(r.height(), 40.25);
    }
}
