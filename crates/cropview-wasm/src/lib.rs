//! Cropview WASM - WebAssembly bindings for the cropview image cropper
//!
//! This crate exposes `cropview-core` to JavaScript/TypeScript hosts.
//!
//! # Module Structure
//!
//! - `cropper` - The interactive cropper (`JsImageCropper`)
//! - `types` - WASM-compatible wrapper types for image data and rectangles
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsImageCropper, JsDecodedImage } from '@cropview/wasm';
//!
//! await init();
//!
//! const cropper = new JsImageCropper(320, 480, image.width, image.height);
//! cropper.show(false);
//! const rect = cropper.crop_image_rect();
//! console.log(`Cropping ${rect.width}x${rect.height} at ${rect.x},${rect.y}`);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod types;

pub use cropper::JsImageCropper;
pub use types::{JsDecodedImage, JsRect};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
