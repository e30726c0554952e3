//! Image provider boundary: natural size plus integer-rect pixel extraction.
//!
//! The engine never touches pixels itself. It truncates the fractional crop
//! rectangle to a [`PixelRect`], clamps it to the source and hands it to an
//! [`ImageSource`]. Extraction is a pure function of its inputs and may be
//! run on a background thread by the host.
//!
//! # Rounding
//!
//! Fractional coordinates are truncated toward zero (floor for the
//! non-negative values the viewport produces). This is a deliberately lossy
//! step: a crop of `(10.9, 0.2) 50.7x30.99` extracts `(10, 0) 50x30`.
//! Values within float noise of an integer snap to it first, so the fitted
//! viewport maps back to exactly the natural size.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};
use crate::geometry::{Rect, Size};

/// Integer pixel rectangle in natural-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect with a `width`x`height` image, or `None` when nothing of the
    /// rectangle remains inside it.
    pub fn clamped_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let clamped = PixelRect {
            x: self.x,
            y: self.y,
            width: self.width.min(width - self.x),
            height: self.height.min(height - self.y),
        };
        (!clamped.is_empty()).then_some(clamped)
    }

    /// True when the rectangle has area and lies fully inside a
    /// `width`x`height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty()
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Relative distance from an integer below which a value counts as that integer.
const PIXEL_SNAP_EPSILON: f64 = 1e-9;

/// Truncate toward zero, treating values within float noise of an integer as
/// that integer (`1999.9999999999998` is 2000, not 1999).
fn truncate_pixel(value: f64) -> u32 {
    let nearest = value.round();
    if (value - nearest).abs() <= PIXEL_SNAP_EPSILON * value.abs().max(1.0) {
        nearest as u32
    } else {
        value as u32
    }
}

impl Rect {
    /// Truncate each component toward zero. Negative values saturate at 0.
    pub fn to_pixel_rect(&self) -> PixelRect {
        PixelRect {
            x: truncate_pixel(self.origin.x),
            y: truncate_pixel(self.origin.y),
            width: truncate_pixel(self.size.width),
            height: truncate_pixel(self.size.height),
        }
    }
}

/// Size of the image currently loaded in the cropper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub natural_size: Size,
}

impl ImageDescriptor {
    pub fn new(natural_size: Size) -> Self {
        Self { natural_size }
    }

    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::new(Size::new(f64::from(width), f64::from(height)))
    }

    /// Describe an image provider.
    pub fn of<S: ImageSource + ?Sized>(source: &S) -> Self {
        Self::new(source.natural_size())
    }

    /// Fails with [`CropError::InvalidImage`] when the image has no area.
    pub fn validate(&self) -> Result<()> {
        if self.natural_size.is_empty() {
            return Err(CropError::InvalidImage {
                width: self.natural_size.width,
                height: self.natural_size.height,
            });
        }
        Ok(())
    }
}

/// A source image the cropper can measure and cut.
pub trait ImageSource {
    /// Image type produced by extraction.
    type Output;

    /// Size of the unscaled image in pixels.
    fn natural_size(&self) -> Size;

    /// Copy the pixels inside `rect`.
    ///
    /// Fails with [`CropError::OutOfBounds`] when `rect` is empty or does not
    /// lie fully inside the image; callers clamp before calling.
    fn extract(&self, rect: PixelRect) -> Result<Self::Output>;
}

fn out_of_bounds(rect: PixelRect, image_width: u32, image_height: u32) -> CropError {
    CropError::OutOfBounds {
        rect,
        image_width,
        image_height,
    }
}

/// Bytes in a packed RGB buffer of `width`x`height`.
fn rgb_buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// An image with packed RGB pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            rgb_buffer_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

impl ImageSource for DecodedImage {
    type Output = DecodedImage;

    fn natural_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    fn extract(&self, rect: PixelRect) -> Result<DecodedImage> {
        if !rect.fits_within(self.width, self.height) {
            return Err(out_of_bounds(rect, self.width, self.height));
        }
        let expected = rgb_buffer_len(self.width, self.height);
        if self.pixels.len() < expected {
            return Err(CropError::PixelBufferSize {
                expected,
                actual: self.pixels.len(),
            });
        }

        let src_stride = self.width as usize * 3;
        let row_bytes = rect.width as usize * 3;
        let col_offset = rect.x as usize * 3;
        let mut output = Vec::with_capacity(row_bytes * rect.height as usize);

        // Copy pixel data row by row
        for row in 0..rect.height as usize {
            let start = (rect.y as usize + row) * src_stride + col_offset;
            output.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }

        Ok(DecodedImage {
            width: rect.width,
            height: rect.height,
            pixels: output,
        })
    }
}

impl ImageSource for image::RgbImage {
    type Output = image::RgbImage;

    fn natural_size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    fn extract(&self, rect: PixelRect) -> Result<image::RgbImage> {
        if !rect.fits_within(self.width(), self.height()) {
            return Err(out_of_bounds(rect, self.width(), self.height()));
        }
        Ok(image::imageops::crop_imm(self, rect.x, rect.y, rect.width, rect.height).to_image())
    }
}

impl ImageSource for image::DynamicImage {
    type Output = image::DynamicImage;

    fn natural_size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    fn extract(&self, rect: PixelRect) -> Result<image::DynamicImage> {
        if !rect.fits_within(self.width(), self.height()) {
            return Err(out_of_bounds(rect, self.width(), self.height()));
        }
        Ok(self.crop_imm(rect.x, rect.y, rect.width, rect.height))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Clamped rectangles are always extractable.
        #[test]
        fn prop_clamped_rect_extracts(
            (width, height) in (1u32..=64, 1u32..=64),
            (x, y, w, h) in (0u32..=80, 0u32..=80, 0u32..=80, 0u32..=80),
        ) {
            let img = DecodedImage::new(width, height, vec![7u8; (width * height * 3) as usize]);
            match PixelRect::new(x, y, w, h).clamped_to(width, height) {
                Some(rect) => {
                    let out = img.extract(rect).unwrap();
                    prop_assert_eq!(out.width, rect.width);
                    prop_assert_eq!(out.height, rect.height);
                    prop_assert_eq!(out.pixels.len(), (rect.width * rect.height * 3) as usize);
                }
                None => prop_assert!(x >= width || y >= height || w == 0 || h == 0),
            }
        }

        /// Property: Truncation never grows a rectangle.
        #[test]
        fn prop_truncation_never_grows(
            (x, y, w, h) in (0.0f64..=5000.0, 0.0f64..=5000.0, 0.0f64..=5000.0, 0.0f64..=5000.0),
        ) {
            let p = Rect::new(x, y, w, h).to_pixel_rect();
            // Snapping may round up by at most float noise
            let noise = 1e-6;
            prop_assert!(f64::from(p.x) <= x + noise && f64::from(p.y) <= y + noise);
            prop_assert!(f64::from(p.width) <= w + noise && f64::from(p.height) <= h + noise);
            prop_assert!(x - f64::from(p.x) < 1.0 && w - f64::from(p.width) < 1.0);
        }
    }
}
