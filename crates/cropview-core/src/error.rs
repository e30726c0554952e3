//! Error types for the cropper engine.
//!
//! Geometry never fails: gestures are clamped to the nearest valid state.
//! Only image loading, pixel extraction, host input parsing and mode-gated
//! crop-frame edits can return an error.

use thiserror::Error;

use crate::controller::CropFrameMode;
use crate::image_source::PixelRect;

/// Errors returned by the cropper engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// The supplied image has no area.
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidImage { width: f64, height: f64 },

    /// The extraction rectangle is empty or lies outside the source image.
    #[error("Crop region ({rect}) is outside the {image_width}x{image_height} image")]
    OutOfBounds {
        rect: PixelRect,
        image_width: u32,
        image_height: u32,
    },

    /// A crop-frame operation was requested while the frame is not interactive.
    #[error("Cannot {operation} while crop frame is {mode}")]
    InvalidState {
        operation: &'static str,
        mode: CropFrameMode,
    },

    /// A packed pixel buffer is shorter than its dimensions require.
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    PixelBufferSize { expected: usize, actual: usize },

    /// A host passed a handle name that does not name one of the eight handles.
    #[error("Unknown crop frame handle: {0}")]
    UnknownHandle(String),

    /// A host passed an event name that does not name a cropper event.
    #[error("Unknown cropper event: {0}")]
    UnknownEvent(String),

    /// Configuration failed to parse or validate.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CropError::InvalidImage {
            width: 0.0,
            height: 300.0,
        };
        assert_eq!(err.to_string(), "Invalid image dimensions: 0x300");

        let err = CropError::InvalidState {
            operation: "resize crop frame",
            mode: CropFrameMode::Hidden,
        };
        assert_eq!(
            err.to_string(),
            "Cannot resize crop frame while crop frame is hidden"
        );

        let err = CropError::OutOfBounds {
            rect: PixelRect::new(10, 20, 0, 5),
            image_width: 100,
            image_height: 50,
        };
        assert_eq!(
            err.to_string(),
            "Crop region (10,20 0x5) is outside the 100x50 image"
        );

        let err = CropError::PixelBufferSize {
            expected: 300,
            actual: 30,
        };
        assert_eq!(err.to_string(), "Pixel buffer holds 30 bytes, expected 300");
    }
}
