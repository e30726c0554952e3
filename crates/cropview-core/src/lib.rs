//! Cropview Core - Image cropper geometry and interaction engine
//!
//! This crate holds the platform-independent half of an interactive image
//! cropper: fitting an image into a widget, zoom and pan of the viewport, the
//! resizable crop frame, and the controller that ties them together and maps
//! the crop back into image pixels.
//!
//! Rendering, animation and gesture recognition stay with the host. The host
//! forwards layout passes and gesture deltas, then draws from the state the
//! controller exposes.

pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod image_source;
pub mod viewport;

pub use config::CropperConfig;
pub use controller::{
    pinch_zoom_factor, CropFrameMode, CropRects, CropperController, CropperEvent, EventKind,
    SubscriptionId,
};
pub use error::{CropError, Result};
pub use frame::{default_frame, CropFrameState, GridLines, Handle};
pub use geometry::{center_rect, fit_scale, inset, Point, Rect, Size};
pub use image_source::{DecodedImage, ImageDescriptor, ImageSource, PixelRect};
pub use viewport::{compute_placement, AspectPlacement, PanStep, ViewportState, MAX_ZOOM_SCALE};
