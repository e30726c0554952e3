//! Cropper configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};
use crate::geometry::Size;

/// Tunable behaviour of the cropper.
///
/// Every field has a default, so partial documents deserialize:
///
/// ```toml
/// finger_size = 44.0
/// grid_lines = 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Touch size of a handle, in points. Half of it is reserved as margin
    /// around the viewport while the crop frame is shown.
    pub finger_size: f64,
    /// Whether the host draws a grid inside the crop frame.
    pub grid: bool,
    /// Number of grid cells per side.
    pub grid_lines: u8,
    /// Smallest crop frame the handles can produce.
    pub min_frame_size: Size,
    /// Initial crop frame size as a fraction of the overlay (0, 1].
    pub default_frame_fraction: f64,
    /// Duration of show/hide transitions in seconds. The host runs the animation.
    pub transition_duration: f64,
    /// Enter `Active` at construction, without animation.
    pub show_crop_frame: bool,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            finger_size: 30.0,
            grid: true,
            grid_lines: 3,
            min_frame_size: Size::new(60.0, 60.0),
            default_frame_fraction: 1.0,
            transition_duration: 0.3,
            show_crop_frame: false,
        }
    }
}

impl CropperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Margin kept around the viewport for handles while the frame is shown.
    pub fn handle_offset(&self) -> f64 {
        self.finger_size / 2.0
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: CropperConfig =
            toml::from_str(source).map_err(|e| CropError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !non_negative(self.finger_size) {
            return Err(CropError::InvalidConfig(format!(
                "finger_size must be a non-negative number, got {}",
                self.finger_size
            )));
        }
        if !non_negative(self.min_frame_size.width) || !non_negative(self.min_frame_size.height) {
            return Err(CropError::InvalidConfig(format!(
                "min_frame_size must be non-negative, got {}x{}",
                self.min_frame_size.width, self.min_frame_size.height
            )));
        }
        if !(self.default_frame_fraction > 0.0 && self.default_frame_fraction <= 1.0) {
            return Err(CropError::InvalidConfig(format!(
                "default_frame_fraction must be in (0, 1], got {}",
                self.default_frame_fraction
            )));
        }
        if !non_negative(self.transition_duration) {
            return Err(CropError::InvalidConfig(format!(
                "transition_duration must be non-negative, got {}",
                self.transition_duration
            )));
        }
        if self.grid && self.grid_lines == 0 {
            return Err(CropError::InvalidConfig(
                "grid_lines must be at least 1 when the grid is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
