//! Crop-frame visibility state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Visibility of the crop frame.
///
/// ```text
/// Hidden --show--> Showing --complete--> Active --hide--> Hiding --complete--> Hidden
/// ```
///
/// Any other input is rejected, so at most one transition is ever in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropFrameMode {
    #[default]
    Hidden,
    Showing,
    Active,
    Hiding,
}

/// Input to the crop-frame state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Show,
    Hide,
    /// The host finished animating the current transition.
    Complete,
}

impl CropFrameMode {
    /// Transition table. `None` means the input is ignored in this mode.
    pub fn next(self, transition: Transition) -> Option<CropFrameMode> {
        use CropFrameMode::*;

        match (self, transition) {
            (Hidden, Transition::Show) => Some(Showing),
            (Showing, Transition::Complete) => Some(Active),
            (Active, Transition::Hide) => Some(Hiding),
            (Hiding, Transition::Complete) => Some(Hidden),
            _ => None,
        }
    }

    /// True while a show or hide transition is in flight.
    pub fn is_transitioning(self) -> bool {
        matches!(self, CropFrameMode::Showing | CropFrameMode::Hiding)
    }

    /// True when the layout keeps a margin around the viewport for handles.
    pub fn reserves_handle_margin(self) -> bool {
        matches!(self, CropFrameMode::Showing | CropFrameMode::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CropFrameMode::Hidden => "hidden",
            CropFrameMode::Showing => "showing",
            CropFrameMode::Active => "active",
            CropFrameMode::Hiding => "hiding",
        }
    }
}

impl fmt::Display for CropFrameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
