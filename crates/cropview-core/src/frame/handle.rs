//! The eight resize handles of the crop frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::{Point, Rect};

/// A resize handle: one of the four edges or four corners of the crop frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-right corner.
    NE,
    /// Top-left corner.
    NW,
    /// Bottom-right corner.
    SE,
    /// Bottom-left corner.
    SW,
}

impl Handle {
    /// Every handle, corners first so hit-testing prefers them over edges.
    pub const ALL: [Handle; 8] = [
        Handle::NW,
        Handle::NE,
        Handle::SW,
        Handle::SE,
        Handle::N,
        Handle::S,
        Handle::W,
        Handle::E,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Handle::W | Handle::NW | Handle::SW)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::E | Handle::NE | Handle::SE)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::N | Handle::NE | Handle::NW)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::S | Handle::SE | Handle::SW)
    }

    pub fn is_corner(self) -> bool {
        matches!(self, Handle::NE | Handle::NW | Handle::SE | Handle::SW)
    }

    /// Control point of this handle on `rect`: a corner, or an edge midpoint.
    pub fn anchor(self, rect: &Rect) -> Point {
        let x = if self.moves_left() {
            rect.min_x()
        } else if self.moves_right() {
            rect.max_x()
        } else {
            rect.center().x
        };
        let y = if self.moves_top() {
            rect.min_y()
        } else if self.moves_bottom() {
            rect.max_y()
        } else {
            rect.center().y
        };
        Point::new(x, y)
    }

    /// Handle under `point`, if any.
    ///
    /// Corners win within `finger_size / 2` of their anchor. Edges win
    /// anywhere along their length within the same tolerance.
    pub fn hit_test(rect: &Rect, point: Point, finger_size: f64) -> Option<Handle> {
        let reach = finger_size / 2.0;
        let near = |a: f64, b: f64| (a - b).abs() <= reach;

        let corner = Handle::ALL
            .iter()
            .copied()
            .filter(|h| h.is_corner())
            .find(|h| {
                let anchor = h.anchor(rect);
                near(point.x, anchor.x) && near(point.y, anchor.y)
            });
        if corner.is_some() {
            return corner;
        }

        let within_x = point.x >= rect.min_x() && point.x <= rect.max_x();
        let within_y = point.y >= rect.min_y() && point.y <= rect.max_y();

        if within_x && near(point.y, rect.min_y()) {
            Some(Handle::N)
        } else if within_x && near(point.y, rect.max_y()) {
            Some(Handle::S)
        } else if within_y && near(point.x, rect.min_x()) {
            Some(Handle::W)
        } else if within_y && near(point.x, rect.max_x()) {
            Some(Handle::E)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::NE => "ne",
            Handle::NW => "nw",
            Handle::SE => "se",
            Handle::SW => "sw",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handle {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .iter()
            .copied()
            .find(|h| h.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CropError::UnknownHandle(s.to_string()))
    }
}
