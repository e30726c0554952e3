//! Change notifications and the observer registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::{Point, Rect};

use super::CropFrameMode;

/// The crop rectangle in overlay-local and natural-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRects {
    /// Crop rectangle in overlay coordinates, or the visible content rect
    /// when the crop frame is not active.
    pub overlay: Rect,
    /// The same region in natural-image pixels (fractional).
    pub image: Rect,
}

/// A change notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CropperEvent {
    /// The content offset changed.
    ScrollChanged { offset: Point },
    /// The zoom scale changed.
    ZoomChanged { zoom_scale: f64 },
    /// The crop rectangle changed in either coordinate space.
    CropRectChanged(CropRects),
    /// A pan ended past the valid range; the host should animate the content
    /// from `from` back to `to`.
    PanSettled { from: Point, to: Point },
    /// The crop frame entered a new mode.
    ModeChanged { mode: CropFrameMode },
}

/// Event categories that can be subscribed to independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ScrollChanged,
    ZoomChanged,
    CropRectChanged,
    PanSettled,
    ModeChanged,
}

impl CropperEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CropperEvent::ScrollChanged { .. } => EventKind::ScrollChanged,
            CropperEvent::ZoomChanged { .. } => EventKind::ZoomChanged,
            CropperEvent::CropRectChanged(_) => EventKind::CropRectChanged,
            CropperEvent::PanSettled { .. } => EventKind::PanSettled,
            CropperEvent::ModeChanged { .. } => EventKind::ModeChanged,
        }
    }
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::ScrollChanged,
        EventKind::ZoomChanged,
        EventKind::CropRectChanged,
        EventKind::PanSettled,
        EventKind::ModeChanged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ScrollChanged => "scroll_changed",
            EventKind::ZoomChanged => "zoom_changed",
            EventKind::CropRectChanged => "crop_rect_changed",
            EventKind::PanSettled => "pan_settled",
            EventKind::ModeChanged => "mode_changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| CropError::UnknownEvent(s.to_string()))
    }
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

type Callback = Box<dyn FnMut(&CropperEvent)>;

/// Registered listeners, each bound to one event kind.
///
/// An event with no listener for its kind is simply dropped.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, EventKind, Callback)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, callback: impl FnMut(&CropperEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, kind, Box::new(callback)));
        id
    }

    /// Remove a listener. Returns false when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Deliver `event` to every listener of its kind, in subscription order.
    pub fn emit(&mut self, event: &CropperEvent) {
        let kind = event.kind();
        for (_, entry_kind, callback) in self.entries.iter_mut() {
            if *entry_kind == kind {
                callback(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.entries.len())
            .finish()
    }
}
