//! Recorded frame data.
//!
//! A [`Frame`] is an **owned**, immutable view of every connected device at one
//! point in time. It is the unit of both recording and replay, and it is what
//! the structured export serializes verbatim.
//!
//! # Semantics
//! - `Frame::t` is milliseconds since the capture started (`0.0` for frames
//!   taken outside a recording, such as snapshots).
//! - `Frame::pads` lists devices in slot order. Empty slots are skipped, never
//!   represented as nulls.
//! - Values are already rounded by the sampler; nothing here mutates them.
//!
//! # Examples
//! ```
//! use ghostpad::snapshot::{ButtonSnapshot, DeviceSnapshot, Frame};
//!
//! let frame = Frame {
//!     t: 16.7,
//!     pads: vec![DeviceSnapshot {
//!         index: 0,
//!         id: "Pad".into(),
//!         buttons: vec![ButtonSnapshot { pressed: true, value: 1.0 }],
//!         axes: vec![0.25, -1.0],
//!         mapping: "standard".into(),
//!     }],
//! };
//! assert_eq!(frame.pad(0).map(|p| p.axes[1]), Some(-1.0));
//! assert_eq!(frame.pressed_count(), 1);
//! ```

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One button channel inside a [`DeviceSnapshot`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonSnapshot {
    pub pressed: bool,
    pub value: f32,
}

/// State of a single device inside a [`Frame`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub index: u32,
    pub id: String,
    pub buttons: Vec<ButtonSnapshot>,
    pub axes: Vec<f32>,
    pub mapping: String,
}

impl DeviceSnapshot {
    #[inline]
    pub fn axis(&self, idx: usize) -> f32 {
        self.axes.get(idx).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn button_value(&self, idx: usize) -> f32 {
        self.buttons.get(idx).map(|b| b.value).unwrap_or(0.0)
    }

    pub fn pressed_count(&self) -> usize {
        self.buttons.iter().filter(|b| b.pressed).count()
    }
}

/// All device states at time `t` (milliseconds since capture start).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub t: f64,
    pub pads: Vec<DeviceSnapshot>,
}

impl Frame {
    /// Look up a pad by its slot index.
    pub fn pad(&self, index: u32) -> Option<&DeviceSnapshot> {
        self.pads.iter().find(|p| p.index == index)
    }

    /// Total pressed buttons across all pads.
    pub fn pressed_count(&self) -> usize {
        self.pads.iter().map(DeviceSnapshot::pressed_count).sum()
    }

    /// Total axis channels across all pads.
    pub fn axis_count(&self) -> usize {
        self.pads.iter().map(|p| p.axes.len()).sum()
    }
}

/// Summary card produced by the "snapshot" action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub taken_at: DateTime<Local>,
    pub pads: usize,
    pub pressed: usize,
    pub axes: usize,
}

impl SnapshotSummary {
    pub fn from_frame(frame: &Frame, taken_at: DateTime<Local>) -> Self {
        Self {
            taken_at,
            pads: frame.pads.len(),
            pressed: frame.pressed_count(),
            axes: frame.axis_count(),
        }
    }
}

impl fmt::Display for SnapshotSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pad(s); {} pressed buttons; axes: {} ({})",
            self.pads,
            self.pressed,
            self.axes,
            self.taken_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
