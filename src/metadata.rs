//! Per-pad metadata kept by the registry.
//!
//! [`PadMeta`] is a lightweight, cloneable description of a pad suitable for
//! UI headers and logging. It is built either from a live [`RawPad`] (connect
//! event or first poll) or from a recorded [`DeviceSnapshot`] when a replay
//! references a pad that is not currently attached.
//!
//! # Conventions
//! - `index` is the slot index; it identifies the pad for its connection lifetime.
//! - `mapping` is `"none"` when the source did not report one.
//! - Channel counts describe the pad as first observed; later frames with more
//!   or fewer channels do not update them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::RawPad;
use crate::sampler::NO_MAPPING;
use crate::snapshot::DeviceSnapshot;

/// Snapshot of metadata describing a single pad.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadMeta {
    pub index: u32,
    pub id: String,
    pub mapping: String,
    pub button_count: usize,
    pub axis_count: usize,
}

impl PadMeta {
    /// Metadata for a pad whose state was recorded earlier.
    pub fn from_snapshot(pad: &DeviceSnapshot) -> Self {
        Self {
            index: pad.index,
            id: pad.id.clone(),
            mapping: mapping_or_none(&pad.mapping),
            button_count: pad.buttons.len(),
            axis_count: pad.axes.len(),
        }
    }
}

impl From<&RawPad> for PadMeta {
    fn from(pad: &RawPad) -> Self {
        Self {
            index: pad.index,
            id: pad.id.clone(),
            mapping: mapping_or_none(&pad.mapping),
            button_count: pad.buttons.len(),
            axis_count: pad.axes.len(),
        }
    }
}

/// Header line shown above a pad: `mapping: standard · 17 buttons · 4 axes`.
impl fmt::Display for PadMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mapping: {} · {} buttons · {} axes",
            self.mapping, self.button_count, self.axis_count
        )
    }
}

fn mapping_or_none(mapping: &str) -> String {
    if mapping.is_empty() {
        NO_MAPPING.to_string()
    } else {
        mapping.to_string()
    }
}
