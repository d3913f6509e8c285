//! Frame sampler: turns the live slot list into an immutable [`Frame`].
//!
//! Every button value and axis reading is rounded to a fixed number of decimal
//! places (3 by default) so exports stay compact and identical readings with
//! floating-point jitter compare equal across ticks.

use crate::device::{InputSource, RawPad};
use crate::snapshot::{ButtonSnapshot, DeviceSnapshot, Frame};

/// Default rounding precision (decimal places).
pub const DEFAULT_PRECISION: u32 = 3;

/// Mapping label recorded when a source reports none.
pub const NO_MAPPING: &str = "none";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSampler {
    precision: u32,
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl FrameSampler {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Poll `source` and build a frame stamped with `t`.
    ///
    /// Read-only with respect to the core: the only side effect is the poll itself.
    pub fn sample(&self, source: &mut dyn InputSource, t: f64) -> Frame {
        let slots = source.poll();
        self.sample_pads(&slots, t)
    }

    /// Build a frame from an already-polled slot list. Empty slots are skipped.
    pub fn sample_pads(&self, slots: &[Option<RawPad>], t: f64) -> Frame {
        let pads = slots
            .iter()
            .flatten()
            .map(|pad| self.snapshot_pad(pad))
            .collect();
        Frame { t, pads }
    }

    fn snapshot_pad(&self, pad: &RawPad) -> DeviceSnapshot {
        DeviceSnapshot {
            index: pad.index,
            id: pad.id.clone(),
            buttons: pad
                .buttons
                .iter()
                .map(|b| ButtonSnapshot {
                    pressed: b.pressed,
                    value: self.round(b.value),
                })
                .collect(),
            axes: pad.axes.iter().map(|&a| self.round(a)).collect(),
            mapping: if pad.mapping.is_empty() {
                NO_MAPPING.to_string()
            } else {
                pad.mapping.clone()
            },
        }
    }

    #[inline]
    fn round(&self, v: f32) -> f32 {
        round_to(v, self.precision)
    }
}

/// Round to `places` decimal places. Negative zero is folded into `0.0`.
pub fn round_to(v: f32, places: u32) -> f32 {
    let scale = 10f64.powi(places as i32);
    let rounded = ((v as f64) * scale).round() / scale;
    (rounded as f32) + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RawButton;

    fn pad(index: u32) -> RawPad {
        RawPad {
            index,
            id: format!("Pad {index}"),
            mapping: String::new(),
            buttons: vec![RawButton::pressed(0.123_456), RawButton::released()],
            axes: vec![0.987_654_3, -0.000_2],
        }
    }

    #[test]
    fn test_rounds_values() {
        let frame = FrameSampler::default().sample_pads(&[Some(pad(0))], 12.5);
        let p = &frame.pads[0];
        assert_eq!(frame.t, 12.5);
        assert_eq!(p.buttons[0].value, 0.123);
        assert!(p.buttons[0].pressed);
        assert_eq!(p.axes[0], 0.988);
        assert_eq!(p.axes[1], 0.0);
        assert!(p.axes[1].is_sign_positive());
    }

    #[test]
    fn test_skips_empty_slots() {
        let frame = FrameSampler::default().sample_pads(&[None, Some(pad(1)), None], 0.0);
        assert_eq!(frame.pads.len(), 1);
        assert_eq!(frame.pads[0].index, 1);
    }

    #[test]
    fn test_empty_slot_list() {
        let frame = FrameSampler::default().sample_pads(&[], 3.0);
        assert!(frame.pads.is_empty());
    }

    #[test]
    fn test_missing_mapping_is_none() {
        let frame = FrameSampler::default().sample_pads(&[Some(pad(0))], 0.0);
        assert_eq!(frame.pads[0].mapping, NO_MAPPING);

        let standard = pad(0).with_mapping("standard");
        let frame = FrameSampler::default().sample_pads(&[Some(standard)], 0.0);
        assert_eq!(frame.pads[0].mapping, "standard");
    }

    #[test]
    fn test_custom_precision() {
        assert_eq!(round_to(0.456, 1), 0.5);
        assert_eq!(FrameSampler::new(2).precision(), 2);
    }
}
