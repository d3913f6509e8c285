//! Declarative HID input-report layouts.
//!
//! A [`ReportLayout`] describes where a particular controller (by vendor and
//! product id) keeps its axes and buttons inside a raw input report, and how
//! to normalize them into the core's conventions:
//! - axes → `[-1.0, 1.0]`
//! - buttons → `pressed` + value in `[0.0, 1.0]`
//!
//! Layouts are plain data loaded from the `[[hid.layouts]]` tables of the
//! debugger config, so supporting a new controller does not need code. The
//! decoder is pure and independent of `hidapi`; the `hid` backend feeds it
//! the bytes it reads.
//!
//! ```toml
//! [[hid.layouts]]
//! vendor_id = 0x054c
//! product_id = 0x05c4
//! report_id = 1
//! mapping = "standard"
//! axes = [
//!   { offset = 1, format = "u8" },
//!   { offset = 2, format = "u8" },
//! ]
//! buttons = [
//!   { offset = 5, bit = 5 },
//!   { offset = 8, analog = true },
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::device::RawButton;

/// Encoding of a single axis field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisFormat {
    /// Unsigned byte, centered at 128.
    U8,
    /// Signed byte.
    I8,
    /// Unsigned 16-bit little-endian, centered at 32768.
    U16le,
    /// Signed 16-bit little-endian.
    I16le,
}

impl AxisFormat {
    fn width(self) -> usize {
        match self {
            AxisFormat::U8 | AxisFormat::I8 => 1,
            AxisFormat::U16le | AxisFormat::I16le => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisField {
    /// Byte offset into the report payload (after any report-id byte).
    pub offset: usize,
    pub format: AxisFormat,
    #[serde(default)]
    pub invert: bool,
}

impl AxisField {
    fn decode(&self, payload: &[u8]) -> f32 {
        let Some(end) = self.offset.checked_add(self.format.width()) else {
            return 0.0;
        };
        let Some(bytes) = payload.get(self.offset..end) else {
            return 0.0;
        };
        let v = match self.format {
            AxisFormat::U8 => centered(bytes[0] as f32 - 128.0, 128.0, 127.0),
            AxisFormat::I8 => centered(bytes[0] as i8 as f32, 128.0, 127.0),
            AxisFormat::U16le => {
                let raw = u16::from_le_bytes([bytes[0], bytes[1]]) as f32 - 32768.0;
                centered(raw, 32768.0, 32767.0)
            }
            AxisFormat::I16le => {
                let raw = i16::from_le_bytes([bytes[0], bytes[1]]) as f32;
                centered(raw, 32768.0, 32767.0)
            }
        };
        if self.invert {
            -v
        } else {
            v
        }
    }
}

/// Map a signed reading onto `[-1, 1]` with asymmetric half-ranges.
#[inline]
fn centered(v: f32, neg_range: f32, pos_range: f32) -> f32 {
    if v >= 0.0 {
        (v / pos_range).min(1.0)
    } else {
        (v / neg_range).max(-1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonField {
    pub offset: usize,
    /// Bit within the byte for digital buttons. Ignored when `analog` is set.
    #[serde(default)]
    pub bit: u8,
    /// Whole byte is an analog pressure value `0..=255`.
    #[serde(default)]
    pub analog: bool,
    /// Analog values above this count as pressed.
    #[serde(default = "default_press_threshold")]
    pub press_threshold: f32,
}

fn default_press_threshold() -> f32 {
    0.5
}

impl ButtonField {
    fn decode(&self, payload: &[u8]) -> RawButton {
        let Some(&byte) = payload.get(self.offset) else {
            return RawButton::released();
        };
        if self.analog {
            let value = byte as f32 / 255.0;
            RawButton {
                pressed: value > self.press_threshold,
                value,
            }
        } else if byte & (1 << (self.bit & 7)) != 0 {
            RawButton::pressed(1.0)
        } else {
            RawButton::released()
        }
    }
}

/// Layout of one controller model's input report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub vendor_id: u16,
    pub product_id: u16,
    /// When set, reports are expected as `[report_id][payload…]` and reports
    /// with another id are ignored.
    #[serde(default)]
    pub report_id: Option<u8>,
    #[serde(default)]
    pub mapping: String,
    #[serde(default)]
    pub axes: Vec<AxisField>,
    #[serde(default)]
    pub buttons: Vec<ButtonField>,
}

impl ReportLayout {
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    /// Strip the report-id prefix, if this layout uses one.
    ///
    /// Returns `None` for reports that belong to a different report id.
    pub fn payload<'a>(&self, report: &'a [u8]) -> Option<&'a [u8]> {
        match self.report_id {
            None => Some(report),
            Some(id) => match report.split_first() {
                Some((&rid, rest)) if rid == id => Some(rest),
                _ => None,
            },
        }
    }

    /// Decode a full report into `(buttons, axes)`.
    pub fn decode(&self, report: &[u8]) -> Option<(Vec<RawButton>, Vec<f32>)> {
        let payload = self.payload(report)?;
        let buttons = self.buttons.iter().map(|b| b.decode(payload)).collect();
        let axes = self.axes.iter().map(|a| a.decode(payload)).collect();
        Some((buttons, axes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ReportLayout {
        ReportLayout {
            vendor_id: 0x054c,
            product_id: 0x05c4,
            report_id: Some(1),
            mapping: "standard".into(),
            axes: vec![
                AxisField {
                    offset: 0,
                    format: AxisFormat::U8,
                    invert: false,
                },
                AxisField {
                    offset: 1,
                    format: AxisFormat::I16le,
                    invert: true,
                },
            ],
            buttons: vec![
                ButtonField {
                    offset: 3,
                    bit: 2,
                    analog: false,
                    press_threshold: 0.5,
                },
                ButtonField {
                    offset: 4,
                    bit: 0,
                    analog: true,
                    press_threshold: 0.5,
                },
            ],
        }
    }

    #[test]
    fn test_decode_report() {
        let i16_max = i16::MAX.to_le_bytes();
        let report = [1u8, 255, i16_max[0], i16_max[1], 0b0000_0100, 51];
        let (buttons, axes) = layout().decode(&report).unwrap();

        assert_eq!(axes[0], 1.0);
        assert_eq!(axes[1], -1.0);
        assert!(buttons[0].pressed);
        assert_eq!(buttons[0].value, 1.0);
        assert!(!buttons[1].pressed);
        assert!((buttons[1].value - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_axis_extremes() {
        let u8_axis = AxisField {
            offset: 0,
            format: AxisFormat::U8,
            invert: false,
        };
        assert_eq!(u8_axis.decode(&[0]), -1.0);
        assert_eq!(u8_axis.decode(&[128]), 0.0);

        let u16_axis = AxisField {
            offset: 0,
            format: AxisFormat::U16le,
            invert: false,
        };
        assert_eq!(u16_axis.decode(&[0, 0]), -1.0);
        assert_eq!(u16_axis.decode(&[0xff, 0xff]), 1.0);
    }

    #[test]
    fn test_huge_offset_reads_neutral() {
        let axis = AxisField {
            offset: usize::MAX,
            format: AxisFormat::I16le,
            invert: false,
        };
        assert_eq!(axis.decode(&[0xff, 0x7f]), 0.0);
    }

    #[test]
    fn test_wrong_report_id_is_ignored() {
        assert!(layout().decode(&[2, 0, 0, 0, 0, 0]).is_none());
    }

    #[test]
    fn test_short_report_reads_neutral() {
        let (buttons, axes) = layout().decode(&[1]).unwrap();
        assert_eq!(axes, vec![0.0, 0.0]);
        assert!(buttons.iter().all(|b| !b.pressed));
    }

    #[test]
    fn test_layout_from_toml() {
        let src = r#"
            vendor_id = 0x045e
            product_id = 0x028e
            axes = [{ offset = 2, format = "i16le", invert = true }]
            buttons = [{ offset = 0, bit = 4 }, { offset = 1, analog = true }]
        "#;
        let layout: ReportLayout = toml::from_str(src).unwrap();
        assert!(layout.matches(0x045e, 0x028e));
        assert_eq!(layout.report_id, None);
        assert_eq!(layout.axes[0].format, AxisFormat::I16le);
        assert!(layout.buttons[1].analog);
        assert_eq!(layout.buttons[1].press_threshold, 0.5);
    }
}
