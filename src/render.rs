//! Render projector: frame → visual description of each pad.
//!
//! The projector knows nothing about the drawing surface. It resolves a
//! [`Frame`] (live or replayed) into plain view structs: stick dot positions
//! with the deadzone applied, trigger fill levels, and one tile per button.
//!
//! ## Channel conventions (standard mapping)
//! - Axes `0/1`: left stick X/Y, axes `2/3`: right stick X/Y.
//! - Buttons `6/7`: analog left/right triggers. Trigger values are shown raw;
//!   the deadzone only applies to sticks.
//! - Missing channels read as `0.0`.

use serde::Serialize;

use crate::deadzone::normalize_stick;
use crate::snapshot::{DeviceSnapshot, Frame};

/// Friendly labels for the standard gamepad button order.
pub const BUTTON_NAMES: [&str; 17] = [
    "A / Cross",
    "B / Circle",
    "X / Square",
    "Y / Triangle",
    "LB / L1",
    "RB / R1",
    "LT / L2 (analog)",
    "RT / R2 (analog)",
    "Back / Select",
    "Start / Options",
    "Left Stick",
    "Right Stick",
    "D-Pad Up",
    "D-Pad Down",
    "D-Pad Left",
    "D-Pad Right",
    "Home / Guide",
];

const LEFT_TRIGGER: usize = 6;
const RIGHT_TRIGGER: usize = 7;

/// Label for button `idx`; unknown indices get a generic `Button {idx}`.
pub fn button_name(idx: usize) -> String {
    BUTTON_NAMES
        .get(idx)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Button {idx}"))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StickView {
    pub label: &'static str,
    /// Deadzone-normalized position in `[-1, 1]`.
    pub x: f32,
    pub y: f32,
    /// Deadzone radius to draw around the center.
    pub deadzone: f32,
    /// Display text, e.g. `(0.25, -1.00)`.
    pub coords: String,
}

impl StickView {
    fn new(label: &'static str, raw_x: f32, raw_y: f32, deadzone: f32) -> Self {
        let (x, y) = normalize_stick(raw_x, raw_y, deadzone);
        Self {
            label,
            x,
            y,
            deadzone,
            coords: format!("({x:.2}, {y:.2})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TriggerView {
    pub label: &'static str,
    /// Fill level in `[0, 1]`.
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ButtonTile {
    pub name: String,
    pub pressed: bool,
    pub value: f32,
}

/// Everything needed to draw one pad.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PadView {
    pub index: u32,
    pub id: String,
    pub mapping: String,
    /// `mapping: … · N buttons · M axes`.
    pub header: String,
    pub left_stick: StickView,
    pub right_stick: StickView,
    pub left_trigger: TriggerView,
    pub right_trigger: TriggerView,
    pub buttons: Vec<ButtonTile>,
}

/// Project a single pad.
pub fn project_pad(pad: &DeviceSnapshot, deadzone: f32) -> PadView {
    let buttons = pad
        .buttons
        .iter()
        .enumerate()
        .map(|(i, b)| ButtonTile {
            name: button_name(i),
            pressed: b.pressed,
            value: b.value,
        })
        .collect();

    PadView {
        index: pad.index,
        id: pad.id.clone(),
        mapping: pad.mapping.clone(),
        header: format!(
            "mapping: {} · {} buttons · {} axes",
            pad.mapping,
            pad.buttons.len(),
            pad.axes.len()
        ),
        left_stick: StickView::new("Left Stick", pad.axis(0), pad.axis(1), deadzone),
        right_stick: StickView::new("Right Stick", pad.axis(2), pad.axis(3), deadzone),
        left_trigger: TriggerView {
            label: "L2",
            value: pad.button_value(LEFT_TRIGGER),
        },
        right_trigger: TriggerView {
            label: "R2",
            value: pad.button_value(RIGHT_TRIGGER),
        },
        buttons,
    }
}

/// Project every pad in `frame`, in frame order.
pub fn project_frame(frame: &Frame, deadzone: f32) -> Vec<PadView> {
    frame
        .pads
        .iter()
        .map(|pad| project_pad(pad, deadzone))
        .collect()
}

/// Where the projected frame came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RenderMode {
    Live,
    Replay,
}

/// Recording indicator shown next to the pads.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecordingStatus {
    pub recording: bool,
    pub frames: usize,
    pub duration_secs: f64,
}

impl RecordingStatus {
    /// Duration text, e.g. `1.5s`.
    pub fn duration_label(&self) -> String {
        format!("{:.1}s", self.duration_secs)
    }
}

/// Output of one debugger tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderInstruction {
    pub mode: RenderMode,
    /// Connection indicator. Always on during replay ("virtual" presence).
    pub connected: bool,
    pub deadzone: f32,
    pub pads: Vec<PadView>,
    pub recording: RecordingStatus,
}
