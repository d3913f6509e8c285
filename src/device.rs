//! Input collaborator: the host's device-polling API, seen from the core.
//!
//! An [`InputSource`] answers two questions each tick:
//! - "what does every slot look like right now?" ([`InputSource::poll`])
//! - "what connected or disconnected since last time?" ([`InputSource::drain_events`])
//!
//! Values follow the usual gamepad conventions: axes in `[-1.0, 1.0]`, button
//! values in `[0.0, 1.0]`. Sources report raw readings; rounding and deadzones
//! are applied by [`FrameSampler`](crate::sampler::FrameSampler) and
//! [`deadzone`](crate::deadzone) respectively.

/// State of a single button as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawButton {
    pub pressed: bool,
    /// Analog value in `[0, 1]`. Digital buttons report `0.0` or `1.0`.
    pub value: f32,
}

impl RawButton {
    pub fn pressed(value: f32) -> Self {
        Self {
            pressed: true,
            value,
        }
    }

    pub fn released() -> Self {
        Self::default()
    }
}

/// Full state of one connected device slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPad {
    /// Slot index. Stable for as long as the device stays connected.
    pub index: u32,
    /// Display label (product string or similar).
    pub id: String,
    /// Reported layout mapping, e.g. `"standard"`. Empty when unknown.
    pub mapping: String,
    pub buttons: Vec<RawButton>,
    pub axes: Vec<f32>,
}

impl RawPad {
    pub fn new(index: u32, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper used by sources that know their channel counts up front.
    pub fn with_channels(mut self, buttons: usize, axes: usize) -> Self {
        self.buttons = vec![RawButton::released(); buttons];
        self.axes = vec![0.0; axes];
        self
    }

    pub fn with_mapping(mut self, mapping: impl Into<String>) -> Self {
        self.mapping = mapping.into();
        self
    }
}

/// Discrete connection notification delivered by a source.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionEvent {
    Connected(RawPad),
    Disconnected { index: u32 },
}

/// A pollable provider of device state.
pub trait InputSource {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Feature detection. A source that returns `false` yields no devices and
    /// the debugger surfaces a one-time notice instead of failing.
    fn is_supported(&self) -> bool {
        true
    }

    /// Current state of every slot. `None` marks an empty (disconnected) slot.
    fn poll(&mut self) -> Vec<Option<RawPad>>;

    /// Connection changes observed since the previous call.
    fn drain_events(&mut self) -> Vec<ConnectionEvent>;
}
