//! Scripted, in-memory input source.
//!
//! [`VirtualSource`] holds a fixed-size slot table that tests, demos and
//! headless hosts drive by hand. Connecting a pad fills its slot and queues a
//! [`ConnectionEvent::Connected`]; disconnecting empties the slot and queues
//! [`ConnectionEvent::Disconnected`].

use crate::device::{ConnectionEvent, InputSource, RawButton, RawPad};

/// Number of slots a browser-style host exposes.
pub const DEFAULT_SLOTS: usize = 4;

#[derive(Clone, Debug)]
pub struct VirtualSource {
    name: String,
    supported: bool,
    slots: Vec<Option<RawPad>>,
    events: Vec<ConnectionEvent>,
}

impl Default for VirtualSource {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualSource {
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOTS)
    }

    pub fn with_slots(slots: usize) -> Self {
        Self {
            name: "virtual".to_string(),
            supported: true,
            slots: vec![None; slots],
            events: Vec::new(),
        }
    }

    /// A source for a host with no device API at all.
    pub fn unsupported() -> Self {
        Self {
            name: "virtual (unsupported)".to_string(),
            supported: false,
            slots: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Plug a pad into slot `pad.index`, growing the table if needed.
    ///
    /// Replaces whatever was in that slot.
    pub fn connect(&mut self, pad: RawPad) {
        if !self.supported {
            return;
        }
        let slot = pad.index as usize;
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.events.push(ConnectionEvent::Connected(pad.clone()));
        self.slots[slot] = Some(pad);
    }

    /// Unplug the pad at `index`. No-op for an empty slot.
    pub fn disconnect(&mut self, index: u32) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            if slot.take().is_some() {
                self.events.push(ConnectionEvent::Disconnected { index });
            }
        }
    }

    pub fn pad(&self, index: u32) -> Option<&RawPad> {
        self.slots.get(index as usize).and_then(Option::as_ref)
    }

    pub fn pad_mut(&mut self, index: u32) -> Option<&mut RawPad> {
        self.slots.get_mut(index as usize).and_then(Option::as_mut)
    }

    /// Convenience method to set an axis value. Ignored for unknown pads/axes.
    pub fn set_axis(&mut self, index: u32, axis: usize, value: f32) {
        if let Some(slot) = self.pad_mut(index).and_then(|p| p.axes.get_mut(axis)) {
            *slot = value;
        }
    }

    pub fn press_button(&mut self, index: u32, button: usize, value: f32) {
        self.set_button(index, button, RawButton::pressed(value));
    }

    pub fn release_button(&mut self, index: u32, button: usize) {
        self.set_button(index, button, RawButton::released());
    }

    pub fn set_button(&mut self, index: u32, button: usize, state: RawButton) {
        if let Some(slot) = self.pad_mut(index).and_then(|p| p.buttons.get_mut(button)) {
            *slot = state;
        }
    }
}

impl InputSource for VirtualSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn poll(&mut self) -> Vec<Option<RawPad>> {
        self.slots.clone()
    }

    fn drain_events(&mut self) -> Vec<ConnectionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_poll_disconnect() {
        let mut src = VirtualSource::new();
        src.connect(RawPad::new(1, "Pad").with_channels(4, 2));
        src.set_axis(1, 0, -0.5);
        src.press_button(1, 3, 0.75);

        let slots = src.poll();
        assert_eq!(slots.len(), 4);
        assert!(slots[0].is_none());
        let pad = slots[1].as_ref().unwrap();
        assert_eq!(pad.axes[0], -0.5);
        assert_eq!(pad.buttons[3], RawButton::pressed(0.75));

        src.disconnect(1);
        src.disconnect(1);
        assert!(src.poll()[1].is_none());

        let events = src.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], ConnectionEvent::Disconnected { index: 1 }));
        assert!(src.drain_events().is_empty());
    }

    #[test]
    fn test_grows_for_high_index() {
        let mut src = VirtualSource::with_slots(1);
        src.connect(RawPad::new(5, "Far"));
        assert_eq!(src.poll().len(), 6);
        assert!(src.pad(5).is_some());
    }

    #[test]
    fn test_unsupported_has_no_devices() {
        let mut src = VirtualSource::unsupported();
        src.connect(RawPad::new(0, "Ignored"));
        assert!(!src.is_supported());
        assert!(src.poll().is_empty());
        assert!(src.drain_events().is_empty());
    }
}
