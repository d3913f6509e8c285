//! Device registry: slot index → attached pad entry.
//!
//! Entries appear on first observation (a live connect event, a live poll, or
//! the first replayed frame that mentions the index) and disappear only on a
//! live disconnect. Replay never removes entries.

use std::collections::BTreeMap;

use crate::metadata::PadMeta;
use crate::snapshot::Frame;

#[derive(Clone, Debug, Default)]
pub struct PadRegistry {
    pads: BTreeMap<u32, PadMeta>,
}

impl PadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a pad. Returns `true` if the index was not yet known.
    ///
    /// An existing entry is left untouched.
    pub fn attach(&mut self, meta: PadMeta) -> bool {
        if self.pads.contains_key(&meta.index) {
            return false;
        }
        self.pads.insert(meta.index, meta);
        true
    }

    pub fn detach(&mut self, index: u32) -> Option<PadMeta> {
        self.pads.remove(&index)
    }

    /// Create placeholder entries for every pad in `frame` not yet registered.
    ///
    /// Returns the indices that were newly created.
    pub fn observe_frame(&mut self, frame: &Frame) -> Vec<u32> {
        frame
            .pads
            .iter()
            .filter(|pad| self.attach(PadMeta::from_snapshot(pad)))
            .map(|pad| pad.index)
            .collect()
    }

    pub fn get(&self, index: u32) -> Option<&PadMeta> {
        self.pads.get(&index)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.pads.contains_key(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PadMeta> {
        self.pads.values()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn clear(&mut self) {
        self.pads.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::DeviceSnapshot;

    fn meta(index: u32, id: &str) -> PadMeta {
        PadMeta {
            index,
            id: id.into(),
            mapping: "standard".into(),
            button_count: 17,
            axis_count: 4,
        }
    }

    #[test]
    fn test_attach_detach() {
        let mut reg = PadRegistry::new();
        assert!(reg.attach(meta(0, "A")));
        assert!(!reg.attach(meta(0, "B")));
        assert_eq!(reg.get(0).map(|m| m.id.as_str()), Some("A"));

        assert!(reg.detach(0).is_some());
        assert!(reg.detach(0).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_observe_frame_creates_missing_entries() {
        let mut reg = PadRegistry::new();
        reg.attach(meta(0, "Live"));

        let frame = Frame {
            t: 0.0,
            pads: vec![
                DeviceSnapshot {
                    index: 0,
                    id: "Recorded 0".into(),
                    ..Default::default()
                },
                DeviceSnapshot {
                    index: 3,
                    id: "Recorded 3".into(),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(reg.observe_frame(&frame), vec![3]);
        assert_eq!(reg.observe_frame(&frame), Vec::<u32>::new());
        assert_eq!(reg.get(0).map(|m| m.id.as_str()), Some("Live"));
        assert_eq!(reg.iter().map(|m| m.index).collect::<Vec<_>>(), vec![0, 3]);
    }
}
