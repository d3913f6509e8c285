//! `hidapi`-backed input source.
//!
//! [`HidSource`] enumerates game-control HID interfaces, gives each one the
//! lowest free slot index for as long as it stays connected, and decodes its
//! most recent input report through the matching
//! [`ReportLayout`](crate::backends::layout::ReportLayout).
//!
//! Devices without a configured layout still show up (id, connect/disconnect)
//! but report no buttons or axes.
//!
//! Enumeration is comparatively slow, so it runs at most once per
//! [`HidSource::refresh_interval`] from inside `poll()`, or on demand through
//! [`HidSource::refresh`].

use std::ffi::CString;
use std::time::{Duration, Instant};

use hidapi::{DeviceInfo, HidApi, HidDevice};

use crate::backends::layout::ReportLayout;
use crate::config::HidConfig;
use crate::device::{ConnectionEvent, InputSource, RawButton, RawPad};
use crate::error::Result;

/// Maximum number of HID reports drained per device per poll.
const MAX_REPORTS_PER_TICK: usize = 32;

const REPORT_BUF_LEN: usize = 64;

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Generic Desktop usages we treat as controllers: joystick, gamepad, multi-axis.
fn is_game_control(info: &DeviceInfo) -> bool {
    info.usage_page() == 0x01 && matches!(info.usage(), 0x04 | 0x05 | 0x08)
}

/// Browser-style display id: `Product (Vendor: 045e Product: 028e)`.
fn display_id(info: &DeviceInfo) -> String {
    format!(
        "{} (Vendor: {:04x} Product: {:04x})",
        info.product_string().unwrap_or("Unknown"),
        info.vendor_id(),
        info.product_id()
    )
}

/// Drop failed paths the OS no longer lists, so a replugged device attaches again.
fn forget_unlisted(failed: &mut Vec<CString>, present: &[CString]) {
    failed.retain(|path| present.contains(path));
}

struct HidSlot {
    path: CString,
    device: HidDevice,
    layout: Option<ReportLayout>,
    pad: RawPad,
    buf: Vec<u8>,
}

impl HidSlot {
    /// Drain pending reports, keeping the state decoded from the newest one.
    ///
    /// Returns `false` when the device can no longer be read.
    fn pump(&mut self) -> bool {
        for _ in 0..MAX_REPORTS_PER_TICK {
            match self.device.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => {
                    let Some(layout) = &self.layout else {
                        continue;
                    };
                    if let Some((buttons, axes)) = layout.decode(&self.buf[..n]) {
                        self.pad.buttons = buttons;
                        self.pad.axes = axes;
                    }
                }
                Err(e) => {
                    tracing::warn!(id = %self.pad.id, error = %e, "HID read failed");
                    return false;
                }
            }
        }
        true
    }
}

pub struct HidSource {
    api: HidApi,
    layouts: Vec<ReportLayout>,
    slots: Vec<Option<HidSlot>>,
    events: Vec<ConnectionEvent>,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
    /// Paths whose reads failed; not reattached until they leave enumeration.
    failed: Vec<CString>,
}

impl HidSource {
    /// Open the platform HID API and run a first enumeration.
    pub fn new(config: &HidConfig) -> Result<Self> {
        let api = HidApi::new()?;
        let mut source = Self {
            api,
            layouts: config.layouts.clone(),
            slots: Vec::new(),
            events: Vec::new(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            last_refresh: None,
            failed: Vec::new(),
        };
        source.refresh()?;
        Ok(source)
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn set_refresh_interval(&mut self, interval: Duration) {
        self.refresh_interval = interval;
    }

    /// Re-enumerate devices, queueing connect/disconnect events for changes.
    pub fn refresh(&mut self) -> Result<()> {
        self.last_refresh = Some(Instant::now());
        self.api.refresh_devices()?;

        let present: Vec<CString> = self
            .api
            .device_list()
            .filter(|info| is_game_control(info))
            .map(|info| info.path().to_owned())
            .collect();

        forget_unlisted(&mut self.failed, &present);

        for slot in self.slots.iter_mut() {
            let gone = slot
                .as_ref()
                .is_some_and(|s| !present.iter().any(|p| *p == s.path));
            if gone {
                if let Some(old) = slot.take() {
                    tracing::info!(index = old.pad.index, id = %old.pad.id, "HID pad disconnected");
                    self.events.push(ConnectionEvent::Disconnected {
                        index: old.pad.index,
                    });
                }
            }
        }

        let new_infos: Vec<DeviceInfo> = self
            .api
            .device_list()
            .filter(|info| is_game_control(info))
            .filter(|info| !self.is_attached(info.path()))
            .filter(|info| !self.failed.iter().any(|p| p.as_c_str() == info.path()))
            .cloned()
            .collect();

        for info in new_infos {
            self.attach(&info);
        }
        Ok(())
    }

    fn is_attached(&self, path: &std::ffi::CStr) -> bool {
        self.slots.iter().flatten().any(|s| s.path.as_c_str() == path)
    }

    fn free_slot(&mut self) -> usize {
        match self.slots.iter().position(Option::is_none) {
            Some(i) => i,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        }
    }

    fn attach(&mut self, info: &DeviceInfo) {
        let device = match info.open_device(&self.api) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(path = ?info.path(), error = %e, "could not open HID device");
                return;
            }
        };
        // The host drives polling; reads must never stall a tick.
        if let Err(e) = device.set_blocking_mode(false) {
            tracing::warn!(error = %e, "could not switch HID device to non-blocking mode");
        }

        let layout = self
            .layouts
            .iter()
            .find(|l| l.matches(info.vendor_id(), info.product_id()))
            .cloned();
        let index = self.free_slot();

        let mut pad = RawPad::new(index as u32, display_id(info));
        if let Some(layout) = &layout {
            pad.mapping = layout.mapping.clone();
            pad.buttons = vec![RawButton::released(); layout.buttons.len()];
            pad.axes = vec![0.0; layout.axes.len()];
        } else {
            tracing::debug!(id = %pad.id, "no report layout configured; pad reports no channels");
        }

        tracing::info!(index, id = %pad.id, "HID pad connected");
        self.events.push(ConnectionEvent::Connected(pad.clone()));
        self.slots[index] = Some(HidSlot {
            path: info.path().to_owned(),
            device,
            layout,
            pad,
            buf: vec![0u8; REPORT_BUF_LEN],
        });
    }
}

impl InputSource for HidSource {
    fn name(&self) -> &str {
        "hid"
    }

    fn poll(&mut self) -> Vec<Option<RawPad>> {
        let due = self
            .last_refresh
            .map_or(true, |at| at.elapsed() >= self.refresh_interval);
        if due {
            if let Err(e) = self.refresh() {
                tracing::warn!(error = %e, "HID enumeration failed");
            }
        }

        for slot in self.slots.iter_mut() {
            let dead = slot.as_mut().is_some_and(|s| !s.pump());
            if dead {
                if let Some(old) = slot.take() {
                    tracing::info!(index = old.pad.index, id = %old.pad.id, "HID pad dropped after read failure");
                    self.events.push(ConnectionEvent::Disconnected {
                        index: old.pad.index,
                    });
                    self.failed.push(old.path);
                }
            }
        }

        self.slots
            .iter()
            .map(|slot| slot.as_ref().map(|s| s.pad.clone()))
            .collect()
    }

    fn drain_events(&mut self) -> Vec<ConnectionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_failed_path_kept_while_listed() {
        let mut failed = vec![path("/dev/hidraw3"), path("/dev/hidraw5")];
        forget_unlisted(&mut failed, &[path("/dev/hidraw3"), path("/dev/hidraw4")]);
        assert_eq!(failed, vec![path("/dev/hidraw3")]);

        forget_unlisted(&mut failed, &[path("/dev/hidraw4")]);
        assert!(failed.is_empty());
    }
}
