//! # ghostpad
//!
//! Core of a gamepad input visualizer and recorder.
//!
//! A host (GUI, terminal UI, test harness) owns a [`Debugger`] and calls
//! [`Debugger::tick`] once per display refresh. Each tick samples an
//! [`InputSource`] into an immutable [`Frame`], optionally appends it to the
//! capture session, and hands back a [`RenderInstruction`] describing what to
//! draw. Recorded frames can be replayed at their original timing ("ghost
//! replay") or exported as JSON or CSV.
//!
//! ```
//! use ghostpad::{Command, Debugger, DebuggerConfig, RawPad, VirtualSource};
//!
//! let mut pads = VirtualSource::new();
//! pads.connect(RawPad::new(0, "Test pad").with_channels(17, 4));
//! pads.set_axis(0, 0, 0.05);
//!
//! let mut dbg = Debugger::new(pads, DebuggerConfig::default()).unwrap();
//! dbg.submit(Command::Start);
//! let view = dbg.tick(0.0).unwrap();
//!
//! // 0.05 sits inside the default 0.1 deadzone.
//! assert_eq!(view.pads[0].left_stick.x, 0.0);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod backends;
pub mod capture;
pub mod config;
pub mod deadzone;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod export;
pub mod filtered_listener;
pub mod logger;
pub mod manager;
pub mod metadata;
pub mod playback;
pub mod registry;
pub mod render;
pub mod sampler;
pub mod snapshot;

pub use backends::virtual_input::VirtualSource;
pub use capture::CaptureSession;
pub use config::{DebuggerConfig, ExportConfig, HidConfig};
pub use device::*;
pub use error::{Error, Result};
pub use event::*;
pub use eventbus::{EventBus, EventCollector, EventFilter, EventListener, ListenerId};
pub use export::Recording;
pub use filtered_listener::FilteredListener;
pub use logger::Logger;
pub use manager::*;
pub use metadata::PadMeta;
pub use playback::{Advance, PlaybackCursor};
pub use registry::PadRegistry;
pub use render::{PadView, RecordingStatus, RenderInstruction, RenderMode};
pub use sampler::FrameSampler;
pub use snapshot::{ButtonSnapshot, DeviceSnapshot, Frame, SnapshotSummary};

#[cfg(feature = "hid")]
pub use backends::hid::HidSource;
