//! Commands in, notices out.
//!
//! The debugger is driven by two small enums instead of ambient callbacks:
//!
//! - [`Command`]: UI intents (start, record, replay, …). Hosts queue them with
//!   [`Debugger::submit`](crate::manager::Debugger::submit); they are consumed
//!   at the start of the next tick, in submission order.
//! - [`DebuggerEvent`]: state changes worth telling the user about. They are
//!   fanned out through the [`EventBus`](crate::eventbus::EventBus), and their
//!   `Display` form is the status line a UI would show.

use std::fmt;

use crate::snapshot::SnapshotSummary;

/// A UI intent, applied at the start of the next tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Start the tick loop and attach every pad currently present.
    Start,
    /// Stop producing render output. Recording and replay state are kept.
    Pause,
    /// Record if idle, stop if recording.
    ToggleRecording,
    StartRecording,
    StopRecording,
    /// Ghost-replay the last recording.
    StartReplay,
    SetDeadzone(f32),
    /// Summarise the live pads right now.
    Snapshot,
}

/// Category used by [`EventFilter`](crate::eventbus::EventFilter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Lifecycle,
    Connection,
    Recording,
    Replay,
    Snapshot,
    Settings,
    Notice,
}

/// Something the user should hear about.
#[derive(Clone, Debug, PartialEq)]
pub enum DebuggerEvent {
    Started,
    Paused,
    PadConnected { index: u32, id: String },
    PadDisconnected { index: u32 },
    /// The last attached pad went away.
    AllDisconnected,
    RecordingStarted,
    RecordingStopped { frames: usize },
    ReplayStarted { frames: usize },
    ReplayFinished,
    SnapshotTaken(SnapshotSummary),
    DeadzoneChanged(f32),
    /// The input source reports no device API on this host.
    Unsupported,
    /// A command was refused; state is unchanged.
    Rejected { reason: String },
}

impl DebuggerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DebuggerEvent::Started | DebuggerEvent::Paused => EventKind::Lifecycle,
            DebuggerEvent::PadConnected { .. }
            | DebuggerEvent::PadDisconnected { .. }
            | DebuggerEvent::AllDisconnected => EventKind::Connection,
            DebuggerEvent::RecordingStarted | DebuggerEvent::RecordingStopped { .. } => {
                EventKind::Recording
            }
            DebuggerEvent::ReplayStarted { .. } | DebuggerEvent::ReplayFinished => {
                EventKind::Replay
            }
            DebuggerEvent::SnapshotTaken(_) => EventKind::Snapshot,
            DebuggerEvent::DeadzoneChanged(_) => EventKind::Settings,
            DebuggerEvent::Unsupported | DebuggerEvent::Rejected { .. } => EventKind::Notice,
        }
    }

    /// Pad this event is about, if any.
    pub fn pad_index(&self) -> Option<u32> {
        match self {
            DebuggerEvent::PadConnected { index, .. } | DebuggerEvent::PadDisconnected { index } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DebuggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebuggerEvent::Started => {
                write!(f, "Debugger running. If nothing updates, press any controller button.")
            }
            DebuggerEvent::Paused => write!(f, "Debugger paused."),
            DebuggerEvent::PadConnected { id, .. } => write!(
                f,
                "Connected: {id}. Move a stick or press a button to see it here."
            ),
            DebuggerEvent::PadDisconnected { index } => write!(f, "Disconnected: pad #{index}."),
            DebuggerEvent::AllDisconnected => {
                write!(f, "All controllers disconnected. Reconnect and press Start.")
            }
            DebuggerEvent::RecordingStarted => {
                write!(f, "Recording… do a few inputs, then hit Stop.")
            }
            DebuggerEvent::RecordingStopped { frames } => {
                write!(f, "Recording stopped ({frames} frames).")
            }
            DebuggerEvent::ReplayStarted { .. } => write!(f, "Ghost replay started…"),
            DebuggerEvent::ReplayFinished => write!(f, "Ghost replay finished."),
            DebuggerEvent::SnapshotTaken(summary) => write!(f, "Snapshot: {summary}"),
            DebuggerEvent::DeadzoneChanged(dz) => write!(f, "Deadzone set to {dz:.2}."),
            DebuggerEvent::Unsupported => write!(
                f,
                "Heads up: this host does not support the gamepad API."
            ),
            DebuggerEvent::Rejected { reason } => write!(f, "{reason}"),
        }
    }
}
