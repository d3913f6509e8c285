//! Error type shared by the fallible parts of the crate.
//!
//! The capture/replay core itself is infallible; errors only come from the
//! edges: loading configuration, encoding/decoding recordings, writing export
//! files and (with the `hid` feature) talking to the OS HID stack.

use thiserror::Error;

/// Errors produced by `ghostpad`.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure while reading config or writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured (JSON) recording could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is not valid TOML for [`DebuggerConfig`](crate::config::DebuggerConfig).
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration parsed but holds a value we refuse to run with.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Replay or export was requested for a recording with no frames.
    #[error("recording has no frames")]
    EmptyRecording,

    /// HID backend failure.
    #[cfg(feature = "hid")]
    #[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
    #[error("HID error: {0}")]
    Hid(#[from] hidapi::HidError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
