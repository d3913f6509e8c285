//! Input backends for `ghostpad`.
//!
//! Implementations of [`InputSource`](crate::device::InputSource) plus the
//! report-layout decoder they share.
//!
//! # Feature flags
//! - **`hid`**: enables the `hidapi` backend ([`hid::HidSource`]). Off by
//!   default because it links against the platform HID stack.
//!
//! [`virtual_input::VirtualSource`] is always available and is what tests and
//! demos use.

pub mod layout;
pub mod virtual_input;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;
