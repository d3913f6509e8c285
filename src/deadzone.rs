//! Deadzone normalization for analog axes.
//!
//! Readings whose magnitude is below the deadzone collapse to `0.0`. Anything
//! above it is rescaled so the remaining travel still covers the full
//! `[-1.0, 1.0]` range: the output is exactly `0` at the deadzone edge and
//! exactly `±1` at full deflection.
//!
//! ```
//! use ghostpad::deadzone::normalize;
//!
//! assert_eq!(normalize(0.05, 0.1), 0.0);
//! assert!((normalize(0.55, 0.1) - 0.5).abs() < 1e-6);
//! assert_eq!(normalize(1.0, 0.1), 1.0);
//! ```

/// Apply a deadzone to a single axis reading.
///
/// `deadzone` is expected in `[0, 1)`. A deadzone of `1.0` or more turns every
/// reading into `0.0`; that is accepted rather than treated as an error.
#[inline]
pub fn normalize(raw: f32, deadzone: f32) -> f32 {
    let magnitude = raw.abs();
    if magnitude < deadzone || deadzone >= 1.0 {
        return 0.0;
    }
    let scaled = ((magnitude - deadzone) / (1.0 - deadzone)).clamp(0.0, 1.0);
    if raw < 0.0 && scaled > 0.0 {
        -scaled
    } else {
        scaled
    }
}

/// Apply [`normalize`] independently to both axes of a stick.
///
/// This is a per-axis (square) deadzone, not a radial one.
#[inline]
pub fn normalize_stick(x: f32, y: f32, deadzone: f32) -> (f32, f32) {
    (normalize(x, deadzone), normalize(y, deadzone))
}
