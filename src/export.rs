//! Export encoders: structured (JSON) and tabular (CSV).
//!
//! Both are pure transforms over a frame sequence; the `write_*` helpers only
//! add the file I/O.
//!
//! # JSON
//! `{ "createdAt": "<ISO-8601 UTC, ms>", "deadzone": 0.1, "frames": [ … ] }`, with
//! frames serialized exactly as [`Frame`] (nested arrays for buttons and axes).
//!
//! # CSV
//! Header `t(ms),pad,kind,index,pressed,value`, then one row per channel sample:
//! frames in order, pads in frame order, buttons before axes, channels
//! ascending. Button rows carry `pressed` as `0`/`1`; axis rows leave it empty.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::snapshot::Frame;

pub const CSV_HEADER: &str = "t(ms),pad,kind,index,pressed,value";

/// A recording as written to (and read back from) the structured format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    pub deadzone: f32,
    pub frames: Vec<Frame>,
}

impl Recording {
    pub fn new(deadzone: f32, frames: Vec<Frame>) -> Self {
        Self {
            created_at: Utc::now(),
            deadzone,
            frames,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(src: &str) -> Result<Self> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn to_csv(&self) -> String {
        to_csv(&self.frames)
    }

    pub fn write_json(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json(pretty)?)?;
        tracing::info!(path = %path.display(), frames = self.frames.len(), "wrote JSON recording");
        Ok(())
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_csv())?;
        tracing::info!(path = %path.display(), frames = self.frames.len(), "wrote CSV recording");
        Ok(())
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_json(&src)
    }
}

/// Flatten frames into CSV text (rows joined by `\n`, no trailing newline).
pub fn to_csv(frames: &[Frame]) -> String {
    let mut out = String::from(CSV_HEADER);
    for frame in frames {
        let t = tenths(frame.t);
        for pad in &frame.pads {
            for (i, b) in pad.buttons.iter().enumerate() {
                let _ = write!(
                    out,
                    "\n{:.1},{},button,{},{},{}",
                    t,
                    pad.index,
                    i,
                    u8::from(b.pressed),
                    number(b.value)
                );
            }
            for (i, &a) in pad.axes.iter().enumerate() {
                let _ = write!(
                    out,
                    "\n{:.1},{},axis,{},,{}",
                    t,
                    pad.index,
                    i,
                    number(a)
                );
            }
        }
    }
    out
}

/// Round to one decimal with ties away from zero (`{:.1}` alone ties to even).
#[inline]
fn tenths(t: f64) -> f64 {
    (t * 10.0).round() / 10.0
}

/// Shortest round-trip text for a value, with `-0` printed as `0`.
#[inline]
fn number(v: f32) -> f32 {
    v + 0.0
}

/// `createdAt` as `YYYY-MM-DDTHH:MM:SS.mmmZ` on the way out; any RFC 3339 on the way in.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
