//! Ghost replay: wall-clock paced playback of a recorded frame sequence.
//!
//! For a queried time the cursor selects the latest frame whose `t` does not
//! exceed the elapsed time since [`PlaybackCursor::begin`]. It never
//! interpolates, never skips evaluating an intermediate timestamp and never
//! moves backwards, even if the host clock does.
//!
//! Because selection is driven by elapsed wall-clock time rather than a frame
//! counter, recordings taken at an irregular tick rate replay at the pace they
//! were captured.
//!
//! ```
//! use std::sync::Arc;
//! use ghostpad::playback::{Advance, PlaybackCursor};
//! use ghostpad::snapshot::Frame;
//!
//! let frames = Arc::new(vec![
//!     Frame { t: 0.0, pads: vec![] },
//!     Frame { t: 50.0, pads: vec![] },
//! ]);
//! let mut cursor = PlaybackCursor::begin(frames, 1000.0).unwrap();
//! assert!(matches!(cursor.advance(1010.0), Advance::Playing(f) if f.t == 0.0));
//! assert!(matches!(cursor.advance(1050.0), Advance::Finished(f) if f.t == 50.0));
//! ```

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::snapshot::Frame;

/// Outcome of [`PlaybackCursor::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance<'a> {
    /// More frames remain after this one.
    Playing(&'a Frame),
    /// This is the final frame; the caller should release the cursor.
    Finished(&'a Frame),
}

impl<'a> Advance<'a> {
    #[inline]
    pub fn frame(&self) -> &'a Frame {
        match *self {
            Advance::Playing(f) | Advance::Finished(f) => f,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Advance::Finished(_))
    }
}

/// Read-only position within a recorded frame sequence.
#[derive(Clone, Debug)]
pub struct PlaybackCursor {
    frames: Arc<Vec<Frame>>,
    index: usize,
    started_at: f64,
}

impl PlaybackCursor {
    /// Start replaying `frames` at host time `now`.
    ///
    /// Returns [`Error::EmptyRecording`] when there is nothing to replay.
    pub fn begin(frames: Arc<Vec<Frame>>, now: f64) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::EmptyRecording);
        }
        Ok(Self {
            frames,
            index: 0,
            started_at: now,
        })
    }

    /// Move forward to the latest frame at or before `now - started_at`.
    pub fn advance(&mut self, now: f64) -> Advance<'_> {
        let elapsed = now - self.started_at;
        let last = self.frames.len() - 1;
        while self.index < last && self.frames[self.index + 1].t <= elapsed {
            self.index += 1;
        }

        let frame = &self.frames[self.index];
        if self.index == last {
            Advance::Finished(frame)
        } else {
            Advance::Playing(frame)
        }
    }

    /// Current frame without advancing.
    #[inline]
    pub fn current(&self) -> &Frame {
        &self.frames[self.index]
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: a cursor cannot be built over an empty sequence.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.index == self.frames.len() - 1
    }

    #[inline]
    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
