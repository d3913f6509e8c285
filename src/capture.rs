//! Capture session: an append-only, time-ordered frame log.
//!
//! Two states: idle and recording. [`CaptureSession::start`] always resets
//! (re-starting an active session discards what it had), and
//! [`CaptureSession::stop`] only flips the flag, so the frames stay available
//! for export and replay until the next start.
//!
//! Timestamps are host clock readings in milliseconds (any monotonic origin).

use std::sync::Arc;

use crate::device::InputSource;
use crate::sampler::FrameSampler;
use crate::snapshot::Frame;

#[derive(Clone, Debug, Default)]
pub struct CaptureSession {
    recording: bool,
    began_at: f64,
    /// Shared with replay cursors. Appends go through `Arc::make_mut`, so a
    /// cursor holding an older sequence keeps seeing exactly what it started with.
    frames: Arc<Vec<Frame>>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new recording at `now`, discarding any previous frames.
    pub fn start(&mut self, now: f64) {
        self.recording = true;
        self.began_at = now;
        self.frames = Arc::new(Vec::new());
    }

    /// Stop recording. No-op when already stopped.
    pub fn stop(&mut self) {
        self.recording = false;
    }

    /// Sample `source` and append one frame, if recording.
    ///
    /// Call at most once per scheduling tick; that is what keeps `t`
    /// non-decreasing. Returns the appended frame.
    pub fn tick(
        &mut self,
        now: f64,
        source: &mut dyn InputSource,
        sampler: &FrameSampler,
    ) -> Option<&Frame> {
        if !self.recording {
            return None;
        }
        let frame = sampler.sample(source, self.elapsed(now));
        self.append(frame)
    }

    /// Append an already-sampled frame, if recording.
    pub fn append(&mut self, frame: Frame) -> Option<&Frame> {
        if !self.recording {
            return None;
        }
        debug_assert!(
            self.frames.last().map_or(true, |last| last.t <= frame.t),
            "frame timestamps must be non-decreasing"
        );
        let frames = Arc::make_mut(&mut self.frames);
        frames.push(frame);
        frames.last()
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    #[inline]
    pub fn began_at(&self) -> f64 {
        self.began_at
    }

    /// Milliseconds since [`start`](Self::start) as seen at `now`.
    #[inline]
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.began_at
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Cheap handle on the current frame sequence, for replay.
    pub fn shared_frames(&self) -> Arc<Vec<Frame>> {
        Arc::clone(&self.frames)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Timestamp of the last recorded frame (ms), `0.0` when empty.
    pub fn duration_ms(&self) -> f64 {
        self.frames.last().map(|f| f.t).unwrap_or(0.0)
    }
}
