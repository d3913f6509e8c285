//! The debugger context.
//!
//! [`Debugger`] owns everything the visualizer needs between ticks: the input
//! source, the device registry, the capture session, the replay cursor and the
//! event bus. There is no global state; construct one per view.
//!
//! # Tick model
//! The host calls [`Debugger::tick`] once per display refresh with its clock
//! reading in milliseconds. Each tick:
//! 1. applies queued [`Command`]s in submission order,
//! 2. applies connection events from the source,
//! 3. if running, produces one [`RenderInstruction`], either from the replay
//!    cursor or from a live sample (never both), appending the live sample to
//!    the capture session while recording.
//!
//! Recording and replay are mutually exclusive: a command that would overlap
//! them is rejected with [`DebuggerEvent::Rejected`] and changes nothing.
//!
//! # Example
//! ```
//! use ghostpad::{Command, Debugger, DebuggerConfig, RawPad, VirtualSource};
//!
//! let mut source = VirtualSource::new();
//! source.connect(RawPad::new(0, "Pad").with_channels(17, 4));
//!
//! let mut dbg = Debugger::new(source, DebuggerConfig::default()).unwrap();
//! dbg.submit(Command::Start);
//! dbg.submit(Command::StartRecording);
//! for i in 0..3 {
//!     dbg.tick(i as f64 * 16.0);
//! }
//! assert_eq!(dbg.capture().len(), 3);
//! ```

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::capture::CaptureSession;
use crate::config::{validate_deadzone, DebuggerConfig};
use crate::device::{ConnectionEvent, InputSource};
use crate::error::{Error, Result};
use crate::event::{Command, DebuggerEvent};
use crate::eventbus::{EventBus, EventFilter, EventListener, ListenerId};
use crate::export::Recording;
use crate::metadata::PadMeta;
use crate::playback::{Advance, PlaybackCursor};
use crate::registry::PadRegistry;
use crate::render::{project_frame, RecordingStatus, RenderInstruction, RenderMode};
use crate::sampler::FrameSampler;
use crate::snapshot::{Frame, SnapshotSummary};

pub struct Debugger {
    source: Box<dyn InputSource>,
    config: DebuggerConfig,
    sampler: FrameSampler,
    running: bool,
    deadzone: f32,
    registry: PadRegistry,
    capture: CaptureSession,
    replay: Option<PlaybackCursor>,
    snapshots: Vec<SnapshotSummary>,
    commands: VecDeque<Command>,
    bus: EventBus,
}

impl Debugger {
    /// Build a debugger around `source`.
    ///
    /// Fails only if `config` does not validate.
    pub fn new(source: impl InputSource + 'static, config: DebuggerConfig) -> Result<Self> {
        config.validate()?;
        if !source.is_supported() {
            tracing::warn!(source = source.name(), "input source not supported on this host");
        }
        Ok(Self {
            source: Box::new(source),
            sampler: FrameSampler::new(config.precision),
            deadzone: config.deadzone,
            config,
            running: false,
            registry: PadRegistry::new(),
            capture: CaptureSession::new(),
            replay: None,
            snapshots: Vec::new(),
            commands: VecDeque::new(),
            bus: EventBus::new(),
        })
    }

    /// Return to the freshly constructed state. Listeners stay subscribed.
    pub fn reset(&mut self) {
        self.running = false;
        self.deadzone = self.config.deadzone;
        self.registry.clear();
        self.capture = CaptureSession::new();
        self.replay = None;
        self.snapshots.clear();
        self.commands.clear();
        tracing::debug!("debugger reset");
    }

    // ── Events ──

    /// Subscribe to debugger notices. Keep the returned id to unsubscribe.
    pub fn subscribe(
        &mut self,
        listener: impl EventListener + 'static,
        filter: EventFilter,
    ) -> ListenerId {
        self.bus.add_listener(listener, filter, None)
    }

    /// Subscribe to notices about a single pad.
    pub fn subscribe_pad(
        &mut self,
        listener: impl EventListener + 'static,
        filter: EventFilter,
        pad: u32,
    ) -> ListenerId {
        self.bus.add_listener(listener, filter, Some(pad))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.remove_listener(id)
    }

    pub fn event_bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    fn emit(&mut self, event: DebuggerEvent) {
        tracing::debug!(?event, "debugger event");
        self.bus.emit(&event);
    }

    // ── Commands ──

    /// Queue a command for the next tick.
    pub fn submit(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    fn apply(&mut self, command: Command, now: f64) {
        match command {
            Command::Start => self.start(),
            Command::Pause => {
                if self.running {
                    self.running = false;
                    self.emit(DebuggerEvent::Paused);
                }
            }
            Command::ToggleRecording => {
                if self.capture.is_recording() {
                    self.stop_recording();
                } else {
                    self.start_recording(now);
                }
            }
            Command::StartRecording => self.start_recording(now),
            Command::StopRecording => self.stop_recording(),
            Command::StartReplay => self.start_replay(now),
            Command::SetDeadzone(dz) => match validate_deadzone(dz) {
                Ok(()) => {
                    self.deadzone = dz;
                    self.emit(DebuggerEvent::DeadzoneChanged(dz));
                }
                Err(e) => self.reject(e.to_string()),
            },
            Command::Snapshot => self.take_snapshot(),
        }
    }

    fn reject(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "command rejected");
        self.emit(DebuggerEvent::Rejected { reason });
    }

    fn start(&mut self) {
        self.running = true;
        if !self.source.is_supported() {
            self.emit(DebuggerEvent::Unsupported);
        }
        self.emit(DebuggerEvent::Started);
        let slots = self.source.poll();
        for pad in slots.iter().flatten() {
            self.attach(PadMeta::from(pad));
        }
    }

    fn start_recording(&mut self, now: f64) {
        if self.replay.is_some() {
            self.reject("Cannot record while a ghost replay is running.");
            return;
        }
        self.capture.start(now);
        tracing::info!(began_at = now, "recording started");
        self.emit(DebuggerEvent::RecordingStarted);
    }

    fn stop_recording(&mut self) {
        if !self.capture.is_recording() {
            return;
        }
        self.capture.stop();
        let frames = self.capture.len();
        tracing::info!(frames, "recording stopped");
        self.emit(DebuggerEvent::RecordingStopped { frames });
    }

    fn start_replay(&mut self, now: f64) {
        if self.capture.is_recording() {
            self.reject("Stop recording before starting a ghost replay.");
            return;
        }
        if self.replay.is_some() {
            self.reject("A ghost replay is already running.");
            return;
        }
        match PlaybackCursor::begin(self.capture.shared_frames(), now) {
            Ok(cursor) => {
                let frames = cursor.len();
                self.replay = Some(cursor);
                tracing::info!(frames, "ghost replay started");
                self.emit(DebuggerEvent::ReplayStarted { frames });
            }
            Err(Error::EmptyRecording) => self.reject("Nothing recorded yet."),
            Err(e) => self.reject(e.to_string()),
        }
    }

    fn take_snapshot(&mut self) {
        let frame = self.sampler.sample(self.source.as_mut(), 0.0);
        let summary = SnapshotSummary::from_frame(&frame, Local::now());
        self.snapshots.insert(0, summary.clone());
        self.emit(DebuggerEvent::SnapshotTaken(summary));
    }

    // ── Registry ──

    fn attach(&mut self, meta: PadMeta) {
        let (index, id) = (meta.index, meta.id.clone());
        if self.registry.attach(meta) {
            self.emit(DebuggerEvent::PadConnected { index, id });
        }
    }

    fn detach(&mut self, index: u32) {
        if self.registry.detach(index).is_some() {
            self.emit(DebuggerEvent::PadDisconnected { index });
        }
        if self.registry.is_empty() {
            self.emit(DebuggerEvent::AllDisconnected);
        }
    }

    fn apply_connection_events(&mut self) {
        for event in self.source.drain_events() {
            match event {
                ConnectionEvent::Connected(pad) => self.attach(PadMeta::from(&pad)),
                ConnectionEvent::Disconnected { index } => self.detach(index),
            }
        }
    }

    // ── Tick ──

    /// Advance one scheduling tick at host time `now` (milliseconds).
    ///
    /// Returns `None` while the debugger is not running.
    pub fn tick(&mut self, now: f64) -> Option<RenderInstruction> {
        while let Some(command) = self.commands.pop_front() {
            self.apply(command, now);
        }
        self.apply_connection_events();

        if !self.running {
            return None;
        }

        if let Some(cursor) = self.replay.as_mut() {
            let (frame, finished) = match cursor.advance(now) {
                Advance::Playing(f) => (f.clone(), false),
                Advance::Finished(f) => (f.clone(), true),
            };
            return Some(self.replay_tick(&frame, finished));
        }
        Some(self.live_tick(now))
    }

    fn replay_tick(&mut self, frame: &Frame, finished: bool) -> RenderInstruction {
        for index in self.registry.observe_frame(frame) {
            tracing::debug!(index, "replay created placeholder pad");
        }
        let instruction = RenderInstruction {
            mode: RenderMode::Replay,
            connected: true,
            deadzone: self.deadzone,
            pads: project_frame(frame, self.deadzone),
            recording: self.recording_status(),
        };

        if finished {
            self.replay = None;
            tracing::info!("ghost replay finished");
            self.emit(DebuggerEvent::ReplayFinished);
        }
        instruction
    }

    fn live_tick(&mut self, now: f64) -> RenderInstruction {
        let recording = self.capture.is_recording();
        let t = if recording { self.capture.elapsed(now) } else { 0.0 };
        let frame = self.sampler.sample(self.source.as_mut(), t);
        if recording {
            self.capture.append(frame.clone());
        }

        for pad in &frame.pads {
            if !self.registry.contains(pad.index) {
                self.attach(PadMeta::from_snapshot(pad));
            }
        }

        RenderInstruction {
            mode: RenderMode::Live,
            connected: !frame.pads.is_empty(),
            deadzone: self.deadzone,
            pads: project_frame(&frame, self.deadzone),
            recording: self.recording_status(),
        }
    }

    fn recording_status(&self) -> RecordingStatus {
        RecordingStatus {
            recording: self.capture.is_recording(),
            frames: self.capture.len(),
            duration_secs: self.capture.duration_ms() / 1000.0,
        }
    }

    // ── Queries ──

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }

    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    pub fn config(&self) -> &DebuggerConfig {
        &self.config
    }

    pub fn registry(&self) -> &PadRegistry {
        &self.registry
    }

    pub fn capture(&self) -> &CaptureSession {
        &self.capture
    }

    pub fn replay(&self) -> Option<&PlaybackCursor> {
        self.replay.as_ref()
    }

    /// Snapshot summaries, newest first.
    pub fn snapshots(&self) -> &[SnapshotSummary] {
        &self.snapshots
    }

    /// Whether export actions should be enabled.
    pub fn can_export(&self) -> bool {
        !self.capture.is_recording() && !self.capture.is_empty()
    }

    /// Whether the replay action should be enabled.
    pub fn can_replay(&self) -> bool {
        self.can_export() && self.replay.is_none()
    }

    // ── Export ──

    /// The current capture as an exportable recording.
    pub fn recording(&self) -> Result<Recording> {
        if self.capture.is_empty() {
            return Err(Error::EmptyRecording);
        }
        Ok(Recording::new(self.deadzone, self.capture.frames().to_vec()))
    }

    pub fn export_json(&self) -> Result<String> {
        self.recording()?.to_json(self.config.export.pretty_json)
    }

    pub fn export_csv(&self) -> Result<String> {
        Ok(self.recording()?.to_csv())
    }

    /// Write the JSON export into `dir` under the configured file name.
    pub fn save_json(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.config.export.json_file);
        self.recording()?
            .write_json(&path, self.config.export.pretty_json)?;
        Ok(path)
    }

    /// Write the CSV export into `dir` under the configured file name.
    pub fn save_csv(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.config.export.csv_file);
        self.recording()?.write_csv(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualSource;
    use crate::device::RawPad;
    use crate::eventbus::EventCollector;
    use crate::snapshot::DeviceSnapshot;

    fn debugger_with(source: VirtualSource) -> (Debugger, EventCollector) {
        let mut dbg = Debugger::new(source, DebuggerConfig::default()).unwrap();
        let events = EventCollector::new();
        dbg.subscribe(events.clone(), EventFilter::All);
        (dbg, events)
    }

    fn one_pad() -> VirtualSource {
        let mut src = VirtualSource::new();
        src.connect(RawPad::new(0, "Pad 0").with_channels(17, 4));
        src
    }

    #[test]
    fn test_idle_until_started() {
        let (mut dbg, _) = debugger_with(one_pad());
        assert!(dbg.tick(0.0).is_none());
        dbg.submit(Command::Start);
        let out = dbg.tick(16.0).unwrap();
        assert_eq!(out.mode, RenderMode::Live);
        assert!(out.connected);
        assert_eq!(out.pads.len(), 1);
        assert_eq!(dbg.registry().len(), 1);
    }

    #[test]
    fn test_connect_event_emitted_once() {
        let (mut dbg, events) = debugger_with(one_pad());
        dbg.submit(Command::Start);
        dbg.tick(0.0);
        dbg.tick(16.0);
        let connected = events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, DebuggerEvent::PadConnected { .. }))
            .count();
        assert_eq!(connected, 1);
    }

    #[test]
    fn test_pause_stops_output() {
        let (mut dbg, events) = debugger_with(one_pad());
        dbg.submit(Command::Start);
        dbg.tick(0.0);
        dbg.submit(Command::Pause);
        assert!(dbg.tick(16.0).is_none());
        assert!(events.drain().contains(&DebuggerEvent::Paused));
    }

    #[test]
    fn test_toggle_recording() {
        let (mut dbg, _) = debugger_with(one_pad());
        dbg.submit(Command::Start);
        dbg.submit(Command::ToggleRecording);
        dbg.tick(100.0);
        dbg.tick(116.0);
        assert!(dbg.is_recording());
        assert!(!dbg.can_export());

        dbg.submit(Command::ToggleRecording);
        dbg.tick(132.0);
        assert!(!dbg.is_recording());
        assert_eq!(dbg.capture().len(), 2);
        assert_eq!(dbg.capture().frames()[1].t, 16.0);
        assert!(dbg.can_export());
        assert!(dbg.can_replay());
    }

    /// Counts polls so tests can check each tick samples the source once.
    struct CountingSource {
        pads: VirtualSource,
        polls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl InputSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn poll(&mut self) -> Vec<Option<crate::device::RawPad>> {
            self.polls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.pads.poll()
        }

        fn drain_events(&mut self) -> Vec<ConnectionEvent> {
            self.pads.drain_events()
        }
    }

    #[test]
    fn test_recording_tick_samples_once_and_matches_view() {
        let polls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut src = one_pad();
        src.set_axis(0, 0, 0.75);
        let source = CountingSource {
            pads: src,
            polls: polls.clone(),
        };
        let mut dbg = Debugger::new(source, DebuggerConfig::default()).unwrap();
        dbg.submit(Command::Start);
        dbg.submit(Command::StartRecording);
        let views: Vec<_> = [200.0, 216.0, 233.0]
            .iter()
            .map(|&now| dbg.tick(now).unwrap())
            .collect();

        // One poll from Start, then one per tick.
        assert_eq!(polls.load(std::sync::atomic::Ordering::SeqCst), 4);
        let frames = dbg.capture().frames();
        assert_eq!(
            frames.iter().map(|f| f.t).collect::<Vec<_>>(),
            vec![0.0, 16.0, 33.0]
        );
        for (view, frame) in views.iter().zip(frames) {
            assert_eq!(view.pads, project_frame(frame, 0.1));
        }
        assert_eq!(views[2].recording.frames, 3);
    }

    #[test]
    fn test_replay_rejected_while_recording() {
        let (mut dbg, events) = debugger_with(one_pad());
        dbg.submit(Command::Start);
        dbg.submit(Command::StartRecording);
        dbg.tick(0.0);
        dbg.submit(Command::StartReplay);
        dbg.tick(16.0);

        assert!(!dbg.is_replaying());
        assert!(dbg.is_recording());
        assert!(events
            .drain()
            .iter()
            .any(|e| matches!(e, DebuggerEvent::Rejected { .. })));
    }

    #[test]
    fn test_recording_rejected_while_replaying() {
        let (mut dbg, _) = debugger_with(one_pad());
        dbg.submit(Command::Start);
        dbg.submit(Command::StartRecording);
        dbg.tick(0.0);
        dbg.tick(50.0);
        dbg.submit(Command::StopRecording);
        dbg.submit(Command::StartReplay);
        dbg.tick(1000.0);
        assert!(dbg.is_replaying());

        dbg.submit(Command::StartRecording);
        dbg.tick(1010.0);
        assert!(!dbg.is_recording());
        assert_eq!(dbg.capture().len(), 2);
    }

    #[test]
    fn test_replay_without_frames_is_rejected() {
        let (mut dbg, events) = debugger_with(one_pad());
        dbg.submit(Command::Start);
        dbg.submit(Command::StartReplay);
        dbg.tick(0.0);
        assert!(!dbg.is_replaying());
        assert!(events.drain().contains(&DebuggerEvent::Rejected {
            reason: "Nothing recorded yet.".into()
        }));
    }

    #[test]
    fn test_replay_runs_to_completion() {
        let mut src = one_pad();
        src.set_axis(0, 0, 0.0);
        let (mut dbg, events) = debugger_with(src);
        dbg.submit(Command::Start);
        dbg.submit(Command::StartRecording);
        for i in 0..3 {
            dbg.tick(i as f64 * 20.0);
        }
        dbg.submit(Command::StopRecording);
        dbg.submit(Command::StartReplay);

        let first = dbg.tick(500.0).unwrap();
        assert_eq!(first.mode, RenderMode::Replay);
        assert!(dbg.is_replaying());

        let mid = dbg.tick(525.0).unwrap();
        assert_eq!(mid.mode, RenderMode::Replay);
        assert!(dbg.is_replaying());

        dbg.tick(540.0).unwrap();
        assert!(!dbg.is_replaying());
        assert!(events.drain().contains(&DebuggerEvent::ReplayFinished));

        let live = dbg.tick(560.0).unwrap();
        assert_eq!(live.mode, RenderMode::Live);
    }

    #[test]
    fn test_replay_creates_placeholder_pads() {
        let (mut dbg, _) = debugger_with(VirtualSource::new());
        let frame = Frame {
            t: 0.0,
            pads: vec![DeviceSnapshot {
                index: 2,
                id: "Recorded pad".into(),
                mapping: "standard".into(),
                ..Default::default()
            }],
        };
        dbg.capture.start(0.0);
        dbg.capture.append(frame);
        dbg.capture.stop();
        assert!(dbg.registry().is_empty());

        dbg.submit(Command::Start);
        dbg.submit(Command::StartReplay);
        let out = dbg.tick(100.0).unwrap();
        assert!(out.connected);
        assert_eq!(out.mode, RenderMode::Replay);
        assert_eq!(
            dbg.registry().get(2).map(|m| m.id.as_str()),
            Some("Recorded pad")
        );
    }

    #[test]
    fn test_disconnect_removes_pad() {
        let mut src = one_pad();
        src.disconnect(0);
        let (mut dbg, events) = debugger_with(src);
        dbg.submit(Command::Start);
        let out = dbg.tick(0.0).unwrap();

        assert!(!out.connected);
        assert!(dbg.registry().is_empty());
        let drained = events.drain();
        assert!(drained.contains(&DebuggerEvent::PadConnected {
            index: 0,
            id: "Pad 0".into()
        }));
        assert!(drained.contains(&DebuggerEvent::PadDisconnected { index: 0 }));
        assert_eq!(drained.last(), Some(&DebuggerEvent::AllDisconnected));
    }

    #[test]
    fn test_set_deadzone() {
        let (mut dbg, events) = debugger_with(one_pad());
        dbg.submit(Command::SetDeadzone(0.3));
        dbg.submit(Command::SetDeadzone(f32::NAN));
        dbg.tick(0.0);
        assert_eq!(dbg.deadzone(), 0.3);
        let drained = events.drain();
        assert!(drained.contains(&DebuggerEvent::DeadzoneChanged(0.3)));
        assert!(drained
            .iter()
            .any(|e| matches!(e, DebuggerEvent::Rejected { .. })));
    }

    #[test]
    fn test_snapshot_summary() {
        let mut src = one_pad();
        src.press_button(0, 0, 1.0);
        src.press_button(0, 7, 0.5);
        let (mut dbg, _) = debugger_with(src);
        dbg.submit(Command::Snapshot);
        dbg.submit(Command::Snapshot);
        dbg.tick(0.0);

        assert_eq!(dbg.snapshots().len(), 2);
        let snap = &dbg.snapshots()[0];
        assert_eq!(snap.pads, 1);
        assert_eq!(snap.pressed, 2);
        assert_eq!(snap.axes, 4);
    }

    #[test]
    fn test_unsupported_source_notice() {
        let (mut dbg, events) = debugger_with(VirtualSource::unsupported());
        dbg.submit(Command::Start);
        let out = dbg.tick(0.0).unwrap();
        assert!(out.pads.is_empty());
        assert!(!out.connected);
        assert!(events.drain().contains(&DebuggerEvent::Unsupported));
    }

    #[test]
    fn test_export_requires_frames() {
        let (dbg, _) = debugger_with(one_pad());
        assert!(matches!(dbg.export_json(), Err(Error::EmptyRecording)));
        assert!(matches!(dbg.export_csv(), Err(Error::EmptyRecording)));
    }

    #[test]
    fn test_reset() {
        let (mut dbg, _) = debugger_with(one_pad());
        dbg.submit(Command::Start);
        dbg.submit(Command::StartRecording);
        dbg.submit(Command::SetDeadzone(0.4));
        dbg.tick(0.0);
        dbg.reset();

        assert!(!dbg.is_running());
        assert!(!dbg.is_recording());
        assert!(dbg.capture().is_empty());
        assert!(dbg.registry().is_empty());
        assert_eq!(dbg.deadzone(), 0.1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DebuggerConfig {
            deadzone: -1.0,
            ..DebuggerConfig::default()
        };
        assert!(Debugger::new(VirtualSource::new(), config).is_err());
    }
}
