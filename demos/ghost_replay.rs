//! Headless walk-through: record a scripted stick sweep, export it, then watch
//! the ghost replay play it back at the original timing.
//!
//! Run with `RUST_LOG=debug` for the full event trail.

use ghostpad::{
    Command, ConnectionEvent, Debugger, DebuggerConfig, EventFilter, InputSource, Logger, RawPad,
    RenderMode, VirtualSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Moves the left stick around a circle, one step per poll, and pulses `A`.
struct Sweep {
    pads: VirtualSource,
    step: u32,
}

impl InputSource for Sweep {
    fn name(&self) -> &str {
        "sweep"
    }

    fn poll(&mut self) -> Vec<Option<RawPad>> {
        let angle = self.step as f32 * 0.2;
        self.pads.set_axis(0, 0, angle.cos());
        self.pads.set_axis(0, 1, angle.sin());
        if self.step % 10 < 3 {
            self.pads.press_button(0, 0, 1.0);
        } else {
            self.pads.release_button(0, 0);
        }
        self.step += 1;
        self.pads.poll()
    }

    fn drain_events(&mut self) -> Vec<ConnectionEvent> {
        self.pads.drain_events()
    }
}

fn main() -> ghostpad::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut pads = VirtualSource::new();
    pads.connect(
        RawPad::new(0, "Demo pad (Vendor: 045e Product: 028e)")
            .with_mapping("standard")
            .with_channels(17, 4),
    );

    let mut dbg = Debugger::new(Sweep { pads, step: 0 }, DebuggerConfig::default())?;
    dbg.subscribe(Logger::new(), EventFilter::All);
    dbg.submit(Command::Start);
    dbg.submit(Command::StartRecording);

    let mut now = 0.0;
    for _ in 0..30 {
        dbg.tick(now);
        now += FRAME_MS;
    }
    dbg.submit(Command::StopRecording);
    dbg.tick(now);

    println!("{}", dbg.export_csv()?.lines().take(6).collect::<Vec<_>>().join("\n"));

    let dir = std::env::temp_dir();
    let json = dbg.save_json(&dir)?;
    let csv = dbg.save_csv(&dir)?;
    println!("saved {} and {}", json.display(), csv.display());

    dbg.submit(Command::StartReplay);
    let mut replayed = 0;
    loop {
        now += FRAME_MS;
        match dbg.tick(now) {
            Some(view) if view.mode == RenderMode::Replay => {
                replayed += 1;
                if let Some(pad) = view.pads.first() {
                    tracing::debug!(header = %pad.header, stick = %pad.left_stick.coords, "ghost frame");
                }
            }
            _ => break,
        }
    }
    println!("replayed {replayed} ticks of {} recorded frames", dbg.capture().len());
    Ok(())
}
