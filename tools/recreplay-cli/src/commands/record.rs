//! Record a scripted session on a headless surface.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use recreplay::{AppConfig, RecordHooks, Session};

use super::script::{parse_script, ScriptEvent};
use super::HeadlessHost;

pub fn run(
    mut config: AppConfig,
    script: PathBuf,
    output: Option<PathBuf>,
    fps: Option<u32>,
    events: Vec<String>,
    refresh_hz: u32,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let lines = parse_script(&content)?;

    if let Some(fps) = fps {
        config.session.fps = fps;
    }
    if !events.is_empty() {
        config.session.events = events;
    }

    let host = HeadlessHost::new(refresh_hz);
    let session = Session::from_app_config(&config, host.handles());

    println!("Recording script: {}", script.display());
    println!("  Events: {}", session.events().names().join(", "));
    println!("  FPS: {}", session.fps());
    println!("  Script lines: {}", lines.len());
    println!();

    let frames = Rc::new(Cell::new(0usize));
    let counter = frames.clone();
    session
        .recorder()
        .record(RecordHooks::new().on_recording(move || counter.set(counter.get() + 1)));

    let mut ended = false;
    for line in &lines {
        host.run_until(line.at_ms);
        if line.event == ScriptEvent::End {
            ended = true;
            break;
        }
        line.dispatch(&host.surface, &host.document);
    }
    if !ended {
        // Give the last events a frame to land in.
        host.run_until(host.now_ms() + 1000.0 / f64::from(session.fps()));
    }
    host.refresh();
    session.recorder().stop();

    let recording = session.recorder().get_data();
    let output = output.unwrap_or_else(default_output_path);
    recording
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to save recording: {e}"))?;

    println!("Frames recorded: {}", frames.get());
    println!("Duration: {:.2}s", recording.duration_secs());
    println!("Recording saved to: {}", output.display());

    Ok(())
}

fn default_output_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("recording-{stamp}.json"))
}
