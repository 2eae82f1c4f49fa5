//! Replay a recording on a headless surface.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use recreplay::host::Surface;
use recreplay::{AppConfig, EventClass, PlaybackHooks, Player};

use super::{load_recording, HeadlessHost};

pub async fn run(
    config: AppConfig,
    path: PathBuf,
    realtime: bool,
    refresh_hz: u32,
) -> anyhow::Result<()> {
    let recording = Rc::new(load_recording(&path)?);
    let host = HeadlessHost::new(refresh_hz);
    let player = Player::new(
        host.surface.clone(),
        host.scheduler.clone(),
        host.scheduler.clone(),
        config.markers.clone(),
    );

    println!("Playing: {}", path.display());
    println!(
        "  {} frames @ {}fps ({:.2}s)",
        recording.len(),
        recording.fps,
        recording.duration_secs()
    );
    println!("  Pacing: {}", if realtime { "wall clock" } else { "virtual" });
    println!();

    let rendered = Rc::new(Cell::new(0usize));
    let ended = Rc::new(Cell::new(false));
    let hooks = {
        let rendered = rendered.clone();
        let ended = ended.clone();
        PlaybackHooks::new()
            .on_playing(move || rendered.set(rendered.get() + 1))
            .on_end(move || ended.set(true))
    };
    player.play(recording.clone(), hooks);

    if realtime {
        play_realtime(&host, &player, &ended, refresh_hz).await?;
    } else {
        // Enough refreshes to cover every frame even at a 1 fps floor.
        let per_frame = (f64::from(refresh_hz.max(1)) / f64::from(recording.fps.max(1))).ceil();
        let budget = (recording.len() as f64 + 2.0) * per_frame.max(1.0) + f64::from(refresh_hz);
        let mut refreshes = 0.0;
        while !ended.get() && refreshes < budget {
            host.refresh();
            refreshes += 1.0;
        }
        if !ended.get() {
            tracing::warn!(refreshes, "Playback did not finish within its refresh budget");
        }
    }

    let scroll = host.surface.scroll_offset();
    let pointer = host.surface.marker(&config.markers.pointer_id);

    println!("Frames rendered: {}/{}", rendered.get(), recording.len());
    println!(
        "  Clicks: {}  Context menus: {}  Keypresses: {}",
        recording.count_with(EventClass::Click),
        recording.count_with(EventClass::ContextMenu),
        recording.count_with(EventClass::KeyPress)
    );
    println!("  Final scroll: ({}, {})", scroll.left, scroll.top);
    match pointer {
        Some(marker) => println!(
            "  Pointer: ({}, {})",
            marker.position.x, marker.position.y
        ),
        None => println!("  Pointer: not shown"),
    }
    println!("  Markers on surface: {}", host.surface.markers().len());

    Ok(())
}

async fn play_realtime(
    host: &HeadlessHost,
    player: &Player,
    ended: &Rc<Cell<bool>>,
    refresh_hz: u32,
) -> anyhow::Result<()> {
    let period = Duration::from_secs_f64(1.0 / f64::from(refresh_hz.max(1)));
    let mut interval = tokio::time::interval(period);
    let mut last = tokio::time::Instant::now();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("Press Ctrl+C to stop playback...");
    while !ended.get() {
        tokio::select! {
            now = interval.tick() => {
                let elapsed = now.saturating_duration_since(last);
                last = now;
                host.scheduler.advance(elapsed.as_secs_f64() * 1000.0);
                host.scheduler.paint();
            }
            result = &mut ctrl_c => {
                result?;
                println!();
                tracing::info!(frame = player.current_frame_index(), "Playback interrupted");
                player.stop();
                break;
            }
        }
    }

    Ok(())
}
