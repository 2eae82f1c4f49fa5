//! Show recording information.

use std::path::PathBuf;

use recreplay::EventClass;

use super::load_recording;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let recording = load_recording(&path)?;

    println!("Recording: {}", path.display());
    println!("  FPS: {}", recording.fps);
    println!("  Frames: {}", recording.len());
    println!("  Duration: {:.2}s", recording.duration_secs());
    println!();

    let classes = recording.recorded_classes();
    if classes.is_empty() {
        println!("Events: none recorded");
        return Ok(());
    }

    println!("Events:");
    for class in EventClass::ALL {
        if !classes.contains(&class) {
            continue;
        }
        println!(
            "  {:<12} {} frame(s) with a value",
            class.name(),
            recording.count_with(class)
        );
    }

    let idle = recording.frames.iter().filter(|f| f.is_idle()).count();
    println!();
    println!("Idle frames: {idle}");

    Ok(())
}
