//! Validate a recording file.

use std::path::PathBuf;

use super::load_recording;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating recording at: {}", path.display());

    let recording = load_recording(&path)?;
    println!("  FPS: {}", recording.fps);
    println!("  Frames: {}", recording.len());

    let issues = recording.validate();
    if issues.is_empty() {
        println!("\nRecording is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Affected frames will be skipped during playback.",
            issues.len()
        );
    }

    Ok(())
}
