//! Timed raw-event scripts for headless recording.
//!
//! One JSON object per line, e.g.
//! `{"at_ms": 40, "event": "click", "x": 120, "y": 48}`. Blank lines and
//! lines starting with `#` are skipped.

use anyhow::Context;
use serde::Deserialize;

use recreplay::host::headless::{HeadlessDocument, HeadlessSurface};
use recreplay::host::RawEvent;
use recreplay::{Point, ScrollOffset};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ScriptEvent {
    MouseMove { x: i32, y: i32 },
    Click { x: i32, y: i32 },
    ContextMenu { x: i32, y: i32 },
    Scroll { left: i32, top: i32 },
    /// Key down followed by key press (backspace only sends key down).
    Key { code: u32 },
    /// Marks the end of the take; nothing is dispatched.
    End,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptLine {
    pub at_ms: f64,
    #[serde(flatten)]
    pub event: ScriptEvent,
}

impl ScriptLine {
    /// Deliver the event to the headless host.
    pub fn dispatch(&self, surface: &HeadlessSurface, document: &HeadlessDocument) {
        match self.event {
            ScriptEvent::MouseMove { x, y } => surface.dispatch(RawEvent::MouseMove {
                client: Point::new(x, y),
            }),
            ScriptEvent::Click { x, y } => surface.dispatch(RawEvent::Click {
                client: Point::new(x, y),
            }),
            ScriptEvent::ContextMenu { x, y } => surface.dispatch(RawEvent::ContextMenu {
                client: Point::new(x, y),
            }),
            ScriptEvent::Scroll { left, top } => surface.scroll_to(ScrollOffset::new(left, top)),
            ScriptEvent::Key { code } => document.type_key(code),
            ScriptEvent::End => {}
        }
    }
}

/// Parse a script, returning lines ordered by time. Lines with equal times
/// keep their file order.
pub fn parse_script(content: &str) -> anyhow::Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parsed: ScriptLine = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid script line {}", number + 1))?;
        if !parsed.at_ms.is_finite() || parsed.at_ms < 0.0 {
            anyhow::bail!("Script line {} has an invalid time {}", number + 1, parsed.at_ms);
        }
        lines.push(parsed);
    }
    lines.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_skips_comments_and_sorts() {
        let script = r#"
# warm up
{"at_ms": 50, "event": "key", "code": 8}
{"at_ms": 10, "event": "click", "x": 1, "y": 2}

{"at_ms": 10, "event": "scroll", "left": 0, "top": 40}
{"at_ms": 90, "event": "end"}
"#;
        let lines = parse_script(script).unwrap();
        let events: Vec<ScriptEvent> = lines.iter().map(|l| l.event.clone()).collect();
        assert_eq!(
            events,
            vec![
                ScriptEvent::Click { x: 1, y: 2 },
                ScriptEvent::Scroll { left: 0, top: 40 },
                ScriptEvent::Key { code: 8 },
                ScriptEvent::End,
            ]
        );
    }

    #[test]
    fn test_parse_script_reports_line_number() {
        let err = parse_script("{\"at_ms\": 1, \"event\": \"end\"}\n{\"at_ms\": 2, \"event\": \"wheel\"}")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_negative_time_rejected() {
        assert!(parse_script(r#"{"at_ms": -5, "event": "end"}"#).is_err());
    }

    #[test]
    fn test_fixture_script_parses() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fixtures")
            .join("login-script.jsonl");
        let content = std::fs::read_to_string(path).unwrap();
        let lines = parse_script(&content).unwrap();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines.last().map(|l| &l.event), Some(&ScriptEvent::End));
    }
}
