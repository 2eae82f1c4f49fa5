//! The recording wire format: `{ "fps": 30, "frames": [ ... ] }`.

use serde::{Deserialize, Serialize};

use recreplay_common::error::{RecreplayError, RecreplayResult};

use crate::event_class::EventClass;
use crate::frame::Frame;

/// A captured frame sequence together with the rate it was captured at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Frames per second the frames were captured at.
    pub fps: u32,

    /// One entry per clock tick, in capture order.
    pub frames: Vec<Frame>,
}

impl Recording {
    /// An empty recording at `fps`.
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            frames: Vec::new(),
        }
    }

    pub fn with_frames(fps: u32, frames: Vec<Frame>) -> Self {
        Self { fps, frames }
    }

    /// Parse the textual form.
    pub fn from_json(text: &str) -> RecreplayResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> RecreplayResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> RecreplayResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a recording file.
    pub fn load(path: &std::path::Path) -> RecreplayResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| {
            RecreplayError::recording(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Write a recording file as indented JSON, creating parent directories.
    pub fn save(&self, path: &std::path::Path) -> RecreplayResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Nominal playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.fps == 0 {
            return 0.0;
        }
        self.frames.len() as f64 / self.fps as f64
    }

    /// Number of frames carrying a recorded value for `class`.
    pub fn count_with(&self, class: EventClass) -> usize {
        self.frames
            .iter()
            .filter(|frame| frame.has_value(class))
            .count()
    }

    /// Classes whose fields appear in any frame.
    pub fn recorded_classes(&self) -> Vec<EventClass> {
        EventClass::ALL
            .into_iter()
            .filter(|class| self.frames.iter().any(|frame| frame.carries(*class)))
            .collect()
    }

    /// Describe problems that would make frames replay partially or not at
    /// all. An empty list means the recording is fully usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.fps == 0 {
            issues.push("fps is 0; playback will run at 1 frame per second".to_string());
        }

        for (index, frame) in self.frames.iter().enumerate() {
            let pairs = [
                ("click", frame.click_x, frame.click_y),
                ("context", frame.context_x, frame.context_y),
                ("mouse", frame.mouse_x, frame.mouse_y),
            ];
            for (name, x, y) in pairs {
                if x.flatten().is_some() != y.flatten().is_some() {
                    issues.push(format!(
                        "frame {index}: {name} has only one coordinate and will be ignored"
                    ));
                }
            }

            for (axis, value) in [("scrollX", frame.scroll_left()), ("scrollY", frame.scroll_top())]
            {
                if let Some(value) = value.filter(|value| *value < 0) {
                    issues.push(format!("frame {index}: {axis} is negative ({value})"));
                }
            }

            if let Some(code) = frame.key_code() {
                if char::from_u32(code).is_none() {
                    issues.push(format!(
                        "frame {index}: keypress {code} is not a character and will be ignored"
                    ));
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recorded() -> impl Strategy<Value = Option<Option<i32>>> {
        prop_oneof![
            Just(None),
            Just(Some(None)),
            (-5000i32..5000).prop_map(|v| Some(Some(v))),
        ]
    }

    fn frame() -> impl Strategy<Value = Frame> {
        (
            (recorded(), recorded(), recorded(), recorded()),
            (recorded(), recorded(), recorded(), recorded()),
            prop_oneof![
                Just(None),
                Just(Some(None)),
                (0u32..0x10000).prop_map(|v| Some(Some(v))),
            ],
        )
            .prop_map(|((cx, cy, kx, ky), (mx, my, sx, sy), keypress)| Frame {
                click_x: cx,
                click_y: cy,
                context_x: kx,
                context_y: ky,
                mouse_x: mx,
                mouse_y: my,
                scroll_x: sx,
                scroll_y: sy,
                keypress,
            })
    }

    proptest! {
        #[test]
        fn prop_json_roundtrip(fps in 1u32..240, frames in proptest::collection::vec(frame(), 0..40)) {
            let recording = Recording::with_frames(fps, frames);
            let json = recording.to_json().unwrap();
            let parsed = Recording::from_json(&json).unwrap();
            prop_assert_eq!(parsed, recording);
        }
    }

    #[test]
    fn test_top_level_shape() {
        let recording = Recording::with_frames(30, vec![Frame::default().with_scroll_top(100)]);
        let value: serde_json::Value = serde_json::from_str(&recording.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["fps"], 30);
        assert_eq!(object["frames"][0]["scrollY"], 100);
    }

    #[test]
    fn test_parses_handwritten_recording() {
        let raw = r#"{"fps":30,"frames":[{"scrollY":100},{},{"scrollY":200}]}"#;
        let recording = Recording::from_json(raw).unwrap();
        assert_eq!(recording.fps, 30);
        assert_eq!(recording.len(), 3);
        assert_eq!(recording.frames[0].scroll_top(), Some(100));
        assert_eq!(recording.frames[1], Frame::default());
        assert_eq!(recording.frames[2].scroll_top(), Some(200));
    }

    #[test]
    fn test_rejects_malformed_text() {
        assert!(matches!(
            Recording::from_json("{\"fps\":\"fast\"}"),
            Err(RecreplayError::Json(_))
        ));
    }

    #[test]
    fn test_counts_and_classes() {
        let recording = Recording::with_frames(
            10,
            vec![
                Frame::default().with_click(1, 2),
                Frame {
                    click_x: Some(None),
                    click_y: Some(None),
                    ..Frame::default()
                },
                Frame::default().with_click(3, 4).with_keypress(65),
            ],
        );
        assert_eq!(recording.count_with(EventClass::Click), 2);
        assert_eq!(recording.count_with(EventClass::KeyPress), 1);
        assert_eq!(
            recording.recorded_classes(),
            vec![EventClass::KeyPress, EventClass::Click]
        );
        assert!((recording.duration_secs() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_validate_reports_issues() {
        let recording = Recording::with_frames(
            0,
            vec![
                Frame {
                    mouse_x: Some(Some(4)),
                    mouse_y: Some(None),
                    ..Frame::default()
                },
                Frame::default().with_scroll(-3, 0),
                Frame::default().with_keypress(0xD800),
            ],
        );
        let issues = recording.validate();
        assert_eq!(issues.len(), 4);
        assert!(issues[0].contains("fps is 0"));
        assert!(issues[1].contains("frame 0: mouse"));
        assert!(issues[2].contains("scrollX is negative"));
        assert!(issues[3].contains("keypress 55296"));

        assert!(Recording::with_frames(30, vec![Frame::default().with_click(1, 1)])
            .validate()
            .is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("recreplay_test_recording");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("take.json");

        let recording = Recording::with_frames(24, vec![Frame::default().with_mouse(5, 6)]);
        recording.save(&path).unwrap();
        assert_eq!(Recording::load(&path).unwrap(), recording);

        std::fs::remove_dir_all(&dir).ok();
    }
}
