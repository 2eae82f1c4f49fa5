//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Event class names accepted by default, in capture order.
pub const DEFAULT_EVENTS: [&str; 5] = ["scroll", "mousemove", "keypress", "click", "contextmenu"];

/// Frame rate used when none (or zero) is configured.
pub const DEFAULT_FPS: u32 = 30;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Which interactions to capture and how often.
    pub session: SessionConfig,

    /// Appearance of replay markers.
    pub markers: MarkerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Recording session parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Event class names to capture. Unknown names are reported and skipped
    /// when the set is resolved.
    pub events: Vec<String>,

    /// Frames per second. Zero means "use the default".
    pub fps: u32,
}

/// Visual feedback drawn on the surface during replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Unique id of the synthetic pointer element.
    pub pointer_id: String,
    pub pointer_width: u32,
    pub pointer_height: u32,

    /// Class and color of the click indicator.
    pub click_dot_class: String,
    pub click_dot_color: String,

    /// Class and color of the context-menu indicator.
    pub context_dot_class: String,
    pub context_dot_color: String,

    /// Edge length of a dot in pixels.
    pub dot_size: u32,
    pub dot_opacity: f64,
    pub z_index: i32,

    /// How long a dot stays on the surface.
    pub dot_lifetime_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "recreplay_player=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Include the event target (module path) in text output.
    pub show_targets: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            events: DEFAULT_EVENTS.iter().map(|name| name.to_string()).collect(),
            fps: DEFAULT_FPS,
        }
    }
}

impl SessionConfig {
    /// The frame rate to run at, substituting the default for zero.
    pub fn effective_fps(&self) -> u32 {
        if self.fps == 0 {
            tracing::warn!(default = DEFAULT_FPS, "fps of 0 is not usable, using default");
            DEFAULT_FPS
        } else {
            self.fps
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            pointer_id: "recreplay-pointer".to_string(),
            pointer_width: 14,
            pointer_height: 21,
            click_dot_class: "recreplay-clickdot".to_string(),
            click_dot_color: "red".to_string(),
            context_dot_class: "recreplay-contextdot".to_string(),
            context_dot_color: "blue".to_string(),
            dot_size: 10,
            dot_opacity: 0.6,
            z_index: 999,
            dot_lifetime_ms: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            show_targets: true,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config as pretty JSON at `path`.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("recreplay").join("config.json")
}
