//! Tracing subscriber setup for the CLI and tests.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::RecreplayResult;

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` overrides `config.level` when set. A subscriber that is already
/// installed is left in place, so calling this twice is harmless.
pub fn init_logging(config: &LoggingConfig) -> RecreplayResult<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    match (&config.file, config.json) {
        (Some(path), json) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = fmt::Subscriber::builder()
                .with_env_filter(filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            if json {
                tracing::subscriber::set_global_default(builder.json().finish()).ok();
            } else {
                tracing::subscriber::set_global_default(builder.finish()).ok();
            }
        }
        (None, true) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter())
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (None, false) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter())
                .with_target(config.show_targets)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logging_creates_parent_dirs() {
        let dir = std::env::temp_dir().join("recreplay_test_logging");
        let _ = std::fs::remove_dir_all(&dir);

        let config = LoggingConfig {
            level: "debug".to_string(),
            json: true,
            show_targets: true,
            file: Some(dir.join("nested").join("recreplay.log")),
        };
        init_logging(&config).unwrap();
        assert!(dir.join("nested").join("recreplay.log").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
