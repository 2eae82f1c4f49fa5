pub mod info;
pub mod play;
pub mod record;
pub mod script;
pub mod validate;

use std::path::Path;
use std::rc::Rc;

use recreplay::host::headless::{HeadlessDocument, HeadlessScheduler, HeadlessSurface};
use recreplay::host::AnimationFrames;
use recreplay::{HostHandles, Recording};

/// In-memory host the commands drive in place of a real page.
pub struct HeadlessHost {
    pub surface: Rc<HeadlessSurface>,
    pub document: Rc<HeadlessDocument>,
    pub scheduler: Rc<HeadlessScheduler>,
    refresh_ms: f64,
}

impl HeadlessHost {
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            surface: Rc::new(HeadlessSurface::new()),
            document: Rc::new(HeadlessDocument::new()),
            scheduler: Rc::new(HeadlessScheduler::new()),
            refresh_ms: 1000.0 / f64::from(refresh_hz.max(1)),
        }
    }

    pub fn handles(&self) -> HostHandles {
        HostHandles {
            surface: self.surface.clone(),
            document: self.document.clone(),
            frames: self.scheduler.clone(),
            timers: self.scheduler.clone(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Run one display refresh.
    pub fn refresh(&self) {
        self.scheduler.run_paints(1, self.refresh_ms);
    }

    /// Paint at the refresh rate up to `target_ms`, then move time the rest
    /// of the way without painting.
    pub fn run_until(&self, target_ms: f64) {
        while self.now_ms() + self.refresh_ms <= target_ms {
            self.refresh();
        }
        let remaining = target_ms - self.now_ms();
        if remaining > 0.0 {
            self.scheduler.advance(remaining);
        }
    }
}

pub fn load_recording(path: &Path) -> anyhow::Result<Recording> {
    Recording::load(path)
        .map_err(|e| anyhow::anyhow!("Failed to load recording {}: {e}", path.display()))
}
