//! Visual feedback drawn during replay.

use std::rc::Rc;

use recreplay_common::config::MarkerConfig;
use recreplay_host_core::{Marker, MarkerAppearance, Surface, Timers};
use recreplay_recording_model::frame::Point;

/// Which indicator to draw for a replayed pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotKind {
    Click,
    ContextMenu,
}

/// Move the synthetic pointer to `position`, creating it on first use.
pub fn place_pointer(surface: &dyn Surface, config: &MarkerConfig, position: Point) {
    match surface.marker_by_id(&config.pointer_id) {
        Some(handle) => surface.move_marker(handle, position),
        None => {
            surface.insert_marker(Marker {
                id: Some(config.pointer_id.clone()),
                class_name: None,
                appearance: MarkerAppearance::Pointer,
                position,
                width: config.pointer_width,
                height: config.pointer_height,
                z_index: config.z_index,
                opacity: 1.0,
            });
        }
    }
}

/// Remove the synthetic pointer if one is present.
pub fn remove_pointer(surface: &dyn Surface, config: &MarkerConfig) {
    if let Some(handle) = surface.marker_by_id(&config.pointer_id) {
        surface.remove_marker(handle);
    }
}

/// Draw a dot at `position` and schedule its removal after
/// `config.dot_lifetime_ms`, regardless of what playback does meanwhile.
pub fn add_dot(
    surface: &Rc<dyn Surface>,
    timers: &dyn Timers,
    config: &MarkerConfig,
    kind: DotKind,
    position: Point,
) {
    let (class_name, color) = match kind {
        DotKind::Click => (&config.click_dot_class, &config.click_dot_color),
        DotKind::ContextMenu => (&config.context_dot_class, &config.context_dot_color),
    };

    let handle = surface.insert_marker(Marker {
        id: None,
        class_name: Some(class_name.clone()),
        appearance: MarkerAppearance::Dot {
            color: color.clone(),
        },
        position,
        width: config.dot_size,
        height: config.dot_size,
        z_index: config.z_index,
        opacity: config.dot_opacity,
    });

    let surface = Rc::downgrade(surface);
    timers.set_timeout(
        config.dot_lifetime_ms,
        Box::new(move || {
            if let Some(surface) = surface.upgrade() {
                surface.remove_marker(handle);
            }
        }),
    );
}
