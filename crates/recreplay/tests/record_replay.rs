use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use recreplay::host::headless::{HeadlessDocument, HeadlessScheduler, HeadlessSurface, Rect};
use recreplay::host::{Element, RawEvent, RawEventKind, Surface};
use recreplay::{
    EventClass, EventSet, Frame, HostHandles, MarkerConfig, PlaybackHooks, Point, RecordHooks,
    Recording, ScrollOffset, Session, SessionConfig,
};

struct Harness {
    surface: Rc<HeadlessSurface>,
    document: Rc<HeadlessDocument>,
    scheduler: Rc<HeadlessScheduler>,
    session: Session,
}

impl Harness {
    fn new(events: &[&str], fps: u32) -> Self {
        Self::with_surface(HeadlessSurface::new(), events, fps)
    }

    fn with_surface(surface: HeadlessSurface, events: &[&str], fps: u32) -> Self {
        let surface = Rc::new(surface);
        let document = Rc::new(HeadlessDocument::new());
        let scheduler = Rc::new(HeadlessScheduler::new());
        let config = SessionConfig {
            events: events.iter().map(|name| name.to_string()).collect(),
            fps,
        };
        let session = Session::new(
            &config,
            MarkerConfig::default(),
            HostHandles {
                surface: surface.clone(),
                document: document.clone(),
                frames: scheduler.clone(),
                timers: scheduler.clone(),
            },
        );
        Self {
            surface,
            document,
            scheduler,
            session,
        }
    }

    /// One paint per tick at 10 fps.
    fn tick(&self) {
        self.scheduler.run_paints(1, 100.0);
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name)
}

#[test]
fn listeners_match_enabled_classes_for_every_subset() {
    for bits in 0u8..32 {
        let names: Vec<&str> = EventClass::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .map(|(_, class)| class.name())
            .collect();
        let harness = Harness::new(&names, 24);
        let enabled = EventSet::from_names(&names);
        assert_eq!(harness.session.events(), enabled);

        let on = |class| usize::from(enabled.contains(class));
        assert_eq!(harness.surface.listener_count(RawEventKind::Click), on(EventClass::Click));
        assert_eq!(
            harness.surface.listener_count(RawEventKind::ContextMenu),
            on(EventClass::ContextMenu)
        );
        assert_eq!(
            harness.surface.listener_count(RawEventKind::MouseMove),
            on(EventClass::MouseMove)
        );
        assert_eq!(harness.surface.listener_count(RawEventKind::Scroll), on(EventClass::Scroll));
        assert_eq!(
            harness.document.listener_count(RawEventKind::KeyPress),
            on(EventClass::KeyPress)
        );
        for class in EventClass::ALL {
            assert_eq!(
                harness.session.recorder().subscriptions_for(class).is_empty(),
                !enabled.contains(class)
            );
        }
    }
}

#[test]
fn click_only_recording_produces_expected_frames() {
    let harness = Harness::new(&["click"], 10);
    harness.session.recorder().record(RecordHooks::new());

    harness.surface.dispatch(RawEvent::Click {
        client: Point::new(50, 80),
    });
    harness.tick();
    harness.tick();

    let text = harness.session.recorder().get_data_string().unwrap();
    assert_eq!(
        text,
        r#"{"fps":10,"frames":[{"clickX":50,"clickY":80},{"clickX":null,"clickY":null}]}"#
    );
}

#[test]
fn latest_edge_event_in_a_tick_wins() {
    let harness = Harness::new(&["click", "keypress"], 10);
    harness.session.recorder().record(RecordHooks::new());

    for x in [1, 2, 3] {
        harness.surface.dispatch(RawEvent::Click {
            client: Point::new(x, x),
        });
    }
    harness.document.type_key(97);
    harness.document.type_key(98);
    harness.tick();

    assert_eq!(harness.session.recorder().pending().click, None);
    assert_eq!(harness.session.recorder().pending().keypress, None);

    let data = harness.session.recorder().get_data();
    assert_eq!(data.frames[0].click(), Some(Point::new(3, 3)));
    assert_eq!(data.frames[0].key_code(), Some(98));
}

#[test]
fn round_trip_covers_every_class_and_idle_frames() {
    let recording = Recording::with_frames(
        24,
        vec![
            Frame::default(),
            Frame::default()
                .with_click(1, 2)
                .with_context_menu(3, 4)
                .with_mouse(5, 6)
                .with_scroll(0, 700)
                .with_keypress(8),
            Frame {
                click_x: Some(None),
                click_y: Some(None),
                keypress: Some(None),
                ..Frame::default()
            },
        ],
    );

    let text = recording.to_json().unwrap();
    assert_eq!(Recording::from_json(&text).unwrap(), recording);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["frames"][0], serde_json::json!({}));
    assert!(value["frames"][2]["clickX"].is_null());
    assert!(value["frames"][2].get("mouseX").is_none());
}

#[test]
fn scroll_recording_replays_in_order() {
    let harness = Harness::new(&["scroll"], 30);
    let recording = Recording::load(&fixture("scroll-30fps.json")).unwrap();
    assert_eq!(recording.fps, 30);

    let ended = Rc::new(Cell::new(0));
    let on_end = ended.clone();
    harness
        .session
        .player()
        .play(recording, PlaybackHooks::new().on_end(move || on_end.set(on_end.get() + 1)));

    let mut tops = Vec::new();
    for _ in 0..3 {
        harness.tick();
        tops.push(harness.surface.scroll_offset().top);
    }
    assert_eq!(tops, vec![100, 100, 200]);
    assert_eq!(ended.get(), 0);

    harness.tick();
    assert_eq!(ended.get(), 1);
}

#[test]
fn terminal_tick_fires_on_end_once_after_every_frame() {
    let harness = Harness::new(&["mousemove"], 10);
    let frames: Vec<Frame> = (0..7).map(|i| Frame::default().with_mouse(i, i)).collect();
    let log = Rc::new(RefCell::new(Vec::new()));

    let playing_log = log.clone();
    let end_log = log.clone();
    harness.session.player().play(
        Recording::with_frames(10, frames),
        PlaybackHooks::new()
            .on_playing(move || playing_log.borrow_mut().push("playing"))
            .on_end(move || end_log.borrow_mut().push("end")),
    );
    harness.scheduler.run_paints(20, 100.0);

    let log = log.borrow();
    assert_eq!(log.len(), 8);
    assert!(log[..7].iter().all(|entry| *entry == "playing"));
    assert_eq!(log[7], "end");
    assert_eq!(harness.session.player().current_frame_index(), 7);
}

#[test]
fn stop_mid_playback_rewinds_to_first_frame() {
    let harness = Harness::new(&["scroll"], 10);
    let recording = Rc::new(Recording::with_frames(
        10,
        (1..=5).map(|i| Frame::default().with_scroll_top(i * 100)).collect(),
    ));
    let player = harness.session.player();

    player.play(recording.clone(), PlaybackHooks::new());
    harness.tick();
    harness.tick();
    assert_eq!(player.current_frame_index(), 2);

    player.stop();
    assert_eq!(player.current_frame_index(), 0);
    assert_eq!(harness.surface.scroll_offset(), ScrollOffset::new(0, 100));

    player.play(recording, PlaybackHooks::new());
    harness.tick();
    assert_eq!(player.current_frame_index(), 1);
    assert_eq!(harness.surface.scroll_offset().top, 100);
}

#[test]
fn frame_index_boundary() {
    let harness = Harness::new(&["click"], 10);
    let player = harness.session.player();
    player.play(
        Recording::with_frames(10, vec![Frame::default(); 4]),
        PlaybackHooks::new(),
    );
    player.pause();
    assert!(!player.set_frame_index(4));
    assert!(player.set_frame_index(3));
    assert_eq!(player.current_frame_index(), 3);
}

#[test]
fn recorded_session_replays_onto_the_same_surface() {
    let harness = Harness::with_surface(
        HeadlessSurface::with_offset(Point::new(20, 40)),
        &["mousemove", "click", "keypress", "scroll"],
        10,
    );
    let input = harness.surface.add_element("input", Rect::new(0, 0, 400, 60));
    let recorded = Rc::new(Cell::new(0));
    let on_recording = recorded.clone();
    harness
        .session
        .recorder()
        .record(RecordHooks::new().on_recording(move || on_recording.set(on_recording.get() + 1)));

    // Client coordinates; the surface sits at (20, 40).
    harness.surface.dispatch(RawEvent::MouseMove {
        client: Point::new(70, 60),
    });
    harness.surface.dispatch(RawEvent::Click {
        client: Point::new(70, 60),
    });
    harness.tick();
    for key in [104, 105] {
        harness.document.type_key(key);
        harness.tick();
    }
    harness.document.type_key(8);
    harness.tick();
    harness.surface.scroll_to(ScrollOffset::new(0, 250));
    harness.tick();
    assert_eq!(recorded.get(), 5);

    // Reset the page before replaying.
    input.set_value("");
    harness.surface.set_scroll_offset(ScrollOffset::default());

    let ended = Rc::new(Cell::new(false));
    let on_end = ended.clone();
    let recording = harness
        .session
        .replay_take(PlaybackHooks::new().on_end(move || on_end.set(true)));
    assert!(!harness.session.recorder().is_recording());
    assert_eq!(recording.frames.len(), 5);
    assert_eq!(recording.frames[0].click(), Some(Point::new(50, 20)));

    harness.scheduler.run_paints(6, 100.0);
    assert!(ended.get());
    assert!(input.is_focused());
    assert_eq!(input.value(), "h");
    assert_eq!(harness.surface.scroll_offset().top, 250);
    // The last frame moves the pointer before it scrolls.
    assert_eq!(
        harness.surface.marker("recreplay-pointer").map(|m| m.position),
        Some(Point::new(50, 20))
    );
}

#[test]
fn validate_flags_broken_fixture() {
    let recording = Recording::load(&fixture("scroll-30fps.json")).unwrap();
    assert!(recording.validate().is_empty());

    let broken = Recording::from_json(r#"{"fps":0,"frames":[{"clickX":3}]}"#).unwrap();
    assert_eq!(broken.validate().len(), 2);
}
