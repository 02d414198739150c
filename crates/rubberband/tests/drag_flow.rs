//! Integration tests for the full press → drag → release flow.

use std::sync::Arc;

use parking_lot::Mutex;
use rubberband::prelude::*;
use rubberband::{EventKind, InteractionState, ListenerScope, ScrollPosition, intersects};

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rubberband=trace,rubberband_core=trace")
        .with_test_writer()
        .try_init();
}

type Recorder = Arc<Mutex<Vec<Vec<usize>>>>;

fn record(signal: &Signal<Vec<usize>>) -> Recorder {
    let recorder: Recorder = Arc::default();
    let sink = recorder.clone();
    signal.connect(move |indices| sink.lock().push(indices.clone()));
    recorder
}

struct Board {
    scene: Scene,
    surface: ElementId,
    cards: Vec<ElementId>,
}

/// A 500x500 surface at the page origin with two 10x10 cards, one at the
/// origin and one at (300, 100).
fn board() -> Board {
    let mut scene = Scene::new();
    let surface = scene.insert(
        ElementData::new("div").with_class("surface"),
        None,
        Rect::new(0.0, 0.0, 500.0, 500.0),
    );
    let cards = vec![
        scene.insert(
            ElementData::new("div").with_class("card"),
            Some(surface),
            Rect::new(0.0, 0.0, 10.0, 10.0),
        ),
        scene.insert(
            ElementData::new("div").with_class("card"),
            Some(surface),
            Rect::new(300.0, 100.0, 10.0, 10.0),
        ),
    ];
    Board {
        scene,
        surface,
        cards,
    }
}

fn press(selection: &mut DragSelection, board: &Board, x: f32, y: f32) -> Result<(), PressRejection> {
    let mut event = MousePressEvent::new(MouseButton::Left, Point::new(x, y), board.surface);
    selection.on_mouse_press(&mut event, &board.scene)
}

fn drag(selection: &mut DragSelection, board: &Board, x: f32, y: f32) -> bool {
    selection.on_mouse_move(&mut MouseMoveEvent::new(Point::new(x, y)), &board.scene)
}

fn release(selection: &mut DragSelection) -> bool {
    selection.on_mouse_release(&mut MouseReleaseEvent::new(MouseButton::Left, Point::ZERO))
}

#[test]
fn test_intersection_properties() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let far = Rect::new(40.0, 10.0, 10.0, 10.0);
    let overlapping = Rect::new(-5.0, 0.0, 10.0, 10.0);

    assert!(intersects(&a, &a));
    assert!(!intersects(&a, &far));
    assert!(!intersects(&far, &a));
    assert!(intersects(&a, &overlapping));
    assert!(intersects(&overlapping, &a));
}

#[test]
fn test_press_release_without_move() {
    setup();
    let board = board();
    let mut selection = DragSelection::new(ListenerRegistry::new());
    let selections = record(selection.selection_changed());
    let highlights = record(selection.highlight_changed());
    selection.start(SelectionConfig::new(board.surface, board.cards.clone()), &board.scene);

    press(&mut selection, &board, 100.0, 100.0).unwrap();
    assert!(release(&mut selection));

    assert_eq!(*selections.lock(), vec![Vec::<usize>::new()]);
    assert!(highlights.lock().iter().all(|h| h.is_empty()));
}

#[test]
fn test_reverse_drag_box() {
    setup();
    let board = board();
    let mut selection = DragSelection::new(ListenerRegistry::new());
    selection.start(SelectionConfig::new(board.surface, board.cards.clone()), &board.scene);

    press(&mut selection, &board, 100.0, 400.0).unwrap();
    assert_eq!(selection.state().start_point(), Some(Point::new(100.0, 400.0)));

    drag(&mut selection, &board, -400.0, -100.0);
    assert_eq!(
        selection.selection_box(),
        Some(Rect::new(-401.0, -101.0, 501.0, 501.0))
    );
}

#[test]
fn test_only_intersecting_cards_are_selected() {
    setup();
    let board = board();
    let mut selection = DragSelection::new(ListenerRegistry::new());
    let selections = record(selection.selection_changed());
    selection.start(SelectionConfig::new(board.surface, board.cards.clone()), &board.scene);

    // Spans (-1, -1) to (49, 49): card 0 only.
    press(&mut selection, &board, 0.0, 0.0).unwrap();
    drag(&mut selection, &board, 48.0, 48.0);
    assert_eq!(selection.highlighted().get(), vec![0]);
    release(&mut selection);

    assert_eq!(*selections.lock(), vec![vec![0]]);
}

#[test]
fn test_recompute_is_idempotent() {
    setup();
    let board = board();
    let mut selection = DragSelection::new(ListenerRegistry::new());
    let highlights = record(selection.highlight_changed());
    selection.start(SelectionConfig::new(board.surface, board.cards.clone()), &board.scene);

    press(&mut selection, &board, 0.0, 0.0).unwrap();
    drag(&mut selection, &board, 400.0, 400.0);
    selection.recompute(&board.scene);
    selection.recompute(&board.scene);

    assert_eq!(*highlights.lock(), vec![vec![0, 1]]);
}

#[test]
fn test_disable_mid_drag_detaches_document_listeners() {
    setup();
    let board = board();
    let registry = ListenerRegistry::new();
    let mut selection = DragSelection::new(registry.clone());
    let selections = record(selection.selection_changed());
    let config = SelectionConfig::new(board.surface, board.cards.clone());
    selection.start(config.clone(), &board.scene);

    press(&mut selection, &board, 0.0, 0.0).unwrap();
    assert!(registry.is_listening(ListenerScope::Document, EventKind::MouseMove));

    selection.reconfigure(
        config.with_options(SelectionOptions::new().with_disabled(true)),
        &board.scene,
    );
    assert!(!registry.is_listening(ListenerScope::Document, EventKind::MouseMove));
    assert!(!registry.is_listening(ListenerScope::Document, EventKind::MouseUp));

    let before = selection.state().clone();
    assert!(!drag(&mut selection, &board, 200.0, 200.0));
    assert_eq!(selection.state(), &before);
    assert_eq!(selection.state(), &InteractionState::Idle);
    assert!(!release(&mut selection));
    assert!(selections.lock().is_empty());
}

#[test]
fn test_reenable_reattaches_press_listeners_once() {
    setup();
    let board = board();
    let registry = ListenerRegistry::new();
    let mut selection = DragSelection::new(registry.clone());
    let config = SelectionConfig::new(board.surface, board.cards.clone());
    let target = ListenerScope::Target(board.surface);

    selection.start(config.clone(), &board.scene);
    for disabled in [true, true, false, false] {
        let options = SelectionOptions::new().with_disabled(disabled);
        selection.reconfigure(config.clone().with_options(options), &board.scene);
        let expected = usize::from(!disabled);
        assert_eq!(registry.count(target, EventKind::MouseDown), expected);
        assert_eq!(registry.count(target, EventKind::TouchStart), expected);
    }
    assert_eq!(press(&mut selection, &board, 1.0, 1.0), Ok(()));
}

#[test]
fn test_host_delivers_only_to_registered_listeners() {
    setup();
    let board = board();
    let registry = ListenerRegistry::new();
    let mut selection = DragSelection::new(registry.clone());
    let selections = record(selection.selection_changed());
    selection.start(SelectionConfig::new(board.surface, board.cards.clone()), &board.scene);

    let script: Vec<(ListenerScope, InputEvent)> = vec![
        (
            ListenerScope::Document,
            MouseMoveEvent::new(Point::new(5.0, 5.0)).into(),
        ),
        (
            ListenerScope::Target(board.surface),
            MousePressEvent::new(MouseButton::Left, Point::new(290.0, 90.0), board.surface).into(),
        ),
        (
            ListenerScope::Document,
            MouseMoveEvent::new(Point::new(320.0, 120.0)).into(),
        ),
        (
            ListenerScope::Document,
            MouseReleaseEvent::new(MouseButton::Left, Point::new(320.0, 120.0)).into(),
        ),
    ];

    let mut delivered = 0;
    for (scope, mut event) in script {
        if registry.is_listening(scope, event.kind()) {
            delivered += 1;
            assert!(selection.handle_event(&mut event, &board.scene));
        }
    }

    assert_eq!(delivered, 3);
    assert_eq!(*selections.lock(), vec![vec![1]]);
    assert!(registry.is_listening(ListenerScope::Target(board.surface), EventKind::MouseDown));
    assert!(!registry.is_listening(ListenerScope::Document, EventKind::MouseUp));
}

#[test]
fn test_scrolling_keeps_candidates_stable() {
    setup();
    let mut scene = Scene::new();
    let surface = scene.insert(
        ElementData::new("div"),
        None,
        Rect::new(0.0, 200.0, 500.0, 500.0),
    );
    let card = scene.insert(
        ElementData::new("div"),
        Some(surface),
        Rect::new(10.0, 210.0, 10.0, 10.0),
    );

    let mut selection = DragSelection::new(ListenerRegistry::new());
    let highlights = record(selection.highlight_changed());
    selection.start(SelectionConfig::new(surface, [card]), &scene);
    assert_eq!(selection.offset(), Offset::new(200.0, 0.0));

    let mut down = MousePressEvent::new(MouseButton::Left, Point::new(5.0, 205.0), surface);
    selection.on_mouse_press(&mut down, &scene).unwrap();
    selection.on_mouse_move(&mut MouseMoveEvent::new(Point::new(25.0, 225.0)), &scene);
    assert_eq!(selection.selection_box(), Some(Rect::new(4.0, 4.0, 21.0, 21.0)));
    assert_eq!(*highlights.lock(), vec![vec![0]]);

    scene.scroll_by(0.0, 100.0);
    assert_eq!(scene.scroll(), ScrollPosition::new(0.0, 100.0));
    selection.refresh_offset(&scene);
    selection.recompute(&scene);

    assert_eq!(selection.offset(), Offset::new(200.0, 0.0));
    assert_eq!(*highlights.lock(), vec![vec![0]]);
}

#[test]
fn test_ignore_selectors_with_query_fallback() {
    setup();
    let mut board = board();
    let toolbar = board.scene.insert(
        ElementData::new("div").with_class("toolbar"),
        Some(board.surface),
        Rect::new(0.0, 450.0, 500.0, 50.0),
    );
    let button = board.scene.insert(
        ElementData::new("button"),
        Some(toolbar),
        Rect::new(10.0, 460.0, 40.0, 30.0),
    );
    board.scene.set_native_matching(false);

    let mut selection = DragSelection::new(ListenerRegistry::new());
    let options = SelectionOptions::new()
        .with_ignore_target(".toolbar button")
        .with_ignore_target("a >");
    selection.start(
        SelectionConfig::new(board.surface, board.cards.clone()).with_options(options),
        &board.scene,
    );
    assert_eq!(selection.options().map(|o| o.ignore_targets.len()), Some(1));

    let mut on_button =
        MousePressEvent::new(MouseButton::Left, Point::new(20.0, 470.0), board.surface)
            .with_origin(button);
    assert_eq!(
        selection.on_mouse_press(&mut on_button, &board.scene),
        Err(PressRejection::IgnoredTarget)
    );

    let mut on_toolbar =
        MousePressEvent::new(MouseButton::Left, Point::new(200.0, 470.0), board.surface)
            .with_origin(toolbar);
    assert_eq!(selection.on_mouse_press(&mut on_toolbar, &board.scene), Ok(()));
}

#[test]
fn test_options_from_toml() {
    setup();
    let board = board();
    let options = SelectionOptions::from_toml_str(
        r#"
        confine_selection_box = true
        zoom = 0.0
        offset = { top = 0.0, left = 0.0 }
        "#,
    )
    .unwrap();

    let mut selection = DragSelection::new(ListenerRegistry::new());
    selection.start(
        SelectionConfig::new(board.surface, board.cards.clone()).with_options(options),
        &board.scene,
    );
    assert_eq!(selection.options().map(|o| o.zoom.get()), Some(1.0));

    press(&mut selection, &board, 490.0, 490.0).unwrap();
    drag(&mut selection, &board, 900.0, -50.0);
    let rect = selection.selection_box().unwrap();
    assert_eq!(rect.right(), 500.0);
    assert!(rect.left >= -1.0 && rect.top >= -1.0);
    assert!(rect.width >= 1.0 && rect.height >= 1.0);
}

#[test]
fn test_touch_and_mouse_do_not_mix() {
    setup();
    let board = board();
    let registry = ListenerRegistry::new();
    let mut selection = DragSelection::new(registry.clone());
    let selections = record(selection.selection_changed());
    selection.start(SelectionConfig::new(board.surface, board.cards.clone()), &board.scene);

    let mut start = TouchStartEvent::new(vec![TouchPoint::new(7, Point::new(295.0, 95.0))], board.surface);
    selection.on_touch_start(&mut start, &board.scene).unwrap();
    assert!(registry.is_listening(ListenerScope::Document, EventKind::TouchMove));
    assert!(!registry.is_listening(ListenerScope::Document, EventKind::MouseMove));

    assert!(!drag(&mut selection, &board, 0.0, 0.0));
    let mut moved = TouchMoveEvent::new(vec![TouchPoint::new(7, Point::new(305.0, 105.0))]);
    assert!(selection.on_touch_move(&mut moved, &board.scene));
    assert!(!release(&mut selection));
    assert!(selection.on_touch_end(&mut TouchEndEvent::new(vec![])));

    assert_eq!(*selections.lock(), vec![vec![1]]);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_next_frame_delivery_order() {
    setup();
    let board = board();
    let queue = SharedFrameQueue::new();
    let mut selection = DragSelection::new(ListenerRegistry::new())
        .with_strategy(NotifyStrategy::NextFrame(queue.clone()));
    let highlights = record(selection.highlight_changed());
    selection.start(SelectionConfig::new(board.surface, board.cards.clone()), &board.scene);

    press(&mut selection, &board, 0.0, 0.0).unwrap();
    drag(&mut selection, &board, 20.0, 20.0);
    queue.process_all();
    assert_eq!(*highlights.lock(), vec![vec![0]]);

    drag(&mut selection, &board, 400.0, 400.0);
    release(&mut selection);
    assert_eq!(queue.pending_count(), 2);
    queue.process_all();
    assert_eq!(*highlights.lock(), vec![vec![0], vec![0, 1], vec![]]);
}
