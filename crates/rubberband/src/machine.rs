//! The drag-selection interaction state machine.
//!
//! [`DragSelection`] owns the press → drag → release lifecycle:
//!
//! 1. **Press** (primary mouse button or a single touch on the bound target)
//!    records the start point and starts listening for movement on the whole
//!    document, so a drag can leave the target and still be tracked.
//! 2. **Move** rebuilds the selection rectangle and re-runs the collision
//!    engine; the highlighted set is published whenever it changes.
//! 3. **Release** stops listening, publishes the final selection once, and
//!    clears the highlight.
//!
//! Rejected or malformed input never produces an error; at most it produces
//! a [`PressRejection`] reason that callers may inspect or ignore.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use rubberband::prelude::*;
//!
//! let mut scene = Scene::new();
//! let target = scene.insert(ElementData::new("div"), None, Rect::new(0.0, 0.0, 400.0, 400.0));
//! let item = scene.insert(ElementData::new("div"), Some(target), Rect::new(10.0, 10.0, 20.0, 20.0));
//!
//! let mut selection = DragSelection::new(ListenerRegistry::new());
//! let selected = Arc::new(Mutex::new(Vec::new()));
//! let sink = selected.clone();
//! selection.selection_changed().connect(move |indices| *sink.lock() = indices.clone());
//!
//! selection.start(SelectionConfig::new(target, [item]), &scene);
//! selection
//!     .on_mouse_press(&mut MousePressEvent::new(MouseButton::Left, Point::new(0.0, 0.0), target), &scene)
//!     .unwrap();
//! selection.on_mouse_move(&mut MouseMoveEvent::new(Point::new(50.0, 50.0)), &scene);
//! selection.on_mouse_release(&mut MouseReleaseEvent::new(MouseButton::Left, Point::new(50.0, 50.0)));
//!
//! assert_eq!(*selected.lock(), vec![0]);
//! ```

use rubberband_core::logging::{span_names, targets};
use rubberband_core::{NotifyStrategy, PerfSpan, ReadOnlyProperty, Signal};
use rubberband_style::{ElementId, element_matches};

use crate::collision::{CoordinateSpace, HighlightTracker, colliding_indices};
use crate::config::{ResolvedOptions, SelectionConfig};
use crate::geometry::{Point, Rect};
use crate::host::Host;
use crate::input::{
    InputEvent, InputSource, MousePressEvent, MouseMoveEvent, MouseReleaseEvent, TouchEndEvent,
    TouchMoveEvent, TouchStartEvent,
};
use crate::listeners::{EventKind, ListenerRegistry, ListenerScope, ListenerSet};
use crate::normalize::{Offset, compute_offset, normalize};
use crate::selection_box::{Confinement, build_box};

/// A snapshot of an in-progress drag after at least one move.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    /// The device driving the drag.
    pub source: InputSource,
    /// Where the press happened, in selection space.
    pub start: Point,
    /// The latest pointer position, in selection space.
    pub current: Point,
    /// The rectangle spanned by `start` and `current`.
    pub selection_box: Rect,
    /// Candidate indices intersecting `selection_box`, ascending.
    pub intersecting: Vec<usize>,
}

/// Where the machine is in the press/drag/release lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// No press in progress.
    #[default]
    Idle,
    /// A press was accepted; no movement yet.
    Pressed { source: InputSource, start: Point },
    /// The pointer has moved since the press.
    Dragging(DragSnapshot),
}

impl InteractionState {
    /// Whether a press is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The device driving the current press.
    pub fn source(&self) -> Option<InputSource> {
        match self {
            Self::Idle => None,
            Self::Pressed { source, .. } => Some(*source),
            Self::Dragging(drag) => Some(drag.source),
        }
    }

    /// The press position.
    pub fn start_point(&self) -> Option<Point> {
        match self {
            Self::Idle => None,
            Self::Pressed { start, .. } => Some(*start),
            Self::Dragging(drag) => Some(drag.start),
        }
    }

    /// The latest drag position.
    pub fn current_point(&self) -> Option<Point> {
        match self {
            Self::Dragging(drag) => Some(drag.current),
            _ => None,
        }
    }

    /// The selection rectangle; present only once both points are known.
    pub fn selection_box(&self) -> Option<Rect> {
        match self {
            Self::Dragging(drag) => Some(drag.selection_box),
            _ => None,
        }
    }

    /// Candidates intersecting the selection rectangle.
    pub fn intersecting(&self) -> &[usize] {
        match self {
            Self::Dragging(drag) => &drag.intersecting,
            _ => &[],
        }
    }
}

/// Why a press did not start a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PressRejection {
    /// The machine is not configured, or not listening on that element.
    #[error("selection is not bound to this target")]
    NotBound,
    /// The machine is disabled.
    #[error("selection is disabled")]
    Disabled,
    /// Only the primary mouse button starts a selection.
    #[error("press used a non-primary button")]
    NonPrimaryButton,
    /// A touch start must carry exactly one contact.
    #[error("touch start must have exactly one contact")]
    MalformedTouch,
    /// The press landed on an element matching an ignore selector.
    #[error("press landed on an ignored element")]
    IgnoredTarget,
}

#[derive(Debug)]
struct Binding {
    target: ElementId,
    elements: Vec<Option<ElementId>>,
    options: ResolvedOptions,
}

/// Rectangular drag selection over a host document.
///
/// The machine is inert until [`start`](Self::start) binds it to a target.
/// The host then forwards input through [`handle_event`](Self::handle_event)
/// or the typed `on_*` handlers, and observes results through
/// [`selection_changed`](Self::selection_changed) and
/// [`highlight_changed`](Self::highlight_changed).
pub struct DragSelection {
    registry: ListenerRegistry,
    strategy: NotifyStrategy,
    binding: Option<Binding>,
    offset: Offset,
    state: InteractionState,
    press_listeners: Option<ListenerSet>,
    drag_listeners: Option<ListenerSet>,
    highlight: HighlightTracker,
    selection_changed: Signal<Vec<usize>>,
}

impl DragSelection {
    /// Create an unbound machine registering its listeners in `registry`.
    pub fn new(registry: ListenerRegistry) -> Self {
        Self {
            registry,
            strategy: NotifyStrategy::default(),
            binding: None,
            offset: Offset::ZERO,
            state: InteractionState::Idle,
            press_listeners: None,
            drag_listeners: None,
            highlight: HighlightTracker::new(),
            selection_changed: Signal::new(),
        }
    }

    /// Set how highlight notifications are delivered.
    pub fn with_strategy(mut self, strategy: NotifyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Change how highlight notifications are delivered.
    pub fn set_strategy(&mut self, strategy: NotifyStrategy) {
        self.strategy = strategy;
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bind to a target and begin accepting presses.
    ///
    /// Calling `start` on a machine that is already bound behaves like
    /// [`reconfigure`](Self::reconfigure).
    pub fn start<H: Host + ?Sized>(&mut self, config: SelectionConfig, host: &H) {
        tracing::debug!(target: targets::MACHINE, target_element = ?config.target, "starting");
        self.reconfigure(config, host);
    }

    /// Like [`start`](Self::start), but refuses options that
    /// [`start`](Self::start) would correct, such as a zero zoom or an
    /// unparsable ignore selector. Nothing changes on error.
    pub fn try_start<H: Host + ?Sized>(
        &mut self,
        config: SelectionConfig,
        host: &H,
    ) -> rubberband_core::Result<()> {
        config.options.validate()?;
        self.start(config, host);
        Ok(())
    }

    /// Apply a new configuration.
    ///
    /// Press listeners are replaced (detach, then attach) only when the
    /// target or the disabled flag changes. Disabling or retargeting during
    /// a drag abandons the drag without publishing a selection. Otherwise an
    /// active drag is re-evaluated against the new candidates and container.
    pub fn reconfigure<H: Host + ?Sized>(&mut self, config: SelectionConfig, host: &H) {
        let _perf = PerfSpan::new("reconfigure");
        let options = config.options.resolve();
        let previous = self.binding.take();
        let target_changed = previous.as_ref().is_none_or(|b| b.target != config.target);
        let disabled_changed = previous
            .as_ref()
            .is_none_or(|b| b.options.disabled != options.disabled);

        if target_changed {
            self.interrupt("target changed");
        } else if options.disabled {
            self.interrupt("disabled");
        }
        if target_changed || disabled_changed {
            self.rebind(config.target, options.disabled);
        }

        self.binding = Some(Binding {
            target: config.target,
            elements: config.elements,
            options,
        });
        self.refresh_offset(host);

        if self.state.is_active() {
            self.recompute(host);
        }
    }

    /// Unbind: abandon any drag and detach every listener.
    pub fn stop(&mut self) {
        self.interrupt("stopped");
        if let Some(listeners) = self.press_listeners.take() {
            listeners.detach();
        }
        self.binding = None;
        tracing::debug!(target: targets::MACHINE, "stopped");
    }

    /// Re-measure the container offset.
    ///
    /// Hosts call this after the container moves or the document scrolls.
    pub fn refresh_offset<H: Host + ?Sized>(&mut self, host: &H) {
        let Some(binding) = &self.binding else {
            return;
        };
        self.offset = compute_offset(
            binding.options.offset,
            host.element_rect(binding.target),
            host.scroll(),
        );
        tracing::trace!(target: targets::MACHINE, offset = ?self.offset, "offset refreshed");
    }

    /// Re-run collision for the current selection rectangle.
    ///
    /// Useful when candidates moved without any pointer movement. Publishes
    /// a highlight only if the intersecting set changed.
    pub fn recompute<H: Host + ?Sized>(&mut self, host: &H) {
        let InteractionState::Dragging(drag) = &self.state else {
            return;
        };
        let (start, current) = (drag.start, drag.current);
        self.update_drag(start, current, host);
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle any input event. Returns `true` if the event was consumed.
    pub fn handle_event<H: Host + ?Sized>(&mut self, event: &mut InputEvent, host: &H) -> bool {
        let _span =
            tracing::trace_span!(target: targets::MACHINE, span_names::INPUT, kind = ?event.kind())
                .entered();
        match event {
            InputEvent::MousePress(e) => self.on_mouse_press(e, host).is_ok(),
            InputEvent::TouchStart(e) => self.on_touch_start(e, host).is_ok(),
            InputEvent::MouseMove(e) => self.on_mouse_move(e, host),
            InputEvent::TouchMove(e) => self.on_touch_move(e, host),
            InputEvent::MouseRelease(e) => self.on_mouse_release(e),
            InputEvent::TouchEnd(e) => self.on_touch_end(e),
        }
    }

    /// Handle a mouse press on the bound target.
    pub fn on_mouse_press<H: Host + ?Sized>(
        &mut self,
        event: &mut MousePressEvent,
        host: &H,
    ) -> Result<(), PressRejection> {
        let outcome = self
            .check_press(event.current_target, EventKind::MouseDown)
            .and_then(|()| {
                if event.button.is_primary() {
                    Ok(())
                } else {
                    Err(PressRejection::NonPrimaryButton)
                }
            })
            .and_then(|()| self.begin(InputSource::Mouse, event.page_pos, event.origin, host));
        log_press(InputSource::Mouse, outcome)
    }

    /// Handle a touch start on the bound target.
    pub fn on_touch_start<H: Host + ?Sized>(
        &mut self,
        event: &mut TouchStartEvent,
        host: &H,
    ) -> Result<(), PressRejection> {
        let outcome = self
            .check_press(event.current_target, EventKind::TouchStart)
            .and_then(|()| match event.touches.as_slice() {
                [touch] => Ok(touch.page_pos),
                _ => Err(PressRejection::MalformedTouch),
            })
            .and_then(|page| self.begin(InputSource::Touch, page, event.origin, host));
        log_press(InputSource::Touch, outcome)
    }

    /// Handle mouse movement. Returns `true` if the drag was updated.
    pub fn on_mouse_move<H: Host + ?Sized>(&mut self, event: &mut MouseMoveEvent, host: &H) -> bool {
        if !self.listening_for(EventKind::MouseMove) {
            return false;
        }
        event.base.prevent_default();
        self.drag_to(event.page_pos, host)
    }

    /// Handle touch movement. Returns `true` if the drag was updated.
    ///
    /// Only the first contact is tracked.
    pub fn on_touch_move<H: Host + ?Sized>(&mut self, event: &mut TouchMoveEvent, host: &H) -> bool {
        if !self.listening_for(EventKind::TouchMove) {
            return false;
        }
        event.base.prevent_default();
        let Some(touch) = event.touches.first() else {
            tracing::trace!(target: targets::MACHINE, "touch move without contacts ignored");
            return false;
        };
        self.drag_to(touch.page_pos, host)
    }

    /// Handle a mouse button release. Returns `true` if a drag finished.
    pub fn on_mouse_release(&mut self, _event: &mut MouseReleaseEvent) -> bool {
        self.finish(EventKind::MouseUp)
    }

    /// Handle a touch end. Returns `true` if a drag finished.
    pub fn on_touch_end(&mut self, _event: &mut TouchEndEvent) -> bool {
        self.finish(EventKind::TouchEnd)
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Emitted once per completed drag with the selected indices.
    pub fn selection_changed(&self) -> &Signal<Vec<usize>> {
        &self.selection_changed
    }

    /// Emitted whenever the highlighted indices change, through the
    /// configured [`NotifyStrategy`].
    pub fn highlight_changed(&self) -> &Signal<Vec<usize>> {
        self.highlight.changed()
    }

    /// The last published highlight.
    pub fn highlighted(&self) -> ReadOnlyProperty<'_, Vec<usize>> {
        self.highlight.published()
    }

    /// The current interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Whether a press is in progress.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Whether press listeners are attached.
    pub fn is_bound(&self) -> bool {
        self.press_listeners.is_some()
    }

    /// The current selection rectangle, in selection space.
    pub fn selection_box(&self) -> Option<Rect> {
        self.state.selection_box()
    }

    /// The rectangle a presentation layer should draw, if any.
    ///
    /// Nothing is drawn until the pointer has moved after a press.
    pub fn visible_box(&self) -> Option<Rect> {
        match &self.state {
            InteractionState::Dragging(drag) => Some(drag.selection_box),
            _ => None,
        }
    }

    /// The container offset in use.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// The bound target.
    pub fn target(&self) -> Option<ElementId> {
        self.binding.as_ref().map(|b| b.target)
    }

    /// The resolved options, if bound.
    pub fn options(&self) -> Option<&ResolvedOptions> {
        self.binding.as_ref().map(|b| &b.options)
    }

    /// The listener registry this machine registers in.
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn rebind(&mut self, target: ElementId, disabled: bool) {
        if let Some(listeners) = self.press_listeners.take() {
            listeners.detach();
        }
        if disabled {
            tracing::trace!(target: targets::MACHINE, ?target, "disabled, press listeners not attached");
            return;
        }
        self.press_listeners = Some(ListenerSet::attach(
            &self.registry,
            ListenerScope::Target(target),
            &[EventKind::MouseDown, EventKind::TouchStart],
        ));
    }

    fn check_press(&self, current_target: ElementId, kind: EventKind) -> Result<(), PressRejection> {
        let binding = self.binding.as_ref().ok_or(PressRejection::NotBound)?;
        if binding.options.disabled {
            return Err(PressRejection::Disabled);
        }
        let listening = self
            .press_listeners
            .as_ref()
            .is_some_and(|l| l.covers(ListenerScope::Target(current_target), kind));
        if listening {
            Ok(())
        } else {
            Err(PressRejection::NotBound)
        }
    }

    fn begin<H: Host + ?Sized>(
        &mut self,
        source: InputSource,
        page: Point,
        origin: Option<ElementId>,
        host: &H,
    ) -> Result<(), PressRejection> {
        let binding = self.binding.as_ref().ok_or(PressRejection::NotBound)?;
        if let Some(origin) = origin
            && element_matches(host, origin, &binding.options.ignore_targets)
        {
            return Err(PressRejection::IgnoredTarget);
        }
        let start = normalize(page, self.offset, binding.options.zoom);

        let current = self.state.current_point();
        if self.state.is_active() {
            tracing::debug!(target: targets::MACHINE, "press during drag moves its start");
        }
        if let Some(listeners) = self.drag_listeners.take() {
            listeners.detach();
        }
        self.drag_listeners = Some(ListenerSet::attach(
            &self.registry,
            ListenerScope::Document,
            &source.drag_events(),
        ));
        self.state = InteractionState::Pressed { source, start };

        // An interrupted drag keeps its pointer; the box now spans from the
        // new start so the highlight stays in step with it.
        if let Some(current) = current {
            self.update_drag(start, current, host);
        }
        Ok(())
    }

    fn listening_for(&self, kind: EventKind) -> bool {
        self.drag_listeners
            .as_ref()
            .is_some_and(|l| l.covers(ListenerScope::Document, kind))
    }

    fn drag_to<H: Host + ?Sized>(&mut self, page: Point, host: &H) -> bool {
        let (Some(start), Some(binding)) = (self.state.start_point(), self.binding.as_ref()) else {
            return false;
        };
        let current = normalize(page, self.offset, binding.options.zoom);
        self.update_drag(start, current, host)
    }

    fn update_drag<H: Host + ?Sized>(&mut self, start: Point, current: Point, host: &H) -> bool {
        let (Some(source), Some(binding)) = (self.state.source(), self.binding.as_ref()) else {
            return false;
        };
        let selection_box = build_box(start, current, self.confinement(binding, host));
        let space = CoordinateSpace::new(self.offset, host.scroll(), binding.options.zoom);
        let intersecting = colliding_indices(&selection_box, &binding.elements, &space, host);
        tracing::trace!(target: targets::MACHINE, ?selection_box, "selection box rebuilt");

        self.state = InteractionState::Dragging(DragSnapshot {
            source,
            start,
            current,
            selection_box,
            intersecting: intersecting.clone(),
        });
        self.highlight.publish(intersecting, &self.strategy);
        true
    }

    fn confinement<H: Host + ?Sized>(&self, binding: &Binding, host: &H) -> Confinement {
        if !binding.options.confine_selection_box {
            return Confinement::Free;
        }
        let size = host.client_size(binding.target).or_else(|| {
            host.element_rect(binding.target)
                .map(|rect| rect.size().scale_down(binding.options.zoom.get()))
        });
        match size {
            Some(size) => Confinement::Container(size),
            None => {
                tracing::trace!(target: targets::MACHINE, "container has no layout, box not confined");
                Confinement::Free
            }
        }
    }

    fn finish(&mut self, kind: EventKind) -> bool {
        if !self.listening_for(kind) {
            return false;
        }
        if let Some(listeners) = self.drag_listeners.take() {
            listeners.detach();
        }
        let selected = match std::mem::take(&mut self.state) {
            InteractionState::Dragging(drag) => drag.intersecting,
            _ => Vec::new(),
        };
        tracing::debug!(target: targets::MACHINE, ?selected, "selection finished");
        self.selection_changed.emit(selected);
        self.highlight.clear(&self.strategy);
        true
    }

    /// Abandon any drag without publishing a selection.
    fn interrupt(&mut self, reason: &'static str) {
        if let Some(listeners) = self.drag_listeners.take() {
            listeners.detach();
        }
        if self.state.is_active() {
            tracing::debug!(target: targets::MACHINE, reason, "drag abandoned");
        }
        self.state = InteractionState::Idle;
        self.highlight.clear(&self.strategy);
    }
}

impl std::fmt::Debug for DragSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSelection")
            .field("binding", &self.binding)
            .field("offset", &self.offset)
            .field("state", &self.state)
            .field("bound", &self.is_bound())
            .field("highlight", &self.highlight)
            .finish()
    }
}

fn log_press(
    source: InputSource,
    outcome: Result<(), PressRejection>,
) -> Result<(), PressRejection> {
    match &outcome {
        Ok(()) => tracing::debug!(target: targets::MACHINE, ?source, "press accepted"),
        Err(reason) => tracing::debug!(target: targets::MACHINE, ?source, %reason, "press rejected"),
    }
    outcome
}

static_assertions::assert_impl_all!(DragSelection: Send);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use rubberband_core::SharedFrameQueue;
    use rubberband_style::ElementData;

    use super::*;
    use crate::config::SelectionOptions;
    use crate::geometry::Size;
    use crate::input::{MouseButton, TouchPoint};
    use crate::scene::Scene;

    type Log = Arc<Mutex<Vec<Vec<usize>>>>;

    struct Fixture {
        scene: Scene,
        target: ElementId,
        items: Vec<ElementId>,
        machine: DragSelection,
        selections: Log,
        highlights: Log,
    }

    impl Fixture {
        /// A 500x500 container at the page origin with three 10x10 items.
        fn new() -> Self {
            let mut scene = Scene::new();
            let target = scene.insert(
                ElementData::new("div").with_id("surface"),
                None,
                Rect::new(0.0, 0.0, 500.0, 500.0),
            );
            let items = [(0.0, 0.0), (300.0, 100.0), (40.0, 40.0)]
                .into_iter()
                .map(|(left, top)| {
                    scene.insert(
                        ElementData::new("div").with_class("item"),
                        Some(target),
                        Rect::new(left, top, 10.0, 10.0),
                    )
                })
                .collect();

            let machine = DragSelection::new(ListenerRegistry::new());
            let selections: Log = Arc::default();
            let highlights: Log = Arc::default();
            let sink = selections.clone();
            machine
                .selection_changed()
                .connect(move |v| sink.lock().push(v.clone()));
            let sink = highlights.clone();
            machine
                .highlight_changed()
                .connect(move |v| sink.lock().push(v.clone()));

            Self {
                scene,
                target,
                items,
                machine,
                selections,
                highlights,
            }
        }

        fn config(&self, options: SelectionOptions) -> SelectionConfig {
            SelectionConfig::new(self.target, self.items.clone()).with_options(options)
        }

        fn start(&mut self, options: SelectionOptions) {
            let config = self.config(options);
            self.machine.start(config, &self.scene);
        }

        fn press(&mut self, x: f32, y: f32) -> Result<(), PressRejection> {
            let mut event = MousePressEvent::new(MouseButton::Left, Point::new(x, y), self.target);
            self.machine.on_mouse_press(&mut event, &self.scene)
        }

        fn move_to(&mut self, x: f32, y: f32) -> bool {
            let mut event = MouseMoveEvent::new(Point::new(x, y));
            self.machine.on_mouse_move(&mut event, &self.scene)
        }

        fn release(&mut self) -> bool {
            let mut event = MouseReleaseEvent::new(MouseButton::Left, Point::ZERO);
            self.machine.on_mouse_release(&mut event)
        }

        fn document_listeners(&self) -> usize {
            let registry = self.machine.registry();
            [
                EventKind::MouseMove,
                EventKind::MouseUp,
                EventKind::TouchMove,
                EventKind::TouchEnd,
            ]
            .into_iter()
            .map(|kind| registry.count(ListenerScope::Document, kind))
            .sum()
        }
    }

    #[test]
    fn test_unbound_machine_rejects_press() {
        let mut fx = Fixture::new();
        assert_eq!(fx.press(1.0, 1.0), Err(PressRejection::NotBound));
        assert!(!fx.machine.is_bound());
    }

    #[test]
    fn test_start_attaches_press_listeners_once() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        let target = ListenerScope::Target(fx.target);
        let registry = fx.machine.registry().clone();
        assert_eq!(registry.count(target, EventKind::MouseDown), 1);
        assert_eq!(registry.count(target, EventKind::TouchStart), 1);

        // Reconfiguring with the same target and disabled flag keeps them.
        let config = fx.config(SelectionOptions::default());
        fx.machine.reconfigure(config, &fx.scene);
        assert_eq!(registry.count(target, EventKind::MouseDown), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_press_move_release() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());

        fx.press(100.0, 400.0).unwrap();
        assert_eq!(fx.machine.state().start_point(), Some(Point::new(100.0, 400.0)));
        assert_eq!(fx.machine.selection_box(), None);
        assert_eq!(fx.document_listeners(), 2);

        assert!(fx.move_to(-400.0, -100.0));
        assert_eq!(
            fx.machine.selection_box(),
            Some(Rect::new(-401.0, -101.0, 501.0, 501.0))
        );
        assert_eq!(fx.machine.state().intersecting(), &[0, 2]);

        assert!(fx.release());
        assert!(!fx.machine.is_active());
        assert_eq!(fx.machine.selection_box(), None);
        assert_eq!(fx.document_listeners(), 0);
        assert_eq!(*fx.selections.lock(), vec![vec![0, 2]]);
        assert_eq!(*fx.highlights.lock(), vec![vec![0, 2], vec![]]);
    }

    #[test]
    fn test_press_release_without_move_selects_nothing() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(5.0, 5.0).unwrap();
        assert!(fx.release());
        assert_eq!(*fx.selections.lock(), vec![Vec::<usize>::new()]);
        assert!(fx.highlights.lock().is_empty());
    }

    #[test]
    fn test_non_primary_button_rejected() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        let mut event = MousePressEvent::new(MouseButton::Right, Point::ZERO, fx.target);
        assert_eq!(
            fx.machine.on_mouse_press(&mut event, &fx.scene),
            Err(PressRejection::NonPrimaryButton)
        );
        assert!(!fx.machine.is_active());
        assert_eq!(fx.document_listeners(), 0);
    }

    #[test]
    fn test_press_on_other_element_is_not_bound() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        let elsewhere = fx.items[0];
        let mut event = MousePressEvent::new(MouseButton::Left, Point::ZERO, elsewhere);
        assert_eq!(
            fx.machine.on_mouse_press(&mut event, &fx.scene),
            Err(PressRejection::NotBound)
        );
    }

    #[test]
    fn test_disabled_rejects_and_detaches() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::new().with_disabled(true));
        assert!(!fx.machine.is_bound());
        assert!(fx.machine.registry().is_empty());
        assert_eq!(fx.press(1.0, 1.0), Err(PressRejection::Disabled));
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        let mut event = MouseMoveEvent::new(Point::new(10.0, 10.0));
        assert!(!fx.machine.on_mouse_move(&mut event, &fx.scene));
        assert!(!event.base.is_default_prevented());
        assert!(!fx.release());
        assert!(fx.selections.lock().is_empty());
    }

    #[test]
    fn test_move_prevents_default() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        let mut event = MouseMoveEvent::new(Point::new(10.0, 10.0));
        assert!(fx.machine.on_mouse_move(&mut event, &fx.scene));
        assert!(event.base.is_default_prevented());
    }

    #[test]
    fn test_repeated_moves_publish_only_changes() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        fx.move_to(5.0, 5.0);
        fx.move_to(6.0, 6.0);
        fx.move_to(45.0, 45.0);
        fx.move_to(46.0, 46.0);
        fx.machine.recompute(&fx.scene);
        assert_eq!(*fx.highlights.lock(), vec![vec![0], vec![0, 2]]);
    }

    #[test]
    fn test_ignored_origin_rejects_press() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::new().with_ignore_target(".item"));
        let item = fx.items[1];
        let mut event =
            MousePressEvent::new(MouseButton::Left, Point::ZERO, fx.target).with_origin(item);
        assert_eq!(
            fx.machine.on_mouse_press(&mut event, &fx.scene),
            Err(PressRejection::IgnoredTarget)
        );
        assert_eq!(fx.press(0.0, 0.0), Ok(()));
    }

    #[test]
    fn test_zoom_and_offset_normalize_points() {
        let mut fx = Fixture::new();
        fx.start(
            SelectionOptions::new()
                .with_zoom(2.0)
                .with_offset(Offset::new(10.0, 20.0)),
        );
        assert_eq!(fx.machine.offset(), Offset::new(10.0, 20.0));
        fx.press(120.0, 50.0).unwrap();
        assert_eq!(fx.machine.state().start_point(), Some(Point::new(50.0, 20.0)));
    }

    #[test]
    fn test_confined_box_stays_in_container() {
        let mut fx = Fixture::new();
        fx.scene.set_client_size(fx.target, Size::new(500.0, 500.0));
        fx.start(SelectionOptions::new().with_confinement(true));
        fx.press(450.0, 450.0).unwrap();
        fx.move_to(2000.0, 2000.0);
        let rect = fx.machine.selection_box().unwrap();
        assert_eq!(rect, Rect::new(449.0, 449.0, 51.0, 51.0));
    }

    #[test]
    fn test_confinement_without_client_size_uses_unzoomed_rect() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::new().with_confinement(true).with_zoom(2.0));
        fx.press(200.0, 200.0).unwrap();
        fx.move_to(2000.0, 2000.0);

        // 500 rendered at zoom 2 confines to 250.
        let rect = fx.machine.selection_box().unwrap();
        assert_eq!(rect, Rect::new(99.0, 99.0, 151.0, 151.0));
    }

    #[test]
    fn test_touch_drag() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());

        let mut two = TouchStartEvent::new(
            vec![
                TouchPoint::new(1, Point::ZERO),
                TouchPoint::new(2, Point::new(5.0, 5.0)),
            ],
            fx.target,
        );
        assert_eq!(
            fx.machine.on_touch_start(&mut two, &fx.scene),
            Err(PressRejection::MalformedTouch)
        );
        let mut none = TouchStartEvent::new(vec![], fx.target);
        assert_eq!(
            fx.machine.on_touch_start(&mut none, &fx.scene),
            Err(PressRejection::MalformedTouch)
        );

        let mut start = TouchStartEvent::new(vec![TouchPoint::new(1, Point::ZERO)], fx.target);
        fx.machine.on_touch_start(&mut start, &fx.scene).unwrap();

        // Mouse movement does not drive a touch drag.
        assert!(!fx.move_to(50.0, 50.0));

        let mut touch_move = TouchMoveEvent::new(vec![TouchPoint::new(1, Point::new(20.0, 20.0))]);
        assert!(fx.machine.on_touch_move(&mut touch_move, &fx.scene));
        assert!(touch_move.base.is_default_prevented());

        let mut empty_move = TouchMoveEvent::new(vec![]);
        assert!(!fx.machine.on_touch_move(&mut empty_move, &fx.scene));

        assert!(!fx.release(), "mouse up does not end a touch drag");
        let mut end = TouchEndEvent::new(vec![]);
        assert!(fx.machine.on_touch_end(&mut end));
        assert_eq!(*fx.selections.lock(), vec![vec![0]]);
    }

    #[test]
    fn test_disable_mid_drag_discards() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        fx.move_to(20.0, 20.0);
        assert_eq!(*fx.highlights.lock(), vec![vec![0]]);

        let config = fx.config(SelectionOptions::new().with_disabled(true));
        fx.machine.reconfigure(config, &fx.scene);
        assert!(!fx.machine.is_active());
        assert!(fx.machine.registry().is_empty());
        assert!(!fx.move_to(100.0, 100.0));
        assert_eq!(fx.machine.state(), &InteractionState::Idle);
        assert!(fx.selections.lock().is_empty());
        assert_eq!(*fx.highlights.lock(), vec![vec![0], vec![]]);
    }

    #[test]
    fn test_reconfigure_mid_drag_recomputes() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        fx.move_to(20.0, 20.0);

        // Move item 1 under the rectangle and drop item 0 from the list.
        fx.scene.set_rect(fx.items[1], Rect::new(15.0, 15.0, 10.0, 10.0));
        let config = SelectionConfig::new(fx.target, fx.items.clone())
            .with_element_slots(vec![None, Some(fx.items[1]), Some(fx.items[2])]);
        fx.machine.reconfigure(config, &fx.scene);

        assert!(fx.machine.is_active());
        assert_eq!(fx.machine.state().intersecting(), &[1]);
        assert_eq!(*fx.highlights.lock(), vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_retarget_rebinds_exactly_once() {
        let mut fx = Fixture::new();
        let other = fx.scene.insert(
            ElementData::new("div"),
            None,
            Rect::new(600.0, 0.0, 100.0, 100.0),
        );
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();

        let config = SelectionConfig::new(other, fx.items.clone());
        fx.machine.reconfigure(config, &fx.scene);

        let registry = fx.machine.registry().clone();
        assert!(!fx.machine.is_active());
        assert_eq!(registry.count(ListenerScope::Target(fx.target), EventKind::MouseDown), 0);
        assert_eq!(registry.count(ListenerScope::Target(other), EventKind::MouseDown), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(fx.machine.offset(), Offset::new(0.0, 600.0));
    }

    #[test]
    fn test_stop_detaches_everything() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        fx.machine.stop();
        assert!(fx.machine.registry().is_empty());
        assert_eq!(fx.machine.target(), None);
        assert_eq!(fx.press(0.0, 0.0), Err(PressRejection::NotBound));
    }

    #[test]
    fn test_dropping_machine_detaches() {
        let registry = ListenerRegistry::new();
        {
            let mut fx = Fixture::new();
            fx.machine = DragSelection::new(registry.clone());
            fx.start(SelectionOptions::default());
            fx.press(0.0, 0.0).unwrap();
            assert_eq!(registry.len(), 4);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_next_frame_strategy_defers_highlight() {
        let queue = SharedFrameQueue::new();
        let mut fx = Fixture::new();
        fx.machine.set_strategy(NotifyStrategy::NextFrame(queue.clone()));
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        fx.move_to(20.0, 20.0);
        fx.release();

        assert_eq!(*fx.selections.lock(), vec![vec![0]]);
        assert!(fx.highlights.lock().is_empty());
        assert_eq!(fx.machine.highlighted().get(), Vec::<usize>::new());

        queue.process_all();
        assert_eq!(*fx.highlights.lock(), vec![vec![0], vec![]]);
    }

    #[test]
    fn test_handle_event_routes_by_kind() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        let mut events: Vec<InputEvent> = vec![
            MousePressEvent::new(MouseButton::Left, Point::ZERO, fx.target).into(),
            MouseMoveEvent::new(Point::new(45.0, 45.0)).into(),
            TouchEndEvent::new(vec![]).into(),
            MouseReleaseEvent::new(MouseButton::Left, Point::ZERO).into(),
        ];
        let handled: Vec<bool> = events
            .iter_mut()
            .map(|event| fx.machine.handle_event(event, &fx.scene))
            .collect();
        assert_eq!(handled, vec![true, true, false, true]);
        assert!(events[1].is_default_prevented());
        assert_eq!(*fx.selections.lock(), vec![vec![0, 2]]);
    }

    #[test]
    fn test_visible_box_only_while_dragging() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        assert_eq!(fx.machine.visible_box(), None);
        fx.press(0.0, 0.0).unwrap();
        assert_eq!(fx.machine.visible_box(), None);
        fx.move_to(10.0, 10.0);
        assert_eq!(fx.machine.visible_box(), Some(Rect::new(-1.0, -1.0, 11.0, 11.0)));
        fx.release();
        assert_eq!(fx.machine.visible_box(), None);
    }

    #[test]
    fn test_press_during_drag_keeps_highlight_and_selection_in_step() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        fx.move_to(45.0, 45.0);
        assert_eq!(fx.machine.highlighted().get(), vec![0, 2]);

        // The pointer stays at (45, 45); only the start moves.
        fx.press(30.0, 30.0).unwrap();
        assert_eq!(fx.machine.state().start_point(), Some(Point::new(30.0, 30.0)));
        assert_eq!(fx.machine.selection_box(), Some(Rect::new(29.0, 29.0, 16.0, 16.0)));
        assert_eq!(fx.machine.highlighted().get(), fx.machine.state().intersecting());
        assert_eq!(fx.machine.highlighted().get(), vec![2]);
        assert_eq!(fx.document_listeners(), 2);

        assert!(fx.release());
        assert_eq!(*fx.selections.lock(), vec![vec![2]]);
        assert_eq!(*fx.highlights.lock(), vec![vec![0, 2], vec![2], vec![]]);
    }

    #[test]
    fn test_press_during_press_only_moves_start() {
        let mut fx = Fixture::new();
        fx.start(SelectionOptions::default());
        fx.press(0.0, 0.0).unwrap();
        fx.press(5.0, 5.0).unwrap();
        assert_eq!(fx.machine.state().start_point(), Some(Point::new(5.0, 5.0)));
        assert_eq!(fx.machine.selection_box(), None);
        assert!(fx.highlights.lock().is_empty());
    }

    #[test]
    fn test_try_start_rejects_invalid_options() {
        let mut fx = Fixture::new();
        let config = fx.config(SelectionOptions::new().with_zoom(0.0));
        let err = fx.machine.try_start(config, &fx.scene).unwrap_err();
        assert!(matches!(
            err,
            rubberband_core::Error::Config(rubberband_core::ConfigError::InvalidZoom(_))
        ));
        assert!(!fx.machine.is_bound());
        assert_eq!(fx.machine.target(), None);

        let config = fx.config(SelectionOptions::new().with_ignore_target("a >"));
        assert!(fx.machine.try_start(config, &fx.scene).is_err());
        assert!(fx.machine.registry().is_empty());

        let config = fx.config(SelectionOptions::new().with_zoom(2.0));
        assert!(fx.machine.try_start(config, &fx.scene).is_ok());
        assert!(fx.machine.is_bound());
    }
}
