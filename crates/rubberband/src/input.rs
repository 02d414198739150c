//! Input event types.
//!
//! Mouse and touch input share one interaction state machine. Each event
//! carries page coordinates; press-type events also carry the element they
//! were delivered to (`current_target`) and the element the input actually
//! landed on (`origin`), which is what ignore selectors are tested against.

use rubberband_style::ElementId;

use crate::geometry::Point;
use crate::listeners::EventKind;

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Middle button (scroll wheel click).
    Middle = 1,
    /// Secondary button (usually right).
    Right = 2,
    /// Additional button 1 (e.g., browser back).
    Button4 = 3,
    /// Additional button 2 (e.g., browser forward).
    Button5 = 4,
}

impl MouseButton {
    /// Whether this is the primary button.
    pub fn is_primary(self) -> bool {
        self == Self::Left
    }
}

/// Which kind of device started a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Mouse,
    Touch,
}

impl InputSource {
    /// The document-level events that continue and finish a drag from this
    /// source.
    pub fn drag_events(self) -> [EventKind; 2] {
        match self {
            Self::Mouse => [EventKind::MouseMove, EventKind::MouseUp],
            Self::Touch => [EventKind::TouchMove, EventKind::TouchEnd],
        }
    }
}

/// Common data for all input events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBase {
    default_prevented: bool,
}

impl EventBase {
    /// Create a new event base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the platform's default handling (scrolling, text selection).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Platform identifier of the contact.
    pub id: u64,
    /// Position in page coordinates.
    pub page_pos: Point,
}

impl TouchPoint {
    /// Create a new touch point.
    pub fn new(id: u64, page_pos: Point) -> Self {
        Self { id, page_pos }
    }
}

/// Mouse button press on a bound target.
#[derive(Debug, Clone, Copy)]
pub struct MousePressEvent {
    /// Base event data.
    pub base: EventBase,
    /// The button that was pressed.
    pub button: MouseButton,
    /// Position in page coordinates.
    pub page_pos: Point,
    /// The element whose listener received the event.
    pub current_target: ElementId,
    /// The element the press landed on.
    pub origin: Option<ElementId>,
}

impl MousePressEvent {
    /// Create a new mouse press event landing directly on `current_target`.
    pub fn new(button: MouseButton, page_pos: Point, current_target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            button,
            page_pos,
            current_target,
            origin: Some(current_target),
        }
    }

    /// Set the element the press landed on.
    pub fn with_origin(mut self, origin: ElementId) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Mouse movement anywhere in the document.
#[derive(Debug, Clone, Copy)]
pub struct MouseMoveEvent {
    /// Base event data.
    pub base: EventBase,
    /// Position in page coordinates.
    pub page_pos: Point,
}

impl MouseMoveEvent {
    /// Create a new mouse move event.
    pub fn new(page_pos: Point) -> Self {
        Self {
            base: EventBase::new(),
            page_pos,
        }
    }
}

/// Mouse button release anywhere in the document.
#[derive(Debug, Clone, Copy)]
pub struct MouseReleaseEvent {
    /// Base event data.
    pub base: EventBase,
    /// The button that was released.
    pub button: MouseButton,
    /// Position in page coordinates.
    pub page_pos: Point,
}

impl MouseReleaseEvent {
    /// Create a new mouse release event.
    pub fn new(button: MouseButton, page_pos: Point) -> Self {
        Self {
            base: EventBase::new(),
            button,
            page_pos,
        }
    }
}

/// Touch contact starting on a bound target.
#[derive(Debug, Clone)]
pub struct TouchStartEvent {
    /// Base event data.
    pub base: EventBase,
    /// All contacts currently on the surface.
    pub touches: Vec<TouchPoint>,
    /// The element whose listener received the event.
    pub current_target: ElementId,
    /// The element the touch landed on.
    pub origin: Option<ElementId>,
}

impl TouchStartEvent {
    /// Create a new touch start event landing directly on `current_target`.
    pub fn new(touches: Vec<TouchPoint>, current_target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            touches,
            current_target,
            origin: Some(current_target),
        }
    }

    /// Set the element the touch landed on.
    pub fn with_origin(mut self, origin: ElementId) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Touch movement anywhere in the document.
#[derive(Debug, Clone)]
pub struct TouchMoveEvent {
    /// Base event data.
    pub base: EventBase,
    /// All contacts currently on the surface.
    pub touches: Vec<TouchPoint>,
}

impl TouchMoveEvent {
    /// Create a new touch move event.
    pub fn new(touches: Vec<TouchPoint>) -> Self {
        Self {
            base: EventBase::new(),
            touches,
        }
    }
}

/// Touch contact ending anywhere in the document.
#[derive(Debug, Clone)]
pub struct TouchEndEvent {
    /// Base event data.
    pub base: EventBase,
    /// Contacts still on the surface after this one lifted.
    pub touches: Vec<TouchPoint>,
}

impl TouchEndEvent {
    /// Create a new touch end event.
    pub fn new(touches: Vec<TouchPoint>) -> Self {
        Self {
            base: EventBase::new(),
            touches,
        }
    }
}

/// Any input event the selection machine understands.
#[derive(Debug, Clone)]
pub enum InputEvent {
    MousePress(MousePressEvent),
    MouseMove(MouseMoveEvent),
    MouseRelease(MouseReleaseEvent),
    TouchStart(TouchStartEvent),
    TouchMove(TouchMoveEvent),
    TouchEnd(TouchEndEvent),
}

impl InputEvent {
    /// The listener kind this event is delivered to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MousePress(_) => EventKind::MouseDown,
            Self::MouseMove(_) => EventKind::MouseMove,
            Self::MouseRelease(_) => EventKind::MouseUp,
            Self::TouchStart(_) => EventKind::TouchStart,
            Self::TouchMove(_) => EventKind::TouchMove,
            Self::TouchEnd(_) => EventKind::TouchEnd,
        }
    }

    /// Get the base event data.
    pub fn base(&self) -> &EventBase {
        match self {
            Self::MousePress(e) => &e.base,
            Self::MouseMove(e) => &e.base,
            Self::MouseRelease(e) => &e.base,
            Self::TouchStart(e) => &e.base,
            Self::TouchMove(e) => &e.base,
            Self::TouchEnd(e) => &e.base,
        }
    }

    /// Whether the handler suppressed default platform behavior.
    pub fn is_default_prevented(&self) -> bool {
        self.base().is_default_prevented()
    }
}

impl From<MousePressEvent> for InputEvent {
    fn from(event: MousePressEvent) -> Self {
        Self::MousePress(event)
    }
}

impl From<MouseMoveEvent> for InputEvent {
    fn from(event: MouseMoveEvent) -> Self {
        Self::MouseMove(event)
    }
}

impl From<MouseReleaseEvent> for InputEvent {
    fn from(event: MouseReleaseEvent) -> Self {
        Self::MouseRelease(event)
    }
}

impl From<TouchStartEvent> for InputEvent {
    fn from(event: TouchStartEvent) -> Self {
        Self::TouchStart(event)
    }
}

impl From<TouchMoveEvent> for InputEvent {
    fn from(event: TouchMoveEvent) -> Self {
        Self::TouchMove(event)
    }
}

impl From<TouchEndEvent> for InputEvent {
    fn from(event: TouchEndEvent) -> Self {
        Self::TouchEnd(event)
    }
}
