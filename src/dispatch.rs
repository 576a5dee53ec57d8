//! Host events and the table that routes them to effect components.
//!
//! Routing is by capability: for each event kind the table lists which
//! component handles it and which capability the target (or its nearest
//! ancestor) must carry. Components never inspect class names to find out
//! whether an element is theirs.

use crate::document::{Capabilities, ElementId};
use crate::geometry::{Point, Rect};

/// Input delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer click at `position` (page coordinates) on `target`
    Click { target: ElementId, position: Point },
    PointerMove { target: ElementId, position: Point },
    PointerLeave { target: ElementId },
    /// The viewport moved. `viewport` is in page coordinates, so its `y` is
    /// the scroll offset.
    Scroll { viewport: Rect },
    Resize { viewport: Rect },
    Focus { target: ElementId },
    Blur { target: ElementId },
    Submit { form: ElementId },
    /// The page finished loading
    Load,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    PointerMove,
    PointerLeave,
    Scroll,
    Resize,
    Focus,
    Blur,
    Submit,
    Load,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click { .. } => EventKind::Click,
            Event::PointerMove { .. } => EventKind::PointerMove,
            Event::PointerLeave { .. } => EventKind::PointerLeave,
            Event::Scroll { .. } => EventKind::Scroll,
            Event::Resize { .. } => EventKind::Resize,
            Event::Focus { .. } => EventKind::Focus,
            Event::Blur { .. } => EventKind::Blur,
            Event::Submit { .. } => EventKind::Submit,
            Event::Load => EventKind::Load,
        }
    }

    /// Element the event happened on, if any
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Event::Click { target, .. }
            | Event::PointerMove { target, .. }
            | Event::PointerLeave { target }
            | Event::Focus { target }
            | Event::Blur { target } => Some(*target),
            Event::Submit { form } => Some(*form),
            Event::Scroll { .. } | Event::Resize { .. } | Event::Load => None,
        }
    }
}

/// Effect components that react to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    Ripple,
    Anchor,
    Magnetic,
    Tilt,
    /// Put hovered elements back to rest
    HoverReset,
    Visibility,
    Parallax,
    FieldFocus,
    FieldBlur,
    FormSubmit,
    Loader,
}

/// Whether any handler acted on an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Handled,
    Ignored,
}

impl EventResponse {
    pub fn is_handled(self) -> bool {
        self == EventResponse::Handled
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub kind: EventKind,
    /// Capability the target or one of its ancestors must carry. Empty for
    /// events that are not about a particular element.
    pub capability: Capabilities,
    pub handler: Handler,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTable {
    routes: Vec<Route>,
}

impl DispatchTable {
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route(mut self, kind: EventKind, capability: Capabilities, handler: Handler) -> Self {
        self.routes.push(Route {
            kind,
            capability,
            handler,
        });
        self
    }

    /// Drop every route to `handler`
    pub fn disable(&mut self, handler: Handler) {
        self.routes.retain(|r| r.handler != handler);
    }

    pub fn routes_for(&self, kind: EventKind) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |r| r.kind == kind)
    }

    pub fn handles(&self, handler: Handler) -> bool {
        self.routes.iter().any(|r| r.handler == handler)
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::empty()
            .route(EventKind::Click, Capabilities::RIPPLE, Handler::Ripple)
            .route(EventKind::Click, Capabilities::ANCHOR, Handler::Anchor)
            .route(EventKind::PointerMove, Capabilities::MAGNETIC, Handler::Magnetic)
            .route(EventKind::PointerMove, Capabilities::TILT, Handler::Tilt)
            .route(
                EventKind::PointerLeave,
                Capabilities::MAGNETIC | Capabilities::TILT,
                Handler::HoverReset,
            )
            .route(EventKind::Scroll, Capabilities::empty(), Handler::Visibility)
            .route(EventKind::Scroll, Capabilities::empty(), Handler::Parallax)
            .route(EventKind::Resize, Capabilities::empty(), Handler::Visibility)
            .route(EventKind::Focus, Capabilities::FORM_FIELD, Handler::FieldFocus)
            .route(EventKind::Blur, Capabilities::FORM_FIELD, Handler::FieldBlur)
            .route(EventKind::Submit, Capabilities::FORM, Handler::FormSubmit)
            .route(EventKind::Load, Capabilities::empty(), Handler::Loader)
    }
}
