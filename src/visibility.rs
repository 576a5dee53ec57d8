//! One-shot viewport reveal tracking.
//!
//! A [`VisibilityTrigger`] watches registered elements and reports a
//! [`Crossing`] the first time an element's visible ratio reaches the
//! threshold. After that the element is `revealed` for good: scrolling away
//! and back never reports it again.
//!
//! The trigger only decides *when* an element became visible. What happens
//! then (adding a class, cascading a stagger group, starting a counter) is up
//! to the owner, which receives the crossings from [`VisibilityTrigger::update`].

use crate::document::{Document, ElementId};
use crate::geometry::{Margin, Rect};

/// Intersection settings for a trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction of the element at which it counts as visible.
    /// Zero means any overlap at all.
    pub threshold: f32,
    /// Applied to the viewport before intersecting. Negative shrinks.
    pub root_margin: Margin,
}

impl ObserverOptions {
    /// Scroll reveals: 10% visible, 50px before the bottom edge
    pub const REVEAL: Self = Self {
        threshold: 0.1,
        root_margin: Margin::new(0.0, 0.0, -50.0, 0.0),
    };

    /// Counters start as soon as any part is on screen
    pub const COUNTER: Self = Self {
        threshold: 0.0,
        root_margin: Margin::ZERO,
    };

    fn meets(&self, ratio: f32) -> bool {
        if self.threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::REVEAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterOptions {
    /// Cascade over `STAGGER_ITEM` children after revealing
    pub stagger_container: bool,
}

impl RegisterOptions {
    pub const STAGGER: Self = Self {
        stagger_container: true,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedElement {
    pub element: ElementId,
    /// Set once, never reset
    pub revealed: bool,
    pub stagger_container: bool,
    intersecting: bool,
}

/// Reported once per element, when it first becomes visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub element: ElementId,
    pub stagger_container: bool,
    pub ratio: f32,
}

pub struct VisibilityTrigger {
    options: ObserverOptions,
    tracked: Vec<TrackedElement>,
    viewport: Option<Rect>,
}

impl VisibilityTrigger {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            tracked: Vec::new(),
            viewport: None,
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Start watching `element`. Registering the same element twice is a
    /// no-op. When a viewport is already known the element is evaluated
    /// right away, so elements that start on screen still report.
    pub fn register(
        &mut self,
        document: &Document,
        element: ElementId,
        options: RegisterOptions,
    ) -> Option<Crossing> {
        if !document.contains(element) || self.tracked(element).is_some() {
            return None;
        }
        self.tracked.push(TrackedElement {
            element,
            revealed: false,
            stagger_container: options.stagger_container,
            intersecting: false,
        });
        let viewport = self.viewport?;
        let root = viewport.expand(&self.options.root_margin);
        let options = self.options;
        let last = self.tracked.last_mut()?;
        evaluate(&options, document, &root, last)
    }

    /// Feed a new viewport (page coordinates) and collect the elements that
    /// became visible for the first time, in registration order.
    ///
    /// Elements no longer in the document are dropped from the watch set.
    pub fn update(&mut self, document: &Document, viewport: Rect) -> Vec<Crossing> {
        self.viewport = Some(viewport);
        self.tracked.retain(|t| document.contains(t.element));

        let root = viewport.expand(&self.options.root_margin);
        let options = self.options;
        self.tracked
            .iter_mut()
            .filter_map(|tracked| evaluate(&options, document, &root, tracked))
            .collect()
    }

    /// Remember `viewport` without evaluating anything, so that later
    /// registrations are checked against it.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = Some(viewport);
    }

    /// Re-run the intersection against the last viewport, e.g. after the
    /// host moved elements around.
    pub fn refresh(&mut self, document: &Document) -> Vec<Crossing> {
        match self.viewport {
            Some(viewport) => self.update(document, viewport),
            None => Vec::new(),
        }
    }

    pub fn tracked(&self, element: ElementId) -> Option<&TrackedElement> {
        self.tracked.iter().find(|t| t.element == element)
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.tracked(element).is_some_and(|t| t.revealed)
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Forget every element and the last viewport.
    pub fn clear(&mut self) {
        self.tracked.clear();
        self.viewport = None;
    }
}

fn evaluate(
    options: &ObserverOptions,
    document: &Document,
    root: &Rect,
    tracked: &mut TrackedElement,
) -> Option<Crossing> {
    let rect = document.get(tracked.element)?.rect;
    let ratio = rect.visible_ratio(root);
    let intersecting = options.meets(ratio);
    let was_intersecting = std::mem::replace(&mut tracked.intersecting, intersecting);

    if tracked.revealed || was_intersecting || !intersecting {
        return None;
    }
    tracked.revealed = true;
    Some(Crossing {
        element: tracked.element,
        stagger_container: tracked.stagger_container,
        ratio,
    })
}
