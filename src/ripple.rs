use std::collections::HashMap;
use std::time::Duration;

use crate::animation::Transition;
use crate::document::ElementId;
use crate::geometry::{Point, Rect};
use crate::scheduler::{JobKind, Scheduler};

/// Ripple growth: the circle scales from 0 to this factor of its diameter.
const MAX_SCALE: f32 = 4.0;

/// A click ripple inside one element
#[derive(Debug, Clone, PartialEq)]
pub struct Ripple {
    /// Bumped each time the element gets a new ripple
    pub generation: u32,
    /// Largest side of the element's bounds
    pub diameter: f32,
    /// Top-left corner of the circle in element-local coordinates, chosen so
    /// the circle is centered on the click
    pub origin: Point,
    pub started_at: Duration,
    pub lifetime: Duration,
}

/// Render state of a ripple at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleFrame {
    pub scale: f32,
    pub opacity: f32,
}

impl Ripple {
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    /// Click point in element-local coordinates
    pub fn center(&self) -> Point {
        Point::new(self.origin.x + self.radius(), self.origin.y + self.radius())
    }

    pub fn sample(&self, now: Duration) -> RippleFrame {
        let transition = Transition::linear(self.lifetime);
        let elapsed = now.saturating_sub(self.started_at);
        RippleFrame {
            scale: transition.sample(&0.0, &MAX_SCALE, elapsed),
            opacity: transition.sample(&1.0, &0.0, elapsed),
        }
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.started_at + self.lifetime
    }
}

/// At most one ripple per element; a new click replaces the old ripple.
pub struct RippleFeedback {
    duration: Duration,
    ripples: HashMap<ElementId, Ripple>,
    generations: HashMap<ElementId, u32>,
}

impl RippleFeedback {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ripples: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    /// Start a ripple for a click at `click` (page coordinates) inside an
    /// element with bounds `rect`.
    pub fn trigger(
        &mut self,
        element: ElementId,
        rect: Rect,
        click: Point,
        scheduler: &mut Scheduler,
    ) -> &Ripple {
        let diameter = rect.width.max(rect.height);
        let radius = diameter / 2.0;
        let generation = {
            let counter = self.generations.entry(element).or_insert(0);
            *counter = counter.wrapping_add(1);
            *counter
        };

        if self.ripples.contains_key(&element) {
            log::trace!("replacing ripple on {:?}", element);
        }
        scheduler.schedule_after(
            self.duration,
            JobKind::RemoveRipple {
                element,
                generation,
            },
        );

        let ripple = Ripple {
            generation,
            diameter,
            origin: Point::new(click.x - rect.x - radius, click.y - rect.y - radius),
            started_at: scheduler.now(),
            lifetime: self.duration,
        };
        self.ripples.insert(element, ripple);
        &self.ripples[&element]
    }

    /// Remove the ripple if it is still the one `generation` refers to.
    pub fn remove(&mut self, element: ElementId, generation: u32) -> bool {
        let current = self.ripples.get(&element).map(|r| r.generation);
        if current != Some(generation) {
            return false;
        }
        self.ripples.remove(&element);
        true
    }

    pub fn get(&self, element: ElementId) -> Option<&Ripple> {
        self.ripples.get(&element)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Ripple)> {
        self.ripples.iter().map(|(id, r)| (*id, r))
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
    }
}
