//! Arena-based element storage standing in for the host page.
//!
//! The host mirrors the nodes it wants effects on into a [`Document`]:
//! geometry, capabilities, text and a few attributes. Effects mutate the
//! visual state (classes, transform, opacity, text) and the host reads it back
//! when rendering.
//!
//! Element ids are generational: an id keeps pointing at nothing once its
//! element is removed, even after the slot is reused, so scheduled work for a
//! removed element quietly becomes a no-op.

use std::collections::{BTreeSet, HashMap};

use bitflags::bitflags;

use crate::geometry::Rect;
use crate::transform::Transform;

/// Unique identifier for an element in the document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

bitflags! {
    /// Which effect components an element takes part in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Fades in once when scrolled into view
        const REVEAL = 1 << 0;
        /// Reveals and then cascades over its `STAGGER_ITEM` children
        const STAGGER_CONTAINER = 1 << 1;
        const STAGGER_ITEM = 1 << 2;
        /// Click ripple
        const RIPPLE = 1 << 3;
        /// Follows the pointer slightly while hovered
        const MAGNETIC = 1 << 4;
        /// 3D tilt toward the pointer while hovered
        const TILT = 1 << 5;
        const PARALLAX = 1 << 6;
        /// Numeric counter animated when scrolled into view
        const COUNTER = 1 << 7;
        const FORM_FIELD = 1 << 8;
        const FORM = 1 << 9;
        /// In-page link (`href="#id"`)
        const ANCHOR = 1 << 10;
    }
}

/// Class names written by the effects.
pub mod class {
    pub const VISIBLE: &str = "visible";
    pub const SLIDE_IN_UP: &str = "slide-in-up";
    pub const FOCUSED: &str = "focused";
    pub const GLOW: &str = "glow";
    pub const HAS_VALUE: &str = "has-value";
    pub const SHAKE: &str = "shake";
    pub const LOADING_OVERLAY: &str = "loading-overlay";
    pub const PARTICLE_CONTAINER: &str = "particle-container";
}

/// The effect-relevant state of one host element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Bounds in page coordinates
    pub rect: Rect,
    pub capabilities: Capabilities,
    pub transform: Transform,
    pub opacity: f32,
    pub text: String,
    /// Current value of a form field
    pub value: String,
    /// Whether a form field currently fails validation
    pub invalid: bool,
    classes: BTreeSet<String>,
    attributes: HashMap<String, String>,
}

impl Element {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            capabilities: Capabilities::empty(),
            transform: Transform::IDENTITY,
            opacity: 1.0,
            text: String::new(),
            value: String::new(),
            invalid: false,
            classes: BTreeSet::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities |= capabilities;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn has(&self, capabilities: Capabilities) -> bool {
        self.capabilities.intersects(capabilities)
    }

    pub fn add_class(&mut self, class: &str) -> bool {
        self.classes.insert(class.to_string())
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        self.classes.remove(class)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }
}

struct Node {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The element tree effects operate on.
#[derive(Default)]
pub struct Document {
    slots: Vec<Slot>,
    free_indices: Vec<u32>,
    /// Top-level elements in document order
    roots: Vec<ElementId>,
    len: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `element` as the last child of `parent` (or as a new top-level
    /// element). A stale parent id inserts at top level.
    pub fn insert(&mut self, parent: Option<ElementId>, element: Element) -> ElementId {
        let (index, generation) = match self.free_indices.pop() {
            Some(index) => {
                let slot = &self.slots[index as usize];
                (index, slot.generation.wrapping_add(1))
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                (index, 0)
            }
        };
        let id = ElementId::new(index, generation);
        let parent = parent.filter(|p| self.contains(*p));

        self.slots[index as usize] = Slot {
            generation,
            node: Some(Node {
                element,
                parent,
                children: Vec::new(),
            }),
        };
        let attached = match parent.and_then(|p| self.node_mut(p)) {
            Some(parent_node) => {
                parent_node.children.push(id);
                true
            }
            None => false,
        };
        if !attached {
            self.roots.push(id);
        }
        self.len += 1;
        id
    }

    /// Remove an element and its whole subtree. Returns false for stale ids.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.node(id).map(|n| n.parent) else {
            return false;
        };
        let detached = match parent.and_then(|p| self.node_mut(p)) {
            Some(parent_node) => {
                parent_node.children.retain(|&c| c != id);
                true
            }
            None => false,
        };
        if !detached {
            self.roots.retain(|&r| r != id);
        }

        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                pending.extend(node.children);
                self.free_indices.push(current.index);
                self.len -= 1;
            }
        }
        true
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nearest element, starting at `id` itself and walking up, that has
    /// any of `capabilities`.
    pub fn closest(&self, id: ElementId, capabilities: Capabilities) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            let node = self.node(candidate)?;
            if node.element.has(capabilities) {
                return Some(candidate);
            }
            current = node.parent;
        }
        None
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Every element in document order.
    pub fn iter_ids(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.len);
        for &root in &self.roots {
            out.push(root);
            out.extend(self.descendants(root));
        }
        out
    }

    /// Elements with any of `capabilities`, in document order.
    pub fn query(&self, capabilities: Capabilities) -> Vec<ElementId> {
        self.iter_ids()
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|e| e.has(capabilities)))
            .collect()
    }

    /// First element in document order whose attribute `name` equals `value`.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<ElementId> {
        self.iter_ids()
            .into_iter()
            .find(|&id| self.get(id).and_then(|e| e.get_attr(name)) == Some(value))
    }
}
