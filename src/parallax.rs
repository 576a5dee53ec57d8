//! Scroll parallax.
//!
//! Scroll events only record the latest offset and request a frame; the
//! offsets are applied once per frame, however many scroll events arrived in
//! between.

use crate::document::{Document, ElementId};
use crate::transform::Transform;

#[derive(Debug, Default)]
pub struct Parallax {
    default_speed: f32,
    frame_requested: bool,
    scroll_y: f32,
    frames_applied: u64,
}

impl Parallax {
    pub fn new(default_speed: f32) -> Self {
        Self {
            default_speed,
            ..Self::default()
        }
    }

    /// Record a scroll position. Returns true only for the first request of a
    /// frame, so the caller schedules at most one frame.
    pub fn request_frame(&mut self, scroll_y: f32) -> bool {
        self.scroll_y = scroll_y;
        !std::mem::replace(&mut self.frame_requested, true)
    }

    /// Speed from the element's `data-speed`, falling back to the default
    pub fn speed_of(&self, document: &Document, element: ElementId) -> f32 {
        document
            .get(element)
            .and_then(|e| e.get_attr("data-speed"))
            .and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|speed| speed.is_finite())
            .unwrap_or(self.default_speed)
    }

    pub fn offset(scroll_y: f32, speed: f32) -> f32 {
        -(scroll_y * speed)
    }

    /// Apply the pending frame to `elements`. Returns false when no frame was
    /// requested.
    pub fn apply_frame(&mut self, document: &mut Document, elements: &[ElementId]) -> bool {
        if !std::mem::take(&mut self.frame_requested) {
            return false;
        }
        for &id in elements {
            let speed = self.speed_of(document, id);
            if let Some(element) = document.get_mut(id) {
                element.transform = Transform::translate_y(Self::offset(self.scroll_y, speed));
            }
        }
        self.frames_applied += 1;
        true
    }

    pub fn is_frame_requested(&self) -> bool {
        self.frame_requested
    }

    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Capabilities, Element};
    use crate::geometry::Rect;

    #[test]
    fn test_requests_coalesce() {
        let mut parallax = Parallax::new(0.5);
        assert!(parallax.request_frame(10.0));
        assert!(!parallax.request_frame(20.0));
        assert!(!parallax.request_frame(30.0));

        let mut doc = Document::new();
        let hero = doc.insert(
            None,
            Element::new(Rect::default()).capabilities(Capabilities::PARALLAX),
        );
        assert!(parallax.apply_frame(&mut doc, &[hero]));
        assert!(!parallax.apply_frame(&mut doc, &[hero]));
        assert_eq!(parallax.frames_applied(), 1);

        // Latest scroll wins
        let (_, y) = doc.get(hero).unwrap().transform.transform_point(0.0, 0.0);
        assert_eq!(y, -15.0);
    }

    #[test]
    fn test_speed_attribute() {
        let mut doc = Document::new();
        let fast = doc.insert(None, Element::new(Rect::default()).attr("data-speed", "0.8"));
        let broken = doc.insert(None, Element::new(Rect::default()).attr("data-speed", "fast"));
        let parallax = Parallax::new(0.5);

        assert_eq!(parallax.speed_of(&doc, fast), 0.8);
        assert_eq!(parallax.speed_of(&doc, broken), 0.5);
        assert_eq!(Parallax::offset(100.0, 0.8), -80.0);
    }
}
