use crate::document::{Document, ElementId};

/// Ask the host to scroll the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Page y the viewport top should move to
    pub top: f32,
    pub smooth: bool,
}

/// Resolve an in-page link (`href="#section"`) to the scroll that brings its
/// target to the top of the viewport.
pub fn resolve(document: &Document, anchor: ElementId) -> Option<ScrollRequest> {
    let href = document.get(anchor)?.get_attr("href")?;
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    let target = document.find_by_attr("id", fragment)?;
    let top = document.get(target)?.rect.y;
    Some(ScrollRequest { top, smooth: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Capabilities, Element};
    use crate::geometry::Rect;

    fn link(href: &str) -> Element {
        Element::new(Rect::default())
            .capabilities(Capabilities::ANCHOR)
            .attr("href", href)
    }

    #[test]
    fn test_resolves_target() {
        let mut doc = Document::new();
        let a = doc.insert(None, link("#services"));
        doc.insert(None, Element::new(Rect::new(0.0, 1200.0, 800.0, 400.0)).attr("id", "services"));

        assert_eq!(resolve(&doc, a), Some(ScrollRequest { top: 1200.0, smooth: true }));
    }

    #[test]
    fn test_ignores_missing_and_external() {
        let mut doc = Document::new();
        let missing = doc.insert(None, link("#nowhere"));
        let external = doc.insert(None, link("https://example.org/#top"));
        let bare = doc.insert(None, link("#"));

        assert_eq!(resolve(&doc, missing), None);
        assert_eq!(resolve(&doc, external), None);
        assert_eq!(resolve(&doc, bare), None);
    }
}
