//! Form field cosmetics: focus highlight, filled-state marker, and a short
//! shake on fields that fail validation when their form is submitted.

use crate::document::{class, Capabilities, Document, ElementId};

/// Mark a field as filled or empty from its current value.
pub fn sync_has_value(document: &mut Document, field: ElementId) {
    if let Some(el) = document.get_mut(field) {
        if el.value.is_empty() {
            el.remove_class(class::HAS_VALUE);
        } else {
            el.add_class(class::HAS_VALUE);
        }
    }
}

pub fn focus(document: &mut Document, field: ElementId) {
    if let Some(el) = document.get_mut(field) {
        el.add_class(class::FOCUSED);
        el.add_class(class::GLOW);
    }
}

pub fn blur(document: &mut Document, field: ElementId) {
    if let Some(el) = document.get_mut(field) {
        el.remove_class(class::FOCUSED);
        el.remove_class(class::GLOW);
    }
    sync_has_value(document, field);
}

/// Invalid fields inside `form`, in document order
pub fn invalid_fields(document: &Document, form: ElementId) -> Vec<ElementId> {
    document
        .descendants(form)
        .into_iter()
        .filter(|&id| {
            document
                .get(id)
                .is_some_and(|el| el.has(Capabilities::FORM_FIELD) && el.invalid)
        })
        .collect()
}
