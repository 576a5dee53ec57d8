//! Full-page loading overlay, shown from startup until the page reports it
//! has loaded, then faded out and removed.

use std::time::Duration;

use crate::animation::Transition;
use crate::document::{class, Document, Element, ElementId};
use crate::geometry::Rect;
use crate::scheduler::{JobKind, Scheduler};

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub enabled: bool,
    /// Title shown in the overlay
    pub title: String,
    pub message: String,
    /// How long the overlay stays after the load event
    pub hold: Duration,
    pub fade: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Loading".to_string(),
            message: "Loading your dashboard...".to_string(),
            hold: Duration::from_millis(1000),
            fade: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoaderPhase {
    Hidden,
    Shown,
    Fading { since: Duration },
    Removed,
}

pub struct Loader {
    config: LoaderConfig,
    element: Option<ElementId>,
    phase: LoaderPhase,
    load_seen: bool,
}

impl Loader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            element: None,
            phase: LoaderPhase::Hidden,
            load_seen: false,
        }
    }

    /// Insert the overlay covering `bounds`. Only the first call has an
    /// effect.
    pub fn show(&mut self, document: &mut Document, bounds: Rect) -> Option<ElementId> {
        if self.phase != LoaderPhase::Hidden {
            return self.element;
        }
        let overlay = Element::new(bounds)
            .class(class::LOADING_OVERLAY)
            .text(format!("{}\n{}", self.config.title, self.config.message));
        let id = document.insert(None, overlay);
        self.element = Some(id);
        self.phase = LoaderPhase::Shown;
        Some(id)
    }

    /// The page finished loading: schedule the fade.
    pub fn on_load(&mut self, scheduler: &mut Scheduler) {
        if self.load_seen {
            return;
        }
        self.load_seen = true;
        if self.phase == LoaderPhase::Shown {
            scheduler.schedule_after(self.config.hold, JobKind::LoaderFade);
        }
    }

    pub fn fade(&mut self, document: &mut Document, scheduler: &mut Scheduler) {
        if self.phase != LoaderPhase::Shown {
            return;
        }
        self.phase = LoaderPhase::Fading {
            since: scheduler.now(),
        };
        if let Some(el) = self.element.and_then(|id| document.get_mut(id)) {
            el.opacity = 0.0;
        }
        scheduler.schedule_after(self.config.fade, JobKind::LoaderRemove);
    }

    pub fn remove(&mut self, document: &mut Document) {
        if let Some(id) = self.element.take() {
            document.remove(id);
        }
        if self.phase != LoaderPhase::Hidden {
            self.phase = LoaderPhase::Removed;
        }
    }

    /// Opacity to render at `now`, following the fade transition.
    pub fn rendered_opacity(&self, now: Duration) -> f32 {
        match self.phase {
            LoaderPhase::Hidden | LoaderPhase::Removed => 0.0,
            LoaderPhase::Shown => 1.0,
            LoaderPhase::Fading { since } => {
                Transition::ease(self.config.fade).sample(&1.0, &0.0, now.saturating_sub(since))
            }
        }
    }

    pub fn phase(&self) -> LoaderPhase {
        self.phase
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(loader: &mut Loader, doc: &mut Document, scheduler: &mut Scheduler, until: Duration) {
        while let Some(job) = scheduler.pop_due(until) {
            match job.kind {
                JobKind::LoaderFade => loader.fade(doc, scheduler),
                JobKind::LoaderRemove => loader.remove(doc),
                other => panic!("unexpected job {:?}", other),
            }
        }
        scheduler.set_now(until);
    }

    #[test]
    fn test_fades_after_load() {
        let mut doc = Document::new();
        let mut scheduler = Scheduler::new();
        let mut loader = Loader::new(LoaderConfig::default());
        let overlay = loader.show(&mut doc, Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
        assert!(doc.get(overlay).unwrap().has_class(class::LOADING_OVERLAY));

        loader.on_load(&mut scheduler);
        run(&mut loader, &mut doc, &mut scheduler, Duration::from_millis(999));
        assert_eq!(loader.phase(), LoaderPhase::Shown);

        run(&mut loader, &mut doc, &mut scheduler, Duration::from_millis(1000));
        assert!(matches!(loader.phase(), LoaderPhase::Fading { .. }));
        assert_eq!(doc.get(overlay).unwrap().opacity, 0.0);
        assert_eq!(loader.rendered_opacity(Duration::from_millis(1000)), 1.0);

        run(&mut loader, &mut doc, &mut scheduler, Duration::from_millis(1500));
        assert_eq!(loader.phase(), LoaderPhase::Removed);
        assert!(!doc.contains(overlay));
    }

    #[test]
    fn test_load_without_overlay() {
        let mut doc = Document::new();
        let mut scheduler = Scheduler::new();
        let mut loader = Loader::new(LoaderConfig::default());
        loader.on_load(&mut scheduler);
        assert!(scheduler.is_empty());
        loader.remove(&mut doc);
        assert_eq!(loader.phase(), LoaderPhase::Hidden);
    }
}
