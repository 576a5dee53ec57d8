pub mod anchor;
pub mod animation;
pub mod config;
pub mod counter;
pub mod dispatch;
pub mod document;
pub mod driver;
pub mod error;
pub mod forms;
pub mod geometry;
pub mod hover;
pub mod loader;
pub mod parallax;
pub mod particles;
pub mod ripple;
pub mod scheduler;
pub mod style;
pub mod toast;
pub mod transform;
pub mod visibility;

use std::collections::HashMap;
use std::time::Duration;

use anchor::ScrollRequest;
use counter::{Counter, CounterReveal};
use dispatch::{DispatchTable, Event, EventResponse, Handler, Route};
use document::{class, Capabilities, Document, Element, ElementId};
use geometry::Rect;
use loader::Loader;
use parallax::Parallax;
use particles::{ParticleFrame, ParticleId, ParticlePool};
use ripple::{Ripple, RippleFeedback};
use scheduler::{Job, JobKind, Scheduler};
use style::{Color, Theme};
use toast::{Notifier, Severity, Toast, ToastId, ToastNotifier};
use visibility::{Crossing, RegisterOptions, VisibilityTrigger};

pub use config::EffectsConfig;
pub use error::{Error, Result};

pub mod prelude {
    pub use crate::anchor::ScrollRequest;
    pub use crate::dispatch::{Event, EventResponse, Handler};
    pub use crate::document::{class, Capabilities, Document, Element, ElementId};
    pub use crate::driver::Driver;
    pub use crate::geometry::{Margin, Point, Rect};
    pub use crate::style::{Color, ColorRole, Theme};
    pub use crate::toast::{Notifier, Severity, ToastId};
    pub use crate::transform::Transform;
    pub use crate::visibility::RegisterOptions;
    pub use crate::{Effects, EffectsConfig};
}

/// All effect state for one page.
///
/// The host mirrors its elements into the [`Document`], feeds events through
/// [`Effects::handle_event`] and moves time forward with
/// [`Effects::advance_to`]. Effects write their results (classes, transforms,
/// opacity, text) back into the document for the host to render.
pub struct Effects {
    config: EffectsConfig,
    document: Document,
    scheduler: Scheduler,
    rng: fastrand::Rng,
    dispatch: DispatchTable,
    reveal: VisibilityTrigger,
    counter_trigger: VisibilityTrigger,
    particles: ParticlePool,
    ripples: RippleFeedback,
    parallax: Parallax,
    toasts: ToastNotifier,
    counters: CounterReveal,
    loader: Loader,
    revealed_at: HashMap<ElementId, Duration>,
    scroll_requests: Vec<ScrollRequest>,
    previous_notifier: Option<Box<dyn Notifier>>,
    viewport: Option<Rect>,
    initialized: bool,
}

impl Effects {
    pub fn new(config: EffectsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            document: Document::new(),
            scheduler: Scheduler::new(),
            rng,
            dispatch: config.dispatch.clone(),
            reveal: VisibilityTrigger::new(config.reveal),
            counter_trigger: VisibilityTrigger::new(config.counter_observer),
            particles: ParticlePool::new(config.particles.clone()),
            ripples: RippleFeedback::new(config.ripple_duration),
            parallax: Parallax::new(config.parallax_speed),
            toasts: ToastNotifier::new(config.toast.clone()),
            counters: CounterReveal::new(config.counter),
            loader: Loader::new(config.loader.clone()),
            revealed_at: HashMap::new(),
            scroll_requests: Vec::new(),
            previous_notifier: None,
            viewport: None,
            initialized: false,
            config,
        }
    }

    /// Start a page with an already populated document.
    pub fn with_document(config: EffectsConfig, document: Document) -> Self {
        let mut effects = Self::new(config);
        effects.document = document;
        effects
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Wire every effect to the current document: show the loader, watch
    /// reveal and counter elements, mark filled form fields and start the
    /// particle producers. Calling it again does nothing.
    pub fn init(&mut self) {
        if self.initialized {
            log::debug!("effects already initialized");
            return;
        }
        self.initialized = true;

        // Registration below evaluates elements already on screen
        if let Some(viewport) = self.viewport {
            self.reveal.set_viewport(viewport);
            self.counter_trigger.set_viewport(viewport);
        }

        if self.config.loader.enabled {
            let bounds = self.viewport.unwrap_or_default();
            self.loader.show(&mut self.document, bounds);
        }

        for id in self
            .document
            .query(Capabilities::REVEAL | Capabilities::STAGGER_CONTAINER)
        {
            let stagger = self
                .document
                .get(id)
                .is_some_and(|el| el.has(Capabilities::STAGGER_CONTAINER));
            let options = if stagger {
                RegisterOptions::STAGGER
            } else {
                RegisterOptions::default()
            };
            self.register(id, options);
        }

        for id in self.document.query(Capabilities::COUNTER) {
            if let Some(crossing) =
                self.counter_trigger
                    .register(&self.document, id, RegisterOptions::default())
            {
                self.begin_counter(crossing);
            }
        }

        for id in self.document.query(Capabilities::FORM_FIELD) {
            forms::sync_has_value(&mut self.document, id);
        }

        if self.config.particles.enabled {
            let container = match self.particles.container() {
                Some(existing) if self.document.contains(existing) => existing,
                _ => {
                    let bounds = self.viewport.unwrap_or_default();
                    self.document.insert(
                        None,
                        Element::new(bounds).class(class::PARTICLE_CONTAINER),
                    )
                }
            };
            self.start_particles(container);
        }

        log::info!(
            "effects initialized: {} reveal, {} counter elements",
            self.reveal.len(),
            self.counter_trigger.len()
        );
        self.run_due();
    }

    /// Stop watching and producing. Effects already in flight (toasts,
    /// ripples, live particles) finish on their own. Returns the notifier
    /// that was in place before [`Effects::wrap_notifier`].
    pub fn teardown(&mut self) -> Option<Box<dyn Notifier>> {
        self.particles.stop(&mut self.scheduler);
        self.reveal.clear();
        self.counter_trigger.clear();
        self.initialized = false;
        log::info!("effects torn down");
        self.previous_notifier.take()
    }

    /// Take over from the host's notifier, keeping it to hand back on
    /// teardown.
    pub fn wrap_notifier(&mut self, previous: impl Notifier + 'static) {
        if self.previous_notifier.is_some() {
            log::warn!("replacing an already wrapped notifier");
        }
        self.previous_notifier = Some(Box::new(previous));
    }

    /// Send a message through the wrapped notifier instead of a toast.
    /// Returns false when there is none.
    pub fn fallback_notify(&mut self, message: &str, severity: Severity, duration: Duration) -> bool {
        match self.previous_notifier.as_mut() {
            Some(previous) => {
                previous.notify(message, severity, duration);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Watch `element` for its one-shot reveal. An element already on
    /// screen is revealed right away.
    pub fn register(&mut self, element: ElementId, options: RegisterOptions) {
        if let Some(crossing) = self.reveal.register(&self.document, element, options) {
            self.reveal_element(crossing);
            self.run_due();
        }
    }

    /// Start the particle producers into `container`. Later calls are
    /// ignored.
    pub fn start_particles(&mut self, container: ElementId) -> bool {
        self.particles.start(container, &mut self.scheduler)
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Route one host event to every effect whose capability matches the
    /// target (or its nearest ancestor). Events before `init` or after
    /// `teardown` are ignored.
    pub fn handle_event(&mut self, event: Event) -> EventResponse {
        if !self.initialized {
            log::trace!("ignoring {:?} outside init/teardown", event.kind());
            return EventResponse::Ignored;
        }
        let routes: Vec<Route> = self.dispatch.routes_for(event.kind()).copied().collect();

        let mut handled = false;
        for route in routes {
            let target = if route.capability.is_empty() {
                None
            } else {
                let found = event
                    .target()
                    .and_then(|target| self.document.closest(target, route.capability));
                match found {
                    Some(found) => Some(found),
                    None => continue,
                }
            };
            handled |= self.run_handler(route.handler, target, &event);
        }

        // Zero-delay work (first stagger child, for one) lands now
        self.run_due();
        if handled {
            EventResponse::Handled
        } else {
            EventResponse::Ignored
        }
    }

    fn run_handler(&mut self, handler: Handler, target: Option<ElementId>, event: &Event) -> bool {
        match (handler, target, event) {
            (Handler::Ripple, Some(id), Event::Click { position, .. }) => {
                let Some(rect) = self.document.get(id).map(|el| el.rect) else {
                    return false;
                };
                self.ripples.trigger(id, rect, *position, &mut self.scheduler);
                true
            }
            (Handler::Anchor, Some(id), Event::Click { .. }) => {
                match anchor::resolve(&self.document, id) {
                    Some(request) => {
                        log::debug!("anchor {:?} scrolls to {}", id, request.top);
                        self.scroll_requests.push(request);
                        true
                    }
                    None => false,
                }
            }
            (Handler::Magnetic, Some(id), Event::PointerMove { position, .. }) => {
                let config = self.config.hover;
                self.update_transform(id, |rect| hover::magnetic_transform(&rect, *position, &config))
            }
            (Handler::Tilt, Some(id), Event::PointerMove { position, .. }) => {
                let config = self.config.hover;
                self.update_transform(id, |rect| hover::tilt_transform(&rect, *position, &config))
            }
            (Handler::HoverReset, Some(id), Event::PointerLeave { .. }) => {
                self.update_transform(id, |_| transform::Transform::IDENTITY)
            }
            (Handler::Visibility, None, Event::Scroll { viewport })
            | (Handler::Visibility, None, Event::Resize { viewport }) => {
                self.update_viewport(*viewport);
                true
            }
            (Handler::Parallax, None, Event::Scroll { viewport }) => {
                if self.parallax.request_frame(viewport.y) {
                    self.scheduler
                        .schedule_after(self.config.frame_interval, JobKind::ParallaxFrame);
                }
                true
            }
            (Handler::FieldFocus, Some(id), Event::Focus { .. }) => {
                forms::focus(&mut self.document, id);
                true
            }
            (Handler::FieldBlur, Some(id), Event::Blur { .. }) => {
                forms::blur(&mut self.document, id);
                true
            }
            (Handler::FormSubmit, Some(id), Event::Submit { .. }) => {
                let duration = self.config.shake_duration;
                for field in forms::invalid_fields(&self.document, id) {
                    self.add_transient_class(field, class::SHAKE, duration);
                }
                true
            }
            (Handler::Loader, None, Event::Load) => {
                self.loader.on_load(&mut self.scheduler);
                true
            }
            (handler, _, event) => {
                log::trace!("{:?} does not apply to {:?}", handler, event.kind());
                false
            }
        }
    }

    fn update_transform(
        &mut self,
        id: ElementId,
        compute: impl FnOnce(Rect) -> transform::Transform,
    ) -> bool {
        match self.document.get_mut(id) {
            Some(el) => {
                el.transform = compute(el.rect);
                true
            }
            None => false,
        }
    }

    fn update_viewport(&mut self, viewport: Rect) {
        self.viewport = Some(viewport);
        for crossing in self.reveal.update(&self.document, viewport) {
            self.reveal_element(crossing);
        }
        for crossing in self.counter_trigger.update(&self.document, viewport) {
            self.begin_counter(crossing);
        }
    }

    /// Tell the effects where the viewport is without a scroll event. Before
    /// `init` it is only stored; `init` then sizes the loader and the particle
    /// container with it and reveals elements already on screen.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.initialized {
            self.update_viewport(viewport);
            self.run_due();
        } else {
            self.viewport = Some(viewport);
        }
    }

    /// Re-check visibility against the last viewport after the host moved
    /// elements.
    pub fn refresh_visibility(&mut self) {
        if let Some(viewport) = self.viewport {
            self.update_viewport(viewport);
            self.run_due();
        }
    }

    fn reveal_element(&mut self, crossing: Crossing) {
        let now = self.scheduler.now();
        let Some(el) = self.document.get_mut(crossing.element) else {
            return;
        };
        el.add_class(class::VISIBLE);
        self.revealed_at.entry(crossing.element).or_insert(now);
        log::trace!("revealed {:?} at {:?}", crossing.element, now);

        if crossing.stagger_container {
            let items: Vec<ElementId> = self
                .document
                .children(crossing.element)
                .iter()
                .copied()
                .filter(|&child| {
                    self.document
                        .get(child)
                        .is_some_and(|el| el.has(Capabilities::STAGGER_ITEM))
                })
                .collect();
            for (index, item) in items.into_iter().enumerate() {
                self.scheduler.schedule_after(
                    self.config.stagger_delay * index as u32,
                    JobKind::RevealStaggerItem(item),
                );
            }
        }
    }

    fn begin_counter(&mut self, crossing: Crossing) {
        self.counters
            .begin(&mut self.document, crossing.element, &mut self.scheduler);
    }

    /// Add `class` to `element` and take it off again after `duration`.
    pub fn add_transient_class(&mut self, element: ElementId, class: &str, duration: Duration) {
        let Some(el) = self.document.get_mut(element) else {
            return;
        };
        el.add_class(class);
        self.scheduler.schedule_after(
            duration,
            JobKind::RemoveClass {
                element,
                class: class.to_string(),
            },
        );
    }

    // ------------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------------

    /// Run every job due at or before `now`, in due order, then move the
    /// clock to `now`. Time never goes backwards.
    pub fn advance_to(&mut self, now: Duration) {
        while let Some(job) = self.scheduler.pop_due(now) {
            self.run_job(job);
        }
        self.scheduler.set_now(now);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.now() + delta);
    }

    fn run_due(&mut self) {
        self.advance_to(self.now());
    }

    fn run_job(&mut self, job: Job) {
        match job.kind {
            JobKind::RevealStaggerItem(item) => {
                if let Some(el) = self.document.get_mut(item) {
                    el.add_class(class::SLIDE_IN_UP);
                    self.revealed_at.entry(item).or_insert(job.due);
                }
            }
            JobKind::BurstParticle => self.particles.on_burst(&mut self.rng, &mut self.scheduler),
            JobKind::AmbientTick => self
                .particles
                .on_ambient_tick(&mut self.rng, &mut self.scheduler),
            JobKind::ExpireParticle(id) => {
                self.particles.expire(id);
            }
            JobKind::RemoveRipple {
                element,
                generation,
            } => {
                self.ripples.remove(element, generation);
            }
            JobKind::CounterTick(id) => {
                self.counters
                    .tick(&mut self.document, id, &mut self.scheduler)
            }
            JobKind::ParallaxFrame => {
                let elements = self.document.query(Capabilities::PARALLAX);
                self.parallax.apply_frame(&mut self.document, &elements);
            }
            JobKind::ToastEnter(id) => self.toasts.on_enter(id, job.due),
            JobKind::ToastLeave(id) => self.toasts.on_leave(id, &mut self.scheduler),
            JobKind::ToastRemove(id) => {
                self.toasts.on_remove(id);
            }
            JobKind::RemoveClass { element, class } => {
                if let Some(el) = self.document.get_mut(element) {
                    el.remove_class(&class);
                }
            }
            JobKind::LoaderFade => self.loader.fade(&mut self.document, &mut self.scheduler),
            JobKind::LoaderRemove => self.loader.remove(&mut self.document),
        }
    }

    // ------------------------------------------------------------------------
    // Toasts
    // ------------------------------------------------------------------------

    /// Show a toast. `None` uses the configured default duration.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: impl Into<Severity>,
        duration: Option<Duration>,
    ) -> ToastId {
        let duration = duration.unwrap_or(self.config.toast.default_duration);
        self.toasts
            .notify(message, severity.into(), duration, &mut self.scheduler)
    }

    /// Close a toast early
    pub fn dismiss_toast(&mut self, id: ToastId) -> bool {
        self.toasts.dismiss(id)
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.toasts()
    }

    /// Accent color of a toast from the theme
    pub fn toast_accent(&self, id: ToastId) -> Option<Color> {
        let toast = self.toasts.get(id)?;
        Some(self.config.theme.color(toast.severity.accent()))
    }

    // ------------------------------------------------------------------------
    // Effect state for rendering
    // ------------------------------------------------------------------------

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    /// Render state of every live particle, rising through the full height
    /// of the particle container.
    pub fn particle_frames(&self) -> Vec<(ParticleId, ParticleFrame)> {
        let rise = self
            .particles
            .container()
            .and_then(|id| self.document.get(id))
            .map(|el| el.rect.height)
            .unwrap_or_default();
        let now = self.now();
        self.particles
            .live()
            .filter_map(|p| Some((p.id, self.particles.sample(p.id, now, rise)?)))
            .collect()
    }

    pub fn ripple(&self, element: ElementId) -> Option<&Ripple> {
        self.ripples.get(element)
    }

    pub fn counter(&self, element: ElementId) -> Option<&Counter> {
        self.counters.get(element)
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Time at which `element` was revealed (or its stagger slot fired)
    pub fn revealed_at(&self, element: ElementId) -> Option<Duration> {
        self.revealed_at.get(&element).copied()
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.revealed_at.contains_key(&element)
    }

    /// Scrolls requested by anchor clicks since the last call
    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.scroll_requests)
    }
}

impl Default for Effects {
    fn default() -> Self {
        Self::new(EffectsConfig::default())
    }
}

impl Notifier for Effects {
    fn notify(&mut self, message: &str, severity: Severity, duration: Duration) {
        Effects::notify(self, message, severity, Some(duration));
    }
}
