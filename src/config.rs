use std::time::Duration;

use crate::counter::CounterConfig;
use crate::dispatch::{DispatchTable, Handler};
use crate::hover::HoverConfig;
use crate::loader::LoaderConfig;
use crate::particles::ParticleConfig;
use crate::style::Theme;
use crate::toast::ToastConfig;
use crate::visibility::ObserverOptions;

/// Every timing constant and tunable of the effects, with defaults matching
/// the classic page behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectsConfig {
    /// Intersection settings for scroll reveals
    pub reveal: ObserverOptions,
    /// Intersection settings for counters
    pub counter_observer: ObserverOptions,
    /// Delay between consecutive children of a stagger container
    pub stagger_delay: Duration,
    pub particles: ParticleConfig,
    pub ripple_duration: Duration,
    pub hover: HoverConfig,
    /// Parallax speed for elements without `data-speed`
    pub parallax_speed: f32,
    pub toast: ToastConfig,
    pub counter: CounterConfig,
    /// How long an invalid field shakes after a submit
    pub shake_duration: Duration,
    pub loader: LoaderConfig,
    pub theme: Theme,
    /// Seed for particle sampling; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Tick of the real-time driver, also the parallax frame length
    pub frame_interval: Duration,
    pub dispatch: DispatchTable,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            reveal: ObserverOptions::REVEAL,
            counter_observer: ObserverOptions::COUNTER,
            stagger_delay: Duration::from_millis(100),
            particles: ParticleConfig::DEFAULT,
            ripple_duration: Duration::from_millis(600),
            hover: HoverConfig::DEFAULT,
            parallax_speed: 0.5,
            toast: ToastConfig::DEFAULT,
            counter: CounterConfig::DEFAULT,
            shake_duration: Duration::from_millis(500),
            loader: LoaderConfig::default(),
            theme: Theme::default(),
            seed: None,
            frame_interval: Duration::from_millis(16),
            dispatch: DispatchTable::default(),
        }
    }
}

impl EffectsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal(mut self, options: ObserverOptions) -> Self {
        self.reveal = options;
        self
    }

    pub fn stagger_delay(mut self, delay: Duration) -> Self {
        self.stagger_delay = delay;
        self
    }

    pub fn particles(mut self, particles: ParticleConfig) -> Self {
        self.particles = particles;
        self
    }

    /// Keep the particle producers from starting on init
    pub fn without_particles(mut self) -> Self {
        self.particles.enabled = false;
        self
    }

    pub fn max_particles(mut self, max_live: Option<usize>) -> Self {
        self.particles.max_live = max_live;
        self
    }

    pub fn ripple_duration(mut self, duration: Duration) -> Self {
        self.ripple_duration = duration;
        self
    }

    pub fn hover(mut self, hover: HoverConfig) -> Self {
        self.hover = hover;
        self
    }

    pub fn parallax_speed(mut self, speed: f32) -> Self {
        self.parallax_speed = speed;
        self
    }

    pub fn toast(mut self, toast: ToastConfig) -> Self {
        self.toast = toast;
        self
    }

    pub fn counter(mut self, counter: CounterConfig) -> Self {
        self.counter = counter;
        self
    }

    pub fn shake_duration(mut self, duration: Duration) -> Self {
        self.shake_duration = duration;
        self
    }

    pub fn loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    pub fn without_loader(mut self) -> Self {
        self.loader.enabled = false;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Turn one effect off entirely, e.g. `Handler::Parallax`
    pub fn disable(mut self, handler: Handler) -> Self {
        self.dispatch.disable(handler);
        self
    }
}
