//! Floating background particles.
//!
//! [`ParticlePool`] owns every live particle. Two producers feed it once
//! started: a one-off burst at startup and an ambient timer that adds a
//! particle now and then. Each particle expires on its own after its sampled
//! lifetime. The live population is capped; at the cap new particles are
//! skipped rather than queued.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::animation::{Keyframes, Transition};
use crate::document::ElementId;
use crate::scheduler::{JobKind, Scheduler};
use crate::style::Color;
use crate::transform::Transform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

/// Closed range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut fastrand::Rng) -> f32 {
        (self.min + rng.f32() * (self.max - self.min)).clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        RangeInclusive::new(self.min, self.max).contains(&value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    /// Start producers on `Effects::init`
    pub enabled: bool,
    /// Particles created by the startup burst
    pub burst_count: usize,
    /// Spacing between burst particles
    pub burst_interval: Duration,
    /// Period of the ambient producer
    pub ambient_period: Duration,
    /// Chance that an ambient tick creates a particle
    pub ambient_probability: f32,
    /// Diameter in pixels
    pub size: SampleRange,
    /// Horizontal position in percent of the container width
    pub horizontal: SampleRange,
    /// Lifetime in seconds
    pub lifetime_secs: SampleRange,
    pub opacity: SampleRange,
    /// Upper bound on live particles; `None` leaves growth unbounded
    pub max_live: Option<usize>,
    /// Base fill; alpha is replaced by each particle's opacity
    pub color: Color,
}

impl ParticleConfig {
    pub const DEFAULT: Self = Self {
        enabled: true,
        burst_count: 20,
        burst_interval: Duration::from_millis(200),
        ambient_period: Duration::from_millis(2000),
        ambient_probability: 0.3,
        size: SampleRange::new(2.0, 6.0),
        horizontal: SampleRange::new(0.0, 100.0),
        lifetime_secs: SampleRange::new(10.0, 20.0),
        opacity: SampleRange::new(0.1, 0.4),
        max_live: Some(48),
        color: Color::rgb(0.0, 102.0 / 255.0, 204.0 / 255.0),
    };
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub size: f32,
    /// Percent of the container width
    pub left_percent: f32,
    pub opacity: f32,
    pub lifetime: Duration,
    pub born_at: Duration,
}

impl Particle {
    pub fn expires_at(&self) -> Duration {
        self.born_at + self.lifetime
    }
}

/// Instantaneous render state of a particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
    /// Upward travel so far, negative (page y grows downward)
    pub translate_y: f32,
    pub rotation_degrees: f32,
    pub opacity: f32,
    pub color: Color,
    pub transform: Transform,
}

pub struct ParticlePool {
    config: ParticleConfig,
    container: Option<ElementId>,
    live: BTreeMap<ParticleId, Particle>,
    next_id: u64,
    created_total: usize,
    skipped_total: usize,
    running: bool,
    fade: Keyframes<f32>,
}

impl ParticlePool {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            container: None,
            live: BTreeMap::new(),
            next_id: 0,
            created_total: 0,
            skipped_total: 0,
            running: false,
            // floatUp: fade in over the first 10%, out over the last 10%
            fade: Keyframes::new([(0.0, 0.0), (0.1, 1.0), (0.9, 1.0), (1.0, 0.0)]),
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Start both producers into `container`. Does nothing when already
    /// running.
    pub fn start(&mut self, container: ElementId, scheduler: &mut Scheduler) -> bool {
        if self.running {
            log::debug!("particle producers already running");
            return false;
        }
        self.running = true;
        self.container = Some(container);

        for i in 0..self.config.burst_count {
            scheduler.schedule_after(self.config.burst_interval * i as u32, JobKind::BurstParticle);
        }
        scheduler.schedule_after(self.config.ambient_period, JobKind::AmbientTick);
        log::debug!(
            "particles started: burst of {} every {:?}, ambient every {:?}",
            self.config.burst_count,
            self.config.burst_interval,
            self.config.ambient_period
        );
        true
    }

    /// Stop producing and drop the queued burst and ambient jobs. Live
    /// particles still expire normally.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        self.running = false;
        scheduler.cancel(|kind| matches!(kind, JobKind::BurstParticle | JobKind::AmbientTick));
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn container(&self) -> Option<ElementId> {
        self.container
    }

    pub fn on_burst(&mut self, rng: &mut fastrand::Rng, scheduler: &mut Scheduler) {
        self.spawn(rng, scheduler);
    }

    /// Roll for an ambient particle and re-arm the timer.
    pub fn on_ambient_tick(&mut self, rng: &mut fastrand::Rng, scheduler: &mut Scheduler) {
        if !self.running {
            return;
        }
        if rng.f32() < self.config.ambient_probability {
            self.spawn(rng, scheduler);
        }
        scheduler.schedule_after(self.config.ambient_period, JobKind::AmbientTick);
    }

    /// Create one particle now, unless stopped or at the live cap.
    pub fn spawn(
        &mut self,
        rng: &mut fastrand::Rng,
        scheduler: &mut Scheduler,
    ) -> Option<ParticleId> {
        if !self.running {
            return None;
        }
        if let Some(max) = self.config.max_live {
            if self.live.len() >= max {
                self.skipped_total += 1;
                log::debug!("particle cap of {} reached, skipping", max);
                return None;
            }
        }

        let id = ParticleId(self.next_id);
        self.next_id += 1;
        let lifetime = Duration::from_secs_f32(self.config.lifetime_secs.sample(rng));
        let particle = Particle {
            id,
            size: self.config.size.sample(rng),
            left_percent: self.config.horizontal.sample(rng),
            opacity: self.config.opacity.sample(rng),
            lifetime,
            born_at: scheduler.now(),
        };
        log::trace!("particle {:?} born, lives {:?}", id, lifetime);
        self.live.insert(id, particle);
        self.created_total += 1;
        scheduler.schedule_after(lifetime, JobKind::ExpireParticle(id));
        Some(id)
    }

    pub fn expire(&mut self, id: ParticleId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Render state at `now` for a container `rise_distance` pixels tall.
    pub fn sample(&self, id: ParticleId, now: Duration, rise_distance: f32) -> Option<ParticleFrame> {
        let particle = self.live.get(&id)?;
        let elapsed = now.saturating_sub(particle.born_at);
        let t = Transition::linear(particle.lifetime).progress(elapsed);

        let translate_y = -rise_distance * t;
        let rotation_degrees = 360.0 * t;
        let opacity = self.fade.sample(t).unwrap_or(1.0) * particle.opacity;
        Some(ParticleFrame {
            translate_y,
            rotation_degrees,
            opacity,
            color: self.config.color.with_alpha(particle.opacity),
            transform: Transform::translate_y(translate_y)
                .then(&Transform::rotate_degrees(rotation_degrees)),
        })
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.live.get(&id)
    }

    pub fn live(&self) -> impl Iterator<Item = &Particle> {
        self.live.values()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Particles ever created
    pub fn created_total(&self) -> usize {
        self.created_total
    }

    /// Creations skipped because of the live cap
    pub fn skipped_total(&self) -> usize {
        self.skipped_total
    }

    /// Drop every live particle at once.
    pub fn clear(&mut self) {
        self.live.clear();
    }
}
