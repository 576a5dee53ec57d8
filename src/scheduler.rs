// ============================================================================
// Deterministic timer queue
// ============================================================================
//
// Every delayed effect (stagger reveals, particle expiry, ripple removal,
// counter ticks, toast phases) is a `Job` with a due time on the engine's
// timeline. Jobs never run on their own: `Effects::advance_to` drains them in
// (due, insertion) order. A job whose target is gone or superseded is simply
// a no-op when it runs.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::document::ElementId;
use crate::particles::ParticleId;
use crate::toast::ToastId;

/// Job types for scheduled effect work
#[derive(Clone, Debug, PartialEq)]
pub enum JobKind {
    /// Reveal one child of a stagger container
    RevealStaggerItem(ElementId),
    /// One step of the startup particle burst
    BurstParticle,
    /// Periodic chance to add a particle
    AmbientTick,
    ExpireParticle(ParticleId),
    /// Remove a ripple, unless it was replaced by a newer one since
    RemoveRipple { element: ElementId, generation: u32 },
    CounterTick(ElementId),
    /// Apply the pending parallax offsets (one per frame)
    ParallaxFrame,
    ToastEnter(ToastId),
    ToastLeave(ToastId),
    ToastRemove(ToastId),
    RemoveClass { element: ElementId, class: String },
    LoaderFade,
    LoaderRemove,
}

/// A scheduled job
#[derive(Clone, Debug)]
pub struct Job {
    pub due: Duration,
    seq: u64,
    pub kind: JobKind,
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Job {}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Single-threaded timer queue on a virtual timeline.
#[derive(Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Job>>,
    next_seq: u64,
    now: Duration,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position on the timeline
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a job at an absolute time. Times in the past run on the next
    /// drain.
    pub fn schedule_at(&mut self, due: Duration, kind: JobKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        log::trace!("schedule {:?} at {:?}", kind, due);
        self.queue.push(Reverse(Job { due, seq, kind }));
    }

    pub fn schedule_after(&mut self, delay: Duration, kind: JobKind) {
        self.schedule_at(self.now + delay, kind);
    }

    /// Pop the earliest job due at or before `until` and move the clock to
    /// its due time (never backwards).
    pub fn pop_due(&mut self, until: Duration) -> Option<Job> {
        let due = self.queue.peek()?.0.due;
        if due > until {
            return None;
        }
        let Reverse(job) = self.queue.pop()?;
        self.now = self.now.max(job.due);
        Some(job)
    }

    /// Move the clock forward. Moving backwards is ignored.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(job)| job.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Count pending jobs matching `predicate`
    pub fn count(&self, predicate: impl Fn(&JobKind) -> bool) -> usize {
        self.queue.iter().filter(|Reverse(job)| predicate(&job.kind)).count()
    }

    /// Drop pending jobs matching `predicate`
    pub fn cancel(&mut self, predicate: impl Fn(&JobKind) -> bool) {
        self.queue.retain(|Reverse(job)| !predicate(&job.kind));
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
