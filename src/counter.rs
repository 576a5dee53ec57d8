//! Count-up animation for numeric figures (KPI tiles and the like).
//!
//! The count runs from the number currently displayed in the element to its
//! `data-target` attribute (or, lacking that, the displayed number itself),
//! in fixed ticks over a fixed duration. The displayed text is always an
//! integer (floored) and the last tick lands exactly on the target.

use std::collections::HashMap;
use std::time::Duration;

use crate::document::{Document, ElementId};
use crate::scheduler::{JobKind, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterConfig {
    pub duration: Duration,
    pub tick: Duration,
}

impl CounterConfig {
    pub const DEFAULT: Self = Self {
        duration: Duration::from_millis(2000),
        tick: Duration::from_millis(16),
    };

    /// Number of ticks needed to cover the duration
    pub fn total_ticks(&self) -> u32 {
        if self.tick.is_zero() {
            return 1;
        }
        let ticks = self.duration.as_nanos().div_ceil(self.tick.as_nanos());
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub start: f64,
    pub target: f64,
    /// Change per tick
    pub increment: f64,
    pub current: f64,
    pub ticks: u32,
    pub finished: bool,
}

impl Counter {
    pub fn displayed(&self) -> i64 {
        self.current.floor() as i64
    }
}

/// Runs counters and remembers which elements already counted.
pub struct CounterReveal {
    config: CounterConfig,
    counters: HashMap<ElementId, Counter>,
}

impl CounterReveal {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            counters: HashMap::new(),
        }
    }

    /// Start counting `element`. Each element counts at most once; later
    /// calls return false. Elements without a usable number are left alone.
    pub fn begin(
        &mut self,
        document: &mut Document,
        element: ElementId,
        scheduler: &mut Scheduler,
    ) -> bool {
        if self.counters.contains_key(&element) {
            return false;
        }
        let Some(el) = document.get_mut(element) else {
            return false;
        };
        let displayed = parse_leading_int(&el.text);
        let Some(target) = el
            .get_attr("data-target")
            .and_then(parse_leading_int)
            .or(displayed)
        else {
            log::debug!("counter {:?} has no numeric target, skipping", element);
            return false;
        };
        let start = displayed.unwrap_or(0) as f64;
        let target = target as f64;
        let increment = (target - start) / self.config.total_ticks() as f64;

        el.set_attr("data-animated", "true");
        let mut counter = Counter {
            start,
            target,
            increment,
            current: start,
            ticks: 0,
            finished: false,
        };
        if increment == 0.0 {
            counter.current = target;
            counter.finished = true;
            el.text = counter.displayed().to_string();
        } else {
            scheduler.schedule_after(self.config.tick, JobKind::CounterTick(element));
        }
        log::trace!("counter {:?}: {} -> {}", element, start, target);
        self.counters.insert(element, counter);
        true
    }

    /// Advance one tick and write the new value into the element.
    pub fn tick(&mut self, document: &mut Document, element: ElementId, scheduler: &mut Scheduler) {
        let total_ticks = self.config.total_ticks();
        let Some(counter) = self.counters.get_mut(&element) else {
            return;
        };
        if counter.finished {
            return;
        }
        counter.ticks += 1;
        counter.current = counter.start + counter.increment * counter.ticks as f64;
        let overshot = (counter.increment > 0.0 && counter.current >= counter.target)
            || (counter.increment < 0.0 && counter.current <= counter.target);
        if overshot || counter.ticks >= total_ticks {
            counter.current = counter.target;
            counter.finished = true;
        }

        match document.get_mut(element) {
            Some(el) => el.text = counter.displayed().to_string(),
            // Element gone: nothing left to draw into
            None => counter.finished = true,
        }
        if !counter.finished {
            scheduler.schedule_after(self.config.tick, JobKind::CounterTick(element));
        }
    }

    pub fn get(&self, element: ElementId) -> Option<&Counter> {
        self.counters.get(&element)
    }

    /// Whether `element` has already been counted (or is counting)
    pub fn is_animated(&self, element: ElementId) -> bool {
        self.counters.contains_key(&element)
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

/// Integer at the start of `text`, after optional whitespace and sign.
/// Trailing non-digits are ignored ("1,200 users" → 1).
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}
