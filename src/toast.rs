//! Toast notifications.
//!
//! A toast slides in from the right edge shortly after it is created, shows a
//! progress bar that drains over its duration, then slides back out and is
//! removed. Toasts are independent of each other; any number can be on screen.
//!
//! The host's own notifier (if it had one) is kept as a fallback through the
//! [`Notifier`] trait so other page code keeps a working path after the
//! effects are torn down.

use std::time::Duration;

use crate::animation::Transition;
use crate::scheduler::{JobKind, Scheduler};
use crate::style::ColorRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl Severity {
    /// Lenient parse: anything unrecognized is `Info`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Severity::Success,
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Success => "✓",
            Severity::Error => "✕",
            Severity::Warning => "⚠",
        }
    }

    /// Color role of the accent border and progress bar
    pub fn accent(self) -> ColorRole {
        match self {
            Severity::Info => ColorRole::Primary,
            Severity::Success => ColorRole::Success,
            Severity::Error => ColorRole::Error,
            Severity::Warning => ColorRole::Warning,
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        Severity::parse(s)
    }
}

/// Anything that can show a message to the user.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity, duration: Duration);
}

impl<F> Notifier for F
where
    F: FnMut(&str, Severity, Duration),
{
    fn notify(&mut self, message: &str, severity: Severity, duration: Duration) {
        self(message, severity, duration)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastConfig {
    pub default_duration: Duration,
    /// Delay between creation and the slide-in
    pub enter_delay: Duration,
    /// Length of the slide in and out
    pub slide_duration: Duration,
}

impl ToastConfig {
    pub const DEFAULT: Self = Self {
        default_duration: Duration::from_millis(4000),
        enter_delay: Duration::from_millis(10),
        slide_duration: Duration::from_millis(300),
    };
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Created, still parked off-screen
    Entering,
    Shown,
    Leaving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
    pub created_at: Duration,
    pub phase: ToastPhase,
    phase_started_at: Duration,
}

impl Toast {
    /// Remaining share of the progress bar, 1.0 → 0.0 over `duration`.
    pub fn progress(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.created_at);
        1.0 - Transition::linear(self.duration).progress(elapsed)
    }

    /// Horizontal offset as a fraction of the toast's width: 1.0 is fully
    /// off-screen to the right, 0.0 is in place.
    pub fn offset(&self, now: Duration, slide: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.phase_started_at);
        let transition = Transition::ease(slide);
        match self.phase {
            ToastPhase::Entering => 1.0,
            ToastPhase::Shown => transition.sample(&1.0, &0.0, elapsed),
            ToastPhase::Leaving => transition.sample(&0.0, &1.0, elapsed),
        }
    }
}

pub struct ToastNotifier {
    config: ToastConfig,
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastNotifier {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            toasts: Vec::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
        scheduler: &mut Scheduler,
    ) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        let now = scheduler.now();
        let message = message.into();
        log::debug!("toast {:?} ({}): {}", id, severity.as_str(), message);

        self.toasts.push(Toast {
            id,
            message,
            severity,
            duration,
            created_at: now,
            phase: ToastPhase::Entering,
            phase_started_at: now,
        });
        scheduler.schedule_after(self.config.enter_delay, JobKind::ToastEnter(id));
        scheduler.schedule_after(duration, JobKind::ToastLeave(id));
        id
    }

    pub fn on_enter(&mut self, id: ToastId, now: Duration) {
        if let Some(toast) = self.get_mut(id) {
            if toast.phase == ToastPhase::Entering {
                toast.phase = ToastPhase::Shown;
                toast.phase_started_at = now;
            }
        }
    }

    pub fn on_leave(&mut self, id: ToastId, scheduler: &mut Scheduler) {
        let slide = self.config.slide_duration;
        let Some(toast) = self.get_mut(id) else {
            return;
        };
        if toast.phase == ToastPhase::Leaving {
            return;
        }
        toast.phase = ToastPhase::Leaving;
        toast.phase_started_at = scheduler.now();
        scheduler.schedule_after(slide, JobKind::ToastRemove(id));
    }

    pub fn on_remove(&mut self, id: ToastId) -> bool {
        self.dismiss(id)
    }

    /// Remove a toast right away (the close button). Pending jobs for it
    /// become no-ops.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        before != self.toasts.len()
    }

    fn get_mut(&mut self, id: ToastId) -> Option<&mut Toast> {
        self.toasts.iter_mut().find(|t| t.id == id)
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    /// Toasts on screen, oldest first
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}
