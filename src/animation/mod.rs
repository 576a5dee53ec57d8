mod animatable;
mod keyframes;
mod timing;

use std::time::Duration;

pub use animatable::Animatable;
pub use keyframes::Keyframes;
pub use timing::TimingFunction;

/// A one-shot transition: how long a value takes to move from its start to
/// its end, and along which curve.
#[derive(Clone, Debug)]
pub struct Transition {
    pub duration: Duration,
    pub timing: TimingFunction,
}

impl Transition {
    pub fn new(duration: Duration, timing: TimingFunction) -> Self {
        Self { duration, timing }
    }

    pub fn linear(duration: Duration) -> Self {
        Self::new(duration, TimingFunction::Linear)
    }

    /// CSS `ease` over the given duration
    pub fn ease(duration: Duration) -> Self {
        Self::new(duration, TimingFunction::EASE)
    }

    /// Raw progress in `[0, 1]` after `elapsed` time, before easing.
    pub fn linear_progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Eased progress after `elapsed` time.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        self.timing.evaluate(self.linear_progress(elapsed))
    }

    /// Interpolated value between `from` and `to` after `elapsed` time.
    pub fn sample<T: Animatable>(&self, from: &T, to: &T, elapsed: Duration) -> T {
        T::lerp(from, to, self.progress(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_progress() {
        let t = Transition::linear(Duration::from_millis(600));
        assert_eq!(t.progress(Duration::ZERO), 0.0);
        assert_eq!(t.progress(Duration::from_millis(300)), 0.5);
        assert_eq!(t.progress(Duration::from_millis(900)), 1.0);
    }

    #[test]
    fn test_ease_sample() {
        let t = Transition::ease(Duration::from_millis(300));
        assert_eq!(t.sample(&1.0f32, &0.0, Duration::ZERO), 1.0);
        assert!(t.sample(&1.0f32, &0.0, Duration::from_millis(150)) < 0.5);
        assert_eq!(t.sample(&1.0f32, &0.0, Duration::from_millis(400)), 0.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let t = Transition::linear(Duration::ZERO);
        assert_eq!(t.progress(Duration::ZERO), 1.0);
        assert_eq!(t.sample(&2.0f32, &8.0, Duration::ZERO), 8.0);
    }
}
