use super::Animatable;

/// Piecewise-linear keyframes over normalized time, like a CSS
/// `@keyframes` block with percentage stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes<T: Animatable> {
    /// (offset in [0, 1], value), sorted by offset
    stops: Vec<(f32, T)>,
}

impl<T: Animatable> Keyframes<T> {
    /// Build from stops in any order. Offsets are clamped to `[0, 1]`.
    pub fn new(stops: impl IntoIterator<Item = (f32, T)>) -> Self {
        let mut stops: Vec<(f32, T)> = stops
            .into_iter()
            .map(|(offset, value)| (offset.clamp(0.0, 1.0), value))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// Value at normalized time `t`. Before the first stop the first value
    /// holds, after the last stop the last value holds. `None` without stops.
    pub fn sample(&self, t: f32) -> Option<T> {
        let (first, last) = (self.stops.first()?, self.stops.last()?);
        if t <= first.0 {
            return Some(first.1.clone());
        }
        if t >= last.0 {
            return Some(last.1.clone());
        }
        let next = self.stops.iter().position(|(offset, _)| *offset > t)?;
        let (from_offset, from) = &self.stops[next - 1];
        let (to_offset, to) = &self.stops[next];
        let span = to_offset - from_offset;
        if span <= 0.0 {
            return Some(to.clone());
        }
        Some(T::lerp(from, to, (t - from_offset) / span))
    }
}
