//! Per-frame exponential smoothing of animated properties.
//!
//! Every animated property moves a fixed fraction of the remaining distance
//! toward its target once per rendered frame:
//!
//! ```text
//! current := current + (target - current) * rate
//! ```
//!
//! No timestamps or easing curves are stored. Convergence is geometric, so a
//! property never lands exactly on its target; [`Animated::is_settled`] is
//! there for callers that want a cut-off.

use glam::DVec3;
use peniko::Color;

/// Values that can be linearly interpolated.
pub trait Lerp: Copy {
    /// Interpolate from `self` toward `target` by `t` (0 = self, 1 = target).
    fn lerp_to(self, target: Self, t: f64) -> Self;

    /// Largest per-component distance to `other`.
    fn distance(self, other: Self) -> f64;
}

impl Lerp for f64 {
    fn lerp_to(self, target: Self, t: f64) -> Self {
        self + (target - self) * t
    }

    fn distance(self, other: Self) -> f64 {
        (self - other).abs()
    }
}

impl Lerp for f32 {
    fn lerp_to(self, target: Self, t: f64) -> Self {
        self + (target - self) * t as f32
    }

    fn distance(self, other: Self) -> f64 {
        f64::from((self - other).abs())
    }
}

impl Lerp for DVec3 {
    fn lerp_to(self, target: Self, t: f64) -> Self {
        self.lerp(target, t)
    }

    fn distance(self, other: Self) -> f64 {
        (self - other).abs().max_element()
    }
}

/// Colors interpolate per stored sRGB component, the same representation the
/// renderer consumes. No colorspace conversion happens.
impl Lerp for Color {
    fn lerp_to(self, target: Self, t: f64) -> Self {
        let mut components = self.components;
        for (c, goal) in components.iter_mut().zip(target.components) {
            *c = c.lerp_to(goal, t);
        }
        Color::new(components)
    }

    fn distance(self, other: Self) -> f64 {
        self.components
            .iter()
            .zip(other.components)
            .map(|(a, b)| f64::from((a - b).abs()))
            .fold(0.0, f64::max)
    }
}

/// A property smoothed toward a target once per frame.
#[derive(Debug, Clone, Copy)]
pub struct Animated<T: Lerp> {
    current: T,
    target: T,
    rate: f64,
}

impl<T: Lerp> Animated<T> {
    /// Create a property resting at `value`.
    ///
    /// `rate` is clamped into `(0, 1]`; a rate of zero would never move.
    pub fn new(value: T, rate: f64) -> Self {
        Self {
            current: value,
            target: value,
            rate: rate.clamp(f64::MIN_POSITIVE, 1.0),
        }
    }

    /// Create a property at `value` already heading for `target`.
    pub fn toward(value: T, target: T, rate: f64) -> Self {
        Self {
            target,
            ..Self::new(value, rate)
        }
    }

    /// Current (rendered) value.
    pub fn value(&self) -> T {
        self.current
    }

    /// Value the property is moving toward.
    pub fn target(&self) -> T {
        self.target
    }

    /// Fraction of the remaining distance covered per frame.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Retarget without touching the current value.
    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Jump to `value` and stop there.
    pub fn snap_to(&mut self, value: T) {
        self.current = value;
        self.target = value;
    }

    /// Advance one frame in place.
    pub fn step(&mut self) {
        self.current = self.current.lerp_to(self.target, self.rate);
    }

    /// The state one frame later, heading for `target`.
    #[must_use]
    pub fn advanced(self, target: T) -> Self {
        Self {
            current: self.current.lerp_to(target, self.rate),
            target,
            rate: self.rate,
        }
    }

    /// Whether the current value is within `epsilon` of the target.
    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.current.distance(self.target) <= epsilon
    }
}

/// Caret visibility for a hard 2 Hz blink: on for the first half of every
/// second, off for the second half.
pub fn caret_visible(elapsed: f64) -> bool {
    (elapsed * 2.0).floor().rem_euclid(2.0) < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_fraction_of_distance() {
        let mut a = Animated::toward(0.0_f64, 10.0, 0.1);
        a.step();
        assert!((a.value() - 1.0).abs() < 1e-12);
        a.step();
        assert!((a.value() - 1.9).abs() < 1e-12);
    }

    #[test]
    fn test_converges_monotonically_without_overshoot() {
        let mut a = Animated::toward(-3.0_f64, 5.0, 0.1);
        let mut previous = a.value();
        for _ in 0..500 {
            a.step();
            assert!(a.value() >= previous);
            assert!(a.value() <= 5.0);
            previous = a.value();
        }
        assert!(a.is_settled(1e-9));
    }

    #[test]
    fn test_rate_one_lands_on_target() {
        let mut a = Animated::toward(2.0_f64, 7.0, 1.0);
        a.step();
        assert!((a.value() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rate_is_clamped() {
        assert!((Animated::new(0.0_f64, 4.0).rate() - 1.0).abs() < f64::EPSILON);
        assert!(Animated::new(0.0_f64, 0.0).rate() > 0.0);
    }

    #[test]
    fn test_advanced_is_pure() {
        let a = Animated::new(0.0_f64, 0.5);
        let next = a.advanced(4.0);
        assert!(a.value().abs() < f64::EPSILON);
        assert!((next.value() - 2.0).abs() < f64::EPSILON);
        assert!((next.target() - 4.0).abs() < f64::EPSILON);
        assert!((next.advanced(4.0).value() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_vector_is_per_axis() {
        let mut a = Animated::toward(DVec3::ZERO, DVec3::new(10.0, -10.0, 2.0), 0.5);
        a.step();
        let v = a.value();
        assert!((v.x - 5.0).abs() < 1e-12);
        assert!((v.y + 5.0).abs() < 1e-12);
        assert!((v.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_color_is_per_component() {
        let mut a = Animated::toward(Color::BLACK, Color::WHITE, 0.5);
        a.step();
        let [r, g, b, alpha] = a.value().components;
        assert!((r - 0.5).abs() < 1e-6);
        assert!((g - 0.5).abs() < 1e-6);
        assert!((b - 0.5).abs() < 1e-6);
        assert!((alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_snap_to() {
        let mut a = Animated::toward(0.0_f64, 1.0, 0.1);
        a.snap_to(3.0);
        a.step();
        assert!((a.value() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_caret_blinks_at_two_hz() {
        assert!(caret_visible(0.0));
        assert!(caret_visible(0.49));
        assert!(!caret_visible(0.5));
        assert!(!caret_visible(0.99));
        assert!(caret_visible(1.0));
        assert!(!caret_visible(1.75));
    }
}
