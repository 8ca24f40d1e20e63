use std::ops::Add;

/// A closed range of scalars, used for ray parameters and box extents.
///
/// An interval with `min > max` is empty; [`Interval::EMPTY`] is the
/// canonical one (`+inf..-inf`) so that `surrounding` with it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates the tightest interval enclosing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Shift both ends by a displacement.
impl Add<f32> for Interval {
    type Output = Interval;

    fn add(self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }
}

impl Add<Interval> for f32 {
    type Output = Interval;

    fn add(self, interval: Interval) -> Interval {
        interval + self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds_is_strict() {
        let interval = Interval::new(0.0, 10.0);

        // Endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));

        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
        assert!(!interval.surrounds(-0.1));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 10.0);

        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(5.0), 5.0);
        assert_eq!(interval.clamp(15.0), 10.0);
    }

    #[test]
    fn test_interval_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);

        // 2.0 on each side (4.0 / 2)
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }

    #[test]
    fn test_interval_surrounding_with_empty_is_identity() {
        let a = Interval::new(1.0, 5.0);
        assert_eq!(Interval::surrounding(&a, &Interval::EMPTY), a);
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);

        let b = Interval::new(-2.0, 3.0);
        assert_eq!(Interval::surrounding(&a, &b), Interval::new(-2.0, 5.0));
    }

    #[test]
    fn test_interval_displacement() {
        let shifted = Interval::new(1.0, 5.0) + 2.0;
        assert_eq!(shifted, Interval::new(3.0, 7.0));
        assert_eq!(2.0 + Interval::new(1.0, 5.0), shifted);
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(empty.is_empty());
        assert_eq!(empty.size(), f32::NEG_INFINITY);
        assert!(!empty.contains(0.0));
        assert!(!empty.surrounds(0.0));
        assert_eq!(Interval::default(), Interval::EMPTY);
    }

    #[test]
    fn test_interval_universe() {
        let universe = Interval::UNIVERSE;

        assert!(universe.contains(0.0));
        assert!(universe.contains(1e10));
        assert!(universe.contains(-1e10));
        assert_eq!(universe.size(), f32::INFINITY);
    }
}
