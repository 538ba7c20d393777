use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed interval `[low, high]`.
///
/// Two intervals are equal iff both endpoints match. Construction enforces
/// `low <= high`; the tree's ordering and intersection logic assume
/// well-formed intervals throughout.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    low: T,
    high: T,
}

impl<T: Ord + Copy> Interval<T> {
    /// Creates a new closed interval.
    ///
    /// # Panics
    ///
    /// Panics if `low > high`. A malformed interval would silently corrupt
    /// the tree's cached maxima and its intersection predicate, so the
    /// check happens here, at the boundary.
    pub fn new(low: T, high: T) -> Self {
        assert!(low <= high, "Cannot create an interval with low > high");
        Interval { low, high }
    }

    /// The low endpoint.
    #[inline]
    pub fn low(&self) -> T {
        self.low
    }

    /// The high endpoint.
    #[inline]
    pub fn high(&self) -> T {
        self.high
    }

    /// Whether `self` and `other` share at least one point.
    ///
    /// Both intervals are closed, so `[1, 3]` intersects `[3, 5]`.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_interval_is_valid() {
        let iv = Interval::new(4, 4);
        assert_eq!(iv.low(), 4);
        assert_eq!(iv.high(), 4);
    }

    #[test]
    #[should_panic(expected = "low > high")]
    fn reversed_bounds_panic() {
        Interval::new(5, 2);
    }

    #[test]
    fn intersection_is_closed_and_symmetric() {
        let a = Interval::new(1, 3);
        let b = Interval::new(3, 5);
        let c = Interval::new(4, 8);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(b.intersects(&c));
        assert!(!a.intersects(&c));

        // Containment counts as intersection.
        let outer = Interval::new(0, 10);
        let inner = Interval::new(4, 5);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn equality_requires_both_endpoints() {
        assert_eq!(Interval::new(1, 5), Interval::new(1, 5));
        assert_ne!(Interval::new(1, 5), Interval::new(1, 6));
        assert_ne!(Interval::new(1, 5), Interval::new(2, 5));
    }

    #[test]
    fn display() {
        assert_eq!(Interval::new(-2, 7).to_string(), "[-2, 7]");
    }
}
