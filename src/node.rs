use crate::interval::Interval;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arena slot of the shared sentinel node.
///
/// The sentinel stands in for every absent child and absent parent, so all
/// three links of a real node always address a live arena slot.
pub(crate) const SENTINEL: usize = 0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A tree node, owned by the arena and addressed by index.
///
/// `interval`, `value` and `max` are `None` only on the sentinel; `max` on
/// a real node caches the maximum high endpoint over the node's own
/// interval and both subtrees. The sentinel's `None` max compares below
/// every `Some(_)`, so it acts as the neutral element of max-aggregation
/// and is never updated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub(crate) struct Node<T, V> {
    pub interval: Option<Interval<T>>,
    pub value: Option<V>,
    pub max: Option<T>,
    pub left: usize,
    pub right: usize,
    pub parent: usize,
    pub color: Color,
}

impl<T: Ord + Copy, V> Node<T, V> {
    /// The permanently black, self-linked sentinel stored at slot 0.
    pub fn sentinel() -> Self {
        Node {
            interval: None,
            value: None,
            max: None,
            left: SENTINEL,
            right: SENTINEL,
            parent: SENTINEL,
            color: Color::Black,
        }
    }

    /// A freshly inserted node: red, both children absent.
    pub fn new(interval: Interval<T>, value: V) -> Self {
        Node {
            max: Some(interval.high()),
            interval: Some(interval),
            value: Some(value),
            left: SENTINEL,
            right: SENTINEL,
            parent: SENTINEL,
            color: Color::Red,
        }
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    /// Interval of a real node.
    #[inline]
    pub fn ival(&self) -> Interval<T> {
        self.interval.expect("sentinel node has no interval")
    }
}
