//! Implementation of an augmented interval tree ([`interval_tree::IntervalTree`])
//! storing closed intervals with associated values. It is based on the
//! data structure described in Cormen et al.
//! (2009, Section 14.3: Interval trees, pp. 348–354): a red-black binary
//! search tree ordered by low endpoint, where every node caches the maximum
//! high endpoint of its subtree. The cached maxima let the tree answer
//! "does any stored interval overlap this query interval?" in a single
//! root-to-leaf descent, while insertion, removal and exact lookup all run
//! in logarithmic time.
//!
//! Note that any [`Ord`] + [`Copy`] endpoint type can be stored in this tree.

/// The closed interval key type.
pub mod interval;
/// An interval tree implemented with an augmented red-black search tree.
pub mod interval_tree;
mod node;

pub use interval::Interval;
pub use interval_tree::IntervalTree;
