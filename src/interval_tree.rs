use crate::interval::Interval;
use crate::node::{Color, Node, SENTINEL};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An interval tree implemented with an augmented red-black search tree,
/// following Cormen et al. (2009, Section 14.3).
///
/// Nodes are ordered by low endpoint, with ties placed in the right
/// subtree, and every node caches the maximum high endpoint found in its
/// subtree. The cache is what lets [`find_overlap`](IntervalTree::find_overlap)
/// prune one whole subtree at every step of its descent.
///
/// All nodes live in a single arena (`Vec`) and reference each other by
/// index; slot 0 holds a shared black sentinel that stands in for every
/// absent child and parent, so the rebalancing code never branches on
/// missing links. Intervals with identical bounds may be stored several
/// times; each insertion creates a distinct node.
///
/// # Example
///
/// ```
/// use augmented_interval_tree::{Interval, IntervalTree};
///
/// let mut tree = IntervalTree::new();
/// tree.insert(Interval::new(16, 21), "a");
/// tree.insert(Interval::new(8, 9), "b");
/// tree.insert(Interval::new(25, 30), "c");
///
/// assert_eq!(tree.find_overlap(&Interval::new(22, 27)), Some(Interval::new(25, 30)));
/// assert!(tree.find_overlap(&Interval::new(10, 14)).is_none());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct IntervalTree<T, V> {
    nodes: Vec<Node<T, V>>,
    root: usize,
    len: usize,
}

impl<T: Ord + Copy, V> IntervalTree<T, V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tree with room for `capacity` intervals.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(Node::sentinel());
        IntervalTree {
            nodes,
            root: SENTINEL,
            len: 0,
        }
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no intervals.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every interval, keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.root = SENTINEL;
        self.len = 0;
    }

    /// Inserts an interval with its associated value.
    ///
    /// Intervals with bounds identical to an already stored interval are
    /// kept as separate entries.
    ///
    /// # Example
    ///
    /// ```
    /// use augmented_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 4), 10);
    /// tree.insert(Interval::new(1, 4), 11);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, interval: Interval<T>, value: V) {
        let low = interval.low();
        let high = interval.high();
        let z = self.nodes.len();
        self.nodes.push(Node::new(interval, value));

        // Descend to the insertion point, folding the new high endpoint
        // into the max cache of every node on the path.
        let mut y = SENTINEL;
        let mut x = self.root;
        while x != SENTINEL {
            y = x;
            if self.nodes[x].max < Some(high) {
                self.nodes[x].max = Some(high);
            }
            x = if low < self.nodes[x].ival().low() {
                self.nodes[x].left
            } else {
                self.nodes[x].right
            };
        }

        self.nodes[z].parent = y;
        if y == SENTINEL {
            self.root = z;
        } else if low < self.nodes[y].ival().low() {
            self.nodes[y].left = z;
        } else {
            self.nodes[y].right = z;
        }

        self.insert_fixup(z);
        self.len += 1;
    }

    /// Removes one interval with exactly the given bounds, returning its
    /// value, or `None` (without mutating the tree) if no such interval is
    /// stored.
    ///
    /// # Example
    ///
    /// ```
    /// use augmented_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(2, 6), 'x');
    /// assert_eq!(tree.remove(&Interval::new(2, 6)), Some('x'));
    /// assert_eq!(tree.remove(&Interval::new(2, 6)), None);
    /// ```
    pub fn remove(&mut self, interval: &Interval<T>) -> Option<V> {
        let z = self.search_node(interval);
        if z == SENTINEL {
            return None;
        }
        self.unlink(z);

        // Keep the arena compact: back-fill the freed slot with the last
        // node and re-point every link that still addresses the old slot.
        let removed = self.nodes.swap_remove(z);
        let old = self.nodes.len();
        if z != old {
            self.relink(old, z);
        }
        self.len -= 1;
        removed.value
    }

    /// Returns a reference to the value stored with exactly the given
    /// bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use augmented_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(7, 11), 4);
    /// assert_eq!(tree.get(&Interval::new(7, 11)), Some(&4));
    /// assert_eq!(tree.get(&Interval::new(7, 12)), None);
    /// ```
    pub fn get(&self, interval: &Interval<T>) -> Option<&V> {
        let x = self.search_node(interval);
        if x == SENTINEL {
            None
        } else {
            self.nodes[x].value.as_ref()
        }
    }

    /// Returns a mutable reference to the value stored with exactly the
    /// given bounds.
    pub fn get_mut(&mut self, interval: &Interval<T>) -> Option<&mut V> {
        let x = self.search_node(interval);
        if x == SENTINEL {
            None
        } else {
            self.nodes[x].value.as_mut()
        }
    }

    /// Whether an interval with exactly the given bounds is stored.
    ///
    /// This is an equality test, not an overlap test; see
    /// [`overlaps`](IntervalTree::overlaps) for the latter.
    ///
    /// # Example
    ///
    /// ```
    /// use augmented_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(5, 8), ());
    /// assert!(tree.contains(&Interval::new(5, 8)));
    /// assert!(!tree.contains(&Interval::new(5, 9)));
    /// ```
    pub fn contains(&self, interval: &Interval<T>) -> bool {
        self.search_node(interval) != SENTINEL
    }

    /// Returns some stored interval overlapping `query`, or `None` if no
    /// stored interval does.
    ///
    /// This is a single root-to-leaf descent: at a node that does not
    /// itself intersect the query, the search goes left iff the left
    /// subtree's cached max endpoint reaches the query's low endpoint,
    /// and right otherwise. When several stored intervals overlap the
    /// query, which one is returned is unspecified; `None` however
    /// guarantees that no overlap exists.
    ///
    /// # Example
    ///
    /// ```
    /// use augmented_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(15, 23), ());
    /// tree.insert(Interval::new(26, 26), ());
    /// let hit = tree.find_overlap(&Interval::new(14, 16));
    /// assert_eq!(hit, Some(Interval::new(15, 23)));
    /// assert_eq!(tree.find_overlap(&Interval::new(24, 25)), None);
    /// ```
    pub fn find_overlap(&self, query: &Interval<T>) -> Option<Interval<T>> {
        let mut x = self.root;
        while x != SENTINEL {
            let ival = self.nodes[x].ival();
            if ival.intersects(query) {
                return Some(ival);
            }
            let left = self.nodes[x].left;
            x = if left != SENTINEL && self.nodes[left].max >= Some(query.low()) {
                left
            } else {
                self.nodes[x].right
            };
        }
        None
    }

    /// Whether any stored interval overlaps `query`.
    ///
    /// # Example
    ///
    /// ```
    /// use augmented_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(1, 3), ());
    /// tree.insert(Interval::new(6, 7), ());
    /// assert!(tree.overlaps(&Interval::new(2, 5)));
    /// assert!(!tree.overlaps(&Interval::new(4, 5)));
    /// ```
    pub fn overlaps(&self, query: &Interval<T>) -> bool {
        self.find_overlap(query).is_some()
    }

    /// Iterates over `(interval, &value)` pairs in order of low endpoint.
    ///
    /// # Example
    ///
    /// ```
    /// use augmented_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// tree.insert(Interval::new(6, 10), 'b');
    /// tree.insert(Interval::new(0, 3), 'a');
    /// let intervals: Vec<_> = tree.iter().map(|(iv, _)| iv).collect();
    /// assert_eq!(intervals, vec![Interval::new(0, 3), Interval::new(6, 10)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, V> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Exact-match descent: compare by low endpoint only, ties to the
    /// right, until a node with equal bounds or the sentinel is reached.
    /// This mirrors the insertion rule, so a stored interval is found on
    /// the same path insertion placed it on.
    fn search_node(&self, interval: &Interval<T>) -> usize {
        let mut x = self.root;
        while x != SENTINEL && self.nodes[x].ival() != *interval {
            x = if interval.low() < self.nodes[x].ival().low() {
                self.nodes[x].left
            } else {
                self.nodes[x].right
            };
        }
        x
    }

    fn minimum(&self, mut x: usize) -> usize {
        while self.nodes[x].left != SENTINEL {
            x = self.nodes[x].left;
        }
        x
    }

    /// `max(own high, left.max, right.max)` from current child pointers.
    /// The sentinel's `None` max loses every comparison.
    fn recalculate_max(&mut self, x: usize) {
        let max = Some(self.nodes[x].ival().high())
            .max(self.nodes[self.nodes[x].left].max)
            .max(self.nodes[self.nodes[x].right].max);
        self.nodes[x].max = max;
    }

    /// Recomputes the max cache from `x` up to the root.
    fn update_max_upward(&mut self, mut x: usize) {
        while x != SENTINEL {
            self.recalculate_max(x);
            x = self.nodes[x].parent;
        }
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v` in
    /// `u`'s parent. `v` may be the sentinel, whose parent link then
    /// serves as scratch for the delete-fixup.
    fn transplant(&mut self, u: usize, v: usize) {
        let p = self.nodes[u].parent;
        if p == SENTINEL {
            self.root = v;
        } else if self.nodes[p].left == u {
            self.nodes[p].left = v;
        } else {
            self.nodes[p].right = v;
        }
        self.nodes[v].parent = p;
    }

    fn rotate_left(&mut self, x: usize) {
        let y = self.nodes[x].right;
        debug_assert!(y != SENTINEL, "cannot left-rotate without a right child");

        let yl = self.nodes[y].left;
        self.nodes[x].right = yl;
        if yl != SENTINEL {
            self.nodes[yl].parent = x;
        }

        let p = self.nodes[x].parent;
        self.nodes[y].parent = p;
        if p == SENTINEL {
            self.root = y;
        } else if self.nodes[p].left == x {
            self.nodes[p].left = y;
        } else {
            self.nodes[p].right = y;
        }

        self.nodes[y].left = x;
        self.nodes[x].parent = y;

        // Demoted node first: the promoted node's max depends on it.
        self.recalculate_max(x);
        self.recalculate_max(y);
    }

    fn rotate_right(&mut self, x: usize) {
        let y = self.nodes[x].left;
        debug_assert!(y != SENTINEL, "cannot right-rotate without a left child");

        let yr = self.nodes[y].right;
        self.nodes[x].left = yr;
        if yr != SENTINEL {
            self.nodes[yr].parent = x;
        }

        let p = self.nodes[x].parent;
        self.nodes[y].parent = p;
        if p == SENTINEL {
            self.root = y;
        } else if self.nodes[p].left == x {
            self.nodes[p].left = y;
        } else {
            self.nodes[p].right = y;
        }

        self.nodes[y].right = x;
        self.nodes[x].parent = y;

        self.recalculate_max(x);
        self.recalculate_max(y);
    }

    /// Restores the red-black invariants after linking the red node `z`.
    fn insert_fixup(&mut self, mut z: usize) {
        while self.nodes[self.nodes[z].parent].is_red() {
            let parent = self.nodes[z].parent;
            let grandparent = self.nodes[parent].parent;
            if parent == self.nodes[grandparent].left {
                let uncle = self.nodes[grandparent].right;
                if self.nodes[uncle].is_red() {
                    self.nodes[parent].color = Color::Black;
                    self.nodes[uncle].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.nodes[parent].right {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.nodes[z].parent;
                    let grandparent = self.nodes[parent].parent;
                    self.nodes[parent].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.nodes[grandparent].left;
                if self.nodes[uncle].is_red() {
                    self.nodes[parent].color = Color::Black;
                    self.nodes[uncle].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.nodes[parent].left {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.nodes[z].parent;
                    let grandparent = self.nodes[parent].parent;
                    self.nodes[parent].color = Color::Black;
                    self.nodes[grandparent].color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }
        let root = self.root;
        self.nodes[root].color = Color::Black;
    }

    /// Splices node `z` out of the tree. The slot itself is reclaimed by
    /// the caller; afterwards no link addresses `z` and all invariants
    /// hold for the remaining nodes.
    fn unlink(&mut self, z: usize) {
        let mut spliced_color = self.nodes[z].color;
        let x;
        if self.nodes[z].left == SENTINEL {
            x = self.nodes[z].right;
            let p = self.nodes[z].parent;
            self.transplant(z, x);
            self.update_max_upward(p);
        } else if self.nodes[z].right == SENTINEL {
            x = self.nodes[z].left;
            let p = self.nodes[z].parent;
            self.transplant(z, x);
            self.update_max_upward(p);
        } else {
            // Two real children: the in-order successor is relocated into
            // z's position, inheriting z's color; its own right child is
            // transplanted into its original slot.
            let y = self.minimum(self.nodes[z].right);
            spliced_color = self.nodes[y].color;
            x = self.nodes[y].right;
            let lowest_changed;
            if self.nodes[y].parent == z {
                self.nodes[x].parent = y;
                lowest_changed = y;
            } else {
                lowest_changed = self.nodes[y].parent;
                self.transplant(y, x);
                self.nodes[y].right = self.nodes[z].right;
                let yr = self.nodes[y].right;
                self.nodes[yr].parent = y;
            }
            self.transplant(z, y);
            self.nodes[y].left = self.nodes[z].left;
            let yl = self.nodes[y].left;
            self.nodes[yl].parent = y;
            self.nodes[y].color = self.nodes[z].color;

            // The max cache is stale from the lowest spliced position up
            // to the root; repair it before any fixup rotation reads it.
            self.update_max_upward(lowest_changed);
        }

        if spliced_color == Color::Black {
            self.remove_fixup(x);
        }
        // Deletion may have used the sentinel's parent link as scratch.
        self.nodes[SENTINEL].parent = SENTINEL;
    }

    /// Restores the red-black invariants after removing a black node.
    /// `x` carries the extra blackness and may be the sentinel, whose
    /// parent link was set by the preceding transplant.
    fn remove_fixup(&mut self, mut x: usize) {
        while x != self.root && !self.nodes[x].is_red() {
            let p = self.nodes[x].parent;
            if x == self.nodes[p].left {
                let mut w = self.nodes[p].right;
                if self.nodes[w].is_red() {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    w = self.nodes[p].right;
                }
                debug_assert!(w != SENTINEL, "double-black node with sentinel sibling");
                if !self.nodes[self.nodes[w].left].is_red()
                    && !self.nodes[self.nodes[w].right].is_red()
                {
                    self.nodes[w].color = Color::Red;
                    x = p;
                } else {
                    if !self.nodes[self.nodes[w].right].is_red() {
                        let wl = self.nodes[w].left;
                        self.nodes[wl].color = Color::Black;
                        self.nodes[w].color = Color::Red;
                        self.rotate_right(w);
                        w = self.nodes[p].right;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    let wr = self.nodes[w].right;
                    self.nodes[wr].color = Color::Black;
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut w = self.nodes[p].left;
                if self.nodes[w].is_red() {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    w = self.nodes[p].left;
                }
                debug_assert!(w != SENTINEL, "double-black node with sentinel sibling");
                if !self.nodes[self.nodes[w].right].is_red()
                    && !self.nodes[self.nodes[w].left].is_red()
                {
                    self.nodes[w].color = Color::Red;
                    x = p;
                } else {
                    if !self.nodes[self.nodes[w].left].is_red() {
                        let wr = self.nodes[w].right;
                        self.nodes[wr].color = Color::Black;
                        self.nodes[w].color = Color::Red;
                        self.rotate_left(w);
                        w = self.nodes[p].left;
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    let wl = self.nodes[w].left;
                    self.nodes[wl].color = Color::Black;
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }
        self.nodes[x].color = Color::Black;
    }

    /// After `swap_remove`, the node stored at slot `old` now lives at
    /// slot `new`; re-point its parent's child link and its children's
    /// parent links.
    fn relink(&mut self, old: usize, new: usize) {
        if self.root == old {
            self.root = new;
        }
        let p = self.nodes[new].parent;
        if p != SENTINEL {
            if self.nodes[p].left == old {
                self.nodes[p].left = new;
            } else {
                debug_assert_eq!(self.nodes[p].right, old);
                self.nodes[p].right = new;
            }
        }
        let l = self.nodes[new].left;
        if l != SENTINEL {
            self.nodes[l].parent = new;
        }
        let r = self.nodes[new].right;
        if r != SENTINEL {
            self.nodes[r].parent = new;
        }
    }
}

impl<T: Ord + Copy, V> Default for IntervalTree<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Copy, V> FromIterator<(Interval<T>, V)> for IntervalTree<T, V> {
    fn from_iter<I: IntoIterator<Item = (Interval<T>, V)>>(iter: I) -> Self {
        let mut tree = IntervalTree::new();
        for (interval, value) in iter {
            tree.insert(interval, value);
        }
        tree
    }
}

/// In-order iterator over a tree, smallest low endpoint first.
pub struct Iter<'a, T, V> {
    tree: &'a IntervalTree<T, V>,
    stack: Vec<usize>,
}

impl<'a, T: Ord + Copy, V> Iter<'a, T, V> {
    fn push_left_spine(&mut self, mut x: usize) {
        while x != SENTINEL {
            self.stack.push(x);
            x = self.tree.nodes[x].left;
        }
    }
}

impl<'a, T: Ord + Copy, V> Iterator for Iter<'a, T, V> {
    type Item = (Interval<T>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[x];
        self.push_left_spine(node.right);
        Some((
            node.ival(),
            node.value.as_ref().expect("sentinel node has no value"),
        ))
    }
}

impl<'a, T: Ord + Copy, V> IntoIterator for &'a IntervalTree<T, V> {
    type Item = (Interval<T>, &'a V);
    type IntoIter = Iter<'a, T, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
