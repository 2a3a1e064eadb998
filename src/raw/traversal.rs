use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;
use super::node::Node;
use super::raw_ordered_map::RawOrderedMap;

/// Pending ancestors for an in-order walk. Depth beyond the inline capacity spills to the heap.
type Stack = SmallVec<[Handle; 32]>;

/// A lazy, double-ended in-order walk over a window of the tree.
///
/// The front stack holds the nodes still to be yielded in ascending order,
/// the back stack those in descending order. `remaining` is the window length
/// computed up front from subtree counts, so the two ends never overlap.
pub(crate) struct Traversal<'a, K, V> {
    tree: &'a RawOrderedMap<K, V>,
    front: Stack,
    back: Stack,
    remaining: usize,
}

impl<'a, K, V> Traversal<'a, K, V> {
    pub(crate) fn empty(tree: &'a RawOrderedMap<K, V>) -> Self {
        Self {
            tree,
            front: Stack::new(),
            back: Stack::new(),
            remaining: 0,
        }
    }

    /// Every entry of `tree`.
    pub(crate) fn full(tree: &'a RawOrderedMap<K, V>) -> Self {
        let mut traversal = Self::empty(tree);
        traversal.remaining = tree.len();
        traversal.push_left_spine(tree.root());
        traversal.push_right_spine(tree.root());
        traversal
    }

    fn push_left_spine(&mut self, mut link: Option<Handle>) {
        while let Some(handle) = link {
            self.front.push(handle);
            link = self.tree.node(handle).left;
        }
    }

    fn push_right_spine(&mut self, mut link: Option<Handle>) {
        while let Some(handle) = link {
            self.back.push(handle);
            link = self.tree.node(handle).right;
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }

    pub(crate) fn next(&mut self) -> Option<&'a Node<K, V>> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.pop()?;
        let node = self.tree.node(handle);
        self.push_left_spine(node.right);
        self.remaining -= 1;
        Some(node)
    }

    pub(crate) fn next_back(&mut self) -> Option<&'a Node<K, V>> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.pop()?;
        let node = self.tree.node(handle);
        self.push_right_spine(node.left);
        self.remaining -= 1;
        Some(node)
    }
}

impl<'a, K: Ord, V> Traversal<'a, K, V> {
    /// Entries with keys in the closed range `[lo, hi]`; nothing when `lo > hi`.
    ///
    /// The front stack is seeded with the path to the first key `>= lo`, the
    /// back stack with the path to the last key `<= hi`. Subtrees lying wholly
    /// outside the range are never pushed.
    pub(crate) fn between<Q>(tree: &'a RawOrderedMap<K, V>, lo: &Q, hi: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut traversal = Self::empty(tree);
        traversal.remaining = tree.count_between(lo, hi);
        if traversal.remaining == 0 {
            return traversal;
        }

        let mut link = tree.root();
        while let Some(handle) = link {
            let node = tree.node(handle);
            if node.key.borrow() >= lo {
                traversal.front.push(handle);
                link = node.left;
            } else {
                link = node.right;
            }
        }

        let mut link = tree.root();
        while let Some(handle) = link {
            let node = tree.node(handle);
            if node.key.borrow() <= hi {
                traversal.back.push(handle);
                link = node.right;
            } else {
                link = node.left;
            }
        }

        traversal
    }
}

impl<K, V> Clone for Traversal<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn build(keys: &[i32]) -> RawOrderedMap<i32, ()> {
        let mut tree = RawOrderedMap::new();
        for &key in keys {
            tree.insert(key, ());
        }
        tree
    }

    fn forward(mut traversal: Traversal<'_, i32, ()>) -> Vec<i32> {
        let mut keys = Vec::new();
        while let Some(node) = traversal.next() {
            keys.push(node.key);
        }
        keys
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = build(&[]);
        let mut traversal = Traversal::full(&tree);
        assert!(traversal.next().is_none());
        assert!(traversal.next_back().is_none());
    }

    #[test]
    fn ends_meet_without_overlap() {
        let tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let mut traversal = Traversal::full(&tree);
        assert_eq!(traversal.next().map(|n| n.key), Some(1));
        assert_eq!(traversal.next_back().map(|n| n.key), Some(7));
        assert_eq!(traversal.next().map(|n| n.key), Some(2));
        assert_eq!(traversal.next_back().map(|n| n.key), Some(6));
        assert_eq!(traversal.next_back().map(|n| n.key), Some(5));
        assert_eq!(traversal.next().map(|n| n.key), Some(3));
        assert_eq!(traversal.next().map(|n| n.key), Some(4));
        assert_eq!(traversal.len(), 0);
        assert!(traversal.next().is_none());
        assert!(traversal.next_back().is_none());
    }

    #[test]
    fn range_on_degenerate_tree() {
        let tree = build(&(0..100).collect::<Vec<_>>());
        assert_eq!(forward(Traversal::between(&tree, &40, &45)), [40, 41, 42, 43, 44, 45]);
        assert_eq!(forward(Traversal::between(&tree, &45, &40)), Vec::<i32>::new());
    }

    proptest! {
        #[test]
        fn between_matches_filtered_walk(keys in prop::collection::vec(-100i32..100, 0..150), lo in -120i32..120, hi in -120i32..120) {
            let tree = build(&keys);
            let expected: Vec<i32> = forward(Traversal::full(&tree)).into_iter().filter(|key| (lo..=hi).contains(key)).collect();
            prop_assert_eq!(forward(Traversal::between(&tree, &lo, &hi)), expected.clone());

            let mut backward = Vec::new();
            let mut traversal = Traversal::between(&tree, &lo, &hi);
            while let Some(node) = traversal.next_back() {
                backward.push(node.key);
            }
            backward.reverse();
            prop_assert_eq!(backward, expected);
        }

        #[test]
        fn full_walk_is_sorted_and_complete(keys in prop::collection::vec(any::<i32>(), 0..150)) {
            let tree = build(&keys);
            let mut expected = keys.clone();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(forward(Traversal::full(&tree)), expected);
        }
    }
}
