use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// One step of a descent: the node passed through and the link taken out of it.
#[derive(Clone, Copy)]
struct PathElement {
    node: Handle,
    side: Side,
}

/// Ancestors of the position being mutated, root first. Deeper paths spill to the heap.
type Path = SmallVec<[PathElement; 32]>;

/// The size-augmented binary search tree backing `OrderedMap`.
///
/// Mutations descend in a loop and record the path they took. After relinking
/// at the bottom they walk that path back up, recomputing `count` at each
/// ancestor. Nothing recurses, so a degenerate tree is limited by memory, not
/// by the call stack.
#[derive(Clone)]
pub(crate) struct RawOrderedMap<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<Handle>,
}

impl<K, V> RawOrderedMap<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of entries, read from the root's subtree count.
    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn clear(&mut self) {
        log::trace!("clearing {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Subtree size behind a child link.
    #[inline]
    pub(crate) fn size(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |handle| self.nodes.get(handle).count)
    }

    /// Restores `count == 1 + size(left) + size(right)` at `handle`.
    fn update_count(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let count = 1 + self.size(node.left) + self.size(node.right);
        self.nodes.get_mut(handle).count = count;
    }

    /// Recomputes `count` along `path`, deepest ancestor first.
    fn restore_counts(&mut self, path: &Path) {
        for elem in path.iter().rev() {
            self.update_count(elem.node);
        }
    }

    /// The link held by the last step of a path, or the root link for an empty one.
    fn link_mut(&mut self, parent: Option<&PathElement>) -> &mut Option<Handle> {
        match parent {
            None => &mut self.root,
            Some(elem) => self.nodes.get_mut(elem.node).child_mut(elem.side),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut level: alloc::vec::Vec<Handle> = self.root.into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|&handle| {
                    let node = self.nodes.get(handle);
                    node.left.into_iter().chain(node.right)
                })
                .collect();
        }
        height
    }

    /// Leftmost node of the subtree at `handle`.
    pub(crate) fn min_node(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left {
            handle = left;
        }
        handle
    }

    /// Rightmost node of the subtree at `handle`.
    pub(crate) fn max_node(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right {
            handle = right;
        }
        handle
    }

    /// Node at zero-based position `rank` in key order.
    pub(crate) fn select(&self, mut rank: usize) -> Option<Handle> {
        if rank >= self.len() {
            return None;
        }

        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let left_size = self.size(node.left);
            match rank.cmp(&left_size) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => current = node.left,
                Ordering::Greater => {
                    rank -= left_size + 1;
                    current = node.right;
                }
            }
        }
        None
    }

    /// Detaches the outermost node on `side` of the subtree at `handle`
    /// without freeing it: the minimum for `Side::Left`, the maximum for
    /// `Side::Right`.
    ///
    /// Returns the new subtree root and the detached node. The detached node
    /// keeps its stale links and count; the caller owns re-linking it.
    fn detach_extreme(&mut self, handle: Handle, side: Side) -> (Option<Handle>, Handle) {
        let mut path = Path::new();
        let mut extreme = handle;
        while let Some(next) = self.nodes.get(extreme).child(side) {
            path.push(PathElement { node: extreme, side });
            extreme = next;
        }

        // The extreme node has no child on `side`; its other child moves up.
        let orphan = self.nodes.get(extreme).child(side.opposite());
        let Some(parent) = path.last() else {
            return (orphan, extreme);
        };
        *self.nodes.get_mut(parent.node).child_mut(side) = orphan;
        self.restore_counts(&path);
        (Some(handle), extreme)
    }

    /// Removes and returns the smallest entry.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let (root, min) = self.detach_extreme(self.root?, Side::Left);
        self.root = root;
        let node = self.nodes.take(min);
        log::trace!("removed minimum, {} entries remain", self.len());
        Some((node.key, node.value))
    }

    /// Removes and returns the largest entry.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let (root, max) = self.detach_extreme(self.root?, Side::Right);
        self.root = root;
        let node = self.nodes.take(max);
        log::trace!("removed maximum, {} entries remain", self.len());
        Some((node.key, node.value))
    }

    /// Unlinks the node at `handle` from its children and returns the subtree
    /// that takes its place. The node itself is left for the caller to free.
    fn splice_out(&mut self, handle: Handle) -> Option<Handle> {
        let (left, right) = self.nodes.get_mut(handle).set_children(None, None);
        match (left, right) {
            (None, right) => right,
            (left, None) => left,
            (Some(left), Some(right)) => {
                // The in-order successor takes over this position.
                let (right, successor) = self.detach_extreme(right, Side::Left);
                self.nodes.get_mut(successor).set_children(Some(left), right);
                self.update_count(successor);
                log::trace!("spliced in-order successor into a two-child position");
                Some(successor)
            }
        }
    }
}

impl<K: Ord, V> RawOrderedMap<K, V> {
    /// Finds the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|handle| &self.nodes.get(handle).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(&mut self.nodes.get_mut(handle).value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    /// Inserts `key`, overwriting the value in place if it is already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut path = Path::new();
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get_mut(handle);
            let side = match key.cmp(&node.key) {
                // Overwrites leave every count as it was.
                Ordering::Equal => return Some(core::mem::replace(&mut node.value, value)),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            current = node.child(side);
            path.push(PathElement { node: handle, side });
        }

        let leaf = self.nodes.alloc(Node::leaf(key, value));
        *self.link_mut(path.last()) = Some(leaf);
        self.restore_counts(&path);
        None
    }

    /// Removes `key` if present. A missing key leaves the tree untouched.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut current = self.root;
        let target = loop {
            let handle = current?;
            let node = self.nodes.get(handle);
            let side = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break handle,
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            current = node.child(side);
            path.push(PathElement { node: handle, side });
        };

        let replacement = self.splice_out(target);
        *self.link_mut(path.last()) = replacement;
        self.restore_counts(&path);
        let node = self.nodes.take(target);
        Some((node.key, node.value))
    }

    /// Number of keys strictly less than `key`.
    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return rank + self.size(node.left),
                Ordering::Less => current = node.left,
                Ordering::Greater => {
                    rank += self.size(node.left) + 1;
                    current = node.right;
                }
            }
        }
        rank
    }

    /// Node with the largest key `<= key`.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Less => current = node.left,
                Ordering::Greater => {
                    // Largest candidate seen so far; the right subtree may hold a closer one.
                    best = Some(handle);
                    current = node.right;
                }
            }
        }
        best
    }

    /// Node with the smallest key `>= key`.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(handle),
                Ordering::Greater => current = node.right,
                Ordering::Less => {
                    best = Some(handle);
                    current = node.left;
                }
            }
        }
        best
    }

    /// Number of keys in the closed range `[lo, hi]`, zero when `lo > hi`.
    pub(crate) fn count_between<Q>(&self, lo: &Q, hi: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if lo > hi {
            return 0;
        }
        self.rank(hi) - self.rank(lo) + usize::from(self.contains_key(hi))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Ord + core::fmt::Debug, V> RawOrderedMap<K, V> {
        /// Checks key order, subtree counts and arena accounting. Panics with
        /// every violation found.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let counted = self.validate_node(self.root, None, None, &mut errors);

            if counted != self.nodes.len() {
                errors.push(alloc::format!(
                    "arena holds {} live nodes but {} are reachable",
                    self.nodes.len(),
                    counted
                ));
            }
            if self.root.is_none() && self.len() != 0 {
                errors.push(alloc::format!("empty tree reports len {}", self.len()));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        // Returns the number of nodes reached below `link`.
        fn validate_node(&self, link: Option<Handle>, lower: Option<&K>, upper: Option<&K>, errors: &mut Vec<String>) -> usize {
            let Some(handle) = link else {
                return 0;
            };
            let node = self.nodes.get(handle);

            if lower.is_some_and(|lower| node.key <= *lower) || upper.is_some_and(|upper| node.key >= *upper) {
                errors.push(alloc::format!(
                    "key {:?} at {:?} escapes its bounds ({:?}, {:?})",
                    node.key,
                    handle,
                    lower,
                    upper
                ));
            }

            let left = self.validate_node(node.left, lower, Some(&node.key), errors);
            let right = self.validate_node(node.right, Some(&node.key), upper, errors);
            if node.count != 1 + left + right {
                errors.push(alloc::format!(
                    "count mismatch at key {:?}: stored {}, actual {}",
                    node.key,
                    node.count,
                    1 + left + right
                ));
            }
            1 + left + right
        }

        fn keys_in_order(&self) -> Vec<&K> {
            fn walk<'a, K, V>(tree: &'a RawOrderedMap<K, V>, link: Option<Handle>, out: &mut Vec<&'a K>) {
                if let Some(handle) = link {
                    let node = tree.node(handle);
                    walk(tree, node.left, out);
                    out.push(&node.key);
                    walk(tree, node.right, out);
                }
            }
            let mut out = Vec::new();
            walk(self, self.root, &mut out);
            out
        }
    }

    fn build(keys: &[i32]) -> RawOrderedMap<i32, i32> {
        let mut tree = RawOrderedMap::new();
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..200).prop_map(Op::Insert),
            3 => (0i32..200).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_after_every_mutation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree = RawOrderedMap::new();
            for op in ops {
                match op {
                    Op::Insert(key) => { tree.insert(key, key); }
                    Op::Remove(key) => { tree.remove_entry(&key); }
                    Op::PopFirst => { tree.pop_first(); }
                    Op::PopLast => { tree.pop_last(); }
                }
                tree.validate_invariants();
            }
        }

        #[test]
        fn select_inverts_rank(keys in prop::collection::vec(-500i32..500, 1..200)) {
            let tree = build(&keys);
            for rank in 0..tree.len() {
                let handle = tree.select(rank).unwrap();
                prop_assert_eq!(tree.rank(&tree.node(handle).key), rank);
            }
            prop_assert!(tree.select(tree.len()).is_none());
        }

        #[test]
        fn rank_counts_smaller_keys(keys in prop::collection::vec(-500i32..500, 0..200), probe in -600i32..600) {
            let tree = build(&keys);
            let expected = tree.keys_in_order().into_iter().filter(|&&key| key < probe).count();
            prop_assert_eq!(tree.rank(&probe), expected);
        }

        #[test]
        fn floor_and_ceiling_bracket_probe(keys in prop::collection::vec(-500i32..500, 0..200), probe in -600i32..600) {
            let tree = build(&keys);
            let sorted = tree.keys_in_order();
            let floor = sorted.iter().rev().find(|&&&key| key <= probe).copied();
            let ceiling = sorted.iter().find(|&&&key| key >= probe).copied();
            prop_assert_eq!(tree.floor(&probe).map(|h| &tree.node(h).key), floor);
            prop_assert_eq!(tree.ceiling(&probe).map(|h| &tree.node(h).key), ceiling);
        }
    }

    #[test]
    fn two_child_delete_promotes_successor() {
        let mut tree = build(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(tree.remove_entry(&5), Some((5, 50)));
        tree.validate_invariants();

        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.key, 7);
        assert_eq!(root.count, 6);
        assert_eq!(tree.node(root.left.unwrap()).key, 3);
        let right = tree.node(root.right.unwrap());
        assert_eq!(right.key, 8);
        assert!(right.left.is_none());
        assert_eq!(tree.keys_in_order(), [&1, &3, &4, &7, &8, &9]);
    }

    #[test]
    fn successor_deep_in_right_subtree() {
        // Successor of 10 is 12, the leftmost node two levels down its right subtree.
        let mut tree = build(&[10, 5, 20, 15, 25, 12, 13]);
        tree.remove_entry(&10);
        tree.validate_invariants();

        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.key, 12);
        assert_eq!(tree.node(root.right.unwrap()).count, 4);
        assert_eq!(tree.keys_in_order(), [&5, &12, &13, &15, &20, &25]);
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(tree.remove_entry(&7), None);
        assert_eq!(tree.len(), 3);
        tree.validate_invariants();
    }

    #[test]
    fn pop_first_and_last_drain_in_order() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(tree.pop_first(), Some((1, 10)));
        assert_eq!(tree.pop_last(), Some((7, 70)));
        tree.validate_invariants();
        assert_eq!(tree.keys_in_order(), [&2, &3, &4, &5, &6]);

        let mut empty: RawOrderedMap<i32, i32> = RawOrderedMap::new();
        assert_eq!(empty.pop_first(), None);
        assert_eq!(empty.pop_last(), None);
    }

    #[test]
    fn overwrite_keeps_shape() {
        let mut tree = build(&[2, 1, 3]);
        assert_eq!(tree.insert(1, 99), Some(10));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(&1), Some(&99));
        let leaf = tree.node(tree.search(&1).unwrap());
        assert!(leaf.left.is_none() && leaf.right.is_none());
        tree.validate_invariants();
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut tree = build(&[1, 2, 3]);
        let capacity = tree.capacity();
        tree.remove_entry(&2);
        tree.insert(4, 40);
        tree.validate_invariants();
        assert_eq!(tree.capacity(), capacity);
    }

    #[test]
    fn sorted_insertion_degenerates_to_a_list() {
        let tree = build(&(0..64).collect::<Vec<_>>());
        assert_eq!(tree.height(), 64);
        assert_eq!(build(&[2, 1, 3]).height(), 2);
        assert_eq!(build(&[]).height(), 0);
    }

    #[test]
    fn deep_chain_mutations_keep_spine_counts() {
        const N: i32 = 20_000;
        let mut tree = build(&(0..N).collect::<Vec<_>>());
        assert_eq!(tree.height(), N as usize);
        assert_eq!(tree.remove_entry(&(N - 1)), Some((N - 1, (N - 1) * 10)));
        assert_eq!(tree.pop_last(), Some((N - 2, (N - 2) * 10)));
        assert_eq!(tree.pop_first(), Some((0, 0)));
        assert_eq!(tree.insert(N, 0), None);
        assert_eq!(tree.remove_entry(&(N / 2)), Some((N / 2, N / 2 * 10)));

        // Every node is a right child; counts must shrink by one per level.
        let mut expected = tree.len();
        assert_eq!(expected, (N - 3) as usize);
        let mut link = tree.root();
        while let Some(handle) = link {
            let node = tree.node(handle);
            assert!(node.left.is_none());
            assert_eq!(node.count, expected);
            expected -= 1;
            link = node.right;
        }
        assert_eq!(expected, 0);
    }

    #[test]
    fn count_between_handles_inverted_range() {
        let tree = build(&[1, 3, 5, 7]);
        assert_eq!(tree.count_between(&2, &6), 2);
        assert_eq!(tree.count_between(&3, &7), 3);
        assert_eq!(tree.count_between(&6, &2), 0);
        assert_eq!(tree.count_between(&5, &5), 1);
    }
}
