use super::handle::Handle;

/// Which child link a descent followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A single tree vertex.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    // Number of nodes in the subtree rooted here, this node included.
    pub(crate) count: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a detached leaf.
    pub(crate) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            count: 1,
        }
    }

    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) const fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Replaces both child links, returning the old ones.
    pub(crate) fn set_children(&mut self, left: Option<Handle>, right: Option<Handle>) -> (Option<Handle>, Option<Handle>) {
        (core::mem::replace(&mut self.left, left), core::mem::replace(&mut self.right, right))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn child_links_follow_side() {
        let mut node = Node::leaf(1, ());
        let handle = Handle::new(3);
        *node.child_mut(Side::Right) = Some(handle);
        assert_eq!(node.child(Side::Right), Some(handle));
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }
}
