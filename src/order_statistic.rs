/// A zero-based position in the sorted key order of an
/// [`OrderedMap`](crate::OrderedMap).
///
/// Indexing with a `Rank` reaches the value at that position, the same
/// element [`select`](crate::OrderedMap::select) names by key.
///
/// # Examples
///
/// ```
/// use osbst::{OrderedMap, Rank};
///
/// let mut map = OrderedMap::new();
/// map.insert("b", 20);
/// map.insert("a", 10);
///
/// assert_eq!(map[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
