use core::borrow::Borrow;

/// The key-value contract shared by every symbol table implementation.
///
/// Implementations differ only in how they store entries (unordered arrays,
/// sorted arrays, linked lists, search trees). Code written against this trait
/// can swap one for another.
///
/// # Examples
///
/// ```
/// use osbst::{OrderedMap, SymbolTable};
///
/// fn tally<T: SymbolTable<&'static str, u32>>(table: &mut T, words: &[&'static str]) {
///     for &word in words {
///         let seen = table.get(&word).copied().unwrap_or(0);
///         table.put(word, Some(seen + 1));
///     }
/// }
///
/// let mut table = OrderedMap::new();
/// tally(&mut table, &["to", "be", "or", "not", "to", "be"]);
/// assert_eq!(SymbolTable::get(&table, &"to"), Some(&2));
/// assert_eq!(SymbolTable::size(&table), 4);
/// ```
pub trait SymbolTable<K, V> {
    /// Iterator over the keys, in the implementation's iteration order.
    type Keys<'a>: Iterator<Item = &'a K>
    where
        Self: 'a,
        K: 'a;

    /// Associates `value` with `key`, replacing any previous value.
    ///
    /// A `None` value removes `key` instead of storing an absent value.
    /// Returns the previous value, if any.
    fn put(&mut self, key: K, value: Option<V>) -> Option<V>;

    /// Returns the value associated with `key`.
    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord;

    /// Removes `key` and returns its value. Removing an absent key does nothing.
    fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord;

    /// Returns `true` if `key` has a value.
    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).is_some()
    }

    /// Returns `true` if the table holds no entries.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of entries.
    fn size(&self) -> usize;

    /// All keys.
    fn keys(&self) -> Self::Keys<'_>;
}
