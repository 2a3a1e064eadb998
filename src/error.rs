/// Errors returned by [`OrderedMap`](crate::OrderedMap) operations whose
/// preconditions do not hold.
///
/// Lookups that simply miss (`get`, `floor`, `ceiling`, `delete` of an absent
/// key) are not errors and return `None` instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum Error {
    /// A rank passed to [`select`](crate::OrderedMap::select) is not in `0..size`.
    #[error("invalid argument: rank {rank} is out of bounds for a map of size {size}")]
    InvalidArgument {
        /// The rejected rank.
        rank: usize,
        /// The size of the map at the time of the call.
        size: usize,
    },
    /// The operation needs at least one entry and the map is empty.
    #[error("the map is empty")]
    EmptyCollection,
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(
            Error::InvalidArgument { rank: 3, size: 3 }.to_string(),
            "invalid argument: rank 3 is out of bounds for a map of size 3"
        );
        assert_eq!(Error::EmptyCollection.to_string(), "the map is empty");
    }

    #[test]
    fn is_core_error() {
        fn assert_error<E: core::error::Error + Send + Sync + 'static>() {}
        assert_error::<Error>();
    }
}
