mod arena;
mod handle;
mod node;
mod raw_ordered_map;
mod traversal;

pub(crate) use raw_ordered_map::RawOrderedMap;
pub(crate) use traversal::Traversal;
