//! An order-statistic binary search tree map for Rust.
//!
//! This crate provides [`OrderedMap`], a symbol table over totally ordered keys
//! backed by an unbalanced binary search tree whose nodes record their subtree
//! sizes. Besides the usual map operations it answers order queries:
//!
//! - [`rank`](OrderedMap::rank) - How many keys are smaller than a given key
//! - [`select`](OrderedMap::select) - The key at a given sorted position
//! - [`floor`](OrderedMap::floor) / [`ceiling`](OrderedMap::ceiling) - Nearest keys below / above
//! - [`size_between`](OrderedMap::size_between) / [`keys_between`](OrderedMap::keys_between) - Closed-range counts and scans
//! - Indexing by [`Rank`] - e.g., `map[Rank(0)]` for the value of the smallest key
//!
//! # Example
//!
//! ```
//! use osbst::{OrderedMap, Rank};
//!
//! let mut scores = OrderedMap::new();
//! scores.insert("Carol", 92);
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//!
//! assert_eq!(scores.get("Bob"), Some(&85));
//! assert_eq!(scores.size(), 3);
//!
//! // Order-statistic operations, O(height)
//! assert_eq!(scores.select(1), Ok(&"Bob"));
//! assert_eq!(scores.rank("Carol"), 2);
//! assert_eq!(scores.floor("Brenda"), Some(&"Bob"));
//! assert_eq!(scores[Rank(0)], 100);
//! ```
//!
//! # Errors
//!
//! Preconditions that cannot be checked by the type system are reported as
//! [`Error`] values: [`select`](OrderedMap::select) with an out-of-range rank,
//! and [`min`](OrderedMap::min), [`max`](OrderedMap::max),
//! [`delete_min`](OrderedMap::delete_min) and
//! [`delete_max`](OrderedMap::delete_max) on an empty map. Lookups that miss
//! return `None`.
//!
//! # Implementation
//!
//! Nodes live in an arena and link to their children by index. Insertion and
//! deletion walk down one path, remembering it, and then restore subtree sizes
//! along it from the bottom up; deleting a node with two children promotes its
//! in-order successor. The tree is not rebalanced, so sorted insertion order
//! produces a height equal to the number of entries. No operation recurses, so
//! such a tree is limited only by memory. The crate only requires `alloc`.
//!
//! Structural changes are reported at `trace` level through the [`log`] facade.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;
mod symbol_table;

pub mod ordered_map;

pub use error::{Error, Result};
pub use order_statistic::Rank;
pub use ordered_map::OrderedMap;
pub use symbol_table::SymbolTable;
