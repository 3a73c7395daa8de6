//! An ordered map on a size-balanced tree, with order statistics and cursors.
//!
//! This crate provides [`SbTreeMap`], an ordered map in the mold of the standard
//! library's `BTreeMap` with two O(log n) extensions the standard map lacks:
//!
//! - Order statistics: [`select`](SbTreeMap::select) fetches the element at a
//!   given one-based sorted position, [`rank_of`](SbTreeMap::rank_of) reports a
//!   key's position, and [`Rank`] indexes the map by position.
//! - Detached [`Cursor`]s: `Copy` tokens that name an element without borrowing
//!   the map, validated on every use, so stale or foreign positions surface as
//!   [`Error`]s instead of misbehaving.
//!
//! One deliberate departure: [`insert`](SbTreeMap::insert) never overwrites. A
//! duplicate key leaves the stored value in place and reports the existing
//! element; the `Entry` API covers the overwriting cases.
//!
//! # Example
//!
//! ```
//! use sbtree::{Rank, SbTreeMap};
//!
//! let mut ladder = SbTreeMap::new();
//! ladder.insert(1480, "freya");
//! ladder.insert(1730, "santiago");
//! ladder.insert(1615, "imani");
//!
//! // Standard map operations work as expected.
//! assert_eq!(ladder.get(&1615), Some(&"imani"));
//! assert_eq!(ladder.len(), 3);
//!
//! // Order-statistic operations are one-based: rank 1 is the lowest rating.
//! assert_eq!(ladder.select(2), Some((&1615, &"imani")));
//! assert_eq!(ladder.rank_of(&1730), Some(3));
//! assert_eq!(ladder[Rank(1)], "freya");
//!
//! // Cursors survive unrelated mutations and detect stale positions.
//! let cursor = ladder.find(&1615);
//! ladder.insert(1902, "nadia");
//! assert_eq!(ladder.cursor_key_value(cursor), Ok((&1615, &"imani")));
//! let (key, _) = ladder.erase(cursor).unwrap();
//! assert_eq!(key, 1615);
//! assert!(ladder.cursor_value(cursor).is_err());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeMap`, plus rank and cursor extensions
//! - **O(log n) rank operations** - The balancing metadata doubles as the order-statistic index
//! - **Arena storage** - Nodes live in contiguous slabs; no per-node allocation
//!
//! # Implementation
//!
//! The map is a size-balanced tree: a binary search tree in which every node
//! caches its subtree's element count. Insertion restores balance by rotating
//! wherever a grandchild's count exceeds an uncle's, and the same counts answer
//! rank queries. Nodes live in a generational arena, which is what gives
//! cursors their stable, validatable identity.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: We have to allow unsafe code for the aliasing-safe mutable iterators over the arenas.
// #![forbid(unsafe_code)]
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

pub mod sbtree_map;

pub use error::Error;
pub use order_statistic::Rank;
pub use sbtree_map::{Cursor, SbTreeMap};
