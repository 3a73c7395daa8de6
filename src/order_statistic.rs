/// A 1-based rank into the sorted order of a map.
///
/// `Rank(1)` addresses the smallest key and `Rank(len)` the largest. Rank
/// zero is never occupied.
///
/// This is an order-statistic extension and is not part of the standard
/// `BTreeMap` API.
///
/// # Examples
///
/// ```
/// use sbtree::{Rank, SbTreeMap};
///
/// let mut map = SbTreeMap::new();
/// map.insert("a", 10);
/// map.insert("b", 20);
///
/// assert_eq!(map[Rank(1)], 10);
/// assert_eq!(map.rank_of(&"b"), Some(2));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
