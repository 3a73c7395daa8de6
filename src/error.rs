use core::fmt;

/// The error type for fallible map and cursor operations.
///
/// # Examples
///
/// ```
/// use sbtree::{Error, SbTreeMap};
///
/// let map: SbTreeMap<i32, i32> = SbTreeMap::new();
/// assert_eq!(map.at(&1), Err(Error::KeyNotFound));
///
/// let end = map.cursor_end();
/// assert_eq!(map.cursor_key(end), Err(Error::InvalidCursor));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The requested key is not present in the map.
    KeyNotFound,
    /// The cursor belongs to another map, its element has been erased, or it
    /// does not reference an element at all.
    InvalidCursor,
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => formatter.write_str("key not found"),
            Self::InvalidCursor => formatter.write_str("invalid cursor"),
        }
    }
}

impl core::error::Error for Error {}
