//! Type definitions for path addresses.

use std::fmt;

use crate::util::escape_key;

/// A step in a path address.
///
/// Either a named object key or a numeric sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object key: `name`
    Key(String),
    /// Sequence index: `[0]`
    Index(usize),
}

impl Segment {
    /// Creates a key segment.
    pub fn key(name: impl Into<String>) -> Self {
        Segment::Key(name.into())
    }

    /// Creates an index segment.
    pub fn index(i: usize) -> Self {
        Segment::Index(i)
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Segment::Key(_))
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// Get the key name if this is a key segment.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    /// Get the numeric index if this is an index segment.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(_) => None,
        }
    }
}

/// Renders the segment the way it appears inside a path: keys escaped,
/// indices bracketed.
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => f.write_str(&escape_key(k)),
            Segment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Key(name.to_string())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Key(name)
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_kinds() {
        let key = Segment::key("foo");
        assert!(key.is_key());
        assert!(!key.is_index());
        assert_eq!(key.as_key(), Some("foo"));
        assert_eq!(key.as_index(), None);

        let idx = Segment::index(3);
        assert!(idx.is_index());
        assert_eq!(idx.as_index(), Some(3));
        assert_eq!(idx.as_key(), None);
    }

    #[test]
    fn test_segment_display() {
        assert_eq!(Segment::key("foo").to_string(), "foo");
        assert_eq!(Segment::key("a.b").to_string(), "a\\.b");
        assert_eq!(Segment::index(7).to_string(), "[7]");
    }

    #[test]
    fn test_segment_structural_equality() {
        assert_eq!(Segment::from("k"), Segment::key(String::from("k")));
        assert_eq!(Segment::from(2usize), Segment::index(2));
        assert_ne!(Segment::key("0"), Segment::index(0));
    }
}
