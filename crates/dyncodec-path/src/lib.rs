//! Path addresses into documents.
//!
//! A [`PathAddress`] is an immutable, ordered sequence of [`Segment`]s, each a
//! named key or a numeric index. Paths are assembled with a [`PathBuilder`]
//! and have a dotted text form where keys are joined by `.` and indices are
//! appended as `[n]` with no separator.
//!
//! # Example
//!
//! ```
//! use dyncodec_path::PathAddress;
//!
//! let path = PathAddress::builder().key("key").index(0).key("hello").build();
//! assert_eq!(path.to_string(), "key[0].hello");
//!
//! let parsed: PathAddress = "key[0].hello".parse().unwrap();
//! assert_eq!(parsed, path);
//! ```

use std::fmt;
use std::str::FromStr;

pub mod parser;
pub mod types;
pub mod util;

pub use parser::PathSyntaxError;
pub use types::Segment;
pub use util::{escape_key, is_valid_index};

use parser::PathParser;

/// An immutable address into a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathAddress {
    segments: Vec<Segment>,
}

impl PathAddress {
    /// The empty (root) path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Start an empty cursor.
    pub fn builder() -> PathBuilder {
        PathBuilder::default()
    }

    /// Resume editing a copy of this path. The original is left untouched.
    pub fn to_builder(&self) -> PathBuilder {
        PathBuilder {
            segments: self.segments.clone(),
        }
    }

    /// Parse the dotted text form.
    ///
    /// # Errors
    ///
    /// Returns [`PathSyntaxError`] for malformed input; no partial result is
    /// produced.
    ///
    /// # Example
    ///
    /// ```
    /// use dyncodec_path::{PathAddress, PathSyntaxError};
    ///
    /// let path = PathAddress::parse("a.b[2]").unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(PathAddress::parse("a..b"), Err(PathSyntaxError::EmptyKey { pos: 2 }));
    /// ```
    pub fn parse(text: &str) -> Result<Self, PathSyntaxError> {
        PathParser::parse(text).map(|segments| Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True only for the zero-segment path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The path without its last segment, or `None` for the root.
    pub fn parent(&self) -> Option<PathAddress> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Check if `prefix` is a (non-strict) prefix of this path.
    pub fn starts_with(&self, prefix: &PathAddress) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// A new path with `segment` appended.
    pub fn join(&self, segment: impl Into<Segment>) -> PathAddress {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && segment.is_key() {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for PathAddress {
    type Err = PathSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<Segment>> for PathAddress {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<Segment> for PathAddress {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PathAddress {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// A mutable cursor over a path.
///
/// Every method consumes and returns the cursor so edits chain:
///
/// ```
/// use dyncodec_path::PathAddress;
///
/// let path = PathAddress::builder().key("k1").index(0).up().key("k2").build();
/// assert_eq!(path.to_string(), "k1.k2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBuilder {
    segments: Vec<Segment>,
}

impl PathBuilder {
    /// Append a key segment.
    pub fn key(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(name.into()));
        self
    }

    /// Append an index segment.
    pub fn index(mut self, i: usize) -> Self {
        self.segments.push(Segment::Index(i));
        self
    }

    pub fn segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Remove the last segment. A no-op on the empty path.
    pub fn up(self) -> Self {
        self.up_by(1)
    }

    /// Remove up to `n` trailing segments, clamping at the empty path.
    pub fn up_by(mut self, n: usize) -> Self {
        let len = self.segments.len();
        if n > len {
            tracing::trace!(requested = n, available = len, "path navigation clamped at root");
        }
        self.segments.truncate(len.saturating_sub(n));
        self
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Freeze the cursor.
    pub fn build(self) -> PathAddress {
        PathAddress {
            segments: self.segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_keys_and_appends_indices() {
        let path = PathAddress::builder()
            .key("key")
            .key("hello")
            .index(1)
            .index(0)
            .build();
        assert_eq!(path.to_string(), "key.hello[1][0]");
    }

    #[test]
    fn test_display_leading_index() {
        let path = PathAddress::builder().index(0).key("a").build();
        assert_eq!(path.to_string(), "[0].a");
    }

    #[test]
    fn test_root_is_empty() {
        assert!(PathAddress::root().is_empty());
        assert_eq!(PathAddress::root().to_string(), "");
        assert_eq!(PathAddress::root().parent(), None);
    }

    #[test]
    fn test_to_builder_leaves_original() {
        let original = PathAddress::builder().key("a").key("b").build();
        let edited = original.to_builder().up().build();
        assert_eq!(original.len(), 2);
        assert_eq!(edited.len(), 1);
    }

    #[test]
    fn test_parent_and_prefix() {
        let path = PathAddress::builder().key("a").index(2).build();
        let parent = path.parent().unwrap();
        assert_eq!(parent, PathAddress::builder().key("a").build());
        assert!(path.starts_with(&parent));
        assert!(!parent.starts_with(&path));
        assert_eq!(parent.join(2usize), path);
    }
}
