//! Field paths.
//!
//! A [`FieldPath`] is an ordered list of segments written in dotted notation
//! (`"Author.Books.Title"`). Generated field paths mark collection boundaries
//! with a doubled separator (`"Users..Password"`), which parses to an empty
//! segment and is preserved verbatim when the path is rendered back.
//!
//! Resolving a path against a root [`ShapeRef`] walks the shape arena: the
//! first segment must equal the root's local name, every following segment
//! selects a structure member ignoring case, and list elements and map values
//! are entered transparently using the same segment.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::shape::{Api, ShapeKind, ShapeRef};

/// Whether segment comparisons honor case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    /// Segments must match exactly.
    Sensitive,
    /// Segments match ignoring ASCII case.
    Insensitive,
}

/// An ordered list of path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    parts: Vec<String>,
}

impl FieldPath {
    /// Build a path from segments.
    #[must_use]
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse dotted notation. The empty string is the empty path.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::default();
        }
        Self::new(dotted.split('.'))
    }

    /// First segment, or `""` for the empty path.
    #[must_use]
    pub fn front(&self) -> &str {
        self.parts.first().map_or("", String::as_str)
    }

    /// Last segment, or `""` for the empty path.
    #[must_use]
    pub fn back(&self) -> &str {
        self.parts.last().map_or("", String::as_str)
    }

    /// Segment at `index`, or `""` when out of range.
    #[must_use]
    pub fn at(&self, index: usize) -> &str {
        self.parts.get(index).map_or("", String::as_str)
    }

    /// Remove and return the last segment (`""` when empty).
    pub fn pop(&mut self) -> String {
        self.parts.pop().unwrap_or_default()
    }

    /// Remove and return the first segment (`""` when empty).
    pub fn pop_front(&mut self) -> String {
        if self.parts.is_empty() {
            return String::new();
        }
        self.parts.remove(0)
    }

    /// Append a segment.
    pub fn push_back(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    /// Prefix made of the first `index + 1` segments.
    #[must_use]
    pub fn copy_at(&self, index: usize) -> Self {
        let end = (index + 1).min(self.parts.len());
        Self {
            parts: self.parts[..end].to_vec(),
        }
    }

    /// Number of segments.
    #[must_use]
    pub fn size(&self) -> usize {
        self.parts.len()
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Segments in order.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Whether `prefix` is a leading run of this path's segments.
    #[must_use]
    pub fn has_prefix(&self, prefix: &FieldPath, case: CaseSensitivity) -> bool {
        if prefix.size() > self.size() {
            return false;
        }
        self.parts
            .iter()
            .zip(&prefix.parts)
            .all(|(ours, theirs)| match case {
                CaseSensitivity::Sensitive => ours == theirs,
                CaseSensitivity::Insensitive => ours.eq_ignore_ascii_case(theirs),
            })
    }

    /// Resolve the full path against `root`.
    ///
    /// Returns `None` when the first segment is not the root's local name or
    /// when any later segment cannot be matched.
    #[must_use]
    pub fn resolve<'a>(&self, api: &'a Api, root: &'a ShapeRef) -> Option<&'a ShapeRef> {
        let (first, rest) = self.parts.split_first()?;
        if *first != root.name {
            return None;
        }
        rest.iter()
            .filter(|part| !part.is_empty())
            .try_fold(root, |current, part| member_ref(api, current, part))
    }

    /// Resolve the prefix of length `index + 1` against `root`.
    #[must_use]
    pub fn resolve_at<'a>(
        &self,
        api: &'a Api,
        root: &'a ShapeRef,
        index: usize,
    ) -> Option<&'a ShapeRef> {
        if index >= self.size() {
            return None;
        }
        self.copy_at(index).resolve(api, root)
    }

    /// Resolve every prefix of the path, shortest first.
    pub fn resolve_each<'a>(
        &'a self,
        api: &'a Api,
        root: &'a ShapeRef,
    ) -> impl Iterator<Item = Option<&'a ShapeRef>> + 'a {
        (0..self.size()).map(move |index| self.resolve_at(api, root, index))
    }
}

/// Member of `current` named `name`, looking through lists and maps.
fn member_ref<'a>(api: &'a Api, current: &'a ShapeRef, name: &str) -> Option<&'a ShapeRef> {
    match &api.target(current).kind {
        ShapeKind::Structure { .. } => api
            .target(current)
            .member_ignore_case(name)
            .map(|(_, member)| member),
        ShapeKind::List { member } => member_ref(api, member, name),
        ShapeKind::Map { value, .. } => member_ref(api, value, name),
        ShapeKind::Scalar { .. } => None,
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(Self::parse(&dotted))
    }
}
