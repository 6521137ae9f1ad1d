//! Path Model
//!
//! Canonical representation of a property path read by a component, plus the
//! dotted/bracketed string form used for comparison and reporting:
//! `a[].b.c` is `Key(a), Element, Key(b), Key(c)`.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    /// One dotted part of a canonical path: a key followed by any number of `[]`.
    static ref PATH_PART_RE: Regex = Regex::new(r"^(?P<key>[^\[\]]+)(?P<elements>(?:\[\])*)$").unwrap();
}

/// Marker rendered for `PathSegment::Rest`.
const REST_MARKER: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Statically known property name.
    Key(String),
    /// Any element of an array, whatever index expression produced it.
    Element,
    /// All sibling keys not otherwise named.
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("empty property path")]
    Empty,
    #[error("malformed segment '{part}' in property path '{path}'")]
    MalformedSegment { path: String, part: String },
}

/// Ordered list of segments rooted at the external data object. The empty path
/// stands for the data object itself and is never recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropPath {
    segments: Vec<PathSegment>,
}

impl PropPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn key(name: &str) -> Self {
        Self::root().child(PathSegment::Key(name.to_string()))
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn child_key(&self, name: &str) -> Self {
        self.child(PathSegment::Key(name.to_string()))
    }

    /// First key of the path, used for `ignore` matching.
    pub fn root_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Key(name)) => Some(name),
            _ => None,
        }
    }

    pub fn starts_with(&self, prefix: &PropPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Trailing element accesses carry no extra information about what was
    /// read: `arr[1]` depends on `arr`.
    pub fn trim_trailing_elements(mut self) -> Self {
        while matches!(self.segments.last(), Some(PathSegment::Element)) {
            self.segments.pop();
        }
        self
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Element => f.write_str("[]")?,
                PathSegment::Key(name) => {
                    if index > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Rest => {
                    if index > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(REST_MARKER)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for PropPath {
    type Err = PathParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Err(PathParseError::Empty);
        }
        let mut segments = Vec::new();
        for part in text.split('.') {
            let captures =
                PATH_PART_RE
                    .captures(part)
                    .ok_or_else(|| PathParseError::MalformedSegment {
                        path: text.to_string(),
                        part: part.to_string(),
                    })?;
            let key = &captures["key"];
            if key == REST_MARKER {
                segments.push(PathSegment::Rest);
            } else {
                segments.push(PathSegment::Key(key.to_string()));
            }
            let elements = captures["elements"].len() / 2;
            segments.extend(std::iter::repeat(PathSegment::Element).take(elements));
        }
        Ok(Self { segments })
    }
}
