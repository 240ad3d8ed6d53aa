//! Path pattern matching.
//!
//! Patterns are slash separated. A segment is a literal, a `:name` parameter,
//! or a trailing `*` that swallows the rest of the path.

use crate::error::{RouteError, RouteResult};
use indexmap::IndexMap;
use std::str::FromStr;

/// Parameters captured by a match, in pattern order
pub type PathParams = IndexMap<String, String>;

/// Key under which a trailing `*` stores the remainder
pub const REST_PARAM: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest,
}

/// A parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `/invoices/:id/edit`
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is not absolute, has an empty parameter
    /// name, repeats a parameter, or uses `*` anywhere but last
    pub fn parse(pattern: &str) -> RouteResult<Self> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let raw: Vec<&str> = split_path(pattern).collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut seen = Vec::new();

        for (i, part) in raw.iter().enumerate() {
            if *part == REST_PARAM {
                if i + 1 != raw.len() {
                    return Err(invalid("'*' must be the last segment"));
                }
                segments.push(Segment::Rest);
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(invalid("empty parameter name"));
                }
                if seen.contains(&name) {
                    return Err(invalid("repeated parameter name"));
                }
                seen.push(name);
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal((*part).to_string()));
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Original pattern text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a concrete path; query strings and trailing slashes are ignored
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let parts: Vec<&str> = split_path(path).collect();
        let mut params = PathParams::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Rest => {
                    let rest = parts.get(i..).unwrap_or_default().join("/");
                    params.insert(REST_PARAM.to_string(), rest);
                    return Some(params);
                }
                Segment::Literal(literal) => {
                    if parts.get(i) != Some(&literal.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(i)?;
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }

    /// Specificity used to rank overlapping patterns; higher wins
    ///
    /// Compared segment by segment from the left: literals outrank
    /// parameters, which outrank a trailing `*`. A pattern that ends where
    /// the path ends outranks one that swallows the remainder there.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut ranks: Vec<u8> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(_) => 3,
                Segment::Param(_) => 2,
                Segment::Rest => 0,
            })
            .collect();
        if !matches!(self.segments.last(), Some(Segment::Rest)) {
            ranks.push(1);
        }
        Specificity(ranks)
    }
}

/// Rank of a pattern, ordered lexicographically by segment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(Vec<u8>);

impl FromStr for PathPattern {
    type Err = RouteError;

    fn from_str(s: &str) -> RouteResult<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
