//! Expansion and field-selection directives.
//!
//! These are the two independent inputs of a resolve call:
//!
//! - [`ExpansionSpec`] - which relations to embed, and how deep
//! - [`FieldSpec`] - which top-level fields of the root to keep
//!
//! Both are built per request by the transport layer and dropped afterwards.

use std::fmt;

use crate::error::{ViewError, ViewResult};

/// Separator between the segments of an expansion path.
pub const PATH_SEPARATOR: char = '.';

/// A non-empty sequence of segment names, e.g. `besluittypen.besluittype_omschrijving`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpansionPath {
    segments: Vec<String>,
}

impl ExpansionPath {
    /// Creates a path from its segments.
    ///
    /// Fails with [`ViewError::InvalidPath`] if there are no segments or any
    /// segment is blank.
    pub fn new<I, S>(segments: I) -> ViewResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.trim().is_empty()) {
            return Err(ViewError::InvalidPath {
                path: segments.join("."),
            });
        }
        Ok(Self { segments })
    }

    /// Parses a dot-delimited path.
    pub fn parse(raw: &str) -> ViewResult<Self> {
        let raw = raw.trim();
        let segments: Vec<&str> = raw.split(PATH_SEPARATOR).map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ViewError::InvalidPath {
                path: raw.to_string(),
            });
        }
        Self::new(segments)
    }

    /// The first segment; names a relation (or, below the root, a field).
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// The path with the first segment removed, or `None` for a single segment.
    pub fn tail(&self) -> Option<ExpansionPath> {
        if self.segments.len() > 1 {
            Some(ExpansionPath {
                segments: self.segments[1..].to_vec(),
            })
        } else {
            None
        }
    }

    /// All segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for ExpansionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Which relations to expand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionSpec {
    /// Expand exactly the given paths (possibly none).
    Paths(Vec<ExpansionPath>),
    /// Expand every expandable relation one level deep, without recursion.
    All,
}

impl Default for ExpansionSpec {
    fn default() -> Self {
        ExpansionSpec::Paths(Vec::new())
    }
}

impl ExpansionSpec {
    /// No expansion at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a spec from already parsed paths.
    pub fn paths(paths: impl IntoIterator<Item = ExpansionPath>) -> Self {
        ExpansionSpec::Paths(paths.into_iter().collect())
    }

    /// Parses a list of dot-delimited paths.
    pub fn parse_paths<'a>(raw: impl IntoIterator<Item = &'a str>) -> ViewResult<Self> {
        let paths = raw
            .into_iter()
            .map(ExpansionPath::parse)
            .collect::<ViewResult<Vec<_>>>()?;
        Ok(ExpansionSpec::Paths(paths))
    }

    /// Returns true for the expand-all mode.
    pub fn is_all(&self) -> bool {
        matches!(self, ExpansionSpec::All)
    }

    /// Returns true when nothing is to be expanded.
    pub fn is_empty(&self) -> bool {
        matches!(self, ExpansionSpec::Paths(paths) if paths.is_empty())
    }

    /// Length of the longest path; expand-all counts as one level.
    pub fn max_depth(&self) -> usize {
        match self {
            ExpansionSpec::All => 1,
            ExpansionSpec::Paths(paths) => paths.iter().map(ExpansionPath::depth).max().unwrap_or(0),
        }
    }

    /// Groups the paths by their first segment, in first-appearance order.
    ///
    /// Each group carries the tails of its paths. A bare path (`R`) next to
    /// longer ones (`R.x`) contributes no tail, so `R` and `R.x` together
    /// group as `R -> [x]`.
    pub fn group_by_head(&self) -> Vec<PathGroup> {
        let ExpansionSpec::Paths(paths) = self else {
            return Vec::new();
        };

        let mut groups: Vec<PathGroup> = Vec::new();
        for path in paths {
            let index = match groups.iter().position(|g| g.head == path.head()) {
                Some(index) => index,
                None => {
                    groups.push(PathGroup {
                        head: path.head().to_string(),
                        tails: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            if let Some(tail) = path.tail() {
                if !groups[index].tails.contains(&tail) {
                    groups[index].tails.push(tail);
                }
            }
        }
        groups
    }
}

/// Paths sharing one first segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGroup {
    /// The shared first segment.
    pub head: String,
    /// The remainders of the paths, first segment stripped.
    pub tails: Vec<ExpansionPath>,
}

/// Top-level fields to keep; empty means keep everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    names: Vec<String>,
}

impl FieldSpec {
    /// No restriction.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts output to the given names. Duplicates are ignored.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = FieldSpec::default();
        for name in names {
            spec.add(name);
        }
        spec
    }

    /// Adds a name to the restriction.
    pub fn add(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    /// Returns true when a restriction is active.
    pub fn is_restricted(&self) -> bool {
        !self.names.is_empty()
    }

    /// Returns true when `name` should be kept.
    pub fn allows(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| n == name)
    }

    /// The requested names, in request order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
