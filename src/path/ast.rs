/*!
# Path AST and Builder

Defines the parsed form of path expressions and a fluent builder for
constructing them without going through a string.

# Examples

A path can be parsed from its string form:

```
use parentpath::path::{Path, Segment};
let path: Path = "$.clinics.@parent".parse().expect("Invalid path");
assert_eq!(path.segments(), &[Segment::key("clinics"), Segment::parent()]);
```

or assembled with the [`PathBuilder`]:

```
use parentpath::path::{Condition, PathBuilder};
let path = PathBuilder::new()
    .wildcard_where(Condition::equals("name", "Gig Harbor.*").unwrap())
    .key("city")
    .build()
    .unwrap();
assert_eq!("$.*[@.name='Gig Harbor.*'].city", path.to_string());
```
*/
use std::{fmt::Display, str::FromStr};

use super::{Condition, PathError, parse_path};

/// Segment text that searches every descendant of the current node.
pub const WILDCARD: &str = "*";

/// Terminal segment text that returns the key a match was found under.
pub const PARENT: &str = "@parent";

/// What a single path segment selects.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Selector {
    /// Direct child lookup by exact key, e.g., "innerClinic"
    Key(String),
    /// Breadth-first search of the whole subtree, e.g., "*"
    Wildcard,
    /// Key under which the previous match was found, e.g., "@parent"
    Parent,
}

impl Selector {
    /// Classifies raw segment text.
    #[must_use]
    pub fn from_literal(text: &str) -> Self {
        match text {
            WILDCARD => Self::Wildcard,
            PARENT => Self::Parent,
            key => Self::Key(key.to_string()),
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Wildcard => write!(f, "{WILDCARD}"),
            Self::Parent => write!(f, "{PARENT}"),
        }
    }
}

/// One component of a path expression, optionally filtered by a condition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Segment {
    /// What the segment selects
    pub selector: Selector,
    /// Filter applied to the objects a wildcard visits. Literal keys carry
    /// it without evaluating it.
    pub condition: Option<Condition>,
}

impl Segment {
    /// A literal key segment without a condition.
    pub fn key<T: Into<String>>(name: T) -> Self {
        Self { selector: Selector::Key(name.into()), condition: None }
    }

    /// An unconditioned wildcard segment.
    #[must_use]
    pub const fn wildcard() -> Self {
        Self { selector: Selector::Wildcard, condition: None }
    }

    /// The parent-retrieval segment.
    #[must_use]
    pub const fn parent() -> Self {
        Self { selector: Selector::Parent, condition: None }
    }

    /// Attaches a condition to this segment.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Returns `true` for the parent-retrieval segment.
    #[must_use]
    pub const fn is_parent(&self) -> bool {
        matches!(self.selector, Selector::Parent)
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector)?;
        if let Some(condition) = &self.condition {
            write!(f, "[{condition}]")?;
        }
        Ok(())
    }
}

/// A parsed path expression: a non-empty sequence of segments evaluated
/// left to right.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates a path from segments, checking the placement rules of the
    /// parent-retrieval token and that every segment can be written back in
    /// its string form.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MalformedPath`] if `segments` is empty, if a key
    /// can not be written as a segment (see [`Segment`]), or if `@parent` is
    /// the first segment, is not the last one, or carries a condition.
    /// Returns [`PathError::MalformedCondition`] if a condition names an
    /// attribute that can not be written.
    pub fn new(segments: Vec<Segment>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::MalformedPath(
                "path has no segments".to_string(),
            ));
        }
        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            check_segment(segment)?;
            if !segment.is_parent() {
                continue;
            }
            if i == 0 {
                return Err(PathError::MalformedPath(format!(
                    "\"{PARENT}\" needs a preceding segment"
                )));
            }
            if i != last {
                return Err(PathError::MalformedPath(format!(
                    "\"{PARENT}\" must be the last segment"
                )));
            }
            if segment.condition.is_some() {
                return Err(PathError::MalformedPath(format!(
                    "\"{PARENT}\" can not carry a condition"
                )));
            }
        }
        Ok(Self { segments })
    }

    /// The segments of this path, in evaluation order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` if the path ends with `@parent`.
    #[must_use]
    pub fn retrieves_parent(&self) -> bool {
        self.segments.last().is_some_and(Segment::is_parent)
    }
}

/// Rejects keys and conditions that would not parse back to `segment`.
fn check_segment(segment: &Segment) -> Result<(), PathError> {
    if let Selector::Key(key) = &segment.selector {
        if key.is_empty() && segment.condition.is_none() {
            return Err(PathError::MalformedPath("empty segment".to_string()));
        }
        if key.contains(['.', '[']) {
            return Err(PathError::MalformedPath(format!(
                "key \"{key}\" can not contain '.' or '['"
            )));
        }
        if key == WILDCARD || key == PARENT {
            return Err(PathError::MalformedPath(format!(
                "key \"{key}\" would be read as a token"
            )));
        }
    }
    segment
        .condition
        .as_ref()
        .map_or(Ok(()), Condition::check_attribute)
}

impl Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

/// Builder for constructing paths
#[derive(Debug, Default)]
pub struct PathBuilder {
    /// Segments added so far
    segments: Vec<Segment>,
}

impl PathBuilder {
    /// Creates a new `PathBuilder` with no segments.
    ///
    /// # Examples
    /// ```
    /// use parentpath::path::PathBuilder;
    /// let builder = PathBuilder::new();
    /// assert!(builder.build().is_err());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { segments: vec![] }
    }

    /// Adds a direct child lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use parentpath::path::PathBuilder;
    /// let path = PathBuilder::new().key("clinics").build().unwrap();
    /// assert_eq!("$.clinics", path.to_string());
    /// ```
    #[must_use]
    pub fn key(mut self, name: &str) -> Self {
        self.segments.push(Segment::key(name));
        self
    }

    /// Adds a direct child lookup carrying `condition`. Literal lookups do
    /// not evaluate it.
    #[must_use]
    pub fn key_where(mut self, name: &str, condition: Condition) -> Self {
        self.segments.push(Segment::key(name).with_condition(condition));
        self
    }

    /// Adds an unconditioned wildcard, collecting every nested object.
    #[must_use]
    pub fn wildcard(mut self) -> Self {
        self.segments.push(Segment::wildcard());
        self
    }

    /// Adds a wildcard that stops at the first nested object satisfying
    /// `condition`.
    ///
    /// # Examples
    ///
    /// ```
    /// use parentpath::path::{Condition, PathBuilder};
    /// let path = PathBuilder::new()
    ///     .wildcard_where(Condition::present("name"))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!("$.*[@.name]", path.to_string());
    /// ```
    #[must_use]
    pub fn wildcard_where(mut self, condition: Condition) -> Self {
        self.segments.push(Segment::wildcard().with_condition(condition));
        self
    }

    /// Ends the path with `@parent`.
    #[must_use]
    pub fn parent(mut self) -> Self {
        self.segments.push(Segment::parent());
        self
    }

    /// Builds the path, applying the same checks as parsing.
    ///
    /// # Errors
    ///
    /// See [`Path::new`].
    pub fn build(self) -> Result<Path, PathError> {
        Path::new(self.segments)
    }
}
