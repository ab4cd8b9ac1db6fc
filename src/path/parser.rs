/*!
# Path Parser

Parser for converting path expression strings into [`Path`] objects.

## Examples

This module exposes the public API method [`parse_path`]:

```rust
use parentpath::path::{Path, parser};
let path = "$.*[@.name='Kendall Yards Medical Office'].@parent";
let parsed: Path = parser::parse_path(path).expect("Invalid path string");
assert_eq!(path, parsed.to_string());
```

## Errors

If the input is invalid, [`parse_path`] returns a [`PathError`] describing how
parsing failed:

```rust
use parentpath::path::parser::{self, PathError};

let result = parser::parse_path("$.*.");
assert!(matches!(result, Err(PathError::MalformedPath(_))));
```

```rust
use parentpath::path::parser::{self, PathError};

let result = parser::parse_path("$.*[@.name=]");
assert!(matches!(result, Err(PathError::MalformedCondition(_))));
```

## See Also

- [`Path`]: The parsed path expression.
- [`PathError`]: The error type for failed parses.
*/

use pest::Parser;
use pest_derive::Parser;
use std::error::Error;
use std::fmt;

use super::{Path, Segment, Selector, parse_condition};

/// Parser for turning raw path strings into [`Path`] objects.
#[derive(Parser)]
#[grammar = "path/grammar/path.pest"]
pub struct PathDSLParser;

/// Represents errors that can occur while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Structural problem in the path: missing `$.` root marker, empty
    /// segment, unterminated or empty condition, misplaced `@parent`.
    MalformedPath(String),
    /// Bad attribute or value syntax inside a condition.
    MalformedCondition(String),
}

impl Error for PathError {}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPath(reason) => {
                write!(f, "Malformed path: {reason}")
            }
            Self::MalformedCondition(reason) => {
                write!(f, "Malformed condition: {reason}")
            }
        }
    }
}

/// Parse an input path string into a [`Path`].
///
/// # Errors
///
/// Returns a [`PathError`] describing how the parsing failed.
pub fn parse_path(input: &str) -> Result<Path, PathError> {
    let mut pairs = PathDSLParser::parse(Rule::path, input)
        .map_err(|e| PathError::MalformedPath(e.to_string()))?;

    // Get and unwrap the `path` rule
    let path = pairs.next().ok_or_else(|| {
        PathError::MalformedPath(format!("no path in \"{input}\""))
    })?;

    let segments = path
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::segment)
        .map(parse_segment)
        .collect::<Result<Vec<Segment>, _>>()?;

    let path = Path::new(segments)?;
    log::debug!(
        "parsed path `{input}` into {} segment(s)",
        path.segments().len()
    );
    Ok(path)
}

/// Parse a segment rule into a [`Segment`].
fn parse_segment(
    pair: pest::iterators::Pair<Rule>,
) -> Result<Segment, PathError> {
    if pair.as_rule() != Rule::segment {
        return Err(PathError::MalformedPath(format!(
            "Expected segment rule, got {:?}",
            pair.as_rule()
        )));
    }

    // A bare condition (`$.[@.a]`) selects the empty key
    let mut literal = "";
    let mut condition = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::literal => literal = inner.as_str(),
            Rule::condition => {
                let body = inner.into_inner().next().ok_or_else(|| {
                    PathError::MalformedPath("empty condition".to_string())
                })?;
                condition = parse_condition(body.as_str())?;
            }
            rule => {
                return Err(PathError::MalformedPath(format!(
                    "Unexpected rule in segment: {rule:?}"
                )));
            }
        }
    }

    Ok(Segment { selector: Selector::from_literal(literal), condition })
}
