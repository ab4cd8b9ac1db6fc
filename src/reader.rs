/*!
# Reader

[`JsonPath`] is the entry point of the crate: it holds a document root and
answers path queries against it, narrowing each result to the type the caller
asks for.

```
use parentpath::JsonPath;

let doc = JsonPath::parse(
    r#"{"clinics": {"clinics_123": {"name": "Seattle Medical Center"}}}"#,
)?;
let id: Option<&str> =
    doc.read("$.*[@.name='Seattle Medical Center'].@parent")?;
assert_eq!(id, Some("clinics_123"));
# Ok::<(), parentpath::ReadError>(())
```

No match is `Ok(None)`. A match of the wrong kind is
[`ReadError::TypeMismatch`].
*/
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::document::{JsonNode, NodeKind};
use crate::matcher::{Found, evaluate, evaluate_all};
use crate::path::{Path, PathError, parse_path};

/// Represents errors returned by [`JsonPath`] queries and construction.
#[derive(Debug)]
pub enum ReadError {
    /// The path expression could not be parsed.
    Path(PathError),
    /// A value was found but is not of the requested kind.
    TypeMismatch {
        /// Description of what the caller asked for
        expected: &'static str,
        /// Kind of the value actually found
        found: NodeKind,
    },
    /// The document text is not valid JSON.
    Json(serde_json::Error),
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Path(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::TypeMismatch { .. } => None,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(e) => write!(f, "{e}"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {expected}, found {found}")
            }
            Self::Json(e) => write!(f, "Invalid JSON document: {e}"),
        }
    }
}

impl From<PathError> for ReadError {
    fn from(e: PathError) -> Self {
        Self::Path(e)
    }
}

impl From<serde_json::Error> for ReadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Conversion from a query result to the type a caller reads it as.
pub trait FromFound<'a, N>: Sized {
    /// What this type accepts, used in [`ReadError::TypeMismatch`].
    const EXPECTED: &'static str;

    /// Converts the found value, or returns `None` if its kind does not fit.
    fn from_found(found: Found<'a, N>) -> Option<Self>;
}

impl<'a, N> FromFound<'a, N> for Found<'a, N> {
    const EXPECTED: &'static str = "any value";

    fn from_found(found: Found<'a, N>) -> Option<Self> {
        Some(found)
    }
}

impl<'a, N> FromFound<'a, N> for &'a N {
    const EXPECTED: &'static str = "a document node";

    fn from_found(found: Found<'a, N>) -> Option<Self> {
        match found {
            Found::Node(node) => Some(node),
            Found::Key(_) => None,
        }
    }
}

impl<'a, N: JsonNode> FromFound<'a, N> for &'a str {
    const EXPECTED: &'static str = "string";

    fn from_found(found: Found<'a, N>) -> Option<Self> {
        found.as_str()
    }
}

impl<'a, N: JsonNode> FromFound<'a, N> for String {
    const EXPECTED: &'static str = "string";

    fn from_found(found: Found<'a, N>) -> Option<Self> {
        found.as_str().map(str::to_string)
    }
}

impl<'a, N: JsonNode> FromFound<'a, N> for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_found(found: Found<'a, N>) -> Option<Self> {
        let node = found.node().filter(|n| n.kind() == NodeKind::Boolean)?;
        node.scalar_text()?.parse().ok()
    }
}

impl<'a, N: JsonNode> FromFound<'a, N> for f64 {
    const EXPECTED: &'static str = "number";

    fn from_found(found: Found<'a, N>) -> Option<Self> {
        let node = found.node().filter(|n| n.kind() == NodeKind::Number)?;
        node.scalar_text()?.parse().ok()
    }
}

impl<'a, N: JsonNode> FromFound<'a, N> for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_found(found: Found<'a, N>) -> Option<Self> {
        let node = found.node().filter(|n| n.kind() == NodeKind::Number)?;
        node.scalar_text()?.parse().ok()
    }
}

impl<'a> FromFound<'a, serde_json::Value>
    for &'a serde_json::Map<String, serde_json::Value>
{
    const EXPECTED: &'static str = "object";

    fn from_found(found: Found<'a, serde_json::Value>) -> Option<Self> {
        found.node()?.as_object()
    }
}

impl<'a> FromFound<'a, serde_json::Value> for &'a Vec<serde_json::Value> {
    const EXPECTED: &'static str = "array";

    fn from_found(found: Found<'a, serde_json::Value>) -> Option<Self> {
        found.node()?.as_array()
    }
}

/// The document root, borrowed from the caller or owned by the engine.
#[derive(Debug)]
enum Root<'a, N> {
    Borrowed(&'a N),
    Owned(N),
}

/// Query engine over a single JSON document.
///
/// The engine never mutates the document and keeps no state between
/// queries.
#[derive(Debug)]
pub struct JsonPath<'a, N = serde_json::Value> {
    root: Root<'a, N>,
}

impl<'a, N: JsonNode> JsonPath<'a, N> {
    /// Queries an already-parsed document owned by the caller.
    pub const fn new(root: &'a N) -> Self {
        Self { root: Root::Borrowed(root) }
    }

    /// Queries an already-parsed document, taking ownership of it.
    pub const fn from_root(root: N) -> Self {
        Self { root: Root::Owned(root) }
    }

    /// The document root.
    pub const fn root(&self) -> &N {
        match &self.root {
            Root::Borrowed(root) => *root,
            Root::Owned(root) => root,
        }
    }

    /// Returns the first value matching `path`, converted to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Path`] if `path` is malformed, and
    /// [`ReadError::TypeMismatch`] if a value was found that can not be read
    /// as `T`.
    pub fn read<'s, T: FromFound<'s, N>>(
        &'s self,
        path: &str,
    ) -> Result<Option<T>, ReadError> {
        self.read_path(&parse_path(path)?)
    }

    /// Like [`JsonPath::read`], with a path parsed ahead of time.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::TypeMismatch`] if a value was found that can not
    /// be read as `T`.
    pub fn read_path<'s, T: FromFound<'s, N>>(
        &'s self,
        path: &Path,
    ) -> Result<Option<T>, ReadError> {
        let Some(found) = evaluate(path, self.root()) else {
            return Ok(None);
        };
        let kind = found.kind();
        T::from_found(found).map(Some).ok_or(ReadError::TypeMismatch {
            expected: T::EXPECTED,
            found: kind,
        })
    }

    /// Returns the first value matching `path` if it is of kind `expected`.
    ///
    /// A key returned by `@parent` has kind [`NodeKind::String`].
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Path`] if `path` is malformed, and
    /// [`ReadError::TypeMismatch`] if the value found is of another kind.
    pub fn read_kind(
        &self,
        path: &str,
        expected: NodeKind,
    ) -> Result<Option<Found<'_, N>>, ReadError> {
        match self.find(path)? {
            Some(found) if found.kind() != expected => {
                Err(ReadError::TypeMismatch {
                    expected: expected.name(),
                    found: found.kind(),
                })
            }
            found => Ok(found),
        }
    }

    /// Returns the first value matching `path`, whatever its kind.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Path`] if `path` is malformed.
    pub fn find(&self, path: &str) -> Result<Option<Found<'_, N>>, ReadError> {
        Ok(self.find_path(&parse_path(path)?))
    }

    /// Returns every value the last segment of `path` matched, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Path`] if `path` is malformed.
    pub fn find_all(&self, path: &str) -> Result<Vec<Found<'_, N>>, ReadError> {
        Ok(self.find_all_path(&parse_path(path)?))
    }

    /// Like [`JsonPath::find`], with a path parsed ahead of time.
    pub fn find_path(&self, path: &Path) -> Option<Found<'_, N>> {
        evaluate(path, self.root())
    }

    /// Like [`JsonPath::find_all`], with a path parsed ahead of time.
    pub fn find_all_path(&self, path: &Path) -> Vec<Found<'_, N>> {
        evaluate_all(path, self.root())
    }
}

impl JsonPath<'static, serde_json::Value> {
    /// Parses JSON text into an owned document.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Json`] if `json` is not valid JSON.
    pub fn parse(json: &str) -> Result<Self, ReadError> {
        Ok(Self::from_root(serde_json::from_str(json)?))
    }
}

impl FromStr for JsonPath<'static, serde_json::Value> {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> JsonPath<'a, serde_json_borrow::Value<'a>> {
    /// Parses JSON text into a document that borrows its strings from `json`
    /// instead of copying them.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError::Json`] if `json` is not valid JSON.
    pub fn parse_borrowed(json: &'a str) -> Result<Self, ReadError> {
        let root: serde_json_borrow::Value<'a> = serde_json::from_str(json)?;
        Ok(Self::from_root(root))
    }
}
