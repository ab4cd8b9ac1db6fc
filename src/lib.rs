/*!
# `parentpath` Library

Locates values in JSON documents with a small JSONPath-like language that can
also return the *key* a match is stored under, through a terminal `@parent`
segment.

```
use parentpath::JsonPath;

let doc = JsonPath::parse(
    r#"{"clinics": [{"innerClinic": {"name": "Kendall Yards"}}]}"#,
)?;
let key: Option<&str> = doc.read("$.*[@.name='Kendall Yards'].@parent")?;
assert_eq!(key, Some("innerClinic"));
# Ok::<(), parentpath::ReadError>(())
```
*/

pub mod commands;
pub mod document;
pub mod matcher;
pub mod path;
pub mod reader;
pub mod utils;

// Re-exports
pub use document::{JsonNode, NodeKind, depth};
pub use matcher::Found;
pub use path::{Path, PathError};
pub use reader::{FromFound, JsonPath, ReadError};
