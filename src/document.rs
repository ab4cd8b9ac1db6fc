/*!
# Document Model

The query engine never parses JSON itself. It reads an already-parsed tree
through the [`JsonNode`] trait, which is implemented here for both
[`serde_json::Value`] (owned) and [`serde_json_borrow::Value`] (zero-copy,
borrowing from the input text).

Only three node shapes matter to the engine: objects (keyed members), arrays
(ordered elements) and scalars.
*/
use std::borrow::Cow;
use std::fmt::{self, Display};

/// The runtime kind of a JSON node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A JSON object
    Object,
    /// A JSON array
    Array,
    /// A JSON string
    String,
    /// A JSON number
    Number,
    /// A JSON boolean
    Boolean,
    /// The JSON `null` value
    Null,
}

impl NodeKind {
    /// Lowercase name of the kind, as used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only view of a parsed JSON document node.
///
/// Member order is the order the implementation stores them in. For
/// `serde_json` this is document order, since the crate is built with the
/// `preserve_order` feature.
pub trait JsonNode {
    /// Returns the kind of this node.
    fn kind(&self) -> NodeKind;

    /// Looks up a direct member of an object node, returning the stored key
    /// alongside the value. Always `None` for arrays and scalars.
    fn member(&self, key: &str) -> Option<(&str, &Self)>;

    /// Iterates over the members of an object node. Empty for anything else.
    fn members(&self) -> impl Iterator<Item = (&str, &Self)>;

    /// Iterates over the elements of an array node. Empty for anything else.
    fn elements(&self) -> impl Iterator<Item = &Self>;

    /// Textual form of a scalar: string contents without quotes, number and
    /// boolean literals, or `null`. `None` for objects and arrays.
    fn scalar_text(&self) -> Option<Cow<'_, str>>;

    /// Borrow the contents of a string node.
    fn as_str(&self) -> Option<&str> {
        match (self.kind(), self.scalar_text()) {
            (NodeKind::String, Some(Cow::Borrowed(s))) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if this node is an object.
    fn is_object(&self) -> bool {
        self.kind() == NodeKind::Object
    }

    /// Returns `true` if this node is `null`.
    fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }
}

/// Returns the string form of a node used when matching condition patterns:
/// string contents unquoted, other scalars as their literal, and objects and
/// arrays as compact JSON.
pub fn text_form<N: JsonNode>(node: &N) -> Cow<'_, str> {
    if let Some(text) = node.scalar_text() {
        return text;
    }
    let mut out = String::new();
    write_compact(node, &mut out);
    Cow::Owned(out)
}

/// Writes a node as compact JSON.
fn write_compact<N: JsonNode>(node: &N, out: &mut String) {
    match node.kind() {
        NodeKind::Object => {
            out.push('{');
            for (i, (key, value)) in node.members().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_quoted(key, out);
                out.push(':');
                write_compact(value, out);
            }
            out.push('}');
        }
        NodeKind::Array => {
            out.push('[');
            for (i, value) in node.elements().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(value, out);
            }
            out.push(']');
        }
        NodeKind::String => {
            push_quoted(&node.scalar_text().unwrap_or_default(), out);
        }
        NodeKind::Number | NodeKind::Boolean | NodeKind::Null => {
            out.push_str(&node.scalar_text().unwrap_or_default());
        }
    }
}

/// Appends a JSON-quoted string.
pub(crate) fn push_quoted(s: &str, out: &mut String) {
    // NOTE: serializing a plain `&str` cannot fail
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
    }
}

/// Returns the depth of a JSON node.
pub fn depth<N: JsonNode>(node: &N) -> usize {
    match node.kind() {
        NodeKind::Object => {
            1 + node.members().map(|(_, v)| depth(v)).max().unwrap_or(0)
        }
        NodeKind::Array => 1 + node.elements().map(depth).max().unwrap_or(0),
        _ => 1,
    }
}

impl JsonNode for serde_json::Value {
    fn kind(&self) -> NodeKind {
        match self {
            Self::Object(_) => NodeKind::Object,
            Self::Array(_) => NodeKind::Array,
            Self::String(_) => NodeKind::String,
            Self::Number(_) => NodeKind::Number,
            Self::Bool(_) => NodeKind::Boolean,
            Self::Null => NodeKind::Null,
        }
    }

    fn member(&self, key: &str) -> Option<(&str, &Self)> {
        self.as_object()?
            .get_key_value(key)
            .map(|(key, value)| (key.as_str(), value))
    }

    fn members(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.as_object()
            .into_iter()
            .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn elements(&self) -> impl Iterator<Item = &Self> {
        self.as_array().into_iter().flatten()
    }

    fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::String(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Bool(true) => Some(Cow::Borrowed("true")),
            Self::Bool(false) => Some(Cow::Borrowed("false")),
            Self::Null => Some(Cow::Borrowed("null")),
            Self::Object(_) | Self::Array(_) => None,
        }
    }
}

impl JsonNode for serde_json_borrow::Value<'_> {
    fn kind(&self) -> NodeKind {
        match self {
            Self::Object(_) => NodeKind::Object,
            Self::Array(_) => NodeKind::Array,
            Self::Str(_) => NodeKind::String,
            Self::Number(_) => NodeKind::Number,
            Self::Bool(_) => NodeKind::Boolean,
            Self::Null => NodeKind::Null,
        }
    }

    fn member(&self, key: &str) -> Option<(&str, &Self)> {
        self.members().find(|(candidate, _)| *candidate == key)
    }

    fn members(&self) -> impl Iterator<Item = (&str, &Self)> {
        let entries: &[_] = match self {
            Self::Object(map) => &map.as_vec()[..],
            _ => &[],
        };
        entries.iter().map(|(key, value)| {
            let key: &str = key;
            (key, value)
        })
    }

    fn elements(&self) -> impl Iterator<Item = &Self> {
        let elements: &[Self] = match self {
            Self::Array(values) => values,
            _ => &[],
        };
        elements.iter()
    }

    fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Str(s) => {
                let s: &str = s;
                Some(Cow::Borrowed(s))
            }
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::Bool(true) => Some(Cow::Borrowed("true")),
            Self::Bool(false) => Some(Cow::Borrowed("false")),
            Self::Null => Some(Cow::Borrowed("null")),
            Self::Object(_) | Self::Array(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kinds_of_serde_json_values() {
        let doc = json!({"a": [1, "two", true, null, {}]});
        assert_eq!(doc.kind(), NodeKind::Object);
        let kinds: Vec<NodeKind> =
            doc["a"].elements().map(JsonNode::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Number,
                NodeKind::String,
                NodeKind::Boolean,
                NodeKind::Null,
                NodeKind::Object
            ]
        );
    }

    #[test]
    fn members_keep_document_order() {
        let doc: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#)
                .expect("hardcoded json");
        let keys: Vec<&str> = doc.members().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn borrowed_values_share_the_view() {
        static TEST_JSON: &str =
            r#"{"zeta": {"x": 1.5}, "alpha": ["a", false]}"#;
        let doc = serde_json::from_str::<serde_json_borrow::Value<'static>>(
            TEST_JSON,
        )
        .expect("hardcoded test json");

        let keys: Vec<&str> = doc.members().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let (key, alpha) = doc.member("alpha").expect("alpha exists");
        assert_eq!(key, "alpha");
        assert_eq!(alpha.kind(), NodeKind::Array);
        let first = alpha.elements().next().and_then(JsonNode::as_str);
        assert_eq!(first, Some("a"));
        assert!(doc.member("missing").is_none());
        assert_eq!(depth(&doc), 3);
    }

    #[test]
    fn text_form_of_scalars_and_containers() {
        let doc = json!({
            "s": "plain",
            "n": 42,
            "b": false,
            "z": null,
            "o": {"k": [1, "x"]}
        });
        assert_eq!(text_form(&doc["s"]), "plain");
        assert_eq!(text_form(&doc["n"]), "42");
        assert_eq!(text_form(&doc["b"]), "false");
        assert_eq!(text_form(&doc["z"]), "null");
        assert_eq!(text_form(&doc["o"]), r#"{"k":[1,"x"]}"#);
    }

    #[test]
    fn member_lookup_only_on_objects() {
        let doc = json!([{"a": 1}]);
        assert!(doc.member("a").is_none());
        assert!(doc.members().next().is_none());
        assert!(json!("text").elements().next().is_none());
    }

    #[test]
    fn depth_of_nested_document() {
        let doc = json!({"a": {"b": [1, {"c": null}]}});
        assert_eq!(depth(&doc), 5);
        assert_eq!(depth(&json!(3)), 1);
    }
}
