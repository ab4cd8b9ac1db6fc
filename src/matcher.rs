/*!
# Matcher

Walks a JSON document according to a parsed [`Path`].

Evaluation keeps a working list of [`SearchResult`]s, each pairing a node
with the key it was discovered under. The first segment is matched against
the document root; every following segment is matched against each node in
the list, and the results are concatenated in order. A terminal `@parent`
returns the key of the first result instead of its node.

## Wildcards

`*` performs a breadth-first search of the subtree below the current node.
Without a condition it collects every object it meets. With a condition it
commits to the first object (in breadth-first order) that satisfies it and
stops, so a conditioned wildcard yields at most one match per node it is
applied to. [`evaluate`] returns a single value, which is what this
short-circuit serves.

Array elements carry the key of the array itself, so `@parent` after a match
inside an array gives the array's key and never an index.
*/
use std::collections::VecDeque;

use crate::document::{JsonNode, NodeKind};
use crate::path::{Path, Segment, Selector};

/// A node found during traversal together with its associated key.
#[derive(Debug)]
pub struct SearchResult<'a, N> {
    /// Key under which `node` was found in its nearest enclosing object. The
    /// node a wildcard starts from has the empty key.
    pub key: &'a str,
    /// The node found
    pub node: &'a N,
}

impl<N> Clone for SearchResult<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for SearchResult<'_, N> {}

/// The outcome of evaluating a path: a node, or for paths ending in
/// `@parent`, a key name.
#[derive(Debug)]
pub enum Found<'a, N> {
    /// A matched document node
    Node(&'a N),
    /// The key the matched node is stored under
    Key(&'a str),
}

impl<N> Clone for Found<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Found<'_, N> {}

impl<N: PartialEq> PartialEq for Found<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Node(a), Self::Node(b)) => a == b,
            (Self::Key(a), Self::Key(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a, N: JsonNode> Found<'a, N> {
    /// The runtime kind of the found value. Keys are strings.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Node(node) => node.kind(),
            Self::Key(_) => NodeKind::String,
        }
    }

    /// The node, if this is not a key.
    #[must_use]
    pub const fn node(&self) -> Option<&'a N> {
        match *self {
            Self::Node(node) => Some(node),
            Self::Key(_) => None,
        }
    }

    /// The string value: a key name, or the contents of a string node.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Self::Node(node) => node.as_str(),
            Self::Key(key) => Some(key),
        }
    }
}

/// Matches a single segment against `node`.
///
/// Literal keys only look at the direct children of an object; a missing or
/// `null` child gives no result, and any condition on the segment is
/// ignored. Wildcards search the whole subtree, see the module
/// documentation.
pub fn match_segment<'a, N: JsonNode>(
    segment: &Segment,
    node: &'a N,
) -> Vec<SearchResult<'a, N>> {
    match &segment.selector {
        Selector::Wildcard => match_wildcard(segment, node),
        // A condition on a literal segment is carried but not evaluated
        Selector::Key(key) => node
            .member(key)
            .filter(|(_, child)| !child.is_null())
            .map(|(key, child)| SearchResult { key, node: child })
            .into_iter()
            .collect(),
        // Handled by `evaluate`; never matches a node on its own
        Selector::Parent => vec![],
    }
}

/// Breadth-first search below `node` for the wildcard segment.
fn match_wildcard<'a, N: JsonNode>(
    segment: &Segment,
    node: &'a N,
) -> Vec<SearchResult<'a, N>> {
    let mut results = Vec::new();
    let mut queue = VecDeque::from([SearchResult { key: "", node }]);

    while let Some(current) = queue.pop_front() {
        match current.node.kind() {
            NodeKind::Object => {
                match &segment.condition {
                    Some(condition) => {
                        if condition.matches(current.node) {
                            log::trace!(
                                "wildcard matched `{condition}` under key {:?}",
                                current.key
                            );
                            results.push(current);
                            break;
                        }
                    }
                    None => results.push(current),
                }

                for (key, child) in current.node.members() {
                    if matches!(
                        child.kind(),
                        NodeKind::Object | NodeKind::Array
                    ) {
                        queue.push_back(SearchResult { key, node: child });
                    }
                }
            }
            NodeKind::Array => {
                // Arrays do not introduce keys of their own
                for element in current.node.elements() {
                    if matches!(
                        element.kind(),
                        NodeKind::Object | NodeKind::Array
                    ) {
                        queue.push_back(SearchResult {
                            key: current.key,
                            node: element,
                        });
                    }
                }
            }
            // Scalars are never expanded and never match
            _ => {}
        }
    }

    results
}

/// Narrows the working list through every segment of `path` up to, but not
/// including, a terminal `@parent`.
fn narrow<'a, N: JsonNode>(
    path: &Path,
    root: &'a N,
) -> Vec<SearchResult<'a, N>> {
    let mut segments = path.segments().iter().take_while(|s| !s.is_parent());
    let Some(first) = segments.next() else {
        return vec![];
    };

    let mut matching = match_segment(first, root);
    for segment in segments {
        matching = matching
            .iter()
            .flat_map(|result| match_segment(segment, result.node))
            .collect();
        log::trace!(
            "segment `{segment}` narrowed to {} match(es)",
            matching.len()
        );
    }
    matching
}

/// Turns a search result into the value the path asks for.
const fn resolve<'a, N>(
    result: SearchResult<'a, N>,
    parent: bool,
) -> Found<'a, N> {
    if parent { Found::Key(result.key) } else { Found::Node(result.node) }
}

/// Evaluates `path` against `root`, returning the first match.
///
/// For a path ending in `@parent` this is the key of the first node matched
/// by the preceding segments.
pub fn evaluate<'a, N: JsonNode>(
    path: &Path,
    root: &'a N,
) -> Option<Found<'a, N>> {
    let found = narrow(path, root)
        .into_iter()
        .next()
        .map(|result| resolve(result, path.retrieves_parent()));
    log::debug!(
        "`{path}` resolved to {}",
        if found.is_some() { "a match" } else { "nothing" }
    );
    found
}

/// Evaluates `path` against `root`, returning every entry of the final
/// working list in order.
///
/// For a path ending in `@parent` this is the key of every node matched by
/// the preceding segments.
pub fn evaluate_all<'a, N: JsonNode>(
    path: &Path,
    root: &'a N,
) -> Vec<Found<'a, N>> {
    let parent = path.retrieves_parent();
    let found: Vec<Found<'a, N>> = narrow(path, root)
        .into_iter()
        .map(|result| resolve(result, parent))
        .collect();
    log::debug!("`{path}` resolved to {} match(es)", found.len());
    found
}
