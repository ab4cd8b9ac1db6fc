//! Output helpers for the `jpp` binary.

use anyhow::Context as _;
use colored::Colorize;
use std::io::Write;
use std::io::{self, ErrorKind};

use crate::document::{JsonNode, NodeKind, push_quoted};
use crate::matcher::Found;

// ==============================================================================
// Colorized JSON Output
// ==============================================================================

/// Write a single query result to `writer`: a key name returned by `@parent`
/// in key colour, anything else as colorized JSON. Silently returns `Ok(())`
/// on broken pipe so that piping to tools like `less` or `head` exits
/// cleanly.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_colored_result<W: Write, N: JsonNode>(
    writer: &mut W,
    found: &Found<'_, N>,
    pretty: bool,
) -> anyhow::Result<()> {
    let result = (|| -> io::Result<()> {
        match found {
            Found::Key(key) => write!(writer, "{}", quoted(key).cyan())?,
            Found::Node(node) => write_colored_json(writer, *node, 0, pretty)?,
        }
        writeln!(writer)?;
        Ok(())
    })();

    match result {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err).context("write colorized JSON to stdout"),
    }
}

/// JSON-quoted form of a string.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    push_quoted(s, &mut out);
    out
}

/// Recursively write a JSON node with syntax highlighting.
fn write_colored_json<W: Write, N: JsonNode>(
    writer: &mut W,
    node: &N,
    indent: usize,
    pretty: bool,
) -> io::Result<()> {
    let next_indent = indent + 2;
    let text = node.scalar_text().unwrap_or_default();
    let text: &str = &text;

    match node.kind() {
        NodeKind::Null => write!(writer, "{}", "null".red().dimmed()),
        NodeKind::Boolean => write!(writer, "{}", text.yellow().bold()),
        NodeKind::Number => write!(writer, "{}", text.yellow()),
        NodeKind::String => write!(writer, "{}", quoted(text).green()),
        NodeKind::Array => {
            write!(writer, "[")?;
            let mut empty = true;
            for (i, item) in node.elements().enumerate() {
                if i > 0 {
                    write!(writer, ",")?;
                }
                if pretty {
                    writeln!(writer)?;
                    write!(writer, "{:width$}", "", width = next_indent)?;
                }
                write_colored_json(writer, item, next_indent, pretty)?;
                empty = false;
            }
            if pretty && !empty {
                writeln!(writer)?;
                write!(writer, "{:width$}", "", width = indent)?;
            }
            write!(writer, "]")
        }
        NodeKind::Object => {
            write!(writer, "{{")?;
            let mut empty = true;
            for (i, (key, val)) in node.members().enumerate() {
                if i > 0 {
                    write!(writer, ",")?;
                }
                if pretty {
                    writeln!(writer)?;
                    write!(writer, "{:width$}", "", width = next_indent)?;
                }
                write!(writer, "{}", quoted(key).cyan())?;
                if pretty {
                    write!(writer, ": ")?;
                } else {
                    write!(writer, ":")?;
                }
                write_colored_json(writer, val, next_indent, pretty)?;
                empty = false;
            }
            if pretty && !empty {
                writeln!(writer)?;
                write!(writer, "{:width$}", "", width = indent)?;
            }
            write!(writer, "}}")
        }
    }
}
