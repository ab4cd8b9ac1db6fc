/*!
# Conditions

A condition filters the object nodes a segment selects. The only predicate
kind is the attribute test:

- `[@.name]` holds for objects that have a `name` member, whatever its value
  (including `null`);
- `[@.name='Gig Harbor.*']` holds for objects whose `name` member is not
  `null` and whose string form fully matches the regular expression.

The value is a regular expression and is not escaped, so callers may embed
regex syntax. Matching is anchored at both ends. Either quote character
closes the value, so a pattern can never contain one.

Parsing is lenient around the value: text between the name and `=` and text
after the closing quote are skipped, so `[@.name x]` is a presence test and
`[@.name='X' y]` compares against `X`.
*/
use pest::Parser;
use regex::Regex;
use std::fmt::Display;

use super::parser::{PathDSLParser, PathError, Rule};
use crate::document::{JsonNode, text_form};

/// Marker that introduces an attribute condition.
pub const ATTRIBUTE_PREFIX: &str = "@.";

/// Characters that end an attribute name or a condition.
const ATTRIBUTE_STOPS: &[char] = &[' ', '\t', '=', ']', '\'', '"'];

/// An attribute predicate over object nodes.
#[derive(Debug, Clone)]
pub struct Condition {
    /// Member that must be present
    attribute: String,
    /// Pattern the member's value must fully match, if any
    pattern: Option<ValuePattern>,
}

/// A compiled value pattern, keeping the source text for display and
/// comparison.
#[derive(Debug, Clone)]
struct ValuePattern {
    source: String,
    regex: Regex,
}

impl ValuePattern {
    fn compile(source: &str) -> Result<Self, PathError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            PathError::MalformedCondition(format!(
                "invalid value pattern '{source}': {e}"
            ))
        })?;
        Ok(Self { source: source.to_string(), regex })
    }
}

impl Condition {
    /// A condition satisfied by objects that have `attribute`.
    pub fn present<T: Into<String>>(attribute: T) -> Self {
        Self { attribute: attribute.into(), pattern: None }
    }

    /// A condition satisfied by objects whose `attribute` fully matches the
    /// regular expression `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MalformedCondition`] if the attribute name can
    /// not be written in a path, if `pattern` contains a quote character, or
    /// if `pattern` is not a valid regular expression.
    pub fn equals<T: Into<String>>(
        attribute: T,
        pattern: &str,
    ) -> Result<Self, PathError> {
        let condition = Self::present(attribute);
        condition.check_attribute()?;
        if pattern.contains(['\'', '"']) {
            return Err(PathError::MalformedCondition(format!(
                "value pattern '{pattern}' can not contain a quote"
            )));
        }
        Ok(Self {
            pattern: Some(ValuePattern::compile(pattern)?),
            ..condition
        })
    }

    /// Checks that the attribute name can be written back as `@.name`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::MalformedCondition`] if the name is empty or
    /// holds a space, tab, `=`, `]` or quote character.
    pub fn check_attribute(&self) -> Result<(), PathError> {
        if self.attribute.is_empty() {
            return Err(PathError::MalformedCondition(
                "attribute name can not be empty".to_string(),
            ));
        }
        if self.attribute.contains(ATTRIBUTE_STOPS) {
            return Err(PathError::MalformedCondition(format!(
                "attribute name \"{}\" can not be written in a condition",
                self.attribute
            )));
        }
        Ok(())
    }

    /// The attribute this condition tests.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The value pattern source, if the condition compares values.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|p| p.source.as_str())
    }

    /// Tests the condition against a node. Anything that is not an object
    /// never matches.
    pub fn matches<N: JsonNode>(&self, node: &N) -> bool {
        let Some((_, value)) = node.member(&self.attribute) else {
            return false;
        };
        match &self.pattern {
            // presence is enough for `[@.attr]`
            None => true,
            Some(_) if value.is_null() => false,
            Some(pattern) => pattern.regex.is_match(&text_form(value)),
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.attribute == other.attribute && self.pattern() == other.pattern()
    }
}

impl Eq for Condition {}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{ATTRIBUTE_PREFIX}{}", self.attribute)?;
        if let Some(pattern) = self.pattern() {
            write!(f, "='{pattern}'")?;
        }
        Ok(())
    }
}

/// Parse the text between `[` and `]` into a [`Condition`].
///
/// Text that does not start with `@.` is not a recognized predicate kind and
/// yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`PathError::MalformedCondition`] if no attribute name follows
/// `@.`, if `=` is not followed by a quoted value, or if the value is not a
/// valid regular expression. Text after the name or after the closing quote
/// is ignored.
pub fn parse_condition(text: &str) -> Result<Option<Condition>, PathError> {
    if !text.starts_with(ATTRIBUTE_PREFIX) {
        log::debug!("ignoring unrecognized condition `{text}`");
        return Ok(None);
    }

    let mut pairs = PathDSLParser::parse(Rule::attribute_condition, text)
        .map_err(|e| PathError::MalformedCondition(e.to_string()))?;
    let condition = pairs
        .next()
        .ok_or_else(|| {
            PathError::MalformedCondition(format!("empty condition \"{text}\""))
        })?
        .into_inner();

    let mut attribute = None;
    let mut pattern = None;
    for pair in condition {
        match pair.as_rule() {
            Rule::attribute_name => attribute = Some(pair.as_str()),
            Rule::comparison => {
                // comparison -> value -> pattern
                pattern = pair
                    .into_inner()
                    .next()
                    .and_then(|value| value.into_inner().next())
                    .map(|p| p.as_str());
            }
            _ => {}
        }
    }

    let attribute = attribute.ok_or_else(|| {
        PathError::MalformedCondition(format!(
            "condition \"{text}\" has no attribute name"
        ))
    })?;

    match pattern {
        Some(pattern) => Condition::equals(attribute, pattern).map(Some),
        None => Ok(Some(Condition::present(attribute))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(text: &str) -> Condition {
        parse_condition(text)
            .expect("valid condition")
            .expect("recognized condition")
    }

    #[test]
    fn presence_condition() {
        let condition = parse("@.name");
        assert_eq!(condition.attribute(), "name");
        assert_eq!(condition.pattern(), None);
    }

    #[test]
    fn value_condition_single_quotes() {
        let condition = parse("@.name='Tacoma Medical Center'");
        assert_eq!(condition.attribute(), "name");
        assert_eq!(condition.pattern(), Some("Tacoma Medical Center"));
    }

    #[test]
    fn value_condition_with_spaces_and_double_quotes() {
        let condition = parse("@.name = \"Tacoma Medical Center\"");
        assert_eq!(condition, parse("@.name='Tacoma Medical Center'"));
    }

    #[test]
    fn mixed_quotes_close_the_value() {
        let condition = parse("@.name='Tacoma\"");
        assert_eq!(condition.pattern(), Some("Tacoma"));
    }

    #[test]
    fn quote_without_equals_is_presence_only() {
        let condition = parse("@.name'ignored'");
        assert_eq!(condition, Condition::present("name"));
    }

    #[test]
    fn text_after_name_or_value_is_ignored() {
        assert_eq!(parse("@.name x"), Condition::present("name"));
        assert_eq!(
            parse("@.name='Tacoma' trailing"),
            Condition::equals("name", "Tacoma").unwrap()
        );
        assert_eq!(
            parse("@.name x = 'Tacoma'"),
            Condition::equals("name", "Tacoma").unwrap()
        );
    }

    #[test]
    fn unrecognized_condition_is_none() {
        assert_eq!(parse_condition("?(@.price < 10)").unwrap(), None);
        assert_eq!(parse_condition("0").unwrap(), None);
    }

    #[test]
    fn missing_attribute_name() {
        for text in ["@.", "@.='x'", "@. ='x'"] {
            let result = parse_condition(text);
            assert!(
                matches!(result, Err(PathError::MalformedCondition(_))),
                "{text}: {result:?}"
            );
        }
    }

    #[test]
    fn equals_without_value() {
        for text in ["@.name=", "@.name = ", "@.name=abc"] {
            let result = parse_condition(text);
            assert!(
                matches!(result, Err(PathError::MalformedCondition(_))),
                "{text}: {result:?}"
            );
        }
    }

    #[test]
    fn invalid_regex_is_malformed() {
        let result = parse_condition("@.name='(unclosed'");
        assert!(matches!(result, Err(PathError::MalformedCondition(_))));
    }

    #[test]
    fn presence_matches_null_value() {
        let condition = Condition::present("url");
        assert!(condition.matches(&json!({"url": null})));
        assert!(condition.matches(&json!({"url": ""})));
        assert!(!condition.matches(&json!({"uri": ""})));
    }

    #[test]
    fn pattern_never_matches_null() {
        let condition = Condition::equals("url", "null").unwrap();
        assert!(!condition.matches(&json!({"url": null})));
        assert!(condition.matches(&json!({"url": "null"})));
    }

    #[test]
    fn pattern_is_full_match() {
        let condition = Condition::equals("city", "Tacoma").unwrap();
        assert!(condition.matches(&json!({"city": "Tacoma"})));
        assert!(!condition.matches(&json!({"city": "Tacoma South"})));
        assert!(!condition.matches(&json!({"city": "North Tacoma"})));

        let prefix = Condition::equals("city", "Tacoma.*").unwrap();
        assert!(prefix.matches(&json!({"city": "Tacoma South"})));
    }

    #[test]
    fn pattern_alternation_is_anchored() {
        let condition = Condition::equals("state", "WA|OR").unwrap();
        assert!(condition.matches(&json!({"state": "OR"})));
        assert!(!condition.matches(&json!({"state": "WAX"})));
    }

    #[test]
    fn pattern_matches_string_form_of_scalars() {
        let zip = Condition::equals("zip", "99[0-9]+").unwrap();
        assert!(zip.matches(&json!({"zip": 99201})));
        assert!(!zip.matches(&json!({"zip": 83929})));

        let flag = Condition::equals("accessible", "true").unwrap();
        assert!(flag.matches(&json!({"accessible": true})));
    }

    #[test]
    fn non_objects_never_match() {
        let condition = Condition::present("name");
        assert!(!condition.matches(&json!([{"name": "x"}])));
        assert!(!condition.matches(&json!("name")));
    }

    #[test]
    fn display_round_trip() {
        for text in ["@.name", "@.name='Gig Harbor.*'", "@.zip='99[0-9]+'"] {
            assert_eq!(text, parse(text).to_string());
        }
        assert_eq!("@.name='X'", parse("@.name=\"X\"").to_string());
    }

    #[test]
    fn equals_rejects_quotes_in_pattern() {
        for pattern in ["O'Brien", "say \"hi\""] {
            let result = Condition::equals("name", pattern);
            assert!(
                matches!(result, Err(PathError::MalformedCondition(_))),
                "{pattern}: {result:?}"
            );
        }
    }

    #[test]
    fn unwritable_attribute_names() {
        for name in ["", "first name", "a=b", "a]", "it's"] {
            assert!(
                Condition::present(name).check_attribute().is_err(),
                "{name:?}"
            );
            assert!(Condition::equals(name, "x").is_err(), "{name:?}");
        }
        assert!(Condition::present("zip.code").check_attribute().is_ok());
    }
}
