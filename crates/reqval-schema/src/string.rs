//! # String Schema
//!
//! Validates string values and normalizes them (trim, case folding) before
//! the length and pattern rules run, so rules always see the sanitized form.
//!
//! Rule codes: `string.base`, `string.empty`, `string.min`, `string.max`,
//! `string.pattern.name`.

use std::fmt;

use regex::Regex;
use reqval_core::{ConfigError, IssueList, Schema, ValidationContext};
use serde_json::Value;

use crate::collect::IssueCollector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Lower,
    Upper,
}

#[derive(Clone)]
enum Shape {
    Pattern { regex: Regex, name: String },
    Hex { len: usize, name: String },
}

impl Shape {
    fn name(&self) -> &str {
        match self {
            Shape::Pattern { name, .. } | Shape::Hex { name, .. } => name,
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Shape::Pattern { regex, .. } => regex.is_match(value),
            Shape::Hex { len, .. } => {
                value.len() == *len && value.bytes().all(|b| b.is_ascii_hexdigit())
            }
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Pattern { regex, name } => write!(f, "{name}({})", regex.as_str()),
            Shape::Hex { len, name } => write!(f, "{name}(hex{{{len}}})"),
        }
    }
}

/// Builder-style string schema.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    trim: bool,
    case: Option<Case>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    shapes: Vec<Shape>,
    allow_empty: bool,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip leading and trailing whitespace.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.case = Some(Case::Lower);
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.case = Some(Case::Upper);
        self
    }

    /// Minimum length in characters.
    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Maximum length in characters.
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Accept the empty string (after trimming).
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Require the value to match `pattern`; `name` appears in issue messages.
    pub fn pattern(mut self, pattern: &str, name: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidSchema {
            segment: name.to_string(),
            reason: format!("invalid pattern {pattern:?}: {e}"),
        })?;
        self.shapes.push(Shape::Pattern {
            regex,
            name: name.to_string(),
        });
        Ok(self)
    }

    /// Require exactly `len` hexadecimal digits.
    pub fn hex(mut self, len: usize, name: &str) -> Self {
        self.shapes.push(Shape::Hex {
            len,
            name: name.to_string(),
        });
        self
    }

    pub(crate) fn object_id_pattern(self) -> Self {
        self.hex(24, "ObjectId")
    }

    fn normalize(&self, raw: &str) -> String {
        let trimmed = if self.trim { raw.trim() } else { raw };
        match self.case {
            Some(Case::Lower) => trimmed.to_lowercase(),
            Some(Case::Upper) => trimmed.to_uppercase(),
            None => trimmed.to_string(),
        }
    }
}

impl Schema for StringSchema {
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList> {
        let Some(raw) = value.as_str() else {
            return Err(ctx.issue("string.base", "must be a string").into());
        };
        let s = self.normalize(raw);

        if s.is_empty() {
            if self.allow_empty {
                return Ok(Value::String(s));
            }
            return Err(ctx.issue("string.empty", "is not allowed to be empty").into());
        }

        let mut issues = IssueCollector::new(ctx.abort_early());
        let len = s.chars().count();

        if let Some(min) = self.min_len {
            if len < min {
                issues.push(ctx.issue(
                    "string.min",
                    format!("length must be at least {min} characters long"),
                ));
            }
        }
        if let Some(max) = self.max_len {
            if len > max && !issues.should_stop() {
                issues.push(ctx.issue(
                    "string.max",
                    format!("length must be less than or equal to {max} characters long"),
                ));
            }
        }
        for shape in &self.shapes {
            if issues.should_stop() {
                break;
            }
            if !shape.matches(&s) {
                issues.push(ctx.issue(
                    "string.pattern.name",
                    format!("with value \"{s}\" fails to match the {} pattern", shape.name()),
                ));
            }
        }

        issues.finish(Value::String(s))
    }

    fn describe(&self) -> String {
        let shapes: Vec<&str> = self.shapes.iter().map(Shape::name).collect();
        if shapes.is_empty() {
            "string".to_string()
        } else {
            format!("string<{}>", shapes.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqval_core::SegmentName;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        ValidationContext::for_segment(&SegmentName::new("body").unwrap()).child("name")
    }

    #[test]
    fn trims_whitespace() {
        let out = StringSchema::new().trim().validate(&json!("  Widget  "), &ctx());
        assert_eq!(out.unwrap(), json!("Widget"));
    }

    #[test]
    fn untrimmed_by_default() {
        let out = StringSchema::new().validate(&json!(" a "), &ctx());
        assert_eq!(out.unwrap(), json!(" a "));
    }

    #[test]
    fn rejects_non_strings() {
        for value in [json!(1), json!(null), json!(true), json!({}), json!([])] {
            let err = StringSchema::new().validate(&value, &ctx()).unwrap_err();
            assert_eq!(err.first().kind, "string.base");
            assert_eq!(err.first().message, "\"req.body.name\" must be a string");
        }
    }

    #[test]
    fn empty_after_trim_is_rejected() {
        let err = StringSchema::new()
            .trim()
            .validate(&json!("   "), &ctx())
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.first().kind, "string.empty");
        assert_eq!(err.first().path, "name");
    }

    #[test]
    fn allow_empty_accepts_blank() {
        let out = StringSchema::new()
            .trim()
            .allow_empty()
            .validate(&json!("  "), &ctx());
        assert_eq!(out.unwrap(), json!(""));
    }

    #[test]
    fn reports_every_failed_rule() {
        let schema = StringSchema::new()
            .min_len(5)
            .pattern("^[0-9]+$", "digits")
            .unwrap();
        let err = schema.validate(&json!("ab"), &ctx()).unwrap_err();
        let kinds: Vec<&str> = err.iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(kinds, vec!["string.min", "string.pattern.name"]);
    }

    #[test]
    fn abort_early_stops_at_first_rule() {
        let schema = StringSchema::new()
            .min_len(5)
            .pattern("^[0-9]+$", "digits")
            .unwrap();
        let err = schema
            .validate(&json!("ab"), &ctx().with_abort_early(true))
            .unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn max_len_counts_characters() {
        let schema = StringSchema::new().max_len(3);
        assert!(schema.validate(&json!("äöü"), &ctx()).is_ok());
        let err = schema.validate(&json!("abcd"), &ctx()).unwrap_err();
        assert_eq!(err.first().kind, "string.max");
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let err = StringSchema::new().pattern("([", "broken").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSchema { .. }));
    }

    #[test]
    fn pattern_message_names_the_pattern() {
        let schema = StringSchema::new().hex(24, "ObjectId");
        let err = schema.validate(&json!("not-valid"), &ctx()).unwrap_err();
        assert_eq!(
            err.first().message,
            "\"req.body.name\" with value \"not-valid\" fails to match the ObjectId pattern"
        );
    }

    #[test]
    fn case_folding_runs_before_rules() {
        let schema = StringSchema::new()
            .uppercase()
            .pattern("^[A-Z]+$", "upper")
            .unwrap();
        assert_eq!(schema.validate(&json!("abc"), &ctx()).unwrap(), json!("ABC"));
    }

    #[test]
    fn describe_lists_shapes() {
        assert_eq!(StringSchema::new().describe(), "string");
        assert_eq!(
            StringSchema::new().hex(24, "ObjectId").describe(),
            "string<ObjectId>"
        );
    }
}
