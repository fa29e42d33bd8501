//! # Number Schema
//!
//! Validates numbers, converting numeric strings unless [`NumberSchema::strict`]
//! is set (query and path parameters always arrive as strings).
//!
//! ## Precision Policy
//!
//! With `precision(places)` the value is scaled by `10^places`, rounded half
//! away from zero, and scaled back: `3.145 -> 3.15`, `-0.125 -> -0.13`,
//! `9.999 -> 10.0`. Rounding acts on the binary value, so inputs such as
//! `1.005` (stored as `1.00499999...`) round down. Rounding happens before
//! the range rules, which therefore judge the sanitized value. In strict mode
//! excess precision is reported as `number.precision` instead.
//!
//! Rule codes: `number.base`, `number.infinity`, `number.integer`,
//! `number.precision`, `number.min`, `number.max`.

use reqval_core::{IssueList, Schema, ValidationContext};
use serde_json::{Number, Value};

use crate::collect::IssueCollector;

/// Round `value` to `places` decimal places, halves away from zero.
pub fn round_to_precision(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    // Small negatives round to -0.0; write back plain zero.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Number of decimal places in the shortest representation of `value`.
fn decimal_places(value: f64) -> usize {
    let text = value.to_string();
    text.split_once('.').map_or(0, |(_, frac)| frac.len())
}

/// A parsed input number, remembering whether it was integral on the wire.
#[derive(Debug, Clone, Copy)]
enum Parsed {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Parsed {
    fn as_f64(self) -> f64 {
        match self {
            Parsed::Int(i) => i as f64,
            Parsed::UInt(u) => u as f64,
            Parsed::Float(f) => f,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Parsed::Int(i) => Value::Number(Number::from(i)),
            Parsed::UInt(u) => Value::Number(Number::from(u)),
            Parsed::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    min: Option<f64>,
    max: Option<f64>,
    integer: bool,
    precision: Option<u32>,
    strict: bool,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Maximum number of decimal places.
    pub fn precision(mut self, places: u32) -> Self {
        self.precision = Some(places);
        self
    }

    /// Disable string conversion and precision rounding.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn parse(&self, value: &Value) -> Option<Parsed> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Parsed::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Parsed::UInt(u))
                } else {
                    n.as_f64().map(Parsed::Float)
                }
            }
            Value::String(s) if !self.strict => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    Some(Parsed::Int(i))
                } else if let Ok(u) = s.parse::<u64>() {
                    Some(Parsed::UInt(u))
                } else {
                    // `str::parse` accepts "NaN", which is not a number here.
                    s.parse::<f64>().ok().filter(|f| !f.is_nan()).map(Parsed::Float)
                }
            }
            _ => None,
        }
    }
}

impl Schema for NumberSchema {
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList> {
        let Some(parsed) = self.parse(value) else {
            return Err(ctx.issue("number.base", "must be a number").into());
        };
        if !parsed.as_f64().is_finite() {
            return Err(ctx.issue("number.infinity", "cannot be infinity").into());
        }

        let mut issues = IssueCollector::new(ctx.abort_early());

        let number = match (parsed, self.precision) {
            (Parsed::Float(f), Some(places)) if self.strict => {
                if decimal_places(f) > places as usize {
                    issues.push(ctx.issue(
                        "number.precision",
                        format!("must have no more than {places} decimal places"),
                    ));
                }
                Parsed::Float(f)
            }
            (Parsed::Float(f), Some(places)) => Parsed::Float(round_to_precision(f, places)),
            (parsed, _) => parsed,
        };
        let x = number.as_f64();

        if self.integer && x.fract() != 0.0 && !issues.should_stop() {
            issues.push(ctx.issue("number.integer", "must be an integer"));
        }
        if let Some(min) = self.min {
            if x < min && !issues.should_stop() {
                issues.push(ctx.issue(
                    "number.min",
                    format!("must be greater than or equal to {min}"),
                ));
            }
        }
        if let Some(max) = self.max {
            if x > max && !issues.should_stop() {
                issues.push(ctx.issue(
                    "number.max",
                    format!("must be less than or equal to {max}"),
                ));
            }
        }

        issues.finish(number.into_value())
    }

    fn describe(&self) -> String {
        match self.precision {
            Some(places) => format!("number<{places}dp>"),
            None => "number".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqval_core::SegmentName;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        ValidationContext::for_segment(&SegmentName::new("body").unwrap()).child("price")
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        assert_eq!(round_to_precision(3.145, 2), 3.15);
        assert_eq!(round_to_precision(0.125, 2), 0.13);
        assert_eq!(round_to_precision(-0.125, 2), -0.13);
        assert_eq!(round_to_precision(2.5, 0), 3.0);
        assert_eq!(round_to_precision(-2.5, 0), -3.0);
    }

    #[test]
    fn rounding_acts_on_binary_value() {
        // 1.005 is stored just below the midpoint.
        assert_eq!(round_to_precision(1.005, 2), 1.0);
        assert_eq!(round_to_precision(9.999, 2), 10.0);
    }

    #[test]
    fn precision_rounds_floats() {
        let schema = NumberSchema::new().precision(2);
        assert_eq!(schema.validate(&json!(3.145), &ctx()).unwrap(), json!(3.15));
        assert_eq!(schema.validate(&json!(9.999), &ctx()).unwrap(), json!(10.0));
    }

    #[test]
    fn integers_pass_through_unchanged() {
        let schema = NumberSchema::new().precision(2);
        assert_eq!(schema.validate(&json!(7), &ctx()).unwrap(), json!(7));
    }

    #[test]
    fn converts_numeric_strings() {
        let schema = NumberSchema::new().precision(2);
        assert_eq!(schema.validate(&json!(" 42 "), &ctx()).unwrap(), json!(42));
        assert_eq!(schema.validate(&json!("3.145"), &ctx()).unwrap(), json!(3.15));
    }

    #[test]
    fn strict_rejects_strings() {
        let err = NumberSchema::new()
            .strict()
            .validate(&json!("42"), &ctx())
            .unwrap_err();
        assert_eq!(err.first().kind, "number.base");
    }

    #[test]
    fn strict_reports_excess_precision() {
        let schema = NumberSchema::new().strict().precision(2);
        assert!(schema.validate(&json!(3.14), &ctx()).is_ok());
        let err = schema.validate(&json!(3.145), &ctx()).unwrap_err();
        assert_eq!(err.first().kind, "number.precision");
    }

    #[test]
    fn non_numbers_are_rejected() {
        for value in [json!("abc"), json!(null), json!(true), json!([1])] {
            let err = NumberSchema::new().validate(&value, &ctx()).unwrap_err();
            assert_eq!(err.first().kind, "number.base");
            assert_eq!(err.first().message, "\"req.body.price\" must be a number");
        }
    }

    #[test]
    fn infinite_strings_are_rejected() {
        for raw in ["inf", "-Infinity"] {
            let err = NumberSchema::new().validate(&json!(raw), &ctx()).unwrap_err();
            assert_eq!(err.first().kind, "number.infinity");
            assert_eq!(err.first().message, "\"req.body.price\" cannot be infinity");
        }
    }

    #[test]
    fn nan_strings_are_not_numbers() {
        for raw in ["NaN", " nan "] {
            let err = NumberSchema::new().validate(&json!(raw), &ctx()).unwrap_err();
            assert_eq!(err.len(), 1);
            assert_eq!(err.first().kind, "number.base");
            assert_eq!(err.first().message, "\"req.body.price\" must be a number");
        }
    }

    #[test]
    fn large_unsigned_integers_pass_through_unchanged() {
        let schema = NumberSchema::new().integer().precision(2);
        let out = schema.validate(&json!(u64::MAX), &ctx()).unwrap();
        assert_eq!(out, json!(u64::MAX));
        assert_eq!(out.as_u64(), Some(u64::MAX));

        let out = schema
            .validate(&json!("18446744073709551615"), &ctx())
            .unwrap();
        assert_eq!(out.as_u64(), Some(u64::MAX));
    }

    #[test]
    fn min_message_matches_bound() {
        let err = NumberSchema::new()
            .min(0.0)
            .validate(&json!(-1), &ctx())
            .unwrap_err();
        assert_eq!(err.first().kind, "number.min");
        assert_eq!(
            err.first().message,
            "\"req.body.price\" must be greater than or equal to 0"
        );
    }

    #[test]
    fn range_is_checked_after_rounding() {
        // -0.004 rounds to zero, which is not below 0.
        let schema = NumberSchema::new().min(0.0).precision(2);
        assert!(schema.validate(&json!(-0.004), &ctx()).is_ok());
    }

    #[test]
    fn rounding_never_yields_negative_zero() {
        let rounded = round_to_precision(-0.004, 2);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());

        let schema = NumberSchema::new().min(0.0).precision(2);
        let out = schema.validate(&json!(-0.004), &ctx()).unwrap();
        assert_eq!(out.to_string(), "0.0");
    }

    #[test]
    fn collects_integer_and_range_issues() {
        let schema = NumberSchema::new().integer().max(1.0);
        let err = schema.validate(&json!(2.5), &ctx()).unwrap_err();
        let kinds: Vec<&str> = err.iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(kinds, vec!["number.integer", "number.max"]);
    }

    #[test]
    fn decimal_places_of_shortest_repr() {
        assert_eq!(decimal_places(3.0), 0);
        assert_eq!(decimal_places(3.1), 1);
        assert_eq!(decimal_places(3.145), 3);
    }
}
