use reqval_core::{IssueList, Schema, ValidationContext};
use serde_json::Value;

/// Booleans, accepting `"true"`/`"false"` (any case) unless strict.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    strict: bool,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

impl Schema for BooleanSchema {
    fn validate(&self, value: &Value, ctx: &ValidationContext) -> Result<Value, IssueList> {
        match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) if !self.strict => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(ctx.issue("boolean.base", "must be a boolean").into()),
            },
            _ => Err(ctx.issue("boolean.base", "must be a boolean").into()),
        }
    }

    fn describe(&self) -> String {
        "boolean".to_string()
    }
}
