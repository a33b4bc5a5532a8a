//! Argument helpers for function handlers receiving JSON values.
//!
//! ```rust
//! use serde_json::json;
//! use stooling::{optional_string, required_string};
//!
//! let args = json!({ "query": "rust" });
//! assert_eq!(required_string(&args, "query").expect("query"), "rust");
//! assert_eq!(optional_string(&args, "limit"), None);
//! ```

use serde_json::{Map, Value};

use crate::{ToolError, parse_error_arguments};

pub fn as_object(args: &Value) -> Result<&Map<String, Value>, ToolError> {
    args.as_object()
        .ok_or_else(|| ToolError::invalid_arguments("expected JSON object arguments"))
}

pub fn required_string(args: &Value, key: &str) -> Result<String, ToolError> {
    if is_parse_error(args) {
        return Err(ToolError::invalid_arguments(
            "arguments could not be parsed as JSON",
        ));
    }

    as_object(args)?
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn optional_string(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(ToString::to_string)
}

/// True when the sentinel parser substituted its placeholder arguments.
pub fn is_parse_error(args: &Value) -> bool {
    *args == parse_error_arguments()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    #[test]
    fn required_string_reports_missing_key() {
        let error = required_string(&json!({ "other": 1 }), "text").expect_err("missing");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn placeholder_arguments_are_detected() {
        assert!(is_parse_error(&parse_error_arguments()));
        assert!(required_string(&parse_error_arguments(), "raw").is_err());
        assert!(!is_parse_error(&json!({ "raw": "value" })));
    }
}
