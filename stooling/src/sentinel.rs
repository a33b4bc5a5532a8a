//! Parser for the `CALL:<Name>{<json>}` reply sentinel.
//!
//! ```rust
//! use stooling::parse_function_call;
//!
//! let call = parse_function_call(r#"CALL:Echo{"text":"hi"}"#).expect("sentinel");
//! assert_eq!(call.name, "Echo");
//! assert_eq!(call.arguments["text"], "hi");
//!
//! assert!(parse_function_call("The answer is 4").is_none());
//! ```

use serde_json::{Value, json};

pub const CALL_PREFIX: &str = "CALL:";

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Value,
}

/// Arguments substituted when the JSON after the name does not parse.
pub fn parse_error_arguments() -> Value {
    json!({ "raw": "parse_error" })
}

/// Recognizes a reply of the form `CALL:<Name>{<json>}`. Leading whitespace
/// before the prefix is ignored; a missing or malformed JSON tail yields
/// [`parse_error_arguments`].
pub fn parse_function_call(reply: &str) -> Option<FunctionCall> {
    let rest = reply.trim_start().strip_prefix(CALL_PREFIX)?;

    let (name, json_text) = match rest.find('{') {
        Some(index) => (&rest[..index], &rest[index..]),
        None => (rest, ""),
    };

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let arguments = serde_json::from_str::<Value>(json_text.trim_end())
        .unwrap_or_else(|_| parse_error_arguments());

    Some(FunctionCall {
        name: name.to_string(),
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_json_parsed() {
        let call = parse_function_call("CALL: GetWeather {\"city\":\"Oslo\"}\n").expect("call");
        assert_eq!(call.name, "GetWeather");
        assert_eq!(call.arguments, json!({ "city": "Oslo" }));
    }

    #[test]
    fn malformed_json_degrades_to_placeholder() {
        let call = parse_function_call("CALL:Echo{text: hi}").expect("call");
        assert_eq!(call.arguments, parse_error_arguments());

        let call = parse_function_call("CALL:Ping").expect("call without arguments");
        assert_eq!(call.name, "Ping");
        assert_eq!(call.arguments, parse_error_arguments());
    }

    #[test]
    fn non_sentinel_replies_do_not_match() {
        assert!(parse_function_call("call:Echo{}").is_none());
        assert!(parse_function_call("Sure! CALL:Echo{}").is_none());
        assert!(parse_function_call("CALL:{\"x\":1}").is_none());
    }
}
