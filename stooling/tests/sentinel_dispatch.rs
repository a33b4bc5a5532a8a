use serde_json::Value;
use stooling::prelude::*;
use stooling::required_string;
use tokio_util::sync::CancellationToken;

fn registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry.register_sync_fn("Echo", "Repeats the text argument", |args| {
        Ok(format!("EchoResult: {}", required_string(&args, "text")?))
    });
    registry.register_fn("Sum", "Adds the numbers in `values`", |args, _cancel| async move {
        let total = args["values"]
            .as_array()
            .ok_or_else(|| ToolError::invalid_arguments("values must be an array"))?
            .iter()
            .filter_map(Value::as_f64)
            .sum::<f64>();
        Ok(total.to_string())
    });
    registry
}

#[tokio::test]
async fn echo_call_produces_echo_result() {
    let dispatcher = FunctionDispatcher::new(registry());

    let outcome = dispatcher
        .dispatch(r#"CALL:Echo{"text":"hi"}"#, &CancellationToken::new())
        .await
        .expect("dispatch succeeds")
        .expect("sentinel matched");

    assert_eq!(outcome.output, "EchoResult: hi");
}

#[tokio::test]
async fn async_handlers_receive_parsed_arguments() {
    let dispatcher = FunctionDispatcher::new(registry());

    let outcome = dispatcher
        .dispatch(
            "  CALL:SUM {\"values\": [1, 2, 3.5]}",
            &CancellationToken::new(),
        )
        .await
        .expect("dispatch succeeds")
        .expect("sentinel matched");

    assert_eq!(outcome.function, "Sum");
    assert_eq!(outcome.output, "6.5");
}
