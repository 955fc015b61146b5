use routewire::mock::{
    mock_context, CallMatcher, ContextOverrides, GeneratorOptions, MockContext, MockError,
    MockHandler, SpyHandler,
};
use routewire::schema::{is_valid, Schema};
use routewire::{HandlerConfig, RouteDescriptor};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn user_config() -> Arc<HandlerConfig> {
    HandlerConfig::new(
        RouteDescriptor::pattern(
            "/users/:id",
            Schema::object(vec![("id", Schema::string())]),
        )
        .expect("valid pattern"),
    )
    .body(Schema::object(vec![("name", Schema::string())]))
    .response(Schema::object(vec![
        ("id", Schema::string()),
        ("name", Schema::string()),
    ]))
    .into_shared()
}

fn bare_config() -> Arc<HandlerConfig> {
    HandlerConfig::new(RouteDescriptor::static_path("/ping").expect("valid path")).into_shared()
}

fn ctx_with_body(body: serde_json::Value) -> MockContext {
    MockContext {
        body: Some(body),
        ..MockContext::default()
    }
}

#[tokio::test]
async fn static_data_is_returned_verbatim() {
    let handler = MockHandler::new(user_config()).with_static(json!({ "id": "1" }));
    let response = handler.invoke(MockContext::default()).await.unwrap();
    assert_eq!(response, json!({ "id": "1" }));
}

#[tokio::test]
async fn response_fn_takes_priority_over_static_data() {
    let handler = MockHandler::new(user_config())
        .with_static(json!({ "source": "static" }))
        .with_response_fn(|ctx| async move {
            json!({ "source": "function", "had_body": ctx.body.is_some() })
        });
    let response = handler.invoke(ctx_with_body(json!({}))).await.unwrap();
    assert_eq!(response["source"], "function");
    assert_eq!(response["had_body"], true);
}

#[tokio::test]
async fn explicit_error_takes_priority_over_everything() {
    let handler = MockHandler::new(user_config())
        .with_static(json!({ "unreachable": true }))
        .with_response_fn(|_| async { json!({ "unreachable": true }) })
        .with_error("backend unavailable");
    let err = handler.invoke(MockContext::default()).await.unwrap_err();
    assert_eq!(err, MockError::new("backend unavailable"));
}

#[tokio::test]
async fn error_fn_sees_the_invocation_context() {
    let handler = MockHandler::new(user_config()).with_error_fn(|ctx| {
        MockError::new(format!("rejected body: {:?}", ctx.body.is_some()))
    });
    let err = handler.invoke(ctx_with_body(json!({}))).await.unwrap_err();
    assert!(err.message.contains("true"));
}

#[tokio::test]
async fn error_probability_one_always_fails() {
    let handler = MockHandler::new(user_config()).with_error_probability(1.0);
    for _ in 0..5 {
        assert!(handler.invoke(MockContext::default()).await.is_err());
    }
}

#[tokio::test]
async fn error_probability_zero_never_fails() {
    let handler = MockHandler::new(user_config()).with_error_probability(0.0);
    for _ in 0..5 {
        assert!(handler.invoke(MockContext::default()).await.is_ok());
    }
}

#[tokio::test]
async fn generated_response_conforms_to_response_schema() {
    let config = user_config();
    let handler =
        MockHandler::new(Arc::clone(&config)).with_generator_options(GeneratorOptions::new().seed(8));
    let response = handler.invoke(MockContext::default()).await.unwrap();
    let schema = &config.response.as_ref().expect("response schema").schema;
    assert!(is_valid(schema, &response), "generated response {response} invalid");
}

#[tokio::test]
async fn missing_response_schema_falls_back_to_empty_object() {
    let handler = MockHandler::new(bare_config());
    let response = handler.invoke(MockContext::default()).await.unwrap();
    assert_eq!(response, json!({}));
}

#[tokio::test]
async fn delay_applies_before_success_and_error() {
    let delay = Duration::from_millis(30);

    let ok_handler = MockHandler::new(bare_config()).with_delay(delay);
    let start = Instant::now();
    ok_handler.invoke(MockContext::default()).await.unwrap();
    assert!(start.elapsed() >= delay);

    let err_handler = MockHandler::new(bare_config())
        .with_delay(delay)
        .with_error("slow failure");
    let start = Instant::now();
    assert!(err_handler.invoke(MockContext::default()).await.is_err());
    assert!(start.elapsed() >= delay);
}

#[tokio::test]
async fn spy_counts_and_orders_calls() {
    let spy = SpyHandler::new(MockHandler::new(user_config()).with_static(json!({ "id": "1" })));
    for name in ["ada", "grace", "edsger"] {
        spy.invoke(ctx_with_body(json!({ "name": name })))
            .await
            .unwrap();
    }
    assert_eq!(spy.call_count(), 3);
    let last = spy.last_call().expect("a recorded call");
    assert_eq!(last.body, Some(json!({ "name": "edsger" })));
    assert_eq!(spy.calls().len(), 3);
}

#[tokio::test]
async fn spy_partial_matching_ignores_extra_fields() {
    let spy = SpyHandler::new(MockHandler::new(user_config()).with_static(json!({ "id": "1" })));
    spy.invoke(ctx_with_body(json!({ "name": "ada", "age": 36 })))
        .await
        .unwrap();

    assert!(spy.was_called_with(&CallMatcher::new().body(json!({ "name": "ada" }))));
    assert!(!spy.was_called_with(&CallMatcher::new().body(json!({ "name": "grace" }))));
    assert!(!spy.was_called_with(&CallMatcher::new().body(json!({ "missing": 1 }))));
}

#[tokio::test]
async fn spy_matches_nested_bodies_and_exact_headers() {
    let spy = SpyHandler::new(MockHandler::new(user_config()).with_static(json!({})));
    let mut ctx = ctx_with_body(json!({ "user": { "name": "ada", "role": "admin" } }));
    ctx.headers.insert("x-tenant".into(), "acme".into());
    spy.invoke(ctx).await.unwrap();

    assert!(spy.was_called_with(
        &CallMatcher::new()
            .body(json!({ "user": { "name": "ada" } }))
            .header("x-tenant", "acme")
    ));
    assert!(!spy.was_called_with(&CallMatcher::new().header("x-tenant", "other")));
    assert!(!spy.was_called_with(&CallMatcher::new().header("x-missing", "acme")));
}

#[tokio::test]
async fn spy_records_calls_that_error() {
    let spy = SpyHandler::new(MockHandler::new(user_config()).with_error("boom"));
    assert!(spy.invoke(ctx_with_body(json!({ "name": "x" }))).await.is_err());
    assert_eq!(spy.call_count(), 1);
    assert!(spy.was_called_with(&CallMatcher::new().body(json!({ "name": "x" }))));
}

#[tokio::test]
async fn reset_clears_log_but_keeps_strategy() {
    let spy = SpyHandler::new(MockHandler::new(user_config()).with_static(json!({ "id": "1" })));
    spy.invoke(MockContext::default()).await.unwrap();
    assert_eq!(spy.call_count(), 1);

    spy.reset();
    assert_eq!(spy.call_count(), 0);
    assert!(spy.last_call().is_none());

    let response = spy.invoke(MockContext::default()).await.unwrap();
    assert_eq!(response, json!({ "id": "1" }));
    assert_eq!(spy.call_count(), 1);
}

#[tokio::test]
async fn mock_context_merges_overrides_per_section() {
    let config = user_config();
    let overrides = ContextOverrides::new()
        .params(json!({ "id": "fixed-id" }))
        .body(json!({ "name": "pinned" }))
        .header("authorization", "Bearer test");
    let ctx = mock_context(&config, Some(&overrides));

    assert_eq!(ctx.params["id"], "fixed-id");
    let body = ctx.body.expect("body section generated");
    assert_eq!(body["name"], "pinned");
    assert_eq!(ctx.headers["authorization"], "Bearer test");
}

#[tokio::test]
async fn mock_context_without_overrides_generates_declared_sections() {
    let ctx = mock_context(&user_config(), None);
    assert!(ctx.params.contains_key("id"));
    assert!(ctx.body.is_some());
    assert!(ctx.query.is_empty());
    assert!(ctx.headers.is_empty());
}
