use super::context::GeneratorOptions;
use super::generate::generate_rooted;
use super::rng::DetRng;
use super::scenario::MockContext;
use crate::config::HandlerConfig;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// A simulated handler failure. Deliberate and caller-configured; the
/// handler propagates it unchanged, never catching or wrapping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockError {
    pub message: String,
}

impl MockError {
    pub fn new(message: impl Into<String>) -> Self {
        MockError {
            message: message.into(),
        }
    }
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simulated handler error: {}", self.message)
    }
}

impl std::error::Error for MockError {}

type ResponseFuture = Pin<Box<dyn Future<Output = Value> + Send>>;
/// Custom response strategy: invoked with the invocation context, may be
/// asynchronous.
pub type ResponseFn = Arc<dyn Fn(MockContext) -> ResponseFuture + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&MockContext) -> MockError + Send + Sync>;

/// An unconditional simulated error: a fixed one, or one computed from the
/// invocation context.
#[derive(Clone)]
enum ErrorSpec {
    Always(MockError),
    FromContext(ErrorFn),
}

impl fmt::Debug for ErrorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSpec::Always(err) => f.debug_tuple("Always").field(err).finish(),
            ErrorSpec::FromContext(_) => f.debug_tuple("FromContext").finish_non_exhaustive(),
        }
    }
}

/// A handler configuration paired with a response-simulation strategy.
///
/// When several strategies are configured, they apply in priority order:
///
/// 1. explicit simulated error — raised unconditionally;
/// 2. random error — raised with the declared probability, drawn
///    independently per invocation;
/// 3. custom response function;
/// 4. static data, returned verbatim;
/// 5. auto-generation from the config's response schema;
/// 6. an empty object when no response schema exists.
///
/// The optional delay is awaited before every outcome, the error paths
/// included, so timeout-adjacent behavior can be exercised
/// deterministically.
pub struct MockHandler {
    config: Arc<HandlerConfig>,
    delay: Option<Duration>,
    error: Option<ErrorSpec>,
    error_probability: Option<f64>,
    response_fn: Option<ResponseFn>,
    static_data: Option<Value>,
    generator: GeneratorOptions,
    /// Source for per-invocation random-error draws. The only mutable
    /// state of a plain mock handler; independent draws per invocation
    /// require it.
    error_rng: Mutex<DetRng>,
}

impl fmt::Debug for MockHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockHandler")
            .field("delay", &self.delay)
            .field("error", &self.error)
            .field("error_probability", &self.error_probability)
            .field("has_response_fn", &self.response_fn.is_some())
            .field("static_data", &self.static_data)
            .finish_non_exhaustive()
    }
}

impl MockHandler {
    /// A handler for the configuration with no strategy configured: it
    /// responds from the response schema, or with an empty object.
    #[must_use]
    pub fn new(config: Arc<HandlerConfig>) -> Self {
        let generator = GeneratorOptions::default();
        let error_rng = Mutex::new(DetRng::new(generator.resolve_seed()));
        MockHandler {
            config,
            delay: None,
            error: None,
            error_probability: None,
            response_fn: None,
            static_data: None,
            generator,
            error_rng,
        }
    }

    /// Await this long before resolving any outcome, simulating network
    /// latency. Applies on error paths too.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Raise this error on every invocation.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(ErrorSpec::Always(MockError::new(message)));
        self
    }

    /// Raise an error computed from the invocation context on every
    /// invocation.
    #[must_use]
    pub fn with_error_fn(
        mut self,
        error_fn: impl Fn(&MockContext) -> MockError + Send + Sync + 'static,
    ) -> Self {
        self.error = Some(ErrorSpec::FromContext(Arc::new(error_fn)));
        self
    }

    /// Raise a random error with this probability, drawn independently per
    /// invocation.
    #[must_use]
    pub fn with_error_probability(mut self, probability: f64) -> Self {
        self.error_probability = Some(probability.clamp(0.0, 1.0));
        self
    }

    /// Respond through a custom asynchronous function.
    #[must_use]
    pub fn with_response_fn<F, Fut>(mut self, response_fn: F) -> Self
    where
        F: Fn(MockContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        self.response_fn = Some(Arc::new(move |ctx| Box::pin(response_fn(ctx))));
        self
    }

    /// Respond with this value verbatim.
    #[must_use]
    pub fn with_static(mut self, data: Value) -> Self {
        self.static_data = Some(data);
        self
    }

    /// Options for the auto-generated response strategy. Seeding here also
    /// seeds the random-error draws.
    #[must_use]
    pub fn with_generator_options(mut self, options: GeneratorOptions) -> Self {
        self.error_rng = Mutex::new(DetRng::new(options.resolve_seed()));
        self.generator = options;
        self
    }

    /// The wrapped configuration.
    #[must_use]
    pub fn config(&self) -> &Arc<HandlerConfig> {
        &self.config
    }

    /// Invoke the handler with the given context.
    ///
    /// # Errors
    ///
    /// Returns the configured simulated error, or a random error at the
    /// configured probability. Errors propagate unchanged.
    pub async fn invoke(&self, ctx: MockContext) -> Result<Value, MockError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(spec) = &self.error {
            let err = match spec {
                ErrorSpec::Always(err) => err.clone(),
                ErrorSpec::FromContext(f) => f(&ctx),
            };
            debug!(error = %err, "raising configured simulated error");
            return Err(err);
        }

        if let Some(p) = self.error_probability {
            if self.error_rng.lock().chance(p) {
                debug!(probability = p, "raising random simulated error");
                return Err(MockError::new(format!(
                    "random failure (probability {})",
                    p
                )));
            }
        }

        if let Some(response_fn) = &self.response_fn {
            return Ok(response_fn(ctx).await);
        }

        if let Some(data) = &self.static_data {
            return Ok(data.clone());
        }

        if let Some(section) = &self.config.response {
            return Ok(generate_rooted(&section.schema, &self.generator, "response"));
        }

        Ok(json!({}))
    }
}

/// One recorded invocation of a spy handler.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedCall {
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
    pub timestamp: SystemTime,
}

/// Partial matcher for [`SpyHandler::was_called_with`].
///
/// `params`/`query`/`body` match partially and deeply: every key present
/// in the matcher must be present and equal, recursively, in the recorded
/// value; extra recorded keys are ignored. Headers match exactly per key.
/// Absent sections are not constrained.
#[derive(Debug, Clone, Default)]
pub struct CallMatcher {
    pub params: Option<Value>,
    pub query: Option<Value>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl CallMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    fn matches(&self, call: &RecordedCall) -> bool {
        if let Some(expected) = &self.params {
            if !is_partial_match(expected, &Value::Object(call.params.clone())) {
                return false;
            }
        }
        if let Some(expected) = &self.query {
            if !is_partial_match(expected, &Value::Object(call.query.clone())) {
                return false;
            }
        }
        if let Some(expected) = &self.body {
            match &call.body {
                Some(body) => {
                    if !is_partial_match(expected, body) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        self.headers
            .iter()
            .all(|(name, value)| call.headers.get(name) == Some(value))
    }
}

/// Partial deep match: objects require every expected key to match
/// recursively, everything else requires equality.
fn is_partial_match(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            expected_map.iter().all(|(key, expected_value)| {
                actual_map
                    .get(key)
                    .is_some_and(|actual_value| is_partial_match(expected_value, actual_value))
            })
        }
        (expected, actual) => expected == actual,
    }
}

/// A [`MockHandler`] that records every invocation for later assertion.
///
/// The call is recorded before the response strategy runs, so it is
/// observable even when the strategy raises. The log is appended behind a
/// mutex: under concurrent invocation the order is the order the record
/// steps execute, not the order the calls started.
pub struct SpyHandler {
    inner: MockHandler,
    calls: Mutex<Vec<RecordedCall>>,
}

impl fmt::Debug for SpyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyHandler")
            .field("inner", &self.inner)
            .field("call_count", &self.call_count())
            .finish()
    }
}

impl SpyHandler {
    #[must_use]
    pub fn new(inner: MockHandler) -> Self {
        SpyHandler {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped mock handler.
    #[must_use]
    pub fn handler(&self) -> &MockHandler {
        &self.inner
    }

    /// Invoke the underlying handler, recording the call first.
    ///
    /// # Errors
    ///
    /// Propagates the underlying handler's simulated errors; the call is
    /// recorded regardless.
    pub async fn invoke(&self, ctx: MockContext) -> Result<Value, MockError> {
        self.calls.lock().push(RecordedCall {
            params: ctx.params.clone(),
            query: ctx.query.clone(),
            body: ctx.body.clone(),
            headers: ctx.headers.clone(),
            timestamp: SystemTime::now(),
        });
        self.inner.invoke(ctx).await
    }

    /// Number of recorded invocations.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The most recently recorded invocation.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    /// The full call log, in record order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Whether some recorded call matches the matcher.
    #[must_use]
    pub fn was_called_with(&self, matcher: &CallMatcher) -> bool {
        self.calls.lock().iter().any(|call| matcher.matches(call))
    }

    /// Clear the call log. Configuration and response strategy persist.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}
