use super::context::GeneratorOptions;
use super::generate::generate_rooted;
use crate::config::HandlerConfig;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Seed stride between scenarios in a batch: scenario `i` runs at
/// `base_seed + i * 1000`, so scenarios differ from each other while the
/// whole batch stays reproducible from the base seed.
const SCENARIO_SEED_STRIDE: u64 = 1000;
/// Seed offset separating a scenario's response stream from its request
/// stream.
const RESPONSE_SEED_OFFSET: u64 = 1;

/// A generated request payload. Sparse: sections without a corresponding
/// schema in the configuration are `None`, not empty objects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MockRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// A generated request/response pair for one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MockScenario {
    pub request: MockRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

/// A complete handler-invocation context: params/query always present as
/// (possibly empty) objects, body optional, plus a headers container.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MockContext {
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

/// Per-section overrides for [`mock_context`]. Each present section is
/// shallow-merged over the generated one; headers seed the context's
/// header container directly.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub params: Option<Value>,
    pub query: Option<Value>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl ContextOverrides {
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
}

/// Generate a request payload for the configuration.
///
/// `params` is generated from the route descriptor's params schema and
/// only when the route variant carries one (never for static routes);
/// `query` and `body` only when the corresponding config section exists.
/// Sections are generated under the path roots `params`/`query`/`body`,
/// so overrides address them as e.g. `"body.name"`.
#[must_use]
pub fn mock_request(config: &HandlerConfig, options: &GeneratorOptions) -> MockRequest {
    MockRequest {
        params: config
            .route
            .params_schema()
            .map(|schema| generate_rooted(schema, options, "params")),
        query: config
            .query
            .as_ref()
            .map(|section| generate_rooted(&section.schema, options, "query")),
        body: config
            .body
            .as_ref()
            .map(|section| generate_rooted(&section.schema, options, "body")),
    }
}

/// Generate a response payload, or `None` when the configuration declares
/// no response schema. Callers must handle the absent case.
#[must_use]
pub fn mock_response(config: &HandlerConfig, options: &GeneratorOptions) -> Option<Value> {
    config
        .response
        .as_ref()
        .map(|section| generate_rooted(&section.schema, options, "response"))
}

/// Generate a request/response pair from one set of options. The response
/// runs at a derived seed, so the pair is reproducible from the top-level
/// seed without the two sharing one random sequence.
#[must_use]
pub fn mock_scenario(config: &HandlerConfig, options: &GeneratorOptions) -> MockScenario {
    let pinned = options.derived(0);
    MockScenario {
        request: mock_request(config, &pinned),
        response: mock_response(config, &pinned.derived(RESPONSE_SEED_OFFSET)),
    }
}

/// Generate `count` scenarios, each at a distinct derived seed
/// (`base + i * 1000`), so scenarios differ from each other while the
/// batch is reproducible from the base seed.
#[must_use]
pub fn mock_scenarios(
    config: &HandlerConfig,
    count: usize,
    options: &GeneratorOptions,
) -> Vec<MockScenario> {
    let base = options.derived(0);
    (0..count)
        .map(|i| mock_scenario(config, &base.derived(i as u64 * SCENARIO_SEED_STRIDE)))
        .collect()
}

/// Build a complete handler-invocation context: a generated request with
/// any caller-supplied overrides shallow-merged per section, plus a
/// headers container seeded from the overrides.
#[must_use]
pub fn mock_context(config: &HandlerConfig, overrides: Option<&ContextOverrides>) -> MockContext {
    let request = mock_request(config, &GeneratorOptions::default());
    let empty = ContextOverrides::default();
    let overrides = overrides.unwrap_or(&empty);

    MockContext {
        params: merge_section(request.params, overrides.params.as_ref()),
        query: merge_section(request.query, overrides.query.as_ref()),
        body: merge_body(request.body, overrides.body.as_ref()),
        headers: overrides.headers.clone(),
    }
}

/// Shallow-merge an override object over a generated section, override
/// keys winning. Non-object overrides are ignored: params and query are
/// key-value sections by construction.
fn merge_section(generated: Option<Value>, overrides: Option<&Value>) -> Map<String, Value> {
    let mut base = match generated {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    match overrides {
        Some(Value::Object(over)) => {
            for (k, v) in over {
                base.insert(k.clone(), v.clone());
            }
        }
        Some(_) | None => {}
    }
    base
}

fn merge_body(generated: Option<Value>, overrides: Option<&Value>) -> Option<Value> {
    match (generated, overrides) {
        (Some(Value::Object(mut base)), Some(Value::Object(over))) => {
            for (k, v) in over {
                base.insert(k.clone(), v.clone());
            }
            Some(Value::Object(base))
        }
        (_, Some(over)) => Some(over.clone()),
        (generated, None) => generated,
    }
}
