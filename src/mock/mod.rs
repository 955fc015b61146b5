//! # Mock Module
//!
//! Schema-driven mock data generation and handler simulation.
//!
//! ## Overview
//!
//! The mock subsystem manufactures test fixtures from the same handler
//! configurations the client and server consume, without touching network
//! code:
//!
//! - [`generate`] — the schema interpreter: walks a
//!   [`Schema`](crate::schema::Schema) and produces one conforming value,
//!   deterministic under a fixed seed.
//! - [`mock_request`] / [`mock_response`] / [`mock_scenario`] /
//!   [`mock_scenarios`] — compose a configuration's params/query/body and
//!   response schemas into complete payloads and reproducible batches.
//! - [`mock_context`] — a full handler-invocation context with
//!   per-section overrides.
//! - [`MockHandler`] / [`SpyHandler`] — response-strategy simulation
//!   (static data, custom function, generated, delayed, error-injecting),
//!   with the spy recording every invocation for later assertion.
//!
//! ## Determinism
//!
//! Every random draw comes from a PRNG derived purely from the seed and
//! the position in the schema tree: no module-level mutable random state
//! exists, so identical `(schema, seed)` inputs produce identical output
//! under concurrent or repeated use.
//!
//! ## Example
//!
//! ```rust
//! use routewire::mock::{generate, GeneratorOptions};
//! use routewire::schema::Schema;
//!
//! let schema = Schema::object(vec![
//!     ("id", Schema::string().uuid()),
//!     ("score", Schema::number().min(0.0).max(100.0)),
//! ]);
//! let options = GeneratorOptions::new().seed(123);
//! assert_eq!(generate(&schema, &options), generate(&schema, &options));
//! ```

mod context;
mod generate;
mod handler;
mod rng;
mod scenario;

pub use context::{GeneratorContext, GeneratorOptions};
pub use generate::generate;
pub use handler::{CallMatcher, MockError, MockHandler, RecordedCall, ResponseFn, SpyHandler};
pub use rng::DetRng;
pub use scenario::{
    mock_context, mock_request, mock_response, mock_scenario, mock_scenarios, ContextOverrides,
    MockContext, MockRequest, MockScenario,
};
