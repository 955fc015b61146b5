//! # Routewire
//!
//! **Routewire** is a contract-first HTTP routing and mock-data toolkit: a
//! shared [`HandlerConfig`] describes one endpoint's route, query, body,
//! and response shapes, and every consumer — client, server adapter, and
//! test suite — works from that single description.
//!
//! ## Overview
//!
//! Routewire provides two halves that share the configuration contract:
//!
//! - **Route building** — a [`RouteDescriptor`] describes how an
//!   endpoint's URL is built from parameters, parsed back into them, and
//!   recognized, at four levels of control from a fixed path up to fully
//!   custom functions. Pattern routes derive all three functions from a
//!   `:name` pattern string, compiled and checked at construction time.
//! - **Mock generation** — a recursive interpreter over the [`Schema`]
//!   type that manufactures conforming fake data: deterministic under a
//!   seed, bounded on recursive schemas, overridable per dotted path, and
//!   composed into complete request/response scenarios and spy-instrumented
//!   mock handlers.
//!
//! ## Architecture
//!
//! The library is organized into these modules:
//!
//! - **[`schema`]** - the shape description type and its validation bridge
//! - **[`route`]** - URL construction, parsing, and matching per endpoint
//! - **[`config`]** - the shared endpoint configuration
//! - **[`router`]** - a routing table over many configurations
//! - **[`mock`]** - mock data generation, scenarios, and mock/spy handlers
//! - **[`runtime_config`]** - environment-variable generation defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use routewire::mock::{mock_scenario, GeneratorOptions};
//! use routewire::{HandlerConfig, RouteDescriptor, Schema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HandlerConfig::new(RouteDescriptor::pattern(
//!     "/users/:id",
//!     Schema::object(vec![("id", Schema::string().uuid())]),
//! )?)
//! .response(Schema::object(vec![
//!     ("id", Schema::string().uuid()),
//!     ("email", Schema::string().email()),
//! ]))
//! .into_shared();
//!
//! // A reproducible request/response fixture for the endpoint.
//! let scenario = mock_scenario(&config, &GeneratorOptions::new().seed(42));
//! assert!(scenario.request.params.is_some());
//! assert!(scenario.response.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - **Round-trip**: for derived routes, building a URL from parameters
//!   and parsing it back yields the original parameters; percent-encoding
//!   and decoding are symmetric.
//! - **Determinism**: generation with a fixed seed is a pure function of
//!   the schema and seed; there is no module-level random state.
//! - **Termination**: recursive schemas generate within the configured
//!   depth limit, substituting a null sentinel past it.
//! - **Graceful degradation**: unrecognized schema shapes produce a
//!   warning and a sentinel, never a failure.

pub mod config;
pub mod mock;
pub mod route;
pub mod router;
pub mod runtime_config;
pub mod schema;

pub use config::{HandlerConfig, SchemaSection};
pub use mock::{GeneratorOptions, MockHandler, SpyHandler};
pub use route::{Params, RouteDescriptor, RouteError};
pub use router::{RouteMatch, Router};
pub use schema::{Schema, ValidationIssue};
