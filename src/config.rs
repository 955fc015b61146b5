//! # Handler Configuration Module
//!
//! The shared, contract-first description of one endpoint.
//!
//! A [`HandlerConfig`] pairs a route descriptor with the optional query,
//! body, and response schemas of the endpoint. It is authored once and
//! shared by reference between client, server, and mock consumers — the
//! single source of truth for the endpoint's shape. Configs are immutable
//! after construction; share them with [`HandlerConfig::into_shared`].

use crate::route::RouteDescriptor;
use crate::schema::Schema;
use http::Method;
use std::sync::Arc;

/// One optional schema slot of a handler configuration.
#[derive(Debug, Clone)]
pub struct SchemaSection {
    pub schema: Schema,
}

/// The immutable description of one endpoint: HTTP method, route, and the
/// optional query/body/response schemas.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use routewire::{HandlerConfig, RouteDescriptor, Schema};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HandlerConfig::new(RouteDescriptor::pattern(
///     "/users/:id",
///     Schema::object(vec![("id", Schema::string())]),
/// )?)
/// .method(Method::PUT)
/// .body(Schema::object(vec![("name", Schema::string())]))
/// .response(Schema::object(vec![("id", Schema::string())]));
/// let shared = config.into_shared();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub method: Method,
    pub route: RouteDescriptor,
    pub query: Option<SchemaSection>,
    pub body: Option<SchemaSection>,
    pub response: Option<SchemaSection>,
}

impl HandlerConfig {
    /// A configuration for the given route. Method defaults to `GET`; the
    /// schema sections start absent.
    #[must_use]
    pub fn new(route: RouteDescriptor) -> Self {
        HandlerConfig {
            method: Method::GET,
            route,
            query: None,
            body: None,
            response: None,
        }
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn query(mut self, schema: Schema) -> Self {
        self.query = Some(SchemaSection { schema });
        self
    }

    #[must_use]
    pub fn body(mut self, schema: Schema) -> Self {
        self.body = Some(SchemaSection { schema });
        self
    }

    #[must_use]
    pub fn response(mut self, schema: Schema) -> Self {
        self.response = Some(SchemaSection { schema });
        self
    }

    /// Freeze the configuration for sharing between client, server, and
    /// mock consumers.
    #[must_use]
    pub fn into_shared(self) -> Arc<HandlerConfig> {
        Arc::new(self)
    }
}
