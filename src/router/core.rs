use crate::config::HandlerConfig;
use crate::route::Params;
use http::Method;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Result of successfully matching a request URL to a handler
/// configuration.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched configuration (shared, not cloned).
    pub config: Arc<HandlerConfig>,
    /// Parameters extracted by the route's parse function.
    pub params: Params,
}

/// Routing table over a set of handler configurations.
///
/// Matching is a linear scan in registration order: the first
/// configuration whose method equals the request method and whose route
/// matches the URL wins. Registration order is therefore significant when
/// routes overlap.
#[derive(Clone)]
pub struct Router {
    routes: Vec<Arc<HandlerConfig>>,
}

impl Router {
    /// Build a routing table from shared handler configurations.
    #[must_use]
    pub fn new(routes: Vec<Arc<HandlerConfig>>) -> Self {
        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|c| format!("{} {}", c.method, c.route.describe()))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "routing table loaded"
        );
        Self { routes }
    }

    /// Match a request to a configuration and extract its parameters.
    ///
    /// Returns `None` when no route matches (a 404 in adapter terms).
    #[must_use]
    pub fn route(&self, method: &Method, url: &Url) -> Option<RouteMatch> {
        debug!(method = %method, path = %url.path(), "route match attempt");

        for config in &self.routes {
            if &config.method == method && config.route.is_match(url) {
                let params = config.route.parse(url);
                info!(
                    method = %method,
                    path = %url.path(),
                    route = %config.route.describe(),
                    params = ?params,
                    "route matched"
                );
                return Some(RouteMatch {
                    config: Arc::clone(config),
                    params,
                });
            }
        }

        warn!(method = %method, path = %url.path(), "no route matched");
        None
    }

    /// Print all registered routes to stdout. Useful when verifying that a
    /// table was assembled as expected.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for config in &self.routes {
            println!("[route] {} {}", config.method, config.route.describe());
        }
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
