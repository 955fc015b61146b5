//! # Router Module
//!
//! A routing table over a set of handler configurations.
//!
//! ## Overview
//!
//! The router is the server-adapter-facing consumer of the route contract:
//! it holds shared [`HandlerConfig`](crate::HandlerConfig)s and answers
//! "which endpoint does this request belong to, and with which parameters"
//! by driving each route's match predicate and parse function.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routewire::{HandlerConfig, RouteDescriptor, Router, Schema};
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let users = HandlerConfig::new(RouteDescriptor::pattern(
//!     "/users/:id",
//!     Schema::object(vec![("id", Schema::string())]),
//! )?)
//! .into_shared();
//!
//! let router = Router::new(vec![users]);
//! let url = Url::parse("http://localhost/users/42")?;
//! let matched = router.route(&Method::GET, &url).unwrap();
//! assert_eq!(matched.params["id"], "42");
//! # Ok(())
//! # }
//! ```

mod core;

pub use core::{RouteMatch, Router};
