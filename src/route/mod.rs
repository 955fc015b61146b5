//! # Route Module
//!
//! URL construction, parsing, and matching for one endpoint.
//!
//! ## Overview
//!
//! A [`RouteDescriptor`] describes how an endpoint's URL is built from
//! parameters, how parameters are extracted from a URL, and how a URL is
//! recognized as belonging to the endpoint. Four variants compose
//! increasing control:
//!
//! 1. **Static** — a fixed path, no parameters.
//! 2. **Pattern** — a `:name` placeholder pattern; build, parse, and match
//!    are all derived mechanically.
//! 3. **WithBuilder** — a custom build function; parse and match are still
//!    derived from the pattern.
//! 4. **Full** — caller-supplied build, parse, and match; nothing derived.
//!
//! ## Pattern derivation
//!
//! Patterns are compiled at construction time into an anchored regex with
//! one capture group per `:name` segment, in the same two-phase
//! compile-then-match shape the routing table uses: malformed patterns are
//! rejected immediately ([`RouteError`]) rather than producing a silently
//! broken matcher.
//!
//! Derived `build` percent-encodes substituted values and derived `parse`
//! decodes them, so building a URL from parameters and parsing it back
//! yields the original parameters.
//!
//! ## Example
//!
//! ```rust
//! use routewire::route::RouteDescriptor;
//! use routewire::schema::Schema;
//! use serde_json::{json, Map};
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let route = RouteDescriptor::pattern(
//!     "/users/:id",
//!     Schema::object(vec![("id", Schema::string())]),
//! )?;
//!
//! let mut params = Map::new();
//! params.insert("id".to_string(), json!("42"));
//! assert_eq!(route.build(&params), "/users/42");
//!
//! let url = Url::parse("http://localhost/users/42")?;
//! assert!(route.is_match(&url));
//! assert_eq!(route.parse(&url), params);
//! # Ok(())
//! # }
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{
    BuildFn, CompiledPattern, IsMatchFn, Params, ParseFn, RouteDescriptor, RouteError,
};
