//! # Schema Module
//!
//! Declarative descriptions of value shapes, used to drive mock data
//! generation and to validate generated values.
//!
//! ## Overview
//!
//! A [`Schema`] is a closed tagged union over every shape the mock generator
//! understands: strings with format and length constraints, bounded numbers,
//! booleans, dates, literals, enums, optional/nullable/default wrappers,
//! arrays, objects, unions, discriminated unions, intersections, tuples,
//! records, lazily-deferred (recursive) schemas, and an opaque variant for
//! shapes this crate does not interpret.
//!
//! Dispatch over schema shapes is ordinary `match` on the enum, so the
//! compiler checks the dispatch table is exhaustive. Validation is not
//! implemented here: a schema lowers to a JSON Schema document and the
//! `jsonschema` crate does the checking, reporting one [`ValidationIssue`]
//! per violated path.
//!
//! ## Example
//!
//! ```rust
//! use routewire::schema::{check_value, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::object(vec![
//!     ("id", Schema::string().uuid()),
//!     ("age", Schema::number().min(0.0).max(120.0)),
//! ]);
//! let issues = check_value(&schema, &json!({ "id": "not-a-number", "age": 200.0 }));
//! assert!(!issues.is_empty());
//! ```

mod core;
mod validate;

pub use core::{
    ArraySchema, DiscriminatedSchema, LazySchema, NumberSchema, ObjectSchema, Schema,
    StringFormat, StringSchema,
};
pub use validate::{check_value, is_valid, ValidationIssue};
