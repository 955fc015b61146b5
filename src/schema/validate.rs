use super::core::Schema;
use serde_json::{json, Map, Value};
use std::fmt;

/// How many levels of lazy resolution are inlined when lowering a schema
/// to a JSON Schema document. Beyond the budget the lowered schema is
/// permissive (`true`), so depth-limited sentinel values still validate.
pub(crate) const LAZY_LOWERING_DEPTH: usize = 16;

/// One violated path in a validated value.
///
/// Diagnostics are reported as a list of issues, one per violation, so a
/// failing value names every offending path rather than a single opaque
/// message.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// JSON-pointer-style location of the offending value (`$` for root).
    pub location: String,
    /// Issue category.
    pub kind: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Validate `value` against `schema`, returning one issue per violation.
///
/// An empty result means the value conforms. Validation is delegated to the
/// `jsonschema` crate over the lowered JSON Schema document.
#[must_use]
pub fn check_value(schema: &Schema, value: &Value) -> Vec<ValidationIssue> {
    let document = schema.to_json_schema();
    let validator = match jsonschema::validator_for(&document) {
        Ok(v) => v,
        Err(err) => {
            return vec![ValidationIssue::new("$", "compile", err.to_string())];
        }
    };
    validator
        .iter_errors(value)
        .map(|err| {
            let path = err.instance_path().to_string();
            let location = if path.is_empty() { "$".to_string() } else { path };
            ValidationIssue::new(location, "schema", err.to_string())
        })
        .collect()
}

/// Whether `value` conforms to `schema`.
#[must_use]
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    check_value(schema, value).is_empty()
}

impl Schema {
    /// Lower the schema to a JSON Schema document.
    ///
    /// Lazy schemas are expanded inline up to [`LAZY_LOWERING_DEPTH`]
    /// levels; past the budget the lowering is permissive so that values
    /// truncated by the generator's depth guard still validate.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        self.lower(LAZY_LOWERING_DEPTH)
    }

    fn lower(&self, budget: usize) -> Value {
        match self {
            Schema::String(s) => {
                let mut doc = Map::new();
                doc.insert("type".into(), json!("string"));
                if let Some(format) = s.format {
                    doc.insert("format".into(), json!(format.to_string()));
                }
                if let Some(n) = s.min_length {
                    doc.insert("minLength".into(), json!(n));
                }
                if let Some(n) = s.max_length {
                    doc.insert("maxLength".into(), json!(n));
                }
                Value::Object(doc)
            }
            Schema::Number(n) => {
                let mut doc = Map::new();
                doc.insert(
                    "type".into(),
                    json!(if n.integer { "integer" } else { "number" }),
                );
                if let Some(v) = n.min {
                    doc.insert("minimum".into(), json!(v));
                }
                if let Some(v) = n.max {
                    doc.insert("maximum".into(), json!(v));
                }
                Value::Object(doc)
            }
            Schema::Boolean => json!({ "type": "boolean" }),
            Schema::Date => json!({ "type": "string", "format": "date-time" }),
            Schema::Literal(v) => json!({ "const": v }),
            Schema::Enum(members) => json!({ "enum": members }),
            Schema::Optional(inner) | Schema::Nullable(inner) => {
                json!({ "anyOf": [inner.lower(budget), { "type": "null" }] })
            }
            Schema::Default { inner, default } => {
                let mut doc = inner.lower(budget);
                if let Value::Object(map) = &mut doc {
                    map.insert("default".into(), default.clone());
                }
                doc
            }
            Schema::Array(a) => {
                let mut doc = Map::new();
                doc.insert("type".into(), json!("array"));
                doc.insert("items".into(), a.item.lower(budget));
                if let Some(n) = a.min_items {
                    doc.insert("minItems".into(), json!(n));
                }
                if let Some(n) = a.max_items {
                    doc.insert("maxItems".into(), json!(n));
                }
                Value::Object(doc)
            }
            Schema::Object(o) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for (name, field) in &o.fields {
                    properties.insert(name.clone(), field.lower(budget));
                    if !field.is_optional() {
                        required.push(json!(name));
                    }
                }
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                })
            }
            Schema::Union(variants) => {
                let lowered: Vec<Value> = variants.iter().map(|v| v.lower(budget)).collect();
                json!({ "anyOf": lowered })
            }
            Schema::Discriminated(d) => {
                let lowered: Vec<Value> = d.variants.iter().map(|v| v.lower(budget)).collect();
                json!({ "anyOf": lowered })
            }
            Schema::Intersection(left, right) => {
                json!({ "allOf": [left.lower(budget), right.lower(budget)] })
            }
            Schema::Tuple(items) => {
                let lowered: Vec<Value> = items.iter().map(|v| v.lower(budget)).collect();
                json!({
                    "type": "array",
                    "prefixItems": lowered,
                    "items": false,
                    "minItems": items.len(),
                    "maxItems": items.len(),
                })
            }
            Schema::Record(value_schema) => {
                json!({
                    "type": "object",
                    "additionalProperties": value_schema.lower(budget),
                })
            }
            Schema::Lazy(lazy) => {
                if budget == 0 {
                    json!(true)
                } else {
                    lazy.resolve().lower(budget - 1)
                }
            }
            Schema::Opaque(_) => json!(true),
        }
    }
}
