use super::context::{GeneratorContext, GeneratorOptions};
use super::rng::DetRng;
use crate::schema::{Schema, StringFormat, StringSchema};
use chrono::DateTime;
use serde_json::{Map, Value};
use tracing::{debug, warn};

// Distinct PRNG streams at one tree position. Wrapper decisions draw from
// their own stream so a presence coin never correlates with the inner
// value's first draw.
const SALT_VALUE: u64 = 0;
const SALT_PRESENCE: u64 = 1;
const SALT_NULLABLE: u64 = 2;
const SALT_DEFAULT: u64 = 3;
const SALT_UNION: u64 = 4;
const SALT_RECORD: u64 = 5;

/// Length of generated strings with no declared constraints.
const DEFAULT_STRING_LENGTH: usize = 10;
/// Numeric range used when a bound is not declared.
const DEFAULT_NUMBER_MIN: f64 = -1_000_000.0;
const DEFAULT_NUMBER_MAX: f64 = 1_000_000.0;
/// Probability that an optional/nullable/default wrapper yields the inner
/// value rather than absence, null, or the default.
const INNER_VALUE_PROBABILITY: f64 = 0.7;
/// Generation anchor: 2026-01-01T00:00:00Z. Dates land within the 365
/// days before it. A fixed anchor keeps generation free of wall-clock
/// reads, which the determinism contract requires.
const DATE_ANCHOR_SECS: i64 = 1_767_225_600;
const SECONDS_PER_YEAR: i64 = 365 * 86_400;

/// Generate one value of the schema's described shape.
///
/// The hard contracts:
///
/// - **Determinism** — two calls with identical `(schema, seed)` produce
///   deeply-equal output.
/// - **Conformance** — the output validates against the schema (checked
///   with [`check_value`](crate::schema::check_value)) for every supported
///   shape, except where the depth guard substitutes a sentinel in a
///   recursive schema.
/// - **Termination** — recursion is bounded by `options.max_depth`, so
///   self-referential (lazy) schemas always finish.
/// - **Graceful degradation** — unsupported shapes produce a null sentinel
///   and a warning, never a panic or error.
#[must_use]
pub fn generate(schema: &Schema, options: &GeneratorOptions) -> Value {
    let ctx = GeneratorContext::root(options, None);
    generate_at(schema, &ctx)
}

/// Generate with every path prefixed by `root`, scoping overrides per
/// section (`"body.name"`, `"params.id"`, ...). Request/response
/// composition uses this; the prefix also decorrelates sections generated
/// from the same options.
#[must_use]
pub(crate) fn generate_rooted(schema: &Schema, options: &GeneratorOptions, root: &str) -> Value {
    let ctx = GeneratorContext::root(options, Some(root));
    generate_at(schema, &ctx)
}

pub(crate) fn generate_at(schema: &Schema, ctx: &GeneratorContext) -> Value {
    if ctx.exhausted() {
        debug!(
            path = %ctx.joined_path(),
            depth = ctx.depth(),
            "depth limit reached, emitting null sentinel"
        );
        return Value::Null;
    }
    if let Some(value) = ctx.override_value() {
        return value.clone();
    }

    match schema {
        Schema::String(s) => Value::String(generate_string(s, &mut ctx.rng(SALT_VALUE))),
        Schema::Number(n) => {
            let mut rng = ctx.rng(SALT_VALUE);
            let min = n.min.unwrap_or(DEFAULT_NUMBER_MIN);
            let max = n.max.unwrap_or(DEFAULT_NUMBER_MAX);
            if n.integer {
                let lo = min.ceil() as i64;
                let hi = max.floor() as i64;
                Value::from(rng.in_range_i64(lo, hi))
            } else {
                Value::from(rng.in_range_f64(min, max))
            }
        }
        Schema::Boolean => Value::Bool(ctx.rng(SALT_VALUE).next_bool()),
        Schema::Date => {
            let offset = ctx.rng(SALT_VALUE).in_range_i64(0, SECONDS_PER_YEAR);
            let secs = DATE_ANCHOR_SECS - offset;
            match DateTime::from_timestamp(secs, 0) {
                Some(dt) => Value::String(dt.to_rfc3339()),
                None => Value::String("1970-01-01T00:00:00+00:00".to_string()),
            }
        }
        Schema::Literal(value) => value.clone(),
        Schema::Enum(members) => {
            if members.is_empty() {
                warn!(path = %ctx.joined_path(), "enum schema has no members, emitting null sentinel");
                return Value::Null;
            }
            members[ctx.rng(SALT_VALUE).next_usize(members.len())].clone()
        }
        Schema::Optional(inner) => {
            // Standalone optionals represent absence as null; inside an
            // object the field is omitted instead (see the Object arm).
            if ctx.rng(SALT_PRESENCE).chance(INNER_VALUE_PROBABILITY) {
                generate_at(inner, ctx)
            } else {
                Value::Null
            }
        }
        Schema::Nullable(inner) => {
            if ctx.rng(SALT_NULLABLE).chance(INNER_VALUE_PROBABILITY) {
                generate_at(inner, ctx)
            } else {
                Value::Null
            }
        }
        Schema::Default { inner, default } => {
            if ctx.rng(SALT_DEFAULT).chance(INNER_VALUE_PROBABILITY) {
                generate_at(inner, ctx)
            } else {
                default.clone()
            }
        }
        Schema::Array(a) => {
            let len = array_len(a.min_items, a.max_items, ctx.array_length());
            let items: Vec<Value> = (0..len)
                .map(|i| generate_at(&a.item, &ctx.child(i.to_string())))
                .collect();
            Value::Array(items)
        }
        Schema::Object(o) => {
            let mut out = Map::new();
            for (name, field) in &o.fields {
                let child = ctx.child(name.clone());
                let forced = child.override_value().is_some();
                match field {
                    // Optional fields are omitted (not nulled) when the
                    // presence coin or the depth guard says absent. An
                    // override forces presence.
                    Schema::Optional(inner) if !forced => {
                        if child.exhausted() {
                            continue;
                        }
                        if child.rng(SALT_PRESENCE).chance(INNER_VALUE_PROBABILITY) {
                            out.insert(name.clone(), generate_at(inner, &child));
                        }
                    }
                    Schema::Optional(inner) => {
                        out.insert(name.clone(), generate_at(inner, &child));
                    }
                    other => {
                        out.insert(name.clone(), generate_at(other, &child));
                    }
                }
            }
            Value::Object(out)
        }
        Schema::Union(variants) => {
            if variants.is_empty() {
                warn!(path = %ctx.joined_path(), "union schema has no variants, emitting null sentinel");
                return Value::Null;
            }
            let idx = ctx.rng(SALT_UNION).next_usize(variants.len());
            generate_at(&variants[idx], ctx)
        }
        Schema::Discriminated(d) => {
            if d.variants.is_empty() {
                warn!(path = %ctx.joined_path(), "discriminated union has no variants, emitting null sentinel");
                return Value::Null;
            }
            let idx = ctx.rng(SALT_UNION).next_usize(d.variants.len());
            generate_at(&d.variants[idx], ctx)
        }
        Schema::Intersection(left, right) => {
            let left_value = generate_at(left, ctx);
            let right_value = generate_at(right, ctx);
            match (left_value, right_value) {
                (Value::Object(mut merged), Value::Object(right_map)) => {
                    // Shallow merge, right side wins on key conflicts.
                    for (k, v) in right_map {
                        merged.insert(k, v);
                    }
                    Value::Object(merged)
                }
                (_, right_value) => {
                    warn!(
                        path = %ctx.joined_path(),
                        "intersection of non-object schemas, keeping right side"
                    );
                    right_value
                }
            }
        }
        Schema::Tuple(items) => {
            let values: Vec<Value> = items
                .iter()
                .enumerate()
                .map(|(i, item)| generate_at(item, &ctx.child(i.to_string())))
                .collect();
            Value::Array(values)
        }
        Schema::Record(value_schema) => {
            let mut rng = ctx.rng(SALT_RECORD);
            let count = 1 + rng.next_usize(5);
            let mut out = Map::new();
            for _ in 0..count {
                let key = rng.lowercase(6);
                let value = generate_at(value_schema, &ctx.child(key.clone()));
                out.insert(key, value);
            }
            Value::Object(out)
        }
        Schema::Lazy(lazy) => {
            let resolved = lazy.resolve();
            generate_at(&resolved, &ctx.descend())
        }
        Schema::Opaque(label) => {
            warn!(
                path = %ctx.joined_path(),
                shape = %label,
                "unsupported schema shape, emitting null sentinel"
            );
            Value::Null
        }
    }
}

fn generate_string(schema: &StringSchema, rng: &mut DetRng) -> String {
    // Declared formats take priority over length constraints.
    match schema.format {
        Some(StringFormat::Email) => {
            let user_len = rng.in_range_usize(5, 9);
            let host_len = rng.in_range_usize(5, 8);
            let tlds = ["com", "net", "org", "io"];
            format!(
                "{}@{}.{}",
                rng.lowercase(user_len),
                rng.lowercase(host_len),
                tlds[rng.next_usize(tlds.len())]
            )
        }
        Some(StringFormat::Uri) => {
            let host_len = rng.in_range_usize(5, 10);
            let path_len = rng.in_range_usize(4, 8);
            let tlds = ["com", "net", "org", "io"];
            format!(
                "https://{}.{}/{}",
                rng.lowercase(host_len),
                tlds[rng.next_usize(tlds.len())],
                rng.lowercase(path_len)
            )
        }
        Some(StringFormat::Uuid) => {
            let hex = rng.hex(32);
            let variants = ['8', '9', 'a', 'b'];
            format!(
                "{}-{}-4{}-{}{}-{}",
                &hex[0..8],
                &hex[8..12],
                &hex[13..16],
                variants[rng.next_usize(variants.len())],
                &hex[17..20],
                &hex[20..32]
            )
        }
        Some(StringFormat::Cuid) => {
            format!("c{}", rng.lowercase(24))
        }
        None => {
            let len = match (schema.min_length, schema.max_length) {
                (None, None) => DEFAULT_STRING_LENGTH,
                (Some(lo), Some(hi)) => rng.in_range_usize(lo, hi),
                (Some(lo), None) => rng.in_range_usize(lo, lo + DEFAULT_STRING_LENGTH),
                (None, Some(hi)) => rng.in_range_usize(hi.min(DEFAULT_STRING_LENGTH), hi),
            };
            rng.alphanumeric(len)
        }
    }
}

fn array_len(min: Option<usize>, max: Option<usize>, fallback: usize) -> usize {
    // Deterministic: the configured length clamped into the declared
    // bounds, not a random draw.
    match (min, max) {
        (None, None) => fallback,
        (Some(lo), None) => fallback.max(lo),
        (None, Some(hi)) => fallback.min(hi),
        (Some(lo), Some(hi)) => fallback.clamp(lo, hi.max(lo)),
    }
}
