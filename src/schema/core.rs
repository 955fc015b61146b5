use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Declared format of a string schema.
///
/// Formats take priority over length constraints during mock generation:
/// a schema declaring both a format and a length generates a conforming
/// formatted literal and ignores the length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// An email address (`user@host.tld`).
    Email,
    /// An absolute URL.
    Uri,
    /// An RFC 4122 version-4 UUID.
    Uuid,
    /// A CUID-style collision-resistant identifier (`c` + 24 alphanumerics).
    Cuid,
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StringFormat::Email => "email",
            StringFormat::Uri => "uri",
            StringFormat::Uuid => "uuid",
            StringFormat::Cuid => "cuid",
        };
        write!(f, "{}", s)
    }
}

/// Constraints of a string schema.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub format: Option<StringFormat>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// Constraints of a numeric schema.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
}

/// Element schema and length bounds of an array schema.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub item: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

/// Named fields of an object schema, in declaration order.
///
/// Declaration order is preserved so that generation walks fields
/// deterministically.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    pub fields: Vec<(String, Schema)>,
}

impl ObjectSchema {
    /// Look up a field's schema by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Schema> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, s)| s)
    }
}

/// A union whose members all carry a common discriminant key.
#[derive(Debug, Clone)]
pub struct DiscriminatedSchema {
    /// The discriminant field name (e.g. `"type"`).
    pub tag: String,
    pub variants: Vec<Schema>,
}

/// A deferred schema, resolved on demand through a zero-argument resolver.
///
/// This is the declaration mechanism for recursive shapes: the resolver
/// closure may reference the schema it is part of. Generation bounds the
/// recursion with its depth limit.
#[derive(Clone)]
pub struct LazySchema {
    resolver: Arc<dyn Fn() -> Schema + Send + Sync>,
}

impl LazySchema {
    pub fn new(resolver: impl Fn() -> Schema + Send + Sync + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Resolve the deferred schema. Each call invokes the resolver.
    #[must_use]
    pub fn resolve(&self) -> Schema {
        (self.resolver)()
    }
}

impl fmt::Debug for LazySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazySchema(..)")
    }
}

/// A declarative description of a value's shape and constraints.
///
/// The variants form the closed set of shapes the mock generator dispatches
/// on. Constructors come in two flavors: shape constructors
/// ([`Schema::string`], [`Schema::object`], ...) and refiners
/// ([`Schema::email`], [`Schema::min`], ...) that narrow an existing shape.
/// A refiner applied to a shape it does not fit logs a warning and leaves
/// the schema unchanged.
#[derive(Debug, Clone)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean,
    /// An RFC 3339 date-time string.
    Date,
    /// Exactly the given value.
    Literal(Value),
    /// One of the given members.
    Enum(Vec<Value>),
    /// The inner value, or absent. Inside an object the field is omitted;
    /// standalone, absence is represented as `null`.
    Optional(Box<Schema>),
    /// The inner value, or `null`.
    Nullable(Box<Schema>),
    /// The inner value, or the declared default.
    Default { inner: Box<Schema>, default: Value },
    Array(ArraySchema),
    Object(ObjectSchema),
    /// Any one of the member schemas.
    Union(Vec<Schema>),
    Discriminated(DiscriminatedSchema),
    /// Both operands at once; generated objects shallow-merge with the
    /// right side winning on key conflicts.
    Intersection(Box<Schema>, Box<Schema>),
    /// Fixed-length heterogeneous array.
    Tuple(Vec<Schema>),
    /// Object with arbitrary keys, every value matching the given schema.
    Record(Box<Schema>),
    Lazy(LazySchema),
    /// A shape this crate does not interpret. Generation degrades to a
    /// null sentinel with a warning; validation accepts anything.
    Opaque(String),
}

impl Schema {
    /// An unconstrained string.
    #[must_use]
    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    /// An unconstrained real number.
    #[must_use]
    pub fn number() -> Self {
        Schema::Number(NumberSchema::default())
    }

    /// An integer-only number.
    #[must_use]
    pub fn integer() -> Self {
        Schema::Number(NumberSchema {
            integer: true,
            ..NumberSchema::default()
        })
    }

    #[must_use]
    pub fn boolean() -> Self {
        Schema::Boolean
    }

    #[must_use]
    pub fn date() -> Self {
        Schema::Date
    }

    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Schema::Literal(value.into())
    }

    /// An enumeration over the given members.
    #[must_use]
    pub fn enumeration<V: Into<Value>>(members: impl IntoIterator<Item = V>) -> Self {
        Schema::Enum(members.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn optional(inner: Schema) -> Self {
        Schema::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn nullable(inner: Schema) -> Self {
        Schema::Nullable(Box::new(inner))
    }

    /// The inner schema with a declared default value. The default must
    /// itself be valid for the inner schema; this is the caller's
    /// responsibility and is not checked here.
    #[must_use]
    pub fn with_default(inner: Schema, default: impl Into<Value>) -> Self {
        Schema::Default {
            inner: Box::new(inner),
            default: default.into(),
        }
    }

    #[must_use]
    pub fn array(item: Schema) -> Self {
        Schema::Array(ArraySchema {
            item: Box::new(item),
            min_items: None,
            max_items: None,
        })
    }

    #[must_use]
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Schema::Object(ObjectSchema {
            fields: fields.into_iter().map(|(k, s)| (k.into(), s)).collect(),
        })
    }

    #[must_use]
    pub fn union(variants: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Union(variants.into_iter().collect())
    }

    #[must_use]
    pub fn discriminated(
        tag: impl Into<String>,
        variants: impl IntoIterator<Item = Schema>,
    ) -> Self {
        Schema::Discriminated(DiscriminatedSchema {
            tag: tag.into(),
            variants: variants.into_iter().collect(),
        })
    }

    #[must_use]
    pub fn intersection(left: Schema, right: Schema) -> Self {
        Schema::Intersection(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Tuple(items.into_iter().collect())
    }

    #[must_use]
    pub fn record(value: Schema) -> Self {
        Schema::Record(Box::new(value))
    }

    /// A deferred schema; the resolver may reference the schema being
    /// declared, producing a recursive shape.
    #[must_use]
    pub fn lazy(resolver: impl Fn() -> Schema + Send + Sync + 'static) -> Self {
        Schema::Lazy(LazySchema::new(resolver))
    }

    /// A shape this crate does not interpret, labeled for diagnostics.
    #[must_use]
    pub fn opaque(label: impl Into<String>) -> Self {
        Schema::Opaque(label.into())
    }

    // ---- refiners ----

    #[must_use]
    pub fn email(self) -> Self {
        self.refine_string("email", |s| s.format = Some(StringFormat::Email))
    }

    #[must_use]
    pub fn uri(self) -> Self {
        self.refine_string("uri", |s| s.format = Some(StringFormat::Uri))
    }

    #[must_use]
    pub fn uuid(self) -> Self {
        self.refine_string("uuid", |s| s.format = Some(StringFormat::Uuid))
    }

    #[must_use]
    pub fn cuid(self) -> Self {
        self.refine_string("cuid", |s| s.format = Some(StringFormat::Cuid))
    }

    #[must_use]
    pub fn min_len(self, n: usize) -> Self {
        self.refine_string("min_len", |s| s.min_length = Some(n))
    }

    #[must_use]
    pub fn max_len(self, n: usize) -> Self {
        self.refine_string("max_len", |s| s.max_length = Some(n))
    }

    /// Exact length: sets both bounds.
    #[must_use]
    pub fn len(self, n: usize) -> Self {
        self.refine_string("len", |s| {
            s.min_length = Some(n);
            s.max_length = Some(n);
        })
    }

    #[must_use]
    pub fn min(self, v: f64) -> Self {
        self.refine_number("min", |s| s.min = Some(v))
    }

    #[must_use]
    pub fn max(self, v: f64) -> Self {
        self.refine_number("max", |s| s.max = Some(v))
    }

    #[must_use]
    pub fn min_items(self, n: usize) -> Self {
        self.refine_array("min_items", |s| s.min_items = Some(n))
    }

    #[must_use]
    pub fn max_items(self, n: usize) -> Self {
        self.refine_array("max_items", |s| s.max_items = Some(n))
    }

    fn refine_string(mut self, refiner: &str, apply: impl FnOnce(&mut StringSchema)) -> Self {
        match &mut self {
            Schema::String(s) => apply(s),
            other => warn!(
                refiner = refiner,
                shape = other.type_name(),
                "string refiner applied to non-string schema, ignoring"
            ),
        }
        self
    }

    fn refine_number(mut self, refiner: &str, apply: impl FnOnce(&mut NumberSchema)) -> Self {
        match &mut self {
            Schema::Number(s) => apply(s),
            other => warn!(
                refiner = refiner,
                shape = other.type_name(),
                "numeric refiner applied to non-numeric schema, ignoring"
            ),
        }
        self
    }

    fn refine_array(mut self, refiner: &str, apply: impl FnOnce(&mut ArraySchema)) -> Self {
        match &mut self {
            Schema::Array(s) => apply(s),
            other => warn!(
                refiner = refiner,
                shape = other.type_name(),
                "array refiner applied to non-array schema, ignoring"
            ),
        }
        self
    }

    /// Short name of the shape, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number(n) if n.integer => "integer",
            Schema::Number(_) => "number",
            Schema::Boolean => "boolean",
            Schema::Date => "date",
            Schema::Literal(_) => "literal",
            Schema::Enum(_) => "enum",
            Schema::Optional(_) => "optional",
            Schema::Nullable(_) => "nullable",
            Schema::Default { .. } => "default",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
            Schema::Union(_) => "union",
            Schema::Discriminated(_) => "discriminated_union",
            Schema::Intersection(_, _) => "intersection",
            Schema::Tuple(_) => "tuple",
            Schema::Record(_) => "record",
            Schema::Lazy(_) => "lazy",
            Schema::Opaque(_) => "opaque",
        }
    }

    /// Whether the schema is an [`Schema::Optional`] wrapper. Object
    /// generation and lowering use this to decide field presence.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Schema::Optional(_))
    }
}
