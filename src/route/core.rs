use crate::schema::Schema;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Parameter values for URL construction and extraction.
///
/// Derived builders stringify each value (strings pass through unquoted);
/// derived parsers produce string values. Parameters are trusted to come
/// from the pattern-matching process itself and are never validated against
/// the params schema.
pub type Params = Map<String, Value>;

/// Builds a URL path from parameters.
pub type BuildFn = Arc<dyn Fn(&Params) -> String + Send + Sync>;
/// Extracts parameters from a URL. Mechanical extraction, no validation.
pub type ParseFn = Arc<dyn Fn(&Url) -> Params + Send + Sync>;
/// Tests whether a URL belongs to the route.
pub type IsMatchFn = Arc<dyn Fn(&Url) -> bool + Send + Sync>;

/// Construction-time route errors.
///
/// Malformed patterns fail immediately and loudly: a route mismatch caused
/// by a silently-broken matcher would otherwise surface only at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The pattern or path does not start with `/`.
    MissingLeadingSlash { pattern: String },
    /// A segment contains placeholder syntax this crate does not accept:
    /// an empty `:` name, a `:` in the middle of a segment, a name with
    /// characters outside `[A-Za-z0-9_]`, or an empty segment.
    MalformedSegment { pattern: String, segment: String },
    /// The same parameter name appears in two segments.
    DuplicateParam { pattern: String, name: String },
    /// A static path contains a parameter placeholder.
    PlaceholderInStaticPath { path: String },
    /// A round-trip self-check failed (build → parse did not reproduce the
    /// sample parameters, or the built URL did not match).
    RoundTrip { detail: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::MissingLeadingSlash { pattern } => {
                write!(f, "route pattern '{}' must start with '/'", pattern)
            }
            RouteError::MalformedSegment { pattern, segment } => {
                write!(
                    f,
                    "route pattern '{}' has a malformed segment '{}': \
                    parameter segments are ':name' with name in [A-Za-z0-9_]+",
                    pattern, segment
                )
            }
            RouteError::DuplicateParam { pattern, name } => {
                write!(
                    f,
                    "route pattern '{}' declares parameter '{}' more than once",
                    pattern, name
                )
            }
            RouteError::PlaceholderInStaticPath { path } => {
                write!(
                    f,
                    "static path '{}' contains a ':name' placeholder; use a pattern route",
                    path
                )
            }
            RouteError::RoundTrip { detail } => {
                write!(f, "route round-trip self-check failed: {}", detail)
            }
        }
    }
}

impl std::error::Error for RouteError {}

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("param name regex is valid"));

#[derive(Debug, Clone)]
enum PatternSegment {
    Literal(String),
    Param(String),
}

/// A `:name` pattern compiled into an anchored matcher.
///
/// Compilation splits the pattern on `/`: a segment beginning with `:` is a
/// parameter named by the remainder, everything else is literal. The
/// segments compile to a regex of the form `^/users/([^/]+)$` with one
/// capture group per parameter, in declaration order.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    segments: Vec<PatternSegment>,
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Compile a pattern, rejecting malformed input at construction time.
    pub fn compile(pattern: &str) -> Result<Self, RouteError> {
        if !pattern.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash {
                pattern: pattern.to_string(),
            });
        }

        if pattern == "/" {
            let regex = Regex::new(r"^/$").expect("root regex is valid");
            return Ok(Self {
                pattern: pattern.to_string(),
                segments: Vec::new(),
                regex,
                param_names: Vec::new(),
            });
        }

        let mut segments = Vec::new();
        let mut param_names: Vec<String> = Vec::new();
        let mut regex_src = String::with_capacity(pattern.len() + 8);
        regex_src.push('^');

        for raw in pattern.split('/').skip(1) {
            if let Some(name) = raw.strip_prefix(':') {
                if !PARAM_NAME.is_match(name) {
                    return Err(RouteError::MalformedSegment {
                        pattern: pattern.to_string(),
                        segment: raw.to_string(),
                    });
                }
                if param_names.iter().any(|n| n == name) {
                    return Err(RouteError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                regex_src.push_str("/([^/]+)");
                param_names.push(name.to_string());
                segments.push(PatternSegment::Param(name.to_string()));
            } else {
                if raw.is_empty() || raw.contains(':') {
                    return Err(RouteError::MalformedSegment {
                        pattern: pattern.to_string(),
                        segment: raw.to_string(),
                    });
                }
                regex_src.push('/');
                regex_src.push_str(&regex::escape(raw));
                segments.push(PatternSegment::Literal(raw.to_string()));
            }
        }

        regex_src.push('$');
        let regex = Regex::new(&regex_src).expect("segment-built regex is valid");

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            regex,
            param_names,
        })
    }

    /// The source pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Ordered parameter names declared by the pattern.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Whether a URL path matches: equal segment counts, literal segments
    /// equal, parameter positions non-empty.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Extract decoded parameter values from a URL path.
    ///
    /// Mechanical extraction: non-matching paths yield an empty mapping,
    /// and values are never checked against any schema.
    #[must_use]
    pub fn parse(&self, path: &str) -> Params {
        let mut params = Params::new();
        if let Some(captures) = self.regex.captures(path) {
            for (i, name) in self.param_names.iter().enumerate() {
                if let Some(m) = captures.get(i + 1) {
                    let decoded = urlencoding::decode(m.as_str())
                        .map(|cow| cow.into_owned())
                        .unwrap_or_else(|_| m.as_str().to_string());
                    params.insert(name.clone(), Value::String(decoded));
                }
            }
        }
        params
    }

    /// Substitute parameters into the pattern, percent-encoding values.
    #[must_use]
    pub fn build(&self, params: &Params) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut path = String::with_capacity(self.pattern.len());
        for segment in &self.segments {
            path.push('/');
            match segment {
                PatternSegment::Literal(lit) => path.push_str(lit),
                PatternSegment::Param(name) => match params.get(name) {
                    Some(value) => {
                        path.push_str(&urlencoding::encode(&param_to_string(value)))
                    }
                    None => {
                        warn!(
                            pattern = %self.pattern,
                            param = %name,
                            "missing parameter while building URL, substituting empty segment"
                        );
                    }
                },
            }
        }
        path
    }
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// How to build, parse, and match a URL for one endpoint.
///
/// See the [module docs](crate::route) for the four levels of control. All
/// variants expose the same three derived functions through
/// [`build_fn`](RouteDescriptor::build_fn),
/// [`parse_fn`](RouteDescriptor::parse_fn), and
/// [`is_match_fn`](RouteDescriptor::is_match_fn), so server and client code
/// treat them uniformly.
#[derive(Clone)]
pub enum RouteDescriptor {
    /// Fixed path, no parameters.
    Static { path: String },
    /// Pattern-derived build, parse, and match.
    Pattern {
        pattern: Arc<CompiledPattern>,
        params_schema: Schema,
    },
    /// Custom build; parse and match still derived from the pattern.
    WithBuilder {
        pattern: Arc<CompiledPattern>,
        params_schema: Schema,
        build: BuildFn,
    },
    /// Caller supplies all three functions and is responsible for their
    /// mutual consistency. No derivation, no validation; see
    /// [`self_check`](RouteDescriptor::self_check) for an opt-in probe.
    Full {
        params_schema: Schema,
        build: BuildFn,
        parse: ParseFn,
        is_match: IsMatchFn,
    },
}

impl RouteDescriptor {
    /// A fixed path with no parameters. Rejects paths containing `:name`
    /// placeholders.
    pub fn static_path(path: impl Into<String>) -> Result<Self, RouteError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash { pattern: path });
        }
        if path.split('/').any(|seg| seg.starts_with(':')) {
            return Err(RouteError::PlaceholderInStaticPath { path });
        }
        Ok(RouteDescriptor::Static { path })
    }

    /// A `:name` pattern with all three functions derived from it.
    pub fn pattern(pattern: &str, params_schema: Schema) -> Result<Self, RouteError> {
        Ok(RouteDescriptor::Pattern {
            pattern: Arc::new(CompiledPattern::compile(pattern)?),
            params_schema,
        })
    }

    /// A `:name` pattern with a custom build function; parse and match are
    /// still derived from the pattern.
    pub fn with_builder(
        pattern: &str,
        params_schema: Schema,
        build: impl Fn(&Params) -> String + Send + Sync + 'static,
    ) -> Result<Self, RouteError> {
        Ok(RouteDescriptor::WithBuilder {
            pattern: Arc::new(CompiledPattern::compile(pattern)?),
            params_schema,
            build: Arc::new(build),
        })
    }

    /// Fully custom construction, parsing, and matching. The caller is
    /// responsible for the round-trip property; nothing is derived or
    /// checked here.
    pub fn full(
        params_schema: Schema,
        build: impl Fn(&Params) -> String + Send + Sync + 'static,
        parse: impl Fn(&Url) -> Params + Send + Sync + 'static,
        is_match: impl Fn(&Url) -> bool + Send + Sync + 'static,
    ) -> Self {
        RouteDescriptor::Full {
            params_schema,
            build: Arc::new(build),
            parse: Arc::new(parse),
            is_match: Arc::new(is_match),
        }
    }

    /// The params schema carried by the variant, if any. `Static` routes
    /// have none.
    #[must_use]
    pub fn params_schema(&self) -> Option<&Schema> {
        match self {
            RouteDescriptor::Static { .. } => None,
            RouteDescriptor::Pattern { params_schema, .. }
            | RouteDescriptor::WithBuilder { params_schema, .. }
            | RouteDescriptor::Full { params_schema, .. } => Some(params_schema),
        }
    }

    /// Normalize the variant into a plain build function.
    #[must_use]
    pub fn build_fn(&self) -> BuildFn {
        match self {
            RouteDescriptor::Static { path } => {
                let path = path.clone();
                Arc::new(move |_| path.clone())
            }
            RouteDescriptor::Pattern { pattern, .. } => {
                let pattern = Arc::clone(pattern);
                Arc::new(move |params| pattern.build(params))
            }
            RouteDescriptor::WithBuilder { build, .. } | RouteDescriptor::Full { build, .. } => {
                Arc::clone(build)
            }
        }
    }

    /// Normalize the variant into a plain parse function.
    #[must_use]
    pub fn parse_fn(&self) -> ParseFn {
        match self {
            RouteDescriptor::Static { .. } => Arc::new(|_| Params::new()),
            RouteDescriptor::Pattern { pattern, .. }
            | RouteDescriptor::WithBuilder { pattern, .. } => {
                let pattern = Arc::clone(pattern);
                Arc::new(move |url| pattern.parse(url.path()))
            }
            RouteDescriptor::Full { parse, .. } => Arc::clone(parse),
        }
    }

    /// Normalize the variant into a plain match predicate.
    #[must_use]
    pub fn is_match_fn(&self) -> IsMatchFn {
        match self {
            RouteDescriptor::Static { path } => {
                let path = path.clone();
                Arc::new(move |url| url.path() == path)
            }
            RouteDescriptor::Pattern { pattern, .. }
            | RouteDescriptor::WithBuilder { pattern, .. } => {
                let pattern = Arc::clone(pattern);
                Arc::new(move |url| pattern.is_match(url.path()))
            }
            RouteDescriptor::Full { is_match, .. } => Arc::clone(is_match),
        }
    }

    /// Build a URL path from parameters.
    #[must_use]
    pub fn build(&self, params: &Params) -> String {
        (self.build_fn())(params)
    }

    /// Extract parameters from a URL.
    #[must_use]
    pub fn parse(&self, url: &Url) -> Params {
        (self.parse_fn())(url)
    }

    /// Whether a URL belongs to this route.
    #[must_use]
    pub fn is_match(&self, url: &Url) -> bool {
        (self.is_match_fn())(url)
    }

    /// Debug probe for the round-trip property: build a URL from the
    /// sample parameters, parse it back, and compare.
    ///
    /// Intended for `Full` routes, whose three functions are otherwise
    /// unchecked. Not invoked on any production path.
    pub fn self_check(&self, sample: &Params) -> Result<(), RouteError> {
        let built = self.build(sample);
        let url = Url::parse(&format!("http://routewire.invalid{}", built)).map_err(|e| {
            RouteError::RoundTrip {
                detail: format!("built path '{}' is not a valid URL path: {}", built, e),
            }
        })?;
        if !self.is_match(&url) {
            return Err(RouteError::RoundTrip {
                detail: format!("built path '{}' does not match its own route", built),
            });
        }
        let parsed = self.parse(&url);
        if &parsed != sample {
            return Err(RouteError::RoundTrip {
                detail: format!(
                    "parsed params {:?} differ from sample {:?} for built path '{}'",
                    parsed, sample, built
                ),
            });
        }
        Ok(())
    }

    /// Short human-readable description, used by routing-table dumps.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            RouteDescriptor::Static { path } => path.clone(),
            RouteDescriptor::Pattern { pattern, .. } => pattern.pattern().to_string(),
            RouteDescriptor::WithBuilder { pattern, .. } => {
                format!("{} (custom build)", pattern.pattern())
            }
            RouteDescriptor::Full { .. } => "(custom)".to_string(),
        }
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDescriptor::Static { path } => {
                f.debug_struct("Static").field("path", path).finish()
            }
            RouteDescriptor::Pattern { pattern, .. } => f
                .debug_struct("Pattern")
                .field("pattern", &pattern.pattern())
                .finish_non_exhaustive(),
            RouteDescriptor::WithBuilder { pattern, .. } => f
                .debug_struct("WithBuilder")
                .field("pattern", &pattern.pattern())
                .finish_non_exhaustive(),
            RouteDescriptor::Full { .. } => f.debug_struct("Full").finish_non_exhaustive(),
        }
    }
}
