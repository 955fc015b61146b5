use super::rng::DetRng;
use crate::runtime_config::RuntimeConfig;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

static RUNTIME_DEFAULTS: Lazy<RuntimeConfig> = Lazy::new(RuntimeConfig::from_env);

/// Source of seeds for unseeded generation calls: a counter initialized
/// from the clock once, stepped per call so consecutive unseeded calls
/// produce different data. Seeded calls never touch this.
static AUTO_SEED: Lazy<AtomicU64> = Lazy::new(|| {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED);
    AtomicU64::new(nanos)
});

/// Options for one mock-data generation call.
///
/// `seed` makes generation fully deterministic: two calls with the same
/// schema and seed produce deeply-equal output. Overrides map a
/// `.`-joined path (e.g. `"user.address.city"`) to a value returned
/// verbatim at that position; the match is exact, not a glob.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub seed: Option<u64>,
    /// Recursion depth limit; positions deeper than this generate a null
    /// sentinel. Defaults to `ROUTEWIRE_MAX_DEPTH` (or 10).
    pub max_depth: usize,
    /// Element count for arrays without declared length bounds. Defaults
    /// to `ROUTEWIRE_ARRAY_LENGTH` (or 3).
    pub array_length: usize,
    pub overrides: HashMap<String, Value>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            seed: None,
            max_depth: RUNTIME_DEFAULTS.max_depth,
            array_length: RUNTIME_DEFAULTS.array_length,
            overrides: HashMap::new(),
        }
    }
}

impl GeneratorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn array_length(mut self, array_length: usize) -> Self {
        self.array_length = array_length;
        self
    }

    /// Pin the value generated at a `.`-joined path.
    #[must_use]
    pub fn override_path(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(path.into(), value.into());
        self
    }

    /// The effective seed: the declared one, or a fresh automatic seed.
    /// Each unseeded resolution yields a distinct seed.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => AUTO_SEED.fetch_add(0x9E37_79B9_7F4A_7C15, Ordering::Relaxed),
        }
    }

    /// A copy with the seed pinned to `resolve_seed() + offset`. Used by
    /// scenario composition to give sub-calls related but distinct seeds.
    #[must_use]
    pub fn derived(&self, offset: u64) -> Self {
        let mut derived = self.clone();
        derived.seed = Some(self.resolve_seed().wrapping_add(offset));
        derived
    }
}

/// The threaded state of one generation call.
///
/// Constructed once per top-level `generate`, then rebuilt immutably for
/// every descent: `depth` increments on each object field, array element,
/// or tuple slot, and `path` grows in lockstep. The context never mutates
/// in place, so identical `(schema, seed)` inputs always walk identical
/// state — this is what makes the determinism contract hold under
/// concurrent or repeated use.
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    seed: u64,
    depth: usize,
    max_depth: usize,
    array_length: usize,
    path: Vec<String>,
    overrides: Arc<HashMap<String, Value>>,
}

impl GeneratorContext {
    /// Root context for one generation call. `root_segment`, when given,
    /// prefixes every path (used by request composition to scope
    /// overrides per section, e.g. `"body.name"`).
    #[must_use]
    pub fn root(options: &GeneratorOptions, root_segment: Option<&str>) -> Self {
        let path = match root_segment {
            Some(seg) => vec![seg.to_string()],
            None => Vec::new(),
        };
        GeneratorContext {
            seed: options.resolve_seed(),
            depth: 0,
            max_depth: options.max_depth,
            array_length: options.array_length,
            path,
            overrides: Arc::new(options.overrides.clone()),
        }
    }

    /// Descend into a named or indexed position: `depth + 1`, path
    /// extended by `segment`.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        GeneratorContext {
            seed: self.seed,
            depth: self.depth + 1,
            max_depth: self.max_depth,
            array_length: self.array_length,
            path,
            overrides: Arc::clone(&self.overrides),
        }
    }

    /// Descend without a path segment. Used when resolving a lazy schema
    /// so that self-referential resolvers still consume depth budget.
    #[must_use]
    pub fn descend(&self) -> Self {
        GeneratorContext {
            seed: self.seed,
            depth: self.depth + 1,
            max_depth: self.max_depth,
            array_length: self.array_length,
            path: self.path.clone(),
            overrides: Arc::clone(&self.overrides),
        }
    }

    /// Whether the depth guard has tripped at this position.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.depth > self.max_depth
    }

    #[must_use]
    pub fn array_length(&self) -> usize {
        self.array_length
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The `.`-joined path of this position, used as the override key.
    #[must_use]
    pub fn joined_path(&self) -> String {
        self.path.join(".")
    }

    /// The override pinned at this position, if any.
    #[must_use]
    pub fn override_value(&self) -> Option<&Value> {
        self.overrides.get(&self.joined_path())
    }

    /// A PRNG for this position. Pure function of the seed, path, depth,
    /// and `salt`; distinct salts give independent streams at the same
    /// position (e.g. an optional-presence coin vs. the inner value).
    #[must_use]
    pub fn rng(&self, salt: u64) -> DetRng {
        // FNV-1a over the path segments, with a separator byte between
        // segments so ["ab"] and ["a","b"] hash apart.
        let mut hash: u64 = 0xCBF2_9CE4_8422_2325;
        for segment in &self.path {
            for byte in segment.as_bytes() {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
            }
            hash ^= 0x2F;
            hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
        }
        let mixed = self.seed
            ^ hash
            ^ (self.depth as u64).rotate_left(17)
            ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        DetRng::new(mixed)
    }
}
