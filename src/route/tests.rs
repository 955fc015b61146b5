use super::{CompiledPattern, Params, RouteDescriptor, RouteError};
use crate::schema::Schema;
use serde_json::json;
use url::Url;

fn params(pairs: &[(&str, &str)]) -> Params {
    let mut map = Params::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), json!(v));
    }
    map
}

fn url(path: &str) -> Url {
    Url::parse(&format!("http://localhost{}", path)).unwrap()
}

fn id_schema() -> Schema {
    Schema::object(vec![("id", Schema::string())])
}

#[test]
fn root_pattern() {
    let compiled = CompiledPattern::compile("/").unwrap();
    assert!(compiled.is_match("/"));
    assert!(compiled.param_names().is_empty());
    assert_eq!(compiled.build(&Params::new()), "/");
}

#[test]
fn parameterized_pattern() {
    let compiled = CompiledPattern::compile("/items/:id").unwrap();
    assert!(compiled.is_match("/items/123"));
    assert_eq!(compiled.param_names(), ["id"]);
}

#[test]
fn nested_pattern() {
    let compiled = CompiledPattern::compile("/a/:b/c").unwrap();
    assert!(compiled.is_match("/a/1/c"));
    assert!(!compiled.is_match("/a/1"));
    assert_eq!(compiled.param_names(), ["b"]);
}

#[test]
fn pattern_without_leading_slash_is_rejected() {
    assert!(matches!(
        CompiledPattern::compile("users/:id"),
        Err(RouteError::MissingLeadingSlash { .. })
    ));
}

#[test]
fn malformed_placeholder_is_rejected() {
    assert!(matches!(
        CompiledPattern::compile("/users/:"),
        Err(RouteError::MalformedSegment { .. })
    ));
    assert!(matches!(
        CompiledPattern::compile("/users/id:"),
        Err(RouteError::MalformedSegment { .. })
    ));
    assert!(matches!(
        CompiledPattern::compile("/users//:id"),
        Err(RouteError::MalformedSegment { .. })
    ));
}

#[test]
fn duplicate_param_is_rejected() {
    assert!(matches!(
        CompiledPattern::compile("/a/:id/b/:id"),
        Err(RouteError::DuplicateParam { .. })
    ));
}

#[test]
fn static_path_rejects_placeholders() {
    assert!(matches!(
        RouteDescriptor::static_path("/health/:id"),
        Err(RouteError::PlaceholderInStaticPath { .. })
    ));
}

#[test]
fn static_route_functions() {
    let route = RouteDescriptor::static_path("/health").unwrap();
    assert_eq!(route.build(&params(&[("ignored", "x")])), "/health");
    assert!(route.parse(&url("/health")).is_empty());
    assert!(route.is_match(&url("/health")));
    assert!(!route.is_match(&url("/health/extra")));
    assert!(route.params_schema().is_none());
}

#[test]
fn pattern_route_round_trip() {
    let route = RouteDescriptor::pattern("/users/:id", id_schema()).unwrap();
    let p = params(&[("id", "42")]);
    assert_eq!(route.build(&p), "/users/42");
    assert_eq!(route.parse(&url("/users/42")), p);
    assert!(route.is_match(&url("/users/42")));
    assert!(!route.is_match(&url("/users/42/extra")));
}

#[test]
fn pattern_route_percent_encoding_round_trip() {
    let route = RouteDescriptor::pattern("/files/:name", id_schema()).unwrap();
    let p = params(&[("name", "a b/c")]);
    let built = route.build(&p);
    assert!(!built[1..].contains(' '));
    assert_eq!(route.parse(&url(&built)), p);
    assert!(route.is_match(&url(&built)));
}

#[test]
fn literal_segments_must_match_exactly() {
    let route = RouteDescriptor::pattern("/users/:id/posts", id_schema()).unwrap();
    assert!(route.is_match(&url("/users/7/posts")));
    assert!(!route.is_match(&url("/users/7/comments")));
    assert!(!route.is_match(&url("/users//posts")));
}

#[test]
fn with_builder_uses_custom_build_but_derived_parse() {
    let route = RouteDescriptor::with_builder("/users/:id", id_schema(), |p| {
        format!("/users/{}", p["id"].as_str().unwrap_or_default())
    })
    .unwrap();
    let p = params(&[("id", "9")]);
    assert_eq!(route.build(&p), "/users/9");
    assert_eq!(route.parse(&url("/users/9")), p);
    assert!(route.is_match(&url("/users/9")));
}

#[test]
fn full_route_uses_supplied_functions_verbatim() {
    let route = RouteDescriptor::full(
        id_schema(),
        |p| format!("/v2/{}", p["id"].as_str().unwrap_or_default()),
        |u| {
            let mut out = Params::new();
            if let Some(id) = u.path().strip_prefix("/v2/") {
                out.insert("id".into(), json!(id));
            }
            out
        },
        |u| u.path().starts_with("/v2/"),
    );
    let p = params(&[("id", "abc")]);
    assert_eq!(route.build(&p), "/v2/abc");
    assert_eq!(route.parse(&url("/v2/abc")), p);
    assert!(route.is_match(&url("/v2/abc")));
}

#[test]
fn self_check_accepts_consistent_route() {
    let route = RouteDescriptor::pattern("/users/:id", id_schema()).unwrap();
    route.self_check(&params(&[("id", "42")])).unwrap();
}

#[test]
fn self_check_rejects_inconsistent_full_route() {
    let route = RouteDescriptor::full(
        id_schema(),
        |_| "/somewhere/else".to_string(),
        |_| Params::new(),
        |u| u.path() == "/expected",
    );
    assert!(matches!(
        route.self_check(&params(&[("id", "1")])),
        Err(RouteError::RoundTrip { .. })
    ));
}

#[test]
fn build_with_missing_param_substitutes_empty_segment() {
    let route = RouteDescriptor::pattern("/users/:id", id_schema()).unwrap();
    assert_eq!(route.build(&Params::new()), "/users/");
}

#[test]
fn numeric_param_values_are_stringified() {
    let route = RouteDescriptor::pattern("/users/:id", id_schema()).unwrap();
    let mut p = Params::new();
    p.insert("id".into(), json!(42));
    assert_eq!(route.build(&p), "/users/42");
}
