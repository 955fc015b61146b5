use routewire::mock::{
    generate, mock_request, mock_response, mock_scenario, mock_scenarios, GeneratorOptions,
};
use routewire::schema::{check_value, Schema};
use routewire::{HandlerConfig, RouteDescriptor};
use serde_json::json;

fn seeded(seed: u64) -> GeneratorOptions {
    GeneratorOptions::new().seed(seed)
}

/// Every supported shape must generate values that validate against their
/// own schema.
#[test]
fn generated_output_conforms_to_schema() {
    let shapes: Vec<(&str, Schema)> = vec![
        ("email", Schema::string().email()),
        ("uri", Schema::string().uri()),
        ("uuid", Schema::string().uuid()),
        ("bounded string", Schema::string().min_len(2).max_len(5)),
        ("number", Schema::number().min(-5.0).max(5.0)),
        ("integer", Schema::integer().min(0.0).max(100.0)),
        ("boolean", Schema::boolean()),
        ("date", Schema::date()),
        ("literal", Schema::literal(json!("fixed"))),
        ("enum", Schema::enumeration(vec!["a", "b", "c"])),
        ("optional", Schema::optional(Schema::string())),
        ("nullable", Schema::nullable(Schema::integer())),
        (
            "default",
            Schema::with_default(Schema::integer().min(0.0).max(9.0), json!(4)),
        ),
        (
            "array with bounds",
            Schema::array(Schema::string()).min_items(1).max_items(4),
        ),
        (
            "nested object",
            Schema::object(vec![
                ("id", Schema::string().uuid()),
                (
                    "profile",
                    Schema::object(vec![
                        ("email", Schema::string().email()),
                        ("age", Schema::optional(Schema::integer().min(0.0).max(120.0))),
                    ]),
                ),
            ]),
        ),
        (
            "union",
            Schema::union(vec![Schema::string(), Schema::integer()]),
        ),
        (
            "discriminated union",
            Schema::discriminated(
                "type",
                vec![
                    Schema::object(vec![
                        ("type", Schema::literal("circle")),
                        ("radius", Schema::number().min(0.0).max(10.0)),
                    ]),
                    Schema::object(vec![
                        ("type", Schema::literal("square")),
                        ("side", Schema::number().min(0.0).max(10.0)),
                    ]),
                ],
            ),
        ),
        (
            "tuple",
            Schema::tuple(vec![Schema::string(), Schema::integer(), Schema::boolean()]),
        ),
        ("record", Schema::record(Schema::integer())),
        (
            "intersection",
            Schema::intersection(
                Schema::object(vec![("a", Schema::string())]),
                Schema::object(vec![("b", Schema::integer())]),
            ),
        ),
    ];

    for (name, schema) in shapes {
        for seed in 0..10 {
            let value = generate(&schema, &seeded(seed));
            let issues = check_value(&schema, &value);
            assert!(
                issues.is_empty(),
                "shape {name:?} seed {seed}: generated {value} violates its schema: {}",
                issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            );
        }
    }
}

#[test]
fn generation_is_deterministic_per_seed() {
    let schema = Schema::object(vec![
        ("id", Schema::string().uuid()),
        ("email", Schema::string().email()),
        ("tags", Schema::array(Schema::string()).min_items(2)),
        (
            "nested",
            Schema::object(vec![("score", Schema::number().min(0.0).max(1.0))]),
        ),
    ]);
    let a = generate(&schema, &seeded(123));
    let b = generate(&schema, &seeded(123));
    assert_eq!(a, b);

    let c = generate(&schema, &seeded(124));
    assert_ne!(a, c);
}

#[test]
fn optional_fields_vary_across_seeds() {
    let schema = Schema::object(vec![
        ("required", Schema::string()),
        ("maybe", Schema::optional(Schema::string())),
    ]);
    let mut present = 0;
    let mut absent = 0;
    for seed in 0..50 {
        let value = generate(&schema, &seeded(seed));
        if value.as_object().expect("object output").contains_key("maybe") {
            present += 1;
        } else {
            absent += 1;
        }
    }
    assert!(present > 0, "optional field never generated across 50 seeds");
    assert!(absent > 0, "optional field always generated across 50 seeds");
}

#[test]
fn override_precedence_is_absolute() {
    let schema = Schema::object(vec![(
        "config",
        Schema::object(vec![("retries", Schema::integer().min(0.0).max(3.0))]),
    )]);
    for seed in 0..10 {
        let options = seeded(seed).override_path("config.retries", json!(99));
        let value = generate(&schema, &options);
        assert_eq!(value["config"]["retries"], 99);
    }
}

#[test]
fn recursive_schema_generates_within_any_finite_depth() {
    fn category() -> Schema {
        Schema::object(vec![
            ("name", Schema::string()),
            ("subcategories", Schema::array(Schema::lazy(category))),
        ])
    }
    for max_depth in [1, 3, 8] {
        let value = generate(
            &category(),
            &seeded(7).max_depth(max_depth).array_length(2),
        );
        assert!(value.is_object(), "max_depth {max_depth} failed");
    }
}

fn user_endpoint() -> HandlerConfig {
    HandlerConfig::new(
        RouteDescriptor::pattern(
            "/users/:id",
            Schema::object(vec![("id", Schema::string().uuid())]),
        )
        .expect("valid pattern"),
    )
    .query(Schema::object(vec![(
        "verbose",
        Schema::optional(Schema::boolean()),
    )]))
    .body(Schema::object(vec![("name", Schema::string())]))
    .response(Schema::object(vec![
        ("id", Schema::string().uuid()),
        ("name", Schema::string()),
    ]))
}

#[test]
fn mock_request_is_sparse() {
    let full = user_endpoint();
    let request = mock_request(&full, &seeded(1));
    assert!(request.params.is_some());
    assert!(request.query.is_some());
    assert!(request.body.is_some());

    let bare = HandlerConfig::new(RouteDescriptor::static_path("/health").expect("valid path"));
    let request = mock_request(&bare, &seeded(1));
    assert!(request.params.is_none());
    assert!(request.query.is_none());
    assert!(request.body.is_none());
}

#[test]
fn mock_response_is_absent_without_schema() {
    let bare = HandlerConfig::new(RouteDescriptor::static_path("/health").expect("valid path"));
    assert!(mock_response(&bare, &seeded(1)).is_none());
    assert!(mock_response(&user_endpoint(), &seeded(1)).is_some());
}

#[test]
fn request_sections_validate_against_their_schemas() {
    let config = user_endpoint();
    let request = mock_request(&config, &seeded(5));
    let body_schema = &config.body.as_ref().expect("body section").schema;
    let issues = check_value(body_schema, &request.body.expect("body generated"));
    assert!(issues.is_empty());
}

#[test]
fn scenarios_are_reproducible_and_distinct() {
    let config = user_endpoint();
    let first = mock_scenarios(&config, 3, &seeded(42));
    let second = mock_scenarios(&config, 3, &seeded(42));
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.request.body, b.request.body);
        assert_eq!(a.response, b.response);
    }
    assert_ne!(first[0].request.body, first[1].request.body);
}

#[test]
fn scenario_pairs_request_and_response_from_one_seed() {
    let config = user_endpoint();
    let a = mock_scenario(&config, &seeded(9));
    let b = mock_scenario(&config, &seeded(9));
    assert_eq!(a.request.params, b.request.params);
    assert_eq!(a.response, b.response);
    assert!(a.response.is_some());
}
