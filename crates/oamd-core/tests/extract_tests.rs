use std::rc::Rc;

use oamd_core::assemble::{AssembleOptions, assemble};
use oamd_core::error::{AssembleError, ExtractError, ParseError};
use oamd_core::locale::Locale;
use oamd_core::model::{HttpMethod, ParameterLocation, Specification};
use oamd_core::parse;

const USERS: &str = include_str!("fixtures/user-service.yaml");

fn spec() -> Specification {
    let doc = parse::from_yaml(USERS).unwrap();
    assemble(
        &doc,
        &AssembleOptions {
            locale: Locale::En,
            seed: Some(5),
        },
    )
    .unwrap()
}

#[test]
fn every_declared_method_becomes_an_endpoint() {
    let spec = spec();
    assert_eq!(spec.endpoints.len(), 4);
    assert!(spec.endpoint(HttpMethod::Get, "/users").is_some());
    assert!(spec.endpoint(HttpMethod::Post, "/users").is_some());
    assert!(spec.endpoint(HttpMethod::Get, "/users/{id}").is_some());
    assert!(spec.endpoint(HttpMethod::Get, "/health").is_some());
    assert!(spec.endpoint(HttpMethod::Delete, "/users").is_none());
}

#[test]
fn operations_group_under_every_declared_tag() {
    let spec = spec();
    let tag_names: Vec<&str> = spec.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, ["Users", "Admin"]);

    let users = &spec.tags[0];
    assert_eq!(users.description.as_deref(), Some("Account operations."));
    assert_eq!(users.operations.len(), 3);

    // The multi-tag operation is listed under both tags but only once in
    // the flat endpoint list.
    let admin = &spec.tags[1];
    assert_eq!(admin.operations.len(), 1);
    assert_eq!(admin.operations[0].method, HttpMethod::Post);
    assert_eq!(admin.operations[0].path, "/users");
    let create_count = spec
        .endpoints
        .iter()
        .filter(|e| e.method == HttpMethod::Post && e.path == "/users")
        .count();
    assert_eq!(create_count, 1);
}

#[test]
fn untagged_operations_stay_out_of_groupings() {
    let spec = spec();
    let health_grouped = spec
        .tags
        .iter()
        .flat_map(|t| &t.operations)
        .any(|op| op.path == "/health");
    assert!(!health_grouped);
    assert!(spec.endpoint(HttpMethod::Get, "/health").is_some());
}

#[test]
fn summary_falls_back_to_method_dot_path() {
    let spec = spec();
    let health = spec.endpoint(HttpMethod::Get, "/health").unwrap();
    assert_eq!(health.summary_or_path(), "GET./health");
    let get_user = spec.endpoint(HttpMethod::Get, "/users/{id}").unwrap();
    assert_eq!(get_user.summary_or_path(), "GET./users/{id}");
    let list = spec.endpoint(HttpMethod::Get, "/users").unwrap();
    assert_eq!(list.summary_or_path(), "List users");
}

#[test]
fn parameters_map_location_name_description_required() {
    let spec = spec();

    let list = spec.endpoint(HttpMethod::Get, "/users").unwrap();
    assert_eq!(list.parameters.len(), 1);
    let limit = &list.parameters[0];
    assert_eq!(limit.location, ParameterLocation::Query);
    assert_eq!(limit.name, "limit");
    assert_eq!(limit.description.as_deref(), Some("Page size."));
    assert!(!limit.required);

    // Path-item-level parameters flow into the operation.
    let get_user = spec.endpoint(HttpMethod::Get, "/users/{id}").unwrap();
    assert_eq!(get_user.parameters.len(), 1);
    let id = &get_user.parameters[0];
    assert_eq!(id.location, ParameterLocation::Path);
    assert!(id.required);
}

#[test]
fn request_content_carries_every_declared_media_type() {
    let spec = spec();
    let create = spec.endpoint(HttpMethod::Post, "/users").unwrap();
    let request = create.request.as_ref().unwrap();
    let mimes: Vec<&str> = request.content.keys().map(String::as_str).collect();
    assert_eq!(mimes, ["application/json", "application/xml"]);
}

#[test]
fn responses_key_by_status_code() {
    let spec = spec();

    let get_user = spec.endpoint(HttpMethod::Get, "/users/{id}").unwrap();
    assert_eq!(get_user.responses.len(), 2);
    assert!(get_user.responses.contains_key(&200));
    assert!(get_user.responses[&404].is_empty(), "404 declares no content");

    let health = spec.endpoint(HttpMethod::Get, "/health").unwrap();
    assert!(health.responses[&204].is_empty());
}

#[test]
fn response_schema_is_the_memoized_named_node() {
    let spec = spec();
    let user = spec
        .schemas
        .iter()
        .find(|s| s.name.as_deref() == Some("User"))
        .unwrap();
    let get_user = spec.endpoint(HttpMethod::Get, "/users/{id}").unwrap();
    let body = &get_user.responses[&200].content["application/json"];
    assert!(Rc::ptr_eq(body, user));
}

#[test]
fn seeded_assembly_is_reproducible() {
    let doc = parse::from_yaml(USERS).unwrap();
    let options = AssembleOptions {
        locale: Locale::En,
        seed: Some(99),
    };
    let first = assemble(&doc, &options).unwrap();
    let second = assemble(&doc, &options).unwrap();

    let example_of = |spec: &Specification| {
        spec.schemas
            .iter()
            .find(|s| s.name.as_deref() == Some("User"))
            .unwrap()
            .example
            .clone()
    };
    assert_eq!(example_of(&first), example_of(&second));
}

#[test]
fn non_numeric_status_code_is_rejected() {
    let doc = parse::from_yaml(
        r#"
openapi: 3.0.3
info: {title: Bad, version: "0"}
paths:
  /things:
    get:
      responses:
        default:
          description: fallback
"#,
    )
    .unwrap();
    let err = assemble(&doc, &AssembleOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        AssembleError::Extract(ExtractError::InvalidStatusCode(code)) if code == "default"
    ));
}

#[test]
fn unknown_parameter_location_fails_at_parse_time() {
    let result = parse::from_yaml(
        r#"
openapi: 3.0.3
info: {title: Bad, version: "0"}
paths:
  /things:
    get:
      parameters:
        - name: payload
          in: body
          required: true
      responses:
        "204":
          description: none
"#,
    );
    assert!(result.is_err(), "in: body is not a recognized location");
}

#[test]
fn pre_3x_documents_are_rejected() {
    let err = parse::from_yaml(
        r#"
openapi: "2.0"
info: {title: Old, version: "0"}
paths: {}
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "2.0"));
}

#[test]
fn component_references_resolve_for_parameters_and_responses() {
    let doc = parse::from_yaml(
        r##"
openapi: 3.0.3
info: {title: Shared, version: "0"}
paths:
  /items:
    get:
      parameters:
        - $ref: "#/components/parameters/PageSize"
      responses:
        "404":
          $ref: "#/components/responses/NotFound"
components:
  parameters:
    PageSize:
      name: limit
      in: query
      description: Page size.
  responses:
    NotFound:
      description: Missing
"##,
    )
    .unwrap();
    let spec = assemble(&doc, &AssembleOptions::default()).unwrap();
    let get = spec.endpoint(HttpMethod::Get, "/items").unwrap();
    assert_eq!(get.parameters[0].name, "limit");
    assert_eq!(get.parameters[0].location, ParameterLocation::Query);
    assert!(get.responses[&404].is_empty());
}
