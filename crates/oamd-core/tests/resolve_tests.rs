use std::rc::Rc;

use serde_json::{Value, json};

use oamd_core::error::{ExampleError, ResolveError};
use oamd_core::example::ExampleSynthesizer;
use oamd_core::locale::{Locale, Messages};
use oamd_core::model::PropertyType;
use oamd_core::parse;
use oamd_core::parse::spec::OpenApiDocument;
use oamd_core::resolve::SchemaResolver;

const USERS: &str = include_str!("fixtures/user-service.yaml");
const COMPOSITION: &str = include_str!("fixtures/composition.yaml");
const RECURSIVE: &str = include_str!("fixtures/recursive.yaml");

fn resolver(doc: &OpenApiDocument) -> SchemaResolver<'_> {
    SchemaResolver::new(
        doc.components.as_ref().map(|c| &c.schemas),
        ExampleSynthesizer::with_seed(7),
        Messages::for_locale(Locale::En),
    )
}

#[test]
fn named_schema_resolved_exactly_once() {
    let doc = parse::from_yaml(USERS).unwrap();
    let mut resolver = resolver(&doc);

    let list = resolver.resolve_name("UserList").unwrap();
    let user = resolver.resolve_name("User").unwrap();
    let again = resolver.resolve_name("User").unwrap();

    assert!(Rc::ptr_eq(&user, &again), "second lookup must hit the cache");
    let item = list.item_schema.as_ref().expect("array schema has an item");
    assert!(
        Rc::ptr_eq(item, &user),
        "the list item must be the cached User node"
    );
}

#[test]
fn declared_examples_are_returned_verbatim() {
    let doc = parse::from_yaml(USERS).unwrap();
    let mut resolver = resolver(&doc);

    let user = resolver.resolve_name("User").unwrap();
    let name = user.properties.iter().find(|p| p.name == "name").unwrap();
    assert_eq!(name.example, json!("Alice"));
    let age = user.properties.iter().find(|p| p.name == "age").unwrap();
    assert_eq!(age.example, json!(34));
}

#[test]
fn requiredness_comes_from_the_owning_schema() {
    let doc = parse::from_yaml(USERS).unwrap();
    let mut resolver = resolver(&doc);

    let user = resolver.resolve_name("User").unwrap();
    let names: Vec<&str> = user.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "name", "age", "profile"]);

    let by_name = |n: &str| user.properties.iter().find(|p| p.name == n).unwrap();
    assert!(by_name("id").required);
    assert!(!by_name("name").required);
    // profile's own schema requires nickname, but that never leaks upward
    assert!(!by_name("profile").required);
    let nickname = &by_name("profile").schema.properties[0];
    assert_eq!(nickname.name, "nickname");
    assert!(nickname.required);
}

#[test]
fn array_example_is_a_single_element_sequence() {
    let doc = parse::from_yaml(USERS).unwrap();
    let mut resolver = resolver(&doc);

    let names = resolver.resolve_name("Names").unwrap();
    let Value::Array(items) = &names.example else {
        panic!("array schema must produce a sequence example");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0], json!("example string"));
}

#[test]
fn all_of_merges_with_last_branch_winning() {
    let doc = parse::from_yaml(COMPOSITION).unwrap();
    let mut resolver = resolver(&doc);

    let extended = resolver.resolve_name("Extended").unwrap();
    let names: Vec<&str> = extended.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"], "first declaration keeps its position");

    let b = &extended.properties[1];
    assert_eq!(b.type_name, PropertyType::Integer, "second branch wins");
    assert_eq!(b.format.as_deref(), Some("int64"));
    assert_eq!(b.description.as_deref(), Some("override b"));
    assert!(b.example.is_i64());

    let a = &extended.properties[0];
    assert_eq!(a.example, json!(1));
    assert!(a.required);
    assert!(!b.required);
    assert!(extended.properties[2].required);
}

#[test]
fn one_of_uses_the_first_variant_as_representative() {
    let doc = parse::from_yaml(COMPOSITION).unwrap();
    let mut resolver = resolver(&doc);

    let choice = resolver.resolve_name("Choice").unwrap();
    let names: Vec<&str> = choice.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a", "b"], "properties come from the Base variant");
    assert!(choice.example.is_object());
}

#[test]
fn any_of_uses_the_first_variant_as_representative() {
    let doc = parse::from_yaml(COMPOSITION).unwrap();
    let mut resolver = resolver(&doc);

    let fallback = resolver.resolve_name("Fallback").unwrap();
    assert!(fallback.properties.is_empty());
    assert_eq!(fallback.example, json!("first"));
}

#[test]
fn free_form_object_resolves_to_empty_mapping() {
    let doc = parse::from_yaml(COMPOSITION).unwrap();
    let mut resolver = resolver(&doc);

    let free = resolver.resolve_name("FreeForm").unwrap();
    assert!(free.properties.is_empty());
    assert_eq!(free.example, json!({}));
    assert!(free.item_schema.is_none());
}

#[test]
fn self_referential_schema_terminates() {
    let doc = parse::from_yaml(RECURSIVE).unwrap();
    let mut resolver = resolver(&doc);

    let node = resolver.resolve_name("TreeNode").unwrap();
    let children = node.properties.iter().find(|p| p.name == "children").unwrap();
    assert_eq!(children.type_name, PropertyType::Array);

    // The in-flight reference resolves to a forward node carrying the name.
    let item = children.schema.item_schema.as_ref().unwrap();
    assert_eq!(item.name.as_deref(), Some("TreeNode"));
    assert!(item.properties.is_empty());
    assert_eq!(item.example, json!({}));

    assert_eq!(children.example, json!([{}]));
    assert_eq!(node.example["children"], json!([{}]));
}

#[test]
fn alias_chain_resolves_to_the_target_node() {
    let doc: OpenApiDocument = parse::from_yaml(
        r##"
openapi: 3.0.3
info: {title: Alias, version: "0"}
paths: {}
components:
  schemas:
    Account:
      type: object
      properties:
        name:
          type: string
    LegacyAccount:
      $ref: "#/components/schemas/Account"
"##,
    )
    .unwrap();
    let mut resolver = resolver(&doc);

    let alias = resolver.resolve_name("LegacyAccount").unwrap();
    let target = resolver.resolve_name("Account").unwrap();
    assert!(Rc::ptr_eq(&alias, &target));
    assert_eq!(alias.name.as_deref(), Some("Account"));
}

#[test]
fn pure_alias_cycle_is_rejected() {
    let doc: OpenApiDocument = parse::from_yaml(
        r##"
openapi: 3.0.3
info: {title: Cycle, version: "0"}
paths: {}
components:
  schemas:
    A:
      $ref: "#/components/schemas/B"
    B:
      $ref: "#/components/schemas/A"
"##,
    )
    .unwrap();
    let mut resolver = resolver(&doc);

    let err = resolver.resolve_name("A").unwrap_err();
    assert!(matches!(err, ResolveError::CircularRef(_)));
}

#[test]
fn dangling_reference_is_rejected() {
    let doc: OpenApiDocument = parse::from_yaml(
        r##"
openapi: 3.0.3
info: {title: Dangling, version: "0"}
paths: {}
components:
  schemas:
    Holder:
      type: object
      properties:
        missing:
          $ref: "#/components/schemas/Nowhere"
"##,
    )
    .unwrap();
    let mut resolver = resolver(&doc);

    let err = resolver.resolve_name("Holder").unwrap_err();
    assert!(matches!(err, ResolveError::RefTargetNotFound(_)));
}

#[test]
fn array_without_items_is_unsupported() {
    let doc: OpenApiDocument = parse::from_yaml(
        r#"
openapi: 3.0.3
info: {title: Bad, version: "0"}
paths: {}
components:
  schemas:
    BadArray:
      type: array
"#,
    )
    .unwrap();
    let mut resolver = resolver(&doc);

    let err = resolver.resolve_name("BadArray").unwrap_err();
    assert!(matches!(err, ResolveError::UnsupportedSchema(_)));
}

#[test]
fn number_without_format_fails_fast() {
    let doc: OpenApiDocument = parse::from_yaml(
        r#"
openapi: 3.0.3
info: {title: Bad, version: "0"}
paths: {}
components:
  schemas:
    Price:
      type: number
"#,
    )
    .unwrap();
    let mut resolver = resolver(&doc);

    let err = resolver.resolve_name("Price").unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Example(ExampleError::UnsupportedNumberFormat(_))
    ));
}

#[test]
fn byte_strings_are_not_synthesizable() {
    let doc: OpenApiDocument = parse::from_yaml(
        r#"
openapi: 3.0.3
info: {title: Bad, version: "0"}
paths: {}
components:
  schemas:
    Blob:
      type: string
      format: byte
"#,
    )
    .unwrap();
    let mut resolver = resolver(&doc);

    let err = resolver.resolve_name("Blob").unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Example(ExampleError::NotSupported("byte-array"))
    ));
}
