use std::sync::Arc;

use ormtype::prelude::*;
use ormtype::{BooleanConverter, CollectionKind, MappingErrorKind, MappingIndicators, codes};

fn int_array() -> TypeKey {
    TypeKey::array_of(TypeKey::scalar("i32"))
}

#[test]
fn array_resolution_is_idempotent() {
    let factory = SessionFactory::new(Dialect::Oracle);
    let first = factory.resolve_basic_type(&int_array()).unwrap();
    let second = factory.resolve_basic_type(&int_array()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.jdbc_type().code(), codes::ARRAY);
    assert_eq!(first.jdbc_type().type_name(), Some("INTEGER_ARRAY"));
    assert_eq!(first.element_type().unwrap().name(), "i32");
}

#[test]
fn concurrent_first_resolution_converges() {
    let factory = SessionFactory::new(Dialect::Postgres);
    let key = TypeKey::collection_of(CollectionKind::List, TypeKey::scalar("i64"));

    let results: Vec<Arc<BasicType>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| factory.resolve_basic_type(&key).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for resolved in &results {
        assert!(Arc::ptr_eq(&results[0], resolved));
    }
    assert_eq!(results[0].jdbc_type().type_name(), Some("bigint[]"));
}

#[test]
fn nested_plurals_fail_with_mapping_error() {
    let factory = SessionFactory::new(Dialect::H2);
    let key = TypeKey::collection_of(CollectionKind::Set, int_array());
    let err = factory.resolve_basic_type(&key).unwrap_err();

    assert!(err.is_mapping_error());
    assert_eq!(err.mapping_kind(), Some(MappingErrorKind::UnresolvableElement));
}

#[test]
fn byte_strings_resolve_as_binary_scalars() {
    let factory = SessionFactory::new(Dialect::Postgres);
    let bytes = factory
        .resolve_basic_type(&TypeKey::array_of(TypeKey::scalar("u8")))
        .unwrap();
    assert!(!bytes.is_plural());
    assert_eq!(bytes.jdbc_type().code(), codes::VARBINARY);
}

#[test]
fn dialects_without_arrays_fall_back_to_binary_storage() {
    let factory = SessionFactory::new(Dialect::Sqlite);
    let resolved = factory.resolve_basic_type(&int_array()).unwrap();
    assert!(resolved.is_plural());
    assert_eq!(resolved.jdbc_type().code(), codes::VARBINARY);
    assert!(!resolved.jdbc_type().is_array());
}

#[test]
fn preferred_array_setting_overrides_dialect() {
    let factory = SessionFactory::builder()
        .dialect(Dialect::Postgres)
        .settings(TypeSettings::new().preferred_array_type_code(codes::VARBINARY))
        .build()
        .unwrap();
    let resolved = factory.resolve_basic_type(&int_array()).unwrap();
    assert_eq!(resolved.jdbc_type().code(), codes::VARBINARY);
}

#[test]
fn converted_element_yields_converted_array() {
    let factory = SessionFactory::new(Dialect::Oracle);
    let config = factory.type_configuration();
    let converter: Arc<dyn ValueConverter> =
        Arc::new(BooleanConverter::yes_no(config.domain_type_registry()).unwrap());
    let element = config.converted_basic_type(converter).unwrap();
    let key = TypeKey::array_of(TypeKey::scalar("bool"));

    let resolved = config
        .resolve_plural_type(&key, &element, &ColumnTypeInformation::EMPTY, &config.indicators())
        .unwrap();

    assert!(resolved.is_converted_array());
    assert_eq!(resolved.jdbc_type().type_name(), Some("CHAR_ARRAY"));
    assert_eq!(
        resolved
            .to_relational(&Value::Array(vec![Value::Bool(true), Value::Bool(false)]))
            .unwrap(),
        Value::Array(vec![Value::Text("Y".into()), Value::Text("N".into())])
    );

    // Converted plurals are not interned.
    let again = config
        .resolve_plural_type(&key, &element, &ColumnTypeInformation::EMPTY, &config.indicators())
        .unwrap();
    assert!(!Arc::ptr_eq(&resolved, &again));
}

#[test]
fn explicit_code_applies_to_converted_plurals() {
    let factory = SessionFactory::new(Dialect::Oracle);
    let config = factory.type_configuration();
    let converter: Arc<dyn ValueConverter> =
        Arc::new(BooleanConverter::numeric(config.domain_type_registry()).unwrap());
    let element = config.converted_basic_type(converter).unwrap();
    let indicators = MappingIndicators::new(config).explicit_type_code(codes::VARBINARY);

    let resolved = config
        .resolve_plural_type(
            &TypeKey::array_of(TypeKey::scalar("bool")),
            &element,
            &ColumnTypeInformation::EMPTY,
            &indicators,
        )
        .unwrap();
    assert_eq!(resolved.jdbc_type().code(), codes::VARBINARY);
}

#[test]
fn explicit_code_applies_to_plain_plurals() {
    let factory = SessionFactory::new(Dialect::Oracle);
    let config = factory.type_configuration();
    let element = config.resolve_basic_type(&TypeKey::scalar("i32")).unwrap();
    let key = int_array();
    let indicators = MappingIndicators::new(config).explicit_type_code(codes::VARBINARY);

    let binary = config
        .resolve_plural_type(&key, &element, &ColumnTypeInformation::EMPTY, &indicators)
        .unwrap();
    assert_eq!(binary.jdbc_type().code(), codes::VARBINARY);
    assert!(!binary.is_converted_array());

    let native = config.resolve_basic_type(&key).unwrap();
    assert_eq!(native.jdbc_type().code(), codes::ARRAY);
    assert!(!Arc::ptr_eq(&binary, &native));
}

#[test]
fn explicit_oracle_array_type_name() {
    let factory = SessionFactory::new(Dialect::Oracle);
    let config = factory.type_configuration();
    let element = config.resolve_basic_type(&TypeKey::scalar("String")).unwrap();
    let key = TypeKey::array_of(TypeKey::scalar("String"));

    let named = config
        .resolve_plural_type(
            &key,
            &element,
            &ColumnTypeInformation::named("TAG_LIST"),
            &config.indicators(),
        )
        .unwrap();
    assert_eq!(named.jdbc_type().type_name(), Some("TAG_LIST"));

    let default = config.resolve_basic_type(&key).unwrap();
    assert_eq!(default.jdbc_type().type_name(), Some("VARCHAR_ARRAY"));
    assert!(!Arc::ptr_eq(&named, &default));
}

#[test]
fn array_descriptor_is_wider_than_its_element() {
    let factory = SessionFactory::new(Dialect::Postgres);
    let registry = factory.type_configuration().domain_type_registry();
    let array = registry.descriptor(&int_array()).unwrap();
    let element = registry.descriptor(&TypeKey::scalar("i32")).unwrap();
    let unrelated = registry.descriptor(&TypeKey::scalar("String")).unwrap();

    assert!(array.is_wider(array.as_ref()));
    assert!(array.is_wider(element.as_ref()));
    assert!(!array.is_wider(unrelated.as_ref()));
}
