//! Type configuration: the registries and settings type resolution runs against.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ormtype_core::{
    ConfigError, Dialect, Error, MappingError, MappingErrorKind, Result, codes,
};

use crate::basic::{BasicType, BasicTypeRegistry};
use crate::converter::ValueConverter;
use crate::domain::{DomainType, DomainTypeRegistry, TypeKey};
use crate::jdbc::{ColumnTypeInformation, JdbcTypeIndicators, JdbcTypeRegistry, MappingIndicators};

/// Overrides for the dialect's type preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeSettings {
    /// Storage code for booleans; defaults to the dialect's preference.
    pub preferred_boolean_type_code: Option<i32>,
    /// Storage code for arrays; defaults to the dialect's preference.
    pub preferred_array_type_code: Option<i32>,
}

impl TypeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store booleans as `code`.
    pub fn preferred_boolean_type_code(mut self, code: i32) -> Self {
        self.preferred_boolean_type_code = Some(code);
        self
    }

    /// Store arrays as `code`.
    pub fn preferred_array_type_code(mut self, code: i32) -> Self {
        self.preferred_array_type_code = Some(code);
        self
    }

    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid type settings: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }
}

/// Registries and settings shared by every resolution in one session factory.
#[derive(Debug)]
pub struct TypeConfiguration {
    dialect: Dialect,
    settings: TypeSettings,
    domain_types: DomainTypeRegistry,
    jdbc_types: JdbcTypeRegistry,
    basic_types: BasicTypeRegistry,
}

impl TypeConfiguration {
    /// A configuration with the standard registries and the dialect's defaults.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            settings: TypeSettings::default(),
            domain_types: DomainTypeRegistry::with_standard_types(),
            jdbc_types: JdbcTypeRegistry::with_standard_types(),
            basic_types: BasicTypeRegistry::new(),
        }
    }

    /// A configuration with explicit settings. Preferred codes must be
    /// resolvable by the JDBC type registry.
    pub fn with_settings(dialect: Dialect, settings: TypeSettings) -> Result<Self> {
        let config = Self {
            settings,
            ..Self::new(dialect)
        };
        for code in [
            config.settings.preferred_boolean_type_code,
            config.settings.preferred_array_type_code,
        ]
        .into_iter()
        .flatten()
        {
            if !config.jdbc_types.is_known(code) {
                return Err(Error::Config(ConfigError::new(format!(
                    "preferred type code {code} ({}) is not registered",
                    codes::name(code)
                ))));
            }
        }
        tracing::debug!(
            dialect = %dialect,
            boolean_code = config.preferred_boolean_type_code(),
            array_code = config.preferred_array_type_code(),
            "Created type configuration"
        );
        Ok(config)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn settings(&self) -> &TypeSettings {
        &self.settings
    }

    pub fn domain_type_registry(&self) -> &DomainTypeRegistry {
        &self.domain_types
    }

    pub fn jdbc_type_registry(&self) -> &JdbcTypeRegistry {
        &self.jdbc_types
    }

    pub fn basic_type_registry(&self) -> &BasicTypeRegistry {
        &self.basic_types
    }

    pub fn preferred_boolean_type_code(&self) -> i32 {
        self.settings
            .preferred_boolean_type_code
            .unwrap_or_else(|| self.dialect.preferred_sql_type_code_for_boolean())
    }

    pub fn preferred_array_type_code(&self) -> i32 {
        self.settings
            .preferred_array_type_code
            .unwrap_or_else(|| self.dialect.preferred_sql_type_code_for_array())
    }

    /// Default indicators for mapping attributes against this configuration.
    pub fn indicators(&self) -> MappingIndicators<'_> {
        MappingIndicators::new(self)
    }

    /// Resolve the basic type for `key` using the default indicators.
    pub fn resolve_basic_type(&self, key: &TypeKey) -> Result<Arc<BasicType>> {
        self.resolve_basic_type_with(key, &ColumnTypeInformation::EMPTY, &self.indicators())
    }

    /// Resolve the basic type for `key` with explicit column information and
    /// indicators.
    pub fn resolve_basic_type_with(
        &self,
        key: &TypeKey,
        column: &ColumnTypeInformation,
        indicators: &dyn JdbcTypeIndicators,
    ) -> Result<Arc<BasicType>> {
        let descriptor = self.domain_types.descriptor(key)?;
        if let (Some(element_key), Some(_)) = (key.element(), descriptor.as_plural()) {
            let element = self.resolve_basic_type(element_key)?;
            return self.resolve_plural_type(key, &element, column, indicators);
        }

        let jdbc_type = descriptor.recommended_jdbc_type(indicators)?;
        let resolved = self.basic_types.resolve(&descriptor, &jdbc_type, || {
            BasicType::new(Arc::clone(&descriptor), Arc::clone(&jdbc_type))
        });
        self.basic_types.register(Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Resolve the plural `key` over an already resolved element type.
    ///
    /// Fails with [`MappingErrorKind::UnresolvableElement`] when the element is
    /// itself plural.
    pub fn resolve_plural_type(
        &self,
        key: &TypeKey,
        element_type: &Arc<BasicType>,
        column: &ColumnTypeInformation,
        indicators: &dyn JdbcTypeIndicators,
    ) -> Result<Arc<BasicType>> {
        let descriptor = self.domain_types.descriptor(key)?;
        let plural = descriptor.as_plural().ok_or_else(|| {
            Error::Mapping(
                MappingError::new(MappingErrorKind::UnknownDomainType, "not a plural type")
                    .with_type(key.to_string()),
            )
        })?;
        plural
            .resolve_type(self, element_type, column, indicators)?
            .ok_or_else(|| {
                Error::Mapping(
                    MappingError::new(
                        MappingErrorKind::UnresolvableElement,
                        format!(
                            "element type '{}' cannot be resolved as a plural element",
                            element_type.name()
                        ),
                    )
                    .with_type(key.to_string()),
                )
            })
    }

    /// Build the basic type for a scalar stored through `converter`.
    ///
    /// The JDBC type is the one recommended for the converter's relational
    /// type. Converted types are not interned.
    pub fn converted_basic_type(
        &self,
        converter: Arc<dyn ValueConverter>,
    ) -> Result<Arc<BasicType>> {
        let jdbc_type = converter
            .relational_type()
            .recommended_jdbc_type(&self.indicators())?;
        let domain_type: Arc<dyn DomainType> = Arc::clone(converter.domain_type());
        Ok(Arc::new(BasicType::converted(domain_type, jdbc_type, converter)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_override_dialect() {
        let settings = TypeSettings::new().preferred_boolean_type_code(codes::CHAR);
        let config = TypeConfiguration::with_settings(Dialect::Postgres, settings).unwrap();
        assert_eq!(config.preferred_boolean_type_code(), codes::CHAR);
        assert_eq!(config.preferred_array_type_code(), codes::ARRAY);
    }

    #[test]
    fn test_unknown_preferred_code_is_rejected() {
        let settings = TypeSettings::new().preferred_array_type_code(4242);
        let err = TypeConfiguration::with_settings(Dialect::Oracle, settings).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_settings_from_json() {
        let settings =
            TypeSettings::from_json(r#"{"preferred_array_type_code": -3}"#).unwrap();
        assert_eq!(settings.preferred_array_type_code, Some(codes::VARBINARY));
        assert_eq!(settings.preferred_boolean_type_code, None);

        let err = TypeSettings::from_json(r#"{"array_code": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_scalar_resolution_is_registered_by_name() {
        let config = TypeConfiguration::new(Dialect::Oracle);
        let boolean = config.resolve_basic_type(&TypeKey::scalar("bool")).unwrap();
        assert_eq!(boolean.jdbc_type().code(), codes::BIT);
        let named = config.basic_type_registry().registered_type("bool").unwrap();
        assert!(Arc::ptr_eq(&boolean, &named));
    }

    struct CharBooleans<'a>(&'a TypeConfiguration);

    impl JdbcTypeIndicators for CharBooleans<'_> {
        fn type_configuration(&self) -> &TypeConfiguration {
            self.0
        }

        fn preferred_sql_type_code_for_boolean(&self) -> i32 {
            codes::CHAR
        }
    }

    #[test]
    fn test_scalar_resolution_follows_jdbc_type() {
        let config = TypeConfiguration::new(Dialect::Oracle);
        let key = TypeKey::scalar("bool");
        let bit = config.resolve_basic_type(&key).unwrap();
        let stored_as_char = config
            .resolve_basic_type_with(&key, &ColumnTypeInformation::EMPTY, &CharBooleans(&config))
            .unwrap();

        assert_eq!(bit.jdbc_type().code(), codes::BIT);
        assert_eq!(stored_as_char.jdbc_type().code(), codes::CHAR);
        assert!(!Arc::ptr_eq(&bit, &stored_as_char));

        let again = config
            .resolve_basic_type_with(&key, &ColumnTypeInformation::EMPTY, &CharBooleans(&config))
            .unwrap();
        assert!(Arc::ptr_eq(&stored_as_char, &again));
        let named = config.basic_type_registry().registered_type("bool").unwrap();
        assert!(Arc::ptr_eq(&named, &bit));
    }

    #[test]
    fn test_plural_resolution_is_idempotent() {
        let config = TypeConfiguration::new(Dialect::Oracle);
        let key = TypeKey::array_of(TypeKey::scalar("i64"));
        let first = config.resolve_basic_type(&key).unwrap();
        let second = config.resolve_basic_type(&key).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.jdbc_type().type_name(), Some("BIGINT_ARRAY"));
        assert_eq!(first.name(), "i64[]");
    }

    #[test]
    fn test_nested_plural_is_unresolvable() {
        let config = TypeConfiguration::new(Dialect::Postgres);
        let key = TypeKey::array_of(TypeKey::array_of(TypeKey::scalar("i32")));
        let err = config.resolve_basic_type(&key).unwrap_err();
        assert_eq!(err.mapping_kind(), Some(MappingErrorKind::UnresolvableElement));
    }

    #[test]
    fn test_scalar_is_not_a_plural() {
        let config = TypeConfiguration::new(Dialect::Postgres);
        let element = config.resolve_basic_type(&TypeKey::scalar("i32")).unwrap();
        let err = config
            .resolve_plural_type(
                &TypeKey::scalar("i32"),
                &element,
                &ColumnTypeInformation::EMPTY,
                &config.indicators(),
            )
            .unwrap_err();
        assert_eq!(err.mapping_kind(), Some(MappingErrorKind::UnknownDomainType));
    }
}
