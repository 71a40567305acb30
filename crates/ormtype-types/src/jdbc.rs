//! JDBC types and the JDBC-type registry.
//!
//! A [`JdbcType`] identifies a concrete column type: a type code, the
//! element type for arrays, and a dialect-specific type name where the
//! database names array types itself. Plain types are registered as
//! descriptors by code; parameterized types (arrays) are produced by a
//! [`JdbcTypeConstructor`] and interned so each distinct shape exists once.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use ormtype_core::{
    ConfigError, Dialect, Error, MappingError, MappingErrorKind, Result, codes, is_plain_type_name,
};

use crate::basic::BasicType;
use crate::config::TypeConfiguration;

/// A concrete database column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JdbcType {
    code: i32,
    element: Option<Arc<JdbcType>>,
    type_name: Option<String>,
}

impl JdbcType {
    /// A plain type identified only by its code.
    pub fn new(code: i32) -> Self {
        Self {
            code,
            element: None,
            type_name: None,
        }
    }

    /// An array type over `element`, named `type_name` in DDL.
    pub fn array(code: i32, element: Arc<JdbcType>, type_name: impl Into<String>) -> Self {
        Self {
            code,
            element: Some(element),
            type_name: Some(type_name.into()),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn element(&self) -> Option<&Arc<JdbcType>> {
        self.element.as_ref()
    }

    pub fn is_array(&self) -> bool {
        self.element.is_some()
    }

    /// The name assigned at construction, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// The name of this type in DDL for `dialect`.
    pub fn ddl_type_name(&self, dialect: Dialect) -> Option<String> {
        self.type_name
            .clone()
            .or_else(|| dialect.column_type_name(self.code).map(str::to_string))
    }
}

impl fmt::Display for JdbcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(element) => write!(f, "{}<{}>", codes::name(self.code), element),
            None => f.write_str(codes::name(self.code)),
        }
    }
}

/// Column metadata known at mapping time (explicit DDL type, nullability, size).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ColumnTypeInformation {
    pub type_name: Option<String>,
    pub nullable: Option<bool>,
    pub column_size: Option<u32>,
}

impl ColumnTypeInformation {
    pub const EMPTY: ColumnTypeInformation = ColumnTypeInformation {
        type_name: None,
        nullable: None,
        column_size: None,
    };

    /// Column information carrying only an explicit type name.
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }
}

/// Context consulted when recommending and resolving JDBC types.
pub trait JdbcTypeIndicators {
    fn type_configuration(&self) -> &TypeConfiguration;

    fn dialect(&self) -> Dialect {
        self.type_configuration().dialect()
    }

    fn preferred_sql_type_code_for_boolean(&self) -> i32 {
        self.type_configuration().preferred_boolean_type_code()
    }

    fn preferred_sql_type_code_for_array(&self) -> i32 {
        self.type_configuration().preferred_array_type_code()
    }

    /// Code requested explicitly by the mapping; defaults to the preferred
    /// array code.
    fn explicit_jdbc_type_code(&self) -> i32 {
        self.preferred_sql_type_code_for_array()
    }
}

/// Indicators for a single attribute mapping.
#[derive(Debug, Clone, Copy)]
pub struct MappingIndicators<'a> {
    config: &'a TypeConfiguration,
    explicit_type_code: Option<i32>,
}

impl<'a> MappingIndicators<'a> {
    pub fn new(config: &'a TypeConfiguration) -> Self {
        Self {
            config,
            explicit_type_code: None,
        }
    }

    /// Force a storage type code for the mapped attribute.
    pub fn explicit_type_code(mut self, code: i32) -> Self {
        self.explicit_type_code = Some(code);
        self
    }
}

impl JdbcTypeIndicators for MappingIndicators<'_> {
    fn type_configuration(&self) -> &TypeConfiguration {
        self.config
    }

    fn explicit_jdbc_type_code(&self) -> i32 {
        self.explicit_type_code
            .unwrap_or_else(|| self.preferred_sql_type_code_for_array())
    }
}

/// Builds parameterized JDBC types for a type code.
pub trait JdbcTypeConstructor: fmt::Debug + Send + Sync {
    /// The code this constructor is registered under.
    fn default_type_code(&self) -> i32;

    fn resolve_type(
        &self,
        config: &TypeConfiguration,
        dialect: Dialect,
        element_type: &BasicType,
        column: &ColumnTypeInformation,
    ) -> Result<Arc<JdbcType>>;
}

/// Constructor for SQL `ARRAY` types.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayJdbcTypeConstructor;

impl JdbcTypeConstructor for ArrayJdbcTypeConstructor {
    fn default_type_code(&self) -> i32 {
        codes::ARRAY
    }

    fn resolve_type(
        &self,
        config: &TypeConfiguration,
        dialect: Dialect,
        element_type: &BasicType,
        column: &ColumnTypeInformation,
    ) -> Result<Arc<JdbcType>> {
        let element = element_type.jdbc_type();
        let type_name = array_type_name(dialect, element, column)?;
        let candidate = JdbcType::array(codes::ARRAY, Arc::clone(element), type_name);
        Ok(config.jdbc_type_registry().intern(candidate))
    }
}

/// DDL name of an array over `element`.
///
/// Oracle arrays are user-defined named types (`INTEGER_ARRAY`); an explicit
/// column type name overrides the derived one but must be a plain identifier.
fn array_type_name(
    dialect: Dialect,
    element: &JdbcType,
    column: &ColumnTypeInformation,
) -> Result<String> {
    if let Some(explicit) = &column.type_name {
        if dialect == Dialect::Oracle && !is_plain_type_name(explicit) {
            return Err(Error::Config(ConfigError::new(format!(
                "'{explicit}' is not a valid Oracle array type name"
            ))));
        }
        return Ok(explicit.clone());
    }

    let element_ddl = || {
        element.ddl_type_name(dialect).ok_or_else(|| {
            Error::Mapping(
                MappingError::new(
                    MappingErrorKind::UnknownTypeCode,
                    format!("no {} column type for array elements", dialect),
                )
                .with_type(element.to_string()),
            )
        })
    };

    match dialect {
        Dialect::Oracle => Ok(format!("{}_ARRAY", codes::name(element.code()))),
        Dialect::Postgres => Ok(format!("{}[]", element_ddl()?)),
        Dialect::H2 => Ok(format!("{} array", element_ddl()?)),
        Dialect::Mysql | Dialect::Sqlite => Err(Error::Config(ConfigError::new(format!(
            "{} has no array column type",
            dialect
        )))),
    }
}

/// Registry of JDBC type descriptors and constructors, keyed by type code.
#[derive(Debug, Default)]
pub struct JdbcTypeRegistry {
    descriptors: RwLock<HashMap<i32, Arc<JdbcType>>>,
    constructors: RwLock<HashMap<i32, Arc<dyn JdbcTypeConstructor>>>,
    constructed: RwLock<HashMap<JdbcType, Arc<JdbcType>>>,
}

impl JdbcTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with descriptors for the standard codes and the
    /// `ARRAY` constructor.
    pub fn with_standard_types() -> Self {
        let registry = Self::new();
        for &code in codes::STANDARD {
            registry.add_descriptor(JdbcType::new(code));
        }
        registry.add_constructor(Arc::new(ArrayJdbcTypeConstructor));
        registry
    }

    /// Register a descriptor under its code, returning the canonical one.
    pub fn add_descriptor(&self, jdbc_type: JdbcType) -> Arc<JdbcType> {
        let mut descriptors = self.descriptors.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            descriptors
                .entry(jdbc_type.code())
                .or_insert_with(|| Arc::new(jdbc_type)),
        )
    }

    pub fn add_constructor(&self, constructor: Arc<dyn JdbcTypeConstructor>) {
        let code = constructor.default_type_code();
        let mut constructors = self.constructors.write().unwrap_or_else(|e| e.into_inner());
        constructors.entry(code).or_insert(constructor);
    }

    pub fn find_descriptor(&self, code: i32) -> Option<Arc<JdbcType>> {
        let descriptors = self.descriptors.read().unwrap_or_else(|e| e.into_inner());
        descriptors.get(&code).cloned()
    }

    /// Look up the descriptor for `code`, failing if none is registered.
    pub fn descriptor(&self, code: i32) -> Result<Arc<JdbcType>> {
        self.find_descriptor(code).ok_or_else(|| {
            Error::Mapping(MappingError::new(
                MappingErrorKind::UnknownTypeCode,
                format!("no JDBC type registered for code {code}"),
            ))
        })
    }

    pub fn constructor(&self, code: i32) -> Option<Arc<dyn JdbcTypeConstructor>> {
        let constructors = self.constructors.read().unwrap_or_else(|e| e.into_inner());
        constructors.get(&code).cloned()
    }

    /// Can `code` be resolved at all, by constructor or descriptor?
    pub fn is_known(&self, code: i32) -> bool {
        self.constructor(code).is_some() || self.find_descriptor(code).is_some()
    }

    /// Return the canonical instance structurally equal to `jdbc_type`.
    pub fn intern(&self, jdbc_type: JdbcType) -> Arc<JdbcType> {
        {
            let constructed = self.constructed.read().unwrap_or_else(|e| e.into_inner());
            if let Some(existing) = constructed.get(&jdbc_type) {
                return Arc::clone(existing);
            }
        }
        let mut constructed = self.constructed.write().unwrap_or_else(|e| e.into_inner());
        let canonical = constructed.entry(jdbc_type.clone()).or_insert_with(|| {
            tracing::debug!(jdbc_type = %jdbc_type, name = ?jdbc_type.type_name(), "Constructed JDBC type");
            Arc::new(jdbc_type)
        });
        Arc::clone(canonical)
    }

    /// Number of interned constructed types.
    pub fn constructed_count(&self) -> usize {
        self.constructed
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Resolve the JDBC type storing arrays of `element_type` as `code`.
///
/// Uses the constructor registered for `code`; without one, falls back to a
/// plain descriptor (e.g. arrays serialized to VARBINARY).
pub fn array_jdbc_type(
    config: &TypeConfiguration,
    dialect: Dialect,
    code: i32,
    element_type: &BasicType,
    column: &ColumnTypeInformation,
) -> Result<Arc<JdbcType>> {
    let registry = config.jdbc_type_registry();
    if let Some(constructor) = registry.constructor(code) {
        return constructor.resolve_type(config, dialect, element_type, column);
    }
    tracing::debug!(
        code = code,
        code_name = codes::name(code),
        element = %element_type.name(),
        "No JDBC type constructor, falling back to descriptor lookup"
    );
    registry.descriptor(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let element = Arc::new(JdbcType::new(codes::INTEGER));
        let array = JdbcType::array(codes::ARRAY, element, "INTEGER_ARRAY");
        assert_eq!(array.to_string(), "ARRAY<INTEGER>");
        assert!(array.is_array());
        assert_eq!(array.type_name(), Some("INTEGER_ARRAY"));
    }

    #[test]
    fn test_ddl_type_name_prefers_constructed_name() {
        let plain = JdbcType::new(codes::INTEGER);
        assert_eq!(
            plain.ddl_type_name(Dialect::Postgres).as_deref(),
            Some("integer")
        );

        let named = JdbcType::array(codes::ARRAY, Arc::new(plain), "integer[]");
        assert_eq!(
            named.ddl_type_name(Dialect::Postgres).as_deref(),
            Some("integer[]")
        );
    }

    #[test]
    fn test_standard_registry() {
        let registry = JdbcTypeRegistry::with_standard_types();
        assert!(registry.find_descriptor(codes::VARBINARY).is_some());
        assert!(registry.find_descriptor(codes::ARRAY).is_none());
        assert!(registry.constructor(codes::ARRAY).is_some());
        assert!(registry.is_known(codes::ARRAY));
        assert!(!registry.is_known(4242));
    }

    #[test]
    fn test_unknown_code_is_mapping_error() {
        let registry = JdbcTypeRegistry::with_standard_types();
        let err = registry.descriptor(4242).unwrap_err();
        assert_eq!(err.mapping_kind(), Some(MappingErrorKind::UnknownTypeCode));
    }

    #[test]
    fn test_intern_returns_canonical_instance() {
        let registry = JdbcTypeRegistry::new();
        let element = Arc::new(JdbcType::new(codes::CHAR));
        let a = registry.intern(JdbcType::array(codes::ARRAY, Arc::clone(&element), "CHAR_ARRAY"));
        let b = registry.intern(JdbcType::array(codes::ARRAY, element, "CHAR_ARRAY"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.constructed_count(), 1);
    }

    #[test]
    fn test_array_type_names_per_dialect() {
        let element = JdbcType::new(codes::INTEGER);
        let empty = ColumnTypeInformation::EMPTY;
        assert_eq!(
            array_type_name(Dialect::Oracle, &element, &empty).unwrap(),
            "INTEGER_ARRAY"
        );
        assert_eq!(
            array_type_name(Dialect::Postgres, &element, &empty).unwrap(),
            "integer[]"
        );
        assert_eq!(
            array_type_name(Dialect::H2, &element, &empty).unwrap(),
            "integer array"
        );
        assert!(array_type_name(Dialect::Mysql, &element, &empty).is_err());
    }

    #[test]
    fn test_explicit_oracle_array_name_is_validated() {
        let element = JdbcType::new(codes::INTEGER);
        let named = ColumnTypeInformation::named("SCORES_T");
        assert_eq!(
            array_type_name(Dialect::Oracle, &element, &named).unwrap(),
            "SCORES_T"
        );

        let bad = ColumnTypeInformation::named("scores t");
        let err = array_type_name(Dialect::Oracle, &element, &bad).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
