//! Session factory: the shared type configuration and function registry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ormtype_core::{ConfigError, Dialect, Error, Result};
use ormtype_sql::{FunctionRegistry, SoftDelete, SoftDeleteMapping, SqlAstTranslator};
use ormtype_types::{BasicType, TypeConfiguration, TypeKey, TypeSettings};

/// Serializable session factory settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionFactoryConfig {
    pub dialect: Dialect,
    pub types: TypeSettings,
}

impl SessionFactoryConfig {
    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid session factory settings: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }
}

/// Owns the type configuration and the dialect's function renderers.
///
/// Cheap to share: the type configuration sits behind an `Arc` and its
/// registries are safe to resolve against from many threads.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    config: Arc<TypeConfiguration>,
    functions: Arc<FunctionRegistry>,
}

impl SessionFactory {
    /// A factory with the dialect's default type preferences.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            config: Arc::new(TypeConfiguration::new(dialect)),
            functions: Arc::new(FunctionRegistry::for_dialect(dialect)),
        }
    }

    pub fn builder() -> SessionFactoryBuilder {
        SessionFactoryBuilder::new()
    }

    /// Build a factory from serialized settings.
    pub fn from_config(config: SessionFactoryConfig) -> Result<Self> {
        Self::builder()
            .dialect(config.dialect)
            .settings(config.types)
            .build()
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect()
    }

    pub fn type_configuration(&self) -> &Arc<TypeConfiguration> {
        &self.config
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Resolve the basic type for `key`.
    pub fn resolve_basic_type(&self, key: &TypeKey) -> Result<Arc<BasicType>> {
        self.config.resolve_basic_type(key)
    }

    /// Resolve a soft-delete mapping for `table_name`.
    pub fn soft_delete_mapping(
        &self,
        table_name: impl Into<String>,
        soft_delete: &SoftDelete,
    ) -> Result<SoftDeleteMapping> {
        SoftDeleteMapping::resolve(&self.config, table_name, soft_delete)
    }

    /// A translator for rendering one statement.
    pub fn translator(&self) -> SqlAstTranslator<'_> {
        SqlAstTranslator::new(&self.config, &self.functions)
    }
}

/// Builder for [`SessionFactory`].
#[derive(Debug, Clone, Default)]
pub struct SessionFactoryBuilder {
    dialect: Dialect,
    settings: TypeSettings,
}

impl SessionFactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn settings(mut self, settings: TypeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<SessionFactory> {
        let config = TypeConfiguration::with_settings(self.dialect, self.settings)?;
        tracing::debug!(dialect = %self.dialect, "Built session factory");
        Ok(SessionFactory {
            config: Arc::new(config),
            functions: Arc::new(FunctionRegistry::for_dialect(self.dialect)),
        })
    }
}
