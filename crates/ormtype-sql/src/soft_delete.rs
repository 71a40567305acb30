//! Soft delete.
//!
//! A soft-deleted row is marked rather than removed. The mapping resolves the
//! indicator column's storage once and then renders the implicit restriction
//! for queries and the assignment for delete statements.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ormtype_core::{Dialect, Error, MappingError, MappingErrorKind, Result, Value};
use ormtype_types::{BasicType, TypeConfiguration, TypeKey, ValueConverter};

use crate::literal::render_literal;

/// How the soft-delete indicator is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftDeleteType {
    /// Boolean column, true while the row is active
    Active,
    /// Boolean column, true once the row is deleted
    #[default]
    Deleted,
    /// Timestamp column, null while active and set to the deletion time
    Timestamp,
}

impl SoftDeleteType {
    pub const fn default_column_name(self) -> &'static str {
        match self {
            SoftDeleteType::Active => "active",
            SoftDeleteType::Deleted | SoftDeleteType::Timestamp => "deleted",
        }
    }
}

/// Soft-delete configuration for an entity hierarchy or collection table.
#[derive(Debug, Clone, Default)]
pub struct SoftDelete {
    column_name: Option<String>,
    strategy: SoftDeleteType,
    converter: Option<Arc<dyn ValueConverter>>,
}

impl SoftDelete {
    pub fn new(strategy: SoftDeleteType) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Override the indicator column name.
    pub fn column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    /// Store the boolean indicator through `converter`.
    pub fn converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn strategy(&self) -> SoftDeleteType {
        self.strategy
    }

    /// The configured column name, or the strategy's default.
    pub fn effective_column_name(&self) -> &str {
        self.column_name
            .as_deref()
            .unwrap_or_else(|| self.strategy.default_column_name())
    }
}

#[derive(Debug, Clone)]
enum Indicator {
    Flag {
        deleted: String,
        not_deleted: String,
    },
    Timestamp {
        now: &'static str,
    },
}

/// A resolved soft-delete mapping for one table.
#[derive(Debug, Clone)]
pub struct SoftDeleteMapping {
    dialect: Dialect,
    table_name: String,
    column_name: String,
    strategy: SoftDeleteType,
    basic_type: Arc<BasicType>,
    indicator: Indicator,
}

fn invalid(table: &str, message: impl Into<String>) -> Error {
    Error::Mapping(
        MappingError::new(MappingErrorKind::InvalidSoftDelete, message).with_type(table),
    )
}

impl SoftDeleteMapping {
    /// Resolve `soft_delete` for `table_name` against `config`.
    ///
    /// Fails if a converter is combined with the timestamp strategy, if the
    /// converter does not convert booleans, or if it maps either state to null.
    pub fn resolve(
        config: &TypeConfiguration,
        table_name: impl Into<String>,
        soft_delete: &SoftDelete,
    ) -> Result<Self> {
        let table_name = table_name.into();
        let dialect = config.dialect();
        let strategy = soft_delete.strategy();

        let (basic_type, indicator) = match (strategy, &soft_delete.converter) {
            (SoftDeleteType::Timestamp, Some(_)) => {
                return Err(invalid(
                    &table_name,
                    "a converter cannot be used with the timestamp strategy",
                ));
            }
            (SoftDeleteType::Timestamp, None) => (
                config.resolve_basic_type(&TypeKey::scalar("timestamp"))?,
                Indicator::Timestamp {
                    now: dialect.current_timestamp(),
                },
            ),
            (SoftDeleteType::Active | SoftDeleteType::Deleted, converter) => {
                let basic_type = match converter {
                    Some(converter) => {
                        if converter.domain_type().key() != &TypeKey::scalar("bool") {
                            return Err(invalid(
                                &table_name,
                                format!(
                                    "converter '{}' does not convert booleans",
                                    converter.name()
                                ),
                            ));
                        }
                        config.converted_basic_type(Arc::clone(converter))?
                    }
                    None => config.resolve_basic_type(&TypeKey::scalar("bool"))?,
                };
                let deleted_flag = strategy == SoftDeleteType::Deleted;
                let deleted = flag_literal(&table_name, &basic_type, deleted_flag)?;
                let not_deleted = flag_literal(&table_name, &basic_type, !deleted_flag)?;
                (basic_type, Indicator::Flag { deleted, not_deleted })
            }
        };

        let column_name = soft_delete.effective_column_name().to_string();
        tracing::debug!(
            table = %table_name,
            column = %column_name,
            strategy = ?strategy,
            basic_type = %basic_type,
            "Resolved soft delete mapping"
        );
        Ok(Self {
            dialect,
            table_name,
            column_name,
            strategy,
            basic_type,
            indicator,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn strategy(&self) -> SoftDeleteType {
        self.strategy
    }

    /// The resolved type of the indicator column.
    pub fn basic_type(&self) -> &Arc<BasicType> {
        &self.basic_type
    }

    fn qualified_column(&self, qualifier: Option<&str>) -> String {
        let column = self.dialect.quote_identifier(&self.column_name);
        match qualifier {
            Some(q) => format!("{}.{}", self.dialect.quote_identifier(q), column),
            None => column,
        }
    }

    /// Predicate selecting rows that are not soft-deleted.
    pub fn restriction(&self, qualifier: Option<&str>) -> String {
        let column = self.qualified_column(qualifier);
        match &self.indicator {
            Indicator::Flag { not_deleted, .. } => format!("{column}={not_deleted}"),
            Indicator::Timestamp { .. } => format!("{column} is null"),
        }
    }

    /// Assignment marking a row as deleted, for an `update ... set` clause.
    pub fn deletion_assignment(&self) -> String {
        let column = self.qualified_column(None);
        match &self.indicator {
            Indicator::Flag { deleted, .. } => format!("{column}={deleted}"),
            Indicator::Timestamp { now } => format!("{column}={now}"),
        }
    }

    /// Statement soft-deleting the row identified by `key_columns`, bound as
    /// parameters in order.
    pub fn soft_delete_statement(&self, key_columns: &[&str]) -> String {
        let mut sql = format!(
            "update {} set {} where ",
            self.dialect.quote_identifier(&self.table_name),
            self.deletion_assignment()
        );
        for (i, key) in key_columns.iter().enumerate() {
            sql.push_str(&self.dialect.quote_identifier(key));
            sql.push('=');
            sql.push_str(&self.dialect.placeholder(i + 1));
            sql.push_str(" and ");
        }
        sql.push_str(&self.restriction(None));
        tracing::trace!(sql = %sql, "Rendered soft delete statement");
        sql
    }
}

fn flag_literal(table: &str, basic_type: &BasicType, flag: bool) -> Result<String> {
    let relational = basic_type.to_relational(&Value::Bool(flag))?;
    if relational.is_null() {
        return Err(invalid(
            table,
            format!("soft-delete converter mapped {flag} to null"),
        ));
    }
    render_literal(&relational, Some(basic_type.jdbc_type().code()))
}
