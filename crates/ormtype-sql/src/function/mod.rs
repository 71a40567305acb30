//! Per-dialect function renderers.

pub mod array;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ormtype_core::{Dialect, Result};
use ormtype_types::BasicType;

use crate::appender::SqlAppender;
use crate::ast::Expression;
use crate::translator::SqlAstWalker;

/// Renders calls to one SQL function.
pub trait FunctionRenderer: fmt::Debug + Send + Sync {
    /// Name the function is registered and called under.
    fn name(&self) -> &str;

    /// Append the SQL for a call with `args` to `sql`.
    ///
    /// `return_type` is the call's resolved type; renderers that do not need
    /// it ignore it.
    fn render(
        &self,
        sql: &mut dyn SqlAppender,
        args: &[Expression],
        return_type: Option<&Arc<BasicType>>,
        walker: &mut dyn SqlAstWalker,
    ) -> Result<()>;
}

/// Function renderers registered for one dialect, keyed by function name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    dialect: Dialect,
    renderers: HashMap<String, Arc<dyn FunctionRenderer>>,
}

impl FunctionRegistry {
    /// An empty registry for `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            renderers: HashMap::new(),
        }
    }

    /// A registry holding the built-in renderers `dialect` supports.
    pub fn for_dialect(dialect: Dialect) -> Self {
        let mut registry = Self::new(dialect);
        array::register_array_functions(&mut registry);
        tracing::debug!(
            dialect = %dialect,
            functions = registry.len(),
            "Built function registry"
        );
        registry
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Register a renderer, replacing any renderer with the same name.
    pub fn register(
        &mut self,
        renderer: Arc<dyn FunctionRenderer>,
    ) -> Option<Arc<dyn FunctionRenderer>> {
        self.renderers.insert(renderer.name().to_string(), renderer)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FunctionRenderer>> {
        self.renderers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Registered function names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_dialects_register_all_variants() {
        for dialect in [Dialect::Oracle, Dialect::Postgres, Dialect::H2] {
            let registry = FunctionRegistry::for_dialect(dialect);
            assert_eq!(
                registry.names(),
                vec![
                    "array_contains_all",
                    "array_contains_all_nullable",
                    "array_overlaps",
                    "array_overlaps_nullable",
                ]
            );
        }
    }

    #[test]
    fn test_dialects_without_arrays_register_nothing() {
        assert!(FunctionRegistry::for_dialect(Dialect::Mysql).is_empty());
        assert!(FunctionRegistry::for_dialect(Dialect::Sqlite).is_empty());
    }
}
