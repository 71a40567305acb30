//! Expression translator.
//!
//! Walks a resolved expression tree and appends dialect-specific SQL to a
//! caller-owned buffer, collecting bound parameter values in render order.
//! Function calls are rendered into a scratch buffer first so a failing
//! renderer never leaves a partial fragment behind.

use std::sync::Arc;

use ormtype_core::{Dialect, Result, Value};
use ormtype_types::{BasicType, TypeConfiguration};

use crate::appender::SqlAppender;
use crate::ast::Expression;
use crate::function::FunctionRegistry;
use crate::literal::render_literal;

/// The walker handed to function renderers.
pub trait SqlAstWalker {
    /// Type configuration of the session factory being rendered for.
    fn type_configuration(&self) -> &TypeConfiguration;

    fn dialect(&self) -> Dialect {
        self.type_configuration().dialect()
    }

    /// Render an argument expression into `sql`.
    fn render(&mut self, expression: &Expression, sql: &mut dyn SqlAppender) -> Result<()>;
}

/// Renders expressions for one statement.
#[derive(Debug)]
pub struct SqlAstTranslator<'a> {
    config: &'a TypeConfiguration,
    functions: &'a FunctionRegistry,
    params: Vec<Value>,
    param_offset: usize,
}

impl<'a> SqlAstTranslator<'a> {
    pub fn new(config: &'a TypeConfiguration, functions: &'a FunctionRegistry) -> Self {
        Self {
            config,
            functions,
            params: Vec::new(),
            param_offset: 0,
        }
    }

    /// Number placeholders after `offset` parameters already bound elsewhere.
    pub fn param_offset(mut self, offset: usize) -> Self {
        self.param_offset = offset;
        self
    }

    /// Parameters bound so far, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }

    /// Render `expression` into a new string.
    pub fn translate(&mut self, expression: &Expression) -> Result<String> {
        let mut sql = String::new();
        self.render(expression, &mut sql)?;
        tracing::trace!(sql = %sql, params = self.params.len(), "Rendered expression");
        Ok(sql)
    }

    fn render_function(
        &mut self,
        name: &str,
        args: &[Expression],
        return_type: Option<&Arc<BasicType>>,
        sql: &mut dyn SqlAppender,
    ) -> Result<()> {
        let functions = self.functions;
        let bound_before = self.params.len();
        let mut scratch = String::new();

        let rendered = match functions.get(name) {
            Some(renderer) => renderer.render(&mut scratch, args, return_type, self),
            None => self.render_generic_function(name, args, &mut scratch),
        };
        match rendered {
            Ok(()) => {
                sql.append_sql(&scratch);
                Ok(())
            }
            Err(e) => {
                self.params.truncate(bound_before);
                tracing::debug!(function = name, error = %e, "Function rendering failed");
                Err(e)
            }
        }
    }

    fn render_generic_function(
        &mut self,
        name: &str,
        args: &[Expression],
        sql: &mut dyn SqlAppender,
    ) -> Result<()> {
        sql.append_sql(name);
        sql.append_char('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                sql.append_sql(", ");
            }
            self.render(arg, sql)?;
        }
        sql.append_char(')');
        Ok(())
    }
}

impl SqlAstWalker for SqlAstTranslator<'_> {
    fn type_configuration(&self) -> &TypeConfiguration {
        self.config
    }

    fn render(&mut self, expression: &Expression, sql: &mut dyn SqlAppender) -> Result<()> {
        let dialect = self.config.dialect();
        match expression {
            Expression::Column {
                qualifier, name, ..
            } => {
                if let Some(q) = qualifier {
                    sql.append_sql(&dialect.quote_identifier(q));
                    sql.append_char('.');
                }
                sql.append_sql(&dialect.quote_identifier(name));
            }

            Expression::Literal { value, ty } => {
                let (relational, code) = match ty {
                    Some(ty) => (ty.to_relational(value)?, Some(ty.jdbc_type().code())),
                    None => (value.clone(), None),
                };
                sql.append_sql(&render_literal(&relational, code)?);
            }

            Expression::Parameter { value, ty } => {
                let relational = match ty {
                    Some(ty) => ty.to_relational(value)?,
                    None => value.clone(),
                };
                self.params.push(relational);
                sql.append_sql(&dialect.placeholder(self.param_offset + self.params.len()));
            }

            Expression::Function {
                name,
                args,
                return_type,
            } => self.render_function(name, args, return_type.as_ref(), sql)?,
        }
        Ok(())
    }
}
