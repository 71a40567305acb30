//! Array containment and overlap predicates.
//!
//! Neither predicate has a portable SQL spelling. Oracle needs stored
//! functions named after the array type (`INTEGER_ARRAY_contains_all`),
//! Postgres has operators, and the unnest form works wherever `unnest` does.
//!
//! The `nullable` flag is fixed when a renderer is built: nullable variants
//! match null needle elements against null haystack elements.

use std::sync::Arc;

use ormtype_core::{Dialect, Error, RenderError, RenderErrorKind, Result};
use ormtype_types::{BasicType, TypeConfiguration};

use super::{FunctionRegistry, FunctionRenderer};
use crate::appender::SqlAppender;
use crate::ast::Expression;
use crate::translator::SqlAstWalker;

/// How a dialect spells the array predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFunctionVariant {
    /// `<T>_contains_all(h,n,f)>0` stored functions
    Oracle,
    /// `@>` / `&&` operators, unnest form when nullable
    Postgres,
    /// Correlated subqueries over `unnest`
    Unnest,
}

impl ArrayFunctionVariant {
    /// The variant for `dialect`, or `None` if it has no array storage.
    pub const fn for_dialect(dialect: Dialect) -> Option<Self> {
        match dialect {
            Dialect::Oracle => Some(ArrayFunctionVariant::Oracle),
            Dialect::Postgres => Some(ArrayFunctionVariant::Postgres),
            Dialect::H2 => Some(ArrayFunctionVariant::Unnest),
            Dialect::Mysql | Dialect::Sqlite => None,
        }
    }
}

pub(crate) fn register_array_functions(registry: &mut FunctionRegistry) {
    let Some(variant) = ArrayFunctionVariant::for_dialect(registry.dialect()) else {
        return;
    };
    for nullable in [false, true] {
        registry.register(Arc::new(ArrayContainsAllFunction::new(variant, nullable)));
        registry.register(Arc::new(ArrayOverlapsFunction::new(variant, nullable)));
    }
}

/// `array_contains_all(haystack, needle)`: every needle element is in the haystack.
#[derive(Debug, Clone)]
pub struct ArrayContainsAllFunction {
    variant: ArrayFunctionVariant,
    nullable: bool,
}

impl ArrayContainsAllFunction {
    pub fn new(variant: ArrayFunctionVariant, nullable: bool) -> Self {
        Self { variant, nullable }
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

impl FunctionRenderer for ArrayContainsAllFunction {
    fn name(&self) -> &str {
        if self.nullable {
            "array_contains_all_nullable"
        } else {
            "array_contains_all"
        }
    }

    fn render(
        &self,
        sql: &mut dyn SqlAppender,
        args: &[Expression],
        _return_type: Option<&Arc<BasicType>>,
        walker: &mut dyn SqlAstWalker,
    ) -> Result<()> {
        let (haystack, needle) = binary_args(self.name(), args)?;
        match self.variant {
            ArrayFunctionVariant::Oracle => {
                let type_name =
                    array_type_name(self.name(), haystack, walker.type_configuration())?;
                render_stored_function(
                    sql,
                    &type_name,
                    "_contains_all(",
                    haystack,
                    needle,
                    self.nullable,
                    walker,
                )?;
            }
            ArrayFunctionVariant::Postgres if !self.nullable => {
                walker.render(haystack, sql)?;
                sql.append_sql("@>");
                walker.render(needle, sql)?;
            }
            ArrayFunctionVariant::Postgres | ArrayFunctionVariant::Unnest => {
                sql.append_sql("not exists(select 1 from unnest(");
                walker.render(needle, sql)?;
                sql.append_sql(") t(i) where not exists(select 1 from unnest(");
                walker.render(haystack, sql)?;
                sql.append_sql(") s(j) where ");
                sql.append_sql(element_match(self.nullable));
                sql.append_sql("))");
            }
        }
        tracing::trace!(function = self.name(), variant = ?self.variant, "Rendered array predicate");
        Ok(())
    }
}

/// `array_overlaps(haystack, needle)`: the arrays share at least one element.
#[derive(Debug, Clone)]
pub struct ArrayOverlapsFunction {
    variant: ArrayFunctionVariant,
    nullable: bool,
}

impl ArrayOverlapsFunction {
    pub fn new(variant: ArrayFunctionVariant, nullable: bool) -> Self {
        Self { variant, nullable }
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

impl FunctionRenderer for ArrayOverlapsFunction {
    fn name(&self) -> &str {
        if self.nullable {
            "array_overlaps_nullable"
        } else {
            "array_overlaps"
        }
    }

    fn render(
        &self,
        sql: &mut dyn SqlAppender,
        args: &[Expression],
        _return_type: Option<&Arc<BasicType>>,
        walker: &mut dyn SqlAstWalker,
    ) -> Result<()> {
        let (haystack, needle) = binary_args(self.name(), args)?;
        match self.variant {
            ArrayFunctionVariant::Oracle => {
                // Named after the haystack only; the needle may be a differently
                // converted representation.
                let type_name =
                    array_type_name(self.name(), haystack, walker.type_configuration())?;
                render_stored_function(
                    sql,
                    &type_name,
                    "_overlaps(",
                    haystack,
                    needle,
                    self.nullable,
                    walker,
                )?;
            }
            ArrayFunctionVariant::Postgres if !self.nullable => {
                walker.render(haystack, sql)?;
                sql.append_sql("&&");
                walker.render(needle, sql)?;
            }
            ArrayFunctionVariant::Postgres | ArrayFunctionVariant::Unnest => {
                sql.append_sql("exists(select 1 from unnest(");
                walker.render(needle, sql)?;
                sql.append_sql(") t(i) join unnest(");
                walker.render(haystack, sql)?;
                sql.append_sql(") s(j) on ");
                sql.append_sql(element_match(self.nullable));
                sql.append_char(')');
            }
        }
        tracing::trace!(function = self.name(), variant = ?self.variant, "Rendered array predicate");
        Ok(())
    }
}

fn binary_args<'e>(
    function: &str,
    args: &'e [Expression],
) -> Result<(&'e Expression, &'e Expression)> {
    match args {
        [haystack, needle] => Ok((haystack, needle)),
        _ => Err(Error::Render(
            RenderError::new(
                RenderErrorKind::Arity,
                format!("expected 2 arguments, got {}", args.len()),
            )
            .in_function(function),
        )),
    }
}

/// The dialect type name of the haystack's array type.
fn array_type_name(
    function: &str,
    haystack: &Expression,
    config: &TypeConfiguration,
) -> Result<String> {
    let ty = haystack.expression_type().ok_or_else(|| {
        Error::Render(
            RenderError::new(
                RenderErrorKind::MissingExpressionType,
                "haystack argument has no resolved type",
            )
            .in_function(function),
        )
    })?;
    let jdbc_type = ty.jdbc_type();
    let not_an_array = || {
        Error::Render(
            RenderError::new(
                RenderErrorKind::NotAnArray,
                format!("haystack type '{}' is not an array type", ty.name()),
            )
            .in_function(function),
        )
    };
    if !jdbc_type.is_array() {
        return Err(not_an_array());
    }
    jdbc_type
        .ddl_type_name(config.dialect())
        .ok_or_else(not_an_array)
}

fn render_stored_function(
    sql: &mut dyn SqlAppender,
    type_name: &str,
    suffix: &str,
    haystack: &Expression,
    needle: &Expression,
    nullable: bool,
    walker: &mut dyn SqlAstWalker,
) -> Result<()> {
    sql.append_sql(type_name);
    sql.append_sql(suffix);
    walker.render(haystack, sql)?;
    sql.append_char(',');
    walker.render(needle, sql)?;
    sql.append_char(',');
    sql.append_char(if nullable { '1' } else { '0' });
    sql.append_sql(")>0");
    Ok(())
}

const fn element_match(nullable: bool) -> &'static str {
    if nullable {
        "s.j is not distinct from t.i"
    } else {
        "s.j=t.i"
    }
}
