//! SQL rendering for ormtype.
//!
//! Renders already-resolved expression trees into dialect-specific SQL:
//!
//! - `Expression`, the resolved SQL AST node
//! - `SqlAppender`, the append-only text sink renderers write into
//! - `SqlAstTranslator`, which walks expressions and collects bound parameters
//! - `FunctionRegistry`, the per-dialect table of function renderers
//! - `SoftDeleteMapping`, implicit soft-delete predicates and assignments

pub mod appender;
pub mod ast;
pub mod function;
pub mod literal;
pub mod soft_delete;
pub mod translator;

pub use appender::SqlAppender;
pub use ast::Expression;
pub use function::array::{ArrayContainsAllFunction, ArrayFunctionVariant, ArrayOverlapsFunction};
pub use function::{FunctionRegistry, FunctionRenderer};
pub use literal::render_literal;
pub use soft_delete::{SoftDelete, SoftDeleteMapping, SoftDeleteType};
pub use translator::{SqlAstTranslator, SqlAstWalker};
