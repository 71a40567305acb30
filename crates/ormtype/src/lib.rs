//! ormtype - type resolution and dialect-specific SQL rendering.
//!
//! Given a logical value type and a target database, ormtype determines the
//! storage type, builds the matching basic type (with value conversion when
//! one is configured), and renders SQL for operations without a portable
//! spelling: array containment and overlap, and soft-delete predicates.
//!
//! # Quick Start
//!
//! ```
//! use ormtype::prelude::*;
//!
//! let factory = SessionFactory::new(Dialect::Oracle);
//! let scores = factory
//!     .resolve_basic_type(&TypeKey::array_of(TypeKey::scalar("i32")))
//!     .unwrap();
//!
//! let call = Expression::function(
//!     "array_contains_all",
//!     vec![
//!         Expression::qualified("e", "scores").typed(scores.clone()),
//!         Expression::param(vec![1_i32, 2]).typed(scores),
//!     ],
//! );
//! let sql = factory.translator().translate(&call).unwrap();
//! assert_eq!(sql, r#"INTEGER_ARRAY_contains_all("e"."scores",?,0)>0"#);
//! ```

pub mod session;

pub use ormtype_core::{
    ConfigError, Dialect, Error, MappingError, MappingErrorKind, RenderError, RenderErrorKind,
    Result, TypeError, Value, codes,
};
pub use ormtype_sql::{
    ArrayContainsAllFunction, ArrayFunctionVariant, ArrayOverlapsFunction, Expression,
    FunctionRegistry, FunctionRenderer, SoftDelete, SoftDeleteMapping, SoftDeleteType,
    SqlAppender, SqlAstTranslator, SqlAstWalker, render_literal,
};
pub use ormtype_types::{
    ArrayConverter, ArrayDomainType, BasicType, BasicTypeKind, BasicTypeRegistry,
    BooleanConverter, BooleanStorage, CollectionDomainType, CollectionKind,
    ColumnTypeInformation, DomainType, DomainTypeRegistry, JdbcType, JdbcTypeConstructor,
    JdbcTypeIndicators, JdbcTypeRegistry, MappingIndicators, PluralDomainType, ScalarDomainType,
    TypeConfiguration, TypeKey, TypeSettings, ValueConverter, WidenessComparable,
};
pub use session::{SessionFactory, SessionFactoryBuilder, SessionFactoryConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        BasicType, ColumnTypeInformation, Dialect, DomainType, Error, Expression,
        FunctionRenderer, Result, SessionFactory, SoftDelete, SoftDeleteType, SqlAstWalker,
        TypeConfiguration, TypeKey, TypeSettings, Value, ValueConverter,
    };
}
