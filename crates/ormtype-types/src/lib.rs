//! Type resolution for ormtype.
//!
//! - `DomainType` descriptors and the `DomainTypeRegistry`
//! - `JdbcType`, constructors and the `JdbcTypeRegistry`
//! - `BasicType` and the interning `BasicTypeRegistry`
//! - `ValueConverter` implementations, including `ArrayConverter`
//! - `TypeConfiguration`, which owns all three registries

pub mod basic;
pub mod config;
pub mod converter;
pub mod domain;
pub mod jdbc;
pub mod plural;

pub use basic::{BasicType, BasicTypeKind, BasicTypeRegistry};
pub use config::{TypeConfiguration, TypeSettings};
pub use converter::{ArrayConverter, BooleanConverter, BooleanStorage, ValueConverter};
pub use domain::{
    CollectionKind, DomainType, DomainTypeRegistry, ElementTyped, JdbcRecommendation,
    MutabilityPlan, PluralDomainType, Resolvable, ScalarDomainType, TypeKey, WidenessComparable,
};
pub use jdbc::{
    ArrayJdbcTypeConstructor, ColumnTypeInformation, JdbcType, JdbcTypeConstructor,
    JdbcTypeIndicators, JdbcTypeRegistry, MappingIndicators, array_jdbc_type,
};
pub use plural::{ArrayDomainType, CollectionDomainType, PluralFamily, resolve_plural};
