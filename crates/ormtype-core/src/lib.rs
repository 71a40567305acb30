//! Core types for ormtype.
//!
//! This crate provides the foundations shared by type resolution and SQL
//! rendering:
//!
//! - `Error` and `Result` for every fallible operation
//! - `Value`, the dynamic representation converters operate on
//! - `codes`, the SQL type code constants
//! - `Dialect`, the database capability and syntax provider

pub mod dialect;
pub mod error;
pub mod identifiers;
pub mod types;
pub mod value;

pub use dialect::Dialect;
pub use error::{
    ConfigError, Error, MappingError, MappingErrorKind, RenderError, RenderErrorKind, Result,
    TypeError,
};
pub use identifiers::{is_plain_type_name, quote_ident, quote_ident_mysql};
pub use types::codes;
pub use value::Value;
