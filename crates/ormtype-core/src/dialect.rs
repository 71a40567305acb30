//! Database dialect capabilities.
//!
//! A `Dialect` answers the questions type resolution and rendering need to
//! ask about a database: which type codes it prefers for booleans and arrays,
//! what a type code is called in DDL, and how identifiers and parameters are
//! written.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};
use crate::identifiers::{quote_ident, quote_ident_mysql};
use crate::types::codes;

/// SQL dialect for generating dialect-specific SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL dialect (uses $1, $2 placeholders)
    #[default]
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    /// SQLite dialect (uses ?1, ?2 placeholders)
    Sqlite,
    /// MySQL dialect (uses ? placeholders)
    #[serde(alias = "mariadb")]
    Mysql,
    /// Oracle dialect (named array types, no native BOOLEAN column type)
    Oracle,
    /// H2 dialect (standard arrays)
    H2,
}

impl Dialect {
    /// Lower-case dialect name, used in logs and settings.
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Oracle => "oracle",
            Dialect::H2 => "h2",
        }
    }

    /// Generate a placeholder for the given parameter index (1-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => format!("?{index}"),
            Dialect::Mysql | Dialect::Oracle | Dialect::H2 => "?".to_string(),
        }
    }

    /// Quote an identifier for this dialect.
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::Mysql => quote_ident_mysql(name),
            Dialect::Postgres | Dialect::Sqlite | Dialect::Oracle | Dialect::H2 => {
                quote_ident(name)
            }
        }
    }

    /// Whether the database has a first-class SQL ARRAY column type.
    pub const fn supports_standard_arrays(self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::Oracle | Dialect::H2)
    }

    /// Type code used to store booleans when no explicit mapping is given.
    pub const fn preferred_sql_type_code_for_boolean(self) -> i32 {
        match self {
            Dialect::Postgres | Dialect::Sqlite | Dialect::H2 => codes::BOOLEAN,
            Dialect::Mysql | Dialect::Oracle => codes::BIT,
        }
    }

    /// Type code used to store arrays when no explicit mapping is given.
    ///
    /// Databases without array columns store arrays as serialized binary.
    pub const fn preferred_sql_type_code_for_array(self) -> i32 {
        if self.supports_standard_arrays() {
            codes::ARRAY
        } else {
            codes::VARBINARY
        }
    }

    /// DDL name of a column type code, or `None` if the dialect has no
    /// fixed name for it (arrays are named by their constructor).
    pub const fn column_type_name(self, code: i32) -> Option<&'static str> {
        let name = match self {
            Dialect::Postgres => match code {
                codes::BOOLEAN => "boolean",
                codes::BIT => "bit",
                codes::TINYINT | codes::SMALLINT => "smallint",
                codes::INTEGER => "integer",
                codes::BIGINT => "bigint",
                codes::REAL => "real",
                codes::DOUBLE => "double precision",
                codes::NUMERIC | codes::DECIMAL => "numeric",
                codes::CHAR => "char(1)",
                codes::VARCHAR => "varchar(255)",
                codes::VARBINARY => "bytea",
                codes::DATE => "date",
                codes::TIME => "time",
                codes::TIMESTAMP => "timestamp",
                codes::UUID => "uuid",
                codes::JSON => "jsonb",
                _ => return None,
            },
            Dialect::Oracle => match code {
                codes::BOOLEAN | codes::BIT => "number(1,0)",
                codes::TINYINT => "number(3,0)",
                codes::SMALLINT => "number(5,0)",
                codes::INTEGER => "number(10,0)",
                codes::BIGINT => "number(19,0)",
                codes::REAL => "float(24)",
                codes::DOUBLE => "float(53)",
                codes::NUMERIC | codes::DECIMAL => "number",
                codes::CHAR => "char(1 char)",
                codes::VARCHAR => "varchar2(255 char)",
                codes::VARBINARY => "raw(255)",
                codes::DATE | codes::TIME => "date",
                codes::TIMESTAMP => "timestamp",
                codes::UUID => "raw(16)",
                codes::JSON => "json",
                _ => return None,
            },
            Dialect::Mysql => match code {
                codes::BOOLEAN | codes::BIT => "bit",
                codes::TINYINT => "tinyint",
                codes::SMALLINT => "smallint",
                codes::INTEGER => "integer",
                codes::BIGINT => "bigint",
                codes::REAL => "float",
                codes::DOUBLE => "double precision",
                codes::NUMERIC | codes::DECIMAL => "decimal",
                codes::CHAR => "char(1)",
                codes::VARCHAR => "varchar(255)",
                codes::VARBINARY => "varbinary(255)",
                codes::DATE => "date",
                codes::TIME => "time",
                codes::TIMESTAMP => "datetime(6)",
                codes::UUID => "binary(16)",
                codes::JSON => "json",
                _ => return None,
            },
            Dialect::Sqlite => match code {
                codes::BOOLEAN => "boolean",
                codes::BIT | codes::TINYINT | codes::SMALLINT | codes::INTEGER | codes::BIGINT => {
                    "integer"
                }
                codes::REAL => "real",
                codes::DOUBLE => "double",
                codes::NUMERIC | codes::DECIMAL => "numeric",
                codes::CHAR => "char(1)",
                codes::VARCHAR => "varchar(255)",
                codes::VARBINARY | codes::UUID => "blob",
                codes::DATE => "date",
                codes::TIME => "time",
                codes::TIMESTAMP => "timestamp",
                codes::JSON => "text",
                _ => return None,
            },
            Dialect::H2 => match code {
                codes::BOOLEAN => "boolean",
                codes::BIT => "bit",
                codes::TINYINT => "tinyint",
                codes::SMALLINT => "smallint",
                codes::INTEGER => "integer",
                codes::BIGINT => "bigint",
                codes::REAL => "real",
                codes::DOUBLE => "double precision",
                codes::NUMERIC | codes::DECIMAL => "numeric",
                codes::CHAR => "char(1)",
                codes::VARCHAR => "varchar(255)",
                codes::VARBINARY => "varbinary(255)",
                codes::DATE => "date",
                codes::TIME => "time",
                codes::TIMESTAMP => "timestamp",
                codes::UUID => "uuid",
                codes::JSON => "json",
                _ => return None,
            },
        };
        Some(name)
    }

    /// SQL expression for the current timestamp.
    pub const fn current_timestamp(self) -> &'static str {
        match self {
            Dialect::Mysql => "current_timestamp(6)",
            Dialect::Postgres | Dialect::Sqlite | Dialect::Oracle | Dialect::H2 => {
                "current_timestamp"
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "oracle" => Ok(Dialect::Oracle),
            "h2" => Ok(Dialect::H2),
            other => Err(Error::Config(ConfigError::new(format!(
                "unknown dialect '{other}'"
            )))),
        }
    }
}
