//! SQL type codes.
//!
//! Column types are identified by integer codes following the JDBC
//! numbering, so codes read from driver metadata can be used directly.

/// SQL type code constants.
pub mod codes {
    /// Single bit, commonly used for booleans on databases without BOOLEAN
    pub const BIT: i32 = -7;

    /// 1-byte signed integer
    pub const TINYINT: i32 = -6;

    /// 2-byte signed integer
    pub const SMALLINT: i32 = 5;

    /// 4-byte signed integer
    pub const INTEGER: i32 = 4;

    /// 8-byte signed integer
    pub const BIGINT: i32 = -5;

    /// Single-precision floating point
    pub const REAL: i32 = 7;

    /// Double-precision floating point
    pub const DOUBLE: i32 = 8;

    /// Exact numeric
    pub const NUMERIC: i32 = 2;

    /// Exact decimal
    pub const DECIMAL: i32 = 3;

    /// Fixed-length character
    pub const CHAR: i32 = 1;

    /// Variable-length character
    pub const VARCHAR: i32 = 12;

    /// Variable-length binary
    pub const VARBINARY: i32 = -3;

    /// Calendar date
    pub const DATE: i32 = 91;

    /// Time of day
    pub const TIME: i32 = 92;

    /// Timestamp without time zone
    pub const TIMESTAMP: i32 = 93;

    /// SQL BOOLEAN
    pub const BOOLEAN: i32 = 16;

    /// SQL ARRAY (standard or named collection type)
    pub const ARRAY: i32 = 2003;

    /// Native UUID
    pub const UUID: i32 = 3000;

    /// Native JSON
    pub const JSON: i32 = 3001;

    /// Canonical upper-case name of a type code.
    ///
    /// Unknown codes map to `"OTHER"`.
    pub const fn name(code: i32) -> &'static str {
        match code {
            BIT => "BIT",
            TINYINT => "TINYINT",
            SMALLINT => "SMALLINT",
            INTEGER => "INTEGER",
            BIGINT => "BIGINT",
            REAL => "REAL",
            DOUBLE => "DOUBLE",
            NUMERIC => "NUMERIC",
            DECIMAL => "DECIMAL",
            CHAR => "CHAR",
            VARCHAR => "VARCHAR",
            VARBINARY => "VARBINARY",
            DATE => "DATE",
            TIME => "TIME",
            TIMESTAMP => "TIMESTAMP",
            BOOLEAN => "BOOLEAN",
            ARRAY => "ARRAY",
            UUID => "UUID",
            JSON => "JSON",
            _ => "OTHER",
        }
    }

    /// Codes whose values are stored as integers (and booleans rendered as 1/0).
    pub const fn is_integral(code: i32) -> bool {
        matches!(code, BIT | TINYINT | SMALLINT | INTEGER | BIGINT)
    }

    /// All codes registered as standard descriptors.
    pub const STANDARD: &[i32] = &[
        BIT, TINYINT, SMALLINT, INTEGER, BIGINT, REAL, DOUBLE, NUMERIC, DECIMAL, CHAR, VARCHAR,
        VARBINARY, DATE, TIME, TIMESTAMP, BOOLEAN, UUID, JSON,
    ];
}

#[cfg(test)]
mod tests {
    use super::codes;

    #[test]
    fn test_code_names() {
        assert_eq!(codes::name(codes::INTEGER), "INTEGER");
        assert_eq!(codes::name(codes::ARRAY), "ARRAY");
        assert_eq!(codes::name(codes::BIT), "BIT");
        assert_eq!(codes::name(9999), "OTHER");
    }

    #[test]
    fn test_integral_codes() {
        assert!(codes::is_integral(codes::BIT));
        assert!(codes::is_integral(codes::INTEGER));
        assert!(!codes::is_integral(codes::BOOLEAN));
    }

    #[test]
    fn test_array_is_not_a_standard_descriptor() {
        assert!(!codes::STANDARD.contains(&codes::ARRAY));
        assert!(codes::STANDARD.contains(&codes::VARBINARY));
    }
}
