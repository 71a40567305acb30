//! SQL identifier quoting and type-name validation.

use std::sync::OnceLock;

use regex::Regex;

/// Quote a SQL identifier using ANSI double-quoting.
///
/// Embedded double-quotes are escaped by doubling them (`"` → `""`).
///
/// # Examples
///
/// ```
/// use ormtype_core::quote_ident;
///
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("user\"name"), "\"user\"\"name\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL identifier using MySQL backtick quoting.
///
/// # Examples
///
/// ```
/// use ormtype_core::quote_ident_mysql;
///
/// assert_eq!(quote_ident_mysql("user`name"), "`user``name`");
/// ```
#[inline]
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn type_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_$#]*$").expect("type name pattern is a valid regex")
    })
}

/// Check whether `name` can be used unquoted as a user-defined SQL type name.
///
/// Named array types are spliced into generated function names
/// (`<type>_contains_all`), so they must be plain identifiers.
///
/// ```
/// use ormtype_core::is_plain_type_name;
///
/// assert!(is_plain_type_name("INTEGER_ARRAY"));
/// assert!(!is_plain_type_name("int array; drop table x"));
/// ```
pub fn is_plain_type_name(name: &str) -> bool {
    type_name_pattern().is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("users"), "\"users\"");
    }

    #[test]
    fn test_quote_ident_sql_injection_attempt() {
        let malicious = "users\"; DROP TABLE secrets; --";
        assert_eq!(
            quote_ident(malicious),
            "\"users\"\"; DROP TABLE secrets; --\""
        );
    }

    #[test]
    fn test_quote_ident_mysql_embedded_backtick() {
        assert_eq!(quote_ident_mysql("a`b`c"), "`a``b``c`");
    }

    #[test]
    fn test_plain_type_names() {
        assert!(is_plain_type_name("BOOLEAN_ARRAY"));
        assert!(is_plain_type_name("StringArray"));
        assert!(is_plain_type_name("T$1#"));
    }

    #[test]
    fn test_rejected_type_names() {
        assert!(!is_plain_type_name(""));
        assert!(!is_plain_type_name("1ARRAY"));
        assert!(!is_plain_type_name("integer array"));
        assert!(!is_plain_type_name("x);drop"));
    }
}
