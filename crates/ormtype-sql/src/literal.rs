//! Inline literal rendering.

use ormtype_core::{Error, RenderError, RenderErrorKind, Result, Value, codes};

/// Render `value` as an inline SQL literal for a column stored as `code`.
///
/// Booleans stored in integral columns render as `1`/`0`; otherwise as
/// `true`/`false`.
pub fn render_literal(value: &Value, code: Option<i32>) -> Result<String> {
    let sql = match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => {
            let integral = code.is_some_and(codes::is_integral);
            let text = match (integral, *flag) {
                (true, true) => "1",
                (true, false) => "0",
                (false, true) => "true",
                (false, false) => "false",
            };
            text.to_string()
        }
        Value::TinyInt(v) => v.to_string(),
        Value::SmallInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::BigInt(v) => v.to_string(),
        Value::Float(v) if v.is_finite() => v.to_string(),
        Value::Double(v) if v.is_finite() => v.to_string(),
        Value::Decimal(v) => v.clone(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        other => {
            return Err(Error::Render(RenderError::new(
                RenderErrorKind::UnsupportedLiteral,
                format!("{} values cannot be rendered inline", other.type_name()),
            )));
        }
    };
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_literals_follow_storage_code() {
        assert_eq!(
            render_literal(&Value::Bool(false), Some(codes::BOOLEAN)).unwrap(),
            "false"
        );
        assert_eq!(render_literal(&Value::Bool(true), Some(codes::BIT)).unwrap(), "1");
        assert_eq!(render_literal(&Value::Bool(true), None).unwrap(), "true");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            render_literal(&Value::Text("O'Brien".into()), Some(codes::VARCHAR)).unwrap(),
            "'O''Brien'"
        );
    }

    #[test]
    fn test_numbers_and_null() {
        assert_eq!(render_literal(&Value::Int(-4), None).unwrap(), "-4");
        assert_eq!(render_literal(&Value::Double(1.5), None).unwrap(), "1.5");
        assert_eq!(render_literal(&Value::Null, None).unwrap(), "null");
    }

    #[test]
    fn test_unsupported_literals() {
        let err = render_literal(&Value::Array(vec![Value::Int(1)]), None).unwrap_err();
        assert_eq!(err.render_kind(), Some(RenderErrorKind::UnsupportedLiteral));
        assert!(render_literal(&Value::Double(f64::NAN), None).is_err());
    }
}
