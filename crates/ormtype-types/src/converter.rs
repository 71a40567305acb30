//! Value converters between domain and relational representations.

use std::fmt;
use std::sync::Arc;

use ormtype_core::{Error, Result, TypeError, Value};

use crate::domain::{DomainType, DomainTypeRegistry, TypeKey};

/// Converts values between a domain type and the type stored in the database.
pub trait ValueConverter: fmt::Debug + Send + Sync {
    /// Name used in diagnostics and type errors.
    fn name(&self) -> &str;

    /// Type seen by the application.
    fn domain_type(&self) -> &Arc<dyn DomainType>;

    /// Type written to the column.
    fn relational_type(&self) -> &Arc<dyn DomainType>;

    fn to_relational(&self, value: &Value) -> Result<Value>;

    fn to_domain(&self, value: &Value) -> Result<Value>;
}

fn conversion_error(converter: &str, expected: &'static str, value: &Value) -> Error {
    Error::Type(TypeError {
        expected,
        actual: value.type_name().to_string(),
        converter: Some(converter.to_string()),
    })
}

/// Storage encoding of a boolean column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanStorage {
    /// `'Y'` / `'N'`
    YesNo,
    /// `'T'` / `'F'`
    TrueFalse,
    /// `1` / `0`
    Numeric,
}

impl BooleanStorage {
    const fn converter_name(self) -> &'static str {
        match self {
            BooleanStorage::YesNo => "YesNoConverter",
            BooleanStorage::TrueFalse => "TrueFalseConverter",
            BooleanStorage::Numeric => "NumericBooleanConverter",
        }
    }

    const fn relational_type_name(self) -> &'static str {
        match self {
            BooleanStorage::YesNo | BooleanStorage::TrueFalse => "char",
            BooleanStorage::Numeric => "i32",
        }
    }

    const fn characters(self) -> Option<(&'static str, &'static str)> {
        match self {
            BooleanStorage::YesNo => Some(("Y", "N")),
            BooleanStorage::TrueFalse => Some(("T", "F")),
            BooleanStorage::Numeric => None,
        }
    }
}

/// Stores `bool` values as characters or integers.
#[derive(Debug, Clone)]
pub struct BooleanConverter {
    storage: BooleanStorage,
    domain: Arc<dyn DomainType>,
    relational: Arc<dyn DomainType>,
}

impl BooleanConverter {
    pub fn new(storage: BooleanStorage, registry: &DomainTypeRegistry) -> Result<Self> {
        Ok(Self {
            storage,
            domain: registry.descriptor(&TypeKey::scalar("bool"))?,
            relational: registry.descriptor(&TypeKey::scalar(storage.relational_type_name()))?,
        })
    }

    pub fn yes_no(registry: &DomainTypeRegistry) -> Result<Self> {
        Self::new(BooleanStorage::YesNo, registry)
    }

    pub fn true_false(registry: &DomainTypeRegistry) -> Result<Self> {
        Self::new(BooleanStorage::TrueFalse, registry)
    }

    pub fn numeric(registry: &DomainTypeRegistry) -> Result<Self> {
        Self::new(BooleanStorage::Numeric, registry)
    }
}

impl ValueConverter for BooleanConverter {
    fn name(&self) -> &str {
        self.storage.converter_name()
    }

    fn domain_type(&self) -> &Arc<dyn DomainType> {
        &self.domain
    }

    fn relational_type(&self) -> &Arc<dyn DomainType> {
        &self.relational
    }

    fn to_relational(&self, value: &Value) -> Result<Value> {
        let flag = match value {
            Value::Null => return Ok(Value::Null),
            Value::Bool(flag) => *flag,
            other => return Err(conversion_error(self.name(), "BOOLEAN", other)),
        };
        Ok(match self.storage.characters() {
            Some((yes, no)) => Value::Text(if flag { yes } else { no }.to_string()),
            None => Value::Int(i32::from(flag)),
        })
    }

    fn to_domain(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let flag = match self.storage.characters() {
            Some((yes, no)) => match value.as_str().map(str::trim) {
                Some(s) if s.eq_ignore_ascii_case(yes) => Some(true),
                Some(s) if s.eq_ignore_ascii_case(no) => Some(false),
                _ => None,
            },
            None => match value.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
        };
        flag.map(Value::Bool).ok_or_else(|| {
            let expected = if self.storage.characters().is_some() {
                "CHAR"
            } else {
                "INTEGER"
            };
            conversion_error(self.name(), expected, value)
        })
    }
}

/// Applies an element converter to every element of a plural value.
///
/// A null plural maps to null; null elements are handed to the element
/// converter, which passes them through.
#[derive(Debug, Clone)]
pub struct ArrayConverter {
    element: Arc<dyn ValueConverter>,
    domain: Arc<dyn DomainType>,
    relational: Arc<dyn DomainType>,
    name: String,
}

impl ArrayConverter {
    pub fn new(
        element: Arc<dyn ValueConverter>,
        domain: Arc<dyn DomainType>,
        relational: Arc<dyn DomainType>,
    ) -> Self {
        let name = format!("ArrayConverter<{}>", element.name());
        Self {
            element,
            domain,
            relational,
            name,
        }
    }

    fn map_elements(
        &self,
        value: &Value,
        convert: impl Fn(&Value) -> Result<Value>,
    ) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => items
                .iter()
                .map(convert)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Err(conversion_error(&self.name, "ARRAY", other)),
        }
    }
}

impl ValueConverter for ArrayConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain_type(&self) -> &Arc<dyn DomainType> {
        &self.domain
    }

    fn relational_type(&self) -> &Arc<dyn DomainType> {
        &self.relational
    }

    fn to_relational(&self, value: &Value) -> Result<Value> {
        self.map_elements(value, |item| self.element.to_relational(item))
    }

    fn to_domain(&self, value: &Value) -> Result<Value> {
        self.map_elements(value, |item| self.element.to_domain(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DomainTypeRegistry {
        DomainTypeRegistry::with_standard_types()
    }

    #[test]
    fn test_yes_no_round_trip() {
        let conv = BooleanConverter::yes_no(&registry()).unwrap();
        assert_eq!(
            conv.to_relational(&Value::Bool(true)).unwrap(),
            Value::Text("Y".into())
        );
        assert_eq!(
            conv.to_domain(&Value::Text("n".into())).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(conv.relational_type().key(), &TypeKey::scalar("char"));
    }

    #[test]
    fn test_numeric_storage() {
        let conv = BooleanConverter::numeric(&registry()).unwrap();
        assert_eq!(conv.to_relational(&Value::Bool(true)).unwrap(), Value::Int(1));
        assert_eq!(conv.to_domain(&Value::BigInt(0)).unwrap(), Value::Bool(false));
        assert!(conv.to_domain(&Value::Int(2)).is_err());
    }

    #[test]
    fn test_null_passes_through() {
        let conv = BooleanConverter::true_false(&registry()).unwrap();
        assert_eq!(conv.to_relational(&Value::Null).unwrap(), Value::Null);
        assert_eq!(conv.to_domain(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let conv = BooleanConverter::yes_no(&registry()).unwrap();
        let err = conv.to_relational(&Value::Int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type error: expected BOOLEAN in converter 'YesNoConverter', found INTEGER"
        );
    }

    #[test]
    fn test_array_converter_maps_elements() {
        let registry = registry();
        let element: Arc<dyn ValueConverter> = Arc::new(BooleanConverter::yes_no(&registry).unwrap());
        let domain = registry
            .descriptor(&TypeKey::array_of(TypeKey::scalar("bool")))
            .unwrap();
        let relational = registry
            .descriptor(&TypeKey::array_of(TypeKey::scalar("char")))
            .unwrap();
        let conv = ArrayConverter::new(element, domain, relational);
        assert_eq!(conv.name(), "ArrayConverter<YesNoConverter>");

        let stored = conv
            .to_relational(&Value::Array(vec![
                Value::Bool(true),
                Value::Null,
                Value::Bool(false),
            ]))
            .unwrap();
        assert_eq!(
            stored,
            Value::Array(vec![
                Value::Text("Y".into()),
                Value::Null,
                Value::Text("N".into()),
            ])
        );
        assert_eq!(
            conv.to_domain(&stored).unwrap(),
            Value::Array(vec![Value::Bool(true), Value::Null, Value::Bool(false)])
        );
        assert_eq!(conv.to_relational(&Value::Null).unwrap(), Value::Null);
        assert!(conv.to_relational(&Value::Bool(true)).is_err());
    }
}
