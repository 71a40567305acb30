//! Basic types: a domain type bound to a JDBC type.
//!
//! The [`BasicTypeRegistry`] interns basic types by (domain type, JDBC type)
//! so concurrent resolutions of the same pair observe one instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use ormtype_core::{Result, Value};

use crate::converter::{ArrayConverter, ValueConverter};
use crate::domain::{DomainType, TypeKey};
use crate::jdbc::JdbcType;

/// Shape-specific parts of a basic type.
#[derive(Debug, Clone)]
pub enum BasicTypeKind {
    /// Plain scalar, stored as-is
    Basic,
    /// Scalar stored through a value converter
    Converted { converter: Arc<dyn ValueConverter> },
    /// Native array over a resolved element type
    Array { element: Arc<BasicType> },
    /// Array whose elements are converted
    ConvertedArray {
        element: Arc<BasicType>,
        converter: Arc<ArrayConverter>,
    },
    /// Collection over a resolved element type
    Collection { element: Arc<BasicType> },
    /// Collection whose elements are converted
    ConvertedCollection {
        element: Arc<BasicType>,
        converter: Arc<ArrayConverter>,
    },
}

/// A domain type bound to the JDBC type it is stored as.
///
/// Converted types are named `<domain>@<converter>`, plain arrays
/// `<element>[]`.
#[derive(Debug, Clone)]
pub struct BasicType {
    name: String,
    domain_type: Arc<dyn DomainType>,
    jdbc_type: Arc<JdbcType>,
    kind: BasicTypeKind,
}

impl BasicType {
    pub fn new(domain_type: Arc<dyn DomainType>, jdbc_type: Arc<JdbcType>) -> Self {
        Self {
            name: domain_type.name(),
            domain_type,
            jdbc_type,
            kind: BasicTypeKind::Basic,
        }
    }

    /// A scalar stored through `converter`; the JDBC type is the one the
    /// converter's relational type maps to.
    pub fn converted(
        domain_type: Arc<dyn DomainType>,
        jdbc_type: Arc<JdbcType>,
        converter: Arc<dyn ValueConverter>,
    ) -> Self {
        Self {
            name: format!("{}@{}", domain_type.name(), converter.name()),
            domain_type,
            jdbc_type,
            kind: BasicTypeKind::Converted { converter },
        }
    }

    pub fn array(
        domain_type: Arc<dyn DomainType>,
        jdbc_type: Arc<JdbcType>,
        element: Arc<BasicType>,
    ) -> Self {
        Self {
            name: format!("{}[]", element.name()),
            domain_type,
            jdbc_type,
            kind: BasicTypeKind::Array { element },
        }
    }

    pub fn converted_array(
        domain_type: Arc<dyn DomainType>,
        jdbc_type: Arc<JdbcType>,
        element: Arc<BasicType>,
        converter: Arc<ArrayConverter>,
    ) -> Self {
        Self {
            name: format!("{}@{}", domain_type.name(), converter.name()),
            domain_type,
            jdbc_type,
            kind: BasicTypeKind::ConvertedArray { element, converter },
        }
    }

    pub fn collection(
        domain_type: Arc<dyn DomainType>,
        jdbc_type: Arc<JdbcType>,
        element: Arc<BasicType>,
    ) -> Self {
        Self {
            name: domain_type.name(),
            domain_type,
            jdbc_type,
            kind: BasicTypeKind::Collection { element },
        }
    }

    pub fn converted_collection(
        domain_type: Arc<dyn DomainType>,
        jdbc_type: Arc<JdbcType>,
        element: Arc<BasicType>,
        converter: Arc<ArrayConverter>,
    ) -> Self {
        Self {
            name: format!("{}@{}", domain_type.name(), converter.name()),
            domain_type,
            jdbc_type,
            kind: BasicTypeKind::ConvertedCollection { element, converter },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain_type(&self) -> &Arc<dyn DomainType> {
        &self.domain_type
    }

    pub fn jdbc_type(&self) -> &Arc<JdbcType> {
        &self.jdbc_type
    }

    pub fn kind(&self) -> &BasicTypeKind {
        &self.kind
    }

    /// The element basic type of a plural.
    pub fn element_type(&self) -> Option<&Arc<BasicType>> {
        match &self.kind {
            BasicTypeKind::Basic | BasicTypeKind::Converted { .. } => None,
            BasicTypeKind::Array { element }
            | BasicTypeKind::ConvertedArray { element, .. }
            | BasicTypeKind::Collection { element }
            | BasicTypeKind::ConvertedCollection { element, .. } => Some(element),
        }
    }

    /// The converter applied to values of this type, if any.
    pub fn value_converter(&self) -> Option<Arc<dyn ValueConverter>> {
        match &self.kind {
            BasicTypeKind::Converted { converter } => Some(Arc::clone(converter)),
            BasicTypeKind::ConvertedArray { converter, .. }
            | BasicTypeKind::ConvertedCollection { converter, .. } => {
                Some(Arc::clone(converter) as Arc<dyn ValueConverter>)
            }
            BasicTypeKind::Basic
            | BasicTypeKind::Array { .. }
            | BasicTypeKind::Collection { .. } => None,
        }
    }

    pub fn is_plural(&self) -> bool {
        self.element_type().is_some()
    }

    pub fn is_converted_array(&self) -> bool {
        matches!(self.kind, BasicTypeKind::ConvertedArray { .. })
    }

    /// Convert a domain value into the value bound to a statement.
    pub fn to_relational(&self, value: &Value) -> Result<Value> {
        match self.value_converter() {
            Some(converter) => converter.to_relational(value),
            None => Ok(value.clone()),
        }
    }

    /// Convert a value read from a column into its domain value.
    pub fn to_domain(&self, value: &Value) -> Result<Value> {
        match self.value_converter() {
            Some(converter) => converter.to_domain(value),
            None => Ok(value.clone()),
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.name, self.jdbc_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BasicTypeKey {
    domain: TypeKey,
    jdbc: JdbcType,
}

/// Interning registry of basic types.
#[derive(Debug, Default)]
pub struct BasicTypeRegistry {
    resolved: RwLock<HashMap<BasicTypeKey, Arc<BasicType>>>,
    named: RwLock<HashMap<String, Arc<BasicType>>>,
}

impl BasicTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the basic type registered for (`domain_type`, `jdbc_type`),
    /// building and registering it with `create` if absent.
    ///
    /// `create` may run on several threads at once; only the first insert is
    /// kept and every caller receives that instance.
    pub fn resolve<F>(
        &self,
        domain_type: &Arc<dyn DomainType>,
        jdbc_type: &Arc<JdbcType>,
        create: F,
    ) -> Arc<BasicType>
    where
        F: FnOnce() -> BasicType,
    {
        let key = BasicTypeKey {
            domain: domain_type.key().clone(),
            jdbc: JdbcType::clone(jdbc_type),
        };
        {
            let resolved = self.resolved.read().unwrap_or_else(|e| e.into_inner());
            if let Some(existing) = resolved.get(&key) {
                tracing::trace!(domain_type = %key.domain, jdbc_type = %key.jdbc, "Basic type cache hit");
                return Arc::clone(existing);
            }
        }

        let candidate = Arc::new(create());
        let mut resolved = self.resolved.write().unwrap_or_else(|e| e.into_inner());
        let canonical = resolved.entry(key).or_insert_with(|| {
            tracing::debug!(basic_type = %candidate, "Registered basic type");
            Arc::clone(&candidate)
        });
        Arc::clone(canonical)
    }

    /// Register a basic type under its name. The first registration wins.
    pub fn register(&self, basic_type: Arc<BasicType>) -> Arc<BasicType> {
        let mut named = self.named.write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            named
                .entry(basic_type.name().to_string())
                .or_insert(basic_type),
        )
    }

    pub fn registered_type(&self, name: &str) -> Option<Arc<BasicType>> {
        let named = self.named.read().unwrap_or_else(|e| e.into_inner());
        named.get(name).cloned()
    }

    /// Number of interned (domain type, JDBC type) pairs.
    pub fn len(&self) -> usize {
        self.resolved
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
