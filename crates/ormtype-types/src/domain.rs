//! Domain-type descriptors.
//!
//! A domain type describes an application-level value type: its identity
//! (`TypeKey`), whether its values are mutable, and which JDBC type it
//! recommends for storage. Descriptors are composed from small capability
//! traits rather than a single base type:
//!
//! - [`WidenessComparable`]: can a parameter of this type accept another type's values?
//! - [`ElementTyped`]: plural types expose their element descriptor
//! - [`Resolvable`]: plural types build their own basic type from an element basic type
//!
//! Descriptors live in a [`DomainTypeRegistry`] owned by a
//! [`TypeConfiguration`](crate::TypeConfiguration); there is exactly one
//! descriptor per key for the lifetime of that configuration.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use ormtype_core::{Error, MappingError, MappingErrorKind, Result, codes};

use crate::basic::BasicType;
use crate::config::TypeConfiguration;
use crate::jdbc::{ColumnTypeInformation, JdbcType, JdbcTypeIndicators};
use crate::plural::{ArrayDomainType, CollectionDomainType};

/// Kind of collection a plural domain type is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Ordered, duplicates allowed
    List,
    /// Unordered, unique elements
    Set,
}

/// Stable structural identity of a domain type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A named scalar type, e.g. `i32` or `String`
    Scalar(Cow<'static, str>),
    /// A native array of the element type
    Array(Box<TypeKey>),
    /// A collection of the element type
    Collection(CollectionKind, Box<TypeKey>),
}

impl TypeKey {
    pub fn scalar(name: impl Into<Cow<'static, str>>) -> Self {
        TypeKey::Scalar(name.into())
    }

    pub fn array_of(element: TypeKey) -> Self {
        TypeKey::Array(Box::new(element))
    }

    pub fn collection_of(kind: CollectionKind, element: TypeKey) -> Self {
        TypeKey::Collection(kind, Box::new(element))
    }

    /// Is this an array type? Byte strings (`[u8]`) count, even though they
    /// are mapped as scalars.
    pub fn is_array(&self) -> bool {
        matches!(self, TypeKey::Array(_))
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, TypeKey::Array(_) | TypeKey::Collection(..))
    }

    pub fn element(&self) -> Option<&TypeKey> {
        match self {
            TypeKey::Scalar(_) => None,
            TypeKey::Array(element) | TypeKey::Collection(_, element) => Some(element),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Scalar(name) => f.write_str(name),
            TypeKey::Array(element) => write!(f, "[{element}]"),
            TypeKey::Collection(CollectionKind::List, element) => write!(f, "Vec<{element}>"),
            TypeKey::Collection(CollectionKind::Set, element) => write!(f, "HashSet<{element}>"),
        }
    }
}

/// Whether values of a domain type can change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutabilityPlan {
    Immutable,
    Mutable,
}

impl MutabilityPlan {
    pub const fn is_mutable(self) -> bool {
        matches!(self, MutabilityPlan::Mutable)
    }
}

/// Can a slot typed as `self` accept values described by `other`?
pub trait WidenessComparable {
    fn is_wider(&self, other: &dyn DomainType) -> bool;
}

/// A descriptor of an application-level value type.
pub trait DomainType: WidenessComparable + fmt::Debug + Send + Sync {
    /// Structural identity of the described type.
    fn key(&self) -> &TypeKey;

    /// Display name, used for basic-type names and diagnostics.
    fn name(&self) -> String {
        self.key().to_string()
    }

    fn mutability(&self) -> MutabilityPlan;

    /// The JDBC type this domain type should be stored as, absent any
    /// explicit mapping.
    fn recommended_jdbc_type(&self, indicators: &dyn JdbcTypeIndicators) -> Result<Arc<JdbcType>>;

    /// Plural view of this descriptor, if it describes an array or collection.
    fn as_plural(&self) -> Option<&dyn PluralDomainType> {
        None
    }
}

/// Plural types expose the descriptor of their elements.
pub trait ElementTyped {
    fn element_type(&self) -> &Arc<dyn DomainType>;
}

/// Plural types construct their basic type from a resolved element type.
pub trait Resolvable {
    /// Resolve the basic type for this plural over `element_type`.
    ///
    /// Returns `Ok(None)` when the element cannot be auto-resolved at this
    /// layer (plural-of-plural, array-of-array).
    fn resolve_type(
        &self,
        config: &TypeConfiguration,
        element_type: &Arc<BasicType>,
        column: &ColumnTypeInformation,
        indicators: &dyn JdbcTypeIndicators,
    ) -> Result<Option<Arc<BasicType>>>;
}

/// An array- or collection-valued domain type.
pub trait PluralDomainType: DomainType + ElementTyped + Resolvable {}

impl<T: DomainType + ElementTyped + Resolvable> PluralDomainType for T {}

/// How a scalar picks its recommended JDBC type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JdbcRecommendation {
    /// Always this code
    Code(i32),
    /// The configured/dialect boolean storage code
    PreferredBoolean,
}

/// Descriptor for a non-plural domain type.
#[derive(Debug)]
pub struct ScalarDomainType {
    key: TypeKey,
    mutability: MutabilityPlan,
    recommendation: JdbcRecommendation,
}

impl ScalarDomainType {
    /// An immutable scalar stored as `code`.
    pub fn new(key: TypeKey, code: i32) -> Self {
        Self {
            key,
            mutability: MutabilityPlan::Immutable,
            recommendation: JdbcRecommendation::Code(code),
        }
    }

    /// A boolean scalar stored as the preferred boolean code.
    pub fn boolean(key: TypeKey) -> Self {
        Self {
            key,
            mutability: MutabilityPlan::Immutable,
            recommendation: JdbcRecommendation::PreferredBoolean,
        }
    }

    pub fn mutable(mut self) -> Self {
        self.mutability = MutabilityPlan::Mutable;
        self
    }

    pub fn recommendation(&self) -> JdbcRecommendation {
        self.recommendation
    }
}

impl WidenessComparable for ScalarDomainType {
    fn is_wider(&self, other: &dyn DomainType) -> bool {
        &self.key == other.key()
    }
}

impl DomainType for ScalarDomainType {
    fn key(&self) -> &TypeKey {
        &self.key
    }

    fn mutability(&self) -> MutabilityPlan {
        self.mutability
    }

    fn recommended_jdbc_type(&self, indicators: &dyn JdbcTypeIndicators) -> Result<Arc<JdbcType>> {
        let code = match self.recommendation {
            JdbcRecommendation::Code(code) => code,
            JdbcRecommendation::PreferredBoolean => indicators.preferred_sql_type_code_for_boolean(),
        };
        indicators
            .type_configuration()
            .jdbc_type_registry()
            .descriptor(code)
    }
}

/// Registry of domain-type descriptors, keyed by `TypeKey`.
///
/// Append-only: the first descriptor registered for a key is the one every
/// later lookup returns.
#[derive(Debug, Default)]
pub struct DomainTypeRegistry {
    descriptors: RwLock<HashMap<TypeKey, Arc<dyn DomainType>>>,
}

impl DomainTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard scalar types.
    pub fn with_standard_types() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(ScalarDomainType::boolean(TypeKey::scalar("bool"))));
        let standard: [(&'static str, i32); 15] = [
            ("i8", codes::TINYINT),
            ("u8", codes::TINYINT),
            ("i16", codes::SMALLINT),
            ("i32", codes::INTEGER),
            ("i64", codes::BIGINT),
            ("f32", codes::REAL),
            ("f64", codes::DOUBLE),
            ("decimal", codes::NUMERIC),
            ("char", codes::CHAR),
            ("String", codes::VARCHAR),
            ("date", codes::DATE),
            ("time", codes::TIME),
            ("timestamp", codes::TIMESTAMP),
            ("uuid", codes::UUID),
            ("json", codes::JSON),
        ];
        for (name, code) in standard {
            registry.register(Arc::new(ScalarDomainType::new(TypeKey::scalar(name), code)));
        }
        // Byte strings are arrays by identity but map to a single binary column.
        registry.register(Arc::new(
            ScalarDomainType::new(TypeKey::array_of(TypeKey::scalar("u8")), codes::VARBINARY)
                .mutable(),
        ));
        registry
    }

    /// Register a descriptor, returning the canonical one for its key.
    pub fn register(&self, descriptor: Arc<dyn DomainType>) -> Arc<dyn DomainType> {
        let mut descriptors = self.descriptors.write().unwrap_or_else(|e| e.into_inner());
        let key = descriptor.key().clone();
        let canonical = descriptors.entry(key).or_insert_with(|| {
            tracing::debug!(domain_type = %descriptor.key(), "Registered domain type");
            descriptor
        });
        Arc::clone(canonical)
    }

    /// Look up a registered descriptor.
    pub fn get(&self, key: &TypeKey) -> Option<Arc<dyn DomainType>> {
        let descriptors = self.descriptors.read().unwrap_or_else(|e| e.into_inner());
        descriptors.get(key).cloned()
    }

    /// Look up a descriptor, synthesizing array and collection descriptors
    /// over registered element types on demand.
    pub fn descriptor(&self, key: &TypeKey) -> Result<Arc<dyn DomainType>> {
        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }
        let synthesized: Arc<dyn DomainType> = match key {
            TypeKey::Array(element) => Arc::new(ArrayDomainType::new(self.descriptor(element)?)),
            TypeKey::Collection(kind, element) => Arc::new(CollectionDomainType::new(
                *kind,
                self.descriptor(element)?,
            )),
            TypeKey::Scalar(_) => {
                return Err(Error::Mapping(
                    MappingError::new(
                        MappingErrorKind::UnknownDomainType,
                        "no domain type registered",
                    )
                    .with_type(key.to_string()),
                ));
            }
        };
        Ok(self.register(synthesized))
    }

    pub fn len(&self) -> usize {
        self.descriptors
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
