//! Array and collection domain types.
//!
//! Both plural shapes resolve the same way: reject nested plurals, pick the
//! JDBC type for the element (constructor first, descriptor fallback), then
//! either wrap a value converter or intern the plural basic type in the
//! basic-type registry.

use std::sync::Arc;

use ormtype_core::Result;

use crate::basic::BasicType;
use crate::config::TypeConfiguration;
use crate::converter::{ArrayConverter, ValueConverter};
use crate::domain::{
    CollectionKind, DomainType, ElementTyped, MutabilityPlan, PluralDomainType, Resolvable,
    TypeKey, WidenessComparable,
};
use crate::jdbc::{ColumnTypeInformation, JdbcType, JdbcTypeIndicators, array_jdbc_type};

/// Which plural shape a basic type is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralFamily {
    Array,
    Collection(CollectionKind),
}

impl PluralFamily {
    /// The key of this plural shape over `element`.
    pub fn key_for(self, element: TypeKey) -> TypeKey {
        match self {
            PluralFamily::Array => TypeKey::array_of(element),
            PluralFamily::Collection(kind) => TypeKey::collection_of(kind, element),
        }
    }

    fn basic_type(
        self,
        domain_type: Arc<dyn DomainType>,
        jdbc_type: Arc<JdbcType>,
        element: Arc<BasicType>,
    ) -> BasicType {
        match self {
            PluralFamily::Array => BasicType::array(domain_type, jdbc_type, element),
            PluralFamily::Collection(_) => BasicType::collection(domain_type, jdbc_type, element),
        }
    }

    fn converted_basic_type(
        self,
        domain_type: Arc<dyn DomainType>,
        jdbc_type: Arc<JdbcType>,
        element: Arc<BasicType>,
        converter: Arc<ArrayConverter>,
    ) -> BasicType {
        match self {
            PluralFamily::Array => {
                BasicType::converted_array(domain_type, jdbc_type, element, converter)
            }
            PluralFamily::Collection(_) => {
                BasicType::converted_collection(domain_type, jdbc_type, element, converter)
            }
        }
    }
}

/// Descriptor for a native array over an element type.
#[derive(Debug)]
pub struct ArrayDomainType {
    key: TypeKey,
    element: Arc<dyn DomainType>,
}

impl ArrayDomainType {
    pub fn new(element: Arc<dyn DomainType>) -> Self {
        Self {
            key: TypeKey::array_of(element.key().clone()),
            element,
        }
    }
}

impl WidenessComparable for ArrayDomainType {
    /// An array slot accepts arrays of the same type and bare elements.
    fn is_wider(&self, other: &dyn DomainType) -> bool {
        other.key() == &self.key || other.key() == self.element.key()
    }
}

impl DomainType for ArrayDomainType {
    fn key(&self) -> &TypeKey {
        &self.key
    }

    fn mutability(&self) -> MutabilityPlan {
        MutabilityPlan::Mutable
    }

    fn recommended_jdbc_type(&self, indicators: &dyn JdbcTypeIndicators) -> Result<Arc<JdbcType>> {
        recommended_plural_jdbc_type(&self.element, indicators)
    }

    fn as_plural(&self) -> Option<&dyn PluralDomainType> {
        Some(self)
    }
}

impl ElementTyped for ArrayDomainType {
    fn element_type(&self) -> &Arc<dyn DomainType> {
        &self.element
    }
}

impl Resolvable for ArrayDomainType {
    fn resolve_type(
        &self,
        config: &TypeConfiguration,
        element_type: &Arc<BasicType>,
        column: &ColumnTypeInformation,
        indicators: &dyn JdbcTypeIndicators,
    ) -> Result<Option<Arc<BasicType>>> {
        resolve_plural(
            config,
            &self.key,
            PluralFamily::Array,
            element_type,
            column,
            indicators,
        )
    }
}

/// Descriptor for a list or set over an element type.
#[derive(Debug)]
pub struct CollectionDomainType {
    key: TypeKey,
    kind: CollectionKind,
    element: Arc<dyn DomainType>,
}

impl CollectionDomainType {
    pub fn new(kind: CollectionKind, element: Arc<dyn DomainType>) -> Self {
        Self {
            key: TypeKey::collection_of(kind, element.key().clone()),
            kind,
            element,
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }
}

impl WidenessComparable for CollectionDomainType {
    fn is_wider(&self, other: &dyn DomainType) -> bool {
        other.key() == &self.key || other.key() == self.element.key()
    }
}

impl DomainType for CollectionDomainType {
    fn key(&self) -> &TypeKey {
        &self.key
    }

    fn mutability(&self) -> MutabilityPlan {
        MutabilityPlan::Mutable
    }

    fn recommended_jdbc_type(&self, indicators: &dyn JdbcTypeIndicators) -> Result<Arc<JdbcType>> {
        recommended_plural_jdbc_type(&self.element, indicators)
    }

    fn as_plural(&self) -> Option<&dyn PluralDomainType> {
        Some(self)
    }
}

impl ElementTyped for CollectionDomainType {
    fn element_type(&self) -> &Arc<dyn DomainType> {
        &self.element
    }
}

impl Resolvable for CollectionDomainType {
    fn resolve_type(
        &self,
        config: &TypeConfiguration,
        element_type: &Arc<BasicType>,
        column: &ColumnTypeInformation,
        indicators: &dyn JdbcTypeIndicators,
    ) -> Result<Option<Arc<BasicType>>> {
        resolve_plural(
            config,
            &self.key,
            PluralFamily::Collection(self.kind),
            element_type,
            column,
            indicators,
        )
    }
}

fn recommended_plural_jdbc_type(
    element: &Arc<dyn DomainType>,
    indicators: &dyn JdbcTypeIndicators,
) -> Result<Arc<JdbcType>> {
    let element_jdbc = element.recommended_jdbc_type(indicators)?;
    let element_basic = BasicType::new(Arc::clone(element), element_jdbc);
    array_jdbc_type(
        indicators.type_configuration(),
        indicators.dialect(),
        indicators.preferred_sql_type_code_for_array(),
        &element_basic,
        &ColumnTypeInformation::EMPTY,
    )
}

/// Resolve the basic type for the plural `plural_key` over `element_type`.
///
/// Converted plurals are built fresh on every call and never registered;
/// unconverted plurals go through the registry's insert-if-absent path so
/// every caller observes one instance per (domain type, JDBC type).
pub fn resolve_plural(
    config: &TypeConfiguration,
    plural_key: &TypeKey,
    family: PluralFamily,
    element_type: &Arc<BasicType>,
    column: &ColumnTypeInformation,
    indicators: &dyn JdbcTypeIndicators,
) -> Result<Option<Arc<BasicType>>> {
    let element_key = element_type.domain_type().key();
    if element_type.is_plural() || element_key.is_array() {
        tracing::debug!(
            plural = %plural_key,
            element = %element_key,
            "Element type is itself plural, not resolvable here"
        );
        return Ok(None);
    }

    let this = config.domain_type_registry().descriptor(plural_key)?;

    if let Some(converter) = element_type.value_converter() {
        let relational_key = family.key_for(converter.relational_type().key().clone());
        let relational = config.domain_type_registry().descriptor(&relational_key)?;
        let jdbc_type = array_jdbc_type(
            config,
            indicators.dialect(),
            indicators.explicit_jdbc_type_code(),
            element_type,
            column,
        )?;
        let array_converter = Arc::new(ArrayConverter::new(
            converter,
            Arc::clone(&this),
            relational,
        ));
        tracing::trace!(
            plural = %plural_key,
            converter = %array_converter.name(),
            jdbc_type = %jdbc_type,
            "Built converted plural type"
        );
        return Ok(Some(Arc::new(family.converted_basic_type(
            this,
            jdbc_type,
            Arc::clone(element_type),
            array_converter,
        ))));
    }

    let jdbc_type = array_jdbc_type(
        config,
        indicators.dialect(),
        indicators.explicit_jdbc_type_code(),
        element_type,
        column,
    )?;
    let resolved = config.basic_type_registry().resolve(&this, &jdbc_type, || {
        family.basic_type(
            Arc::clone(&this),
            Arc::clone(&jdbc_type),
            Arc::clone(element_type),
        )
    });
    Ok(Some(resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{BooleanConverter, ValueConverter};
    use ormtype_core::{Dialect, codes};

    fn int_array(config: &TypeConfiguration) -> Arc<dyn DomainType> {
        config
            .domain_type_registry()
            .descriptor(&TypeKey::array_of(TypeKey::scalar("i32")))
            .unwrap()
    }

    #[test]
    fn test_array_wideness() {
        let config = TypeConfiguration::new(Dialect::Postgres);
        let array = int_array(&config);
        let element = config
            .domain_type_registry()
            .descriptor(&TypeKey::scalar("i32"))
            .unwrap();
        let other = config
            .domain_type_registry()
            .descriptor(&TypeKey::scalar("i64"))
            .unwrap();

        assert!(array.is_wider(array.as_ref()));
        assert!(array.is_wider(element.as_ref()));
        assert!(!array.is_wider(other.as_ref()));
    }

    #[test]
    fn test_recommended_jdbc_type_uses_constructor() {
        let config = TypeConfiguration::new(Dialect::Oracle);
        let indicators = config.indicators();
        let jdbc = int_array(&config).recommended_jdbc_type(&indicators).unwrap();
        assert_eq!(jdbc.code(), codes::ARRAY);
        assert_eq!(jdbc.type_name(), Some("INTEGER_ARRAY"));
    }

    #[test]
    fn test_recommended_jdbc_type_falls_back_to_descriptor() {
        let config = TypeConfiguration::new(Dialect::Mysql);
        let indicators = config.indicators();
        let jdbc = int_array(&config).recommended_jdbc_type(&indicators).unwrap();
        assert_eq!(jdbc.code(), codes::VARBINARY);
        assert!(!jdbc.is_array());
    }

    #[test]
    fn test_nested_element_is_not_resolvable() {
        let config = TypeConfiguration::new(Dialect::Postgres);
        let inner = config
            .resolve_basic_type(&TypeKey::array_of(TypeKey::scalar("i32")))
            .unwrap();
        let outer_key = TypeKey::array_of(TypeKey::array_of(TypeKey::scalar("i32")));
        let resolved = resolve_plural(
            &config,
            &outer_key,
            PluralFamily::Array,
            &inner,
            &ColumnTypeInformation::EMPTY,
            &config.indicators(),
        )
        .unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_converted_plural_is_fresh_per_call() {
        let config = TypeConfiguration::new(Dialect::Oracle);
        let converter: Arc<dyn ValueConverter> =
            Arc::new(BooleanConverter::yes_no(config.domain_type_registry()).unwrap());
        let element = config.converted_basic_type(converter).unwrap();
        let key = TypeKey::array_of(TypeKey::scalar("bool"));

        let resolve = || {
            resolve_plural(
                &config,
                &key,
                PluralFamily::Array,
                &element,
                &ColumnTypeInformation::EMPTY,
                &config.indicators(),
            )
            .unwrap()
            .unwrap()
        };
        let first = resolve();
        let second = resolve();

        assert!(first.is_converted_array());
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.jdbc_type(), second.jdbc_type());
        assert_eq!(first.jdbc_type().type_name(), Some("CHAR_ARRAY"));
        assert_eq!(first.name(), "[bool]@ArrayConverter<YesNoConverter>");
    }

    #[test]
    fn test_converted_plurals_share_naming() {
        let config = TypeConfiguration::new(Dialect::Postgres);
        let converter: Arc<dyn ValueConverter> =
            Arc::new(BooleanConverter::true_false(config.domain_type_registry()).unwrap());
        let element = config.converted_basic_type(converter).unwrap();
        assert_eq!(element.name(), "bool@TrueFalseConverter");

        let resolve = |family: PluralFamily| {
            resolve_plural(
                &config,
                &family.key_for(TypeKey::scalar("bool")),
                family,
                &element,
                &ColumnTypeInformation::EMPTY,
                &config.indicators(),
            )
            .unwrap()
            .unwrap()
        };
        let array = resolve(PluralFamily::Array);
        let list = resolve(PluralFamily::Collection(CollectionKind::List));

        assert_eq!(array.name(), "[bool]@ArrayConverter<TrueFalseConverter>");
        assert_eq!(list.name(), "Vec<bool>@ArrayConverter<TrueFalseConverter>");
        assert_eq!(array.jdbc_type().type_name(), Some("char(1)[]"));
    }

    #[test]
    fn test_collection_resolves_through_registry() {
        let config = TypeConfiguration::new(Dialect::Postgres);
        let element = config.resolve_basic_type(&TypeKey::scalar("String")).unwrap();
        let key = TypeKey::collection_of(CollectionKind::Set, TypeKey::scalar("String"));
        let resolve = || {
            resolve_plural(
                &config,
                &key,
                PluralFamily::Collection(CollectionKind::Set),
                &element,
                &ColumnTypeInformation::EMPTY,
                &config.indicators(),
            )
            .unwrap()
            .unwrap()
        };
        let first = resolve();
        let second = resolve();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.jdbc_type().type_name(), Some("varchar(255)[]"));
    }
}
