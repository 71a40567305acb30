//! Error types for type resolution and SQL rendering.

use std::fmt;

/// The primary error type for all ormtype operations.
#[derive(Debug)]
pub enum Error {
    /// Type mapping errors (unresolvable element types, unknown type codes)
    Mapping(MappingError),
    /// Configuration errors
    Config(ConfigError),
    /// Value conversion errors
    Type(TypeError),
    /// SQL rendering errors
    Render(RenderError),
    /// Serialization/deserialization errors
    Serde(String),
}

#[derive(Debug)]
pub struct MappingError {
    pub kind: MappingErrorKind,
    pub message: String,
    /// Name of the type being mapped, when known
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorKind {
    /// Element type of a plural is itself plural or an array
    UnresolvableElement,
    /// No JDBC type constructor or descriptor for a type code
    UnknownTypeCode,
    /// No domain type registered under a key
    UnknownDomainType,
    /// Soft-delete configuration cannot be applied
    InvalidSoftDelete,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    /// Converter or type that rejected the value
    pub converter: Option<String>,
}

#[derive(Debug)]
pub struct RenderError {
    pub kind: RenderErrorKind,
    pub message: String,
    /// Function being rendered, if the failure happened inside a renderer
    pub function: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderErrorKind {
    /// Wrong number of arguments
    Arity,
    /// Argument has no resolved expression type
    MissingExpressionType,
    /// Argument expected to be array-typed is not
    NotAnArray,
    /// Value cannot be rendered as an inline literal
    UnsupportedLiteral,
}

impl Error {
    /// Is this a type-mapping failure?
    pub fn is_mapping_error(&self) -> bool {
        matches!(self, Error::Mapping(_))
    }

    /// Is this a rendering failure?
    pub fn is_render_error(&self) -> bool {
        matches!(self, Error::Render(_))
    }

    /// The mapping error kind, if this is a mapping error.
    pub fn mapping_kind(&self) -> Option<MappingErrorKind> {
        match self {
            Error::Mapping(m) => Some(m.kind),
            _ => None,
        }
    }

    /// The render error kind, if this is a render error.
    pub fn render_kind(&self) -> Option<RenderErrorKind> {
        match self {
            Error::Render(r) => Some(r.kind),
            _ => None,
        }
    }
}

impl MappingError {
    pub fn new(kind: MappingErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            type_name: None,
        }
    }

    /// Attach the name of the type being mapped.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl RenderError {
    pub fn new(kind: RenderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            function: None,
        }
    }

    /// Attach the name of the function being rendered.
    pub fn in_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Mapping(e) => write!(f, "Mapping error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Type(e) => write!(f, "Type error: {}", e),
            Error::Render(e) => write!(f, "Render error: {}", e),
            Error::Serde(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.type_name {
            write!(f, "{} (type '{}')", self.message, name)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(conv) = &self.converter {
            write!(
                f,
                "expected {} in converter '{}', found {}",
                self.expected, conv, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = &self.function {
            write!(f, "{}: {}", function, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl From<MappingError> for Error {
    fn from(err: MappingError) -> Self {
        Error::Mapping(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Error::Render(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err.to_string())
    }
}

/// Result type alias for ormtype operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_error_display_includes_type() {
        let err: Error = MappingError::new(
            MappingErrorKind::UnresolvableElement,
            "nested plural types are not resolvable",
        )
        .with_type("[[i32]]")
        .into();

        assert!(err.is_mapping_error());
        assert_eq!(err.mapping_kind(), Some(MappingErrorKind::UnresolvableElement));
        assert_eq!(
            err.to_string(),
            "Mapping error: nested plural types are not resolvable (type '[[i32]]')"
        );
    }

    #[test]
    fn render_error_kind_and_function() {
        let err: Error = RenderError::new(RenderErrorKind::Arity, "expected 2 arguments, got 1")
            .in_function("array_overlaps")
            .into();

        assert!(err.is_render_error());
        assert!(!err.is_mapping_error());
        assert_eq!(err.render_kind(), Some(RenderErrorKind::Arity));
        assert_eq!(
            err.to_string(),
            "Render error: array_overlaps: expected 2 arguments, got 1"
        );
    }

    #[test]
    fn serde_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serde(_)));
    }
}
