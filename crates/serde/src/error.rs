//! Error types for FHIR serialization and deserialization.

use thiserror::Error;

/// Errors raised by the JSON and XML codecs.
///
/// Decoding stops at the first error; nothing partial is returned.
#[derive(Debug, Error)]
pub enum SerdeError {
    /// JSON syntax or I/O error from `serde_json`
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML syntax error from `quick-xml`
    #[cfg(feature = "xml")]
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error during serialization/deserialization
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A key or element that the record does not declare
    #[error("unknown member '{member}' in {type_name}")]
    UnknownMember { type_name: String, member: String },

    /// An XML attribute other than the ones the element allows
    #[error("unknown attribute '{attribute}' on {element}")]
    UnknownAttribute { element: String, attribute: String },

    #[error("unknown resource type '{0}'")]
    UnknownResourceType(String),

    #[error("missing resourceType")]
    MissingResourceType,

    /// A required member absent from a decoded record
    #[error("missing required member '{member}' in {type_name}")]
    MissingMember { type_name: String, member: String },

    /// The document holds a different resource than the caller asked for
    #[error("expected a {expected} resource, found {found}")]
    WrongResourceType { expected: String, found: String },

    /// Two alternatives of one choice member in the same object
    #[error("multiple values for choice field {type_name}.{field}[x]: '{first}' and '{second}'")]
    MultipleChoiceValues {
        type_name: String,
        field: String,
        first: String,
        second: String,
    },

    /// A non-repeating member given twice
    #[error("duplicate member '{member}' in {type_name}")]
    DuplicateMember { type_name: String, member: String },

    #[error("element <{element}> is in namespace '{found}', expected '{expected}'")]
    WrongNamespace {
        element: String,
        expected: String,
        found: String,
    },

    /// A token of the wrong kind where the grammar expects something else
    #[error("unexpected {found} in {context}, expected {expected}")]
    UnexpectedContent {
        context: String,
        expected: String,
        found: String,
    },

    /// A value or metadata sibling with the wrong shape or lexical form
    #[error("invalid value for {type_name}.{member}: {message}")]
    InvalidValue {
        type_name: String,
        member: String,
        message: String,
    },

    /// Custom error message
    #[error("{0}")]
    Custom(String),
}

/// Error categories: grammar violations, malformed values, sink/source failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Representation,
    Io,
}

impl SerdeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SerdeError::Json(e) if e.is_io() => ErrorKind::Io,
            #[cfg(feature = "xml")]
            SerdeError::Xml(quick_xml::Error::Io(_)) => ErrorKind::Io,
            SerdeError::Io(_) => ErrorKind::Io,
            SerdeError::InvalidValue { .. } => ErrorKind::Representation,
            _ => ErrorKind::Structural,
        }
    }

    pub(crate) fn unexpected(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        SerdeError::UnexpectedContent {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn invalid(
        type_name: impl Into<String>,
        member: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        SerdeError::InvalidValue {
            type_name: type_name.into(),
            member: member.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn choice_conflict(type_name: &str, field: &str, first: &str, second: &str) -> Self {
        SerdeError::MultipleChoiceValues {
            type_name: type_name.to_string(),
            field: field.to_string(),
            first: helios_serde_support::choice_key(field, first),
            second: helios_serde_support::choice_key(field, second),
        }
    }
}

impl From<helios_fhir::MissingMember> for SerdeError {
    fn from(missing: helios_fhir::MissingMember) -> Self {
        SerdeError::MissingMember {
            type_name: missing.type_name.to_string(),
            member: missing.member.to_string(),
        }
    }
}

impl From<String> for SerdeError {
    fn from(msg: String) -> Self {
        SerdeError::Custom(msg)
    }
}

impl From<&str> for SerdeError {
    fn from(msg: &str) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

/// Result type alias for FHIR serialization operations
pub type Result<T> = std::result::Result<T, SerdeError>;
