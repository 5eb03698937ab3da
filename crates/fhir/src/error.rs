use thiserror::Error;

/// Failure to read a primitive value from its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The JSON value has the wrong shape for the primitive type.
    #[error("expected {expected}, found {found}")]
    WrongJsonType {
        expected: &'static str,
        found: &'static str,
    },

    /// The lexical form does not parse as the primitive type.
    #[error("invalid {type_name} '{lexical}': {reason}")]
    InvalidLexical {
        type_name: &'static str,
        lexical: String,
        reason: String,
    },
}

impl PrimitiveError {
    pub(crate) fn invalid(
        type_name: &'static str,
        lexical: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        PrimitiveError::InvalidLexical {
            type_name,
            lexical: lexical.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A required member still absent once a record has been decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required member {type_name}.{member}")]
pub struct MissingMember {
    pub type_name: &'static str,
    pub member: &'static str,
}

/// Short description of a JSON value's shape, for error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
