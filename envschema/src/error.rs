//! Error types for environment variable configuration

use crate::types::Literal;

/// Errors raised while binding a schema to the environment.
///
/// Every variant names the offending environment variable (the upper-cased
/// field name) so the environment can be fixed without reading source code.
/// A binding pass stops at the first error; nothing is retried or swallowed.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// Required field, no default, variable not set.
    #[error("Failed to load required environment variable `{name}`")]
    MissingRequiredVariable {
        /// Name of the missing environment variable
        name: String,
    },

    /// Required field whose variable is set to the empty string.
    ///
    /// Raised even when the field declares a default: blank is never
    /// replaced by the default.
    #[error(
        "Environment variable `{name}` is blank and not marked as optional; it must have a value"
    )]
    BlankRequiredVariable {
        /// Name of the blank environment variable
        name: String,
    },

    /// A numeric scalar or sequence element could not be parsed.
    #[error("Failed to parse environment variable `{name}` as {kind}: invalid value {value:?} ({message})")]
    NumericParse {
        /// Name of the environment variable being parsed
        name: String,
        /// Target numeric kind (`integer` or `float`)
        kind: &'static str,
        /// Offending text (the whole value, or one sequence element)
        value: String,
        /// Error message from the numeric parser
        message: String,
    },

    /// The value is not well-formed JSON.
    #[error("Failed to parse environment variable `{name}` as JSON: {source}")]
    JsonParse {
        /// Name of the environment variable being parsed
        name: String,
        /// Parser diagnostic, including line and column
        source: serde_json::Error,
    },

    /// The value matches no member representation of the enumeration.
    #[error("Environment variable `{name}` has value {value:?}, which is not a member of enum `{enum_name}`")]
    EnumValue {
        /// Name of the environment variable being parsed
        name: String,
        /// Name of the declared enumeration
        enum_name: String,
        /// Offending raw value
        value: String,
    },

    /// The value matches none of the declared literals under any coercion.
    #[error("Environment variable `{name}` has value {value:?}, expected one of {}", join_literals(.allowed))]
    LiteralValue {
        /// Name of the environment variable being parsed
        name: String,
        /// Offending raw value
        value: String,
        /// Full allowed set, in declaration order
        allowed: Vec<Literal>,
    },

    /// The declared type does not classify into any supported category.
    #[error("Unsupported type {declared} for field `{field}` (environment variable `{name}`)")]
    UnsupportedFieldType {
        /// Field name as declared
        field: String,
        /// Name of the environment variable that was read
        name: String,
        /// Rendering of the declared type
        declared: String,
    },
}

impl EnvError {
    /// Create a missing environment variable error (used by the resolver)
    #[doc(hidden)]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingRequiredVariable { name: name.into() }
    }

    /// Create a blank environment variable error (used by the resolver)
    #[doc(hidden)]
    pub fn blank(name: impl Into<String>) -> Self {
        Self::BlankRequiredVariable { name: name.into() }
    }

    /// Name of the environment variable this error is about.
    pub fn env_name(&self) -> &str {
        match self {
            Self::MissingRequiredVariable { name }
            | Self::BlankRequiredVariable { name }
            | Self::NumericParse { name, .. }
            | Self::JsonParse { name, .. }
            | Self::EnumValue { name, .. }
            | Self::LiteralValue { name, .. }
            | Self::UnsupportedFieldType { name, .. } => name,
        }
    }
}

/// Failure of a single decode, before it is attributed to a field.
///
/// The resolver turns these into [`EnvError`] by attaching the variable name.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("cannot parse {value:?} as {kind}: {message}")]
    Numeric {
        kind: &'static str,
        value: String,
        message: String,
    },

    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("{value:?} is not a member of enum `{enum_name}`")]
    Enum { enum_name: String, value: String },

    #[error("{value:?} matches none of {}", join_literals(.allowed))]
    Literal { value: String, allowed: Vec<Literal> },

    #[error("no decoder for an unsupported type")]
    Unsupported,
}

impl DecodeError {
    pub(crate) fn numeric(
        kind: &'static str,
        value: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Numeric {
            kind,
            value: value.into(),
            message: message.to_string(),
        }
    }

    /// Attribute this failure to a field.
    pub fn for_field(self, field: &crate::FieldSpec) -> EnvError {
        let name = field.env_name().to_string();
        match self {
            Self::Numeric {
                kind,
                value,
                message,
            } => EnvError::NumericParse {
                name,
                kind,
                value,
                message,
            },
            Self::Json(source) => EnvError::JsonParse { name, source },
            Self::Enum { enum_name, value } => EnvError::EnumValue {
                name,
                enum_name,
                value,
            },
            Self::Literal { value, allowed } => EnvError::LiteralValue {
                name,
                value,
                allowed,
            },
            Self::Unsupported => EnvError::UnsupportedFieldType {
                field: field.name().to_string(),
                name,
                declared: field.declared().to_string(),
            },
        }
    }
}

/// Errors raised when reading bound attributes back out of a schema.
#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    /// Neither the schema nor any of its parents binds this field.
    #[error("schema `{schema}` has no attribute `{field}`")]
    Unknown {
        /// Schema that was queried
        schema: String,
        /// Requested field name
        field: String,
    },

    /// The bound value cannot be converted into the requested Rust type.
    #[error("attribute `{field}` holds {found}, which cannot be read as {expected}")]
    TypeMismatch {
        /// Requested field name
        field: String,
        /// Fully qualified name of the requested type
        expected: &'static str,
        /// Kind of the bound value
        found: &'static str,
    },
}

fn join_literals(values: &[Literal]) -> String {
    let items = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{items}]")
}
