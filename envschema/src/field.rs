use crate::types::{DeclaredType, Describe};
use crate::value::Value;

/// One declared configuration field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    env_name: String,
    declared: DeclaredType,
    default: Option<Value>,
}

impl FieldSpec {
    /// Declare a field; its variable name is the upper-cased field name.
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        let name = name.into();
        Self {
            env_name: env_name_for(&name),
            name,
            declared,
            default: None,
        }
    }

    /// Declare a field whose type comes from a Rust type.
    pub fn of<T: Describe>(name: impl Into<String>) -> Self {
        Self::new(name, T::describe())
    }

    /// Declare a field by default value only; the type is inferred from it.
    pub fn inferred(name: impl Into<String>, default: impl Into<Value>) -> Self {
        let default = default.into();
        Self::new(name, DeclaredType::of_value(&default)).with_default(default)
    }

    /// Value used when a required field's variable is absent.
    ///
    /// Ignored for optional fields, which resolve to [`Value::Absent`].
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn declared(&self) -> &DeclaredType {
        &self.declared
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.declared, DeclaredType::Optional(_))
    }
}

/// Environment variable name for a field: upper-cased, nothing else.
pub fn env_name_for(name: &str) -> String {
    name.to_uppercase()
}
