//! Decoded values and typed read-back

use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::types::{EnumMember, EnumType, FloatKind, Literal};

/// A decoded configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Optional field with no value. Distinct from `Json(Null)`.
    Absent,
    Str(String),
    /// Wide enough for every `i64` and `u64`
    Int(i128),
    Float(f64),
    Bool(bool),
    Json(serde_json::Value),
    Enum(EnumValue),
    List(Vec<Value>),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Absent => "no value",
            Self::Str(_) => "a string",
            Self::Int(_) => "an integer",
            Self::Float(_) => "a float",
            Self::Bool(_) => "a bool",
            Self::Json(_) => "a JSON value",
            Self::Enum(_) => "an enum member",
            Self::List(_) => "a list",
        }
    }
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        match value {
            Literal::Str(s) => Self::Str(s),
            Literal::Int(n) => Self::Int(n.into()),
            Literal::Float(x) => Self::Float(x),
            Literal::Bool(b) => Self::Bool(b),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

macro_rules! value_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Int(value.into())
                }
            }
        )+
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Self::Int(value as i128)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Int(value as i128)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Self::Enum(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// A member of an enumeration, together with the type it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    ty: Arc<EnumType>,
    member: EnumMember,
}

impl EnumValue {
    pub fn new(ty: Arc<EnumType>, member: EnumMember) -> Self {
        Self { ty, member }
    }

    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.ty
    }

    pub fn enum_name(&self) -> &str {
        self.ty.name()
    }

    /// Member name, e.g. `Development`.
    pub fn name(&self) -> &str {
        self.member.name()
    }

    /// Member representation, e.g. `"development"`.
    pub fn repr(&self) -> &Literal {
        self.member.repr()
    }
}

impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.repr().serialize(serializer)
    }
}

/// Convert a bound [`Value`] back into a Rust type.
///
/// Returns `None` when the value has a different shape. Values bound from the
/// environment are already range-checked for the field's own type; reading
/// them as a narrower type rejects values outside its range.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

macro_rules! from_value_int {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(n) => <$ty>::try_from(*n).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            // defaults written as integer literals
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value)
            .filter(|x| FloatKind::F32.fits(*x))
            .map(|x| x as f32)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Json(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromValue for Literal {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(Literal::Str(s.clone())),
            Value::Int(n) => i64::try_from(*n).ok().map(Literal::Int),
            Value::Float(x) => Some(Literal::Float(*x)),
            Value::Bool(b) => Some(Literal::Bool(*b)),
            _ => None,
        }
    }
}

impl FromValue for EnumValue {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Enum(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Absent => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_narrowing_rejects_out_of_range() {
        assert_eq!(u16::from_value(&Value::Int(8080)), Some(8080));
        assert_eq!(u16::from_value(&Value::Int(70000)), None);
        assert_eq!(u16::from_value(&Value::Int(-1)), None);
        assert_eq!(u64::from_value(&Value::from(u64::MAX)), Some(u64::MAX));
        assert_eq!(f32::from_value(&Value::Float(1e300)), None);
        assert_eq!(f32::from_value(&Value::Float(0.5)), Some(0.5));
    }

    #[test]
    fn test_option_distinguishes_absent_from_null() {
        let absent = Option::<serde_json::Value>::from_value(&Value::Absent);
        assert_eq!(absent, Some(None));

        let null = Option::<serde_json::Value>::from_value(&Value::Json(serde_json::Value::Null));
        assert_eq!(null, Some(Some(serde_json::Value::Null)));
    }

    #[test]
    fn test_list_conversion() {
        let value = Value::from(vec![1, 2, 3]);
        assert_eq!(Vec::<i64>::from_value(&value), Some(vec![1, 2, 3]));
        assert_eq!(Vec::<String>::from_value(&value), None);
    }

    #[test]
    fn test_serialize_untagged() {
        let ty = Arc::new(EnumType::new("Stage").member("Dev", "dev"));
        let member = ty.members()[0].clone();
        let list = Value::List(vec![
            Value::Int(1),
            Value::Absent,
            Value::Enum(EnumValue::new(ty, member)),
        ]);
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            serde_json::json!([1, null, "dev"])
        );
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Value::Absent.kind_name(), "no value");
        assert_eq!(Value::from("x").kind_name(), "a string");
    }
}
