//! Declared field types
//!
//! A [`DeclaredType`] is what the schema author writes down for a field. It is
//! turned into a decoding [`Category`](crate::Category) by the classifier.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Type descriptor supplied for every declared field.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    Str,
    /// Integer of a given width and signedness
    Int(IntKind),
    Float(FloatKind),
    Bool,
    /// Arbitrary JSON value
    Json,
    /// Closed set of named members
    Enum(Arc<EnumType>),
    /// Closed set of literal values of mixed scalar kinds
    Literal(Vec<Literal>),
    /// Comma-separated sequence
    List(Box<DeclaredType>),
    /// May be absent or blank
    Optional(Box<DeclaredType>),
    /// Any host type without a recognised shape
    Other(String),
}

impl DeclaredType {
    /// Shorthand for `Optional(inner)`.
    pub fn optional(inner: DeclaredType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Shorthand for `List(element)`.
    pub fn list(element: DeclaredType) -> Self {
        Self::List(Box::new(element))
    }

    /// Infer a declared type from the shape of a default value.
    ///
    /// Lists take the type of their first element; an empty list or an
    /// absent value has no recognisable shape.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Str(_) => Self::Str,
            Value::Int(n) if IntKind::I64.contains(*n) => Self::Int(IntKind::I64),
            Value::Int(_) => Self::Int(IntKind::U64),
            Value::Float(_) => Self::Float(FloatKind::F64),
            Value::Bool(_) => Self::Bool,
            Value::Json(_) => Self::Json,
            Value::Enum(v) => Self::Enum(Arc::clone(v.enum_type())),
            Value::List(items) => match items.first() {
                Some(first) => Self::list(Self::of_value(first)),
                None => Self::Other("Vec<_>".to_string()),
            },
            Value::Absent => Self::Other("None".to_string()),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("String"),
            Self::Int(kind) => f.write_str(kind.name()),
            Self::Float(kind) => f.write_str(kind.name()),
            Self::Bool => f.write_str("bool"),
            Self::Json => f.write_str("Json"),
            Self::Enum(ty) => f.write_str(ty.name()),
            Self::Literal(values) => {
                f.write_str("Literal[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Self::List(inner) => write!(f, "Vec<{inner}>"),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Target integer type of a field. Decoded values outside its range are
/// rejected while binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntKind {
    I8,
    I16,
    I32,
    #[default]
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
}

impl IntKind {
    pub fn min(self) -> i128 {
        match self {
            Self::I8 => i8::MIN.into(),
            Self::I16 => i16::MIN.into(),
            Self::I32 => i32::MIN.into(),
            Self::I64 => i64::MIN.into(),
            Self::Isize => isize::MIN as i128,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize => 0,
        }
    }

    pub fn max(self) -> i128 {
        match self {
            Self::I8 => i8::MAX.into(),
            Self::I16 => i16::MAX.into(),
            Self::I32 => i32::MAX.into(),
            Self::I64 => i64::MAX.into(),
            Self::Isize => isize::MAX as i128,
            Self::U8 => u8::MAX.into(),
            Self::U16 => u16::MAX.into(),
            Self::U32 => u32::MAX.into(),
            Self::U64 => u64::MAX.into(),
            Self::Usize => usize::MAX as i128,
        }
    }

    pub fn contains(self, n: i128) -> bool {
        (self.min()..=self.max()).contains(&n)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
        }
    }
}

/// Target float type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FloatKind {
    F32,
    #[default]
    F64,
}

impl FloatKind {
    /// Whether `x` is representable without overflowing to infinity.
    /// Infinities and NaN given as such always fit.
    pub fn fits(self, x: f64) -> bool {
        match self {
            Self::F64 => true,
            Self::F32 => !x.is_finite() || x.abs() <= f64::from(f32::MAX),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// A scalar literal: member of a literal set or representation of an enum member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Literal {
    /// Textual form used for exact matching against raw input.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Str(s) => Cow::Borrowed(s),
            Self::Int(n) => Cow::Owned(n.to_string()),
            // Debug keeps the fractional part ("1.0", not "1")
            Self::Float(x) => Cow::Owned(format!("{x:?}")),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            other => f.write_str(&other.as_text()),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One named member of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    name: String,
    repr: Literal,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, repr: impl Into<Literal>) -> Self {
        Self {
            name: name.into(),
            repr: repr.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scalar representation that raw input must match.
    pub fn repr(&self) -> &Literal {
        &self.repr
    }
}

/// A closed set of named members with one scalar representation each.
///
/// ```rust
/// use envschema::EnumType;
///
/// let stage = EnumType::new("Stage")
///     .member("Development", "development")
///     .member("Production", "production");
/// assert_eq!(stage.members().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    name: String,
    members: Vec<EnumMember>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Append a member.
    pub fn member(mut self, name: impl Into<String>, repr: impl Into<Literal>) -> Self {
        self.members.push(EnumMember::new(name, repr));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Look up the member whose representation is exactly `text`.
    pub fn find_by_repr(&self, text: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.repr.as_text() == text)
    }

    /// Whether this is a well-formed closed set: at least one member, no
    /// duplicated member names.
    pub fn is_closed_set(&self) -> bool {
        !self.members.is_empty()
            && self
                .members
                .iter()
                .enumerate()
                .all(|(i, m)| self.members[..i].iter().all(|prev| prev.name != m.name))
    }
}

/// Map a Rust type onto the [`DeclaredType`] the classifier understands.
///
/// Implemented for the primitives, `String`, `serde_json::Value`, `Vec<T>`
/// and `Option<T>`. `#[derive(EnvEnum)]` implements it for fieldless enums.
pub trait Describe {
    fn describe() -> DeclaredType;
}

macro_rules! describe_as {
    ($($ty:ty => $declared:expr),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> DeclaredType {
                    $declared
                }
            }
        )+
    };
}

describe_as! {
    String => DeclaredType::Str,
    i8 => DeclaredType::Int(IntKind::I8),
    i16 => DeclaredType::Int(IntKind::I16),
    i32 => DeclaredType::Int(IntKind::I32),
    i64 => DeclaredType::Int(IntKind::I64),
    isize => DeclaredType::Int(IntKind::Isize),
    u8 => DeclaredType::Int(IntKind::U8),
    u16 => DeclaredType::Int(IntKind::U16),
    u32 => DeclaredType::Int(IntKind::U32),
    u64 => DeclaredType::Int(IntKind::U64),
    usize => DeclaredType::Int(IntKind::Usize),
    f32 => DeclaredType::Float(FloatKind::F32),
    f64 => DeclaredType::Float(FloatKind::F64),
    bool => DeclaredType::Bool,
    serde_json::Value => DeclaredType::Json,
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> DeclaredType {
        DeclaredType::list(T::describe())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> DeclaredType {
        DeclaredType::optional(T::describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_primitives() {
        assert_eq!(String::describe(), DeclaredType::Str);
        assert_eq!(u16::describe(), DeclaredType::Int(IntKind::U16));
        assert_eq!(f32::describe(), DeclaredType::Float(FloatKind::F32));
        assert_eq!(bool::describe(), DeclaredType::Bool);
        assert_eq!(serde_json::Value::describe(), DeclaredType::Json);
    }

    #[test]
    fn test_describe_wrappers() {
        assert_eq!(
            Option::<Vec<i64>>::describe(),
            DeclaredType::optional(DeclaredType::list(DeclaredType::Int(IntKind::I64)))
        );
    }

    #[test]
    fn test_int_kind_ranges() {
        assert!(IntKind::U16.contains(65535));
        assert!(!IntKind::U16.contains(65536));
        assert!(!IntKind::U64.contains(-1));
        assert!(IntKind::U64.contains(u64::MAX.into()));
        assert!(!IntKind::I64.contains(u64::MAX.into()));
        assert_eq!(IntKind::I8.min(), -128);
    }

    #[test]
    fn test_float_kind_fits() {
        assert!(FloatKind::F32.fits(1.5));
        assert!(!FloatKind::F32.fits(1e300));
        assert!(FloatKind::F32.fits(f64::INFINITY));
        assert!(FloatKind::F64.fits(1e300));
    }

    #[test]
    fn test_display_nested() {
        let ty = DeclaredType::optional(DeclaredType::list(DeclaredType::Float(FloatKind::F64)));
        assert_eq!(ty.to_string(), "Option<Vec<f64>>");

        let lit = DeclaredType::Literal(vec![Literal::from("text"), Literal::Int(100)]);
        assert_eq!(lit.to_string(), "Literal[\"text\", 100]");
    }

    #[test]
    fn test_literal_text_forms() {
        assert_eq!(Literal::Float(1.0).as_text(), "1.0");
        assert_eq!(Literal::Float(0.25).as_text(), "0.25");
        assert_eq!(Literal::Bool(true).as_text(), "true");
        assert_eq!(Literal::Int(-3).as_text(), "-3");
    }

    #[test]
    fn test_enum_closed_set() {
        assert!(!EnumType::new("Empty").is_closed_set());
        assert!(EnumType::new("Level").member("Low", 1).is_closed_set());

        let duplicated = EnumType::new("Dup").member("A", "a").member("A", "b");
        assert!(!duplicated.is_closed_set());
    }

    #[test]
    fn test_of_value() {
        assert_eq!(DeclaredType::of_value(&Value::Int(3)), DeclaredType::Int(IntKind::I64));
        assert_eq!(
            DeclaredType::of_value(&Value::from(u64::MAX)),
            DeclaredType::Int(IntKind::U64)
        );
        assert_eq!(
            DeclaredType::of_value(&Value::List(vec![Value::Str("a".into())])),
            DeclaredType::list(DeclaredType::Str)
        );
        assert!(matches!(
            DeclaredType::of_value(&Value::List(vec![])),
            DeclaredType::Other(_)
        ));
    }
}
