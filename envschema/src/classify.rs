//! Type classification
//!
//! Turns a [`DeclaredType`] into the closed [`Category`] union the decoder
//! matches on, plus whether the field is wrapped as optional.

use std::sync::Arc;

use crate::types::{DeclaredType, EnumType, FloatKind, IntKind, Literal};

/// Scalar kinds allowed as sequence elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Str,
    Int(IntKind),
    Float(FloatKind),
}

/// The decoded shape of a value, independent of optionality.
#[derive(Debug, Clone, PartialEq)]
pub enum Category {
    Str,
    Int(IntKind),
    Float(FloatKind),
    Bool,
    Json,
    Enumeration(Arc<EnumType>),
    /// Allowed values, captured at classification time
    LiteralSet(Vec<Literal>),
    Sequence(ElementKind),
    /// Not an error until something tries to decode it
    Unsupported,
}

/// Result of classifying a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub category: Category,
    pub optional: bool,
}

/// Classify a declared type.
///
/// Nested optional wrappers collapse into one. Anything without a recognised
/// shape (including `Vec<bool>`, `Vec<Json>`, `Vec<Enum>` and nested lists)
/// is [`Category::Unsupported`].
pub fn classify(declared: &DeclaredType) -> Classified {
    match declared {
        DeclaredType::Optional(inner) => Classified {
            category: classify(inner).category,
            optional: true,
        },
        other => Classified {
            category: category_of(other),
            optional: false,
        },
    }
}

fn category_of(declared: &DeclaredType) -> Category {
    match declared {
        DeclaredType::Str => Category::Str,
        DeclaredType::Int(kind) => Category::Int(*kind),
        DeclaredType::Float(kind) => Category::Float(*kind),
        DeclaredType::Bool => Category::Bool,
        DeclaredType::Json => Category::Json,
        DeclaredType::Enum(ty) if ty.is_closed_set() => Category::Enumeration(Arc::clone(ty)),
        DeclaredType::Literal(values) if !values.is_empty() => Category::LiteralSet(values.clone()),
        DeclaredType::List(element) => match element.as_ref() {
            DeclaredType::Str => Category::Sequence(ElementKind::Str),
            DeclaredType::Int(kind) => Category::Sequence(ElementKind::Int(*kind)),
            DeclaredType::Float(kind) => Category::Sequence(ElementKind::Float(*kind)),
            _ => Category::Unsupported,
        },
        _ => Category::Unsupported,
    }
}
