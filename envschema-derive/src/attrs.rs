//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates configuration attributes from struct
//! fields, enum variants and enum containers during macro expansion.

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Field, Lit, Token, Variant};

/// Parsed `#[env(...)]` attributes from a struct field.
#[derive(Default)]
pub struct FieldAttrs {
    /// Expression used when the variable is not set.
    pub default: Option<proc_macro2::TokenStream>,

    /// Closed set of literal values (`one_of = [..]`), for `Literal` fields.
    pub one_of: Option<Vec<Expr>>,

    /// Read from a parent schema instead of declaring the field.
    pub inherited: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[env(...)]` attributes from a struct field.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in env_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                // default = value
                if meta.path.is_ident("default") {
                    let value = meta.value()?;
                    let tokens: Expr = value.parse()?;
                    attrs.default = Some(quote::quote!(#tokens));
                    return Ok(());
                }

                // one_of = [lit, ...]
                if meta.path.is_ident("one_of") {
                    let value = meta.value()?;
                    let content;
                    syn::bracketed!(content in value);
                    let items = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
                    if items.is_empty() {
                        return Err(meta.error("one_of requires at least one value"));
                    }
                    attrs.one_of = Some(items.into_iter().collect());
                    return Ok(());
                }

                // inherited
                if meta.path.is_ident("inherited") {
                    attrs.inherited = true;
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        Ok(attrs)
    }
}

/// Parsed `#[env(...)]` attributes from an enum variant.
#[derive(Debug, Default)]
pub struct VariantAttrs {
    /// Representation override (`repr = "dev"` or `repr = 1`).
    pub repr: Option<Lit>,
}

impl VariantAttrs {
    pub fn from_variant(variant: &Variant) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in env_attrs(&variant.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("repr") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    match lit {
                        Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_) => {
                            attrs.repr = Some(lit);
                        }
                        _ => return Err(meta.error("repr must be a string, number or bool")),
                    }
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        Ok(attrs)
    }
}

/// Parsed `#[env(...)]` attributes on an enum.
#[derive(Debug, Default)]
pub struct EnumAttrs {
    /// Case conversion applied to variant names without an explicit `repr`.
    pub rename_all: Option<RenameRule>,
}

impl EnumAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in env_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let value = meta.value()?;
                    let rule: syn::LitStr = value.parse()?;
                    parsed.rename_all = Some(RenameRule::parse(&rule.value()).ok_or_else(|| {
                        syn::Error::new_spanned(
                            &rule,
                            "expected one of \"lowercase\", \"UPPERCASE\", \"snake_case\", \"SCREAMING_SNAKE_CASE\", \"kebab-case\"",
                        )
                    })?);
                    return Ok(());
                }

                Err(meta.error("unsupported enum-level env attribute"))
            })?;
        }

        Ok(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    fn parse(rule: &str) -> Option<Self> {
        match rule {
            "lowercase" => Some(Self::Lower),
            "UPPERCASE" => Some(Self::Upper),
            "snake_case" => Some(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnake),
            "kebab-case" => Some(Self::Kebab),
            _ => None,
        }
    }

    /// Apply the rule to a `PascalCase` variant name.
    pub fn apply(self, variant: &str) -> String {
        match self {
            Self::Lower => variant.to_lowercase(),
            Self::Upper => variant.to_uppercase(),
            Self::Snake => split_words(variant, '_'),
            Self::ScreamingSnake => split_words(variant, '_').to_uppercase(),
            Self::Kebab => split_words(variant, '-'),
        }
    }
}

fn split_words(variant: &str, sep: char) -> String {
    let mut out = String::with_capacity(variant.len() + 4);
    for (i, ch) in variant.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push(sep);
        }
        out.extend(ch.to_lowercase());
    }
    out
}

fn env_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("env"))
}
