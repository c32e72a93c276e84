//! Derive macro implementation for envschema

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, GenericArgument, PathArguments, Type};

mod attrs;

use attrs::{EnumAttrs, FieldAttrs, VariantAttrs};

/// Check if type is Option<T>
fn is_option(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        type_path
            .path
            .segments
            .last()
            .map(|seg| seg.ident == "Option")
            .unwrap_or(false)
    } else {
        false
    }
}

/// Inner type of `Option<T>`, or the type itself
fn unwrap_option(ty: &Type) -> &Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return inner;
                    }
                }
            }
        }
    }
    ty
}

/// Check if type is `Literal` (any path ending in it)
fn is_literal(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "Literal"),
        _ => false,
    }
}

/// `EnvSchema` derive macro
///
/// Implements `envschema::EnvSchema` for a struct with named fields. Each
/// field is bound to the environment variable named after it, upper-cased.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[env(default = value)]`: Value used if the env var is not set
/// - `#[env(one_of = [lit, ...])]`: Closed literal set for `Literal` fields
/// - `#[env(inherited)]`: Read from a parent schema instead of declaring it
///
/// # Example
///
/// See the `envschema` crate documentation for usage examples.
#[proc_macro_derive(EnvSchema, attributes(env))]
pub fn derive_env_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_schema(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_schema(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let schema_name = struct_name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Extract fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "EnvSchema only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "EnvSchema only supports structs",
            ));
        }
    };

    let mut declarations = Vec::new();
    let mut readers = Vec::new();

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_type = &field.ty;
        let field_name = field_ident.unraw().to_string();
        let attrs = FieldAttrs::from_field(field)?;
        let optional = is_option(field_type);

        readers.push(quote! {
            #field_ident: schema.get_as::<#field_type>(#field_name)?
        });

        // Check for invalid combinations
        if attrs.inherited {
            if attrs.default.is_some() || attrs.one_of.is_some() {
                return Err(syn::Error::new_spanned(
                    field_ident,
                    "inherited fields are declared by a parent schema and cannot have default or one_of",
                ));
            }
            continue;
        }

        if attrs.one_of.is_some() && !is_literal(unwrap_option(field_type)) {
            return Err(syn::Error::new_spanned(
                field_type,
                "one_of is only allowed on Literal or Option<Literal> fields",
            ));
        }

        if optional && attrs.default.is_some() {
            return Err(syn::Error::new_spanned(
                field_type,
                "Option<T> fields cannot have default attribute (they default to None automatically)",
            ));
        }

        let declared = match &attrs.one_of {
            Some(values) => {
                let set = quote! {
                    ::envschema::DeclaredType::Literal(::std::vec![
                        #(::envschema::Literal::from(#values)),*
                    ])
                };
                if optional {
                    quote! { ::envschema::DeclaredType::optional(#set) }
                } else {
                    set
                }
            }
            None => quote! { <#field_type as ::envschema::Describe>::describe() },
        };

        let declaration = match &attrs.default {
            Some(default_value) => quote! {
                ::envschema::FieldSpec::new(#field_name, #declared).with_default(#default_value)
            },
            None => quote! {
                ::envschema::FieldSpec::new(#field_name, #declared)
            },
        };
        declarations.push(declaration);
    }

    Ok(quote! {
        impl #impl_generics ::envschema::EnvSchema for #struct_name #ty_generics #where_clause {
            const NAME: &'static str = #schema_name;

            fn fields() -> ::std::vec::Vec<::envschema::FieldSpec> {
                ::std::vec![#(#declarations),*]
            }

            fn from_schema(
                schema: &::envschema::Schema,
            ) -> ::std::result::Result<Self, ::envschema::AttributeError> {
                ::std::result::Result::Ok(Self {
                    #(#readers),*
                })
            }
        }
    })
}

/// `EnvEnum` derive macro
///
/// Implements `envschema::EnvEnum`, `Describe`, `FromValue` and
/// `From<Self> for Value` for an enum with unit variants only.
///
/// # Supported Attributes
///
/// **Enum-level**:
/// - `#[env(rename_all = "...")]`: `lowercase`, `UPPERCASE`, `snake_case`,
///   `SCREAMING_SNAKE_CASE` or `kebab-case` applied to variant names
///
/// **Variant-level**:
/// - `#[env(repr = lit)]`: Representation the raw text must equal
#[proc_macro_derive(EnvEnum, attributes(env))]
pub fn derive_env_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_enum(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_enum(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_ident = &input.ident;
    let enum_name = enum_ident.unraw().to_string();

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(input, "EnvEnum only supports enums"));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "EnvEnum does not support generic enums",
        ));
    }

    let enum_attrs = EnumAttrs::from_attrs(&input.attrs)?;

    let mut idents = Vec::new();
    let mut names = Vec::new();
    let mut reprs = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "EnvEnum only supports unit variants",
            ));
        }
        let attrs = VariantAttrs::from_variant(variant)?;
        let name = variant.ident.unraw().to_string();
        let repr = match attrs.repr {
            Some(lit) => quote! { #lit },
            None => {
                let text = enum_attrs
                    .rename_all
                    .map(|rule| rule.apply(&name))
                    .unwrap_or_else(|| name.clone());
                quote! { #text }
            }
        };

        idents.push(&variant.ident);
        names.push(name);
        reprs.push(repr);
    }

    if idents.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "EnvEnum requires at least one variant",
        ));
    }

    Ok(quote! {
        impl ::envschema::EnvEnum for #enum_ident {
            fn enum_type() -> ::std::sync::Arc<::envschema::EnumType> {
                ::std::sync::Arc::new(
                    ::envschema::EnumType::new(#enum_name)
                        #(.member(#names, #reprs))*
                )
            }
        }

        impl ::envschema::Describe for #enum_ident {
            fn describe() -> ::envschema::DeclaredType {
                ::envschema::DeclaredType::Enum(<Self as ::envschema::EnvEnum>::enum_type())
            }
        }

        impl ::envschema::FromValue for #enum_ident {
            fn from_value(value: &::envschema::Value) -> ::std::option::Option<Self> {
                match value {
                    ::envschema::Value::Enum(member) if member.enum_name() == #enum_name => {
                        match member.name() {
                            #(#names => ::std::option::Option::Some(Self::#idents),)*
                            _ => ::std::option::Option::None,
                        }
                    }
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl ::std::convert::From<#enum_ident> for ::envschema::Value {
            fn from(value: #enum_ident) -> Self {
                let member = match value {
                    #(#enum_ident::#idents => ::envschema::EnumMember::new(#names, #reprs),)*
                };
                ::envschema::Value::Enum(::envschema::EnumValue::new(
                    <#enum_ident as ::envschema::EnvEnum>::enum_type(),
                    member,
                ))
            }
        }
    })
}
