//! Type-driven environment variable configuration
//!
//! `envschema` binds environment variables to declared configuration fields.
//! Each field has a name, a declared type and optionally a default; the type
//! alone decides how the variable's text is decoded.
//!
//! # Features
//!
//! - **Declarative**: `#[derive(EnvSchema)]` on a struct, or [`Schema::builder`] at runtime
//! - **Typed**: strings, integers, floats, booleans, JSON, enums, literal sets and comma-separated lists
//! - **Strict**: missing, blank and malformed values are reported with the variable name
//! - **Composable**: schemas can extend already-bound schemas and override their fields
//! - **Refreshable**: re-read the environment into an existing schema
//!
//! # Decoding rules
//!
//! | Declared type | Raw text |
//! |---------------|----------|
//! | `String` | used verbatim, whitespace included |
//! | integers, floats | surrounding whitespace trimmed, `_` allowed between digits, then parsed and range-checked for the field type |
//! | `bool` | `false` only for `false` (any case) or `0`; anything else is `true` |
//! | `serde_json::Value` | parsed as JSON |
//! | `#[derive(EnvEnum)]` enums | must equal a member's representation exactly |
//! | `Literal` with `#[env(one_of = [...])]` | matched textually, then by coercion per candidate |
//! | `Vec<String>`, `Vec<integer>`, `Vec<float>` | split on `,`, each token trimmed |
//!
//! An `Option<T>` field resolves to nothing when its variable is unset or
//! empty; an empty optional list resolves to `[]`. A required field with an
//! empty variable is always an error, even when it has a default.
//!
//! # Example
//!
//! ```rust
//! use envschema::EnvSchema;
//!
//! #[derive(Debug, EnvSchema)]
//! struct Config {
//!     pub database_url: String,
//!
//!     #[env(default = 8080)]
//!     pub port: u16,
//!
//!     pub allowed_hosts: Option<Vec<String>>,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("DATABASE_URL", "postgres://localhost/db");
//! #     std::env::set_var("ALLOWED_HOSTS", "a.example, b.example");
//! let config = Config::from_env()?;
//! assert_eq!(config.database_url, "postgres://localhost/db");
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.allowed_hosts, Some(vec!["a.example".to_string(), "b.example".to_string()]));
//! #     Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[env(default = value)]`
//!
//! Value used when the variable is not set. Not allowed on `Option<T>` fields.
//!
//! ## `#[env(one_of = [...])]`
//!
//! Restricts a [`Literal`] field to a closed set of scalar values.
//!
//! ```rust
//! # use envschema::{EnvSchema, Literal};
//! #[derive(EnvSchema)]
//! struct Config {
//!     #[env(one_of = ["auto", 0, 1.5, true])]
//!     pub workers: Literal,
//! }
//! ```
//!
//! ## `#[env(inherited)]`
//!
//! Field read from a parent schema instead of being declared.

pub mod classify;
pub mod decode;
pub mod resolve;

mod error;
mod field;
mod schema;
mod source;
mod types;
mod value;

pub use classify::{classify, Category, Classified, ElementKind};
pub use error::{AttributeError, DecodeError, EnvError};
pub use field::{env_name_for, FieldSpec};
pub use schema::{EnvSchema, Schema, SchemaBuilder};
pub use source::{EnvSnapshot, EnvSource, ProcessEnv};
pub use types::{DeclaredType, Describe, EnumMember, EnumType, FloatKind, IntKind, Literal};
pub use value::{EnumValue, FromValue, Value};

/// Enumerations whose members decode from their representations.
///
/// Usually implemented with `#[derive(EnvEnum)]`.
pub trait EnvEnum: Sized {
    fn enum_type() -> std::sync::Arc<EnumType>;
}

#[cfg(feature = "derive")]
pub use envschema_derive::{EnvEnum, EnvSchema};

// `EnvSchema::from_env` returns `anyhow::Result`
#[doc(hidden)]
pub use anyhow;
