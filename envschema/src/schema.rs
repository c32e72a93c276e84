//! Schema binding
//!
//! A [`Schema`] owns the values of the fields it declares. Composed schemas
//! keep references to their parents and consult them at read time; inherited
//! values are never copied and never re-resolved by a child.
//!
//! # Refresh and concurrent readers
//!
//! Each binding pass resolves every field first and then writes the values
//! one field at a time, in declaration order. A reader racing a
//! [`Schema::refresh`] may therefore observe some fields with new values and
//! some with old ones. A failed pass writes nothing.

use log::{debug, trace};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AttributeError, EnvError};
use crate::field::FieldSpec;
use crate::resolve::resolve_from;
use crate::source::{EnvSource, ProcessEnv};
use crate::value::{FromValue, Value};

/// A named, ordered set of fields bound to environment values.
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
    parents: Vec<Arc<Schema>>,
    values: RwLock<HashMap<String, Value>>,
}

/// Collects field declarations and parents, then binds them.
///
/// ```rust
/// use envschema::{DeclaredType, EnvSnapshot, FieldSpec, Schema};
///
/// let env = EnvSnapshot::default().with("PORT", "9000");
/// let schema = Schema::builder("Server")
///     .field(FieldSpec::of::<u16>("port"))
///     .field(FieldSpec::new("host", DeclaredType::Str).with_default("localhost"))
///     .declare(&env)?;
///
/// assert_eq!(schema.get_as::<u16>("port")?, 9000);
/// assert_eq!(schema.get_as::<String>("host")?, "localhost");
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    parents: Vec<Arc<Schema>>,
}

impl SchemaBuilder {
    /// Declare a field. Re-declaring a name replaces the earlier declaration
    /// in place.
    pub fn field(mut self, field: FieldSpec) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn fields(self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        fields.into_iter().fold(self, Self::field)
    }

    /// Compose with an already bound schema. Earlier parents take precedence
    /// when several bind the same name.
    pub fn extends(mut self, parent: Arc<Schema>) -> Self {
        self.parents.push(parent);
        self
    }

    /// Run the first binding pass. No schema exists if it fails.
    pub fn declare(self, env: &dyn EnvSource) -> Result<Arc<Schema>, EnvError> {
        let schema = Schema {
            name: self.name,
            fields: self.fields,
            parents: self.parents,
            values: RwLock::new(HashMap::new()),
        };
        schema.bind(env)?;
        Ok(Arc::new(schema))
    }
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            ..SchemaBuilder::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields declared by this schema itself, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn parents(&self) -> &[Arc<Schema>] {
        &self.parents
    }

    /// Re-read `env` and overwrite this schema's own values.
    ///
    /// Parents are not re-bound. On error the previous values stay in place.
    pub fn refresh(&self, env: &dyn EnvSource) -> Result<(), EnvError> {
        self.bind(env)
    }

    /// [`refresh`](Self::refresh) against the live process environment.
    pub fn refresh_from_process(&self) -> Result<(), EnvError> {
        self.refresh(&ProcessEnv)
    }

    fn bind(&self, env: &dyn EnvSource) -> Result<(), EnvError> {
        debug!(
            "binding schema {} (fields={}, parents={})",
            self.name,
            self.fields.len(),
            self.parents.len()
        );

        let staged = self
            .fields
            .iter()
            .map(|field| {
                trace!("resolving {}.{} from {}", self.name, field.name(), field.env_name());
                resolve_from(field, env)
            })
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| debug!("binding schema {} aborted: {}", self.name, e))?;

        for (field, value) in self.fields.iter().zip(staged) {
            self.values.write().insert(field.name().to_string(), value);
        }

        debug!("bound schema {}", self.name);
        Ok(())
    }

    /// Bound value of `field`, looking through parents when this schema does
    /// not declare it.
    pub fn get(&self, field: &str) -> Option<Value> {
        if let Some(value) = self.values.read().get(field) {
            return Some(value.clone());
        }
        self.parents.iter().find_map(|parent| parent.get(field))
    }

    /// Bound value of `field` converted into `T`.
    pub fn get_as<T: FromValue>(&self, field: &str) -> Result<T, AttributeError> {
        let value = self.get(field).ok_or_else(|| AttributeError::Unknown {
            schema: self.name.clone(),
            field: field.to_string(),
        })?;
        T::from_value(&value).ok_or_else(|| AttributeError::TypeMismatch {
            field: field.to_string(),
            expected: std::any::type_name::<T>(),
            found: value.kind_name(),
        })
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.read().contains_key(field) || self.parents.iter().any(|p| p.contains(field))
    }

    /// Every readable attribute: own fields first, then inherited ones.
    pub fn bound_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fields.iter().map(|f| f.name().to_string()).collect();
        for parent in &self.parents {
            for name in parent.bound_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// All readable attributes as a JSON object.
    ///
    /// Fails only for integers outside the `i64`/`u64` range, which can only
    /// come from a hand-built default.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let map = self
            .bound_names()
            .into_iter()
            .filter_map(|name| self.get(&name).map(|value| (name, value)))
            .map(|(name, value)| Ok((name, serde_json::to_value(value)?)))
            .collect::<Result<serde_json::Map<_, _>, serde_json::Error>>()?;
        Ok(serde_json::Value::Object(map))
    }
}

/// A Rust struct whose fields are declared as a schema.
///
/// Usually implemented with `#[derive(EnvSchema)]`.
pub trait EnvSchema: Sized {
    /// Schema name used in errors and logs
    const NAME: &'static str;

    /// Fields this struct declares itself, in order.
    fn fields() -> Vec<FieldSpec>;

    /// Read the struct back out of a bound schema.
    fn from_schema(schema: &Schema) -> Result<Self, AttributeError>;

    /// Bind this struct's fields, composed with `parents`.
    fn declare(env: &dyn EnvSource, parents: &[Arc<Schema>]) -> Result<Arc<Schema>, EnvError> {
        parents
            .iter()
            .cloned()
            .fold(Schema::builder(Self::NAME), SchemaBuilder::extends)
            .fields(Self::fields())
            .declare(env)
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// - Required environment variables are not set or are blank
    /// - Environment variable values cannot be decoded into the declared types
    fn from_env() -> anyhow::Result<Self> {
        let schema = Self::declare(&ProcessEnv, &[])?;
        Ok(Self::from_schema(&schema)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EnvSnapshot;
    use crate::types::{DeclaredType, IntKind};
    use pretty_assertions::assert_eq;

    fn base(env: &EnvSnapshot) -> Arc<Schema> {
        Schema::builder("Base")
            .field(FieldSpec::new("host", DeclaredType::Str))
            .field(FieldSpec::new("port", DeclaredType::Int(IntKind::I64)).with_default(80))
            .declare(env)
            .unwrap()
    }

    #[test]
    fn test_declare_binds_in_order() {
        let env = EnvSnapshot::default().with("HOST", "example.com");
        let schema = base(&env);
        assert_eq!(schema.get("host"), Some(Value::Str("example.com".into())));
        assert_eq!(schema.get("port"), Some(Value::Int(80)));
        assert_eq!(schema.bound_names(), vec!["host", "port"]);
    }

    #[test]
    fn test_first_failure_aborts() {
        let env = EnvSnapshot::default().with("B", "x");
        let err = Schema::builder("S")
            .field(FieldSpec::new("a", DeclaredType::Int(IntKind::I64)))
            .field(FieldSpec::new("b", DeclaredType::Int(IntKind::I64)))
            .declare(&env)
            .unwrap_err();
        assert_eq!(err.env_name(), "A");
    }

    #[test]
    fn test_redeclared_field_last_wins() {
        let env = EnvSnapshot::default().with("PORT", "81");
        let schema = Schema::builder("S")
            .field(FieldSpec::new("port", DeclaredType::Str))
            .field(FieldSpec::new("other", DeclaredType::optional(DeclaredType::Str)))
            .field(FieldSpec::new("port", DeclaredType::Int(IntKind::I64)))
            .declare(&env)
            .unwrap();
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.fields()[0].declared(), &DeclaredType::Int(IntKind::I64));
        assert_eq!(schema.get("port"), Some(Value::Int(81)));
    }

    #[test]
    fn test_inherited_values_visible_by_reference() {
        let env = EnvSnapshot::default().with("HOST", "a").with("DEBUG", "1");
        let parent = base(&env);
        let child = Schema::builder("Child")
            .extends(Arc::clone(&parent))
            .field(FieldSpec::new("debug", DeclaredType::Bool))
            .declare(&env)
            .unwrap();

        assert_eq!(child.get("host"), Some(Value::Str("a".into())));
        assert_eq!(child.get("debug"), Some(Value::Bool(true)));
        assert!(!parent.contains("debug"));

        // a parent refresh is seen through the child without re-binding it
        parent
            .refresh(&EnvSnapshot::default().with("HOST", "b"))
            .unwrap();
        assert_eq!(child.get("host"), Some(Value::Str("b".into())));
    }

    #[test]
    fn test_child_does_not_rebind_parent_fields() {
        let parent = base(&EnvSnapshot::default().with("HOST", "a"));
        // HOST is missing here; only the child's own fields are resolved
        let child = Schema::builder("Child")
            .extends(Arc::clone(&parent))
            .declare(&EnvSnapshot::default())
            .unwrap();
        assert_eq!(child.get("host"), Some(Value::Str("a".into())));
    }

    #[test]
    fn test_override_leaves_parent_untouched() {
        let env = EnvSnapshot::default().with("HOST", "a").with("PORT", "8080");
        let parent = base(&env);
        let child = Schema::builder("Child")
            .extends(Arc::clone(&parent))
            .field(FieldSpec::new("port", DeclaredType::Str))
            .declare(&env)
            .unwrap();

        assert_eq!(child.get("port"), Some(Value::Str("8080".into())));
        assert_eq!(parent.get("port"), Some(Value::Int(8080)));
        assert_eq!(child.bound_names(), vec!["port", "host"]);
    }

    #[test]
    fn test_refresh_updates_values() {
        let schema = base(&EnvSnapshot::default().with("HOST", "a"));
        schema
            .refresh(&EnvSnapshot::default().with("HOST", "b").with("PORT", "1"))
            .unwrap();
        assert_eq!(schema.get("host"), Some(Value::Str("b".into())));
        assert_eq!(schema.get("port"), Some(Value::Int(1)));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_values() {
        let schema = base(&EnvSnapshot::default().with("HOST", "a"));
        let err = schema
            .refresh(&EnvSnapshot::default().with("HOST", "b").with("PORT", "x"))
            .unwrap_err();
        assert!(matches!(err, EnvError::NumericParse { .. }));
        assert_eq!(schema.get("host"), Some(Value::Str("a".into())));
    }

    #[test]
    fn test_get_as_errors() {
        let schema = base(&EnvSnapshot::default().with("HOST", "a"));
        assert!(matches!(
            schema.get_as::<String>("missing"),
            Err(AttributeError::Unknown { .. })
        ));
        match schema.get_as::<bool>("host") {
            Err(AttributeError::TypeMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, "bool");
                assert_eq!(found, "a string");
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_to_json() {
        let env = EnvSnapshot::default().with("HOST", "a");
        let parent = base(&env);
        let child = Schema::builder("Child")
            .extends(parent)
            .field(FieldSpec::new("tags", DeclaredType::optional(DeclaredType::Str)))
            .declare(&env)
            .unwrap();
        assert_eq!(
            child.to_json().unwrap(),
            serde_json::json!({"tags": null, "host": "a", "port": 80})
        );
    }

    #[test]
    fn test_to_json_reports_unrepresentable_value() {
        let schema = Schema::builder("Wide")
            .field(
                FieldSpec::new("n", DeclaredType::Int(IntKind::I64))
                    .with_default(Value::Int(i128::MAX)),
            )
            .declare(&EnvSnapshot::default())
            .unwrap();
        assert!(schema.to_json().is_err());
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }

    #[test]
    fn test_independent_schemas_bind_concurrently() {
        let env = Arc::new(EnvSnapshot::default().with("HOST", "a"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let env = Arc::clone(&env);
                std::thread::spawn(move || base(&env).get_as::<String>("host").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "a");
        }
    }
}
