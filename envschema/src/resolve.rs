//! Field resolution
//!
//! Applies presence, blankness, defaulting and optionality rules for one field
//! and hands the raw text to the decoder.

use crate::classify::{classify, Category, Classified};
use crate::decode::decode;
use crate::error::EnvError;
use crate::field::FieldSpec;
use crate::source::EnvSource;
use crate::value::Value;

/// Resolve one field from its raw variable value (`None` when unset).
///
/// Optional fields:
/// - unset or `""` resolves to [`Value::Absent`], except that `""` on a
///   sequence resolves to an empty list;
/// - anything else must decode; optionality waives presence, not validity.
///
/// Required fields:
/// - unset resolves to the declared default, or fails with
///   [`EnvError::MissingRequiredVariable`];
/// - `""` fails with [`EnvError::BlankRequiredVariable`], default or not;
/// - anything else must decode.
///
/// A required sequence set to `""` is therefore an error while an optional one
/// is `[]`.
pub fn resolve(field: &FieldSpec, raw: Option<&str>) -> Result<Value, EnvError> {
    let Classified { category, optional } = classify(field.declared());

    let raw = match (optional, raw) {
        (true, None) => return Ok(Value::Absent),
        (true, Some("")) => {
            return Ok(match category {
                Category::Sequence(_) => Value::List(Vec::new()),
                _ => Value::Absent,
            })
        }
        (false, None) => {
            return field
                .default()
                .cloned()
                .ok_or_else(|| EnvError::missing(field.env_name()))
        }
        (false, Some("")) => return Err(EnvError::blank(field.env_name())),
        (_, Some(raw)) => raw,
    };

    decode(&category, raw).map_err(|e| e.for_field(field))
}

/// Look the field's variable up in `env` and resolve it.
pub fn resolve_from(field: &FieldSpec, env: &dyn EnvSource) -> Result<Value, EnvError> {
    let raw = env.var(field.env_name());
    resolve(field, raw.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeclaredType, EnumType, IntKind, Literal};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn int_list() -> DeclaredType {
        DeclaredType::list(DeclaredType::Int(IntKind::I64))
    }

    #[test]
    fn test_required_present() {
        let field = FieldSpec::new("port", DeclaredType::Int(IntKind::I64));
        assert_eq!(resolve(&field, Some("8080")).unwrap(), Value::Int(8080));
    }

    #[test]
    fn test_required_missing() {
        let field = FieldSpec::new("port", DeclaredType::Int(IntKind::I64));
        let err = resolve(&field, None).unwrap_err();
        assert!(matches!(err, EnvError::MissingRequiredVariable { ref name } if name == "PORT"));
    }

    #[test]
    fn test_required_missing_uses_default() {
        let field = FieldSpec::new("port", DeclaredType::Int(IntKind::I64)).with_default(8080);
        assert_eq!(resolve(&field, None).unwrap(), Value::Int(8080));
    }

    #[test]
    fn test_required_blank_ignores_default() {
        let field = FieldSpec::new("port", DeclaredType::Int(IntKind::I64)).with_default(8080);
        let err = resolve(&field, Some("")).unwrap_err();
        assert!(matches!(err, EnvError::BlankRequiredVariable { ref name } if name == "PORT"));
    }

    #[test]
    fn test_default_returned_unchanged() {
        // defaults are not re-validated against the declared type
        let field = FieldSpec::new("mode", DeclaredType::Str).with_default(3);
        assert_eq!(resolve(&field, None).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_optional_absent_and_blank() {
        let field = FieldSpec::new("name", DeclaredType::optional(DeclaredType::Str));
        assert_eq!(resolve(&field, None).unwrap(), Value::Absent);
        assert_eq!(resolve(&field, Some("")).unwrap(), Value::Absent);
        assert_eq!(resolve(&field, Some(" ")).unwrap(), Value::Str(" ".into()));
    }

    #[test]
    fn test_optional_ignores_default() {
        let field =
            FieldSpec::new("name", DeclaredType::optional(DeclaredType::Str)).with_default("x");
        assert_eq!(resolve(&field, None).unwrap(), Value::Absent);
    }

    #[test]
    fn test_optional_still_validates() {
        let field = FieldSpec::new("port", DeclaredType::optional(DeclaredType::Int(IntKind::I64)));
        let err = resolve(&field, Some("eighty")).unwrap_err();
        assert!(matches!(err, EnvError::NumericParse { .. }));
    }

    #[test]
    fn test_blank_sequence_asymmetry() {
        let optional = FieldSpec::new("ids", DeclaredType::optional(int_list()));
        assert_eq!(resolve(&optional, Some("")).unwrap(), Value::List(vec![]));
        assert_eq!(resolve(&optional, None).unwrap(), Value::Absent);

        let required = FieldSpec::new("ids", int_list());
        let err = resolve(&required, Some("")).unwrap_err();
        assert!(matches!(err, EnvError::BlankRequiredVariable { .. }));
    }

    #[test]
    fn test_sequence_element_error() {
        let field = FieldSpec::new("ids", int_list());
        match resolve(&field, Some("1,x,3")).unwrap_err() {
            EnvError::NumericParse { name, value, .. } => {
                assert_eq!(name, "IDS");
                assert_eq!(value, "x");
            }
            other => panic!("Expected NumericParse, got {other:?}"),
        }
    }

    #[test]
    fn test_json_null_is_not_absent() {
        let field = FieldSpec::new("extra", DeclaredType::optional(DeclaredType::Json));
        assert_eq!(
            resolve(&field, Some("null")).unwrap(),
            Value::Json(serde_json::Value::Null)
        );
        assert_eq!(resolve(&field, None).unwrap(), Value::Absent);
    }

    #[test]
    fn test_json_error_attributed() {
        let field = FieldSpec::new("extra", DeclaredType::Json);
        let err = resolve(&field, Some("<invalid json>")).unwrap_err();
        assert!(matches!(err, EnvError::JsonParse { ref name, .. } if name == "EXTRA"));
    }

    #[test]
    fn test_enum_and_literal_errors() {
        let stage = Arc::new(EnumType::new("Stage").member("Development", "development"));
        let field = FieldSpec::new("stage", DeclaredType::Enum(stage));
        let err = resolve(&field, Some("DEVELOPMENT")).unwrap_err();
        assert!(matches!(err, EnvError::EnumValue { ref value, .. } if value == "DEVELOPMENT"));

        let field = FieldSpec::new(
            "mode",
            DeclaredType::Literal(vec![Literal::from("text"), Literal::Int(100)]),
        );
        let err = resolve(&field, Some("other")).unwrap_err();
        assert!(matches!(err, EnvError::LiteralValue { .. }));
    }

    #[test]
    fn test_unsupported_only_when_decoding() {
        let field = FieldSpec::new("timeout", DeclaredType::Other("Duration".into()));
        let err = resolve(&field, Some("30")).unwrap_err();
        assert!(matches!(err, EnvError::UnsupportedFieldType { .. }));
        assert!(matches!(
            resolve(&field, None).unwrap_err(),
            EnvError::MissingRequiredVariable { .. }
        ));

        let field = FieldSpec::new(
            "timeout",
            DeclaredType::optional(DeclaredType::Other("Duration".into())),
        );
        assert_eq!(resolve(&field, None).unwrap(), Value::Absent);
    }

    #[test]
    fn test_resolve_from_source() {
        let env = HashMap::from([("PORT".to_string(), "9000".to_string())]);
        let field = FieldSpec::new("port", DeclaredType::Int(IntKind::I64));
        assert_eq!(resolve_from(&field, &env).unwrap(), Value::Int(9000));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let env = HashMap::from([("port".to_string(), "9000".to_string())]);
        let field = FieldSpec::new("port", DeclaredType::Int(IntKind::I64));
        assert!(matches!(
            resolve_from(&field, &env),
            Err(EnvError::MissingRequiredVariable { .. })
        ));
    }
}
