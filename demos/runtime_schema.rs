//! Example declaring a schema at runtime, without the derive macro

use envschema::{DeclaredType, EnvSnapshot, FieldSpec, IntKind, Literal, Schema};

fn main() -> anyhow::Result<()> {
    // An injected environment instead of the process one
    let env = EnvSnapshot::default()
        .with("REGION", "eu-west-1")
        .with("REPLICAS", "1, 2, 3")
        .with("TLS", "0")
        .with("MODE", "100");

    let schema = Schema::builder("Deployment")
        .field(FieldSpec::new("region", DeclaredType::Str))
        .field(FieldSpec::new(
            "replicas",
            DeclaredType::list(DeclaredType::Int(IntKind::U8)),
        ))
        .field(FieldSpec::new("tls", DeclaredType::Bool))
        .field(FieldSpec::inferred("timeout_secs", 30))
        .field(FieldSpec::new(
            "mode",
            DeclaredType::Literal(vec![Literal::from("text"), Literal::Int(100)]),
        ))
        .declare(&env)?;

    println!("{}", serde_json::to_string_pretty(&schema.to_json()?)?);
    println!("replicas: {:?}", schema.get_as::<Vec<u8>>("replicas")?);

    Ok(())
}
