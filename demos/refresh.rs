//! Example demonstrating refresh after the environment changes

use envschema::{EnvSchema, ProcessEnv};

#[derive(Debug, EnvSchema)]
struct Limits {
    #[env(default = 100)]
    pub max_requests: u32,

    pub burst: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    std::env::remove_var("MAX_REQUESTS");
    std::env::remove_var("BURST");

    let schema = Limits::declare(&ProcessEnv, &[])?;
    println!("Before: {:?}", Limits::from_schema(&schema)?);

    std::env::set_var("MAX_REQUESTS", "250");
    std::env::set_var("BURST", "20");
    schema.refresh_from_process()?;
    println!("After: {:?}", Limits::from_schema(&schema)?);

    // A failed refresh keeps the previous values
    std::env::set_var("MAX_REQUESTS", "lots");
    if let Err(e) = schema.refresh_from_process() {
        println!("Refresh failed: {}", e);
    }
    println!("Still: {:?}", Limits::from_schema(&schema)?);

    Ok(())
}
