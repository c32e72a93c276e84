//! Example demonstrating Option<T> for optional fields

use envschema::EnvSchema;

#[derive(Debug, EnvSchema)]
struct Config {
    // Required field
    pub app_name: String,

    // Optional fields - None if unset or empty
    pub api_key: Option<String>,
    pub port: Option<u16>,

    // Optional lists are empty, not None, when set to ""
    pub allowed_ips: Option<Vec<String>>,

    // Arbitrary JSON; "null" is Some(Value::Null), not None
    pub features: Option<serde_json::Value>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_NAME", "my-application");
    std::env::set_var("PORT", "8080");
    std::env::set_var("ALLOWED_IPS", "");
    std::env::set_var("FEATURES", r#"{"beta": true}"#);
    // API_KEY not set

    let config = Config::from_env()?;

    println!("Configuration:");
    println!("  App Name: {}", config.app_name);
    println!("  API Key: {:?}", config.api_key); // None
    println!("  Port: {:?}", config.port); // Some(8080)
    println!("  Allowed IPs: {:?}", config.allowed_ips); // Some([])
    println!("  Features: {:?}", config.features);

    Ok(())
}
