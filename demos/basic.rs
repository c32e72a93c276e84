//! Basic example of loading configuration from environment variables

use envschema::EnvSchema;

#[derive(Debug, EnvSchema)]
struct Config {
    // Required: DATABASE_URL must be set and non-empty
    pub database_url: String,

    // Falls back to 8080 when PORT is not set
    #[env(default = 8080)]
    pub port: u16,

    // "false" (any case) and "0" are false, anything else is true
    #[env(default = false)]
    pub debug: bool,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("DEBUG", "yes");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Port: {}", config.port);
    println!("  Debug: {}", config.debug);

    Ok(())
}
