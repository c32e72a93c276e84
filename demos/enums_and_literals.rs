//! Example demonstrating enums and literal sets

use envschema::{EnvEnum, EnvSchema, Literal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnvEnum)]
#[env(rename_all = "lowercase")]
enum Stage {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, EnvEnum)]
enum LogLevel {
    #[env(repr = 0)]
    Quiet,
    #[env(repr = 1)]
    Normal,
    #[env(repr = 2)]
    Verbose,
}

#[derive(Debug, EnvSchema)]
struct Config {
    // Must be exactly "development", "staging" or "production"
    #[env(default = Stage::Development)]
    pub stage: Stage,

    // Integer representations: LOG_LEVEL=2
    pub log_level: LogLevel,

    // Either the text "auto" or the number 4
    #[env(one_of = ["auto", 4])]
    pub threads: Literal,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("STAGE", "staging");
    std::env::set_var("LOG_LEVEL", "2");
    std::env::set_var("THREADS", "4");

    let config = Config::from_env()?;

    println!("Stage: {:?}", config.stage);
    println!("Log level: {:?}", config.log_level);
    println!("Threads: {}", config.threads); // 4, an integer

    // Case matters: "STAGING" is rejected
    std::env::set_var("STAGE", "STAGING");
    if let Err(e) = Config::from_env() {
        println!("Error: {}", e);
    }

    Ok(())
}
