//! Example demonstrating schemas composed from a shared base

use envschema::{EnvSchema, ProcessEnv};

#[derive(Debug, EnvSchema)]
struct Common {
    pub service_name: String,

    #[env(default = "info")]
    pub log_filter: String,
}

#[derive(Debug, EnvSchema)]
struct Worker {
    // Bound by Common, visible here
    #[env(inherited)]
    pub service_name: String,

    // Declared only by Worker
    pub queues: Vec<String>,

    #[env(default = 4)]
    pub concurrency: u32,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("SERVICE_NAME", "billing");
    std::env::set_var("QUEUES", "high, default, low");

    let common = Common::declare(&ProcessEnv, &[])?;
    let worker_schema = Worker::declare(&ProcessEnv, &[common.clone()])?;
    let worker = Worker::from_schema(&worker_schema)?;

    println!("Common: {:?}", Common::from_schema(&common)?);
    println!("Worker: {:?}", worker);
    println!("All attributes: {}", worker_schema.to_json()?);

    Ok(())
}
