// one_of restricts a Literal field; other field types are rejected

use envschema::EnvSchema;

#[derive(EnvSchema)]
#[allow(dead_code)]
struct Config {
    #[env(one_of = ["text", 100])]
    pub mode: String,
}

fn main() {}
