// Option<T> fields resolve to no value when unset, so a default is rejected

use envschema::EnvSchema;

#[derive(EnvSchema)]
#[allow(dead_code)]
struct Config {
    #[env(default = "fallback")]
    pub optional_field: Option<String>,
}

fn main() {}
