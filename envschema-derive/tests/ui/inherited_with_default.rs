// Inherited fields are declared by the parent schema, so a default is rejected

use envschema::EnvSchema;

#[derive(EnvSchema)]
#[allow(dead_code)]
struct Config {
    #[env(inherited, default = 8080)]
    pub port: u16,
}

fn main() {}
