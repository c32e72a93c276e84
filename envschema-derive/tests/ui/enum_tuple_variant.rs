// EnvEnum variants map to a single representation, so data is rejected

use envschema::EnvEnum;

#[derive(EnvEnum)]
#[allow(dead_code)]
enum Stage {
    Development,
    Custom(String),
}

fn main() {}
