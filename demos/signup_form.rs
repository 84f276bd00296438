//! Signup form walkthrough
//!
//! Validates a handful of submitted fields plus an avatar upload and prints
//! the failures. Run with `RUST_LOG=fieldcheck_validation=debug` to see each
//! failing rule as it is recorded.
//!
//! ```bash
//! cargo run --example signup_form
//! ```

use fieldcheck::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ValidatorConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring invalid environment configuration");
        ValidatorConfig::default()
    });

    let mut validator = match Validator::with_config(&config) {
        Ok(validator) => validator,
        Err(e) => {
            tracing::error!(error = %e, "could not build validator");
            std::process::exit(1);
        }
    };

    let mut uploads = FileMap::new();
    uploads.insert("avatar".to_string(), UploadedFile::missing());

    validator
        .set_name("username")
        .set_value("neo_42")
        .required()
        .is_alphanum()
        .min_input(3)
        .max_input(16);
    validator
        .set_name("email")
        .set_value("neo@matrix")
        .required()
        .is_email();
    validator.set_name("phone").set_value("06 12 34 56 78").predefined_pattern("phone");
    validator.set_name("age").set_value("17").is_int().between_inputs(18, 130);
    validator.set_name("newsletter").set_value("yes").is_bool();
    validator
        .set_name("avatar")
        .set_file(uploads)
        .file_max_size(2 * 1_048_576)
        .file_ext("png");

    if validator.is_valid() {
        println!("Form is valid");
        return;
    }

    println!("Form has {} invalid field(s):", validator.errors().len());
    print!("{}", validator.display_errors_list(ListStyle::Ordered));
    println!("{}", validator.errors().to_json());
}
