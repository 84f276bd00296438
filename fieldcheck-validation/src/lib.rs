//! Fluent form-field validation
//!
//! Select a field, chain rules against it, then ask whether everything
//! passed. Failures are collected per field name; by default a field keeps
//! only its latest failure.
//!
//! # Examples
//!
//! ## Fluent chains
//!
//! ```
//! use fieldcheck_validation::Validator;
//!
//! let mut validator = Validator::new();
//!
//! validator.set_name("email").set_value("a@b.io").required().is_email();
//! validator.set_name("age").set_value(15).between_inputs(2, 10);
//!
//! assert!(!validator.is_valid());
//! assert_eq!(
//!     validator.errors().get("age"),
//!     Some("The age field must contain a number between 2 and 10.")
//! );
//! assert!(!validator.errors().contains("email"));
//! ```
//!
//! ## Uploaded files
//!
//! ```
//! use fieldcheck_validation::{FileMap, UploadedFile, Validator};
//!
//! let mut files = FileMap::new();
//! files.insert("image".to_string(), UploadedFile::new("photo.PNG", 20_000, "/tmp/upload-1"));
//!
//! let mut validator = Validator::new();
//! validator
//!     .set_name("image")
//!     .set_file(files)
//!     .file_max_size(30_000_000)
//!     .file_ext("png");
//!
//! assert!(validator.is_valid());
//! ```
//!
//! ## Rule lists without the fluent wrapper
//!
//! ```
//! use fieldcheck_validation::{PatternRegistry, Rule, ValidationRules};
//!
//! let rules = ValidationRules::for_field("username")
//!     .add(Rule::Required)
//!     .add(Rule::MinInput(3.0));
//!
//! assert!(rules.validate_value("john").is_ok());
//! assert!(rules.validate(None, None, &PatternRegistry::new()).is_err());
//! ```

mod config;
mod errors;
pub mod file;
mod parse;
mod patterns;
mod rules;
mod validator;
mod value;

pub use config::*;
pub use errors::*;
pub use file::{FileMap, UploadError, UploadedFile};
pub use parse::*;
pub use patterns::*;
pub use rules::*;
pub use validator::*;
pub use value::*;
