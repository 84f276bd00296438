// fieldcheck - fluent validation for form fields and uploads
//
// Pick a field, chain rules against it, read back one message per failing
// field. The engine lives in `fieldcheck-validation`; this crate re-exports it.

pub use fieldcheck_validation::*;

/// Everything needed to write a validation script.
pub mod prelude {
    pub use fieldcheck_validation::{
        ErrorMap, ErrorPolicy, FileMap, ListStyle, PatternRegistry, Rule, Scalar, UploadError,
        UploadedFile, Validator, ValidatorConfig,
    };
}
