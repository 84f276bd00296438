//! End-to-end checks for typical form scripts.

use fieldcheck::prelude::*;
use std::io::Write;

// =============================================================================
// Contact form
// =============================================================================

#[test]
fn test_contact_form_script() {
    let mut validator = Validator::new();

    validator
        .set_name("email")
        .set_value("testtest.fr")
        .is_email()
        .predefined_pattern("email");
    validator.set_name("bool").set_value("trueg111hj").is_alphanum();
    validator.set_name("custom").set_value("FRJBI").custom_pattern("[A-Z]");
    validator.set_name("required").set_value("sdf").required();
    validator
        .set_name("length")
        .set_value("sdfsdfsqsdqsdqsdqsdqsdqsddf")
        .min_input(5)
        .max_input(12);
    validator.set_name("range").set_value(5).between_inputs(2, 10);
    validator.set_name("confirm").set_value("test").matches("test");

    assert!(!validator.is_valid());

    let errors: Vec<(&str, &str)> = validator.errors().iter().collect();
    assert_eq!(
        errors,
        vec![
            ("email", "The email field is invalid."),
            ("length", "The length field has too many characters."),
        ]
    );

    assert_eq!(
        validator.display_errors_list(ListStyle::Unordered),
        "- The email field is invalid.\n- The length field has too many characters.\n"
    );
}

// =============================================================================
// Upload form
// =============================================================================

#[test]
fn test_upload_form_script() {
    let mut stored = tempfile::NamedTempFile::new().unwrap();
    stored.write_all(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();

    let mut files = FileMap::new();
    files.insert(
        "image".to_string(),
        UploadedFile::new("holiday.png", 16, stored.path()),
    );
    files.insert(
        "attachment".to_string(),
        UploadedFile::new("notes.txt", 0, "").with_error(UploadError::Partial),
    );

    let mut validator = Validator::new();
    validator
        .set_name("image")
        .set_file(files)
        .required_file()
        .file_uploaded()
        .file_max_size(30_000_000)
        .file_ext("png")
        .file_format("image/png");
    validator.set_name("attachment").file_uploaded();
    validator.set_name("avatar").file_ext("png");

    assert_eq!(validator.errors().len(), 1);
    assert_eq!(
        validator.errors().get("attachment"),
        Some("The attachment file failed to upload.")
    );
}

// =============================================================================
// Error rendering
// =============================================================================

#[test]
fn test_errors_as_json() {
    let mut validator = Validator::new();
    validator.set_name("name").set_value("").required();
    validator.set_name("age").set_value("x").is_int().min_input(18);

    assert_eq!(
        validator.errors().to_json(),
        serde_json::json!({
            "name": "The field name is mandatory.",
            "age": "The age field doesn't have enough characters.",
        })
    );
}
