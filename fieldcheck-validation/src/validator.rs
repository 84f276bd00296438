// Fluent validator over a single reusable field slot

use crate::rules::{FieldRequest, Rule};
use crate::{
    ErrorMap, ErrorPolicy, FileMap, PatternRegistry, Result, Scalar, ValidatorConfig,
};

/// Layout used by [`Validator::display_errors_list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    /// `- message` lines
    #[default]
    Unordered,
    /// `1. message` lines
    Ordered,
}

/// Chains rules over one field at a time and collects failures per field.
///
/// Selecting a field only overwrites what is passed in: a value or file map
/// set for a previous field stays in place until replaced.
///
/// ```
/// use fieldcheck_validation::Validator;
///
/// let mut validator = Validator::new();
/// validator.set_name("email").set_value("testtest.fr").predefined_pattern("email");
/// validator.set_name("length").set_value("sdfsdfsqsdqsdqsdqsdqsdqsddf").min_input(5).max_input(12);
///
/// assert!(!validator.is_valid());
/// assert_eq!(validator.errors().get("email"), Some("The email field is invalid."));
/// assert_eq!(
///     validator.errors().get("length"),
///     Some("The length field has too many characters.")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    patterns: PatternRegistry,
    errors: ErrorMap,
    name: String,
    value: Option<Scalar>,
    files: Option<FileMap>,
}

impl Validator {
    /// Validator with the default patterns and the overwrite policy.
    pub fn new() -> Self {
        Self::with_patterns(PatternRegistry::new())
    }

    /// Validator using the given pattern registry.
    pub fn with_patterns(patterns: PatternRegistry) -> Self {
        Self {
            patterns,
            errors: ErrorMap::new(),
            name: String::new(),
            value: None,
            files: None,
        }
    }

    /// Switch the error policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.errors.set_policy(policy);
        self
    }

    /// Validator built from configuration.
    pub fn with_config(config: &ValidatorConfig) -> Result<Self> {
        let patterns = config.pattern_registry()?;
        Ok(Self::with_patterns(patterns).with_policy(config.policy))
    }

    /// Validator built from a TOML or JSON configuration file.
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = ValidatorConfig::load(path)?;
        Self::with_config(&config)
    }

    // ------------------------------------------------------------------
    // Field selection
    // ------------------------------------------------------------------

    /// Select the field that following rules report against.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        tracing::trace!(field = %self.name, "field selected");
        self
    }

    /// Set the value checked by value rules.
    pub fn set_value(&mut self, value: impl Into<Scalar>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    /// Mark the value as absent.
    pub fn unset_value(&mut self) -> &mut Self {
        self.value = None;
        self
    }

    /// Set the upload map; file rules read the entry for the current field.
    pub fn set_file(&mut self, files: FileMap) -> &mut Self {
        self.files = Some(files);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    /// Check an arbitrary rule against the current field.
    pub fn rule(&mut self, rule: Rule) -> &mut Self {
        let req = FieldRequest {
            name: &self.name,
            value: self.value.as_ref(),
            file: self.files.as_ref().and_then(|files| files.get(&self.name)),
        };

        if let Err(error) = rule.check(&req, &self.patterns) {
            tracing::debug!(
                field = %error.field,
                rule = error.constraint,
                "validation rule failed"
            );
            self.errors.record(error);
        }
        self
    }

    pub fn is_bool(&mut self) -> &mut Self {
        self.rule(Rule::IsBool)
    }

    pub fn is_empty(&mut self) -> &mut Self {
        self.rule(Rule::IsEmpty)
    }

    pub fn is_float(&mut self) -> &mut Self {
        self.rule(Rule::IsFloat)
    }

    pub fn is_int(&mut self) -> &mut Self {
        self.rule(Rule::IsInt)
    }

    pub fn is_string(&mut self) -> &mut Self {
        self.rule(Rule::IsString)
    }

    pub fn is_alpha(&mut self) -> &mut Self {
        self.rule(Rule::IsAlpha)
    }

    pub fn is_alphanum(&mut self) -> &mut Self {
        self.rule(Rule::IsAlphanum)
    }

    pub fn is_email(&mut self) -> &mut Self {
        self.rule(Rule::IsEmail)
    }

    /// Match a non-empty value against a registry pattern.
    pub fn predefined_pattern(&mut self, name: &str) -> &mut Self {
        self.rule(Rule::Pattern(name.to_string()))
    }

    /// Match a non-empty value against a caller-supplied regex.
    pub fn custom_pattern(&mut self, pattern: &str) -> &mut Self {
        self.rule(Rule::CustomPattern(pattern.to_string()))
    }

    /// The value must be present and non-empty.
    pub fn required(&mut self) -> &mut Self {
        self.rule(Rule::Required)
    }

    /// A file must have been sent for the current field.
    pub fn required_file(&mut self) -> &mut Self {
        self.rule(Rule::RequiredFile)
    }

    pub fn min_input(&mut self, min: impl Into<f64>) -> &mut Self {
        self.rule(Rule::MinInput(min.into()))
    }

    pub fn max_input(&mut self, max: impl Into<f64>) -> &mut Self {
        self.rule(Rule::MaxInput(max.into()))
    }

    pub fn between_inputs(&mut self, min: impl Into<f64>, max: impl Into<f64>) -> &mut Self {
        self.rule(Rule::Between {
            min: min.into(),
            max: max.into(),
        })
    }

    pub fn matches(&mut self, expected: impl Into<Scalar>) -> &mut Self {
        self.rule(Rule::Matches(expected.into()))
    }

    pub fn file_max_size(&mut self, bytes: u64) -> &mut Self {
        self.rule(Rule::FileMaxSize(bytes))
    }

    pub fn file_min_size(&mut self, bytes: u64) -> &mut Self {
        self.rule(Rule::FileMinSize(bytes))
    }

    pub fn file_ext(&mut self, ext: &str) -> &mut Self {
        self.rule(Rule::FileExt(ext.to_string()))
    }

    /// Sniff the uploaded content and compare it with `format`.
    ///
    /// This reads from disk.
    pub fn file_format(&mut self, format: &str) -> &mut Self {
        self.rule(Rule::FileFormat(format.to_string()))
    }

    pub fn file_uploaded(&mut self) -> &mut Self {
        self.rule(Rule::FileUploaded)
    }

    // ------------------------------------------------------------------
    // Results
    // ------------------------------------------------------------------

    /// True when no rule has failed so far.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorMap {
        self.errors
    }

    /// Forget recorded failures, keeping the current field selection.
    pub fn clear_errors(&mut self) -> &mut Self {
        self.errors.clear();
        self
    }

    /// Render every kept message once, one per line.
    pub fn display_errors_list(&self, style: ListStyle) -> String {
        let mut out = String::new();
        for (i, message) in self.errors.messages().enumerate() {
            let line = match style {
                ListStyle::Unordered => format!("- {}\n", message),
                ListStyle::Ordered => format!("{}. {}\n", i + 1, message),
            };
            out.push_str(&line);
        }
        out
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UploadedFile;

    #[test]
    fn test_valid_chain() {
        let mut validator = Validator::new();
        validator
            .set_name("username")
            .set_value("john42")
            .required()
            .is_alphanum()
            .min_input(3)
            .max_input(12);

        assert!(validator.is_valid());
        assert!(validator.errors().is_empty());
    }

    #[test]
    fn test_last_failure_wins() {
        let mut validator = Validator::new();
        validator.set_name("code").set_value("!").is_alpha().min_input(3);

        assert_eq!(validator.errors().len(), 1);
        assert_eq!(
            validator.errors().get("code"),
            Some("The code field doesn't have enough characters.")
        );
    }

    #[test]
    fn test_collect_all_policy() {
        let mut validator = Validator::new().with_policy(ErrorPolicy::CollectAll);
        validator.set_name("code").set_value("!").is_alpha().min_input(3);

        assert_eq!(validator.errors().field_errors("code").len(), 2);
    }

    #[test]
    fn test_with_policy_keeps_recorded_errors() {
        let mut validator = Validator::new();
        validator.set_name("a").required();
        let validator = validator.with_policy(ErrorPolicy::CollectAll);

        assert_eq!(validator.errors().policy(), ErrorPolicy::CollectAll);
        assert!(validator.errors().contains("a"));
    }

    #[test]
    fn test_value_carries_over_between_fields() {
        let mut validator = Validator::new();
        validator.set_name("first").set_value("");
        validator.set_name("second").required();

        assert_eq!(
            validator.errors().get("second"),
            Some("The field second is mandatory.")
        );
    }

    #[test]
    fn test_rerunning_passing_rule_is_idempotent() {
        let mut validator = Validator::new();
        validator.set_name("n").set_value(5).between_inputs(2, 10);
        validator.between_inputs(2, 10);
        assert!(validator.is_valid());
    }

    #[test]
    fn test_file_rules_use_current_field_entry() {
        let mut files = FileMap::new();
        files.insert(
            "avatar".to_string(),
            UploadedFile::new("me.jpg", 4096, "/tmp/php123"),
        );

        let mut validator = Validator::new();
        validator
            .set_name("avatar")
            .set_file(files)
            .file_max_size(8192)
            .file_ext("png");
        validator.set_name("resume").file_ext("pdf").file_max_size(1);

        assert_eq!(validator.errors().len(), 1);
        assert_eq!(
            validator.errors().get("avatar"),
            Some("The avatar is not a .png .")
        );
    }

    #[test]
    fn test_required_file() {
        let mut files = FileMap::new();
        files.insert("doc".to_string(), UploadedFile::missing());

        let mut validator = Validator::new();
        validator.set_name("doc").set_file(files).required_file();
        validator.set_name("other").required_file();

        assert_eq!(validator.errors().get("doc"), Some("The field doc is mandatory."));
        assert!(validator.errors().contains("other"));
    }

    #[test]
    fn test_display_errors_list() {
        let mut validator = Validator::new();
        validator.set_name("a").unset_value().required();
        validator.set_name("b").set_value("x").is_int();

        assert_eq!(
            validator.display_errors_list(ListStyle::Unordered),
            "- The field a is mandatory.\n- The b field is not an integer number.\n"
        );
        assert_eq!(
            validator.display_errors_list(ListStyle::Ordered),
            "1. The field a is mandatory.\n2. The b field is not an integer number.\n"
        );
    }

    #[test]
    fn test_custom_registry() {
        let patterns = PatternRegistry::builder()
            .pattern("zip", r"^\d{5}$")
            .build()
            .unwrap();

        let mut validator = Validator::with_patterns(patterns);
        validator.set_name("zip").set_value("7500").predefined_pattern("zip");
        assert_eq!(validator.errors().get("zip"), Some("The zip field is invalid."));
    }
}
