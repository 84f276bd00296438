// Built-in rules and side-effect-free evaluation

use crate::file::{bytes_to_mb, format_matches, UploadError, UploadedFile};
use crate::parse::{parse_float, parse_int};
use crate::value::{is_blank, loose_eq, Scalar};
use crate::{PatternRegistry, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

// Unlike the registry's `email` pattern, the domain must contain a dot.
static EMAIL_ADDRESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").unwrap()
});

/// Outcome of one rule against one field.
pub type RuleOutcome = Result<(), ValidationError>;

/// The input a rule is checked against.
#[derive(Debug, Clone, Copy)]
pub struct FieldRequest<'a> {
    /// Field name used in messages
    pub name: &'a str,
    /// Scalar value, if the field has one
    pub value: Option<&'a Scalar>,
    /// Upload descriptor, if the field is a file input
    pub file: Option<&'a UploadedFile>,
}

impl<'a> FieldRequest<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            value: None,
            file: None,
        }
    }

    pub fn value(mut self, value: &'a Scalar) -> Self {
        self.value = Some(value);
        self
    }

    pub fn file(mut self, file: &'a UploadedFile) -> Self {
        self.file = Some(file);
        self
    }

    /// The file, unless none was sent for this field.
    fn present_file(&self) -> Option<&'a UploadedFile> {
        self.file.filter(|f| f.is_present())
    }

    fn fail(&self, rule: &Rule, message: String) -> RuleOutcome {
        Err(ValidationError::new(self.name, message).with_constraint(rule.name()))
    }
}

/// A single check that can be applied to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value parses as a boolean
    IsBool,
    /// Value is absent or zero-length
    IsEmpty,
    /// Value parses as a float
    IsFloat,
    /// Value parses as an integer
    IsInt,
    /// Value is text
    IsString,
    /// Value is ASCII letters only
    IsAlpha,
    /// Value is ASCII letters and digits only
    IsAlphanum,
    /// Value is an email address
    IsEmail,
    /// Non-empty value matches a named registry pattern
    Pattern(String),
    /// Non-empty value matches a caller-supplied regex
    CustomPattern(String),
    /// Value is present and non-empty
    Required,
    /// A file was sent for the field
    RequiredFile,
    /// Text length, or numeric value, is at least the bound
    MinInput(f64),
    /// Text length, or numeric value, is at most the bound
    MaxInput(f64),
    /// Numeric value lies within the inclusive range
    Between { min: f64, max: f64 },
    /// Value loosely equals the expected value
    Matches(Scalar),
    /// Uploaded file is no larger than this many bytes
    FileMaxSize(u64),
    /// Uploaded file is at least this many bytes
    FileMinSize(u64),
    /// Uploaded filename carries this extension
    FileExt(String),
    /// Uploaded content sniffs as this format
    FileFormat(String),
    /// Upload finished without a transfer error
    FileUploaded,
}

impl Rule {
    /// Constraint name attached to failures.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::IsBool => "isBool",
            Rule::IsEmpty => "isEmpty",
            Rule::IsFloat => "isFloat",
            Rule::IsInt => "isInt",
            Rule::IsString => "isString",
            Rule::IsAlpha => "isAlpha",
            Rule::IsAlphanum => "isAlphanum",
            Rule::IsEmail => "isEmail",
            Rule::Pattern(_) => "predefinedPattern",
            Rule::CustomPattern(_) => "customPattern",
            Rule::Required => "required",
            Rule::RequiredFile => "requiredFile",
            Rule::MinInput(_) => "minInput",
            Rule::MaxInput(_) => "maxInput",
            Rule::Between { .. } => "betweenInputs",
            Rule::Matches(_) => "matches",
            Rule::FileMaxSize(_) => "fileMaxSize",
            Rule::FileMinSize(_) => "fileMinSize",
            Rule::FileExt(_) => "fileExt",
            Rule::FileFormat(_) => "fileFormat",
            Rule::FileUploaded => "fileUploaded",
        }
    }

    /// Check the rule against a field.
    pub fn check(&self, req: &FieldRequest<'_>, patterns: &PatternRegistry) -> RuleOutcome {
        let field = req.name;
        let value = req.value;

        match self {
            Rule::IsBool => {
                if value.and_then(Scalar::to_bool).is_none() {
                    return req.fail(self, format!("The {} field isn't a boolean.", field));
                }
            }
            Rule::IsEmpty => {
                if !is_blank(value) {
                    return req.fail(self, format!("The {} field is not empty.", field));
                }
            }
            Rule::IsFloat => {
                if !is_float(value) {
                    return req.fail(self, format!("The {} field is not a float number.", field));
                }
            }
            Rule::IsInt => {
                if !is_int(value) {
                    return req.fail(
                        self,
                        format!("The {} field is not an integer number.", field),
                    );
                }
            }
            Rule::IsString => {
                if !value.is_some_and(Scalar::is_text) {
                    return req.fail(
                        self,
                        format!("The {} field is not a string of characters.", field),
                    );
                }
            }
            Rule::IsAlpha => {
                if !matches_regex(value, &ALPHA_REGEX) {
                    return req.fail(
                        self,
                        format!("The {} field isn't an alphabetical string.", field),
                    );
                }
            }
            Rule::IsAlphanum => {
                if !matches_regex(value, &ALPHANUMERIC_REGEX) {
                    return req.fail(
                        self,
                        format!("The {} field isn't an alphanumerical string.", field),
                    );
                }
            }
            Rule::IsEmail => {
                if !value.is_some_and(|v| is_email_address(&v.as_text())) {
                    return req.fail(self, format!("The {} field isn't an email address.", field));
                }
            }
            Rule::Pattern(name) => {
                if is_blank(value) {
                    return Ok(());
                }
                let matched = match patterns.require(name) {
                    Ok(regex) => matches_regex(value, regex),
                    Err(e) => {
                        tracing::warn!(field = %field, error = %e, "predefined pattern lookup failed");
                        false
                    }
                };
                if !matched {
                    return req.fail(self, invalid_message(field));
                }
            }
            Rule::CustomPattern(source) => {
                if is_blank(value) {
                    return Ok(());
                }
                let matched = match Regex::new(source) {
                    Ok(regex) => matches_regex(value, &regex),
                    Err(e) => {
                        tracing::warn!(field = %field, pattern = %source, error = %e, "invalid custom pattern");
                        false
                    }
                };
                if !matched {
                    return req.fail(self, invalid_message(field));
                }
            }
            Rule::Required => {
                if is_blank(value) {
                    return req.fail(self, mandatory_message(field));
                }
            }
            Rule::RequiredFile => {
                if req.present_file().is_none() {
                    return req.fail(self, mandatory_message(field));
                }
            }
            Rule::MinInput(min) => match value {
                Some(Scalar::Text(s)) => {
                    if (s.chars().count() as f64) < *min {
                        return req.fail(
                            self,
                            format!("The {} field doesn't have enough characters.", field),
                        );
                    }
                }
                _ => {
                    if !value.and_then(Scalar::as_number).is_some_and(|n| n >= *min) {
                        return req.fail(self, format!("The {} value is too small.", field));
                    }
                }
            },
            Rule::MaxInput(max) => match value {
                Some(Scalar::Text(s)) => {
                    if (s.chars().count() as f64) > *max {
                        return req.fail(
                            self,
                            format!("The {} field has too many characters.", field),
                        );
                    }
                }
                _ => {
                    if !value.and_then(Scalar::as_number).is_some_and(|n| n <= *max) {
                        return req.fail(self, format!("The {} value is too big.", field));
                    }
                }
            },
            Rule::Between { min, max } => {
                let in_range = value
                    .and_then(Scalar::as_number)
                    .is_some_and(|n| n >= *min && n <= *max);
                if !in_range {
                    return req.fail(
                        self,
                        format!(
                            "The {} field must contain a number between {} and {}.",
                            field, min, max
                        ),
                    );
                }
            }
            Rule::Matches(expected) => {
                if !loose_eq(value, expected) {
                    return req.fail(self, invalid_message(field));
                }
            }
            Rule::FileMaxSize(limit) => {
                if req.present_file().is_some_and(|f| f.size > *limit) {
                    return req.fail(
                        self,
                        format!(
                            "The {} file exceeds the size limit of {:.2} MB.",
                            field,
                            bytes_to_mb(*limit)
                        ),
                    );
                }
            }
            Rule::FileMinSize(limit) => {
                if req.present_file().is_some_and(|f| f.size < *limit) {
                    return req.fail(
                        self,
                        format!(
                            "The {} file must be at least {:.2} MB.",
                            field,
                            bytes_to_mb(*limit)
                        ),
                    );
                }
            }
            Rule::FileExt(ext) => {
                let expected = ext.trim_start_matches('.');
                if req
                    .present_file()
                    .is_some_and(|f| !f.extension().eq_ignore_ascii_case(expected))
                {
                    return req.fail(self, format!("The {} is not a .{} .", field, expected));
                }
            }
            Rule::FileFormat(format) => {
                let Some(file) = req.present_file() else {
                    return Ok(());
                };
                let matched = match file.content_type() {
                    Ok(detected) => format_matches(&detected, format),
                    Err(e) => {
                        tracing::warn!(
                            field = %field,
                            path = %file.tmp_path.display(),
                            error = %e,
                            "could not read uploaded file"
                        );
                        false
                    }
                };
                if !matched {
                    return req.fail(
                        self,
                        format!("The {} is not a .{} .", field, format.trim_start_matches('.')),
                    );
                }
            }
            Rule::FileUploaded => {
                if req
                    .present_file()
                    .is_some_and(|f| f.upload_error != UploadError::Ok)
                {
                    return req.fail(self, format!("The {} file failed to upload.", field));
                }
            }
        }

        Ok(())
    }
}

/// Run every rule against a field, in order, without stopping at failures.
pub fn evaluate(
    req: &FieldRequest<'_>,
    rules: &[Rule],
    patterns: &PatternRegistry,
) -> Vec<RuleOutcome> {
    rules.iter().map(|rule| rule.check(req, patterns)).collect()
}

/// Whether a string is a syntactically valid email address.
pub fn is_email_address(input: &str) -> bool {
    let Some((local, domain)) = input.rsplit_once('@') else {
        return false;
    };

    input.len() <= 254
        && local.len() <= 64
        && domain.len() <= 253
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && EMAIL_ADDRESS_REGEX.is_match(input)
}

fn is_float(value: Option<&Scalar>) -> bool {
    match value {
        Some(Scalar::Float(f)) => f.is_finite(),
        Some(Scalar::Int(_)) => true,
        Some(Scalar::Text(s)) => parse_float(s).is_some(),
        _ => false,
    }
}

fn is_int(value: Option<&Scalar>) -> bool {
    match value {
        Some(Scalar::Int(_)) => true,
        Some(Scalar::Float(f)) => {
            f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64
        }
        Some(Scalar::Text(s)) => parse_int(s).is_some(),
        _ => false,
    }
}

fn matches_regex(value: Option<&Scalar>, regex: &Regex) -> bool {
    value.is_some_and(|v| regex.is_match(&v.as_text()))
}

fn invalid_message(field: &str) -> String {
    format!("The {} field is invalid.", field)
}

fn mandatory_message(field: &str) -> String {
    format!("The field {} is mandatory.", field)
}

/// Rules collected for one field, checked together
#[derive(Debug, Clone)]
pub struct ValidationRules {
    rules: Vec<Rule>,
    field: String,
}

impl ValidationRules {
    /// Create new validation rules for a field
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            field: field.into(),
        }
    }

    /// Append a rule
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Validate a value and optional upload against all rules, returning
    /// every failure in rule order.
    pub fn validate(
        &self,
        value: Option<&Scalar>,
        file: Option<&UploadedFile>,
        patterns: &PatternRegistry,
    ) -> Result<(), Vec<ValidationError>> {
        let req = FieldRequest {
            name: &self.field,
            value,
            file,
        };

        let errors: Vec<ValidationError> = evaluate(&req, &self.rules, patterns)
            .into_iter()
            .filter_map(Result::err)
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a plain value against the default pattern registry.
    pub fn validate_value(&self, value: impl Into<Scalar>) -> Result<(), Vec<ValidationError>> {
        let value = value.into();
        self.validate(Some(&value), None, &PatternRegistry::new())
    }
}
