// Named regular expressions available to `predefined_pattern`

use crate::{Result, ValidatorError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default pattern sources, keyed by name.
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    (
        "email",
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    ),
    (
        "phone",
        r"^(?:(?:\+|00)33[\s.-]{0,3}(?:\(0\)[\s.-]{0,3})?|0)[1-9](?:(?:[\s.-]?\d{2}){4}|\d{2}(?:[\s.-]?\d{3}){2})$",
    ),
    ("text", r"^[a-zA-Z ]*$"),
    (
        "url",
        r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    ),
    ("uri", r"\w+:(/?/?)[^\s]+"),
];

static DEFAULT_REGISTRY: Lazy<PatternRegistry> = Lazy::new(|| {
    let patterns = DEFAULT_PATTERNS
        .iter()
        .map(|(name, source)| {
            let regex = Regex::new(source).expect("built-in pattern must compile");
            (name.to_string(), Arc::new(regex))
        })
        .collect();
    PatternRegistry { patterns }
});

/// Immutable set of named, pre-compiled patterns.
///
/// Cloning is cheap; compiled regexes are shared.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: BTreeMap<String, Arc<Regex>>,
}

impl PatternRegistry {
    /// Registry holding `email`, `phone`, `text`, `url` and `uri`.
    pub fn new() -> Self {
        DEFAULT_REGISTRY.clone()
    }

    /// Registry with no patterns at all.
    pub fn empty() -> Self {
        Self {
            patterns: BTreeMap::new(),
        }
    }

    /// Start a builder seeded with the default patterns.
    pub fn builder() -> PatternRegistryBuilder {
        PatternRegistryBuilder {
            registry: Self::new(),
            pending: Vec::new(),
        }
    }

    /// Look up a compiled pattern.
    pub fn get(&self, name: &str) -> Option<&Regex> {
        self.patterns.get(name).map(|r| r.as_ref())
    }

    /// Look up a compiled pattern that must exist.
    pub fn require(&self, name: &str) -> Result<&Regex> {
        self.get(name)
            .ok_or_else(|| ValidatorError::UnknownPattern(name.to_string()))
    }

    /// Whether a pattern with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Pattern names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder that adds or overrides patterns before the registry is frozen.
#[derive(Debug)]
pub struct PatternRegistryBuilder {
    registry: PatternRegistry,
    pending: Vec<(String, String)>,
}

impl PatternRegistryBuilder {
    /// Drop the default patterns.
    pub fn clear(mut self) -> Self {
        self.registry.patterns.clear();
        self
    }

    /// Add a pattern, replacing any existing one with the same name.
    pub fn pattern(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.pending.push((name.into(), source.into()));
        self
    }

    /// Add several patterns at once.
    pub fn patterns<I, K, V>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.pending
            .extend(patterns.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Compile pending patterns and freeze the registry.
    pub fn build(self) -> Result<PatternRegistry> {
        let mut registry = self.registry;

        for (name, source) in self.pending {
            let regex = Regex::new(&source).map_err(|e| ValidatorError::InvalidPattern {
                pattern: source.clone(),
                reason: e.to_string(),
            })?;
            registry.patterns.insert(name, Arc::new(regex));
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let registry = PatternRegistry::new();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["email", "phone", "text", "uri", "url"]);
    }

    #[test]
    fn test_require_unknown_pattern() {
        let registry = PatternRegistry::new();
        assert!(registry.require("email").is_ok());

        let err = registry.require("postcode").unwrap_err();
        assert!(matches!(err, ValidatorError::UnknownPattern(ref name) if name == "postcode"));
        assert_eq!(err.to_string(), "unknown pattern `postcode`");
    }

    #[test]
    fn test_email_pattern() {
        let registry = PatternRegistry::new();
        let email = registry.get("email").unwrap();
        assert!(email.is_match("a@b.io"));
        assert!(email.is_match("user+tag@example.co.uk"));
        assert!(!email.is_match("testtest.fr"));
    }

    #[test]
    fn test_phone_pattern() {
        let registry = PatternRegistry::new();
        let phone = registry.get("phone").unwrap();
        assert!(phone.is_match("0612345678"));
        assert!(phone.is_match("06 12 34 56 78"));
        assert!(phone.is_match("+33 6 12 34 56 78"));
        assert!(!phone.is_match("12345"));
    }

    #[test]
    fn test_text_pattern() {
        let registry = PatternRegistry::new();
        let text = registry.get("text").unwrap();
        assert!(text.is_match("Hello World"));
        assert!(!text.is_match("Hello World!"));
    }

    #[test]
    fn test_url_and_uri_patterns() {
        let registry = PatternRegistry::new();
        assert!(registry.get("url").unwrap().is_match("https://www.example.com/path?q=1"));
        assert!(!registry.get("url").unwrap().is_match("example"));
        assert!(registry.get("uri").unwrap().is_match("mailto:someone@example.com"));
        assert!(!registry.get("uri").unwrap().is_match("no scheme here"));
    }

    #[test]
    fn test_builder_overrides_and_extends() {
        let registry = PatternRegistry::builder()
            .pattern("text", r"^[a-z]+$")
            .pattern("zip", r"^\d{5}$")
            .build()
            .unwrap();

        assert!(!registry.get("text").unwrap().is_match("Hello"));
        assert!(registry.get("zip").unwrap().is_match("75001"));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_builder_rejects_bad_regex() {
        let result = PatternRegistry::builder().pattern("broken", "(").build();
        assert!(matches!(
            result,
            Err(ValidatorError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let registry = PatternRegistry::builder().clear().build().unwrap();
        assert!(registry.is_empty());
        assert!(!registry.contains("email"));
    }
}
