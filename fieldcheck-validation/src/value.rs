// Scalar field values

use crate::parse::{parse_bool, parse_float};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single form value as handed over by the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Raw text, the usual shape of submitted form data
    Text(String),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Boolean value
    Bool(bool),
}

impl Scalar {
    /// Whether the value is held as text.
    pub fn is_text(&self) -> bool {
        matches!(self, Scalar::Text(_))
    }

    /// Textual form of the value.
    ///
    /// Booleans render as `1` and the empty string, the way form data
    /// encodes checkbox state.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Text(s) => Cow::Borrowed(s.as_str()),
            Scalar::Int(i) => Cow::Owned(i.to_string()),
            Scalar::Float(f) => Cow::Owned(f.to_string()),
            Scalar::Bool(true) => Cow::Borrowed("1"),
            Scalar::Bool(false) => Cow::Borrowed(""),
        }
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Text is numeric only when it parses as a float in full.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Text(s) => parse_float(s),
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
    }

    /// Truthiness used when a boolean takes part in a comparison.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Text(s) => !s.is_empty() && s != "0",
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Bool(b) => *b,
        }
    }

    /// Boolean interpretation via [`parse_bool`].
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Int(0) => Some(false),
            Scalar::Int(1) => Some(true),
            Scalar::Int(_) | Scalar::Float(_) => None,
            Scalar::Text(s) => parse_bool(s),
        }
    }
}

/// Whether a possibly-absent value counts as empty.
///
/// Only an absent value or zero-length text is empty; `0` and `false` are
/// values in their own right. This is stricter than a loose `== ""` check,
/// which would also treat `false` and `0` as missing: a form that must reject
/// an unticked box should use `matches(true)` rather than `required()`.
pub fn is_blank(value: Option<&Scalar>) -> bool {
    match value {
        None => true,
        Some(Scalar::Text(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Coercive equality between a field value and an expected value.
///
/// Booleans compare by truthiness, numeric operands compare as numbers and
/// everything else compares as text. An absent value equals only the empty
/// string and `false`.
pub fn loose_eq(value: Option<&Scalar>, expected: &Scalar) -> bool {
    let Some(value) = value else {
        return match expected {
            Scalar::Text(s) => s.is_empty(),
            Scalar::Bool(b) => !b,
            _ => false,
        };
    };

    match (value, expected) {
        (Scalar::Bool(_), _) | (_, Scalar::Bool(_)) => value.is_truthy() == expected.is_truthy(),
        (Scalar::Text(a), Scalar::Text(b)) => match (parse_float(a), parse_float(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        _ => match (value.as_number(), expected.as_number()) {
            (Some(x), Some(y)) => x == y,
            _ => value.as_text() == expected.as_text(),
        },
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Text(value.clone())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::Int(value as i64)
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text() {
        assert_eq!(Scalar::from("abc").as_text(), "abc");
        assert_eq!(Scalar::from(5).as_text(), "5");
        assert_eq!(Scalar::from(2.5).as_text(), "2.5");
        assert_eq!(Scalar::from(true).as_text(), "1");
        assert_eq!(Scalar::from(false).as_text(), "");
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Scalar::from("12.5").as_number(), Some(12.5));
        assert_eq!(Scalar::from("twelve").as_number(), None);
        assert_eq!(Scalar::from(7).as_number(), Some(7.0));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Scalar::from(""))));
        assert!(!is_blank(Some(&Scalar::from("0"))));
        assert!(!is_blank(Some(&Scalar::from(0))));
        assert!(!is_blank(Some(&Scalar::from(false))));
    }

    #[test]
    fn test_loose_eq_text() {
        assert!(loose_eq(Some(&Scalar::from("test")), &Scalar::from("test")));
        assert!(!loose_eq(Some(&Scalar::from("test")), &Scalar::from("Test")));
        assert!(loose_eq(Some(&Scalar::from("1e1")), &Scalar::from("10")));
    }

    #[test]
    fn test_loose_eq_mixed() {
        assert!(loose_eq(Some(&Scalar::from("5")), &Scalar::from(5)));
        assert!(loose_eq(Some(&Scalar::from(5)), &Scalar::from(5.0)));
        assert!(loose_eq(Some(&Scalar::from("abc")), &Scalar::from(true)));
        assert!(!loose_eq(Some(&Scalar::from("abc")), &Scalar::from(5)));
    }

    #[test]
    fn test_loose_eq_absent() {
        assert!(loose_eq(None, &Scalar::from("")));
        assert!(loose_eq(None, &Scalar::from(false)));
        assert!(!loose_eq(None, &Scalar::from("x")));
        assert!(!loose_eq(None, &Scalar::from(0)));
    }

    #[test]
    fn test_to_bool() {
        assert_eq!(Scalar::from("on").to_bool(), Some(true));
        assert_eq!(Scalar::from(0).to_bool(), Some(false));
        assert_eq!(Scalar::from(3).to_bool(), None);
        assert_eq!(Scalar::from(false).to_bool(), Some(false));
    }
}
