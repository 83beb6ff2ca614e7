use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar value as written in the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Literal {
    /// Types an unquoted word: booleans, then integers, then decimals,
    /// falling back to text.
    pub fn from_bare(word: &str) -> Self {
        if word.eq_ignore_ascii_case("true") {
            Literal::Boolean(true)
        } else if word.eq_ignore_ascii_case("false") {
            Literal::Boolean(false)
        } else if let Ok(n) = word.parse::<i64>() {
            Literal::Integer(n)
        } else if is_decimal(word) {
            word.parse::<f64>()
                .map(Literal::Float)
                .unwrap_or_else(|_| Literal::String(word.to_string()))
        } else {
            Literal::String(word.to_string())
        }
    }

    /// Text form used when a value is cast to a string.
    pub fn as_text(&self) -> String {
        match self {
            Literal::String(s) => s.clone(),
            Literal::Integer(n) => n.to_string(),
            Literal::Float(n) => n.to_string(),
            Literal::Boolean(b) => b.to_string(),
        }
    }
}

// Rejects "inf", "NaN" and friends that `f64::from_str` accepts.
fn is_decimal(word: &str) -> bool {
    let digits = word.strip_prefix(['-', '+']).unwrap_or(word);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() == 1
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Float(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Scalar(Literal),
    /// `first..last`, or `first...last` when the end is excluded
    Range {
        first: Literal,
        last: Literal,
        end_excluded: bool,
    },
}

impl RawValue {
    pub fn range(first: impl Into<Literal>, last: impl Into<Literal>, end_excluded: bool) -> Self {
        RawValue::Range {
            first: first.into(),
            last: last.into(),
            end_excluded,
        }
    }
}

impl From<Literal> for RawValue {
    fn from(value: Literal) -> Self {
        RawValue::Scalar(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Scalar(value.into())
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Scalar(value.into())
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Scalar(value.into())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Scalar(lit) => write!(f, "{lit}"),
            RawValue::Range {
                first,
                last,
                end_excluded,
            } => {
                let op = if *end_excluded { "..." } else { ".." };
                write!(f, "{first}{op}{last}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_from_bare() {
        assert_eq!(Literal::from_bare("42"), Literal::Integer(42));
        assert_eq!(Literal::from_bare("-7"), Literal::Integer(-7));
        assert_eq!(Literal::from_bare("1.5"), Literal::Float(1.5));
        assert_eq!(Literal::from_bare("TRUE"), Literal::Boolean(true));
        assert_eq!(Literal::from_bare("nan"), Literal::String("nan".into()));
        assert_eq!(
            Literal::from_bare("2024-01-01"),
            Literal::String("2024-01-01".into())
        );
        assert_eq!(
            Literal::from_bare("99999999999999999999"),
            Literal::String("99999999999999999999".into())
        );
    }

    #[test]
    fn test_raw_value_display() {
        assert_eq!(RawValue::range(1_i64, 5_i64, false).to_string(), "1..5");
        assert_eq!(RawValue::range(1_i64, 5_i64, true).to_string(), "1...5");
        assert_eq!(RawValue::from("dor").to_string(), "\"dor\"");
    }
}
