use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The positive comparison an operator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// `:` (contains for text, equality otherwise)
    Colon,
    /// `~`, same semantics as `:`
    Matches,
    /// `=`
    Equal,
    /// `^`
    Prefix,
    /// `$`
    Suffix,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
}

impl Comparator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Colon => ":",
            Comparator::Matches => "~",
            Comparator::Equal => "=",
            Comparator::Prefix => "^",
            Comparator::Suffix => "$",
            Comparator::Greater => ">",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
        }
    }
}

/// A comparison operator, optionally negated with a leading `!`.
///
/// `!!` and `!:` both parse to a negated [`Comparator::Colon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operator {
    pub comparator: Comparator,
    pub negated: bool,
}

impl Operator {
    pub const fn new(comparator: Comparator) -> Self {
        Operator {
            comparator,
            negated: false,
        }
    }

    pub const fn negated(comparator: Comparator) -> Self {
        Operator {
            comparator,
            negated: true,
        }
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negated, rest) = match s.strip_prefix('!') {
            Some("!") => return Ok(Operator::negated(Comparator::Colon)),
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let comparator = match rest {
            ":" => Comparator::Colon,
            "=" => Comparator::Equal,
            "^" => Comparator::Prefix,
            "$" => Comparator::Suffix,
            ">" => Comparator::Greater,
            ">=" => Comparator::GreaterOrEqual,
            "<" => Comparator::Less,
            "<=" => Comparator::LessOrEqual,
            "~" if !negated => Comparator::Matches,
            _ => return Err(ParseError::UnknownOperator(s.to_string())),
        };

        Ok(Operator {
            comparator,
            negated,
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}", self.comparator.symbol())
    }
}
