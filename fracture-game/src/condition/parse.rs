//! Tokenizing a single comparison clause.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Failures raised while parsing or comparing one clause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("no comparison operator in `{expression}`")]
    MissingOperator { expression: String },
    #[error("`{expression}` does not split into two operands around `{operator}` (got {fields})")]
    MalformedSplit {
        expression: String,
        operator: Operator,
        fields: usize,
    },
    #[error("cannot order {left} against {right} with `{operator}`")]
    Incomparable {
        left: String,
        right: String,
        operator: Operator,
    },
    #[error("`{expression}` joins no clauses")]
    EmptyJoin { expression: String },
}

/// Comparison operators understood by the condition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl Operator {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::Less => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }

    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    /// Interpret an ordering between two operands of the same kind.
    #[must_use]
    pub const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Greater => matches!(ordering, Ordering::Greater),
            Self::Less => matches!(ordering, Ordering::Less),
            Self::GreaterOrEqual => !matches!(ordering, Ordering::Less),
            Self::LessOrEqual => !matches!(ordering, Ordering::Greater),
            Self::Equal => matches!(ordering, Ordering::Equal),
            Self::NotEqual => !matches!(ordering, Ordering::Equal),
        }
    }

    /// Apply the operator to two numbers. NaN compares unequal to everything.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn compare_numbers(self, left: f64, right: f64) -> bool {
        match self {
            Self::Greater => left > right,
            Self::Less => left < right,
            Self::GreaterOrEqual => left >= right,
            Self::LessOrEqual => left <= right,
            Self::Equal => left == right,
            Self::NotEqual => left != right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Order in which operator tokens are searched for inside a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorMatching {
    /// `>` `<` `>=` `<=` `==` `!=`, first substring hit wins. A clause
    /// written with `>=` is therefore split on `>` and its right operand
    /// starts with `=`, which resolves as an unknown path.
    #[default]
    Reference,
    /// Two-character tokens are tried before their one-character prefixes.
    LongestFirst,
}

const REFERENCE_ORDER: [Operator; 6] = [
    Operator::Greater,
    Operator::Less,
    Operator::GreaterOrEqual,
    Operator::LessOrEqual,
    Operator::Equal,
    Operator::NotEqual,
];

const LONGEST_FIRST_ORDER: [Operator; 6] = [
    Operator::GreaterOrEqual,
    Operator::LessOrEqual,
    Operator::Equal,
    Operator::NotEqual,
    Operator::Greater,
    Operator::Less,
];

impl OperatorMatching {
    #[must_use]
    pub const fn scan_order(self) -> &'static [Operator] {
        match self {
            Self::Reference => &REFERENCE_ORDER,
            Self::LongestFirst => &LONGEST_FIRST_ORDER,
        }
    }

    /// First operator in scan order whose token occurs in `clause`.
    #[must_use]
    pub fn find(self, clause: &str) -> Option<Operator> {
        self.scan_order()
            .iter()
            .copied()
            .find(|op| clause.contains(op.token()))
    }
}

/// One side of a comparison, before it is resolved against state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Text(&'a str),
    Number(f64),
    Path(&'a str),
}

impl<'a> Operand<'a> {
    /// Classify a raw operand: quoted text, bare number, or state path.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('"') && raw.ends_with('"') {
            return Self::Text(raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default());
        }
        if is_numeric_literal(raw)
            && let Some(number) = parse_number(raw)
        {
            return Self::Number(number);
        }
        Self::Path(raw)
    }
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::Number(number) => write!(f, "{number}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

/// A parsed `<left> <op> <right>` clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison<'a> {
    pub left: Operand<'a>,
    pub operator: Operator,
    pub right: Operand<'a>,
}

impl<'a> Comparison<'a> {
    /// Parse a clause that contains no logical joins.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::MissingOperator`] when no operator token is
    /// present and [`ConditionError::MalformedSplit`] when splitting on the
    /// chosen token does not leave exactly two operands.
    pub fn parse(clause: &'a str, matching: OperatorMatching) -> Result<Self, ConditionError> {
        let Some(operator) = matching.find(clause) else {
            return Err(ConditionError::MissingOperator {
                expression: clause.to_string(),
            });
        };

        let fields = split_fields(clause, operator.token());
        let &[left, right] = fields.as_slice() else {
            return Err(ConditionError::MalformedSplit {
                expression: clause.to_string(),
                operator,
                fields: fields.len(),
            });
        };

        Ok(Self {
            left: Operand::parse(left),
            operator,
            right: Operand::parse(right),
        })
    }
}

/// Split on `separator`, dropping trailing empty fields. Leading and interior
/// empty fields are kept so that `"> 3"` still yields two operands.
pub(crate) fn split_fields<'a>(input: &'a str, separator: &str) -> Vec<&'a str> {
    let mut fields: Vec<&str> = input.split(separator).collect();
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    fields
}

fn numeric_literal() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]+\.?[0-9]*$").ok())
        .as_ref()
}

fn is_numeric_literal(raw: &str) -> bool {
    numeric_literal().is_some_and(|re| re.is_match(raw))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.strip_suffix('.').unwrap_or(raw).parse().ok()
}
