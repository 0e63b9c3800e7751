//! Resolving operands against the party/demographic state view.

use std::fmt;

use super::parse::{Comparison, ConditionError, Operand, Operator, split_fields};
use crate::constants::{
    NAMESPACE_DEMOGRAPHICS, NAMESPACE_PARTY, PATH_SEPARATOR, UNRESOLVED_VALUE,
};
use crate::state::{Demographic, PartyStats, find_demographic};

/// An operand after lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Number(f64),
    Text(&'a str),
}

impl fmt::Display for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => write!(f, "\"{text}\""),
        }
    }
}

/// Borrowed two-namespace view of a game state.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    party: &'a PartyStats,
    demographics: &'a [Demographic],
}

impl<'a> StateView<'a> {
    #[must_use]
    pub const fn new(party: &'a PartyStats, demographics: &'a [Demographic]) -> Self {
        Self {
            party,
            demographics,
        }
    }

    #[must_use]
    pub fn resolve<'e>(&self, operand: Operand<'e>) -> Resolved<'e> {
        match operand {
            Operand::Text(text) => Resolved::Text(text),
            Operand::Number(number) => Resolved::Number(number),
            Operand::Path(path) => Resolved::Number(self.resolve_path(path)),
        }
    }

    /// Look up `party.<path>` or `demographics.<name>.<path>`. Anything that
    /// does not land on a number resolves to `0.0`.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> f64 {
        let separator = PATH_SEPARATOR.to_string();
        let segments = split_fields(path, &separator);
        let resolved = match segments.split_first() {
            Some((&namespace, rest)) if namespace == NAMESPACE_PARTY => {
                self.party.resolve_path(rest.iter().copied())
            }
            Some((&namespace, rest)) if namespace == NAMESPACE_DEMOGRAPHICS => {
                self.resolve_demographic(rest)
            }
            _ => None,
        };
        resolved.unwrap_or(UNRESOLVED_VALUE)
    }

    fn resolve_demographic(&self, segments: &[&str]) -> Option<f64> {
        let (&name, stat_path) = segments.split_first()?;
        find_demographic(self.demographics, name)?.resolve_path(stat_path.iter().copied())
    }

    /// Resolve both sides of `comparison` and apply its operator.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::Incomparable`] when an ordering operator is
    /// applied to a number and a string.
    pub fn compare(&self, comparison: &Comparison<'_>) -> Result<bool, ConditionError> {
        let left = self.resolve(comparison.left);
        let right = self.resolve(comparison.right);
        apply(left, comparison.operator, right)
    }
}

fn apply(
    left: Resolved<'_>,
    operator: Operator,
    right: Resolved<'_>,
) -> Result<bool, ConditionError> {
    match (left, right) {
        (Resolved::Number(l), Resolved::Number(r)) => Ok(operator.compare_numbers(l, r)),
        (Resolved::Text(l), Resolved::Text(r)) => Ok(operator.accepts(l.cmp(r))),
        _ if operator.is_equality() => Ok(operator == Operator::NotEqual),
        _ => Err(ConditionError::Incomparable {
            left: left.to_string(),
            right: right.to_string(),
            operator,
        }),
    }
}
