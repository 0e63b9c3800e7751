//! Condition language used to gate briefing content.
//!
//! A condition is one of:
//!
//! - the literal `true` or `false`;
//! - a comparison `<operand> <op> <operand>` with `op` one of
//!   `> < >= <= == !=`;
//! - comparisons joined by `&&` (all must hold) or `||` (any may hold).
//!
//! Operands are double-quoted strings, bare decimal numbers, or state paths
//! (`party.<stat>` / `demographics.<name>.<stat>`). There is no grouping and
//! no precedence beyond the join order: a clause is split on `&&` first and
//! each piece is evaluated again, so `a && b || c` reads as `a && (b || c)`.
//!
//! Evaluation never fails outward. A clause that cannot be parsed or
//! compared counts as `false` and is logged; unresolvable paths read as
//! `0.0`.

mod parse;
mod resolve;

pub use parse::*;
pub use resolve::*;

use log::warn;

use crate::constants::{JOIN_ALL, JOIN_ANY, LITERAL_FALSE, LITERAL_TRUE};
use crate::state::{Demographic, GameState, PartyStats};

/// Stateless evaluator bound to one state view.
#[derive(Debug, Clone, Copy)]
pub struct ConditionEvaluator<'a> {
    view: StateView<'a>,
    matching: OperatorMatching,
}

impl<'a> ConditionEvaluator<'a> {
    #[must_use]
    pub fn new(party: &'a PartyStats, demographics: &'a [Demographic]) -> Self {
        Self {
            view: StateView::new(party, demographics),
            matching: OperatorMatching::default(),
        }
    }

    #[must_use]
    pub fn for_state(state: &'a GameState) -> Self {
        Self::new(&state.party_stats, &state.demographics)
    }

    #[must_use]
    pub const fn with_matching(mut self, matching: OperatorMatching) -> Self {
        self.matching = matching;
        self
    }

    #[must_use]
    pub const fn matching(&self) -> OperatorMatching {
        self.matching
    }

    /// Evaluate `expression`, treating every malformed clause as `false`.
    #[must_use]
    pub fn evaluate(&self, expression: &str) -> bool {
        self.evaluate_clause(expression, Mode::Lenient)
            .unwrap_or(false)
    }

    /// Strict variant for tooling: reports the first malformed clause
    /// encountered instead of reading it as `false`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConditionError`] of the first clause that fails to parse
    /// or compare.
    pub fn try_evaluate(&self, expression: &str) -> Result<bool, ConditionError> {
        self.evaluate_clause(expression, Mode::Strict)
    }

    /// Parse and compare every clause of `expression`, including those a
    /// join would skip once its outcome is settled.
    ///
    /// # Errors
    ///
    /// Returns the [`ConditionError`] of the first clause that fails.
    pub fn validate(&self, expression: &str) -> Result<(), ConditionError> {
        let expression = expression.trim();
        if matches!(expression, LITERAL_TRUE | LITERAL_FALSE) {
            return Ok(());
        }

        let join = [JOIN_ALL, JOIN_ANY]
            .into_iter()
            .find(|join| expression.contains(join));
        if let Some(join) = join {
            let parts = split_fields(expression, join);
            if parts.is_empty() {
                return Err(empty_join(expression));
            }
            return parts.into_iter().try_for_each(|part| self.validate(part));
        }

        let comparison = Comparison::parse(expression, self.matching)?;
        self.view.compare(&comparison).map(|_| ())
    }

    fn evaluate_clause(&self, expression: &str, mode: Mode) -> Result<bool, ConditionError> {
        let expression = expression.trim();
        match expression {
            LITERAL_TRUE => return Ok(true),
            LITERAL_FALSE => return Ok(false),
            _ => {}
        }

        if expression.contains(JOIN_ALL) {
            let parts = split_fields(expression, JOIN_ALL);
            if parts.is_empty() {
                return mode.settle(expression, Err(empty_join(expression)));
            }
            for part in parts {
                if !self.evaluate_clause(part, mode)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        if expression.contains(JOIN_ANY) {
            let parts = split_fields(expression, JOIN_ANY);
            if parts.is_empty() {
                return mode.settle(expression, Err(empty_join(expression)));
            }
            for part in parts {
                if self.evaluate_clause(part, mode)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        let outcome =
            Comparison::parse(expression, self.matching).and_then(|cmp| self.view.compare(&cmp));
        mode.settle(expression, outcome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lenient,
    Strict,
}

impl Mode {
    fn settle(
        self,
        expression: &str,
        outcome: Result<bool, ConditionError>,
    ) -> Result<bool, ConditionError> {
        match (self, outcome) {
            (_, Ok(value)) => Ok(value),
            (Self::Strict, Err(err)) => Err(err),
            (Self::Lenient, Err(err)) => {
                warn!("condition `{expression}` evaluated as false: {err}");
                Ok(false)
            }
        }
    }
}

fn empty_join(expression: &str) -> ConditionError {
    ConditionError::EmptyJoin {
        expression: expression.to_string(),
    }
}

/// Evaluate `expression` against a full snapshot with reference operator
/// matching.
#[must_use]
pub fn evaluate_condition(expression: &str, state: &GameState) -> bool {
    ConditionEvaluator::for_state(state).evaluate(expression)
}
