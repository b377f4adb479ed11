use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::Token;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("No training examples for this outcome - add more training data")]
    NoTrainingExamples,
}

/// Token observation counts for a single outcome class.
///
/// `token_counts` records, per token, the number of training *examples*
/// containing that token - a token repeated within one example still
/// contributes 1. So for any token, `token_counts[t] <= count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeModel {
    count: u64,
    token_counts: BTreeMap<Token, u64>,
}

impl OutcomeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of training examples assigned to this outcome.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of training examples containing `token`. Absent means 0.
    pub fn token_count(&self, token: &Token) -> u64 {
        self.token_counts.get(token).copied().unwrap_or(0)
    }

    /// Tokens observed for this outcome, in sorted order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.token_counts.keys()
    }

    /// Record one labeled training example.
    ///
    /// Duplicate tokens within a single call are counted once.
    pub fn add_training_example(&mut self, tokens: &[Token]) {
        self.count += 1;

        let distinct: BTreeSet<&Token> = tokens.iter().collect();
        for token in distinct {
            *self.token_counts.entry(token.clone()).or_insert(0) += 1;
        }
    }

    /// P(T | O): fraction of this outcome's training examples containing
    /// `token`. Errors until at least one example has been recorded.
    pub fn probability_token_given_outcome(&self, token: &Token) -> Result<f64, ModelError> {
        if self.count == 0 {
            return Err(ModelError::NoTrainingExamples);
        }

        Ok(self.token_count(token) as f64 / self.count as f64)
    }
}
