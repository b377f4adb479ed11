pub mod combine;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::outcome::{ModelError, OutcomeModel};
use crate::types::identifiers::{ModelFingerprint, OutcomeId, Token};
pub use combine::{combine_posteriors, CombineResult};

/// Tolerance below which a token's total evidence P(T) is treated as zero.
pub const EVIDENCE_TOLERANCE: f64 = 1e-7;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier requires at least one outcome")]
    NoOutcomes,

    #[error("Unknown outcome: {0}")]
    UnknownOutcome(OutcomeId),

    #[error("Insufficient training data - no training examples recorded for any outcome")]
    InsufficientTrainingData,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Inconsistent classifier state: {0}")]
    InconsistentState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Naive Bayesian classifier over a fixed set of outcomes.
///
/// The outcome set is fixed at construction and never changes. Training
/// examples accumulate into exactly one [`OutcomeModel`] each; queries
/// combine per-token evidence across all outcomes. Iteration follows
/// construction order, so classification is deterministic, including
/// tie-breaking in [`Classifier::most_likely_outcome`].
///
/// Single-threaded by design. A host that trains and queries concurrently
/// must supply its own synchronization around the whole instance.
///
/// Deserialization goes through the same validation as construction:
/// state whose recorded order and models disagree is rejected, so a
/// restored classifier upholds the fixed-outcome-set invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ClassifierState")]
pub struct Classifier {
    order: Vec<OutcomeId>,
    models: BTreeMap<OutcomeId, OutcomeModel>,
}

/// Raw persisted form of a [`Classifier`], before invariant checks.
#[derive(Debug, Deserialize)]
struct ClassifierState {
    order: Vec<OutcomeId>,
    models: BTreeMap<OutcomeId, OutcomeModel>,
}

impl TryFrom<ClassifierState> for Classifier {
    type Error = ClassifierError;

    fn try_from(state: ClassifierState) -> Result<Self, Self::Error> {
        if state.order.is_empty() {
            return Err(ClassifierError::NoOutcomes);
        }

        let mut seen = BTreeSet::new();
        for outcome in &state.order {
            if !seen.insert(outcome) {
                return Err(ClassifierError::InconsistentState(format!(
                    "duplicate outcome in order: {outcome}"
                )));
            }
            if !state.models.contains_key(outcome) {
                return Err(ClassifierError::InconsistentState(format!(
                    "outcome without a model: {outcome}"
                )));
            }
        }
        if state.models.len() != state.order.len() {
            return Err(ClassifierError::InconsistentState(
                "model recorded for an outcome missing from order".to_string(),
            ));
        }

        Ok(Classifier {
            order: state.order,
            models: state.models,
        })
    }
}

impl Classifier {
    /// Build a classifier with one empty model per outcome.
    ///
    /// Duplicate identifiers collapse; the first occurrence fixes the
    /// iteration position. An empty outcome set is a configuration error.
    pub fn new(outcomes: impl IntoIterator<Item = OutcomeId>) -> Result<Self, ClassifierError> {
        let mut order = Vec::new();
        let mut models = BTreeMap::new();

        for outcome in outcomes {
            if !models.contains_key(&outcome) {
                order.push(outcome.clone());
                models.insert(outcome, OutcomeModel::new());
            }
        }

        if order.is_empty() {
            return Err(ClassifierError::NoOutcomes);
        }

        Ok(Classifier { order, models })
    }

    /// Outcome identifiers in construction order.
    pub fn outcomes(&self) -> impl Iterator<Item = &OutcomeId> {
        self.order.iter()
    }

    /// Read access to one outcome's accumulated counts, for hosts that
    /// persist model state themselves.
    pub fn outcome_model(&self, outcome: &OutcomeId) -> Result<&OutcomeModel, ClassifierError> {
        self.models
            .get(outcome)
            .ok_or_else(|| ClassifierError::UnknownOutcome(outcome.clone()))
    }

    /// Total training examples recorded across all outcomes.
    pub fn total_count(&self) -> u64 {
        self.models.values().map(OutcomeModel::count).sum()
    }

    /// Record one labeled training example against `outcome`.
    pub fn add_training_example(
        &mut self,
        outcome: &OutcomeId,
        tokens: &[Token],
    ) -> Result<(), ClassifierError> {
        let model = self
            .models
            .get_mut(outcome)
            .ok_or_else(|| ClassifierError::UnknownOutcome(outcome.clone()))?;

        model.add_training_example(tokens);
        Ok(())
    }

    /// Prior P(O): this outcome's share of all training examples.
    pub fn probability_outcome(&self, outcome: &OutcomeId) -> Result<f64, ClassifierError> {
        let model = self.outcome_model(outcome)?;

        let total = self.total_count();
        if total == 0 {
            return Err(ClassifierError::InsufficientTrainingData);
        }

        Ok(model.count() as f64 / total as f64)
    }

    /// Posterior P(O | T) for a single token, via Bayes' rule with total
    /// evidence P(T) = sum over outcomes of P(T|o) * P(o).
    ///
    /// A token never observed under any outcome has P(T) below
    /// [`EVIDENCE_TOLERANCE`] and yields 0.0 by convention: it carries no
    /// discriminative evidence. An outcome with zero training examples
    /// makes the evidence sum undefined and the call errors.
    pub fn probability_outcome_given_token(
        &self,
        token: &Token,
        outcome: &OutcomeId,
    ) -> Result<f64, ClassifierError> {
        let model = self.outcome_model(outcome)?;

        if self.total_count() == 0 {
            return Err(ClassifierError::InsufficientTrainingData);
        }

        let mut evidence = 0.0;
        for (other, other_model) in &self.models {
            evidence += other_model.probability_token_given_outcome(token)?
                * self.probability_outcome(other)?;
        }

        if evidence <= EVIDENCE_TOLERANCE {
            return Ok(0.0);
        }

        Ok(model.probability_token_given_outcome(token)? * self.probability_outcome(outcome)?
            / evidence)
    }

    /// Posterior P(O | T1 & ... & Tn) for a token sequence.
    ///
    /// Each token occurrence contributes its single-token posterior
    /// independently; duplicates are NOT deduplicated here, unlike the
    /// training side. The per-token posteriors are folded with the
    /// numerically stable log-odds sum in [`combine_posteriors`].
    pub fn probability_outcome_given_tokens(
        &self,
        tokens: &[Token],
        outcome: &OutcomeId,
    ) -> Result<f64, ClassifierError> {
        let posteriors = tokens
            .iter()
            .map(|token| self.probability_outcome_given_token(token, outcome))
            .collect::<Result<Vec<f64>, ClassifierError>>()?;

        Ok(combine_posteriors(&posteriors).posterior)
    }

    /// Posterior for every outcome, keyed by outcome identifier.
    ///
    /// Each posterior comes from its own one-vs-rest combination, so the
    /// values need not sum to 1.
    pub fn classify_tokens(
        &self,
        tokens: &[Token],
    ) -> Result<BTreeMap<OutcomeId, f64>, ClassifierError> {
        let mut probabilities = BTreeMap::new();
        for outcome in &self.order {
            let posterior = self.probability_outcome_given_tokens(tokens, outcome)?;
            probabilities.insert(outcome.clone(), posterior);
        }

        Ok(probabilities)
    }

    /// The outcome with the highest posterior for `tokens`.
    ///
    /// Ties resolve to the outcome constructed first.
    pub fn most_likely_outcome(&self, tokens: &[Token]) -> Result<&OutcomeId, ClassifierError> {
        let mut best: Option<(&OutcomeId, f64)> = None;

        for outcome in &self.order {
            let posterior = self.probability_outcome_given_tokens(tokens, outcome)?;
            match best {
                Some((_, best_posterior)) if posterior <= best_posterior => {}
                _ => best = Some((outcome, posterior)),
            }
        }

        // Construction guarantees at least one outcome.
        best.map(|(outcome, _)| outcome)
            .ok_or(ClassifierError::NoOutcomes)
    }

    /// Content hash of the accumulated training state.
    pub fn fingerprint(&self) -> Result<ModelFingerprint, ClassifierError> {
        let state = serde_json::to_vec(self)?;
        Ok(ModelFingerprint::from_state(&state))
    }
}
