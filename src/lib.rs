//! Deterministic naive Bayesian classification engine.
//!
//! `bayes-core` accumulates per-outcome token observation counts from
//! labeled training examples and estimates, for an unlabeled token
//! sequence, the posterior probability of each outcome. Per-token
//! likelihood ratios are fused with a numerically stable log-odds sum,
//! so long token sequences cannot underflow the combination. All
//! operations are deterministic — identical inputs always produce
//! identical outputs, including tie-breaking.
//!
//! Tokenization and any text preprocessing are the host's concern: the
//! engine consumes opaque [`types::Token`] values and a fixed set of
//! [`types::OutcomeId`] values chosen at construction time.

pub mod classify;
pub mod model;
pub mod types;
