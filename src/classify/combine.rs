//! Log-odds combination of independent per-token posteriors.
//!
//! The naive formulation multiplies `p_i` and `1 - p_i` across tokens and
//! divides; both products underflow to 0.0 within a few dozen tokens and
//! the quotient collapses to 0/0. Summing log-odds and applying the
//! logistic transform is algebraically identical and stable for any input
//! length, so it is the only formulation used here.

/// Posterior produced by folding per-token evidence, with counts of how
/// many tokens actually contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct CombineResult {
    pub posterior: f64,
    pub tokens_combined: usize,
    pub tokens_excluded: usize,
}

/// Fold independent single-token posteriors into one aggregate posterior.
///
/// Tokens whose posterior is exactly 0.0 or 1.0 are excluded: their
/// log-odds are infinite and a single one would saturate the aggregate.
/// When every token is excluded the sum is empty and the result is
/// exactly 0.5, maximal uncertainty.
pub fn combine_posteriors(posteriors: &[f64]) -> CombineResult {
    let mut exponent = 0.0;
    let mut tokens_combined = 0;
    let mut tokens_excluded = 0;

    for &p in posteriors {
        debug_assert!((0.0..=1.0).contains(&p), "posterior {p} out of range [0.0, 1.0]");
        if p == 0.0 || p == 1.0 {
            tokens_excluded += 1;
            continue;
        }
        // ln(1-p) - ln(p) is the negated log-odds; the sigmoid below
        // expects it with this sign.
        exponent += (1.0 - p).ln() - p.ln();
        tokens_combined += 1;
    }

    CombineResult {
        posterior: 1.0 / (1.0 + exponent.exp()),
        tokens_combined,
        tokens_excluded,
    }
}
