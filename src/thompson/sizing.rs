//! thompson::sizing — minimum sample counts for percentile estimation.
//!
//! Purpose
//! -------
//! Answer the design-phase question "how many runs do I need?": the
//! minimum number of samples for which a distribution-free confidence
//! interval on a given percentile exists at a given confidence level,
//! optionally hardened against a number of outlier samples.
//!
//! Key behaviors
//! -------------
//! - Fold the percentile to its worst-case tail, `min(p, 100 − p)`: the
//!   95th percentile needs exactly as many samples as the 5th.
//! - One-sided: the closed form N = ⌈ln(1 − c) / ln(1 − p)⌉, the smallest
//!   N with P(at least one sample beyond the percentile) ≥ c.
//! - Robustness r excludes the r most extreme samples from serving as the
//!   bound: N grows until the binomial tail beyond rank r still carries
//!   the required confidence.
//! - Two-sided: for the median, both tails bind symmetrically and the
//!   count follows the doubled-tail construction; for any other
//!   percentile the binding constraint is the worst-case tail, so the
//!   two-sided count equals the one-sided one.
//!
//! Invariants & assumptions
//! ------------------------
//! - `two_sided >= one_sided` always.
//! - Counts are exact, not asymptotic; they come from the binomial
//!   distribution of how many samples fall beyond the percentile.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the canonical counts (59 runs for the 95th percentile
//!   at 95 %, 299 for the 99th, 5/6 for the median) and the robustness
//!   escalation, all verified against direct binomial-tail evaluation.

use statrs::distribution::{Binomial, Discrete};

use crate::thompson::errors::ThompsonResult;
use crate::thompson::validation::validate_request;

/// SampleSize — minimum sample counts for a percentile estimate.
///
/// Fields
/// ------
/// - `one_sided`: `usize`
///   Minimum samples for a one-sided CI on the percentile.
/// - `two_sided`: `usize`
///   Minimum samples for a two-sided CI; equals `one_sided` except for
///   the median, where both tails bind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SampleSize {
    pub one_sided: usize,
    pub two_sided: usize,
}

impl SampleSize {
    /// Compute the minimum sample counts for a percentile estimate.
    ///
    /// Parameters
    /// ----------
    /// - `percentile`: `f64`
    ///   Percentile of interest, strictly between 0 and 100. Folded to its
    ///   worst-case tail internally.
    /// - `confidence`: `f64`
    ///   Required confidence level, strictly between 0 and 100.
    /// - `robustness`: `usize`
    ///   Number of most-extreme samples that must NOT serve as the CI
    ///   bound; 0 means the extremes themselves may bind.
    ///
    /// Returns
    /// -------
    /// `ThompsonResult<SampleSize>`
    ///   The one-sided and two-sided minimum counts.
    ///
    /// Errors
    /// ------
    /// - `ThompsonError::InvalidPercentile` / `InvalidConfidence` from
    ///   validation.
    pub fn minimum(percentile: f64, confidence: f64, robustness: usize) -> ThompsonResult<Self> {
        validate_request(percentile, confidence)?;

        let tail = percentile.min(100.0 - percentile) / 100.0;
        let target = confidence / 100.0;

        let mut one_sided = ((1.0 - target).ln() / (1.0 - tail).ln()).ceil() as usize;
        if robustness > 0 {
            one_sided = one_sided.max(2 * (robustness + 1));
            while tail_coverage(one_sided, tail, robustness, 1.0) < target {
                one_sided += 1;
            }
        }

        // Only the median has two binding tails; elsewhere the worst-case
        // tail alone sets the count.
        let two_sided = if percentile == 50.0 {
            let mut n = (1.0 - (1.0 - target).ln() / 2.0_f64.ln()).ceil() as usize;
            if robustness > 0 {
                n = n.max(2 * (robustness + 1));
                while tail_coverage(n, tail, robustness, 2.0) < target {
                    n += 1;
                }
            }
            n
        } else {
            one_sided
        };

        Ok(SampleSize { one_sided, two_sided })
    }

    /// Narrate the sizing result as a human-readable report.
    ///
    /// Returns
    /// -------
    /// `ThompsonResult<String>`
    ///   A multi-line description of the counts and what they guarantee.
    pub fn describe(percentile: f64, confidence: f64, robustness: usize) -> ThompsonResult<String> {
        let size = SampleSize::minimum(percentile, confidence, robustness)?;
        let mut report = format!(
            "Estimating the {percentile}th percentile with {confidence}% confidence"
        );
        if robustness > 0 {
            report.push_str(&format!(
                ", excluding the {robustness} most extreme sample(s) from the bound"
            ));
        }
        report.push_str(&format!(
            ":\n  one-sided CI: at least {} samples\n  two-sided CI: at least {} samples\n",
            size.one_sided, size.two_sided
        ));
        Ok(report)
    }
}

/// Probability that a CI bound at rank `robustness` still covers the
/// percentile: 1 − Σ_{k=0}^{r} factor · P(X = k) for X ~ Binomial(n, tail).
/// `factor` is 2 for the two-sided median case, 1 otherwise.
#[inline]
fn tail_coverage(n: usize, tail: f64, robustness: usize, factor: f64) -> f64 {
    let binomial = Binomial::new(tail, n as u64).expect("validated binomial parameters");
    let mut cumulative = 0.0_f64;
    for k in 0..=robustness.min(n) {
        cumulative += factor * binomial.pmf(k as u64);
    }
    1.0 - cumulative
}
