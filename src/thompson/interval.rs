//! thompson::interval — distribution-free percentile confidence intervals.
//!
//! Purpose
//! -------
//! Compute Thompson-style confidence intervals on percentiles without any
//! distributional assumption: the bounds are ranks (indices into the
//! sorted sample), chosen so that the binomial distribution of "how many
//! samples fall below the percentile" carries the requested confidence.
//!
//! Key behaviors
//! -------------
//! - Scan the cumulative binomial mass from rank 0 upward and return the
//!   last rank whose remaining mass still meets the confidence target.
//! - One-sided bounds use the plain tail mass; the two-sided median CI
//!   doubles the mass to account for both tails symmetrically.
//! - A two-sided CI on a non-median percentile binds on the worst-case
//!   tail `min(p, 100 − p)`; the resulting interval is asymmetric in
//!   probability, which is inherent to rank-based CIs away from the
//!   median.
//! - When even rank 0 cannot carry the confidence the bound is `None`,
//!   and the diagnostics state how many samples a CI would need (via
//!   [`SampleSize::minimum`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Bounds are indices into the SORTED sample, `0 <= lower <= upper < n`
//!   whenever both are `Some`.
//! - The CI class is always explicit; there is no default. One-sided and
//!   two-sided intervals at the same confidence differ, and silently
//!   picking one for the caller has caused real misinterpretation.
//!
//! Downstream usage
//! ----------------
//! - [`variability`](crate::thompson::variability) turns the two-sided
//!   median CI into a repeatability score; long-run performance bounds
//!   use [`ThompsonCi::one_sided_bound`] directly.
//!
//! Testing notes
//! -------------
//! - Unit tests pin rank goldens verified against direct binomial-mass
//!   evaluation, including the exact sample counts where a bound first
//!   becomes available (59 for the 95th percentile at 95 %).

use statrs::distribution::{Binomial, Discrete};
use std::str::FromStr;

use crate::thompson::errors::{ThompsonError, ThompsonResult};
use crate::thompson::sizing::SampleSize;
use crate::thompson::validation::validate_request;

/// CiClass — whether a confidence interval is one- or two-sided.
///
/// Notes
/// -----
/// - Must always be stated explicitly; no `Default` impl is provided on
///   purpose.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CiClass {
    OneSided,
    TwoSided,
}

impl FromStr for CiClass {
    type Err = ThompsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-sided" => Ok(CiClass::OneSided),
            "two-sided" => Ok(CiClass::TwoSided),
            other => Err(ThompsonError::InvalidCiClass(other.to_string())),
        }
    }
}

/// Side — which single bound a one-sided request asks for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Lower,
    Upper,
}

/// ThompsonCi — rank bounds of a percentile confidence interval.
///
/// Purpose
/// -------
/// Hold the lower and upper rank bounds (indices into the sorted sample)
/// together with the diagnostics trail. A `None` bound means the sample
/// is too small to carry the requested confidence on that side.
///
/// Invariants
/// ----------
/// - `lower <= upper` whenever both are `Some`.
/// - Ranks index the sorted sample; callers sort before indexing.
#[derive(Debug, Clone)]
pub struct ThompsonCi {
    lower: Option<usize>,
    upper: Option<usize>,
    diagnostics: Vec<String>,
}

impl ThompsonCi {
    /// Compute the CI ranks for a percentile over `n_samples` sorted samples.
    ///
    /// Parameters
    /// ----------
    /// - `n_samples`: `usize`
    ///   Number of samples the ranks will index into.
    /// - `percentile`: `f64`
    ///   Percentile of interest, strictly between 0 and 100.
    /// - `confidence`: `f64`
    ///   Confidence level, strictly between 0 and 100.
    /// - `class`: `CiClass`
    ///   One- or two-sided; always explicit.
    ///
    /// Returns
    /// -------
    /// `ThompsonResult<ThompsonCi>`
    ///   Rank bounds, `None` per side when the sample is too small.
    ///
    /// Errors
    /// ------
    /// - `ThompsonError::InvalidPercentile` / `InvalidConfidence` from
    ///   validation.
    pub fn for_percentile(
        n_samples: usize,
        percentile: f64,
        confidence: f64,
        class: CiClass,
    ) -> ThompsonResult<Self> {
        validate_request(percentile, confidence)?;

        let mut diagnostics = Vec::new();
        if n_samples == 0 {
            diagnostics.push("No samples; no CI bound exists.".to_string());
            return Ok(ThompsonCi { lower: None, upper: None, diagnostics });
        }

        let (lower, upper) = match class {
            CiClass::OneSided => {
                let lower = lower_rank_scan(n_samples, percentile / 100.0, confidence, 1.0);
                let upper = lower_rank_scan(n_samples, (100.0 - percentile) / 100.0, confidence, 1.0)
                    .map(|rank| (n_samples - 1) - rank);
                (lower, upper)
            }
            CiClass::TwoSided => {
                // The median is the only percentile where both tails bind
                // symmetrically; elsewhere the worst-case tail sets both
                // ranks and the interval is asymmetric in probability.
                let (tail, factor) = if percentile == 50.0 {
                    (0.5, 2.0)
                } else {
                    (percentile.min(100.0 - percentile) / 100.0, 1.0)
                };
                let lower = lower_rank_scan(n_samples, tail, confidence, factor);
                let upper = lower.map(|rank| (n_samples - 1) - rank);
                (lower, upper)
            }
        };

        if lower.is_none() || upper.is_none() {
            let needed = SampleSize::minimum(percentile, confidence, 0)?;
            let needed = match class {
                CiClass::OneSided => needed.one_sided,
                CiClass::TwoSided => needed.two_sided,
            };
            diagnostics.push(format!(
                "{n_samples} samples cannot carry a {confidence}% CI on the \
                 {percentile}th percentile; at least {needed} are required."
            ));
        }

        Ok(ThompsonCi { lower, upper, diagnostics })
    }

    /// Compute a single one-sided bound on a percentile.
    ///
    /// Parameters
    /// ----------
    /// - `side`: `Side`
    ///   `Lower` for a rank the percentile exceeds with the given
    ///   confidence, `Upper` for a rank it stays below.
    ///
    /// Returns
    /// -------
    /// `ThompsonResult<Option<usize>>`
    ///   The rank, or `None` when the sample is too small.
    pub fn one_sided_bound(
        n_samples: usize,
        percentile: f64,
        confidence: f64,
        side: Side,
    ) -> ThompsonResult<Option<usize>> {
        validate_request(percentile, confidence)?;
        if n_samples == 0 {
            return Ok(None);
        }
        Ok(match side {
            Side::Lower => lower_rank_scan(n_samples, percentile / 100.0, confidence, 1.0),
            Side::Upper => {
                lower_rank_scan(n_samples, (100.0 - percentile) / 100.0, confidence, 1.0)
                    .map(|rank| (n_samples - 1) - rank)
            }
        })
    }

    /// Lower rank bound, `None` when the sample is too small.
    pub fn lower(&self) -> Option<usize> {
        self.lower
    }

    /// Upper rank bound, `None` when the sample is too small.
    pub fn upper(&self) -> Option<usize> {
        self.upper
    }

    /// Insufficiency notes accumulated during computation.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}

/// Scan the cumulative binomial mass from rank 0 upward and return the
/// last rank whose remaining mass still meets the confidence target, or
/// `None` when not even rank 0 does. `factor` is 2 for the two-sided
/// median construction, 1 otherwise.
fn lower_rank_scan(n: usize, tail: f64, confidence: f64, factor: f64) -> Option<usize> {
    let binomial = Binomial::new(tail, n as u64).expect("validated binomial parameters");
    let target = confidence / 100.0;

    let mut cumulative = 0.0_f64;
    // n means "no rank dropped below": every rank qualifies and the
    // largest one, n - 1, is the answer.
    let mut first_below = n;
    for k in 0..n {
        cumulative += factor * binomial.pmf(k as u64);
        let remaining = (1.0 - cumulative).max(0.0);
        if remaining < target {
            first_below = k;
            break;
        }
    }
    if first_below == 0 {
        None
    } else {
        Some(first_below - 1)
    }
}
