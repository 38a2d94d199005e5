//! trend::theil_sen — robust slope estimation with a rank-based CI.
//!
//! Purpose
//! -------
//! Implement the Theil–Sen estimator: the slope is the median of all
//! pairwise slopes, the intercept is `median(y) − slope · median(x)`, and
//! the confidence interval on the slope follows the rank construction of
//! Sen (1968, JASA 63, 1379–1389), Eq. (2.6), with tie corrections in both
//! coordinates.
//!
//! Key behaviors
//! -------------
//! - Form the slope (yⱼ − yᵢ)/(xⱼ − xᵢ) for every pair i < j with
//!   distinct abscissae and take the median of the sorted collection.
//! - Compute the null variance of Kendall's S with tie corrections, then
//!   read the CI bounds as order statistics of the sorted slope list at
//!   ranks (N ∓ z·σ)/2 (clamped to the valid range).
//! - Use the standard-normal quantile for z at the requested confidence.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs must be matched in length with finite abscissae; NaN ordinates
//!   must have been filtered by the caller (the normalized estimator does
//!   this); ±∞ ordinates are rejected.
//! - `lower_slope <= slope <= upper_slope` holds up to ties in the slope
//!   list.
//! - The fit is O(n²) in time and memory for the slope list; callers that
//!   need a cost bound subsample first (see
//!   [`TrendOutcome`](crate::trend::estimator::TrendOutcome)).
//!
//! Conventions
//! -----------
//! - Confidence is expressed in (0, 100) exclusive, like every confidence
//!   in this crate, and converted internally.
//! - Sorting uses `f64::total_cmp`; slope lists never contain NaN because
//!   degenerate pairs are excluded up front.
//!
//! Testing notes
//! -------------
//! - Unit tests pin a perfectly linear series (degenerate CI), a golden
//!   fit of a perturbed ramp verified against a reference implementation
//!   of the same construction, and the constant-abscissa error.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::trend::errors::{TrendError, TrendResult};
use crate::trend::validation::validate_series;

/// TheilSenFit — point estimate and slope confidence bounds.
///
/// Purpose
/// -------
/// Plain value object holding the four numbers a Theil–Sen regression
/// produces: the median slope, the median-based intercept, and the lower
/// and upper confidence bounds on the slope.
///
/// Fields
/// ------
/// - `slope`: `f64`
///   Median of all pairwise slopes.
/// - `intercept`: `f64`
///   `median(y) − slope · median(x)`.
/// - `lower_slope`: `f64`
///   Lower confidence bound on the slope.
/// - `upper_slope`: `f64`
///   Upper confidence bound on the slope.
///
/// Invariants
/// ----------
/// - All fields are finite for finite input.
/// - `lower_slope <= upper_slope`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TheilSenFit {
    pub slope: f64,
    pub intercept: f64,
    pub lower_slope: f64,
    pub upper_slope: f64,
}

impl TheilSenFit {
    /// Fit a Theil–Sen regression with a Sen (1968) slope CI.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&[f64]`
    ///   Abscissa values; finite, same length as `y`.
    /// - `y`: `&[f64]`
    ///   Ordinate values; finite (NaN must be filtered by the caller).
    /// - `confidence`: `f64`
    ///   Confidence level for the slope CI, strictly between 0 and 100.
    ///
    /// Returns
    /// -------
    /// `TrendResult<TheilSenFit>`
    ///   The fitted slope, intercept, and slope confidence bounds.
    ///
    /// Errors
    /// ------
    /// - `TrendError::LengthMismatch`, `TrendError::NonFiniteAbscissa`,
    ///   `TrendError::InvalidConfidence` from input validation.
    /// - `TrendError::NonFiniteOrdinate` when `y` contains NaN or ±∞.
    /// - `TrendError::InsufficientData` when fewer than two pairs exist.
    /// - `TrendError::ConstantAbscissa` when every pair shares the same x,
    ///   so no slope is defined.
    ///
    /// Panics
    /// ------
    /// - Never panics on user input; the unit-normal constructor is
    ///   infallible for (0, 1).
    pub fn fit(x: &[f64], y: &[f64], confidence: f64) -> TrendResult<Self> {
        validate_series(x, y, confidence)?;
        if x.len() < 2 {
            return Err(TrendError::InsufficientData(x.len()));
        }
        for &value in y {
            if !value.is_finite() {
                return Err(TrendError::NonFiniteOrdinate(value));
            }
        }

        let n = x.len();
        let mut slopes: Vec<f64> = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = x[j] - x[i];
                if dx != 0.0 {
                    slopes.push((y[j] - y[i]) / dx);
                }
            }
        }
        if slopes.is_empty() {
            return Err(TrendError::ConstantAbscissa);
        }
        slopes.sort_by(f64::total_cmp);

        let slope = median_sorted(&slopes);
        let intercept = median(y) - slope * median(x);

        // Sen (1968), Eq. (2.6): null variance of Kendall's S with tie
        // corrections in both coordinates.
        let ny = n as f64;
        let sigma_sq =
            (ny * (ny - 1.0) * (2.0 * ny + 5.0) - tie_term(x) - tie_term(y)) / 18.0;
        let sigma = sigma_sq.sqrt();

        let mut alpha = confidence / 100.0;
        if alpha > 0.5 {
            alpha = 1.0 - alpha;
        }
        let z = Normal::new(0.0, 1.0).expect("unit normal").inverse_cdf(1.0 - alpha / 2.0);

        let nt = slopes.len() as f64;
        let last = slopes.len() - 1;
        let lower_rank = ((nt - z * sigma) / 2.0).round() as i64 - 1;
        let upper_rank = ((nt + z * sigma) / 2.0).round() as i64;
        let rl = lower_rank.clamp(0, last as i64) as usize;
        let ru = upper_rank.clamp(0, last as i64) as usize;

        Ok(TheilSenFit {
            slope,
            intercept,
            lower_slope: slopes[rl],
            upper_slope: slopes[ru],
        })
    }
}

//
// ---------- Private helpers (compact docs) ----------
//

/// Median of an already-sorted slice (average of the two middle values
/// for even lengths). The slice must be non-empty.
#[inline]
fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Median of an unsorted slice; sorts a copy with `total_cmp`.
#[inline]
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_sorted(&sorted)
}

/// Tie correction ∑ k(k−1)(2k+5) over groups of equal values.
#[inline]
fn tie_term(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut total = 0.0_f64;
    let mut run = 1_usize;
    for w in sorted.windows(2) {
        if w[0] == w[1] {
            run += 1;
        } else {
            if run > 1 {
                let k = run as f64;
                total += k * (k - 1.0) * (2.0 * k + 5.0);
            }
            run = 1;
        }
    }
    if run > 1 {
        let k = run as f64;
        total += k * (k - 1.0) * (2.0 * k + 5.0);
    }
    total
}
