//! independence::autocorrelation — normalized sample autocorrelation.
//!
//! Purpose
//! -------
//! Compute the normalized sample autocorrelation of a measurement series,
//! the raw ingredient of the large-sample independence test in
//! [`iid`](crate::independence::iid). The series is demeaned, correlated
//! against itself over every non-negative lag, and scaled so that the
//! zero-lag coefficient is exactly 1.
//!
//! Key behaviors
//! -------------
//! - Demean the series once, then form the lag-k products
//!   ∑ₜ (Yₜ − Ȳ)(Yₜ₊ₖ − Ȳ) for k = 0,…,n−1.
//! - Normalize every coefficient by the zero-lag value (n times the biased
//!   sample variance) so that `lags[0] == 1.0` for any non-degenerate
//!   series.
//! - When the zero-lag value is zero or not finite (constant or corrupt
//!   series), skip normalization and return the raw products instead of
//!   failing with a division error.
//!
//! Invariants & assumptions
//! ------------------------
//! - The returned vector has exactly `series.len()` entries; entry k is the
//!   lag-k coefficient.
//! - No error conditions and no side effects; degenerate inputs degrade to
//!   unnormalized (all-zero) coefficients rather than NaN.
//! - Order of the input is semantically meaningful; callers must not sort
//!   the series before calling.
//!
//! Conventions
//! -----------
//! - Lag-k products pair `(Yₜ, Yₜ₊ₖ)` for t = 0,…,n−1−k, the same pairing
//!   scheme used by the lag helpers of the trend subtree.
//! - The O(n²) direct sum is intentional: series in this crate are runs of
//!   an experiment (tens to a few thousand points), far below the sizes
//!   where an FFT-based correlation would pay off.
//!
//! Downstream usage
//! ----------------
//! - [`IndependenceOutcome::test`](crate::independence::iid::IndependenceOutcome::test)
//!   consumes lags 1..n−1 and compares them against the 1.96/√n bound.
//! - Callers that want to plot a correlogram can consume the vector
//!   directly; it is plain data.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the exact coefficients of a tiny hand-computed series,
//!   the unit zero-lag of non-degenerate input, and the degenerate
//!   constant-series path.

/// Compute the normalized sample autocorrelation for all non-negative lags.
///
/// Parameters
/// ----------
/// - `series`: `&[f64]`
///   Input series {Yₜ}. May be empty; values are used as-is (the caller is
///   responsible for filtering undefined observations).
///
/// Returns
/// -------
/// `Vec<f64>`
///   Coefficients for lags 0,…,n−1. For a non-degenerate series the
///   zero-lag entry is exactly 1.0. For a series whose zero-lag product is
///   zero or non-finite, the raw (unnormalized) products are returned.
///
/// Errors
/// ------
/// - Never fails; degenerate inputs are handled by skipping normalization.
///
/// Panics
/// ------
/// - Never panics; an empty series yields an empty vector.
///
/// Notes
/// -----
/// - The normalizer is the lag-0 product, i.e. n·Var̂(Y) with the biased
///   variance estimator, which makes the lag-k coefficient the usual rₖ
///   statistic whose large-sample null distribution has standard deviation
///   of order 1/√n.
pub fn autocorrelation(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }

    let mean: f64 = series.iter().sum::<f64>() / n as f64;
    let demeaned: Vec<f64> = series.iter().map(|&v| v - mean).collect();

    let mut lags: Vec<f64> = Vec::with_capacity(n);
    for k in 0..n {
        let product: f64 =
            demeaned[k..].iter().zip(&demeaned).map(|(lead, base)| lead * base).sum();
        lags.push(product);
    }

    let zero_lag = lags[0];
    if zero_lag.is_finite() && zero_lag != 0.0 {
        for value in &mut lags {
            *value /= zero_lag;
        }
    }

    lags
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact coefficients of a small hand-computed series.
    // - Unit zero-lag for non-degenerate input.
    // - The degenerate constant-series path (normalization skipped).
    // - Empty input.
    //
    // They intentionally DO NOT cover:
    // - The 1.96/√n decision rule, which belongs to `independence::iid`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the exact autocorrelation of the series [1, 2, 3].
    //
    // Given
    // -----
    // - Demeaned values are [-1, 0, 1] with zero-lag product 2.
    //
    // Expect
    // ------
    // - Coefficients [1.0, 0.0, -0.5].
    fn autocorrelation_small_series_matches_hand_computation() {
        // Arrange
        let series = [1.0_f64, 2.0, 3.0];

        // Act
        let lags = autocorrelation(&series);

        // Assert
        assert_eq!(lags.len(), 3);
        assert!((lags[0] - 1.0).abs() < 1e-15);
        assert!(lags[1].abs() < 1e-15);
        assert!((lags[2] + 0.5).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Verify that the zero-lag coefficient is exactly 1 for any series
    // with non-zero variance.
    //
    // Given
    // -----
    // - A short non-constant series.
    //
    // Expect
    // ------
    // - `lags[0] == 1.0` and every coefficient lies in [-1, 1].
    fn autocorrelation_nondegenerate_series_has_unit_zero_lag() {
        // Arrange
        let series = [0.3_f64, -1.2, 0.8, 2.1, -0.4, 0.05];

        // Act
        let lags = autocorrelation(&series);

        // Assert
        assert_eq!(lags[0], 1.0);
        for (k, value) in lags.iter().enumerate() {
            assert!(
                (-1.0..=1.0).contains(value),
                "lag {k} coefficient {value} out of [-1, 1]"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure a constant series skips normalization instead of dividing
    // by its zero variance.
    //
    // Given
    // -----
    // - A constant series of length 4.
    //
    // Expect
    // ------
    // - All products are exactly 0.0 (no NaN leakage).
    fn autocorrelation_constant_series_skips_normalization() {
        // Arrange
        let series = [7.5_f64; 4];

        // Act
        let lags = autocorrelation(&series);

        // Assert
        assert_eq!(lags.len(), 4);
        for value in &lags {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that an empty series yields an empty coefficient vector.
    //
    // Given
    // -----
    // - An empty slice.
    //
    // Expect
    // ------
    // - An empty vector, no panic.
    fn autocorrelation_empty_series_returns_empty_vector() {
        // Arrange
        let series: [f64; 0] = [];

        // Act
        let lags = autocorrelation(&series);

        // Assert
        assert!(lags.is_empty());
    }
}
