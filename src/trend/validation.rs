//! trend::validation — shared input guards for trend routines.
//!
//! Purpose
//! -------
//! Centralize the basic precondition checks of the trend subtree so the
//! Theil–Sen fit, the normalized estimator, and the convergence test agree
//! on what a well-formed request looks like.
//!
//! Key behaviors
//! -------------
//! - Enforce matched series lengths, finite abscissa values, and the
//!   (0, 100) exclusive confidence domain before any pairwise-slope work.
//! - Map violations into structured [`TrendError`] values.
//!
//! Conventions
//! -----------
//! - Purely about validation: no I/O, no allocation beyond error
//!   construction.
//! - Undefined (NaN) ordinate values are NOT rejected here; the estimator
//!   filters them pair-wise as part of its contract.
//!
//! Testing notes
//! -------------
//! - Unit tests cover every error branch and a success path.

use crate::trend::errors::{TrendError, TrendResult};

/// Validate a paired-series trend request.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Abscissa values; every entry must be finite.
/// - `y`: `&[f64]`
///   Ordinate values; must have the same length as `x`. NaN entries are
///   allowed (the estimator drops those pairs).
/// - `confidence`: `f64`
///   Confidence level, strictly between 0 and 100.
///
/// Returns
/// -------
/// `TrendResult<()>`
///   `Ok(())` when the basic constraints hold, otherwise the first
///   violated constraint as a [`TrendError`].
///
/// Errors
/// ------
/// - `TrendError::LengthMismatch` when `x.len() != y.len()`.
/// - `TrendError::NonFiniteAbscissa` when any x value is NaN or ±∞.
/// - `TrendError::InvalidConfidence` when `confidence` is outside (0, 100).
///
/// Panics
/// ------
/// - Never panics; all failures are reported via `TrendError`.
pub fn validate_series(x: &[f64], y: &[f64], confidence: f64) -> TrendResult<()> {
    if x.len() != y.len() {
        return Err(TrendError::LengthMismatch { x: x.len(), y: y.len() });
    }

    for &value in x {
        if !value.is_finite() {
            return Err(TrendError::NonFiniteAbscissa(value));
        }
    }

    validate_confidence(confidence)
}

/// Validate a confidence level in the (0, 100) exclusive domain.
#[inline]
pub fn validate_confidence(confidence: f64) -> TrendResult<()> {
    if !(confidence > 0.0 && confidence < 100.0) {
        return Err(TrendError::InvalidConfidence(confidence));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Successful validation of a well-formed request.
    // - Each error branch: length mismatch, non-finite abscissa, and
    //   out-of-domain confidence (including NaN).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a matched, finite, in-domain request passes.
    //
    // Given
    // -----
    // - x = [0, 1, 2], y with one NaN ordinate, confidence 95.
    //
    // Expect
    // ------
    // - `Ok(())` (NaN ordinates are filtered later, not rejected here).
    fn validate_series_valid_request_succeeds() {
        // Arrange
        let x = [0.0_f64, 1.0, 2.0];
        let y = [1.0_f64, f64::NAN, 3.0];

        // Act
        let result = validate_series(&x, &y, 95.0);

        // Assert
        assert!(result.is_ok(), "expected Ok(()), got {result:?}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure mismatched lengths are rejected with both lengths reported.
    //
    // Given
    // -----
    // - x of length 3, y of length 2.
    //
    // Expect
    // ------
    // - `Err(TrendError::LengthMismatch { x: 3, y: 2 })`.
    fn validate_series_length_mismatch_is_rejected() {
        // Arrange
        let x = [0.0_f64, 1.0, 2.0];
        let y = [1.0_f64, 2.0];

        // Act
        let result = validate_series(&x, &y, 95.0);

        // Assert
        match result {
            Err(TrendError::LengthMismatch { x: 3, y: 2 }) => (),
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure a non-finite abscissa value is rejected.
    //
    // Given
    // -----
    // - x containing +∞.
    //
    // Expect
    // ------
    // - `Err(TrendError::NonFiniteAbscissa(_))`.
    fn validate_series_non_finite_abscissa_is_rejected() {
        // Arrange
        let x = [0.0_f64, f64::INFINITY, 2.0];
        let y = [1.0_f64, 2.0, 3.0];

        // Act
        let result = validate_series(&x, &y, 95.0);

        // Assert
        match result {
            Err(TrendError::NonFiniteAbscissa(v)) => assert!(!v.is_finite()),
            other => panic!("expected NonFiniteAbscissa, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure confidence values at and beyond the domain edges fail.
    //
    // Given
    // -----
    // - Confidence values 0, 100, -3, and NaN.
    //
    // Expect
    // ------
    // - Every one returns `Err(TrendError::InvalidConfidence(_))`.
    fn validate_confidence_out_of_domain_is_rejected() {
        // Arrange
        let invalid = [0.0_f64, 100.0, -3.0, f64::NAN];

        // Act & Assert
        for value in invalid {
            match validate_confidence(value) {
                Err(TrendError::InvalidConfidence(_)) => (),
                other => panic!("expected InvalidConfidence for {value}, got {other:?}"),
            }
        }
    }
}
