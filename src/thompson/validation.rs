//! thompson::validation — shared input guards for percentile routines.
//!
//! Purpose
//! -------
//! Centralize the parameter checks of the percentile subtree so the
//! sample-size calculator, the CI estimator, and the variability score
//! agree on what a well-formed request looks like.
//!
//! Conventions
//! -----------
//! - Both percentile and confidence live in the (0, 100) EXCLUSIVE
//!   percentage domain; the endpoints are meaningless for order-statistic
//!   methods (the 0th or 100th percentile of an unbounded distribution has
//!   no finite estimate, and 100 % confidence needs infinite samples).
//! - NaN fails every comparison and is therefore rejected by the same
//!   branch as out-of-range values.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the domain edges for both guards.

use crate::thompson::errors::{ThompsonError, ThompsonResult};

/// Validate a percentile in the (0, 100) exclusive domain.
#[inline]
pub fn validate_percentile(percentile: f64) -> ThompsonResult<()> {
    if !(percentile > 0.0 && percentile < 100.0) {
        return Err(ThompsonError::InvalidPercentile(percentile));
    }
    Ok(())
}

/// Validate a confidence level in the (0, 100) exclusive domain.
#[inline]
pub fn validate_confidence(confidence: f64) -> ThompsonResult<()> {
    if !(confidence > 0.0 && confidence < 100.0) {
        return Err(ThompsonError::InvalidConfidence(confidence));
    }
    Ok(())
}

/// Validate a percentile/confidence pair in one call.
#[inline]
pub fn validate_request(percentile: f64, confidence: f64) -> ThompsonResult<()> {
    validate_percentile(percentile)?;
    validate_confidence(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Acceptance of in-domain values and rejection of edges, out-of-range
    //   values, and NaN for both guards.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify in-domain percentile/confidence pairs pass.
    //
    // Given
    // -----
    // - Values spread across (0, 100).
    //
    // Expect
    // ------
    // - `Ok(())` for every pair.
    fn validate_request_in_domain_succeeds() {
        // Arrange
        let values = [0.001_f64, 25.0, 50.0, 75.0, 99.999];

        // Act & Assert
        for &p in &values {
            for &c in &values {
                assert!(validate_request(p, c).is_ok(), "rejected ({p}, {c})");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure out-of-domain percentiles are rejected, including the
    // endpoints and NaN.
    //
    // Given
    // -----
    // - Percentiles 0, 100, -5, 250, NaN.
    //
    // Expect
    // ------
    // - Every one returns `Err(ThompsonError::InvalidPercentile(_))`.
    fn validate_percentile_out_of_domain_is_rejected() {
        // Arrange
        let invalid = [0.0_f64, 100.0, -5.0, 250.0, f64::NAN];

        // Act & Assert
        for value in invalid {
            match validate_percentile(value) {
                Err(ThompsonError::InvalidPercentile(_)) => (),
                other => panic!("expected InvalidPercentile for {value}, got {other:?}"),
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure out-of-domain confidences are rejected the same way.
    //
    // Given
    // -----
    // - Confidences 0, 100, and NaN.
    //
    // Expect
    // ------
    // - Every one returns `Err(ThompsonError::InvalidConfidence(_))`.
    fn validate_confidence_out_of_domain_is_rejected() {
        // Arrange
        let invalid = [0.0_f64, 100.0, f64::NAN];

        // Act & Assert
        for value in invalid {
            match validate_confidence(value) {
                Err(ThompsonError::InvalidConfidence(_)) => (),
                other => panic!("expected InvalidConfidence for {value}, got {other:?}"),
            }
        }
    }
}
