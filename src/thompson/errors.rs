//! thompson::errors — error types for percentile-based estimation.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the sample-size
//! calculator, the distribution-free percentile CI, and the variability
//! score, plus the conversion to Python exceptions for the optional
//! binding layer.
//!
//! Conventions
//! -----------
//! - Invalid parameters are errors; statistical insufficiency (too few
//!   samples to support the requested confidence) is NOT an error. It
//!   surfaces as `None` bounds on the outcome types, with diagnostics
//!   explaining what would be needed.
//!
//! Testing notes
//! -------------
//! - Unit tests check payload embedding in the `Display` messages; the
//!   PyErr conversion is exercised by Python-level tests.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

pub type ThompsonResult<T> = Result<T, ThompsonError>;

/// ThompsonError — invalid-parameter conditions for percentile routines.
///
/// Variants
/// --------
/// - `InvalidPercentile(value)`
///   The percentile is outside (0, 100) exclusive.
/// - `InvalidConfidence(value)`
///   The confidence level is outside (0, 100) exclusive.
/// - `InvalidCiClass(text)`
///   A CI class string is neither "one-sided" nor "two-sided". The class
///   must always be stated explicitly; there is no default.
#[derive(Debug, Clone, PartialEq)]
pub enum ThompsonError {
    //------ Input validation errors ------
    InvalidPercentile(f64),
    InvalidConfidence(f64),
    InvalidCiClass(String),
}

impl std::error::Error for ThompsonError {}

impl std::fmt::Display for ThompsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThompsonError::InvalidPercentile(value) => {
                write!(
                    f,
                    "Invalid percentile: {value}. Provide a real number strictly between 0 and 100."
                )
            }
            ThompsonError::InvalidConfidence(value) => {
                write!(
                    f,
                    "Invalid confidence: {value}. Provide a real number strictly between 0 and 100."
                )
            }
            ThompsonError::InvalidCiClass(text) => {
                write!(f, "Invalid CI class: {text:?}. Use \"one-sided\" or \"two-sided\".")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ThompsonError> for PyErr {
    fn from(err: ThompsonError) -> PyErr {
        PyValueError::new_err(format!("{err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Display formatting and payload embedding for ThompsonError variants.
    //
    // They intentionally DO NOT cover:
    // - The PyErr conversion (requires the Python C API; tested from Python).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `InvalidPercentile` embeds the offending value.
    //
    // Given
    // -----
    // - Percentile 250.
    //
    // Expect
    // ------
    // - The message contains "250" and names the percentile.
    fn thompson_error_invalid_percentile_includes_payload() {
        // Arrange
        let err = ThompsonError::InvalidPercentile(250.0);

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("250") && msg.contains("percentile"), "got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `InvalidCiClass` embeds the rejected text and lists the
    // accepted spellings.
    //
    // Given
    // -----
    // - The class string "both".
    //
    // Expect
    // ------
    // - The message quotes "both" and mentions the two valid options.
    fn thompson_error_invalid_ci_class_lists_options() {
        // Arrange
        let err = ThompsonError::InvalidCiClass("both".to_string());

        // Act
        let msg = err.to_string();

        // Assert
        assert!(
            msg.contains("both") && msg.contains("one-sided") && msg.contains("two-sided"),
            "got: {msg}"
        );
    }
}
