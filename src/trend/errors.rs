//! trend::errors — error types for trend estimation and convergence.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the Theil–Sen fit,
//! the normalized trend estimator, and the convergence test, plus the
//! conversion to Python exceptions for the optional binding layer.
//!
//! Key behaviors
//! -------------
//! - Define [`TrendResult`] and [`TrendError`] as the canonical result and
//!   error types of the trend subtree.
//! - Attach human-readable `Display` messages phrased as domain
//!   constraints ("strictly between 0 and 100", "lower < upper").
//! - Map all variants to `PyValueError` at the PyO3 boundary when the
//!   `python-bindings` feature is enabled.
//!
//! Conventions
//! -----------
//! - Invalid parameters are errors; statistical insufficiency is not.
//!   A series that is merely too small to support a confident conclusion
//!   yields an explicit `None` sentinel in the outcome types, never an
//!   `Err`.
//! - Variants carry just enough payload (offending value or lengths) for
//!   diagnostics without dragging whole series into the error.
//!
//! Testing notes
//! -------------
//! - Unit tests check that each variant's `Display` message embeds its
//!   payload; the PyErr conversion is exercised by Python-level tests.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

pub type TrendResult<T> = Result<T, TrendError>;

/// TrendError — invalid-parameter conditions for trend estimation.
///
/// Variants
/// --------
/// - `LengthMismatch { x, y }`
///   The abscissa and ordinate series have different lengths.
/// - `InsufficientData(n)`
///   Fewer than two defined (x, y) pairs remain after filtering undefined
///   ordinates, so no pairwise slope exists.
/// - `NonFiniteAbscissa(value)`
///   An x value is NaN or ±∞; undefined values are only tolerated (and
///   filtered) in y.
/// - `NonFiniteOrdinate(value)`
///   A y value is ±∞ at the fitting stage. NaN ordinates are filtered by
///   the estimator before fitting; infinities are never meaningful input.
/// - `InvalidConfidence(value)`
///   The confidence level is outside (0, 100) exclusive.
/// - `DegenerateBounds { lower, upper }`
///   Normalization bounds with `lower >= upper`; mapping onto [-1, 1]
///   would divide by zero.
/// - `ConstantAbscissa`
///   All x values are identical; no pairwise slope is defined.
#[derive(Debug, Clone, PartialEq)]
pub enum TrendError {
    //------ Input validation errors ------
    LengthMismatch { x: usize, y: usize },
    InsufficientData(usize),
    NonFiniteAbscissa(f64),
    NonFiniteOrdinate(f64),
    InvalidConfidence(f64),
    DegenerateBounds { lower: f64, upper: f64 },
    ConstantAbscissa,
}

impl std::error::Error for TrendError {}

impl std::fmt::Display for TrendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendError::LengthMismatch { x, y } => {
                write!(f, "x and y must be the same length (got {x} and {y}).")
            }
            TrendError::InsufficientData(n) => {
                write!(f, "Need at least 2 defined (x, y) pairs for a trend; got {n}.")
            }
            TrendError::NonFiniteAbscissa(value) => {
                write!(f, "Invalid x value: {value}. Abscissa values must be finite.")
            }
            TrendError::NonFiniteOrdinate(value) => {
                write!(f, "Invalid y value: {value}. Ordinate values must be finite or NaN.")
            }
            TrendError::InvalidConfidence(value) => {
                write!(
                    f,
                    "Invalid confidence: {value}. Provide a real number strictly between 0 and 100."
                )
            }
            TrendError::DegenerateBounds { lower, upper } => {
                write!(f, "Invalid bounds: [{lower}, {upper}]. Must satisfy lower < upper.")
            }
            TrendError::ConstantAbscissa => {
                write!(f, "All x values are identical; no pairwise slope is defined.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<TrendError> for PyErr {
    fn from(err: TrendError) -> PyErr {
        PyValueError::new_err(format!("{err}"))
    }
}
