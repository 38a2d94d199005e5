//! trend — normalized Theil–Sen trend estimation and convergence testing.
//!
//! Purpose
//! -------
//! Provide the trend half of the series-validation toolbox: a robust
//! Theil–Sen fit with a rank-based slope confidence interval, a
//! scale-free estimator that works in a normalized [-1, 1] space derived
//! from expected-range bounds, and a convergence test that checks whether
//! the normalized slope CI stays inside a tolerance band.
//!
//! Key behaviors
//! -------------
//! - [`TheilSenFit::fit`] implements the median-of-pairwise-slopes
//!   estimator with the Sen (1968) rank CI, including tie corrections.
//! - [`TrendOutcome::estimate`] normalizes both coordinates, optionally
//!   subsamples to bound the O(n²) pairwise cost, and rescales the fitted
//!   lines to raw units.
//! - [`ConvergenceOutcome::test`] turns the normalized slope CI into a
//!   converged / not-converged verdict with a narrated decision trail.
//!
//! Invariants & assumptions
//! ------------------------
//! - All confidences live in the (0, 100) exclusive percentage domain.
//! - NaN ordinates mean "undefined sample" and are filtered pair-wise;
//!   every other non-finite input is an error.
//! - Randomness (for subsampling) is always threaded in by the caller.
//!
//! Testing notes
//! -------------
//! - Each file carries unit tests with pinned golden values; the crate's
//!   integration tests chain these routines into full analyses.

pub mod convergence;
pub mod errors;
pub mod estimator;
pub mod theil_sen;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::convergence::ConvergenceOutcome;
pub use self::errors::{TrendError, TrendResult};
pub use self::estimator::{
    Bounds, ToleranceCoordinates, TrendCoordinates, TrendOptions, TrendOutcome, DEFAULT_MAX_PAIRS,
};
pub use self::theil_sen::TheilSenFit;
