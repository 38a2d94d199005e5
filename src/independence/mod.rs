//! independence — autocorrelation machinery and the i.i.d. test.
//!
//! Purpose
//! -------
//! Provide the independence half of the series-validation toolbox: the
//! normalized sample autocorrelation of a series, and the 95 % large-sample
//! test that declares a series indistinguishable from i.i.d. noise when all
//! lag coefficients stay inside the 1.96/√n band.
//!
//! Key behaviors
//! -------------
//! - [`autocorrelation`] computes lag coefficients 0..n−1, normalized so
//!   the zero-lag entry is 1 (normalization is skipped for degenerate
//!   series instead of failing).
//! - [`IndependenceOutcome::test`] applies the per-lag bound and records
//!   the worst lag for diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both routines are pure, side-effect-free functions over immutable
//!   slices; neither errors nor panics on degenerate input.
//! - The i.i.d. test is deliberately uncorrected for multiple comparisons
//!   across lags; this is a documented limitation of the method.
//!
//! Downstream usage
//! ----------------
//! - [`screening`](crate::screening) combines the i.i.d. verdict with a
//!   coarse stationarity test before percentile estimation; the percentile
//!   machinery itself lives under [`thompson`](crate::thompson).
//!
//! Testing notes
//! -------------
//! - Hand-computed coefficient goldens and rejection/acceptance cases live
//!   in the per-file unit tests; seeded long-sequence behaviour is pinned
//!   in the crate's integration tests.

pub mod autocorrelation;
pub mod iid;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::autocorrelation::autocorrelation;
pub use self::iid::IndependenceOutcome;
