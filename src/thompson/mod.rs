//! thompson — distribution-free percentile estimation and experiment sizing.
//!
//! Purpose
//! -------
//! Collect the percentile half of the toolbox: how many samples an
//! experiment needs before a percentile CI exists at all, the Thompson
//! rank-based CI itself, and the repeatability score built on the median
//! CI. Everything here is order-statistic based and assumes nothing about
//! the sample distribution beyond independence.
//!
//! Key behaviors
//! -------------
//! - [`SampleSize::minimum`] answers the design-phase sizing question from
//!   exact binomial tails, with optional robustness against extreme
//!   samples.
//! - [`ThompsonCi::for_percentile`] turns a sample count, percentile,
//!   confidence, and an EXPLICIT CI class into rank bounds on the sorted
//!   sample, or `None` bounds with diagnostics when the sample is too
//!   small.
//! - [`VariabilityOutcome::assess`] scores repeatability as the width of
//!   the two-sided median CI, absolute and relative.
//! - Centralize parameter guards in [`validation`] and error handling in
//!   [`errors`], with a PyErr bridge behind the `python-bindings` feature.
//!
//! Invariants & assumptions
//! ------------------------
//! - Percentiles and confidences live in the (0, 100) exclusive domain
//!   throughout.
//! - Statistical insufficiency is never an error: too few samples yield
//!   `None` bounds or scores, with diagnostics naming the required count.
//! - Samples are assumed independent; checking that assumption is the job
//!   of [`independence`](crate::independence) and
//!   [`screening`](crate::screening).
//!
//! Conventions
//! -----------
//! - CI classes are always explicit ([`CiClass`] has no `Default`); a
//!   one-sided and a two-sided CI at the same confidence are different
//!   statements and silently picking one invites misreading.
//! - Rank bounds index the SORTED sample.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use rust_replicates::thompson::{CiClass, SampleSize, ThompsonCi};
//!
//!   let size = SampleSize::minimum(95.0, 95.0, 0)?;
//!   let ci = ThompsonCi::for_percentile(size.one_sided, 95.0, 95.0, CiClass::OneSided)?;
//!   # Ok::<(), rust_replicates::thompson::ThompsonError>(())
//!   ```
//!
//! - [`metrics`](crate::metrics) uses the percentile machinery through
//!   [`crate::utils::percentile_of`]; Python bindings wrap these entry
//!   points directly and rely on `From<ThompsonError> for PyErr`.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`sizing`] and [`interval`] pin rank and count goldens
//!   verified against direct binomial-mass evaluation; [`variability`]
//!   pins the scoring arithmetic on top of those ranks.

pub mod errors;
pub mod interval;
pub mod sizing;
pub mod validation;
pub mod variability;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{ThompsonError, ThompsonResult};
pub use self::interval::{CiClass, Side, ThompsonCi};
pub use self::sizing::SampleSize;
pub use self::variability::{VariabilityOutcome, VariabilityScore};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_replicates::thompson::prelude::*;
//
// to import the main percentile-estimation surface in a single line.

pub mod prelude {
    pub use super::errors::{ThompsonError, ThompsonResult};
    pub use super::interval::{CiClass, Side, ThompsonCi};
    pub use super::sizing::SampleSize;
    pub use super::variability::{VariabilityOutcome, VariabilityScore};
}
