//! metrics — long-run percentile measures over a measurement run.
//!
//! Purpose
//! -------
//! Reduce one run's raw measurements to a single metric value: a chosen
//! percentile of the data, optionally gated on evidence that the running
//! percentile has CONVERGED, i.e. stopped drifting as more data arrived.
//! A measure taken from a still-drifting run says more about when the run
//! stopped than about the system under test.
//!
//! Key behaviors
//! -------------
//! - Build a prefix-percentile trace: the requested percentile evaluated
//!   over growing prefixes of the run (second half of up to 200 chunks),
//!   each sample placed at the wall-clock position of its prefix end.
//! - Run the trend convergence test on that trace; only a converged trace
//!   yields a measure, taken as the median (nearest rank) of the trace
//!   values.
//! - Without a convergence requirement, the measure is simply the
//!   requested percentile (nearest rank) of the data.
//! - Runs shorter than 20 samples yield no measure regardless of the
//!   requirement, with a diagnostic saying so.
//! - A constant run short-circuits to a converged measure; there is
//!   nothing left to drift.
//!
//! Invariants & assumptions
//! ------------------------
//! - NaN ordinates mean "undefined sample" and are dropped pair-wise
//!   before anything else, mirroring the trend estimator.
//! - `measure` is `Some` iff `converged` (and the data was non-empty).
//!
//! Downstream usage
//! ----------------
//! - Per-run measures produced here are the inputs to
//!   [`VariabilityOutcome::assess`](crate::thompson::VariabilityOutcome::assess)
//!   across runs.
//!
//! Testing notes
//! -------------
//! - The trace construction is pinned on a 10-sample run where every
//!   prefix median is computable by hand; convergence gating is covered
//!   with constant, drifting, and too-short runs.

use rand::Rng;

#[cfg(feature = "python-bindings")]
use pyo3::PyErr;

use crate::thompson::errors::ThompsonError;
use crate::thompson::validation::validate_percentile;
use crate::trend::{Bounds, ConvergenceOutcome, TrendError};
use crate::utils::{percentile_of, Interpolation};

/// Maximum number of chunks the prefix trace is built over.
const MAX_CHUNKS: usize = 200;
/// Minimum run length for a convergence assessment.
const MIN_SAMPLES_FOR_CONVERGENCE: usize = 20;

pub type MetricResult<T> = Result<T, MetricError>;

/// MetricError — either half of the toolbox can reject a metric request.
///
/// Variants
/// --------
/// - `Trend(err)`
///   The convergence test rejected its inputs.
/// - `Thompson(err)`
///   The percentile parameter is invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricError {
    Trend(TrendError),
    Thompson(ThompsonError),
}

impl std::error::Error for MetricError {}

impl std::fmt::Display for MetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricError::Trend(err) => write!(f, "{err}"),
            MetricError::Thompson(err) => write!(f, "{err}"),
        }
    }
}

impl From<TrendError> for MetricError {
    fn from(err: TrendError) -> Self {
        MetricError::Trend(err)
    }
}

impl From<ThompsonError> for MetricError {
    fn from(err: ThompsonError) -> Self {
        MetricError::Thompson(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<MetricError> for PyErr {
    fn from(err: MetricError) -> PyErr {
        match err {
            MetricError::Trend(inner) => inner.into(),
            MetricError::Thompson(inner) => inner.into(),
        }
    }
}

/// MetricTrace — the running percentile of a run, sampled over prefixes.
///
/// Fields
/// ------
/// - `x`: `Vec<f64>`
///   Abscissa of each trace sample: the position of its prefix end.
/// - `y`: `Vec<f64>`
///   The percentile over that prefix (midpoint interpolation).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl MetricTrace {
    /// Build the prefix-percentile trace of a run.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&[f64]`
    ///   Sample positions (time or index), same length as `y`.
    /// - `y`: `&[f64]`
    ///   Sample values, NaN-free (callers filter first).
    /// - `percentile`: `f64`
    ///   Percentile tracked over the prefixes.
    ///
    /// Notes
    /// -----
    /// - The run is cut into `min(200, len)` chunks and the trace covers
    ///   prefixes ending in the second half of them, so early transient
    ///   behavior does not dominate the trend.
    pub fn prefix_percentiles(x: &[f64], y: &[f64], percentile: f64) -> Self {
        let len = y.len();
        let nb_chunks = MAX_CHUNKS.min(len);
        let half = nb_chunks / 2;

        let mut trace_x = Vec::with_capacity(half);
        let mut trace_y = Vec::with_capacity(half);
        for c in 0..half {
            let prefix_len = (half + c) * len / nb_chunks;
            if let Some(value) = percentile_of(&y[..prefix_len], percentile, Interpolation::Midpoint)
            {
                trace_x.push(x[(2 * c + 1) * len / nb_chunks]);
                trace_y.push(value);
            }
        }
        MetricTrace { x: trace_x, y: trace_y }
    }
}

/// MetricConvergence — convergence requirement for a metric measure.
///
/// Fields
/// ------
/// - `confidence`: `f64`
///   Confidence of the slope CI on the prefix trace (default 95).
/// - `tolerance`: `f64`
///   Tolerance band half-width, percent of the normalized range
///   (default 1).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MetricConvergence {
    pub confidence: f64,
    pub tolerance: f64,
}

impl Default for MetricConvergence {
    fn default() -> Self {
        MetricConvergence { confidence: 95.0, tolerance: 1.0 }
    }
}

/// MetricOutcome — a run's metric measure and the evidence behind it.
///
/// Invariants
/// ----------
/// - `measure` is `Some` iff `converged`.
#[derive(Debug, Clone)]
pub struct MetricOutcome {
    converged: bool,
    measure: Option<f64>,
    diagnostics: Vec<String>,
}

impl MetricOutcome {
    /// Assess a run and compute its metric measure.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&[f64]`
    ///   Sample positions (time or index), same length as `y`.
    /// - `y`: `&[f64]`
    ///   Sample values; NaN drops the pair.
    /// - `percentile`: `f64`
    ///   Percentile defining the metric, strictly between 0 and 100.
    /// - `bounds`: `Option<&Bounds>`
    ///   Expected value range for the convergence normalization; inferred
    ///   from the data when `None`.
    /// - `convergence`: `Option<&MetricConvergence>`
    ///   Convergence requirement; `None` takes the percentile directly.
    /// - `rng`: `&mut R`
    ///   Randomness source for pairwise-slope subsampling.
    ///
    /// Returns
    /// -------
    /// `MetricResult<MetricOutcome>`
    ///   The measure when the run converged (or no requirement was set),
    ///   otherwise `None` with diagnostics.
    ///
    /// Errors
    /// ------
    /// - `MetricError::Thompson` for an invalid percentile.
    /// - `MetricError::Trend` when the convergence test rejects its
    ///   inputs (length mismatch, bad bounds, non-finite positions).
    pub fn assess<R: Rng + ?Sized>(
        x: &[f64],
        y: &[f64],
        percentile: f64,
        bounds: Option<&Bounds>,
        convergence: Option<&MetricConvergence>,
        rng: &mut R,
    ) -> MetricResult<Self> {
        validate_percentile(percentile)?;
        if x.len() != y.len() {
            return Err(TrendError::LengthMismatch { x: x.len(), y: y.len() }.into());
        }

        let mut diagnostics = Vec::new();

        let mut kept_x = Vec::with_capacity(x.len());
        let mut kept_y = Vec::with_capacity(y.len());
        for (&xv, &yv) in x.iter().zip(y) {
            if !yv.is_nan() {
                kept_x.push(xv);
                kept_y.push(yv);
            }
        }
        let dropped = y.len() - kept_y.len();
        if dropped > 0 {
            diagnostics.push(format!("Dropped {dropped} undefined (NaN) samples."));
        }
        if kept_y.is_empty() {
            diagnostics.push("No defined samples; no measure exists.".to_string());
            return Ok(MetricOutcome { converged: false, measure: None, diagnostics });
        }

        if kept_y.len() < MIN_SAMPLES_FOR_CONVERGENCE {
            diagnostics.push(format!(
                "Only {} samples; a metric measure requires at least \
                 {MIN_SAMPLES_FOR_CONVERGENCE}.",
                kept_y.len()
            ));
            return Ok(MetricOutcome { converged: false, measure: None, diagnostics });
        }

        let requirement = match convergence {
            Some(requirement) => requirement,
            None => {
                let measure = percentile_of(&kept_y, percentile, Interpolation::Nearest);
                return Ok(MetricOutcome { converged: true, measure, diagnostics });
            }
        };

        if kept_y.iter().all(|&v| v == kept_y[0]) {
            diagnostics.push(
                "All samples are equal; the running percentile cannot drift.".to_string(),
            );
            return Ok(MetricOutcome {
                converged: true,
                measure: Some(kept_y[0]),
                diagnostics,
            });
        }

        let trace = MetricTrace::prefix_percentiles(&kept_x, &kept_y, percentile);
        let y_bounds = match bounds {
            Some(bounds) => *bounds,
            None => Bounds::from_data(&kept_y)?,
        };
        let verdict = ConvergenceOutcome::test(
            &trace.x,
            &trace.y,
            &y_bounds,
            requirement.confidence,
            requirement.tolerance,
            rng,
        )?;
        diagnostics.extend(verdict.diagnostics().iter().cloned());

        let measure = if verdict.converged() {
            percentile_of(&trace.y, 50.0, Interpolation::Nearest)
        } else {
            diagnostics
                .push("The running percentile has not converged; no measure is reported.".to_string());
            None
        };
        Ok(MetricOutcome { converged: verdict.converged(), measure, diagnostics })
    }

    /// Whether the running percentile converged (vacuously true when no
    /// requirement was set).
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// The metric measure, `None` when convergence was required and not
    /// reached.
    pub fn measure(&self) -> Option<f64> {
        self.measure
    }

    /// Narrated decision trail.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}
