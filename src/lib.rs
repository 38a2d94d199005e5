//! rust_replicates — statistical inference over repeated measurements,
//! with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the analysis routines to Python via the `_rust_replicates`
//! extension module. The crate turns repeated measurements into defensible
//! statements: how many runs an experiment needs, whether a series is fit
//! for percentile estimation, what a run's long-run measure is, and how
//! repeatable the whole experiment turned out to be.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`trend`, `thompson`, `independence`,
//!   `screening`, `metrics`, `utils`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for
//!   the `_rust_replicates` Python extension.
//! - Create and register Python submodules (`design`, `analysis`) under
//!   `rust_replicates` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   this file performs only FFI glue, input validation, and error
//!   mapping.
//! - When `python-bindings` is enabled, the Python-visible types mirror
//!   the invariants and signatures of their Rust counterparts.
//! - Randomized steps (pairwise-slope subsampling) take an explicit seed
//!   at the Python boundary, so Python callers get reproducible results by
//!   default.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_replicates.<submodule>` and
//!   are typically wrapped by thin pure-Python facades in the top-level
//!   `rust_replicates` package.
//! - Percentiles and confidences are percentages in (0, 100) exclusive
//!   everywhere; CI classes are always explicit strings ("one-sided" or
//!   "two-sided").
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules
//!   and can ignore the PyO3 items guarded by the `python-bindings`
//!   feature.
//! - The Python packaging layer imports the `_rust_replicates` module
//!   defined here and wraps its classes in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules
//!   and by the crate's integration tests; smoke tests for the PyO3
//!   bindings verify construction and round-tripping from Python.

pub mod independence;
pub mod metrics;
pub mod screening;
pub mod thompson;
pub mod trend;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::{rngs::StdRng, SeedableRng};

#[cfg(feature = "python-bindings")]
use crate::{
    metrics::{MetricConvergence, MetricOutcome},
    screening::ScreeningOutcome,
    thompson::{CiClass, SampleSize, ThompsonCi, VariabilityOutcome},
    trend::{Bounds, ConvergenceOutcome},
    utils::extract_f64_array,
};

#[cfg(feature = "python-bindings")]
fn extract_series<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr: PyReadonlyArray1<f64> = extract_f64_array(py, raw)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!(
            "{name} must be a 1-D contiguous float64 array or sequence"
        ))
    })?;
    Ok(slice.to_vec())
}

/// ExperimentSizing — Python-facing wrapper for minimum sample counts.
///
/// Purpose
/// -------
/// Answer the design-phase sizing question from Python and forward all
/// computation to [`SampleSize::minimum`].
///
/// Parameters
/// ----------
/// Constructed from Python via `ExperimentSizing(percentile, confidence,
/// robustness=0)`:
/// - `percentile`: `f64`
///   Percentile of interest, strictly between 0 and 100.
/// - `confidence`: `f64`
///   Required confidence level, strictly between 0 and 100.
/// - `robustness`: `Option<usize>`
///   Number of most-extreme samples that must not serve as the CI bound;
///   defaults to 0.
///
/// Notes
/// -----
/// - Native Rust code should prefer calling [`SampleSize::minimum`]
///   directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_replicates.design")]
pub struct ExperimentSizing {
    inner: SampleSize,
    percentile: f64,
    confidence: f64,
    robustness: usize,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ExperimentSizing {
    #[new]
    #[pyo3(
        text_signature = "(percentile, confidence, /, robustness=0)",
        signature = (percentile, confidence, robustness = None)
    )]
    pub fn new(
        percentile: f64, confidence: f64, robustness: Option<usize>,
    ) -> PyResult<ExperimentSizing> {
        let robustness = robustness.unwrap_or(0);
        let inner = SampleSize::minimum(percentile, confidence, robustness)?;
        Ok(ExperimentSizing { inner, percentile, confidence, robustness })
    }

    /// Minimum samples for a one-sided CI on the percentile.
    #[getter]
    pub fn one_sided(&self) -> usize {
        self.inner.one_sided
    }

    /// Minimum samples for a two-sided CI on the percentile.
    #[getter]
    pub fn two_sided(&self) -> usize {
        self.inner.two_sided
    }

    /// Human-readable report of the counts and what they guarantee.
    pub fn describe(&self) -> PyResult<String> {
        Ok(SampleSize::describe(self.percentile, self.confidence, self.robustness)?)
    }
}

/// PercentileCi — Python-facing wrapper for the rank-based percentile CI.
///
/// Purpose
/// -------
/// Compute Thompson rank bounds on a percentile of a sample and expose
/// both the ranks and the sample values at them.
///
/// Parameters
/// ----------
/// Constructed from Python via `PercentileCi(data, percentile, confidence,
/// ci_class)`:
/// - `data`: array-like of `f64`
///   The samples; sorted internally, NaNs rejected.
/// - `percentile`, `confidence`: `f64`
///   Both strictly between 0 and 100.
/// - `ci_class`: `str`
///   "one-sided" or "two-sided". Always explicit; there is no default.
///
/// Notes
/// -----
/// - `lower`/`upper` are `None` when the sample is too small to carry the
///   requested confidence; `diagnostics` then names the required count.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_replicates.analysis")]
pub struct PercentileCi {
    inner: ThompsonCi,
    sorted: Vec<f64>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PercentileCi {
    #[new]
    #[pyo3(
        text_signature = "(data, percentile, confidence, ci_class, /)",
        signature = (raw_data, percentile, confidence, ci_class)
    )]
    pub fn new<'py>(
        py: Python<'py>, raw_data: &Bound<'py, PyAny>, percentile: f64, confidence: f64,
        ci_class: &str,
    ) -> PyResult<PercentileCi> {
        let data = extract_series(py, raw_data, "data")?;
        if data.iter().any(|v| v.is_nan()) {
            return Err(PyValueError::new_err("data must not contain NaN values"));
        }
        let class: CiClass = ci_class.parse().map_err(PyErr::from)?;
        let inner = ThompsonCi::for_percentile(data.len(), percentile, confidence, class)?;

        let mut sorted = data;
        sorted.sort_by(f64::total_cmp);
        Ok(PercentileCi { inner, sorted })
    }

    /// Lower rank bound (index into the sorted sample), if one exists.
    #[getter]
    pub fn lower(&self) -> Option<usize> {
        self.inner.lower()
    }

    /// Upper rank bound (index into the sorted sample), if one exists.
    #[getter]
    pub fn upper(&self) -> Option<usize> {
        self.inner.upper()
    }

    /// Sample value at the lower rank bound.
    #[getter]
    pub fn lower_value(&self) -> Option<f64> {
        self.inner.lower().map(|rank| self.sorted[rank])
    }

    /// Sample value at the upper rank bound.
    #[getter]
    pub fn upper_value(&self) -> Option<f64> {
        self.inner.upper().map(|rank| self.sorted[rank])
    }

    /// Insufficiency notes accumulated during computation.
    #[getter]
    pub fn diagnostics(&self) -> Vec<String> {
        self.inner.diagnostics().to_vec()
    }
}

/// ConvergenceTest — Python-facing wrapper for the trend convergence test.
///
/// Purpose
/// -------
/// Run the normalized Theil–Sen convergence test from Python with a fully
/// reproducible, seeded subsampling step.
///
/// Parameters
/// ----------
/// Constructed from Python via `ConvergenceTest(x, y, lower_bound,
/// upper_bound, confidence=95, tolerance=1, seed=0)`:
/// - `x`, `y`: array-likes of `f64`
///   The series; NaN in `y` marks an undefined sample.
/// - `lower_bound`, `upper_bound`: `f64`
///   Expected range of `y` used for normalization; must satisfy
///   `lower_bound < upper_bound`.
/// - `confidence`: `Option<f64>`
///   Slope-CI confidence, default 95.
/// - `tolerance`: `Option<f64>`
///   Tolerance band half-width in percent, default 1.
/// - `seed`: `Option<u64>`
///   Seed of the subsampling RNG, default 0. Results are deterministic
///   for a fixed seed.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_replicates.analysis")]
pub struct ConvergenceTest {
    inner: ConvergenceOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ConvergenceTest {
    #[new]
    #[pyo3(
        text_signature = "(x, y, lower_bound, upper_bound, /, confidence=95.0, tolerance=1.0, \
                          seed=0)",
        signature = (x, y, lower_bound, upper_bound, confidence = None, tolerance = None, seed = None)
    )]
    pub fn new<'py>(
        py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, lower_bound: f64,
        upper_bound: f64, confidence: Option<f64>, tolerance: Option<f64>, seed: Option<u64>,
    ) -> PyResult<ConvergenceTest> {
        let x = extract_series(py, x, "x")?;
        let y = extract_series(py, y, "y")?;
        let bounds = Bounds::new(lower_bound, upper_bound)?;
        let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));
        let inner = ConvergenceOutcome::test(
            &x,
            &y,
            &bounds,
            confidence.unwrap_or(95.0),
            tolerance.unwrap_or(1.0),
            &mut rng,
        )?;
        Ok(ConvergenceTest { inner })
    }

    /// Whether the slope CI stayed inside the tolerance band.
    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    /// Median slope in normalized units.
    #[getter]
    pub fn slope(&self) -> f64 {
        self.inner.slope()
    }

    /// (lower, upper) confidence bounds on the normalized slope.
    #[getter]
    pub fn slope_ci(&self) -> (f64, f64) {
        self.inner.slope_ci()
    }

    /// Trend line endpoints in raw units:
    /// [median_start, median_end, lower_start, lower_end, upper_start,
    /// upper_end].
    #[getter]
    pub fn trend_coordinates(&self) -> Vec<f64> {
        let trend = self.inner.trend();
        vec![
            trend.median_start,
            trend.median_end,
            trend.lower_start,
            trend.lower_end,
            trend.upper_start,
            trend.upper_end,
        ]
    }

    /// Tolerance band endpoints in raw units:
    /// [upper_start, lower_start, lower_end, upper_end].
    #[getter]
    pub fn tolerance_coordinates(&self) -> Vec<f64> {
        let band = self.inner.tolerance();
        vec![band.upper_start, band.lower_start, band.lower_end, band.upper_end]
    }

    /// Narrated decision trail.
    #[getter]
    pub fn diagnostics(&self) -> Vec<String> {
        self.inner.diagnostics().to_vec()
    }
}

/// Variability — Python-facing wrapper for the repeatability score.
///
/// Purpose
/// -------
/// Score the repeatability of a set of per-run measures via the two-sided
/// median CI, forwarding to [`VariabilityOutcome::assess`].
///
/// Parameters
/// ----------
/// Constructed from Python via `Variability(measures, confidence)`:
/// - `measures`: array-like of `f64`
///   One measure per experiment repetition; NaNs rejected.
/// - `confidence`: `f64`
///   Confidence of the median CI, strictly between 0 and 100.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_replicates.analysis")]
pub struct Variability {
    inner: VariabilityOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Variability {
    #[new]
    #[pyo3(
        text_signature = "(measures, confidence, /)",
        signature = (raw_measures, confidence)
    )]
    pub fn new<'py>(
        py: Python<'py>, raw_measures: &Bound<'py, PyAny>, confidence: f64,
    ) -> PyResult<Variability> {
        let measures = extract_series(py, raw_measures, "measures")?;
        if measures.iter().any(|v| v.is_nan()) {
            return Err(PyValueError::new_err("measures must not contain NaN values"));
        }
        let inner = VariabilityOutcome::assess(&measures, confidence)?;
        Ok(Variability { inner })
    }

    /// Measure values at the CI bounds, when a score exists.
    #[getter]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.inner.score().map(|s| (s.lower_value, s.upper_value))
    }

    /// Absolute variability score (CI width).
    #[getter]
    pub fn absolute(&self) -> Option<f64> {
        self.inner.score().map(|s| s.absolute)
    }

    /// Relative variability score (width over midpoint), when defined.
    #[getter]
    pub fn relative(&self) -> Option<f64> {
        self.inner.score().and_then(|s| s.relative)
    }

    /// Insufficiency and edge-case notes.
    #[getter]
    pub fn diagnostics(&self) -> Vec<String> {
        self.inner.diagnostics().to_vec()
    }
}

/// MetricMeasure — Python-facing wrapper for per-run metric measures.
///
/// Purpose
/// -------
/// Reduce one run's raw measurements to its long-run percentile measure,
/// gated on convergence of the running percentile, forwarding to
/// [`MetricOutcome::assess`].
///
/// Parameters
/// ----------
/// Constructed from Python via `MetricMeasure(x, y, percentile,
/// lower_bound=None, upper_bound=None, confidence=95, tolerance=1,
/// require_convergence=True, seed=0)`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_replicates.analysis")]
pub struct MetricMeasure {
    inner: MetricOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MetricMeasure {
    #[new]
    #[pyo3(
        text_signature = "(x, y, percentile, /, lower_bound=None, upper_bound=None, \
                          confidence=95.0, tolerance=1.0, require_convergence=True, seed=0)",
        signature = (
            x,
            y,
            percentile,
            lower_bound = None,
            upper_bound = None,
            confidence = None,
            tolerance = None,
            require_convergence = None,
            seed = None,
        )
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, percentile: f64,
        lower_bound: Option<f64>, upper_bound: Option<f64>, confidence: Option<f64>,
        tolerance: Option<f64>, require_convergence: Option<bool>, seed: Option<u64>,
    ) -> PyResult<MetricMeasure> {
        let x = extract_series(py, x, "x")?;
        let y = extract_series(py, y, "y")?;
        let bounds = match (lower_bound, upper_bound) {
            (Some(lower), Some(upper)) => Some(Bounds::new(lower, upper)?),
            (None, None) => None,
            _ => {
                return Err(PyValueError::new_err(
                    "lower_bound and upper_bound must be provided together",
                ));
            }
        };
        let requirement = if require_convergence.unwrap_or(true) {
            Some(MetricConvergence {
                confidence: confidence.unwrap_or(95.0),
                tolerance: tolerance.unwrap_or(1.0),
            })
        } else {
            None
        };
        let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));
        let inner = MetricOutcome::assess(
            &x,
            &y,
            percentile,
            bounds.as_ref(),
            requirement.as_ref(),
            &mut rng,
        )?;
        Ok(MetricMeasure { inner })
    }

    /// Whether the running percentile converged.
    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    /// The metric measure, `None` when convergence was required and not
    /// reached.
    #[getter]
    pub fn measure(&self) -> Option<f64> {
        self.inner.measure()
    }

    /// Narrated decision trail.
    #[getter]
    pub fn diagnostics(&self) -> Vec<String> {
        self.inner.diagnostics().to_vec()
    }
}

/// DataScreening — Python-facing wrapper for the pre-analysis screen.
///
/// Purpose
/// -------
/// Check a series for drift and serial correlation before percentile
/// estimation, forwarding to [`ScreeningOutcome::screen`].
///
/// Parameters
/// ----------
/// Constructed from Python via `DataScreening(data, lower_bound,
/// upper_bound, seed=0)`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_replicates.analysis")]
pub struct DataScreening {
    inner: ScreeningOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl DataScreening {
    #[new]
    #[pyo3(
        text_signature = "(data, lower_bound, upper_bound, /, seed=0)",
        signature = (raw_data, lower_bound, upper_bound, seed = None)
    )]
    pub fn new<'py>(
        py: Python<'py>, raw_data: &Bound<'py, PyAny>, lower_bound: f64, upper_bound: f64,
        seed: Option<u64>,
    ) -> PyResult<DataScreening> {
        let data = extract_series(py, raw_data, "data")?;
        let bounds = Bounds::new(lower_bound, upper_bound)?;
        let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));
        let inner = ScreeningOutcome::screen(&data, &bounds, &mut rng)?;
        Ok(DataScreening { inner })
    }

    /// Overall verdict: the series may feed percentile estimation.
    #[getter]
    pub fn stationary(&self) -> bool {
        self.inner.stationary()
    }

    /// Whether the series was perfectly constant.
    #[getter]
    pub fn constant(&self) -> bool {
        self.inner.constant()
    }

    /// Whether the lax convergence check passed.
    #[getter]
    pub fn weakly_stationary(&self) -> bool {
        self.inner.weakly_stationary()
    }

    /// Whether the autocorrelation test passed.
    #[getter]
    pub fn iid(&self) -> bool {
        self.inner.iid()
    }

    /// Narrated verdicts and evidence.
    #[getter]
    pub fn diagnostics(&self) -> Vec<String> {
        self.inner.diagnostics().to_vec()
    }
}

/// _rust_replicates — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_replicates` Python module and register its
/// submodules used by the public `rust_replicates` package.
///
/// Key behaviors
/// -------------
/// - Create `design` and `analysis` submodules.
/// - Attach those submodules to the parent `_rust_replicates` module.
/// - Register the submodules in `sys.modules` so they are importable via
///   dotted paths from Python.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_replicates<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let design_mod = PyModule::new(_py, "design")?;
    let analysis_mod = PyModule::new(_py, "analysis")?;
    design(_py, m, &design_mod)?;
    analysis(_py, m, &analysis_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_replicates.design", design_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_replicates.analysis", analysis_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn design<'py>(
    _py: Python, rust_replicates: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<ExperimentSizing>()?;
    rust_replicates.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn analysis<'py>(
    _py: Python, rust_replicates: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PercentileCi>()?;
    m.add_class::<ConvergenceTest>()?;
    m.add_class::<Variability>()?;
    m.add_class::<MetricMeasure>()?;
    m.add_class::<DataScreening>()?;
    rust_replicates.add_submodule(m)?;
    Ok(())
}
