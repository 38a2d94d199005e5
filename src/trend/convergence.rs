//! trend::convergence — tolerance verdict over a normalized trend.
//!
//! Purpose
//! -------
//! Decide whether a measurement series has converged: after mapping both
//! coordinates onto [-1, 1], the entire confidence interval of the
//! Theil–Sen slope must lie inside a symmetric ±tolerance band around
//! zero. A drifting series has a CI that escapes the band on at least one
//! side.
//!
//! Key behaviors
//! -------------
//! - Express tolerance as a percentage of the normalized range; ±1 % means
//!   the slope CI must stay within [-0.01, 0.01].
//! - Declare NOT converged exactly when the normalized lower slope bound
//!   falls below -tolerance or the upper bound rises above +tolerance.
//! - Carry the rescaled trend lines and tolerance band so a verdict can be
//!   plotted, and narrate the decision in the diagnostics trail instead of
//!   printing anything.
//!
//! Invariants & assumptions
//! ------------------------
//! - The tolerance percentage is taken in absolute value; its sign carries
//!   no meaning.
//! - The verdict is about the SLOPE only; a series may converge while
//!   sitting anywhere inside the bounds.
//!
//! Downstream usage
//! ----------------
//! - [`metrics`](crate::metrics) runs this test on prefix-percentile
//!   traces before trusting a long-run measure;
//!   [`screening`](crate::screening) uses a deliberately lax variant
//!   (50 % confidence, 10 % tolerance) as a coarse stationarity check.
//!
//! Testing notes
//! -------------
//! - Unit tests pin a flat series (converged), a full-range ramp (not
//!   converged at 1 %), and the tolerance-band coordinates on the golden
//!   perturbed ramp.

use rand::Rng;

use crate::trend::errors::TrendResult;
use crate::trend::estimator::{
    Bounds, ToleranceCoordinates, TrendCoordinates, TrendOptions, TrendOutcome,
};

/// ConvergenceOutcome — verdict and evidence of a convergence test.
///
/// Purpose
/// -------
/// Hold the boolean verdict together with the normalized slope estimate,
/// its confidence interval, the rescaled trend and tolerance-band
/// coordinates, and the narrated decision trail.
///
/// Invariants
/// ----------
/// - `converged == true` iff `slope_ci` lies inside `[-tol, tol]` for the
///   normalized tolerance `tol` the test was run with.
/// - `slope` and `slope_ci` are in normalized units; `trend` and
///   `tolerance` are in raw units.
#[derive(Debug, Clone)]
pub struct ConvergenceOutcome {
    converged: bool,
    slope: f64,
    slope_ci: (f64, f64),
    trend: TrendCoordinates,
    tolerance: ToleranceCoordinates,
    diagnostics: Vec<String>,
}

impl ConvergenceOutcome {
    /// Run the convergence test on a bounded series.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&[f64]`
    ///   Abscissa values; finite, same length as `y`.
    /// - `y`: `&[f64]`
    ///   Ordinate values; NaN drops the pair, ±∞ is rejected.
    /// - `y_bounds`: `&Bounds`
    ///   Expected ordinate range used for normalization.
    /// - `confidence`: `f64`
    ///   Confidence level for the slope CI, strictly between 0 and 100.
    /// - `tolerance_pct`: `f64`
    ///   Band half-width as a percentage of the normalized range; the
    ///   absolute value is used.
    /// - `rng`: `&mut R`
    ///   Randomness source for pairwise-slope subsampling.
    ///
    /// Returns
    /// -------
    /// `TrendResult<ConvergenceOutcome>`
    ///   The verdict plus the normalized fit and plottable coordinates.
    ///
    /// Errors
    /// ------
    /// - Any error of
    ///   [`TrendOutcome::estimate`](crate::trend::estimator::TrendOutcome::estimate).
    pub fn test<R: Rng + ?Sized>(
        x: &[f64],
        y: &[f64],
        y_bounds: &Bounds,
        confidence: f64,
        tolerance_pct: f64,
        rng: &mut R,
    ) -> TrendResult<Self> {
        let tolerance = (tolerance_pct / 100.0).abs();
        let options = TrendOptions { y_bounds: Some(*y_bounds), ..TrendOptions::default() };

        let outcome = TrendOutcome::estimate(x, y, confidence, &options, rng)?;
        let fit = *outcome.normalized();

        let converged = !(fit.lower_slope < -tolerance || fit.upper_slope > tolerance);

        let mut diagnostics = outcome.diagnostics().to_vec();
        diagnostics.push(format!(
            "Convergence test at {confidence}% confidence with a ±{}% tolerance band.",
            tolerance_pct.abs()
        ));
        diagnostics.push(format!(
            "Normalized slope {:.6} with CI [{:.6}, {:.6}].",
            fit.slope, fit.lower_slope, fit.upper_slope
        ));
        diagnostics.push(if converged {
            format!("The slope CI lies within ±{tolerance:.6}: the series has converged.")
        } else {
            format!("The slope CI escapes ±{tolerance:.6}: the series has NOT converged.")
        });

        Ok(ConvergenceOutcome {
            converged,
            slope: fit.slope,
            slope_ci: (fit.lower_slope, fit.upper_slope),
            trend: *outcome.trend(),
            tolerance: ToleranceCoordinates::from_normalized(fit.intercept, tolerance, y_bounds),
            diagnostics,
        })
    }

    /// Whether the slope CI stayed inside the tolerance band.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Median slope in normalized units.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// (lower, upper) confidence bounds on the normalized slope.
    pub fn slope_ci(&self) -> (f64, f64) {
        self.slope_ci
    }

    /// Raw-unit endpoint coordinates of the fitted trend lines.
    pub fn trend(&self) -> &TrendCoordinates {
        &self.trend
    }

    /// Raw-unit coordinates of the tolerance band.
    pub fn tolerance(&self) -> &ToleranceCoordinates {
        &self.tolerance
    }

    /// Narrated decision trail.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}
