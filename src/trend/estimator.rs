//! trend::estimator — normalized trend estimation over bounded series.
//!
//! Purpose
//! -------
//! Turn a raw measurement series into a scale-free trend description: both
//! coordinates are mapped onto [-1, 1] using expected-range bounds, the
//! Theil–Sen fit runs in normalized space, and the resulting median and
//! confidence lines are mapped back to raw units as plottable endpoint
//! coordinates.
//!
//! Key behaviors
//! -------------
//! - Drop (x, y) pairs whose ordinate is NaN before anything else; NaN is
//!   the convention for "this sample is undefined".
//! - Take normalization bounds from the caller when provided, otherwise
//!   from the data, and always BEFORE subsampling so the mapping does not
//!   depend on which points were drawn.
//! - Subsample to ⌊√max_pairs⌋ points when the full pairwise-slope count
//!   n² − n would exceed `max_pairs`, drawing indices from a caller-owned
//!   RNG so results are reproducible under a fixed seed.
//! - Report every data-shaping decision (dropped pairs, subsampling) as a
//!   diagnostic string on the outcome.
//!
//! Invariants & assumptions
//! ------------------------
//! - Normalization maps `lower` to -1 and `upper` to +1; rescaling is its
//!   exact inverse. Values outside the bounds are mapped proportionally
//!   outside [-1, 1], never clamped.
//! - The normalized abscissa endpoints are -1 and +1, so a line with
//!   intercept b and slope m starts at b − m and ends at b + m.
//! - `max_pairs` must be large enough that ⌊√max_pairs⌋ ≥ 2; the default
//!   of 10 000 keeps at most 100 points.
//!
//! Conventions
//! -----------
//! - The RNG is threaded explicitly (`R: Rng + ?Sized`); this module never
//!   reaches for ambient randomness. When no subsampling is needed the RNG
//!   is never drawn from.
//!
//! Downstream usage
//! ----------------
//! - [`convergence`](crate::trend::convergence) wraps [`TrendOutcome::estimate`]
//!   with a tolerance verdict; [`metrics`](crate::metrics) feeds it
//!   prefix-percentile traces.
//!
//! Testing notes
//! -------------
//! - Unit tests pin a golden perturbed ramp (normalized fit, trend and
//!   tolerance coordinates), a flat series, NaN filtering, bounds
//!   inference, and subsampling on perfectly collinear data (where the
//!   fitted slope is exact regardless of which points are drawn).

use ndarray::Array1;
use rand::Rng;

use crate::trend::errors::{TrendError, TrendResult};
use crate::trend::theil_sen::TheilSenFit;
use crate::trend::validation::validate_series;

/// Default cap on the number of pairwise slopes the fit may form.
pub const DEFAULT_MAX_PAIRS: usize = 10_000;

/// Bounds — a validated normalization range.
///
/// Purpose
/// -------
/// Carry the `[lower, upper]` range used to map values onto [-1, 1],
/// with the `lower < upper` invariant enforced at construction so the
/// mapping can never divide by zero.
///
/// Invariants
/// ----------
/// - `lower < upper`, both finite.
/// - `normalize` and `rescale` are exact inverses of each other.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    lower: f64,
    upper: f64,
}

impl Bounds {
    /// Build bounds from explicit endpoints.
    ///
    /// Errors
    /// ------
    /// - `TrendError::DegenerateBounds` when `lower >= upper` or either
    ///   endpoint is non-finite.
    pub fn new(lower: f64, upper: f64) -> TrendResult<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(TrendError::DegenerateBounds { lower, upper });
        }
        Ok(Bounds { lower, upper })
    }

    /// Infer bounds from the extrema of a data slice.
    ///
    /// Errors
    /// ------
    /// - `TrendError::DegenerateBounds` when the data is empty or constant,
    ///   so min == max and no range exists.
    pub fn from_data(values: &[f64]) -> TrendResult<Self> {
        let mut lower = f64::INFINITY;
        let mut upper = f64::NEG_INFINITY;
        for &value in values {
            if value < lower {
                lower = value;
            }
            if value > upper {
                upper = value;
            }
        }
        Bounds::new(lower, upper)
    }

    /// Lower endpoint.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper endpoint.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Width of the range, `upper - lower`.
    pub fn scale(&self) -> f64 {
        self.upper - self.lower
    }

    /// Map a raw value onto [-1, 1] (lower ↦ -1, upper ↦ +1).
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        (2.0 * value - (self.lower + self.upper)) / self.scale()
    }

    /// Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn rescale(&self, value: f64) -> f64 {
        (value * self.scale() + self.lower + self.upper) / 2.0
    }
}

/// TrendCoordinates — endpoint coordinates of the fitted trend lines.
///
/// Purpose
/// -------
/// Hold the raw-unit ordinates of the median, lower-confidence, and
/// upper-confidence lines at the first and last abscissa of the series,
/// ready for plotting against the raw x range.
///
/// Fields
/// ------
/// - `median_start` / `median_end`: `f64`
///   Median trend line at the series start and end.
/// - `lower_start` / `lower_end`: `f64`
///   Lower confidence-bound line at the series start and end.
/// - `upper_start` / `upper_end`: `f64`
///   Upper confidence-bound line at the series start and end.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrendCoordinates {
    pub median_start: f64,
    pub median_end: f64,
    pub lower_start: f64,
    pub lower_end: f64,
    pub upper_start: f64,
    pub upper_end: f64,
}

impl TrendCoordinates {
    /// Rescale a normalized fit into raw-unit line endpoints.
    ///
    /// Notes
    /// -----
    /// - In normalized space the series spans x ∈ [-1, 1], so a line with
    ///   intercept b and slope m has endpoints b − m and b + m.
    pub fn from_normalized(fit: &TheilSenFit, y_bounds: &Bounds) -> Self {
        TrendCoordinates {
            median_start: y_bounds.rescale(fit.intercept - fit.slope),
            median_end: y_bounds.rescale(fit.intercept + fit.slope),
            lower_start: y_bounds.rescale(fit.intercept - fit.lower_slope),
            lower_end: y_bounds.rescale(fit.intercept + fit.lower_slope),
            upper_start: y_bounds.rescale(fit.intercept - fit.upper_slope),
            upper_end: y_bounds.rescale(fit.intercept + fit.upper_slope),
        }
    }
}

/// ToleranceCoordinates — endpoint coordinates of the tolerance band.
///
/// Purpose
/// -------
/// Hold the raw-unit ordinates of the two horizontal lines at
/// intercept ± tolerance (in normalized space), marking the band a
/// converged series must keep its slope CI inside.
///
/// Fields
/// ------
/// - `lower_start` / `lower_end`: `f64`
///   Band floor (intercept − tolerance, rescaled) at start and end.
/// - `upper_start` / `upper_end`: `f64`
///   Band ceiling (intercept + tolerance, rescaled) at start and end.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ToleranceCoordinates {
    pub lower_start: f64,
    pub lower_end: f64,
    pub upper_start: f64,
    pub upper_end: f64,
}

impl ToleranceCoordinates {
    /// Rescale a normalized intercept ± tolerance band into raw units.
    pub fn from_normalized(intercept: f64, tolerance: f64, y_bounds: &Bounds) -> Self {
        let floor = y_bounds.rescale(intercept - tolerance);
        let ceiling = y_bounds.rescale(intercept + tolerance);
        ToleranceCoordinates {
            lower_start: floor,
            lower_end: floor,
            upper_start: ceiling,
            upper_end: ceiling,
        }
    }
}

/// TrendOptions — tunables for the normalized estimator.
///
/// Fields
/// ------
/// - `y_bounds`: `Option<Bounds>`
///   Expected ordinate range; inferred from the data when `None`.
/// - `x_bounds`: `Option<Bounds>`
///   Expected abscissa range; inferred from the data when `None`.
/// - `tolerance`: `Option<f64>`
///   Normalized half-width of the tolerance band; when set, the outcome
///   carries the band's raw-unit coordinates.
/// - `max_pairs`: `usize`
///   Cap on the pairwise-slope count before subsampling kicks in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrendOptions {
    pub y_bounds: Option<Bounds>,
    pub x_bounds: Option<Bounds>,
    pub tolerance: Option<f64>,
    pub max_pairs: usize,
}

impl Default for TrendOptions {
    fn default() -> Self {
        TrendOptions {
            y_bounds: None,
            x_bounds: None,
            tolerance: None,
            max_pairs: DEFAULT_MAX_PAIRS,
        }
    }
}

/// TrendOutcome — everything a normalized trend estimation produces.
///
/// Purpose
/// -------
/// Bundle the raw-space and normalized-space fits, the rescaled trend
/// coordinates, the optional tolerance band, and the diagnostics trail of
/// the data shaping that happened along the way.
///
/// Invariants
/// ----------
/// - `normalized` is the fit the trend and tolerance coordinates are
///   derived from; `raw` is fitted on the same (possibly subsampled)
///   points in original units.
/// - `tolerance` is `Some` exactly when the request set
///   [`TrendOptions::tolerance`].
#[derive(Debug, Clone)]
pub struct TrendOutcome {
    raw: TheilSenFit,
    normalized: TheilSenFit,
    trend: TrendCoordinates,
    tolerance: Option<ToleranceCoordinates>,
    diagnostics: Vec<String>,
}

impl TrendOutcome {
    /// Estimate a normalized trend over a bounded series.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&[f64]`
    ///   Abscissa values; finite, same length as `y`.
    /// - `y`: `&[f64]`
    ///   Ordinate values; NaN marks an undefined sample and drops the
    ///   pair, ±∞ is rejected.
    /// - `confidence`: `f64`
    ///   Confidence level for the slope CI, strictly between 0 and 100.
    /// - `options`: `&TrendOptions`
    ///   Bounds, tolerance band, and subsampling cap.
    /// - `rng`: `&mut R`
    ///   Randomness source for subsampling; untouched when the series is
    ///   small enough to fit whole.
    ///
    /// Returns
    /// -------
    /// `TrendResult<TrendOutcome>`
    ///   The raw and normalized fits plus rescaled coordinates.
    ///
    /// Errors
    /// ------
    /// - Validation errors from [`TheilSenFit::fit`].
    /// - `TrendError::NonFiniteOrdinate` when `y` contains ±∞.
    /// - `TrendError::InsufficientData` when fewer than two defined pairs
    ///   remain after NaN filtering.
    /// - `TrendError::DegenerateBounds` when explicit bounds are invalid or
    ///   inferred bounds collapse (empty or constant data).
    pub fn estimate<R: Rng + ?Sized>(
        x: &[f64],
        y: &[f64],
        confidence: f64,
        options: &TrendOptions,
        rng: &mut R,
    ) -> TrendResult<Self> {
        validate_series(x, y, confidence)?;
        for &value in y {
            if value.is_infinite() {
                return Err(TrendError::NonFiniteOrdinate(value));
            }
        }

        let mut diagnostics = Vec::new();

        // Drop undefined samples pair-wise.
        let mut kept_x = Vec::with_capacity(x.len());
        let mut kept_y = Vec::with_capacity(y.len());
        for (&xv, &yv) in x.iter().zip(y) {
            if !yv.is_nan() {
                kept_x.push(xv);
                kept_y.push(yv);
            }
        }
        let dropped = x.len() - kept_x.len();
        if dropped > 0 {
            diagnostics.push(format!("Dropped {dropped} undefined (NaN) samples."));
        }
        if kept_x.len() < 2 {
            return Err(TrendError::InsufficientData(kept_x.len()));
        }

        // Bounds come from the full filtered series, never from a subsample.
        let y_bounds = match options.y_bounds {
            Some(bounds) => bounds,
            None => Bounds::from_data(&kept_y)?,
        };
        let x_bounds = match options.x_bounds {
            Some(bounds) => bounds,
            None => Bounds::from_data(&kept_x)?,
        };

        let n = kept_x.len();
        if n * n - n > options.max_pairs {
            let target = (options.max_pairs as f64).sqrt().floor() as usize;
            let mut indices = rand::seq::index::sample(rng, n, target).into_vec();
            indices.sort_unstable();
            kept_x = indices.iter().map(|&i| kept_x[i]).collect();
            kept_y = indices.iter().map(|&i| kept_y[i]).collect();
            diagnostics.push(format!(
                "Subsampled {n} samples down to {target} to bound the pairwise-slope count at {}.",
                options.max_pairs
            ));
        }

        let norm_x = Array1::from_iter(kept_x.iter().map(|&v| x_bounds.normalize(v))).to_vec();
        let norm_y = Array1::from_iter(kept_y.iter().map(|&v| y_bounds.normalize(v))).to_vec();

        let raw = TheilSenFit::fit(&kept_x, &kept_y, confidence)?;
        let normalized = TheilSenFit::fit(&norm_x, &norm_y, confidence)?;

        let trend = TrendCoordinates::from_normalized(&normalized, &y_bounds);
        let tolerance = options
            .tolerance
            .map(|tol| ToleranceCoordinates::from_normalized(normalized.intercept, tol, &y_bounds));

        Ok(TrendOutcome { raw, normalized, trend, tolerance, diagnostics })
    }

    /// Theil–Sen fit on the (possibly subsampled) raw-unit points.
    pub fn raw(&self) -> &TheilSenFit {
        &self.raw
    }

    /// Theil–Sen fit in normalized [-1, 1] space.
    pub fn normalized(&self) -> &TheilSenFit {
        &self.normalized
    }

    /// Raw-unit endpoint coordinates of the median and CI lines.
    pub fn trend(&self) -> &TrendCoordinates {
        &self.trend
    }

    /// Raw-unit tolerance band, when one was requested.
    pub fn tolerance(&self) -> Option<&ToleranceCoordinates> {
        self.tolerance.as_ref()
    }

    /// Data-shaping notes accumulated during estimation.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Bounds construction, inference, and the normalize/rescale inverse pair.
    // - A golden perturbed ramp: normalized fit, trend coordinates, and the
    //   tolerance band, pinned against reference values.
    // - A flat series (zero slope, degenerate coordinates at the midline).
    // - NaN-pair filtering and the insufficient-data branch.
    // - Subsampling on perfectly collinear data, where the slope is exact
    //   regardless of which points the RNG draws.
    // -------------------------------------------------------------------------

    fn golden_ramp() -> (Vec<f64>, Vec<f64>) {
        const PERTURBATIONS: [f64; 20] = [
            0.11, -0.27, 0.43, -0.08, 0.19, -0.35, 0.02, 0.31, -0.14, 0.25, -0.41, 0.07, 0.38,
            -0.22, 0.16, -0.05, 0.29, -0.33, 0.12, 0.21,
        ];
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..20).map(|i| 1.0 + 0.3 * i as f64 + PERTURBATIONS[i]).collect();
        (x, y)
    }

    #[test]
    // Purpose
    // -------
    // Verify the normalize/rescale pair is an exact inverse and maps the
    // endpoints to ∓1.
    //
    // Given
    // -----
    // - Bounds [2, 10] and a spread of probe values.
    //
    // Expect
    // ------
    // - normalize(2) == -1, normalize(10) == 1, rescale(normalize(v)) == v.
    fn bounds_normalize_and_rescale_are_inverse() {
        // Arrange
        let bounds = Bounds::new(2.0, 10.0).expect("valid bounds");

        // Act & Assert
        assert_eq!(bounds.normalize(2.0), -1.0);
        assert_eq!(bounds.normalize(10.0), 1.0);
        assert_eq!(bounds.normalize(6.0), 0.0);
        for v in [2.0, 3.7, 6.0, 9.99, 12.5, -1.0] {
            assert!((bounds.rescale(bounds.normalize(v)) - v).abs() < 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure degenerate and non-finite bounds are rejected, and inference
    // from constant data fails the same way.
    //
    // Given
    // -----
    // - lower == upper, lower > upper, NaN endpoints, constant data.
    //
    // Expect
    // ------
    // - Every construction returns `Err(TrendError::DegenerateBounds { .. })`.
    fn bounds_degenerate_inputs_are_rejected() {
        // Arrange
        let constant = [4.0_f64; 5];

        // Act & Assert
        for result in [
            Bounds::new(5.0, 5.0),
            Bounds::new(7.0, 3.0),
            Bounds::new(f64::NAN, 1.0),
            Bounds::from_data(&constant),
            Bounds::from_data(&[]),
        ] {
            match result {
                Err(TrendError::DegenerateBounds { .. }) => (),
                other => panic!("expected DegenerateBounds, got {other:?}"),
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Pin the golden-ramp normalized fit and rescaled coordinates at 95 %
    // confidence against reference values.
    //
    // Given
    // -----
    // - The 20-point perturbed ramp, y bounds [0, 8], x bounds [0, 19],
    //   tolerance 0.02.
    //
    // Expect
    // ------
    // - Normalized fit, trend coordinates, and tolerance band all match the
    //   pinned reference numbers.
    fn estimate_golden_ramp_matches_reference_values() {
        // Arrange
        let (x, y) = golden_ramp();
        let options = TrendOptions {
            y_bounds: Some(Bounds::new(0.0, 8.0).expect("valid bounds")),
            x_bounds: Some(Bounds::new(0.0, 19.0).expect("valid bounds")),
            tolerance: Some(0.02),
            ..TrendOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let outcome =
            TrendOutcome::estimate(&x, &y, 95.0, &options, &mut rng).expect("estimate succeeds");

        // Assert
        let norm = outcome.normalized();
        assert!((norm.slope - 0.7197098214285715).abs() < 1e-12, "slope {}", norm.slope);
        assert!(
            (norm.intercept - -0.05750000000000005).abs() < 1e-12,
            "intercept {}",
            norm.intercept
        );
        assert!((norm.lower_slope - 0.6623611111111111).abs() < 1e-12);
        assert!((norm.upper_slope - 0.7758333333333333).abs() < 1e-12);

        let trend = outcome.trend();
        assert!((trend.median_start - 0.8911607142857134).abs() < 1e-12);
        assert!((trend.median_end - 6.648839285714286).abs() < 1e-12);
        assert!((trend.lower_start - 1.1205555555555557).abs() < 1e-12);
        assert!((trend.lower_end - 6.419444444444444).abs() < 1e-12);
        assert!((trend.upper_start - 0.666666666666667).abs() < 1e-12);
        assert!((trend.upper_end - 6.873333333333333).abs() < 1e-12);

        let band = outcome.tolerance().expect("tolerance band requested");
        assert!((band.upper_start - 3.8499999999999996).abs() < 1e-12);
        assert!((band.lower_start - 3.69).abs() < 1e-12);
        assert_eq!(band.lower_start, band.lower_end);
        assert_eq!(band.upper_start, band.upper_end);
    }

    #[test]
    // Purpose
    // -------
    // Verify the raw-space fit carried on the outcome matches a direct fit
    // of the same data.
    //
    // Given
    // -----
    // - The golden ramp with no subsampling in play.
    //
    // Expect
    // ------
    // - `raw()` equals `TheilSenFit::fit` on the input.
    fn estimate_raw_fit_matches_direct_fit() {
        // Arrange
        let (x, y) = golden_ramp();
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let outcome = TrendOutcome::estimate(&x, &y, 95.0, &TrendOptions::default(), &mut rng)
            .expect("estimate succeeds");
        let direct = TheilSenFit::fit(&x, &y, 95.0).expect("fit succeeds");

        // Assert
        assert_eq!(*outcome.raw(), direct);
    }

    #[test]
    // Purpose
    // -------
    // Verify a flat series yields a zero normalized fit and coordinates
    // pinned to the bounds midline.
    //
    // Given
    // -----
    // - 30 samples of the constant 5 with y bounds [0, 10].
    //
    // Expect
    // ------
    // - Normalized slope, intercept, and CI all zero; every trend
    //   coordinate equals 5.
    fn estimate_flat_series_sits_on_midline() {
        // Arrange
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y = vec![5.0_f64; 30];
        let options = TrendOptions {
            y_bounds: Some(Bounds::new(0.0, 10.0).expect("valid bounds")),
            ..TrendOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let outcome =
            TrendOutcome::estimate(&x, &y, 95.0, &options, &mut rng).expect("estimate succeeds");

        // Assert
        let norm = outcome.normalized();
        assert_eq!(norm.slope, 0.0);
        assert_eq!(norm.intercept, 0.0);
        assert_eq!(norm.lower_slope, 0.0);
        assert_eq!(norm.upper_slope, 0.0);
        let trend = outcome.trend();
        for value in [
            trend.median_start,
            trend.median_end,
            trend.lower_start,
            trend.lower_end,
            trend.upper_start,
            trend.upper_end,
        ] {
            assert_eq!(value, 5.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure NaN ordinates drop their pairs (with a diagnostic) and too few
    // surviving pairs become an error.
    //
    // Given
    // -----
    // - A 5-point line with two NaN ordinates, then one with four NaNs.
    //
    // Expect
    // ------
    // - The first fit succeeds on the 3 surviving points with a dropped-
    //   samples diagnostic; the second fails with `InsufficientData(1)`.
    fn estimate_nan_pairs_are_filtered() {
        // Arrange
        let x = [0.0_f64, 1.0, 2.0, 3.0, 4.0];
        let y = [1.0_f64, f64::NAN, 3.0, f64::NAN, 5.0];
        let y_mostly_nan = [f64::NAN, f64::NAN, 3.0, f64::NAN, f64::NAN];
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let outcome = TrendOutcome::estimate(&x, &y, 95.0, &TrendOptions::default(), &mut rng)
            .expect("estimate succeeds");
        let failure =
            TrendOutcome::estimate(&x, &y_mostly_nan, 95.0, &TrendOptions::default(), &mut rng);

        // Assert
        assert!((outcome.raw().slope - 1.0).abs() < 1e-12);
        assert!(outcome.diagnostics().iter().any(|d| d.contains("Dropped 2")));
        match failure {
            Err(TrendError::InsufficientData(1)) => (),
            other => panic!("expected InsufficientData(1), got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Exercise the subsampling path on perfectly collinear data, where the
    // fitted slope must be exact no matter which points are drawn.
    //
    // Given
    // -----
    // - 200 points of y = 0.25·x + 3, default max_pairs (200² − 200 > 10 000).
    //
    // Expect
    // ------
    // - The raw slope and intercept are exact and a subsampling diagnostic
    //   is recorded.
    fn estimate_subsamples_large_series() {
        // Arrange
        let x: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.25 * v + 3.0).collect();
        let mut rng = StdRng::seed_from_u64(7);

        // Act
        let outcome = TrendOutcome::estimate(&x, &y, 95.0, &TrendOptions::default(), &mut rng)
            .expect("estimate succeeds");

        // Assert
        assert!((outcome.raw().slope - 0.25).abs() < 1e-12);
        assert!((outcome.raw().intercept - 3.0).abs() < 1e-12);
        assert!(outcome.diagnostics().iter().any(|d| d.contains("Subsampled 200")));
    }
}
