//! utils — percentile evaluation, timestamp conversion, and PyO3 glue.
//!
//! Purpose
//! -------
//! Small shared helpers the analysis modules lean on: evaluating a
//! percentile of a sample with an explicit interpolation rule, turning
//! wall-clock timestamps into float seconds, and (behind the
//! `python-bindings` feature) extracting float arrays from arbitrary
//! Python objects.
//!
//! Conventions
//! -----------
//! - [`percentile_of`] sorts a copy internally; callers never need to
//!   pre-sort.
//! - Degenerate requests (empty data, out-of-domain percentile) return
//!   `None` rather than erroring; these helpers sit below the validated
//!   public entry points.

use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Interpolation — how to read a percentile that falls between ranks.
///
/// Variants
/// --------
/// - `Midpoint`
///   Average of the two surrounding order statistics. Used for measures,
///   where a value between samples is acceptable.
/// - `Nearest`
///   The order statistic at the nearest rank. Used where the result must
///   be an actually observed value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interpolation {
    Midpoint,
    Nearest,
}

/// Evaluate a percentile of a sample.
///
/// Parameters
/// ----------
/// - `data`: `&[f64]`
///   Sample values in any order; a copy is sorted internally.
/// - `percentile`: `f64`
///   Percentile in [0, 100].
/// - `interpolation`: `Interpolation`
///   Rule for percentiles that fall between ranks.
///
/// Returns
/// -------
/// `Option<f64>`
///   The percentile value, or `None` when `data` is empty or the
///   percentile is outside [0, 100] (NaN included).
pub fn percentile_of(data: &[f64], percentile: f64, interpolation: Interpolation) -> Option<f64> {
    if data.is_empty() || !(0.0..=100.0).contains(&percentile) {
        return None;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    // Fractional rank over n - 1 intervals.
    let rank = (sorted.len() - 1) as f64 * percentile / 100.0;
    let value = match interpolation {
        Interpolation::Midpoint => {
            (sorted[rank.floor() as usize] + sorted[rank.ceil() as usize]) / 2.0
        }
        Interpolation::Nearest => sorted[rank.round() as usize],
    };
    Some(value)
}

/// Convert wall-clock timestamps to float seconds since the Unix epoch.
///
/// Parameters
/// ----------
/// - `times`: `&[SystemTime]`
///   Timestamps in any order; pre-epoch times map to negative seconds.
///
/// Returns
/// -------
/// `Vec<f64>`
///   One float per timestamp, suitable as a trend abscissa.
pub fn epoch_seconds(times: &[SystemTime]) -> Vec<f64> {
    times
        .iter()
        .map(|t| match t.duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        })
        .collect()
}

/// Extract a contiguous 1-D float64 array from a numpy array, a pandas
/// Series, or any float sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Midpoint and nearest interpolation, on and between ranks.
    // - Degenerate percentile requests (empty data, out-of-domain values).
    // - Epoch conversion, including pre-epoch timestamps.
    //
    // They intentionally DO NOT cover:
    // - The Python array extraction helper (requires the Python C API).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify both interpolation rules on a sample where the requested
    // percentiles land on and between ranks.
    //
    // Given
    // -----
    // - The unsorted sample [3, 1, 2, 4] (ranks 0..3).
    //
    // Expect
    // ------
    // - Median: midpoint 2.5, nearest 3 (rank 1.5 rounds to 2).
    // - 25th: rank 0.75 → midpoint 1.5, nearest 2.
    fn percentile_of_interpolation_rules() {
        // Arrange
        let data = [3.0_f64, 1.0, 2.0, 4.0];

        // Act & Assert
        assert_eq!(percentile_of(&data, 50.0, Interpolation::Midpoint), Some(2.5));
        assert_eq!(percentile_of(&data, 50.0, Interpolation::Nearest), Some(3.0));
        assert_eq!(percentile_of(&data, 25.0, Interpolation::Midpoint), Some(1.5));
        assert_eq!(percentile_of(&data, 25.0, Interpolation::Nearest), Some(2.0));
        assert_eq!(percentile_of(&data, 0.0, Interpolation::Midpoint), Some(1.0));
        assert_eq!(percentile_of(&data, 100.0, Interpolation::Nearest), Some(4.0));
    }

    #[test]
    // Purpose
    // -------
    // Verify degenerate requests return `None`.
    //
    // Given
    // -----
    // - Empty data, and percentiles -1, 101, NaN on non-empty data.
    //
    // Expect
    // ------
    // - `None` in every case.
    fn percentile_of_degenerate_requests_return_none() {
        // Arrange
        let data = [1.0_f64, 2.0];

        // Act & Assert
        assert_eq!(percentile_of(&[], 50.0, Interpolation::Midpoint), None);
        assert_eq!(percentile_of(&data, -1.0, Interpolation::Midpoint), None);
        assert_eq!(percentile_of(&data, 101.0, Interpolation::Nearest), None);
        assert_eq!(percentile_of(&data, f64::NAN, Interpolation::Nearest), None);
    }

    #[test]
    // Purpose
    // -------
    // Verify epoch conversion on, after, and before the epoch.
    //
    // Given
    // -----
    // - The epoch itself, epoch + 90 s, and epoch − 30 s.
    //
    // Expect
    // ------
    // - Seconds 0, 90, and −30.
    fn epoch_seconds_handles_pre_epoch_times() {
        // Arrange
        let times = [
            UNIX_EPOCH,
            UNIX_EPOCH + Duration::from_secs(90),
            UNIX_EPOCH - Duration::from_secs(30),
        ];

        // Act
        let seconds = epoch_seconds(&times);

        // Assert
        assert_eq!(seconds, vec![0.0, 90.0, -30.0]);
    }
}
