//! thompson::variability — repeatability scoring over repeated measures.
//!
//! Purpose
//! -------
//! Quantify how repeatable a set of independent measures is: the width of
//! the two-sided median CI over the measures, in absolute units and
//! relative to their magnitude. A tight CI means re-running the whole
//! experiment would land close to the same median.
//!
//! Key behaviors
//! -------------
//! - Sort a copy of the measures and take the two-sided median CI ranks
//!   from [`ThompsonCi::for_percentile`].
//! - Score absolute variability as `upper_value − lower_value` and
//!   relative variability as that width over the CI midpoint.
//! - When the measures are too few for a CI at the requested confidence,
//!   return no score (with the insufficiency diagnostics), never a fake
//!   number.
//! - A zero midpoint leaves the relative score undefined (`None`) rather
//!   than dividing by zero.
//!
//! Invariants & assumptions
//! ------------------------
//! - The input order is irrelevant; measures are sorted internally.
//! - `absolute >= 0` always (ranks index a sorted slice).
//!
//! Testing notes
//! -------------
//! - Unit tests pin the score on 1..10 at 90 % (width 7 over midpoint 5.5)
//!   and the undefined-relative edge; seeded 100-measure scores are pinned
//!   in the integration tests.

use crate::thompson::errors::ThompsonResult;
use crate::thompson::interval::{CiClass, ThompsonCi};

/// VariabilityScore — the numbers behind a repeatability verdict.
///
/// Fields
/// ------
/// - `lower_value` / `upper_value`: `f64`
///   Measure values at the CI rank bounds.
/// - `absolute`: `f64`
///   CI width, `upper_value − lower_value`.
/// - `relative`: `Option<f64>`
///   Width over the CI midpoint; `None` when the midpoint is zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VariabilityScore {
    pub lower_value: f64,
    pub upper_value: f64,
    pub absolute: f64,
    pub relative: Option<f64>,
}

/// VariabilityOutcome — repeatability score plus its diagnostics trail.
///
/// Invariants
/// ----------
/// - `score` is `None` exactly when the sample was too small for a
///   two-sided median CI at the requested confidence.
#[derive(Debug, Clone)]
pub struct VariabilityOutcome {
    score: Option<VariabilityScore>,
    diagnostics: Vec<String>,
}

impl VariabilityOutcome {
    /// Score the variability of a set of measures.
    ///
    /// Parameters
    /// ----------
    /// - `measures`: `&[f64]`
    ///   Independent measures (one per experiment repetition); order does
    ///   not matter.
    /// - `confidence`: `f64`
    ///   Confidence level for the median CI, strictly between 0 and 100.
    ///
    /// Returns
    /// -------
    /// `ThompsonResult<VariabilityOutcome>`
    ///   The score, or `None` with diagnostics when the sample is too
    ///   small.
    ///
    /// Errors
    /// ------
    /// - `ThompsonError::InvalidConfidence` from validation.
    pub fn assess(measures: &[f64], confidence: f64) -> ThompsonResult<Self> {
        let ci = ThompsonCi::for_percentile(measures.len(), 50.0, confidence, CiClass::TwoSided)?;
        let mut diagnostics = ci.diagnostics().to_vec();

        let (lower_rank, upper_rank) = match (ci.lower(), ci.upper()) {
            (Some(lower), Some(upper)) => (lower, upper),
            _ => return Ok(VariabilityOutcome { score: None, diagnostics }),
        };

        let mut sorted = measures.to_vec();
        sorted.sort_by(f64::total_cmp);

        let lower_value = sorted[lower_rank];
        let upper_value = sorted[upper_rank];
        let absolute = upper_value - lower_value;
        let midpoint = (lower_value + upper_value) / 2.0;
        let relative = if midpoint == 0.0 {
            diagnostics.push(
                "CI midpoint is zero; the relative variability score is undefined.".to_string(),
            );
            None
        } else {
            Some(absolute / midpoint)
        };

        Ok(VariabilityOutcome {
            score: Some(VariabilityScore { lower_value, upper_value, absolute, relative }),
            diagnostics,
        })
    }

    /// The score, `None` when the sample was too small for a CI.
    pub fn score(&self) -> Option<&VariabilityScore> {
        self.score.as_ref()
    }

    /// Insufficiency and edge-case notes accumulated during scoring.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}
