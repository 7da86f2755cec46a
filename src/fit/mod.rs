//! Least-squares estimation of similarity-transform parameters from control points.

pub mod four_param;
pub mod lsq;
pub mod seven_param;
pub mod stats;

pub use four_param::{fit_four_parameters, FourParameterFit};
pub use seven_param::fit_seven_parameters;
pub use stats::AxisStats;

use crate::bursa_wolf::SevenParameters;
use crate::error::FitError;
use crate::similarity::FourParameters;

/// Outcome of a parameter fit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitReport<P, V> {
    pub parameters: P,
    /// Per-point residuals, fitted minus observed target.
    pub residuals: Vec<V>,
    /// Unit-weight standard deviation sqrt(VᵀV / dof); `None` with no redundancy.
    pub sigma0: Option<f64>,
    /// min/max/mean/std of each residual component.
    pub stats: Vec<AxisStats>,
}

pub type FourParameterReport = FitReport<FourParameters, [f64; 2]>;
pub type SevenParameterReport = FitReport<SevenParameters, [f64; 3]>;

impl<P, const D: usize> FitReport<P, [f64; D]> {
    pub(crate) fn from_residuals(parameters: P, residuals: Vec<[f64; D]>, unknowns: usize) -> Self {
        let observations = residuals.len() * D;
        let vtv: f64 = residuals.iter().flatten().map(|v| v * v).sum();
        let sigma0 =
            (observations > unknowns).then(|| (vtv / (observations - unknowns) as f64).sqrt());
        let stats = AxisStats::per_axis(&residuals);
        Self {
            parameters,
            residuals,
            sigma0,
            stats,
        }
    }

    /// Length of each point's residual vector.
    pub fn point_errors(&self) -> Vec<f64> {
        self.residuals
            .iter()
            .map(|r| r.iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect()
    }

    /// Root mean square of the per-point residual lengths.
    pub fn rms(&self) -> f64 {
        if self.residuals.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.residuals.iter().flatten().map(|v| v * v).sum();
        (sum / self.residuals.len() as f64).sqrt()
    }
}

/// Validate control-point counts shared by both fits.
pub(crate) fn check_counts(source: usize, target: usize, needed: usize) -> Result<(), FitError> {
    if source != target {
        return Err(FitError::MismatchedCounts {
            source_count: source,
            target_count: target,
        });
    }
    if source < needed {
        return Err(FitError::InsufficientPoints {
            needed,
            got: source,
        });
    }
    Ok(())
}

/// Centroid of the points and their RMS distance from it.
pub(crate) fn centroid_and_spread<const D: usize>(points: &[[f64; D]]) -> ([f64; D], f64) {
    let n = points.len().max(1) as f64;
    let mut c = [0.0; D];
    for p in points {
        for (ci, pi) in c.iter_mut().zip(p) {
            *ci += pi;
        }
    }
    c.iter_mut().for_each(|ci| *ci /= n);

    let sq: f64 = points
        .iter()
        .map(|p| p.iter().zip(&c).map(|(pi, ci)| (pi - ci) * (pi - ci)).sum::<f64>())
        .sum();
    (c, (sq / n).sqrt())
}

/// Error when the points are all (numerically) the same location.
pub(crate) fn check_spread<const D: usize>(
    centroid: &[f64; D],
    spread: f64,
) -> Result<(), FitError> {
    let magnitude = centroid.iter().fold(1.0_f64, |m, c| m.max(c.abs()));
    if !(spread > magnitude * 1e-12) {
        return Err(FitError::Degenerate(format!(
            "control points coincide (spread {spread:e} m)"
        )));
    }
    Ok(())
}
