//! Four-parameter (2D conformal) fit between two plane coordinate sets.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use super::lsq::{self, RCOND_WARN};
use super::{centroid_and_spread, check_counts, check_spread, FitReport, FourParameterReport};
use crate::error::FitError;
use crate::similarity::FourParameters;

const UNKNOWNS: usize = 4;
const MIN_POINTS: usize = 2;

/// Least-squares estimator for [`FourParameters`].
///
/// Rows of the design matrix are `[x, -y, 1, 0]` and `[y, x, 0, 1]` per control
/// point. The source points are centred and scaled to unit RMS distance before
/// solving, so the system stays well conditioned for projected coordinates in the
/// millions of metres.
#[derive(Debug, Clone, Copy)]
pub struct FourParameterFit<'a> {
    source: &'a [[f64; 2]],
    target: &'a [[f64; 2]],
}

impl<'a> FourParameterFit<'a> {
    pub fn new(source: &'a [[f64; 2]], target: &'a [[f64; 2]]) -> Self {
        Self { source, target }
    }

    pub fn estimate(&self) -> Result<FourParameterReport, FitError> {
        let (source, target) = (self.source, self.target);
        check_counts(source.len(), target.len(), MIN_POINTS)?;

        let (cs, k) = centroid_and_spread(source);
        check_spread(&cs, k)?;
        let (ct, _) = centroid_and_spread(target);

        let n = source.len();
        let mut a = DMatrix::zeros(2 * n, UNKNOWNS);
        let mut l = DVector::zeros(2 * n);
        for (i, (s, t)) in source.iter().zip(target).enumerate() {
            let x = (s[0] - cs[0]) / k;
            let y = (s[1] - cs[1]) / k;
            let r = 2 * i;
            a[(r, 0)] = x;
            a[(r, 1)] = -y;
            a[(r, 2)] = 1.0;
            a[(r + 1, 0)] = y;
            a[(r + 1, 1)] = x;
            a[(r + 1, 3)] = 1.0;
            l[r] = t[0] - ct[0];
            l[r + 1] = t[1] - ct[1];
        }

        let solution = lsq::solve_svd(&a, &l)?;
        if solution.rcond < RCOND_WARN {
            warn!("four-parameter fit is poorly conditioned (rcond {:e})", solution.rcond);
        }
        let p = &solution.params;

        // Undo the normalization: X = a(x - cs) - b(y - cs) + ct + d'
        let pa = p[0] / k;
        let pb = p[1] / k;
        let dx = ct[0] + p[2] - (pa * cs[0] - pb * cs[1]);
        let dy = ct[1] + p[3] - (pb * cs[0] + pa * cs[1]);
        let parameters = FourParameters::new(pa, pb, dx, dy);

        let residuals: Vec<[f64; 2]> = source
            .iter()
            .zip(target)
            .map(|(s, t)| {
                let (fx, fy) = parameters.apply(s[0], s[1]);
                [fx - t[0], fy - t[1]]
            })
            .collect();

        let report = FitReport::from_residuals(parameters, residuals, UNKNOWNS);
        debug!(
            "four-parameter fit: {n} points, scale {:.9}, rotation {:.3e} rad, sigma0 {:?}",
            parameters.scale(),
            parameters.theta(),
            report.sigma0
        );
        Ok(report)
    }
}

/// Fit a four-parameter transform mapping `source` onto `target`.
pub fn fit_four_parameters(
    source: &[[f64; 2]],
    target: &[[f64; 2]],
) -> Result<FourParameters, FitError> {
    FourParameterFit::new(source, target)
        .estimate()
        .map(|report| report.parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn control_points() -> Vec<[f64; 2]> {
        vec![
            [3_380_250.25, 432_100.50],
            [3_381_904.10, 436_870.75],
            [3_377_011.60, 439_220.00],
            [3_375_500.00, 431_050.30],
            [3_379_320.45, 435_600.10],
        ]
    }

    fn apply_all(p: &FourParameters, pts: &[[f64; 2]]) -> Vec<[f64; 2]> {
        pts.iter()
            .map(|s| {
                let (x, y) = p.apply(s[0], s[1]);
                [x, y]
            })
            .collect()
    }

    #[test]
    fn test_exact_recovery() {
        let truth = FourParameters::from_scale_rotation(1.000_012_5, 0.0021, 3_512.4, -2_201.9);
        let source = control_points();
        let target = apply_all(&truth, &source);

        let report = FourParameterFit::new(&source, &target).estimate().unwrap();
        let p = report.parameters;
        assert_relative_eq!(p.a, truth.a, epsilon = 1e-11);
        assert_relative_eq!(p.b, truth.b, epsilon = 1e-11);
        assert_relative_eq!(p.dx, truth.dx, epsilon = 1e-4);
        assert_relative_eq!(p.dy, truth.dy, epsilon = 1e-4);
        assert!(report.sigma0.unwrap() < 1e-6);
        assert!(report.rms() < 1e-6);
    }

    #[test]
    fn test_two_points_determine_the_transform() {
        let truth = FourParameters::from_scale_rotation(0.5, -1.2, 10.0, 20.0);
        let source = [[0.0, 0.0], [100.0, 50.0]];
        let target = apply_all(&truth, &source);

        let report = FourParameterFit::new(&source, &target).estimate().unwrap();
        assert_relative_eq!(report.parameters.scale(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(report.parameters.theta(), -1.2, epsilon = 1e-12);
        assert_eq!(report.sigma0, None);
    }

    #[test]
    fn test_noisy_fit_residuals_balance() {
        let truth = FourParameters::from_scale_rotation(1.0, 0.001, 100.0, -100.0);
        let source = control_points();
        let mut target = apply_all(&truth, &source);
        let noise = [[0.02, -0.01], [-0.015, 0.01], [0.005, 0.02], [-0.01, -0.015], [0.0, -0.005]];
        for (t, e) in target.iter_mut().zip(noise) {
            t[0] += e[0];
            t[1] += e[1];
        }

        let report = FourParameterFit::new(&source, &target).estimate().unwrap();
        let sigma0 = report.sigma0.unwrap();
        assert!(sigma0 > 0.0 && sigma0 < 0.05);
        // With translation estimated, residuals sum to zero on each axis
        assert_relative_eq!(report.stats[0].mean, 0.0, epsilon = 1e-7);
        assert_relative_eq!(report.stats[1].mean, 0.0, epsilon = 1e-7);
        assert_eq!(report.point_errors().len(), 5);
    }

    #[test]
    fn test_single_point_rejected() {
        assert_eq!(
            fit_four_parameters(&[[1.0, 2.0]], &[[3.0, 4.0]]),
            Err(FitError::InsufficientPoints { needed: 2, got: 1 })
        );
        assert_eq!(
            fit_four_parameters(&[], &[]),
            Err(FitError::InsufficientPoints { needed: 2, got: 0 })
        );
    }

    #[test]
    fn test_mismatched_counts_checked_first() {
        assert_eq!(
            fit_four_parameters(&[[1.0, 2.0]], &[[3.0, 4.0], [5.0, 6.0]]),
            Err(FitError::MismatchedCounts {
                source_count: 1,
                target_count: 2
            })
        );
    }

    #[test]
    fn test_coincident_points_degenerate() {
        let source = [[100.0, 200.0]; 3];
        let target = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        assert!(matches!(
            fit_four_parameters(&source, &target),
            Err(FitError::Degenerate(_))
        ));
    }
}
