//! Seven-parameter Bursa-Wolf fit between two geocentric coordinate sets.
//!
//! Observation equations per control point, with L = target - source:
//!
//! ```text
//! Lx = dx       + ωy·Z - ωz·Y + m·X
//! Ly = dy - ωx·Z        + ωz·X + m·Y
//! Lz = dz + ωx·Y - ωy·X        + m·Z
//! ```
//!
//! where ω = (1 + m)·ε. The rotation is linearized, so the model only holds for
//! the small angles found between datum realizations.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector, Vector3};

use super::lsq::{self, RCOND_WARN};
use super::{centroid_and_spread, check_counts, check_spread, FitReport, SevenParameterReport};
use crate::bursa_wolf::SevenParameters;
use crate::error::FitError;

const UNKNOWNS: usize = 7;
const MIN_POINTS: usize = 3;

/// Fit Bursa-Wolf parameters mapping `source` onto `target`.
pub fn fit_seven_parameters(
    source: &[[f64; 3]],
    target: &[[f64; 3]],
) -> Result<SevenParameterReport, FitError> {
    check_counts(source.len(), target.len(), MIN_POINTS)?;

    let (cs, k) = centroid_and_spread(source);
    check_spread(&cs, k)?;

    let n = source.len();
    let mut b = DMatrix::zeros(3 * n, UNKNOWNS);
    let mut l = DVector::zeros(3 * n);
    for (i, (s, t)) in source.iter().zip(target).enumerate() {
        let x = (s[0] - cs[0]) / k;
        let y = (s[1] - cs[1]) / k;
        let z = (s[2] - cs[2]) / k;
        let r = 3 * i;

        b[(r, 0)] = 1.0;
        b[(r, 4)] = z;
        b[(r, 5)] = -y;
        b[(r, 6)] = x;

        b[(r + 1, 1)] = 1.0;
        b[(r + 1, 3)] = -z;
        b[(r + 1, 5)] = x;
        b[(r + 1, 6)] = y;

        b[(r + 2, 2)] = 1.0;
        b[(r + 2, 3)] = y;
        b[(r + 2, 4)] = -x;
        b[(r + 2, 6)] = z;

        for axis in 0..3 {
            l[r + axis] = t[axis] - s[axis];
        }
    }

    let bt = b.transpose();
    let normal = &bt * &b;
    let w = &bt * &l;
    let solution = lsq::solve_normal(&normal, &w)?;
    if solution.rcond < RCOND_WARN {
        warn!("seven-parameter fit is poorly conditioned (rcond {:e})", solution.rcond);
    }
    let p = &solution.params;

    // Map back from the centred, scaled source: T = T' - (ω × c + m·c)
    let omega = Vector3::new(p[3], p[4], p[5]) / k;
    let m = p[6] / k;
    let c = Vector3::from(cs);
    let t = Vector3::new(p[0], p[1], p[2]) - (omega.cross(&c) + m * c);
    let eps = omega / (1.0 + m);

    let parameters = SevenParameters::new(t.x, t.y, t.z, eps.x, eps.y, eps.z, m);

    let residuals: Vec<[f64; 3]> = source
        .iter()
        .zip(target)
        .map(|(s, t)| {
            let f = parameters.apply(*s);
            [f[0] - t[0], f[1] - t[1], f[2] - t[2]]
        })
        .collect();

    let report = FitReport::from_residuals(parameters, residuals, UNKNOWNS);
    debug!(
        "seven-parameter fit: {n} points, scale {:.3} ppm, sigma0 {:?}",
        m * 1e6,
        report.sigma0
    );
    Ok(report)
}
