//! Flat entry points over plain `f64` values, for collaborators that hold
//! coordinates in tables rather than typed points.
//!
//! Angles are radians. Projected coordinates follow the surveying order used
//! across the crate: northing first on input, `(easting, northing)` from the
//! forward projection.

use crate::bursa_wolf::SevenParameters;
use crate::error::TransformError;
use crate::fit::{self, SevenParameterReport};
use crate::point::{CartesianPoint, GeodeticPoint};
use crate::proj::ellipsoid::EllipsoidId;
use crate::proj::gauss_kruger::{BeltWidth, GaussKruger, ZoneConvention};
use crate::proj::geocentric;
use crate::proj::Projection;
use crate::similarity::FourParameters;

fn projector(
    ellipsoid: EllipsoidId,
    belt: BeltWidth,
    central_meridian: Option<f64>,
    false_easting: f64,
    false_northing: f64,
) -> GaussKruger {
    let zone = ZoneConvention {
        belt,
        central_meridian,
    };
    GaussKruger::new(*ellipsoid.ellipsoid(), zone)
        .with_false_easting(false_easting)
        .with_false_northing(false_northing)
}

/// Geodetic to geocentric Cartesian.
pub fn blh_to_xyz(b: f64, l: f64, h: f64, ellipsoid: EllipsoidId) -> (f64, f64, f64) {
    let p = geocentric::blh_to_xyz(ellipsoid.ellipsoid(), GeodeticPoint::new(b, l, h));
    (p.x, p.y, p.z)
}

/// Geocentric Cartesian to geodetic.
pub fn xyz_to_blh(
    x: f64,
    y: f64,
    z: f64,
    ellipsoid: EllipsoidId,
) -> Result<(f64, f64, f64), TransformError> {
    let p = geocentric::xyz_to_blh(ellipsoid.ellipsoid(), CartesianPoint::new(x, y, z))?;
    Ok((p.b, p.l, p.h))
}

/// Project latitude `b` and longitude `l` to `(easting, northing)`.
///
/// Without a central meridian the zone is derived from `l`.
pub fn blh_to_xy(
    b: f64,
    l: f64,
    ellipsoid: EllipsoidId,
    belt: BeltWidth,
    central_meridian: Option<f64>,
    false_easting: f64,
    false_northing: f64,
) -> Result<(f64, f64), TransformError> {
    let gk = projector(ellipsoid, belt, central_meridian, false_easting, false_northing);
    Ok(gk.forward(l, b)?)
}

/// Unproject `(northing, easting)` to `(B, L)`.
///
/// Without a central meridian the zone number is estimated from the easting,
/// which is only reliable when the false easting encodes the zone.
pub fn xy_to_blh(
    northing: f64,
    easting: f64,
    ellipsoid: EllipsoidId,
    belt: BeltWidth,
    central_meridian: Option<f64>,
    false_easting: f64,
    false_northing: f64,
) -> Result<(f64, f64), TransformError> {
    let gk = projector(ellipsoid, belt, central_meridian, false_easting, false_northing);
    let (lon, lat) = gk.inverse(easting, northing)?;
    Ok((lat, lon))
}

pub fn fit_four_parameters(
    source: &[[f64; 2]],
    target: &[[f64; 2]],
) -> Result<FourParameters, TransformError> {
    Ok(fit::fit_four_parameters(source, target)?)
}

pub fn fit_seven_parameters(
    source: &[[f64; 3]],
    target: &[[f64; 3]],
) -> Result<SevenParameterReport, TransformError> {
    Ok(fit::fit_seven_parameters(source, target)?)
}

/// Apply a four-parameter transform to a two-component point.
pub fn apply_four_parameters(
    point: &[f64],
    params: &FourParameters,
) -> Result<(f64, f64), TransformError> {
    match point {
        &[x, y] => Ok(params.apply(x, y)),
        _ => Err(TransformError::Shape(format!(
            "four-parameter transform needs 2 coordinates, got {}",
            point.len()
        ))),
    }
}

/// Apply a seven-parameter transform to a three-component point.
pub fn apply_seven_parameters(
    point: &[f64],
    params: &SevenParameters,
) -> Result<(f64, f64, f64), TransformError> {
    match point {
        &[x, y, z] => {
            let [tx, ty, tz] = params.apply([x, y, z]);
            Ok((tx, ty, tz))
        }
        _ => Err(TransformError::Shape(format!(
            "seven-parameter transform needs 3 coordinates, got {}",
            point.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FitError, ProjError};
    use approx::assert_relative_eq;

    #[test]
    fn test_beijing54_scenario() {
        let (b, l) = (30.0_f64.to_radians(), 114.0_f64.to_radians());
        let (x, y, z) = blh_to_xyz(b, l, 0.0, EllipsoidId::Beijing54);
        assert_relative_eq!(x, -2_248_582.351_959, epsilon = 1e-5);
        assert_relative_eq!(y, 5_050_398.651_653, epsilon = 1e-5);
        assert_relative_eq!(z, 3_170_430.097_298, epsilon = 1e-5);

        let (b2, l2, h2) = xyz_to_blh(x, y, z, EllipsoidId::Beijing54).unwrap();
        assert_relative_eq!(b2, b, epsilon = 1e-11);
        assert_relative_eq!(l2, l, epsilon = 1e-14);
        assert_relative_eq!(h2, 0.0, epsilon = 1e-4);

        let (e, n) =
            blh_to_xy(b, l, EllipsoidId::Beijing54, BeltWidth::Six, None, 500_000.0, 0.0).unwrap();
        assert_relative_eq!(e, 210_469.668_860, epsilon = 1e-4);
        assert_relative_eq!(n, 3_323_964.539_065, epsilon = 1e-4);

        let cm = Some(117.0_f64.to_radians());
        let (b3, l3) =
            xy_to_blh(n, e, EllipsoidId::Beijing54, BeltWidth::Six, cm, 500_000.0, 0.0).unwrap();
        assert_relative_eq!(b3, b, epsilon = 1e-9);
        assert_relative_eq!(l3, l, epsilon = 1e-9);
    }

    #[test]
    fn test_two_ellipsoids_differ() {
        let (b, l) = (39.9_f64.to_radians(), 116.4_f64.to_radians());
        let wgs = blh_to_xyz(b, l, 50.0, EllipsoidId::Wgs84);
        let bj = blh_to_xyz(b, l, 50.0, EllipsoidId::Beijing54);
        assert_relative_eq!(wgs.0, -2_178_657.082_725, epsilon = 1e-5);
        assert_relative_eq!(bj.0, -2_178_693.542_555, epsilon = 1e-5);
        assert_relative_eq!(bj.2 - wgs.2, 4_069_577.777_563 - 4_069_505.747_982, epsilon = 1e-5);
    }

    #[test]
    fn test_three_degree_belt_explicit_meridian() {
        let (b, l) = (25.0_f64.to_radians(), 121.2_f64.to_radians());
        let cm = Some(120.0_f64.to_radians());
        let (e, n) =
            blh_to_xy(b, l, EllipsoidId::Beijing54, BeltWidth::Three, cm, 500_000.0, 0.0).unwrap();
        assert_relative_eq!(e, 621_147.882_458, epsilon = 1e-4);
        assert_relative_eq!(n, 2_766_639.642_232, epsilon = 1e-4);
    }

    #[test]
    fn test_projection_errors_are_wrapped() {
        let err = blh_to_xy(2.0, 1.0, EllipsoidId::Wgs84, BeltWidth::Six, None, 500_000.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, TransformError::Projection(ProjError::InvalidParameter(_))));
    }

    #[test]
    fn test_fit_errors_are_wrapped() {
        let err = fit_four_parameters(&[[0.0, 0.0]], &[[1.0, 1.0]]).unwrap_err();
        assert_eq!(
            err,
            TransformError::Fit(FitError::InsufficientPoints { needed: 2, got: 1 })
        );
        let err = fit_seven_parameters(&[[0.0; 3]; 2], &[[0.0; 3]; 2]).unwrap_err();
        assert_eq!(
            err,
            TransformError::Fit(FitError::InsufficientPoints { needed: 3, got: 2 })
        );
    }

    #[test]
    fn test_apply_checks_shape() {
        let four = FourParameters::from_scale_rotation(2.0, 0.0, 1.0, 1.0);
        assert_eq!(apply_four_parameters(&[1.0, 2.0], &four).unwrap(), (3.0, 5.0));
        assert!(matches!(
            apply_four_parameters(&[1.0, 2.0, 3.0], &four),
            Err(TransformError::Shape(_))
        ));

        let seven = SevenParameters::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(apply_seven_parameters(&[0.0, 0.0, 0.0], &seven).unwrap(), (1.0, 2.0, 3.0));
        assert!(matches!(
            apply_seven_parameters(&[0.0, 0.0], &seven),
            Err(TransformError::Shape(_))
        ));
    }

    #[test]
    fn test_fit_then_apply() {
        let truth = FourParameters::from_scale_rotation(1.000_01, 0.002, 50.0, -75.0);
        let source = [[3_300_000.0, 400_000.0], [3_310_000.0, 405_000.0], [3_305_000.0, 395_000.0]];
        let target: Vec<[f64; 2]> = source
            .iter()
            .map(|s| {
                let (x, y) = truth.apply(s[0], s[1]);
                [x, y]
            })
            .collect();
        let fitted = fit_four_parameters(&source, &target).unwrap();
        let (x, y) = apply_four_parameters(&[3_302_000.0, 401_000.0], &fitted).unwrap();
        let (ex, ey) = truth.apply(3_302_000.0, 401_000.0);
        assert_relative_eq!(x, ex, epsilon = 1e-5);
        assert_relative_eq!(y, ey, epsilon = 1e-5);
    }
}
