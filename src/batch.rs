//! Array versions of the point operations, one point per row.
//!
//! Rows are processed in parallel with rayon. A failing row aborts the whole
//! call with that row's error.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::bursa_wolf::SevenParameters;
use crate::error::TransformError;
use crate::fit::{self, FourParameterFit, FourParameterReport, SevenParameterReport};
use crate::point::{CartesianPoint, GeodeticPoint};
use crate::proj::ellipsoid::EllipsoidId;
use crate::proj::gauss_kruger::GaussKruger;
use crate::proj::geocentric;
use crate::proj::Projection;
use crate::similarity::FourParameters;

/// Copy the rows of an `(n, N)` array into fixed-width points.
fn rows<const N: usize>(
    a: &ArrayView2<'_, f64>,
    what: &str,
) -> Result<Vec<[f64; N]>, TransformError> {
    if a.ncols() != N {
        return Err(TransformError::Shape(format!(
            "{what} must have shape (n, {N}), got {:?}",
            a.shape()
        )));
    }
    Ok(a.rows()
        .into_iter()
        .map(|r| std::array::from_fn(|i| r[i]))
        .collect())
}

fn map_rows<const N: usize, const M: usize, F>(
    a: &ArrayView2<'_, f64>,
    what: &str,
    f: F,
) -> Result<Array2<f64>, TransformError>
where
    F: Fn([f64; N]) -> Result<[f64; M], TransformError> + Send + Sync,
{
    let points = rows::<N>(a, what)?;
    let out: Vec<[f64; M]> = points.into_par_iter().map(f).collect::<Result<_, _>>()?;
    Ok(Array2::from(out))
}

/// `(n, 3)` of `[B, L, H]` to `(n, 3)` of `[X, Y, Z]`.
pub fn blh_to_xyz(
    blh: &ArrayView2<'_, f64>,
    ellipsoid: EllipsoidId,
) -> Result<Array2<f64>, TransformError> {
    let e = ellipsoid.ellipsoid();
    map_rows(blh, "blh", |p: [f64; 3]| {
        Ok(geocentric::blh_to_xyz(e, GeodeticPoint::from(p)).to_array())
    })
}

/// `(n, 3)` of `[X, Y, Z]` to `(n, 3)` of `[B, L, H]`.
pub fn xyz_to_blh(
    xyz: &ArrayView2<'_, f64>,
    ellipsoid: EllipsoidId,
) -> Result<Array2<f64>, TransformError> {
    let e = ellipsoid.ellipsoid();
    map_rows(xyz, "xyz", |p: [f64; 3]| {
        Ok(geocentric::xyz_to_blh(e, CartesianPoint::from(p))?.to_array())
    })
}

/// `(n, 2)` of `[B, L]` to `(n, 2)` of `[northing, easting]`.
pub fn blh_to_xy(
    bl: &ArrayView2<'_, f64>,
    gk: &GaussKruger,
) -> Result<Array2<f64>, TransformError> {
    map_rows(bl, "bl", |[b, l]: [f64; 2]| {
        let (easting, northing) = gk.forward(l, b)?;
        Ok([northing, easting])
    })
}

/// `(n, 2)` of `[northing, easting]` to `(n, 2)` of `[B, L]`.
pub fn xy_to_blh(
    xy: &ArrayView2<'_, f64>,
    gk: &GaussKruger,
) -> Result<Array2<f64>, TransformError> {
    map_rows(xy, "xy", |[northing, easting]: [f64; 2]| {
        let (lon, lat) = gk.inverse(easting, northing)?;
        Ok([lat, lon])
    })
}

pub fn apply_four_parameters(
    points: &ArrayView2<'_, f64>,
    params: &FourParameters,
) -> Result<Array2<f64>, TransformError> {
    map_rows(points, "points", |[x, y]: [f64; 2]| {
        let (tx, ty) = params.apply(x, y);
        Ok([tx, ty])
    })
}

pub fn apply_seven_parameters(
    points: &ArrayView2<'_, f64>,
    params: &SevenParameters,
) -> Result<Array2<f64>, TransformError> {
    map_rows(points, "points", |p: [f64; 3]| Ok(params.apply(p)))
}

pub fn fit_four_parameters(
    source: &ArrayView2<'_, f64>,
    target: &ArrayView2<'_, f64>,
) -> Result<FourParameterReport, TransformError> {
    let source = rows::<2>(source, "source")?;
    let target = rows::<2>(target, "target")?;
    Ok(FourParameterFit::new(&source, &target).estimate()?)
}

pub fn fit_seven_parameters(
    source: &ArrayView2<'_, f64>,
    target: &ArrayView2<'_, f64>,
) -> Result<SevenParameterReport, TransformError> {
    let source = rows::<3>(source, "source")?;
    let target = rows::<3>(target, "target")?;
    Ok(fit::fit_seven_parameters(&source, &target)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjError;
    use crate::proj::ellipsoid::BEIJING54;
    use crate::proj::gauss_kruger::BeltWidth;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn grid() -> Array2<f64> {
        let mut points = Vec::new();
        for i in 0..8 {
            for j in 0..8 {
                let b = (20.0 + 4.0 * i as f64).to_radians();
                let l = (114.2 + 0.7 * j as f64).to_radians();
                points.push([b, l, 10.0 * (i + j) as f64]);
            }
        }
        Array2::from(points)
    }

    #[test]
    fn test_geodetic_roundtrip() {
        let blh = grid();
        let xyz = blh_to_xyz(&blh.view(), EllipsoidId::Beijing54).unwrap();
        assert_eq!(xyz.dim(), (64, 3));
        let back = xyz_to_blh(&xyz.view(), EllipsoidId::Beijing54).unwrap();
        for (a, b) in blh.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-4);
        }
        for (a, b) in blh.column(0).iter().zip(back.column(0).iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_projection_roundtrip() {
        let gk = GaussKruger::for_zone(BEIJING54, BeltWidth::Six, 20).unwrap();
        let bl = grid().slice(ndarray::s![.., ..2]).to_owned();
        let xy = blh_to_xy(&bl.view(), &gk).unwrap();
        let back = xy_to_blh(&xy.view(), &gk).unwrap();
        for (a, b) in bl.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_northing_first_columns() {
        let gk = GaussKruger::for_zone(BEIJING54, BeltWidth::Six, 20).unwrap();
        let bl = array![[39.9_f64.to_radians(), 116.4_f64.to_radians()]];
        let xy = blh_to_xy(&bl.view(), &gk).unwrap();
        assert_relative_eq!(xy[[0, 0]], 4_418_676.149_582, epsilon = 1e-4);
        assert_relative_eq!(xy[[0, 1]], 448_687.997_036, epsilon = 1e-4);
    }

    #[test]
    fn test_wrong_column_count() {
        let a = Array2::<f64>::zeros((4, 2));
        assert!(matches!(
            blh_to_xyz(&a.view(), EllipsoidId::Wgs84),
            Err(TransformError::Shape(_))
        ));
        let p = FourParameters::identity();
        let b = Array2::<f64>::zeros((4, 3));
        assert!(matches!(
            apply_four_parameters(&b.view(), &p),
            Err(TransformError::Shape(_))
        ));
        assert!(matches!(
            fit_seven_parameters(&a.view(), &a.view()),
            Err(TransformError::Shape(_))
        ));
    }

    #[test]
    fn test_row_error_aborts() {
        let xyz = array![[6_378_137.0, 0.0, 0.0], [f64::NAN, 1.0, 1.0]];
        assert!(matches!(
            xyz_to_blh(&xyz.view(), EllipsoidId::Wgs84),
            Err(TransformError::Projection(ProjError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_empty_input() {
        let a = Array2::<f64>::zeros((0, 3));
        let out = apply_seven_parameters(&a.view(), &SevenParameters::default()).unwrap();
        assert_eq!(out.dim(), (0, 3));
    }

    #[test]
    fn test_fit_from_arrays() {
        let truth = SevenParameters::from_arc_seconds_ppm(3.0, -2.0, 1.0, 0.3, -0.2, 0.1, 2.0);
        let blh = grid();
        let src = blh_to_xyz(&blh.view(), EllipsoidId::Beijing54).unwrap();
        let dst = apply_seven_parameters(&src.view(), &truth).unwrap();

        let report = fit_seven_parameters(&src.view(), &dst.view()).unwrap();
        assert_eq!(report.residuals.len(), 64);
        assert_relative_eq!(report.parameters.m, truth.m, epsilon = 1e-10);
        assert_relative_eq!(report.parameters.dx, truth.dx, epsilon = 1e-3);

        let four = FourParameters::from_scale_rotation(1.0, 0.01, 5.0, 5.0);
        let plane = array![[0.0, 0.0], [100.0, 0.0], [0.0, 100.0]];
        let moved = apply_four_parameters(&plane.view(), &four).unwrap();
        let report = fit_four_parameters(&plane.view(), &moved.view()).unwrap();
        assert_relative_eq!(report.parameters.theta(), 0.01, epsilon = 1e-12);
    }
}
