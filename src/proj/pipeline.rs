//! Pipeline: frame-to-frame transform chain through geocentric XYZ, with an
//! optional Bursa-Wolf datum step in the middle.

use crate::bursa_wolf::SevenParameters;
use crate::error::TransformError;
use crate::point::{CartesianPoint, GeodeticPoint, ProjectedPoint};
use crate::proj::ellipsoid::EllipsoidId;
use crate::proj::gauss_kruger::GaussKruger;
use crate::proj::geocentric::{blh_to_xyz, xyz_to_blh_with, GeocentricOptions};
use crate::proj::Projection;

/// One end of a pipeline and the layout of its coordinate triples.
#[derive(Clone, Copy, Debug)]
pub enum Frame {
    /// `[B, L, H]`, radians and metres, on the named ellipsoid.
    Geodetic(EllipsoidId),
    /// `[X, Y, Z]` geocentric metres.
    Cartesian,
    /// `[northing, easting, h]` on the projector's plane and ellipsoid.
    Projected(GaussKruger),
}

impl Frame {
    fn to_xyz(self, p: [f64; 3]) -> Result<CartesianPoint, TransformError> {
        match self {
            Frame::Cartesian => Ok(CartesianPoint::from(p)),
            Frame::Geodetic(id) => Ok(blh_to_xyz(id.ellipsoid(), GeodeticPoint::from(p))),
            Frame::Projected(gk) => {
                let g = gk.inverse_point(ProjectedPoint::from(p))?;
                Ok(blh_to_xyz(gk.ellipsoid(), g))
            }
        }
    }

    fn xyz_to_frame(
        self,
        p: CartesianPoint,
        options: &GeocentricOptions,
    ) -> Result<[f64; 3], TransformError> {
        match self {
            Frame::Cartesian => Ok(p.to_array()),
            Frame::Geodetic(id) => Ok(xyz_to_blh_with(id.ellipsoid(), p, options)?.to_array()),
            Frame::Projected(gk) => {
                let g = xyz_to_blh_with(gk.ellipsoid(), p, options)?;
                Ok(gk.forward_point(g)?.to_array())
            }
        }
    }
}

/// A source-to-target transform chain.
///
/// ```text
/// source frame -> XYZ (source ellipsoid) -> [Bursa-Wolf] -> XYZ -> target frame (target ellipsoid)
/// ```
#[derive(Clone, Debug)]
pub struct Pipeline {
    src: Frame,
    dst: Frame,
    datum: Option<SevenParameters>,
    options: GeocentricOptions,
}

impl Pipeline {
    pub fn new(src: Frame, dst: Frame) -> Self {
        Self {
            src,
            dst,
            datum: None,
            options: GeocentricOptions::default(),
        }
    }

    /// Insert a datum shift applied to the geocentric coordinates.
    pub fn with_seven_parameters(mut self, params: SevenParameters) -> Self {
        self.datum = Some(params);
        self
    }

    pub fn with_geocentric_options(mut self, options: GeocentricOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &Frame {
        &self.src
    }

    pub fn target(&self) -> &Frame {
        &self.dst
    }

    /// Transform a single coordinate triple from the source to the target frame.
    pub fn transform(&self, p: [f64; 3]) -> Result<[f64; 3], TransformError> {
        let xyz = self.src.to_xyz(p)?;
        let xyz = match &self.datum {
            Some(params) => CartesianPoint::from(params.apply(xyz.to_array())),
            None => xyz,
        };
        self.dst.xyz_to_frame(xyz, &self.options)
    }

    /// Transform coordinates in place. On error `coords` is left untouched.
    pub fn transform_batch(&self, coords: &mut [[f64; 3]]) -> Result<(), TransformError> {
        let out = coords
            .iter()
            .map(|c| self.transform(*c))
            .collect::<Result<Vec<_>, _>>()?;
        coords.copy_from_slice(&out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::BEIJING54;
    use crate::proj::gauss_kruger::BeltWidth;
    use approx::assert_relative_eq;

    fn zone20() -> GaussKruger {
        GaussKruger::for_zone(BEIJING54, BeltWidth::Six, 20).unwrap()
    }

    #[test]
    fn test_geodetic_to_cartesian() {
        let pipe = Pipeline::new(Frame::Geodetic(EllipsoidId::Beijing54), Frame::Cartesian);
        let out = pipe
            .transform([30.0_f64.to_radians(), 114.0_f64.to_radians(), 0.0])
            .unwrap();
        assert_relative_eq!(out[0], -2_248_582.351_959, epsilon = 1e-5);
        assert_relative_eq!(out[1], 5_050_398.651_653, epsilon = 1e-5);
        assert_relative_eq!(out[2], 3_170_430.097_298, epsilon = 1e-5);
    }

    #[test]
    fn test_ellipsoid_change_without_datum_shift() {
        // Same XYZ read on two ellipsoids: latitude shifts, longitude does not
        let pipe = Pipeline::new(
            Frame::Geodetic(EllipsoidId::Wgs84),
            Frame::Geodetic(EllipsoidId::Beijing54),
        );
        let src = [39.9_f64.to_radians(), 116.4_f64.to_radians(), 50.0];
        let out = pipe.transform(src).unwrap();
        assert_relative_eq!(out[1], src[1], epsilon = 1e-14);
        assert!((out[0] - src[0]).abs() > 1e-8);
        assert!((out[2] - src[2]).abs() > 1.0);
    }

    #[test]
    fn test_geodetic_to_projected() {
        let pipe = Pipeline::new(
            Frame::Geodetic(EllipsoidId::Beijing54),
            Frame::Projected(zone20()),
        );
        assert!(matches!(pipe.source(), Frame::Geodetic(EllipsoidId::Beijing54)));
        assert!(matches!(pipe.target(), Frame::Projected(_)));
        let out = pipe
            .transform([39.9_f64.to_radians(), 116.4_f64.to_radians(), 50.0])
            .unwrap();
        assert_relative_eq!(out[0], 4_418_676.149_582, epsilon = 1e-4);
        assert_relative_eq!(out[1], 448_687.997_036, epsilon = 1e-4);
        assert_relative_eq!(out[2], 50.0, epsilon = 1e-6);
    }

    #[test]
    fn test_roundtrip_through_datum_shift() {
        let params = SevenParameters::from_arc_seconds_ppm(-15.4, 112.7, 48.2, 0.8, -1.1, 0.6, 4.5);
        let forward = Pipeline::new(
            Frame::Projected(zone20()),
            Frame::Geodetic(EllipsoidId::Wgs84),
        )
        .with_seven_parameters(params);
        let backward = Pipeline::new(
            Frame::Geodetic(EllipsoidId::Wgs84),
            Frame::Projected(zone20()),
        )
        .with_seven_parameters(params.inverse());

        let mut coords = vec![[4_418_676.15, 448_688.0, 50.0], [3_323_964.54, 210_469.67, 12.0]];
        let original = coords.clone();
        forward.transform_batch(&mut coords).unwrap();
        backward.transform_batch(&mut coords).unwrap();
        for (c, o) in coords.iter().zip(&original) {
            // First-order inverse: millimetre level at Earth radius
            assert_relative_eq!(c[0], o[0], epsilon = 1e-2);
            assert_relative_eq!(c[1], o[1], epsilon = 1e-2);
            assert_relative_eq!(c[2], o[2], epsilon = 1e-2);
        }
    }

    #[test]
    fn test_batch_leaves_input_on_error() {
        let pipe = Pipeline::new(Frame::Cartesian, Frame::Geodetic(EllipsoidId::Wgs84));
        assert!(matches!(pipe.source(), Frame::Cartesian));
        let mut coords = [[6_378_137.0, 0.0, 0.0], [f64::NAN, 0.0, 0.0]];
        assert!(pipe.transform_batch(&mut coords).is_err());
        // The valid first row is still geocentric
        assert_eq!(coords[0], [6_378_137.0, 0.0, 0.0]);
        assert!(coords[1][0].is_nan());
    }
}
