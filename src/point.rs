//! Point value types for the three coordinate frames.

/// Geodetic coordinates: latitude `b` and longitude `l` in radians, ellipsoidal
/// height `h` in metres.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeodeticPoint {
    pub b: f64,
    pub l: f64,
    pub h: f64,
}

impl GeodeticPoint {
    pub fn new(b: f64, l: f64, h: f64) -> Self {
        Self { b, l, h }
    }

    /// Build from latitude/longitude given in decimal degrees.
    pub fn from_degrees(b_deg: f64, l_deg: f64, h: f64) -> Self {
        Self::new(b_deg.to_radians(), l_deg.to_radians(), h)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.b, self.l, self.h]
    }
}

impl From<[f64; 3]> for GeodeticPoint {
    fn from(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

/// Geocentric Cartesian coordinates (metres).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for CartesianPoint {
    fn from(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

/// Gauss-Krüger plane coordinates: `x` is northing, `y` is easting (surveying convention).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub h: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64, h: f64) -> Self {
        Self { x, y, h }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.h]
    }
}

impl From<[f64; 3]> for ProjectedPoint {
    fn from(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}
