use crate::error::{ProjError, TransformError};

/// A 2D conformal (four-parameter) similarity transform.
///
/// Maps source plane coordinates (x, y) to target coordinates (X, Y):
///   X = a * x - b * y + dx
///   Y = b * x + a * y + dy
///
/// with a = s·cos θ and b = s·sin θ for scale s and rotation θ.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FourParameters {
    pub a: f64,
    pub b: f64,
    pub dx: f64,
    pub dy: f64,
}

impl FourParameters {
    pub fn new(a: f64, b: f64, dx: f64, dy: f64) -> Self {
        Self { a, b, dx, dy }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Build from a scale factor and a rotation angle (radians).
    pub fn from_scale_rotation(scale: f64, theta: f64, dx: f64, dy: f64) -> Self {
        let (sin_t, cos_t) = theta.sin_cos();
        Self::new(scale * cos_t, scale * sin_t, dx, dy)
    }

    pub fn scale(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Rotation angle in radians.
    pub fn theta(&self) -> f64 {
        self.b.atan2(self.a)
    }

    /// [a, b, dx, dy]
    pub fn to_array(&self) -> [f64; 4] {
        [self.a, self.b, self.dx, self.dy]
    }

    pub fn from_array(p: &[f64; 4]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }

    /// Apply the transform: (x, y) -> (X, Y).
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x - self.b * y + self.dx,
            self.b * x + self.a * y + self.dy,
        )
    }

    /// Compute the reverse transform.
    pub fn inverse(&self) -> Result<FourParameters, TransformError> {
        let s2 = self.a * self.a + self.b * self.b;
        if s2 < f64::EPSILON {
            return Err(ProjError::InvalidParameter(
                "four-parameter transform has zero scale".into(),
            )
            .into());
        }
        let a = self.a / s2;
        let b = -self.b / s2;
        Ok(FourParameters {
            a,
            b,
            dx: -(a * self.dx - b * self.dy),
            dy: -(b * self.dx + a * self.dy),
        })
    }
}

impl Default for FourParameters {
    fn default() -> Self {
        Self::identity()
    }
}
