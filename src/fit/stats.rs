/// Summary of one residual component over all control points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation (divides by n).
    pub std: f64,
}

impl AxisStats {
    /// Statistics of `values`; all fields are NaN for an empty input.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std: f64::NAN,
            };
        }

        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Self {
            min,
            max,
            mean,
            std: var.sqrt(),
        }
    }

    /// Per-axis statistics over fixed-width residual vectors.
    pub fn per_axis<const D: usize>(residuals: &[[f64; D]]) -> Vec<AxisStats> {
        (0..D)
            .map(|axis| Self::from_values(residuals.iter().map(|r| r[axis])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_stats() {
        let s = AxisStats::from_values([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(s.min, 2.0);
        assert_relative_eq!(s.max, 9.0);
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.std, 2.0);
    }

    #[test]
    fn test_empty() {
        let s = AxisStats::from_values(std::iter::empty());
        assert!(s.mean.is_nan());
    }

    #[test]
    fn test_per_axis() {
        let stats = AxisStats::per_axis(&[[1.0, -1.0], [3.0, -3.0]]);
        assert_eq!(stats.len(), 2);
        assert_relative_eq!(stats[0].mean, 2.0);
        assert_relative_eq!(stats[1].min, -3.0);
        assert_relative_eq!(stats[1].std, 1.0);
    }
}
