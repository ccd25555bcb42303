//! Normal probability plot
//!
//! Each variable panel shows its finite values, sorted, against the standard
//! normal quantiles at Blom plotting positions `(i - 3/8) / (n + 1/4)`.
//! A straight line means the variable looks normally distributed; the log
//! transform exists to straighten right-skewed ones.

use serde::{Deserialize, Serialize};

use crate::summary::SummaryStats;

/// One point of a normal probability plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// Standard normal quantile
    pub theoretical: f64,
    /// Observed value
    pub observed: f64,
}

/// Data behind a distribution panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalPlot {
    pub points: Vec<PlotPoint>,
    pub summary: SummaryStats,
}

impl NormalPlot {
    pub fn from_data(data: &[f64]) -> Self {
        let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let points = sorted
            .iter()
            .enumerate()
            .map(|(i, &observed)| {
                let p = (i as f64 + 1.0 - 0.375) / (n + 0.25);
                PlotPoint {
                    theoretical: normal_quantile(p),
                    observed,
                }
            })
            .collect();

        Self {
            points,
            summary: SummaryStats::from_data(data),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Inverse of the standard normal CDF
///
/// Acklam's rational approximation, relative error below 1.15e-9.
/// Returns ±infinity at 0 and 1 and NaN outside [0, 1].
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}
