//! Derived-variable transforms

/// Prefix given to log-transformed variables
pub const LOG_PREFIX: &str = "log_";

/// Name of the log-transformed sibling of `source`
pub fn log_name(source: &str) -> String {
    format!("{}{}", LOG_PREFIX, source)
}

/// Natural log of every value, silently dropping non-finite results
///
/// Zero, negative and NaN inputs have no finite log and are filtered out,
/// so the output can be shorter than the input.
pub fn log_transform(data: &[f64]) -> Vec<f64> {
    data.iter()
        .map(|x| x.ln())
        .filter(|x| x.is_finite())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_name() {
        assert_eq!(log_name("mpg"), "log_mpg");
    }

    #[test]
    fn test_log_transform_drops_non_finite() {
        let out = log_transform(&[1.0, -1.0, std::f64::consts::E]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_transform_zero_and_nan() {
        let out = log_transform(&[0.0, f64::NAN, f64::INFINITY, 10.0]);
        assert_eq!(out.len(), 1);
        assert!((out[0] - 10f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_transform_empty() {
        assert!(log_transform(&[]).is_empty());
    }
}
