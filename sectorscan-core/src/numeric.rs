//! Small numeric helpers shared by the scoring stages.

/// Round to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Mean of the present values, or `default` when none are present.
pub fn mean_or<I>(values: I, default: f64) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        default
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(4.8, 1), 4.8);
        assert_eq!(round_to(2.25, 0), 2.0);
        assert_eq!(round_to(-1.006, 2), -1.01);
    }

    #[test]
    fn mean_ignores_missing() {
        assert_eq!(mean_or([Some(10.0), None, Some(30.0)], 50.0), 20.0);
    }

    #[test]
    fn mean_defaults_when_all_missing() {
        assert_eq!(mean_or([None, None], 50.0), 50.0);
        assert_eq!(mean_or(Vec::<Option<f64>>::new(), 50.0), 50.0);
    }
}
