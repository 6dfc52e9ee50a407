use crate::error::EnvError;

/// Checks an action against the contract: `expected` components, each in
/// [-1, 1]. NaN is out of range.
pub(crate) fn validate_action(action: &[f64], expected: usize) -> Result<(), EnvError> {
    if action.len() != expected {
        return Err(EnvError::ActionLength {
            expected,
            actual: action.len(),
        });
    }
    match action
        .iter()
        .enumerate()
        .find(|(_, v)| !(-1.0..=1.0).contains(*v))
    {
        Some((index, &value)) => Err(EnvError::ActionOutOfRange { index, value }),
        None => Ok(()),
    }
}

/// Looks up a categorical action in a fixed table.
pub(crate) fn categorical_from_table(table: &[&[f64]], index: usize) -> Result<Vec<f64>, EnvError> {
    table
        .get(index)
        .map(|action| action.to_vec())
        .ok_or(EnvError::InvalidCategoricalAction {
            index,
            count: table.len(),
        })
}

pub(crate) fn clamp_unit<const N: usize>(values: [f64; N]) -> Vec<f64> {
    values.iter().map(|v| v.clamp(-1.0, 1.0)).collect()
}

/// Uniform sample in `[-max, max)`.
pub(crate) fn symmetric(rng: &mut fastrand::Rng, max: f64) -> f64 {
    (rng.f64() * 2.0 - 1.0) * max
}

/// Rejects settings values that must be strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), EnvError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EnvError::InvalidSettings(format!("{name} must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert_eq!(validate_action(&[-1.0, 0.0, 1.0], 3), Ok(()));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            validate_action(&[0.0], 2),
            Err(EnvError::ActionLength { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn rejects_first_out_of_range_component() {
        assert_eq!(
            validate_action(&[0.5, 1.01, -3.0], 3),
            Err(EnvError::ActionOutOfRange { index: 1, value: 1.01 })
        );
        assert!(matches!(
            validate_action(&[f64::NAN], 1),
            Err(EnvError::ActionOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn clamps_each_value() {
        assert_eq!(clamp_unit([-2.0, 0.25, 7.0]), vec![-1.0, 0.25, 1.0]);
    }

    #[test]
    fn symmetric_samples_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let v = symmetric(&mut rng, 0.3);
            assert!((-0.3..0.3).contains(&v));
        }
    }
}
