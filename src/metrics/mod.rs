//! Classification metrics for evaluating candidate models.

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use corazon::metrics::accuracy;
///
/// let y_true = vec![0, 1, 1, 0];
/// let y_pred = vec![0, 1, 0, 0];
/// assert!((accuracy(&y_pred, &y_true) - 0.75).abs() < 1e-6);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    correct as f32 / y_true.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_perfect() {
        assert_eq!(accuracy(&[0, 1, 1], &[0, 1, 1]), 1.0);
    }

    #[test]
    fn test_accuracy_none_correct() {
        assert_eq!(accuracy(&[1, 0], &[0, 1]), 0.0);
    }

    #[test]
    fn test_accuracy_partial() {
        assert!((accuracy(&[0, 0, 1, 1], &[0, 1, 1, 1]) - 0.75).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_accuracy_length_mismatch_panics() {
        accuracy(&[0], &[0, 1]);
    }
}
