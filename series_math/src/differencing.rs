//! Differencing and its inverse
//!
//! `integrate` undoes `difference` for values that extend a known history,
//! which is how forecasts made on a differenced series are mapped back to
//! the original scale.

use crate::{MathError, Result};

/// Apply first differences `d` times
pub fn difference(values: &[f64], d: usize) -> Result<Vec<f64>> {
    if values.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Cannot difference {} values {} times",
            values.len(),
            d
        )));
    }

    let mut current = values.to_vec();
    for _ in 0..d {
        current = current.windows(2).map(|w| w[1] - w[0]).collect();
    }
    Ok(current)
}

/// Map values on the `d`-times differenced scale back onto the scale of
/// `history`, treating them as continuing right after its last element.
pub fn integrate(differenced: &[f64], history: &[f64], d: usize) -> Result<Vec<f64>> {
    if d == 0 {
        return Ok(differenced.to_vec());
    }
    if history.len() < d {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} historical values to undo {} differences, have {}",
            d,
            d,
            history.len()
        )));
    }

    // tails[k] is the last value of the k-times differenced history
    let mut tails = Vec::with_capacity(d);
    let mut level = history.to_vec();
    for _ in 0..d {
        tails.push(*level.last().ok_or_else(|| {
            MathError::CalculationError("Empty differencing level".to_string())
        })?);
        level = level.windows(2).map(|w| w[1] - w[0]).collect();
    }

    let mut out = Vec::with_capacity(differenced.len());
    for &step in differenced {
        let mut carry = step;
        for tail in tails.iter_mut().rev() {
            carry += *tail;
            *tail = carry;
        }
        out.push(carry);
    }
    Ok(out)
}

/// Natural log of every value; all values must be strictly positive
pub fn log_transform(values: &[f64]) -> Result<Vec<f64>> {
    if let Some(pos) = values.iter().position(|v| !v.is_finite() || *v <= 0.0) {
        return Err(MathError::InvalidInput(format!(
            "Log transform requires positive values, found {} at position {}",
            values[pos], pos
        )));
    }
    Ok(values.iter().map(|v| v.ln()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_second_difference() {
        let values = [1.0, 4.0, 9.0, 16.0];
        assert_eq!(difference(&values, 1).unwrap(), vec![3.0, 5.0, 7.0]);
        assert_eq!(difference(&values, 2).unwrap(), vec![2.0, 2.0]);
        assert_eq!(difference(&values, 0).unwrap(), values.to_vec());
    }

    #[test]
    fn test_difference_too_short() {
        assert!(difference(&[1.0, 2.0], 2).is_err());
    }

    #[test]
    fn test_integrate_inverts_difference() {
        let values = [1.0, 4.0, 9.0, 16.0, 25.0, 36.0];
        let d2 = difference(&values, 2).unwrap();
        let rebuilt = integrate(&d2[2..], &values[..4], 2).unwrap();
        assert_eq!(rebuilt, vec![25.0, 36.0]);
    }

    #[test]
    fn test_log_transform_rejects_zero() {
        assert!(log_transform(&[1.0, 0.0]).is_err());
        assert!(log_transform(&[1.0, f64::NAN]).is_err());
        let out = log_transform(&[1.0, std::f64::consts::E]).unwrap();
        assert!((out[1] - 1.0).abs() < 1e-12);
    }
}
