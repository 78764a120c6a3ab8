//! Ordinary least squares for the small regressions in ARIMA estimation

/// Solve `min ||X b - y||` through the normal equations.
///
/// Returns `None` when `X'X` is singular or the system is underdetermined.
pub(crate) fn least_squares(design: &[Vec<f64>], target: &[f64]) -> Option<Vec<f64>> {
    let k = design.first()?.len();
    if k == 0 || design.len() < k || design.len() != target.len() {
        return None;
    }

    // Augmented [X'X | X'y]
    let mut a = vec![vec![0.0; k + 1]; k];
    for (row, &y) in design.iter().zip(target) {
        for i in 0..k {
            for j in 0..k {
                a[i][j] += row[i] * row[j];
            }
            a[i][k] += row[i] * y;
        }
    }

    // Pivot tolerance is relative to the largest diagonal entry
    let scale = (0..k).map(|i| a[i][i].abs()).fold(0.0, f64::max);
    for col in 0..k {
        let pivot = (col..k).max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))?;
        if a[pivot][col].abs() <= 1e-12 * scale {
            return None;
        }
        a.swap(col, pivot);

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for j in col..=k {
                a[row][j] -= factor * a[col][j];
            }
        }
    }

    let solution: Vec<f64> = (0..k).map(|i| a[i][k] / a[i][i]).collect();
    solution.iter().all(|v| v.is_finite()).then_some(solution)
}
