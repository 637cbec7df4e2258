//! Direct solution of linear systems by Gaussian elimination.
//!
//! The solver takes an augmented matrix of shape K x (K+1) and eliminates
//! with full pivoting: at every step the largest remaining element by
//! absolute value is swapped into the pivot position, which keeps the
//! elimination stable on poorly scaled systems.

use thiserror::Error;

use crate::scalar::Scalar;
use crate::vector::{Matrix, Vector};

pub type LinalgResult<T> = Result<T, LinalgError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    /// The input is not an augmented K x (K+1) system.
    #[error("expected an augmented K x (K+1) system, got {rows} x {cols}")]
    BadShape { rows: usize, cols: usize },

    /// No nonzero pivot remained at the given elimination step.
    #[error("singular system: no nonzero pivot at elimination step {step}")]
    Singular { step: usize },

    /// Solution length does not match the system when computing residuals.
    #[error("solution has {got} values, system needs {expected}")]
    SolutionSizeMismatch { expected: usize, got: usize },
}

/// Outcome of [`solve`]: the unknowns in their original order plus the
/// upper-triangular system the elimination produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub values: Vector,
    pub echelon: Matrix,
}

/// Solves the augmented system `[A | b]` for `x` with `A x = b`.
///
/// # Errors
///
/// [`LinalgError::BadShape`] if the matrix is not K x (K+1) with K >= 1,
/// [`LinalgError::Singular`] if elimination runs out of nonzero pivots.
pub fn solve(system: &Matrix) -> LinalgResult<Solution> {
    let n = system.row_count();
    if n == 0 || system.col_count() != n + 1 {
        return Err(LinalgError::BadShape {
            rows: n,
            cols: system.col_count(),
        });
    }

    let mut rows: Vec<Vector> = system.rows().cloned().collect();
    // Full pivoting permutes columns; col_order[j] is the original index of
    // the unknown now sitting in column j.
    let mut col_order: Vec<usize> = (0..n).collect();

    for step in 0..n {
        let (pivot_row, pivot_col) = find_pivot(&rows, step, n);
        if rows[pivot_row][pivot_col].is_zero() {
            return Err(LinalgError::Singular { step });
        }
        rows.swap(step, pivot_row);
        if pivot_col != step {
            for row in rows.iter_mut() {
                let tmp = row[step].clone();
                row[step] = row[pivot_col].clone();
                row[pivot_col] = tmp;
            }
            col_order.swap(step, pivot_col);
        }

        let pivot = rows[step][step].clone();
        for r in step + 1..n {
            let factor = &rows[r][step] / &pivot;
            for c in step..=n {
                let updated = &rows[r][c] - &(&factor * &rows[step][c]);
                rows[r][c] = updated;
            }
            // Eliminate rounding residue below the pivot.
            rows[r][step] = Scalar::zero();
        }
    }

    // Back substitution over the permuted unknowns.
    let mut permuted = vec![Scalar::zero(); n];
    for i in (0..n).rev() {
        let mut acc = rows[i][n].clone();
        for j in i + 1..n {
            acc = acc - &rows[i][j] * &permuted[j];
        }
        permuted[i] = acc / &rows[i][i];
    }

    let mut values = Vector::zeros(n);
    for (j, x) in permuted.into_iter().enumerate() {
        values[col_order[j]] = x;
    }

    Ok(Solution {
        values,
        echelon: Matrix::new(rows),
    })
}

/// Per-row absolute residuals `|b - A x|` of a candidate solution.
///
/// # Errors
///
/// [`LinalgError::BadShape`] for a non-augmented system,
/// [`LinalgError::SolutionSizeMismatch`] if `solution` has the wrong length.
pub fn residuals(system: &Matrix, solution: &Vector) -> LinalgResult<Vector> {
    let n = system.row_count();
    if n == 0 || system.col_count() != n + 1 {
        return Err(LinalgError::BadShape {
            rows: n,
            cols: system.col_count(),
        });
    }
    if solution.len() != n {
        return Err(LinalgError::SolutionSizeMismatch {
            expected: n,
            got: solution.len(),
        });
    }

    let mut out = Vector::zeros(n);
    for (i, row) in system.rows().enumerate() {
        let mut acc = row[n].clone();
        for j in 0..n {
            acc = acc - &row[j] * &solution[j];
        }
        out[i] = acc.abs();
    }
    Ok(out)
}

/// Largest element by absolute value in the trailing submatrix.
fn find_pivot(rows: &[Vector], step: usize, n: usize) -> (usize, usize) {
    let mut best = (step, step);
    let mut best_abs = rows[step][step].abs();
    for (r, row) in rows.iter().enumerate().take(n).skip(step) {
        for c in step..n {
            let a = row[c].abs();
            if a > best_abs {
                best_abs = a;
                best = (r, c);
            }
        }
    }
    best
}
