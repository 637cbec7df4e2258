//! Least-squares approximation over small fixed basis families.
//!
//! An [`Approximator`] fits its basis to `(x, y)` samples by assembling the
//! normal equations and solving them with [`linalg::solve`]. The logarithmic
//! family first shifts the abscissae so the smallest one maps to 1, which
//! keeps the logarithm defined on arbitrary sample ranges; the shift is
//! remembered and applied by `predict` as well.

use thiserror::Error;

use crate::equation::EquationError;
use crate::linalg::{self, LinalgError};
use crate::scalar::Scalar;
use crate::vector::{Matrix, Vector};

pub type ApproxResult<T> = Result<T, ApproxError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApproxError {
    #[error("sample sizes differ: {xs} abscissae, {ys} ordinates")]
    SizeMismatch { xs: usize, ys: usize },

    /// Fewer samples than basis functions leave the fit underdetermined.
    #[error("basis of size {basis} needs at least that many samples, got {got}")]
    TooFewSamples { basis: usize, got: usize },

    #[error("predict called before fit")]
    NotFitted,

    #[error(transparent)]
    Equation(#[from] EquationError),

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Basis family selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisKind {
    /// `a`
    Constant,
    /// `a x + b`
    Linear,
    /// `a x^2`
    LimitedSquare,
    /// `a x^2 + b x + c`
    Square,
    /// `a ln x + b`, with automatic shift-to-positive of the sample range.
    Logarithmic,
    /// `a sin x + b`
    Trigonometric,
}

impl BasisKind {
    /// Number of basis functions, hence of fitted coefficients.
    pub fn size(&self) -> usize {
        match self {
            BasisKind::Constant | BasisKind::LimitedSquare => 1,
            BasisKind::Linear | BasisKind::Logarithmic | BasisKind::Trigonometric => 2,
            BasisKind::Square => 3,
        }
    }
}

/// A least-squares model over one of the [`BasisKind`] families.
#[derive(Debug, Clone, PartialEq)]
pub struct Approximator {
    kind: BasisKind,
    coefficients: Option<Vector>,
    shift: Scalar,
}

impl Approximator {
    pub fn new(kind: BasisKind) -> Self {
        Approximator {
            kind,
            coefficients: None,
            shift: Scalar::zero(),
        }
    }

    pub fn kind(&self) -> BasisKind {
        self.kind
    }

    /// Fitted coefficients, in the order the basis lists them.
    pub fn coefficients(&self) -> Option<&Vector> {
        self.coefficients.as_ref()
    }

    /// Fits the basis to the samples via the normal equations.
    ///
    /// # Errors
    ///
    /// [`ApproxError::SizeMismatch`] and [`ApproxError::TooFewSamples`] on
    /// degenerate input, [`ApproxError::Linalg`] when the normal equations
    /// are singular (all abscissae equal, for instance).
    pub fn fit(&mut self, xs: &Vector, ys: &Vector) -> ApproxResult<()> {
        if xs.len() != ys.len() {
            return Err(ApproxError::SizeMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        let k = self.kind.size();
        if xs.len() < k {
            return Err(ApproxError::TooFewSamples {
                basis: k,
                got: xs.len(),
            });
        }

        self.shift = match self.kind {
            BasisKind::Logarithmic => logarithmic_shift(xs),
            _ => Scalar::zero(),
        };

        // Normal equations: sum over samples of d_p d_q, augmented with
        // sum of d_p y.
        let mut rows: Vec<Vector> = (0..k).map(|_| Vector::zeros(k + 1)).collect();
        for i in 0..xs.len() {
            let d = self.basis_row(&xs[i])?;
            for p in 0..k {
                for q in 0..k {
                    let acc = &rows[p][q] + &(&d[p] * &d[q]);
                    rows[p][q] = acc;
                }
                let augmented = &rows[p][k] + &(&d[p] * &ys[i]);
                rows[p][k] = augmented;
            }
        }
        let solution = linalg::solve(&Matrix::new(rows))?;
        self.coefficients = Some(solution.values);
        Ok(())
    }

    /// Evaluates the fitted model.
    ///
    /// # Errors
    ///
    /// [`ApproxError::NotFitted`] before a successful [`fit`](Self::fit).
    pub fn predict(&self, x: &Scalar) -> ApproxResult<Scalar> {
        let coefficients = self.coefficients.as_ref().ok_or(ApproxError::NotFitted)?;
        let d = self.basis_row(x)?;
        let mut acc = Scalar::zero();
        for (c, b) in coefficients.iter().zip(d.iter()) {
            acc = acc + c * b;
        }
        Ok(acc)
    }

    /// Per-sample squared errors of the fitted model.
    pub fn errors(&self, xs: &Vector, ys: &Vector) -> ApproxResult<Vector> {
        if xs.len() != ys.len() {
            return Err(ApproxError::SizeMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        let mut out = Vector::zeros(xs.len());
        for i in 0..xs.len() {
            let diff = self.predict(&xs[i])? - &ys[i];
            out[i] = &diff * &diff;
        }
        Ok(out)
    }

    /// Fits, drops the worst sample and refits.
    ///
    /// Returns the excluded sample's index in the original data along with
    /// the squared errors of the refitted model on the remaining samples.
    pub fn fit_and_exclude(&mut self, xs: &Vector, ys: &Vector) -> ApproxResult<(usize, Vector)> {
        self.fit(xs, ys)?;
        let first_errors = self.errors(xs, ys)?;
        let worst = match first_errors.argmax() {
            Some(i) => i,
            None => return Err(ApproxError::TooFewSamples {
                basis: self.kind.size(),
                got: 0,
            }),
        };
        let mut kept_xs = xs.clone();
        let mut kept_ys = ys.clone();
        kept_xs.remove(worst);
        kept_ys.remove(worst);
        self.fit(&kept_xs, &kept_ys)?;
        let errors = self.errors(&kept_xs, &kept_ys)?;
        Ok((worst, errors))
    }

    /// Basis functions evaluated at `x`, in coefficient order.
    fn basis_row(&self, x: &Scalar) -> ApproxResult<Vec<Scalar>> {
        Ok(match self.kind {
            BasisKind::Constant => vec![Scalar::one()],
            BasisKind::Linear => vec![x.clone(), Scalar::one()],
            BasisKind::LimitedSquare => vec![x * x],
            BasisKind::Square => vec![x * x, x.clone(), Scalar::one()],
            BasisKind::Logarithmic => {
                let shifted = x + &self.shift;
                if !shifted.is_positive() {
                    return Err(EquationError::UndefinedAt { x: x.clone() }.into());
                }
                vec![shifted.ln(), Scalar::one()]
            }
            BasisKind::Trigonometric => vec![x.sin(), Scalar::one()],
        })
    }
}

/// Shift making the smallest abscissa equal to 1, or zero when the samples
/// are already safely positive.
fn logarithmic_shift(xs: &Vector) -> Scalar {
    let mut smallest: Option<&Scalar> = None;
    for x in xs {
        match smallest {
            Some(m) if *m <= *x => {}
            _ => smallest = Some(x),
        }
    }
    match smallest {
        Some(m) if (m - Scalar::one()).is_negative() => Scalar::one() - m,
        _ => Scalar::zero(),
    }
}
