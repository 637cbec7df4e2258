//! Multivariate equations and systems for the Newton solver.

use std::rc::Rc;

use crate::equation::EquationResult;
use crate::scalar::Scalar;
use crate::vector::Vector;

/// Shared closure type for multivariate functions and their partials.
pub type MultiFn = Rc<dyn Fn(&Vector) -> EquationResult<Scalar>>;

/// Default forward-difference step exponent: step = 10^-10.
const DEFAULT_STEP_PRECISION: u32 = 10;

/// A scalar-valued function of several variables.
///
/// Partial derivatives come from user closures when supplied via
/// [`with_partials`](Self::with_partials), otherwise from a forward finite
/// difference on the requested argument.
#[derive(Clone)]
pub struct MultiEquation {
    function: MultiFn,
    partials: Option<Vec<MultiFn>>,
    step_precision: u32,
}

impl MultiEquation {
    pub fn new(f: impl Fn(&Vector) -> EquationResult<Scalar> + 'static) -> Self {
        MultiEquation {
            function: Rc::new(f),
            partials: None,
            step_precision: DEFAULT_STEP_PRECISION,
        }
    }

    /// Supplies analytic partial derivatives, one closure per argument.
    pub fn with_partials(mut self, partials: Vec<MultiFn>) -> Self {
        self.partials = Some(partials);
        self
    }

    /// Sets the finite-difference step to `10^-p`.
    pub fn with_step_precision(mut self, p: u32) -> Self {
        self.step_precision = p;
        self
    }

    pub fn value(&self, args: &Vector) -> EquationResult<Scalar> {
        (self.function)(args)
    }

    /// Partial derivative with respect to argument `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a valid argument index.
    pub fn partial(&self, args: &Vector, i: usize) -> EquationResult<Scalar> {
        assert!(i < args.len(), "partial index {i} out of {} arguments", args.len());
        if let Some(partials) = &self.partials {
            return partials[i](args);
        }
        let h = Scalar::exp10(-(self.step_precision as i32));
        let mut shifted = args.clone();
        shifted[i] = &shifted[i] + &h;
        let ahead = (self.function)(&shifted)?;
        let here = (self.function)(args)?;
        Ok((ahead - here) / h)
    }
}

impl std::fmt::Debug for MultiEquation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiEquation")
            .field("partials", &self.partials.as_ref().map(Vec::len))
            .field("step_precision", &self.step_precision)
            .finish()
    }
}

/// An ordered collection of [`MultiEquation`]s, one per unknown.
#[derive(Debug, Clone, Default)]
pub struct EquationSystem {
    equations: Vec<MultiEquation>,
}

impl EquationSystem {
    pub fn new(equations: Vec<MultiEquation>) -> Self {
        EquationSystem { equations }
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MultiEquation> {
        self.equations.iter()
    }

    /// Evaluates every equation at `args`.
    pub fn values(&self, args: &Vector) -> EquationResult<Vector> {
        self.equations.iter().map(|eq| eq.value(args)).collect()
    }
}

impl std::ops::Index<usize> for EquationSystem {
    type Output = MultiEquation;

    fn index(&self, i: usize) -> &MultiEquation {
        &self.equations[i]
    }
}
