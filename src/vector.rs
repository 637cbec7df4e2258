//! Fixed-size vectors and row-major matrices of [`Scalar`] values.
//!
//! These are deliberately small: just what Gaussian elimination, the
//! multivariate Newton solver and least-squares fitting need. Elementwise
//! operations on size-mismatched vectors are programmer errors and panic.

use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};
use std::str::FromStr;

use crate::scalar::{ParseScalarError, Scalar};

/// An ordered sequence of [`Scalar`] values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    elements: Vec<Scalar>,
}

impl Vector {
    pub fn new(elements: Vec<Scalar>) -> Self {
        Vector { elements }
    }

    pub fn zeros(len: usize) -> Self {
        Vector {
            elements: vec![Scalar::zero(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scalar> {
        self.elements.iter()
    }

    /// Removes and returns the element at `i`, shrinking the vector.
    ///
    /// This is the only size-changing operation; outlier exclusion in least
    /// squares uses it to drop a sample.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn remove(&mut self, i: usize) -> Scalar {
        self.elements.remove(i)
    }

    pub fn abs(&self) -> Vector {
        self.elements.iter().map(Scalar::abs).collect()
    }

    /// Largest absolute value among the elements. Zero for an empty vector.
    pub fn max_abs(&self) -> Scalar {
        let mut best = Scalar::zero();
        for e in &self.elements {
            let a = e.abs();
            if a > best {
                best = a;
            }
        }
        best
    }

    /// Index of the element with the largest value, or `None` when empty.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, e) in self.elements.iter().enumerate() {
            match best {
                Some(b) if self.elements[b] >= *e => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Space-separated beautified rendering, matching [`Scalar::beautify`].
    pub fn beautify(&self) -> String {
        self.elements
            .iter()
            .map(Scalar::beautify)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn assert_same_len(&self, other: &Vector, op: &str) {
        assert_eq!(
            self.len(),
            other.len(),
            "elementwise {op} on vectors of size {} and {}",
            self.len(),
            other.len()
        );
    }
}

impl FromIterator<Scalar> for Vector {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        Vector {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Index<usize> for Vector {
    type Output = Scalar;

    fn index(&self, i: usize) -> &Scalar {
        &self.elements[i]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, i: usize) -> &mut Scalar {
        &mut self.elements[i]
    }
}

impl FromStr for Vector {
    type Err = ParseScalarError;

    /// Parses a whitespace-separated line of numbers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(Scalar::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Vector::new)
    }
}

impl Add<&Vector> for &Vector {
    type Output = Vector;

    fn add(self, rhs: &Vector) -> Vector {
        self.assert_same_len(rhs, "add");
        self.iter().zip(rhs.iter()).map(|(a, b)| a + b).collect()
    }
}

impl Sub<&Vector> for &Vector {
    type Output = Vector;

    fn sub(self, rhs: &Vector) -> Vector {
        self.assert_same_len(rhs, "sub");
        self.iter().zip(rhs.iter()).map(|(a, b)| a - b).collect()
    }
}

impl Mul<&Scalar> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: &Scalar) -> Vector {
        self.iter().map(|a| a * rhs).collect()
    }
}

impl Div<&Scalar> for &Vector {
    type Output = Vector;

    fn div(self, rhs: &Scalar) -> Vector {
        self.iter().map(|a| a / rhs).collect()
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.iter().map(|a| -a).collect()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.beautify())
    }
}

/// Ordered rows of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: Vec<Vector>,
}

impl Matrix {
    /// # Panics
    ///
    /// Panics if the rows are not all the same length.
    pub fn new(rows: Vec<Vector>) -> Self {
        if let Some(first) = rows.first() {
            let width = first.len();
            for (i, row) in rows.iter().enumerate() {
                assert_eq!(
                    row.len(),
                    width,
                    "row {i} has {} elements, expected {width}",
                    row.len()
                );
            }
        }
        Matrix { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vector::len)
    }

    pub fn rows(&self) -> std::slice::Iter<'_, Vector> {
        self.rows.iter()
    }
}

impl Index<usize> for Matrix {
    type Output = Vector;

    fn index(&self, i: usize) -> &Vector {
        &self.rows[i]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, i: usize) -> &mut Vector {
        &mut self.rows[i]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(line: &str) -> Vector {
        line.parse().unwrap()
    }

    #[test]
    fn test_parse_line() {
        let parsed = v("1 2,5 -3");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1], "2.5".parse().unwrap());
        assert_eq!(parsed[2], Scalar::from(-3));
    }

    #[test]
    fn test_parse_rejects_bad_element() {
        assert!("1 two 3".parse::<Vector>().is_err());
    }

    #[test]
    fn test_elementwise_arithmetic() {
        let a = v("1 2 3");
        let b = v("0.5 0.5 0.5");
        assert_eq!(&a + &b, v("1.5 2.5 3.5"));
        assert_eq!(&a - &b, v("0.5 1.5 2.5"));
        assert_eq!(&a * &Scalar::from(2), v("2 4 6"));
        assert_eq!(-&a, v("-1 -2 -3"));
    }

    #[test]
    #[should_panic(expected = "elementwise add")]
    fn test_size_mismatch_panics() {
        let _ = &v("1 2") + &v("1 2 3");
    }

    #[test]
    fn test_remove_shrinks() {
        let mut a = v("1 2 3");
        let taken = a.remove(1);
        assert_eq!(taken, Scalar::from(2));
        assert_eq!(a, v("1 3"));
    }

    #[test]
    fn test_max_abs_and_argmax() {
        let a = v("1 -7 3");
        assert_eq!(a.max_abs(), Scalar::from(7));
        assert_eq!(a.argmax(), Some(2));
        assert_eq!(Vector::default().argmax(), None);
    }

    #[test]
    fn test_beautify() {
        assert_eq!(v("1.50 0 -2").beautify(), "1.5 0 -2");
    }

    #[test]
    #[should_panic(expected = "row 1")]
    fn test_ragged_matrix_panics() {
        let _ = Matrix::new(vec![v("1 2"), v("1 2 3")]);
    }

    #[test]
    fn test_matrix_shape() {
        let m = Matrix::new(vec![v("1 2 3"), v("4 5 6")]);
        assert_eq!(m.row_count(), 2);
        assert_eq!(m.col_count(), 3);
        assert_eq!(m[1][2], Scalar::from(6));
    }
}
