//! Collections of variables
//!
//! [`VarArray`] and [`VarMatrix`] keep the handles returned by the array
//! factories of [`Modeler`](super::Modeler) together and turn them into
//! expressions: sums, scalar products, rows and columns.

use std::fmt;
use std::ops::Index;

use super::{LinearExpression, ModelError, VariableId};

/// An ordered collection of variables of one model
pub struct VarArray<Brand> {
    vars: Vec<VariableId<Brand>>,
}

impl<Brand> VarArray<Brand> {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn push(&mut self, var: VariableId<Brand>) {
        self.vars.push(var);
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<VariableId<Brand>> {
        self.vars.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = VariableId<Brand>> + '_ {
        self.vars.iter().copied()
    }

    pub fn as_slice(&self) -> &[VariableId<Brand>] {
        &self.vars
    }

    /// Sum of all variables
    pub fn sum(&self) -> LinearExpression<Brand> {
        self.iter().sum()
    }

    /// `coefficients[i] * self[i]` summed over the array
    pub fn scal_prod(&self, coefficients: &[f64]) -> Result<LinearExpression<Brand>, ModelError> {
        scal_prod(coefficients, self.iter())
    }
}

impl<Brand> Default for VarArray<Brand> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Brand> Clone for VarArray<Brand> {
    fn clone(&self) -> Self {
        Self {
            vars: self.vars.clone(),
        }
    }
}

impl<Brand> fmt::Debug for VarArray<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.vars.iter()).finish()
    }
}

impl<Brand> Index<usize> for VarArray<Brand> {
    type Output = VariableId<Brand>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vars[index]
    }
}

impl<Brand> FromIterator<VariableId<Brand>> for VarArray<Brand> {
    fn from_iter<I: IntoIterator<Item = VariableId<Brand>>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl<Brand> From<Vec<VariableId<Brand>>> for VarArray<Brand> {
    fn from(vars: Vec<VariableId<Brand>>) -> Self {
        Self { vars }
    }
}

impl<Brand> IntoIterator for VarArray<Brand> {
    type Item = VariableId<Brand>;
    type IntoIter = std::vec::IntoIter<VariableId<Brand>>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.into_iter()
    }
}

impl<'a, Brand> IntoIterator for &'a VarArray<Brand> {
    type Item = VariableId<Brand>;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, VariableId<Brand>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter().copied()
    }
}

/// A row-major `rows` x `cols` grid of variables
pub struct VarMatrix<Brand> {
    rows: usize,
    cols: usize,
    vars: Vec<VariableId<Brand>>,
}

impl<Brand> VarMatrix<Brand> {
    pub(crate) fn from_row_major(rows: usize, cols: usize, vars: Vec<VariableId<Brand>>) -> Self {
        debug_assert_eq!(vars.len(), rows * cols);
        Self { rows, cols, vars }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<VariableId<Brand>> {
        if row < self.rows && col < self.cols {
            self.vars.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// Variables of row `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below [`rows`](Self::rows).
    pub fn row(&self, i: usize) -> VarArray<Brand> {
        assert!(
            i < self.rows,
            "row {} out of bounds for a {}x{} matrix",
            i,
            self.rows,
            self.cols
        );
        self.vars[i * self.cols..(i + 1) * self.cols]
            .iter()
            .copied()
            .collect()
    }

    /// Variables of column `j`
    ///
    /// # Panics
    ///
    /// Panics if `j` is not below [`cols`](Self::cols).
    pub fn column(&self, j: usize) -> VarArray<Brand> {
        assert!(
            j < self.cols,
            "column {} out of bounds for a {}x{} matrix",
            j,
            self.rows,
            self.cols
        );
        (0..self.rows).map(|i| self.vars[i * self.cols + j]).collect()
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = VarArray<Brand>> + '_ {
        (0..self.rows).map(|i| self.row(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = VariableId<Brand>> + '_ {
        self.vars.iter().copied()
    }

    /// Sum of every variable in the matrix
    pub fn sum(&self) -> LinearExpression<Brand> {
        self.iter().sum()
    }
}

impl<Brand> Clone for VarMatrix<Brand> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            vars: self.vars.clone(),
        }
    }
}

impl<Brand> fmt::Debug for VarMatrix<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl<Brand> Index<(usize, usize)> for VarMatrix<Brand> {
    type Output = VariableId<Brand>;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for a {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.vars[row * self.cols + col]
    }
}

/// Sum of anything convertible into an expression
pub fn sum<Brand, T>(items: impl IntoIterator<Item = T>) -> LinearExpression<Brand>
where
    T: Into<LinearExpression<Brand>>,
{
    items
        .into_iter()
        .map(|item| -> LinearExpression<Brand> { item.into() })
        .sum()
}

/// Scalar product of coefficients and variables of equal length
pub fn scal_prod<Brand>(
    coefficients: &[f64],
    vars: impl IntoIterator<Item = VariableId<Brand>>,
) -> Result<LinearExpression<Brand>, ModelError> {
    let vars: Vec<_> = vars.into_iter().collect();
    if vars.len() != coefficients.len() {
        return Err(ModelError::DimensionMismatch {
            expected: vars.len(),
            found: coefficients.len(),
        });
    }

    let mut expression = LinearExpression::new(0.0);
    for (&coefficient, var) in coefficients.iter().zip(vars) {
        expression.add_term(coefficient, var);
    }
    Ok(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelError, VariableType};
    use crate::modeler;

    #[test]
    fn test_var_array_naming_and_access() {
        let mut model = modeler!();
        let xs = model.int_var_array(3, 0.0, 5.0, "x");

        assert_eq!(xs.len(), 3);
        assert!(!xs.is_empty());
        assert_eq!(model.variable_name(xs[1]), Some("x[1]".to_string()));
        assert_eq!(model.variable_type(xs[2]), Some(VariableType::Integer));
        assert_eq!(xs.get(3), None);
    }

    #[test]
    fn test_scal_prod() {
        let mut model = modeler!();
        let xs = model.num_var_array(3, 0.0, 1.0, "x");

        let expr = xs.scal_prod(&[1.0, 2.0, 3.0]).expect("lengths match");
        assert_eq!(expr.terms.len(), 3);
        assert_eq!(expr.evaluate(&[1.0, 1.0, 1.0]), Some(6.0));

        let err = xs.scal_prod(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DimensionMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_matrix_rows_and_columns() {
        let mut model = modeler!();
        let m = model.bool_var_matrix(2, 3, "y");

        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(model.variable_name(m[(1, 2)]), Some("y[1][2]".to_string()));
        assert_eq!(m.row(1).as_slice(), &[m[(1, 0)], m[(1, 1)], m[(1, 2)]]);
        assert_eq!(m.column(0).as_slice(), &[m[(0, 0)], m[(1, 0)]]);
        assert_eq!(m.iter_rows().count(), 2);
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.sum().terms.len(), 6);
    }

    #[test]
    #[should_panic(expected = "row 2 out of bounds for a 2x3 matrix")]
    fn test_matrix_row_out_of_bounds() {
        let mut model = modeler!();
        let m = model.bool_var_matrix(2, 3, "y");
        m.row(2);
    }

    #[test]
    #[should_panic(expected = "column 3 out of bounds for a 0x3 matrix")]
    fn test_matrix_column_out_of_bounds_on_empty_rows() {
        let mut model = modeler!();
        let m = model.bool_var_matrix(0, 3, "y");
        m.column(3);
    }

    #[test]
    fn test_free_sum_mixes_variables_and_expressions() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 1.0, "x");
        let y = model.num_var(0.0, 1.0, "y");

        let expr = sum([x.into(), 2.0 * y, LinearExpression::new(3.0)]);
        assert_eq!(expr.evaluate(&[1.0, 1.0]), Some(6.0));

        let collected: VarArray<_> = [x, y].into_iter().collect();
        assert_eq!(collected.sum().terms.len(), 2);
    }
}
