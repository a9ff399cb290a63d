//! Operator overloading for model expressions
//!
//! This module provides operator overloading for building linear expressions
//! using natural mathematical notation.
//!
//! # Expression Building
//!
//! Variables and expressions support natural arithmetic operators:
//!
//! ```rust
//! use modeler::modeler;
//! use modeler::model::LinearExpression;
//!
//! let mut model = modeler!();
//! let x = model.num_var(0.0, 10.0, "x");
//! let y = model.num_var(0.0, 10.0, "y");
//!
//! let expr1 = x + y;             // Addition
//! let expr2 = x - y;             // Subtraction
//! let expr3 = 2.0 * x;           // Scalar multiplication (left)
//! let expr4 = x * 2.0;           // Scalar multiplication (right)
//! let expr5 = x + 2.0 * y + 5.0; // Mixed expressions
//! let expr6 = (x + y) * 3.0;     // Parentheses work
//! let expr7 = -(x - y) / 2.0;    // Negation and division
//!
//! let mut acc = LinearExpression::default();
//! acc += x;
//! acc -= 3.0 * y;
//! let total: LinearExpression<_> = [x, y].into_iter().sum();
//! # let _ = (expr1, expr2, expr3, expr4, expr5, expr6, expr7, acc, total);
//! ```
//!
//! # Type Safety
//!
//! All operations maintain the brand type parameter, ensuring variables from different
//! models cannot be accidentally mixed.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{LinearExpression, LinearTerm, VariableId};

// ============================================================================
// Operators for LinearExpression
// ============================================================================

impl<Brand> Add<LinearExpression<Brand>> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn add(self, other: LinearExpression<Brand>) -> Self::Output {
        let mut terms = self.terms;
        terms.extend(other.terms);
        LinearExpression {
            terms,
            constant: self.constant + other.constant,
        }
    }
}

impl<Brand> Add<VariableId<Brand>> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn add(mut self, other: VariableId<Brand>) -> Self::Output {
        self.add_term(1.0, other);
        self
    }
}

impl<Brand> Add<f64> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn add(self, other: f64) -> Self::Output {
        LinearExpression {
            terms: self.terms,
            constant: self.constant + other,
        }
    }
}

impl<Brand> Sub<LinearExpression<Brand>> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn sub(self, other: LinearExpression<Brand>) -> Self::Output {
        self + (-other)
    }
}

impl<Brand> Sub<VariableId<Brand>> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn sub(mut self, other: VariableId<Brand>) -> Self::Output {
        self.add_term(-1.0, other);
        self
    }
}

impl<Brand> Sub<f64> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn sub(self, other: f64) -> Self::Output {
        LinearExpression {
            terms: self.terms,
            constant: self.constant - other,
        }
    }
}

impl<Brand> Mul<f64> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn mul(self, other: f64) -> Self::Output {
        LinearExpression {
            terms: self
                .terms
                .into_iter()
                .map(|term| LinearTerm {
                    coefficient: term.coefficient * other,
                    variable: term.variable,
                })
                .collect(),
            constant: self.constant * other,
        }
    }
}

impl<Brand> Mul<LinearExpression<Brand>> for f64 {
    type Output = LinearExpression<Brand>;

    fn mul(self, other: LinearExpression<Brand>) -> Self::Output {
        other * self
    }
}

impl<Brand> Div<f64> for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn div(self, other: f64) -> Self::Output {
        self * other.recip()
    }
}

impl<Brand> Neg for LinearExpression<Brand> {
    type Output = LinearExpression<Brand>;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

impl<Brand> AddAssign<LinearExpression<Brand>> for LinearExpression<Brand> {
    fn add_assign(&mut self, other: LinearExpression<Brand>) {
        self.terms.extend(other.terms);
        self.constant += other.constant;
    }
}

impl<Brand> AddAssign<VariableId<Brand>> for LinearExpression<Brand> {
    fn add_assign(&mut self, other: VariableId<Brand>) {
        self.add_term(1.0, other);
    }
}

impl<Brand> AddAssign<f64> for LinearExpression<Brand> {
    fn add_assign(&mut self, other: f64) {
        self.constant += other;
    }
}

impl<Brand> SubAssign<LinearExpression<Brand>> for LinearExpression<Brand> {
    fn sub_assign(&mut self, other: LinearExpression<Brand>) {
        *self += -other;
    }
}

impl<Brand> SubAssign<VariableId<Brand>> for LinearExpression<Brand> {
    fn sub_assign(&mut self, other: VariableId<Brand>) {
        self.add_term(-1.0, other);
    }
}

impl<Brand> SubAssign<f64> for LinearExpression<Brand> {
    fn sub_assign(&mut self, other: f64) {
        self.constant -= other;
    }
}

impl<Brand> MulAssign<f64> for LinearExpression<Brand> {
    fn mul_assign(&mut self, other: f64) {
        for term in &mut self.terms {
            term.coefficient *= other;
        }
        self.constant *= other;
    }
}

impl<Brand> Sum<LinearExpression<Brand>> for LinearExpression<Brand> {
    fn sum<I: Iterator<Item = LinearExpression<Brand>>>(iter: I) -> Self {
        iter.fold(LinearExpression::new(0.0), |acc, expr| acc + expr)
    }
}

impl<Brand> Sum<VariableId<Brand>> for LinearExpression<Brand> {
    fn sum<I: Iterator<Item = VariableId<Brand>>>(iter: I) -> Self {
        iter.fold(LinearExpression::new(0.0), |acc, var| acc + var)
    }
}

// ============================================================================
// Operators for VariableId
// ============================================================================

impl<Brand> Add<LinearExpression<Brand>> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn add(self, other: LinearExpression<Brand>) -> Self::Output {
        LinearExpression::from_variable(self) + other
    }
}

impl<Brand> Add<VariableId<Brand>> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn add(self, other: VariableId<Brand>) -> Self::Output {
        LinearExpression::from_variable(self) + other
    }
}

impl<Brand> Add<f64> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn add(self, other: f64) -> Self::Output {
        LinearExpression::from_variable(self) + other
    }
}

impl<Brand> Sub<VariableId<Brand>> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn sub(self, other: VariableId<Brand>) -> Self::Output {
        LinearExpression::from_variable(self) - other
    }
}

impl<Brand> Sub<LinearExpression<Brand>> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn sub(self, other: LinearExpression<Brand>) -> Self::Output {
        LinearExpression::from_variable(self) - other
    }
}

impl<Brand> Sub<f64> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn sub(self, other: f64) -> Self::Output {
        LinearExpression::from_variable(self) - other
    }
}

impl<Brand> Mul<f64> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn mul(self, other: f64) -> Self::Output {
        LinearExpression {
            terms: vec![LinearTerm {
                coefficient: other,
                variable: self,
            }],
            constant: 0.0,
        }
    }
}

impl<Brand> Mul<VariableId<Brand>> for f64 {
    type Output = LinearExpression<Brand>;

    fn mul(self, other: VariableId<Brand>) -> Self::Output {
        other * self
    }
}

impl<Brand> Div<f64> for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn div(self, other: f64) -> Self::Output {
        self * other.recip()
    }
}

impl<Brand> Neg for VariableId<Brand> {
    type Output = LinearExpression<Brand>;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

// ============================================================================
// Reverse operators for f64
// ============================================================================

impl<Brand> Add<VariableId<Brand>> for f64 {
    type Output = LinearExpression<Brand>;

    fn add(self, other: VariableId<Brand>) -> Self::Output {
        LinearExpression::from_variable(other) + self
    }
}

impl<Brand> Add<LinearExpression<Brand>> for f64 {
    type Output = LinearExpression<Brand>;

    fn add(self, other: LinearExpression<Brand>) -> Self::Output {
        other + self
    }
}

impl<Brand> Sub<VariableId<Brand>> for f64 {
    type Output = LinearExpression<Brand>;

    fn sub(self, other: VariableId<Brand>) -> Self::Output {
        LinearExpression::new(self) - other
    }
}

impl<Brand> Sub<LinearExpression<Brand>> for f64 {
    type Output = LinearExpression<Brand>;

    fn sub(self, other: LinearExpression<Brand>) -> Self::Output {
        LinearExpression::new(self) - other
    }
}

#[cfg(test)]
mod tests {
    use crate::model::LinearExpression;
    use crate::modeler;

    #[test]
    fn test_branded_type_safety() {
        // Create two separate modelers with different brands
        let mut model1 = modeler!();
        let mut model2 = modeler!();

        let x = model1.num_var(0.0, 10.0, "x");
        let y = model2.num_var(0.0, 10.0, "y");

        // These should work fine
        let _expr1 = x + 2.0;
        let _expr2 = y * 3.0;

        // This would NOT compile (uncomment to verify):
        // let _mixed = x + y;  // ERROR: different brands
    }

    #[test]
    fn test_expression_operations() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 10.0, "x");
        let y = model.num_var(0.0, 10.0, "y");

        let expr = 2.0 * x + 3.0 * y + 5.0;
        assert_eq!(expr.constant, 5.0);
        assert_eq!(expr.terms.len(), 2);

        assert_eq!((x + y).terms.len(), 2);
        assert_eq!((x - y).terms.len(), 2);
        assert_eq!((2.0 * x).terms.len(), 1);
        assert_eq!((x * 2.0).terms[0].coefficient, 2.0);
    }

    #[test]
    fn test_constant_minus_variable() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 10.0, "x");

        let expr = 10.0 - x;
        assert_eq!(expr.constant, 10.0);
        assert_eq!(expr.terms[0].coefficient, -1.0);
        assert_eq!(expr.evaluate(&[4.0]), Some(6.0));

        let expr = 1.0 - (x + 2.0);
        assert_eq!(expr.constant, -1.0);
        assert_eq!(expr.terms[0].coefficient, -1.0);
    }

    #[test]
    fn test_negation_and_division() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 10.0, "x");
        let y = model.num_var(0.0, 10.0, "y");

        let expr = -(2.0 * x - y + 4.0) / 2.0;
        assert_eq!(expr.terms[0].coefficient, -1.0);
        assert_eq!(expr.terms[1].coefficient, 0.5);
        assert_eq!(expr.constant, -2.0);

        let expr = -x;
        assert_eq!(expr.terms[0].coefficient, -1.0);
    }

    #[test]
    fn test_assign_operators() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 10.0, "x");
        let y = model.num_var(0.0, 10.0, "y");

        let mut expr = LinearExpression::default();
        expr += x;
        expr += 2.0 * y;
        expr -= x;
        expr += 1.5;
        expr -= 0.5;
        expr *= 3.0;

        assert_eq!(expr.terms.len(), 3);
        assert_eq!(expr.constant, 3.0);
        assert_eq!(expr.evaluate(&[7.0, 1.0]), Some(9.0));
    }

    #[test]
    fn test_sum_of_variables_and_expressions() {
        let mut model = modeler!();
        let xs = model.num_var_array(4, 0.0, 1.0, "x");

        let total: LinearExpression<_> = xs.iter().sum();
        assert_eq!(total.terms.len(), 4);

        let weighted: LinearExpression<_> = xs
            .iter()
            .enumerate()
            .map(|(i, x)| (i as f64) * x + 1.0)
            .sum();
        assert_eq!(weighted.constant, 4.0);
        assert_eq!(weighted.evaluate(&[1.0, 1.0, 1.0, 1.0]), Some(10.0));
    }

    #[test]
    fn test_variable_id_debug() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 10.0, "x");

        let debug_str = format!("{:?}", x);
        assert!(debug_str.contains("VariableId"));
    }
}
