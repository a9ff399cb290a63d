//! Results returned by the solver engines

use std::fmt;
use std::marker::PhantomData;

use super::{LinearExpression, VarArray, VariableId};

/// Status of the optimization process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// Optimal solution found
    Optimal,
    /// Feasible solution found, but not necessarily optimal
    Feasible,
    /// Problem is infeasible (no solution exists)
    Infeasible,
    /// Problem is unbounded
    Unbounded,
    /// Problem is infeasible or unbounded
    InfeasibleOrUnbounded,
    /// Other status (solver-specific)
    Other(&'static str),
}

impl OptimizationStatus {
    /// True when the solution carries a usable assignment
    pub fn has_solution(self) -> bool {
        matches!(
            self,
            OptimizationStatus::Optimal | OptimizationStatus::Feasible
        )
    }
}

impl fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationStatus::Optimal => write!(f, "optimal"),
            OptimizationStatus::Feasible => write!(f, "feasible"),
            OptimizationStatus::Infeasible => write!(f, "infeasible"),
            OptimizationStatus::Unbounded => write!(f, "unbounded"),
            OptimizationStatus::InfeasibleOrUnbounded => write!(f, "infeasible or unbounded"),
            OptimizationStatus::Other(reason) => write!(f, "{}", reason),
        }
    }
}

/// Result of solving a model
///
/// Variable values are only meaningful when [`OptimizationStatus::has_solution`]
/// holds for `status`.
pub struct Solution<Brand> {
    pub status: OptimizationStatus,
    pub objective_value: f64,
    variable_values: Vec<f64>,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> Solution<Brand> {
    pub(crate) fn new(
        status: OptimizationStatus,
        objective_value: f64,
        variable_values: Vec<f64>,
    ) -> Self {
        Self {
            status,
            objective_value,
            variable_values,
            _brand: PhantomData,
        }
    }

    /// Get the value of a variable from the solution
    pub fn get_value(&self, var_id: VariableId<Brand>) -> Option<f64> {
        self.variable_values.get(var_id.id).copied()
    }

    /// Evaluate an expression at the solution
    pub fn value(&self, expression: &LinearExpression<Brand>) -> Option<f64> {
        expression.evaluate(&self.variable_values)
    }

    /// Values of every variable of an array, in order
    pub fn values(&self, vars: &VarArray<Brand>) -> Option<Vec<f64>> {
        vars.iter().map(|var| self.get_value(var)).collect()
    }

    /// Values of all variables, indexed by variable position
    pub fn variable_values(&self) -> &[f64] {
        &self.variable_values
    }

    pub fn is_feasible(&self) -> bool {
        self.status.has_solution()
    }
}

impl<Brand> Clone for Solution<Brand> {
    fn clone(&self) -> Self {
        Self::new(self.status, self.objective_value, self.variable_values.clone())
    }
}

impl<Brand> fmt::Debug for Solution<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solution")
            .field("status", &self.status)
            .field("objective_value", &self.objective_value)
            .field("variable_values", &self.variable_values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modeler;

    #[test]
    fn test_value_retrieval() {
        let mut model = modeler!();
        let xs = model.num_var_array(3, 0.0, 10.0, "x");
        let solution = Solution::new(OptimizationStatus::Optimal, 12.0, vec![1.0, 2.0, 3.0]);

        assert_eq!(solution.get_value(xs[1]), Some(2.0));
        assert_eq!(solution.values(&xs), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(solution.value(&(2.0 * xs[0] + xs[2] - 1.0)), Some(4.0));
        assert!(solution.is_feasible());
    }

    #[test]
    fn test_missing_values() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 1.0, "x");
        let y = model.num_var(0.0, 1.0, "y");
        let solution = Solution::new(OptimizationStatus::Infeasible, 0.0, vec![0.5]);

        assert_eq!(solution.get_value(y), None);
        assert_eq!(solution.value(&(x + y)), None);
        assert!(!solution.is_feasible());
    }

    #[test]
    fn test_status_reporting() {
        assert!(OptimizationStatus::Feasible.has_solution());
        assert!(!OptimizationStatus::Unbounded.has_solution());
        assert!(!OptimizationStatus::Other("limit").has_solution());
        assert_eq!(OptimizationStatus::InfeasibleOrUnbounded.to_string(), "infeasible or unbounded");
        assert_eq!(OptimizationStatus::Other("node limit").to_string(), "node limit");
    }
}
