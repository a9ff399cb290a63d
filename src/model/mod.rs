//! Optimization modeling layer
//!
//! This module provides the modeling surface of the crate: decision variables,
//! linear expressions, constraints, ranges and objectives, collected by a
//! [`Modeler`] and handed over to an external solver engine for the actual
//! search. Nothing here solves anything; the model is validated, normalized and
//! forwarded to one of the backends in [`backend`].
//!
//! # Type Safety with Branded Types
//!
//! All core types (`VariableId`, `LinearExpression`, `Constraint`, `Range`,
//! `Modeler`, `Solution`) use a generic `Brand` type parameter that provides
//! compile-time guarantees:
//!
//! - Variables from one modeler cannot be accidentally used with another modeler
//! - Constraints are type-checked to ensure they only use variables from their modeler
//! - No runtime overhead - the brand is a zero-sized phantom type
//!
//! Use the `modeler!()` macro to create modelers with guaranteed unique brands:
//!
//! ```rust
//! use modeler::{constraint, modeler};
//!
//! let mut production = modeler!(Production);
//! let mut staffing = modeler!();
//!
//! let x = production.num_var(0.0, 10.0, "x");
//! let y = staffing.num_var(0.0, 10.0, "y");
//!
//! // This compiles:
//! production.add_constraint(constraint!((x) <= 5.0));
//!
//! // This would NOT compile (type error):
//! // production.add_constraint(constraint!((y) <= 5.0));
//! # let _ = y;
//! ```
//!
//! For custom brands, use the explicit generic syntax:
//!
//! ```rust
//! use modeler::model::Modeler;
//!
//! struct MyModel;
//! let mut model = Modeler::<MyModel>::new();
//! let _x = model.bool_var("x");
//! ```
//!
//! # Building Models
//!
//! Constraints are written with the `constraint!` macro, the `Constraint`
//! constructors, or as a `Range` when both sides are bounded:
//!
//! ```rust,no_run
//! use modeler::{constraint, modeler};
//! use modeler::model::{Constraint, Range};
//!
//! let mut model = modeler!();
//! let x = model.num_var(0.0, f64::INFINITY, "x");
//! let y = model.int_var(0.0, 20.0, "y");
//!
//! model.add_constraint(constraint!((x + y) == 10.0));
//! model.add_constraint(constraint!("cap", (2.0 * x - y) <= 5.0));
//! model.add_constraint(Constraint::ge(x, 1.0));
//! model.add_range(constraint!(2.0 <= (x - y) <= 8.0));
//! model.add_range(Range::new(0.0, x + 2.0 * y, 30.0).named("budget"));
//!
//! model.maximize(x + 2.0 * y);
//! let solution = model.solve()?;
//! println!("{:?} {}", solution.status, solution.objective_value);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Solver Selection
//!
//! The backend is taken from [`SolverParams::backend`] when set, otherwise from
//! the `MODELER_SOLVER` environment variable:
//! - `"gurobi"` - Use Gurobi (requires `gurobi` feature)
//! - `"coin_cbc"` or `"cbc"` - Use COIN-OR CBC (requires `coin_cbc` feature)
//!
//! If neither is set, the solver defaults to Gurobi if available, otherwise CBC.

use anyhow::Result;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

pub mod array;
pub mod backend;
mod error;
pub mod macros;
pub mod ops;
pub mod solution;

pub use array::{VarArray, VarMatrix, scal_prod, sum};
pub use backend::{SolverBackend, SolverParams};
pub use error::ModelError;
pub use solution::{OptimizationStatus, Solution};

/// Offset applied to strict inequalities over continuous activities, which
/// solver engines only accept as closed rows. Kept an order of magnitude above
/// `FEASIBILITY_TOLERANCE` and the engines' primal tolerances.
pub const STRICT_EPSILON: f64 = 1e-5;

/// Absolute tolerance used when checking an assignment against the model.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Variable types supported by the solver engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous variable (can take any real value)
    Continuous,
    /// Integer variable (can only take integer values)
    Integer,
    /// Binary variable (can only take values 0 or 1)
    Binary,
}

/// Constraint sense for linear constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// Less than or equal to (≤)
    LessEqual,
    /// Strictly less than (<)
    Less,
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (≥)
    GreaterEqual,
    /// Strictly greater than (>)
    Greater,
}

impl ConstraintSense {
    fn symbol(self) -> &'static str {
        match self {
            ConstraintSense::LessEqual => "<=",
            ConstraintSense::Less => "<",
            ConstraintSense::Equal => "=",
            ConstraintSense::GreaterEqual => ">=",
            ConstraintSense::Greater => ">",
        }
    }
}

/// Optimization direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationSense {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Unique identifier for a variable in the model
///
/// The `Brand` type parameter ensures that variables can only be used with the
/// modeler that created them. This is enforced at compile time.
pub struct VariableId<Brand> {
    id: usize,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> VariableId<Brand> {
    fn new(id: usize) -> Self {
        Self {
            id,
            _brand: PhantomData,
        }
    }

    /// Position of the variable in its model
    pub fn index(&self) -> usize {
        self.id
    }
}

// Manual trait implementations that don't require Brand to implement anything
impl<Brand> fmt::Debug for VariableId<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableId").field("id", &self.id).finish()
    }
}

impl<Brand> Clone for VariableId<Brand> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Brand> Copy for VariableId<Brand> {}

impl<Brand> PartialEq for VariableId<Brand> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<Brand> Eq for VariableId<Brand> {}

impl<Brand> std::hash::Hash for VariableId<Brand> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A linear expression term: coefficient * variable
pub struct LinearTerm<Brand> {
    pub coefficient: f64,
    pub variable: VariableId<Brand>,
}

impl<Brand> Clone for LinearTerm<Brand> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Brand> Copy for LinearTerm<Brand> {}

impl<Brand> fmt::Debug for LinearTerm<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearTerm")
            .field("coefficient", &self.coefficient)
            .field("variable", &self.variable)
            .finish()
    }
}

/// A linear expression: sum of terms plus constant
pub struct LinearExpression<Brand> {
    pub terms: Vec<LinearTerm<Brand>>,
    pub constant: f64,
}

impl<Brand> LinearExpression<Brand> {
    /// Create a new linear expression with a constant term
    pub fn new(constant: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }

    /// Add a term to the expression
    pub fn add_term(&mut self, coefficient: f64, variable: VariableId<Brand>) {
        self.terms.push(LinearTerm {
            coefficient,
            variable,
        });
    }

    /// Create a linear expression from a single variable
    pub fn from_variable(variable: VariableId<Brand>) -> Self {
        Self {
            terms: vec![LinearTerm {
                coefficient: 1.0,
                variable,
            }],
            constant: 0.0,
        }
    }

    /// True when the expression has no variable terms
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Merge repeated variables and drop zero coefficients.
    ///
    /// Terms keep the order in which each variable first appears. Engines that
    /// set matrix entries one at a time would otherwise overwrite a variable's
    /// coefficient instead of accumulating it.
    pub fn normalized(&self) -> Self {
        let mut position: HashMap<usize, usize> = HashMap::with_capacity(self.terms.len());
        let mut terms: Vec<LinearTerm<Brand>> = Vec::with_capacity(self.terms.len());

        for term in &self.terms {
            match position.get(&term.variable.id) {
                Some(&at) => terms[at].coefficient += term.coefficient,
                None => {
                    position.insert(term.variable.id, terms.len());
                    terms.push(*term);
                }
            }
        }
        terms.retain(|term| term.coefficient != 0.0);

        Self {
            terms,
            constant: self.constant,
        }
    }

    /// Evaluate the expression against values indexed by variable position
    pub fn evaluate(&self, values: &[f64]) -> Option<f64> {
        self.terms.iter().try_fold(self.constant, |acc, term| {
            values
                .get(term.variable.id)
                .map(|value| acc + term.coefficient * value)
        })
    }

    fn check(&self, context: &str, count: usize) -> Result<(), ModelError> {
        if !self.constant.is_finite() {
            return Err(ModelError::NonFiniteCoefficient {
                context: context.to_string(),
            });
        }
        for term in &self.terms {
            if term.variable.id >= count {
                return Err(ModelError::UnknownVariable {
                    context: context.to_string(),
                    id: term.variable.id,
                    count,
                });
            }
            if !term.coefficient.is_finite() {
                return Err(ModelError::NonFiniteCoefficient {
                    context: context.to_string(),
                });
            }
        }
        Ok(())
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, name: impl Fn(usize) -> String) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "{}", self.constant);
        }
        for (i, term) in self.terms.iter().enumerate() {
            let coefficient = match (i, term.coefficient < 0.0) {
                (0, true) => {
                    write!(f, "- ")?;
                    -term.coefficient
                }
                (0, false) => term.coefficient,
                (_, true) => {
                    write!(f, " - ")?;
                    -term.coefficient
                }
                (_, false) => {
                    write!(f, " + ")?;
                    term.coefficient
                }
            };
            if coefficient != 1.0 {
                write!(f, "{} ", coefficient)?;
            }
            write!(f, "{}", name(term.variable.id))?;
        }
        if self.constant > 0.0 {
            write!(f, " + {}", self.constant)?;
        } else if self.constant < 0.0 {
            write!(f, " - {}", -self.constant)?;
        }
        Ok(())
    }
}

impl<Brand> Clone for LinearExpression<Brand> {
    fn clone(&self) -> Self {
        Self {
            terms: self.terms.clone(),
            constant: self.constant,
        }
    }
}

impl<Brand> fmt::Debug for LinearExpression<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearExpression")
            .field("terms", &self.terms)
            .field("constant", &self.constant)
            .finish()
    }
}

impl<Brand> fmt::Display for LinearExpression<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, |id| format!("x{}", id))
    }
}

impl<Brand> Default for LinearExpression<Brand> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<Brand> From<VariableId<Brand>> for LinearExpression<Brand> {
    fn from(variable: VariableId<Brand>) -> Self {
        Self::from_variable(variable)
    }
}

impl<Brand> From<f64> for LinearExpression<Brand> {
    fn from(constant: f64) -> Self {
        Self::new(constant)
    }
}

/// Unique identifier for a constraint or range in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(usize);

/// A linear constraint representation
///
/// Constraints define relationships between linear expressions and constants.
/// The `Brand` type parameter ensures type safety - constraints can only use
/// variables from the modeler that will consume them.
///
/// # Examples
///
/// ```rust,no_run
/// use modeler::{constraint, modeler};
/// use modeler::model::{Constraint, ConstraintSense};
///
/// let mut model = modeler!();
/// let x = model.num_var(0.0, 10.0, "x");
/// let y = model.num_var(0.0, 10.0, "y");
///
/// // Using the constraint! macro (recommended)
/// let c = constraint!((x + y) == 10.0);
///
/// // Using builder methods
/// let c = Constraint::eq(x + y, 10.0).named("total");
///
/// // Using the constructor directly
/// let c = Constraint::new(x + y, ConstraintSense::Equal, 10.0);
/// ```
pub struct Constraint<Brand> {
    name: Option<String>,
    expression: LinearExpression<Brand>,
    sense: ConstraintSense,
    rhs: f64,
}

impl<Brand> Constraint<Brand> {
    /// Create a new constraint
    pub fn new(
        expression: impl Into<LinearExpression<Brand>>,
        sense: ConstraintSense,
        rhs: f64,
    ) -> Self {
        Self {
            name: None,
            expression: expression.into(),
            sense,
            rhs,
        }
    }

    /// Create an equality constraint: expression == rhs
    pub fn eq(expression: impl Into<LinearExpression<Brand>>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::Equal, rhs)
    }

    /// Create a less-than-or-equal constraint: expression <= rhs
    pub fn le(expression: impl Into<LinearExpression<Brand>>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::LessEqual, rhs)
    }

    /// Create a strictly-less-than constraint: expression < rhs
    pub fn lt(expression: impl Into<LinearExpression<Brand>>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::Less, rhs)
    }

    /// Create a greater-than-or-equal constraint: expression >= rhs
    pub fn ge(expression: impl Into<LinearExpression<Brand>>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::GreaterEqual, rhs)
    }

    /// Create a strictly-greater-than constraint: expression > rhs
    pub fn gt(expression: impl Into<LinearExpression<Brand>>, rhs: f64) -> Self {
        Self::new(expression, ConstraintSense::Greater, rhs)
    }

    /// Attach a name, reported by the engine and by validation errors
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn expression(&self) -> &LinearExpression<Brand> {
        &self.expression
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Closed interval the expression must lie in
    fn bounds(&self) -> (f64, f64) {
        match self.sense {
            ConstraintSense::LessEqual => (f64::NEG_INFINITY, self.rhs),
            ConstraintSense::Less => (f64::NEG_INFINITY, self.rhs - STRICT_EPSILON),
            ConstraintSense::Equal => (self.rhs, self.rhs),
            ConstraintSense::GreaterEqual => (self.rhs, f64::INFINITY),
            ConstraintSense::Greater => (self.rhs + STRICT_EPSILON, f64::INFINITY),
        }
    }
}

impl<Brand> Clone for Constraint<Brand> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            expression: self.expression.clone(),
            sense: self.sense,
            rhs: self.rhs,
        }
    }
}

impl<Brand> fmt::Debug for Constraint<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("expression", &self.expression)
            .field("sense", &self.sense)
            .field("rhs", &self.rhs)
            .finish()
    }
}

impl<Brand> fmt::Display for Constraint<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}: ", name)?;
        }
        write!(f, "{} {} {}", self.expression, self.sense.symbol(), self.rhs)
    }
}

/// A two-sided restriction `lower <= expression <= upper`
///
/// Either bound may be infinite. Ranges are forwarded as a single row with
/// both bounds wherever the engine supports it.
pub struct Range<Brand> {
    name: Option<String>,
    lower: f64,
    expression: LinearExpression<Brand>,
    upper: f64,
}

impl<Brand> Range<Brand> {
    pub fn new(lower: f64, expression: impl Into<LinearExpression<Brand>>, upper: f64) -> Self {
        Self {
            name: None,
            lower,
            expression: expression.into(),
            upper,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn expression(&self) -> &LinearExpression<Brand> {
        &self.expression
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn set_bounds(&mut self, lower: f64, upper: f64) {
        self.lower = lower;
        self.upper = upper;
    }
}

impl<Brand> Clone for Range<Brand> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            lower: self.lower,
            expression: self.expression.clone(),
            upper: self.upper,
        }
    }
}

impl<Brand> fmt::Debug for Range<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Range")
            .field("name", &self.name)
            .field("lower", &self.lower)
            .field("expression", &self.expression)
            .field("upper", &self.upper)
            .finish()
    }
}

impl<Brand> fmt::Display for Range<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}: ", name)?;
        }
        write!(f, "{} <= {} <= {}", self.lower, self.expression, self.upper)
    }
}

/// Objective function: an expression and the direction to optimize it in
pub struct Objective<Brand> {
    expression: LinearExpression<Brand>,
    sense: OptimizationSense,
}

impl<Brand> Objective<Brand> {
    pub fn new(expression: impl Into<LinearExpression<Brand>>, sense: OptimizationSense) -> Self {
        Self {
            expression: expression.into(),
            sense,
        }
    }

    pub fn minimize(expression: impl Into<LinearExpression<Brand>>) -> Self {
        Self::new(expression, OptimizationSense::Minimize)
    }

    pub fn maximize(expression: impl Into<LinearExpression<Brand>>) -> Self {
        Self::new(expression, OptimizationSense::Maximize)
    }

    pub fn expression(&self) -> &LinearExpression<Brand> {
        &self.expression
    }

    pub fn sense(&self) -> OptimizationSense {
        self.sense
    }
}

impl<Brand> Clone for Objective<Brand> {
    fn clone(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            sense: self.sense,
        }
    }
}

impl<Brand> fmt::Debug for Objective<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Objective")
            .field("expression", &self.expression)
            .field("sense", &self.sense)
            .finish()
    }
}

/// Variable information stored in the model
#[derive(Debug, Clone)]
struct VariableInfo {
    name: Option<String>,
    var_type: VariableType,
    lower_bound: f64,
    upper_bound: f64,
}

/// A row of the model as the user stated it
enum Row<Brand> {
    Constraint(Constraint<Brand>),
    Range(Range<Brand>),
}

impl<Brand> Row<Brand> {
    fn name(&self) -> Option<&str> {
        match self {
            Row::Constraint(c) => c.name(),
            Row::Range(r) => r.name(),
        }
    }

    fn expression(&self) -> &LinearExpression<Brand> {
        match self {
            Row::Constraint(c) => c.expression(),
            Row::Range(r) => r.expression(),
        }
    }

    fn bounds(&self) -> (f64, f64) {
        match self {
            Row::Constraint(c) => c.bounds(),
            Row::Range(r) => (r.lower, r.upper),
        }
    }

    /// Exact check of a strict sense; closed senses always pass
    fn holds_strictly(&self, activity: f64) -> bool {
        match self {
            Row::Constraint(c) => match c.sense {
                ConstraintSense::Less => activity < c.rhs,
                ConstraintSense::Greater => activity > c.rhs,
                _ => true,
            },
            Row::Range(_) => true,
        }
    }
}

/// A row in the shape engines consume: merged terms and bounds with the constant folded in
#[derive(Debug, Clone)]
pub(crate) struct LoweredRow<'a> {
    /// Storage index, stable across removals
    pub index: usize,
    pub name: Option<&'a str>,
    pub terms: Vec<(usize, f64)>,
    pub lower: f64,
    pub upper: f64,
}

/// The objective in the shape engines consume
#[derive(Debug, Clone)]
pub(crate) struct LoweredObjective {
    pub terms: Vec<(usize, f64)>,
    pub constant: f64,
    pub sense: OptimizationSense,
}

/// Owner of an optimization model
///
/// The modeler hands out variable handles, collects constraints, ranges and an
/// objective, and forwards everything to a solver engine on [`Modeler::solve`].
/// The `Brand` type parameter ensures that variables from one modeler cannot be
/// used with another one.
///
/// # Examples
///
/// ```rust,no_run
/// use modeler::{constraint, modeler};
///
/// let mut model = modeler!(Knapsack);
/// let items = model.bool_var_array(3, "take");
/// let weights = [4.0, 3.0, 2.0];
/// let values = [10.0, 7.0, 4.0];
///
/// model.add_constraint(constraint!((items.scal_prod(&weights)?) <= 6.0));
/// model.maximize(items.scal_prod(&values)?);
///
/// let solution = model.solve()?;
/// println!("{:?}", solution.values(&items));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct Modeler<Brand> {
    name: String,
    variables: Vec<VariableInfo>,
    rows: Vec<Option<Row<Brand>>>,
    objective: Option<Objective<Brand>>,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> Modeler<Brand> {
    /// Create a new, empty model
    pub fn new() -> Self {
        Self::named("model")
    }

    /// Create a new, empty model with a name passed on to the engine
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            rows: Vec::new(),
            objective: None,
            _brand: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a variable to the model
    pub fn add_variable(
        &mut self,
        var_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> VariableId<Brand> {
        self.push_variable(None, var_type, lower_bound, upper_bound)
    }

    fn push_variable(
        &mut self,
        name: Option<String>,
        var_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> VariableId<Brand> {
        let var_id = VariableId::new(self.variables.len());
        self.variables.push(VariableInfo {
            name,
            var_type,
            lower_bound,
            upper_bound,
        });
        var_id
    }

    /// Add a named continuous variable
    pub fn num_var(&mut self, lower: f64, upper: f64, name: impl Into<String>) -> VariableId<Brand> {
        self.push_variable(Some(name.into()), VariableType::Continuous, lower, upper)
    }

    /// Add a named integer variable
    pub fn int_var(&mut self, lower: f64, upper: f64, name: impl Into<String>) -> VariableId<Brand> {
        self.push_variable(Some(name.into()), VariableType::Integer, lower, upper)
    }

    /// Add a named binary variable
    pub fn bool_var(&mut self, name: impl Into<String>) -> VariableId<Brand> {
        self.push_variable(Some(name.into()), VariableType::Binary, 0.0, 1.0)
    }

    fn var_array(
        &mut self,
        len: usize,
        var_type: VariableType,
        lower: f64,
        upper: f64,
        prefix: &str,
    ) -> VarArray<Brand> {
        (0..len)
            .map(|i| self.push_variable(Some(format!("{}[{}]", prefix, i)), var_type, lower, upper))
            .collect()
    }

    fn var_matrix(
        &mut self,
        rows: usize,
        cols: usize,
        var_type: VariableType,
        lower: f64,
        upper: f64,
        prefix: &str,
    ) -> VarMatrix<Brand> {
        let vars = (0..rows)
            .cartesian_product(0..cols)
            .map(|(i, j)| {
                let name = format!("{}[{}][{}]", prefix, i, j);
                self.push_variable(Some(name), var_type, lower, upper)
            })
            .collect();
        VarMatrix::from_row_major(rows, cols, vars)
    }

    /// Add `len` continuous variables named `prefix[i]`
    pub fn num_var_array(&mut self, len: usize, lower: f64, upper: f64, prefix: &str) -> VarArray<Brand> {
        self.var_array(len, VariableType::Continuous, lower, upper, prefix)
    }

    /// Add `len` integer variables named `prefix[i]`
    pub fn int_var_array(&mut self, len: usize, lower: f64, upper: f64, prefix: &str) -> VarArray<Brand> {
        self.var_array(len, VariableType::Integer, lower, upper, prefix)
    }

    /// Add `len` binary variables named `prefix[i]`
    pub fn bool_var_array(&mut self, len: usize, prefix: &str) -> VarArray<Brand> {
        self.var_array(len, VariableType::Binary, 0.0, 1.0, prefix)
    }

    /// Add a `rows` x `cols` matrix of continuous variables named `prefix[i][j]`
    pub fn num_var_matrix(
        &mut self,
        rows: usize,
        cols: usize,
        lower: f64,
        upper: f64,
        prefix: &str,
    ) -> VarMatrix<Brand> {
        self.var_matrix(rows, cols, VariableType::Continuous, lower, upper, prefix)
    }

    /// Add a `rows` x `cols` matrix of binary variables named `prefix[i][j]`
    pub fn bool_var_matrix(&mut self, rows: usize, cols: usize, prefix: &str) -> VarMatrix<Brand> {
        self.var_matrix(rows, cols, VariableType::Binary, 0.0, 1.0, prefix)
    }

    fn variable_info(&self, var: VariableId<Brand>) -> Result<&VariableInfo, ModelError> {
        self.variables
            .get(var.id)
            .ok_or_else(|| ModelError::UnknownVariable {
                context: format!("model {}", self.name),
                id: var.id,
                count: self.variables.len(),
            })
    }

    /// Change the bounds of a variable
    pub fn set_bounds(&mut self, var: VariableId<Brand>, lower: f64, upper: f64) -> Result<(), ModelError> {
        self.variable_info(var)?;
        let info = &mut self.variables[var.id];
        info.lower_bound = lower;
        info.upper_bound = upper;
        Ok(())
    }

    /// Fix a variable to a single value
    pub fn fix(&mut self, var: VariableId<Brand>, value: f64) -> Result<(), ModelError> {
        self.set_bounds(var, value, value)
    }

    pub fn variable_bounds(&self, var: VariableId<Brand>) -> Option<(f64, f64)> {
        self.variables
            .get(var.id)
            .map(|info| (info.lower_bound, info.upper_bound))
    }

    pub fn variable_type(&self, var: VariableId<Brand>) -> Option<VariableType> {
        self.variables.get(var.id).map(|info| info.var_type)
    }

    /// Name of a variable; unnamed variables are reported as `x<index>`
    pub fn variable_name(&self, var: VariableId<Brand>) -> Option<String> {
        self.variables.get(var.id).map(|_| self.label(var.id))
    }

    fn label(&self, id: usize) -> String {
        match self.variables.get(id).and_then(|info| info.name.as_deref()) {
            Some(name) => name.to_string(),
            None => format!("x{}", id),
        }
    }

    fn row_label(&self, idx: usize, row: &Row<Brand>) -> String {
        match row.name() {
            Some(name) => name.to_string(),
            None => format!("c{}", idx),
        }
    }

    /// Add a constraint to the model
    pub fn add_constraint(&mut self, constraint: Constraint<Brand>) -> ConstraintId {
        self.push_row(Row::Constraint(constraint))
    }

    /// Add a range to the model
    pub fn add_range(&mut self, range: Range<Brand>) -> ConstraintId {
        self.push_row(Row::Range(range))
    }

    /// Add every constraint of an iterator, returning their ids in order
    pub fn add_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = Constraint<Brand>>,
    ) -> Vec<ConstraintId> {
        constraints
            .into_iter()
            .map(|constraint| self.add_constraint(constraint))
            .collect()
    }

    fn push_row(&mut self, row: Row<Brand>) -> ConstraintId {
        let constr_id = ConstraintId(self.rows.len());
        self.rows.push(Some(row));
        constr_id
    }

    /// Remove a constraint or range. Ids of the remaining rows stay valid.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        self.rows
            .get_mut(id.0)
            .and_then(|row| row.take())
            .is_some()
    }

    /// Set the objective function
    pub fn set_objective(&mut self, expression: impl Into<LinearExpression<Brand>>, sense: OptimizationSense) {
        self.objective = Some(Objective::new(expression, sense));
    }

    pub fn minimize(&mut self, expression: impl Into<LinearExpression<Brand>>) {
        self.set_objective(expression, OptimizationSense::Minimize);
    }

    pub fn maximize(&mut self, expression: impl Into<LinearExpression<Brand>>) {
        self.set_objective(expression, OptimizationSense::Maximize);
    }

    /// Drop the objective, turning the model into a feasibility problem
    pub fn clear_objective(&mut self) {
        self.objective = None;
    }

    pub fn objective(&self) -> Option<&Objective<Brand>> {
        self.objective.as_ref()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of rows that have not been removed
    pub fn num_constraints(&self) -> usize {
        self.live_rows().count()
    }

    fn live_rows(&self) -> impl Iterator<Item = (usize, &Row<Brand>)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| row.as_ref().map(|row| (idx, row)))
    }

    /// Whether an expression can only take integer values
    fn is_integral(&self, expression: &LinearExpression<Brand>) -> bool {
        expression.constant.fract() == 0.0
            && expression.terms.iter().all(|term| {
                term.coefficient.fract() == 0.0
                    && self
                        .variables
                        .get(term.variable.id)
                        .is_some_and(|info| info.var_type != VariableType::Continuous)
            })
    }

    /// Closed interval a row is forwarded with. A strict row over an integral
    /// activity moves to the next integer, any other by `STRICT_EPSILON`.
    fn row_bounds(&self, row: &Row<Brand>) -> (f64, f64) {
        match row {
            Row::Constraint(c) if self.is_integral(&c.expression) => match c.sense {
                ConstraintSense::Less => (f64::NEG_INFINITY, c.rhs.ceil() - 1.0),
                ConstraintSense::Greater => (c.rhs.floor() + 1.0, f64::INFINITY),
                _ => c.bounds(),
            },
            _ => row.bounds(),
        }
    }

    /// Check bounds, coefficients and variable references before solving
    pub fn validate(&self) -> Result<(), ModelError> {
        for (idx, info) in self.variables.iter().enumerate() {
            let (lower, upper) = (info.lower_bound, info.upper_bound);
            if lower.is_nan()
                || upper.is_nan()
                || lower > upper
                || lower == f64::INFINITY
                || upper == f64::NEG_INFINITY
            {
                return Err(ModelError::InvalidBounds {
                    variable: self.label(idx),
                    lower,
                    upper,
                });
            }
            if info.var_type == VariableType::Binary && (lower < 0.0 || upper > 1.0) {
                return Err(ModelError::BinaryBounds {
                    variable: self.label(idx),
                    lower,
                    upper,
                });
            }
        }

        let count = self.variables.len();
        for (idx, row) in self.live_rows() {
            let label = self.row_label(idx, row);
            row.expression()
                .check(&format!("constraint {}", label), count)?;
            let (lower, upper) = self.row_bounds(row);
            if lower.is_nan()
                || upper.is_nan()
                || lower > upper
                || lower == f64::INFINITY
                || upper == f64::NEG_INFINITY
            {
                return Err(ModelError::InvalidRowBounds {
                    constraint: label,
                    lower,
                    upper,
                });
            }
        }

        if let Some(objective) = &self.objective {
            objective.expression.check("objective", count)?;
        }
        Ok(())
    }

    /// Check an assignment, indexed by variable position, against bounds,
    /// integrality and every live row
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }

        let within_bounds = self.variables.iter().zip(values).all(|(info, &value)| {
            let integral = match info.var_type {
                VariableType::Continuous => true,
                VariableType::Integer | VariableType::Binary => {
                    (value - value.round()).abs() <= tolerance
                }
            };
            integral
                && value >= info.lower_bound - tolerance
                && value <= info.upper_bound + tolerance
        });

        within_bounds
            && self.live_rows().all(|(_, row)| {
                let (lower, upper) = self.row_bounds(row);
                match row.expression().evaluate(values) {
                    Some(activity) => {
                        activity >= lower - tolerance
                            && activity <= upper + tolerance
                            && row.holds_strictly(activity)
                    }
                    None => false,
                }
            })
    }

    /// Value of a row's expression at a solution
    pub fn activity(&self, solution: &Solution<Brand>, id: ConstraintId) -> Option<f64> {
        let row = self.rows.get(id.0)?.as_ref()?;
        solution.value(row.expression())
    }

    pub(crate) fn lowered_rows(&self) -> Vec<LoweredRow<'_>> {
        self.live_rows()
            .map(|(index, row)| {
                let expression = row.expression().normalized();
                let (lower, upper) = self.row_bounds(row);
                LoweredRow {
                    index,
                    name: row.name(),
                    terms: expression
                        .terms
                        .iter()
                        .map(|term| (term.variable.id, term.coefficient))
                        .collect(),
                    lower: lower - expression.constant,
                    upper: upper - expression.constant,
                }
            })
            .collect()
    }

    pub(crate) fn lowered_objective(&self) -> Option<LoweredObjective> {
        self.objective.as_ref().map(|objective| {
            let expression = objective.expression.normalized();
            LoweredObjective {
                terms: expression
                    .terms
                    .iter()
                    .map(|term| (term.variable.id, term.coefficient))
                    .collect(),
                constant: expression.constant,
                sense: objective.sense,
            }
        })
    }

    /// Solve the model with default parameters
    pub fn solve(&self) -> Result<Solution<Brand>> {
        self.solve_with(&SolverParams::default())
    }

    /// Validate the model and forward it to the selected solver engine
    pub fn solve_with(&self, params: &SolverParams) -> Result<Solution<Brand>> {
        self.validate()?;
        log::debug!(
            "model {}: {} variables, {} constraints",
            self.name,
            self.num_variables(),
            self.num_constraints()
        );

        let solution = if self.variables.is_empty() {
            self.solve_constant()
        } else {
            let backend = match params.backend {
                Some(backend) => backend,
                None => SolverBackend::from_env_or_default()?,
            };
            log::debug!("solving model {} with {}", self.name, backend);
            backend.solve(self, params)?
        };

        log::info!(
            "model {}: {:?}, objective {}",
            self.name,
            solution.status,
            solution.objective_value
        );
        Ok(solution)
    }

    /// A model without variables has constant rows; decide it without an engine
    fn solve_constant(&self) -> Solution<Brand> {
        let feasible = self.is_satisfied_by(&[], FEASIBILITY_TOLERANCE);
        let status = if feasible {
            OptimizationStatus::Optimal
        } else {
            OptimizationStatus::Infeasible
        };
        let objective_value = match (&self.objective, feasible) {
            (Some(objective), true) => objective.expression.constant,
            _ => 0.0,
        };
        Solution::new(status, objective_value, Vec::new())
    }
}

impl<Brand> Default for Modeler<Brand> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Brand> fmt::Display for Modeler<Brand> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |id: usize| self.label(id);

        writeln!(f, "\\ model {}", self.name)?;
        match &self.objective {
            Some(objective) => {
                let sense = match objective.sense {
                    OptimizationSense::Minimize => "minimize",
                    OptimizationSense::Maximize => "maximize",
                };
                writeln!(f, "{}", sense)?;
                write!(f, "  obj: ")?;
                objective.expression.fmt_with(f, name)?;
                writeln!(f)?;
            }
            None => writeln!(f, "minimize\n  obj: 0")?,
        }

        writeln!(f, "subject to")?;
        for (idx, row) in self.live_rows() {
            write!(f, "  {}: ", self.row_label(idx, row))?;
            match row {
                Row::Constraint(c) => {
                    c.expression.fmt_with(f, name)?;
                    writeln!(f, " {} {}", c.sense.symbol(), c.rhs)?;
                }
                Row::Range(r) => {
                    write!(f, "{} <= ", r.lower)?;
                    r.expression.fmt_with(f, name)?;
                    writeln!(f, " <= {}", r.upper)?;
                }
            }
        }

        writeln!(f, "bounds")?;
        for (idx, info) in self.variables.iter().enumerate() {
            if info.var_type != VariableType::Binary {
                writeln!(
                    f,
                    "  {} <= {} <= {}",
                    info.lower_bound,
                    self.label(idx),
                    info.upper_bound
                )?;
            }
        }

        let of_type = |var_type: VariableType| {
            self.variables
                .iter()
                .enumerate()
                .filter(|(_, info)| info.var_type == var_type)
                .map(|(idx, _)| self.label(idx))
                .join(" ")
        };
        let general = of_type(VariableType::Integer);
        if !general.is_empty() {
            writeln!(f, "general\n  {}", general)?;
        }
        let binary = of_type(VariableType::Binary);
        if !binary.is_empty() {
            writeln!(f, "binary\n  {}", binary)?;
        }
        write!(f, "end")
    }
}
