//! Macros for the modeling layer
//!
//! This module contains the macros that give models their natural syntax:
//! branded modeler creation and comparison-style constraints.

/// Create a new modeler with a unique brand
///
/// This macro ensures that each modeler has a unique type-level brand,
/// preventing accidental mixing of variables between different models.
///
/// # Examples
///
/// ```rust
/// use modeler::modeler;
///
/// // Anonymous brand (each call creates unique anonymous type)
/// let mut model = modeler!();
/// let x = model.num_var(0.0, 10.0, "x");
///
/// // Named brand (easier to identify in type errors, also names the model)
/// let mut production = modeler!(Production);
/// let mut scheduling = modeler!(Scheduling);
/// assert_eq!(production.name(), "Production");
///
/// let prod_var = production.num_var(0.0, 100.0, "units");
/// let sched_var = scheduling.num_var(0.0, 24.0, "start");
///
/// // This would cause a compile-time error due to different brands:
/// // scheduling.add_constraint(constraint!((prod_var) <= 50.0)); // ERROR!
/// # let _ = (x, prod_var, sched_var);
/// ```
#[macro_export]
macro_rules! modeler {
    // Named brand - user provides the brand name
    ($brand_name:ident) => {{
        struct $brand_name;
        $crate::model::Modeler::<$brand_name>::named(stringify!($brand_name))
    }};

    // Anonymous brand - the `UniqueBrand` struct is defined locally within the `{{ ... }}` block,
    // so each macro invocation creates a fresh scope with its own distinct `UniqueBrand` type
    () => {{
        struct UniqueBrand;
        $crate::model::Modeler::<UniqueBrand>::new()
    }};
}

/// Create constraints and ranges using natural comparison syntax
///
/// The expression side must be in parentheses. A leading string literal names
/// the row. The chained form `lb <= (expr) <= ub` builds a [`Range`]; a
/// negative bound must itself be parenthesized, as in `(-5.0) <= (x) <= 5.0`.
///
/// [`Range`]: crate::model::Range
///
/// # Examples
///
/// ```rust
/// use modeler::{constraint, modeler};
///
/// let mut model = modeler!(OptimisationModel);
/// let x = model.num_var(0.0, 10.0, "x");
/// let y = model.num_var(0.0, 10.0, "y");
///
/// let c1 = constraint!((x + y) == 10.0);
/// let c2 = constraint!((2.0 * x) <= 5.0);
/// let c3 = constraint!((x - y) >= 0.0);
/// let c4 = constraint!((x) > 1.0);
/// let c5 = constraint!("balance", (x - y) < 3.0);
/// let r1 = constraint!(1.0 <= (x + y) <= 8.0);
/// let r2 = constraint!("spread", (-2.0) <= (x - y) <= 2.0);
///
/// model.add_constraints([c1, c2, c3, c4, c5]);
/// model.add_range(r1);
/// model.add_range(r2);
/// assert_eq!(model.num_constraints(), 7);
/// ```
#[macro_export]
macro_rules! constraint {
    // Ranges come first: `(lb) <= (expr) <= ub` would otherwise be taken as
    // a one-sided constraint whose right-hand side is a comparison.
    ($lb:tt <= ($expr:expr) <= $ub:expr) => {
        $crate::model::Range::new($lb as f64, $expr, $ub as f64)
    };
    (($lhs:expr) == $rhs:expr) => {
        $crate::model::Constraint::new(
            $lhs,
            $crate::model::ConstraintSense::Equal,
            $rhs as f64,
        )
    };
    (($lhs:expr) <= $rhs:expr) => {
        $crate::model::Constraint::new(
            $lhs,
            $crate::model::ConstraintSense::LessEqual,
            $rhs as f64,
        )
    };
    (($lhs:expr) < $rhs:expr) => {
        $crate::model::Constraint::new(
            $lhs,
            $crate::model::ConstraintSense::Less,
            $rhs as f64,
        )
    };
    (($lhs:expr) >= $rhs:expr) => {
        $crate::model::Constraint::new(
            $lhs,
            $crate::model::ConstraintSense::GreaterEqual,
            $rhs as f64,
        )
    };
    (($lhs:expr) > $rhs:expr) => {
        $crate::model::Constraint::new(
            $lhs,
            $crate::model::ConstraintSense::Greater,
            $rhs as f64,
        )
    };

    // Named forms
    ($name:literal, $lb:tt <= ($expr:expr) <= $ub:expr) => {
        $crate::constraint!($lb <= ($expr) <= $ub).named($name)
    };
    ($name:literal, ($lhs:expr) == $rhs:expr) => {
        $crate::constraint!(($lhs) == $rhs).named($name)
    };
    ($name:literal, ($lhs:expr) <= $rhs:expr) => {
        $crate::constraint!(($lhs) <= $rhs).named($name)
    };
    ($name:literal, ($lhs:expr) < $rhs:expr) => {
        $crate::constraint!(($lhs) < $rhs).named($name)
    };
    ($name:literal, ($lhs:expr) >= $rhs:expr) => {
        $crate::constraint!(($lhs) >= $rhs).named($name)
    };
    ($name:literal, ($lhs:expr) > $rhs:expr) => {
        $crate::constraint!(($lhs) > $rhs).named($name)
    };
}

#[cfg(test)]
mod tests {
    use crate::model::ConstraintSense;

    #[test]
    fn test_named_brand_modeler() {
        let mut model1 = modeler!(TestModel1);
        let mut model2 = modeler!(TestModel2);

        let x1 = model1.num_var(0.0, 10.0, "x");
        let x2 = model2.num_var(0.0, 10.0, "x");

        // Variables should have different types due to different brands
        let _expr1 = x1 + 5.0;
        let _expr2 = x2 + 5.0;

        assert_eq!(model1.name(), "TestModel1");
        assert_eq!(model2.name(), "TestModel2");

        // This would NOT compile if uncommented (different brands):
        // let _mixed = x1 + x2; // ERROR: different brands
    }

    #[test]
    fn test_anonymous_brand_still_works() {
        let mut model1 = modeler!();
        let mut model2 = modeler!();

        let x = model1.num_var(0.0, 10.0, "x");
        let y = model2.num_var(0.0, 10.0, "y");

        let _expr1 = x + 1.0;
        let _expr2 = y + 2.0;
        assert_eq!(model1.name(), "model");
    }

    #[test]
    fn test_constraint_senses() {
        let mut model = modeler!();
        let x = model.num_var(0.0, 10.0, "x");
        let y = model.num_var(0.0, 10.0, "y");

        let c = constraint!((x + y) == 10.0);
        assert_eq!(c.sense(), ConstraintSense::Equal);
        assert_eq!(c.rhs(), 10.0);

        let c = constraint!((2.0 * x) <= 5);
        assert_eq!(c.sense(), ConstraintSense::LessEqual);
        assert_eq!(c.rhs(), 5.0);

        let c = constraint!((x - y) >= 0.0);
        assert_eq!(c.sense(), ConstraintSense::GreaterEqual);

        let c = constraint!((x) > 1.0);
        assert_eq!(c.sense(), ConstraintSense::Greater);

        let c = constraint!((y) < 2.0);
        assert_eq!(c.sense(), ConstraintSense::Less);
        assert_eq!(c.name(), None);
    }

    #[test]
    fn test_named_constraints_and_ranges() {
        let mut model = modeler!(RangeModel);
        let x = model.num_var(0.0, 10.0, "x");
        let y = model.num_var(0.0, 10.0, "y");

        let c = constraint!("total", (x + y) <= 8.0);
        assert_eq!(c.name(), Some("total"));
        assert_eq!(c.sense(), ConstraintSense::LessEqual);

        let r = constraint!(1.0 <= (x - y) <= 3.0);
        assert_eq!(r.lower(), 1.0);
        assert_eq!(r.upper(), 3.0);
        assert_eq!(r.name(), None);

        let r = constraint!("spread", (-2.0) <= (x - y) <= 2);
        assert_eq!(r.lower(), -2.0);
        assert_eq!(r.upper(), 2.0);
        assert_eq!(r.name(), Some("spread"));

        model.add_constraint(c);
        model.add_range(r);
        assert_eq!(model.num_constraints(), 2);
    }
}
