//! Operator-overloaded linear and mixed-integer modeling
//!
//! This library lets optimization models be written with ordinary Rust
//! arithmetic and comparison syntax, then hands them to an external solver
//! engine (Coin CBC by default, Gurobi behind a feature flag).
//!
//! # Overview
//!
//! Every [`model::Modeler`] carries a type-level brand. Variables, expressions
//! and constraints inherit that brand, so mixing handles from two different
//! models is a compile-time error rather than a silent indexing bug.
//!
//! # Usage Example
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use modeler::{constraint, modeler};
//!
//! let mut model = modeler!(Production);
//! let x = model.num_var(0.0, 10.0, "x");
//! let y = model.num_var(0.0, 10.0, "y");
//!
//! model.add_constraint(constraint!("capacity", (x + 2.0 * y) <= 14.0));
//! model.add_constraint(constraint!((3.0 * x - y) >= 0.0));
//! model.add_range(constraint!(1.0 <= (x - y) <= 2.0));
//! model.maximize(3.0 * x + 4.0 * y);
//!
//! let solution = model.solve()?;
//! println!("x = {:?}, objective = {}", solution.get_value(x), solution.objective_value);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - **[`model`]**: Modeling types, operator overloading, macros and the
//!   solver backends
//! - **[`models`]**: Classic formulations (diet, graph coloring, facility
//!   location, scheduling) used by the `modeler` binary
//!
//! # Solver selection
//!
//! The backend is chosen per solve through [`model::SolverParams`], or else by
//! the `MODELER_SOLVER` environment variable, falling back to the engine
//! compiled in by the Cargo features.

use clap::Parser;
use std::{error::Error, fmt};

pub mod model;
pub mod models;

pub use models::coloring::{ColoringArgs, coloring_main};
pub use models::diet::{DietArgs, diet_main};
pub use models::facility::{FacilityArgs, facility_main};
pub use models::scheduling::{SchedulingArgs, scheduling_main};

/// Application-level errors for solves that end without an assignment.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    /// The model has no feasible assignment.
    Infeasible,
    /// The objective can be improved without limit.
    Unbounded,
    /// The engine proved one of the two but not which.
    InfeasibleOrUnbounded,
    /// The engine stopped for another reason, such as a time limit.
    NoSolution(&'static str),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Infeasible => write!(f, "Problem Infeasible"),
            AppError::Unbounded => write!(f, "Problem Unbounded"),
            AppError::InfeasibleOrUnbounded => write!(f, "Problem Infeasible or Unbounded"),
            AppError::NoSolution(reason) => write!(f, "No solution found: {}", reason),
        }
    }
}

impl Error for AppError {}

/// Command-line interface arguments for the modeling tools.
///
/// Each subcommand builds one of the bundled formulations, solves it and
/// prints the result as a table.
#[derive(Debug, Parser)]
#[clap(
    name = "modeler",
    about = "Solve classic optimization models through an external LP/MIP engine"
)]
pub enum CLIArguments {
    /// Minimum-cost diet meeting nutrient ranges.
    Diet(DietArgs),
    /// Minimum vertex coloring of a graph.
    Coloring(ColoringArgs),
    /// Capacitated facility location.
    Facility(FacilityArgs),
    /// Single-machine scheduling minimizing weighted completion time.
    Scheduling(SchedulingArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        assert_eq!(AppError::Infeasible.to_string(), "Problem Infeasible");
        assert_eq!(
            AppError::NoSolution("time limit reached").to_string(),
            "No solution found: time limit reached"
        );
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let args = CLIArguments::try_parse_from(["modeler", "coloring", "--graph", "cycle", "--size", "7"])
            .expect("valid arguments");
        match args {
            CLIArguments::Coloring(args) => {
                assert_eq!(args.size, 7);
                assert_eq!(args.graph, models::coloring::GraphKind::Cycle);
            }
            other => panic!("unexpected subcommand {:?}", other),
        }

        let args = CLIArguments::try_parse_from(["modeler", "diet", "--integer", "--time-limit", "5"])
            .expect("valid arguments");
        match args {
            CLIArguments::Diet(args) => {
                assert!(args.integer);
                assert_eq!(args.solver.time_limit, Some(5.0));
            }
            other => panic!("unexpected subcommand {:?}", other),
        }

        assert!(CLIArguments::try_parse_from(["modeler", "diet", "--solver", "simplex"]).is_err());
    }
}
