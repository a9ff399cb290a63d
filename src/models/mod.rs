//! Demonstration models
//!
//! Classic textbook formulations written against the public modeling API.
//! Each module exposes an instance type, a `formulate` function returning the
//! model together with the handles needed to read a solution back, a `solve`
//! function and the command-line entry point used by the `modeler` binary.

use std::path::PathBuf;

use clap::Args;

use crate::AppError;
use crate::model::{OptimizationStatus, Solution, SolverBackend, SolverParams};

pub mod coloring;
pub mod diet;
pub mod facility;
pub mod scheduling;

/// Solver options shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// Solver backend (gurobi, coin_cbc); defaults to MODELER_SOLVER or the compiled-in engine
    #[clap(long, value_parser = SolverBackend::from_name)]
    pub solver: Option<SolverBackend>,

    /// Time limit in seconds
    #[clap(long)]
    pub time_limit: Option<f64>,

    /// Relative MIP gap at which the search stops
    #[clap(long)]
    pub mip_gap: Option<f64>,

    /// Number of solver threads
    #[clap(long)]
    pub threads: Option<u32>,

    /// Show the solver log
    #[clap(short, long)]
    pub verbose: bool,

    /// Write the solution to a CSV file
    #[clap(long)]
    pub csv: Option<PathBuf>,
}

impl SolverArgs {
    pub fn params(&self) -> SolverParams {
        SolverParams {
            backend: self.solver,
            time_limit: self.time_limit,
            mip_gap: self.mip_gap,
            threads: self.threads,
            verbose: self.verbose,
        }
    }
}

/// Turn a status without an assignment into an application error
pub(crate) fn require_solution<Brand>(solution: &Solution<Brand>) -> Result<(), AppError> {
    match solution.status {
        OptimizationStatus::Optimal | OptimizationStatus::Feasible => Ok(()),
        OptimizationStatus::Infeasible => Err(AppError::Infeasible),
        OptimizationStatus::Unbounded => Err(AppError::Unbounded),
        OptimizationStatus::InfeasibleOrUnbounded => Err(AppError::InfeasibleOrUnbounded),
        OptimizationStatus::Other(reason) => Err(AppError::NoSolution(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_args_to_params() {
        let args = SolverArgs {
            time_limit: Some(30.0),
            threads: Some(4),
            verbose: true,
            ..SolverArgs::default()
        };
        let params = args.params();
        assert_eq!(params.time_limit, Some(30.0));
        assert_eq!(params.threads, Some(4));
        assert_eq!(params.mip_gap, None);
        assert!(params.verbose);
    }

    #[test]
    fn test_require_solution() {
        struct Brand;
        let solution = Solution::<Brand>::new(OptimizationStatus::Unbounded, 0.0, Vec::new());
        assert_eq!(require_solution(&solution), Err(AppError::Unbounded));

        let solution = Solution::<Brand>::new(OptimizationStatus::Other("node limit"), 0.0, Vec::new());
        assert_eq!(require_solution(&solution), Err(AppError::NoSolution("node limit")));

        let solution = Solution::<Brand>::new(OptimizationStatus::Feasible, 1.0, vec![1.0]);
        assert_eq!(require_solution(&solution), Ok(()));
    }
}
