use anyhow::Result;
use ::coin_cbc::{Col, Model, Sense};

use super::SolverParams;
use super::output_suppression::QuietGuard;
use crate::model::*;

/// Round a floating-point number to a specified number of significant digits
/// This is a workaround to mask floating point errors in CBC.
fn round_to_sig_digits(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }

    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(digits as i32 - magnitude - 1);
    (value * scale).round() / scale
}

fn apply_params(model: &mut Model, params: &SolverParams) -> Result<()> {
    if !params.verbose {
        model.set_parameter("logLevel", "0");
    }
    if let Some(seconds) = params.time_limit {
        model.set_parameter("seconds", &seconds.to_string());
    }
    if let Some(gap) = params.mip_gap {
        model.set_parameter("ratioGap", &gap.to_string());
    }
    if let Some(threads) = params.engine_threads()? {
        model.set_parameter("threads", &threads.to_string());
    }
    Ok(())
}

/// Termination flags reported by CBC
#[derive(Debug, Clone, Copy, Default)]
struct Termination {
    proven_optimal: bool,
    proven_infeasible: bool,
    continuous_unbounded: bool,
    seconds_limit: bool,
}

/// Map CBC's termination flags to a status. CBC has no flag for a feasible
/// but unproven incumbent, so `satisfied` tells whether the returned
/// assignment passes the model's own check.
fn classify(termination: Termination, satisfied: bool) -> OptimizationStatus {
    if termination.proven_optimal {
        OptimizationStatus::Optimal
    } else if termination.proven_infeasible {
        OptimizationStatus::Infeasible
    } else if termination.continuous_unbounded {
        OptimizationStatus::Unbounded
    } else if satisfied {
        OptimizationStatus::Feasible
    } else if termination.seconds_limit {
        log::warn!("CBC reached its time limit without a feasible solution");
        OptimizationStatus::Other("time limit reached")
    } else {
        OptimizationStatus::Other("unknown status")
    }
}

/// Solve a model using Coin CBC
pub fn solve_coin_cbc<Brand>(modeler: &Modeler<Brand>, params: &SolverParams) -> Result<Solution<Brand>> {
    let _quiet = QuietGuard::acquire(params.verbose);
    let mut model = Model::default();
    apply_params(&mut model, params)?;

    // Columns are created in variable order, so a variable's index is its column
    let cols: Vec<Col> = modeler
        .variables
        .iter()
        .map(|var_info| {
            let col = match var_info.var_type {
                VariableType::Continuous => model.add_col(),
                VariableType::Integer => model.add_integer(),
                VariableType::Binary => model.add_binary(),
            };
            model.set_col_lower(col, var_info.lower_bound);
            model.set_col_upper(col, var_info.upper_bound);
            col
        })
        .collect();

    for lowered in modeler.lowered_rows() {
        let row = model.add_row();
        for &(idx, coefficient) in &lowered.terms {
            model.set_weight(row, cols[idx], coefficient);
        }

        if lowered.lower == lowered.upper {
            model.set_row_equal(row, lowered.lower);
        } else {
            if lowered.lower.is_finite() {
                model.set_row_lower(row, lowered.lower);
            }
            if lowered.upper.is_finite() {
                model.set_row_upper(row, lowered.upper);
            }
        }
    }

    let objective = modeler.lowered_objective();
    if let Some(objective) = &objective {
        for &(idx, coefficient) in &objective.terms {
            model.set_obj_coeff(cols[idx], coefficient);
        }
        model.set_obj_sense(match objective.sense {
            OptimizationSense::Minimize => Sense::Minimize,
            OptimizationSense::Maximize => Sense::Maximize,
        });
    }

    let solution = model.solve();

    let variable_values: Vec<f64> = cols
        .iter()
        .map(|&col| round_to_sig_digits(solution.col(col), 8))
        .collect();

    // CBC does not know about the constant term, evaluate the objective here
    let objective_value = match &objective {
        Some(objective) => {
            let value = objective
                .terms
                .iter()
                .fold(objective.constant, |acc, &(idx, coefficient)| {
                    acc + coefficient * variable_values[idx]
                });
            round_to_sig_digits(value, 8)
        }
        None => 0.0,
    };

    let raw = solution.raw();
    let termination = Termination {
        proven_optimal: raw.is_proven_optimal(),
        proven_infeasible: raw.is_proven_infeasible(),
        continuous_unbounded: raw.is_continuous_unbounded(),
        seconds_limit: raw.is_seconds_limit_reached(),
    };
    let satisfied = modeler.is_satisfied_by(&variable_values, FEASIBILITY_TOLERANCE);
    let status = classify(termination, satisfied);

    let objective_value = if status.has_solution() {
        objective_value
    } else {
        0.0
    };

    Ok(Solution::new(status, objective_value, variable_values))
}
