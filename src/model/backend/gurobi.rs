use anyhow::{Context, Result};
use ::gurobi::{ConstrSense, Env, LinExpr, Model, ModelSense, Status, Var, VarType, attr, param};

use super::SolverParams;
use crate::model::*;

fn linear_expr(vars: &[Var], terms: &[(usize, f64)]) -> LinExpr {
    terms
        .iter()
        .fold(LinExpr::new(), |expr, &(idx, coefficient)| {
            expr.add_term(coefficient, vars[idx].clone())
        })
}

fn environment(params: &SolverParams) -> Result<Env> {
    let mut env = Env::new("").context("failed to create Gurobi environment")?;
    if !params.verbose {
        env.set(param::OutputFlag, 0)?;
    }
    if let Some(seconds) = params.time_limit {
        env.set(param::TimeLimit, seconds)?;
    }
    if let Some(gap) = params.mip_gap {
        env.set(param::MIPGap, gap)?;
    }
    if let Some(threads) = params.engine_threads()? {
        env.set(param::Threads, threads)?;
    }
    Ok(env)
}

/// Solve a model using Gurobi
pub fn solve_gurobi<Brand>(modeler: &Modeler<Brand>, params: &SolverParams) -> Result<Solution<Brand>> {
    let env = environment(params)?;
    let mut model = Model::new(modeler.name(), &env).context("failed to create Gurobi model")?;

    let mut vars = Vec::with_capacity(modeler.variables.len());
    for (idx, var_info) in modeler.variables.iter().enumerate() {
        let vtype = match var_info.var_type {
            VariableType::Continuous => VarType::Continuous,
            VariableType::Integer => VarType::Integer,
            VariableType::Binary => VarType::Binary,
        };

        let var = model.add_var(
            &modeler.label(idx),
            vtype,
            0.0, // objective coefficient
            var_info.lower_bound,
            var_info.upper_bound,
            &[], // coefficients for existing constraints
            &[], // constraint indices
        )?;
        vars.push(var);
    }
    model.update()?;

    // Gurobi rows are one-sided, so a range becomes a pair of rows
    for lowered in modeler.lowered_rows() {
        let name = match lowered.name {
            Some(name) => name.to_string(),
            None => format!("c{}", lowered.index),
        };

        if lowered.lower == lowered.upper {
            let expr = linear_expr(&vars, &lowered.terms);
            model.add_constr(&name, expr, ConstrSense::Equal, lowered.lower)?;
            continue;
        }
        if lowered.lower.is_finite() {
            let expr = linear_expr(&vars, &lowered.terms);
            model.add_constr(&format!("{}_lo", name), expr, ConstrSense::Greater, lowered.lower)?;
        }
        if lowered.upper.is_finite() {
            let expr = linear_expr(&vars, &lowered.terms);
            model.add_constr(&format!("{}_up", name), expr, ConstrSense::Less, lowered.upper)?;
        }
    }

    // Update the model before setting objective
    model.update()?;

    if let Some(objective) = modeler.lowered_objective() {
        let expr = linear_expr(&vars, &objective.terms).add_constant(objective.constant);
        let sense = match objective.sense {
            OptimizationSense::Minimize => ModelSense::Minimize,
            OptimizationSense::Maximize => ModelSense::Maximize,
        };
        model.set_objective(expr, sense)?;
    }

    model.optimize().context("Gurobi optimization failed")?;

    let solution_count: i32 = model.get(attr::SolCount)?;
    let status = match model.status()? {
        Status::Optimal => OptimizationStatus::Optimal,
        Status::Infeasible => OptimizationStatus::Infeasible,
        Status::Unbounded => OptimizationStatus::Unbounded,
        Status::InfOrUnbd => OptimizationStatus::InfeasibleOrUnbounded,
        _ if solution_count > 0 => OptimizationStatus::Feasible,
        Status::TimeLimit => OptimizationStatus::Other("time limit reached"),
        _ => OptimizationStatus::Other("unknown status"),
    };

    // Values are only available when Gurobi holds an incumbent
    let mut variable_values = vec![0.0; vars.len()];
    let objective_value = if status.has_solution() {
        for (value, var) in variable_values.iter_mut().zip(&vars) {
            *value = var.get(&model, attr::X)?;
        }
        if modeler.objective().is_some() {
            model.get(attr::ObjVal)?
        } else {
            0.0
        }
    } else {
        0.0
    };

    Ok(Solution::new(status, objective_value, variable_values))
}
