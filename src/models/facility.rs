//! Capacitated facility location: decide which facilities to open and how
//! each customer's demand is split between them.

use std::{
    fs,
    io::{BufWriter, Write},
};

use anyhow::{Result, ensure};
use clap::Parser;
use itertools::Itertools;
use prettytable::{Cell, Table, row};

use super::{SolverArgs, require_solution};
use crate::constraint;
use crate::model::{LinearExpression, Modeler, OptimizationStatus, SolverParams, VarArray, VarMatrix, sum};

#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub name: String,
    pub fixed_cost: f64,
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityInstance {
    pub facilities: Vec<Facility>,
    pub demand: Vec<f64>,
    /// `transport[f][c]`: cost of shipping one unit from facility `f` to customer `c`
    pub transport: Vec<Vec<f64>>,
}

impl FacilityInstance {
    /// Three sites, five customers; total demand exceeds any single capacity
    pub fn sample() -> Self {
        let facility = |name: &str, fixed_cost: f64, capacity: f64| Facility {
            name: name.to_string(),
            fixed_cost,
            capacity,
        };

        Self {
            facilities: vec![
                facility("north", 100.0, 50.0),
                facility("centre", 80.0, 45.0),
                facility("south", 120.0, 60.0),
            ],
            demand: vec![15.0, 20.0, 25.0, 10.0, 20.0],
            transport: vec![
                vec![1.0, 2.0, 4.0, 5.0, 6.0],
                vec![3.0, 1.5, 1.0, 2.5, 3.0],
                vec![6.0, 5.0, 3.0, 1.0, 1.5],
            ],
        }
    }

    pub fn total_demand(&self) -> f64 {
        self.demand.iter().sum()
    }

    fn check(&self) -> Result<()> {
        ensure!(
            self.transport.len() == self.facilities.len(),
            "transport costs list {} facilities, expected {}",
            self.transport.len(),
            self.facilities.len()
        );
        for (facility, costs) in self.facilities.iter().zip(&self.transport) {
            ensure!(
                costs.len() == self.demand.len(),
                "facility {} lists {} transport costs, expected {}",
                facility.name,
                costs.len(),
                self.demand.len()
            );
        }
        Ok(())
    }
}

/// Brand of facility location models
pub struct Location;

pub struct FacilityFormulation {
    pub model: Modeler<Location>,
    pub open: VarArray<Location>,
    /// `serve[(f, c)]`: fraction of customer `c`'s demand met by facility `f`
    pub serve: VarMatrix<Location>,
}

pub fn formulate(instance: &FacilityInstance) -> Result<FacilityFormulation> {
    instance.check()?;
    let nf = instance.facilities.len();
    let nc = instance.demand.len();

    let mut model = Modeler::<Location>::named("facility");
    let open = model.bool_var_array(nf, "open");
    let serve = model.num_var_matrix(nf, nc, 0.0, 1.0, "serve");

    for c in 0..nc {
        model.add_constraint(constraint!((serve.column(c).sum()) == 1.0).named(format!("demand[{}]", c)));
    }

    for (f, facility) in instance.facilities.iter().enumerate() {
        let shipped = serve.row(f).scal_prod(&instance.demand)?;
        model.add_constraint(
            constraint!((shipped - facility.capacity * open[f]) <= 0.0).named(format!("capacity[{}]", facility.name)),
        );
    }

    // redundant with capacity, but tightens the relaxation
    for (f, c) in (0..nf).cartesian_product(0..nc) {
        model.add_constraint(constraint!((serve[(f, c)] - open[f]) <= 0.0));
    }

    let fixed: Vec<f64> = instance.facilities.iter().map(|facility| facility.fixed_cost).collect();
    let transport: LinearExpression<Location> = sum((0..nf).cartesian_product(0..nc).map(|(f, c)| {
        instance.transport[f][c] * instance.demand[c] * serve[(f, c)]
    }));
    model.minimize(open.scal_prod(&fixed)? + transport);

    Ok(FacilityFormulation { model, open, serve })
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityPlan {
    pub status: OptimizationStatus,
    pub cost: f64,
    pub open: Vec<bool>,
    /// `served[f][c]`: units shipped from facility `f` to customer `c`
    pub served: Vec<Vec<f64>>,
}

impl FacilityPlan {
    pub fn shipped_from(&self, facility: usize) -> f64 {
        self.served[facility].iter().sum()
    }

    pub fn received_by(&self, customer: usize) -> f64 {
        self.served.iter().map(|row| row[customer]).sum()
    }
}

pub fn solve(instance: &FacilityInstance, params: &SolverParams) -> Result<FacilityPlan> {
    let FacilityFormulation { model, open, serve } = formulate(instance)?;
    let solution = model.solve_with(params)?;
    require_solution(&solution)?;

    let open = open
        .iter()
        .map(|var| solution.get_value(var).is_some_and(|value| value > 0.5))
        .collect();
    let served = serve
        .iter_rows()
        .map(|row| {
            row.iter()
                .zip(&instance.demand)
                .map(|(var, demand)| solution.get_value(var).unwrap_or(0.0) * demand)
                .collect()
        })
        .collect();

    Ok(FacilityPlan {
        status: solution.status,
        cost: solution.objective_value,
        open,
        served,
    })
}

#[derive(Parser, Debug)]
pub struct FacilityArgs {
    #[clap(flatten)]
    pub solver: SolverArgs,
}

pub fn facility_main(args: FacilityArgs) -> Result<()> {
    let instance = FacilityInstance::sample();
    let plan = solve(&instance, &args.solver.params())?;

    let mut table = Table::new();
    let mut header = row!["Facility", "Open"];
    for c in 0..instance.demand.len() {
        header.add_cell(Cell::new(&format!("c{}", c)));
    }
    header.add_cell(Cell::new("Load"));
    table.add_row(header);
    for (f, facility) in instance.facilities.iter().enumerate() {
        let open = if plan.open[f] { "yes" } else { "no" };
        let mut line = row![facility.name, open];
        for units in &plan.served[f] {
            line.add_cell(Cell::new(&format!("{:.1}", units)));
        }
        line.add_cell(Cell::new(&format!(
            "{:.1}/{:.1}",
            plan.shipped_from(f),
            facility.capacity
        )));
        table.add_row(line);
    }
    table.printstd();
    println!("Status: {}", plan.status);
    println!("Total cost: {:.2}", plan.cost);

    if let Some(output) = &args.solver.csv {
        let mut csv_file = BufWriter::new(fs::File::create(output)?);
        writeln!(csv_file, "facility,customer,units")?;
        for (f, facility) in instance.facilities.iter().enumerate() {
            for (c, units) in plan.served[f].iter().enumerate() {
                if *units > 0.0 {
                    writeln!(csv_file, "{},{},{:.4}", facility.name, c, units)?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formulation_shape() {
        let instance = FacilityInstance::sample();
        let formulation = formulate(&instance).expect("sample is consistent");

        assert_eq!(formulation.open.len(), 3);
        assert_eq!(formulation.serve.rows(), 3);
        assert_eq!(formulation.serve.cols(), 5);
        assert_eq!(formulation.model.num_variables(), 3 + 15);
        // demand, capacity, linking
        assert_eq!(formulation.model.num_constraints(), 5 + 3 + 15);
        assert!(formulation.model.validate().is_ok());
    }

    #[test]
    fn test_sample_needs_two_sites() {
        let instance = FacilityInstance::sample();
        for facility in &instance.facilities {
            assert!(facility.capacity < instance.total_demand());
        }
    }

    #[test]
    fn test_closed_site_cannot_serve() {
        let instance = FacilityInstance::sample();
        let formulation = formulate(&instance).expect("sample is consistent");
        let mut values = vec![0.0; formulation.model.num_variables()];
        // everyone served by "north" while it is closed
        for c in 0..5 {
            values[formulation.serve[(0, c)].index()] = 1.0;
        }
        assert!(!formulation.model.is_satisfied_by(&values, 1e-9));
    }

    #[test]
    fn test_inconsistent_instance_is_rejected() {
        let mut instance = FacilityInstance::sample();
        instance.transport[1].pop();
        assert!(formulate(&instance).is_err());
    }

    #[cfg(feature = "coin_cbc")]
    #[test]
    fn test_solved_plan_is_consistent() {
        let instance = FacilityInstance::sample();
        let plan = solve(&instance, &SolverParams::default()).expect("sample is feasible");

        assert_eq!(plan.status, OptimizationStatus::Optimal);
        assert!(plan.open.iter().filter(|&&open| open).count() >= 2);
        for (c, demand) in instance.demand.iter().enumerate() {
            assert!((plan.received_by(c) - demand).abs() < 1e-4);
        }
        for (f, facility) in instance.facilities.iter().enumerate() {
            assert!(plan.shipped_from(f) <= facility.capacity + 1e-4);
            if !plan.open[f] {
                assert!(plan.shipped_from(f) < 1e-6);
            }
        }
    }
}
