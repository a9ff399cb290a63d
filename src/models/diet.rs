//! The diet problem: buy food servings at minimum cost so that every
//! nutrient intake falls within its recommended range.

use std::{
    fs,
    io::{BufWriter, Write},
};

use anyhow::{Result, ensure};
use clap::Parser;
use prettytable::{Table, row};

use super::{SolverArgs, require_solution};
use crate::model::{ConstraintId, Modeler, OptimizationStatus, Range, SolverParams, VarArray};

#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub name: String,
    /// Price of one serving
    pub cost: f64,
    pub max_servings: f64,
    /// Nutrient content of one serving, parallel to `DietInstance::nutrients`
    pub content: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nutrient {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DietInstance {
    pub foods: Vec<Food>,
    pub nutrients: Vec<Nutrient>,
}

impl DietInstance {
    /// A small daily menu: calories, protein (g), calcium (mg) and fat (g)
    pub fn sample() -> Self {
        let nutrient = |name: &str, min: f64, max: f64| Nutrient {
            name: name.to_string(),
            min,
            max,
        };
        let food = |name: &str, cost: f64, content: [f64; 4]| Food {
            name: name.to_string(),
            cost,
            max_servings: 10.0,
            content: content.to_vec(),
        };

        Self {
            nutrients: vec![
                nutrient("calories", 2000.0, 3000.0),
                nutrient("protein", 60.0, f64::INFINITY),
                nutrient("calcium", 800.0, f64::INFINITY),
                nutrient("fat", 0.0, 90.0),
            ],
            foods: vec![
                food("bread", 0.30, [250.0, 8.0, 60.0, 3.0]),
                food("milk", 0.45, [150.0, 8.0, 300.0, 8.0]),
                food("cheese", 0.90, [400.0, 25.0, 700.0, 33.0]),
                food("potato", 0.25, [160.0, 4.0, 20.0, 0.0]),
                food("fish", 1.40, [200.0, 40.0, 50.0, 5.0]),
                food("yogurt", 0.50, [150.0, 13.0, 450.0, 4.0]),
            ],
        }
    }

    fn check(&self) -> Result<()> {
        for food in &self.foods {
            ensure!(
                food.content.len() == self.nutrients.len(),
                "food {} lists {} nutrients, expected {}",
                food.name,
                food.content.len(),
                self.nutrients.len()
            );
        }
        Ok(())
    }
}

/// Brand of diet models
pub struct Diet;

pub struct DietFormulation {
    pub model: Modeler<Diet>,
    /// Servings bought of each food
    pub buy: VarArray<Diet>,
    /// One range per nutrient
    pub intake: Vec<ConstraintId>,
}

/// Build the diet model; `integer` restricts purchases to whole servings
pub fn formulate(instance: &DietInstance, integer: bool) -> Result<DietFormulation> {
    instance.check()?;

    let mut model = Modeler::<Diet>::named("diet");
    let buy: VarArray<Diet> = instance
        .foods
        .iter()
        .map(|food| {
            if integer {
                model.int_var(0.0, food.max_servings, food.name.as_str())
            } else {
                model.num_var(0.0, food.max_servings, food.name.as_str())
            }
        })
        .collect();

    let mut intake = Vec::with_capacity(instance.nutrients.len());
    for (n, nutrient) in instance.nutrients.iter().enumerate() {
        let content: Vec<f64> = instance.foods.iter().map(|food| food.content[n]).collect();
        let range = Range::new(nutrient.min, buy.scal_prod(&content)?, nutrient.max)
            .named(nutrient.name.as_str());
        intake.push(model.add_range(range));
    }

    let costs: Vec<f64> = instance.foods.iter().map(|food| food.cost).collect();
    model.minimize(buy.scal_prod(&costs)?);

    Ok(DietFormulation { model, buy, intake })
}

#[derive(Debug, Clone, PartialEq)]
pub struct DietPlan {
    pub status: OptimizationStatus,
    pub cost: f64,
    /// Servings per food, in instance order
    pub servings: Vec<(String, f64)>,
    /// Achieved intake per nutrient, in instance order
    pub intake: Vec<(String, f64)>,
}

pub fn solve(instance: &DietInstance, integer: bool, params: &SolverParams) -> Result<DietPlan> {
    let DietFormulation { model, buy, intake } = formulate(instance, integer)?;
    let solution = model.solve_with(params)?;
    require_solution(&solution)?;

    let servings = instance
        .foods
        .iter()
        .zip(buy.iter())
        .map(|(food, var)| (food.name.clone(), solution.get_value(var).unwrap_or(0.0)))
        .collect();
    let intake = instance
        .nutrients
        .iter()
        .zip(intake)
        .map(|(nutrient, id)| {
            let amount = model.activity(&solution, id).unwrap_or(0.0);
            (nutrient.name.clone(), amount)
        })
        .collect();

    Ok(DietPlan {
        status: solution.status,
        cost: solution.objective_value,
        servings,
        intake,
    })
}

#[derive(Parser, Debug)]
pub struct DietArgs {
    /// Buy whole servings only
    #[clap(long)]
    pub integer: bool,

    #[clap(flatten)]
    pub solver: SolverArgs,
}

pub fn diet_main(args: DietArgs) -> Result<()> {
    let instance = DietInstance::sample();
    let plan = solve(&instance, args.integer, &args.solver.params())?;

    let mut table = Table::new();
    table.add_row(row!["Food", "Servings", "Cost"]);
    for ((name, servings), food) in plan.servings.iter().zip(&instance.foods) {
        if *servings > 0.0 {
            table.add_row(row![name, format!("{:.2}", servings), format!("{:.2}", servings * food.cost)]);
        }
    }
    table.printstd();

    let mut table = Table::new();
    table.add_row(row!["Nutrient", "Intake", "Min", "Max"]);
    for ((name, amount), nutrient) in plan.intake.iter().zip(&instance.nutrients) {
        table.add_row(row![name, format!("{:.1}", amount), nutrient.min, nutrient.max]);
    }
    table.printstd();
    println!("Status: {}", plan.status);
    println!("Total cost: {:.2}", plan.cost);

    if let Some(output) = &args.solver.csv {
        let mut csv_file = BufWriter::new(fs::File::create(output)?);
        writeln!(csv_file, "food,servings")?;
        for (name, servings) in &plan.servings {
            writeln!(csv_file, "{},{:.4}", name, servings)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formulation_shape() {
        let instance = DietInstance::sample();
        let formulation = formulate(&instance, false).expect("sample is consistent");

        assert_eq!(formulation.buy.len(), 6);
        assert_eq!(formulation.intake.len(), 4);
        assert_eq!(formulation.model.num_variables(), 6);
        assert_eq!(formulation.model.num_constraints(), 4);
        assert!(formulation.model.validate().is_ok());
        assert_eq!(
            formulation.model.variable_name(formulation.buy[2]),
            Some("cheese".to_string())
        );
    }

    #[test]
    fn test_reference_menu_is_feasible() {
        let instance = DietInstance::sample();
        let formulation = formulate(&instance, true).expect("sample is consistent");

        // 6 bread, 2 milk, 2 potatoes
        let menu = [6.0, 2.0, 0.0, 2.0, 0.0, 0.0];
        assert!(formulation.model.is_satisfied_by(&menu, 1e-9));
        // bread alone lacks calcium
        assert!(!formulation.model.is_satisfied_by(&[10.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1e-9));
    }

    #[test]
    fn test_inconsistent_instance_is_rejected() {
        let mut instance = DietInstance::sample();
        instance.foods[0].content.pop();
        assert!(formulate(&instance, false).is_err());
    }

    #[cfg(feature = "coin_cbc")]
    #[test]
    fn test_solved_plan_respects_ranges() {
        let instance = DietInstance::sample();
        for integer in [false, true] {
            let plan = solve(&instance, integer, &SolverParams::default()).expect("sample is feasible");

            // never worse than the reference menu
            assert!(plan.cost <= 3.2 + 1e-6, "cost {}", plan.cost);
            for ((_, amount), nutrient) in plan.intake.iter().zip(&instance.nutrients) {
                assert!(*amount >= nutrient.min - 1e-6);
                assert!(*amount <= nutrient.max + 1e-6);
            }
            if integer {
                for (_, servings) in &plan.servings {
                    assert!((servings - servings.round()).abs() < 1e-6);
                }
            }
        }
    }
}
