//! Building a small production model with the comparison-style constraint syntax

use modeler::model::{Constraint, SolverParams};
use modeler::{constraint, modeler};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut model = modeler!(Production);

    let chairs = model.int_var(0.0, 40.0, "chairs");
    let tables = model.int_var(0.0, 20.0, "tables");
    let overtime = model.num_var(0.0, 10.0, "overtime");

    // Unnamed and named rows through the macro
    model.add_constraint(constraint!("wood", (2.0 * chairs + 5.0 * tables) <= 120.0));
    model.add_constraint(constraint!("labour", (chairs + 3.0 * tables - overtime) <= 60.0));
    model.add_constraint(constraint!((chairs - 2.0 * tables) >= 0.0));

    // Builder methods give the same rows without the macro
    let display = model.add_constraint(Constraint::ge(tables, 2.0).named("showroom"));

    // A range keeps the chair/table mix within bounds
    model.add_range(constraint!("mix", 2.0 <= (chairs - tables) <= 30.0));

    model.maximize(30.0 * chairs + 80.0 * tables - 15.0 * overtime);

    println!("{}", model);

    let solution = model.solve_with(&SolverParams::default().with_time_limit(10.0))?;
    println!("Status: {}", solution.status);
    println!("Profit: {}", solution.objective_value);
    for (name, var) in [("chairs", chairs), ("tables", tables), ("overtime", overtime)] {
        println!("{} = {:?}", name, solution.get_value(var));
    }
    println!("showroom activity = {:?}", model.activity(&solution, display));

    Ok(())
}
