//! Two models side by side: each has its own brand, so their variables cannot be mixed

use modeler::model::{OptimizationSense, sum};
use modeler::{constraint, modeler};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    println!("=== Branded models ===\n");

    let mut production = modeler!(ProductionModel);
    let mut logistics = modeler!(LogisticsModel);

    let widgets = production.num_var(0.0, 1000.0, "widgets");
    let gadgets = production.num_var(0.0, 500.0, "gadgets");

    let trucks = logistics.int_var_array(3, 0.0, 4.0, "trucks");
    let capacity = [12.0, 20.0, 30.0];
    let cost = [100.0, 150.0, 210.0];

    production.add_constraint(constraint!("capacity", (widgets + 2.0 * gadgets) <= 1200.0));
    production.add_constraint(constraint!("labour", (0.5 * widgets + gadgets) <= 400.0));
    production.set_objective(50.0 * widgets + 80.0 * gadgets, OptimizationSense::Maximize);

    logistics.add_constraint(constraint!("load", (trucks.scal_prod(&capacity)?) >= 75.0));
    logistics.add_constraint(constraint!("fleet", (sum(trucks.iter())) <= 5.0));
    logistics.minimize(trucks.scal_prod(&cost)?);

    // The following would not compile, the brands differ:
    // production.add_constraint(constraint!((trucks[0]) <= 5.0));
    // let mixed = widgets + trucks[0];

    let plan = production.solve()?;
    println!("{}: {} with profit {}", production.name(), plan.status, plan.objective_value);
    println!("  widgets = {:?}, gadgets = {:?}\n", plan.get_value(widgets), plan.get_value(gadgets));

    let fleet = logistics.solve()?;
    println!("{}: {} with cost {}", logistics.name(), fleet.status, fleet.objective_value);
    println!("  trucks = {:?}", fleet.values(&trucks));

    Ok(())
}
