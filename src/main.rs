use anyhow::Result;
use clap::Parser;
use modeler::{CLIArguments, coloring_main, diet_main, facility_main, scheduling_main};

fn main() -> Result<()> {
    env_logger::init();
    let args = CLIArguments::parse();

    match args {
        CLIArguments::Diet(args) => diet_main(args),
        CLIArguments::Coloring(args) => coloring_main(args),
        CLIArguments::Facility(args) => facility_main(args),
        CLIArguments::Scheduling(args) => scheduling_main(args),
    }
}
