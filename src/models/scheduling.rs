//! Single-machine scheduling with release dates, minimizing the weighted sum
//! of completion times.

use std::{
    fs,
    io::{BufWriter, Write},
};

use anyhow::{Result, ensure};
use clap::Parser;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use prettytable::{Table, row};

use super::{SolverArgs, require_solution};
use crate::constraint;
use crate::model::{Modeler, OptimizationStatus, SolverParams, VarArray, VariableId, sum};

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub name: String,
    pub processing: f64,
    pub weight: f64,
    pub release: f64,
}

impl Job {
    pub fn new(name: impl Into<String>, processing: f64, weight: f64, release: f64) -> Self {
        Self {
            name: name.into(),
            processing,
            weight,
            release,
        }
    }
}

pub fn sample_jobs() -> Vec<Job> {
    vec![
        Job::new("cut", 4.0, 2.0, 0.0),
        Job::new("drill", 2.0, 1.0, 1.0),
        Job::new("weld", 5.0, 4.0, 3.0),
        Job::new("paint", 3.0, 3.0, 2.0),
        Job::new("pack", 1.0, 1.0, 8.0),
    ]
}

/// Brand of scheduling models
pub struct Schedule;

pub struct SchedulingFormulation {
    pub model: Modeler<Schedule>,
    pub start: VarArray<Schedule>,
    /// Precedence binaries: for `i < j`, set when job `i` runs before job `j`
    pub before: Vec<((usize, usize), VariableId<Schedule>)>,
    /// Horizon used as the big-M of the disjunctions
    pub horizon: f64,
}

fn check(jobs: &[Job]) -> Result<()> {
    for job in jobs {
        ensure!(
            job.processing >= 0.0 && job.release >= 0.0 && job.weight >= 0.0,
            "job {} has a negative duration, weight or release date",
            job.name
        );
    }
    Ok(())
}

pub fn formulate(jobs: &[Job]) -> Result<SchedulingFormulation> {
    check(jobs)?;
    // no job needs to start later than the last release plus all the work
    let horizon = jobs.iter().map(|job| job.release).fold(0.0, f64::max)
        + jobs.iter().map(|job| job.processing).sum::<f64>();

    let mut model = Modeler::<Schedule>::named("scheduling");
    let start: VarArray<Schedule> = jobs
        .iter()
        .map(|job| model.num_var(job.release, horizon - job.processing, format!("start[{}]", job.name)))
        .collect();

    let mut before = Vec::new();
    for (i, j) in (0..jobs.len()).tuple_combinations() {
        let y = model.bool_var(format!("before[{}][{}]", jobs[i].name, jobs[j].name));
        let (p_i, p_j) = (jobs[i].processing, jobs[j].processing);

        // y = 1: i finishes before j starts
        model.add_constraint(constraint!((start[i] - start[j] + horizon * y) <= horizon - p_i));
        // y = 0: j finishes before i starts
        model.add_constraint(constraint!((start[j] - start[i] - horizon * y) <= -p_j));
        before.push(((i, j), y));
    }

    let completion = sum(
        jobs.iter()
            .zip(start.iter())
            .map(|(job, s)| job.weight * (s + job.processing)),
    );
    model.minimize(completion);

    Ok(SchedulingFormulation {
        model,
        start,
        before,
        horizon,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledJob {
    pub job: usize,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleResult {
    pub status: OptimizationStatus,
    pub weighted_completion: f64,
    /// Jobs ordered by start time
    pub sequence: Vec<ScheduledJob>,
}

pub fn solve(jobs: &[Job], params: &SolverParams) -> Result<ScheduleResult> {
    let SchedulingFormulation { model, start, .. } = formulate(jobs)?;
    let solution = model.solve_with(params)?;
    require_solution(&solution)?;

    let sequence = jobs
        .iter()
        .zip(start.iter())
        .enumerate()
        .map(|(idx, (job, var))| {
            let start = solution.get_value(var).unwrap_or(job.release);
            ScheduledJob {
                job: idx,
                start,
                end: start + job.processing,
            }
        })
        .sorted_by_key(|scheduled| OrderedFloat(scheduled.start))
        .collect();

    Ok(ScheduleResult {
        status: solution.status,
        weighted_completion: solution.objective_value,
        sequence,
    })
}

#[derive(Parser, Debug)]
pub struct SchedulingArgs {
    #[clap(flatten)]
    pub solver: SolverArgs,
}

pub fn scheduling_main(args: SchedulingArgs) -> Result<()> {
    let jobs = sample_jobs();
    let result = solve(&jobs, &args.solver.params())?;

    let mut table = Table::new();
    table.add_row(row!["Job", "Release", "Start", "End", "Weight"]);
    for scheduled in &result.sequence {
        let job = &jobs[scheduled.job];
        table.add_row(row![
            job.name,
            job.release,
            format!("{:.1}", scheduled.start),
            format!("{:.1}", scheduled.end),
            job.weight
        ]);
    }
    table.printstd();
    println!("Status: {}", result.status);
    println!("Weighted completion: {:.2}", result.weighted_completion);

    if let Some(output) = &args.solver.csv {
        let mut csv_file = BufWriter::new(fs::File::create(output)?);
        writeln!(csv_file, "job,start,end")?;
        for scheduled in &result.sequence {
            writeln!(
                csv_file,
                "{},{:.4},{:.4}",
                jobs[scheduled.job].name, scheduled.start, scheduled.end
            )?;
        }
    }

    Ok(())
}
