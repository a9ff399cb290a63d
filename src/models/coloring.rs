//! Minimum vertex coloring of an undirected graph.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use itertools::Itertools;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use prettytable::{Table, row};

use super::{SolverArgs, require_solution};
use crate::constraint;
use crate::model::{Modeler, OptimizationStatus, SolverParams, VarArray, VarMatrix};

pub type Graph = UnGraph<(), ()>;

/// Brand of coloring models
pub struct Coloring;

pub fn cycle_graph(n: u32) -> Graph {
    let mut graph = Graph::from_edges((0..n).map(|v| (v, (v + 1) % n)));
    while graph.node_count() < n as usize {
        graph.add_node(());
    }
    graph
}

pub fn complete_graph(n: u32) -> Graph {
    let mut graph = Graph::from_edges((0..n).tuple_combinations::<(u32, u32)>());
    while graph.node_count() < n as usize {
        graph.add_node(());
    }
    graph
}

/// Outer 5-cycle, inner pentagram and five spokes
pub fn petersen_graph() -> Graph {
    let outer = (0..5u32).map(|v| (v, (v + 1) % 5));
    let inner = (0..5u32).map(|v| (5 + v, 5 + (v + 2) % 5));
    let spokes = (0..5u32).map(|v| (v, v + 5));
    Graph::from_edges(outer.chain(inner).chain(spokes))
}

/// Read an edge list with one whitespace-separated vertex pair per line.
/// Blank lines and lines starting with `#` are skipped.
pub fn read_edge_list(path: &Path) -> Result<Graph> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut edges = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((u, v)) = line.split_whitespace().collect_tuple() else {
            bail!("{}:{}: expected two vertices", path.display(), lineno + 1);
        };
        let u: u32 = u
            .parse()
            .with_context(|| format!("{}:{}: bad vertex {:?}", path.display(), lineno + 1, u))?;
        let v: u32 = v
            .parse()
            .with_context(|| format!("{}:{}: bad vertex {:?}", path.display(), lineno + 1, v))?;
        edges.push((u, v));
    }
    Ok(Graph::from_edges(edges))
}

/// Whether `colors` assigns every vertex a color different from its neighbours'
pub fn is_proper_coloring(graph: &Graph, colors: &[usize]) -> bool {
    colors.len() == graph.node_count()
        && graph
            .edge_references()
            .all(|edge| colors[edge.source().index()] != colors[edge.target().index()])
}

pub struct ColoringFormulation {
    pub model: Modeler<Coloring>,
    /// `assign[(v, c)]` is set when vertex `v` takes color `c`
    pub assign: VarMatrix<Coloring>,
    /// `used[c]` is set when any vertex takes color `c`
    pub used: VarArray<Coloring>,
}

pub fn formulate(graph: &Graph) -> ColoringFormulation {
    let n = graph.node_count();
    // a greedy coloring never needs more than max degree + 1 colors
    let k = graph
        .node_indices()
        .map(|v| graph.neighbors(v).count())
        .max()
        .map_or(0, |degree| (degree + 1).min(n));

    let mut model = Modeler::<Coloring>::named("coloring");
    let assign = model.bool_var_matrix(n, k, "x");
    let used = model.bool_var_array(k, "used");

    for v in 0..n {
        model.add_constraint(constraint!((assign.row(v).sum()) == 1.0).named(format!("one_color[{}]", v)));
    }

    for edge in graph.edge_references() {
        let (u, v) = (edge.source().index(), edge.target().index());
        for c in 0..k {
            model.add_constraint(
                constraint!((assign[(u, c)] + assign[(v, c)] - used[c]) <= 0.0)
                    .named(format!("edge[{},{}][{}]", u, v, c)),
            );
        }
    }

    // isolated vertices are not linked to `used` by any edge row
    for v in graph.node_indices().filter(|&v| graph.neighbors(v).next().is_none()) {
        let v = v.index();
        for c in 0..k {
            model.add_constraint(constraint!((assign[(v, c)] - used[c]) <= 0.0));
        }
    }

    for (a, b) in used.iter().tuple_windows() {
        model.add_constraint(constraint!((a - b) >= 0.0));
    }

    model.minimize(used.sum());

    ColoringFormulation { model, assign, used }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColoringResult {
    pub status: OptimizationStatus,
    pub num_colors: usize,
    /// Color of each vertex, by node index
    pub colors: Vec<usize>,
}

pub fn solve(graph: &Graph, params: &SolverParams) -> Result<ColoringResult> {
    let ColoringFormulation { model, assign, used } = formulate(graph);
    let solution = model.solve_with(params)?;
    require_solution(&solution)?;

    let mut colors = Vec::with_capacity(assign.rows());
    for (v, row) in assign.iter_rows().enumerate() {
        let values = solution.values(&row).unwrap_or_default();
        let Some(color) = values.iter().position(|&value| value > 0.5) else {
            bail!("vertex {} received no color", v);
        };
        colors.push(color);
    }

    let num_colors = solution
        .values(&used)
        .unwrap_or_default()
        .iter()
        .filter(|&&value| value > 0.5)
        .count();

    Ok(ColoringResult {
        status: solution.status,
        num_colors,
        colors,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphKind {
    Petersen,
    Cycle,
    Complete,
}

#[derive(Parser, Debug)]
pub struct ColoringArgs {
    /// Built-in graph family
    #[clap(long, value_enum, default_value_t = GraphKind::Petersen)]
    pub graph: GraphKind,

    /// Number of vertices for cycle and complete graphs
    #[clap(long, default_value_t = 5)]
    pub size: u32,

    /// Read the graph from an edge list instead
    #[clap(long, conflicts_with = "graph")]
    pub edges: Option<PathBuf>,

    #[clap(flatten)]
    pub solver: SolverArgs,
}

pub fn coloring_main(args: ColoringArgs) -> Result<()> {
    let graph = match (&args.edges, args.graph) {
        (Some(path), _) => read_edge_list(path)?,
        (None, GraphKind::Petersen) => petersen_graph(),
        (None, GraphKind::Cycle) => cycle_graph(args.size),
        (None, GraphKind::Complete) => complete_graph(args.size),
    };
    log::debug!(
        "coloring graph with {} vertices and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let result = solve(&graph, &args.solver.params())?;
    if !is_proper_coloring(&graph, &result.colors) {
        log::warn!("solver returned an improper coloring");
    }

    let mut table = Table::new();
    table.add_row(row!["Color", "Vertices"]);
    for (color, vertices) in &result
        .colors
        .iter()
        .enumerate()
        .sorted_by_key(|&(_, color)| color)
        .group_by(|&(_, color)| *color)
    {
        table.add_row(row![color, vertices.map(|(v, _)| v).join(" ")]);
    }
    table.printstd();
    println!("Status: {}", result.status);
    println!("Colors used: {}", result.num_colors);

    if let Some(output) = &args.solver.csv {
        let mut csv_file = BufWriter::new(fs::File::create(output)?);
        writeln!(csv_file, "vertex,color")?;
        for (v, color) in result.colors.iter().enumerate() {
            writeln!(csv_file, "{},{}", v, color)?;
        }
    }

    Ok(())
}
