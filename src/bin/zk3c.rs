//! zk3c CLI — interactive zero-knowledge proof of 3-colorability
//!
//! Commands:
//!   zk3c prove    — solve for a witness and run the proof rounds
//!   zk3c solve    — print a proper k-coloring (the Prover's secret)
//!   zk3c minimal  — print the chromatic number
//!   zk3c graph    — print the adjacency matrix and edge list

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use zk_three_color::config::{ChallengeSampling, ProtocolConfig};
use zk_three_color::graph::{BuiltinGraph, ColoringSolver, Graph, GraphSource, JsonGraphFile};
use zk_three_color::protocol::{OverallVerdict, ProtocolEngine};

const MAX_COLORS: u8 = 8;

fn print_usage() {
    println!(
        r#"
zk3c — zero-knowledge proof that a graph is 3-colorable

Usage: zk3c <command> [options]

Commands:
  prove     Solve for a coloring and run the interactive proof
  solve     Print a proper coloring (the Prover's secret witness)
  minimal   Print the chromatic number (up to {max})
  graph     Print the adjacency matrix and edges
  help      Show this message

Options:
  --graph <path>     JSON adjacency matrix (default: builtin 10-vertex graph)
  --config <path>    JSON protocol config
  --rounds <n>       Number of proof rounds
  --colors <k>       Number of colors
  --edges-only       Challenge only actual edges
  --no-commit        Skip vertex commitments (baseline, unbound reveals)
  --seed <n>         Fixed RNG seed
  --json             Print the transcript as JSON

Examples:
  zk3c prove
  zk3c prove --rounds 50 --edges-only
  zk3c solve --graph my-graph.json --colors 4
"#,
        max = MAX_COLORS
    );
}

#[derive(Debug, Default)]
struct Options {
    graph: Option<String>,
    config: Option<String>,
    rounds: Option<u32>,
    colors: Option<u8>,
    edges_only: bool,
    no_commit: bool,
    seed: Option<u64>,
    json: bool,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", name))
        };
        match arg.as_str() {
            "--graph" => opts.graph = Some(value("--graph")?),
            "--config" => opts.config = Some(value("--config")?),
            "--rounds" => opts.rounds = Some(parse_number(&value("--rounds")?, "--rounds")?),
            "--colors" => opts.colors = Some(parse_number(&value("--colors")?, "--colors")?),
            "--seed" => opts.seed = Some(parse_number(&value("--seed")?, "--seed")?),
            "--edges-only" => opts.edges_only = true,
            "--no-commit" => opts.no_commit = true,
            "--json" => opts.json = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
    }
    Ok(opts)
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("{} must be a number, got '{}'", name, raw))
}

fn load_graph(opts: &Options) -> Result<Graph, String> {
    let result = match &opts.graph {
        Some(path) => JsonGraphFile::new(path).load_graph(),
        None => BuiltinGraph.load_graph(),
    };
    result.map_err(|e| e.to_string())
}

fn build_config(opts: &Options) -> Result<ProtocolConfig, String> {
    let mut config = match &opts.config {
        Some(path) => ProtocolConfig::load(path).map_err(|e| e.to_string())?,
        None => ProtocolConfig::default(),
    };
    if let Some(rounds) = opts.rounds {
        config.rounds = rounds;
    }
    if let Some(colors) = opts.colors {
        config.colors = colors;
    }
    if opts.edges_only {
        config.sampling = ChallengeSampling::EdgesOnly;
    }
    if opts.no_commit {
        config.commitments = false;
    }
    if opts.seed.is_some() {
        config.seed = opts.seed;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let opts = match parse_options(&args[2..]) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let result = match args[1].as_str() {
        "prove" => cmd_prove(&opts).await,
        "solve" => cmd_solve(&opts),
        "minimal" => cmd_minimal(&opts),
        "graph" => cmd_graph(&opts),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(true)
        }
        other => Err(format!("Unknown command: {}", other)),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("  Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_prove(opts: &Options) -> Result<bool, String> {
    let graph = Arc::new(load_graph(opts)?);
    let config = build_config(opts)?;
    println!("\n{}\n", graph.render());

    let engine = ProtocolEngine::new(graph, config).map_err(|e| e.to_string())?;
    let transcript = engine.prove().await.map_err(|e| e.to_string())?;

    if opts.json {
        println!("{}", transcript.to_json().map_err(|e| e.to_string())?);
    } else {
        for line in transcript.render_lines() {
            println!("{}", line);
        }
        println!("\n  {}", transcript.summary());
    }

    let outcome = transcript.outcome();
    Ok(outcome.verdict != OverallVerdict::Rejected)
}

fn cmd_solve(opts: &Options) -> Result<bool, String> {
    let graph = load_graph(opts)?;
    let colors = opts.colors.unwrap_or(3);
    match ColoringSolver::new(colors).solve_with_stats(&graph) {
        Ok((coloring, stats)) => {
            println!("\n  Proper {}-coloring of {}", colors, graph.summary());
            println!("  {}", coloring.display_one_based());
            println!(
                "  Search: {} assignments, {} backtracks",
                stats.assignments, stats.backtracks
            );
            Ok(true)
        }
        Err(e) => {
            println!("\n  {}", e);
            Ok(false)
        }
    }
}

fn cmd_minimal(opts: &Options) -> Result<bool, String> {
    let graph = load_graph(opts)?;
    let max = opts.colors.unwrap_or(MAX_COLORS);
    match ColoringSolver::minimal(&graph, max) {
        Ok(coloring) => {
            println!("\n  Chromatic number: {}", coloring.k());
            println!("  {}", coloring.display_one_based());
            Ok(true)
        }
        Err(e) => {
            println!("\n  {}", e);
            Ok(false)
        }
    }
}

fn cmd_graph(opts: &Options) -> Result<bool, String> {
    let graph = load_graph(opts)?;
    println!("\n  {}\n", graph.summary());
    println!("{}\n", graph.render());
    let edges: Vec<String> = graph
        .edges()
        .iter()
        .map(|(u, v)| format!("{{v{}, v{}}}", u + 1, v + 1))
        .collect();
    println!("  E = {{{}}}", edges.join(", "));
    Ok(true)
}
