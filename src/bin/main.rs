//! `closegraph` CLI: reads a transaction graph database, mines closed
//! frequent subgraphs, and writes them out in the `t`/`v`/`e` format,
//! optionally alongside a GraphViz rendering of each pattern.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use closegraph::config::MiningParams;
use closegraph::dot::to_dot;
use closegraph::error::PreconditionError;
use closegraph::io::{read_graphs, write_patterns};
use closegraph::miner::mine;

/// Mine closed frequent subgraphs from a labeled graph transaction database.
#[derive(Debug, Parser)]
#[command(name = "closegraph", version, about)]
struct Cli {
    /// Path to the transaction graph database (`t`/`v`/`e` format).
    graph_file: PathBuf,

    /// Minimum support, as a fraction of transactions in (0, 1].
    #[arg(long, default_value_t = 1.0)]
    min_support: f64,

    /// Maximum number of edges in a reported pattern. 0 disables output.
    #[arg(long, default_value_t = i64::MAX)]
    max_edges: i64,

    /// Also emit one closed pattern per frequent single-vertex label.
    #[arg(long)]
    single_vertices: bool,

    /// Omit the `x <gid> ...` line from each reported pattern.
    #[arg(long)]
    no_graph_ids: bool,

    /// Write patterns here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also render every pattern as GraphViz DOT into this file.
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Increase logging verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging below errors.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<(), closegraph::MinerError> {
    if cli.max_edges < 0 {
        return Err(PreconditionError::NegativeMaxEdges(cli.max_edges).into());
    }
    let params = MiningParams {
        min_support: cli.min_support,
        output_single_vertices: cli.single_vertices,
        max_edges: cli.max_edges as usize,
        output_graph_ids: !cli.no_graph_ids,
    };
    params.validate()?;

    let file = File::open(&cli.graph_file)?;
    let db = read_graphs(BufReader::new(file))?;

    let report = mine(db, &params);

    match &cli.output {
        Some(path) => {
            let mut w = BufWriter::new(File::create(path)?);
            write_patterns(&report.patterns, params.output_graph_ids, &mut w)?;
        }
        None => {
            let stdout = io::stdout();
            let mut w = stdout.lock();
            write_patterns(&report.patterns, params.output_graph_ids, &mut w)?;
        }
    }

    if let Some(path) = &cli.dot {
        let mut w = BufWriter::new(File::create(path)?);
        for pattern in &report.patterns {
            write!(w, "{}", to_dot(pattern))?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
