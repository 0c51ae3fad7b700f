//! The `multipath` CLI: argument parsing, file I/O, and output rendering only — all algorithmic
//! work happens in the library (§1.1). `CoreError` is converted to `anyhow::Error` here, at the
//! outermost boundary, and nowhere inside the library crate.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use multipath_sss::cli::{Cli, Command};
use multipath_sss::config::Config;
use multipath_sss::field::{reconstruct_bytes, share_bytes, PrimeField, Share};
use multipath_sss::simulator::simulate;
use multipath_sss::strategy::{Sav, SavTuple};
use multipath_sss::topology::{AllSimplePaths, Topology, TopologyInput};
use tracing::info;

#[derive(serde::Serialize, serde::Deserialize)]
struct HolderBundle {
    holder: u64,
    shares: Vec<Share>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Share { message, n, t, config, out } => run_share(&message, n, t, config.as_deref(), &out),
        Command::Reconstruct { holders, t, config } => run_reconstruct(&holders, t, config.as_deref()),
        Command::Enumerate { topology, phase, config, out } => {
            run_enumerate(&topology, phase, config.as_deref(), out.as_deref())
        }
        Command::Optimize { topology, tuples, solver } => run_optimize(&topology, &tuples, solver),
        Command::Simulate { topology, sav, t, n_trials, seed, config } => {
            run_simulate(&topology, &sav, t, n_trials, seed, config.as_deref())
        }
    }
}

fn load_field(config: Option<&Path>) -> Result<PrimeField> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(config.validate()?)
}

fn load_topology(path: &Path) -> Result<Topology> {
    let text = fs::read_to_string(path).with_context(|| format!("reading topology {}", path.display()))?;
    let input: TopologyInput = serde_json::from_str(&text).context("parsing topology JSON")?;
    Ok(Topology::new(input, Box::new(AllSimplePaths::new(64)))?)
}

fn run_share(message: &str, n: u64, t: u64, config: Option<&Path>, out: &Path) -> Result<()> {
    let field = load_field(config)?;
    let per_holder = share_bytes(&field, message.as_bytes(), n, t, &mut rand::rngs::OsRng)?;

    let mut file = fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    for (i, shares) in per_holder.into_iter().enumerate() {
        let bundle = HolderBundle { holder: i as u64 + 1, shares };
        writeln!(file, "{}", serde_json::to_string(&bundle)?)?;
    }
    info!(n, t, out = %out.display(), "wrote share bundles");
    Ok(())
}

fn run_reconstruct(holder_paths: &[std::path::PathBuf], t: u64, config: Option<&Path>) -> Result<()> {
    let field = load_field(config)?;
    let mut chunk_shares = Vec::with_capacity(holder_paths.len());
    for path in holder_paths {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let line = text.lines().next().with_context(|| format!("{} is empty", path.display()))?;
        let bundle: HolderBundle = serde_json::from_str(line)?;
        chunk_shares.push(bundle.shares);
    }
    let message = reconstruct_bytes(&field, &chunk_shares, t)?;
    println!("{}", String::from_utf8_lossy(&message));
    Ok(())
}

fn run_enumerate(
    topology_path: &Path,
    phase: multipath_sss::strategy::PhaseKind,
    config: Option<&Path>,
    out: Option<&Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let topology = load_topology(topology_path)?;
    let output = phase
        .strategy()
        .generate_minimal_tuples(&topology, config.n_max, config.sigma, config.tau, config.renorm_epsilon, None)?;

    let mut sink: Box<dyn Write> = match out {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    for tuple in &output.tuples {
        writeln!(sink, "{}", serde_json::to_string(tuple)?)?;
    }
    info!(count = output.tuples.len(), budget_exhausted = output.budget_exhausted, "enumeration complete");
    Ok(())
}

fn run_optimize(topology_path: &Path, tuples_path: &Path, solver: multipath_sss::optimizer::BackendKind) -> Result<()> {
    let topology = load_topology(topology_path)?;
    let file = fs::File::open(tuples_path).with_context(|| format!("reading {}", tuples_path.display()))?;
    let mut tuples = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        tuples.push(serde_json::from_str::<SavTuple>(&line)?);
    }

    let output = solver.backend().solve(&tuples, &topology)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_simulate(
    topology_path: &Path,
    sav: &str,
    t: u64,
    n_trials: u64,
    seed: u64,
    config: Option<&Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let field = config.validate()?;
    let topology = load_topology(topology_path)?;
    let paths = topology.paths()?;

    let n: Vec<u64> = sav
        .split(',')
        .map(|s| s.trim().parse::<u64>())
        .collect::<std::result::Result<_, _>>()
        .context("parsing --sav as a comma-separated list of integers")?;
    if n.len() != paths.len() {
        bail!("--sav has {} entries but the topology has {} paths", n.len(), paths.len());
    }

    let partitions = std::thread::available_parallelism().map(|p| p.get()).unwrap_or(1);
    let report = simulate(&field, paths, &Sav { n }, t, n_trials, seed, partitions, None)?;
    println!(
        "reliability={:.6} confidentiality_breach={:.6} n_trials={} seed={}",
        report.reliability, report.confidentiality_breach, report.n_trials, report.seed
    );
    Ok(())
}
