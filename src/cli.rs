//! Argument types for the `multipath` binary (§1.1). Holds no algorithmic logic of its own: it
//! parses arguments, loads configuration/topology files, invokes the relevant library
//! component, and renders output — matching the grounded project's `cli_utils` split between
//! argument definitions and the protocol code they configure.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::optimizer::BackendKind;
use crate::strategy::PhaseKind;

/// Analytical engine for confidential, reliable one-way delivery over a multipath network.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, next_line_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Splits a message into `n` shares of a `(n, t)` threshold scheme.
    Share {
        /// Message to split, given as UTF-8 text.
        #[arg(short, long)]
        message: String,
        /// Total number of shares.
        #[arg(short = 'n', long)]
        n: u64,
        /// Reconstruction threshold.
        #[arg(short = 't', long)]
        t: u64,
        /// Path to a JSON config file (for the prime); defaults are used if omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Where to write the per-holder share bundles, as NDJSON.
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Reconstructs a message from `>= t` holders' share bundles.
    Reconstruct {
        /// Paths to holder share-bundle files (NDJSON, one per holder), `>= t` of them.
        #[arg(required = true)]
        holders: Vec<PathBuf>,
        /// Reconstruction threshold.
        #[arg(short = 't', long)]
        t: u64,
        /// Path to a JSON config file (for the prime); defaults are used if omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Enumerates minimal share-allocation-vector tuples for a topology under Phase I or II.
    Enumerate {
        /// Path to a topology JSON file.
        topology: PathBuf,
        /// Which phase strategy to run.
        #[arg(long, default_value_t = PhaseKind::Two)]
        phase: PhaseKind,
        /// Path to a JSON config file; defaults are used if omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Where to persist the emitted tuples, one JSON object per line.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Optimizes per-timeslot throughput over a set of candidate SAV tuples.
    Optimize {
        /// Path to a topology JSON file.
        topology: PathBuf,
        /// Path to an NDJSON file of candidate SAV tuples (as produced by `enumerate --out`).
        #[arg(short, long)]
        tuples: PathBuf,
        /// Which ILP backend to use.
        #[arg(long, default_value_t = BackendKind::Cbc)]
        solver: BackendKind,
    },

    /// Runs the Monte-Carlo simulator for one SAV tuple and reports empirical guarantees.
    Simulate {
        /// Path to a topology JSON file.
        topology: PathBuf,
        /// Comma-separated share allocation vector, e.g. `0,5,0`.
        #[arg(long)]
        sav: String,
        /// Reconstruction threshold.
        #[arg(short = 't', long)]
        t: u64,
        /// Number of independent trials.
        #[arg(long, default_value_t = 10_000)]
        n_trials: u64,
        /// Master seed for the deterministic per-partition PRNGs.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Path to a JSON config file; defaults are used if omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
