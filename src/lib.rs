//! # multipath-sss
//!
//! An analytical engine for confidential, reliable one-way delivery of a secret over an
//! untrusted multipath network: Shamir secret sharing over a configurable prime field, an
//! exact probability engine for threshold-scheme guarantees, two share-allocation enumeration
//! strategies (passive and dropping adversary models), an ILP-based throughput optimizer, and
//! a Monte-Carlo simulator that cross-checks the analytical predictions empirically.
//!
//! [`topology`] is the entry point for most callers: build a [`topology::Topology`], hand it to
//! a [`strategy::PhaseStrategy`] to enumerate minimal share-allocation vectors, then feed those
//! into [`optimizer`] or [`simulator`].
#![warn(missing_docs)]

pub mod abort;
pub mod cli;
pub mod config;
pub mod error;
pub mod field;
pub mod optimizer;
pub mod probability;
pub mod simulator;
pub mod strategy;
pub mod topology;

pub use error::{CoreError, Result};
