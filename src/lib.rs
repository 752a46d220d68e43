//! A stochastic rewriter for combinational and-inverter graphs.
//!
//! The optimizer works on a generalized form where each node ANDs an
//! arbitrary list of literals. One iteration regroups the two-input graph
//! into multi-input nodes with random widths, then cycles three local
//! transformations: *expand* (add fanins the care set cannot observe),
//! *share* (extract repeated fanin pairs), and *reduce* (shrink each list
//! to a minimal equivalent subset). Lowering back to hashed two-input
//! nodes scores the result, and a small pool of best graphs seeds the next
//! iteration. Equivalence is maintained by exhaustive truth-table
//! simulation, so input counts must keep `2^n` bits per table in memory.

#![allow(clippy::many_single_char_names)]

#[macro_use] extern crate log;

/// Crate error and result types.
pub mod error;
pub use error::{Error, Result};

/// Literals: object indices packed with a complement bit.
pub mod lit;

/// Truth-table words and the operations the simulator needs.
pub mod tt;

/// Two-input AIGs and binary AIGER files.
pub mod aiger;

/// The multi-input AND arena and its duplicators.
pub mod maig;

/// Truth-table simulation, fanout cones, and care sets.
pub mod sim;

/// The expand transformation.
pub mod expand;

/// The share transformation.
pub mod share;

/// The reduce transformation.
pub mod reduce;

/// The iteration loop and its knobs.
pub mod engine;
pub use engine::{rewire, rewire_with, Params, Progress};
