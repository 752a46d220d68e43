//! Crate-wide error type.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input graph is malformed: bad header, fanin out of order,
  /// an output with more than one fanin, or a combinational loop.
  #[error("invalid aig: {0}")]
  InvalidAig(String),

  /// A rewrite left some output function different from its snapshot.
  /// This is a bug in the transformation, not in the input.
  #[error("simulation mismatch at output {output}")]
  SimulationMismatch { output: usize },

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
