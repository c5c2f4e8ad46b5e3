/*!

  The crate's flat error hierarchy: syntax/semantic errors surface to the
  CLI boundary, invariant violations are debug-only assertions, and
  verification failures carry enough detail to name the offending vertex
  or edge.

*/

use thiserror::Error as DeriveError;
use user_error::UFE;

use crate::graph::VertexId;

#[derive(Clone, Eq, PartialEq, Debug, Hash, DeriveError)]
pub enum Error {
  #[error("syntax error on line {line}: {message}")]
  InputSyntax { line: usize, message: String },

  #[error("semantic error: {message}")]
  InputSemantic { message: String },

  #[error("invariant violated: {message}")]
  InvariantViolation { message: String },

  #[error("verification failed at vertex {vertex}: {message}")]
  VerificationFailure { vertex: VertexId, message: String },
}

impl UFE for Error {}

pub type Result<T> = std::result::Result<T, Error>;
