#[cfg(test)]
mod tests;

pub mod pretty;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plan-local identifier of a logical node.
/// Examples:
/// - `let root = Pid(0);`
/// - `let scan = Pid(7);`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pid(pub u32);

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates strictly increasing [`Pid`]s for one plan.
///
/// Each plan owns its own factory; planning is single-threaded per plan,
/// so a plain counter suffices.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PidFactory {
    next: u32,
}

impl PidFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_pid(&mut self) -> Pid {
        let pid = Pid(self.next);
        self.next += 1;
        pid
    }

    /// Number of pids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

/// Canonical error type of the planning core.
///
/// Nothing here is caught and swallowed; every failure surfaces to the
/// caller, which maps it to a user-visible SQL error.
#[derive(Error, Debug)]
pub enum PlanError {
    /// A precondition of a core API was broken by the caller.
    #[error("invariant violation: {0}")]
    Invariant(String),
    /// An expression has a shape an analysis does not support.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
    /// A join predicate side could not be assigned to either input schema.
    #[error("malformed join predicate: {0}")]
    MalformedJoinPredicate(String),
    /// A rewrite met a node kind it does not know how to transform.
    #[error("unsupported plan: {0}")]
    UnsupportedPlan(String),
    /// A node payload could not be duplicated. Fatal.
    #[error("clone failure: {0}")]
    CloneFailure(String),
    #[error("catalog: {0}")]
    Catalog(String),
}

/// Result alias that carries a `PlanError`.
pub type PlanResult<T> = Result<T, PlanError>;

/// Convenient re-exports for downstream crates.
pub mod prelude {
    pub use crate::{Pid, PidFactory, PlanError, PlanResult};
}
