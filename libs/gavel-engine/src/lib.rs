//! Execution engine for untrusted judge submissions.
//!
//! The engine knows HOW to execute: workspace allocation, compiler
//! invocation, deadline-bounded process runs, and outcome classification.
//! It does not know verdict vocabulary beyond the status taxonomy, and it
//! never persists anything - callers own those concerns.
//!
//! Isolation note: execution is bounded by a wall-clock deadline only.
//! There is no memory, CPU, filesystem or network confinement; do not point
//! this engine at code you are not prepared to let touch the host.

pub mod compiler;
pub mod executor;
pub mod heuristic;
pub mod result;
pub mod runner;
pub mod verdict;
pub mod workspace;

pub use executor::execute;
pub use result::{ExecutionResult, ExecutionStatus, StdinSource};
