//! Structured planning
//!
//! The JSON-mode workflow: one generation attempt validated against the
//! plan payload contract, with a single instruction-strengthening retry.

mod planner;
mod types;

pub use planner::{PlanAttemptError, PlanFailure, Planner};
pub use types::{Candidate, EXPECTED_CANDIDATES, PlanPayload};
