//! The simulation/apply workflow engine.
//!
//! [`controller::WorkflowController`] owns the run lifecycle: it collects
//! candidates from the external systems, evaluates eligibility, consults the
//! safety gate, and -- only for a confirmed execute run that the gate
//! authorized -- performs the deletions. It is the only component in the
//! workspace allowed to invoke a destructive operation.

pub mod collector;
pub mod controller;
pub mod scheduler;

pub use controller::WorkflowController;
