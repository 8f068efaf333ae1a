//! Behavioural step helpers for application summary scenarios.

mod assertions;
mod client;
mod state;
mod steps;

pub use state::{ApplicationSummaryState, application_summary_state};
