//! Behavioural step helpers for job polling scenarios.

mod assertions;
mod state;
mod steps;

pub use state::{JobPollingState, job_polling_state};
