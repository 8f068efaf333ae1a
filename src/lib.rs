//! Business-logic actors for a Cloud Controller command-line client.
//!
//! `ccactor` turns command-level intents ("show this application", "delete
//! this organization") into sequences of Cloud Controller API calls. It
//! merges the results into summaries and normalizes failures into a small set
//! of errors a command can render.
//!
//! # Architecture
//!
//! Every API call yields its result together with the warnings the server
//! attached to the response. Actors carry those warnings forward through
//! every call they make, so a command can show them even when the operation
//! failed part way. Long-running server work is represented by jobs, which
//! the [`actor::JobPoller`] drives to completion within a configured budget.
//!
//! # Modules
//!
//! - [`actor`]: Actors composing client calls into operations and summaries
//! - [`cloud_controller`]: Client traits, resource types, and the HTTP client
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`error`]: Semantic error types for the application
//! - [`warnings`]: Warning accumulation shared by every layer

pub mod actor;
pub mod cloud_controller;
pub mod config;
pub mod error;
pub mod warnings;
