//! Unit tests for ccactor configuration types.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Defaults, serialisation, and polling conversions
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests

mod helpers;
