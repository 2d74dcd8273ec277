//! stackctl library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod aggregate;
pub mod cli;
pub mod command_runner;
pub mod compose;
pub mod domain;
pub mod orchestrator;
pub mod output;
