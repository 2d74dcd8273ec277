//! Domain layer — pure types and selection logic.
//!
//! This module has zero imports from `crate::compose`, `crate::orchestrator`,
//! `tokio`, `std::fs`, or `std::process`. All functions are synchronous and
//! take data in, returning data out.

pub mod action;
pub mod error;
pub mod options;
pub mod service;

pub use action::Action;
pub use error::InputError;
pub use options::ExecutionOptions;
pub use service::{SelectionEvent, Selector, ServiceGroup, build_selection, is_full_set};
