//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations:
//! - [`list`] - `workflow-dispatch list`
//! - [`run`] - `workflow-dispatch run`
//! - [`target`] - Repository and client resolution shared by both

pub mod dispatcher;
pub mod list;
pub mod run;
pub mod target;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
