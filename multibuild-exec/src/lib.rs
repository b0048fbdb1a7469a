//! # multibuild-exec
//!
//! Blocking execution of external commands (git, build tools) with captured
//! output and an optional timeout.

pub mod command;
pub mod error;
pub mod runner;

pub use command::CommandSpec;
pub use error::ExecError;
pub use runner::{CommandRunner, DryRunRunner, SystemRunner};
