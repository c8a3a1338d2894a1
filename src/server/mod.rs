//! Server module for the photobooth
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Range checks and path resolution
//! - `background_tasks`: Camera info refresh loop
//! - `shutdown`: Signal handling
//! - `init`: Main server initialization and run loop

mod background_tasks;
pub mod config;
mod init;
mod loader;
mod shutdown;
mod validation;

#[cfg(test)]
pub use init::{build_orchestrator, build_router};
pub use init::run;
pub use loader::load_config;
pub use validation::validate_config;
