//! CLI commands for wp-release
//!
//! ## Release chains
//! - **languages**: audit, POT extraction, translation push/pull, MO compilation
//! - **readme**: readme.txt to README.md
//! - **build**: version checks, audit, readme, staging, line endings, archive
//! - **deploy**: build, then commit to the plugin registry
//!
//! ## Setup & Inspection
//! - **init**: write a default release.toml
//! - **versions**: version consistency checks only
//! - **audit**: text-domain audit only
//! - **check**: every pre-release check, reported side by side
//! - **watch**: rerun the readme conversion on every readme.txt change
//!
//! All commands except `init` take the `&ReleaseContext` built once in main.

pub mod audit;
pub mod chain;
pub mod check;
pub mod init;
pub mod versions;
pub mod watch;

pub use audit::run_audit;
pub use chain::{ChainFlags, run_chain};
pub use check::run_check;
pub use init::run_init;
pub use versions::run_versions;
pub use watch::run_watch;
