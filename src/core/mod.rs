//! Core building blocks shared by every command
//!
//! - **config**: release.toml and package.json parsing and validation
//! - **context**: the `ReleaseContext` built once and passed everywhere
//! - **error**: error types with contextual help messages and exit codes
//! - **fileset**: include/exclude glob sets over the working tree
//! - **tools**: external tool invocation behind the `ToolRunner` seam

pub mod config;
pub mod context;
pub mod error;
pub mod fileset;
pub mod tools;
