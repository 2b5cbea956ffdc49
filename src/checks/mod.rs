//! Pre-release checks
//!
//! - **versions**: every configured pair of version sources agrees exactly
//! - **text-domain**: localization calls pass the plugin's text domain

mod runner;
pub mod textdomain;
mod trait_def;
pub mod versions;

pub use runner::create_default_runner;
pub use trait_def::Severity;
