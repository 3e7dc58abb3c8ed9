//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod link_management;
mod resolve;
mod settings;

pub use config_gen::config_generate;
pub use link_management::*;
pub use resolve::{StdoutNavigator, resolve_address};
pub use settings::show_or_update_settings;
