//! Link management commands
//!
//! This module provides CLI commands for managing links.

mod add;
mod export;
mod list;
mod remove;
mod update;

pub use add::add_link;
pub use export::export_links;
pub use list::{format_link_line, list_links};
pub use remove::remove_link;
pub use update::{UpdateArgs, update_link};
