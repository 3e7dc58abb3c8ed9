//! Sluglinker - resolve short slugs to destination URLs
//!
//! A link store kept in a key-value backend is merged with a read-only
//! baseline dataset shipped alongside the application. An address whose
//! fragment names a slug is resolved against that merged view and
//! redirected; an address without one shows the dashboard.
//!
//! # Features
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `storage`: Key-value backends and the link/settings store on top
//! - `services`: Merge, resolution, the redirect sequencer and link management
//! - `interfaces`: User interfaces (CLI)
//! - `config`: Configuration management
//! - `system`: Logging setup
//! - `utils`: URL and slug helpers

pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
