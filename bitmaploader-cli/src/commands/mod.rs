//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cache`] - Disk cache management (stats, clear)
//! - [`config`] - Configuration management (init, show, path)
//! - [`fetch`] - Load a sequence of identities into one slot
//! - [`scroll`] - Rebind a few slots across many identities

pub mod cache;
pub mod config;
pub mod fetch;
pub mod scroll;
