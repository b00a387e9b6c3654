//! Photo library index maintenance.
//!
//! `pixdex` keeps a photo library's SQLite index alongside a cache tree and
//! sidecar metadata files. Its `reset` command walks through a fixed sequence
//! of destructive, individually confirmed stages that bring the library back
//! to a clean state.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite index: schema registry, migrations, admin credentials
//! - [`reset`]: The reset stages: prompt gate, path enumeration, bulk removal,
//!   schema reset and the orchestrator that sequences them
//! - [`cli`]: Command entry points

pub mod cli;
pub mod config;
pub mod db;
pub mod reset;
