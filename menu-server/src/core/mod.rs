//! Core module: configuration, shared state, server lifecycle
//!
//! - [`Config`] - environment configuration
//! - [`ServerState`] - services shared by every handler
//! - [`Server`] - HTTP server
//! - [`BackgroundTasks`] - spawned jobs and their shutdown

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::{ResourceVersions, ServerState};
pub use tasks::{BackgroundTasks, TaskKind};
