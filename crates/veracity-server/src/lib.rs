//! Veracity Server
//!
//! Command line and HTTP front end over the inference pipeline in
//! `veracity-classifiers`. The front end decides when a prediction is
//! requested; the pipeline itself holds no UI state.

pub mod cli;
pub mod commands;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use cli::{ArtifactOverrides, Cli, Commands, LogFormat};
pub use config::{AppConfig, ServerConfig};
pub use routes::{create_router, AppError};
pub use state::AppState;
