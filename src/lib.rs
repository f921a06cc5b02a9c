#![allow(clippy::future_not_send)]

pub mod backend;
pub mod cli;
pub mod config;
pub mod controller;
mod effects;
pub mod logging;
pub mod model;
mod prompts;
mod ui;

pub use backend::{normalize, DispatchError, Dispatcher, Outcome, FALLBACK_MESSAGE};
pub use config::{Config, ConfigError};
pub use controller::{update, AppState, AppViewModel, Effect, Msg, Status};
pub use model::{ContentKind, Operation, RequestSpec};
