//! finboard: a personal finance tracker client.
//!
//! The heart of the crate is the `dashboard` module, which filters and aggregates a year of
//! transactions. The `api` module talks to the hosted backend and `commands` exposes everything
//! through the CLI.

mod api;
pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
mod error;
pub mod model;
mod utils;

#[cfg(test)]
mod test;

pub use api::{Backend, DateRange, Mode, User, TEST_MODE_ENV};
pub use config::Config;
pub use error::{Error, Result};
