//! Core library for the `aiweb` frontend tooling.
//!
//! This crate defines:
//! - The backend API client (fixed relative base path, fixed timeout)
//! - The dev-server configuration table (plugins, port, proxy rules, aliases)
//!
//! It is used by `aiweb-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;

pub use client::{ApiClient, BASE_PATH, DEFAULT_TIMEOUT, UnexpectedStatus, WeatherApi};
pub use config::{DevServerConfig, ProxyRule};
