//! Common types and utilities for PR Benchmark

pub mod config;
pub mod error;
pub mod models;
pub mod timestamp;

pub use config::Config;
pub use error::{Error, Result};
