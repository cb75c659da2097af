//! HTTP CRUD service for `CrudDemo` records.
//!
//! The router is built over any [`crud_demo_data::Gateway`], so the same
//! handler runs against SQLite in production and an in-memory gateway in
//! tests.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod extract;
pub mod layers;

pub use config::{ConfigError, DemoConfig, Settings};
pub use controller::{crud_demo_exists, Created, CrudDemoController, BASE_PATH};
pub use error::AppError;
pub use layers::init_tracing;
