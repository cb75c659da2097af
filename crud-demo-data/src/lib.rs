//! # crud-demo-data: persistence gateway for the `CrudDemo` entity
//!
//! The HTTP handler never talks to a database directly. It opens a
//! [`Session`] from a [`Gateway`], reads through it, stages changes and
//! commits them in one step.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CrudDemo`] | The single persisted record (`id`, `name`) |
//! | [`Gateway`] / [`Session`] | Store handle and per-request unit of work |
//! | [`SqliteGateway`] | Gateway over an `sqlx::SqlitePool` |
//! | [`MemoryGateway`] | In-memory gateway, used as the test double |
//! | [`DataError`] | Errors surfaced by every gateway |
//! | [`migration`] | Reversible schema migration for the `crud_demo` table |
//!
//! # Quick start
//!
//! ```ignore
//! use crud_demo_data::{CrudDemo, Gateway, Session, SqliteGateway};
//!
//! let gateway = SqliteGateway::new(pool.clone());
//! let mut session = gateway.session();
//! session.add(CrudDemo::new(1, Some("AAA")));
//! session.commit().await?;
//! ```

pub mod entity;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod migration;
pub mod sqlite;

pub use entity::CrudDemo;
pub use error::DataError;
pub use gateway::{Gateway, Session};
pub use memory::{MemoryGateway, MemorySession};
pub use sqlite::{SqliteGateway, SqliteSession};
