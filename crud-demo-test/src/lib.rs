//! Test support for the crud-demo routes: an in-process [`TestClient`] that
//! speaks `CrudDemo`, and [`RacingGateway`], a gateway double that makes
//! every commit hit a concurrency conflict.

mod client;
mod racing;

pub use client::{Reply, TestClient};
pub use racing::{RacingGateway, RacingSession};
