use axum::Router;
use crud_demo_data::Gateway;

use crate::controller::{self, CrudDemoController};
use crate::layers;

/// Assemble the service router over any gateway.
///
/// Tests pass a `MemoryGateway`; the binary passes a `SqliteGateway`.
pub fn build<G: Gateway>(gateway: G) -> Router {
    controller::routes(CrudDemoController::new(gateway))
        .layer(layers::catch_panic_layer())
        .layer(layers::request_trace())
}
