use axum::extract::Path;
use axum::http::header::LOCATION;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use crud_demo_data::{CrudDemo, DataError, Gateway, MemoryGateway, Session};
use crud_demo_test::{RacingGateway, TestClient};
use serde_json::json;

fn stub_router() -> Router {
    Router::new()
        .route(
            "/things",
            get(|| async { Json(vec![CrudDemo::new(1, Some("AAA"))]) }).post(
                |Json(body): Json<CrudDemo>| async move {
                    let location = format!("/things/{}", body.id);
                    (StatusCode::CREATED, [(LOCATION, location)], Json(body))
                },
            ),
        )
        .route(
            "/things/{id}",
            get(|Path(id): Path<i32>| async move {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": format!("CrudDemo {id} not found") })),
                )
            }),
        )
}

#[tokio::test]
async fn list_decodes_records() {
    let client = TestClient::new(stub_router(), "/things");
    let records = client.list().await.assert_ok().records();
    assert_eq!(records, vec![CrudDemo::new(1, Some("AAA"))]);
}

#[tokio::test]
async fn created_at_checks_location_and_returns_record() {
    let client = TestClient::new(stub_router(), "/things");
    let record = client
        .create(&CrudDemo::new(9, Some("III")))
        .await
        .created_at(9);
    assert_eq!(record, CrudDemo::new(9, Some("III")));
}

#[tokio::test]
#[should_panic]
async fn created_at_rejects_wrong_location() {
    let client = TestClient::new(stub_router(), "/things");
    client.create(&CrudDemo::new(9, None)).await.created_at(10);
}

#[tokio::test]
async fn error_message_reads_error_bodies() {
    let client = TestClient::new(stub_router(), "/things");
    let reply = client.fetch(4).await.assert_not_found();
    assert_eq!(reply.error_message(), "CrudDemo 4 not found");
}

#[tokio::test]
#[should_panic(expected = "not an error body")]
async fn error_message_rejects_other_shapes() {
    let client = TestClient::new(stub_router(), "/things");
    client.list().await.error_message();
}

#[tokio::test]
async fn raw_sends_body_verbatim() {
    let client = TestClient::new(stub_router(), "/things");
    let reply = client
        .raw(Method::POST, "", Some(r#"{"id": 2, "demoName": "BBB"}"#))
        .await;
    assert_eq!(reply.json(), json!({ "id": 2, "name": "BBB" }));
}

#[tokio::test]
async fn racing_gateway_turns_every_update_into_a_conflict() {
    let inner = MemoryGateway::with_records(vec![CrudDemo::new(1, Some("AAA"))]);
    let gateway = RacingGateway::new(inner.clone());

    let mut session = gateway.session();
    let mut record = session.find(1).await.unwrap().unwrap();
    record.name = Some("BBB".into());
    session.mark_modified(&record);

    let err = session.commit().await.unwrap_err();
    assert!(matches!(err, DataError::ConcurrencyConflict { id: 1 }), "{err}");
    assert!(inner.snapshot().await.unwrap().is_empty());
}
