use axum::http::{Method, StatusCode};
use crud_demo_api::{app, BASE_PATH};
use crud_demo_data::{migration, CrudDemo, Gateway, MemoryGateway, SqliteGateway};
use crud_demo_test::{RacingGateway, TestClient};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;

fn client<G: Gateway>(gateway: G) -> TestClient {
    TestClient::new(app::build(gateway), BASE_PATH)
}

fn memory_client(records: Vec<CrudDemo>) -> (TestClient, MemoryGateway) {
    let gateway = MemoryGateway::with_records(records);
    (client(gateway.clone()), gateway)
}

async fn sqlite_client() -> TestClient {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migration::apply(&pool).await.unwrap();
    client(SqliteGateway::new(pool))
}

/// POST, GET, PUT, GET, DELETE, GET on id 3.
async fn run_lifecycle(client: &TestClient) {
    let created = client
        .create(&json!({ "id": 3, "name": "CCC" }))
        .await
        .created_at(3);
    assert_eq!(created, CrudDemo::new(3, Some("CCC")));

    let reply = client.fetch(3).await.assert_ok();
    assert_eq!(reply.json(), json!({ "id": 3, "name": "CCC" }));

    client
        .replace(3, &json!({ "id": 3, "name": "DDD" }))
        .await
        .assert_no_content();
    assert_eq!(client.fetch(3).await.assert_ok().record(), CrudDemo::new(3, Some("DDD")));

    client.remove(3).await.assert_no_content();
    client.fetch(3).await.assert_not_found();
}

#[tokio::test]
async fn lifecycle_against_memory_gateway() {
    let (client, gateway) = memory_client(Vec::new());
    run_lifecycle(&client).await;
    assert_eq!(gateway.snapshot().await, Some(Vec::new()));
}

#[tokio::test]
async fn lifecycle_against_sqlite_gateway() {
    let client = sqlite_client().await;
    run_lifecycle(&client).await;
}

#[tokio::test]
async fn list_returns_json_array() {
    let (client, _) = memory_client(vec![CrudDemo::new(1, Some("AAA")), CrudDemo::new(2, None)]);
    let reply = client.list().await.assert_ok();
    assert_eq!(
        reply.json(),
        json!([{ "id": 1, "name": "AAA" }, { "id": 2, "name": null }])
    );
}

#[tokio::test]
async fn list_on_unprovisioned_store_is_404() {
    client(MemoryGateway::unprovisioned())
        .list()
        .await
        .assert_not_found()
        .assert_error_contains("not provisioned");
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let (client, _) = memory_client(vec![CrudDemo::new(1, Some("AAA"))]);
    client
        .fetch(42)
        .await
        .assert_not_found()
        .assert_error_contains("42");
}

#[tokio::test]
async fn non_numeric_id_is_400_with_error_body() {
    let (client, _) = memory_client(Vec::new());
    for method in [Method::GET, Method::DELETE] {
        client
            .raw(method, "/abc", None)
            .await
            .assert_bad_request()
            .assert_error_contains("abc");
    }
    client
        .raw(Method::PUT, "/abc", Some(r#"{"id": 1}"#))
        .await
        .assert_bad_request()
        .assert_error_contains("abc");
}

#[tokio::test]
async fn post_without_id_is_400_not_422() {
    let (client, gateway) = memory_client(Vec::new());
    client
        .create(&json!({ "name": "no id" }))
        .await
        .assert_bad_request()
        .assert_error_contains("missing field");
    assert_eq!(gateway.snapshot().await, Some(Vec::new()));
}

#[tokio::test]
async fn malformed_bodies_are_400_with_error_body() {
    let (client, _) = memory_client(vec![CrudDemo::new(1, Some("AAA"))]);
    client
        .raw(Method::POST, "", Some("{not json"))
        .await
        .assert_bad_request();
    client
        .raw(Method::POST, "", Some(r#"{"id": "one"}"#))
        .await
        .assert_bad_request();
    let reply = client
        .raw(Method::PUT, "/1", Some(r#"{"id": 1, "name": 7}"#))
        .await
        .assert_bad_request();
    assert!(!reply.error_message().is_empty());
}

#[tokio::test]
async fn body_with_both_name_keys_is_400() {
    let (client, gateway) = memory_client(Vec::new());
    client
        .raw(Method::POST, "", Some(r#"{"id": 4, "name": "A", "demoName": "B"}"#))
        .await
        .assert_bad_request()
        .assert_error_contains("duplicate field");
    assert_eq!(gateway.snapshot().await, Some(Vec::new()));
}

#[tokio::test]
async fn put_with_mismatched_id_is_400() {
    let (client, gateway) = memory_client(vec![CrudDemo::new(1, Some("AAA"))]);
    client
        .replace(1, &json!({ "id": 2, "name": "AAA" }))
        .await
        .assert_bad_request()
        .assert_error_contains("does not match");
    assert_eq!(gateway.snapshot().await.unwrap(), vec![CrudDemo::new(1, Some("AAA"))]);
}

#[tokio::test]
async fn put_on_absent_id_is_404() {
    let (client, _) = memory_client(vec![CrudDemo::new(1, Some("AAA"))]);
    client
        .replace(2, &json!({ "id": 2, "name": "AAA" }))
        .await
        .assert_not_found();
}

#[tokio::test]
async fn put_losing_a_race_is_409_with_error_body() {
    let inner = MemoryGateway::with_records(vec![CrudDemo::new(1, Some("AAA"))]);
    client(RacingGateway::new(inner.clone()))
        .replace(1, &json!({ "id": 1, "name": "BBB" }))
        .await
        .assert_conflict()
        .assert_error_contains("modified or deleted");
    assert!(inner.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn post_of_existing_id_is_422_naming_the_id() {
    let (client, gateway) = memory_client(vec![CrudDemo::new(1, Some("AAA"))]);
    client
        .create(&json!({ "id": 1, "name": "X" }))
        .await
        .assert_unprocessable()
        .assert_error_contains("Id 1");
    assert_eq!(gateway.snapshot().await.unwrap(), vec![CrudDemo::new(1, Some("AAA"))]);
}

#[tokio::test]
async fn post_of_existing_id_is_422_on_sqlite() {
    let client = sqlite_client().await;
    client
        .create(&json!({ "id": 5, "name": "EEE" }))
        .await
        .created_at(5);
    client
        .create(&json!({ "id": 5, "name": "FFF" }))
        .await
        .assert_unprocessable()
        .assert_error_contains("5");
    assert_eq!(client.fetch(5).await.record(), CrudDemo::new(5, Some("EEE")));
}

#[tokio::test]
async fn post_on_unprovisioned_store_is_500() {
    client(MemoryGateway::unprovisioned())
        .create(&json!({ "id": 1, "name": "AAA" }))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_contains("not provisioned");
}

#[tokio::test]
async fn post_accepts_legacy_field_name() {
    let (client, gateway) = memory_client(Vec::new());
    let created = client
        .raw(Method::POST, "", Some(r#"{"id": 4, "demoName": "DDD"}"#))
        .await
        .created_at(4);
    assert_eq!(created, CrudDemo::new(4, Some("DDD")));
    assert_eq!(gateway.snapshot().await.unwrap(), vec![CrudDemo::new(4, Some("DDD"))]);
}

#[tokio::test]
async fn delete_twice_is_204_then_404() {
    let (client, _) = memory_client(vec![CrudDemo::new(1, Some("AAA"))]);
    client.remove(1).await.assert_no_content();
    client.remove(1).await.assert_not_found();
}

#[tokio::test]
async fn delete_on_unprovisioned_store_is_404() {
    client(MemoryGateway::unprovisioned())
        .remove(1)
        .await
        .assert_not_found();
}
