use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use crud_demo_data::CrudDemo;
use http_body_util::BodyExt;
use serde::Serialize;
use tower::util::ServiceExt;

/// In-process client for a `CrudDemo` collection mounted at `base`.
///
/// Requests go through `tower::ServiceExt::oneshot`; no port is bound.
pub struct TestClient {
    router: Router,
    base: String,
}

impl TestClient {
    pub fn new(router: Router, base: impl Into<String>) -> Self {
        Self {
            router,
            base: base.into(),
        }
    }

    /// `GET {base}`
    pub async fn list(&self) -> Reply {
        self.send(Method::GET, self.base.clone(), None).await
    }

    /// `GET {base}/{id}`
    pub async fn fetch(&self, id: i32) -> Reply {
        self.send(Method::GET, self.item(id), None).await
    }

    /// `POST {base}`
    pub async fn create(&self, body: &impl Serialize) -> Reply {
        self.send(Method::POST, self.base.clone(), Some(to_json(body)))
            .await
    }

    /// `PUT {base}/{id}`
    pub async fn replace(&self, id: i32, body: &impl Serialize) -> Reply {
        self.send(Method::PUT, self.item(id), Some(to_json(body))).await
    }

    /// `DELETE {base}/{id}`
    pub async fn remove(&self, id: i32) -> Reply {
        self.send(Method::DELETE, self.item(id), None).await
    }

    /// Send `body` verbatim as JSON to `{base}{suffix}`, for paths and
    /// payloads the typed helpers cannot produce.
    pub async fn raw(&self, method: Method, suffix: &str, body: Option<&str>) -> Reply {
        let path = format!("{}{suffix}", self.base);
        self.send(method, path, body.map(str::to_owned)).await
    }

    fn item(&self, id: i32) -> String {
        format!("{}/{id}", self.base)
    }

    async fn send(&self, method: Method, path: String, json: Option<String>) -> Reply {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match json {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("response body should be readable")
            .to_bytes();

        Reply {
            status,
            location,
            body,
            base: self.base.clone(),
        }
    }
}

fn to_json(body: &impl Serialize) -> String {
    serde_json::to_string(body).expect("body should serialize")
}

/// A response, decoded on demand into records or the error message.
pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Bytes,
    base: String,
}

impl Reply {
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "expected {expected}, got {}\nbody: {}",
            self.status,
            self.text()
        );
        self
    }

    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_no_content(self) -> Self {
        let reply = self.assert_status(StatusCode::NO_CONTENT);
        assert!(reply.body.is_empty(), "204 with body: {}", reply.text());
        reply
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    pub fn assert_conflict(self) -> Self {
        self.assert_status(StatusCode::CONFLICT)
    }

    pub fn assert_unprocessable(self) -> Self {
        self.assert_status(StatusCode::UNPROCESSABLE_ENTITY)
    }

    /// 201 with `Location: {base}/{id}`; returns the echoed record.
    pub fn created_at(self, id: i32) -> CrudDemo {
        let reply = self.assert_status(StatusCode::CREATED);
        let expected = format!("{}/{id}", reply.base);
        assert_eq!(reply.location.as_deref(), Some(expected.as_str()));
        reply.record()
    }

    pub fn record(&self) -> CrudDemo {
        self.decode()
    }

    pub fn records(&self) -> Vec<CrudDemo> {
        self.decode()
    }

    pub fn json(&self) -> serde_json::Value {
        self.decode()
    }

    /// Message of an `{"error": "..."}` body. Panics on any other shape.
    pub fn error_message(&self) -> String {
        let body = self.json();
        match body.as_object() {
            Some(fields) if fields.len() == 1 => match fields.get("error") {
                Some(serde_json::Value::String(message)) => message.clone(),
                _ => panic!("not an error body: {body}"),
            },
            _ => panic!("not an error body: {body}"),
        }
    }

    pub fn assert_error_contains(self, needle: &str) -> Self {
        let message = self.error_message();
        assert!(
            message.contains(needle),
            "expected error containing {needle:?}, got {message:?}"
        );
        self
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn decode<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("undecodable body ({e}): {}", self.text()))
    }
}
