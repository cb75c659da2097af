//! CRUD handler for `CrudDemo` records.
//!
//! [`CrudDemoController`] holds the operations as plain async methods so they
//! can be exercised without HTTP; [`routes`] binds them to axum handlers.

use axum::extract::State;
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use crud_demo_data::{CrudDemo, DataError, Gateway, Session};

use crate::error::AppError;
use crate::extract::{JsonBody, RecordId};

/// Path prefix of every route served by the controller.
pub const BASE_PATH: &str = "/api/demoe";

/// Location of the record with the given id.
pub fn location(id: i32) -> String {
    format!("{BASE_PATH}/{id}")
}

/// A freshly created resource and where to fetch it.
#[derive(Debug, PartialEq, Eq)]
pub struct Created<T> {
    pub location: String,
    pub body: T,
}

impl<T: serde::Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, [(LOCATION, self.location)], Json(self.body)).into_response()
    }
}

#[derive(Clone)]
pub struct CrudDemoController<G> {
    gateway: G,
}

impl<G: Gateway> CrudDemoController<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// All records. An unprovisioned store is reported as not found, never as
    /// an empty list.
    pub async fn list(&self) -> Result<Vec<CrudDemo>, AppError> {
        let records = self.gateway.session().find_all().await?;
        tracing::debug!(count = records.len(), "listed crud demos");
        Ok(records)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<CrudDemo, AppError> {
        let session = self.gateway.session();
        session.find(id).await?.ok_or_else(|| not_found(id))
    }

    /// Overwrite the mutable fields of an existing record. No upsert.
    pub async fn replace(&self, id: i32, record: CrudDemo) -> Result<(), AppError> {
        if id != record.id {
            tracing::warn!(path_id = id, body_id = record.id, "rejected replace with mismatched ids");
            return Err(AppError::BadRequest(format!(
                "Path id {id} does not match body id {}",
                record.id
            )));
        }

        let mut session = self.gateway.session();
        let mut existing = session.find(id).await?.ok_or_else(|| not_found(id))?;
        existing.name = record.name;
        session.mark_modified(&existing);

        if let Err(err) = session.commit().await {
            if matches!(err, DataError::ConcurrencyConflict { .. }) {
                tracing::warn!(id, "concurrent modification while replacing crud demo");
            }
            return Err(err.into());
        }

        tracing::info!(id, "replaced crud demo");
        Ok(())
    }

    pub async fn create(&self, record: CrudDemo) -> Result<Created<CrudDemo>, AppError> {
        let mut session = self.gateway.session();
        if !session.is_provisioned().await? {
            return Err(AppError::Internal(DataError::NotProvisioned.to_string()));
        }

        if crud_demo_exists(&session, record.id).await? {
            tracing::warn!(id = record.id, "rejected create of existing crud demo");
            return Err(AppError::UnprocessableEntity(format!(
                "Id {} already exists",
                record.id
            )));
        }

        session.add(record.clone());
        session.commit().await?;

        tracing::info!(id = record.id, "created crud demo");
        Ok(Created {
            location: location(record.id),
            body: record,
        })
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let mut session = self.gateway.session();
        let record = session.find(id).await?.ok_or_else(|| not_found(id))?;
        session.remove(&record);
        session.commit().await?;

        tracing::info!(id, "deleted crud demo");
        Ok(())
    }
}

/// Whether a record with `id` exists. An unprovisioned store counts as "no".
pub async fn crud_demo_exists<S: Session>(session: &S, id: i32) -> Result<bool, DataError> {
    match session.any(id).await {
        Err(DataError::NotProvisioned) => Ok(false),
        other => other,
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("CrudDemo {id} not found"))
}

/// Routes for the controller, mounted under [`BASE_PATH`].
pub fn routes<G: Gateway>(controller: CrudDemoController<G>) -> Router {
    Router::new()
        .route(BASE_PATH, get(list::<G>).post(create::<G>))
        .route(
            &format!("{BASE_PATH}/{{id}}"),
            get(get_by_id::<G>).put(replace::<G>).delete(delete::<G>),
        )
        .with_state(controller)
}

async fn list<G: Gateway>(
    State(controller): State<CrudDemoController<G>>,
) -> Result<Json<Vec<CrudDemo>>, AppError> {
    controller.list().await.map(Json)
}

async fn get_by_id<G: Gateway>(
    State(controller): State<CrudDemoController<G>>,
    RecordId(id): RecordId,
) -> Result<Json<CrudDemo>, AppError> {
    controller.get_by_id(id).await.map(Json)
}

async fn replace<G: Gateway>(
    State(controller): State<CrudDemoController<G>>,
    RecordId(id): RecordId,
    JsonBody(body): JsonBody<CrudDemo>,
) -> Result<StatusCode, AppError> {
    controller.replace(id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create<G: Gateway>(
    State(controller): State<CrudDemoController<G>>,
    JsonBody(body): JsonBody<CrudDemo>,
) -> Result<Created<CrudDemo>, AppError> {
    controller.create(body).await
}

async fn delete<G: Gateway>(
    State(controller): State<CrudDemoController<G>>,
    RecordId(id): RecordId,
) -> Result<StatusCode, AppError> {
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
