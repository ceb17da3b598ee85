use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    error::{ApiError, StoreError},
    state::AppState,
    students::{
        dto::{MessageResponse, StudentPayload},
        extract::{ApiJson, ApiPath},
        repo_types::Student,
    },
};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/:id", put(update_student).delete(delete_student))
}

#[instrument(skip(state))]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    match state.store.list().await {
        Ok(students) => Ok(Json(students)),
        Err(e) => {
            error!(error = %e, "list students failed");
            Err(ApiError::Store(e.to_string()))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<StudentPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let new = payload.into_new_student().map_err(|e| {
        warn!(error = %e, "create rejected");
        e
    })?;

    match state.store.insert(&new).await {
        Ok(student) => {
            info!(id = student.id, email = %student.email, "student created");
            Ok(Json(MessageResponse::new("Student added successfully")))
        }
        Err(StoreError::DuplicateEmail) => {
            warn!(email = %new.email, "email already exists");
            Err(ApiError::Duplicate)
        }
        Err(e) => {
            error!(error = %e, "insert student failed");
            Err(ApiError::Store(e.to_string()))
        }
    }
}

/// Replaces every mutable field. An id that matches nothing still succeeds.
#[instrument(skip(state, payload))]
pub async fn update_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<StudentPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let new = payload.into_new_student().map_err(|e| {
        warn!(error = %e, id, "update rejected");
        ApiError::Rejected(e.to_string())
    })?;

    match state.store.update(id, &new).await {
        Ok(rows) => {
            info!(id, rows, "student updated");
            Ok(Json(MessageResponse::new("Student updated successfully")))
        }
        Err(StoreError::DuplicateEmail) => {
            warn!(id, email = %new.email, "email already exists");
            Err(ApiError::Duplicate)
        }
        Err(e) => {
            error!(error = %e, id, "update student failed");
            Err(ApiError::Rejected(e.to_string()))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.store.delete(id).await {
        Ok(rows) => {
            info!(id, rows, "student deleted");
            Ok(Json(MessageResponse::new("Student deleted successfully")))
        }
        Err(e) => {
            error!(error = %e, id, "delete student failed");
            Err(ApiError::Store(e.to_string()))
        }
    }
}
