//! API handlers for the annotation session
//!
//! - `GET /api/current` - the record under the cursor (or a done marker)
//! - `POST /api/annotate` - persist the operator's input and advance
//! - `GET /health` - module liveness

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::session::{AnnotationInput, AnnotationSession};
use crate::AppState;

pub mod ui;

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "module": "epgds-annotate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The current record as shown to the operator
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub description: String,
    pub series_title: String,
    pub episode_number: Option<String>,
    pub subtitle: Option<String>,
}

/// Session snapshot returned by both API endpoints
#[derive(Debug, Serialize)]
pub struct CurrentResponse {
    pub done: bool,
    pub total: usize,
    pub remaining: usize,
    pub record: Option<RecordView>,
}

fn current_response(session: &AnnotationSession) -> CurrentResponse {
    let record = session.current().map(|record| RecordView {
        index: session.cursor(),
        id: record.id.clone(),
        // The symbol-stripped variants read better in a review form
        title: record.title_without_symbols.clone(),
        description: record.description_without_symbols.clone(),
        series_title: record.series_title.clone(),
        episode_number: record.episode_number.clone(),
        subtitle: record.subtitle.clone(),
    });
    CurrentResponse {
        done: session.is_done(),
        total: session.total(),
        remaining: session.remaining(),
        record,
    }
}

fn lock_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "annotation session lock poisoned"})),
    )
        .into_response()
}

/// GET /api/current
pub async fn current_record(State(state): State<AppState>) -> Response {
    let Ok(session) = state.session.lock() else {
        return lock_error();
    };
    Json(current_response(&session)).into_response()
}

/// Operator input for one record
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    #[serde(default)]
    pub series_title: String,
    #[serde(default)]
    pub episode_number: String,
    #[serde(default)]
    pub subtitle: String,
}

/// POST /api/annotate
///
/// Persists synchronously; the response is the next record. A failed write
/// answers 500 and leaves the cursor in place so nothing is silently lost.
pub async fn submit_annotation(
    State(state): State<AppState>,
    Json(request): Json<AnnotateRequest>,
) -> Response {
    let Ok(mut session) = state.session.lock() else {
        return lock_error();
    };

    if session.is_done() {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "all records are already annotated"})),
        )
            .into_response();
    }

    let id = session
        .current()
        .map(|record| record.id.clone())
        .unwrap_or_default();
    let input = AnnotationInput {
        series_title: request.series_title,
        episode_number: request.episode_number,
        subtitle: request.subtitle,
    };

    match session.annotate_current(input) {
        Ok(()) => {
            info!(id = %id, remaining = session.remaining(), "annotation saved");
            Json(current_response(&session)).into_response()
        }
        Err(e) => {
            error!(id = %id, error = %e, "failed to persist annotation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}
