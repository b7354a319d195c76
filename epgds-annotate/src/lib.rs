//! epgds-annotate library - manual annotation web tool
//!
//! Serves a local web form over a subset file so an operator can walk the
//! records sequentially and attach series title, episode number, and
//! subtitle annotations. One operator, one file: every confirmed edit is
//! persisted synchronously before the cursor advances.

use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod session;

use session::AnnotationSession;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single annotation session; a mutex is all the locking one
    /// operator needs
    pub session: Arc<Mutex<AnnotationSession>>,
}

impl AppState {
    pub fn new(session: AnnotationSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::ui::annotation_page))
        .route("/api/current", get(api::current_record))
        .route("/api/annotate", post(api::submit_annotation))
        .route("/health", get(api::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
