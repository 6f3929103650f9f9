use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::database::{database_name, list_tables};
use crate::models::health::{DiagnosticsResponse, RootResponse};
use crate::state::AppState;

const MAX_LISTED_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 80;

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "root",
    summary = "Liveness marker",
    responses((status = 200, description = "Service is up", body = RootResponse)),
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "PDF Vault API is running".into(),
    })
}

#[utoipa::path(
    get,
    path = "/test",
    tag = "Health",
    operation_id = "storageDiagnostics",
    summary = "Storage connectivity snapshot",
    description = "Reports whether a database is configured and reachable, and lists up to 10 tables. \
        Always returns 200; problems are described in the body.",
    responses((status = 200, description = "Diagnostic snapshot", body = DiagnosticsResponse)),
)]
#[instrument(skip(state))]
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let url = state.config.database.url.as_deref();

    let mut response = DiagnosticsResponse {
        backend: "running".into(),
        database: "not available".into(),
        database_url: if url.is_some() { "set" } else { "not set" }.into(),
        database_name: None,
        connection_status: "Not Connected".into(),
        collections: Vec::new(),
    };

    let Some(db) = state.db.as_ref() else {
        if url.is_some() {
            response.database = "configured but not initialized".into();
        }
        return Json(response);
    };

    response.database_name = url.and_then(database_name);
    response.connection_status = "Connected".into();

    match list_tables(db).await {
        Ok(mut tables) => {
            tables.truncate(MAX_LISTED_COLLECTIONS);
            response.collections = tables;
            response.database = "connected and working".into();
        }
        Err(e) => {
            let detail: String = e.to_string().chars().take(MAX_ERROR_CHARS).collect();
            response.database = format!("connected but error: {detail}");
        }
    }

    Json(response)
}
