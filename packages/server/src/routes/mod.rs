use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Routes outside `/api`: liveness and storage diagnostics.
pub fn root_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::root))
        .routes(routes!(handlers::health::diagnostics))
}

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    document_routes(config)
}

fn document_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let query = OpenApiRouter::new()
        .routes(routes!(handlers::document::list_documents))
        .routes(routes!(handlers::document::download_document));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::document::upload_document))
        .layer(handlers::document::upload_body_limit(
            config.storage.max_blob_size,
        ));

    query.merge(upload)
}
