use serde::Serialize;

/// Liveness marker.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RootResponse {
    #[schema(example = "PDF Vault API is running")]
    pub message: String,
}

/// Storage connectivity snapshot returned by `GET /test`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DiagnosticsResponse {
    #[schema(example = "running")]
    pub backend: String,
    /// Overall metadata store status, including the error text if listing tables failed.
    #[schema(example = "connected and working")]
    pub database: String,
    /// Whether a connection string is configured: `set` or `not set`.
    #[schema(example = "set")]
    pub database_url: String,
    #[schema(example = "pdfvault")]
    pub database_name: Option<String>,
    #[schema(example = "Connected")]
    pub connection_status: String,
    /// Up to 10 table names.
    #[schema(example = json!(["document"]))]
    pub collections: Vec<String>,
}
