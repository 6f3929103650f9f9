use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::document;
use crate::models::shared::query_flag;
use crate::utils::preview::{LIST_PREVIEW_CHARS, preview};

/// Default `limit` for `GET /api/documents`.
pub const DEFAULT_LIST_LIMIT: u64 = 50;

/// Query parameters for `POST /api/documents/upload`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Force OCR even when the PDF has a usable text layer.
    #[serde(default, deserialize_with = "query_flag")]
    #[param(value_type = Option<bool>, default = false)]
    pub use_ocr: bool,
    /// OCR.space API key. Without it OCR is skipped silently.
    pub ocr_api_key: Option<String>,
}

/// Query parameters for `GET /api/documents`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentListQuery {
    /// Maximum number of records to return. Default: 50.
    pub limit: Option<u64>,
}

/// Response for a successful upload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    #[schema(example = "invoice.pdf")]
    pub filename: String,
    /// Upload size in bytes.
    #[schema(example = 48213)]
    pub size: i64,
    /// Whether OCR output replaced the native text.
    pub ocr_used: bool,
    /// First 300 characters of the stored text, `...`-terminated when cut.
    #[schema(example = "INVOICE #2024-113 ...")]
    pub extracted_text_preview: String,
}

/// One entry of `GET /api/documents`. Carries a preview, never the full text.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DocumentListItem {
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    pub filename: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub size: i64,
    pub ocr_used: bool,
    /// Blob id of the stored file.
    pub file_id: Option<String>,
    /// First 200 characters of the stored text, `...`-terminated when cut.
    pub extracted_text_preview: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DocumentListResponse {
    pub items: Vec<DocumentListItem>,
}

impl From<document::Model> for DocumentListItem {
    fn from(model: document::Model) -> Self {
        Self {
            id: model.id.to_string(),
            extracted_text_preview: preview(&model.extracted_text, LIST_PREVIEW_CHARS),
            filename: model.filename,
            content_type: model.content_type,
            size: model.size,
            ocr_used: model.ocr_used,
            file_id: model.file_id,
            created_at: model.created_at,
        }
    }
}
