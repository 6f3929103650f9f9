use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::storage::{BlobId, StorageError};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::entity::document;
use crate::error::{AppError, ErrorBody};
use crate::extractors::query::AppQuery;
use crate::models::document::{
    DEFAULT_LIST_LIMIT, DocumentListItem, DocumentListQuery, DocumentListResponse, UploadQuery,
    UploadResponse,
};
use crate::services::documents::{DocumentService, NewDocument};
use crate::services::ingest::resolve_text;
use crate::state::AppState;
use crate::utils::filename::{attachment_disposition, stored_filename};
use crate::utils::preview::{UPLOAD_PREVIEW_CHARS, preview};

/// The only accepted upload content type.
pub const PDF_MIME: &str = "application/pdf";

/// Headroom on top of the blob size limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn upload_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_blob_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD))
}

struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of the form, rejecting anything that is not declared as a PDF.
async fn read_pdf_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if content_type != PDF_MIME {
            return Err(AppError::Validation("Only PDF files are supported".into()));
        }

        let filename = stored_filename(field.file_name());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;

        return Ok(UploadedFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::Validation("Missing 'file' field".into()))
}

/// Reject payloads the blob store would refuse, before any extraction or OCR work.
fn ensure_within_limit(len: usize, max_blob_size: u64) -> Result<(), AppError> {
    let actual = len as u64;
    if actual > max_blob_size {
        return Err(StorageError::TooLarge {
            actual,
            limit: max_blob_size,
        }
        .into());
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/documents/upload",
    tag = "Documents",
    operation_id = "uploadDocument",
    summary = "Upload a PDF",
    description = "Stores a PDF and its extracted text. Text comes from the PDF's own text layer; \
        OCR is attempted when `use_ocr` is set or the text layer yields 20 characters or fewer, \
        and only if `ocr_api_key` is given. OCR failures silently keep the native text. \
        The file is stored even when no text could be extracted.",
    params(UploadQuery),
    request_body(content_type = "multipart/form-data", description = "PDF under the `file` field"),
    responses(
        (status = 200, description = "Document stored", body = UploadResponse),
        (status = 400, description = "Not a PDF, too large or malformed form (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_pdf_field(&mut multipart).await?;
    ensure_within_limit(upload.bytes.len(), state.config.storage.max_blob_size)?;
    let db = state.db()?;

    let size = i64::try_from(upload.bytes.len()).unwrap_or(i64::MAX);
    let resolved = resolve_text(
        &upload.bytes,
        query.use_ocr,
        query.ocr_api_key.as_deref(),
        &state.ocr,
    )
    .await;

    // Blob first, record second. A failed insert leaves an unreferenced blob behind.
    let blob_id = state.blob_store.put(&upload.bytes).await?;

    let record = DocumentService::new(db)
        .create(NewDocument {
            filename: upload.filename,
            content_type: upload.content_type,
            size,
            extracted_text: resolved.text,
            ocr_used: resolved.ocr_used,
            file_id: blob_id.to_hex(),
        })
        .await?;

    info!(
        document_id = %record.id,
        file_id = %blob_id,
        size,
        use_ocr = query.use_ocr,
        ocr_used = record.ocr_used,
        text_len = record.extracted_text.chars().count(),
        "Document stored"
    );

    Ok(Json(UploadResponse {
        id: record.id.to_string(),
        extracted_text_preview: preview(&record.extracted_text, UPLOAD_PREVIEW_CHARS),
        filename: record.filename,
        size: record.size,
        ocr_used: record.ocr_used,
    }))
}

#[utoipa::path(
    get,
    path = "/documents",
    tag = "Documents",
    operation_id = "listDocuments",
    summary = "List stored documents",
    description = "Returns up to `limit` documents, newest first. Each item carries a 200-character \
        `extracted_text_preview` instead of the full text.",
    params(DocumentListQuery),
    responses(
        (status = 200, description = "Document list", body = DocumentListResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_documents(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DocumentListQuery>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let db = state.db()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let items = DocumentService::new(db)
        .list(limit)
        .await?
        .into_iter()
        .map(DocumentListItem::from)
        .collect();

    Ok(Json(DocumentListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/documents/{id}/download",
    tag = "Documents",
    operation_id = "downloadDocument",
    summary = "Download the original PDF",
    description = "Streams the stored bytes with the original content type as an attachment. \
        Unknown ids, malformed ids, missing files and storage errors all return 404.",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/pdf"),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(db) = state.db.as_ref() else {
        debug!(%id, "Download without a metadata store");
        return Err(AppError::NotFound("Document not found".into()));
    };

    let record = match find_downloadable(db, &id).await {
        Ok(record) => record,
        Err(reason) => {
            debug!(%id, %reason, "Download did not resolve");
            return Err(AppError::NotFound("Document not found".into()));
        }
    };

    let reader = match state.blob_store.open(&record.blob_id).await {
        Ok(reader) => reader,
        Err(e) => {
            debug!(%id, error = %e, "Blob for document is unavailable");
            return Err(AppError::NotFound("Document not found".into()));
        }
    };

    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.model.content_type.as_str())
        .header(header::CONTENT_LENGTH, record.model.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&record.model.filename),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

struct Downloadable {
    model: document::Model,
    blob_id: BlobId,
}

/// Resolve an id to a record with a usable blob reference. The error string
/// only feeds logs; callers collapse every failure into a 404.
async fn find_downloadable<C: sea_orm::ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Downloadable, String> {
    let uuid = Uuid::parse_str(id).map_err(|e| format!("malformed id: {e}"))?;

    let model = DocumentService::new(db)
        .find(uuid)
        .await
        .map_err(|e| format!("lookup failed: {e}"))?
        .ok_or_else(|| "no such record".to_string())?;

    let file_id = model
        .file_id
        .as_deref()
        .ok_or_else(|| "record has no file reference".to_string())?;
    let blob_id = BlobId::parse(file_id).map_err(|e| e.to_string())?;

    Ok(Downloadable { model, blob_id })
}
