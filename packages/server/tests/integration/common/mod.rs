
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::common::storage::FilesystemBlobStore;
use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use pdfvault_server::config::{
    AppConfig, CorsConfig, DatabaseConfig, OcrConfig, ServerConfig, StorageConfig,
};
use pdfvault_server::state::AppState;

use self::ocr::MockOcr;

pub mod routes {
    pub const ROOT: &str = "/";
    pub const DIAGNOSTICS: &str = "/test";
    pub const DOCUMENTS: &str = "/api/documents";
    pub const UPLOAD: &str = "/api/documents/upload";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn download(id: &str) -> String {
        format!("/api/documents/{id}/download")
    }
}

pub const PDF_MIME: &str = "application/pdf";

/// A running server wired to a temporary SQLite database, a temporary blob
/// directory and a local mock OCR provider.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub ocr: MockOcr,
    blob_root: PathBuf,
    _blob_dir: TempDir,
    _db_dir: Option<TempDir>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_inner(true).await
    }

    /// A server started without any database configured.
    pub async fn spawn_without_database() -> Self {
        Self::spawn_inner(false).await
    }

    async fn spawn_inner(with_database: bool) -> Self {
        let ocr = MockOcr::start().await;

        let blob_dir = tempfile::tempdir().expect("Failed to create blob dir");
        let blob_root = blob_dir.path().join("blobs");

        let (db, db_dir, db_url) = if with_database {
            let dir = tempfile::tempdir().expect("Failed to create db dir");
            let url = format!("sqlite://{}?mode=rwc", dir.path().join("vault.db").display());
            let db = pdfvault_server::database::init_db(&url)
                .await
                .expect("Failed to initialize test database");
            (Some(db), Some(dir), Some(url))
        } else {
            (None, None, None)
        };

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec!["*".to_string()],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            storage: StorageConfig {
                path: blob_root.clone(),
                max_blob_size: 10 * 1024 * 1024,
            },
            ocr: OcrConfig {
                endpoint: ocr.endpoint(),
                timeout_secs: 5,
            },
        };

        let blob_store = FilesystemBlobStore::from_config(&config.storage)
            .await
            .expect("Failed to create blob store");
        let ocr_client = pdfvault_server::services::ocr::OcrClient::new(&config.ocr)
            .expect("Failed to build OCR client");

        let state = AppState {
            config,
            db,
            blob_store: Arc::new(blob_store),
            ocr: ocr_client,
        };

        let app = pdfvault_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            ocr,
            blob_root,
            _blob_dir: blob_dir,
            _db_dir: db_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// GET returning the raw response, for binary bodies and headers.
    pub async fn get_raw(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request")
    }

    /// Upload `bytes` as the `file` field with the given declared MIME type.
    /// `query` is appended verbatim (e.g. `"use_ocr=true&ocr_api_key=k"`).
    pub async fn upload(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
        query: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = if query.is_empty() {
            self.url(routes::UPLOAD)
        } else {
            format!("{}?{}", self.url(routes::UPLOAD), query)
        };

        let res = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    pub async fn upload_pdf(&self, file_name: &str, bytes: Vec<u8>, query: &str) -> TestResponse {
        self.upload(file_name, PDF_MIME, bytes, query).await
    }

    /// Upload and assert success, returning the document id.
    pub async fn upload_ok(&self, file_name: &str, bytes: Vec<u8>, query: &str) -> String {
        let res = self.upload_pdf(file_name, bytes, query).await;
        assert_eq!(res.status, 200, "upload failed: {}", res.text);
        res.body["id"]
            .as_str()
            .expect("upload response should contain 'id'")
            .to_string()
    }

    /// Number of blobs currently on disk.
    pub fn blob_count(&self) -> usize {
        count_blobs(&self.blob_root)
    }

    /// Remove the blob file for `file_id`, simulating a blob lost out of band.
    pub fn remove_blob(&self, file_id: &str) {
        let path = self.blob_root.join(&file_id[..2]).join(&file_id[2..]);
        std::fs::remove_file(path).expect("Failed to remove blob");
    }
}

fn count_blobs(root: &Path) -> usize {
    let Ok(shards) = std::fs::read_dir(root) else {
        return 0;
    };
    shards
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name() != ".tmp" && entry.path().is_dir())
        .map(|shard| {
            std::fs::read_dir(shard.path())
                .map(|files| files.count())
                .unwrap_or(0)
        })
        .sum()
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn preview(&self) -> &str {
        self.body["extracted_text_preview"]
            .as_str()
            .expect("response should contain 'extracted_text_preview'")
    }

    pub fn ocr_used(&self) -> bool {
        self.body["ocr_used"]
            .as_bool()
            .expect("response should contain 'ocr_used'")
    }
}
