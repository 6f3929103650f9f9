use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::StorageConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. `["*"]` allows any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Connection string. Absent means the service runs without a metadata store.
    pub url: Option<String>,
}

/// Outbound OCR provider settings.
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// Default: "https://api.ocr.space/parse/image".
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,
    /// Default: 60.
    #[serde(default = "default_ocr_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ocr_endpoint() -> String {
    "https://api.ocr.space/parse/image".into()
}
fn default_ocr_timeout_secs() -> u64 {
    60
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ocr_endpoint(),
            timeout_secs: default_ocr_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("PDFVAULT_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.cors.allow_origins", vec!["*"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.path", "./data/blobs")?
            .set_default("storage.max_blob_size", 128 * 1024 * 1024_i64)?
            .set_default("ocr.endpoint", default_ocr_endpoint())?
            .set_default("ocr.timeout_secs", default_ocr_timeout_secs())?
            .add_source(File::with_name(&config_path).required(false))
            // e.g. PDFVAULT__SERVER__PORT=9000
            .add_source(Environment::with_prefix("PDFVAULT").separator("__"))
            // The conventional single connection string wins over everything else.
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?;

        s.try_deserialize()
    }
}
