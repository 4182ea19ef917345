use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Extensions accepted by the upload form when nothing else is configured.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["xls", "xlsx"];

/// Application configuration, built once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Scratch directory for uploads in flight (default: "uploads")
    pub upload_dir: PathBuf,

    /// Lower-cased file extensions accepted for upload (default: xls, xlsx)
    pub allowed_extensions: Vec<String>,

    /// Maximum request body size in bytes (default: 16 MB)
    pub max_file_size: usize,

    /// Number of data rows shown in the preview table (default: 3)
    pub preview_rows: usize,

    /// Address the HTTP server binds to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_file_size: 16 * 1024 * 1024, // 16 MB
            preview_rows: 3,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            allowed_extensions: default.allowed_extensions,

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            preview_rows: env::var("PREVIEW_ROWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.preview_rows),

            bind_addr: env::var("BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.bind_addr),
        }
    }

    /// Create config for local development and tests, scratch files under `upload_dir`
    pub fn development(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Self::default()
        }
    }

    /// Whether `extension` is in the allow-set, ignoring case
    pub fn is_extension_allowed(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions.iter().any(|ext| *ext == extension)
    }
}
