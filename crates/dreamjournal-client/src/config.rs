use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:50051";
pub const DEFAULT_STORAGE_PATH: &str = "dreamjournal.db";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server origin, without the `/api` prefix.
    pub api_url: String,
    pub storage_path: PathBuf,
}

impl ClientConfig {
    /// Reads `DREAMJOURNAL_API_URL` and `DREAMJOURNAL_STORAGE_PATH`, falling back to defaults.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("DREAMJOURNAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let storage_path = std::env::var("DREAMJOURNAL_STORAGE_PATH")
            .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.into());

        Self::new(api_url, storage_path)
    }

    pub fn new(api_url: impl Into<String>, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            storage_path: storage_path.into(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_STORAGE_PATH)
    }
}
