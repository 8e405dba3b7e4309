use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/wldeh/bible-api/bibles";
pub const DEFAULT_TRANSLATION: &str = "en-lsv";
pub const DEFAULT_OUTPUT_ROOT: &str = "json";

/// Where to fetch from and where to write to.
///
/// The defaults point at the jsDelivr mirror of the wldeh bible-api and
/// write under `./json`, relative to the working directory.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Root of the bible-api mirror, without the translation segment.
    pub base_url: String,
    /// Translation identifier (e.g., "en-lsv", "en-kjv").
    pub translation: String,
    /// Directory that per-book output directories are created under.
    pub output_root: PathBuf,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            translation: DEFAULT_TRANSLATION.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            user_agent: concat!("scripture/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// `{base_url}/{translation}/books`
    pub fn books_url(&self) -> String {
        format!("{}/{}/books", self.base_url.trim_end_matches('/'), self.translation)
    }
}
