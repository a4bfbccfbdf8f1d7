use std::path::PathBuf;
use std::time::Duration;

use crate::download::slides::SizeTier;
use crate::download::store::ExistingFile;
use crate::manifest::{ManifestFormat, MalformedPolicy};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Ubuntu Chromium/76.0.3809.100 Chrome/76.0.3809.100 Safari/537.36";
pub const DEFAULT_BASE_DATA_URL: &str = "https://d2ygwrecguqg66.cloudfront.net/data/presentations/";
pub const DEFAULT_OUTPUT_ROOT: &str = "slideshares";

#[derive(Debug, Clone)]
pub struct Options {
    pub output_root: PathBuf,
    pub base_data_url: String,
    pub user_agent: String,
    pub manifest_format: ManifestFormat,
    pub size: SizeTier,
    pub slide_offset: i64,
    pub wait_time: Duration,
    pub max_download_retries: usize,
    pub request_timeout: Option<Duration>,
    pub on_malformed: MalformedPolicy,
    pub existing_images: ExistingFile,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            base_data_url: DEFAULT_BASE_DATA_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            manifest_format: ManifestFormat::Json,
            size: SizeTier::Big,
            slide_offset: 0,
            wait_time: Duration::from_millis(200),
            max_download_retries: 0,
            request_timeout: None,
            on_malformed: MalformedPolicy::Skip,
            existing_images: ExistingFile::Skip,
        }
    }
}
