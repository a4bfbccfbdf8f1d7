use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use tracing::info;
use url::Url;

use crate::download::store::{Fetched, LocalStore};
use crate::download::throttle::Throttle;
use crate::download::{DownloadClient, Expect};
use crate::error::Result;
use crate::manifest::Slide;

/// Image resolution served by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SizeTier {
    Medium,
    #[default]
    Big,
}

impl SizeTier {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeTier::Medium => "medium",
            SizeTier::Big => "big",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub cached: usize,
}

pub fn image_url(base_data_url: &str, video_id: &str, slide_name: &str, size: SizeTier) -> Result<Url> {
    Ok(Url::parse(&format!(
        "{}{}/slides/{}/{}.jpg",
        base_data_url, video_id, size, slide_name
    ))?)
}

/// Picks the slides to download, `offset` behaves like a python slice start:
/// positive values skip leading slides, negative values keep the last `-offset`.
pub fn select(slides: &[Slide], offset: i64) -> &[Slide] {
    let len = slides.len();
    let magnitude = usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX);

    let start = if offset >= 0 {
        magnitude.min(len)
    } else {
        len.saturating_sub(magnitude)
    };

    &slides[start..]
}

#[allow(clippy::too_many_arguments)]
pub async fn download_slides<T: Throttle>(
    client: &DownloadClient,
    throttle: &mut T,
    store: &LocalStore,
    base_data_url: &str,
    video_id: &str,
    slides: &[Slide],
    size: SizeTier,
    slides_folder: &Path,
) -> Result<DownloadSummary> {
    let mut summary = DownloadSummary::default();

    for (i, slide) in slides.iter().enumerate() {
        let url = image_url(base_data_url, video_id, &slide.name, size)?;
        let path = slides_folder.join(slide.file_name(size.as_str()));

        match store.fetch(client, throttle, &url, &path, Expect::Image).await? {
            Fetched::Cached => summary.cached += 1,
            Fetched::Downloaded(bytes) => {
                info!(
                    "{:width$} / {:width$} downloaded {} ({} bytes)",
                    i + 1,
                    slides.len(),
                    path.display(),
                    bytes.len(),
                    width = slides.len().to_string().len()
                );
                summary.downloaded += 1;
            }
        }
    }

    Ok(summary)
}
