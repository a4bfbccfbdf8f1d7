pub mod json;
pub mod xml;

use std::path::Path;

use clap::ValueEnum;
use tracing::{debug, info, warn};
use url::Url;

use crate::download::store::{ExistingFile, Fetched, LocalStore};
use crate::download::throttle::Throttle;
use crate::download::{DownloadClient, Expect};
use crate::error::{Error, Result};
use crate::talk::Talk;

pub use json::JsonManifest;
pub use xml::XmlManifest;

/// One manifest entry. Entries that cannot be used are kept as `Malformed`
/// so the table stays index aligned with the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideRecord {
    Valid {
        time: u64,
        name: String,
    },
    Malformed {
        index: usize,
        time: Option<u64>,
        name: Option<String>,
    },
}

impl SlideRecord {
    /// Builds a record from optional fields, `Valid` only when both are present.
    pub fn from_fields(index: usize, time: Option<u64>, name: Option<String>) -> Self {
        match (time, name) {
            (Some(time), Some(name)) => SlideRecord::Valid { time, name },
            (time, name) => SlideRecord::Malformed { index, time, name },
        }
    }
}

/// A slide that made it through the malformed-row policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Milliseconds since the start of the talk
    pub time: u64,
    pub name: String,
}

impl Slide {
    pub fn file_name(&self, size: &str) -> String {
        format!("{}-{}-{}.jpg", self.time, self.name, size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MalformedPolicy {
    /// Drop malformed rows with a warning
    #[default]
    Skip,
    /// Abort on the first malformed row
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideTable {
    pub records: Vec<SlideRecord>,
}

impl SlideTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn resolve(&self, policy: MalformedPolicy) -> Result<Vec<Slide>> {
        let mut slides = Vec::with_capacity(self.records.len());

        for record in &self.records {
            match record {
                SlideRecord::Valid { time, name } => slides.push(Slide {
                    time: *time,
                    name: name.clone(),
                }),
                SlideRecord::Malformed { index, time, name } => match policy {
                    MalformedPolicy::Skip => {
                        warn!(
                            "Skipping malformed manifest entry {} (time: {:?}, slide name: {:?})",
                            index, time, name
                        );
                    }
                    MalformedPolicy::Fail => {
                        return Err(Error::MalformedSlide { index: *index });
                    }
                },
            }
        }

        Ok(slides)
    }
}

/// Turns raw manifest bytes into a slide table and knows where the manifest lives.
pub trait ManifestParser {
    /// Extension of the cached manifest file
    fn extension(&self) -> &'static str;

    fn url(&self, base_data_url: &str, video_id: &str) -> Result<Url>;

    fn parse(&self, bytes: &[u8]) -> Result<SlideTable>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ManifestFormat {
    #[default]
    Json,
    Xml,
}

impl ManifestFormat {
    pub fn parser(self) -> Box<dyn ManifestParser> {
        match self {
            ManifestFormat::Json => Box::new(JsonManifest),
            ManifestFormat::Xml => Box::new(XmlManifest),
        }
    }
}

/// Loads the manifest of a talk, downloading it into `folder` on the first run
/// and reusing the stored copy afterwards.
pub async fn fetch_manifest<T: Throttle>(
    client: &DownloadClient,
    throttle: &mut T,
    parser: &dyn ManifestParser,
    base_data_url: &str,
    talk: &Talk,
    folder: &Path,
) -> Result<SlideTable> {
    let path = folder.join(format!("{}.{}", talk.id, parser.extension()));
    let url = parser.url(base_data_url, &talk.id)?;

    let store = LocalStore::new(ExistingFile::Skip);
    let bytes = match store.fetch(client, throttle, &url, &path, Expect::Any).await? {
        Fetched::Cached => {
            debug!("Using cached manifest {}", path.display());
            std::fs::read(&path)?
        }
        Fetched::Downloaded(bytes) => {
            info!("Downloaded manifest {}", path.display());
            bytes.to_vec()
        }
    };

    parser.parse(&bytes)
}
