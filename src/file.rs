use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use crate::concat::CONCAT_FILE_NAME;
use crate::download::throttle::Throttle;
use crate::download::DownloadClient;
use crate::error::Result;
use crate::options::Options;
use crate::pipeline;
use crate::talk::{Talk, DEFAULT_FORMAT};

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum TalkEntity {
    Ids {
        id: String,
        name: String,
        #[serde(default = "default_format")]
        format: String,
    },
    Url {
        url: String,
        #[serde(default = "default_format")]
        format: String,
    },
}

impl TalkEntity {
    fn resolve(self) -> Result<Talk> {
        match self {
            TalkEntity::Ids { id, name, format } => Ok(Talk::new(id, name, format)),
            TalkEntity::Url { url, format } => Talk::from_url(&url, format),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub finished: usize,
    pub skipped: usize,
    pub failed: usize,
}

fn read_talks(file: &Path) -> Result<Vec<TalkEntity>> {
    let file = std::fs::File::open(file)?;
    let reader = std::io::BufReader::new(file);

    Ok(serde_json::from_reader(reader)?)
}

/// Runs every talk listed in `file`, a failing talk does not stop the batch.
pub async fn download_file<T: Throttle>(
    file: &Path,
    client: &DownloadClient,
    throttle: &mut T,
    options: &Options,
) -> Result<BatchSummary> {
    let talks = match read_talks(file) {
        Ok(talks) => talks,
        Err(err) => {
            error!("Error reading talks from {}: {}", file.display(), err);
            return Err(err);
        }
    };

    let mut summary = BatchSummary::default();

    for entity in talks {
        let talk = match entity.resolve() {
            Ok(talk) => talk,
            Err(err) => {
                error!("{}", err);
                summary.failed += 1;
                continue;
            }
        };

        if talk.folder(&options.output_root).join(CONCAT_FILE_NAME).exists() {
            info!("Talk {} ({}) already downloaded, therefore skipping", talk.name, talk.id);
            summary.skipped += 1;
            continue;
        }

        info!("Downloading slides of {} ({})", talk.name, talk.id);

        match pipeline::run(client, throttle, &talk, options).await {
            Ok(report) => {
                info!(
                    "Finished {} ({}): {} slides, {} downloaded, {} already present",
                    talk.name, talk.id, report.slides, report.images.downloaded, report.images.cached
                );
                summary.finished += 1;
            }
            Err(err) => {
                error!("Error downloading slides of {} ({}): {}", talk.name, talk.id, err);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
