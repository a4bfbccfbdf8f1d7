use std::path::Path;

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::download::throttle::Throttle;
use crate::download::{DownloadClient, Expect};
use crate::error::{Error, Result};

/// What to do when the destination of a download is already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingFile {
    #[default]
    Skip,
    Overwrite,
}

#[derive(Debug)]
pub enum Fetched {
    /// The file was already on disk and left untouched
    Cached,
    Downloaded(Bytes),
}

/// Files on disk addressed by path, downloaded on demand.
#[derive(Debug, Clone, Copy)]
pub struct LocalStore {
    policy: ExistingFile,
}

impl LocalStore {
    pub fn new(policy: ExistingFile) -> Self {
        Self { policy }
    }

    pub async fn fetch<T: Throttle>(
        &self,
        client: &DownloadClient,
        throttle: &mut T,
        url: &Url,
        path: &Path,
        expect: Expect,
    ) -> Result<Fetched> {
        if self.policy == ExistingFile::Skip && path.exists() {
            debug!("File {} already exists, therefore skipping download", path.display());
            return Ok(Fetched::Cached);
        }

        let bytes = client.download(throttle, url, expect).await?;

        let mut file = std::fs::File::create(path)?;
        let mut content = std::io::Cursor::new(&bytes);
        std::io::copy(&mut content, &mut file)?;

        Ok(Fetched::Downloaded(bytes))
    }
}

/// Creates `path` as a directory unless it already is one.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(Error::PathCollision(path.to_path_buf()));
    }

    std::fs::create_dir_all(path)?;

    Ok(())
}
