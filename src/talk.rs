use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_FORMAT: &str = "workshop";

static TALK_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://slideslive\.(com|de)/([0-9]*)/([^/]*)(.*)").expect("talk url pattern is valid")
});

/// A recorded talk, identified the way the hosting platform addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talk {
    pub id: String,
    pub name: String,
    /// Event category, only used as a directory level in the output tree
    pub format: String,
}

impl Talk {
    pub fn new(id: impl Into<String>, name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            format: format.into(),
        }
    }

    /// Extracts id and name from a talk page url such as
    /// `https://slideslive.com/38956520/some-talk-name`.
    ///
    /// Values are taken verbatim, nothing is normalized.
    pub fn from_url(url: &str, format: impl Into<String>) -> Result<Self> {
        let captures = match TALK_URL.captures(url) {
            Some(captures) => captures,
            None => return Err(Error::InvalidTalkUrl(url.to_string())),
        };

        Ok(Self::new(&captures[2], &captures[3], format))
    }

    pub fn folder(&self, output_root: &Path) -> PathBuf {
        output_root
            .join(&self.format)
            .join(format!("{}-{}", self.name, self.id))
    }
}
