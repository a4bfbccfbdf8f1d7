use std::path::PathBuf;

use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not a correct url")]
    InvalidTalkUrl(String),

    #[error("{} is a file, can't create a folder with that name", .0.display())]
    PathCollision(PathBuf),

    #[error("invalid url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("error creating http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("error downloading {url}: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("error downloading {url}: server answered {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },

    /// The server answered with something that is not the requested content,
    /// usually an html error page instead of an image
    #[error("error downloading {url}: unexpected content type {content_type}")]
    UnexpectedContent { url: Url, content_type: String },

    #[error("invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML manifest: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("manifest entry {index} has an invalid time: {value:?}")]
    InvalidTime { index: usize, value: String },

    #[error("manifest entry {index} is missing its time or slide name")]
    MalformedSlide { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
