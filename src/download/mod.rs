pub mod slides;
pub mod store;
pub mod throttle;

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use throttle::Throttle;

/// What a response has to look like to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Any,
    /// Reject html bodies, servers answer missing images with an error page
    Image,
}

pub struct DownloadClient {
    client: reqwest::Client,
    max_retries: usize,
}

impl DownloadClient {
    pub fn new(user_agent: &str, timeout: Option<Duration>, max_retries: usize) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(Error::Client)?;

        Ok(Self { client, max_retries })
    }

    /// Downloads `url`, waiting on `throttle` before every attempt.
    pub async fn download<T: Throttle>(&self, throttle: &mut T, url: &Url, expect: Expect) -> Result<Bytes> {
        let mut attempt = 0;

        loop {
            throttle.wait().await;

            match self.get(url, expect).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!("{}, retrying ({}/{})", err, attempt, self.max_retries);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get(&self, url: &Url, expect: Expect) -> Result<Bytes> {
        debug!("Downloading {}", url);

        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(err) => {
                return Err(Error::Request {
                    url: url.clone(),
                    source: err,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.clone(),
                status,
            });
        }

        if expect == Expect::Image {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            if content_type.starts_with("text/html") {
                return Err(Error::UnexpectedContent {
                    url: url.clone(),
                    content_type: content_type.to_string(),
                });
            }
        }

        match response.bytes().await {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(Error::Request {
                url: url.clone(),
                source: err,
            }),
        }
    }
}
