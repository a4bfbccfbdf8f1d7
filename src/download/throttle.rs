use std::time::Duration;

use tokio::time::Instant;

/// Gate that every outgoing request passes through.
#[allow(async_fn_in_trait)]
pub trait Throttle {
    async fn wait(&mut self);
}

/// Lets a request through at most once per `interval`.
///
/// The first request is not delayed, every later one waits until `interval`
/// has passed since the previous request was let through.
#[derive(Debug)]
pub struct FixedInterval {
    interval: Duration,
    last: Option<Instant>,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }
}

impl Throttle for FixedInterval {
    async fn wait(&mut self) {
        if let Some(last) = self.last {
            tokio::time::sleep_until(last + self.interval).await;
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

#[cfg(test)]
impl Throttle for Unthrottled {
    async fn wait(&mut self) {}
}
