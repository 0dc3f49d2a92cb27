//! Chunked dribble scheduler
//!
//! A [`DribblePlan`] is the per-request schedule of a chunked dribble: the
//! body split into contiguous slices and the pause between two writes.
//! [`DribblePlan::run`] drives the schedule against a [`ChunkSink`]
//! supplied by the transport. The plan owns no cross-request state.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

/// The peer stopped accepting chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chunk sink closed by peer")]
pub struct SinkClosed;

/// Destination of a dribbled response body
#[async_trait]
pub trait ChunkSink: Send {
    async fn write(&mut self, chunk: Bytes) -> Result<(), SinkClosed>;

    async fn close(&mut self);
}

/// How a dribble run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DribbleOutcome {
    /// Every chunk was written and the sink closed
    Completed { chunks: usize },
    /// A write failed; the remaining chunks were dropped
    Aborted { written: usize },
}

/// Schedule of one chunked dribble response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DribblePlan {
    chunks: Vec<String>,
    interval: Duration,
}

impl DribblePlan {
    /// Split `text` into `number_of_chunks` slices of `ceil(len / n)`
    /// characters and pace them `floor(duration_ms / n)` apart
    ///
    /// Slicing counts characters, not bytes, so multi-byte text is never
    /// cut inside a code point. Fewer slices come out when the text is
    /// shorter than the requested count.
    pub fn new(text: &str, number_of_chunks: usize, duration_ms: u64) -> Self {
        let n = number_of_chunks.max(1);
        let chars: Vec<char> = text.chars().collect();
        let size = chars.len().div_ceil(n).max(1);
        let chunks = chars
            .chunks(size)
            .map(|slice| slice.iter().collect::<String>())
            .collect();

        Self {
            chunks,
            interval: Duration::from_millis(duration_ms / n as u64),
        }
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Write the chunks oldest first with `interval` between two writes,
    /// then close the sink
    ///
    /// A failed write aborts the run immediately; nothing is retried.
    pub async fn run<S: ChunkSink + ?Sized>(self, sink: &mut S) -> DribbleOutcome {
        let total = self.chunks.len();
        for (index, chunk) in self.chunks.into_iter().enumerate() {
            if index > 0 && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
            if let Err(e) = sink.write(Bytes::from(chunk)).await {
                warn!(written = index, total, error = %e, "Aborting chunked dribble");
                return DribbleOutcome::Aborted { written: index };
            }
            debug!(chunk = index + 1, total, "Wrote dribble chunk");
        }
        sink.close().await;
        DribbleOutcome::Completed { chunks: total }
    }
}
