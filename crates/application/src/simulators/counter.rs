//! Request counter

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use domain::{CounterSettings, Namespace};
use moka::sync::Cache;
use tracing::{debug, info};

use crate::error::SimulationError;
use crate::pipeline::{FaultSimulator, SimulatorContext, Step};

/// Request header carrying the client id
pub const CLIENT_ID_HEADER: &str = "x-faultbird-id";
/// Response header exposing the running count
pub const REQUEST_COUNT_HEADER: &str = "x-faultbird-request-count";

/// Clients tracked at once
pub const DEFAULT_MAX_CLIENTS: u64 = 10_000;
/// Idle time after which a client's count starts over
pub const DEFAULT_CLIENT_IDLE: Duration = Duration::from_secs(60 * 60);

/// Counts requests per client id
///
/// Counts are kept in memory only. Client ids come from the request, so
/// the table is bounded: the least used ids are evicted past the capacity
/// and idle ids expire.
#[derive(Debug)]
pub struct RequestCounter {
    counts: Cache<String, Arc<AtomicU64>>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_CLIENTS, DEFAULT_CLIENT_IDLE)
    }

    pub fn with_limits(max_clients: u64, idle: Duration) -> Self {
        Self {
            counts: Cache::builder()
                .max_capacity(max_clients)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Increment and return the count of `client_id`
    pub fn increment(&self, client_id: &str) -> u64 {
        let count = self
            .counts
            .get_with_by_ref(client_id, || Arc::new(AtomicU64::new(0)));
        count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current count of `client_id`
    pub fn count(&self, client_id: &str) -> u64 {
        self.counts
            .get(client_id)
            .map_or(0, |count| count.load(Ordering::Relaxed))
    }

    /// Number of client ids currently tracked
    pub fn tracked_clients(&self) -> u64 {
        self.counts.run_pending_tasks();
        self.counts.entry_count()
    }
}

impl Default for RequestCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FaultSimulator for RequestCounter {
    type Settings = CounterSettings;

    fn namespace(&self) -> &'static str {
        Namespace::COUNTER
    }

    async fn evaluate(
        &self,
        mut ctx: SimulatorContext<CounterSettings>,
    ) -> Result<Step, SimulationError> {
        let Some(client_id) = ctx.request().headers.get(CLIENT_ID_HEADER).map(str::to_string)
        else {
            debug!(namespace = Namespace::COUNTER, "No client id, not counting");
            return Ok(ctx.proceed());
        };

        let count = self.increment(&client_id);
        info!(namespace = Namespace::COUNTER, client_id = %client_id, count, "Counted request");
        ctx.response_mut()
            .headers
            .set(REQUEST_COUNT_HEADER, count.to_string());
        Ok(ctx.proceed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Exchange, Headers, RequestMeta};
    use domain::{FailureProbability, IncomingData};
    use serde_json::json;

    fn ctx(headers: Headers) -> SimulatorContext<CounterSettings> {
        let data = IncomingData::parse(json!({"body": 1})).unwrap();
        SimulatorContext::new(
            CounterSettings {},
            FailureProbability::ALWAYS_FAIL.check(0.0),
            Exchange::new(data, RequestMeta::new("POST", "/api/v1/mock", headers)),
        )
    }

    fn count_header(step: Step) -> Option<String> {
        match step {
            Step::Continue(exchange) => exchange
                .response
                .headers
                .get(REQUEST_COUNT_HEADER)
                .map(str::to_string),
            Step::Terminated(_) => unreachable!("counter never terminates"),
        }
    }

    #[tokio::test]
    async fn counts_per_client() {
        let counter = RequestCounter::new();
        let client = || [(CLIENT_ID_HEADER, "client-a")].into_iter().collect::<Headers>();

        assert_eq!(count_header(counter.evaluate(ctx(client())).await.unwrap()).as_deref(), Some("1"));
        assert_eq!(count_header(counter.evaluate(ctx(client())).await.unwrap()).as_deref(), Some("2"));
        assert_eq!(counter.count("client-a"), 2);
        assert_eq!(counter.count("client-b"), 0);
    }

    #[test]
    fn tracked_clients_are_bounded() {
        let counter = RequestCounter::with_limits(8, DEFAULT_CLIENT_IDLE);
        for i in 0..500 {
            counter.increment(&format!("client-{i}"));
        }
        assert!(counter.tracked_clients() <= 8);
    }

    #[test]
    fn idle_clients_start_over() {
        let counter = RequestCounter::with_limits(8, Duration::from_millis(20));
        counter.increment("client-a");
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(counter.count("client-a"), 0);
        assert_eq!(counter.increment("client-a"), 1);
    }

    #[tokio::test]
    async fn missing_client_id_passes_through() {
        let counter = RequestCounter::new();
        let step = counter.evaluate(ctx(Headers::new())).await.unwrap();
        assert_eq!(count_header(step), None);
    }
}
