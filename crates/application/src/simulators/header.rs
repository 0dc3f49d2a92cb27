//! Header mutator

use async_trait::async_trait;
use domain::{DomainError, HeaderMutationSettings, Namespace};
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{info, warn};

use crate::error::SimulationError;
use crate::pipeline::{FaultSimulator, SimulatorContext, Step};

const RANDOM_HEADER_LEN: usize = 32;

/// Adds, invents and falsifies response headers
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderMutator;

#[async_trait]
impl FaultSimulator for HeaderMutator {
    type Settings = HeaderMutationSettings;

    fn namespace(&self) -> &'static str {
        Namespace::HEADER
    }

    fn check(&self, settings: &HeaderMutationSettings) -> Result<(), DomainError> {
        settings.validate_slice()
    }

    async fn evaluate(
        &self,
        mut ctx: SimulatorContext<HeaderMutationSettings>,
    ) -> Result<Step, SimulationError> {
        let settings = std::mem::take(&mut ctx.settings);

        if settings.permutate {
            warn!(namespace = Namespace::HEADER, operation = "permutate", "Not implemented");
        }
        if settings.duplicate_header {
            warn!(
                namespace = Namespace::HEADER,
                operation = "duplicateHeader",
                "Not implemented"
            );
        }

        if !settings.extra_headers.is_empty() {
            info!(
                namespace = Namespace::HEADER,
                count = settings.extra_headers.len(),
                "Injecting extra headers"
            );
            for pair in settings.extra_headers {
                ctx.response_mut().headers.set(pair.key, pair.value);
            }
        }

        if settings.inject_random {
            let (name, value) = random_header(&mut rand::rng());
            info!(namespace = Namespace::HEADER, header = %name, "Injecting random header");
            ctx.response_mut().headers.set(name, value);
        }

        if settings.incorrect_content_length {
            let length = rand::rng().random_range(0..=u64::from(u32::MAX));
            info!(namespace = Namespace::HEADER, length, "Spoofing content length");
            ctx.response_mut().content_length = Some(length);
        }

        Ok(ctx.proceed())
    }
}

/// A header with a random alphanumeric name and value
pub fn random_header<R: Rng + ?Sized>(rng: &mut R) -> (String, String) {
    (token(rng), token(rng))
}

fn token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..RANDOM_HEADER_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Exchange, RequestMeta};
    use domain::{FailureProbability, HeaderPair, IncomingData};
    use serde_json::json;

    fn run_ctx(settings: HeaderMutationSettings) -> SimulatorContext<HeaderMutationSettings> {
        let data = IncomingData::parse(json!({"body": {"a": 1}})).unwrap();
        SimulatorContext::new(
            settings,
            FailureProbability::ALWAYS_FAIL.check(0.9),
            Exchange::new(data, RequestMeta::default()),
        )
    }

    async fn run(settings: HeaderMutationSettings) -> Exchange {
        match HeaderMutator.evaluate(run_ctx(settings)).await.unwrap() {
            Step::Continue(exchange) => exchange,
            Step::Terminated(_) => unreachable!("header mutator never terminates"),
        }
    }

    #[test]
    fn random_header_is_alphanumeric() {
        let (name, value) = random_header(&mut rand::rng());
        assert_eq!(name.len(), RANDOM_HEADER_LEN);
        assert_eq!(value.len(), RANDOM_HEADER_LEN);
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn sets_extra_headers() {
        let exchange = run(HeaderMutationSettings {
            extra_headers: vec![
                HeaderPair {
                    key: "x-one".into(),
                    value: "1".into(),
                },
                HeaderPair {
                    key: "x-two".into(),
                    value: "2".into(),
                },
            ],
            ..Default::default()
        })
        .await;
        assert_eq!(exchange.response.headers.get("x-one"), Some("1"));
        assert_eq!(exchange.response.headers.get("x-two"), Some("2"));
    }

    #[tokio::test]
    async fn injects_one_random_header() {
        let exchange = run(HeaderMutationSettings {
            inject_random: true,
            ..Default::default()
        })
        .await;
        assert_eq!(exchange.response.headers.len(), 1);
    }

    #[tokio::test]
    async fn spoofs_content_length() {
        let exchange = run(HeaderMutationSettings {
            incorrect_content_length: true,
            ..Default::default()
        })
        .await;
        assert!(exchange.response.content_length.is_some());
    }

    #[tokio::test]
    async fn unimplemented_operations_change_nothing() {
        let exchange = run(HeaderMutationSettings {
            permutate: true,
            duplicate_header: true,
            ..Default::default()
        })
        .await;
        assert!(exchange.response.headers.is_empty());
        assert_eq!(exchange.response.content_length, None);
    }
}
