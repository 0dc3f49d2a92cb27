//! Request verification

use async_trait::async_trait;
use domain::{DomainError, FailOn, Namespace, RequestVerificationSettings};
use serde_json::json;
use tracing::info;

use crate::error::SimulationError;
use crate::pipeline::{FaultSimulator, Reply, SimulatorContext, Step};

/// Fails the request when its URL matches, or does not match, a rule
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestVerifier;

#[async_trait]
impl FaultSimulator for RequestVerifier {
    type Settings = RequestVerificationSettings;

    fn namespace(&self) -> &'static str {
        Namespace::REQUEST
    }

    fn check(&self, settings: &RequestVerificationSettings) -> Result<(), DomainError> {
        settings.validate_slice()
    }

    async fn evaluate(
        &self,
        ctx: SimulatorContext<RequestVerificationSettings>,
    ) -> Result<Step, SimulationError> {
        let Some(rule) = &ctx.settings.verify_url else {
            return Ok(ctx.proceed());
        };

        info!(namespace = Namespace::REQUEST, "Verifying URL");
        let original = ctx.request().uri.as_str();
        let error = match rule.fail_on {
            FailOn::Same if original == rule.url => Some(format!(
                "original url: {original} same as provided url: {}",
                rule.url
            )),
            FailOn::Different if original != rule.url => Some(format!(
                "original url: {original} is different than the provided url: {}",
                rule.url
            )),
            _ => None,
        };

        match error {
            Some(message) => Ok(ctx.respond(Reply::json(400, &json!({ "error": message })))),
            None => Ok(ctx.proceed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Exchange, Headers, RequestMeta, SimulatedResponse};
    use domain::{FailureProbability, IncomingData, UrlVerification};
    use serde_json::json;

    fn ctx(url: &str, fail_on: FailOn) -> SimulatorContext<RequestVerificationSettings> {
        let data = IncomingData::parse(json!({"body": 1})).unwrap();
        SimulatorContext::new(
            RequestVerificationSettings {
                verify_url: Some(UrlVerification {
                    url: url.to_string(),
                    fail_on,
                }),
            },
            FailureProbability::ALWAYS_FAIL.check(0.0),
            Exchange::new(
                data,
                RequestMeta::new("POST", "/api/v1/mock?x=1", Headers::new()),
            ),
        )
    }

    fn status(step: Step) -> Option<u16> {
        match step {
            Step::Continue(_) => None,
            Step::Terminated(response) => response.status(),
        }
    }

    #[tokio::test]
    async fn fail_on_same() {
        let step = RequestVerifier
            .evaluate(ctx("/api/v1/mock?x=1", FailOn::Same))
            .await
            .unwrap();
        assert_eq!(status(step), Some(400));

        let step = RequestVerifier
            .evaluate(ctx("/other", FailOn::Same))
            .await
            .unwrap();
        assert_eq!(status(step), None);
    }

    #[tokio::test]
    async fn fail_on_different() {
        let step = RequestVerifier
            .evaluate(ctx("/other", FailOn::Different))
            .await
            .unwrap();
        let Step::Terminated(SimulatedResponse::Reply(reply)) = step else {
            unreachable!("expected reply");
        };
        let body: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("is different than"));

        let step = RequestVerifier
            .evaluate(ctx("/api/v1/mock?x=1", FailOn::Different))
            .await
            .unwrap();
        assert_eq!(status(step), None);
    }
}
