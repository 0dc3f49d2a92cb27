//! Connection fault simulator

use async_trait::async_trait;
use domain::{ConnectionFaultDescriptor, Namespace};
use tracing::info;

use crate::error::SimulationError;
use crate::pipeline::{FaultSimulator, Reply, SimulatedResponse, SimulatorContext, Step};

/// Ends the request without the normal response
#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectionSimulator;

#[async_trait]
impl FaultSimulator for ConnectionSimulator {
    type Settings = ConnectionFaultDescriptor;

    fn namespace(&self) -> &'static str {
        Namespace::CONNECTION
    }

    async fn evaluate(
        &self,
        ctx: SimulatorContext<ConnectionFaultDescriptor>,
    ) -> Result<Step, SimulationError> {
        let response = match ctx.settings {
            ConnectionFaultDescriptor::EmptyResponse => {
                info!(namespace = Namespace::CONNECTION, "Emptying the response");
                Reply::empty(200).into()
            },
            ConnectionFaultDescriptor::ResetByPeer => {
                info!(namespace = Namespace::CONNECTION, "Resetting connection");
                SimulatedResponse::ResetConnection
            },
        };
        Ok(ctx.respond(response))
    }
}
