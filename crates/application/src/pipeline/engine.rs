//! Pipeline engine
//!
//! The registry keeps an ordered list of layers: the source layer first,
//! loaded simulators in load order, the terminal handler last. Dispatch
//! reads a snapshot of the list without locking; `load` and `unload`
//! are serialized by a writer lock and swap in a new list, so a request
//! in flight always finishes on the list it started with.

use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use domain::{IncomingData, Namespace};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{Exchange, FinalHandler, Reply, RequestMeta, SimulatedResponse, Simulator, Step};
use crate::error::{RegistryError, SimulationError};

type Layers = Vec<Arc<dyn Simulator>>;

/// Registry and dispatcher of the simulator pipeline
pub struct MockEngine {
    layers: ArcSwap<Layers>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for MockEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEngine")
            .field("namespaces", &self.namespaces())
            .finish_non_exhaustive()
    }
}

impl MockEngine {
    /// Create an engine holding only the source layer and the terminal
    /// handler
    pub fn new(source_layer: Arc<dyn Simulator>) -> Self {
        let layers: Layers = vec![source_layer, Arc::new(FinalHandler)];
        Self {
            layers: ArcSwap::from_pointee(layers),
            writer: Mutex::new(()),
        }
    }

    /// Register a simulator just before the terminal handler
    ///
    /// Fails without touching the registry if the namespace is taken.
    pub fn load(
        self: &Arc<Self>,
        simulator: Arc<dyn Simulator>,
    ) -> Result<SimulatorHandle, RegistryError> {
        let mut handles = self.load_all([simulator])?;
        Ok(handles.remove(0))
    }

    /// Register several simulators in order, all or none
    pub fn load_all(
        self: &Arc<Self>,
        simulators: impl IntoIterator<Item = Arc<dyn Simulator>>,
    ) -> Result<Vec<SimulatorHandle>, RegistryError> {
        let simulators: Layers = simulators.into_iter().collect();
        let _guard = self.writer.lock();

        let current = self.layers.load_full();
        let mut next: Layers = current.as_ref().clone();
        for simulator in &simulators {
            let namespace = simulator.namespace();
            let usable = Namespace::new(namespace).is_ok_and(|ns| !ns.is_reserved());
            if !usable || next.iter().any(|layer| layer.namespace() == namespace) {
                warn!(namespace, "Refusing to load simulator");
                return Err(RegistryError::NamespaceTaken(namespace.to_string()));
            }
            let terminal = next.len() - 1;
            next.insert(terminal, Arc::clone(simulator));
        }
        self.layers.store(Arc::new(next));

        for simulator in &simulators {
            info!(namespace = simulator.namespace(), "Loaded simulator");
        }
        Ok(simulators
            .into_iter()
            .map(|simulator| SimulatorHandle {
                engine: Arc::downgrade(self),
                simulator,
            })
            .collect())
    }

    /// Remove a simulator by identity; returns whether it was registered
    ///
    /// The source layer and the terminal handler cannot be removed.
    pub fn unload(&self, simulator: &Arc<dyn Simulator>) -> bool {
        let _guard = self.writer.lock();

        let current = self.layers.load_full();
        let last = current.len() - 1;
        let Some(index) = current
            .iter()
            .enumerate()
            .position(|(i, layer)| i != 0 && i != last && same_layer(layer, simulator))
        else {
            return false;
        };

        let mut next: Layers = current.as_ref().clone();
        let removed = next.remove(index);
        self.layers.store(Arc::new(next));
        info!(namespace = removed.namespace(), "Unloaded simulator");
        true
    }

    /// Snapshot of the ordered layers
    pub fn handlers(&self) -> Vec<Arc<dyn Simulator>> {
        self.layers.load().as_ref().clone()
    }

    /// Namespaces in pipeline order
    pub fn namespaces(&self) -> Vec<String> {
        self.layers
            .load()
            .iter()
            .map(|layer| layer.namespace().to_string())
            .collect()
    }

    /// Run one request through the pipeline
    ///
    /// Every error a layer raises is turned into a JSON error reply.
    #[instrument(skip_all, fields(method = %request.method, uri = %request.uri))]
    pub async fn dispatch(&self, raw: Value, request: RequestMeta) -> SimulatedResponse {
        match self.run(raw, request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, status = e.status_code(), "Request failed");
                Reply::error(&e).into()
            },
        }
    }

    async fn run(&self, raw: Value, request: RequestMeta) -> Result<SimulatedResponse, SimulationError> {
        let data = IncomingData::parse(raw)?;
        let layers = self.layers.load_full();

        for layer in layers.iter() {
            if let Some(slice) = data.settings.slice(layer.namespace()) {
                layer.validate(slice)?;
            }
        }

        let mut exchange = Exchange::new(data, request);
        for layer in layers.iter() {
            match layer.ingest(exchange).await? {
                Step::Continue(next) => exchange = next,
                Step::Terminated(response) => {
                    debug!(namespace = layer.namespace(), "Layer terminated the request");
                    return Ok(response);
                },
            }
        }

        Err(SimulationError::Internal(
            "pipeline finished without a response".to_string(),
        ))
    }
}

fn same_layer(a: &Arc<dyn Simulator>, b: &Arc<dyn Simulator>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Handle returned by [`MockEngine::load`]
#[derive(Debug)]
pub struct SimulatorHandle {
    engine: Weak<MockEngine>,
    simulator: Arc<dyn Simulator>,
}

impl SimulatorHandle {
    pub fn namespace(&self) -> &str {
        self.simulator.namespace()
    }

    /// Unload the simulator; returns whether it was still registered
    pub fn dispose(self) -> bool {
        self.engine
            .upgrade()
            .is_some_and(|engine| engine.unload(&self.simulator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SimulatorContext;
    use async_trait::async_trait;
    use domain::{FailureProbability, Payload};
    use serde_json::json;

    #[derive(Debug)]
    struct Named(&'static str);

    #[async_trait]
    impl Simulator for Named {
        fn namespace(&self) -> &str {
            self.0
        }

        async fn ingest(&self, mut exchange: Exchange) -> Result<Step, SimulationError> {
            if exchange.settings.slice(self.0).is_some() {
                let mut trail = exchange.body.as_json().cloned().unwrap_or(Value::Null);
                if let Some(list) = trail.as_array_mut() {
                    list.push(json!(self.0));
                }
                exchange.body = Payload::Json(trail);
            }
            Ok(Step::Continue(exchange))
        }
    }

    #[derive(Debug)]
    struct Stop;

    #[async_trait]
    impl Simulator for Stop {
        fn namespace(&self) -> &str {
            "stop"
        }

        fn validate(&self, slice: &Value) -> Result<(), SimulationError> {
            if slice.is_object() {
                Ok(())
            } else {
                Err(SimulationError::Validation("stop expects an object".into()))
            }
        }

        async fn ingest(&self, exchange: Exchange) -> Result<Step, SimulationError> {
            if exchange.settings.slice("stop").is_some() {
                let gate = FailureProbability::ALWAYS_FAIL.check(0.0);
                let ctx = SimulatorContext::new((), gate, exchange);
                return Ok(ctx.respond(Reply::empty(204)));
            }
            Ok(Step::Continue(exchange))
        }
    }

    fn engine() -> Arc<MockEngine> {
        Arc::new(MockEngine::new(Arc::new(Named(Namespace::SOURCE_LAYER))))
    }

    fn reply(response: SimulatedResponse) -> Reply {
        match response {
            SimulatedResponse::Reply(reply) => reply,
            other => unreachable!("expected reply, got {other:?}"),
        }
    }

    fn assert_terminal_last(engine: &MockEngine) {
        let namespaces = engine.namespaces();
        assert_eq!(namespaces.first().map(String::as_str), Some(Namespace::SOURCE_LAYER));
        assert_eq!(namespaces.last().map(String::as_str), Some(Namespace::FINAL_HANDLER));
    }

    #[test]
    fn load_keeps_terminal_handler_last() {
        let engine = engine();
        engine.load(Arc::new(Named("a"))).unwrap();
        engine.load(Arc::new(Named("b"))).unwrap();
        assert_eq!(
            engine.namespaces(),
            ["source-layer", "a", "b", "final-handler"]
        );
    }

    #[test]
    fn duplicate_namespace_fails_every_time_without_mutation() {
        let engine = engine();
        engine.load(Arc::new(Named("delay"))).unwrap();
        let before = engine.namespaces();

        for _ in 0..2 {
            let err = engine.load(Arc::new(Named("delay"))).unwrap_err();
            assert_eq!(err, RegistryError::NamespaceTaken("delay".into()));
            assert_eq!(engine.namespaces(), before);
        }
    }

    #[test]
    fn reserved_namespaces_cannot_be_loaded() {
        let engine = engine();
        assert!(engine.load(Arc::new(Named("final-handler"))).is_err());
        assert!(engine.load(Arc::new(Named("source-layer"))).is_err());
        assert_terminal_last(&engine);
    }

    #[test]
    fn load_all_is_atomic() {
        let engine = engine();
        let batch: Vec<Arc<dyn Simulator>> =
            vec![Arc::new(Named("a")), Arc::new(Named("b")), Arc::new(Named("a"))];
        assert!(engine.load_all(batch).is_err());
        assert_eq!(engine.namespaces(), ["source-layer", "final-handler"]);
    }

    #[test]
    fn unload_by_identity() {
        let engine = engine();
        let a: Arc<dyn Simulator> = Arc::new(Named("a"));
        let other_a: Arc<dyn Simulator> = Arc::new(Named("a"));
        engine.load(Arc::clone(&a)).unwrap();

        assert!(!engine.unload(&other_a));
        assert!(engine.unload(&a));
        assert!(!engine.unload(&a));
        assert_eq!(engine.namespaces(), ["source-layer", "final-handler"]);
    }

    #[test]
    fn sentinels_cannot_be_unloaded() {
        let engine = engine();
        for layer in engine.handlers() {
            assert!(!engine.unload(&layer));
        }
        assert_terminal_last(&engine);
    }

    #[test]
    fn handle_dispose_unloads() {
        let engine = engine();
        let handle = engine.load(Arc::new(Named("a"))).unwrap();
        assert_eq!(handle.namespace(), "a");
        assert!(handle.dispose());
        assert_eq!(engine.namespaces(), ["source-layer", "final-handler"]);
    }

    #[test]
    fn terminal_stays_last_after_mixed_operations() {
        let engine = engine();
        let mut handles = Vec::new();
        for name in ["a", "b", "c", "d"] {
            handles.push(engine.load(Arc::new(Named(name))).unwrap());
            assert_terminal_last(&engine);
        }
        handles.swap_remove(1).dispose();
        assert_terminal_last(&engine);
        engine.load(Arc::new(Named("e"))).unwrap();
        assert_terminal_last(&engine);
        for handle in handles {
            handle.dispose();
            assert_terminal_last(&engine);
        }
        assert_eq!(engine.namespaces(), ["source-layer", "e", "final-handler"]);
    }

    #[tokio::test]
    async fn dispatch_runs_layers_in_order() {
        let engine = engine();
        engine.load(Arc::new(Named("a"))).unwrap();
        engine.load(Arc::new(Named("b"))).unwrap();

        let response = engine
            .dispatch(
                json!({"body": [], "settings": {"simulators": {"b": {}, "a": {}}}}),
                RequestMeta::default(),
            )
            .await;

        let reply = reply(response);
        assert_eq!(reply.status, 200);
        let body: Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body, json!(["a", "b"]));
    }

    #[tokio::test]
    async fn terminated_layer_short_circuits() {
        let engine = engine();
        engine.load(Arc::new(Stop)).unwrap();
        engine.load(Arc::new(Named("after"))).unwrap();

        let response = engine
            .dispatch(
                json!({"body": [], "settings": {"simulators": {"stop": {}, "after": {}}}}),
                RequestMeta::default(),
            )
            .await;

        assert_eq!(reply(response).status, 204);
    }

    #[tokio::test]
    async fn missing_body_and_settings_is_rejected() {
        let response = engine().dispatch(json!({}), RequestMeta::default()).await;
        assert_eq!(reply(response).status, 400);
    }

    #[tokio::test]
    async fn invalid_slice_is_rejected_before_any_layer_runs() {
        let engine = engine();
        engine.load(Arc::new(Stop)).unwrap();

        let response = engine
            .dispatch(
                json!({"body": 1, "settings": {"simulators": {"stop": "nope"}}}),
                RequestMeta::default(),
            )
            .await;

        let reply = reply(response);
        assert_eq!(reply.status, 400);
        let body: Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body["error"], "stop expects an object");
    }

    #[tokio::test]
    async fn body_only_request_is_echoed() {
        let response = engine()
            .dispatch(json!({"body": {"hello": "world"}}), RequestMeta::default())
            .await;
        let body: Value = serde_json::from_slice(&reply(response).body).unwrap();
        assert_eq!(body, json!({"hello": "world"}));
    }
}
