// Request/response relay between the embedded front-end and the parsing
// service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use slash_common::protocol::events::ParseResultPayload;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info};

use crate::error::ServiceError;
use crate::pipeline::ParserService;

/// Outbound channel: one push per successfully parsed request.
pub type DeliverySender = mpsc::UnboundedSender<ParseResultPayload>;
pub type DeliveryReceiver = mpsc::UnboundedReceiver<ParseResultPayload>;

/// One-shot relay: accepts a text string, forwards it to the parsing
/// service, and pushes the flattened parse trees to the outbound channel
/// when the service completes. No queueing, batching, or retry; requests
/// in flight at the same time complete in whatever order the service
/// finishes them, correlated by request id.
pub struct ParseBridge<S> {
    service: Arc<S>,
    outbound: DeliverySender,
    next_request_id: AtomicU64,
}

impl<S: ParserService> ParseBridge<S> {
    pub fn new(service: S, outbound: DeliverySender) -> Self {
        Self { service: Arc::new(service), outbound, next_request_id: AtomicU64::new(1) }
    }

    /// Forward one string to the service. No validation: empty or
    /// malformed input goes to the service as-is. Returns the assigned
    /// request id immediately; the delivery (if any) happens when the
    /// service completes. A failed request is logged and delivers
    /// nothing, and later requests are unaffected.
    pub fn submit(&self, text: String) -> u64 {
        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let service = Arc::clone(&self.service);
        let outbound = self.outbound.clone();

        tokio::spawn(async move {
            match service.annotate(&text).await {
                Ok(document) => {
                    let trees = document.parse_trees();
                    let _ = outbound.send(ParseResultPayload { request_id, trees });
                }
                Err(error) => error!(request_id, %error, "dropping failed parse request"),
            }
        });

        request_id
    }
}

// ── Lifecycle gate ─────────────────────────────────────────────────

/// Externally visible bridge lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserStatus {
    Loading,
    Ready,
    Failed,
}

enum BridgePhase<S> {
    Loading,
    Ready(ParseBridge<S>),
    Failed,
}

/// Gate in front of the bridge. Requests are rejected until the pipeline
/// has loaded; after a failed load they are rejected for good — the
/// bridge itself is never constructed in that case.
pub struct ParserState<S> {
    phase: RwLock<BridgePhase<S>>,
}

impl<S: ParserService> ParserState<S> {
    pub fn new() -> Self {
        Self { phase: RwLock::new(BridgePhase::Loading) }
    }

    pub async fn mark_ready(&self, bridge: ParseBridge<S>) {
        *self.phase.write().await = BridgePhase::Ready(bridge);
        info!("parse bridge ready");
    }

    pub async fn mark_failed(&self) {
        *self.phase.write().await = BridgePhase::Failed;
    }

    pub async fn status(&self) -> ParserStatus {
        match &*self.phase.read().await {
            BridgePhase::Loading => ParserStatus::Loading,
            BridgePhase::Ready(_) => ParserStatus::Ready,
            BridgePhase::Failed => ParserStatus::Failed,
        }
    }

    /// Submit a parse request if the bridge is ready.
    pub async fn submit(&self, text: String) -> Result<u64, ServiceError> {
        match &*self.phase.read().await {
            BridgePhase::Ready(bridge) => Ok(bridge.submit(text)),
            BridgePhase::Loading => Err(ServiceError::initialization("pipeline is still loading")),
            BridgePhase::Failed => Err(ServiceError::initialization("pipeline failed to load")),
        }
    }
}

impl<S: ParserService> Default for ParserState<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::time::Duration;

    use slash_common::document::{
        AnnotatedDocument, DocumentBody, OneOrMany, Sentence, SentenceList,
    };
    use tokio::sync::Mutex;
    use tokio::time::timeout;

    /// Pops one scripted result per annotate call.
    struct ScriptedService {
        responses: Mutex<VecDeque<Result<AnnotatedDocument, ServiceError>>>,
    }

    impl ScriptedService {
        fn new(responses: Vec<Result<AnnotatedDocument, ServiceError>>) -> Self {
            Self { responses: Mutex::new(responses.into()) }
        }
    }

    impl ParserService for ScriptedService {
        fn annotate(
            &self,
            _text: &str,
        ) -> impl Future<Output = Result<AnnotatedDocument, ServiceError>> + Send {
            async move {
                self.responses
                    .lock()
                    .await
                    .pop_front()
                    .expect("annotate called more times than scripted")
            }
        }
    }

    fn sentence(tree: &str) -> Sentence {
        Sentence { id: None, parsed_tree: Some(tree.to_string()) }
    }

    fn single_sentence_doc(tree: &str) -> AnnotatedDocument {
        AnnotatedDocument {
            document: DocumentBody {
                sentences: SentenceList { sentence: OneOrMany::One(sentence(tree)) },
            },
        }
    }

    fn multi_sentence_doc(trees: &[&str]) -> AnnotatedDocument {
        AnnotatedDocument {
            document: DocumentBody {
                sentences: SentenceList {
                    sentence: OneOrMany::Many(trees.iter().map(|t| sentence(t)).collect()),
                },
            },
        }
    }

    async fn recv(rx: &mut DeliveryReceiver) -> ParseResultPayload {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("delivery should arrive in time")
            .expect("delivery channel should stay open")
    }

    #[tokio::test]
    async fn single_sentence_yields_one_element_sequence() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bridge =
            ParseBridge::new(ScriptedService::new(vec![Ok(single_sentence_doc("(ROOT (S a))"))]), tx);

        let id = bridge.submit("This is a test".into());
        let delivery = recv(&mut rx).await;
        assert_eq!(delivery.request_id, id);
        assert_eq!(delivery.trees, vec!["(ROOT (S a))".to_string()]);
    }

    #[tokio::test]
    async fn multi_sentence_yields_full_sequence_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bridge = ParseBridge::new(
            ScriptedService::new(vec![Ok(multi_sentence_doc(&["(S one)", "(S two)", "(S three)"]))]),
            tx,
        );

        bridge.submit("One. Two. Three.".into());
        let delivery = recv(&mut rx).await;
        assert_eq!(
            delivery.trees,
            vec!["(S one)".to_string(), "(S two)".to_string(), "(S three)".to_string()]
        );
    }

    #[tokio::test]
    async fn parse_failure_delivers_nothing_and_bridge_stays_usable() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bridge = ParseBridge::new(
            ScriptedService::new(vec![
                Err(ServiceError::parse("worker rejected input")),
                Ok(single_sentence_doc("(S recovered)")),
            ]),
            tx,
        );

        bridge.submit("this is a test".into());
        // Give the failing task time to run (and deliver nothing).
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err(), "failed request must not deliver");

        let id = bridge.submit("this is a test".into());
        let delivery = recv(&mut rx).await;
        assert_eq!(delivery.request_id, id);
        assert_eq!(delivery.trees, vec!["(S recovered)".to_string()]);
    }

    #[tokio::test]
    async fn same_input_twice_produces_two_independent_deliveries() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let bridge = ParseBridge::new(
            ScriptedService::new(vec![
                Ok(single_sentence_doc("(S first)")),
                Ok(single_sentence_doc("(S second)")),
            ]),
            tx,
        );

        let first_id = bridge.submit("same text".into());
        let first = recv(&mut rx).await;
        assert_eq!(first.request_id, first_id);

        let second_id = bridge.submit("same text".into());
        let second = recv(&mut rx).await;
        assert_eq!(second.request_id, second_id);

        assert_ne!(first_id, second_id);
        assert_eq!(first.trees, vec!["(S first)".to_string()]);
        assert_eq!(second.trees, vec!["(S second)".to_string()]);
    }

    #[tokio::test]
    async fn state_rejects_submits_while_loading() {
        let state: ParserState<ScriptedService> = ParserState::new();
        assert_eq!(state.status().await, ParserStatus::Loading);

        let error = state.submit("early".into()).await.expect_err("loading state must reject");
        assert!(error.is_initialization());
    }

    #[tokio::test]
    async fn state_stays_inert_after_failed_initialization() {
        let state: ParserState<ScriptedService> = ParserState::new();
        state.mark_failed().await;
        assert_eq!(state.status().await, ParserStatus::Failed);

        let error = state.submit("never".into()).await.expect_err("failed state must reject");
        assert!(error.is_initialization());
        let error = state.submit("never again".into()).await.expect_err("still rejected");
        assert!(error.is_initialization());
    }

    #[tokio::test]
    async fn state_forwards_submits_once_ready() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let state = ParserState::new();
        state
            .mark_ready(ParseBridge::new(
                ScriptedService::new(vec![Ok(single_sentence_doc("(S ready)"))]),
                tx,
            ))
            .await;
        assert_eq!(state.status().await, ParserStatus::Ready);

        let id = state.submit("now".into()).await.expect("ready state must accept");
        let delivery = recv(&mut rx).await;
        assert_eq!(delivery.request_id, id);
    }

    #[test]
    fn parser_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&ParserStatus::Loading).unwrap(), "\"loading\"");
        assert_eq!(serde_json::to_string(&ParserStatus::Ready).unwrap(), "\"ready\"");
        assert_eq!(serde_json::to_string(&ParserStatus::Failed).unwrap(), "\"failed\"");
    }
}
