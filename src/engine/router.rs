use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::handlers::{HandlerError, HandlerRegistry};
use crate::messaging::MessageSink;
use crate::observability::Metrics;
use crate::protocol::{
    OutboundMessage, ProgressMessage, RequestId, ResultMessage, TaskMessage, TaskType,
};

/// Routes task messages to handlers and reports every outcome to the sink.
///
/// Holds no per-request state: each call to [`Engine::dispatch`] decodes,
/// runs and answers one request, then forgets it.
pub struct Engine {
    registry: HandlerRegistry,
    sink: Arc<dyn MessageSink>,
    metrics: Arc<Metrics>,
}

impl Engine {
    pub fn new(registry: HandlerRegistry, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            registry,
            sink,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn from_config(config: &Config, sink: Arc<dyn MessageSink>) -> Self {
        Self::new(HandlerRegistry::new(config), sink)
    }

    /// Share an existing metrics handle instead of a private one
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Run one request to completion.
    ///
    /// Progress messages go to the sink as the handler reports them,
    /// followed by exactly one result message, which is also returned.
    /// Handler errors and panics both end up as `success: false`.
    pub fn dispatch(&self, message: TaskMessage) -> ResultMessage {
        let TaskMessage {
            task_type,
            id,
            data,
        } = message;
        debug!(request_id = %id, task_type = %task_type, "Dispatching task");

        let reply = match self.run(&task_type, &id, data) {
            Ok(output) => {
                self.metrics.task_succeeded();
                info!(request_id = %id, task_type = %task_type, "Task completed");
                ResultMessage::success(id, output)
            }
            Err(e) => {
                self.metrics.task_failed();
                warn!(request_id = %id, task_type = %task_type, error = %e, "Task failed");
                ResultMessage::failure(id, e.to_string())
            }
        };

        self.emit(reply.clone().into());
        reply
    }

    /// Dispatch one raw JSON line.
    ///
    /// A line whose envelope does not decode is answered with an error
    /// result when its `id` can still be read, and skipped otherwise.
    pub fn dispatch_line(&self, line: &str) -> Option<ResultMessage> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Skipping line that is not JSON");
                return None;
            }
        };

        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

        match serde_json::from_value::<TaskMessage>(value) {
            Ok(message) => Some(self.dispatch(message)),
            Err(e) => match id {
                Some(id) => {
                    self.metrics.task_failed();
                    warn!(request_id = %id, error = %e, "Rejected malformed task message");
                    let reply = ResultMessage::failure(id, format!("Invalid task message: {e}"));
                    self.emit(reply.clone().into());
                    Some(reply)
                }
                None => {
                    warn!(error = %e, "Skipping task message without a usable id");
                    None
                }
            },
        }
    }

    fn run(&self, task_type: &str, id: &RequestId, data: Value) -> Result<Value, HandlerError> {
        let task_type: TaskType = task_type.parse()?;
        let handler = self.registry.get(task_type);

        let mut progress = |percent: u8| {
            self.metrics.progress_emitted();
            self.emit(
                ProgressMessage {
                    id: id.clone(),
                    progress: percent,
                }
                .into(),
            );
        };

        panic::catch_unwind(AssertUnwindSafe(|| handler.handle(data, &mut progress)))
            .unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload.as_ref()))))
    }

    fn emit(&self, message: OutboundMessage) {
        if let Err(e) = self.sink.send(message) {
            warn!(error = %e, "Failed to deliver outbound message");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{ProgressReporter, TaskHandler};
    use crate::messaging::MemorySink;
    use serde_json::json;

    fn engine() -> (Engine, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let engine = Engine::new(HandlerRegistry::default(), sink.clone());
        (engine, sink)
    }

    #[test]
    fn test_unknown_task_type() {
        let (engine, sink) = engine();
        let reply = engine.dispatch(TaskMessage {
            task_type: "UNKNOWN".into(),
            id: "x".into(),
            data: json!({}),
        });

        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"id": "x", "success": false, "error": "Unknown task type: UNKNOWN"})
        );
        assert_eq!(sink.take(), vec![OutboundMessage::Result(reply)]);
    }

    #[test]
    fn test_success_emits_single_terminal_message() {
        let (engine, sink) = engine();
        let reply = engine.dispatch(TaskMessage::new(
            TaskType::CalculateStatistics,
            RequestId::Number(7),
            json!({"items": []}),
        ));

        assert!(reply.success);
        assert_eq!(reply.data.as_ref().unwrap()["totalItems"], 0);
        let messages = sink.take();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_terminal());
        assert_eq!(engine.metrics().snapshot().tasks_succeeded, 1);
    }

    #[test]
    fn test_handler_error_becomes_failure() {
        let (engine, _sink) = engine();
        let reply = engine.dispatch(TaskMessage::new(
            TaskType::ParseLargeJson,
            "p",
            json!({"jsonString": "{oops"}),
        ));

        assert!(!reply.success);
        assert!(reply.error.unwrap().starts_with("JSON parsing failed: "));
        assert_eq!(engine.metrics().snapshot().tasks_failed, 1);
    }

    #[test]
    fn test_missing_data_is_payload_error() {
        let (engine, _sink) = engine();
        let reply = engine
            .dispatch_line(r#"{"type": "FILTER_ITEMS", "id": "f"}"#)
            .unwrap();
        assert!(
            reply
                .error
                .unwrap()
                .starts_with("Invalid payload for FILTER_ITEMS: ")
        );
    }

    #[test]
    fn test_progress_precedes_result() {
        let (engine, sink) = engine();
        let items: Vec<Value> = (0..150).map(|i| json!({"id": i})).collect();
        engine.dispatch(TaskMessage::new(
            TaskType::ProcessSearchResults,
            "s",
            json!({"items": items}),
        ));

        let messages = sink.take();
        let (terminal, progress) = messages.split_last().unwrap();
        assert!(terminal.is_terminal());
        assert_eq!(progress.len(), 15);
        assert!(progress.iter().all(|m| !m.is_terminal() && m.id() == &RequestId::from("s")));
        assert_eq!(engine.metrics().snapshot().progress_emitted, 15);
    }

    #[test]
    fn test_malformed_lines() {
        let (engine, sink) = engine();

        assert!(engine.dispatch_line("not json").is_none());
        assert!(engine.dispatch_line(r#"{"type": "SORT_ITEMS"}"#).is_none());

        let reply = engine.dispatch_line(r#"{"id": 3, "data": {}}"#).unwrap();
        assert_eq!(reply.id, RequestId::Number(3));
        assert!(reply.error.unwrap().starts_with("Invalid task message: "));
        assert_eq!(sink.take().len(), 1);
    }

    #[test]
    fn test_fractional_and_oversized_ids_get_a_reply() {
        let (engine, sink) = engine();

        let reply = engine
            .dispatch_line(r#"{"type": "UNKNOWN", "id": 1.5, "data": {}}"#)
            .unwrap();
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"id": 1.5, "success": false, "error": "Unknown task type: UNKNOWN"})
        );

        let reply = engine
            .dispatch_line(r#"{"type": "SORT_ITEMS", "id": 18446744073709551615, "data": {"items": []}}"#)
            .unwrap();
        assert!(reply.success);
        assert_eq!(serde_json::to_value(&reply).unwrap()["id"], json!(u64::MAX));
        assert_eq!(sink.take().len(), 2);
    }

    #[derive(Debug)]
    struct ExplodingSort;

    impl TaskHandler for ExplodingSort {
        fn task_type(&self) -> TaskType {
            TaskType::SortItems
        }

        fn handle(
            &self,
            data: Value,
            _progress: &mut dyn ProgressReporter,
        ) -> Result<Value, HandlerError> {
            if data["explode"] == true {
                panic!("sort comparator blew up");
            }
            Ok(data)
        }
    }

    #[test]
    fn test_handler_panic_is_contained() {
        let sink = Arc::new(MemorySink::new());
        let registry = HandlerRegistry::default().with_handler(Arc::new(ExplodingSort));
        let engine = Engine::new(registry, sink.clone());

        let reply = engine.dispatch(TaskMessage::new(
            TaskType::SortItems,
            "boom",
            json!({"explode": true}),
        ));
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({
                "id": "boom",
                "success": false,
                "error": "Task handler panicked: sort comparator blew up"
            })
        );

        // the same engine keeps serving afterwards
        let next = engine.dispatch(TaskMessage::new(
            TaskType::SortItems,
            "after",
            json!({"explode": false}),
        ));
        assert!(next.success);
        assert_eq!(next.data, Some(json!({"explode": false})));

        let statistics = engine.dispatch(TaskMessage::new(
            TaskType::CalculateStatistics,
            "stats",
            json!({"items": []}),
        ));
        assert!(statistics.success);

        assert_eq!(sink.take().len(), 3);
        let snapshot = engine.metrics().snapshot();
        assert_eq!(snapshot.tasks_failed, 1);
        assert_eq!(snapshot.tasks_succeeded, 2);
    }

    #[test]
    fn test_panic_message_extraction() {
        let formatted: Box<dyn Any + Send> = Box::new(format!("boom {}", 1));
        assert_eq!(panic_message(formatted.as_ref()), "boom 1");

        let literal: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(literal.as_ref()), "static");

        let other: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
