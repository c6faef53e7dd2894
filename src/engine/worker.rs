use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::EngineError;
use super::router::Engine;
use crate::protocol::TaskMessage;

/// Work item on the engine queue
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Already-decoded task message
    Task(TaskMessage),
    /// Raw JSON line, decoded on the worker so replies keep queue order
    Line(String),
}

impl From<TaskMessage> for Request {
    fn from(message: TaskMessage) -> Self {
        Request::Task(message)
    }
}

/// The engine running on its own blocking thread.
///
/// Architecture:
/// 1. Callers push [`Request`]s through an [`EngineHandle`]
/// 2. The bounded channel provides backpressure once `capacity` requests wait
/// 3. The worker thread takes them strictly in arrival order and runs each
///    to completion before looking at the next
/// 4. Replies go to the engine's sink, never back through the handle
///
/// When every handle is dropped the worker drains what is queued and exits.
pub struct EngineWorker {
    join: JoinHandle<u64>,
}

impl EngineWorker {
    /// Start the worker. Must be called inside a tokio runtime.
    pub fn spawn(engine: Engine, capacity: usize) -> (EngineHandle, Self) {
        let (sender, mut receiver) = mpsc::channel::<Request>(capacity.max(1));
        info!(capacity, "Starting engine worker");

        let join = tokio::task::spawn_blocking(move || {
            let mut processed = 0u64;
            while let Some(request) = receiver.blocking_recv() {
                match request {
                    Request::Task(message) => {
                        engine.dispatch(message);
                    }
                    Request::Line(line) => {
                        engine.dispatch_line(&line);
                    }
                }
                processed += 1;
            }
            debug!(processed, "Engine queue closed");
            processed
        });

        (EngineHandle { sender }, Self { join })
    }

    /// Wait for the worker to drain its queue and stop.
    ///
    /// Returns the number of requests it processed.
    pub async fn join(self) -> Result<u64, EngineError> {
        let processed = self.join.await.map_err(|e| {
            warn!(error = %e, "Engine worker terminated abnormally");
            EngineError::WorkerTerminated(e.to_string())
        })?;
        info!(processed, "Engine worker stopped");
        Ok(processed)
    }
}

/// Cloneable submission side of the engine queue
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<Request>,
}

impl EngineHandle {
    /// Queue a request, waiting while the queue is full
    pub async fn submit(&self, request: impl Into<Request>) -> Result<(), EngineError> {
        self.sender
            .send(request.into())
            .await
            .map_err(|_| EngineError::QueueClosed)
    }

    /// Queue a raw JSON line
    pub async fn submit_line(&self, line: impl Into<String>) -> Result<(), EngineError> {
        self.submit(Request::Line(line.into())).await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
