//! Task engine
//!
//! [`Engine`] is the router: it parses the task type, runs the matching
//! handler and turns the outcome into progress and result messages on its
//! [`MessageSink`](crate::messaging::MessageSink). [`EngineWorker`] moves an
//! engine onto its own thread behind a bounded FIFO queue, so callers
//! only ever exchange owned messages with it.
//!
//! ```no_run
//! use std::sync::Arc;
//! use catalog_worker::engine::{Engine, EngineWorker};
//! use catalog_worker::handlers::HandlerRegistry;
//! use catalog_worker::messaging::ChannelSink;
//! use catalog_worker::protocol::{TaskMessage, TaskType};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let (sink, mut replies) = ChannelSink::channel();
//! let engine = Engine::new(HandlerRegistry::default(), Arc::new(sink));
//! let (handle, worker) = EngineWorker::spawn(engine, 64);
//!
//! handle
//!     .submit(TaskMessage::new(TaskType::SortItems, "req-1", serde_json::json!({"items": []})))
//!     .await?;
//! let reply = replies.recv().await;
//!
//! drop(handle);
//! worker.join().await?;
//! # Ok(())
//! # }
//! ```

mod router;
mod worker;

pub use router::Engine;
pub use worker::{EngineHandle, EngineWorker, Request};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine queue is closed")]
    QueueClosed,

    #[error("Engine worker terminated: {0}")]
    WorkerTerminated(String),
}
