//! Outbound message sinks
//!
//! The engine never talks to a concrete channel. It is handed a
//! [`MessageSink`] and pushes every progress and result message into it,
//! so the same router runs inside a worker thread, a CLI pipe, or a unit
//! test.

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::protocol::OutboundMessage;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Receiver dropped, message not delivered")]
    Closed,

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SinkError>;

/// Destination for messages leaving the engine
pub trait MessageSink: Send + Sync {
    fn send(&self, message: OutboundMessage) -> Result<()>;
}

/// Forwards messages over an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<OutboundMessage>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<OutboundMessage>) -> Self {
        Self { sender }
    }

    /// Sink plus the receiving end the caller reads replies from
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl MessageSink for ChannelSink {
    fn send(&self, message: OutboundMessage) -> Result<()> {
        self.sender.send(message).map_err(|_| SinkError::Closed)
    }
}

/// Keeps every message in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<OutboundMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything collected so far
    pub fn take(&self) -> Vec<OutboundMessage> {
        let mut messages = self.messages.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *messages)
    }
}

impl MessageSink for MemorySink {
    fn send(&self, message: OutboundMessage) -> Result<()> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(())
    }
}

/// Writes each message as one JSON line
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> MessageSink for JsonLinesSink<W> {
    fn send(&self, message: OutboundMessage) -> Result<()> {
        let line = serde_json::to_string(&message)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}
