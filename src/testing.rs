//! In-memory client handles for unit and integration testing.
//!
//! [`RecordingHandle`] stands in for a WebSocket: it stores every message sent
//! to it and can be closed to simulate a dropped client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::error::ServerError;
use crate::models::ServerMessage;
use crate::session::ClientHandle;

pub struct RecordingHandle {
    session_id: String,
    open: AtomicBool,
    fail_sends: bool,
    messages: Mutex<Vec<ServerMessage>>,
}

impl RecordingHandle {
    /// An open handle that records what it receives
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(false))
    }

    /// A handle that reports itself open but fails every send
    pub fn failing() -> Arc<Self> {
        Arc::new(Self::build(true))
    }

    fn build(fail_sends: bool) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            open: AtomicBool::new(true),
            fail_sends,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    /// Everything received so far
    pub fn messages(&self) -> Vec<ServerMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything received so far, clearing the buffer
    pub fn take(&self) -> Vec<ServerMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ClientHandle for RecordingHandle {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn send(&self, message: &ServerMessage) -> Result<(), ServerError> {
        if !self.is_open() || self.fail_sends {
            return Err(ServerError::Transport(self.session_id.clone()));
        }
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}
