//! Scripted [`ResourceClient`] for unit tests.

use crate::client::ResourceClient;
use crate::error::{MoveError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded call against the scripted client.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Post(String, Value),
}

/// Replays a fixed queue of responses and records every call, so tests can
/// assert both the outcome and the exact request sequence.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_err(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(MoveError::Transport(message.to_string())));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Get(path) => Some(path),
                Call::Post(..) => None,
            })
            .collect()
    }

    pub fn post_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Post(..)))
            .count()
    }

    fn next(&self) -> Result<Value> {
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(MoveError::Transport(
                "scripted client ran out of responses".to_string(),
            ))
        })
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.calls.lock().unwrap().push(Call::Get(path.to_string()));
        self.next()
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Post(path.to_string(), body));
        self.next()
    }
}
