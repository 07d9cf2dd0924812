// Testing utilities for crates built on the domain layer
// This module is only available when the "mock" feature is enabled

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::completion::{CompletionClient, CompletionError, CompletionRequest, CompletionStream};

#[derive(Debug, Clone)]
enum Script {
    Chunks(Vec<String>),
    /// Chunks followed by a mid-stream failure
    Interrupted(Vec<String>, String),
    /// Upstream refuses with an HTTP status
    Refused(u16, String),
}

/// Completion client that replays a fixed script and records each request
#[derive(Debug, Clone)]
pub struct ScriptedCompletionClient {
    script: Script,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedCompletionClient {
    /// Stream `chunks` and end normally
    pub fn with_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(Script::Chunks(chunks.into_iter().map(Into::into).collect()))
    }

    /// Stream `chunks`, then fail with `message`
    pub fn interrupted<I, S>(chunks: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(Script::Interrupted(
            chunks.into_iter().map(Into::into).collect(),
            message.into(),
        ))
    }

    /// Refuse to open the stream
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::from_script(Script::Refused(status, message.into()))
    }

    fn from_script(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// How many times a stream was requested
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.requests.lock() {
            Ok(mut requests) => requests.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }

        match &self.script {
            Script::Chunks(chunks) => Ok(stream::iter(chunks.clone().into_iter().map(Ok::<String, CompletionError>)).boxed()),
            Script::Interrupted(chunks, message) => {
                let items = chunks
                    .clone()
                    .into_iter()
                    .map(Ok::<String, CompletionError>)
                    .chain(std::iter::once(Err(CompletionError::Stream(message.clone()))));
                Ok(stream::iter(items).boxed())
            }
            Script::Refused(status, message) => Err(CompletionError::Status {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
