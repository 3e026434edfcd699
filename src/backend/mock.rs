use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use tracing::debug;

use crate::backend::{BackendError, InferenceBackend};

/// Scripted backend that replays queued replies and records every prompt.
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    available: AtomicBool,
    panics: bool,
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    default_reply: String,
    prompts: Mutex<Vec<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            name: "mock-backend".to_owned(),
            available: AtomicBool::new(true),
            panics: false,
            replies: Mutex::new(VecDeque::new()),
            default_reply: "안녕하세요!".to_owned(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl MockBackend {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Backend whose availability probe always fails.
    pub fn offline() -> Self {
        let backend = Self::default();
        backend.available.store(false, Ordering::SeqCst);
        backend
    }

    /// Backend that reports itself available but panics inside `generate`.
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::default()
        }
    }

    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()));
        self
    }

    pub fn with_error(self, error: BackendError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn generate_calls(&self) -> usize {
        self.prompts().len()
    }

    fn push(&self, reply: Result<String, BackendError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_availability(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_owned());
        }
        if self.panics {
            panic!("mock backend {} panicked during generate", self.name);
        }
        if !self.check_availability().await {
            return Err(BackendError::Unreachable("mock backend offline".to_owned()));
        }

        let scripted = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        debug!(backend = %self.name, scripted = scripted.is_some(), "mock generate");
        scripted.unwrap_or_else(|| Ok(self.default_reply.clone()))
    }
}
