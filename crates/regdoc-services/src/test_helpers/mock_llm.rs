//! Mock language model for testing

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::llm::{LanguageModel, QueryError};

/// One `generate` call as seen by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Returns scripted results first, then the default result, and captures
/// every prompt it receives.
pub struct MockLanguageModel {
    scripted: Mutex<VecDeque<Result<String, QueryError>>>,
    default_result: Result<String, QueryError>,
    prompts: Mutex<Vec<CapturedPrompt>>,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::with_reply("Mock reply")
    }

    pub fn with_reply(reply: &str) -> Self {
        Self::with_default(Ok(reply.to_string()))
    }

    /// A model whose every call fails with `error`
    pub fn failing(error: QueryError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default_result: Result<String, QueryError>) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default_result,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: &str) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_failure(&self, error: QueryError) {
        self.scripted.lock().unwrap().push_back(Err(error));
    }

    pub fn prompts(&self) -> Vec<CapturedPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, QueryError> {
        self.prompts.lock().unwrap().push(CapturedPrompt {
            system: system.to_string(),
            user: user.to_string(),
            max_tokens,
        });

        let scripted = self.scripted.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.default_result.clone())
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}
