//! Context-aware query responder.

use regdoc_core::models::UserRole;
use std::sync::Arc;

use crate::llm::{LanguageModel, QueryError};
use crate::prompt::{system_prompt, user_prompt};

/// Canned question used by the connectivity self-test.
pub const CONNECTION_TEST_QUESTION: &str =
    "Hello, please confirm you're ready to assist with Bureau of Treasury documents.";
const CONNECTION_TEST_REGION: &str = "TEST";

/// Answers questions about treasury documents, scoped to the caller's region
/// and role.
#[derive(Clone)]
pub struct QueryResponder {
    model: Arc<dyn LanguageModel>,
    max_tokens: u32,
}

impl QueryResponder {
    pub fn new(model: Arc<dyn LanguageModel>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }

    /// Ask one question. Stateless: the full context travels with every call.
    /// A successful reply is returned verbatim.
    pub async fn ask(
        &self,
        question: &str,
        document_text: &str,
        region: &str,
        role: UserRole,
    ) -> Result<String, QueryError> {
        let system = system_prompt(region, role);
        let user = user_prompt(question, document_text);
        let start = std::time::Instant::now();

        match self.model.generate(&system, &user, self.max_tokens).await {
            Ok(reply) => {
                tracing::info!(
                    region = %region,
                    role = %role,
                    model = %self.model.model_id(),
                    grounded = !document_text.is_empty(),
                    reply_chars = reply.chars().count(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Query answered"
                );
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    region = %region,
                    role = %role,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Query failed"
                );
                Err(e)
            }
        }
    }

    /// Always yields text: the reply, or the apology carrying the error.
    pub async fn answer_or_fallback(
        &self,
        question: &str,
        document_text: &str,
        region: &str,
        role: UserRole,
    ) -> String {
        match self.ask(question, document_text, region, role).await {
            Ok(reply) => reply,
            Err(e) => e.fallback_text(),
        }
    }

    /// Healthy iff the canned question comes back with non-empty text.
    pub async fn test_connection(&self) -> bool {
        match self
            .ask(
                CONNECTION_TEST_QUESTION,
                "",
                CONNECTION_TEST_REGION,
                UserRole::RegionalAdmin,
            )
            .await
        {
            Ok(reply) => !reply.is_empty(),
            Err(_) => false,
        }
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_configured()
    }
}
