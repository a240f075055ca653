//! Interactive chat session over the query responder.

use regdoc_core::models::{ChatMessage, ChatTranscript, UserContext, UserRole};

use crate::responder::QueryResponder;

const INITIALIZING_NOTE: &str =
    "Note: AI services are currently initializing. Some features may be limited.";

/// Greeting that opens every session.
pub fn welcome_message(user: &UserContext) -> String {
    let access_level = match user.role {
        UserRole::SuperAdmin => "Super Administrator (All Regions)".to_string(),
        UserRole::RegionalAdmin => format!("Regional Administrator ({})", user.region),
    };

    let mut topics = vec![
        "• Document analysis and summaries",
        "• Budget allocations and financial data",
        "• Treasury procedures and guidelines",
        "• Regional financial reports",
    ];
    if user.role.is_super_admin() {
        topics.push("• Cross-regional comparisons and insights");
    }

    format!(
        "Welcome to the Bureau of Treasury AI Assistant, {identity}!

I'm here to help you with treasury documents and procedures.

Your Access Level: {access_level}

You can ask me questions about:
{topics}

How can I assist you today?",
        identity = user.identity,
        access_level = access_level,
        topics = topics.join("\n"),
    )
}

/// Suggested prompts; the last one depends on the role.
pub fn quick_questions(user: &UserContext) -> [String; 4] {
    let last = match user.role {
        UserRole::SuperAdmin => "Compare allocations across regions".to_string(),
        UserRole::RegionalAdmin => format!("What is {}'s budget status?", user.region),
    };
    [
        "What is the total budget allocation in this document?".to_string(),
        "Summarize the key financial highlights".to_string(),
        "What are the main expense categories?".to_string(),
        last,
    ]
}

/// One user's conversation. The transcript is append-only until `restart`.
pub struct ChatSession {
    user: UserContext,
    responder: QueryResponder,
    transcript: ChatTranscript,
    document_text: String,
}

impl ChatSession {
    pub fn new(user: UserContext, responder: QueryResponder) -> Self {
        let mut transcript = ChatTranscript::new();
        transcript.push(ChatMessage::assistant(welcome_message(&user)));
        Self {
            user,
            responder,
            transcript,
            document_text: String::new(),
        }
    }

    /// Run the connectivity self-test; a failure adds a warning to the
    /// transcript. Returns whether the model answered.
    pub async fn start(&mut self) -> bool {
        let connected = self.responder.test_connection().await;
        if !connected {
            tracing::warn!(identity = %self.user.identity, "Language model self-test failed");
            self.transcript.push(ChatMessage::warning(INITIALIZING_NOTE));
        }
        connected
    }

    /// Ground later questions on `text`; an empty string clears the context.
    pub fn set_document_context(&mut self, text: impl Into<String>) {
        self.document_text = text.into();
    }

    pub fn document_context(&self) -> &str {
        &self.document_text
    }

    /// Append the question and the reply. Blank input is ignored.
    pub async fn send(&mut self, question: &str) -> Option<&ChatMessage> {
        if question.trim().is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(question));

        let reply = self
            .responder
            .ask(
                question,
                &self.document_text,
                &self.user.region,
                self.user.role,
            )
            .await;

        let message = match reply {
            Ok(text) => ChatMessage::assistant(text),
            Err(e) => ChatMessage::error(e.fallback_text()),
        };
        self.transcript.push(message);
        self.transcript.last()
    }

    /// Start over with only the welcome message. The document context is kept.
    pub fn restart(&mut self) {
        self.transcript.clear();
        self.transcript
            .push(ChatMessage::assistant(welcome_message(&self.user)));
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::QueryError;
    use crate::test_helpers::MockLanguageModel;
    use regdoc_core::models::{MessageOrigin, MessageStatus};
    use std::sync::Arc;

    fn session(model: &Arc<MockLanguageModel>, user: UserContext) -> ChatSession {
        ChatSession::new(user, QueryResponder::new(model.clone(), 1000))
    }

    fn regional() -> UserContext {
        UserContext::new("REGION-5", UserRole::RegionalAdmin, Some("ra@btr.gov.ph".to_string()))
    }

    #[test]
    fn welcome_names_identity_and_access_level() {
        let text = welcome_message(&regional());
        assert!(text.starts_with("Welcome to the Bureau of Treasury AI Assistant, ra@btr.gov.ph!"));
        assert!(text.contains("Your Access Level: Regional Administrator (REGION-5)"));
        assert!(!text.contains("Cross-regional"));

        let admin = UserContext::new("ALL", UserRole::SuperAdmin, None);
        let text = welcome_message(&admin);
        assert!(text.contains("Super Administrator (All Regions)"));
        assert!(text.contains("• Cross-regional comparisons and insights"));
    }

    #[test]
    fn last_quick_question_depends_on_role() {
        assert_eq!(quick_questions(&regional())[3], "What is REGION-5's budget status?");
        let admin = UserContext::new("ALL", UserRole::SuperAdmin, None);
        assert_eq!(quick_questions(&admin)[3], "Compare allocations across regions");
    }

    #[tokio::test]
    async fn start_appends_warning_when_model_is_down() {
        let model = Arc::new(MockLanguageModel::failing(QueryError::EmptyResponse));
        let mut chat = session(&model, regional());

        assert!(!chat.start().await);
        let messages = chat.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].status, MessageStatus::Warning);
    }

    #[tokio::test]
    async fn start_is_quiet_when_model_answers() {
        let model = Arc::new(MockLanguageModel::with_reply("Ready."));
        let mut chat = session(&model, regional());
        assert!(chat.start().await);
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test]
    async fn send_appends_question_then_answer() {
        let model = Arc::new(MockLanguageModel::with_reply("PHP 5M"));
        let mut chat = session(&model, regional());
        chat.set_document_context("Budget: PHP 5M");

        let reply = chat.send("Total?").await.cloned().unwrap();
        assert_eq!(reply.text, "PHP 5M");
        assert_eq!(reply.origin, MessageOrigin::Assistant);

        let messages = chat.transcript().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].origin, MessageOrigin::User);
        assert_eq!(messages[1].text, "Total?");
        assert!(model.prompts()[0].user.starts_with("Document Content: Budget: PHP 5M"));
        assert!(model.prompts()[0].system.contains("- Region: REGION-5"));
    }

    #[tokio::test]
    async fn failed_answer_is_error_message_with_fallback() {
        let model = Arc::new(MockLanguageModel::failing(QueryError::Transport(
            "timed out".to_string(),
        )));
        let mut chat = session(&model, regional());

        let reply = chat.send("Total?").await.cloned().unwrap();
        assert_eq!(reply.status, MessageStatus::Error);
        assert!(reply.text.contains("timed out"));
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let model = Arc::new(MockLanguageModel::new());
        let mut chat = session(&model, regional());
        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn restart_keeps_only_welcome() {
        let model = Arc::new(MockLanguageModel::new());
        let mut chat = session(&model, regional());
        chat.set_document_context("x");
        chat.send("one").await;
        chat.restart();
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.document_context(), "x");
    }

    #[tokio::test]
    async fn restart_stays_grounded_on_selected_document() {
        let model = Arc::new(MockLanguageModel::new());
        let mut chat = session(&model, regional());
        chat.set_document_context("Q1 allocation: 1,000,000");
        chat.send("one").await;
        chat.restart();
        chat.send("What is the allocation?").await;

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1]
            .user
            .starts_with("Document Content: Q1 allocation: 1,000,000"));
    }
}
