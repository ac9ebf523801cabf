// ABOUTME: In-memory LLM provider that replays scripted replies and records requests
// ABOUTME: Lets tests assert on temperatures, models, and instructions without a network

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use objective_prompter::errors::AppError;
use objective_prompter::llm::{
    ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole,
};

/// Provider whose replies are queued up front
pub struct ScriptedProvider {
    default_model: String,
    healthy: bool,
    replies: Mutex<VecDeque<Result<String, AppError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// Empty script with the `gpt-4o` default model
    pub fn new() -> Self {
        Self::with_default_model("gpt-4o")
    }

    /// Empty script with a custom default model
    pub fn with_default_model(model: &str) -> Self {
        Self {
            default_model: model.to_owned(),
            healthy: true,
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Report the provider as unreachable from `health_check`
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Queue a raw content reply
    pub fn reply(self, content: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(content.to_owned()));
        self
    }

    /// Queue a JSON reply
    pub fn reply_json(self, value: &serde_json::Value) -> Self {
        let content = value.to_string();
        self.reply(&content)
    }

    /// Queue a provider failure
    pub fn fail(self, error: AppError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Every request seen so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The last request's message with the given role
    pub fn last_message(&self, role: MessageRole) -> String {
        let requests = self.requests.lock().unwrap();
        let request = requests.last().expect("no request recorded");
        request
            .messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.clone())
            .expect("no message with that role")
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted (Test)"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::json_chat()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        let next = self.replies.lock().unwrap().pop_front();
        let content = next.unwrap_or_else(|| Err(AppError::generation("script exhausted")))?;

        Ok(ChatResponse {
            content,
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.default_model.clone()),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        if self.healthy {
            Ok(true)
        } else {
            Err(AppError::generation("scripted provider is offline"))
        }
    }
}
