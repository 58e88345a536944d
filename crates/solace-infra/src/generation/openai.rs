//! OpenAI-compatible generation adapter.
//!
//! Maps the provider-neutral prompt from `solace-core` onto a chat
//! completion request and returns the first choice's text. Works against any
//! endpoint that speaks the OpenAI chat completions API via `base_url`.

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;
use secrecy::{ExposeSecret, SecretString};
use solace_core::generation::generator::Generator;
use solace_core::generation::prompt::{build_prompt, PromptMessage, PromptRole};
use solace_types::config::GenerationConfig;
use solace_types::error::GenerationError;
use solace_types::message::HistoryEntry;
use tracing::debug;

/// Chat-completion generator.
///
/// Does not derive Debug: the client holds the API key.
pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiGenerator {
    pub fn new(config: &GenerationConfig, api_key: &SecretString) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: Vec<PromptMessage>) -> CreateChatCompletionRequest {
        let messages = prompt.into_iter().map(to_openai_message).collect();

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            ..Default::default()
        }
    }
}

fn to_openai_message(message: PromptMessage) -> ChatCompletionRequestMessage {
    match message.role {
        PromptRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(message.content),
                name: None,
            })
        }
        PromptRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(message.content),
            name: None,
        }),
        PromptRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    message.content,
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

fn map_openai_error(err: OpenAIError) -> GenerationError {
    match &err {
        OpenAIError::ApiError(api_err) => GenerationError::Provider(api_err.message.clone()),
        _ => GenerationError::Provider(err.to_string()),
    }
}

impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        utterance: &str,
        history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        let request = self.build_request(build_prompt(utterance, history));

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(GenerationError::EmptyReply);
        }

        debug!(model = %response.model, chars = content.len(), "Completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_types::message::Sender;

    fn generator() -> OpenAiGenerator {
        OpenAiGenerator::new(
            &GenerationConfig::default(),
            &SecretString::from("sk-test".to_string()),
        )
    }

    #[test]
    fn test_new_uses_config_defaults() {
        let generator = generator();
        assert_eq!(generator.name(), "openai");
        assert_eq!(generator.model(), "gpt-4o");
        assert_eq!(generator.max_tokens, 500);
    }

    #[test]
    fn test_build_request_maps_roles_in_order() {
        let history = vec![
            HistoryEntry {
                sender: Sender::User,
                content: "I can't sleep".to_string(),
            },
            HistoryEntry {
                sender: Sender::Bot,
                content: "That sounds exhausting.".to_string(),
            },
        ];
        let request = generator().build_request(build_prompt("still awake", &history));

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_completion_tokens, Some(500));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 4);
        assert!(matches!(
            request.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(
            request.messages[1],
            ChatCompletionRequestMessage::User(_)
        ));
        assert!(matches!(
            request.messages[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        match &request.messages[3] {
            ChatCompletionRequestMessage::User(user) => assert!(matches!(
                &user.content,
                ChatCompletionRequestUserMessageContent::Text(t) if t == "still awake"
            )),
            other => panic!("expected user message, got {other:?}"),
        }
    }
}
