/*!
 * Tests for provider implementations
 */

use std::time::Duration;

use paratrans::providers::Provider;
use paratrans::providers::mock::{MockBehavior, MockProvider};
use paratrans::providers::openai::OpenAI;
use paratrans::translation::prompts::{SYSTEM_PROMPT, TranslationPromptBuilder};

/// The OpenAI request body carries the model and both messages
#[test]
fn test_openai_request_withPrompts_shouldSerializeChatBody() {
    let provider = OpenAI::new("sk-test", "https://api.example.com/v1", "gpt-4o-mini", Duration::from_secs(5));
    let prompts = TranslationPromptBuilder::new("French");
    let request = provider.build_request(prompts.system_prompt(), &prompts.user_prompt("Hello"));

    let body = serde_json::to_value(&request).unwrap();

    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"].as_str().unwrap().ends_with("\nHello"));
    assert!(body.get("temperature").is_none());
}

/// A configured temperature is sent with every request
#[test]
fn test_openai_request_withTemperature_shouldIncludeIt() {
    let provider = OpenAI::new("sk-test", "https://api.example.com/v1", "gpt-4o-mini", Duration::from_secs(5))
        .with_temperature(Some(0.25));
    let request = provider.build_request("sys", "user");
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["temperature"], 0.25);
}

/// An unreachable endpoint surfaces as a provider error, never a panic
#[tokio::test]
async fn test_openai_complete_withUnreachableEndpoint_shouldReturnError() {
    let provider = OpenAI::new("sk-test", "http://127.0.0.1:9", "gpt-4o-mini", Duration::from_secs(2));
    let request = provider.build_request("sys", "user");
    assert!(provider.complete(request).await.is_err());
}

/// The mock extracts the source text from the user prompt
#[tokio::test]
async fn test_mock_provider_withPromptBuilder_shouldSeeSourceText() {
    let provider = MockProvider::new(MockBehavior::Working);
    let prompts = TranslationPromptBuilder::new("Italian").preserve_names(true);
    let request = provider.build_request(prompts.system_prompt(), &prompts.user_prompt("Line one\nLine two"));

    let response = provider.complete(request).await.unwrap();

    assert_eq!(MockProvider::extract_text(&response).unwrap(), "[TRANSLATED] Line one\nLine two");
    assert_eq!(provider.seen_texts(), vec!["Line one\nLine two".to_string()]);
}

/// Always-failing and empty mocks behave as advertised
#[tokio::test]
async fn test_mock_provider_failingAndEmpty_shouldBehaveAsConfigured() {
    let failing = MockProvider::failing();
    assert!(failing.complete(failing.build_request("s", "u\nx")).await.is_err());

    let empty = MockProvider::empty();
    let response = empty.complete(empty.build_request("s", "u\nx")).await.unwrap();
    assert_eq!(response.text, "");
}
