/*!
 * Provider implementations for chat-completion services.
 *
 * This module contains client implementations for the completion backends:
 * - OpenAI: OpenAI-compatible chat completions API
 * - Mock: Scripted provider used by the test suite
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation client.
#[async_trait]
pub trait Provider: Send + Sync + Debug + 'static {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Build a request from a system instruction and a user instruction
    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> Self::Request;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> Result<String, ProviderError>;
}

pub mod mock;
pub mod openai;
