/*!
 * Provider implementations for LLM scoring services.
 *
 * This module contains client implementations for the supported providers:
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI-compatible chat completion APIs
 *
 * Providers are used behind a trait object, so the trait trades the typed
 * request/response pair for a plain prompt-in, text-out surface.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all scoring providers
#[async_trait]
pub trait ScoreProvider: Send + Sync + Debug {
    /// Send a prompt and return the model's raw text reply
    ///
    /// # Arguments
    /// * `prompt` - The scoring prompt to send
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The reply text or an error
    async fn send(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is usable
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Human-readable provider name for logs
    fn name(&self) -> &str;
}

pub mod mock;
pub mod ollama;
pub mod openai;
