/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::scoring(score)` - Always replies with a bare score
 * - `MockProvider::failing()` - Always fails with an error
 * - Reply-shape variants covering fenced JSON, bare JSON, and garbage
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::ScoreProvider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Replies with a bare decimal score
    BareNumber { score: f64 },
    /// Replies with the score wrapped in a ```json fence
    FencedJson { score: f64 },
    /// Replies with a bare JSON object
    BareJson { score: f64 },
    /// Replies with prose the parser cannot use
    Malformed,
    /// Replies with an empty string
    Empty,
    /// Fails intermittently (every Nth request)
    Intermittent { score: f64, fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates a slow reply (for timeout testing)
    Slow { score: f64, delay_ms: u64 },
}

/// Mock provider for testing rescoring behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that always replies with a bare score
    pub fn scoring(score: f64) -> Self {
        Self::new(MockBehavior::BareNumber { score })
    }

    /// Create a mock that wraps the score in a ```json fence
    pub fn fenced_json(score: f64) -> Self {
        Self::new(MockBehavior::FencedJson { score })
    }

    /// Create a mock that replies with a bare JSON object
    pub fn bare_json(score: f64) -> Self {
        Self::new(MockBehavior::BareJson { score })
    }

    /// Create a mock that replies with unusable prose
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Create a mock that replies with an empty string
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(score: f64, fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { score, fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a slow mock provider for timeout testing
    pub fn slow(score: f64, delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { score, delay_ms })
    }

    /// Number of requests this mock has received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl ScoreProvider for MockProvider {
    async fn send(&self, _prompt: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::BareNumber { score } => Ok(format!("{}", score)),

            MockBehavior::FencedJson { score } => {
                Ok(format!("```json\n{{\"score\": {}}}\n```", score))
            }

            MockBehavior::BareJson { score } => Ok(format!("{{\"score\": {}}}", score)),

            MockBehavior::Malformed => {
                Ok("这个片段非常精彩，值得推荐给观众。".to_string())
            }

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Intermittent { score, fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(format!("{}", score))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Slow { score, delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(format!("{}", score))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
