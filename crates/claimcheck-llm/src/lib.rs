//! claimcheck LLM Provider Layer
//!
//! Pluggable semantic-judgment providers behind the `LlmProvider` trait from
//! `claimcheck-domain`. Classification, sufficiency and verdict synthesis all
//! go through this interface.
//!
//! # Providers
//!
//! - `MockProvider`: Pattern-scripted mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use claimcheck_llm::MockProvider;
//! use claimcheck_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ollama;

use claimcheck_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use config::LlmConfig;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error,
}

#[derive(Debug, Clone)]
struct Rule {
    fragments: Vec<String>,
    reply: Reply,
}

impl Rule {
    fn matches(&self, prompt: &str) -> bool {
        self.fragments.iter().all(|f| prompt.contains(f.as_str()))
    }
}

/// Mock LLM provider for deterministic testing
///
/// Replies are scripted by prompt fragments: a rule fires when every one of
/// its fragments occurs in the prompt. When several rules match, the one with
/// the most fragments wins, ties going to the rule added first. Prompts that
/// match nothing get the default response.
///
/// Clones share rules, call counts and the prompt log.
///
/// # Examples
///
/// ```
/// use claimcheck_llm::MockProvider;
/// use claimcheck_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::new("fallback");
/// provider.add_response("TASK: CLASSIFY_CLAIM", r#"{"type":"FACTUAL"}"#);
/// provider.add_response_when(&["TASK: CLASSIFY_CLAIM", "pizza"], r#"{"type":"OPINION"}"#);
///
/// assert_eq!(
///     provider.generate("TASK: CLASSIFY_CLAIM\nCLAIM: pizza is great").unwrap(),
///     r#"{"type":"OPINION"}"#
/// );
/// assert_eq!(provider.generate("something else").unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<Rule>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test thread must not wedge every other user of the mock
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    /// Sleep this long before answering each call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reply with `response` whenever the prompt contains `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.push_rule(vec![fragment.into()], Reply::Text(response.into()));
    }

    /// Reply with `response` when the prompt contains every fragment
    pub fn add_response_when(&mut self, fragments: &[&str], response: impl Into<String>) {
        let fragments = fragments.iter().map(|f| f.to_string()).collect();
        self.push_rule(fragments, Reply::Text(response.into()));
    }

    /// Fail whenever the prompt contains `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.push_rule(vec![fragment.into()], Reply::Error);
    }

    /// Fail when the prompt contains every fragment
    pub fn add_error_when(&mut self, fragments: &[&str]) {
        let fragments = fragments.iter().map(|f| f.to_string()).collect();
        self.push_rule(fragments, Reply::Error);
    }

    fn push_rule(&mut self, fragments: Vec<String>, reply: Reply) {
        lock(&self.rules).push(Rule { fragments, reply });
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Number of calls whose prompt contained `fragment`
    pub fn calls_matching(&self, fragment: &str) -> usize {
        lock(&self.prompts)
            .iter()
            .filter(|p| p.contains(fragment))
            .count()
    }

    /// Every prompt received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Reset the call count and prompt log
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }

    fn reply_for(&self, prompt: &str) -> Reply {
        let rules = lock(&self.rules);
        let mut best: Option<&Rule> = None;
        for rule in rules.iter().filter(|r| r.matches(prompt)) {
            if best.map_or(true, |b| rule.fragments.len() > b.fragments.len()) {
                best = Some(rule);
            }
        }
        best.map(|r| r.reply.clone())
            .unwrap_or_else(|| Reply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        match self.reply_for(prompt) {
            Reply::Text(text) => Ok(text),
            Reply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_fragment_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("say hello").unwrap(), "world");
        assert_eq!(provider.generate("foo!").unwrap(), "bar");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let mut provider = MockProvider::default();
        provider.add_response_when(&["TASK", "earth"], "specific");
        provider.add_response("TASK", "general");

        assert_eq!(provider.generate("TASK about earth").unwrap(), "specific");
        assert_eq!(provider.generate("TASK about moon").unwrap(), "general");
    }

    #[test]
    fn test_first_rule_wins_ties() {
        let mut provider = MockProvider::default();
        provider.add_response("TASK", "first");
        provider.add_response("TASK", "second");
        assert_eq!(provider.generate("TASK").unwrap(), "first");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate("prompt2").unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.calls_matching("prompt2"), 1);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("a bad prompt");
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[test]
    fn test_error_when_requires_all_fragments() {
        let mut provider = MockProvider::new("ok");
        provider.add_error_when(&["a", "b"]);
        assert!(provider.generate("a only").is_ok());
        assert!(provider.generate("a and b").is_err());
    }

    #[test]
    fn test_mock_provider_structured() {
        let provider = MockProvider::new("structured response");
        let result = provider.generate_structured("prompt", "schema");
        assert_eq!(result.unwrap(), "structured response");
    }

    #[test]
    fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_latency_is_applied() {
        let provider = MockProvider::new("slow").with_latency(Duration::from_millis(20));
        let start = std::time::Instant::now();
        provider.generate("x").unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
