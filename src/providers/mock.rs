/*!
 * Mock provider implementation for testing.
 *
 * `MockProvider` simulates the behaviors the batch orchestrator has to cope with:
 * - `MockProvider::uppercase()` - Always succeeds, "translating" to upper case
 * - `MockProvider::failing()` - Every text comes back as a passthrough result
 * - `MockProvider::failing_batches(..)` - `batch_translate` errors on chosen calls
 * - `MockProvider::wrong_length()` - Returns one result too few per batch
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationResult};

const PROVIDER_NAME: &str = "mock";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Succeeds with the upper-cased text
    Uppercase,
    /// Every text fails and passes through
    Failing,
    /// `batch_translate` errors on the given 0-based call indices
    FailingBatches { fail_on: Vec<usize> },
    /// Drops the last result of every batch
    WrongLength,
}

/// Mock provider for testing translation behavior
///
/// Clones share the call counter and the recorded batch sizes.
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `batch_translate` calls so far
    batch_calls: Arc<AtomicUsize>,
    /// Input length of every `batch_translate` call
    batch_sizes: Arc<Mutex<Vec<usize>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            batch_calls: Arc::new(AtomicUsize::new(0)),
            batch_sizes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that upper-cases text
    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    /// Create a mock provider whose every translation fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock provider whose batch calls fail at the given indices
    pub fn failing_batches(fail_on: impl Into<Vec<usize>>) -> Self {
        Self::new(MockBehavior::FailingBatches { fail_on: fail_on.into() })
    }

    /// Create a mock provider that returns short batches
    pub fn wrong_length() -> Self {
        Self::new(MockBehavior::WrongLength)
    }

    /// Registry constructor; `extra.behavior` selects the mode
    /// (`uppercase`, `failing`, `wrong_length`, `fail_batches` with `extra.fail_on = "0,2"`)
    pub fn from_config(config: &ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> {
        let behavior = match config.extra("behavior").unwrap_or("uppercase") {
            "uppercase" => MockBehavior::Uppercase,
            "failing" => MockBehavior::Failing,
            "wrong_length" => MockBehavior::WrongLength,
            "fail_batches" => {
                let fail_on = config
                    .extra("fail_on")
                    .unwrap_or_default()
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| {
                        s.trim()
                            .parse::<usize>()
                            .map_err(|e| ProviderError::InvalidRequest(format!("bad fail_on '{}': {}", s, e)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                MockBehavior::FailingBatches { fail_on }
            }
            other => {
                return Err(ProviderError::InvalidRequest(format!("unknown mock behavior '{}'", other)));
            }
        };
        Ok(Box::new(Self::new(behavior)))
    }

    /// Number of `batch_translate` calls so far
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Input length of every `batch_translate` call, in call order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().map(|sizes| sizes.clone()).unwrap_or_default()
    }

    fn failure() -> ProviderError {
        ProviderError::ApiError {
            status_code: 503,
            message: "Simulated provider failure".to_string(),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate(&self, text: &str, target_language: &str, source_language: Option<&str>) -> TranslationResult {
        match self.behavior {
            MockBehavior::Failing => {
                TranslationResult::passthrough(text, target_language, PROVIDER_NAME, &Self::failure())
            }
            _ => TranslationResult::success(
                text,
                text.to_uppercase(),
                source_language.unwrap_or_default(),
                target_language,
                PROVIDER_NAME,
            ),
        }
    }

    async fn batch_translate(
        &self,
        texts: &[String],
        target_language: &str,
        source_language: Option<&str>,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut sizes) = self.batch_sizes.lock() {
            sizes.push(texts.len());
        }

        if let MockBehavior::FailingBatches { fail_on } = &self.behavior {
            if fail_on.contains(&call) {
                return Err(Self::failure());
            }
        }

        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, target_language, source_language).await);
        }

        if self.behavior == MockBehavior::WrongLength {
            results.pop();
        }

        Ok(results)
    }
}
