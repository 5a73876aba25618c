/*!
 * Tests for the provider registry
 */

use srt_translator::app_config::ProviderConfig;
use srt_translator::errors::{ProviderError, RegistryError};
use srt_translator::providers::mock::MockProvider;
use srt_translator::providers::{Provider, ProviderRegistry, BUILTIN_PROVIDERS};

#[derive(Debug)]
struct NamedProvider(&'static str);

#[async_trait::async_trait]
impl Provider for NamedProvider {
    fn name(&self) -> &str {
        self.0
    }

    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        _source_language: Option<&str>,
    ) -> srt_translator::TranslationResult {
        srt_translator::TranslationResult::success(text, text, "", target_language, self.0)
    }
}

#[test]
fn test_newRegistry_shouldBeEmpty() {
    let registry = ProviderRegistry::new();
    assert!(registry.available().is_empty());
    assert!(!registry.contains("google"));
}

#[test]
fn test_register_shouldListNamesInRegistrationOrder() {
    let mut registry = ProviderRegistry::new();
    registry.register("zeta", MockProvider::from_config);
    registry.register("alpha", MockProvider::from_config);

    assert_eq!(registry.available(), vec!["zeta".to_string(), "alpha".to_string()]);
    assert!(registry.contains("alpha"));
}

#[test]
fn test_register_withExistingName_shouldReplaceSilently() {
    let mut registry = ProviderRegistry::new();
    registry.register("dup", |_: &ProviderConfig| Ok(Box::new(NamedProvider("first")) as Box<dyn Provider>));
    registry.register("dup", |_: &ProviderConfig| Ok(Box::new(NamedProvider("second")) as Box<dyn Provider>));

    assert_eq!(registry.available(), vec!["dup".to_string()]);
    let provider = registry.create("dup", &ProviderConfig::new("dup")).unwrap();
    assert_eq!(provider.name(), "second");
}

#[test]
fn test_create_withUnknownName_shouldListAvailableProviders() {
    let registry = ProviderRegistry::with_builtin_providers();
    let error = registry.create("nonexistent", &ProviderConfig::new("nonexistent")).unwrap_err();

    match &error {
        RegistryError::ProviderNotFound { name, available } => {
            assert_eq!(name, "nonexistent");
            assert_eq!(available.len(), BUILTIN_PROVIDERS.len());
        }
        other => panic!("expected ProviderNotFound, got {:?}", other),
    }

    let message = error.to_string();
    assert!(message.contains("nonexistent"));
    for name in BUILTIN_PROVIDERS {
        assert!(message.contains(name), "{} missing from '{}'", name, message);
    }
}

#[test]
fn test_withBuiltinProviders_shouldRegisterInCanonicalOrder() {
    let registry = ProviderRegistry::with_builtin_providers();
    assert_eq!(
        registry.available(),
        vec!["google", "bing", "yandex", "openai", "gemini", "deepseek"]
    );
}

#[test]
fn test_create_withKeyInConfig_shouldBuildEveryBuiltin() {
    let registry = ProviderRegistry::with_builtin_providers();
    for name in BUILTIN_PROVIDERS {
        let config = ProviderConfig::new(name).with_api_key("test-key");
        let provider = registry.create(name, &config).unwrap();
        assert_eq!(provider.name(), name);
    }
}

#[test]
fn test_create_whenFactoryFails_shouldReturnConstructionError() {
    let mut registry = ProviderRegistry::new();
    registry.register("broken", |config: &ProviderConfig| {
        Err(ProviderError::MissingConfiguration {
            provider: config.provider_type.clone(),
            field: "api_key".to_string(),
        })
    });

    let error = registry.create("broken", &ProviderConfig::new("broken")).unwrap_err();
    assert!(matches!(error, RegistryError::Construction { .. }));
    assert!(error.to_string().contains("broken"));
}

#[test]
fn test_create_withMockFactory_shouldTranslateThroughCreatedProvider() {
    let mut registry = ProviderRegistry::new();
    registry.register("mock", MockProvider::from_config);
    let provider = registry.create("mock", &ProviderConfig::new("mock")).unwrap();

    let result = tokio_test::block_on(provider.translate("hello", "fr", None));
    assert_eq!(result.translated_text, "HELLO");
    assert_eq!(result.provider(), Some("mock"));
}

#[test]
fn test_ensureRegistered_shouldMatchContains() {
    let registry = ProviderRegistry::with_builtin_providers();
    assert!(registry.ensure_registered("gemini").is_ok());
    assert!(matches!(
        registry.ensure_registered("nonexistent"),
        Err(RegistryError::ProviderNotFound { .. })
    ));
}
