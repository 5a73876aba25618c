/*!
 * Tests for the application controller: provider selection, file and
 * directory runs, overwrite handling
 */

use anyhow::Result;
use std::fs;
use srt_translator::app_config::{Config, ProviderConfig};
use srt_translator::app_controller::{Controller, RunSummary};
use srt_translator::errors::RegistryError;
use srt_translator::ProviderRegistry;
use crate::common;

fn mock_config(target_language: &str) -> Config {
    Config {
        target_language: target_language.to_string(),
        provider: "mock".to_string(),
        providers: vec![ProviderConfig::new("mock")],
        ..Config::default()
    }
}

/// Unknown provider fails before any file is read or written
#[tokio::test]
async fn test_run_withUnknownProvider_shouldFailWithoutTouchingFiles() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("never_created.srt");
    let output = temp_dir.path().join("never_written.srt");

    let config = Config {
        provider: "nonexistent".to_string(),
        ..Config::default()
    };
    let controller = Controller::with_registry(config, ProviderRegistry::with_builtin_providers())?;

    let error = controller
        .run(input.clone(), Some(output.clone()), false)
        .await
        .unwrap_err();

    match error.downcast_ref::<RegistryError>() {
        Some(RegistryError::ProviderNotFound { name, available }) => {
            assert_eq!(name, "nonexistent");
            assert!(available.contains(&"google".to_string()));
        }
        other => panic!("expected ProviderNotFound, got {:?}", other),
    }
    assert!(!input.exists());
    assert!(!output.exists());
    Ok(())
}

/// An unknown provider from the command line leaves no config file behind
#[test]
fn test_fromConfigFile_withUnknownProvider_shouldNotCreateConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let error = Controller::from_config_file(&config_path, common::mock_registry(), |config| {
        config.provider = "nonexistent".to_string();
    })
    .err()
    .expect("unknown provider must be rejected");

    assert!(matches!(
        error.downcast_ref::<RegistryError>(),
        Some(RegistryError::ProviderNotFound { .. })
    ));
    assert!(!config_path.exists());
    Ok(())
}

/// A missing config file is created with defaults, overrides stay in memory
#[test]
fn test_fromConfigFile_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let controller = Controller::from_config_file(&config_path, common::mock_registry(), |config| {
        config.provider = "mock".to_string();
        config.target_language = "fr".to_string();
    })?;

    assert_eq!(controller.config().provider, "mock");
    let saved = Config::from_file(&config_path)?.expect("default config written");
    assert_eq!(saved.provider, Config::default().provider);
    assert_eq!(saved.target_language, Config::default().target_language);
    Ok(())
}

/// An existing config file is read and left untouched
#[test]
fn test_fromConfigFile_withExistingFile_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");
    mock_config("de").save(&config_path)?;
    let before = fs::read_to_string(&config_path)?;

    let controller = Controller::from_config_file(&config_path, common::mock_registry(), |_| {})?;

    assert_eq!(controller.config().target_language, "de");
    assert_eq!(fs::read_to_string(&config_path)?, before);
    Ok(())
}

#[tokio::test]
async fn test_createProvider_withRegisteredMock_shouldSucceed() -> Result<()> {
    let controller = Controller::with_registry(mock_config("fr"), common::mock_registry())?;
    let provider = controller.create_provider()?;
    assert_eq!(provider.name(), "mock");
    Ok(())
}

/// Invalid configuration is rejected up front
#[test]
fn test_withRegistry_withInvalidConfig_shouldFail() {
    let config = Config {
        batch_size: 0,
        ..mock_config("fr")
    };
    assert!(Controller::with_registry(config, common::mock_registry()).is_err());
}

/// Single file, default output name next to the input
#[tokio::test]
async fn test_run_withSingleFile_shouldWriteSiblingOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::with_registry(mock_config("fr"), common::mock_registry())?;

    let summary = controller.run(input, None, false).await?;

    assert_eq!(summary, RunSummary { translated: 1, skipped: 0, failed: 0 });
    let written = fs::read_to_string(temp_dir.path().join("movie.fr.srt"))?;
    assert_eq!(written, common::HELLO_WORLD_UPPERCASE);
    Ok(())
}

/// Existing outputs are kept unless overwriting is forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = common::create_test_file(temp_dir.path(), "movie.fr.srt", "keep me")?;
    let controller = Controller::with_registry(mock_config("fr"), common::mock_registry())?;

    let summary = controller.run(input.clone(), None, false).await?;
    assert_eq!(summary.skipped, 1);
    assert_eq!(fs::read_to_string(&output)?, "keep me");

    let summary = controller.run(input, None, true).await?;
    assert_eq!(summary.translated, 1);
    assert_eq!(fs::read_to_string(&output)?, common::HELLO_WORLD_UPPERCASE);
    Ok(())
}

/// Directory runs translate every source file and ignore earlier outputs
#[tokio::test]
async fn test_run_withDirectory_shouldTranslateEachSourceFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let season = temp_dir.path().join("season1");
    fs::create_dir_all(&season)?;
    common::create_test_subtitle(temp_dir.path(), "ep1.srt")?;
    common::create_test_subtitle(&season, "ep2.srt")?;
    common::create_test_file(temp_dir.path(), "ep0.de.srt", "1\nts\nalready german\n")?;

    let controller = Controller::with_registry(mock_config("de"), common::mock_registry())?;
    let summary = controller.run(temp_dir.path().to_path_buf(), None, false).await?;

    assert_eq!(summary.translated, 2);
    assert!(temp_dir.path().join("ep1.de.srt").exists());
    assert!(season.join("ep2.de.srt").exists());
    assert!(!temp_dir.path().join("ep0.de.de.srt").exists());
    Ok(())
}

/// Directory runs can write into a separate output directory
#[tokio::test]
async fn test_run_withDirectoryAndOutputDir_shouldWriteThere() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = temp_dir.path().join("src");
    fs::create_dir_all(&source)?;
    common::create_test_subtitle(&source, "ep1.srt")?;
    let out_dir = temp_dir.path().join("out");

    let controller = Controller::with_registry(mock_config("it"), common::mock_registry())?;
    controller.run(source, Some(out_dir.clone()), false).await?;

    assert_eq!(
        fs::read_to_string(out_dir.join("ep1.it.srt"))?,
        common::HELLO_WORLD_UPPERCASE
    );
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_registry(mock_config("fr"), common::mock_registry())?;
    let result = controller.run(temp_dir.path().join("missing.srt"), None, false).await;
    assert!(result.is_err());
    Ok(())
}
