/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::time::Duration;

use paratrans::app_config::Config;
use paratrans::app_controller::{Controller, FileOutcome};
use paratrans::document::OutputMode;
use paratrans::providers::mock::MockProvider;

use crate::common;

/// The production controller can be built without touching the network
#[test]
fn test_controller_new_withValidConfig_shouldInitialize() -> Result<()> {
    let mut config = common::test_config();
    config.document.bilingual = true;
    config.translation.reset_backoff_on_success = true;

    let controller = Controller::new(config)?;

    assert_eq!(controller.mode(), OutputMode::Bilingual);
    assert_eq!(controller.config().target_language, "Spanish");
    assert_eq!(controller.client().limiter().initial_interval(), Duration::from_secs(1));
    assert_eq!(controller.client().limiter().max_interval(), Duration::from_secs(60));
    Ok(())
}

/// Folder mode translates every allowed file, recursively
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldTranslateAllowedOnly() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "a.txt", "Alpha.")?;
    common::create_test_file(dir.path(), "b.md", "Beta.")?;
    common::create_test_file(dir.path(), "c.pdf", "ignored")?;
    common::create_test_file(dir.path(), "nested/d.txt", "Delta.")?;
    let provider = MockProvider::working();
    let (controller, _clock) = common::mock_controller(common::test_config(), provider.clone())?;

    let outcomes = controller.run_folder(dir.path()).await?;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| matches!(o, FileOutcome::Written(_))));
    assert!(dir.path().join("a_translated.txt").exists());
    assert!(dir.path().join("b_translated.txt").exists());
    assert!(dir.path().join("nested/d_translated.txt").exists());
    assert!(!dir.path().join("c_translated.txt").exists());
    assert_eq!(provider.request_count(), 3);
    Ok(())
}

/// A second folder run skips sources and the outputs themselves
#[tokio::test]
async fn test_run_folder_twice_shouldSkipEverything() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "a.txt", "Alpha.")?;
    common::create_test_file(dir.path(), "b.txt", "Beta.")?;
    let provider = MockProvider::working();
    let (controller, _clock) = common::mock_controller(common::test_config(), provider.clone())?;

    controller.run_folder(dir.path()).await?;
    let second = controller.run_folder(dir.path()).await?;

    // a.txt, a_translated.txt, b.txt, b_translated.txt
    assert_eq!(second.len(), 4);
    assert!(second.iter().all(|o| matches!(o, FileOutcome::Skipped(_))));
    assert_eq!(provider.request_count(), 2);
    Ok(())
}

/// The extension filter narrows a folder scan
#[tokio::test]
async fn test_run_folder_withExtensionFilter_shouldOnlyProcessMatching() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "a.txt", "Alpha.")?;
    common::create_test_file(dir.path(), "b.md", "Beta.")?;
    let mut config = common::test_config();
    config.document.extension_filter = Some("md".to_string());
    let (controller, _clock) = common::mock_controller(config, MockProvider::working())?;

    let outcomes = controller.run_folder(dir.path()).await?;

    assert_eq!(outcomes.len(), 1);
    assert!(dir.path().join("b_translated.txt").exists());
    assert!(!dir.path().join("a_translated.txt").exists());
    Ok(())
}

/// One failing file aborts the remaining folder run
#[tokio::test]
async fn test_run_folder_withFailingFile_shouldAbortBatch() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "a.txt", "Body.\nReferences\n[1] Ref.")?;
    common::create_test_file(dir.path(), "b.txt", "Body without refs.")?;
    common::create_test_file(dir.path(), "c.txt", "Body.\nNotes\nA note.")?;
    let mut config = common::test_config();
    config.document.exclude_references = true;
    let (controller, _clock) = common::mock_controller(config, MockProvider::working())?;

    assert!(controller.run_folder(dir.path()).await.is_err());

    assert!(dir.path().join("a_translated.txt").exists());
    assert!(!dir.path().join("b_translated.txt").exists());
    assert!(!dir.path().join("c_translated.txt").exists());
    Ok(())
}

/// `run` dispatches directories to folder mode and files to file mode
#[tokio::test]
async fn test_run_withDirectoryOrFile_shouldPickMode() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let single = common::create_test_file(dir.path(), "solo/one.txt", "One.")?;
    common::create_test_file(dir.path(), "many/two.txt", "Two.")?;
    common::create_test_file(dir.path(), "many/three.txt", "Three.")?;
    let provider = MockProvider::working();
    let (controller, _clock) = common::mock_controller(Config {
        target_language: "German".to_string(),
        ..common::test_config()
    }, provider.clone())?;

    controller.run(&common::input(&single)).await?;
    controller.run(&common::input(&dir.path().join("many"))).await?;

    assert!(dir.path().join("solo/one_translated.txt").exists());
    assert!(dir.path().join("many/two_translated.txt").exists());
    assert!(dir.path().join("many/three_translated.txt").exists());
    assert_eq!(provider.request_count(), 3);
    Ok(())
}

/// A missing input path fails before any request is made
#[test]
fn test_run_withMissingPath_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let provider = MockProvider::working();
    let (controller, _clock) = common::mock_controller(common::test_config(), provider.clone())?;
    let missing = common::input(&dir.path().join("absent.txt"));

    let result = tokio_test::block_on(controller.run(&missing));

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 0);
    Ok(())
}
