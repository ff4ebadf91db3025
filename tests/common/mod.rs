/*!
 * Common test utilities for the paratrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use paratrans::app_config::Config;
use paratrans::app_controller::Controller;
use paratrans::providers::mock::MockProvider;
use paratrans::translation::ManualClock;

/// Route library logs through env_logger; honours RUST_LOG
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Valid configuration with a dummy API key
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.api_key = "sk-test".to_string();
    config.translation.concurrent_requests = 4;
    config
}

/// Controller driven by a mock provider and a virtual clock
pub fn mock_controller(
    config: Config,
    provider: MockProvider,
) -> Result<(Controller<MockProvider>, Arc<ManualClock>)> {
    init_logging();
    let clock = Arc::new(ManualClock::new());
    let controller = Controller::with_provider(config, provider, clock.clone())?;
    Ok((controller, clock))
}

/// Path as the string form the controller expects
pub fn input(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
