//! Shared helpers for end-to-end tests.

use tempfile::TempDir;

use crate::{Application, Config};

/// Config with all disk state redirected into a fresh temp directory.
pub fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.host = "127.0.0.1".to_string();
    config.storage.upload_dir = dir.path().join("uploads");
    config.storage.recipients_file = dir.path().join("emails.txt");
    config
}

pub async fn spawn_test_server(config: Config) -> axum_test::TestServer {
    Application::new(config)
        .await
        .expect("Failed to create application")
        .into_test_server()
}
