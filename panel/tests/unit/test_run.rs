//! Run loop tests

use std::sync::Arc;

use secrecy::SecretString;

use ugreen_panel::app::run::run_with_runner;

use crate::support::{test_options, test_state, RecordingRunner};

#[tokio::test]
async fn test_run_without_token_starts_and_shuts_down() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = test_options(None, &dir.path().join("ugreen-fix.log"));
    options.server.host = "127.0.0.1".to_string();
    options.server.port = 0;

    let result = run_with_runner(
        Arc::new(options),
        Arc::new(RecordingRunner::succeeding()),
        async {},
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_blank_token_leaves_guard_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(RecordingRunner::succeeding());

    let mut options = test_options(None, &dir.path().join("ugreen-fix.log"));
    options.server.token = Some(SecretString::from(String::new()));
    assert!(!test_state(options, runner.clone()).token_guard.is_enabled());

    let options = test_options(Some("s3cret"), &dir.path().join("ugreen-fix.log"));
    assert!(test_state(options, runner).token_guard.is_enabled());
}
