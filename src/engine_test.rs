use super::*;
use tempfile::TempDir;

fn test_engine() -> (Engine, TempDir) {
    let temp = TempDir::new().unwrap();
    let manager = ModelManager::with_dir(temp.path());
    (
        Engine::with_model_manager(Config::default(), manager),
        temp,
    )
}

#[test]
fn test_engine_starts_uninitialized() {
    let (engine, _temp) = test_engine();
    assert!(!engine.is_initialized());
}

#[tokio::test]
async fn test_run_loop_requires_initialization() {
    let (mut engine, _temp) = test_engine();

    let err = engine
        .run_loop(CancellationToken::new(), |_| {})
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not initialized"));
}
