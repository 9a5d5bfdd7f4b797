use axum_test::{TestResponse, TestServer};
use magic_villa::core::AppState;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Crea un AppState per i test
///
/// # Arguments
/// * `pool` - Connection pool SQLite con migrations e fixtures già applicate
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(pool))
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `pool` - Pool da condividere con il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(pool: SqlitePool) -> TestServer {
    let app = magic_villa::create_router(create_test_state(pool));
    TestServer::new(app).expect("Failed to create test server")
}

/// Legge l'envelope e controlla statusCode e isExitoso
///
/// # Returns
/// Il body completo, per ispezionare `resultado` o `errorMessages`
pub fn assert_envelope(response: &TestResponse, status_code: u16, is_exitoso: bool) -> Value {
    let body: Value = response.json();
    assert_eq!(body["statusCode"], status_code, "unexpected envelope: {body}");
    assert_eq!(body["isExitoso"], is_exitoso, "unexpected envelope: {body}");
    if is_exitoso {
        assert!(body["errorMessages"].as_array().is_some_and(|e| e.is_empty()));
    } else {
        assert!(body["resultado"].is_null());
        assert!(body["errorMessages"].as_array().is_some_and(|e| !e.is_empty()));
    }
    body
}
