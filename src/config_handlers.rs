use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, info};

use crate::app_config::AppConfig;
use crate::content_handlers::AppState;
use crate::errors::{ApiError, ApiResult};
use crate::llm_handler::LLMProviderImpl;

// GET /api/config
pub async fn get_config_handler(state: web::Data<AppState>) -> HttpResponse {
    let config = state.config_manager.get_config();
    let llm = state.llm();

    HttpResponse::Ok().json(json!({
        "config": config,
        "provider": config.provider(),
        "credential": llm.credential_name(),
        "configured": llm.is_configured(),
    }))
}

// PUT /api/config
pub async fn update_config_handler(
    state: web::Data<AppState>,
    config: web::Json<AppConfig>,
) -> ApiResult<HttpResponse> {
    let mut config = config.into_inner();

    // The dashboard directory is mounted once at start-up
    let current = state.config_manager.get_config();
    if config.static_dir.is_none() {
        config.static_dir = current.static_dir.clone();
    } else if config.static_dir() != current.static_dir() {
        return Err(ApiError::InvalidRequest(
            "static_dir cannot be changed at runtime; edit the config file and restart".to_string(),
        ));
    }

    // Build the new client first so a bad config leaves the running one alone
    let provider = LLMProviderImpl::new(&config).map_err(|e| {
        error!("Failed to build LLM client: {}", e);
        ApiError::Internal(format!("Failed to create LLM client: {}", e))
    })?;

    state.config_manager.save_config(&config).map_err(|e| {
        error!("Failed to save config to {}: {}", state.config_manager.config_file(), e);
        ApiError::Internal(format!("Failed to save config: {}", e))
    })?;

    info!("Switched LLM provider to {:?}", config.provider());
    state.replace_llm(Arc::new(provider));

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "config": config,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigManager;
    use crate::llm_handler::mock::ScriptedLlm;
    use actix_web::{test, App};
    use serde_json::Value;
    use tempfile::TempDir;

    #[actix_web::test]
    async fn test_update_config_persists_and_swaps_client() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gtm_config.json");
        let manager = Arc::new(AppConfigManager::new(path.to_str().unwrap()));
        let state = web::Data::new(AppState::new(Arc::new(ScriptedLlm::reply("x")), manager.clone()));

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .app_data(crate::json_config())
                .configure(crate::configure_api),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/config")
            .set_json(json!({"llm_provider": "Gemini", "gemini_model": "gemini-custom", "request_timeout_secs": 30}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        assert!(path.exists());
        assert_eq!(manager.get_config().request_timeout_secs(), 30);
        assert_eq!(state.llm().credential_name(), "GEMINI_API_KEY");

        let req = test::TestRequest::get().uri("/api/config").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["provider"], "Gemini");
        assert_eq!(body["config"]["gemini_model"], "gemini-custom");
        assert_eq!(body["credential"], "GEMINI_API_KEY");
    }

    #[actix_web::test]
    async fn test_update_config_keeps_static_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gtm_config.json");
        std::fs::write(&path, r#"{"static_dir": "./public"}"#).unwrap();
        let manager = Arc::new(AppConfigManager::new(path.to_str().unwrap()));
        manager.load_config().unwrap();
        let state = web::Data::new(AppState::new(Arc::new(ScriptedLlm::reply("x")), manager.clone()));

        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(crate::json_config())
                .configure(crate::configure_api),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/config")
            .set_json(json!({"static_dir": "/srv/other"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_REQUEST");
        assert_eq!(manager.get_config().static_dir(), "./public");

        let req = test::TestRequest::put()
            .uri("/api/config")
            .set_json(json!({"llm_provider": "OpenRouter"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["config"]["static_dir"], "./public");

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["static_dir"], "./public");
    }

    #[actix_web::test]
    async fn test_update_config_rejects_unknown_provider() {
        let state = web::Data::new(AppState::new(
            Arc::new(ScriptedLlm::reply("x")),
            Arc::new(AppConfigManager::new("unused.json")),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(crate::json_config())
                .configure(crate::configure_api),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/config")
            .set_json(json!({"llm_provider": "Mystery"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }
}
