// This file exposes the modules as public modules in the crate

pub mod analysis_handlers;
pub mod app_config;
pub mod autofill_handlers;
pub mod catalog;
pub mod competitors;
pub mod config_handlers;
pub mod content_handlers;
pub mod content_schema;
pub mod errors;
pub mod event_stream;
pub mod form_handlers;
pub mod form_validation;
pub mod library;
pub mod library_handlers;
pub mod llm_handler;
pub mod llm_output;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod templates;

use actix_web::web;
use tracing::debug;

use crate::errors::ApiError;

// Logos arrive as base64 data URLs inside the form
pub const JSON_BODY_LIMIT: usize = 4 * 1024 * 1024;

/// JSON extractor settings shared by every route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, req| {
            debug!("Rejected body for {}: {}", req.path(), err);
            ApiError::InvalidRequest(format!("Invalid request body: {}", err)).into()
        })
}

/// Register every `/api` route.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    use analysis_handlers::*;
    use autofill_handlers::*;
    use config_handlers::*;
    use content_handlers::*;
    use form_handlers::*;
    use library_handlers::*;

    cfg.service(
        web::scope("/api")
            .route("/generate", web::post().to(generate_handler))
            .route("/generate-stream", web::post().to(generate_stream_handler))
            .route("/regenerate", web::post().to(regenerate_handler))
            .route("/repurpose", web::post().to(repurpose_handler))
            .route("/variants", web::post().to(variants_handler))
            .route("/autofill", web::get().to(autofill_status_handler))
            .route("/autofill", web::post().to(autofill_handler))
            .route("/score", web::post().to(score_handler))
            .route("/critique", web::get().to(critique_status_handler))
            .route("/critique", web::post().to(critique_handler))
            .route("/hashtags", web::post().to(hashtags_handler))
            .route("/calendar-autofill", web::post().to(calendar_handler))
            .route("/competitors", web::get().to(competitors_status_handler))
            .route("/competitors", web::post().to(competitors_handler))
            .route("/competitors/analyze", web::post().to(competitor_samples_handler))
            .route("/competitors/parse", web::post().to(parse_competitors_handler))
            .route("/competitors/summary", web::post().to(insights_summary_handler))
            .route("/form/options", web::get().to(form_options_handler))
            .route("/form/validate", web::post().to(validate_form_handler))
            .route("/form/validate/{step}", web::post().to(validate_step_handler))
            .route("/library/stats", web::post().to(library_stats_handler))
            .route("/library/export/csv", web::post().to(export_csv_handler))
            .route("/library/export/json", web::post().to(export_json_handler))
            .route("/library/import", web::post().to(import_handler))
            .route("/config", web::get().to(get_config_handler))
            .route("/config", web::put().to(update_config_handler)),
    );
}
