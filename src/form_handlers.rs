use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::debug;

use crate::catalog::form_options;
use crate::errors::{ApiError, ApiResult};
use crate::form_validation::{validate_form, validate_step, FieldError, FormStep};
use crate::models::FormData;

fn validation_response(errors: Vec<FieldError>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "valid": errors.is_empty(),
        "errors": errors,
    }))
}

// GET /api/form/options
pub async fn form_options_handler() -> HttpResponse {
    HttpResponse::Ok().json(form_options())
}

// POST /api/form/validate
pub async fn validate_form_handler(form: web::Json<FormData>) -> HttpResponse {
    let errors = validate_form(&form);
    debug!("Form validation for {} found {} errors", form.company_name, errors.len());
    validation_response(errors)
}

// POST /api/form/validate/{step}
pub async fn validate_step_handler(
    step: web::Path<String>,
    form: web::Json<FormData>,
) -> ApiResult<HttpResponse> {
    let step = step
        .parse::<u32>()
        .ok()
        .and_then(FormStep::from_number)
        .ok_or(ApiError::InvalidStep)?;

    Ok(validation_response(validate_step(step, &form)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::Value;

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(crate::json_config())
                    .configure(crate::configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_form_options_lists_catalog() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/form/options").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["industries"].as_array().unwrap().len(), 9);
        assert_eq!(body["platforms"][0]["id"], "linkedin");
        assert_eq!(body["pillars"].as_array().unwrap().len(), 7);
    }

    #[actix_web::test]
    async fn test_validate_step_reports_field_errors() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/form/validate/1")
            .set_json(json!({"companyName": "", "website": "not a url"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["valid"], false);
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e["field"] == "companyName" && e["message"] == "Company name is required"));
        assert!(errors.iter().any(|e| e["field"] == "website" && e["message"] == "Must be a valid URL"));
    }

    #[actix_web::test]
    async fn test_validate_step_accepts_complete_step() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/form/validate/5")
            .set_json(json!({"primaryGoal": "leads", "contentTone": "bold", "targetPlatforms": ["linkedin"]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], true);
        assert!(body["errors"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_step_is_rejected() {
        let app = app!();
        for step in ["0", "6", "abc"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/form/validate/{}", step))
                .set_json(json!({}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 400);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], "INVALID_STEP");
        }
    }

    #[actix_web::test]
    async fn test_validate_whole_form() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/form/validate")
            .set_json(json!({}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["valid"], false);
        assert!(body["errors"].as_array().unwrap().len() >= 5);
    }
}
