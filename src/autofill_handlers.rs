use std::time::Instant;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::content_handlers::{availability, non_empty, AppState};
use crate::errors::{preview, ApiError, ApiResult};
use crate::llm_output::{parse_labeled_sections, parse_llm_json, JsonShape};
use crate::normalize::{calculate_completeness, normalize_autofill, validate_autofill, DataQuality};
use crate::prompts::build_autofill_prompt;

pub const AUTOFILL_MAX_TOKENS: u32 = 4000;
// Research counts as having found the company above this completeness
const COMPANY_FOUND_THRESHOLD: u32 = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutofillRequest {
    pub company_name: String,
    pub website: Option<String>,
}

// JSON object reply, or the numbered plain-text profile some models return
fn read_profile(raw: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(fields)) = parse_llm_json(raw, JsonShape::Object) {
        return Some(fields);
    }

    let profile = parse_labeled_sections(raw);
    let Ok(Value::Object(mut fields)) = serde_json::to_value(profile) else {
        return None;
    };
    fields.retain(|_, value| value.as_str().is_some_and(|s| !s.is_empty()));

    if fields.is_empty() {
        None
    } else {
        warn!("Autofill reply was not JSON, read {} labeled sections", fields.len());
        Some(fields)
    }
}

// GET /api/autofill
pub async fn autofill_status_handler(state: web::Data<AppState>) -> HttpResponse {
    availability(&state, "AI autofill is available")
}

// POST /api/autofill
pub async fn autofill_handler(
    state: web::Data<AppState>,
    request: web::Json<AutofillRequest>,
) -> ApiResult<HttpResponse> {
    let started = Instant::now();
    let llm = state.require_llm()?;

    let company_name = request.company_name.trim();
    if company_name.is_empty() {
        return Err(ApiError::MissingField {
            message: "Company name is required".to_string(),
            code: "MISSING_COMPANY",
        });
    }
    let website = non_empty(&request.website);

    info!("Starting company research for {} ({})", company_name, website.unwrap_or("no website"));

    let prompt = build_autofill_prompt(company_name, website);
    let raw = llm.complete(&prompt, AUTOFILL_MAX_TOKENS).await.map_err(|e| {
        error!("Autofill provider call failed: {}", e);
        ApiError::llm("AI service error", e)
    })?;
    info!("Provider answered in {}ms", started.elapsed().as_millis());

    let mut fields = read_profile(&raw).ok_or_else(|| {
        error!("Failed to parse autofill reply: {}", preview(&raw, 500));
        ApiError::parse("Failed to parse AI response", &raw)
    })?;

    normalize_autofill(&mut fields);
    let completeness = calculate_completeness(&fields);
    let data_quality = DataQuality::from_percentage(completeness.percentage);

    let (data, warnings) = match validate_autofill(&fields) {
        Ok(profile) => (json!(profile), None),
        Err(errors) => (Value::Object(fields), Some(errors)),
    };

    info!(
        "Autofill completed for {} in {}ms, quality {:?} ({}%)",
        company_name,
        started.elapsed().as_millis(),
        data_quality,
        completeness.percentage
    );

    let company_found = completeness.percentage > COMPANY_FOUND_THRESHOLD;
    let mut body = json!({
        "success": true,
        "data": data,
        "completeness": completeness,
        "dataQuality": data_quality,
        "companyFound": company_found,
    });
    if let Some(warnings) = warnings {
        body["warnings"] = json!(warnings);
    }

    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_handlers::test_support::state_with;
    use crate::errors::LlmError;
    use crate::llm_handler::mock::ScriptedLlm;
    use actix_web::{test, App};
    use std::sync::Arc;

    macro_rules! app {
        ($llm:expr) => {
            test::init_service(
                App::new()
                    .app_data(state_with($llm))
                    .app_data(crate::json_config())
                    .configure(crate::configure_api),
            )
            .await
        };
    }

    fn full_reply() -> String {
        json!({
            "productDescription": "Automated bookkeeping for agencies",
            "targetAudience": "Agency owners with 10-50 staff",
            "jobTitles": "Founder, COO",
            "painPoints": "Late invoices",
            "uniqueValue": "Closes the books in a day",
            "keyBenefits": "Less admin",
            "competitors": "Globex, Initech",
            "industry": "Software as a Service",
            "companySize": "11-50",
            "primaryGoal": "lead generation",
            "contentTone": "friendly"
        })
        .to_string()
    }

    #[actix_web::test]
    async fn test_autofill_normalizes_and_scores() {
        let llm = Arc::new(ScriptedLlm::reply(&full_reply()));
        let app = app!(llm.clone());

        let req = test::TestRequest::post()
            .uri("/api/autofill")
            .set_json(json!({"companyName": "Ledgerly", "website": "https://ledgerly.io"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["industry"], "saas");
        assert_eq!(body["data"]["primaryGoal"], "leads");
        assert_eq!(body["data"]["contentTone"], "casual");
        assert_eq!(body["completeness"]["percentage"], 100);
        assert_eq!(body["dataQuality"], "excellent");
        assert_eq!(body["companyFound"], true);
        assert!(body.get("warnings").is_none());

        let (prompt, max_tokens) = llm.last_prompt().unwrap();
        assert_eq!(max_tokens, AUTOFILL_MAX_TOKENS);
        assert!(prompt.contains("Ledgerly"));
    }

    #[actix_web::test]
    async fn test_autofill_partial_reply_carries_warnings() {
        let reply = r#"{"productDescription": "Short", "industry": "robotics", "primaryGoal": "world domination"}"#;
        let app = app!(Arc::new(ScriptedLlm::reply(reply)));

        let req = test::TestRequest::post()
            .uri("/api/autofill")
            .set_json(json!({"companyName": "Tiny Co"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["industry"], "other");
        assert!(body["data"].get("primaryGoal").is_none());
        assert_eq!(body["dataQuality"], "limited");
        assert_eq!(body["companyFound"], false);
        assert_eq!(
            body["warnings"][0],
            "productDescription: String must contain at least 10 character(s)"
        );
    }

    #[actix_web::test]
    async fn test_autofill_accepts_labeled_text() {
        let reply = "1. PRODUCT DESCRIPTION: Scheduling software for dental clinics\n2. TARGET AUDIENCE: Practice managers at dental groups\n3. INDUSTRY: HealthTech";
        let app = app!(Arc::new(ScriptedLlm::reply(reply)));

        let req = test::TestRequest::post()
            .uri("/api/autofill")
            .set_json(json!({"companyName": "Molar"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["productDescription"], "Scheduling software for dental clinics");
        assert_eq!(body["data"]["industry"], "healthtech");
        assert_eq!(body["completeness"]["percentage"], 27);
        assert_eq!(body["companyFound"], true);
    }

    #[actix_web::test]
    async fn test_autofill_requires_company() {
        let app = app!(Arc::new(ScriptedLlm::reply("{}")));

        let req = test::TestRequest::post()
            .uri("/api/autofill")
            .set_json(json!({"companyName": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "MISSING_COMPANY");
        assert_eq!(body["error"], "Company name is required");
    }

    #[actix_web::test]
    async fn test_autofill_rejects_malformed_body() {
        let app = app!(Arc::new(ScriptedLlm::reply("{}")));

        let req = test::TestRequest::post()
            .uri("/api/autofill")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[actix_web::test]
    async fn test_autofill_unparseable_reply() {
        let app = app!(Arc::new(ScriptedLlm::reply("I don't know this company.")));

        let req = test::TestRequest::post()
            .uri("/api/autofill")
            .set_json(json!({"companyName": "Nobody"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "PARSE_ERROR");
        assert_eq!(body["rawResponse"], "I don't know this company.");
    }

    #[actix_web::test]
    async fn test_autofill_invalid_key() {
        let app = app!(Arc::new(ScriptedLlm::failing(LlmError::Unauthorized)));

        let req = test::TestRequest::post()
            .uri("/api/autofill")
            .set_json(json!({"companyName": "Acme"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 500);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "INVALID_API_KEY");
        assert_eq!(body["error"], "Invalid API key");
    }

    #[actix_web::test]
    async fn test_autofill_status() {
        let app = app!(Arc::new(ScriptedLlm::reply("")));
        let req = test::TestRequest::get().uri("/api/autofill").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "AI autofill is available");
    }
}
