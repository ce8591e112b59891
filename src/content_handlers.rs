use std::sync::Arc;

use actix_web::http::header::CACHE_CONTROL;
use actix_web::web::Bytes;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::app_config::AppConfigManager;
use crate::content_schema::{recover_partial_content, validate_generated_content, validate_post};
use crate::errors::{preview, ApiError, ApiResult};
use crate::event_stream::spawn_generation;
use crate::llm_handler::LlmClient;
use crate::llm_output::{parse_llm_json, strip_code_fence, JsonShape};
use crate::models::{FormData, Pillar, PlatformId};
use crate::normalize::normalize_pillar;
use crate::prompts::{
    build_content_prompt, build_repurpose_prompt, build_rewrite_prompt, build_single_post_prompt,
    build_variants_prompt, ContentContext,
};
use crate::templates::template_library;

pub const LIBRARY_MAX_TOKENS: u32 = 16000;
pub const POST_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_NUM_VARIANTS: u32 = 3;

// Shared state handed to every handler
pub struct AppState {
    llm: RwLock<Arc<dyn LlmClient>>,
    pub config_manager: Arc<AppConfigManager>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmClient>, config_manager: Arc<AppConfigManager>) -> Self {
        Self {
            llm: RwLock::new(llm),
            config_manager,
        }
    }

    pub fn llm(&self) -> Arc<dyn LlmClient> {
        self.llm.read().clone()
    }

    /// The active client, or `NO_API_KEY` when its credential is missing.
    pub fn require_llm(&self) -> ApiResult<Arc<dyn LlmClient>> {
        let llm = self.llm();
        if llm.is_configured() {
            Ok(llm)
        } else {
            Err(ApiError::NoApiKey(format!("{} not configured", llm.credential_name())))
        }
    }

    pub fn replace_llm(&self, llm: Arc<dyn LlmClient>) {
        *self.llm.write() = llm;
    }
}

/// `{available, message}` answer used by the availability probes.
pub fn availability(state: &AppState, available_message: &str) -> HttpResponse {
    let llm = state.llm();
    let available = llm.is_configured();
    let message = if available {
        available_message.to_string()
    } else {
        format!("{} not configured", llm.credential_name())
    };

    HttpResponse::Ok().json(json!({
        "available": available,
        "message": message,
    }))
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    pub form_data: Option<FormData>,
    pub competitor_insights: Option<String>,
    pub custom_instructions: Option<String>,
    pub platform: Option<String>,
    pub pillar: Option<String>,
    pub current_content: Option<String>,
    pub feedback: Option<String>,
}

// POST /api/generate
pub async fn generate_handler(
    state: web::Data<AppState>,
    request: web::Json<GenerateRequest>,
) -> ApiResult<HttpResponse> {
    let request = request.into_inner();

    match request.request_type.as_str() {
        "check" => return Ok(availability(&state, "Content generation is available")),
        "template" => return generate_from_templates(request),
        _ => {}
    }

    let llm = state.require_llm()?;

    match request.request_type.as_str() {
        "full" => generate_full(llm.as_ref(), request).await,
        "single" => generate_single(llm.as_ref(), request).await,
        _ => Err(ApiError::InvalidRequest("Invalid request type".to_string())),
    }
}

async fn generate_full(llm: &dyn LlmClient, request: GenerateRequest) -> ApiResult<HttpResponse> {
    let form = request
        .form_data
        .ok_or_else(|| ApiError::MissingFields("Missing formData".to_string()))?;

    info!("Generating content library for {}", form.company_name);

    let prompt = build_content_prompt(ContentContext {
        form: &form,
        competitor_insights: non_empty(&request.competitor_insights),
        custom_instructions: non_empty(&request.custom_instructions),
    });

    let raw = llm
        .complete(&prompt, LIBRARY_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to generate content", e))?;

    let parsed = parse_llm_json(&raw, JsonShape::Object).map_err(|e| {
        error!("JSON parse failed ({}): {}", e, preview(&raw, 500));
        ApiError::parse("Failed to parse generated content", &raw)
    })?;

    match validate_generated_content(&parsed) {
        Ok(content) => {
            info!("Generated {} posts for {}", content.total_posts(), form.company_name);
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "content": content,
            })))
        }
        Err(errors) => {
            warn!("Generated content failed validation: {:?}", errors);
            match recover_partial_content(&parsed) {
                Some(content) => Ok(HttpResponse::Ok().json(json!({
                    "success": true,
                    "content": content,
                    "warnings": errors,
                }))),
                None => Err(ApiError::Validation {
                    message: "Generated content failed validation".to_string(),
                    errors,
                }),
            }
        }
    }
}

// Offline library; needs no provider key
fn generate_from_templates(request: GenerateRequest) -> ApiResult<HttpResponse> {
    let form = request
        .form_data
        .ok_or_else(|| ApiError::MissingFields("Missing formData".to_string()))?;

    let content = template_library(&form);
    info!("Built {} template posts for {}", content.total_posts(), form.company_name);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "content": content,
        "source": "template",
    })))
}

async fn generate_single(llm: &dyn LlmClient, request: GenerateRequest) -> ApiResult<HttpResponse> {
    let (Some(form), Some(platform), Some(pillar)) = (
        request.form_data.as_ref(),
        non_empty(&request.platform),
        non_empty(&request.pillar),
    ) else {
        return Err(ApiError::MissingFields(
            "Missing required fields: formData, platform, pillar".to_string(),
        ));
    };

    let platform = PlatformId::parse(platform)
        .ok_or_else(|| ApiError::InvalidRequest(format!("Unknown platform: {}", platform)))?;
    let pillar = Pillar::from_name(pillar)
        .or_else(|| normalize_pillar(pillar))
        .ok_or_else(|| ApiError::InvalidRequest(format!("Unknown pillar: {}", pillar)))?;

    info!("Generating single {} post ({}) for {}", platform, pillar, form.company_name);

    let prompt = build_single_post_prompt(
        form,
        platform,
        pillar,
        non_empty(&request.current_content),
        non_empty(&request.feedback),
    );

    let raw = llm
        .complete(&prompt, POST_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to generate content", e))?;

    let mut parsed = parse_llm_json(&raw, JsonShape::Object)
        .map_err(|_| ApiError::parse("Failed to parse generated post", &raw))?;

    // Every regenerated post gets a fresh id
    if let Some(fields) = parsed.as_object_mut() {
        fields.insert("id".to_string(), json!(chrono::Utc::now().timestamp_millis()));
    }

    let post = validate_post(&parsed).map_err(|errors| ApiError::Validation {
        message: "Generated post failed validation".to_string(),
        errors,
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "post": post,
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamRequest {
    pub form_data: Option<FormData>,
    pub competitor_insights: Option<String>,
    pub custom_instructions: Option<String>,
}

// POST /api/generate-stream
pub async fn generate_stream_handler(
    state: web::Data<AppState>,
    request: web::Json<StreamRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let request = request.into_inner();
    let form = request
        .form_data
        .ok_or_else(|| ApiError::MissingFields("Missing formData".to_string()))?;

    info!("Starting streaming generation for {}", form.company_name);

    let prompt = build_content_prompt(ContentContext {
        form: &form,
        competitor_insights: non_empty(&request.competitor_insights),
        custom_instructions: non_empty(&request.custom_instructions),
    });

    let rx_stream = spawn_generation(llm, prompt, LIBRARY_MAX_TOKENS, form.company_name.clone());

    Ok(HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .insert_header(("Connection", "keep-alive"))
        .streaming(rx_stream.map(|item| Ok::<Bytes, actix_web::Error>(Bytes::from(item)))))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegenerateRequest {
    pub content: String,
    pub platform: String,
    pub feedback: Option<String>,
    pub form_data: Option<FormData>,
}

// POST /api/regenerate
pub async fn regenerate_handler(
    state: web::Data<AppState>,
    request: web::Json<RegenerateRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let request = request.into_inner();

    let Some(form) = request.form_data.as_ref().filter(|_| {
        !request.content.trim().is_empty() && !request.platform.trim().is_empty()
    }) else {
        return Err(ApiError::MissingFields(
            "Missing required fields: content, platform, formData".to_string(),
        ));
    };

    info!("Regenerating {} post for {}", request.platform, form.company_name);

    let prompt = build_rewrite_prompt(&request.content, &request.platform, form, non_empty(&request.feedback));
    let raw = llm
        .complete(&prompt, POST_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to regenerate content", e))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "newContent": strip_code_fence(&raw).trim(),
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepurposeRequest {
    pub content: String,
    pub source_platform: String,
    pub target_platform: String,
    pub form_data: Option<FormData>,
}

// POST /api/repurpose
pub async fn repurpose_handler(
    state: web::Data<AppState>,
    request: web::Json<RepurposeRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let request = request.into_inner();

    let complete = [&request.content, &request.source_platform, &request.target_platform]
        .iter()
        .all(|field| !field.trim().is_empty());
    let Some(form) = request.form_data.as_ref().filter(|_| complete) else {
        return Err(ApiError::MissingFields("Missing required fields".to_string()));
    };

    info!(
        "Repurposing {} post to {} for {}",
        request.source_platform, request.target_platform, form.company_name
    );

    let prompt = build_repurpose_prompt(
        &request.content,
        &request.source_platform,
        &request.target_platform,
        form,
    );
    let raw = llm
        .complete(&prompt, POST_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to repurpose content", e))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "content": strip_code_fence(&raw).trim(),
        "sourcePlatform": request.source_platform,
        "targetPlatform": request.target_platform,
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantsRequest {
    pub content: String,
    pub platform: String,
    pub form_data: Option<FormData>,
    pub num_variants: Option<u32>,
}

// POST /api/variants
pub async fn variants_handler(
    state: web::Data<AppState>,
    request: web::Json<VariantsRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let request = request.into_inner();

    let Some(form) = request.form_data.as_ref().filter(|_| {
        !request.content.trim().is_empty() && !request.platform.trim().is_empty()
    }) else {
        return Err(ApiError::MissingFields(
            "Missing required fields: content, platform, formData".to_string(),
        ));
    };

    let num_variants = request.num_variants.unwrap_or(DEFAULT_NUM_VARIANTS);
    info!("Generating {} headline variants for {}", num_variants, form.company_name);

    let prompt = build_variants_prompt(&request.content, &request.platform, form, num_variants);
    let raw = llm
        .complete(&prompt, POST_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to generate variants", e))?;

    let parsed = parse_llm_json(&raw, JsonShape::Object)
        .map_err(|_| ApiError::parse("Failed to parse variants response", &raw))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "variants": parsed.get("variants").cloned().unwrap_or(Value::Array(Vec::new())),
    })))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::llm_handler::mock::ScriptedLlm;

    pub fn state_with(llm: Arc<ScriptedLlm>) -> web::Data<AppState> {
        let config_manager = Arc::new(AppConfigManager::new("gtm_config.test.json"));
        web::Data::new(AppState::new(llm, config_manager))
    }

    pub fn form_json() -> Value {
        json!({
            "companyName": "Acme",
            "productDescription": "Workflow automation for finance teams",
            "targetAudience": "CFOs at mid-market companies",
            "contentTone": "bold",
            "targetPlatforms": ["linkedin"]
        })
    }

    pub fn long_content() -> String {
        "Finance teams lose hours every week reconciling spreadsheets by hand. Here is how we fixed it.".to_string()
    }
}
