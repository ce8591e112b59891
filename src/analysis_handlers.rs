use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::competitors::{
    are_insights_stale, format_insights_for_prompt, parse_competitors, search_queries, CompetitorInsights,
    CompetitorSample, SampleAnalysis,
};
use crate::content_handlers::{availability, non_empty, AppState};
use crate::errors::{preview, ApiError, ApiResult};
use crate::llm_handler::LlmClient;
use crate::llm_output::{parse_llm_json, JsonShape};
use crate::models::FormData;
use crate::prompts::{
    build_calendar_prompt, build_competitor_analysis_prompt, build_competitor_research_prompt,
    build_critique_prompt, build_hashtag_prompt, build_score_prompt, ExistingContent,
};

pub const SCORE_MAX_TOKENS: u32 = 2000;
pub const CRITIQUE_MAX_TOKENS: u32 = 4000;
pub const HASHTAG_MAX_TOKENS: u32 = 1500;
pub const CALENDAR_MAX_TOKENS: u32 = 8000;
pub const COMPETITOR_MAX_TOKENS: u32 = 4000;

/// Request shared by the per-post analysis endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostAnalysisRequest {
    pub content: String,
    pub platform: String,
    pub form_data: Option<FormData>,
    pub competitor_benchmark: Option<String>,
}

impl PostAnalysisRequest {
    fn form(&self) -> ApiResult<&FormData> {
        self.form_data
            .as_ref()
            .filter(|_| !self.content.trim().is_empty() && !self.platform.trim().is_empty())
            .ok_or_else(|| {
                ApiError::MissingFields("Missing required fields: content, platform, formData".to_string())
            })
    }
}

// Parse a JSON reply, logging the head of the raw text when it fails
fn parse_reply(raw: &str, shape: JsonShape, message: &'static str) -> ApiResult<Value> {
    parse_llm_json(raw, shape).map_err(|e| {
        error!("{} ({}): {}", message, e, preview(raw, 500));
        ApiError::parse(message, raw)
    })
}

// POST /api/score
pub async fn score_handler(
    state: web::Data<AppState>,
    request: web::Json<PostAnalysisRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let form = request.form()?;

    info!("Scoring {} content for {}", request.platform, form.company_name);

    let prompt = build_score_prompt(&request.content, &request.platform, form);
    let raw = llm
        .complete(&prompt, SCORE_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to score content", e))?;

    let score = parse_reply(&raw, JsonShape::Object, "Failed to parse score response")?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "score": score,
    })))
}

// GET /api/critique
pub async fn critique_status_handler(state: web::Data<AppState>) -> HttpResponse {
    availability(&state, "Content critique is available")
}

// POST /api/critique
pub async fn critique_handler(
    state: web::Data<AppState>,
    request: web::Json<PostAnalysisRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let form = request.form()?;

    info!("Critiquing {} post for {}", request.platform, form.company_name);

    let prompt = build_critique_prompt(
        form,
        &request.content,
        &request.platform,
        non_empty(&request.competitor_benchmark),
    );
    let raw = llm
        .complete(&prompt, CRITIQUE_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to critique content", e))?;

    let critique = parse_reply(&raw, JsonShape::Object, "Failed to parse critique response")?;

    // Only the headline score and strengths are relied on by the dashboard
    if !critique["overallScore"].is_number() || !critique["strengths"].is_array() {
        error!("Invalid critique structure: {}", preview(&raw, 500));
        return Err(ApiError::Internal("Invalid critique response structure".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "critique": critique,
    })))
}

// POST /api/hashtags
pub async fn hashtags_handler(
    state: web::Data<AppState>,
    request: web::Json<PostAnalysisRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let form = request.form()?;

    info!("Suggesting hashtags for {} post by {}", request.platform, form.company_name);

    let prompt = build_hashtag_prompt(&request.content, &request.platform, form);
    let raw = llm
        .complete(&prompt, HASHTAG_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to generate hashtags", e))?;

    let parsed = parse_reply(&raw, JsonShape::Object, "Failed to parse hashtags response")?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "hashtags": parsed.get("hashtags").cloned().unwrap_or(Value::Array(Vec::new())),
        "recommendedCount": parsed.get("recommendedCount").cloned().unwrap_or(Value::Null),
        "strategy": parsed.get("strategy").cloned().unwrap_or(Value::Null),
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarRequest {
    pub form_data: Option<FormData>,
    pub existing_content: Option<ExistingContent>,
}

// POST /api/calendar-autofill
pub async fn calendar_handler(
    state: web::Data<AppState>,
    request: web::Json<CalendarRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let form = request
        .form_data
        .as_ref()
        .ok_or_else(|| ApiError::MissingFields("Missing formData".to_string()))?;

    info!("Generating calendar for {}", form.company_name);

    let prompt = build_calendar_prompt(form, request.existing_content.as_ref());
    let raw = llm
        .complete(&prompt, CALENDAR_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to generate calendar", e))?;

    let calendar = parse_reply(&raw, JsonShape::Array, "Failed to parse calendar response")?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "calendar": calendar,
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorResearchRequest {
    pub company_name: String,
    pub industry: String,
    pub competitors: Vec<String>,
    pub website: Option<String>,
}

fn clean_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn insights_response(insights: CompetitorInsights) -> HttpResponse {
    let prompt_summary = format_insights_for_prompt(&insights);
    HttpResponse::Ok().json(json!({
        "success": true,
        "insights": insights,
        "promptSummary": prompt_summary,
    }))
}

// GET /api/competitors
pub async fn competitors_status_handler(state: web::Data<AppState>) -> HttpResponse {
    availability(&state, "Competitor research is available")
}

// POST /api/competitors
pub async fn competitors_handler(
    state: web::Data<AppState>,
    request: web::Json<CompetitorResearchRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let competitors = clean_names(&request.competitors);
    if competitors.is_empty() {
        return Err(ApiError::MissingFields("No competitors provided".to_string()));
    }

    info!("Analyzing competitors for {}: {:?}", request.company_name, competitors);

    let prompt = build_competitor_research_prompt(
        &request.company_name,
        &request.industry,
        &competitors,
        non_empty(&request.website),
    );
    let insights = research(llm.as_ref(), &prompt).await?;
    Ok(insights_response(insights))
}

async fn research(llm: &dyn LlmClient, prompt: &str) -> ApiResult<CompetitorInsights> {
    let raw = llm
        .complete(prompt, COMPETITOR_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to analyze competitors", e))?;

    let parsed = parse_reply(&raw, JsonShape::Object, "Failed to parse competitor analysis")?;
    let mut insights: CompetitorInsights = serde_json::from_value(parsed)
        .map_err(|_| ApiError::parse("Failed to parse competitor analysis", &raw))?;
    insights.generated_at = Utc::now().to_rfc3339();

    Ok(insights)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorSampleRequest {
    pub company_name: String,
    pub competitors: Vec<String>,
    pub samples: Vec<CompetitorSample>,
}

// POST /api/competitors/analyze
pub async fn competitor_samples_handler(
    state: web::Data<AppState>,
    request: web::Json<CompetitorSampleRequest>,
) -> ApiResult<HttpResponse> {
    let llm = state.require_llm()?;
    let competitors = clean_names(&request.competitors);
    if competitors.is_empty() {
        return Err(ApiError::MissingFields("No competitors provided".to_string()));
    }

    info!(
        "Analyzing {} content samples for {}",
        request.samples.iter().map(|s| s.posts.len()).sum::<usize>(),
        request.company_name
    );

    let prompt = build_competitor_analysis_prompt(&request.company_name, &competitors, &request.samples);
    let raw = llm
        .complete(&prompt, COMPETITOR_MAX_TOKENS)
        .await
        .map_err(|e| ApiError::llm("Failed to analyze competitors", e))?;

    let parsed = parse_reply(&raw, JsonShape::Object, "Failed to parse competitor analysis")?;
    let analysis: SampleAnalysis = serde_json::from_value(parsed)
        .map_err(|_| ApiError::parse("Failed to parse competitor analysis", &raw))?;

    Ok(insights_response(analysis.into_insights(&competitors, Utc::now().to_rfc3339())))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParseCompetitorsRequest {
    pub competitors: String,
    pub industry: String,
}

// POST /api/competitors/parse
pub async fn parse_competitors_handler(request: web::Json<ParseCompetitorsRequest>) -> HttpResponse {
    let parsed: Vec<Value> = parse_competitors(&request.competitors)
        .into_iter()
        .map(|competitor| {
            let queries = search_queries(&competitor, &request.industry);
            json!({
                "name": competitor.name,
                "website": competitor.website,
                "searchQueries": queries,
            })
        })
        .collect();

    HttpResponse::Ok().json(json!({ "competitors": parsed }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InsightsSummaryRequest {
    pub insights: Option<CompetitorInsights>,
}

// POST /api/competitors/summary
pub async fn insights_summary_handler(request: web::Json<InsightsSummaryRequest>) -> HttpResponse {
    let insights = request.insights.as_ref();
    HttpResponse::Ok().json(json!({
        "stale": are_insights_stale(insights, Utc::now()),
        "promptSummary": insights.map(format_insights_for_prompt).unwrap_or_default(),
    }))
}
