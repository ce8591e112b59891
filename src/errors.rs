use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// Failures talking to the LLM provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("{0} not configured")]
    MissingApiKey(&'static str),

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("Empty response from AI")]
    EmptyResponse,

    #[error("Stream error: {0}")]
    Stream(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            LlmError::Network(err.to_string())
        } else if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(500),
                message: err.to_string(),
            }
        }
    }
}

/// Errors surfaced to HTTP clients
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NoApiKey(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    MissingFields(String),

    #[error("{message}")]
    MissingField { message: String, code: &'static str },

    #[error("Invalid step")]
    InvalidStep,

    #[error("{context}")]
    Llm {
        context: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("{message}")]
    Parse {
        message: String,
        raw_response: Option<String>,
    },

    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: String,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_errors: Option<&'a [String]>,
}

// Raw replies echoed back to the client are capped
const RAW_RESPONSE_PREVIEW: usize = 500;

impl ApiError {
    pub fn llm(context: &'static str, source: LlmError) -> Self {
        match source {
            LlmError::MissingApiKey(var) => ApiError::NoApiKey(format!("{} not configured", var)),
            source => ApiError::Llm { context, source },
        }
    }

    pub fn parse(message: impl Into<String>, raw: &str) -> Self {
        ApiError::Parse {
            message: message.into(),
            raw_response: Some(preview(raw, RAW_RESPONSE_PREVIEW).to_string()),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NoApiKey(_) => "NO_API_KEY",
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::MissingFields(_) => "MISSING_FIELDS",
            ApiError::MissingField { code, .. } => *code,
            ApiError::InvalidStep => "INVALID_STEP",
            ApiError::Llm { source, .. } => match source {
                LlmError::Unauthorized => "INVALID_API_KEY",
                LlmError::RateLimited => "RATE_LIMITED",
                LlmError::Network(_) => "NETWORK_ERROR",
                LlmError::EmptyResponse => "EMPTY_RESPONSE",
                LlmError::MissingApiKey(_) => "NO_API_KEY",
                _ => "API_ERROR",
            },
            ApiError::Parse { .. } => "PARSE_ERROR",
            ApiError::Validation { .. } => "VALIDATION_FAILED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn body(&self) -> ErrorBody<'_> {
        let mut body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
            details: None,
            raw_response: None,
            validation_errors: None,
        };

        match self {
            ApiError::Llm { source, .. } => match source {
                LlmError::Unauthorized => body.error = "Invalid API key".to_string(),
                LlmError::RateLimited => {
                    body.error = "Rate limited. Please try again in a moment.".to_string()
                }
                LlmError::Network(_) => {
                    body.error = "Network error. Please check your connection.".to_string()
                }
                LlmError::EmptyResponse => body.error = "Empty response from AI".to_string(),
                other => body.details = Some(other.to_string()),
            },
            ApiError::Parse { raw_response, .. } => {
                body.raw_response = raw_response.as_deref();
            }
            ApiError::Validation { errors, .. } => {
                body.validation_errors = Some(errors.as_slice());
            }
            _ => {}
        }

        body
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::MissingFields(_)
            | ApiError::MissingField { .. }
            | ApiError::InvalidStep => StatusCode::BAD_REQUEST,
            ApiError::Llm { source: LlmError::RateLimited, .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Llm { source: LlmError::Network(_), .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

/// First `max` characters of `text`, on a char boundary.
pub fn preview(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_rate_limit_maps_to_429() {
        let (status, body) = body_json(ApiError::llm("Failed to score", LlmError::RateLimited)).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "RATE_LIMITED");
    }

    #[actix_web::test]
    async fn test_missing_key_becomes_no_api_key() {
        let err = ApiError::llm("Failed to generate", LlmError::MissingApiKey("ANTHROPIC_API_KEY"));
        assert_eq!(err.code(), "NO_API_KEY");
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "ANTHROPIC_API_KEY not configured");
    }

    #[actix_web::test]
    async fn test_api_error_carries_details() {
        let source = LlmError::Api { status: 500, message: "boom".to_string() };
        let (status, body) = body_json(ApiError::llm("Failed to generate content", source)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "API_ERROR");
        assert_eq!(body["error"], "Failed to generate content");
        assert_eq!(body["details"], "Provider returned 500: boom");
    }

    #[actix_web::test]
    async fn test_validation_lists_errors() {
        let err = ApiError::Validation {
            message: "Generated content failed validation".to_string(),
            errors: vec!["linkedin: too short".to_string()],
        };
        let (_, body) = body_json(err).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["validationErrors"][0], "linkedin: too short");
        assert!(body.get("rawResponse").is_none());
    }

    #[test]
    fn test_request_build_failure_is_api_error() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let mapped = LlmError::from(err);
        assert!(matches!(mapped, LlmError::Api { status: 500, .. }), "got {:?}", mapped);
        assert_eq!(ApiError::llm("Failed to generate content", mapped).code(), "API_ERROR");
    }

    #[actix_web::test]
    async fn test_refused_connection_is_network_error() {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let err = client.get("http://127.0.0.1:1/").send().await.unwrap_err();
        let mapped = LlmError::from(err);
        assert!(matches!(mapped, LlmError::Network(_)), "got {:?}", mapped);
        assert_eq!(ApiError::llm("Failed to generate content", mapped).code(), "NETWORK_ERROR");
    }

    #[test]
    fn test_parse_error_truncates_raw_reply() {
        let raw = "x".repeat(2000);
        match ApiError::parse("Failed to parse", &raw) {
            ApiError::Parse { raw_response: Some(raw), .. } => assert_eq!(raw.len(), 500),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(preview("héllo", 2), "hé");
    }
}
