use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::{ApiError, ApiResult};
use crate::library::{content_stats, export_csv, export_filename, export_json, validate_import};
use crate::models::GeneratedContent;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryExportRequest {
    pub company_name: String,
    pub content: GeneratedContent,
}

fn attachment(filename: String) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(filename)],
    }
}

// POST /api/library/stats
pub async fn library_stats_handler(content: web::Json<GeneratedContent>) -> HttpResponse {
    HttpResponse::Ok().json(content_stats(&content))
}

// POST /api/library/export/csv
pub async fn export_csv_handler(request: web::Json<LibraryExportRequest>) -> HttpResponse {
    let now = Utc::now();
    let csv = export_csv(&request.content);
    info!("Exported {} posts to CSV for {}", request.content.total_posts(), request.company_name);

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(attachment(export_filename(&request.company_name, "csv", now)))
        .body(csv)
}

// POST /api/library/export/json
pub async fn export_json_handler(request: web::Json<LibraryExportRequest>) -> HttpResponse {
    let now = Utc::now();
    info!("Exported {} posts to JSON for {}", request.content.total_posts(), request.company_name);

    HttpResponse::Ok()
        .insert_header(attachment(export_filename(&request.company_name, "json", now)))
        .json(export_json(&request.content, &request.company_name, now))
}

// POST /api/library/import
pub async fn import_handler(body: web::Json<Value>) -> ApiResult<HttpResponse> {
    let data = validate_import(&body).map_err(|e| {
        warn!("Rejected import: {}", e);
        ApiError::InvalidRequest(e)
    })?;

    info!(
        "Validated import for {} with {} posts",
        data.form_data.company_name,
        data.generated_content.total_posts()
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": data,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

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

    fn content() -> Value {
        json!({
            "linkedin": [{"id": 1, "title": "Hello", "pillar": "Engagement", "status": "review", "content": "Say \"hi\"\nplease"}],
            "email": [{"id": 2, "title": "Welcome", "pillar": "Founder Story", "content": "Dear reader"}]
        })
    }

    #[actix_web::test]
    async fn test_stats_endpoint() {
        let app = app!();
        let req = test::TestRequest::post().uri("/api/library/stats").set_json(content()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["totalPosts"], 2);
        assert_eq!(body["reviewCount"], 1);
        assert_eq!(body["byPlatform"]["linkedin"]["review"], 1);
        assert_eq!(body["byPillar"][0]["pillar"], "Engagement");
        assert_eq!(body["byPillar"][0]["percentage"], 50);
    }

    #[actix_web::test]
    async fn test_csv_export_is_attachment() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/library/export/csv")
            .set_json(json!({"companyName": "Acme", "content": content()}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let disposition = resp.headers().get("Content-Disposition").unwrap().to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("acme-content-library-"));

        let body = test::read_body(resp).await;
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert!(csv.contains("\"linkedin\",\"1\",\"Hello\",\"Engagement\",\"review\",\"Say \"\"hi\"\" please\""));
    }

    #[actix_web::test]
    async fn test_json_export_summary() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/library/export/json")
            .set_json(json!({"companyName": "Acme", "content": content()}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["company"], "Acme");
        assert_eq!(body["summary"]["email"], 1);
        assert_eq!(body["summary"]["ads"], 0);
    }

    #[actix_web::test]
    async fn test_import_validation() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/library/import")
            .set_json(json!({"formData": {}, "generatedContent": {"linkedin": []}, "readyState": false}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "generatedContent.twitter must be an array");

        let req = test::TestRequest::post()
            .uri("/api/library/import")
            .set_json(json!({
                "formData": {"companyName": "Acme"},
                "generatedContent": {"linkedin": [], "twitter": [], "threads": [], "email": [], "ads": []},
                "dailyTasks": {"2": true},
                "readyState": true
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["dailyTasks"]["2"], true);
    }
}
