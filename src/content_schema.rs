//! Schema checks for generated content and lenient recovery of replies that
//! fail them.

use jsonschema::JSONSchema;
use serde_json::{json, Map, Value};

use crate::catalog::platform_spec;
use crate::models::{GeneratedContent, Pillar, PlatformId, Post, PostStatus};
use crate::normalize::normalize_pillar;

pub const MIN_CONTENT_CHARS: usize = 50;
pub const MAX_CONTENT_CHARS: usize = 3000;

pub fn post_schema() -> Value {
    let pillars: Vec<&str> = Pillar::ALL.iter().map(|p| p.name()).collect();
    json!({
        "type": "object",
        "required": ["id", "title", "pillar", "content"],
        "properties": {
            "id": { "type": "integer", "minimum": 1 },
            "title": { "type": "string", "minLength": 1 },
            "pillar": { "enum": pillars },
            "status": { "enum": ["ready", "review"] },
            "content": {
                "type": "string",
                "minLength": MIN_CONTENT_CHARS,
                "maxLength": MAX_CONTENT_CHARS
            }
        }
    })
}

/// Schema for a complete library, with per-platform post-count bounds.
pub fn library_schema() -> Value {
    let mut properties = Map::new();
    for platform in PlatformId::ALL {
        let spec = platform_spec(platform);
        properties.insert(
            platform.as_str().to_string(),
            json!({
                "type": "array",
                "items": post_schema(),
                "minItems": spec.min_posts,
                "maxItems": spec.max_posts
            }),
        );
    }
    let required: Vec<&str> = PlatformId::ALL.iter().map(|p| p.as_str()).collect();

    json!({
        "type": "object",
        "required": required,
        "properties": properties
    })
}

// "/linkedin/0/content" -> "linkedin.0.content"
fn dotted_path(pointer: &str) -> String {
    pointer.trim_start_matches('/').replace('/', ".")
}

fn validate_against(schema: &Value, instance: &Value) -> Result<(), Vec<String>> {
    let compiled = JSONSchema::compile(schema).map_err(|e| vec![format!("invalid schema: {}", e)])?;

    let result = compiled.validate(instance);
    match result {
        Ok(()) => Ok(()),
        Err(errors) => Err(errors
            .map(|e| {
                let path = dotted_path(&e.instance_path.to_string());
                format!("{}: {}", path, e)
            })
            .collect()),
    }
}

/// Validate a full library reply and return it typed.
pub fn validate_generated_content(value: &Value) -> Result<GeneratedContent, Vec<String>> {
    validate_against(&library_schema(), value)?;
    serde_json::from_value(value.clone()).map_err(|e| vec![e.to_string()])
}

pub fn validate_post(value: &Value) -> Result<Post, Vec<String>> {
    validate_against(&post_schema(), value)?;
    serde_json::from_value(value.clone()).map_err(|e| vec![e.to_string()])
}

fn recover_post(index: usize, raw: &Value) -> Option<Post> {
    let fields = raw.as_object()?;

    let id = fields
        .get("id")
        .and_then(Value::as_u64)
        .unwrap_or(index as u64 + 1);
    let title = fields
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Untitled")
        .to_string();
    let pillar = fields
        .get("pillar")
        .and_then(Value::as_str)
        .and_then(normalize_pillar)
        .unwrap_or(Pillar::ProductJourney);
    let status = match fields.get("status").and_then(Value::as_str) {
        Some("review") => PostStatus::Review,
        _ => PostStatus::Ready,
    };
    let content = fields
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if content.is_empty() {
        return None;
    }

    Some(Post { id, title, pillar, status, content })
}

/// Rebuild a library leniently after it failed validation.
///
/// Posts without content are dropped. Returns `None` when nothing usable is
/// left on any platform.
pub fn recover_partial_content(value: &Value) -> Option<GeneratedContent> {
    let fields = value.as_object()?;
    let mut recovered = GeneratedContent::default();

    for platform in PlatformId::ALL {
        if let Some(Value::Array(posts)) = fields.get(platform.as_str()) {
            *recovered.posts_mut(platform) = posts
                .iter()
                .enumerate()
                .filter_map(|(index, raw)| recover_post(index, raw))
                .collect();
        }
    }

    if recovered.total_posts() == 0 {
        None
    } else {
        Some(recovered)
    }
}

/// Tidy a single post and check it again.
pub fn repair_post(raw: &Value, index: usize) -> Option<Post> {
    let fields = raw.as_object()?;
    let trimmed = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let mut title = trimmed("title");
    if title.is_empty() {
        title = "Untitled Post".to_string();
    }
    let pillar = fields
        .get("pillar")
        .and_then(Value::as_str)
        .and_then(normalize_pillar)
        .unwrap_or(Pillar::ProductJourney);
    let status = match trimmed("status").as_str() {
        "review" => PostStatus::Review,
        _ => PostStatus::Ready,
    };

    let repaired = json!({
        "id": fields.get("id").and_then(Value::as_u64).unwrap_or(index as u64 + 1),
        "title": title,
        "pillar": pillar,
        "status": status,
        "content": trimmed("content"),
    });

    validate_post(&repaired).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64, content: &str) -> Value {
        json!({"id": id, "title": "Title", "pillar": "Engagement", "status": "ready", "content": content})
    }

    fn platform_posts(count: usize) -> Vec<Value> {
        (1..=count as u64).map(|id| post(id, &"a".repeat(60))).collect()
    }

    fn full_library() -> Value {
        json!({
            "linkedin": platform_posts(15),
            "twitter": platform_posts(8),
            "threads": platform_posts(3),
            "email": platform_posts(4),
            "ads": platform_posts(4)
        })
    }

    #[test]
    fn test_full_library_validates() {
        let content = validate_generated_content(&full_library()).unwrap();
        assert_eq!(content.total_posts(), 34);
    }

    #[test]
    fn test_short_content_reports_dotted_path() {
        let mut library = full_library();
        library["linkedin"][0]["content"] = json!("too short");

        let errors = validate_generated_content(&library).unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("linkedin.0.content:")), "{:?}", errors);
    }

    #[test]
    fn test_post_count_bounds_enforced() {
        let mut library = full_library();
        library["threads"] = json!(platform_posts(6));
        assert!(validate_generated_content(&library).is_err());
    }

    #[test]
    fn test_recover_partial_content() {
        let reply = json!({
            "linkedin": [
                {"title": "First", "pillar": "bts", "status": "review", "content": "Short but present"},
                {"id": 9, "pillar": "unknown", "content": ""},
                "not an object",
                {"id": 4, "content": "Second"}
            ],
            "twitter": "oops"
        });

        let recovered = recover_partial_content(&reply).unwrap();
        let linkedin = recovered.posts(PlatformId::Linkedin);
        assert_eq!(linkedin.len(), 2);
        assert_eq!(linkedin[0].id, 1);
        assert_eq!(linkedin[0].pillar, Pillar::CultureBts);
        assert_eq!(linkedin[0].status, PostStatus::Review);
        assert_eq!(linkedin[1].id, 4);
        assert_eq!(linkedin[1].title, "Untitled");
        assert_eq!(linkedin[1].pillar, Pillar::ProductJourney);
        assert!(recovered.posts(PlatformId::Twitter).is_empty());
    }

    #[test]
    fn test_recover_nothing_returns_none() {
        assert!(recover_partial_content(&json!({"linkedin": []})).is_none());
        assert!(recover_partial_content(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_repair_post() {
        let raw = json!({"title": "  ", "pillar": "growth", "content": format!("  {}  ", "b".repeat(80))});
        let repaired = repair_post(&raw, 2).unwrap();
        assert_eq!(repaired.id, 3);
        assert_eq!(repaired.title, "Untitled Post");
        assert_eq!(repaired.pillar, Pillar::GrowthMetrics);
        assert_eq!(repaired.content.len(), 80);

        assert!(repair_post(&json!({"content": "tiny"}), 0).is_none());
    }
}
