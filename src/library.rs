use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::models::{AppData, GeneratedContent, Pillar, PlatformId, PostStatus};

pub const CSV_HEADER: [&str; 6] = ["Platform", "ID", "Title", "Pillar", "Status", "Content"];
pub const EXPORT_VERSION: &str = "1.0";

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlatformStats {
    pub total: usize,
    pub ready: usize,
    pub review: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarShare {
    pub pillar: Pillar,
    pub count: usize,
    pub percentage: u32,
}

/// Dashboard summary of a content library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub total_posts: usize,
    pub by_platform: BTreeMap<PlatformId, PlatformStats>,
    pub by_pillar: Vec<PillarShare>,
    pub ready_count: usize,
    pub review_count: usize,
}

pub fn content_stats(content: &GeneratedContent) -> ContentStats {
    let mut by_platform = BTreeMap::new();
    let mut pillar_counts: Vec<(Pillar, usize)> = Vec::new();
    let mut ready_count = 0;
    let mut review_count = 0;

    for (platform, posts) in content.by_platform() {
        let mut stats = PlatformStats { total: posts.len(), ..PlatformStats::default() };

        for post in posts {
            match post.status {
                PostStatus::Ready => stats.ready += 1,
                PostStatus::Review => stats.review += 1,
            }

            // Pillars are listed in the order they first appear
            match pillar_counts.iter_mut().find(|(p, _)| *p == post.pillar) {
                Some((_, count)) => *count += 1,
                None => pillar_counts.push((post.pillar, 1)),
            }
        }

        ready_count += stats.ready;
        review_count += stats.review;
        by_platform.insert(platform, stats);
    }

    let total_posts = ready_count + review_count;
    let by_pillar = pillar_counts
        .into_iter()
        .map(|(pillar, count)| PillarShare {
            pillar,
            count,
            percentage: ((count as f64 / total_posts as f64) * 100.0).round() as u32,
        })
        .collect();

    ContentStats { total_posts, by_platform, by_pillar, ready_count, review_count }
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_row<'a, I: IntoIterator<Item = &'a str>>(cells: I) -> String {
    cells.into_iter().map(csv_cell).collect::<Vec<_>>().join(",")
}

/// Every post as one CSV row; all cells are quoted.
pub fn export_csv(content: &GeneratedContent) -> String {
    let mut rows = vec![csv_row(CSV_HEADER)];

    for (platform, posts) in content.by_platform() {
        for post in posts {
            let id = post.id.to_string();
            let flattened = post.content.replace('\n', " ");
            rows.push(csv_row([
                platform.as_str(),
                id.as_str(),
                post.title.as_str(),
                post.pillar.name(),
                post.status.as_str(),
                flattened.as_str(),
            ]));
        }
    }

    rows.join("\n")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentExport<'a> {
    pub export_date: String,
    pub company: &'a str,
    pub content: &'a GeneratedContent,
    pub summary: BTreeMap<PlatformId, usize>,
}

pub fn export_json<'a>(content: &'a GeneratedContent, company: &'a str, now: DateTime<Utc>) -> ContentExport<'a> {
    ContentExport {
        export_date: now.to_rfc3339(),
        company,
        content,
        summary: content
            .by_platform()
            .map(|(platform, posts)| (platform, posts.len()))
            .collect(),
    }
}

/// Check the shape of an uploaded backup before trusting it.
pub fn validate_import(value: &Value) -> Result<AppData, String> {
    let obj = value.as_object().ok_or("Import must be a JSON object")?;

    if !obj.get("formData").is_some_and(Value::is_object) {
        return Err("formData must be an object".to_string());
    }

    let content = obj
        .get("generatedContent")
        .and_then(Value::as_object)
        .ok_or("generatedContent must be an object")?;

    for platform in PlatformId::ALL {
        if !content.get(platform.as_str()).is_some_and(Value::is_array) {
            return Err(format!("generatedContent.{} must be an array", platform));
        }
    }

    if !obj.get("readyState").is_some_and(Value::is_boolean) {
        return Err("readyState must be a boolean".to_string());
    }

    serde_json::from_value(value.clone()).map_err(|e| format!("Invalid import data: {}", e))
}

/// Download name for an export, e.g. `acme-inc-content-library-1700000000000.csv`.
pub fn export_filename(company: &str, extension: &str, now: DateTime<Utc>) -> String {
    let slug = UNSAFE_FILENAME_CHARS.replace_all(company.trim(), "-");
    let slug = slug.trim_matches('-').to_lowercase();
    let slug = if slug.is_empty() { "gtm-content-engine".to_string() } else { slug };
    format!("{}-content-library-{}.{}", slug, now.timestamp_millis(), extension)
}
