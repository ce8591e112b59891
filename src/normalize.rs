use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{ContentTone, Industry, Pillar, PrimaryGoal};

pub fn normalize_pillar(value: &str) -> Option<Pillar> {
    let pillar = match value.trim().to_lowercase().as_str() {
        "product" | "product journey" => Pillar::ProductJourney,
        "founder" | "founder story" => Pillar::FounderStory,
        "metrics" | "growth metrics" | "growth" => Pillar::GrowthMetrics,
        "insights" | "industry insights" | "industry" => Pillar::IndustryInsights,
        "community" | "community wins" => Pillar::CommunityWins,
        "culture" | "culture/bts" | "bts" => Pillar::CultureBts,
        "engagement" => Pillar::Engagement,
        _ => return None,
    };
    Some(pillar)
}

pub fn normalize_industry(value: &str) -> Industry {
    match value.trim().to_lowercase().as_str() {
        "b2b saas" | "saas" | "software" | "software as a service" => Industry::Saas,
        "agency" | "consulting" | "agency / consulting" => Industry::Agency,
        "ecommerce" | "e-commerce" | "retail" => Industry::Ecommerce,
        "fintech" | "financial technology" | "finance" => Industry::Fintech,
        "healthtech" | "health tech" | "healthcare" => Industry::Healthtech,
        "edtech" | "ed tech" | "education" => Industry::Edtech,
        "marketplace" | "platform" => Industry::Marketplace,
        "coaching" | "info products" | "coaching / info products" => Industry::Coaching,
        _ => Industry::Other,
    }
}

pub fn normalize_goal(value: &str) -> Option<PrimaryGoal> {
    let goal = match value.trim().to_lowercase().as_str() {
        "leads" | "generate leads" | "lead generation" => PrimaryGoal::Leads,
        "awareness" | "build awareness" | "brand awareness" => PrimaryGoal::Awareness,
        "authority" | "establish authority" | "thought leadership" => PrimaryGoal::Authority,
        "sales" | "drive sales" | "revenue" => PrimaryGoal::Sales,
        "community" | "build community" | "engagement" => PrimaryGoal::Community,
        "hiring" | "attract talent" | "recruitment" => PrimaryGoal::Hiring,
        _ => return None,
    };
    Some(goal)
}

pub fn normalize_tone(value: &str) -> ContentTone {
    match value.trim().to_lowercase().as_str() {
        "casual" | "friendly" | "conversational" => ContentTone::Casual,
        "bold" | "contrarian" | "bold & contrarian" | "provocative" => ContentTone::Bold,
        "educational" | "informative" | "teaching" => ContentTone::Educational,
        "inspiring" | "inspirational" | "motivational" => ContentTone::Inspiring,
        _ => ContentTone::Professional,
    }
}

/// Company profile fields the research endpoint fills in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutofillProfile {
    pub product_description: String,
    pub target_audience: String,
    pub job_titles: String,
    pub pain_points: String,
    pub unique_value: String,
    pub key_benefits: String,
    pub competitors: String,
    pub industry: String,
    pub company_size: String,
    pub primary_goal: String,
    pub content_tone: String,
}

pub const AUTOFILL_FIELDS: [&str; 11] = [
    "productDescription",
    "targetAudience",
    "jobTitles",
    "painPoints",
    "uniqueValue",
    "keyBenefits",
    "competitors",
    "industry",
    "companySize",
    "primaryGoal",
    "contentTone",
];

/// Map free-form industry, goal and tone values onto the known options.
/// Empty values are left alone; an unrecognised goal is dropped.
pub fn normalize_autofill(fields: &mut Map<String, Value>) {
    fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        fields.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    if let Some(industry) = present(fields, "industry") {
        let normalized = normalize_industry(industry);
        fields.insert("industry".to_string(), Value::from(normalized.as_str()));
    }
    if let Some(goal) = present(fields, "primaryGoal") {
        match normalize_goal(goal) {
            Some(goal) => {
                fields.insert("primaryGoal".to_string(), Value::from(goal.as_str()));
            }
            None => {
                fields.remove("primaryGoal");
            }
        }
    }
    if let Some(tone) = present(fields, "contentTone") {
        let normalized = normalize_tone(tone);
        fields.insert("contentTone".to_string(), Value::from(normalized.as_str()));
    }
}

/// Check a normalised research reply, returning `path: message` errors.
pub fn validate_autofill(fields: &Map<String, Value>) -> Result<AutofillProfile, Vec<String>> {
    let mut errors = Vec::new();

    for field in AUTOFILL_FIELDS {
        match fields.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(value)) => {
                let min_len = matches!(field, "productDescription" | "targetAudience");
                if min_len && value.chars().count() < 10 {
                    errors.push(format!(
                        "{}: String must contain at least 10 character(s)",
                        field
                    ));
                }
                let known = match field {
                    "industry" => Industry::ALL.iter().any(|i| i.as_str() == value),
                    "primaryGoal" => PrimaryGoal::ALL.iter().any(|g| g.as_str() == value),
                    "contentTone" => ContentTone::parse(value).is_some(),
                    _ => true,
                };
                if !known {
                    errors.push(format!("{}: Invalid enum value '{}'", field, value));
                }
            }
            Some(_) => errors.push(format!("{}: Expected string", field)),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut cleaned = fields.clone();
    cleaned.retain(|key, value| AUTOFILL_FIELDS.contains(&key.as_str()) && !value.is_null());
    serde_json::from_value(Value::Object(cleaned)).map_err(|e| vec![e.to_string()])
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completeness {
    pub percentage: u32,
    pub filled_fields: Vec<String>,
    pub missing_fields: Vec<String>,
}

pub fn calculate_completeness(fields: &Map<String, Value>) -> Completeness {
    let mut filled_fields = Vec::new();
    let mut missing_fields = Vec::new();

    for field in AUTOFILL_FIELDS {
        let filled = match fields.get(field) {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Null) | None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => !other.to_string().trim().is_empty(),
        };
        if filled {
            filled_fields.push(field.to_string());
        } else {
            missing_fields.push(field.to_string());
        }
    }

    let percentage =
        ((filled_fields.len() as f64 / AUTOFILL_FIELDS.len() as f64) * 100.0).round() as u32;

    Completeness { percentage, filled_fields, missing_fields }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Excellent,
    Good,
    Partial,
    Limited,
}

impl DataQuality {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => DataQuality::Excellent,
            70.. => DataQuality::Good,
            40.. => DataQuality::Partial,
            _ => DataQuality::Limited,
        }
    }
}
