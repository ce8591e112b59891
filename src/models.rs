use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// Industry options for company classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Saas,
    Agency,
    Ecommerce,
    Fintech,
    Healthtech,
    Edtech,
    Marketplace,
    Coaching,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 9] = [
        Industry::Saas,
        Industry::Agency,
        Industry::Ecommerce,
        Industry::Fintech,
        Industry::Healthtech,
        Industry::Edtech,
        Industry::Marketplace,
        Industry::Coaching,
        Industry::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Saas => "saas",
            Industry::Agency => "agency",
            Industry::Ecommerce => "ecommerce",
            Industry::Fintech => "fintech",
            Industry::Healthtech => "healthtech",
            Industry::Edtech => "edtech",
            Industry::Marketplace => "marketplace",
            Industry::Coaching => "coaching",
            Industry::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Industry::Saas => "B2B SaaS",
            Industry::Agency => "Agency / Consulting",
            Industry::Ecommerce => "E-commerce",
            Industry::Fintech => "Fintech",
            Industry::Healthtech => "Healthtech",
            Industry::Edtech => "Edtech",
            Industry::Marketplace => "Marketplace",
            Industry::Coaching => "Coaching / Info Products",
            Industry::Other => "Other",
        }
    }
}

// Content tone options affecting generated content style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTone {
    Professional,
    Casual,
    Bold,
    Educational,
    Inspiring,
}

impl ContentTone {
    pub const ALL: [ContentTone; 5] = [
        ContentTone::Professional,
        ContentTone::Casual,
        ContentTone::Bold,
        ContentTone::Educational,
        ContentTone::Inspiring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTone::Professional => "professional",
            ContentTone::Casual => "casual",
            ContentTone::Bold => "bold",
            ContentTone::Educational => "educational",
            ContentTone::Inspiring => "inspiring",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| tone.as_str() == value)
    }
}

// Primary business goal for content strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryGoal {
    Leads,
    Awareness,
    Authority,
    Sales,
    Community,
    Hiring,
}

impl PrimaryGoal {
    pub const ALL: [PrimaryGoal; 6] = [
        PrimaryGoal::Leads,
        PrimaryGoal::Awareness,
        PrimaryGoal::Authority,
        PrimaryGoal::Sales,
        PrimaryGoal::Community,
        PrimaryGoal::Hiring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryGoal::Leads => "leads",
            PrimaryGoal::Awareness => "awareness",
            PrimaryGoal::Authority => "authority",
            PrimaryGoal::Sales => "sales",
            PrimaryGoal::Community => "community",
            PrimaryGoal::Hiring => "hiring",
        }
    }
}

/// Target content channel. Each platform has its own length and style
/// conventions, see [`crate::catalog::platform_spec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Linkedin,
    Twitter,
    Threads,
    Email,
    Ads,
}

impl PlatformId {
    pub const ALL: [PlatformId; 5] = [
        PlatformId::Linkedin,
        PlatformId::Twitter,
        PlatformId::Threads,
        PlatformId::Email,
        PlatformId::Ads,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Linkedin => "linkedin",
            PlatformId::Twitter => "twitter",
            PlatformId::Threads => "threads",
            PlatformId::Email => "email",
            PlatformId::Ads => "ads",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|platform| platform.as_str() == value)
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Supported content languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLanguage {
    En,
    Es,
    Fr,
    De,
    Pt,
    It,
    Nl,
    Ja,
    Ko,
    Zh,
}

impl ContentLanguage {
    pub const ALL: [ContentLanguage; 10] = [
        ContentLanguage::En,
        ContentLanguage::Es,
        ContentLanguage::Fr,
        ContentLanguage::De,
        ContentLanguage::Pt,
        ContentLanguage::It,
        ContentLanguage::Nl,
        ContentLanguage::Ja,
        ContentLanguage::Ko,
        ContentLanguage::Zh,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ContentLanguage::En => "en",
            ContentLanguage::Es => "es",
            ContentLanguage::Fr => "fr",
            ContentLanguage::De => "de",
            ContentLanguage::Pt => "pt",
            ContentLanguage::It => "it",
            ContentLanguage::Nl => "nl",
            ContentLanguage::Ja => "ja",
            ContentLanguage::Ko => "ko",
            ContentLanguage::Zh => "zh",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentLanguage::En => "English",
            ContentLanguage::Es => "Spanish",
            ContentLanguage::Fr => "French",
            ContentLanguage::De => "German",
            ContentLanguage::Pt => "Portuguese",
            ContentLanguage::It => "Italian",
            ContentLanguage::Nl => "Dutch",
            ContentLanguage::Ja => "Japanese",
            ContentLanguage::Ko => "Korean",
            ContentLanguage::Zh => "Chinese",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == value)
    }
}

/// Thematic bucket used to classify generated posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pillar {
    #[serde(rename = "Product Journey")]
    ProductJourney,
    #[serde(rename = "Founder Story")]
    FounderStory,
    #[serde(rename = "Growth Metrics")]
    GrowthMetrics,
    #[serde(rename = "Industry Insights")]
    IndustryInsights,
    #[serde(rename = "Community Wins")]
    CommunityWins,
    #[serde(rename = "Culture/BTS")]
    CultureBts,
    #[serde(rename = "Engagement")]
    Engagement,
}

impl Pillar {
    pub const ALL: [Pillar; 7] = [
        Pillar::ProductJourney,
        Pillar::FounderStory,
        Pillar::GrowthMetrics,
        Pillar::IndustryInsights,
        Pillar::CommunityWins,
        Pillar::CultureBts,
        Pillar::Engagement,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pillar::ProductJourney => "Product Journey",
            Pillar::FounderStory => "Founder Story",
            Pillar::GrowthMetrics => "Growth Metrics",
            Pillar::IndustryInsights => "Industry Insights",
            Pillar::CommunityWins => "Community Wins",
            Pillar::CultureBts => "Culture/BTS",
            Pillar::Engagement => "Engagement",
        }
    }

    // Short id used by the dashboard
    pub fn id(&self) -> &'static str {
        match self {
            Pillar::ProductJourney => "product",
            Pillar::FounderStory => "founder",
            Pillar::GrowthMetrics => "metrics",
            Pillar::IndustryInsights => "insights",
            Pillar::CommunityWins => "community",
            Pillar::CultureBts => "culture",
            Pillar::Engagement => "engagement",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pillar| pillar.name() == name)
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Ready,
    Review,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Ready => "ready",
            PostStatus::Review => "review",
        }
    }
}

// Main form data structure collected during onboarding.
// Wizard fields stay plain strings: the dashboard may hold half-filled values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    // Step 1: Company
    pub company_name: String,
    pub website: String,
    pub industry: String,
    pub product_description: String,
    pub logo: String,

    // Step 2: Audience
    pub target_audience: String,
    pub job_titles: String,
    pub company_size: String,
    pub pain_points: String,

    // Step 3: Positioning
    pub unique_value: String,
    pub key_benefits: String,
    pub competitors: String,
    pub pricing_model: String,

    // Step 4: Current State
    pub current_channels: Vec<String>,
    pub content_frequency: String,
    pub team_size: String,

    // Step 5: Goals
    pub primary_goal: String,
    pub content_tone: String,
    pub target_platforms: Vec<String>,

    pub content_language: Option<String>,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            website: String::new(),
            industry: String::new(),
            product_description: String::new(),
            logo: String::new(),
            target_audience: String::new(),
            job_titles: String::new(),
            company_size: String::new(),
            pain_points: String::new(),
            unique_value: String::new(),
            key_benefits: String::new(),
            competitors: String::new(),
            pricing_model: String::new(),
            current_channels: Vec::new(),
            content_frequency: String::new(),
            team_size: String::new(),
            primary_goal: String::new(),
            content_tone: String::new(),
            target_platforms: Vec::new(),
            content_language: Some("en".to_string()),
        }
    }
}

impl FormData {
    pub fn language(&self) -> ContentLanguage {
        self.content_language
            .as_deref()
            .and_then(ContentLanguage::parse)
            .unwrap_or(ContentLanguage::En)
    }

    pub fn tone(&self) -> Option<ContentTone> {
        ContentTone::parse(&self.content_tone)
    }
}

// Individual content post structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub pillar: Pillar,
    #[serde(default)]
    pub status: PostStatus,
    pub content: String,
}

// Generated content organized by platform
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratedContent {
    pub linkedin: Vec<Post>,
    pub twitter: Vec<Post>,
    pub threads: Vec<Post>,
    pub email: Vec<Post>,
    pub ads: Vec<Post>,
}

impl GeneratedContent {
    pub fn posts(&self, platform: PlatformId) -> &[Post] {
        match platform {
            PlatformId::Linkedin => &self.linkedin,
            PlatformId::Twitter => &self.twitter,
            PlatformId::Threads => &self.threads,
            PlatformId::Email => &self.email,
            PlatformId::Ads => &self.ads,
        }
    }

    pub fn posts_mut(&mut self, platform: PlatformId) -> &mut Vec<Post> {
        match platform {
            PlatformId::Linkedin => &mut self.linkedin,
            PlatformId::Twitter => &mut self.twitter,
            PlatformId::Threads => &mut self.threads,
            PlatformId::Email => &mut self.email,
            PlatformId::Ads => &mut self.ads,
        }
    }

    /// Platforms in dashboard order together with their posts.
    pub fn by_platform(&self) -> impl Iterator<Item = (PlatformId, &[Post])> {
        PlatformId::ALL
            .into_iter()
            .map(move |platform| (platform, self.posts(platform)))
    }

    pub fn total_posts(&self) -> usize {
        self.by_platform().map(|(_, posts)| posts.len()).sum()
    }
}

// App data structure for import/export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub form_data: FormData,
    pub generated_content: GeneratedContent,
    #[serde(default)]
    pub daily_tasks: BTreeMap<u32, bool>,
    pub ready_state: bool,
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_data_accepts_partial_payload() {
        let form: FormData = serde_json::from_value(json!({
            "companyName": "Acme",
            "targetPlatforms": ["linkedin", "email"]
        }))
        .unwrap();

        assert_eq!(form.company_name, "Acme");
        assert_eq!(form.target_platforms, vec!["linkedin", "email"]);
        assert!(form.website.is_empty());
        assert_eq!(form.language(), ContentLanguage::En);
    }

    #[test]
    fn test_pillar_uses_display_names_on_the_wire() {
        let post: Post = serde_json::from_value(json!({
            "id": 3,
            "title": "Behind the build",
            "pillar": "Culture/BTS",
            "content": "x"
        }))
        .unwrap();

        assert_eq!(post.pillar, Pillar::CultureBts);
        assert_eq!(post.status, PostStatus::Ready);
        assert_eq!(serde_json::to_value(post.pillar).unwrap(), json!("Culture/BTS"));
    }

    #[test]
    fn test_app_data_daily_tasks_keys_are_numeric() {
        let data: AppData = serde_json::from_value(json!({
            "formData": {},
            "generatedContent": {},
            "dailyTasks": {"1": true, "7": false},
            "readyState": true
        }))
        .unwrap();

        assert_eq!(data.daily_tasks.get(&1), Some(&true));
        assert_eq!(data.daily_tasks.get(&7), Some(&false));
    }

    #[test]
    fn test_generated_content_counts_every_platform() {
        let mut content = GeneratedContent::default();
        let post = Post {
            id: 1,
            title: "Hello".to_string(),
            pillar: Pillar::Engagement,
            status: PostStatus::Review,
            content: "Body".to_string(),
        };
        content.posts_mut(PlatformId::Ads).push(post.clone());
        content.posts_mut(PlatformId::Twitter).push(post);

        assert_eq!(content.total_posts(), 2);
        assert_eq!(content.posts(PlatformId::Ads).len(), 1);
    }
}
