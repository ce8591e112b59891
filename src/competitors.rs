use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Insights older than this are refreshed before reuse
pub const INSIGHTS_MAX_AGE_DAYS: i64 = 7;

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r"https?://\S+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Strength {
    pub strength: String,
    pub example: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Weakness {
    pub weakness: String,
    pub opportunity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPattern {
    pub pattern: String,
    pub frequency: String,
    pub effectiveness: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorAnalysis {
    pub competitor: String,
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
    pub content_patterns: Vec<ContentPattern>,
    pub top_performing_content: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendedAngle {
    pub angle: String,
    pub rationale: String,
    pub differentiator: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvoidItem {
    pub tactic: String,
    pub reason: String,
}

/// Result of a competitor research run, as kept by the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorInsights {
    pub competitors: Vec<CompetitorAnalysis>,
    pub recommended_angles: Vec<RecommendedAngle>,
    pub avoid_list: Vec<AvoidItem>,
    pub summary: String,
    pub generated_at: String,
}

/// Content samples collected for one competitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorSample {
    pub competitor: String,
    pub posts: Vec<String>,
}

/// Split the free-text competitor field into entries, pulling out a URL when
/// one is embedded in an entry.
pub fn parse_competitors(raw: &str) -> Vec<CompetitorInfo> {
    raw.split([',', '\n', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let website = URL_PATTERN.find(entry).map(|m| m.as_str().to_string());
            let stripped = URL_PATTERN.replace(entry, "");
            let stripped = stripped.trim();
            CompetitorInfo {
                name: if stripped.is_empty() { entry.to_string() } else { stripped.to_string() },
                website,
            }
        })
        .collect()
}

pub fn search_queries(competitor: &CompetitorInfo, industry: &str) -> Vec<String> {
    let slug = WHITESPACE
        .replace_all(&competitor.name.to_lowercase(), "-")
        .into_owned();

    let mut queries = vec![
        format!("{} {}", competitor.name, industry),
        format!("{} linkedin posts", competitor.name),
        format!("{} company updates", competitor.name),
        format!("{} product features", competitor.name),
        format!("site:linkedin.com/company/{}", slug),
    ];

    let host = competitor
        .website
        .as_deref()
        .and_then(|site| reqwest::Url::parse(site).ok())
        .and_then(|url| url.host_str().map(str::to_string));
    if let Some(host) = host {
        queries.push(format!("site:{}", host));
    }

    queries
}

/// Condense insights into a block for the generation prompt. Empty when
/// there is nothing to say.
pub fn format_insights_for_prompt(insights: &CompetitorInsights) -> String {
    if insights.competitors.is_empty() {
        return String::new();
    }

    let mut formatted = String::from("## Competitor Analysis\n\n");
    formatted.push_str(&format!("**Summary:** {}\n\n", insights.summary));
    formatted.push_str("**Competitor Content Patterns:**\n");

    for competitor in &insights.competitors {
        formatted.push_str(&format!("\n### {}\n", competitor.competitor));

        if !competitor.strengths.is_empty() {
            formatted.push_str("Strengths to learn from:\n");
            for s in competitor.strengths.iter().take(2) {
                formatted.push_str(&format!("- {}: \"{}\"\n", s.strength, s.example));
            }
        }

        if !competitor.weaknesses.is_empty() {
            formatted.push_str("Gaps to exploit:\n");
            for w in competitor.weaknesses.iter().take(2) {
                formatted.push_str(&format!("- {} → Opportunity: {}\n", w.weakness, w.opportunity));
            }
        }
    }

    if !insights.recommended_angles.is_empty() {
        formatted.push_str("\n**Recommended Differentiating Angles:**\n");
        for angle in insights.recommended_angles.iter().take(3) {
            formatted.push_str(&format!("- {}: {}\n", angle.angle, angle.rationale));
        }
    }

    if !insights.avoid_list.is_empty() {
        formatted.push_str("\n**Tactics to Avoid:**\n");
        for avoid in insights.avoid_list.iter().take(3) {
            formatted.push_str(&format!("- Don't {}: {}\n", avoid.tactic, avoid.reason));
        }
    }

    formatted
}

/// Missing insights, or insights with an unreadable timestamp, count as stale.
pub fn are_insights_stale(insights: Option<&CompetitorInsights>, now: DateTime<Utc>) -> bool {
    let Some(insights) = insights else {
        return true;
    };

    match DateTime::parse_from_rfc3339(&insights.generated_at) {
        Ok(generated_at) => now.signed_duration_since(generated_at) > Duration::days(INSIGHTS_MAX_AGE_DAYS),
        Err(_) => true,
    }
}

/// Reply to the sample-analysis prompt, which lists strengths and
/// weaknesses flat with the competitor named on each entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleAnalysis {
    pub competitor_strengths: Vec<AttributedStrength>,
    pub competitor_weaknesses: Vec<AttributedWeakness>,
    pub content_patterns: Vec<ContentPattern>,
    pub recommended_angles: Vec<RecommendedAngle>,
    pub avoid_list: Vec<AvoidItem>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttributedStrength {
    pub competitor: String,
    pub strength: String,
    pub example: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttributedWeakness {
    pub competitor: String,
    pub weakness: String,
    pub opportunity: String,
}

impl SampleAnalysis {
    /// Group the flat lists per competitor. Competitors are kept in the order
    /// given, followed by any extra names the reply introduced. Shared content
    /// patterns are attached to every competitor.
    pub fn into_insights(self, competitors: &[String], generated_at: String) -> CompetitorInsights {
        let mut analyses: Vec<CompetitorAnalysis> = competitors
            .iter()
            .map(|name| CompetitorAnalysis { competitor: name.clone(), ..Default::default() })
            .collect();

        fn entry<'a>(analyses: &'a mut Vec<CompetitorAnalysis>, name: &str) -> &'a mut CompetitorAnalysis {
            let index = match analyses.iter().position(|a| a.competitor.eq_ignore_ascii_case(name)) {
                Some(index) => index,
                None => {
                    analyses.push(CompetitorAnalysis { competitor: name.to_string(), ..Default::default() });
                    analyses.len() - 1
                }
            };
            &mut analyses[index]
        }

        for s in self.competitor_strengths {
            entry(&mut analyses, &s.competitor)
                .strengths
                .push(Strength { strength: s.strength, example: s.example });
        }
        for w in self.competitor_weaknesses {
            entry(&mut analyses, &w.competitor)
                .weaknesses
                .push(Weakness { weakness: w.weakness, opportunity: w.opportunity });
        }
        for analysis in &mut analyses {
            analysis.content_patterns = self.content_patterns.clone();
        }

        CompetitorInsights {
            competitors: analyses,
            recommended_angles: self.recommended_angles,
            avoid_list: self.avoid_list,
            summary: self.summary,
            generated_at,
        }
    }
}
