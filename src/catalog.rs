use serde::Serialize;

use crate::models::{ContentLanguage, ContentTone, Industry, Pillar, PlatformId, PrimaryGoal};

/// Per-platform presentation, post-count bounds and character limits.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSpec {
    pub id: PlatformId,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Minimum number of posts in a generated library
    pub min_posts: usize,
    /// Maximum number of posts in a generated library
    pub max_posts: usize,
    /// Number of posts requested from the model
    pub target_posts: usize,
    pub optimal_chars: usize,
    pub max_chars: usize,
}

const PLATFORMS: [PlatformSpec; 5] = [
    PlatformSpec {
        id: PlatformId::Linkedin,
        name: "LinkedIn",
        icon: "Linkedin",
        color: "bg-blue-600",
        min_posts: 15,
        max_posts: 25,
        target_posts: 20,
        optimal_chars: 1300,
        max_chars: 3000,
    },
    PlatformSpec {
        id: PlatformId::Twitter,
        name: "Twitter/X",
        icon: "Twitter",
        color: "bg-black",
        min_posts: 8,
        max_posts: 15,
        target_posts: 10,
        optimal_chars: 240,
        max_chars: 280,
    },
    PlatformSpec {
        id: PlatformId::Threads,
        name: "Threads",
        icon: "MessageCircle",
        color: "bg-purple-600",
        min_posts: 3,
        max_posts: 5,
        target_posts: 3,
        optimal_chars: 400,
        max_chars: 500,
    },
    PlatformSpec {
        id: PlatformId::Email,
        name: "Email",
        icon: "Mail",
        color: "bg-green-600",
        min_posts: 4,
        max_posts: 6,
        target_posts: 5,
        optimal_chars: 1500,
        max_chars: 2500,
    },
    PlatformSpec {
        id: PlatformId::Ads,
        name: "Ad Copy",
        icon: "Megaphone",
        color: "bg-orange-500",
        min_posts: 4,
        max_posts: 6,
        target_posts: 5,
        optimal_chars: 90,
        max_chars: 125,
    },
];

pub fn platforms() -> &'static [PlatformSpec] {
    &PLATFORMS
}

pub fn platform_spec(platform: PlatformId) -> &'static PlatformSpec {
    match platform {
        PlatformId::Linkedin => &PLATFORMS[0],
        PlatformId::Twitter => &PLATFORMS[1],
        PlatformId::Threads => &PLATFORMS[2],
        PlatformId::Email => &PLATFORMS[3],
        PlatformId::Ads => &PLATFORMS[4],
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PillarSpec {
    pub id: &'static str,
    pub name: Pillar,
    pub pct: u32,
    pub color: &'static str,
    pub desc: &'static str,
}

const PILLARS: [PillarSpec; 7] = [
    PillarSpec { id: "product", name: Pillar::ProductJourney, pct: 20, color: "bg-blue-500", desc: "Features, launches, how it works" },
    PillarSpec { id: "founder", name: Pillar::FounderStory, pct: 15, color: "bg-purple-500", desc: "Origin, vision, lessons" },
    PillarSpec { id: "metrics", name: Pillar::GrowthMetrics, pct: 15, color: "bg-green-500", desc: "Milestones, wins, traction" },
    PillarSpec { id: "insights", name: Pillar::IndustryInsights, pct: 20, color: "bg-amber-500", desc: "Trends, education" },
    PillarSpec { id: "community", name: Pillar::CommunityWins, pct: 15, color: "bg-pink-500", desc: "Customer stories" },
    PillarSpec { id: "culture", name: Pillar::CultureBts, pct: 10, color: "bg-cyan-500", desc: "Team, behind-the-scenes" },
    PillarSpec { id: "engagement", name: Pillar::Engagement, pct: 5, color: "bg-red-500", desc: "Polls, questions" },
];

pub fn pillars() -> &'static [PillarSpec] {
    &PILLARS
}

pub fn pillar_spec(pillar: Pillar) -> &'static PillarSpec {
    PILLARS
        .iter()
        .find(|spec| spec.name == pillar)
        .unwrap_or(&PILLARS[0])
}

/// Posts a pillar should get out of `total_posts`, rounded half away from zero.
pub fn target_post_count(pillar: Pillar, total_posts: usize) -> usize {
    let pct = pillar_spec(pillar).pct as f64;
    ((total_posts as f64 * pct) / 100.0).round() as usize
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToneConfig {
    pub opener: &'static str,
    pub cta: &'static str,
}

pub fn tone_config(tone: ContentTone) -> ToneConfig {
    match tone {
        ContentTone::Professional => ToneConfig { opener: "Here's what I've learned:", cta: "Thoughts?" },
        ContentTone::Casual => ToneConfig { opener: "Real talk:", cta: "What do you think?" },
        ContentTone::Bold => ToneConfig { opener: "Unpopular opinion:", cta: "Fight me on this 👇" },
        ContentTone::Educational => ToneConfig { opener: "Let me break this down:", cta: "Save this for later." },
        ContentTone::Inspiring => ToneConfig { opener: "This changed everything for me:", cta: "Your turn." },
    }
}

/// Closing call to action for each primary goal.
pub fn goal_cta(goal: PrimaryGoal) -> &'static str {
    match goal {
        PrimaryGoal::Leads => "Want to see how? Link in comments.",
        PrimaryGoal::Awareness => "Follow for more insights like this.",
        PrimaryGoal::Authority => "Agree or disagree? Let's discuss.",
        PrimaryGoal::Sales => "DM me \"INFO\" to learn more.",
        PrimaryGoal::Community => "Join our community - link in bio.",
        PrimaryGoal::Hiring => "We're hiring. Check out our careers page.",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

const fn option(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label, description: None }
}

const fn described(value: &'static str, label: &'static str, description: &'static str) -> SelectOption {
    SelectOption { value, label, description: Some(description) }
}

fn goal_option(goal: PrimaryGoal) -> SelectOption {
    match goal {
        PrimaryGoal::Leads => described("leads", "Generate Leads", "Drive signups and demo requests"),
        PrimaryGoal::Awareness => described("awareness", "Build Awareness", "Increase brand visibility"),
        PrimaryGoal::Authority => described("authority", "Establish Authority", "Position as industry expert"),
        PrimaryGoal::Sales => described("sales", "Drive Sales", "Convert prospects to customers"),
        PrimaryGoal::Community => described("community", "Build Community", "Foster engagement and loyalty"),
        PrimaryGoal::Hiring => described("hiring", "Attract Talent", "Recruit top candidates"),
    }
}

fn tone_option(tone: ContentTone) -> SelectOption {
    match tone {
        ContentTone::Professional => described("professional", "Professional", "Polished and business-focused"),
        ContentTone::Casual => described("casual", "Casual", "Friendly and conversational"),
        ContentTone::Bold => described("bold", "Bold", "Direct and opinionated"),
        ContentTone::Educational => described("educational", "Educational", "Informative and instructive"),
        ContentTone::Inspiring => described("inspiring", "Inspiring", "Motivational and uplifting"),
    }
}

pub fn goal_label(goal: PrimaryGoal) -> &'static str {
    goal_option(goal).label
}

pub fn tone_label(tone: ContentTone) -> &'static str {
    tone_option(tone).label
}

const COMPANY_SIZES: [SelectOption; 6] = [
    option("1-10", "1-10 employees"),
    option("11-50", "11-50 employees"),
    option("51-200", "51-200 employees"),
    option("201-500", "201-500 employees"),
    option("501-1000", "501-1000 employees"),
    option("1000+", "1000+ employees"),
];

const FREQUENCIES: [SelectOption; 6] = [
    option("daily", "Daily"),
    option("2-3x/week", "2-3 times per week"),
    option("weekly", "Weekly"),
    option("biweekly", "Bi-weekly"),
    option("monthly", "Monthly"),
    option("rarely", "Rarely/Never"),
];

const TEAM_SIZES: [SelectOption; 5] = [
    option("solo", "Solo founder"),
    option("2-5", "2-5 people"),
    option("6-10", "6-10 people"),
    option("11-25", "11-25 people"),
    option("26+", "26+ people"),
];

const CHANNELS: [SelectOption; 10] = [
    option("linkedin", "LinkedIn"),
    option("twitter", "Twitter/X"),
    option("instagram", "Instagram"),
    option("facebook", "Facebook"),
    option("youtube", "YouTube"),
    option("tiktok", "TikTok"),
    option("email", "Email Newsletter"),
    option("blog", "Blog/Website"),
    option("podcast", "Podcast"),
    option("none", "None currently"),
];

/// Everything the onboarding wizard renders as a choice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub industries: Vec<SelectOption>,
    pub tones: Vec<SelectOption>,
    pub goals: Vec<SelectOption>,
    pub company_sizes: Vec<SelectOption>,
    pub frequencies: Vec<SelectOption>,
    pub team_sizes: Vec<SelectOption>,
    pub channels: Vec<SelectOption>,
    pub languages: Vec<SelectOption>,
    pub platforms: Vec<PlatformSpec>,
    pub pillars: Vec<PillarSpec>,
}

pub fn form_options() -> FormOptions {
    FormOptions {
        industries: Industry::ALL
            .iter()
            .map(|industry| option(industry.as_str(), industry.label()))
            .collect(),
        tones: ContentTone::ALL.into_iter().map(tone_option).collect(),
        goals: PrimaryGoal::ALL.into_iter().map(goal_option).collect(),
        company_sizes: COMPANY_SIZES.to_vec(),
        frequencies: FREQUENCIES.to_vec(),
        team_sizes: TEAM_SIZES.to_vec(),
        channels: CHANNELS.to_vec(),
        languages: ContentLanguage::ALL
            .iter()
            .map(|lang| option(lang.code(), lang.label()))
            .collect(),
        platforms: PLATFORMS.to_vec(),
        pillars: PILLARS.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pillar_shares_sum_to_one_hundred() {
        let total: u32 = pillars().iter().map(|p| p.pct).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_target_post_count_rounds() {
        assert_eq!(target_post_count(Pillar::ProductJourney, 43), 9);
        assert_eq!(target_post_count(Pillar::Engagement, 10), 1);
        assert_eq!(target_post_count(Pillar::CultureBts, 0), 0);
    }

    #[test]
    fn test_platform_lookup_matches_table() {
        for spec in platforms() {
            assert_eq!(platform_spec(spec.id).name, spec.name);
            assert!(spec.min_posts <= spec.target_posts && spec.target_posts <= spec.max_posts);
        }
        assert_eq!(platform_spec(PlatformId::Twitter).max_chars, 280);
    }

    #[test]
    fn test_form_options_cover_every_enum() {
        let options = form_options();
        assert_eq!(options.industries.len(), Industry::ALL.len());
        assert_eq!(options.goals[0].label, "Generate Leads");
        assert_eq!(options.languages.len(), 10);
        assert_eq!(tone_config(ContentTone::Bold).opener, "Unpopular opinion:");
    }

    #[test]
    fn test_every_goal_has_a_cta() {
        for goal in PrimaryGoal::ALL {
            assert!(!goal_cta(goal).is_empty());
        }
        assert_eq!(goal_cta(PrimaryGoal::Sales), "DM me \"INFO\" to learn more.");
    }
}
