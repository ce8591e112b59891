//! Prompt builders for every LLM-backed operation.
//!
//! Each builder is a pure function of its inputs so the exact text sent to the
//! provider can be asserted in tests.

use crate::catalog::{pillars, platform_spec, tone_config};
use crate::competitors::CompetitorSample;
use crate::models::{ContentLanguage, FormData, Pillar, PlatformId};

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

fn language_guidelines(language: ContentLanguage) -> &'static str {
    match language {
        ContentLanguage::En => "",
        ContentLanguage::Es => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural Spanish (Español)
- Use appropriate regional neutral Spanish that works across Latin America and Spain
- Adapt idioms and expressions to feel natural in Spanish
- Maintain professional tone while respecting Spanish linguistic conventions"
        }
        ContentLanguage::Fr => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural French (Français)
- Use modern, professional French appropriate for business communication
- Adapt expressions to feel natural for French-speaking audiences
- Maintain the formal \"vous\" form for professional content"
        }
        ContentLanguage::De => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural German (Deutsch)
- Use Sie-form for professional tone
- Adapt expressions to feel natural for German-speaking markets
- Follow German conventions for business communication"
        }
        ContentLanguage::Pt => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural Portuguese (Português)
- Use Brazilian Portuguese style unless specified otherwise
- Adapt expressions to feel natural for Portuguese-speaking audiences
- Maintain professional tone with appropriate formality"
        }
        ContentLanguage::It => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural Italian (Italiano)
- Use appropriate formal register for professional content
- Adapt expressions to feel natural for Italian audiences
- Follow Italian business communication conventions"
        }
        ContentLanguage::Nl => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural Dutch (Nederlands)
- Use appropriate professional tone for business communication
- Adapt expressions to feel natural for Dutch-speaking audiences"
        }
        ContentLanguage::Ja => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural Japanese (日本語)
- Use appropriate politeness levels (丁寧語) for professional content
- Adapt to Japanese business communication conventions
- Consider cultural context and expression styles"
        }
        ContentLanguage::Ko => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural Korean (한국어)
- Use appropriate honorifics and politeness levels for business
- Adapt expressions to Korean business communication style
- Consider cultural nuances in content presentation"
        }
        ContentLanguage::Zh => {
            "
## LANGUAGE REQUIREMENTS
- Write ALL content in fluent, natural Simplified Chinese (简体中文)
- Use appropriate formal register for professional content
- Adapt expressions to feel natural for Chinese audiences
- Consider cultural context and business communication norms"
        }
    }
}

fn pillar_guidelines(pillar: Pillar) -> &'static str {
    match pillar {
        Pillar::ProductJourney => "Product-focused content: feature announcements, how the product works, use cases, product updates, behind-the-scenes of building. Focus on solving real problems.",
        Pillar::FounderStory => "Personal founder narrative: origin story, lessons learned, failures and pivots, vision for the future, personal struggles and wins. Be authentic and vulnerable.",
        Pillar::GrowthMetrics => "Traction and milestones: revenue updates, user growth, key wins, fundraising news, team growth. Use specific numbers when possible.",
        Pillar::IndustryInsights => "Thought leadership: market trends, industry analysis, predictions, educational content, hot takes on industry news. Position as an expert.",
        Pillar::CommunityWins => "Customer success stories: testimonials, case studies, user achievements, community highlights. Let customers be the hero.",
        Pillar::CultureBts => "Company culture: team highlights, office/remote life, hiring updates, values in action, day-in-the-life content. Show the human side.",
        Pillar::Engagement => "Interactive content: polls, questions, debates, fill-in-the-blank, hot takes that invite discussion. Optimize for comments.",
    }
}

// Writing guidelines used when generating fresh content
fn platform_guidelines(platform: PlatformId) -> &'static str {
    match platform {
        PlatformId::Linkedin => {
            "
- Professional but personable tone
- Hook in first line (pattern interrupt, bold statement, or question)
- Use line breaks for readability (no walls of text)
- 1300-1500 characters ideal, max 3000
- End with a question or clear CTA
- Avoid hashtags in body, add 3-5 relevant ones at the end
- Use \"I\" statements for authenticity"
        }
        PlatformId::Twitter => {
            "
- Punchy, concise, high-impact
- Max 280 characters per tweet
- Hook must grab attention immediately
- Use threads for longer narratives (mark as \"1/\" etc)
- Conversational tone, no corporate speak
- Strategic use of emojis (1-2 max)
- No hashtags in main text unless trending"
        }
        PlatformId::Threads => {
            "
- Casual, authentic, Instagram-adjacent tone
- More personal and raw than LinkedIn
- Storytelling format works well
- 500 characters max per post
- Behind-the-scenes content performs well
- Emoji-friendly but not excessive"
        }
        PlatformId::Email => {
            "
- Subject line is critical (curiosity, urgency, or value)
- Personal, one-to-one feeling
- Clear single CTA per email
- Scannable with short paragraphs
- Value-first, pitch second
- 200-400 words ideal"
        }
        PlatformId::Ads => {
            "
- Lead with the biggest pain point or desire
- Specific, measurable claims when possible
- Clear value proposition in first line
- Strong CTA (Learn More, Get Started, etc)
- A/B test hooks: question vs statement vs statistic
- Keep under 125 characters for primary text"
        }
    }
}

// Shorter guidelines used when rewriting or converting an existing post
fn rewrite_guidelines(platform: PlatformId) -> &'static str {
    match platform {
        PlatformId::Linkedin => {
            "LinkedIn Guidelines:
- Professional but personal tone
- 1300-2000 characters optimal (max 3000)
- Use white space and line breaks
- Strong hook in first line
- 3-5 relevant hashtags at the end
- End with engagement driver (question or CTA)"
        }
        PlatformId::Twitter => {
            "Twitter/X Guidelines:
- 240-280 characters max
- Punchy and direct
- No hashtags or max 1-2
- Strong opening hook
- Clear single point"
        }
        PlatformId::Threads => {
            "Threads Guidelines:
- Casual, authentic tone
- 400-500 characters optimal
- Personal storytelling style
- Conversational language
- No hashtags"
        }
        PlatformId::Email => {
            "Email Guidelines:
- Personal, one-to-one feeling
- Clear single CTA
- 200-400 words optimal
- Scannable paragraphs
- Value-first approach"
        }
        PlatformId::Ads => {
            "Ad Copy Guidelines:
- Lead with pain point or desire
- Specific claims
- Under 125 characters primary text
- Clear value proposition
- Strong CTA"
        }
    }
}

fn score_criteria(platform: &str) -> &'static str {
    match platform {
        "linkedin" => {
            "LinkedIn Scoring Criteria:
- Hook: Does the first line grab attention? (pattern interrupt, question, bold statement)
- Length: Is it between 1000-2000 characters? (optimal range)
- Line breaks: Uses white space for readability?
- CTA: Clear engagement driver at the end?
- Hashtags: 3-5 relevant tags?
- Professional yet personal tone?"
        }
        "twitter" => {
            "Twitter/X Scoring Criteria:
- Hook: Immediate attention in first line
- Length: Under 280 characters per tweet
- Punchy and concise
- Clear point or value
- Minimal hashtags (0-2)"
        }
        "threads" => {
            "Threads Scoring Criteria:
- Authentic, casual tone
- Storytelling format
- Under 500 characters
- Personal perspective
- Conversational style"
        }
        "email" => {
            "Email Scoring Criteria:
- Subject line (if title) creates curiosity
- Personal, one-to-one feeling
- Clear single CTA
- Scannable paragraphs
- Value-first approach
- 200-400 words optimal"
        }
        "ads" => {
            "Ad Copy Scoring Criteria:
- Pain point or desire lead
- Specific claims
- Clear value proposition
- Strong CTA
- Under 125 characters primary text"
        }
        _ => "Standard social media best practices.",
    }
}

fn hashtag_guidelines(platform: &str) -> &'static str {
    match platform {
        "linkedin" => {
            "LinkedIn best practices:
- 3-5 hashtags maximum for best reach
- Mix of broad industry and specific niche tags
- Place at end of post, not in body
- Include at least one high-reach hashtag"
        }
        "twitter" => {
            "Twitter/X best practices:
- 1-2 hashtags maximum (more hurts engagement)
- Can be woven into content naturally
- Focus on trending or community hashtags
- Avoid hashtag spam"
        }
        "threads" => {
            "Threads best practices:
- 0-2 hashtags (platform de-emphasizes them)
- Only use if highly relevant
- Natural placement preferred"
        }
        "instagram" => {
            "Instagram best practices:
- Up to 5 hashtags for best engagement
- Mix of popular and niche
- Research competitor hashtags
- Include location if relevant"
        }
        _ => "Standard hashtag practices apply.",
    }
}

fn optional_section(title: &str, body: Option<&str>) -> String {
    match body.map(str::trim).filter(|b| !b.is_empty()) {
        Some(body) => format!("\n## {}\n{}\n", title, body),
        None => String::new(),
    }
}

/// Inputs for the full content library prompt.
#[derive(Debug, Clone, Copy)]
pub struct ContentContext<'a> {
    pub form: &'a FormData,
    pub competitor_insights: Option<&'a str>,
    pub custom_instructions: Option<&'a str>,
}

pub fn build_content_prompt(ctx: ContentContext<'_>) -> String {
    let form = ctx.form;
    let (opener, cta) = form
        .tone()
        .map(|tone| {
            let config = tone_config(tone);
            (config.opener, config.cta)
        })
        .unwrap_or(("", ""));

    let competitor_section = match ctx.competitor_insights.map(str::trim).filter(|s| !s.is_empty()) {
        Some(insights) => format!(
            "\n## COMPETITOR INSIGHTS\nUse these insights to differentiate and counter-position:\n{}\n",
            insights
        ),
        None => String::new(),
    };
    let custom_section = optional_section("CUSTOM INSTRUCTIONS", ctx.custom_instructions);

    let pillar_lines = pillars()
        .iter()
        .map(|p| format!("- **{}** ({}%): {}", p.name, p.pct, pillar_guidelines(p.name)))
        .collect::<Vec<_>>()
        .join("\n");

    let platform_sections = PlatformId::ALL
        .iter()
        .map(|&platform| {
            let spec = platform_spec(platform);
            let unit = match platform {
                PlatformId::Email => "emails",
                PlatformId::Ads => "ads",
                _ => "posts",
            };
            format!(
                "### {} ({} {})\n{}",
                spec.name,
                spec.target_posts,
                unit,
                platform_guidelines(platform)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let first_pain_point = form.pain_points.split('\n').next().unwrap_or_default();

    format!(
        r#"You are an expert B2B content strategist and copywriter. Generate a complete content library for a startup based on their company profile.

## COMPANY PROFILE

**Company:** {company}
**Website:** {website}
**Industry:** {industry}

**Product/Service:**
{product}

**Target Audience:**
{audience}
- Job Titles: {job_titles}
- Company Size: {company_size}

**Pain Points They Solve:**
{pain_points}

**Unique Value Proposition:**
{unique_value}

**Key Benefits:**
{benefits}

**Competitors:**
{competitors}

**Pricing Model:** {pricing}

**Content Tone:** {tone}
- Typical opener style: "{opener}"
- Typical CTA style: "{cta}"

**Primary Goal:** {goal}
{language}
{competitor_section}
{custom_section}
## CONTENT PILLARS
Distribute content across these pillars with approximate percentages:
{pillar_lines}

## PLATFORM REQUIREMENTS

Generate content for each platform following these guidelines:

{platform_sections}

## OUTPUT FORMAT

Return ONLY valid JSON matching this exact structure. No markdown, no explanation, just JSON:

{{
  "linkedin": [
    {{"id": 1, "title": "Brief descriptive title", "pillar": "Pillar Name", "status": "ready", "content": "Full post content here..."}}
  ],
  "twitter": [...],
  "threads": [...],
  "email": [
    {{"id": 1, "title": "Subject Line Here", "pillar": "Pillar Name", "status": "ready", "content": "Email body content..."}}
  ],
  "ads": [...]
}}

## QUALITY REQUIREMENTS

1. Every post must be SPECIFIC to {company} - no generic templates
2. Reference actual pain points: {first_pain_point}
3. Include specific benefits and value props
4. Vary the hooks - don't start every post the same way
5. Mix content pillars across platforms
6. Make LinkedIn posts 1000-2000 characters
7. Twitter posts must be under 280 characters each
8. Email subject lines should create curiosity or urgency
9. Ad copy should lead with the strongest pain point

Generate the content now:"#,
        company = form.company_name,
        website = or_default(&form.website, "Not provided"),
        industry = form.industry,
        product = form.product_description,
        audience = form.target_audience,
        job_titles = or_default(&form.job_titles, "Not specified"),
        company_size = or_default(&form.company_size, "Not specified"),
        pain_points = form.pain_points,
        unique_value = form.unique_value,
        benefits = or_default(&form.key_benefits, "Not specified"),
        competitors = or_default(&form.competitors, "Not specified"),
        pricing = or_default(&form.pricing_model, "Not specified"),
        tone = or_default(&form.content_tone, "professional"),
        opener = opener,
        cta = cta,
        goal = form.primary_goal,
        language = language_guidelines(form.language()),
        competitor_section = competitor_section,
        custom_section = custom_section,
        pillar_lines = pillar_lines,
        platform_sections = platform_sections,
        first_pain_point = first_pain_point,
    )
}

pub fn build_single_post_prompt(
    form: &FormData,
    platform: PlatformId,
    pillar: Pillar,
    current_content: Option<&str>,
    feedback: Option<&str>,
) -> String {
    format!(
        r#"You are an expert B2B content strategist. Generate a single {platform} post for {company}.

## COMPANY CONTEXT
- Product: {product}
- Audience: {audience}
- Pain Points: {pain_points}
- Value Prop: {unique_value}
- Tone: {tone}
{language}
## CONTENT PILLAR: {pillar}
{pillar_guideline}

## PLATFORM GUIDELINES ({platform_upper})
{guidelines}
{current}{feedback}
Return ONLY valid JSON:
{{"title": "Brief title", "pillar": "{pillar}", "status": "ready", "content": "Full post content..."}}"#,
        platform = platform,
        company = form.company_name,
        product = form.product_description,
        audience = form.target_audience,
        pain_points = form.pain_points,
        unique_value = form.unique_value,
        tone = or_default(&form.content_tone, "professional"),
        language = language_guidelines(form.language()),
        pillar = pillar,
        pillar_guideline = pillar_guidelines(pillar),
        platform_upper = platform.as_str().to_uppercase(),
        guidelines = platform_guidelines(platform),
        current = optional_section("CURRENT VERSION (to improve)", current_content),
        feedback = optional_section("FEEDBACK TO ADDRESS", feedback),
    )
}

pub fn build_critique_prompt(
    form: &FormData,
    content: &str,
    platform: &str,
    competitor_benchmark: Option<&str>,
) -> String {
    let benchmark = match competitor_benchmark.map(str::trim).filter(|s| !s.is_empty()) {
        Some(benchmark) => format!(
            "\n## COMPETITOR BENCHMARK\nThis is what competitors are doing well:\n{}\n",
            benchmark
        ),
        None => String::new(),
    };

    format!(
        r#"You are a harsh but constructive content critic. Review this {platform} post for {company} and provide specific, actionable feedback.

## THE POST TO CRITIQUE
{content}

## COMPANY CONTEXT
- Product: {product}
- Audience: {audience}
- Value Prop: {unique_value}
- Goal: {goal}
{benchmark}
## CRITIQUE FORMAT

Return JSON:
{{
  "overallScore": 7,
  "hookScore": 8,
  "clarityScore": 6,
  "ctaScore": 5,
  "strengths": ["What works well"],
  "weaknesses": ["What needs improvement"],
  "specificFixes": [
    {{"issue": "Problem identified", "currentText": "The problematic text", "suggestedText": "Improved version"}}
  ],
  "rewrittenVersion": "Complete rewritten post incorporating all feedback"
}}"#,
        platform = platform,
        company = form.company_name,
        content = content,
        product = form.product_description,
        audience = form.target_audience,
        unique_value = form.unique_value,
        goal = form.primary_goal,
        benchmark = benchmark,
    )
}

pub fn build_score_prompt(content: &str, platform: &str, form: &FormData) -> String {
    format!(
        r#"You are a content performance analyst. Score this {platform} post against best practices.

## POST CONTENT
{content}

## COMPANY CONTEXT
- Company: {company}
- Audience: {audience}
- Goal: {goal}
- Tone: {tone}

## PLATFORM CRITERIA
{criteria}

## SCORING RUBRIC
Score each dimension 1-10:
- **Hook (1-10)**: How attention-grabbing is the opening?
- **Clarity (1-10)**: How clear is the message?
- **Value (1-10)**: How much value does it provide to the reader?
- **CTA (1-10)**: How strong is the call-to-action or engagement driver?
- **Length (1-10)**: Is the length optimal for {platform}?
- **Readability (1-10)**: How easy is it to scan and read?

Return ONLY valid JSON:
{{
  "overallScore": 7.5,
  "breakdown": {{
    "hook": {{ "score": 8, "feedback": "Strong opening question" }},
    "clarity": {{ "score": 7, "feedback": "Message is clear but could be more focused" }},
    "value": {{ "score": 8, "feedback": "Provides actionable insight" }},
    "cta": {{ "score": 6, "feedback": "CTA could be more specific" }},
    "length": {{ "score": 9, "feedback": "Optimal length for {platform}" }},
    "readability": {{ "score": 7, "feedback": "Good use of line breaks" }}
  }},
  "quickWins": [
    "Add a specific question at the end to drive comments",
    "Shorten the second paragraph by 20%"
  ],
  "predictedPerformance": "high" | "average" | "low" | "viral",
  "platformOptimization": 85
}}"#,
        platform = platform,
        content = content,
        company = form.company_name,
        audience = form.target_audience,
        goal = or_default(&form.primary_goal, "engagement"),
        tone = or_default(&form.content_tone, "professional"),
        criteria = score_criteria(platform),
    )
}

pub fn build_hashtag_prompt(content: &str, platform: &str, form: &FormData) -> String {
    format!(
        r##"You are a social media hashtag strategist. Generate optimal hashtags for this {platform} post.

## POST CONTENT
{content}

## COMPANY CONTEXT
- Company: {company}
- Industry: {industry}
- Product: {product}
- Audience: {audience}

## PLATFORM GUIDELINES
{guidelines}

## TASK
Generate hashtag suggestions with:
1. A mix of reach levels (high, medium, niche)
2. Relevant categories
3. Platform-appropriate quantity

Return ONLY valid JSON:
{{
  "hashtags": [
    {{
      "hashtag": "#HashtagName",
      "category": "industry" | "topic" | "trending" | "branded" | "engagement",
      "reach": "high" | "medium" | "niche",
      "reason": "Why this hashtag is recommended"
    }}
  ],
  "recommendedCount": 3,
  "strategy": "Brief explanation of the hashtag strategy for this post"
}}"##,
        platform = platform,
        content = content,
        company = form.company_name,
        industry = form.industry,
        product = form.product_description,
        audience = form.target_audience,
        guidelines = hashtag_guidelines(platform),
    )
}

pub fn build_variants_prompt(content: &str, platform: &str, form: &FormData, num_variants: u32) -> String {
    format!(
        r#"You are an expert B2B content strategist specializing in A/B testing headlines for maximum engagement.

## CURRENT POST
Platform: {platform}
Content:
{content}

## COMPANY CONTEXT
- Company: {company}
- Product: {product}
- Audience: {audience}
- Tone: {tone}

## TASK
Generate {num_variants} alternative headline/hook variations for this {platform} post. Each variant should:
1. Take a different angle or approach
2. Maintain the same core message
3. Be optimized for {platform}'s best practices
4. Be designed for A/B testing

## HEADLINE STRATEGIES TO USE
Mix of these approaches:
- **Pattern Interrupt**: Start with unexpected statement
- **Question Hook**: Open with curiosity-inducing question
- **Statistic Lead**: Begin with compelling number
- **Contrarian**: Challenge conventional wisdom
- **Story Opener**: Start with personal narrative
- **Direct Value**: Lead with clear benefit
- **Problem Agitation**: Highlight pain point immediately

Return ONLY valid JSON:
{{
  "variants": [
    {{
      "headline": "The new headline/hook (first 1-2 sentences)",
      "hook": "The type of hook used (pattern interrupt, question, statistic, etc.)",
      "angle": "Brief description of the angle taken",
      "predictedEngagement": "high" | "medium" | "low"
    }}
  ]
}}"#,
        platform = platform,
        content = content,
        company = form.company_name,
        product = form.product_description,
        audience = form.target_audience,
        tone = or_default(&form.content_tone, "professional"),
        num_variants = num_variants,
    )
}

pub fn build_rewrite_prompt(
    original: &str,
    platform: &str,
    form: &FormData,
    feedback: Option<&str>,
) -> String {
    let guidelines = PlatformId::parse(platform)
        .map(rewrite_guidelines)
        .unwrap_or("Follow platform best practices.");
    let feedback = feedback.map(str::trim).filter(|f| !f.is_empty());

    let mut prompt = format!(
        r#"You are a content writer. Rewrite the following {platform} post to make it better and more engaging.

## ORIGINAL POST
{original}

## COMPANY CONTEXT
- Company: {company}
- Industry: {industry}
- Audience: {audience}
- Tone: {tone}
- Goal: {goal}

## PLATFORM REQUIREMENTS
{guidelines}

"#,
        platform = platform,
        original = original,
        company = form.company_name,
        industry = or_default(&form.industry, "Not specified"),
        audience = or_default(&form.target_audience, "Not specified"),
        tone = or_default(&form.content_tone, "professional"),
        goal = or_default(&form.primary_goal, "engagement"),
        guidelines = guidelines,
    );

    if let Some(feedback) = feedback {
        prompt.push_str(&format!(
            "## USER FEEDBACK\nThe user wants the following changes:\n{}\n\n",
            feedback
        ));
    }

    let instruction = if feedback.is_some() {
        "Incorporate the user's feedback while maintaining platform best practices."
    } else {
        "Improve the hook, clarity, and engagement potential while keeping the core message."
    };
    prompt.push_str(&format!(
        "## INSTRUCTIONS\n{}\n\nReturn ONLY the new post content. Do not include any explanation or additional text. Just the post content ready to copy and paste.",
        instruction
    ));

    prompt
}

pub fn build_repurpose_prompt(content: &str, source: &str, target: &str, form: &FormData) -> String {
    let guidelines = |platform: &str| {
        PlatformId::parse(platform)
            .map(rewrite_guidelines)
            .unwrap_or("Standard platform practices.")
    };

    format!(
        r#"You are a content repurposing expert. Transform the following {source} content into {target} format.

## ORIGINAL {source_upper} CONTENT
{content}

## COMPANY CONTEXT
- Company: {company}
- Industry: {industry}
- Audience: {audience}
- Tone: {tone}

## SOURCE PLATFORM CONTEXT
Original was written for {source}:
{source_guidelines}

## TARGET PLATFORM REQUIREMENTS
Adapt for {target}:
{target_guidelines}

## TRANSFORMATION GUIDELINES
1. Preserve the core message and value proposition
2. Adjust length to match target platform norms
3. Modify tone to fit the platform culture
4. Reformat structure (paragraphs, line breaks)
5. Update CTA style for the platform
6. Add/remove hashtags as appropriate

Return ONLY the transformed content. No explanation, no markdown code blocks, just the ready-to-post content for {target}."#,
        source = source,
        target = target,
        source_upper = source.to_uppercase(),
        content = content,
        company = form.company_name,
        industry = or_default(&form.industry, "Not specified"),
        audience = or_default(&form.target_audience, "Not specified"),
        tone = or_default(&form.content_tone, "professional"),
        source_guidelines = guidelines(source),
        target_guidelines = guidelines(target),
    )
}

const CALENDAR_PILLARS: [&str; 5] = [
    "Thought Leadership",
    "Product Updates",
    "Industry Insights",
    "Customer Stories",
    "Behind the Scenes",
];

/// Summary of what the user already has, mentioned in the calendar prompt.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExistingContent {
    pub platforms: Vec<String>,
    pub post_count: usize,
}

pub fn build_calendar_prompt(form: &FormData, existing: Option<&ExistingContent>) -> String {
    let existing_line = existing
        .map(|e| {
            format!(
                "- Existing content: {} posts across {}",
                e.post_count,
                e.platforms.join(", ")
            )
        })
        .unwrap_or_default();
    let pillar_lines = CALENDAR_PILLARS
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}", i + 1, p))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a content strategist creating a 12-week (90-day) content calendar for a B2B company.

## COMPANY CONTEXT
- Company: {company}
- Industry: {industry}
- Target Audience: {audience}
- Primary Goal: {goal}
- Content Tone: {tone}
- Unique Value: {unique_value}
{existing_line}

## CONTENT PILLARS
{pillar_lines}

## CALENDAR STRUCTURE
Create a 12-week calendar with 3 posts per week (Monday, Wednesday, Friday).

Month 1 (Weeks 1-4): Foundation Phase - Build awareness and establish authority
Month 2 (Weeks 5-8): Growth Phase - Increase engagement and nurture leads
Month 3 (Weeks 9-12): Scale Phase - Drive conversions and expand reach

## POST TYPES
- Educational: How-to guides, tips, frameworks
- Story: Customer stories, team stories, journey posts
- Engagement: Questions, polls, industry opinions
- Promotional: Product features, offers, demos
- Trending: Industry news, trends commentary

## PLATFORMS
Rotate between: linkedin, twitter, threads, email

Return ONLY a valid JSON array with this structure:
[
  {{
    "week": 1,
    "month": 1,
    "phase": "Foundation",
    "posts": [
      {{ "day": "Mon", "type": "Educational", "pillar": "Thought Leadership", "topic": "5 trends reshaping [industry]", "platform": "linkedin" }},
      {{ "day": "Wed", "type": "Story", "pillar": "Behind the Scenes", "topic": "Why we started [company]", "platform": "twitter" }},
      {{ "day": "Fri", "type": "Engagement", "pillar": "Industry Insights", "topic": "What's your biggest challenge with X?", "platform": "linkedin" }}
    ]
  }}
]

Generate all 12 weeks with specific, actionable topic ideas tailored to {company} in the {industry_space} space."#,
        company = form.company_name,
        industry = or_default(&form.industry, "Technology"),
        audience = or_default(&form.target_audience, "B2B decision makers"),
        goal = or_default(&form.primary_goal, "Lead generation"),
        tone = or_default(&form.content_tone, "Professional"),
        unique_value = or_default(&form.unique_value, "Not specified"),
        existing_line = existing_line,
        pillar_lines = pillar_lines,
        industry_space = or_default(&form.industry, "technology"),
    )
}

pub fn build_autofill_prompt(company_name: &str, website: Option<&str>) -> String {
    let website = website
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(|w| format!(" (website: {})", w))
        .unwrap_or_default();

    format!(
        r#"You are a business research assistant. Research the company "{company}"{website} and provide information to fill out a GTM (Go-To-Market) content engine form.

Based on your knowledge of this company, provide the following information. If you're not certain about something, make an educated guess based on the industry and company type. If you truly cannot determine something, leave it empty.

Return ONLY valid JSON in this exact format:

{{
  "productDescription": "2-3 sentences about what the product/service does and the problem it solves",
  "targetAudience": "Description of ideal customer profile - who buys this product",
  "jobTitles": "3-5 target job titles, comma-separated (e.g., 'CEO, VP Marketing, Head of Growth')",
  "painPoints": "Top 3 customer pain points, each on a new line",
  "uniqueValue": "What makes this company different from competitors",
  "keyBenefits": "Top 3 benefits, each on a new line",
  "competitors": "2-4 main competitors, comma-separated",
  "industry": "One of: saas, agency, ecommerce, fintech, healthtech, edtech, marketplace, coaching, other",
  "companySize": "Target customer company size: 1-10, 11-50, 51-200, 201-1000, or 1000+",
  "primaryGoal": "Most likely primary goal: leads, awareness, authority, sales, community, or hiring",
  "contentTone": "Recommended tone: professional, casual, bold, educational, or inspiring"
}}

Important:
- Be specific to {company}, not generic
- For pain points and benefits, put each item on a new line
- If this is a well-known company, use accurate information
- If less known, make reasonable inferences from the industry and website
- Do not make up specific metrics or claims you can't verify

Research {company} now and return the JSON:"#,
        company = company_name,
        website = website,
    )
}

pub fn build_competitor_research_prompt(
    company_name: &str,
    industry: &str,
    competitors: &[String],
    website: Option<&str>,
) -> String {
    let website = website
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(|w| format!(" (website: {})", w))
        .unwrap_or_default();
    let competitor_lines = competitors
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a competitive intelligence analyst. Research and analyze these competitors for {company}, a company in the {industry} industry{website}.

## COMPETITORS TO ANALYZE
{competitor_lines}

## YOUR TASK

Based on your knowledge of these companies, provide a comprehensive competitive analysis. For each competitor, identify:
1. Their content strategy strengths (what they do well on LinkedIn/Twitter)
2. Their weaknesses or gaps in content (opportunities for {company})
3. Common content patterns they use
4. Their messaging and positioning

Then provide strategic recommendations for {company} to differentiate.

## OUTPUT FORMAT

Return ONLY valid JSON in this exact structure:
{{
  "competitors": [
    {{
      "competitor": "Competitor Name",
      "strengths": [
        {{"strength": "What they do well", "example": "Specific example of their content"}}
      ],
      "weaknesses": [
        {{"weakness": "Gap or weakness", "opportunity": "How {company} can exploit this"}}
      ],
      "contentPatterns": [
        {{"pattern": "Pattern description", "frequency": "How often", "effectiveness": "High/Medium/Low"}}
      ],
      "topPerformingContent": ["Example content type that works for them"]
    }}
  ],
  "recommendedAngles": [
    {{"angle": "Content angle", "rationale": "Why this works", "differentiator": "How it sets {company} apart"}}
  ],
  "avoidList": [
    {{"tactic": "What to avoid", "reason": "Why it won't work"}}
  ],
  "summary": "2-3 sentence executive summary of competitive positioning opportunity for {company}"
}}"#,
        company = company_name,
        industry = industry,
        website = website,
        competitor_lines = competitor_lines,
    )
}

pub fn build_competitor_analysis_prompt(
    company_name: &str,
    competitors: &[String],
    samples: &[CompetitorSample],
) -> String {
    let sample_sections = samples
        .iter()
        .map(|sample| {
            let posts = sample
                .posts
                .iter()
                .enumerate()
                .map(|(i, p)| format!("{}. {}", i + 1, p))
                .collect::<Vec<_>>()
                .join("\n");
            format!("\n### {}\n{}\n", sample.competitor, posts)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze the content strategy of these competitors and provide actionable insights for {company}.

## COMPETITORS TO ANALYZE
{competitors}

## COMPETITOR CONTENT SAMPLES
{sample_sections}

## ANALYSIS REQUIRED

Provide insights in this JSON format:
{{
  "competitorStrengths": [
    {{"competitor": "Name", "strength": "What they do well", "example": "Specific example"}}
  ],
  "competitorWeaknesses": [
    {{"competitor": "Name", "weakness": "Gap or weakness", "opportunity": "How {company} can exploit this"}}
  ],
  "contentPatterns": [
    {{"pattern": "Common pattern observed", "frequency": "How often used", "effectiveness": "High/Medium/Low"}}
  ],
  "recommendedAngles": [
    {{"angle": "Content angle to try", "rationale": "Why this would work", "differentiator": "How it sets {company} apart"}}
  ],
  "avoidList": [
    {{"tactic": "What to avoid", "reason": "Why it won't work for {company}"}}
  ],
  "summary": "2-3 sentence executive summary of competitive positioning opportunity"
}}"#,
        company = company_name,
        competitors = competitors.join(", "),
        sample_sections = sample_sections,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormData {
        FormData {
            company_name: "Acme".to_string(),
            industry: "saas".to_string(),
            product_description: "Scheduling for clinics".to_string(),
            target_audience: "Clinic managers".to_string(),
            pain_points: "No-shows\nDouble bookings".to_string(),
            unique_value: "Waitlist backfill".to_string(),
            primary_goal: "leads".to_string(),
            content_tone: "bold".to_string(),
            ..FormData::default()
        }
    }

    #[test]
    fn test_content_prompt_includes_profile_and_targets() {
        let form = form();
        let prompt = build_content_prompt(ContentContext {
            form: &form,
            competitor_insights: None,
            custom_instructions: None,
        });

        assert!(prompt.contains("**Company:** Acme"));
        assert!(prompt.contains("**Website:** Not provided"));
        assert!(prompt.contains("- Typical opener style: \"Unpopular opinion:\""));
        assert!(prompt.contains("### LinkedIn (20 posts)"));
        assert!(prompt.contains("### Email (5 emails)"));
        assert!(prompt.contains("### Ad Copy (5 ads)"));
        assert!(prompt.contains("- **Culture/BTS** (10%)"));
        assert!(prompt.contains("2. Reference actual pain points: No-shows\n"));
        assert!(!prompt.contains("COMPETITOR INSIGHTS"));
        assert!(!prompt.contains("LANGUAGE REQUIREMENTS"));
    }

    #[test]
    fn test_content_prompt_optional_sections() {
        let mut form = form();
        form.content_language = Some("de".to_string());
        let prompt = build_content_prompt(ContentContext {
            form: &form,
            competitor_insights: Some("Globex posts memes"),
            custom_instructions: Some("Mention the beta"),
        });

        assert!(prompt.contains("Write ALL content in fluent, natural German"));
        assert!(prompt.contains("## COMPETITOR INSIGHTS\nUse these insights to differentiate and counter-position:\nGlobex posts memes"));
        assert!(prompt.contains("## CUSTOM INSTRUCTIONS\nMention the beta"));
    }

    #[test]
    fn test_single_post_prompt() {
        let prompt = build_single_post_prompt(
            &form(),
            PlatformId::Twitter,
            Pillar::GrowthMetrics,
            Some("Old tweet"),
            None,
        );
        assert!(prompt.starts_with("You are an expert B2B content strategist. Generate a single twitter post for Acme."));
        assert!(prompt.contains("## PLATFORM GUIDELINES (TWITTER)"));
        assert!(prompt.contains("## CURRENT VERSION (to improve)\nOld tweet"));
        assert!(!prompt.contains("FEEDBACK TO ADDRESS"));
        assert!(prompt.ends_with(r#"{"title": "Brief title", "pillar": "Growth Metrics", "status": "ready", "content": "Full post content..."}"#));
    }

    #[test]
    fn test_rewrite_prompt_feedback_switches_instruction() {
        let with = build_rewrite_prompt("Post", "linkedin", &form(), Some("shorter"));
        assert!(with.contains("## USER FEEDBACK\nThe user wants the following changes:\nshorter"));
        assert!(with.contains("Incorporate the user's feedback"));

        let without = build_rewrite_prompt("Post", "myspace", &form(), None);
        assert!(without.contains("Follow platform best practices."));
        assert!(without.contains("Improve the hook, clarity"));
    }

    #[test]
    fn test_platform_specific_fallbacks() {
        assert!(build_score_prompt("x", "tiktok", &form()).contains("Standard social media best practices."));
        assert!(build_hashtag_prompt("x", "instagram", &form()).contains("Up to 5 hashtags"));
        let repurpose = build_repurpose_prompt("x", "linkedin", "email", &form());
        assert!(repurpose.contains("## ORIGINAL LINKEDIN CONTENT"));
        assert!(repurpose.contains("Adapt for email:\nEmail Guidelines:"));
    }

    #[test]
    fn test_hashtag_prompt_keeps_json_example() {
        let prompt = build_hashtag_prompt("Launch day", "linkedin", &form());
        assert!(prompt.starts_with("You are a social media hashtag strategist. Generate optimal hashtags for this linkedin post."));
        assert!(prompt.contains("## POST CONTENT\nLaunch day"));
        assert!(prompt.contains("- Company: Acme"));
        assert!(prompt.contains(r##""hashtag": "#HashtagName","##));
        assert!(prompt.ends_with("\"strategy\": \"Brief explanation of the hashtag strategy for this post\"\n}"));
    }

    #[test]
    fn test_calendar_and_research_prompts() {
        let existing = ExistingContent { platforms: vec!["linkedin".to_string()], post_count: 12 };
        let calendar = build_calendar_prompt(&form(), Some(&existing));
        assert!(calendar.contains("- Existing content: 12 posts across linkedin"));
        assert!(calendar.contains("5. Behind the Scenes"));

        let autofill = build_autofill_prompt("Acme", Some("https://acme.io"));
        assert!(autofill.contains("Research the company \"Acme\" (website: https://acme.io)"));

        let research = build_competitor_research_prompt(
            "Acme",
            "saas",
            &["Globex".to_string(), "Initech".to_string()],
            None,
        );
        assert!(research.contains("1. Globex\n2. Initech"));
        assert!(research.contains("a company in the saas industry."));
    }

    #[test]
    fn test_competitor_analysis_prompt_lists_samples() {
        let samples = vec![CompetitorSample {
            competitor: "Globex".to_string(),
            posts: vec!["First".to_string(), "Second".to_string()],
        }];
        let prompt = build_competitor_analysis_prompt("Acme", &["Globex".to_string()], &samples);
        assert!(prompt.contains("### Globex\n1. First\n2. Second"));
        assert!(prompt.contains("How Acme can exploit this"));
    }
}
