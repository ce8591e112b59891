//! Offline content library: fixed post templates filled in from the company
//! profile. Used when no provider is configured or a generation fails.

use crate::catalog::{goal_cta, tone_config};
use crate::models::{FormData, GeneratedContent, Industry, Pillar, Post, PostStatus, PrimaryGoal};
use crate::normalize::{normalize_goal, normalize_industry, normalize_tone};

const DEFAULT_COMPANY: &str = "Our Company";
const DEFAULT_INDUSTRY: &str = "saas";

/// Profile values every template draws from, with fallbacks applied.
#[derive(Debug, Clone)]
struct Profile {
    company: String,
    product: String,
    audience: String,
    industry: String,
    unique_value: String,
    main_pain: String,
    second_pain: String,
    third_pain: String,
    opener: &'static str,
    tone_cta: &'static str,
    goal_cta: &'static str,
    hashtags: String,
}

fn or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() { fallback.to_string() } else { value.to_string() }
}

impl Profile {
    fn from_form(form: &FormData) -> Self {
        let company = or(&form.company_name, DEFAULT_COMPANY);
        let industry = or(&form.industry, DEFAULT_INDUSTRY);
        let tone = tone_config(normalize_tone(&form.content_tone));
        let goal = normalize_goal(&form.primary_goal).unwrap_or(PrimaryGoal::Leads);

        let mut pains = form.pain_points.lines().map(str::trim).filter(|line| !line.is_empty());
        let main_pain = or(pains.next().unwrap_or_default(), "common challenges in your industry");
        let second_pain = or(pains.next().unwrap_or_default(), "scaling efficiently");
        let third_pain = or(pains.next().unwrap_or_default(), "finding the right solutions");

        let industry_tag = match normalize_industry(&industry) {
            Industry::Saas => "SaaS".to_string(),
            _ => industry.split_whitespace().collect(),
        };
        let hashtags = format!(
            "#{} #{} #BuildingInPublic",
            company.split_whitespace().collect::<String>(),
            industry_tag
        );

        Self {
            company,
            product: or(&form.product_description, "We solve the problem you hate dealing with."),
            audience: form.target_audience.trim().to_string(),
            industry,
            unique_value: form.unique_value.trim().to_string(),
            main_pain,
            second_pain,
            third_pain,
            opener: tone.opener,
            tone_cta: tone.cta,
            goal_cta: goal_cta(goal),
            hashtags,
        }
    }

    fn audience_or(&self, fallback: &str) -> String {
        or(&self.audience, fallback)
    }

    fn unique_value_or(&self, fallback: &str) -> String {
        or(&self.unique_value, fallback)
    }

    // First sentence of the positioning statement
    fn value_headline(&self) -> String {
        let first = self.unique_value.split('.').next().unwrap_or_default();
        or(first, "Finally, a solution that works")
    }
}

fn post(id: u64, title: &str, pillar: Pillar, status: PostStatus, content: String) -> Post {
    Post { id, title: title.to_string(), pillar, status, content }
}

/// Build a complete library for `form` without calling a provider.
pub fn template_library(form: &FormData) -> GeneratedContent {
    let profile = Profile::from_form(form);
    GeneratedContent {
        linkedin: linkedin_posts(&profile),
        twitter: twitter_posts(&profile),
        threads: threads_posts(&profile),
        email: email_posts(&profile),
        ads: ad_posts(&profile),
    }
}

fn linkedin_posts(p: &Profile) -> Vec<Post> {
    use Pillar::*;
    use PostStatus::*;

    let Profile { company, industry, main_pain, second_pain, third_pain, opener, tone_cta, goal_cta, hashtags, .. } = p;
    let audience = p.audience_or("our customers");
    let unique_value = p.unique_value_or("We focused on what actually matters: the core problem, without the bloat.");
    let product = &p.product;

    vec![
        post(1, "Origin Story", FounderStory, Ready, format!(
            "Why I built {company}:\n\n{main_pain}\n\nI watched this problem eat hours every week, and nobody was fixing it properly.\n\n{opener}\n\nThe existing options were too complex, too expensive, or built by people who never lived the problem.\n\n{unique_value}\n\nWhat made you start your company?\n\n{hashtags} #FounderJourney"
        )),
        post(2, "Biggest Lesson", FounderStory, Review, format!(
            "The biggest lesson from building {company}:\n\nYour first version will be embarrassing. Ship it anyway.\n\nReal users gave us better feedback in a week than a year of planning would have.\n\nWhat did you ship before it was ready?\n\n{tone_cta}\n\n{hashtags}"
        )),
        post(3, "Why Now", FounderStory, Ready, format!(
            "People ask why we started {company} now.\n\n1. The problem got worse: {main_pain}\n2. The tooling finally caught up\n3. The incumbents stopped improving\n\nTiming isn't everything. But it's a lot.\n\n{hashtags}"
        )),
        post(4, "Problem Agitation", IndustryInsights, Review, format!(
            "{opener}\n\nMost {industry} companies are solving the wrong problem.\n\nThey add features nobody asked for and hire around broken processes.\n\n{main_pain} isn't a feature problem. It's a focus problem.\n\nStart from the outcome your customer wants and work backwards.\n\nWhat would you add?\n\n{hashtags} #ThoughtLeadership"
        )),
        post(5, "Framework Post", IndustryInsights, Ready, format!(
            "The 5-step framework we use at {company}:\n\n1. Define the problem in writing\n2. Map where you are today\n3. Describe success in 90 days\n4. Cut everything off the shortest path\n5. Ship, measure, adjust weekly\n\nIt has helped {audience} hit their goals consistently.\n\nSave this for later.\n\n{hashtags} #Framework"
        )),
        post(6, "Industry Trend", IndustryInsights, Ready, format!(
            "3 shifts reshaping {industry} this year:\n\n1. AI is table stakes, not a differentiator\n2. Buyers are consolidating their tools\n3. Community beats content volume\n\nHow {company} is adapting:\n{unique_value}\n\nWhich shift matters most to you?\n\n{hashtags} #Trends"
        )),
        post(7, "How-To Guide", IndustryInsights, Ready, format!(
            "How to win your first 50 conversations with {audience} in 30 days, without ads:\n\n1. Pick one platform\n2. Post something useful every day\n3. Comment thoughtfully on 20 posts a day\n4. Start 5 real conversations a week\n\nNo funnels. Just consistency.\n\n{goal_cta}\n\n{hashtags}"
        )),
        post(8, "Milestone Post", GrowthMetrics, Ready, format!(
            "{company} update:\n\nEvery new customer this month came from referrals and content that helped people first.\n\nOrganic works when you solve a real problem and share the journey honestly.\n\n{goal_cta}\n\n{hashtags} #Growth"
        )),
        post(9, "Year in Review", GrowthMetrics, Review, format!(
            "{company}: a year in review.\n\nMost months felt like failure: missed targets, features that flopped, customers who churned.\n\nThe wins came out of those months.\n\nIf you're in the hard part right now, keep going.\n\n{hashtags}"
        )),
        post(10, "Customer Story", CommunityWins, Ready, format!(
            "Customer spotlight:\n\nBefore {company}, one of {audience} was stuck on {main_pain}.\n\nSixty days later the workflow is streamlined and the team is focused on growth again.\n\nThat's why we do this.\n\n{goal_cta}\n\n{hashtags} #CustomerSuccess"
        )),
        post(11, "Testimonials", CommunityWins, Review, format!(
            "What customers say about {company}:\n\n\"Finally, something that actually works.\"\n\"ROI in the first week.\"\n\"Adoption was instant.\"\n\nMy favourite: \"It just makes sense.\"\n\nThank you to everyone who took a chance on us.\n\n{hashtags}"
        )),
        post(12, "How It Works", ProductJourney, Ready, format!(
            "How {company} works in 60 seconds:\n\n{product}\n\n1. Connect your accounts\n2. Tell us your goals\n3. Let it run\n4. Watch the results\n\n{unique_value}\n\n{goal_cta}\n\n{hashtags}"
        )),
        post(13, "Product Update", ProductJourney, Review, format!(
            "New in {company} this week:\n\n- Faster onboarding, value in under 5 minutes\n- Performance improvements across the board\n- A pile of small fixes you asked for\n\nFeedback drives our roadmap. What would make {company} 10x better for you?\n\n{hashtags} #ProductUpdate"
        )),
        post(14, "Behind the Scenes", CultureBts, Ready, format!(
            "Behind the scenes at {company}:\n\n90% of the work is invisible. Bug fixes nobody notices, customer calls that never make a post, the iteration after the launch.\n\nThat's where progress happens.\n\nWhat's happening behind the scenes at your company?\n\n{hashtags} #BTS"
        )),
        post(15, "Poll", Engagement, Ready, format!(
            "Quick question for {audience}:\n\nWhat's your biggest challenge right now?\n\n1. {main_pain}\n2. {second_pain}\n3. {third_pain}\n4. Something else (comment below)\n\nWe're planning the {company} roadmap and want to build what you need.\n\n{hashtags} #Poll"
        )),
    ]
}

fn twitter_posts(p: &Profile) -> Vec<Post> {
    use Pillar::*;
    use PostStatus::*;

    let Profile { company, industry, main_pain, tone_cta, goal_cta, .. } = p;
    let audience = p.audience_or("founders");

    vec![
        post(1, "Hook Thread", IndustryInsights, Ready, format!(
            "{main_pain}?\n\nHere's how to fix it in 30 days without spending a cent on ads.\n\nA thread:"
        )),
        post(2, "Hot Take", IndustryInsights, Review, format!(
            "hot take: most {industry} companies are overcomplicating this.\n\nthe answer is simpler than you think. {company} is proof."
        )),
        post(3, "Milestone", GrowthMetrics, Ready, format!(
            "{company} update: more customers than ever and $0 spent on ads.\n\nbuilding in public hits different."
        )),
        post(4, "Quick Tip", IndustryInsights, Ready, format!(
            "quick tip that saved us 10+ hours a week at {company}:\n\nstop doing it manually. automate it."
        )),
        post(5, "Question", Engagement, Review, format!(
            "question for {audience}:\n\nwhat's the ONE thing holding you back right now?\n\n{tone_cta}"
        )),
        post(6, "Lesson", FounderStory, Ready, format!(
            "biggest lesson from building {company}:\n\ntalk to customers before you write code. then keep talking to them."
        )),
        post(7, "Story", FounderStory, Review, format!(
            "{company} started because {main_pain} kept wrecking my week.\n\nturns out I wasn't the only one."
        )),
        post(8, "CTA", ProductJourney, Ready, format!(
            "{company} helps {audience} stop fighting {main_pain}.\n\n{goal_cta}"
        )),
    ]
}

fn threads_posts(p: &Profile) -> Vec<Post> {
    use Pillar::*;
    use PostStatus::*;

    let Profile { company, industry, main_pain, second_pain, opener, hashtags, .. } = p;
    let unique_value = p.unique_value_or("Solve one problem properly before adding a second.");

    vec![
        post(1, "Full Journey", FounderStory, Ready, format!(
            "The honest story of {company}:\n\nIt started with {main_pain}. We tried every tool on the market and none of them fit.\n\nSo we built our own. The first version was rough, the first customers were patient, and the lessons were expensive.\n\n{unique_value}\n\n{hashtags}"
        )),
        post(2, "Framework", IndustryInsights, Review, format!(
            "{opener}\n\nThe framework behind every decision at {company}:\n\n1. Is it a real problem?\n2. Is it painful enough to pay for?\n3. Can we solve it simply?\n\nIf any answer is no, we don't build it.\n\n{hashtags}"
        )),
        post(3, "Mistakes", FounderStory, Ready, format!(
            "Mistakes we made building {company} in {industry}:\n\n- Building before validating\n- Underestimating {second_pain}\n- Waiting too long to charge\n\nLearn from ours so you can make new ones.\n\n{hashtags}"
        )),
    ]
}

fn email_posts(p: &Profile) -> Vec<Post> {
    use Pillar::*;
    use PostStatus::*;

    let Profile { company, product, main_pain, goal_cta, .. } = p;
    let audience = p.audience_or("teams like yours");
    let unique_value = p.unique_value_or("We built it for people who hated the alternatives.");

    vec![
        post(1, "Welcome Email", ProductJourney, Ready, format!(
            "Subject: Welcome to {company}\n\nHi there,\n\nThanks for joining. {product}\n\nOver the next few days I'll share how {audience} get the most out of {company}, starting with the one setting that saves the most time.\n\nTalk soon,\nThe {company} team"
        )),
        post(2, "Value Email", IndustryInsights, Review, format!(
            "Subject: The real cause of {main_pain}\n\nHi there,\n\nMost teams treat {main_pain} as a tooling problem. It's usually a process problem.\n\nHere's the three-step audit we run with every new customer: list the recurring work, time it honestly, then cut or automate the top item.\n\n{goal_cta}\n\nThe {company} team"
        )),
        post(3, "Case Study Email", CommunityWins, Ready, format!(
            "Subject: How one customer got 15 hours a week back\n\nHi there,\n\nA customer came to {company} stuck on {main_pain}. Sixty days later they had their week back and a team focused on growth.\n\n{unique_value}\n\nWant the same result? Just reply to this email.\n\nThe {company} team"
        )),
        post(4, "Objection Handler", ProductJourney, Ready, format!(
            "Subject: \"We don't have time to switch\"\n\nHi there,\n\nWe hear this a lot. Setup for {company} takes minutes, not months, and you can keep your current tools while you try it.\n\nThe cost of staying with {main_pain} is usually higher than the cost of switching.\n\n{goal_cta}\n\nThe {company} team"
        )),
    ]
}

fn ad_posts(p: &Profile) -> Vec<Post> {
    use Pillar::*;
    use PostStatus::*;

    let Profile { company, main_pain, .. } = p;
    let value_headline = p.value_headline();
    let pain = main_pain.to_lowercase();

    vec![
        post(1, "Problem-Agitate", ProductJourney, Ready, format!(
            "[HEADLINE]\nStill struggling with {pain}?\n\n[BODY]\n{audience} are switching to {company}. {value_headline}.\n\n[CTA]\nTry Free for 14 Days",
            audience = p.audience_or("Smart teams")
        )),
        post(2, "Social Proof", CommunityWins, Review, format!(
            "[HEADLINE]\n\"{company} changed everything for us.\"\n\n[BODY]\nJoin the {audience} already saving 10+ hours a week.\n\n[CTA]\nStart Your Free Trial",
            audience = p.audience_or("companies")
        )),
        post(3, "Curiosity", IndustryInsights, Ready, format!(
            "[HEADLINE]\nWhy {audience} are rethinking {pain}\n\n[BODY]\nThe old way is broken. {company} is the fix.\n\n[CTA]\nSee How It Works",
            audience = p.audience_or("top performers")
        )),
        post(4, "Direct Response", ProductJourney, Ready, format!(
            "[HEADLINE]\n{main_pain}? There's a better way.\n\n[BODY]\n{company} helps {audience} save hours every week. No long contracts.\n\n[CTA]\nGet Started Free",
            audience = p.audience_or("teams like yours")
        )),
    ]
}
