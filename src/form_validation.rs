use base64::engine::general_purpose;
use base64::Engine as _;
use serde::Serialize;

use crate::models::{FormData, PlatformId};

/// The five onboarding wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Company,
    Audience,
    Positioning,
    CurrentState,
    Goals,
}

impl FormStep {
    pub fn from_number(step: u32) -> Option<Self> {
        match step {
            1 => Some(FormStep::Company),
            2 => Some(FormStep::Audience),
            3 => Some(FormStep::Positioning),
            4 => Some(FormStep::CurrentState),
            5 => Some(FormStep::Goals),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError { field, message: message.into() });
    }

    fn min_chars(&mut self, field: &'static str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.push(field, message);
        }
    }

    fn website(&mut self, value: &str) {
        if !value.is_empty() && reqwest::Url::parse(value).is_err() {
            self.push("website", "Must be a valid URL");
        }
    }

    fn logo(&mut self, value: &str) {
        if !value.is_empty() && !is_image_data_url(value) {
            self.push("logo", "Logo must be an image data URL");
        }
    }

    fn platforms(&mut self, platforms: &[String]) {
        if platforms.is_empty() {
            self.push("targetPlatforms", "Please select at least one platform");
        }
        for platform in platforms {
            if PlatformId::parse(platform).is_none() {
                self.push("targetPlatforms", format!("Unknown platform: {}", platform));
            }
        }
    }

    fn company(&mut self, form: &FormData) {
        self.min_chars("companyName", &form.company_name, 1, "Company name is required");
        self.website(&form.website);
        self.min_chars("industry", &form.industry, 1, "Industry is required");
        self.min_chars(
            "productDescription",
            &form.product_description,
            10,
            "Please provide a brief product description",
        );
        self.logo(&form.logo);
    }

    fn audience(&mut self, form: &FormData) {
        self.min_chars("targetAudience", &form.target_audience, 10, "Please describe your target audience");
        self.min_chars("jobTitles", &form.job_titles, 1, "Please list target job titles");
        self.min_chars("companySize", &form.company_size, 1, "Please select company size");
        self.min_chars("painPoints", &form.pain_points, 10, "Please describe key pain points");
    }

    fn positioning(&mut self, form: &FormData) {
        self.min_chars(
            "uniqueValue",
            &form.unique_value,
            10,
            "Please describe your unique value proposition",
        );
        self.min_chars("keyBenefits", &form.key_benefits, 10, "Please list key benefits");
    }

    fn current_state(&mut self, form: &FormData) {
        if form.current_channels.is_empty() {
            self.push("currentChannels", "Please select at least one channel");
        }
        self.min_chars("contentFrequency", &form.content_frequency, 1, "Please select content frequency");
        self.min_chars("teamSize", &form.team_size, 1, "Please select team size");
    }

    fn goals(&mut self, form: &FormData) {
        self.min_chars("primaryGoal", &form.primary_goal, 1, "Please select a primary goal");
        self.min_chars("contentTone", &form.content_tone, 1, "Please select a content tone");
        self.platforms(&form.target_platforms);
    }
}

/// `data:image/<type>;base64,<payload>` with a decodable payload.
pub fn is_image_data_url(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("data:image/") else {
        return false;
    };
    let Some((media, payload)) = rest.split_once(";base64,") else {
        return false;
    };
    !media.is_empty() && general_purpose::STANDARD.decode(payload).is_ok()
}

pub fn validate_step(step: FormStep, form: &FormData) -> Vec<FieldError> {
    let mut checker = Checker::default();
    match step {
        FormStep::Company => checker.company(form),
        FormStep::Audience => checker.audience(form),
        FormStep::Positioning => checker.positioning(form),
        FormStep::CurrentState => checker.current_state(form),
        FormStep::Goals => checker.goals(form),
    }
    checker.errors
}

/// Rules for a form that is about to be used for generation. Current-state
/// fields are optional here.
pub fn validate_form(form: &FormData) -> Vec<FieldError> {
    let mut checker = Checker::default();
    checker.company(form);
    checker.audience(form);
    checker.positioning(form);
    checker.goals(form);
    checker.errors
}
