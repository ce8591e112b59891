//! Turning free-form model replies into structured data.
//!
//! Models wrap JSON in markdown fences, prepend commentary, leave trailing
//! commas and emit raw newlines inside strings. The helpers here undo the
//! common cases before handing the text to `serde_json`.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::normalize::AutofillProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }
}

/// Remove a surrounding markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> String {
    let cleaned = text.trim();
    if !cleaned.starts_with("```") {
        return cleaned.to_string();
    }

    let mut lines: Vec<&str> = cleaned.split('\n').collect();
    lines.remove(0);
    if lines.last().map(|line| line.trim() == "```").unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n")
}

/// Slice the outermost JSON value of the requested shape out of `text`.
///
/// When either delimiter is missing the fence-stripped text is returned as is
/// so the caller's parse error carries the real reply.
pub fn extract_json(text: &str, shape: JsonShape) -> String {
    let cleaned = strip_code_fence(text);
    let (open, close) = shape.delimiters();

    match (cleaned.find(open), cleaned.rfind(close)) {
        (Some(first), Some(last)) if first <= last => cleaned[first..=last].to_string(),
        _ => cleaned,
    }
}

/// Fix the two defects models produce most: trailing commas before a closing
/// bracket and unescaped control characters inside string literals.
pub fn repair_json(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (idx, &ch) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(ch);
                continue;
            }
            match ch {
                '\\' => {
                    escaped = true;
                    out.push(ch);
                }
                '"' => {
                    in_string = false;
                    out.push(ch);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(ch),
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                let next = chars[idx + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Extract, parse and, on failure, repair then parse again.
///
/// The error of the first attempt is returned when the repaired text still
/// does not parse.
pub fn parse_llm_json(text: &str, shape: JsonShape) -> Result<Value, serde_json::Error> {
    let extracted = extract_json(text, shape);
    match serde_json::from_str(&extracted) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            debug!("Initial JSON parse failed ({}), attempting repair", first_err);
            serde_json::from_str(&repair_json(&extracted)).map_err(|_| first_err)
        }
    }
}

lazy_static! {
    static ref NUMBERED_ITEM: Regex = Regex::new(r"\d+\.").unwrap();
}

// Text after `label` up to the next numbered item
fn labeled_section(text: &str, label: &str) -> String {
    let pattern = format!(r"(?i){}[:\s]*", regex::escape(label));
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    let Some(found) = re.find(text) else {
        return String::new();
    };

    let rest = &text[found.end()..];
    let end = NUMBERED_ITEM.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

/// Read a numbered plain-text company profile ("1. PRODUCT DESCRIPTION: ...").
pub fn parse_labeled_sections(text: &str) -> AutofillProfile {
    AutofillProfile {
        product_description: labeled_section(text, "PRODUCT DESCRIPTION"),
        target_audience: labeled_section(text, "TARGET AUDIENCE"),
        job_titles: labeled_section(text, "JOB TITLES TO TARGET"),
        pain_points: labeled_section(text, "TOP 3 PAIN POINTS"),
        unique_value: labeled_section(text, "UNIQUE VALUE PROPOSITION"),
        key_benefits: labeled_section(text, "KEY BENEFITS"),
        competitors: labeled_section(text, "MAIN COMPETITORS"),
        industry: labeled_section(text, "INDUSTRY").to_lowercase(),
        company_size: labeled_section(text, "COMPANY SIZE TARGET"),
        primary_goal: labeled_section(text, "PRIMARY GOAL").to_lowercase(),
        content_tone: labeled_section(text, "CONTENT TONE").to_lowercase(),
    }
}
