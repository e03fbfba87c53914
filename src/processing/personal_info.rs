//! Heuristic extraction of personal contact fields
//!
//! Each resolver (name, email, phone, location, country, links) runs
//! independently over the same text and tolerates missing input; an
//! absent field is `None`, never an error. Country resolution can use
//! an injected NER hint before falling back to pattern matching.

use crate::error::Result;
use crate::reference::ReferenceData;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Social profile URLs and handles found in the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
}

/// Personal contact fields; every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfoRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub links: SocialLinks,
}

/// A named entity span produced by an external NER collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub label: EntityLabel,
}

/// Entity type tags, serialized with their conventional NER labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    #[serde(rename = "PERSON")]
    Person,
    #[serde(rename = "GPE")]
    GeopoliticalEntity,
    #[serde(rename = "ORG")]
    Organization,
    #[serde(rename = "DATE")]
    Date,
}

pub struct PersonalInfoExtractor {
    reference: Arc<ReferenceData>,
    email_regex: Regex,
    phone_regex: Regex,
    digit_run_regex: Regex,
    github_regex: Regex,
    linkedin_regex: Regex,
    linkedin_continuation: Regex,
    social_url_regex: Regex,
    website_regex: Regex,
    city_region_simple: Regex,
    city_region_multi: Regex,
}

impl PersonalInfoExtractor {
    pub fn new(reference: Arc<ReferenceData>) -> Result<Self> {
        Ok(Self {
            reference,
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            phone_regex: Regex::new(
                r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{2}[-.\s]?\d{2}",
            )?,
            digit_run_regex: Regex::new(r"\d{3}")?,
            github_regex: Regex::new(r"(?:https?://)?(?:www\.)?github\.com/([\w-]+)")?,
            linkedin_regex: Regex::new(
                r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[\wçğıöşü]+(?:-[\wçğıöşü]+)*",
            )?,
            linkedin_continuation: Regex::new(r"^[\wçğıöşü-]+")?,
            social_url_regex: Regex::new(r"(?i)(?:https?://)?(?:www\.)?(?:github|linkedin)\.com/\S+")?,
            website_regex: Regex::new(r"(?i)https?://[^\s/$.?#]+\.[a-z]{2,}\S*")?,
            // CITY,REGION with no space after the comma; the spaced
            // multi-word form is handled by the fallback pattern
            city_region_simple: Regex::new(r"([A-ZÇĞİÖŞÜ]{2,}),([A-ZÇĞİÖŞÜ]{2,})")?,
            city_region_multi: Regex::new(
                r"([A-ZÇĞİÖŞÜ]{2,}(?:\s+[A-ZÇĞİÖŞÜ]{2,})*)[,\s]+([A-ZÇĞİÖŞÜ]{2,}(?:\s+[A-ZÇĞİÖŞÜ]{2,})*)",
            )?,
        })
    }

    /// Run every resolver over `text` without an NER hint.
    pub fn extract(&self, text: &str) -> PersonalInfoRecord {
        self.extract_with_hint(text, None)
    }

    /// Run every resolver; `entities` feeds country resolution only.
    pub fn extract_with_hint(
        &self,
        text: &str,
        entities: Option<&[NamedEntity]>,
    ) -> PersonalInfoRecord {
        let email = self.extract_email(text);
        // falls back to the email local part when no name line matched
        let name = self
            .extract_name(text)
            .or_else(|| email.as_deref().and_then(name_from_email));
        let location = self.extract_location(text);
        let phone = self.extract_phone(text);
        let country = self.resolve_country(text, entities);
        let links = self.extract_links(text);

        PersonalInfoRecord {
            name,
            email,
            phone,
            location,
            country,
            links,
        }
    }

    /// Find a candidate name line among the first 15 lines.
    pub fn extract_name(&self, text: &str) -> Option<String> {
        for line in text.lines().take(15) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // contact and link lines never hold the name
            if line.contains('@')
                || self.digit_run_regex.is_match(line)
                || line.to_lowercase().contains("http")
            {
                continue;
            }
            // short all-uppercase lines are section headers
            if is_all_uppercase(line) && line.chars().count() < 20 {
                continue;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            if (2..=4).contains(&words.len())
                && words.iter().all(|w| starts_uppercase(w))
                && line.chars().count() < 60
            {
                return Some(line.to_string());
            }

            // the name may be embedded at the start of a sentence
            if words.len() >= 2 && words[..2].iter().all(|w| starts_uppercase(w)) {
                let first_two = format!("{} {}", words[0], words[1]);
                let len = first_two.chars().count();
                if (5..=30).contains(&len) {
                    return Some(first_two);
                }
            }
        }
        None
    }

    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone_regex.find(text).map(|m| m.as_str().to_string())
    }

    /// Extract a "City, Region" pair. The country part after the `/`
    /// separator is deliberately excluded; it lives in its own field.
    pub fn extract_location(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();

        // the location usually sits next to the email/phone line
        let contact_idx = lines
            .iter()
            .position(|l| l.contains('@') || l.chars().any(|c| c.is_ascii_digit()));
        if let Some(idx) = contact_idx {
            let start = idx.saturating_sub(1);
            let end = (idx + 3).min(lines.len());
            for line in &lines[start..end] {
                if let Some(location) = self.city_region_before_slash(line.trim()) {
                    return Some(location);
                }
            }
        }

        for line in &lines {
            if let Some(location) = self.city_region_before_slash(line.trim()) {
                return Some(location);
            }
        }
        None
    }

    fn city_region_before_slash(&self, line: &str) -> Option<String> {
        let slash_idx = line.find('/')?;
        if slash_idx == 0 {
            return None;
        }
        let before_slash = line[..slash_idx].trim();

        let captures = self
            .city_region_simple
            .captures(before_slash)
            .or_else(|| self.city_region_multi.captures(before_slash))?;
        let city = captures.get(1)?.as_str().trim();
        let region = captures.get(2)?.as_str().trim();
        Some(format!("{}, {}", city, region))
    }

    /// Two-tier country resolution.
    ///
    /// Tier 1 matches geopolitical NER entities against the country
    /// directory. Tier 2 falls back to the first word after a `/` in
    /// the first 1000 characters (diacritic-insensitive), then to an
    /// exact word scan of the same window.
    pub fn resolve_country(&self, text: &str, entities: Option<&[NamedEntity]>) -> Option<String> {
        let countries = &self.reference.countries;
        if countries.is_empty() {
            return None;
        }

        if let Some(entities) = entities {
            for entity in entities {
                if entity.label != EntityLabel::GeopoliticalEntity {
                    continue;
                }
                if let Some(name) = countries.find_exact(&entity.text) {
                    log::debug!("Country resolved from NER hint: {}", name);
                    return Some(name.to_string());
                }
            }
        }

        let sample: String = text.chars().take(1000).collect();

        if let Some(slash_idx) = sample.find('/') {
            let after_slash = sample[slash_idx + 1..].trim_start();
            if let Some(first_word) = after_slash.split_whitespace().next() {
                if let Some(name) = countries.find_normalized(first_word) {
                    return Some(name.to_string());
                }
            }
        }

        for word in sample.to_uppercase().split_whitespace() {
            let word = word.trim_matches(|c: char| ".,;:!?()[]{}".contains(c));
            if word.chars().count() < 2 {
                continue;
            }
            if let Some(name) = countries.find_exact(word) {
                return Some(name.to_string());
            }
        }
        None
    }

    pub fn extract_links(&self, text: &str) -> SocialLinks {
        let github = self
            .github_regex
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        SocialLinks {
            github,
            linkedin: self.extract_linkedin(text),
            website: self.extract_website(text),
        }
    }

    /// Match a LinkedIn profile URL, repairing URLs that were wrapped
    /// across lines by the layout (a line ending in `-` joined with up
    /// to two following lines, skipping short header lines between).
    fn extract_linkedin(&self, text: &str) -> Option<String> {
        if let Some(m) = self.linkedin_regex.find(text) {
            // a slug cut off by a hyphen at the end of a line means
            // the URL wrapped; try to reassemble it first
            let tail = &text[m.end()..];
            let truncated = tail.starts_with('-')
                && matches!(tail.as_bytes().get(1), None | Some(&b'\n') | Some(&b'\r'));
            if !truncated {
                return Some(m.as_str().to_string());
            }
            return self
                .join_wrapped_linkedin(text)
                .or_else(|| Some(m.as_str().to_string()));
        }
        self.join_wrapped_linkedin(text)
    }

    fn join_wrapped_linkedin(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.len() < 3 {
            return None;
        }
        for i in 0..lines.len() - 2 {
            let current = lines[i].trim();
            if !current.to_lowercase().contains("linkedin.com/in/") || !current.ends_with('-') {
                continue;
            }
            for next in lines.iter().skip(i + 1).take(2) {
                let next = next.trim();
                if is_all_uppercase(next) && next.chars().count() < 20 {
                    continue;
                }
                if !next.is_empty()
                    && next.chars().count() < 50
                    && self.linkedin_continuation.is_match(next)
                {
                    let combined = format!("{}{}", current, next);
                    if let Some(m) = self.linkedin_regex.find(&combined) {
                        return Some(m.as_str().to_string());
                    }
                }
            }
        }
        None
    }

    /// First plain URL that is not a GitHub/LinkedIn profile.
    fn extract_website(&self, text: &str) -> Option<String> {
        let without_social = self.social_url_regex.replace_all(text, "");

        for m in self.website_regex.find_iter(&without_social) {
            let url = m.as_str().to_lowercase();
            let host = url
                .trim_start_matches("https://")
                .trim_start_matches("http://");
            if host.starts_with("www.github.com") || host.starts_with("www.linkedin.com") {
                continue;
            }
            return Some(m.as_str().to_string());
        }
        None
    }
}

/// Derive a display name from the email local part: digits stripped,
/// 3 to 20 characters, capitalized.
fn name_from_email(email: &str) -> Option<String> {
    let local_part = email.split('@').next()?;
    let name_part: String = local_part.chars().filter(|c| !c.is_ascii_digit()).collect();
    let len = name_part.chars().count();
    if !(3..=20).contains(&len) {
        return None;
    }

    let mut chars = name_part.chars();
    let first = chars.next()?;
    Some(
        first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
    )
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

/// True when the line has at least one cased character and none of
/// them are lowercase.
fn is_all_uppercase(line: &str) -> bool {
    let mut has_cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
