//! Taxonomy-driven skill matching
//!
//! Free text is normalized, cut into token n-grams, and every n-gram
//! is resolved against the skill taxonomy. A final pass disambiguates
//! single-character skills that only appeared because a compound
//! sibling ("C++", "C#") was present.

use crate::processing::cleaner::normalize_punctuation_for_skills;
use crate::reference::ReferenceData;
use std::collections::HashSet;
use std::sync::Arc;

/// Characters that mark a matched skill as a compound token.
const COMPOUND_CHARS: [char; 6] = ['+', '#', '/', '&', '.', '-'];

pub struct SkillMatcher {
    reference: Arc<ReferenceData>,
    max_ngram: usize,
}

impl SkillMatcher {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self::with_max_ngram(reference, 3)
    }

    pub fn with_max_ngram(reference: Arc<ReferenceData>, max_ngram: usize) -> Self {
        Self { reference, max_ngram }
    }

    /// All contiguous word sequences of length 1..=max_n, lower-cased.
    ///
    /// Tokens are whitespace-delimited; empty tokens are dropped but
    /// single-character tokens ("C", "R") are kept. Output is ordered
    /// by n-gram length, then position.
    pub fn create_ngrams(text: &str, max_n: usize) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut ngrams = Vec::new();

        for n in 1..=max_n {
            if n > words.len() {
                break;
            }
            for window in words.windows(n) {
                ngrams.push(window.join(" ").to_lowercase());
            }
        }

        ngrams
    }

    /// Resolve a single n-gram to a canonical skill name.
    pub fn search_in_taxonomy(&self, ngram: &str) -> Option<&str> {
        self.reference.taxonomy.find(&ngram.to_lowercase())
    }

    /// Extract the set of canonical skills present in `text`, sorted
    /// lexicographically.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let normalized = normalize_punctuation_for_skills(text);

        let mut found: HashSet<String> = HashSet::new();
        for ngram in Self::create_ngrams(&normalized, self.max_ngram) {
            if let Some(name) = self.reference.taxonomy.find(&ngram) {
                found.insert(name.to_string());
            }
        }

        let words_upper: HashSet<String> = normalized
            .split_whitespace()
            .map(|w| w.to_uppercase())
            .collect();

        // A bare "C" next to "C++" or "C#" is almost always a false
        // positive; a bare "R" next to "REST" is not. Suppress a
        // single-character skill only when a longer matched skill
        // starts with the same character and carries a compound
        // punctuation character.
        let mut skills: Vec<String> = Vec::new();
        for skill in &found {
            if skill.chars().count() != 1 {
                skills.push(skill.clone());
                continue;
            }

            let skill_upper = skill.to_uppercase();
            if !words_upper.contains(&skill_upper) {
                continue;
            }

            let has_compound_sibling = found.iter().any(|other| {
                other != skill
                    && other.chars().count() > 1
                    && other.to_uppercase().starts_with(&skill_upper)
                    && other.chars().any(|c| COMPOUND_CHARS.contains(&c))
            });
            if !has_compound_sibling {
                skills.push(skill.clone());
            }
        }

        skills.sort();
        log::debug!("Matched {} skills in {} chars of text", skills.len(), text.len());
        skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceData;

    const TAXONOMY: &str = r#"{
        "programming": {
            "languages": [
                {"name": "C", "aliases": []},
                {"name": "C++", "aliases": ["cpp"]},
                {"name": "C#", "aliases": ["csharp"]},
                {"name": "R"},
                {"name": "Python", "aliases": ["python3"]}
            ],
            "web": [
                {"name": "React", "aliases": ["ReactJS", "react.js"]},
                {"name": "REST", "aliases": ["rest api", "restful"]}
            ]
        },
        "data": [
            {"name": "Machine Learning", "aliases": ["ml"]},
            {"name": "PostgreSQL", "aliases": ["postgres"]}
        ]
    }"#;

    fn matcher() -> SkillMatcher {
        let reference = ReferenceData::from_json(TAXONOMY, "{}").unwrap();
        SkillMatcher::new(Arc::new(reference))
    }

    #[test]
    fn test_ngram_count() {
        // W + (W-1) + (W-2) n-grams for W words and max_n = 3
        let ngrams = SkillMatcher::create_ngrams("one two three four five", 3);
        assert_eq!(ngrams.len(), 5 + 4 + 3);

        let short = SkillMatcher::create_ngrams("one two", 3);
        assert_eq!(short.len(), 2 + 1);
    }

    #[test]
    fn test_ngram_order_and_casing() {
        let ngrams = SkillMatcher::create_ngrams("Python and React", 2);
        assert_eq!(
            ngrams,
            vec!["python", "and", "react", "python and", "and react"]
        );
    }

    #[test]
    fn test_ngrams_keep_single_char_tokens() {
        let ngrams = SkillMatcher::create_ngrams("C and R", 1);
        assert_eq!(ngrams, vec!["c", "and", "r"]);
    }

    #[test]
    fn test_search_alias_case_insensitive() {
        let matcher = matcher();
        assert_eq!(matcher.search_in_taxonomy("reactjs"), Some("React"));
        assert_eq!(matcher.search_in_taxonomy("REACTJS"), Some("React"));
        assert_eq!(matcher.search_in_taxonomy("ReactJS"), Some("React"));
    }

    #[test]
    fn test_extract_multi_word_skill() {
        let matcher = matcher();
        let skills = matcher.extract_skills("Experience with machine learning and Postgres.");
        assert_eq!(skills, vec!["Machine Learning", "PostgreSQL"]);
    }

    #[test]
    fn test_single_char_suppressed_by_compound_sibling() {
        let matcher = matcher();
        let skills = matcher.extract_skills("I use C++ and C for embedded work");
        assert!(skills.contains(&"C++".to_string()));
        assert!(!skills.contains(&"C".to_string()));
    }

    #[test]
    fn test_single_char_kept_without_compound_sibling() {
        let matcher = matcher();
        let skills = matcher.extract_skills("I use R and REST APIs");
        assert!(skills.contains(&"R".to_string()));
        assert!(skills.contains(&"REST".to_string()));
    }

    #[test]
    fn test_skills_sorted_and_deduplicated() {
        let matcher = matcher();
        let skills = matcher.extract_skills("python, Python and PYTHON with React");
        assert_eq!(skills, vec!["Python", "React"]);
    }

    #[test]
    fn test_empty_input() {
        let matcher = matcher();
        assert!(matcher.extract_skills("").is_empty());
    }

    #[test]
    fn test_punctuation_bearing_skill_via_alias() {
        let matcher = matcher();
        let skills = matcher.extract_skills("Strong cpp and csharp background");
        assert_eq!(skills, vec!["C#", "C++"]);
    }
}
