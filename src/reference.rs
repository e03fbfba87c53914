//! Read-only reference data: skill taxonomy and country directory
//!
//! Loaded once at startup and shared immutably (behind `Arc`) by every
//! extraction call. The taxonomy is required; the country directory is
//! optional and degrades to an empty lookup when absent.

use crate::config::Config;
use crate::error::{ExtractorError, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A taxonomy leaf carrying the canonical skill name and its aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillLeaf {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// An element of a leaf skill list: either a bare name or a full
/// leaf object with aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillEntry {
    Name(String),
    Leaf(SkillLeaf),
}

/// One node of the skill taxonomy tree.
///
/// The source JSON mixes arbitrarily nested category objects with two
/// leaf shapes: `{"name": ..., "aliases": [...]}` objects and skill
/// lists. Category names never participate in matching.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyNode {
    Leaf(SkillLeaf),
    Skills(Vec<SkillEntry>),
    Category(BTreeMap<String, TaxonomyNode>),
}

impl TaxonomyNode {
    /// Depth-first lookup of a lower-cased token against every leaf's
    /// canonical name and aliases. Returns the canonical name of the
    /// first matching leaf.
    pub fn find(&self, target: &str) -> Option<&str> {
        match self {
            TaxonomyNode::Leaf(leaf) => {
                if leaf.name.to_lowercase() == target {
                    return Some(&leaf.name);
                }
                for alias in &leaf.aliases {
                    if alias.to_lowercase() == target {
                        return Some(&leaf.name);
                    }
                }
                None
            }
            TaxonomyNode::Skills(items) => items.iter().find_map(|item| match item {
                SkillEntry::Name(name) => (name.to_lowercase() == target).then_some(name.as_str()),
                SkillEntry::Leaf(leaf) => {
                    if leaf.name.to_lowercase() == target
                        || leaf.aliases.iter().any(|a| a.to_lowercase() == target)
                    {
                        Some(leaf.name.as_str())
                    } else {
                        None
                    }
                }
            }),
            TaxonomyNode::Category(children) => {
                children.values().find_map(|child| child.find(target))
            }
        }
    }

    /// Collect every canonical skill name in the tree, lower-cased.
    pub fn collect_names(&self, out: &mut BTreeSet<String>) {
        match self {
            TaxonomyNode::Leaf(leaf) => {
                out.insert(leaf.name.to_lowercase());
            }
            TaxonomyNode::Skills(items) => {
                for item in items {
                    match item {
                        SkillEntry::Name(name) => {
                            out.insert(name.to_lowercase());
                        }
                        SkillEntry::Leaf(leaf) => {
                            out.insert(leaf.name.to_lowercase());
                        }
                    }
                }
            }
            TaxonomyNode::Category(children) => {
                for child in children.values() {
                    child.collect_names(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct CountryFile {
    #[serde(default)]
    countries: CountryDirectory,
}

/// Country names mapped to their accepted aliases.
///
/// Entries keep the source file's order: lookups return the first
/// match in that order, so the directory lists the likelier countries
/// first (as the original data does).
#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    countries: Vec<(String, Vec<String>)>,
}

impl<'de> Deserialize<'de> for CountryDirectory {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = CountryDirectory;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of country names to alias lists")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut countries = Vec::new();
                while let Some((name, aliases)) = map.next_entry::<String, Vec<String>>()? {
                    countries.push((name, aliases));
                }
                Ok(CountryDirectory { countries })
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}

impl CountryDirectory {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Case-insensitive exact match against country names and aliases.
    pub fn find_exact(&self, candidate: &str) -> Option<&str> {
        let candidate = candidate.trim().to_uppercase();
        if candidate.is_empty() {
            return None;
        }
        for (name, aliases) in &self.countries {
            if name.to_uppercase() == candidate {
                return Some(name);
            }
            if aliases.iter().any(|a| a.to_uppercase() == candidate) {
                return Some(name);
            }
        }
        None
    }

    /// Diacritic-insensitive match: exact or substring in either
    /// direction, after NFKD decomposition strips combining marks.
    /// The first matching entry in file order wins.
    pub fn find_normalized(&self, candidate: &str) -> Option<&str> {
        let candidate = strip_diacritics(&candidate.trim().to_uppercase());
        if candidate.is_empty() {
            return None;
        }
        for (name, aliases) in &self.countries {
            let name_clean = strip_diacritics(&name.to_uppercase());
            if loose_match(&candidate, &name_clean) {
                return Some(name);
            }
            for alias in aliases {
                let alias_clean = strip_diacritics(&alias.to_uppercase());
                if loose_match(&candidate, &alias_clean) {
                    return Some(name);
                }
            }
        }
        None
    }
}

/// Substring containment in either direction, except that short codes
/// ("DE", "UK") only ever match exactly: "UNITED" must not resolve to
/// Italy through its "IT" alias.
fn loose_match(candidate: &str, reference: &str) -> bool {
    if candidate == reference {
        return true;
    }
    if candidate.len() < 3 || reference.len() < 3 {
        return false;
    }
    reference.contains(candidate) || candidate.contains(reference)
}

/// NFKD-decompose and drop combining marks, so "TÜRKİYE" compares
/// equal to "TURKIYE".
pub(crate) fn strip_diacritics(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Process-lifetime reference data shared by all extractors.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub taxonomy: TaxonomyNode,
    pub countries: CountryDirectory,
}

impl ReferenceData {
    /// Load both resources from the configured data directory.
    ///
    /// A missing taxonomy is fatal: skill extraction cannot run without
    /// it. A missing country file only disables country resolution.
    pub fn load(config: &Config) -> Result<Self> {
        let taxonomy_path = config.taxonomy_path();
        if !taxonomy_path.exists() {
            return Err(ExtractorError::MissingResource(format!(
                "taxonomy file not found: {}",
                taxonomy_path.display()
            )));
        }
        let taxonomy_json = std::fs::read_to_string(&taxonomy_path)?;
        let taxonomy: TaxonomyNode = serde_json::from_str(&taxonomy_json)?;

        let countries_path = config.countries_path();
        let countries = if countries_path.exists() {
            let countries_json = std::fs::read_to_string(&countries_path)?;
            let file: CountryFile = serde_json::from_str(&countries_json)?;
            file.countries
        } else {
            log::warn!(
                "Country file not found: {}; country resolution disabled",
                countries_path.display()
            );
            CountryDirectory::default()
        };

        Ok(Self { taxonomy, countries })
    }

    /// Build reference data from in-memory JSON fixtures.
    pub fn from_json(taxonomy_json: &str, countries_json: &str) -> Result<Self> {
        let taxonomy: TaxonomyNode = serde_json::from_str(taxonomy_json)?;
        let file: CountryFile = serde_json::from_str(countries_json)?;
        Ok(Self {
            taxonomy,
            countries: file.countries,
        })
    }

    /// Every canonical skill name in the taxonomy, lower-cased.
    pub fn all_taxonomy_skills(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.taxonomy.collect_names(&mut names);
        names
    }
}
