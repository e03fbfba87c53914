//! CV extractor library
//!
//! Turns unstructured resume text into canonical skills and personal
//! contact fields for downstream matching services. Document parsing,
//! NER model invocation and the CLI driver live outside this crate; an
//! optional list of named entities can be passed in as a hint.

pub mod config;
pub mod error;
pub mod processing;
pub mod reference;

pub use config::Config;
pub use error::{ExtractorError, Result};
pub use processing::cleaner::{clean_text, normalize_punctuation_for_skills, remove_special_characters};
pub use processing::assembler::{FieldOutcome, RecordAssembler, StructuredRecord};
pub use processing::personal_info::{
    EntityLabel, NamedEntity, PersonalInfoExtractor, PersonalInfoRecord, SocialLinks,
};
pub use processing::skills::SkillMatcher;
pub use reference::{CountryDirectory, ReferenceData, TaxonomyNode};
