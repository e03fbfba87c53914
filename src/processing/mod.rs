//! Text normalization and extraction pipeline

pub mod assembler;
pub mod cleaner;
pub mod personal_info;
pub mod skills;
