use std::path::PathBuf;

use crate::rules::ContainmentStrategy;

/// Environment variable naming the directory searched for originals
pub const ORIGINALS_DIR_ENV: &str = "EXB_ORIGINALS_DIR";

/// Runtime configuration for a validation run
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Semantics of rule 5
    pub containment: ContainmentStrategy,
    /// Directory scanned for the original of an annotated file
    pub originals_dir: Option<PathBuf>,
    /// File name suffix of candidate originals
    pub candidate_suffix: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            containment: ContainmentStrategy::GapTolerant,
            originals_dir: None,
            candidate_suffix: ".exb.xml".to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            originals_dir: lookup(ORIGINALS_DIR_ENV)
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            ..Default::default()
        }
    }
}
