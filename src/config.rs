use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default word distance for synthesized proximity clauses
const DEFAULT_PROXIMITY: u32 = 3;
/// Largest word distance a proximity tag may request
const DEFAULT_MAX_PROXIMITY: u32 = 10;
/// Queries longer than this trigger a non-fatal length warning
const DEFAULT_MAX_QUERY_LEN: usize = 4000;

fn default_known_tags() -> Vec<String> {
    [
        "tiab", "ti", "ab", "tw", "mesh", "majr", "mh", "pt", "sh", "sb", "dp", "au", "la", "ot",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_proximity() -> u32 {
    DEFAULT_PROXIMITY
}

fn default_max_proximity() -> u32 {
    DEFAULT_MAX_PROXIMITY
}

fn default_max_query_len() -> usize {
    DEFAULT_MAX_QUERY_LEN
}

/// Tunable knobs shared by the validator and the strategy synthesizer.
/// Everything has a sensible default; hosts override via serde.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Field tags accepted by the validator, compared case-insensitively
    #[serde(default = "default_known_tags")]
    pub known_tags: Vec<String>,

    /// Word distance used for synthesized proximity clauses when a concept
    /// has no override
    #[serde(default = "default_proximity")]
    pub default_proximity: u32,

    /// Upper bound for `field:~N` proximity tags
    #[serde(default = "default_max_proximity")]
    pub max_proximity: u32,

    /// Length above which the validator emits `query_too_long`
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,

    /// Per-concept proximity overrides, keyed by concept key, clamped to
    /// `1..=max_proximity` at use
    #[serde(default)]
    pub proximity_overrides: HashMap<String, u32>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            known_tags: default_known_tags(),
            default_proximity: DEFAULT_PROXIMITY,
            max_proximity: DEFAULT_MAX_PROXIMITY,
            max_query_len: DEFAULT_MAX_QUERY_LEN,
            proximity_overrides: HashMap::new(),
        }
    }
}

impl QueryConfig {
    /// True if `tag` (without brackets) is in the accepted vocabulary.
    pub fn is_known_tag(&self, tag: &str) -> bool {
        self.known_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Proximity distance for one concept, override-aware and clamped.
    pub fn proximity_for(&self, concept_key: &str) -> u32 {
        let n = self
            .proximity_overrides
            .get(concept_key)
            .copied()
            .unwrap_or(self.default_proximity);
        n.clamp(1, self.max_proximity)
    }
}
