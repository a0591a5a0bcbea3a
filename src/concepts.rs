//! Concept vocabulary: one labeled component of a research framework,
//! carrying the controlled-vocabulary and free-text terms an external
//! vocabulary service found for it.

use serde::{Deserialize, Serialize};

/// One framework component (e.g. `P`, `I`, `C`, `O`) with its term lists.
///
/// Term lists are insertion-ordered. A term may appear in two different
/// categories of the same concept, but duplicates inside one category are
/// dropped (first occurrence wins) before synthesis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub original_value: String,
    #[serde(default)]
    pub mesh_terms: Vec<String>,
    #[serde(default)]
    pub free_text_terms: Vec<String>,
    #[serde(default)]
    pub entry_terms: Vec<String>,
}

impl Concept {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// True when no category has any terms; such concepts are omitted
    /// from synthesized formulas entirely.
    pub fn is_empty(&self) -> bool {
        self.mesh_terms.is_empty() && self.free_text_terms.is_empty() && self.entry_terms.is_empty()
    }

    /// Copy with per-category duplicates removed, insertion order kept.
    pub fn deduped(&self) -> Concept {
        Concept {
            key: self.key.clone(),
            label: self.label.clone(),
            original_value: self.original_value.clone(),
            mesh_terms: dedup_preserving(&self.mesh_terms),
            free_text_terms: dedup_preserving(&self.free_text_terms),
            entry_terms: dedup_preserving(&self.entry_terms),
        }
    }
}

fn dedup_preserving(terms: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.iter().any(|t| t == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}
