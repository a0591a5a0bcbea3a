//! Strategy synthesis: turn per-concept vocabulary into three complete,
//! field-tagged boolean queries using a fixed construction grammar.
//!
//! Synthesis is deterministic: identical inputs produce byte-identical
//! query strings. All variability (proximity distances, hedge choice)
//! comes from explicit config, never from clocks or randomness.

use serde::{Deserialize, Serialize};

use crate::concepts::Concept;
use crate::config::QueryConfig;
use crate::hedges::{default_hedge_type, Hedge, HedgeLibrary};
use crate::query::render_clause_string;
use crate::warnings::QueryWarning;

/// One synthesized query with its display metadata. Immutable once
/// generated; interactive refinement edits a copy of `query`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub purpose: String,
    pub formula: String,
    pub query: String,
    pub expected_yield: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedge_applied: Option<String>,
}

/// Result of one synthesis run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synthesis {
    pub comprehensive: Strategy,
    pub direct: Strategy,
    pub clinical: Strategy,
    pub warnings: Vec<QueryWarning>,
}

/// Synthesize the three strategies with default config and the built-in
/// hedge library.
pub fn synthesize(
    concepts: &[Concept],
    framework_type: &str,
    hedge_override: Option<&str>,
) -> Synthesis {
    synthesize_with(
        concepts,
        framework_type,
        hedge_override,
        &QueryConfig::default(),
        HedgeLibrary::builtin(),
    )
}

pub fn synthesize_with(
    concepts: &[Concept],
    framework_type: &str,
    hedge_override: Option<&str>,
    config: &QueryConfig,
    hedges: &HedgeLibrary,
) -> Synthesis {
    let mut warnings = Vec::new();

    let usable: Vec<Concept> = concepts
        .iter()
        .map(Concept::deduped)
        .filter(|c| {
            if c.is_empty() {
                warnings.push(QueryWarning::warning(
                    "empty_concept",
                    format!("concept {:?} has no terms and was omitted", c.key),
                ));
                false
            } else {
                true
            }
        })
        .collect();

    if usable.is_empty() {
        warnings.push(QueryWarning::warning(
            "no_concepts",
            "no concepts with terms; all strategies are empty",
        ));
    }
    log::debug!(
        "synthesizing strategies from {} usable concepts (framework {framework_type})",
        usable.len()
    );

    let hedge = resolve_hedge(framework_type, hedge_override, hedges, &mut warnings);

    let comprehensive_query = join_groups(usable.iter().map(comprehensive_group));
    let direct_query = join_groups(usable.iter().map(|c| direct_group(c, config)));

    let (clinical_query, hedge_applied) = match (hedge, comprehensive_query.is_empty()) {
        (_, true) => (String::new(), None),
        (Some(h), false) => (
            format!("{} AND ({})", comprehensive_query, h.fragment),
            Some(h.id.clone()),
        ),
        (None, false) => (comprehensive_query.clone(), None),
    };

    let keys: Vec<&str> = usable.iter().map(|c| c.key.as_str()).collect();

    Synthesis {
        comprehensive: Strategy {
            name: "Comprehensive".to_string(),
            purpose: "Maximize recall: exploded subject headings plus all text words".to_string(),
            formula: formula_schematic(&keys, "Mesh|tw", None),
            query: comprehensive_query,
            expected_yield: "high".to_string(),
            hedge_applied: None,
        },
        direct: Strategy {
            name: "Direct".to_string(),
            purpose: "Maximize precision: major-topic headings, title terms, proximity"
                .to_string(),
            formula: formula_schematic(&keys, "Majr|ti|prox", None),
            query: direct_query,
            expected_yield: "moderate".to_string(),
            hedge_applied: None,
        },
        clinical: Strategy {
            name: "Clinical".to_string(),
            purpose: "Comprehensive body restricted by a validated methodology hedge".to_string(),
            formula: formula_schematic(&keys, "Mesh|tw", hedge_applied.as_deref()),
            query: clinical_query,
            expected_yield: "low".to_string(),
            hedge_applied,
        },
        warnings,
    }
}

/// Override wins when it names a known hedge; otherwise the framework
/// default applies and `hedge_not_found` is reported. `None` only when
/// the library itself has no usable entry.
fn resolve_hedge<'a>(
    framework_type: &str,
    hedge_override: Option<&str>,
    hedges: &'a HedgeLibrary,
    warnings: &mut Vec<QueryWarning>,
) -> Option<&'a Hedge> {
    let default_type = default_hedge_type(framework_type);
    if let Some(id) = hedge_override {
        if let Some(hedge) = hedges.get(id) {
            return Some(hedge);
        }
        warnings.push(QueryWarning::warning(
            "hedge_not_found",
            format!("no hedge {id:?}; using the {framework_type} default"),
        ));
    }
    let fallback = hedges
        .by_type(default_type)
        .or_else(|| hedges.hedges().first());
    if fallback.is_none() {
        warnings.push(QueryWarning::warning(
            "hedge_not_found",
            "hedge library has no entries; clinical strategy is unfiltered",
        ));
    }
    fallback
}

fn join_groups(groups: impl Iterator<Item = String>) -> String {
    groups
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Broad per-concept group: exploded MeSH plus every text word.
/// `("Diabetes Mellitus"[Mesh] OR ("diabetes"[tw] OR "blood sugar"[tw]))`
fn comprehensive_group(concept: &Concept) -> String {
    let mesh: Vec<String> = concept
        .mesh_terms
        .iter()
        .map(|t| tagged(t, "Mesh"))
        .collect();

    // Free-text and entry terms share the [tw] tag; a term present in
    // both categories still renders once.
    let mut text_terms: Vec<&str> = Vec::new();
    for t in concept.free_text_terms.iter().chain(&concept.entry_terms) {
        if !text_terms.contains(&t.as_str()) {
            text_terms.push(t);
        }
    }
    let text: Vec<String> = text_terms.iter().map(|t| tagged(t, "tw")).collect();

    build_group(mesh, text, None)
}

/// Focused per-concept group: major-topic headings, title terms, and a
/// proximity clause over the two lead free-text terms.
fn direct_group(concept: &Concept, config: &QueryConfig) -> String {
    let mesh: Vec<String> = concept
        .mesh_terms
        .iter()
        .map(|t| tagged(t, "Majr"))
        .collect();
    let text: Vec<String> = concept
        .free_text_terms
        .iter()
        .map(|t| tagged(t, "ti"))
        .collect();

    let proximity = if concept.free_text_terms.len() > 1 {
        let distance = config.proximity_for(&concept.key);
        let pair = format!(
            "{} {}",
            concept.free_text_terms[0], concept.free_text_terms[1]
        );
        Some(render_clause_string(
            &pair,
            Some(&format!("tiab:~{distance}")),
            true,
        ))
    } else {
        None
    };

    build_group(mesh, text, proximity)
}

/// Assemble one concept group: mesh clauses OR a parenthesized text
/// subgroup OR a proximity clause, wrapped when more than one clause.
fn build_group(mesh: Vec<String>, text: Vec<String>, proximity: Option<String>) -> String {
    let clause_count = mesh.len() + text.len() + proximity.iter().count();

    let mut parts: Vec<String> = mesh;
    match text.len() {
        0 => {}
        1 => parts.push(text.into_iter().next().unwrap_or_default()),
        _ => parts.push(format!("({})", text.join(" OR "))),
    }
    if let Some(p) = proximity {
        parts.push(p);
    }

    if parts.is_empty() {
        return String::new();
    }
    let joined = parts.join(" OR ");
    // A lone text subgroup already carries its own parens.
    let already_wrapped = parts.len() == 1 && joined.starts_with('(') && joined.ends_with(')');
    if clause_count > 1 && !already_wrapped {
        format!("({joined})")
    } else {
        joined
    }
}

fn tagged(term: &str, tag: &str) -> String {
    render_clause_string(term, Some(tag), true)
}

/// Human-readable construction schematic, e.g.
/// `(P Mesh|tw) AND (I Mesh|tw) + hedge:cochrane-therapy`.
fn formula_schematic(keys: &[&str], tags: &str, hedge_id: Option<&str>) -> String {
    if keys.is_empty() {
        return String::new();
    }
    let body = keys
        .iter()
        .map(|k| format!("({k} {tags})"))
        .collect::<Vec<_>>()
        .join(" AND ");
    match hedge_id {
        Some(id) => format!("{body} + hedge:{id}"),
        None => body,
    }
}
