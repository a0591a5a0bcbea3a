//! Synthesizer contracts: construction grammar, hedge selection,
//! determinism, and empty-input behavior.

use crate::concepts::Concept;
use crate::config::QueryConfig;
use crate::hedges::HedgeLibrary;
use crate::query::validate;
use crate::strategy::{synthesize, synthesize_with};

fn pico_concepts() -> Vec<Concept> {
    vec![
        Concept {
            key: "P".to_string(),
            label: "Population".to_string(),
            original_value: "adults with type 2 diabetes".to_string(),
            mesh_terms: vec!["Diabetes Mellitus".to_string()],
            free_text_terms: vec!["diabetes".to_string(), "blood sugar".to_string()],
            entry_terms: vec![],
        },
        Concept {
            key: "I".to_string(),
            label: "Intervention".to_string(),
            original_value: "metformin".to_string(),
            mesh_terms: vec!["Metformin".to_string()],
            free_text_terms: vec!["metformin".to_string()],
            entry_terms: vec!["dimethylbiguanide".to_string()],
        },
    ]
}

#[test]
fn comprehensive_grammar() {
    let result = synthesize(&pico_concepts(), "PICO", None);
    let q = &result.comprehensive.query;
    assert!(
        q.contains(r#""Diabetes Mellitus"[Mesh] OR ("diabetes"[tw] OR "blood sugar"[tw])"#),
        "{q}"
    );
    // Entry terms ride along as text words.
    assert!(q.contains(r#""dimethylbiguanide"[tw]"#), "{q}");
    // Concept groups are ANDed.
    assert_eq!(q.matches(") AND (").count(), 1, "{q}");
    assert!(validate(q).is_valid);
    assert!(result.comprehensive.hedge_applied.is_none());
}

#[test]
fn direct_grammar_uses_majr_ti_and_proximity() {
    let result = synthesize(&pico_concepts(), "PICO", None);
    let q = &result.direct.query;
    assert!(q.contains(r#""Diabetes Mellitus"[Majr]"#), "{q}");
    assert!(q.contains(r#""diabetes"[ti]"#), "{q}");
    assert!(q.contains(r#""diabetes blood sugar"[tiab:~3]"#), "{q}");
    // Single free-text term: no proximity clause for the I concept.
    assert_eq!(q.matches("[tiab:~").count(), 1, "{q}");
    assert!(validate(q).is_valid);
}

#[test]
fn clinical_appends_framework_default_hedge() {
    let result = synthesize(&pico_concepts(), "PICO", None);
    let q = &result.clinical.query;
    assert!(q.starts_with(&result.comprehensive.query), "{q}");
    assert!(q.contains("AND (randomized controlled trial[pt]"), "{q}");
    assert_eq!(
        result.clinical.hedge_applied.as_deref(),
        Some("cochrane-therapy")
    );
    assert!(validate(q).is_valid);
}

#[test]
fn spider_defaults_to_qualitative_even_with_bad_override() {
    let concepts = pico_concepts();

    let by_default = synthesize(&concepts, "SPIDER", None);
    assert_eq!(
        by_default.clinical.hedge_applied.as_deref(),
        Some("wong-qualitative")
    );

    let with_bad_override = synthesize(&concepts, "SPIDER", Some("nonexistent"));
    assert_eq!(
        with_bad_override.clinical.hedge_applied.as_deref(),
        Some("wong-qualitative")
    );
    assert!(with_bad_override
        .warnings
        .iter()
        .any(|w| w.code == "hedge_not_found"));
}

#[test]
fn valid_override_wins_over_framework_default() {
    let result = synthesize(&pico_concepts(), "PICO", Some("cq-diagnosis"));
    assert_eq!(
        result.clinical.hedge_applied.as_deref(),
        Some("cq-diagnosis")
    );
    assert!(result.clinical.query.contains("sensitivity[tiab]"));
    assert!(result.warnings.iter().all(|w| w.code != "hedge_not_found"));
}

#[test]
fn synthesis_is_deterministic() {
    let concepts = pico_concepts();
    let a = synthesize(&concepts, "PICO", None);
    let b = synthesize(&concepts, "PICO", None);
    assert_eq!(a.comprehensive.query, b.comprehensive.query);
    assert_eq!(a.direct.query, b.direct.query);
    assert_eq!(a.clinical.query, b.clinical.query);
    assert_eq!(a, b);
}

#[test]
fn empty_concept_is_omitted_with_warning() {
    let mut concepts = pico_concepts();
    concepts.push(Concept::new("C"));
    let result = synthesize(&concepts, "PICO", None);
    assert!(!result.comprehensive.query.contains("()"));
    assert!(!result.comprehensive.query.contains("AND ()"));
    assert_eq!(
        result.comprehensive.query,
        synthesize(&pico_concepts(), "PICO", None).comprehensive.query
    );
    assert!(result.warnings.iter().any(|w| w.code == "empty_concept"));
}

#[test]
fn no_concepts_yields_empty_strategies() {
    let result = synthesize(&[], "PICO", None);
    assert_eq!(result.comprehensive.query, "");
    assert_eq!(result.direct.query, "");
    assert_eq!(result.clinical.query, "");
    assert!(result.clinical.hedge_applied.is_none());
    assert!(result.warnings.iter().any(|w| w.code == "no_concepts"));
}

#[test]
fn mesh_only_concept_has_no_empty_text_group() {
    let concepts = vec![Concept {
        key: "P".to_string(),
        mesh_terms: vec!["Frailty".to_string()],
        ..Concept::default()
    }];
    let result = synthesize(&concepts, "PICO", None);
    assert_eq!(result.comprehensive.query, r#""Frailty"[Mesh]"#);
    assert_eq!(result.direct.query, r#""Frailty"[Majr]"#);
}

#[test]
fn text_only_concept_has_no_empty_mesh_parens() {
    let concepts = vec![Concept {
        key: "P".to_string(),
        free_text_terms: vec!["frail".to_string(), "frailty".to_string()],
        ..Concept::default()
    }];
    let result = synthesize(&concepts, "PICO", None);
    assert_eq!(
        result.comprehensive.query,
        r#"("frail"[tw] OR "frailty"[tw])"#
    );
    // The text subgroup is not wrapped a second time.
    assert!(!result.comprehensive.query.contains("(("));
    assert!(!result.comprehensive.query.contains("[Mesh]"));
}

#[test]
fn proximity_distance_is_configurable_per_concept() {
    let mut config = QueryConfig::default();
    config.proximity_overrides.insert("P".to_string(), 7);
    let result = synthesize_with(
        &pico_concepts(),
        "PICO",
        None,
        &config,
        HedgeLibrary::builtin(),
    );
    assert!(result.direct.query.contains("[tiab:~7]"), "{}", result.direct.query);
}

#[test]
fn duplicate_terms_render_once_per_category() {
    let concepts = vec![Concept {
        key: "P".to_string(),
        mesh_terms: vec!["Aged".to_string(), "Aged".to_string()],
        free_text_terms: vec!["elderly".to_string()],
        entry_terms: vec!["elderly".to_string()],
        ..Concept::default()
    }];
    let result = synthesize(&concepts, "PICO", None);
    assert_eq!(result.comprehensive.query.matches(r#""Aged"[Mesh]"#).count(), 1);
    // Same word in free-text and entry categories still renders one [tw].
    assert_eq!(result.comprehensive.query.matches(r#""elderly"[tw]"#).count(), 1);
}
