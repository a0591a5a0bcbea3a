//! Host-side I/O shape: concept vocabulary arrives as JSON from the
//! external vocabulary service and deserializes directly into `Concept`s.

use std::fs;
use std::io::Write;

use crate::concepts::Concept;
use crate::strategy::synthesize;

const VOCABULARY_PAYLOAD: &str = r#"[
  {
    "key": "P",
    "label": "Population",
    "original_value": "elderly patients with hip fracture",
    "mesh_terms": ["Hip Fractures", "Aged"],
    "free_text_terms": ["hip fracture", "elderly"],
    "entry_terms": ["femoral neck fracture"]
  },
  {
    "key": "O",
    "mesh_terms": [],
    "free_text_terms": ["mobility"],
    "entry_terms": []
  }
]"#;

#[test]
fn concepts_deserialize_from_vocabulary_payload() {
    let concepts: Vec<Concept> = serde_json::from_str(VOCABULARY_PAYLOAD).unwrap();
    assert_eq!(concepts.len(), 2);
    assert_eq!(concepts[0].key, "P");
    assert_eq!(concepts[0].mesh_terms, vec!["Hip Fractures", "Aged"]);
    // Missing fields default to empty.
    assert!(concepts[1].label.is_empty());
    assert!(concepts[1].entry_terms.is_empty());
}

#[test]
fn concepts_file_feeds_synthesis() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(VOCABULARY_PAYLOAD.as_bytes()).unwrap();

    let raw = fs::read_to_string(file.path()).unwrap();
    let concepts: Vec<Concept> = serde_json::from_str(&raw).unwrap();
    let result = synthesize(&concepts, "PICO", None);
    assert!(result.comprehensive.query.contains(r#""Hip Fractures"[Mesh]"#));
    assert!(result.comprehensive.query.contains(r#""mobility"[tw]"#));
    assert!(result.warnings.is_empty());
}

#[test]
fn strategy_json_output_is_machine_readable() {
    let concepts: Vec<Concept> = serde_json::from_str(VOCABULARY_PAYLOAD).unwrap();
    let result = synthesize(&concepts, "PEO", None);
    let json = serde_json::to_string(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["clinical"]["hedge_applied"], "cq-etiology");
    assert_eq!(value["comprehensive"]["expected_yield"], "high");
}
