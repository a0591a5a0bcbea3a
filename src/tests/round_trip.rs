//! Round-trip obligations: parse → serialize preserves clause content,
//! operator order, and nesting for every well-formed query in the corpus.

use crate::query::{parse, serialize, validate, TermKind};

const CORPUS: &[&str] = &[
    r#"diabetes[Mesh]"#,
    r#"("elderly"[tiab] OR aged[ti]) AND diabetes[Mesh]"#,
    r#"diabetes mellitus[Mesh] AND (insulin[tw] OR "blood sugar"[tw])"#,
    r#"(copd[Mesh] OR "chronic obstructive"[tiab]) NOT asthma[Mesh]"#,
    r#"("heart attack"[tiab:~3] OR myocardial infarction[Mesh]) AND aspirin[tw]"#,
    r#"((a[Mesh] OR b[tw]) AND (c[ti] OR d[tiab])) NOT e[pt]"#,
    r#"frailty[Majr] AND "nursing homes"[Mesh] AND english[la]"#,
];

fn clause_signature(raw: &str) -> Vec<(String, Option<String>)> {
    let mut sig: Vec<(String, Option<String>)> = parse(raw)
        .iter()
        .filter_map(|t| match &t.kind {
            TermKind::Clause {
                value, field_tag, ..
            } => Some((value.clone(), field_tag.clone())),
            _ => None,
        })
        .collect();
    sig.sort();
    sig
}

fn operator_signature(raw: &str) -> Vec<String> {
    parse(raw)
        .iter()
        .filter_map(|t| match t.kind {
            TermKind::Operator { op } => Some(op.as_str().to_string()),
            _ => None,
        })
        .collect()
}

#[test]
fn corpus_round_trips_semantically() {
    for raw in CORPUS {
        let rendered = serialize(&parse(raw));
        assert_eq!(
            clause_signature(raw),
            clause_signature(&rendered),
            "clause multiset changed for {raw}"
        );
        assert_eq!(
            operator_signature(raw),
            operator_signature(&rendered),
            "operator sequence changed for {raw}"
        );
        assert_eq!(
            parse(raw).nesting_depth(),
            parse(&rendered).nesting_depth(),
            "nesting depth changed for {raw}"
        );
    }
}

#[test]
fn corpus_serialization_is_stable() {
    for raw in CORPUS {
        let once = serialize(&parse(raw));
        assert_eq!(once, serialize(&parse(&once)), "unstable for {raw}");
    }
}

#[test]
fn corpus_is_wellformed() {
    for raw in CORPUS {
        let v = validate(raw);
        assert!(v.is_valid, "{raw}: {:?}", v.warnings);
    }
}
