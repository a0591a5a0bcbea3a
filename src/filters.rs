//! Named filter fragments and the ledger that tracks which of them are
//! applied to a query.
//!
//! A filter is "active" iff its fragment currently occurs in the query
//! text, so the applied set is derived state, recomputed on every change.
//! Removal is structural by default (parse, cut the matching term window,
//! re-serialize); plain string surgery with regex cleanup is kept as a
//! fallback for text the parser cannot window-match.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::query::{self, Term, TermKind, TermSequence};
use crate::warnings::QueryWarning;

static LEADING_OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(?:AND|OR|NOT)\s+").expect("malformed regex"));
static TRAILING_OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(?i:AND|OR|NOT)$").expect("malformed regex"));
static EMPTY_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)").expect("malformed regex"));
static WS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("malformed regex"));
static PAREN_INNER_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s+|\s+\)").expect("malformed regex"));

/// A reusable boolean fragment, always written as a trailing
/// `AND ...`/`OR ...`/`NOT ...` addition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub label: String,
    pub category: String,
    pub fragment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Filter {
    pub fn new(
        label: impl Into<String>,
        category: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
            fragment: fragment.into(),
            description: None,
        }
    }
}

/// Lookup table of quick and toolbox filters. Labels are unique; on
/// duplicates the first definition wins.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FilterCatalog {
    filters: Vec<Filter>,
}

impl FilterCatalog {
    pub fn new(filters: Vec<Filter>) -> Self {
        let mut seen = Vec::new();
        let mut out = Vec::with_capacity(filters.len());
        for f in filters {
            if seen.contains(&f.label) {
                log::warn!("duplicate filter label {:?} ignored", f.label);
                continue;
            }
            seen.push(f.label.clone());
            out.push(f);
        }
        Self { filters: out }
    }

    /// The built-in quick filters plus the toolbox set.
    pub fn builtin() -> Self {
        let mut filters = vec![
            Filter::new("Humans Only", "quick", "AND humans[Mesh]"),
            Filter::new("English Language", "quick", "AND english[la]"),
            Filter::new("Free Full Text", "quick", "AND free full text[sb]"),
            Filter::new(
                "Randomized Controlled Trials",
                "quick",
                "AND randomized controlled trial[pt]",
            ),
        ];
        filters.extend([
            Filter::new("Systematic Reviews", "study_design", "AND systematic[sb]"),
            Filter::new("Meta-Analyses", "study_design", "AND meta-analysis[pt]"),
            Filter::new(
                "Clinical Trials",
                "study_design",
                "AND (clinical trial[pt] OR controlled clinical trial[pt])",
            ),
            Filter::new(
                "Observational Studies",
                "study_design",
                "AND (cohort studies[Mesh] OR case-control studies[Mesh])",
            ),
            Filter::new("Adults", "population", "AND adult[Mesh]"),
            Filter::new("Aged 65+", "population", "AND aged[Mesh]"),
            Filter::new("Children", "population", "AND child[Mesh]"),
            Filter::new("Exclude Animal Studies", "population", "NOT animals[Mesh]"),
        ]);
        Self::new(filters)
    }

    pub fn get(&self, label: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.label == label)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn by_category<'a>(&'a self, category: &str) -> Vec<&'a Filter> {
        self.filters
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }
}

/// True iff the filter's fragment occurs in the query text. The
/// operator-stripped form at query start also counts: that is what
/// `apply` writes when the query was empty.
pub fn is_active(query: &str, filter: &Filter) -> bool {
    let fragment = filter.fragment.trim();
    if fragment.is_empty() {
        return false;
    }
    if query.contains(fragment) {
        return true;
    }
    let stripped = strip_leading_operator(fragment);
    stripped != fragment && query.trim_start().starts_with(stripped)
}

/// Append the filter's fragment if it is not already active. The first
/// filter on an empty query loses its leading operator keyword.
pub fn apply(query: &str, filter: &Filter) -> String {
    if is_active(query, filter) {
        return query.to_string();
    }
    let q = query.trim();
    let fragment = filter.fragment.trim();
    if q.is_empty() {
        strip_leading_operator(fragment).to_string()
    } else {
        format!("{q} {fragment}")
    }
}

/// Remove the filter's fragment if it is active; otherwise return the
/// query unchanged. Output whitespace is canonicalized by the structural
/// path, which is the documented normalization tolerance.
pub fn retract(query: &str, filter: &Filter) -> String {
    if !is_active(query, filter) {
        return query.to_string();
    }
    if let Some(result) = retract_structural(query, &filter.fragment) {
        return result;
    }
    log::debug!(
        "structural retract found no term window for {:?}; falling back to string surgery",
        filter.label
    );
    retract_textual(query, filter)
}

/// Labels of every catalog filter currently active in `query`, in catalog
/// order.
pub fn applied_labels(query: &str, catalog: &FilterCatalog) -> Vec<String> {
    catalog
        .filters()
        .iter()
        .filter(|f| is_active(query, f))
        .map(|f| f.label.clone())
        .collect()
}

/// Label-addressed [`apply`]. Unknown labels leave the query unchanged
/// and report `unknown_filter`.
pub fn apply_by_label(
    query: &str,
    catalog: &FilterCatalog,
    label: &str,
) -> (String, Option<QueryWarning>) {
    match catalog.get(label) {
        Some(filter) => (apply(query, filter), None),
        None => (
            query.to_string(),
            Some(QueryWarning::warning(
                "unknown_filter",
                format!("no filter labeled {label:?} in the catalog"),
            )),
        ),
    }
}

/// Label-addressed [`retract`]. Unknown labels leave the query unchanged
/// and report `unknown_filter`.
pub fn retract_by_label(
    query: &str,
    catalog: &FilterCatalog,
    label: &str,
) -> (String, Option<QueryWarning>) {
    match catalog.get(label) {
        Some(filter) => (retract(query, filter), None),
        None => (
            query.to_string(),
            Some(QueryWarning::warning(
                "unknown_filter",
                format!("no filter labeled {label:?} in the catalog"),
            )),
        ),
    }
}

fn strip_leading_operator(fragment: &str) -> &str {
    match LEADING_OPERATOR.find(fragment) {
        Some(m) => &fragment[m.end()..],
        None => fragment,
    }
}

/// Parse both query and fragment, cut the fragment's term window out of
/// the query's sequence, sweep dangling operators, and re-serialize.
/// Returns `None` when no window matches.
fn retract_structural(query: &str, fragment: &str) -> Option<String> {
    let seq = query::parse(query);
    let frag_terms: Vec<Term> = query::parse(fragment).terms().to_vec();
    if frag_terms.is_empty() {
        return None;
    }

    let mut terms: Vec<Term> = seq.terms().to_vec();
    let (start, window_len, window_has_joint) = match find_window(&terms, &frag_terms) {
        Some(s) => (s, frag_terms.len(), frag_terms[0].is_operator()),
        // Operator-stripped form, written when the filter landed on an
        // empty query.
        None if frag_terms[0].is_operator() && terms_window_at(&terms, &frag_terms[1..], 0) => {
            (0, frag_terms.len() - 1, false)
        }
        None => return None,
    };

    terms.drain(start..start + window_len);
    if !window_has_joint {
        // The cut clause left its joining operator behind.
        if start > 0 && terms.get(start - 1).map(Term::is_operator).unwrap_or(false) {
            terms.remove(start - 1);
        } else if terms.get(start).map(Term::is_operator).unwrap_or(false) {
            terms.remove(start);
        }
    }

    let swept = query::sweep(terms);
    Some(query::serialize(&TermSequence::from_terms(
        swept,
        seq.next_id(),
    )))
}

fn find_window(terms: &[Term], frag: &[Term]) -> Option<usize> {
    if frag.len() > terms.len() {
        return None;
    }
    (0..=terms.len() - frag.len()).find(|&i| terms_window_at(terms, frag, i))
}

fn terms_window_at(terms: &[Term], frag: &[Term], start: usize) -> bool {
    if start + frag.len() > terms.len() {
        return false;
    }
    frag.iter()
        .zip(&terms[start..start + frag.len()])
        .all(|(a, b)| kinds_match(&a.kind, &b.kind))
}

/// Kind equality that ignores the `quoted` presentation flag: a bare
/// phrase and its quoted serialization are the same clause.
fn kinds_match(a: &TermKind, b: &TermKind) -> bool {
    match (a, b) {
        (
            TermKind::Clause {
                value: va,
                field_tag: ta,
                ..
            },
            TermKind::Clause {
                value: vb,
                field_tag: tb,
                ..
            },
        ) => va == vb && ta == tb,
        _ => a == b,
    }
}

/// Raw substring removal plus best-effort regex cleanup of the doubled
/// whitespace and empty parens the cut leaves behind.
fn retract_textual(query: &str, filter: &Filter) -> String {
    let fragment = filter.fragment.trim();
    let stripped = strip_leading_operator(fragment);

    let mut out = if let Some(pos) = query.find(fragment) {
        let mut s = query.to_string();
        s.replace_range(pos..pos + fragment.len(), "");
        s
    } else if query.trim_start().starts_with(stripped) {
        let trimmed = query.trim_start();
        trimmed[stripped.len()..].to_string()
    } else {
        return query.to_string();
    };

    loop {
        let cleaned = EMPTY_GROUP.replace_all(&out, "").into_owned();
        if cleaned == out {
            break;
        }
        out = cleaned;
    }
    let out = PAREN_INNER_SPACE.replace_all(&out, |caps: &regex::Captures| {
        if caps[0].starts_with('(') { "(" } else { ")" }.to_string()
    });
    let out = WS_RUN.replace_all(&out, " ");
    let out = out.trim();
    let out = LEADING_OPERATOR.replace(out, "");
    let out = TRAILING_OPERATOR.replace(&out, "");
    out.trim().to_string()
}
