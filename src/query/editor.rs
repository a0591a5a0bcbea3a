//! Structure-preserving edits over a term sequence.
//!
//! Every function takes the sequence by reference and returns a new one.
//! A shared sweep pass restores the no-dangling-operator invariant after
//! each edit, so any chain of edits starting from a valid sequence keeps
//! serializing to a valid query.

use thiserror::Error;

use super::term::{BoolOp, GroupMark, Term, TermKind, TermSequence, Vocabulary};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("term index {index} out of range (sequence has {len} terms)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("term at index {index} is not a clause")]
    NotAClause { index: usize },
}

/// What kind of vocabulary a newly added term comes from; decides the
/// field tag it gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermType {
    Mesh,
    Text,
}

impl TermType {
    fn field_tag(self) -> &'static str {
        match self {
            TermType::Mesh => "Mesh",
            TermType::Text => "tiab",
        }
    }

    fn vocabulary(self) -> Vocabulary {
        match self {
            TermType::Mesh => Vocabulary::Mesh,
            TermType::Text => Vocabulary::FreeText,
        }
    }
}

/// Append a new clause. Non-empty sequences get an `OR` joint first: a
/// newly added term widens the query, it never silently narrows it.
pub fn add_term(seq: &TermSequence, value: &str, term_type: TermType) -> TermSequence {
    let mut next_id = seq.next_id();
    let mut terms = seq.terms().to_vec();
    if !terms.is_empty() {
        terms.push(fresh(&mut next_id, TermKind::operator(BoolOp::Or)));
    }
    terms.push(fresh(
        &mut next_id,
        TermKind::Clause {
            value: value.to_string(),
            field_tag: Some(term_type.field_tag().to_string()),
            quoted: true,
            vocabulary: Some(term_type.vocabulary()),
        },
    ));
    TermSequence::from_terms(terms, next_id)
}

/// Delete the term at `index`.
///
/// Removing a clause also removes the operator that joined it in; removing
/// a group marker removes the whole balanced group span, so a balanced
/// input can never come out unbalanced.
pub fn remove_term(seq: &TermSequence, index: usize) -> Result<TermSequence, EditError> {
    if index >= seq.len() {
        return Err(EditError::IndexOutOfRange {
            index,
            len: seq.len(),
        });
    }
    let mut terms = seq.terms().to_vec();
    match terms[index].kind {
        TermKind::Clause { .. } | TermKind::Operator { .. } => {
            terms.remove(index);
            if matches!(seq.terms()[index].kind, TermKind::Clause { .. }) {
                drop_adjacent_operator(&mut terms, index);
            }
        }
        TermKind::Group { mark: GroupMark::Open } => {
            let close = matching_close(&terms, index).unwrap_or(terms.len() - 1);
            terms.drain(index..=close);
            drop_adjacent_operator(&mut terms, index);
        }
        TermKind::Group { mark: GroupMark::Close } => {
            let open = matching_open(&terms, index).unwrap_or(0);
            terms.drain(open..=index);
            drop_adjacent_operator(&mut terms, open);
        }
    }
    Ok(TermSequence::from_terms(sweep(terms), seq.next_id()))
}

/// Safe variant of [`remove_term`]: an out-of-range index is a no-op
/// instead of an error.
pub fn remove_term_clamped(seq: &TermSequence, index: usize) -> TermSequence {
    remove_term(seq, index).unwrap_or_else(|_| seq.clone())
}

/// Move the clause at `from` so it lands at position `to`.
///
/// Only clauses move; the operator that joined the clause travels with it
/// and is re-seated against the clause's new neighbors, so operator count
/// and group balance are both preserved.
pub fn reorder(seq: &TermSequence, from: usize, to: usize) -> Result<TermSequence, EditError> {
    let len = seq.len();
    if from >= len {
        return Err(EditError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(EditError::IndexOutOfRange { index: to, len });
    }
    if !seq.terms()[from].is_clause() {
        return Err(EditError::NotAClause { index: from });
    }
    if from == to {
        return Ok(seq.clone());
    }

    let mut terms = seq.terms().to_vec();
    let clause = terms[from].clone();

    // Pull the clause out together with one adjacent operator.
    let mut removed = vec![from];
    let carried = if from > 0 && terms[from - 1].is_operator() {
        removed.push(from - 1);
        let op = terms[from - 1].clone();
        terms.drain(from - 1..=from);
        Some(op)
    } else if from + 1 < terms.len() && terms[from + 1].is_operator() {
        removed.push(from + 1);
        let op = terms[from + 1].clone();
        terms.drain(from..=from + 1);
        Some(op)
    } else {
        terms.remove(from);
        None
    };

    // Position of the displaced term inside the reduced vec: forward moves
    // land after it, backward moves land before it.
    let shift = removed.iter().filter(|&&i| i < to).count();
    let target = to.saturating_sub(shift).min(terms.len());
    let insert_at = if from < to {
        (target + 1).min(terms.len())
    } else {
        target
    };

    match carried {
        None => {
            terms.insert(insert_at, clause);
        }
        Some(op) => {
            // Joint goes on the side where the clause meets an existing
            // clause or closed group; otherwise it trails the clause.
            let prev_joins = insert_at > 0
                && (terms[insert_at - 1].is_clause() || terms[insert_at - 1].is_group_close());
            if prev_joins {
                terms.insert(insert_at, clause);
                terms.insert(insert_at, op);
            } else {
                terms.insert(insert_at, op);
                terms.insert(insert_at, clause);
            }
        }
    }

    Ok(TermSequence::from_terms(sweep(terms), seq.next_id()))
}

fn fresh(next_id: &mut u32, kind: TermKind) -> Term {
    let id = *next_id;
    *next_id += 1;
    Term { id, kind }
}

/// After removing the element that used to sit at `index`, drop the
/// operator the removal left dangling, preferring the one before.
fn drop_adjacent_operator(terms: &mut Vec<Term>, index: usize) {
    if index > 0 && terms[index - 1].is_operator() {
        terms.remove(index - 1);
    } else if index < terms.len() && terms[index].is_operator() {
        terms.remove(index);
    }
}

fn matching_close(terms: &[Term], open: usize) -> Option<usize> {
    let mut depth = 0;
    for (i, term) in terms.iter().enumerate().skip(open) {
        match term.kind {
            TermKind::Group { mark: GroupMark::Open } => depth += 1,
            TermKind::Group { mark: GroupMark::Close } => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn matching_open(terms: &[Term], close: usize) -> Option<usize> {
    let mut depth = 0;
    for i in (0..=close).rev() {
        match terms[i].kind {
            TermKind::Group { mark: GroupMark::Close } => depth += 1,
            TermKind::Group { mark: GroupMark::Open } => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Normalization run after every edit: strip empty groups, boundary
/// operators, operators stranded against group markers, and adjacent
/// operator runs. Repeats until stable.
pub(crate) fn sweep(mut terms: Vec<Term>) -> Vec<Term> {
    loop {
        let before = terms.len();
        terms = remove_empty_groups(terms);
        terms = strip_boundary_operators(terms);
        terms = collapse_operator_runs(terms);
        if terms.len() == before {
            return terms;
        }
    }
}

fn remove_empty_groups(tokens: Vec<Term>) -> Vec<Term> {
    let mut out: Vec<Term> = Vec::with_capacity(tokens.len());
    for term in tokens {
        if term.is_group_close() && out.last().map(|t| t.is_group_open()).unwrap_or(false) {
            out.pop();
            continue;
        }
        out.push(term);
    }
    out
}

fn strip_boundary_operators(terms: Vec<Term>) -> Vec<Term> {
    let start = terms.iter().position(|t| !t.is_operator());
    let end = terms.iter().rposition(|t| !t.is_operator());
    match (start, end) {
        (Some(s), Some(e)) if s <= e => terms[s..=e].to_vec(),
        _ => vec![],
    }
}

fn collapse_operator_runs(terms: Vec<Term>) -> Vec<Term> {
    let mut out: Vec<Term> = Vec::with_capacity(terms.len());
    for term in terms {
        if term.is_operator() {
            // Operator right after an open paren or another operator dangles.
            match out.last() {
                Some(prev) if prev.is_group_open() || prev.is_operator() => continue,
                None => continue,
                _ => {}
            }
        }
        if term.is_group_close() {
            // Operator stranded against the closing paren dangles too.
            while out.last().map(|t| t.is_operator()).unwrap_or(false) {
                out.pop();
            }
        }
        out.push(term);
    }
    out
}
