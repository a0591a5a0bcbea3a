//! Boolean query model: parse a raw database query into an editable term
//! sequence, edit it structurally, and serialize it back to canonical
//! syntax.
//!
//! Parsing is total: malformed input degrades to verbatim clause terms
//! instead of failing, and the validator reports what is wrong.

mod editor;
mod lexer;
mod serialize;
mod term;
mod validate;

pub use editor::{add_term, remove_term, remove_term_clamped, reorder, EditError, TermType};
pub(crate) use editor::sweep;
pub use serialize::{render_clause_string, serialize};
pub use term::{BoolOp, GroupMark, Term, TermKind, TermSequence, Vocabulary};
pub use validate::{validate, validate_with, Validation};

use lexer::Token;

/// Parse a raw query string into a term sequence.
///
/// Behavior:
/// - `AND`/`OR`/`NOT` matched case-insensitively on word boundaries
/// - `"phrase"[tag]` and `word[tag]` are single clauses; the tag content
///   (including a proximity suffix like `tiab:~3`) is captured verbatim
/// - consecutive bare words merge into one clause
/// - parens become group markers; nesting is tracked, not limited
/// - unterminated quotes and stray brackets become verbatim clauses;
///   parsing never fails
pub fn parse(raw: &str) -> TermSequence {
    let mut seq = TermSequence::new();
    for token in lexer::tokenize(raw) {
        let kind = match token {
            Token::And => TermKind::operator(BoolOp::And),
            Token::Or => TermKind::operator(BoolOp::Or),
            Token::Not => TermKind::operator(BoolOp::Not),
            Token::LParen => TermKind::group(GroupMark::Open),
            Token::RParen => TermKind::group(GroupMark::Close),
            Token::Word { value, tag } => TermKind::clause(value, tag, false),
            Token::Quoted { value, tag } => TermKind::clause(value, tag, true),
        };
        seq.push(kind);
    }
    seq
}
