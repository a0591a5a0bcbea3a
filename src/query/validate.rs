//! Structural well-formedness checks. The validator only reports; it
//! never blocks, throws, or rewrites anything.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::lexer::{self, Token};
use crate::config::QueryConfig;
use crate::warnings::{QueryWarning, Severity};

static PROXIMITY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+):~([0-9]+)$").expect("malformed regex"));

/// Outcome of a validation pass. `is_valid` is false iff any warning
/// carries `Severity::Error`; advisory warnings may be present either way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub is_valid: bool,
    pub warnings: Vec<QueryWarning>,
}

impl Validation {
    fn from_warnings(warnings: Vec<QueryWarning>) -> Self {
        let is_valid = !warnings.iter().any(|w| w.severity == Severity::Error);
        Self { is_valid, warnings }
    }
}

pub fn validate(raw: &str) -> Validation {
    validate_with(raw, &QueryConfig::default())
}

pub fn validate_with(raw: &str, config: &QueryConfig) -> Validation {
    let mut warnings = Vec::new();
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        warnings.push(QueryWarning::error("empty_query", "query is empty"));
        return Validation::from_warnings(warnings);
    }

    if !quotes_balanced(trimmed) {
        warnings.push(QueryWarning::error(
            "unbalanced_quotes",
            "odd number of unescaped double quotes",
        ));
    }

    check_parens(trimmed, &mut warnings);

    let tokens = lexer::tokenize(trimmed);
    check_operator_placement(&tokens, &mut warnings);
    check_field_tags(&tokens, config, &mut warnings);

    if trimmed.len() > config.max_query_len {
        warnings.push(QueryWarning::warning(
            "query_too_long",
            format!(
                "query is {} chars; providers may truncate beyond {}",
                trimmed.len(),
                config.max_query_len
            ),
        ));
    }

    Validation::from_warnings(warnings)
}

fn quotes_balanced(raw: &str) -> bool {
    let mut count = 0usize;
    let mut prev_backslash = false;
    for c in raw.chars() {
        if c == '"' && !prev_backslash {
            count += 1;
        }
        prev_backslash = c == '\\' && !prev_backslash;
    }
    count % 2 == 0
}

fn check_parens(raw: &str, warnings: &mut Vec<QueryWarning>) {
    let mut depth: i32 = 0;
    let mut in_quotes = false;
    let mut prev_backslash = false;
    for c in raw.chars() {
        match c {
            '"' if !prev_backslash => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => {
                depth -= 1;
                if depth < 0 {
                    break;
                }
            }
            _ => {}
        }
        prev_backslash = c == '\\' && !prev_backslash;
    }
    if depth != 0 {
        warnings.push(QueryWarning::error(
            "unbalanced_parens",
            "parentheses do not balance",
        ));
    }
}

fn check_operator_placement(tokens: &[Token], warnings: &mut Vec<QueryWarning>) {
    let is_op = |t: &Token| matches!(t, Token::And | Token::Or | Token::Not);

    if tokens.first().map(is_op).unwrap_or(false) {
        warnings.push(QueryWarning::error(
            "leading_operator",
            "query starts with a boolean operator",
        ));
    }
    if tokens.last().map(is_op).unwrap_or(false) {
        warnings.push(QueryWarning::error(
            "trailing_operator",
            "query ends with a boolean operator",
        ));
    }
    for pair in tokens.windows(2) {
        match (&pair[0], &pair[1]) {
            (a, b) if is_op(a) && is_op(b) => {
                warnings.push(QueryWarning::error(
                    "adjacent_operators",
                    "two boolean operators in a row",
                ));
            }
            (Token::LParen, b) if is_op(b) => {
                warnings.push(QueryWarning::error(
                    "leading_operator",
                    "boolean operator directly after an open parenthesis",
                ));
            }
            (a, Token::RParen) if is_op(a) => {
                warnings.push(QueryWarning::error(
                    "trailing_operator",
                    "boolean operator directly before a close parenthesis",
                ));
            }
            _ => {}
        }
    }
}

fn check_field_tags(tokens: &[Token], config: &QueryConfig, warnings: &mut Vec<QueryWarning>) {
    for token in tokens {
        let tag = match token {
            Token::Word { tag: Some(t), .. } | Token::Quoted { tag: Some(t), .. } => t,
            _ => continue,
        };
        if config.is_known_tag(tag) {
            continue;
        }
        if let Some(caps) = PROXIMITY_TAG.captures(tag) {
            let field = &caps[1];
            let distance: u32 = caps[2].parse().unwrap_or(0);
            if !config.is_known_tag(field) {
                warnings.push(QueryWarning::error(
                    "unknown_field_tag",
                    format!("proximity tag on unknown field [{tag}]"),
                ));
            } else if distance < 1 || distance > config.max_proximity {
                warnings.push(QueryWarning::error(
                    "invalid_proximity",
                    format!(
                        "proximity distance {} outside 1..={}",
                        distance, config.max_proximity
                    ),
                ));
            }
        } else {
            warnings.push(QueryWarning::error(
                "unknown_field_tag",
                format!("unrecognized field tag [{tag}]"),
            ));
        }
    }
}
