use serde::{Deserialize, Serialize};

/// Boolean connective between clauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }

    /// Word-boundary operator recognition, case-insensitive.
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(BoolOp::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(BoolOp::Or)
        } else if word.eq_ignore_ascii_case("not") {
            Some(BoolOp::Not)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupMark {
    Open,
    Close,
}

/// Where a clause's text came from. Informational only; it never changes
/// how the clause parses or serializes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    Mesh,
    #[serde(rename = "freetext")]
    FreeText,
    Entry,
}

/// One parsed unit of a boolean query. Exhaustive matching on this enum is
/// what keeps "treated a group as a clause" bugs out of every consumer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TermKind {
    Operator { op: BoolOp },
    Group { mark: GroupMark },
    Clause {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field_tag: Option<String>,
        #[serde(default)]
        quoted: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        vocabulary: Option<Vocabulary>,
    },
}

impl TermKind {
    pub fn clause(value: impl Into<String>, field_tag: Option<String>, quoted: bool) -> Self {
        TermKind::Clause {
            value: value.into(),
            field_tag,
            quoted,
            vocabulary: None,
        }
    }

    pub fn operator(op: BoolOp) -> Self {
        TermKind::Operator { op }
    }

    pub fn group(mark: GroupMark) -> Self {
        TermKind::Group { mark }
    }
}

/// A term plus its stable id. Ids survive edits and reorders so a UI can
/// track rows across updates; equality of kinds ignores ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: u32,
    #[serde(flatten)]
    pub kind: TermKind,
}

impl Term {
    pub fn is_clause(&self) -> bool {
        matches!(self.kind, TermKind::Clause { .. })
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.kind, TermKind::Operator { .. })
    }

    pub fn is_group_open(&self) -> bool {
        matches!(self.kind, TermKind::Group { mark: GroupMark::Open })
    }

    pub fn is_group_close(&self) -> bool {
        matches!(self.kind, TermKind::Group { mark: GroupMark::Close })
    }
}

/// An ordered term list representing one query. Order is the query.
/// The sequence owns the id counter so edits hand out fresh, unique ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TermSequence {
    terms: Vec<Term>,
    next_id: u32,
}

impl TermSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from terms that already carry ids, preserving them.
    pub(crate) fn from_terms(terms: Vec<Term>, next_id: u32) -> Self {
        Self { terms, next_id }
    }

    pub(crate) fn push(&mut self, kind: TermKind) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.terms.push(Term { id, kind });
        id
    }

    pub(crate) fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Term> {
        self.terms.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    /// Count of clause terms (the draggable/editable units).
    pub fn clause_count(&self) -> usize {
        self.terms.iter().filter(|t| t.is_clause()).count()
    }

    /// Maximum group nesting depth; negative intermediate depth means an
    /// unbalanced sequence, which the validator reports.
    pub fn nesting_depth(&self) -> usize {
        let mut depth: i32 = 0;
        let mut max = 0;
        for term in &self.terms {
            match term.kind {
                TermKind::Group { mark: GroupMark::Open } => {
                    depth += 1;
                    max = max.max(depth);
                }
                TermKind::Group { mark: GroupMark::Close } => depth -= 1,
                _ => {}
            }
        }
        max.max(0) as usize
    }

    /// True when every group open has a matching close.
    pub fn is_balanced(&self) -> bool {
        let mut depth: i32 = 0;
        for term in &self.terms {
            match term.kind {
                TermKind::Group { mark: GroupMark::Open } => depth += 1,
                TermKind::Group { mark: GroupMark::Close } => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}
