use super::term::{GroupMark, TermKind, TermSequence};

/// Render a term sequence back into canonical query syntax.
///
/// Terms are single-space joined except around group markers: `(` binds to
/// the term after it and `)` to the term before it, so a group renders as
/// `(term OR term)`.
pub fn serialize(seq: &TermSequence) -> String {
    let mut out = String::new();
    for term in seq.iter() {
        match &term.kind {
            TermKind::Group { mark: GroupMark::Open } => {
                push_separator(&mut out);
                out.push('(');
            }
            TermKind::Group { mark: GroupMark::Close } => {
                out.push(')');
            }
            TermKind::Operator { op } => {
                push_separator(&mut out);
                out.push_str(op.as_str());
            }
            TermKind::Clause {
                value,
                field_tag,
                quoted,
                ..
            } => {
                push_separator(&mut out);
                render_clause(&mut out, value, field_tag.as_deref(), *quoted);
            }
        }
    }
    out
}

/// Render a single clause the way `serialize` would, for callers that
/// build query text directly (the synthesizer).
pub fn render_clause_string(value: &str, field_tag: Option<&str>, quoted: bool) -> String {
    let mut out = String::new();
    render_clause(&mut out, value, field_tag, quoted);
    out
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('(') {
        out.push(' ');
    }
}

fn render_clause(out: &mut String, value: &str, field_tag: Option<&str>, quoted: bool) {
    let needs_quotes = quoted || value.chars().any(char::is_whitespace);
    if needs_quotes {
        out.push('"');
        for c in value.chars() {
            if c == '"' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(value);
    }
    if let Some(tag) = field_tag {
        out.push('[');
        out.push_str(tag);
        out.push(']');
    }
}
