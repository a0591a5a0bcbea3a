//! Character-level scan of a raw query string.
//!
//! The lexer never fails: malformed constructs (unterminated quotes,
//! unclosed tag brackets) degrade to verbatim word tokens that the
//! validator flags later.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word or phrase, optionally carrying a `[tag]` suffix
    Word {
        value: String,
        tag: Option<String>,
    },
    /// `"quoted phrase"`, optionally carrying a `[tag]` suffix
    Quoted {
        value: String,
        tag: Option<String>,
    },
    And,
    Or,
    Not,
    LParen,
    RParen,
}

pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        match chars[i] {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '"' => match read_quoted(&chars, &mut i) {
                Some(value) => {
                    let tag = read_tag(&chars, &mut i);
                    tokens.push(Token::Quoted { value, tag });
                }
                None => {
                    // Unterminated quote: the rest of the input becomes one
                    // verbatim word token, quote character included.
                    let value: String = chars[i..].iter().collect();
                    i = len;
                    tokens.push(Token::Word { value, tag: None });
                }
            },
            _ => {
                let word = read_word(&chars, &mut i);
                match word.as_str() {
                    w if w.eq_ignore_ascii_case("and") => tokens.push(Token::And),
                    w if w.eq_ignore_ascii_case("or") => tokens.push(Token::Or),
                    w if w.eq_ignore_ascii_case("not") => tokens.push(Token::Not),
                    _ => {
                        let (value, tag) = read_phrase(word, &chars, &mut i);
                        tokens.push(Token::Word { value, tag });
                    }
                }
            }
        }
    }

    tokens
}

/// Read a quoted string starting at `chars[*i] == '"'`. Returns `None`
/// without consuming anything if the quote never closes.
fn read_quoted(chars: &[char], i: &mut usize) -> Option<String> {
    let mut j = *i + 1;
    let mut s = String::new();
    while j < chars.len() {
        if chars[j] == '\\' && j + 1 < chars.len() {
            s.push(chars[j + 1]);
            j += 2;
            continue;
        }
        if chars[j] == '"' {
            *i = j + 1;
            return Some(s);
        }
        s.push(chars[j]);
        j += 1;
    }
    None
}

/// Read one whitespace/delimiter-bounded word.
fn read_word(chars: &[char], i: &mut usize) -> String {
    let mut word = String::new();
    while *i < chars.len() {
        match chars[*i] {
            ' ' | '\t' | '\n' | '\r' | '(' | ')' | '"' | '[' => break,
            c => {
                word.push(c);
                *i += 1;
            }
        }
    }
    word
}

/// Read a `[tag]` suffix directly following the cursor. An unclosed `[`
/// is left untouched for the caller to fold into the clause text.
fn read_tag(chars: &[char], i: &mut usize) -> Option<String> {
    if *i >= chars.len() || chars[*i] != '[' {
        return None;
    }
    let close = chars[*i + 1..].iter().position(|&c| c == ']')?;
    let tag: String = chars[*i + 1..*i + 1 + close].iter().collect();
    *i += close + 2;
    Some(tag)
}

/// Extend a bare word into a phrase: consecutive bare words with no
/// operator, quote, paren, or tag between them are one clause, so
/// `blood sugar level` parses as a single unit and `diabetes
/// mellitus[Mesh]` tags the whole phrase.
fn read_phrase(first: String, chars: &[char], i: &mut usize) -> (String, Option<String>) {
    let mut value = first;
    loop {
        // Tag directly attached to the word just read ends the phrase.
        if let Some(tag) = read_tag(chars, i) {
            return (value, Some(tag));
        }
        // Unclosed bracket: fold verbatim into the clause text.
        if *i < chars.len() && chars[*i] == '[' {
            while *i < chars.len() {
                value.push(chars[*i]);
                *i += 1;
            }
            return (value, None);
        }
        // Peek past a single run of spaces for another bare word.
        let mut j = *i;
        while j < chars.len() && (chars[j] == ' ' || chars[j] == '\t') {
            j += 1;
        }
        if j == *i || j >= chars.len() {
            return (value, None);
        }
        match chars[j] {
            '(' | ')' | '"' | '\n' | '\r' | '[' => return (value, None),
            _ => {}
        }
        let mut k = j;
        let word = read_word(chars, &mut k);
        if word.is_empty() || is_operator_word(&word) {
            return (value, None);
        }
        value.push(' ');
        value.push_str(&word);
        *i = k;
    }
}

fn is_operator_word(word: &str) -> bool {
    word.eq_ignore_ascii_case("and")
        || word.eq_ignore_ascii_case("or")
        || word.eq_ignore_ascii_case("not")
}
