//! Shell-word tokenization
//!
//! Second parsing phase: break one pipeline stage into argv-style words.
//! Unlike the delimiter splitter, this pass consumes quotes and escapes:
//! single quotes are fully literal, double quotes honor `\"` and `\\`,
//! and a bare backslash makes the next character literal.

use crate::error::{Error, Result};

/// Tokenize a stage into shell words.
///
/// Quoting rules follow POSIX word splitting: adjacent quoted and unquoted
/// spans concatenate into one word, and an empty quoted span yields an
/// empty word. Unterminated quotes and dangling escapes are errors.
pub fn split_words(text: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current: Option<String> = None;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if let Some(word) = current.take() {
                    words.push(word);
                }
            }
            '\'' => {
                let word = current.get_or_insert_with(String::new);
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(Error::Parse("no closing quotation".to_string())),
                    }
                }
            }
            '"' => {
                let word = current.get_or_insert_with(String::new);
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => {
                                return Err(Error::Parse("no escaped character".to_string()));
                            }
                        },
                        Some(c) => word.push(c),
                        None => return Err(Error::Parse("no closing quotation".to_string())),
                    }
                }
            }
            '\\' => match chars.next() {
                Some(c) => current.get_or_insert_with(String::new).push(c),
                None => return Err(Error::Parse("no escaped character".to_string())),
            },
            c => current.get_or_insert_with(String::new).push(c),
        }
    }

    if let Some(word) = current.take() {
        words.push(word);
    }
    Ok(words)
}

/// Quote a word so [`split_words`] reproduces it verbatim.
pub fn quote_word(word: &str) -> String {
    if word.is_empty() {
        return "''".to_string();
    }
    let safe = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r#"'"'"'"#))
    }
}

/// Join words into a single command line, quoting as needed.
pub fn join_words<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    words
        .into_iter()
        .map(quote_word)
        .collect::<Vec<_>>()
        .join(" ")
}
