mod normalize;

pub use normalize::normalize_for_substring_match;

use normalize::is_token_char;

/// Tokens shorter than this (in chars) are never indexed or queried.
pub const MIN_TOKEN_CHARS: usize = 2;

/// A normalized token with its byte span inside the normalized text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub start: usize,
    pub end: usize,
}

/// Normalize `text` and split it into index tokens, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_normalized(&normalize_for_substring_match(text))
        .into_iter()
        .map(|token| token.term)
        .collect()
}

/// Split already-normalized text on runs of non-alphanumeric chars, keeping spans.
pub fn tokenize_normalized(normalized: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start: Option<usize> = None;

    for (offset, ch) in normalized.char_indices() {
        match (is_token_char(ch), run_start) {
            (true, None) => run_start = Some(offset),
            (false, Some(start)) => {
                push_token(&mut tokens, normalized, start, offset);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        push_token(&mut tokens, normalized, start, normalized.len());
    }

    tokens
}

fn push_token(tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
    let term = &text[start..end];
    if term.chars().count() < MIN_TOKEN_CHARS {
        return;
    }
    tokens.push(Token {
        term: term.to_string(),
        start,
        end,
    });
}
