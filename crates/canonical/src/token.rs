use serde::{Deserialize, Serialize};

/// Character class a token is drawn from.
///
/// Only ASCII letters and ASCII digits form tokens. Every other character,
/// including non-ASCII letters, acts as a separator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Letter,
    Digit,
}

impl TokenClass {
    /// Classify a single character, or `None` for a separator.
    pub fn of(ch: char) -> Option<Self> {
        if ch.is_ascii_alphabetic() {
            Some(TokenClass::Letter)
        } else if ch.is_ascii_digit() {
            Some(TokenClass::Digit)
        } else {
            None
        }
    }
}

/// A token with its UTF-8 byte offsets in the source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Lowercased token text, letters only or digits only.
    pub text: String,
    /// Byte offset (inclusive) in the source text.
    pub start: usize,
    /// Byte offset (exclusive) in the source text.
    pub end: usize,
}

impl Token {
    /// `(start, end)` pair, handy for highlighting the source text.
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn class(&self) -> Option<TokenClass> {
        self.text.chars().next().and_then(TokenClass::of)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Lazy tokenizer over a borrowed string.
///
/// Yields maximal runs of same-class characters, lowercased. A letter run
/// and a digit run are never merged even when adjacent, so `"hx100"` gives
/// `"hx"` then `"100"`. Since only ASCII characters form tokens, offsets
/// into the lowercased text are also valid offsets into the original.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let rest = &self.text[self.pos..];
        let mut chars = rest.char_indices();

        // Skip separators one character at a time.
        let (offset, class) = loop {
            let (idx, ch) = chars.next()?;
            if let Some(class) = TokenClass::of(ch) {
                break (idx, class);
            }
        };

        let start = self.pos + offset;
        let len = rest[offset..]
            .char_indices()
            .find(|&(_, ch)| TokenClass::of(ch) != Some(class))
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len() - offset);
        let end = start + len;
        self.pos = end;

        Some(Token {
            text: self.text[start..end].to_ascii_lowercase(),
            start,
            end,
        })
    }
}

/// Tokenizes `text` into lowercase letter runs and digit runs with byte
/// offsets. Never fails; empty or separator-only input yields no tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokens::new(text).collect()
}
