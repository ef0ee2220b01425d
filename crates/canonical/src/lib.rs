//! Listmatch canonical text layer.
//!
//! Turns raw product and listing strings into token sequences that the
//! index and matcher can compare exactly.
//!
//! ## What we do
//!
//! - Tokenization: maximal runs of ASCII letters or ASCII digits, lowercased,
//!   with byte offsets back into the source text
//! - Contiguous token-sequence search ([`find_first`], [`find_all`],
//!   [`contains`])
//! - Relaxed textual keys for catalog deduplication ([`strip_key`])
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same input, same tokens.
//!
//! ## Invariants worth knowing
//!
//! - A token's text is non-empty and drawn from one character class
//! - Tokens never overlap; the gap between two tokens holds only separators
//! - `token.end == token.start + token.text.len()`

mod key;
mod search;
mod token;

pub use crate::key::strip_key;
pub use crate::search::{contains, find_all, find_first};
pub use crate::token::{tokenize, Token, TokenClass, Tokens};
