//! Lexical analysis for ATF transliterations.
//!
//! ATF documents interleave structural markup (`@tablet`, `@obverse`),
//! numbered transliteration lines (`1. a-na be-li`), lemmatization lines
//! (`#lem: king; ruler`), free-text annotations and translations. Each of
//! these has its own lexical rules, so the scanner runs in one of several
//! exclusive modes and keeps them on a stack:
//!
//! - `Document`: structural markup and punctuation; a line label enters `Text`
//! - `Text`: whitespace-separated words up to the end of the line
//! - `Lemmatize`: semicolon-separated lemmata up to the end of the line
//! - `Absorb`: free text with inline flags up to the end of the line
//! - `Translation`: like `Document`, but line labels introduce free text
//!
//! A newline pops `Text`, `Lemmatize` and `Absorb`; `Document` and
//! `Translation` treat it as an ordinary token.

pub mod keywords;
pub mod mode;
pub mod rules;
pub mod scanner;
pub mod token;

pub use keywords::{Keyword, KeywordCategory, KeywordRegistry};
pub use mode::{Mode, ModeStack};
pub use scanner::{tokenize, Lexer, ScanOptions, ScanOutput, ScanSession};
pub use token::{Span, Token, TokenKind, Trivia, TriviaKind};

/// Debug helper: one token per line as `line KIND "text"`
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| format!("{:>4} {} {:?}", t.line, t.kind, t.text))
        .collect::<Vec<_>>()
        .join("\n")
}
