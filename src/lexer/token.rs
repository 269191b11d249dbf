//! Token definitions

use serde::Serialize;
use std::fmt;

/// Byte range of a token or discarded span in the source buffer
pub type Span = std::ops::Range<usize>;

/// Token kinds of the ATF notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    // Punctuation
    Ampersand,
    Hash,
    At,
    Exclaim,
    Query,
    Star,
    Prime,
    Equals,
    Semicolon,
    Hat,
    LSquare,
    RSquare,
    Dollar,

    // Structural and value tokens
    LineLabel,
    Id,
    SingleId,
    ParentheticalId,
    Number,
    Range,
    Letter,
    Newline,
    AtNote,

    // Structure keywords
    Tablet,
    Envelope,
    Prism,
    Bulla,
    Obverse,
    Reverse,
    Left,
    Right,
    Top,
    Bottom,
    Catchline,
    Colophon,
    Date,
    Signatures,
    Signature,
    Summary,
    Face,
    Edge,
    Column,
    Seal,
    Witnesses,
    Translation,
    Note,
    M,
    H,

    // Long-argument structure keywords
    Object,
    Surface,
    Fragment,

    // Protocol keywords (always written with a trailing colon)
    Atf,
    Lem,
    Project,

    // Protocol qualifiers
    Lang,
    Use,
    Math,
    Unicode,

    // $-line keywords
    AtWord,
    Most,
    Least,
    About,
    Several,
    Some,
    Rest,
    Of,
    Start,
    Beginning,
    Middle,
    End,
    Columns,
    Line,
    Lines,
    Case,
    Cases,
    Blank,
    Broken,
    Effaced,
    Illegible,
    Missing,
    Traces,
    Ruling,
    Single,
    Double,
    Triple,
}

impl TokenKind {
    /// Upper-case token name, e.g. `LINELABEL` or `ATWORD`
    pub fn name(self) -> String {
        format!("{:?}", self).to_ascii_uppercase()
    }

    /// Whether this kind is one of the reserved keywords
    pub fn is_keyword(self) -> bool {
        (self as u8) >= (TokenKind::Tablet as u8)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A scanned token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Matched text after rule-specific trimming
    pub text: String,
    /// 1-based line on which the token begins
    pub line: u32,
    /// Full source range consumed by the rule
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "{}", self.kind),
            _ => write!(f, "{}({:?})", self.kind, self.text),
        }
    }
}

/// What a discarded span contained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriviaKind {
    Whitespace,
    Comment,
    Illegal,
}

/// Source span consumed without producing a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: Span,
}
