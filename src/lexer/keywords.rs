//! Reserved keyword table.
//!
//! Keys are lower-cased. Protocol keywords carry their colon in the key
//! (`atf:`, `lem:`, `project:`, `note:`) so the colon is never scanned on its
//! own and a bare `atf` stays an ordinary identifier.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

use super::token::TokenKind;

/// Keyword families, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Structure,
    LongArgumentStructure,
    Protocol,
    ProtocolQualifier,
    Dollar,
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeywordCategory::Structure => "structure",
            KeywordCategory::LongArgumentStructure => "long-argument structure",
            KeywordCategory::Protocol => "protocol",
            KeywordCategory::ProtocolQualifier => "protocol qualifier",
            KeywordCategory::Dollar => "$-line",
        };
        f.write_str(name)
    }
}

const STRUCTURES: &[(&str, TokenKind)] = &[
    ("tablet", TokenKind::Tablet),
    ("envelope", TokenKind::Envelope),
    ("prism", TokenKind::Prism),
    ("bulla", TokenKind::Bulla),
    ("obverse", TokenKind::Obverse),
    ("reverse", TokenKind::Reverse),
    ("left", TokenKind::Left),
    ("right", TokenKind::Right),
    ("top", TokenKind::Top),
    ("bottom", TokenKind::Bottom),
    ("catchline", TokenKind::Catchline),
    ("colophon", TokenKind::Colophon),
    ("date", TokenKind::Date),
    ("signatures", TokenKind::Signatures),
    ("signature", TokenKind::Signature),
    ("summary", TokenKind::Summary),
    ("face", TokenKind::Face),
    ("edge", TokenKind::Edge),
    ("column", TokenKind::Column),
    ("seal", TokenKind::Seal),
    ("witnesses", TokenKind::Witnesses),
    ("translation", TokenKind::Translation),
    ("note", TokenKind::Note),
    ("m", TokenKind::M),
    ("h", TokenKind::H),
];

const LONG_ARGUMENT_STRUCTURES: &[(&str, TokenKind)] = &[
    ("object", TokenKind::Object),
    ("surface", TokenKind::Surface),
    ("fragment", TokenKind::Fragment),
];

const PROTOCOLS: &[(&str, TokenKind)] = &[
    ("atf", TokenKind::Atf),
    ("lem", TokenKind::Lem),
    ("project", TokenKind::Project),
    ("note", TokenKind::Note),
];

const PROTOCOL_QUALIFIERS: &[(&str, TokenKind)] = &[
    ("lang", TokenKind::Lang),
    ("use", TokenKind::Use),
    ("math", TokenKind::Math),
    ("unicode", TokenKind::Unicode),
];

const DOLLAR_KEYWORDS: &[(&str, TokenKind)] = &[
    ("atword", TokenKind::AtWord),
    ("most", TokenKind::Most),
    ("least", TokenKind::Least),
    ("about", TokenKind::About),
    ("several", TokenKind::Several),
    ("some", TokenKind::Some),
    ("rest", TokenKind::Rest),
    ("of", TokenKind::Of),
    ("start", TokenKind::Start),
    ("beginning", TokenKind::Beginning),
    ("middle", TokenKind::Middle),
    ("end", TokenKind::End),
    ("columns", TokenKind::Columns),
    ("line", TokenKind::Line),
    ("lines", TokenKind::Lines),
    ("case", TokenKind::Case),
    ("cases", TokenKind::Cases),
    ("surface", TokenKind::Surface),
    ("blank", TokenKind::Blank),
    ("broken", TokenKind::Broken),
    ("effaced", TokenKind::Effaced),
    ("illegible", TokenKind::Illegible),
    ("missing", TokenKind::Missing),
    ("traces", TokenKind::Traces),
    ("ruling", TokenKind::Ruling),
    ("single", TokenKind::Single),
    ("double", TokenKind::Double),
    ("triple", TokenKind::Triple),
];

/// A resolved registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub kind: TokenKind,
    pub category: KeywordCategory,
}

static GLOBAL: Lazy<KeywordRegistry> = Lazy::new(KeywordRegistry::new);

/// Static mapping from normalized spelling to keyword kind
#[derive(Debug, Clone)]
pub struct KeywordRegistry {
    entries: IndexMap<String, Keyword>,
}

impl KeywordRegistry {
    pub fn new() -> Self {
        let families = [
            (STRUCTURES, KeywordCategory::Structure),
            (LONG_ARGUMENT_STRUCTURES, KeywordCategory::LongArgumentStructure),
            (PROTOCOLS, KeywordCategory::Protocol),
            (PROTOCOL_QUALIFIERS, KeywordCategory::ProtocolQualifier),
            (DOLLAR_KEYWORDS, KeywordCategory::Dollar),
        ];

        let mut entries = IndexMap::new();
        for (table, category) in families {
            for &(name, kind) in table {
                // `note` is listed as a structure too, but only `note:` is reserved.
                let category = if is_protocol(name) {
                    KeywordCategory::Protocol
                } else {
                    category
                };
                entries
                    .entry(registry_key(name))
                    .or_insert(Keyword { kind, category });
            }
        }

        // The word `at` is spelled out in $-lines but scans as ATWORD.
        entries.insert(
            "at".to_string(),
            Keyword {
                kind: TokenKind::AtWord,
                category: KeywordCategory::Dollar,
            },
        );

        Self { entries }
    }

    /// Shared registry used by the scanner
    pub fn global() -> &'static KeywordRegistry {
        &GLOBAL
    }

    /// Resolve identifier-shaped text (case preserved) to a keyword kind
    pub fn resolve(&self, raw: &str) -> Option<TokenKind> {
        self.lookup(raw).map(|keyword| keyword.kind)
    }

    pub fn lookup(&self, raw: &str) -> Option<Keyword> {
        self.entries.get(&raw.to_lowercase()).copied()
    }

    /// Category a keyword kind was registered under
    pub fn category(&self, kind: TokenKind) -> Option<KeywordCategory> {
        self.entries
            .values()
            .find(|keyword| keyword.kind == kind)
            .map(|keyword| keyword.category)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Keyword)> + '_ {
        self.entries.iter().map(|(key, keyword)| (key.as_str(), *keyword))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn is_protocol(name: &str) -> bool {
    PROTOCOLS.iter().any(|&(protocol, _)| protocol == name)
}

fn registry_key(name: &str) -> String {
    if is_protocol(name) {
        format!("{}:", name)
    } else {
        name.to_string()
    }
}
