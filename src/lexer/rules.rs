//! Per-mode rule tables.
//!
//! Each mode owns an ordered list of rules. Rules with a semantic action come
//! first in declaration order, plain token patterns follow sorted by
//! decreasing pattern length. The scanner commits to the first rule that
//! matches at the cursor, so the order here decides every ambiguity
//! (LINELABEL before NUMBER, RANGE before NUMBER, identifier before `@note`).

use once_cell::sync::Lazy;
use regex::Regex;

use super::mode::Mode;
use super::token::{Span, TokenKind, TriviaKind};

/// What committing to a rule does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Consume without producing a token
    Discard(TriviaKind),
    /// Produce a token
    Emit(TokenKind),
    /// Produce a token and push a mode
    Enter(TokenKind, Mode),
    /// Identifier-shaped text, resolved against the keyword table
    Identifier,
    /// Line break: NEWLINE token, bumps the line counter, pops non-base modes
    Newline,
}

/// A successful match at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Absolute end of the consumed span
    pub end: usize,
    /// Absolute range of the token value inside the consumed span
    pub value: Span,
}

/// A single anchored pattern with its action
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub action: Action,
    regex: Regex,
    pattern_len: usize,
    line_start: bool,
}

impl Rule {
    /// Build a rule from a pattern. A capture group named `value` selects the
    /// token text; otherwise the whole match is used.
    fn new(name: &'static str, pattern: &str, action: Action) -> Self {
        let regex = Regex::new(&format!(r"\A(?:{})", pattern))
            .unwrap_or_else(|err| panic!("rule {} has an invalid pattern: {}", name, err));
        Self {
            name,
            action,
            regex,
            pattern_len: pattern.len(),
            line_start: false,
        }
    }

    fn literal(name: &'static str, text: &str, kind: TokenKind) -> Self {
        Self::new(name, &regex::escape(text), Action::Emit(kind))
    }

    /// Only match at offset 0 or right after a `\n`
    fn at_line_start(mut self) -> Self {
        self.line_start = true;
        self
    }

    pub fn is_line_anchored(&self) -> bool {
        self.line_start
    }

    pub fn try_match(&self, source: &str, pos: usize) -> Option<RuleMatch> {
        if self.line_start && !is_line_start(source, pos) {
            return None;
        }
        let caps = self.regex.captures(source.get(pos..)?)?;
        let whole = caps.get(0)?;
        if whole.end() == 0 {
            return None;
        }
        let value = caps.name("value").unwrap_or(whole);
        Some(RuleMatch {
            end: pos + whole.end(),
            value: pos + value.start()..pos + value.end(),
        })
    }
}

fn is_line_start(source: &str, pos: usize) -> bool {
    pos == 0 || source.as_bytes().get(pos - 1) == Some(&b'\n')
}

/// Ordered rules of one mode
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    fn new(actions: Vec<Rule>, mut plain: Vec<Rule>) -> Self {
        // Stable sort keeps declaration order among equal lengths.
        plain.sort_by(|a, b| b.pattern_len.cmp(&a.pattern_len));
        let mut rules = actions;
        rules.extend(plain);
        Self { rules }
    }

    /// First rule matching at `pos`
    pub fn find(&self, source: &str, pos: usize) -> Option<(&Rule, RuleMatch)> {
        self.rules
            .iter()
            .find_map(|rule| rule.try_match(source, pos).map(|m| (rule, m)))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

const LABEL: &str = r"(?P<value>[1-9][0-9]*[a-z]*)\.";
const NON_FLAG: &str = r"[^ \t#!^*'?\n\r]";
const INTERNAL: &str = r"[^\n^\r]";

struct RuleSets {
    document: RuleSet,
    absorb: RuleSet,
    text: RuleSet,
    lemmatize: RuleSet,
    translation: RuleSet,
}

static RULE_SETS: Lazy<RuleSets> = Lazy::new(|| RuleSets {
    document: document_rules(),
    absorb: absorb_rules(),
    text: text_rules(),
    lemmatize: lemmatize_rules(),
    translation: translation_rules(),
});

/// Rule table for a mode
pub fn rules_for(mode: Mode) -> &'static RuleSet {
    let sets = &*RULE_SETS;
    match mode {
        Mode::Document => &sets.document,
        Mode::Absorb => &sets.absorb,
        Mode::Text => &sets.text,
        Mode::Lemmatize => &sets.lemmatize,
        Mode::Translation => &sets.translation,
    }
}

/// Mode pushed when an identifier resolves to `kind`
pub fn mode_entered_by(kind: TokenKind) -> Option<Mode> {
    match kind {
        TokenKind::Translation => Some(Mode::Translation),
        TokenKind::Lem => Some(Mode::Lemmatize),
        TokenKind::Lang
        | TokenKind::Project
        | TokenKind::Note
        | TokenKind::Object
        | TokenKind::Surface
        | TokenKind::Fragment => Some(Mode::Absorb),
        _ => None,
    }
}

fn newline() -> Rule {
    Rule::new("newline", r"\n", Action::Newline)
}

/// Action rules shared by Document and Translation, with the mode-specific
/// line label slotted in after the identifier rule.
fn base_actions(line_label: Rule) -> Vec<Rule> {
    vec![
        Rule::new("whitespace", r"[ \t]+", Action::Discard(TriviaKind::Whitespace)),
        Rule::new("equals", "=", Action::Enter(TokenKind::Equals, Mode::Absorb)),
        Rule::new("comment", r"#[ \t][^\n\r]*", Action::Discard(TriviaKind::Comment))
            .at_line_start(),
        newline(),
        Rule::new("identifier", r"[a-zA-Z][a-zA-Z0-9\[\]]+:?", Action::Identifier),
        line_label,
        Rule::new("atnote", "@note", Action::Enter(TokenKind::AtNote, Mode::Absorb)),
    ]
}

fn punctuation() -> Vec<Rule> {
    vec![
        Rule::literal("ampersand", "&", TokenKind::Ampersand),
        Rule::literal("hash", "#", TokenKind::Hash),
        Rule::literal("at", "@", TokenKind::At),
        Rule::literal("exclaim", "!", TokenKind::Exclaim),
        Rule::literal("query", "?", TokenKind::Query),
        Rule::literal("star", "*", TokenKind::Star),
        Rule::literal("prime", "'", TokenKind::Prime),
        Rule::literal("dollar", "$", TokenKind::Dollar),
    ]
}

fn document_rules() -> RuleSet {
    let line_label = Rule::new("linelabel", LABEL, Action::Enter(TokenKind::LineLabel, Mode::Text))
        .at_line_start();

    let mut plain = punctuation();
    plain.extend([
        Rule::new(
            "parenthetical",
            r"\([^)\n\r]*\)",
            Action::Emit(TokenKind::ParentheticalId),
        ),
        Rule::new("range", r"[1-9][0-9]*-[1-9][0-9]*", Action::Emit(TokenKind::Range)),
        Rule::new("number", r"[1-9][0-9]*", Action::Emit(TokenKind::Number)),
        Rule::new("letter", r"[a-z]", Action::Emit(TokenKind::Letter)),
    ]);

    RuleSet::new(base_actions(line_label), plain)
}

fn translation_rules() -> RuleSet {
    // Translation lines carry commentary, so the label hands over to Absorb.
    let line_label = Rule::new(
        "linelabel",
        &format!(r"{}[ \t]*", LABEL),
        Action::Enter(TokenKind::LineLabel, Mode::Absorb),
    )
    .at_line_start();

    RuleSet::new(base_actions(line_label), punctuation())
}

fn absorb_rules() -> RuleSet {
    let content = format!(
        r"[ \t]*(?P<value>{nf}(?:{int}*{nf}+|{nf}*))",
        nf = NON_FLAG,
        int = INTERNAL
    );
    let actions = vec![
        newline(),
        Rule::new("content", &content, Action::Emit(TokenKind::Id)),
    ];
    let plain = vec![
        Rule::literal("hash", "#", TokenKind::Hash),
        Rule::literal("exclaim", "!", TokenKind::Exclaim),
        Rule::literal("query", "?", TokenKind::Query),
        Rule::literal("star", "*", TokenKind::Star),
        Rule::literal("prime", "'", TokenKind::Prime),
        Rule::new("hat", r"[ \t]*\^[ \t]*", Action::Emit(TokenKind::Hat)),
    ];
    RuleSet::new(actions, plain)
}

fn text_rules() -> RuleSet {
    let actions = vec![
        newline(),
        Rule::new("space", r"[ \t]", Action::Discard(TriviaKind::Whitespace)),
    ];
    let plain = vec![Rule::new("word", r"[^ \t\n\r]+", Action::Emit(TokenKind::Id))];
    RuleSet::new(actions, plain)
}

fn lemmatize_rules() -> RuleSet {
    let plain = vec![
        Rule::new("lemma", r"[^;\n\r]+", Action::Emit(TokenKind::Id)),
        Rule::new("separator", r";[ \t]*", Action::Emit(TokenKind::Semicolon)),
    ];
    RuleSet::new(vec![newline()], plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(mode: Mode, source: &str, pos: usize) -> Option<(&'static str, String, usize)> {
        rules_for(mode)
            .find(source, pos)
            .map(|(rule, m)| (rule.name, source[m.value.clone()].to_string(), m.end))
    }

    #[test]
    fn test_all_tables_compile() {
        for mode in [
            Mode::Document,
            Mode::Absorb,
            Mode::Text,
            Mode::Lemmatize,
            Mode::Translation,
        ] {
            assert!(!rules_for(mode).rules().is_empty());
        }
    }

    #[test]
    fn test_plain_rules_sorted_by_length() {
        let names: Vec<_> = rules_for(Mode::Document)
            .rules()
            .iter()
            .map(|rule| rule.name)
            .collect();
        let range = names.iter().position(|n| *n == "range").unwrap();
        let number = names.iter().position(|n| *n == "number").unwrap();
        let letter = names.iter().position(|n| *n == "letter").unwrap();
        let hash = names.iter().position(|n| *n == "hash").unwrap();
        assert!(range < number);
        assert!(number < letter);
        assert!(letter < hash);
        assert_eq!(names[0], "whitespace");
    }

    #[test]
    fn test_line_label_only_at_line_start() {
        assert_eq!(
            first(Mode::Document, "12a. x", 0),
            Some(("linelabel", "12a".to_string(), 4))
        );
        assert_eq!(
            first(Mode::Document, "x 1. y", 2),
            Some(("number", "1".to_string(), 3))
        );
        assert_eq!(
            first(Mode::Document, "x\n3. y", 2),
            Some(("linelabel", "3".to_string(), 4))
        );
    }

    #[test]
    fn test_translation_label_consumes_trailing_blanks() {
        assert_eq!(
            first(Mode::Translation, "1.  The king", 0),
            Some(("linelabel", "1".to_string(), 4))
        );
    }

    #[test]
    fn test_comment_needs_line_start_and_blank() {
        assert_eq!(first(Mode::Document, "# note", 0).unwrap().0, "comment");
        assert_eq!(first(Mode::Document, "#lem:", 0).unwrap().0, "hash");
        assert_eq!(first(Mode::Document, "x # y", 2).unwrap().0, "hash");
    }

    #[test]
    fn test_identifier_needs_two_characters() {
        assert_eq!(first(Mode::Document, "o ", 0).unwrap().0, "letter");
        assert_eq!(first(Mode::Document, "obverse", 0).unwrap().0, "identifier");
        assert_eq!(first(Mode::Translation, "o ", 0), None);
    }

    #[test]
    fn test_absorb_content_trims_trailing_flags() {
        assert_eq!(
            first(Mode::Absorb, "  some text!?\n", 0),
            Some(("content", "some text".to_string(), 11))
        );
        assert_eq!(
            first(Mode::Absorb, " a^b", 0),
            Some(("content", "a".to_string(), 2))
        );
        assert_eq!(first(Mode::Absorb, " ^ b", 0).unwrap().0, "hat");
    }

    #[test]
    fn test_mode_entering_kinds() {
        assert_eq!(mode_entered_by(TokenKind::Translation), Some(Mode::Translation));
        assert_eq!(mode_entered_by(TokenKind::Lem), Some(Mode::Lemmatize));
        assert_eq!(mode_entered_by(TokenKind::Fragment), Some(Mode::Absorb));
        assert_eq!(mode_entered_by(TokenKind::Tablet), None);
        assert_eq!(mode_entered_by(TokenKind::Atf), None);
    }
}
