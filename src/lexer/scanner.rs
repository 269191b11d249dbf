//! The scanning loop.
//!
//! `ScanSession` owns everything that changes during one scan: cursor, line
//! counter, mode stack and the discarded spans and diagnostics collected so
//! far. `Lexer` drives a session against the static rule tables and yields
//! tokens one at a time.

use log::{debug, trace, warn};

use super::keywords::KeywordRegistry;
use super::mode::{Mode, ModeStack};
use super::rules::{mode_entered_by, rules_for, Action};
use super::token::{Span, Token, TokenKind, Trivia, TriviaKind};
use crate::error::LexerError;

/// Scanner behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Pop Absorb/Text/Lemmatize modes left open when the input ends
    pub unwind_at_eof: bool,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unwind_at_eof(mut self, unwind: bool) -> Self {
        self.unwind_at_eof = unwind;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            unwind_at_eof: true,
        }
    }
}

/// Mutable state of a single scan
#[derive(Debug, Clone)]
pub struct ScanSession<'a> {
    source: &'a str,
    cursor: usize,
    line: u32,
    modes: ModeStack,
    trivia: Vec<Trivia>,
    diagnostics: Vec<LexerError>,
}

impl<'a> ScanSession<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            line: 1,
            modes: ModeStack::new(),
            trivia: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn modes(&self) -> &ModeStack {
        &self.modes
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.source.len()
    }

    fn discard(&mut self, kind: TriviaKind, span: Span) {
        self.trivia.push(Trivia { kind, span });
    }

    /// Report the character under the cursor and step over it
    fn skip_illegal(&mut self) {
        let Some(character) = self.source[self.cursor..].chars().next() else {
            return;
        };
        let span = self.cursor..self.cursor + character.len_utf8();
        let mode = self.modes.current();
        warn!(
            "Illegal character {:?} on line {} in {} mode",
            character, self.line, mode
        );
        self.diagnostics.push(LexerError::IllegalCharacter {
            character,
            line: self.line,
            mode,
            span: span.clone(),
        });
        self.discard(TriviaKind::Illegal, span);
        self.cursor += character.len_utf8();
    }
}

/// Everything an eager scan produces
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    pub trivia: Vec<Trivia>,
    pub diagnostics: Vec<LexerError>,
    /// Active mode once the input was consumed
    pub final_mode: Mode,
    /// Mode stack depth once the input was consumed
    pub depth: usize,
}

impl ScanOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|token| token.kind).collect()
    }

    /// Stitch token and trivia spans back together in source order
    pub fn reconstruct(&self, source: &str) -> String {
        let mut spans: Vec<&Span> = self
            .tokens
            .iter()
            .map(|token| &token.span)
            .chain(self.trivia.iter().map(|trivia| &trivia.span))
            .collect();
        spans.sort_by_key(|span| span.start);
        spans
            .into_iter()
            .filter_map(|span| source.get(span.clone()))
            .collect()
    }
}

/// Multi-mode scanner over one buffer
pub struct Lexer<'a> {
    session: ScanSession<'a>,
    registry: &'static KeywordRegistry,
    options: ScanOptions,
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ScanOptions::default())
    }

    pub fn with_options(source: &'a str, options: ScanOptions) -> Self {
        Self {
            session: ScanSession::new(source),
            registry: KeywordRegistry::global(),
            options,
            exhausted: false,
        }
    }

    pub fn session(&self) -> &ScanSession<'a> {
        &self.session
    }

    /// Currently active mode
    pub fn mode(&self) -> Mode {
        self.session.modes.current()
    }

    pub fn depth(&self) -> usize {
        self.session.modes.depth()
    }

    pub fn diagnostics(&self) -> &[LexerError] {
        &self.session.diagnostics
    }

    /// Scan the remaining input and hand back everything collected
    pub fn finish(mut self) -> ScanOutput {
        let tokens: Vec<Token> = self.by_ref().collect();
        let session = self.session;
        ScanOutput {
            tokens,
            trivia: session.trivia,
            diagnostics: session.diagnostics,
            final_mode: session.modes.current(),
            depth: session.modes.depth(),
        }
    }

    /// Produce the next token, or `None` once the buffer is consumed
    pub fn next_token(&mut self) -> Option<Token> {
        while !self.session.is_at_end() {
            let source = self.session.source;
            let start = self.session.cursor;
            let mode = self.session.modes.current();
            let Some((rule, matched)) = rules_for(mode).find(source, start) else {
                self.session.skip_illegal();
                continue;
            };

            let span = start..matched.end;
            let text = &source[matched.value.clone()];
            self.session.cursor = matched.end;
            trace!("{} mode: rule {} matched {:?}", mode, rule.name, text);

            let line = self.session.line;
            let token = match rule.action {
                Action::Discard(kind) => {
                    self.session.discard(kind, span);
                    continue;
                }
                Action::Emit(kind) => Token::new(kind, text, line, span),
                Action::Enter(kind, next) => {
                    self.enter(next);
                    Token::new(kind, text, line, span)
                }
                Action::Identifier => {
                    let kind = self.registry.resolve(text).unwrap_or(TokenKind::Id);
                    if let Some(next) = mode_entered_by(kind) {
                        self.enter(next);
                    }
                    Token::new(kind, text, line, span)
                }
                Action::Newline => {
                    self.session.line += 1;
                    if !mode.is_base() {
                        self.leave();
                    }
                    Token::new(TokenKind::Newline, text, line, span)
                }
            };
            return Some(token);
        }

        self.end_of_input();
        None
    }

    fn enter(&mut self, mode: Mode) {
        trace!("push {} mode", mode);
        self.session.modes.push(mode);
    }

    fn leave(&mut self) {
        let popped = self.session.modes.pop();
        debug_assert!(popped.is_ok(), "newline popped the base mode");
        match popped {
            Ok(mode) => trace!("pop {} mode", mode),
            Err(err) => log::error!("{}", err),
        }
    }

    fn end_of_input(&mut self) {
        if self.exhausted {
            return;
        }
        self.exhausted = true;
        if self.options.unwind_at_eof {
            let unwound = self.session.modes.unwind();
            if !unwound.is_empty() {
                debug!(
                    "input ended inside {:?}; unwound to {} mode",
                    unwound,
                    self.session.modes.current()
                );
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Scan a whole buffer with default options
pub fn tokenize(source: &str) -> ScanOutput {
    Lexer::new(source).finish()
}
