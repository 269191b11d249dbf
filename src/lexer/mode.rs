//! Lexical modes and the mode stack

use serde::Serialize;
use std::fmt;

use crate::error::LexerError;

/// Exclusive lexical modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Structural markup, the implicit base
    Document,
    /// Free text up to the end of the line
    Absorb,
    /// Transliterated text after a line label
    Text,
    /// `#lem:` lines, split on semicolons
    Lemmatize,
    /// Translation block, entered by `@translation`
    Translation,
}

impl Mode {
    /// Base modes keep newlines as plain tokens instead of popping
    pub fn is_base(self) -> bool {
        matches!(self, Mode::Document | Mode::Translation)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Document => "document",
            Mode::Absorb => "absorb",
            Mode::Text => "text",
            Mode::Lemmatize => "lemmatize",
            Mode::Translation => "translation",
        };
        f.write_str(name)
    }
}

/// Stack of active modes; the bottom element is always `Mode::Document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeStack {
    modes: Vec<Mode>,
}

impl ModeStack {
    pub fn new() -> Self {
        Self {
            modes: vec![Mode::Document],
        }
    }

    pub fn push(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    /// Pop the active mode, refusing to remove the base
    pub fn pop(&mut self) -> Result<Mode, LexerError> {
        if self.modes.len() <= 1 {
            return Err(LexerError::ModeStackUnderflow);
        }
        self.modes.pop().ok_or(LexerError::ModeStackUnderflow)
    }

    pub fn current(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Document)
    }

    pub fn depth(&self) -> usize {
        self.modes.len()
    }

    /// Pop every non-base mode sitting on top of the stack, returning them
    /// in pop order.
    pub fn unwind(&mut self) -> Vec<Mode> {
        let mut popped = Vec::new();
        while !self.current().is_base() {
            match self.pop() {
                Ok(mode) => popped.push(mode),
                Err(_) => break,
            }
        }
        popped
    }

    pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ {
        self.modes.iter().copied()
    }
}

impl Default for ModeStack {
    fn default() -> Self {
        Self::new()
    }
}
