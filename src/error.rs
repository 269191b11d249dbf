//! 統一的なエラーハンドリングモジュール
//!
//! スキャナ全体で使用されるエラー型と、codespan-reportingを使った
//! 診断情報の変換・蓄積の仕組みを提供します。

use crate::lexer::{Mode, Span};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// スキャナの統一エラー型
#[derive(Error, Debug, Clone)]
pub enum AtfError {
    /// 字句解析エラー
    #[error("lexical error: {0}")]
    Lexer(#[from] LexerError),

    /// ファイルI/Oエラー
    #[error("file error: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// 字句解析エラーの詳細
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// どの規則にも一致しない文字。1文字読み飛ばして同じモードで続行する。
    #[error("illegal character {character:?} on line {line} in {mode} mode")]
    IllegalCharacter {
        character: char,
        line: u32,
        mode: Mode,
        span: Span,
    },

    /// ベースモードをpopしようとした（内部不変条件の違反）
    #[error("mode stack underflow: the base mode cannot be popped")]
    ModeStackUnderflow,
}

impl LexerError {
    pub fn span(&self) -> Option<Span> {
        match self {
            LexerError::IllegalCharacter { span, .. } => Some(span.clone()),
            LexerError::ModeStackUnderflow => None,
        }
    }
}

/// エラー情報とソースファイルの対応
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: AtfError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: AtfError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        match &self.error {
            AtfError::Lexer(LexerError::IllegalCharacter {
                character,
                mode,
                span,
                ..
            }) => Diagnostic::error()
                .with_message(format!("illegal character {:?}", character))
                .with_labels(vec![Label::primary(self.file_id, span.clone())
                    .with_message(format!("no {} mode rule matches here", mode))])
                .with_notes(vec!["the character was skipped".to_string()]),
            AtfError::Lexer(err @ LexerError::ModeStackUnderflow) => Diagnostic::bug()
                .with_message(err.to_string()),
            AtfError::Io(message) => Diagnostic::error()
                .with_message(format!("file error: {}", message)),
            AtfError::Other(message) => Diagnostic::error().with_message(message.clone()),
        }
    }
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: AtfError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    /// エラーがあるかどうか
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// エラーの数
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 蓄積したエラーを破棄
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// すべてのエラーを取得
    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }
}

/// Result型のエイリアス
pub type AtfResult<T> = Result<T, AtfError>;

impl From<std::io::Error> for AtfError {
    fn from(e: std::io::Error) -> Self {
        AtfError::Io(e.to_string())
    }
}
