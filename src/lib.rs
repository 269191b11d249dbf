//! ATF Scanner Library
//!
//! This library tokenizes ATF cuneiform transliterations into a typed token
//! stream for a downstream parser.

pub mod driver;
pub mod error;
pub mod lexer;

// Re-export commonly used types
pub use driver::{ScanPipeline, ScanState};
pub use error::{AtfError, AtfResult, ErrorCollector, LexerError};
pub use lexer::{tokenize, KeywordRegistry, Lexer, Mode, ScanOptions, ScanOutput, Token, TokenKind};
