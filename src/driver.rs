//! スキャン処理のドライバモジュール
//!
//! ファイルの読み込み、スキャナの実行、診断情報の蓄積と表示をまとめて
//! 管理します。スキャナ本体はメモリ上のバッファしか扱わないため、
//! ファイル入出力はすべてここで行います。

use crate::error::{AtfError, AtfResult, ErrorCollector};
use crate::lexer::{Lexer, ScanOptions, ScanOutput};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use std::fs;
use std::path::Path;

/// スキャン対象のソースと診断情報を保持する構造体
pub struct ScanState {
    pub source_file: String,
    pub source: String,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
    pub error_collector: ErrorCollector,
}

impl ScanState {
    /// ファイルから新しい状態を作成
    pub fn new<P: AsRef<Path>>(source_file: P) -> AtfResult<Self> {
        let source_file_str = source_file.as_ref().display().to_string();
        let source = fs::read_to_string(source_file.as_ref())
            .map_err(|e| AtfError::Io(format!("failed to read {}: {}", source_file_str, e)))?;
        Ok(Self::new_from_string(&source_file_str, source))
    }

    /// 文字列から状態を作成
    pub fn new_from_string(filename: &str, source: String) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(filename.to_string(), source.clone());

        Self {
            source_file: filename.to_string(),
            source,
            files,
            file_id,
            error_collector: ErrorCollector::new(),
        }
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: AtfError) {
        self.error_collector.add_error(error, self.file_id);
    }

    /// 診断情報を任意の出力先に書き出す
    pub fn report_to(&self, writer: &mut dyn WriteColor) -> AtfResult<()> {
        let config = codespan_reporting::term::Config::default();
        for error in self.error_collector.errors() {
            let diagnostic = error.to_diagnostic();
            codespan_reporting::term::emit(writer, &config, &self.files, &diagnostic)
                .map_err(|e| AtfError::Io(format!("failed to emit diagnostic: {}", e)))?;
        }
        Ok(())
    }

    /// 診断情報を標準エラー出力に報告
    pub fn report_diagnostics(&self) -> AtfResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let mut lock = writer.lock();
        self.report_to(&mut lock)
    }

    /// エラーがあるかチェック
    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    /// エラー数を取得
    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }
}

/// スキャンパイプライン
pub struct ScanPipeline {
    state: ScanState,
    options: ScanOptions,
}

impl ScanPipeline {
    pub fn new(state: ScanState, options: ScanOptions) -> Self {
        Self { state, options }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// ソースをスキャンし、字句エラーを診断情報として蓄積する
    ///
    /// 前回の実行で蓄積した診断情報は破棄されるため、何度呼んでも結果は同じ
    pub fn run(&mut self) -> ScanOutput {
        log::debug!("scanning {}", self.state.source_file);
        self.state.error_collector.clear();
        let output = Lexer::with_options(&self.state.source, self.options).finish();

        for error in &output.diagnostics {
            self.state.add_error(AtfError::Lexer(error.clone()));
        }
        log::debug!(
            "{} tokens, {} lexical errors, ending in {} mode",
            output.tokens.len(),
            output.diagnostics.len(),
            output.final_mode
        );

        output
    }
}
