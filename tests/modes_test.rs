//! Mode tests
//!
//! Token streams inside the nested modes (text, absorb, lemmatize) and the
//! translation block, plus the transitions between them.

#[cfg(test)]
mod tests {
    use atf_scanner::lexer::{tokenize, Lexer, Mode, ScanOptions, TokenKind};
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    fn newline() -> (TokenKind, String) {
        tok(TokenKind::Newline, "\n")
    }

    // --- text ---

    #[test]
    fn test_text_splits_on_blanks() {
        assert_eq!(
            scan("1. a-na\tbe-li2-ia  qi2-bi2-ma\n"),
            vec![
                tok(TokenKind::LineLabel, "1"),
                tok(TokenKind::Id, "a-na"),
                tok(TokenKind::Id, "be-li2-ia"),
                tok(TokenKind::Id, "qi2-bi2-ma"),
                newline(),
            ]
        );
    }

    #[test]
    fn test_text_does_not_resolve_keywords() {
        assert_eq!(
            scan("2. tablet obverse lem:\n"),
            vec![
                tok(TokenKind::LineLabel, "2"),
                tok(TokenKind::Id, "tablet"),
                tok(TokenKind::Id, "obverse"),
                tok(TokenKind::Id, "lem:"),
                newline(),
            ]
        );
    }

    #[test]
    fn test_text_keeps_flags_inside_words() {
        assert_eq!(
            scan("3. [x] x#? {d}utu\n"),
            vec![
                tok(TokenKind::LineLabel, "3"),
                tok(TokenKind::Id, "[x]"),
                tok(TokenKind::Id, "x#?"),
                tok(TokenKind::Id, "{d}utu"),
                newline(),
            ]
        );
    }

    #[test]
    fn test_text_carriage_return_is_illegal() {
        let output = tokenize("1. a\r\n");
        assert_eq!(
            output.kinds(),
            vec![TokenKind::LineLabel, TokenKind::Id, TokenKind::Newline]
        );
        assert_eq!(output.diagnostics.len(), 1);
    }

    #[test]
    fn test_text_handles_unicode_signs() {
        assert_eq!(
            scan("4. šum-ma ṭup-pu\n")[1..3].to_vec(),
            vec![tok(TokenKind::Id, "šum-ma"), tok(TokenKind::Id, "ṭup-pu")]
        );
    }

    // --- absorb ---

    #[test]
    fn test_absorb_keeps_inner_flags() {
        assert_eq!(
            scan("= first? second\n"),
            vec![
                tok(TokenKind::Equals, "="),
                tok(TokenKind::Id, "first? second"),
                newline(),
            ]
        );
    }

    #[test]
    fn test_absorb_splits_trailing_flags() {
        assert_eq!(
            scan("= x?!\n"),
            vec![
                tok(TokenKind::Equals, "="),
                tok(TokenKind::Id, "x"),
                tok(TokenKind::Query, "?"),
                tok(TokenKind::Exclaim, "!"),
                newline(),
            ]
        );
        assert_eq!(
            scan("=broken*'#\n"),
            vec![
                tok(TokenKind::Equals, "="),
                tok(TokenKind::Id, "broken"),
                tok(TokenKind::Star, "*"),
                tok(TokenKind::Prime, "'"),
                tok(TokenKind::Hash, "#"),
                newline(),
            ]
        );
    }

    #[test]
    fn test_absorb_caret_collapses_blanks() {
        assert_eq!(
            scan("= a ^ b\n"),
            vec![
                tok(TokenKind::Equals, "="),
                tok(TokenKind::Id, "a"),
                tok(TokenKind::Hat, " ^ "),
                tok(TokenKind::Id, "b"),
                newline(),
            ]
        );
    }

    #[test]
    fn test_absorb_returns_to_document() {
        let output = tokenize("=x\n@tablet\n");
        assert_eq!(
            output.kinds(),
            vec![
                TokenKind::Equals,
                TokenKind::Id,
                TokenKind::Newline,
                TokenKind::At,
                TokenKind::Tablet,
                TokenKind::Newline,
            ]
        );
        assert_eq!(output.final_mode, Mode::Document);
    }

    #[test]
    fn test_absorb_empty_line() {
        assert_eq!(
            scan("=\n"),
            vec![tok(TokenKind::Equals, "="), newline()]
        );
    }

    #[test]
    fn test_absorb_does_not_resolve_keywords() {
        assert_eq!(
            scan("#atf: lang tablet\n")[3],
            tok(TokenKind::Id, "tablet")
        );
    }

    // --- lemmatize ---

    #[test]
    fn test_lemmata_keep_leading_blanks() {
        assert_eq!(
            scan("#lem: šarru[king]N; u[and]CNJ\n"),
            vec![
                tok(TokenKind::Hash, "#"),
                tok(TokenKind::Lem, "lem:"),
                tok(TokenKind::Id, " šarru[king]N"),
                tok(TokenKind::Semicolon, "; "),
                tok(TokenKind::Id, "u[and]CNJ"),
                newline(),
            ]
        );
    }

    #[test]
    fn test_lemmata_keep_trailing_blanks() {
        assert_eq!(
            scan("#lem: a ;\tb \n"),
            vec![
                tok(TokenKind::Hash, "#"),
                tok(TokenKind::Lem, "lem:"),
                tok(TokenKind::Id, " a "),
                tok(TokenKind::Semicolon, ";\t"),
                tok(TokenKind::Id, "b "),
                newline(),
            ]
        );
    }

    #[test]
    fn test_trailing_separator() {
        assert_eq!(
            scan("#lem: a;\n")[2..].to_vec(),
            vec![
                tok(TokenKind::Id, " a"),
                tok(TokenKind::Semicolon, ";"),
                newline(),
            ]
        );
    }

    // --- translation ---

    const TRANSLATION: &str = "@translation parallel en project\n1. The king of Ur\n2. His servant!\n";

    #[test]
    fn test_translation_block() {
        let output = tokenize(TRANSLATION);
        let tokens: Vec<_> = output
            .tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str(), t.line))
            .collect();
        assert_eq!(
            tokens,
            vec![
                (TokenKind::At, "@", 1),
                (TokenKind::Translation, "translation", 1),
                (TokenKind::Id, "parallel", 1),
                (TokenKind::Id, "en", 1),
                (TokenKind::Id, "project", 1),
                (TokenKind::Newline, "\n", 1),
                (TokenKind::LineLabel, "1", 2),
                (TokenKind::Id, "The king of Ur", 2),
                (TokenKind::Newline, "\n", 2),
                (TokenKind::LineLabel, "2", 3),
                (TokenKind::Id, "His servant", 3),
                (TokenKind::Exclaim, "!", 3),
                (TokenKind::Newline, "\n", 3),
            ]
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_translation_is_never_left_by_newline() {
        let output = tokenize(TRANSLATION);
        assert_eq!(output.final_mode, Mode::Translation);
        assert_eq!(output.depth, 2);
    }

    #[test]
    fn test_translation_label_enters_absorb() {
        let mut lexer = Lexer::new("@translation\n1. text\n");
        let mut modes = Vec::new();
        while let Some(token) = lexer.next() {
            modes.push((token.kind, lexer.mode()));
        }
        assert_eq!(
            modes,
            vec![
                (TokenKind::At, Mode::Document),
                (TokenKind::Translation, Mode::Translation),
                (TokenKind::Newline, Mode::Translation),
                (TokenKind::LineLabel, Mode::Absorb),
                (TokenKind::Id, Mode::Absorb),
                (TokenKind::Newline, Mode::Translation),
            ]
        );
    }

    #[test]
    fn test_translation_label_span_includes_blanks() {
        let output = tokenize("@translation\n1.   x\n");
        let label = &output.tokens[3];
        assert_eq!(label.kind, TokenKind::LineLabel);
        assert_eq!(label.text, "1");
        assert_eq!(label.span, 13..18);
    }

    #[test]
    fn test_structure_inside_translation() {
        assert_eq!(
            tokenize("@translation\n@obverse\n@note see copy\n").kinds(),
            vec![
                TokenKind::At,
                TokenKind::Translation,
                TokenKind::Newline,
                TokenKind::At,
                TokenKind::Obverse,
                TokenKind::Newline,
                TokenKind::AtNote,
                TokenKind::Id,
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn test_translation_has_no_number_rules() {
        let output = tokenize("@translation\n$ 3 lines\n");
        assert_eq!(
            output.kinds(),
            vec![
                TokenKind::At,
                TokenKind::Translation,
                TokenKind::Newline,
                TokenKind::Dollar,
                TokenKind::Lines,
                TokenKind::Newline,
            ]
        );
        assert_eq!(output.diagnostics.len(), 1);
    }

    // --- end of input ---

    #[test]
    fn test_open_modes_unwound_at_end() {
        for source in ["1. no newline", "#lem: a; b", "=free", "@object x"] {
            let output = tokenize(source);
            assert_eq!(output.final_mode, Mode::Document, "{:?}", source);
            assert_eq!(output.depth, 1, "{:?}", source);
        }
    }

    #[test]
    fn test_open_modes_kept_on_request() {
        let options = ScanOptions::new().with_unwind_at_eof(false);
        let cases = [
            ("1. no newline", Mode::Text),
            ("#lem: a; b", Mode::Lemmatize),
            ("=free", Mode::Absorb),
        ];
        for (source, mode) in cases {
            let output = Lexer::with_options(source, options).finish();
            assert_eq!(output.final_mode, mode, "{:?}", source);
            assert_eq!(output.depth, 2, "{:?}", source);
        }
    }

    #[test]
    fn test_unwind_keeps_translation() {
        let output = tokenize("@translation\n1. open");
        assert_eq!(output.final_mode, Mode::Translation);
        assert_eq!(output.depth, 2);
    }
}
