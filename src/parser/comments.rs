//! Block-comment skipping over the token stream.
//!
//! Spyre has no comment syntax at the lexer level; `/* ... */` block
//! comments are recognized here, by the parser, as a `Slash`, `Star` token
//! pair opening the comment and a `Star`, `Slash` pair closing it. This runs
//! once over the full token vector before parsing begins, rather than being
//! interleaved into every token-advancing helper — equivalent in effect to
//! skipping the comment tokens during the walk, simpler to implement
//! correctly, and it keeps every downstream `TokenRange` a contiguous index
//! range into a single comment-free vector.

use super::ParseError;
use crate::token::{Token, TokenKind};

pub(super) fn strip_block_comments(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let is_open = matches!(tokens[i].kind, TokenKind::Slash)
            && tokens
                .get(i + 1)
                .is_some_and(|t| matches!(t.kind, TokenKind::Star));
        if !is_open {
            out.push(tokens[i].clone());
            i += 1;
            continue;
        }
        let open_line = tokens[i].span.line;
        let mut j = i + 2;
        let mut closed = false;
        while j + 1 < tokens.len() {
            if matches!(tokens[j].kind, TokenKind::Star)
                && matches!(tokens[j + 1].kind, TokenKind::Slash)
            {
                closed = true;
                break;
            }
            j += 1;
        }
        if !closed {
            return Err(ParseError::new("unterminated block comment", open_line));
        }
        i = j + 2;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().unwrap()
    }

    #[test]
    fn strips_a_block_comment() {
        let tokens = lex("a /* comment */ b");
        let stripped = strip_block_comments(tokens).unwrap();
        assert_eq!(stripped.len(), 3); // a, b, Eof
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let tokens = lex("a /* comment");
        assert!(strip_block_comments(tokens).is_err());
    }

    #[test]
    fn division_is_not_mistaken_for_a_comment() {
        let tokens = lex("a / b");
        let stripped = strip_block_comments(tokens).unwrap();
        assert_eq!(stripped.len(), 4); // a, /, b, Eof
    }
}
