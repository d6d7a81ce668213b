//! Per-token scanning routines.

use super::{LexError, Lexer};
use crate::token::{Span, Token, TokenKind};

impl<'a> Lexer<'a> {
    pub(super) fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let c = self.current_char().expect("next_token called at eof");

        if c == '"' {
            return self.read_string(start, line, column);
        }
        if c.is_ascii_digit() {
            return self.read_number(start, line, column);
        }
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.read_identifier_or_keyword(start, line, column));
        }
        self.read_punctuation_or_operator(start, line, column)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn span_from(&self, start: usize, line: usize, column: usize) -> Span {
        Span::new(start, self.pos, line, column)
    }

    fn read_string(
        &mut self,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let content_start = self.pos;
        loop {
            match self.current_char() {
                None => {
                    return Err(LexError {
                        message: "unterminated string literal".into(),
                        span: self.span_from(start, line, column),
                    });
                }
                Some('"') => break,
                Some(_) => self.advance(),
            }
        }
        let content = self.input[content_start..self.pos].to_string();
        self.advance(); // closing quote
        Ok(Token::new(
            TokenKind::StringLiteral(content),
            self.span_from(start, line, column),
        ))
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> Result<Token, LexError> {
        let mut saw_dot = false;
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !saw_dot && self.peek_is_digit_after_dot() {
                saw_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        let spelling = &self.input[start..self.pos];
        let span = self.span_from(start, line, column);
        if saw_dot {
            spelling
                .parse::<f64>()
                .map(|value| Token::new(TokenKind::FloatLiteral(value), span))
                .map_err(|_| LexError {
                    message: format!("invalid float literal '{spelling}'"),
                    span: self.span_from(start, line, column),
                })
        } else {
            spelling
                .parse::<u64>()
                .map(|value| Token::new(TokenKind::IntLiteral(value), span))
                .map_err(|_| LexError {
                    message: format!("integer literal '{spelling}' out of range"),
                    span: self.span_from(start, line, column),
                })
        }
    }

    /// A `.` only extends a numeric literal when followed by another digit;
    /// otherwise it's the field-access operator (e.g. `p.x` must not eat the
    /// dot into a malformed number when `p` happens to end in a digit).
    fn peek_is_digit_after_dot(&self) -> bool {
        self.rest()[1..].chars().next().is_some_and(|c| c.is_ascii_digit())
    }

    fn read_identifier_or_keyword(&mut self, start: usize, line: usize, column: usize) -> Token {
        while self
            .current_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let spelling = &self.input[start..self.pos];
        let span = self.span_from(start, line, column);
        let kind = match spelling {
            "func" => TokenKind::Func,
            "cfunc" => TokenKind::Cfunc,
            "struct" => TokenKind::Struct,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "do" => TokenKind::Do,
            "return" => TokenKind::Return,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "const" => TokenKind::Const,
            "volatile" => TokenKind::Volatile,
            "unsigned" => TokenKind::Unsigned,
            "signed" => TokenKind::Signed,
            "static" => TokenKind::Static,
            _ => TokenKind::Identifier(spelling.to_string()),
        };
        Token::new(kind, span)
    }

    fn read_punctuation_or_operator(
        &mut self,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, LexError> {
        const THREE_CHAR: &[(&str, TokenKind)] = &[("...", TokenKind::Ellipsis)];
        const TWO_CHAR: &[(&str, TokenKind)] = &[
            ("->", TokenKind::Arrow),
            ("&&", TokenKind::AndAnd),
            ("||", TokenKind::OrOr),
            ("<<", TokenKind::Shl),
            (">>", TokenKind::Shr),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::NotEq),
            (">=", TokenKind::Ge),
            ("<=", TokenKind::Le),
            ("+=", TokenKind::PlusEq),
            ("-=", TokenKind::MinusEq),
            ("*=", TokenKind::StarEq),
            ("/=", TokenKind::SlashEq),
            ("%=", TokenKind::PercentEq),
        ];

        let rest = self.rest();
        for (spelling, kind) in THREE_CHAR {
            if rest.starts_with(spelling) {
                for _ in 0..3 {
                    self.advance();
                }
                return Ok(Token::new(kind.clone(), self.span_from(start, line, column)));
            }
        }
        for (spelling, kind) in TWO_CHAR {
            if rest.starts_with(spelling) {
                for _ in 0..2 {
                    self.advance();
                }
                return Ok(Token::new(kind.clone(), self.span_from(start, line, column)));
            }
        }

        let c = self.current_char().unwrap();
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '^' => TokenKind::Caret,
            '&' => TokenKind::Amp,
            '!' => TokenKind::Bang,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '|' => TokenKind::Pipe,
            '>' => TokenKind::Gt,
            '<' => TokenKind::Lt,
            '=' => TokenKind::Assign,
            _ => {
                return Err(LexError {
                    message: format!("unrecognized character '{c}'"),
                    span: self.span_from(start, line, column),
                });
            }
        };
        self.advance();
        Ok(Token::new(kind, self.span_from(start, line, column)))
    }
}
