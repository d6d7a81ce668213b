use super::Lexer;
use crate::token::TokenKind;

fn kinds(src: &str) -> Vec<TokenKind> {
    Lexer::new(src)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn tokenizes_keywords() {
    assert_eq!(
        kinds("func cfunc struct if elif else while for do return switch case break continue"),
        vec![
            TokenKind::Func,
            TokenKind::Cfunc,
            TokenKind::Struct,
            TokenKind::If,
            TokenKind::Elif,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::Do,
            TokenKind::Return,
            TokenKind::Switch,
            TokenKind::Case,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_modifiers_as_keywords_not_identifiers() {
    assert_eq!(
        kinds("const volatile unsigned signed static"),
        vec![
            TokenKind::Const,
            TokenKind::Volatile,
            TokenKind::Unsigned,
            TokenKind::Signed,
            TokenKind::Static,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_identifier() {
    assert_eq!(
        kinds("_foo123"),
        vec![TokenKind::Identifier("_foo123".into()), TokenKind::Eof]
    );
}

#[test]
fn tokenizes_int_and_float_literals() {
    assert_eq!(
        kinds("42 3.5"),
        vec![
            TokenKind::IntLiteral(42),
            TokenKind::FloatLiteral(3.5),
            TokenKind::Eof
        ]
    );
}

#[test]
fn dot_after_int_is_field_access_not_decimal_when_not_followed_by_digit() {
    // `p.x` where a preceding identifier could be confused for a number;
    // here we confirm a bare `1.` (no trailing digit) is Int then Dot.
    assert_eq!(
        kinds("1.x"),
        vec![
            TokenKind::IntLiteral(1),
            TokenKind::Dot,
            TokenKind::Identifier("x".into()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn tokenizes_string_literal_without_escapes() {
    assert_eq!(
        kinds(r#""hello\nworld""#),
        vec![
            TokenKind::StringLiteral("hello\\nworld".into()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn unterminated_string_is_an_error() {
    let mut lexer = Lexer::new("\"abc");
    assert!(lexer.tokenize().is_err());
}

#[test]
fn longest_match_punctuation() {
    assert_eq!(
        kinds("... -> && || << >> == != >= <= > < = + - * / % | ^ & ! ( ) { } , : ; ."),
        vec![
            TokenKind::Ellipsis,
            TokenKind::Arrow,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::Ge,
            TokenKind::Le,
            TokenKind::Gt,
            TokenKind::Lt,
            TokenKind::Assign,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Pipe,
            TokenKind::Caret,
            TokenKind::Amp,
            TokenKind::Bang,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Semicolon,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenizes_compound_assign_operators() {
    assert_eq!(
        kinds("+= -= *= /= %="),
        vec![
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::PercentEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lines_increment_across_newlines() {
    let tokens = Lexer::new("a\nb\nc").tokenize().unwrap();
    assert_eq!(tokens[0].span.line, 1);
    assert_eq!(tokens[1].span.line, 2);
    assert_eq!(tokens[2].span.line, 3);
}

#[test]
fn unrecognized_character_is_an_error() {
    let mut lexer = Lexer::new("@");
    assert!(lexer.tokenize().is_err());
}

#[test]
fn empty_input_yields_only_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}
