//! Token kinds recognized by the Spyre lexer.

/// The kind of a lexical token.
///
/// Keywords are distinguished from [`TokenKind::Identifier`] by matching the
/// spelling against the reserved-word table during identifier scanning;
/// everything else is assigned a dedicated variant so the parser never has
/// to re-inspect spellings.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `[A-Za-z_][A-Za-z0-9_]*` that is not a reserved word.
    Identifier(String),
    /// A digit run with no `.`.
    IntLiteral(u64),
    /// A digit run containing exactly one `.`.
    FloatLiteral(f64),
    /// Text between matching `"`, quotes stripped, no escape processing
    /// (the lexer performs none).
    StringLiteral(String),

    // Keywords
    Func,
    Cfunc,
    Struct,
    If,
    Elif,
    Else,
    While,
    For,
    Do,
    Return,
    Switch,
    Case,
    Break,
    Continue,
    Const,
    Volatile,
    Unsigned,
    Signed,
    Static,

    // Punctuation / operators, longest-match order: three-char, two-char, one-char.
    Ellipsis, // ...
    Arrow,    // ->

    AndAnd, // &&
    OrOr,   // ||
    Shl,    // <<
    Shr,    // >>
    EqEq,   // ==
    NotEq,  // !=
    Ge,     // >=
    Le,     // <=
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=

    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Caret, // ^ (pointer level / deref)
    Amp,   // & (address-of)
    Bang,  // ! (logical not)
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pipe,
    Gt,
    Lt,
    Assign,

    Eof,
}

impl TokenKind {
    /// Human-readable name used in parser error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(s) => format!("identifier '{s}'"),
            TokenKind::IntLiteral(n) => format!("integer literal '{n}'"),
            TokenKind::FloatLiteral(n) => format!("float literal '{n}'"),
            TokenKind::StringLiteral(s) => format!("string literal \"{s}\""),
            TokenKind::Func => "'func'".into(),
            TokenKind::Cfunc => "'cfunc'".into(),
            TokenKind::Struct => "'struct'".into(),
            TokenKind::If => "'if'".into(),
            TokenKind::Elif => "'elif'".into(),
            TokenKind::Else => "'else'".into(),
            TokenKind::While => "'while'".into(),
            TokenKind::For => "'for'".into(),
            TokenKind::Do => "'do'".into(),
            TokenKind::Return => "'return'".into(),
            TokenKind::Switch => "'switch'".into(),
            TokenKind::Case => "'case'".into(),
            TokenKind::Break => "'break'".into(),
            TokenKind::Continue => "'continue'".into(),
            TokenKind::Const => "'const'".into(),
            TokenKind::Volatile => "'volatile'".into(),
            TokenKind::Unsigned => "'unsigned'".into(),
            TokenKind::Signed => "'signed'".into(),
            TokenKind::Static => "'static'".into(),
            TokenKind::Ellipsis => "'...'".into(),
            TokenKind::Arrow => "'->'".into(),
            TokenKind::AndAnd => "'&&'".into(),
            TokenKind::OrOr => "'||'".into(),
            TokenKind::Shl => "'<<'".into(),
            TokenKind::Shr => "'>>'".into(),
            TokenKind::EqEq => "'=='".into(),
            TokenKind::NotEq => "'!='".into(),
            TokenKind::Ge => "'>='".into(),
            TokenKind::Le => "'<='".into(),
            TokenKind::PlusEq => "'+='".into(),
            TokenKind::MinusEq => "'-='".into(),
            TokenKind::StarEq => "'*='".into(),
            TokenKind::SlashEq => "'/='".into(),
            TokenKind::PercentEq => "'%='".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::LBrace => "'{'".into(),
            TokenKind::RBrace => "'}'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Colon => "':'".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::Dot => "'.'".into(),
            TokenKind::Caret => "'^'".into(),
            TokenKind::Amp => "'&'".into(),
            TokenKind::Bang => "'!'".into(),
            TokenKind::Plus => "'+'".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::Star => "'*'".into(),
            TokenKind::Slash => "'/'".into(),
            TokenKind::Percent => "'%'".into(),
            TokenKind::Pipe => "'|'".into(),
            TokenKind::Gt => "'>'".into(),
            TokenKind::Lt => "'<'".into(),
            TokenKind::Assign => "'='".into(),
            TokenKind::Eof => "end of file".into(),
        }
    }

    /// True for the keyword variants; used by the parser to flag a bare
    /// keyword inside an expression as a likely missing semicolon.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Func
                | TokenKind::Cfunc
                | TokenKind::Struct
                | TokenKind::If
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Do
                | TokenKind::Return
                | TokenKind::Switch
                | TokenKind::Case
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Const
                | TokenKind::Volatile
                | TokenKind::Unsigned
                | TokenKind::Signed
                | TokenKind::Static
        )
    }
}
