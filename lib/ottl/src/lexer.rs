use std::ops::Range;

use logos::Logos;

/// Condition language tokens.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'a> {
    // ===== Keywords =====
    #[token("or")]
    Or,

    #[token("and")]
    And,

    #[token("not")]
    Not,

    #[token("in")]
    In,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("nil")]
    Nil,

    // ===== Comparison operators =====
    #[token("==")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LessEq,

    #[token(">=")]
    GreaterEq,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    /// Only valid directly in front of a numeric literal.
    #[token("-")]
    Minus,

    // ===== Delimiters =====
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    // ===== Literals =====
    /// String literal, quotes included: "..."
    #[regex(r#""[^"\\]*(?:\\.[^"\\]*)*""#, |lex| lex.slice())]
    StringLiteral(&'a str),

    /// Bytes literal: 0xC0FFEE
    #[regex(r"0x[0-9a-fA-F]+", |lex| hex::decode(&lex.slice()[2..]).ok())]
    BytesLiteral(Vec<u8>),

    /// Float literal: 6.14, .5
    #[regex(r"[0-9]+\.[0-9]*|\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    /// Integer literal: 42
    #[regex(r"[0-9]+", priority = 2, callback = |lex| lex.slice().parse::<i64>().ok())]
    IntLiteral(i64),

    // ===== Identifiers =====
    /// Uppercase identifier (function or enum).
    #[regex(r"[A-Z][a-zA-Z0-9_]*", |lex| lex.slice())]
    UpperIdent(&'a str),

    /// Lowercase identifier (path segment).
    #[regex(r"[a-z_][a-zA-Z0-9_]*", priority = 1, callback = |lex| lex.slice())]
    LowerIdent(&'a str),
}

/// Invalid input encountered while tokenizing.
#[derive(Debug, Clone)]
pub struct LexerError {
    /// Byte offset in the input where the error occurred.
    pub position: usize,

    /// The slice that could not be tokenized.
    pub invalid_slice: String,
}

/// Splits `input` into tokens along with their byte ranges.
///
/// Stops at the first invalid token. Integer literals that overflow `i64` and odd-length byte literals are invalid.
pub fn tokenize(input: &str) -> Result<Vec<(Token<'_>, Range<usize>)>, LexerError> {
    let mut lexer = Token::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                let span = lexer.span();
                return Err(LexerError {
                    position: span.start,
                    invalid_slice: input[span].to_string(),
                });
            }
        }
    }
    Ok(tokens)
}
