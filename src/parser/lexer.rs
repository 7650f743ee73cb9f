//! Logos-based lexer for the C# subset.
//!
//! Fast tokenization using the logos crate. The parser only needs enough
//! token structure to walk declarations and match brackets reliably;
//! statement bodies are sliced as text and handled by the scanner in
//! [`crate::syntax::scan`].

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl<'a> Token<'a> {
    pub fn start(&self) -> usize {
        u32::from(self.offset) as usize
    }

    pub fn end(&self) -> usize {
        self.start() + self.text.len()
    }

    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.inner.span().start as u32);
        let kind = result.unwrap_or(TokenKind::Error);
        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string, trivia included.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // =====================================================================
    // TRIVIA
    // =====================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // =====================================================================
    // LITERALS
    // =====================================================================
    #[regex(r"@?[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9][0-9a-zA-Z_]*)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r#"@"([^"]|"")*""#)]
    VerbatimStr,

    #[regex(r#"\$"([^"\\\n]|\\.)*""#)]
    InterpStr,

    #[regex(r#"(\$@|@\$)"([^"]|"")*""#)]
    VerbatimInterpStr,

    #[regex(r"'([^'\\\n]|\\.)+'")]
    CharLit,

    // =====================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =====================================================================
    #[token("=>")]
    FatArrow,

    #[token("::")]
    ColonColon,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    // =====================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =====================================================================
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("=")]
    Eq,

    #[token("?")]
    Question,

    // Anything else (operators, preprocessor hashes, ...)
    #[regex(r"[^ \t\r\n\fA-Za-z0-9_]", priority = 1)]
    Other,

    Error,
}
