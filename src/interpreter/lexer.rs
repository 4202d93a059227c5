use std::collections::VecDeque;

use logos::Logos;

use crate::{
    ast::{ExitKind, Op},
    error::ParseError,
};

/// The primitive type names, plus the wildcard `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    /// `float`
    Float,
    /// `int`
    Int,
    /// `int64`
    Int64,
    /// `char`
    Char,
    /// `bool`
    Bool,
    /// `var`
    Var,
}

impl TypeName {
    /// The source spelling of the type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Char => "char",
            Self::Bool => "bool",
            Self::Var => "var",
        }
    }
}

/// Declaration modifiers. Parsed and recorded, without runtime meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `const`
    Const,
    /// `static`
    Static,
    /// `global`
    Global,
}

impl Modifier {
    /// The source spelling of the modifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Static => "static",
            Self::Global => "global",
        }
    }
}

/// A lexical failure, produced while a token pattern is being decoded.
///
/// The lexing driver pairs these with the current line to build the public
/// [`ParseError`] values.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    /// A character no token can start with (this also covers unknown
    /// operators such as a stray `&`).
    #[default]
    UnexpectedCharacter,
    /// A numeric literal with a malformed shape.
    InvalidNumber(String),
    /// An un-suffixed integer literal too large for 32 bits.
    IntegerOutOfRange(String),
    /// A character literal that is empty, too long, or unterminated.
    InvalidCharLiteral(String),
    /// A backslash escape outside the fixed escape map.
    InvalidEscape(String),
    /// A string literal with no closing quote on its line.
    UnterminatedString,
    /// A `/* … */` comment with no closing delimiter.
    UnterminatedComment,
}

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
pub enum Token {
    /// Float literal tokens, such as `3.14` or `2.`.
    #[regex(r"[0-9]+\.[0-9]*", parse_float)]
    #[regex(r"[0-9]+\.[0-9]*\.[0-9.]*", malformed_number)]
    #[regex(r"[0-9]+\.[0-9]*l", malformed_number)]
    Float(f64),
    /// Integer literal tokens, such as `42`. Must fit in 32 bits.
    #[regex(r"[0-9]+", parse_int)]
    Int(i32),
    /// 64-bit integer literals, marked with a trailing `l`: `3000000000l`.
    #[regex(r"[0-9]+l", parse_int64)]
    #[regex(r"[0-9]+l[0-9a-zA-Z_]+", malformed_int64)]
    Int64(i64),
    /// Character literal tokens: `'x'` or `'\n'`.
    #[regex(r"'([^'\\\n\r]|\\[^\n\r])*'", parse_char)]
    #[regex(r"'[^'\n\r]*", unterminated_char)]
    Char(i8),
    /// Boolean literal tokens: `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// String literal tokens. Strings lex with the full escape map but are
    /// not first-class values.
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*""#, parse_string)]
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*"#, unterminated_string)]
    Str(String),
    /// A primitive type name in declaration position.
    #[token("float", |_| TypeName::Float)]
    #[token("int", |_| TypeName::Int)]
    #[token("int64", |_| TypeName::Int64)]
    #[token("char", |_| TypeName::Char)]
    #[token("bool", |_| TypeName::Bool)]
    #[token("var", |_| TypeName::Var)]
    Type(TypeName),
    /// A declaration modifier.
    #[token("const", |_| Modifier::Const)]
    #[token("static", |_| Modifier::Static)]
    #[token("global", |_| Modifier::Global)]
    Modifier(Modifier),
    /// `fn`
    #[token("fn")]
    Fn,
    /// `void`
    #[token("void")]
    Void,
    /// `if`
    #[token("if")]
    If,
    /// `elseif`
    #[token("elseif")]
    ElseIf,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`, reserved; the parser rejects it.
    #[token("for")]
    For,
    /// `return`, `break`, or `continue`.
    #[token("return", |_| ExitKind::Return)]
    #[token("break", |_| ExitKind::Break)]
    #[token("continue", |_| ExitKind::Continue)]
    Exit(ExitKind),
    /// An operator token.
    #[token("=", |_| Op::Assign)]
    #[token("+", |_| Op::Add)]
    #[token("-", |_| Op::Sub)]
    #[token("*", |_| Op::Mul)]
    #[token("/", |_| Op::Div)]
    #[token(">", |_| Op::Greater)]
    #[token("<", |_| Op::Less)]
    #[token(">=", |_| Op::GreaterEqual)]
    #[token("==", |_| Op::Equal)]
    #[token("!=", |_| Op::NotEqual)]
    #[token("&&", |_| Op::And)]
    #[token("||", |_| Op::Or)]
    #[token("!", |_| Op::Not)]
    Operator(Op),
    /// User identifiers: variable or function names such as `x` or `fib`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// A statement terminator. Each of `\r\n`, `\n\r`, `\n`, `\r` counts as
    /// one terminator and advances the line counter by one.
    #[regex(r"\r\n|\n\r|\n|\r", |lex| {
        lex.extras.line += 1;
    })]
    EndOfStatement,
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip)]
    Comment,
    /// ```text
    /// /* Multi line comments. */
    /// ```
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", multiline_comment)]
    #[regex(r"/\*([^*]|\*+[^*/])*\**", unterminated_comment)]
    MultiLineComment,
    /// Spaces and tabs.
    #[regex(r"[ \t]+", logos::skip)]
    Ignored,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}l"),
            Self::Char(v) => write!(f, "'{}'", char::from(*v as u8)),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Type(t) => write!(f, "{}", t.as_str()),
            Self::Modifier(m) => write!(f, "{}", m.as_str()),
            Self::Fn => write!(f, "fn"),
            Self::Void => write!(f, "void"),
            Self::If => write!(f, "if"),
            Self::ElseIf => write!(f, "elseif"),
            Self::Else => write!(f, "else"),
            Self::While => write!(f, "while"),
            Self::For => write!(f, "for"),
            Self::Exit(kind) => write!(f, "{kind}"),
            Self::Operator(op) => write!(f, "{op}"),
            Self::Name(name) => write!(f, "{name}"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::EndOfStatement => write!(f, "\\n"),
            Self::Comment | Self::MultiLineComment | Self::Ignored => Ok(()),
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1 }
    }
}

/// Decodes one character of the fixed escape map, `None` for characters
/// outside it.
const fn decode_escape(byte: u8) -> Option<u8> {
    match byte {
        b'n' => Some(b'\n'),
        b't' => Some(b'\t'),
        b'r' => Some(b'\r'),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'v' => Some(0x0b),
        b'a' => Some(0x07),
        b'\\' => Some(b'\\'),
        b'\'' => Some(b'\''),
        b'"' => Some(b'"'),
        b'?' => Some(b'?'),
        b'0' => Some(0),
        _ => None,
    }
}

fn parse_float(lex: &logos::Lexer<Token>) -> Result<f64, LexError> {
    lex.slice()
       .parse()
       .map_err(|_| LexError::InvalidNumber(lex.slice().to_string()))
}

fn parse_int(lex: &logos::Lexer<Token>) -> Result<i32, LexError> {
    lex.slice()
       .parse()
       .map_err(|_| LexError::IntegerOutOfRange(lex.slice().to_string()))
}

fn parse_int64(lex: &logos::Lexer<Token>) -> Result<i64, LexError> {
    let digits = &lex.slice()[..lex.slice().len() - 1];
    digits.parse()
          .map_err(|_| LexError::InvalidNumber(lex.slice().to_string()))
}

fn malformed_number(lex: &logos::Lexer<Token>) -> Result<f64, LexError> {
    Err(LexError::InvalidNumber(lex.slice().to_string()))
}

fn malformed_int64(lex: &logos::Lexer<Token>) -> Result<i64, LexError> {
    Err(LexError::InvalidNumber(lex.slice().to_string()))
}

fn parse_char(lex: &logos::Lexer<Token>) -> Result<i8, LexError> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    match inner.as_bytes() {
        [byte] if *byte != b'\\' => Ok(*byte as i8),
        [b'\\', escaped] => decode_escape(*escaped).map(|byte| byte as i8)
                                                   .ok_or_else(|| {
                                                       LexError::InvalidEscape(inner.to_string())
                                                   }),
        _ => Err(LexError::InvalidCharLiteral(inner.to_string())),
    }
}

fn unterminated_char(lex: &logos::Lexer<Token>) -> Result<i8, LexError> {
    Err(LexError::InvalidCharLiteral(lex.slice().to_string()))
}

fn parse_string(lex: &logos::Lexer<Token>) -> Result<String, LexError> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        let escaped = chars.next().ok_or(LexError::UnterminatedString)?;
        let byte = u8::try_from(u32::from(escaped)).ok().and_then(decode_escape);
        match byte {
            Some(byte) => decoded.push(char::from(byte)),
            None => return Err(LexError::InvalidEscape(format!("\\{escaped}"))),
        }
    }
    Ok(decoded)
}

fn unterminated_string(_lex: &logos::Lexer<Token>) -> Result<String, LexError> {
    Err(LexError::UnterminatedString)
}

fn multiline_comment(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    let newlines = lex.slice().chars().filter(|&c| c == '\n').count();
    lex.extras.line += newlines;
    logos::Skip
}

fn unterminated_comment(_lex: &logos::Lexer<Token>) -> logos::FilterResult<(), LexError> {
    logos::FilterResult::Error(LexError::UnterminatedComment)
}

/// Tokenizes an entire source text.
///
/// Returns the tokens paired with their originating line, or the first
/// lexical error converted to a [`ParseError`].
///
/// # Errors
/// Any lexical failure: malformed numbers, invalid or unterminated
/// character/string literals, unterminated comments, and characters no
/// token can start with.
pub fn lex(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        match token {
            Ok(tok) => tokens.push((tok, lexer.extras.line)),
            Err(err) => return Err(promote_error(err, lexer.slice(), lexer.extras.line)),
        }
    }

    Ok(tokens)
}

fn promote_error(error: LexError, slice: &str, line: usize) -> ParseError {
    match error {
        LexError::UnexpectedCharacter => ParseError::UnexpectedCharacter { text: slice.to_string(),
                                                                           line },
        LexError::InvalidNumber(literal) => ParseError::InvalidNumber { literal, line },
        LexError::IntegerOutOfRange(literal) => ParseError::IntegerOutOfRange { literal, line },
        LexError::InvalidCharLiteral(literal) => ParseError::InvalidCharLiteral { literal, line },
        LexError::InvalidEscape(literal) => ParseError::InvalidEscape { literal, line },
        LexError::UnterminatedString => ParseError::UnterminatedString { line },
        LexError::UnterminatedComment => ParseError::UnterminatedComment { line },
    }
}

/// The parser's view of the token vector.
///
/// Keeps the one-token look-back (the current token), the cursor into the
/// real tokens, and a FIFO of synthetically injected tokens that
/// [`TokenStream::advance`] consults before the real stream. The parser uses
/// the queue to reinject statement terminators after composite constructs
/// (see [`TokenStream::inject`]).
#[derive(Debug)]
pub struct TokenStream {
    tokens:   Vec<(Token, usize)>,
    pos:      usize,
    injected: VecDeque<(Token, usize)>,
    current:  Option<(Token, usize)>,
    eof_line: usize,
}

impl TokenStream {
    /// Wraps a lexed token vector. The stream starts before the first
    /// token; call [`TokenStream::advance`] once to load it.
    #[must_use]
    pub fn new(tokens: Vec<(Token, usize)>) -> Self {
        let eof_line = tokens.last().map_or(1, |(_, line)| *line);
        Self { tokens,
               pos: 0,
               injected: VecDeque::new(),
               current: None,
               eof_line }
    }

    /// Moves to the next token (injected tokens first, then the real
    /// stream) and returns it. `None` once the input is exhausted.
    pub fn advance(&mut self) -> Option<&Token> {
        if let Some(injected) = self.injected.pop_front() {
            self.current = Some(injected);
        } else if self.pos < self.tokens.len() {
            self.current = Some(self.tokens[self.pos].clone());
            self.pos += 1;
        } else {
            self.current = None;
        }
        self.current.as_ref().map(|(token, _)| token)
    }

    /// The current token; `None` at end of input (or before the first
    /// [`TokenStream::advance`]).
    #[must_use]
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref().map(|(token, _)| token)
    }

    /// The line the current token originates from.
    ///
    /// A statement terminator reports the line it ended, not the line it
    /// started.
    #[must_use]
    pub fn line(&self) -> usize {
        match &self.current {
            Some((Token::EndOfStatement, line)) => line.saturating_sub(1),
            Some((_, line)) => *line,
            None => self.eof_line,
        }
    }

    /// Enqueues `token` to be returned by the next [`TokenStream::advance`],
    /// with the current token re-enqueued right after it.
    pub fn inject(&mut self, token: Token) {
        let line = self.line();
        self.injected.push_back((token, line));
        if let Some(current) = self.current.take() {
            self.injected.push_back(current);
        }
    }
}
