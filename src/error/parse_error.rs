#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A character that cannot begin any token.
    UnexpectedCharacter {
        /// The offending text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric literal with an invalid shape (a second decimal point, or
    /// an `l` suffix on a number that already has one).
    InvalidNumber {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An integer literal without the `l` suffix that does not fit in a
    /// 32-bit signed integer.
    IntegerOutOfRange {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A character literal that is empty, too long, or unterminated.
    InvalidCharLiteral {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A string literal with no closing quote before the end of the line.
    UnterminatedString {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `/* … */` comment with no closing delimiter.
    UnterminatedComment {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A backslash escape outside the fixed escape map.
    InvalidEscape {
        /// The escape as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A statement not followed by a newline.
    ExpectedNewline {
        /// The token found instead.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function definition without a return type between `)` and `{`.
    MissingReturnType {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `}` at the top level, outside any block.
    UnmatchedBrace {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A declaration with a malformed type/name shape.
    InvalidDeclaration {
        /// Details about the malformation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A `continue` statement followed by a value expression.
    ContinueWithValue {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A reserved keyword for a construct the language does not have yet.
    UnsupportedConstruct {
        /// The keyword.
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An operator reached infix position without a precedence entry.
    MissingPrecedence {
        /// The operator's spelling.
        op:   String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token, line } => {
                write!(f, "Error on line {line}: Unexpected token: {token}.")
            },

            Self::UnexpectedCharacter { text, line } => {
                write!(f, "Error on line {line}: Unexpected character: {text}.")
            },

            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: Unexpected end of input.")
            },

            Self::InvalidNumber { literal, line } => {
                write!(f, "Error on line {line}: Invalid number: {literal}.")
            },

            Self::IntegerOutOfRange { literal, line } => write!(f,
                                                                "Error on line {line}: Integer literal {literal} does not fit in 32 bits; add an 'l' suffix to make it an int64."),

            Self::InvalidCharLiteral { literal, line } => {
                write!(f, "Error on line {line}: Invalid character literal: '{literal}'.")
            },

            Self::UnterminatedString { line } => {
                write!(f, "Error on line {line}: Unterminated string literal.")
            },

            Self::UnterminatedComment { line } => {
                write!(f, "Error on line {line}: Unterminated multi-line comment.")
            },

            Self::InvalidEscape { literal, line } => {
                write!(f, "Error on line {line}: Invalid escape sequence: {literal}.")
            },

            Self::ExpectedNewline { token, line } => write!(f,
                                                            "Error on line {line}: Expected a newline after the statement, found {token}."),

            Self::ExpectedClosingParen { line } => write!(f,
                                                          "Error on line {line}: Expected closing parenthesis ')' but none found."),

            Self::MissingReturnType { line } => write!(f,
                                                       "Error on line {line}: Expected a return type (or 'void') after the function parameters."),

            Self::UnmatchedBrace { line } => {
                write!(f, "Error on line {line}: Unexpected top level '}}'.")
            },

            Self::InvalidDeclaration { details, line } => {
                write!(f, "Error on line {line}: Invalid declaration: {details}.")
            },

            Self::ContinueWithValue { line } => {
                write!(f, "Error on line {line}: 'continue' cannot carry a value.")
            },

            Self::UnsupportedConstruct { keyword, line } => {
                write!(f, "Error on line {line}: '{keyword}' is reserved but not supported.")
            },

            Self::MissingPrecedence { op, line } => write!(f,
                                                           "Error on line {line}: Operator {op} has no precedence entry. This is an internal interpreter error."),
        }
    }
}

impl std::error::Error for ParseError {}
