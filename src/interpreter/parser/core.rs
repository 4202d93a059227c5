use crate::{
    ast::Node,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenStream},
        parser::{
            expression::parse_partial_expression,
            statement::{
                parse_definition, parse_exit, parse_function_definition, parse_if, parse_while,
            },
        },
        symbol::SymbolTable,
    },
};

/// Result type used by the parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses an entire program into its top-level statement list.
///
/// The stream must be freshly constructed; this function loads the first
/// token and consumes input until the end of the file.
///
/// # Errors
/// Any parse error from the statement grammar, plus an unmatched `}` at the
/// top level.
pub fn parse_program(stream: &mut TokenStream, symbols: &mut SymbolTable) -> ParseResult<Vec<Node>> {
    stream.advance();
    parse_statement_list(stream, symbols, true)
}

/// Parses statements until the end of the current region: end of file at
/// the top level, a closing `}` inside a block.
///
/// Every statement must be terminated by a newline, the end of the file, or
/// the block's closing brace. Blank lines between statements are skipped.
pub(crate) fn parse_statement_list(stream: &mut TokenStream,
                                   symbols: &mut SymbolTable,
                                   top_level: bool)
                                   -> ParseResult<Vec<Node>> {
    let mut code = Vec::new();
    loop {
        let node = match stream.current() {
            None => {
                if top_level {
                    break;
                }
                // EOF while a block is open: an unmatched '{'
                return Err(ParseError::UnexpectedEndOfInput { line: stream.line() });
            },
            Some(Token::EndOfStatement) => {
                stream.advance();
                continue;
            },
            Some(Token::RBrace) => {
                if top_level {
                    return Err(ParseError::UnmatchedBrace { line: stream.line() });
                }
                break;
            },
            Some(Token::If) => {
                stream.advance();
                parse_if(stream, symbols)?
            },
            Some(Token::While) => {
                stream.advance();
                parse_while(stream, symbols)?
            },
            Some(Token::For) => {
                return Err(ParseError::UnsupportedConstruct { keyword: "for".to_string(),
                                                              line:    stream.line(), });
            },
            Some(Token::Exit(_)) => parse_exit(stream, symbols)?,
            Some(Token::Type(_) | Token::Modifier(_)) => parse_definition(stream, symbols)?,
            Some(Token::Fn) => parse_function_definition(stream, symbols)?,
            Some(Token::Name(_) | Token::Operator(_)) => {
                parse_partial_expression(stream, symbols, None)?
            },
            Some(other) => {
                return Err(ParseError::UnexpectedToken { token: other.to_string(),
                                                         line:  stream.line(), });
            },
        };
        code.push(node);
        match stream.current() {
            Some(Token::EndOfStatement) => {
                stream.advance();
            },
            Some(Token::RBrace) | None => {},
            Some(other) => {
                return Err(ParseError::ExpectedNewline { token: other.to_string(),
                                                         line:  stream.line(), });
            },
        }
    }
    Ok(code)
}

/// Parses a brace-delimited block: `'{' statement* '}'`.
///
/// Statements normally start on the line after the `{`, but a single-line
/// block such as `if done { break }` is accepted too.
pub(crate) fn parse_block(stream: &mut TokenStream,
                          symbols: &mut SymbolTable)
                          -> ParseResult<Vec<Node>> {
    match stream.current() {
        Some(Token::LBrace) => {},
        Some(other) => {
            return Err(ParseError::UnexpectedToken { token:
                                                         format!("Expected '{{' to start a code block, found {other}"),
                                                     line:  stream.line(), });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: stream.line() }),
    }
    stream.advance();
    let code = parse_statement_list(stream, symbols, false)?;
    // a nested statement list only stops at '}'
    stream.advance();
    Ok(code)
}
