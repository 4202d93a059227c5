use std::rc::Rc;

use crate::{
    ast::{ElseIf, ExitKind, FunctionNode, Node, Op},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenStream},
        parser::{
            core::{ParseResult, parse_block},
            expression::{parse_binary_operator, parse_partial_expression},
        },
        symbol::{Symbol, SymbolTable},
    },
};

/// Parses a partial definition: `modifier* type name`.
///
/// Used both for variable declarations and for function parameters. Exactly
/// one type must appear before the name; any number of modifiers may
/// precede or follow it.
///
/// # Errors
/// Returns a `ParseError` if:
/// - more than one type is given,
/// - a token that is neither a type, a modifier, nor a name appears,
/// - no type is given before the name,
/// - input ends inside the definition.
pub(crate) fn parse_partial_definition(stream: &mut TokenStream,
                                       symbols: &mut SymbolTable)
                                       -> ParseResult<Node> {
    let line = stream.line();
    let mut modifiers = Vec::new();
    let mut type_name = None;
    loop {
        match stream.current() {
            Some(Token::Type(found)) => {
                if type_name.is_some() {
                    return Err(ParseError::InvalidDeclaration { details: format!("more than one type given ({})", found.as_str()),
                                                                line:    stream.line(), });
                }
                type_name = Some(symbols.intern(found.as_str()));
            },
            Some(Token::Modifier(modifier)) => modifiers.push(symbols.intern(modifier.as_str())),
            Some(Token::Name(_)) => break,
            Some(other) => {
                return Err(ParseError::InvalidDeclaration { details: format!("unexpected token '{other}' in a type definition"),
                                                            line:    stream.line(), });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line: stream.line() }),
        }
        stream.advance();
    }
    let Some(type_name) = type_name else {
        return Err(ParseError::InvalidDeclaration { details: "no type given".to_string(),
                                                    line:    stream.line(), });
    };
    let name = match stream.current() {
        Some(Token::Name(name)) => name.clone(),
        _ => unreachable!("the declaration loop exits on a name token"),
    };
    let name = symbols.intern(&name);
    stream.advance();
    Ok(Node::Declaration { modifiers,
                           type_name,
                           name,
                           line })
}

/// Parses a full definition statement:
///
/// ```text
/// defn := modifier* type name ('=' expression)?
/// ```
///
/// When an initializer is present the whole statement becomes an assignment
/// expression whose left side is the declaration, so declaration and first
/// assignment evaluate in one step.
pub(crate) fn parse_definition(stream: &mut TokenStream,
                               symbols: &mut SymbolTable)
                               -> ParseResult<Node> {
    let node = parse_partial_definition(stream, symbols)?;
    match stream.current() {
        Some(Token::Operator(Op::Assign)) => parse_binary_operator(stream, symbols, node),
        Some(Token::Operator(op)) => {
            Err(ParseError::InvalidDeclaration { details: format!("invalid operator '{op}' after a variable declaration"),
                                                 line:    stream.line(), })
        },
        Some(Token::EndOfStatement | Token::RBrace) | None => Ok(node),
        Some(other) => Err(ParseError::ExpectedNewline { token: other.to_string(),
                                                         line:  stream.line(), }),
    }
}

/// Parses a function definition:
///
/// ```text
/// fn-def := 'fn' name '(' param-list? ')' (type | 'void') block
/// ```
///
/// The function's `"ret(arg1,arg2,…)"` signature name is derived and
/// interned here, once, so that calls and host lookups can compare it as a
/// symbol.
pub(crate) fn parse_function_definition(stream: &mut TokenStream,
                                        symbols: &mut SymbolTable)
                                        -> ParseResult<Node> {
    let line = stream.line();
    stream.advance();
    let name = match stream.current() {
        Some(Token::Name(name)) => name.clone(),
        Some(other) => {
            return Err(ParseError::UnexpectedToken { token:
                                                         format!("Expected a name after 'fn', found {other}"),
                                                     line:  stream.line(), });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line: stream.line() }),
    };
    let name = symbols.intern(&name);
    stream.advance();
    match stream.current() {
        Some(Token::LParen) => {},
        _ => {
            return Err(ParseError::UnexpectedToken { token:
                                                         "Expected '(' after the function name".to_string(),
                                                     line:  stream.line(), });
        },
    }
    stream.advance();
    let mut params = Vec::new();
    if !matches!(stream.current(), Some(Token::RParen)) {
        loop {
            params.push(parse_partial_definition(stream, symbols)?);
            match stream.current() {
                Some(Token::Comma) => {
                    stream.advance();
                },
                Some(Token::RParen) => break,
                Some(other) => {
                    return Err(ParseError::UnexpectedToken { token: format!("Expected ',' or ')' after a function parameter, found {other}"),
                                                             line:  stream.line(), });
                },
                None => return Err(ParseError::UnexpectedEndOfInput { line: stream.line() }),
            }
        }
    }
    stream.advance();
    let return_type = match stream.current() {
        Some(Token::Type(found)) => symbols.intern(found.as_str()),
        Some(Token::Void) => symbols.names.type_void,
        _ => return Err(ParseError::MissingReturnType { line: stream.line() }),
    };
    stream.advance();
    let body = parse_block(stream, symbols)?;
    let signature = function_signature(symbols, return_type, &params);
    Ok(Node::Function(Rc::new(FunctionNode { name,
                                             params,
                                             return_type,
                                             signature,
                                             body,
                                             line })))
}

fn function_signature(symbols: &mut SymbolTable, return_type: Symbol, params: &[Node]) -> Symbol {
    let mut text = symbols.text(return_type).to_string();
    text.push('(');
    for (index, param) in params.iter().enumerate() {
        if let Node::Declaration { type_name, .. } = param {
            if index > 0 {
                text.push(',');
            }
            text.push_str(symbols.text(*type_name));
        }
    }
    text.push(')');
    symbols.intern(&text)
}

/// Parses an exit statement:
///
/// ```text
/// exit := 'return' expression? | 'break' expression? | 'continue'
/// ```
///
/// `continue` followed by anything but the end of the statement is an
/// error: it can never carry a value.
pub(crate) fn parse_exit(stream: &mut TokenStream, symbols: &mut SymbolTable) -> ParseResult<Node> {
    let line = stream.line();
    let kind = match stream.current() {
        Some(Token::Exit(kind)) => *kind,
        _ => unreachable!("the caller dispatched on an exit token"),
    };
    stream.advance();
    match stream.current() {
        Some(Token::EndOfStatement | Token::RBrace) | None => Ok(Node::Exit { kind,
                                                                              value: None,
                                                                              line }),
        _ if kind == ExitKind::Continue => {
            Err(ParseError::ContinueWithValue { line: stream.line() })
        },
        _ => {
            let value = parse_partial_expression(stream, symbols, None)?;
            Ok(Node::Exit { kind,
                            value: Some(Box::new(value)),
                            line })
        },
    }
}

/// Parses an if-chain. The leading `if` token has already been consumed.
///
/// ```text
/// if := 'if' expression block ('elseif' expression block)* ('else' block)?
/// ```
///
/// Blank lines between the segments are skipped. After the chain, a
/// synthetic statement terminator is injected into the stream so that the
/// statement loop treats the whole composite as a single terminated
/// statement.
pub(crate) fn parse_if(stream: &mut TokenStream, symbols: &mut SymbolTable) -> ParseResult<Node> {
    let line = stream.line();
    let condition = parse_partial_expression(stream, symbols, None)?;
    let statements = parse_block(stream, symbols)?;
    skip_blank_lines(stream);

    let mut else_ifs = Vec::new();
    while matches!(stream.current(), Some(Token::ElseIf)) {
        let elseif_line = stream.line();
        stream.advance();
        let elseif_condition = parse_partial_expression(stream, symbols, None)?;
        let elseif_statements = parse_block(stream, symbols)?;
        skip_blank_lines(stream);
        else_ifs.push(ElseIf { condition:  elseif_condition,
                               statements: elseif_statements,
                               line:       elseif_line, });
    }

    let mut else_statements = Vec::new();
    if matches!(stream.current(), Some(Token::Else)) {
        stream.advance();
        skip_blank_lines(stream);
        else_statements = parse_block(stream, symbols)?;
    }

    stream.inject(Token::EndOfStatement);
    stream.advance();
    Ok(Node::If { condition: Box::new(condition),
                  statements,
                  else_ifs,
                  else_statements,
                  line })
}

/// Parses a while loop. The leading `while` token has already been
/// consumed.
///
/// ```text
/// while := 'while' expression block
/// ```
pub(crate) fn parse_while(stream: &mut TokenStream, symbols: &mut SymbolTable) -> ParseResult<Node> {
    let line = stream.line();
    let condition = parse_partial_expression(stream, symbols, None)?;
    let statements = parse_block(stream, symbols)?;
    Ok(Node::While { condition: Box::new(condition),
                     statements,
                     line })
}

fn skip_blank_lines(stream: &mut TokenStream) {
    while matches!(stream.current(), Some(Token::EndOfStatement)) {
        stream.advance();
    }
}
