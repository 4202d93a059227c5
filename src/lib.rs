//! # maple
//!
//! Maple is a tree-walking interpreter for a small statically-typed
//! imperative language with primitive numeric, boolean, and character
//! types, lexically scoped variables, first-class user-defined functions,
//! host-provided builtins, and non-local control transfer via `return`,
//! `break`, and `continue`.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::Node,
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::core::Context,
        lexer::{TokenStream, lex},
        parser::core::parse_program,
        value::{
            core::Value,
            slot::{HostFn, MemorySlot, Variable},
        },
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum and related types that represent
/// the syntactic structure of source code as a tree, the operator table,
/// and the exit kinds. The AST is built by the parser and traversed by the
/// evaluator.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches source lines to AST nodes for error reporting.
/// - Owns the operator precedence and associativity table.
pub mod ast;
/// Stock host functions.
///
/// The builtins a stand-alone Maple process ships with: `cos`, the `micro`
/// microsecond clock, and `print`. Embedders can skip these and register
/// their own through the builtin registry.
pub mod builtins;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing,
/// parsing, or evaluating code. It standardizes error reporting and carries
/// detailed information about failures, including error kinds, messages,
/// and source lines.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations, scoping, and symbol interning to provide a complete
/// runtime for source code execution.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, scope.
/// - Provides the building blocks behind [`Interpreter`].
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

/// The embedding surface of the interpreter.
///
/// An `Interpreter` owns the whole pipeline state: the symbol table, the
/// scope stack with the global frame, and any registered builtins. Typical
/// use is [`Interpreter::run`] followed by [`Interpreter::global_value`] to
/// read results back out.
///
/// # Example
/// ```
/// use maple::{Interpreter, interpreter::value::core::Value};
///
/// let mut interpreter = Interpreter::new();
/// interpreter.run("int x\nx = 2 + 3 * 4\n").unwrap();
///
/// assert_eq!(interpreter.global_value("x"), Some(Value::Int(14)));
/// ```
pub struct Interpreter {
    context: Context,
}

#[allow(clippy::new_without_default)]
impl Interpreter {
    /// Creates an interpreter with a fresh symbol table and global scope,
    /// and no builtins.
    #[must_use]
    pub fn new() -> Self {
        Self { context: Context::new() }
    }

    /// Creates an interpreter with the stock builtins (`cos`, `micro`,
    /// `print`) registered.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut interpreter = Self::new();
        builtins::install(&mut interpreter.context).expect("stock builtins cannot clash in a fresh context");
        interpreter
    }

    /// Installs a host function in the global frame.
    ///
    /// Must be called before [`Interpreter::run`]; see the host-function
    /// contract on [`HostFn`].
    pub fn register_builtin(&mut self,
                            name: &str,
                            return_type: &str,
                            func: HostFn,
                            param_types: &[&str])
                            -> Result<(), RuntimeError> {
        self.context.register_builtin(name, return_type, func, param_types)
    }

    /// Parses a source text into its top-level statement list.
    pub fn parse(&mut self, source: &str) -> Result<Vec<Node>, ParseError> {
        let tokens = lex(source)?;
        let mut stream = TokenStream::new(tokens);
        parse_program(&mut stream, &mut self.context.symbols)
    }

    /// Executes a parsed program.
    ///
    /// Returns the slot carried by a top-level `return`, if the program
    /// executed one.
    pub fn interpret(&mut self, program: &[Node]) -> Result<Option<MemorySlot>, RuntimeError> {
        self.context.run(program)
    }

    /// Parses and executes a source text in one step.
    pub fn run(&mut self, source: &str) -> Result<Option<MemorySlot>, Box<dyn std::error::Error>> {
        let program = self.parse(source)?;
        Ok(self.interpret(&program)?)
    }

    /// Looks up a global binding by name after execution.
    #[must_use]
    pub fn lookup_variable(&self, name: &str) -> Option<Rc<RefCell<Variable>>> {
        self.context.lookup_variable(name)
    }

    /// Reads the primitive value currently stored in a global variable.
    ///
    /// `None` when the name is unbound, or bound to something that is not
    /// a plain value (a function, or a variable never assigned).
    #[must_use]
    pub fn global_value(&self, name: &str) -> Option<Value> {
        self.context.lookup_value(name)
    }
}

/// Runs a source text in a fresh interpreter with the stock builtins and
/// returns the interpreter for inspection.
///
/// This function parses and executes all statements in the provided source
/// string. If execution succeeds, the returned interpreter still holds the
/// global frame, so callers can read final variable values out of it.
///
/// # Errors
/// Returns an error if lexing, parsing, or evaluation fails.
///
/// # Examples
/// ```
/// use maple::{interpreter::value::core::Value, run_source};
///
/// let interpreter = run_source("int n\nn = 40 + 2\n").unwrap();
/// assert_eq!(interpreter.global_value("n"), Some(Value::Int(42)));
///
/// // An intentional error: 'y' is assigned before being declared.
/// assert!(run_source("y = 1\n").is_err());
/// ```
pub fn run_source(source: &str) -> Result<Interpreter, Box<dyn std::error::Error>> {
    let mut interpreter = Interpreter::with_builtins();
    interpreter.run(source)?;
    Ok(interpreter)
}
