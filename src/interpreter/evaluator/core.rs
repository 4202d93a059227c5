use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{ExitKind, FunctionNode, Node},
    error::RuntimeError,
    interpreter::{
        scope::{BindingKind, ScopeStack},
        symbol::{Symbol, SymbolTable},
        value::{
            core::Value,
            slot::{MemorySlot, Variable},
        },
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the symbol table every name is
/// interned into, and the scope stack of lexical frames. It is created once
/// and drives both parsing (which interns into the symbol table) and
/// evaluation.
pub struct Context {
    /// The process-wide identifier interner.
    pub symbols: SymbolTable,
    /// The stack of lexical frames, global frame at the bottom.
    pub scopes:  ScopeStack,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a fresh context: a new symbol table and a scope stack
    /// holding only the global frame.
    #[must_use]
    pub fn new() -> Self {
        let symbols = SymbolTable::new();
        let scopes = ScopeStack::new(&symbols.names);
        Self { symbols, scopes }
    }

    /// Evaluates a single AST node.
    ///
    /// # Returns
    /// `Some(slot)` for nodes that produce a result: literals, name
    /// references, operators, declarations (which yield the new variable),
    /// and calls of non-void functions. `None` for statements without a
    /// value: if-chains, loops, and void calls.
    pub fn eval(&mut self, node: &Node) -> EvalResult<Option<MemorySlot>> {
        match node {
            Node::Float { value, .. } => Ok(Some(MemorySlot::Value(Value::Float(*value)))),
            Node::Int { value, .. } => Ok(Some(MemorySlot::Value(Value::Int(*value)))),
            Node::Int64 { value, .. } => Ok(Some(MemorySlot::Value(Value::Int64(*value)))),
            Node::Char { value, .. } => Ok(Some(MemorySlot::Value(Value::Char(*value)))),
            Node::Bool { value, .. } => Ok(Some(MemorySlot::Value(Value::Bool(*value)))),
            Node::Str { .. } => Ok(Some(MemorySlot::Undefined)),
            Node::Variable { name, line } => self.eval_variable(*name, *line),
            Node::Declaration { type_name, name, line, .. } => {
                self.eval_declaration(*type_name, *name, *line)
            },
            Node::Binary { op, left, right, line } => self.eval_binary(*op, left, right, *line),
            Node::Unary { op, operand, line } => self.eval_unary(*op, operand, *line),
            Node::Function(function) => self.eval_function_definition(function, function.line),
            Node::Call { name, arguments, line } => self.eval_call(*name, arguments, *line),
            Node::If { condition,
                       statements,
                       else_ifs,
                       else_statements,
                       line, } => {
                self.eval_if(condition, statements, else_ifs, else_statements, *line)
            },
            Node::While { condition, statements, line } => {
                self.eval_while(condition, statements, *line)
            },
            Node::Exit { kind, value, line } => self.eval_exit(*kind, value.as_deref(), *line),
            Node::Slot { slot, .. } => Ok(Some(slot.clone())),
        }
    }

    /// Evaluates a statement list, stopping at the first statement that
    /// leaves an exit signal pending on the current frame.
    ///
    /// Returns the pending signal's carried slot when one stopped the list,
    /// `None` when the list ran to completion. The signal itself stays on
    /// the frame for the enclosing construct to consume or propagate.
    pub fn interpret(&mut self, statements: &[Node]) -> EvalResult<Option<MemorySlot>> {
        for statement in statements {
            self.eval(statement)?;
            if let Some(exit) = self.scopes.exit() {
                return Ok(exit.value.clone());
            }
        }
        Ok(None)
    }

    /// Runs a parsed program at the top level.
    ///
    /// After each statement, a pending exit on the global frame halts
    /// execution; the signal is consumed and its carried slot becomes the
    /// program's result.
    pub fn run(&mut self, program: &[Node]) -> EvalResult<Option<MemorySlot>> {
        for statement in program {
            self.eval(statement)?;
            if let Some(exit) = self.scopes.take_exit() {
                return Ok(exit.value);
            }
        }
        Ok(None)
    }

    fn eval_variable(&mut self, name: Symbol, line: usize) -> EvalResult<Option<MemorySlot>> {
        match self.scopes.lookup_variable(name) {
            Some(variable) => Ok(Some(MemorySlot::Variable(variable))),
            None => Err(RuntimeError::UnknownVariable { name: self.name_text(name),
                                                        line }),
        }
    }

    fn eval_declaration(&mut self,
                        type_name: Symbol,
                        name: Symbol,
                        line: usize)
                        -> EvalResult<Option<MemorySlot>> {
        let variable = Rc::new(RefCell::new(Variable::new(name, type_name)));
        if !self.scopes.declare(name, variable.clone(), BindingKind::Variable) {
            return Err(RuntimeError::DuplicateDeclaration { name: self.name_text(name),
                                                            line });
        }
        Ok(Some(MemorySlot::Variable(variable)))
    }

    fn eval_function_definition(&mut self,
                                function: &Rc<FunctionNode>,
                                line: usize)
                                -> EvalResult<Option<MemorySlot>> {
        let variable = Rc::new(RefCell::new(Variable::new(function.name, function.signature)));
        variable.borrow_mut()
                .set_value(MemorySlot::Function(function.clone()));
        if !self.scopes
                .declare(function.name, variable.clone(), BindingKind::Function)
        {
            return Err(RuntimeError::DuplicateDeclaration { name:
                                                                self.name_text(function.name),
                                                            line });
        }
        Ok(Some(MemorySlot::Variable(variable)))
    }

    fn eval_exit(&mut self,
                 kind: ExitKind,
                 value: Option<&Node>,
                 line: usize)
                 -> EvalResult<Option<MemorySlot>> {
        let carried = match value {
            Some(expression) => self.eval(expression)?,
            None => None,
        };
        self.scopes.set_exit(kind, carried.clone(), line);
        Ok(carried)
    }

    /// Finds a variable or function binding by source name, walking the
    /// scope stack innermost-outward. After execution only the global frame
    /// remains, so hosts use this to inspect globals.
    #[must_use]
    pub fn lookup_variable(&self, name: &str) -> Option<Rc<RefCell<Variable>>> {
        let symbol = self.symbols.get(name)?;
        self.scopes.lookup_any(symbol)
    }

    /// Reads the primitive value currently stored in the named variable,
    /// if the name is bound and holds one.
    #[must_use]
    pub fn lookup_value(&self, name: &str) -> Option<Value> {
        let variable = self.lookup_variable(name)?;
        let value = variable.borrow().value();
        match value {
            Some(MemorySlot::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn name_text(&self, symbol: Symbol) -> String {
        self.symbols.text(symbol).to_string()
    }
}
