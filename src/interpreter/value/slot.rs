use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::FunctionNode,
    interpreter::{
        symbol::{Symbol, WellKnown},
        value::core::Value,
    },
};

/// The signature of a host-provided builtin function.
///
/// A host function receives the already-evaluated argument slots (variables
/// are unwrapped to their values before the call) and returns an optional
/// slot, or a message describing why the call failed. The registry attaches
/// the call site's line number when it converts the message into a runtime
/// error.
pub type HostFn = fn(&[MemorySlot]) -> Result<Option<MemorySlot>, String>;

/// The universal carrier for anything an AST node can evaluate to.
///
/// Expressions produce values, name references produce variables (so that
/// assignment can write through them), and function lookups produce callable
/// slots. `Undefined` is the placeholder result of constructs that lex but
/// have no runtime meaning (string literals); `Void` marks the absence of a
/// value where a slot is still required.
#[derive(Debug, Clone)]
pub enum MemorySlot {
    /// A computed primitive value.
    Value(Value),
    /// A reference to a variable cell. Cloning the slot clones the
    /// reference, not the cell, so assignments through any copy are visible
    /// through all of them.
    Variable(Rc<RefCell<Variable>>),
    /// A user-defined function.
    Function(Rc<FunctionNode>),
    /// A host-provided builtin function.
    Builtin(Rc<BuiltinFunction>),
    /// A placeholder for constructs without a runtime value.
    Undefined,
    /// The explicit absence of a value.
    Void,
}

impl MemorySlot {
    /// Returns the symbol of the slot's type name.
    ///
    /// Variables report their declared type, except `var`-typed variables,
    /// which report the type of whatever they currently hold. Functions
    /// report their derived signature name.
    #[must_use]
    pub fn type_symbol(&self, names: &WellKnown) -> Symbol {
        match self {
            Self::Value(value) => value.type_symbol(names),
            Self::Variable(variable) => variable.borrow().type_name(names),
            Self::Function(function) => function.signature,
            Self::Builtin(builtin) => builtin.signature,
            Self::Undefined => names.type_undefined,
            Self::Void => names.type_void,
        }
    }

    /// Returns the contained [`Value`], reading through a variable if the
    /// slot is one. `None` for callables, `Undefined`, `Void`, and variables
    /// that hold no value yet.
    #[must_use]
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Variable(variable) => match variable.borrow().value() {
                Some(Self::Value(value)) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<Value> for MemorySlot {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A named, typed storage cell.
///
/// The declared type is either one of the primitive type names, the wildcard
/// `var`, or a derived function signature (for the cells that hold
/// callables). A cell starts empty; assignment fills it, coercing the value
/// to the declared type first when the types differ.
#[derive(Debug)]
pub struct Variable {
    name:          Symbol,
    declared_type: Symbol,
    value:         Option<MemorySlot>,
}

impl Variable {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new(name: Symbol, declared_type: Symbol) -> Self {
        Self { name,
               declared_type,
               value: None }
    }

    /// The cell's name.
    #[must_use]
    pub const fn name(&self) -> Symbol {
        self.name
    }

    /// The type the cell was declared with, `var` included.
    #[must_use]
    pub const fn declared_type(&self) -> Symbol {
        self.declared_type
    }

    /// The effective type name: the declared type, unless it is `var`, in
    /// which case the type of the current contents (or `var` while the cell
    /// is still empty).
    #[must_use]
    pub fn type_name(&self, names: &WellKnown) -> Symbol {
        if self.declared_type == names.type_var {
            match &self.value {
                Some(slot) => slot.type_symbol(names),
                None => self.declared_type,
            }
        } else {
            self.declared_type
        }
    }

    /// The current contents, if any.
    #[must_use]
    pub fn value(&self) -> Option<MemorySlot> {
        self.value.clone()
    }

    /// Replaces the contents. Callers are expected to have coerced `slot`
    /// to the declared type already.
    pub fn set_value(&mut self, slot: MemorySlot) {
        self.value = Some(slot);
    }
}

/// A host-supplied callable installed in the global frame.
///
/// Argument values are checked against `param_types` before the host
/// function runs, and its result is checked against `return_type` after. A
/// parameter typed `var` accepts a value of any type.
#[derive(Debug)]
pub struct BuiltinFunction {
    /// The name the function is bound to.
    pub name:        Symbol,
    /// The host callback.
    pub func:        HostFn,
    /// Expected argument type names; the arity is the length of this list.
    pub param_types: Vec<Symbol>,
    /// Declared result type name; `void` for builtins that return nothing.
    pub return_type: Symbol,
    /// The derived `"ret(arg1,arg2,…)"` signature name.
    pub signature:   Symbol,
}
