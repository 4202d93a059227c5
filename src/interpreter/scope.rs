use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::ExitKind,
    interpreter::{
        symbol::{Symbol, WellKnown},
        value::slot::{MemorySlot, Variable},
    },
};

/// Distinguishes what a name is bound to inside a frame.
///
/// Variables and functions share one namespace: declaring a function with
/// the name of a variable (or the other way around) in the same frame is a
/// duplicate declaration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// An ordinary variable cell.
    Variable,
    /// A cell holding a callable (user function or builtin).
    Function,
}

/// A pending non-local exit recorded on a frame.
///
/// Set by `return`/`break`/`continue`, carried downward when frames pop, and
/// consumed by the loop or function call that owns the transfer.
#[derive(Debug, Clone)]
pub struct ExitSignal {
    /// Which transfer is pending.
    pub kind:  ExitKind,
    /// The carried slot, if the exit statement had a value expression.
    pub value: Option<MemorySlot>,
    /// Line of the exit statement that raised the signal.
    pub line:  usize,
}

#[derive(Debug)]
struct Binding {
    slot: Rc<RefCell<Variable>>,
    kind: BindingKind,
}

/// One entry on the scope stack.
///
/// A frame owns the variables declared while it is on top, and a single
/// exit register. The name is diagnostic only: `$_globalScope` for the root
/// frame, `if`/`while` for block frames, the function's name for call
/// frames.
#[derive(Debug)]
pub struct ScopeFrame {
    name:     Symbol,
    bindings: HashMap<Symbol, Binding>,
    exit:     Option<ExitSignal>,
}

impl ScopeFrame {
    fn new(name: Symbol) -> Self {
        Self { name,
               bindings: HashMap::new(),
               exit: None }
    }
}

/// The stack of lexical frames.
///
/// Lookup walks from the innermost frame outward; insertion always goes to
/// the innermost frame. Only the top frame's exit register is written
/// directly; [`ScopeStack::pop_propagating`] moves a pending exit down to
/// the frame that becomes the new top, which is how `return` and `break`
/// bubble out of nested blocks.
///
/// # Example
/// ```
/// use maple::interpreter::{scope::ScopeStack, symbol::SymbolTable};
///
/// let symbols = SymbolTable::new();
/// let mut scopes = ScopeStack::new(&symbols.names);
/// assert_eq!(scopes.depth(), 1);
///
/// scopes.push(symbols.names.scope_if);
/// assert_eq!(scopes.depth(), 2);
/// scopes.pop_propagating();
/// assert_eq!(scopes.depth(), 1);
/// ```
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    /// Creates the stack with the root frame (`$_globalScope`) pushed.
    #[must_use]
    pub fn new(names: &WellKnown) -> Self {
        Self { frames: vec![ScopeFrame::new(names.scope_global)] }
    }

    /// The number of frames currently on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The diagnostic name of the innermost frame.
    #[must_use]
    pub fn top_name(&self) -> Symbol {
        self.top().name
    }

    /// Pushes a fresh frame named `name`.
    pub fn push(&mut self, name: Symbol) {
        self.frames.push(ScopeFrame::new(name));
    }

    /// Pops the innermost frame, moving its pending exit (if any) to the
    /// frame below. The root frame is never popped.
    pub fn pop_propagating(&mut self) {
        debug_assert!(self.frames.len() > 1, "attempted to pop the global frame");
        if let Some(frame) = self.frames.pop()
           && let Some(exit) = frame.exit
        {
            self.top_mut().exit = Some(exit);
        }
    }

    /// Pops the innermost frame and discards its exit register. Used when
    /// the construct that pushed the frame has already consumed the signal.
    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "attempted to pop the global frame");
        self.frames.pop();
    }

    /// Binds `variable` in the innermost frame.
    ///
    /// Returns `false` when the name is already bound in that frame (as a
    /// variable or as a function) and leaves the frame unchanged.
    pub fn declare(&mut self,
                   name: Symbol,
                   variable: Rc<RefCell<Variable>>,
                   kind: BindingKind)
                   -> bool {
        let frame = self.top_mut();
        if frame.bindings.contains_key(&name) {
            return false;
        }
        frame.bindings.insert(name, Binding { slot: variable, kind });
        true
    }

    /// Finds the innermost variable-kind binding for `name`.
    #[must_use]
    pub fn lookup_variable(&self, name: Symbol) -> Option<Rc<RefCell<Variable>>> {
        self.lookup_kind(name, BindingKind::Variable)
    }

    /// Finds the innermost function-kind binding for `name`.
    #[must_use]
    pub fn lookup_function(&self, name: Symbol) -> Option<Rc<RefCell<Variable>>> {
        self.lookup_kind(name, BindingKind::Function)
    }

    /// Finds the innermost binding for `name` of either kind.
    #[must_use]
    pub fn lookup_any(&self, name: Symbol) -> Option<Rc<RefCell<Variable>>> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(&name).map(|binding| binding.slot.clone()))
    }

    fn lookup_kind(&self, name: Symbol, kind: BindingKind) -> Option<Rc<RefCell<Variable>>> {
        self.frames.iter().rev().find_map(|frame| {
                                     frame.bindings
                                          .get(&name)
                                          .filter(|binding| binding.kind == kind)
                                          .map(|binding| binding.slot.clone())
                                 })
    }

    /// Records an exit signal on the innermost frame.
    pub fn set_exit(&mut self, kind: ExitKind, value: Option<MemorySlot>, line: usize) {
        self.top_mut().exit = Some(ExitSignal { kind, value, line });
    }

    /// The pending exit of the innermost frame, if any.
    #[must_use]
    pub fn exit(&self) -> Option<&ExitSignal> {
        self.top().exit.as_ref()
    }

    /// Removes and returns the innermost frame's pending exit.
    pub fn take_exit(&mut self) -> Option<ExitSignal> {
        self.top_mut().exit.take()
    }

    /// Clears the innermost frame's exit register.
    pub fn clear_exit(&mut self) {
        self.top_mut().exit = None;
    }

    fn top(&self) -> &ScopeFrame {
        self.frames.last().expect("scope stack is never empty")
    }

    fn top_mut(&mut self) -> &mut ScopeFrame {
        self.frames.last_mut().expect("scope stack is never empty")
    }
}
