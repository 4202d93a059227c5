use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{ExitKind, FunctionNode, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        scope::BindingKind,
        symbol::Symbol,
        value::slot::{BuiltinFunction, HostFn, MemorySlot, Variable},
    },
};

impl Context {
    /// Evaluates a function call.
    ///
    /// The callee is looked up among function-kind bindings, innermost
    /// frame first; user functions and builtins then take separate paths.
    pub(crate) fn eval_call(&mut self,
                            name: Symbol,
                            arguments: &[Node],
                            line: usize)
                            -> EvalResult<Option<MemorySlot>> {
        let binding = match self.scopes.lookup_function(name) {
            Some(binding) => binding,
            None => {
                return Err(RuntimeError::UnknownFunction { name: self.name_text(name),
                                                           line });
            },
        };
        let callee = binding.borrow().value();
        match callee {
            Some(MemorySlot::Function(function)) => self.call_function(&function, arguments, line),
            Some(MemorySlot::Builtin(builtin)) => self.call_builtin(&builtin, arguments, line),
            _ => Err(RuntimeError::NotCallable { name: self.name_text(name),
                                                 line }),
        }
    }

    /// Calls a user-defined function.
    ///
    /// Argument expressions are evaluated in the caller's scope before the
    /// callee frame exists, then wrapped in slot nodes and assigned to the
    /// freshly declared parameters inside the new frame, so parameter
    /// coercion reuses the ordinary assignment path. The frame's exit
    /// register decides the outcome: `Return` is the success path,
    /// `Break`/`Continue` leaking out is an error, and falling off the end
    /// of a non-void function is an error too.
    fn call_function(&mut self,
                     function: &Rc<FunctionNode>,
                     arguments: &[Node],
                     line: usize)
                     -> EvalResult<Option<MemorySlot>> {
        let name_text = self.name_text(function.name);
        if arguments.len() != function.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: name_text,
                                                             expected: function.params.len(),
                                                             found: arguments.len(),
                                                             line });
        }

        let mut evaluated = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let slot = match self.eval(argument)? {
                Some(slot) => slot,
                None => {
                    return Err(RuntimeError::VoidArgument { name: name_text,
                                                            line });
                },
            };
            evaluated.push(Node::Slot { slot, line });
        }

        self.scopes.push(function.name);
        for (param, argument) in function.params.iter().zip(&evaluated) {
            let cell = self.eval(param)?;
            let value = self.eval(argument)?;
            match (cell, value) {
                (Some(cell), Some(value)) => {
                    self.eval_assignment(cell, value, line)?;
                },
                _ => {
                    return Err(RuntimeError::InternalError { details: format!("parameter binding of '{name_text}' produced no slot"),
                                                             line });
                },
            }
        }

        self.interpret(&function.body)?;
        let exit = self.scopes.take_exit();
        self.scopes.pop();

        let names = self.symbols.names;
        match exit {
            Some(exit) => match exit.kind {
                ExitKind::Return => match exit.value {
                    Some(slot) => {
                        let found = slot.type_symbol(&names);
                        if found != function.return_type {
                            return Err(RuntimeError::ReturnTypeMismatch { name: name_text,
                                                                          expected: self.name_text(function.return_type),
                                                                          found: self.name_text(found),
                                                                          line: exit.line });
                        }
                        Ok(Some(slot))
                    },
                    None => {
                        if function.return_type == names.type_void {
                            Ok(None)
                        } else {
                            Err(RuntimeError::MissingReturn { name: name_text,
                                                              line })
                        }
                    },
                },
                kind @ (ExitKind::Break | ExitKind::Continue) => {
                    Err(RuntimeError::InvalidExitType { name: name_text,
                                                        kind: kind.to_string(),
                                                        line })
                },
            },
            None => {
                if function.return_type == names.type_void {
                    Ok(None)
                } else {
                    Err(RuntimeError::MissingReturn { name: name_text,
                                                      line })
                }
            },
        }
    }

    /// Calls a host-provided builtin.
    ///
    /// Arguments are evaluated left to right and unwrapped to their values;
    /// each is checked against the declared parameter type (the wildcard
    /// `var` accepts anything). The host's result must match the declared
    /// return type; a mismatch there is an internal error, since the
    /// host, not the program, is at fault.
    fn call_builtin(&mut self,
                    builtin: &Rc<BuiltinFunction>,
                    arguments: &[Node],
                    line: usize)
                    -> EvalResult<Option<MemorySlot>> {
        let name_text = self.name_text(builtin.name);
        if arguments.len() != builtin.param_types.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: name_text,
                                                             expected:
                                                                 builtin.param_types.len(),
                                                             found: arguments.len(),
                                                             line });
        }

        let names = self.symbols.names;
        let mut evaluated = Vec::with_capacity(arguments.len());
        for (index, argument) in arguments.iter().enumerate() {
            let slot = match self.eval(argument)? {
                Some(slot) => slot,
                None => {
                    return Err(RuntimeError::VoidArgument { name: name_text,
                                                            line });
                },
            };
            let slot = match slot {
                MemorySlot::Variable(variable) => {
                    let contents = variable.borrow().value();
                    match contents {
                        Some(inner) => inner,
                        None => {
                            let name = variable.borrow().name();
                            return Err(RuntimeError::VariableHasNoValue { name:
                                                                              self.name_text(name),
                                                                          line });
                        },
                    }
                },
                other => other,
            };
            let expected = builtin.param_types[index];
            if expected != names.type_var {
                let found = slot.type_symbol(&names);
                if found != expected {
                    return Err(RuntimeError::ArgumentTypeMismatch { name: name_text,
                                                                    index: index + 1,
                                                                    expected:
                                                                        self.name_text(expected),
                                                                    found: self.name_text(found),
                                                                    line });
                }
            }
            evaluated.push(slot);
        }

        let result = (builtin.func)(&evaluated).map_err(|details| {
                                                   RuntimeError::BuiltinCallFailed { name:
                                                                                         name_text.clone(),
                                                                                     details,
                                                                                     line }
                                               })?;

        match &result {
            Some(slot) => {
                let found = slot.type_symbol(&names);
                if found != builtin.return_type {
                    return Err(RuntimeError::InternalError { details: format!("builtin '{name_text}' returned \"{}\" but declares \"{}\"",
                                                                              self.name_text(found),
                                                                              self.name_text(builtin.return_type)),
                                                             line });
                }
            },
            None => {
                if builtin.return_type != names.type_void {
                    return Err(RuntimeError::InternalError { details: format!("builtin '{name_text}' returned nothing but declares \"{}\"",
                                                                              self.name_text(builtin.return_type)),
                                                             line });
                }
            },
        }
        Ok(result)
    }

    /// Installs a host function in the global frame as a function-kind
    /// binding.
    ///
    /// The binding is a variable whose type is the derived
    /// `"ret(arg1,arg2,…)"` signature and whose value is the builtin slot.
    /// Must be called after scope initialization and before execution.
    ///
    /// # Errors
    /// `DuplicateDeclaration` when the name is already bound in the global
    /// frame.
    pub fn register_builtin(&mut self,
                            name: &str,
                            return_type: &str,
                            func: HostFn,
                            param_types: &[&str])
                            -> Result<(), RuntimeError> {
        let name_symbol = self.symbols.intern(name);
        let return_symbol = self.symbols.intern(return_type);
        let params: Vec<Symbol> = param_types.iter().map(|ty| self.symbols.intern(ty)).collect();
        let signature = format!("{return_type}({})", param_types.join(","));
        let signature = self.symbols.intern(&signature);

        let builtin = Rc::new(BuiltinFunction { name: name_symbol,
                                                func,
                                                param_types: params,
                                                return_type: return_symbol,
                                                signature });
        let variable = Rc::new(RefCell::new(Variable::new(name_symbol, signature)));
        variable.borrow_mut().set_value(MemorySlot::Builtin(builtin));
        if !self.scopes.declare(name_symbol, variable, BindingKind::Function) {
            return Err(RuntimeError::DuplicateDeclaration { name: name.to_string(),
                                                            line: 0 });
        }
        Ok(())
    }
}
