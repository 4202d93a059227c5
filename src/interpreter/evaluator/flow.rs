use crate::{
    ast::{ElseIf, ExitKind, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::slot::MemorySlot,
    },
};

impl Context {
    /// Evaluates an if-chain.
    ///
    /// Conditions are tried in order; the first true one has its block run
    /// in a fresh `if` frame, and popping that frame propagates any pending
    /// exit to the enclosing level. An if-chain never produces a value.
    pub(crate) fn eval_if(&mut self,
                          condition: &Node,
                          statements: &[Node],
                          else_ifs: &[ElseIf],
                          else_statements: &[Node],
                          line: usize)
                          -> EvalResult<Option<MemorySlot>> {
        if self.condition_value(condition, "if", line)? {
            return self.run_branch(statements);
        }
        for arm in else_ifs {
            if self.condition_value(&arm.condition, "elseif", arm.line)? {
                return self.run_branch(&arm.statements);
            }
        }
        if !else_statements.is_empty() {
            return self.run_branch(else_statements);
        }
        Ok(None)
    }

    fn run_branch(&mut self, statements: &[Node]) -> EvalResult<Option<MemorySlot>> {
        let frame = self.symbols.names.scope_if;
        self.scopes.push(frame);
        self.interpret(statements)?;
        self.scopes.pop_propagating();
        Ok(None)
    }

    /// Evaluates a while loop.
    ///
    /// The condition is re-checked before every iteration. Each iteration
    /// runs in a fresh `while` frame; the frame's exit register decides
    /// what happens next:
    /// - `Return` propagates to the enclosing level and ends the loop.
    /// - `Break` is consumed here; its carried slot becomes the loop's
    ///   result.
    /// - `Continue` is consumed here and the loop re-iterates.
    pub(crate) fn eval_while(&mut self,
                             condition: &Node,
                             statements: &[Node],
                             line: usize)
                             -> EvalResult<Option<MemorySlot>> {
        let frame = self.symbols.names.scope_while;
        while self.condition_value(condition, "while", line)? {
            self.scopes.push(frame);
            self.interpret(statements)?;
            match self.scopes.exit().map(|exit| exit.kind) {
                Some(ExitKind::Return) => {
                    self.scopes.pop_propagating();
                    return Ok(None);
                },
                Some(ExitKind::Break) => {
                    let exit = self.scopes.take_exit();
                    self.scopes.pop();
                    return Ok(exit.and_then(|exit| exit.value));
                },
                Some(ExitKind::Continue) => {
                    self.scopes.clear_exit();
                    self.scopes.pop();
                },
                None => {
                    self.scopes.pop();
                },
            }
        }
        Ok(None)
    }

    /// Evaluates a condition expression and requires it to be a `bool`.
    ///
    /// The type check happens on the slot's reported type name, so a
    /// `var`-typed variable currently holding a bool passes. Coercion is
    /// deliberately not applied: `while 1 { … }` is a type error.
    fn condition_value(&mut self,
                       condition: &Node,
                       construct: &str,
                       line: usize)
                       -> EvalResult<bool> {
        let names = self.symbols.names;
        let slot = match self.eval(condition)? {
            Some(slot) => slot,
            None => {
                return Err(RuntimeError::ExpectedBoolean { construct: construct.to_string(),
                                                           found: "void".to_string(),
                                                           line });
            },
        };
        let type_name = slot.type_symbol(&names);
        if type_name != names.type_bool {
            return Err(RuntimeError::ExpectedBoolean { construct: construct.to_string(),
                                                       found: self.name_text(type_name),
                                                       line });
        }
        match &slot {
            MemorySlot::Value(value) => Ok(value.as_bool()),
            MemorySlot::Variable(variable) => {
                let contents = variable.borrow().value();
                match contents {
                    Some(MemorySlot::Value(value)) => Ok(value.as_bool()),
                    _ => {
                        let name = variable.borrow().name();
                        Err(RuntimeError::VariableHasNoValue { name: self.name_text(name),
                                                               line })
                    },
                }
            },
            _ => Err(RuntimeError::InternalError { details:
                                                       "a bool-typed slot held no boolean".to_string(),
                                                   line }),
        }
    }
}
