use crate::{
    ast::{Node, Op},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, slot::MemorySlot},
    },
};

impl Context {
    /// Evaluates a binary operation.
    ///
    /// Both operands are always evaluated, left first; `&&` and `||` do
    /// not short-circuit, keeping the operator path symmetric with the
    /// numeric promotion ladder. Assignment is dispatched separately since
    /// its left side must stay a variable rather than reduce to a value.
    pub(crate) fn eval_binary(&mut self,
                              op: Op,
                              left: &Node,
                              right: &Node,
                              line: usize)
                              -> EvalResult<Option<MemorySlot>> {
        let left_slot = self.eval(left)?.ok_or_else(|| RuntimeError::VoidOperand { op: op.text().to_string(),
                                                                                   line })?;
        let right_slot = self.eval(right)?.ok_or_else(|| RuntimeError::VoidOperand { op: op.text().to_string(),
                                                                                     line })?;
        if op == Op::Assign {
            return self.eval_assignment(left_slot, right_slot, line).map(Some);
        }

        let lhs = self.operand_value(&left_slot, "the left side", line)?;
        let rhs = self.operand_value(&right_slot, "the right side", line)?;
        let value = match op {
            Op::Add => arithmetic(lhs, rhs, |a, b| a + b, i64::wrapping_add, i32::wrapping_add, i8::wrapping_add),
            Op::Sub => arithmetic(lhs, rhs, |a, b| a - b, i64::wrapping_sub, i32::wrapping_sub, i8::wrapping_sub),
            Op::Mul => arithmetic(lhs, rhs, |a, b| a * b, i64::wrapping_mul, i32::wrapping_mul, i8::wrapping_mul),
            // division always computes in float, whatever the operand tags
            Op::Div => Value::Float(lhs.as_float() / rhs.as_float()),
            Op::Greater => comparison(lhs, rhs, |a, b| a > b, |a, b| a > b, |a, b| a > b, |a, b| a > b, |a, b| a > b),
            Op::Less => comparison(lhs, rhs, |a, b| a < b, |a, b| a < b, |a, b| a < b, |a, b| a < b, |a, b| a < b),
            Op::GreaterEqual => comparison(lhs, rhs, |a, b| a >= b, |a, b| a >= b, |a, b| a >= b, |a, b| a >= b, |a, b| a >= b),
            Op::Equal => comparison(lhs, rhs, |a, b| a == b, |a, b| a == b, |a, b| a == b, |a, b| a == b, |a, b| a == b),
            Op::NotEqual => comparison(lhs, rhs, |a, b| a != b, |a, b| a != b, |a, b| a != b, |a, b| a != b, |a, b| a != b),
            Op::And => Value::Bool(lhs.as_bool() && rhs.as_bool()),
            Op::Or => Value::Bool(lhs.as_bool() || rhs.as_bool()),
            Op::Assign | Op::Not => {
                return Err(RuntimeError::InternalError { details: format!("binary operator \"{op}\" has undefined behavior"),
                                                         line });
            },
        };
        Ok(Some(MemorySlot::Value(value)))
    }

    /// Evaluates `left = right`.
    ///
    /// The left slot must be a variable. A variable on the right is
    /// unwrapped to its contents first. A primitive value is coerced to the
    /// variable's declared type when the tags differ; a `var`-typed
    /// variable takes the value as-is and with it the value's type.
    /// Non-value slots (a callable, the undefined placeholder) are stored
    /// unchanged.
    ///
    /// Returns the left variable slot, so assignments chain.
    pub(crate) fn eval_assignment(&mut self,
                                  left: MemorySlot,
                                  right: MemorySlot,
                                  line: usize)
                                  -> EvalResult<MemorySlot> {
        let MemorySlot::Variable(variable) = &left else {
            return Err(RuntimeError::AssignmentTarget { line });
        };

        let right = match right {
            MemorySlot::Variable(other) => {
                let contents = other.borrow().value();
                match contents {
                    Some(slot) => slot,
                    None => {
                        let name = other.borrow().name();
                        return Err(RuntimeError::VariableHasNoValue { name:
                                                                          self.name_text(name),
                                                                      line });
                    },
                }
            },
            other => other,
        };

        let names = self.symbols.names;
        if let MemorySlot::Value(value) = right {
            let declared = variable.borrow().declared_type();
            let stored = if declared == names.type_var || value.type_symbol(&names) == declared {
                value
            } else {
                match value.coerce(declared, &names) {
                    Some(coerced) => coerced,
                    None => {
                        return Err(RuntimeError::InternalError { details: format!("cannot convert a value to type \"{}\"",
                                                                                  self.symbols.text(declared)),
                                                                 line });
                    },
                }
            };
            variable.borrow_mut().set_value(MemorySlot::Value(stored));
        } else {
            variable.borrow_mut().set_value(right);
        }
        Ok(left)
    }

    /// Reduces an operand slot to its primitive value, reading through a
    /// variable if needed.
    pub(crate) fn operand_value(&self,
                                slot: &MemorySlot,
                                side: &str,
                                line: usize)
                                -> EvalResult<Value> {
        match slot {
            MemorySlot::Value(value) => Ok(*value),
            MemorySlot::Variable(variable) => {
                let contents = variable.borrow().value();
                match contents {
                    Some(MemorySlot::Value(value)) => Ok(value),
                    Some(_) => Err(RuntimeError::NotAValue { details: format!("{side} is not a value"),
                                                             line }),
                    None => {
                        let name = variable.borrow().name();
                        Err(RuntimeError::VariableHasNoValue { name: self.name_text(name),
                                                               line })
                    },
                }
            },
            _ => Err(RuntimeError::NotAValue { details: format!("{side} is not a value"),
                                               line }),
        }
    }
}

/// Applies an arithmetic operator after promoting both operands to the
/// narrowest covering type: float beats int64 beats int beats char beats
/// bool. The result keeps the promoted tag; two bools compute on their
/// underlying integers and re-tag non-zero as `true`.
fn arithmetic(lhs: Value,
              rhs: Value,
              op_float: fn(f64, f64) -> f64,
              op_int64: fn(i64, i64) -> i64,
              op_int: fn(i32, i32) -> i32,
              op_char: fn(i8, i8) -> i8)
              -> Value {
    use Value::{Bool, Char, Float, Int, Int64};
    match (lhs, rhs) {
        (Float(_), _) | (_, Float(_)) => Float(op_float(lhs.as_float(), rhs.as_float())),
        (Int64(_), _) | (_, Int64(_)) => Int64(op_int64(lhs.as_int64(), rhs.as_int64())),
        (Int(_), _) | (_, Int(_)) => Int(op_int(lhs.as_int(), rhs.as_int())),
        (Char(_), _) | (_, Char(_)) => Char(op_char(lhs.as_char(), rhs.as_char())),
        (Bool(_), Bool(_)) => Bool(op_int(lhs.as_int(), rhs.as_int()) != 0),
    }
}

/// Applies a comparison operator after the same promotion as
/// [`arithmetic`]; the result is always a bool.
fn comparison(lhs: Value,
              rhs: Value,
              op_float: fn(f64, f64) -> bool,
              op_int64: fn(i64, i64) -> bool,
              op_int: fn(i32, i32) -> bool,
              op_char: fn(i8, i8) -> bool,
              op_bool: fn(bool, bool) -> bool)
              -> Value {
    use Value::{Bool, Char, Float, Int, Int64};
    let result = match (lhs, rhs) {
        (Float(_), _) | (_, Float(_)) => op_float(lhs.as_float(), rhs.as_float()),
        (Int64(_), _) | (_, Int64(_)) => op_int64(lhs.as_int64(), rhs.as_int64()),
        (Int(_), _) | (_, Int(_)) => op_int(lhs.as_int(), rhs.as_int()),
        (Char(_), _) | (_, Char(_)) => op_char(lhs.as_char(), rhs.as_char()),
        (Bool(a), Bool(b)) => op_bool(a, b),
    };
    Value::Bool(result)
}
