use crate::{
    ast::{Node, Op},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, slot::MemorySlot},
    },
};

impl Context {
    /// Evaluates a prefix operation.
    ///
    /// `!` reduces the operand to bool and negates it. `-` keeps the
    /// operand's tag, with one exception: a negated bool becomes an int,
    /// since `-true` has no bool reading.
    pub(crate) fn eval_unary(&mut self,
                             op: Op,
                             operand: &Node,
                             line: usize)
                             -> EvalResult<Option<MemorySlot>> {
        let slot = self.eval(operand)?.ok_or_else(|| RuntimeError::VoidOperand { op: op.text().to_string(),
                                                                                 line })?;
        let value = self.operand_value(&slot, "the operand", line)?;
        let result = match op {
            Op::Not => Value::Bool(!value.as_bool()),
            Op::Sub => match value {
                Value::Float(f) => Value::Float(-f),
                Value::Int(i) => Value::Int(i.wrapping_neg()),
                Value::Int64(i) => Value::Int64(i.wrapping_neg()),
                Value::Char(c) => Value::Char(c.wrapping_neg()),
                Value::Bool(b) => Value::Int(-i32::from(b)),
            },
            _ => {
                return Err(RuntimeError::InternalError { details: format!("unary operator \"{op}\" has undefined behavior"),
                                                         line });
            },
        };
        Ok(Some(MemorySlot::Value(result)))
    }
}
