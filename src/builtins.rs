use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::Context,
        value::{core::Value, slot::MemorySlot},
    },
};

/// `cos(float) -> float`: the cosine of the argument.
///
/// # Errors
/// Reports a failure when the argument slot is not a basic value.
pub fn cos(args: &[MemorySlot]) -> Result<Option<MemorySlot>, String> {
    let value = unpack_value(args, 0, "cos")?;
    Ok(Some(MemorySlot::Value(Value::Float(value.as_float().cos()))))
}

/// `micro() -> int64`: microseconds since the Unix epoch.
///
/// # Errors
/// Reports a failure when the system clock is set before the epoch.
#[allow(clippy::cast_possible_truncation)]
pub fn micro(_args: &[MemorySlot]) -> Result<Option<MemorySlot>, String> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH)
                                   .map_err(|error| error.to_string())?;
    Ok(Some(MemorySlot::Value(Value::Int64(elapsed.as_micros() as i64))))
}

/// `print(var) -> void`: writes the argument's value and a newline to
/// standard output.
///
/// # Errors
/// Reports a failure when the argument slot is not a basic value.
pub fn print(args: &[MemorySlot]) -> Result<Option<MemorySlot>, String> {
    let value = unpack_value(args, 0, "print")?;
    println!("{value}");
    Ok(None)
}

/// Registers the stock host functions in the context's global frame.
///
/// # Errors
/// `DuplicateDeclaration` when one of the names is already bound, which can
/// only happen if the host registered its own function under a stock name
/// first.
pub fn install(context: &mut Context) -> Result<(), RuntimeError> {
    context.register_builtin("cos", "float", cos, &["float"])?;
    context.register_builtin("micro", "int64", micro, &[])?;
    context.register_builtin("print", "void", print, &["var"])?;
    Ok(())
}

fn unpack_value(args: &[MemorySlot], index: usize, name: &str) -> Result<Value, String> {
    match args.get(index) {
        Some(MemorySlot::Value(value)) => Ok(*value),
        _ => Err(format!("argument {} of '{name}' must be a basic value", index + 1)),
    }
}
