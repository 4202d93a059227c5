/// Core statement-list parsing.
///
/// Contains the top-level entry point, the statement recognizer loop shared
/// by the program and every block, and block delimiter handling.
pub mod core;

/// Expression parsing.
///
/// Implements the precedence-driven (Pratt) expression parser: literals,
/// names, calls, parentheses, and unary and binary operators.
pub mod expression;

/// Statement parsing.
///
/// Implements parsing for declarations, function definitions, control flow,
/// and exit statements.
pub mod statement;
