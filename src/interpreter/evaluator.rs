/// Core evaluation logic and the evaluation context.
///
/// Contains the `Context` state, the node dispatch, and the statement-list
/// drivers that thread the exit protocol through every block.
pub mod core;

/// Binary operator evaluation.
///
/// Implements assignment and the promotion-driven arithmetic, comparison,
/// and logical operators.
pub mod binary;

/// Unary operator evaluation.
///
/// Handles the prefix operators `!` and `-`.
pub mod unary;

/// Control-flow evaluation.
///
/// Evaluates if-chains and while loops, including break/continue
/// consumption at the loop level.
pub mod flow;

/// Function evaluation.
///
/// Implements user-defined function calls, builtin calls, and the builtin
/// registration surface.
pub mod function;
