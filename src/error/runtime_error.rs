#[derive(Debug)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called an unknown function.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Declared a name that is already bound in the same frame, whether as
    /// a variable or as a function.
    DuplicateDeclaration {
        /// The name being redeclared.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Read a variable that has not been assigned yet.
    VariableHasNoValue {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operator received a void operand.
    VoidOperand {
        /// The operator's spelling.
        op:   String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operator operand that is not a value.
    NotAValue {
        /// Which operand was at fault.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The left side of `=` is not a variable.
    AssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An `if` or `while` condition that is not a `bool`.
    ExpectedBoolean {
        /// The construct whose condition failed (`if` or `while`).
        construct: String,
        /// The type name that was found instead.
        found:     String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// The wrong number of arguments was supplied to a function.
    ArgumentCountMismatch {
        /// The name of the function.
        name:     String,
        /// How many parameters the function declares.
        expected: usize,
        /// How many arguments the call supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A builtin argument whose type does not match the declared parameter
    /// type.
    ArgumentTypeMismatch {
        /// The name of the function.
        name:     String,
        /// The 1-based argument position.
        index:    usize,
        /// The declared parameter type name.
        expected: String,
        /// The type name that was supplied.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A void expression used as a call argument.
    VoidArgument {
        /// The name of the function being called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function produced a value whose type does not match its declared
    /// return type.
    ReturnTypeMismatch {
        /// The name of the function.
        name:     String,
        /// The declared return type name.
        expected: String,
        /// The type name that was produced.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A non-void function finished without executing a `return`.
    MissingReturn {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `break` or `continue` tried to escape a function body.
    InvalidExitType {
        /// The name of the function.
        name: String,
        /// The escaping transfer (`break` or `continue`).
        kind: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function-kind binding that does not hold a callable.
    NotCallable {
        /// The name that was called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A host builtin reported a failure.
    BuiltinCallFailed {
        /// The name of the builtin.
        name:    String,
        /// The host's failure message.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A state the interpreter should never reach.
    InternalError {
        /// Details about the impossible state.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => {
                write!(f, "Error on line {line}: Unknown variable '{name}'.")
            },
            Self::UnknownFunction { name, line } => {
                write!(f, "Error on line {line}: Unknown function '{name}'.")
            },
            Self::DuplicateDeclaration { name, line } => write!(f,
                                                                "Error on line {line}: '{name}' is already declared in the current scope."),

            Self::VariableHasNoValue { name, line } => {
                write!(f, "Error on line {line}: Variable '{name}' has no value.")
            },
            Self::VoidOperand { op, line } => write!(f,
                                                     "Error on line {line}: Using a void return value as an operand of operator \"{op}\"."),

            Self::NotAValue { details, line } => write!(f,
                                                        "Error on line {line}: Cannot call operators on non-value types: {details}."),

            Self::AssignmentTarget { line } => write!(f,
                                                      "Error on line {line}: Assignment operator must be called on a variable."),

            Self::ExpectedBoolean { construct,
                                    found,
                                    line, } => write!(f,
                                                      "Error on line {line}: Invalid type in {construct} condition: expected \"bool\" but got \"{found}\"."),

            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          line, } => write!(f,
                                                            "Error on line {line}: Invalid number of arguments in call to '{name}': expected {expected}, got {found}."),

            Self::ArgumentTypeMismatch { name,
                                         index,
                                         expected,
                                         found,
                                         line, } => write!(f,
                                                           "Error on line {line}: Argument {index} of '{name}' must be of type \"{expected}\", got \"{found}\"."),

            Self::VoidArgument { name, line } => write!(f,
                                                        "Error on line {line}: Using a void return value as an argument to '{name}'."),

            Self::ReturnTypeMismatch { name,
                                       expected,
                                       found,
                                       line, } => write!(f,
                                                         "Error on line {line}: Invalid return type in function '{name}': expected \"{expected}\", got \"{found}\"."),

            Self::MissingReturn { name, line } => {
                write!(f, "Error on line {line}: Missing return statement in function '{name}'.")
            },
            Self::InvalidExitType { name, kind, line } => write!(f,
                                                                 "Error on line {line}: Invalid exit type '{kind}' in function '{name}': only 'return' may leave a function."),

            Self::NotCallable { name, line } => {
                write!(f, "Error on line {line}: '{name}' is not callable.")
            },
            Self::BuiltinCallFailed { name, details, line } => {
                write!(f, "Error on line {line}: Call to '{name}' failed: {details}.")
            },
            Self::InternalError { details, line } => write!(f,
                                                            "Error on line {line}: {details}. This is an internal interpreter error."),
        }
    }
}

impl std::error::Error for RuntimeError {}
