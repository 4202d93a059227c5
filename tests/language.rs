use std::fs;

use maple::{
    Interpreter,
    interpreter::{
        evaluator::core::Context,
        lexer::{TokenStream, lex},
        parser::core::parse_program,
        value::{core::Value, slot::MemorySlot},
    },
    run_source,
};

fn run(src: &str) -> Interpreter {
    match run_source(src) {
        Ok(interpreter) => interpreter,
        Err(e) => panic!("Script failed: {e}"),
    }
}

fn assert_success(src: &str) {
    run(src);
}

fn assert_failure(src: &str) {
    if run_source(src).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn global(interpreter: &Interpreter, name: &str) -> Value {
    interpreter.global_value(name)
               .unwrap_or_else(|| panic!("global '{name}' holds no value"))
}

#[test]
fn precedence_and_basic_arithmetic() {
    let interpreter = run("int x\nx = 2 + 3 * 4\n");
    assert_eq!(global(&interpreter, "x"), Value::Int(14));

    let interpreter = run("int y\ny = (2 + 3) * 4\n");
    assert_eq!(global(&interpreter, "y"), Value::Int(20));

    let interpreter = run("int z\nz = 2 * 3 + 4 * 5\n");
    assert_eq!(global(&interpreter, "z"), Value::Int(26));

    let interpreter = run("int w\nw = 10 - 3 - 2\n");
    assert_eq!(global(&interpreter, "w"), Value::Int(5));
}

#[test]
fn division_is_always_float() {
    let interpreter = run("int a\nint b\na = 10\nb = 3\nfloat q\nq = a / b\n");
    match global(&interpreter, "q") {
        Value::Float(q) => assert!((q - 10.0 / 3.0).abs() < 1e-12),
        other => panic!("expected a float, got {other:?}"),
    }

    // even when both operands are integers and divide evenly
    let interpreter = run("var v\nv = 10 / 2\n");
    assert_eq!(global(&interpreter, "v"), Value::Float(5.0));
}

#[test]
fn while_loop_accumulates() {
    let interpreter = run("int n\nn = 0\nint i\ni = 0\nwhile i < 5 {\n  n = n + i\n  i = i + 1\n}\n");
    assert_eq!(global(&interpreter, "n"), Value::Int(10));
    assert_eq!(global(&interpreter, "i"), Value::Int(5));
}

#[test]
fn while_false_runs_zero_times() {
    let interpreter = run("int n\nn = 5\nwhile false {\n  n = 1\n}\n");
    assert_eq!(global(&interpreter, "n"), Value::Int(5));
}

#[test]
fn recursive_function_calls() {
    let interpreter = run("fn fib(int n) int {\n  if n < 2 {\n    return n\n  }\n  return fib(n - 1) + fib(n - 2)\n}\nint r\nr = fib(10)\n");
    assert_eq!(global(&interpreter, "r"), Value::Int(55));
}

#[test]
fn int64_literals_do_not_wrap() {
    let interpreter = run("int64 big\nbig = 3000000000l\nbig = big + 1l\n");
    assert_eq!(global(&interpreter, "big"), Value::Int64(3_000_000_001));
}

#[test]
fn logical_operators_and_comparisons() {
    let interpreter = run("bool t\nt = (1 == 1) && !(2 > 3)\n");
    assert_eq!(global(&interpreter, "t"), Value::Bool(true));

    let interpreter = run("bool u\nu = 1 > 2 || 3 >= 3\n");
    assert_eq!(global(&interpreter, "u"), Value::Bool(true));

    let interpreter = run("bool w\nw = 1 != 1\n");
    assert_eq!(global(&interpreter, "w"), Value::Bool(false));
}

#[test]
fn break_is_consumed_by_the_loop() {
    let interpreter = run("fn f() int {\n  int i\n  i = 0\n  while true {\n    if i == 3 { break i }\n    i = i + 1\n  }\n  return 99\n}\nint r\nr = f()\n");
    assert_eq!(global(&interpreter, "r"), Value::Int(99));
}

#[test]
fn continue_skips_to_the_next_iteration() {
    let interpreter = run("int n\nn = 0\nint i\ni = 0\nwhile i < 6 {\n  i = i + 1\n  if i == 2 {\n    continue\n  }\n  n = n + i\n}\n");
    assert_eq!(global(&interpreter, "n"), Value::Int(19));
}

#[test]
fn assignment_chains_right_to_left() {
    let interpreter = run("int a\nint b\nb = 0\na = b = 5\n");
    assert_eq!(global(&interpreter, "a"), Value::Int(5));
    assert_eq!(global(&interpreter, "b"), Value::Int(5));
}

#[test]
fn declaration_with_initializer() {
    let interpreter = run("int x = 5\nbool same\nsame = x == 5\n");
    assert_eq!(global(&interpreter, "x"), Value::Int(5));
    assert_eq!(global(&interpreter, "same"), Value::Bool(true));

    let interpreter = run("const int k = 3\n");
    assert_eq!(global(&interpreter, "k"), Value::Int(3));
}

#[test]
fn identity_laws() {
    let interpreter = run("int x\nint y\ny = 7\nx = y\nbool eq\neq = x == y\n");
    assert_eq!(global(&interpreter, "eq"), Value::Bool(true));

    let interpreter = run("bool b\nb = true\nbool nn\nnn = !!b\n");
    assert_eq!(global(&interpreter, "nn"), Value::Bool(true));

    let interpreter = run("int n\nn = 7\nint m\nm = - - n\n");
    assert_eq!(global(&interpreter, "m"), Value::Int(7));

    let interpreter = run("float f\nf = 2.5\nfloat g\ng = -(-f)\n");
    assert_eq!(global(&interpreter, "g"), Value::Float(2.5));
}

#[test]
fn assignment_coerces_to_the_declared_type() {
    let interpreter = run("float f\nf = 3\n");
    assert_eq!(global(&interpreter, "f"), Value::Float(3.0));

    let interpreter = run("int i\ni = 3.9\n");
    assert_eq!(global(&interpreter, "i"), Value::Int(3));

    let interpreter = run("char c\nc = 65\n");
    assert_eq!(global(&interpreter, "c"), Value::Char(65));

    let interpreter = run("bool b\nb = 2\n");
    assert_eq!(global(&interpreter, "b"), Value::Bool(true));
}

#[test]
fn var_takes_the_type_of_its_contents() {
    let interpreter = run("var v\nv = 2.5\n");
    assert_eq!(global(&interpreter, "v"), Value::Float(2.5));

    let interpreter = run("var v\nv = 1\nv = true\n");
    assert_eq!(global(&interpreter, "v"), Value::Bool(true));

    // a var currently holding a bool is usable as a condition
    assert_success("var flag\nflag = true\nint n\nn = 0\nwhile flag {\n  flag = false\n  n = 1\n}\n");
}

#[test]
fn char_literals_and_promotion() {
    let interpreter = run("char c\nc = 'a'\nint i\ni = c + 1\n");
    assert_eq!(global(&interpreter, "c"), Value::Char(97));
    assert_eq!(global(&interpreter, "i"), Value::Int(98));

    let interpreter = run("char nl\nnl = '\\n'\nbool is_newline\nis_newline = nl == 10\n");
    assert_eq!(global(&interpreter, "nl"), Value::Char(10));
    assert_eq!(global(&interpreter, "is_newline"), Value::Bool(true));
}

#[test]
fn comments_are_skipped() {
    let interpreter =
        run("// leading comment\nint x /* inline */\nx = 1 /* spans\nlines */ + 2\n");
    assert_eq!(global(&interpreter, "x"), Value::Int(3));
}

#[test]
fn if_elseif_else_chains() {
    let src = "int x\nx = 2\nint r\nr = 0\nif x == 1 {\n  r = 10\n} elseif x == 2 {\n  r = 20\n} else {\n  r = 30\n}\n";
    let interpreter = run(src);
    assert_eq!(global(&interpreter, "r"), Value::Int(20));

    let src = "int x\nx = 9\nint r\nr = 0\nif x == 1 {\n  r = 10\n}\nelseif x == 2 {\n  r = 20\n}\nelse {\n  r = 30\n}\n";
    let interpreter = run(src);
    assert_eq!(global(&interpreter, "r"), Value::Int(30));
}

#[test]
fn inner_scopes_see_outer_variables() {
    let interpreter = run("int x\nx = 1\nif true {\n  int y\n  y = x + 1\n  x = y\n}\n");
    assert_eq!(global(&interpreter, "x"), Value::Int(2));

    // block-local variables die with their frame
    assert_success("if true {\n  int t\n  t = 3\n}\nint t\nt = 4\n");
}

#[test]
fn nested_function_definitions() {
    let interpreter = run("fn outer() int {\n  fn inner() int {\n    return 2\n  }\n  return inner() + 1\n}\nint r\nr = outer()\n");
    assert_eq!(global(&interpreter, "r"), Value::Int(3));
}

#[test]
fn parameters_coerce_like_assignments() {
    let interpreter = run("fn half(float x) float {\n  return x / 2\n}\nfloat h\nh = half(5)\n");
    assert_eq!(global(&interpreter, "h"), Value::Float(2.5));
}

#[test]
fn top_level_return_halts_the_program() {
    let mut interpreter = Interpreter::new();
    let result = interpreter.run("int x\nx = 1\nreturn 5\nx = 2\n").unwrap();
    let value = result.and_then(|slot| slot.as_value());
    assert_eq!(value, Some(Value::Int(5)));
    assert_eq!(interpreter.global_value("x"), Some(Value::Int(1)));
}

#[test]
fn scope_depth_is_restored_after_blocks() {
    let src = "int i\ni = 0\nwhile i < 3 {\n  if i > 0 {\n    int t\n    t = i\n  }\n  i = i + 1\n}\n";
    let mut context = Context::new();
    let tokens = lex(src).unwrap();
    let mut stream = TokenStream::new(tokens);
    let program = parse_program(&mut stream, &mut context.symbols).unwrap();
    assert_eq!(context.scopes.depth(), 1);
    context.run(&program).unwrap();
    assert_eq!(context.scopes.depth(), 1);
}

#[test]
fn symbols_intern_to_stable_handles() {
    use maple::interpreter::symbol::{NIL_SYMBOL, SymbolTable};

    let mut symbols = SymbolTable::new();
    let a = symbols.intern("alpha");
    let b = symbols.intern("beta");
    let a2 = symbols.intern("alpha");
    assert_eq!(a, a2);
    assert_ne!(a, b);
    assert_eq!(symbols.text(a), "alpha");
    assert_eq!(symbols.intern(""), NIL_SYMBOL);
}

#[test]
fn integer_literal_boundaries() {
    let interpreter = run("int big\nbig = 2147483647\n");
    assert_eq!(global(&interpreter, "big"), Value::Int(i32::MAX));

    assert_failure("int big\nbig = 2147483648\n");
    assert_success("int64 big\nbig = 2147483648l\n");
}

#[test]
fn malformed_literals_are_lex_errors() {
    assert_failure("float bad\nbad = 1.2.3\n");
    assert_failure("float bad\nbad = 1.5l\n");
    assert_failure("char c\nc = 'ab'\n");
    assert_failure("char c\nc = '\\q'\n");
    assert_failure("var s = \"unterminated\n");
    assert_failure("/* never closed\nint x\n");
}

#[test]
fn every_newline_flavor_counts_one_line() {
    for terminator in ["\n", "\r", "\r\n", "\n\r"] {
        let src = format!("int a{terminator}int a{terminator}");
        let err = match run_source(&src) {
            Err(err) => err,
            Ok(_) => panic!("duplicate declaration must fail"),
        };
        assert!(err.to_string().contains("line 2"), "got: {err}");
    }
}

#[test]
fn scope_errors() {
    assert_failure("int x\nint x\n");
    assert_failure("x = 1\n");
    assert_failure("int x\nx = nope(1)\n");
    assert_failure("int f\nfn f() void {\n}\n");
    assert_failure("fn g() void {\n}\nint g\n");
    assert_failure("int x\nx = 1\nint y\ny = x()\n");
}

#[test]
fn type_errors() {
    assert_failure("if 1 {\n}\n");
    assert_failure("while 1 {\n}\n");
    assert_failure("fn f() int {\n  int i\n}\nint r\nr = f()\n");
    assert_failure("fn f() float {\n  return 1\n}\nfloat q\nq = f()\n");
    assert_failure("fn f() void {\n  return 1\n}\nf()\n");
    assert_failure("fn f() void {\n}\nint x\nx = f()\n");
    assert_failure("fn add(int a, int b) int {\n  return a + b\n}\nint r\nr = add(1)\n");
    assert_failure("int x\nx = 1\nx + 1 = 2\n");
}

#[test]
fn control_errors() {
    assert_failure("fn f() void {\n  break\n}\nf()\n");
    assert_failure("fn f() void {\n  continue\n}\nf()\n");
}

#[test]
fn parse_errors() {
    assert_failure("while true {\n  continue 5\n}\n");
    assert_failure("int x x = 1\n");
    assert_failure("}\n");
    assert_failure("if true {\n");
    assert_failure("int x\nx = (1 + 2\n");
    assert_failure("fn f() {\n}\n");
    assert_failure("int int x\n");
    assert_failure("for i\n");
    assert_failure("\"just a string\"\n");
    assert_failure("5 = 3\n");
    assert_failure("int x\nx = 1 & 2\n");
}

#[test]
fn stock_builtins() {
    let interpreter = run("float c\nc = cos(0.0)\n");
    assert_eq!(global(&interpreter, "c"), Value::Float(1.0));

    let interpreter = run("int64 t\nt = micro()\n");
    assert!(matches!(global(&interpreter, "t"), Value::Int64(t) if t > 0));

    assert_success("print(42)\nprint(2.5)\nprint(true)\n");

    // cos takes a float, not an int
    assert_failure("float c\nc = cos(0)\n");
}

fn double_fn(args: &[MemorySlot]) -> Result<Option<MemorySlot>, String> {
    match args {
        [MemorySlot::Value(Value::Int(n))] => Ok(Some(MemorySlot::Value(Value::Int(n * 2)))),
        _ => Err("expected one int".to_string()),
    }
}

#[test]
fn host_registered_builtins() {
    let mut interpreter = Interpreter::new();
    interpreter.register_builtin("double", "int", double_fn, &["int"])
               .unwrap();
    interpreter.run("int x\nx = double(21)\n").unwrap();
    assert_eq!(interpreter.global_value("x"), Some(Value::Int(42)));

    let mut interpreter = Interpreter::new();
    interpreter.register_builtin("double", "int", double_fn, &["int"])
               .unwrap();
    assert!(interpreter.run("int y\ny = double(1, 2)\n").is_err());

    let mut interpreter = Interpreter::new();
    interpreter.register_builtin("double", "int", double_fn, &["int"])
               .unwrap();
    assert!(interpreter.run("int y\ny = double(1.5)\n").is_err());
}

#[test]
fn string_literals_are_placeholders() {
    let interpreter = run("var s = \"hi\\n\"\n");
    assert!(interpreter.lookup_variable("s").is_some());
    assert_eq!(interpreter.global_value("s"), None);
}

#[test]
fn example_script_works() {
    let script = fs::read_to_string("tests/example.mpl").expect("missing file");
    let interpreter = run(&script);
    assert_eq!(global(&interpreter, "f"), Value::Int(720));
    assert_eq!(global(&interpreter, "big"), Value::Int64(4_000_000_001));
    assert_eq!(global(&interpreter, "ratio"), Value::Float(72.0));
    assert_eq!(global(&interpreter, "steps"), Value::Int(6));
    assert_eq!(global(&interpreter, "done"), Value::Bool(true));
}
