use std::collections::HashMap;

/// An interned identifier handle.
///
/// A `Symbol` stands for a piece of identifier text (a variable name, a type
/// name, a scope name). Two symbols compare equal if and only if they were
/// interned from identical byte sequences, so equality and hashing are O(1)
/// integer operations instead of string comparisons.
///
/// Handles stay valid for as long as the [`SymbolTable`] that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

/// The distinguished handle for the empty string.
pub const NIL_SYMBOL: Symbol = Symbol(0);

/// Pre-interned symbols for the names the interpreter itself needs.
///
/// The type names are compared against on every assignment and every call,
/// and the frame names are pushed on every block entry, so they are interned
/// once at table construction and carried around by value.
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    /// The empty string.
    pub nil:            Symbol,
    /// `float`
    pub type_float:     Symbol,
    /// `int`
    pub type_int:       Symbol,
    /// `int64`
    pub type_int64:     Symbol,
    /// `char`
    pub type_char:      Symbol,
    /// `bool`
    pub type_bool:      Symbol,
    /// `var`
    pub type_var:       Symbol,
    /// `void`
    pub type_void:      Symbol,
    /// `undefined`
    pub type_undefined: Symbol,
    /// The root frame name, `$_globalScope`.
    pub scope_global:   Symbol,
    /// The frame name used for every taken `if` branch.
    pub scope_if:       Symbol,
    /// The frame name used for every `while` body iteration.
    pub scope_while:    Symbol,
}

/// Maps identifier text to stable integer handles.
///
/// The table owns every string ever interned. Text is stored in a vector
/// indexed by handle, so growing the table never invalidates handles that
/// were given out earlier.
///
/// # Example
/// ```
/// use maple::interpreter::symbol::SymbolTable;
///
/// let mut symbols = SymbolTable::new();
/// let a = symbols.intern("velocity");
/// let b = symbols.intern("velocity");
/// let c = symbols.intern("mass");
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(symbols.text(a), "velocity");
/// ```
#[derive(Debug)]
pub struct SymbolTable {
    map:   HashMap<String, Symbol>,
    texts: Vec<String>,
    /// Symbols the interpreter compares against constantly.
    pub names: WellKnown,
}

#[allow(clippy::new_without_default)]
impl SymbolTable {
    /// Creates a table with the empty string interned as [`NIL_SYMBOL`] and
    /// every well-known name pre-interned.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self { map:   HashMap::new(),
                               texts: Vec::new(),
                               names: WellKnown { nil:            NIL_SYMBOL,
                                                  type_float:     NIL_SYMBOL,
                                                  type_int:       NIL_SYMBOL,
                                                  type_int64:     NIL_SYMBOL,
                                                  type_char:      NIL_SYMBOL,
                                                  type_bool:      NIL_SYMBOL,
                                                  type_var:       NIL_SYMBOL,
                                                  type_void:      NIL_SYMBOL,
                                                  type_undefined: NIL_SYMBOL,
                                                  scope_global:   NIL_SYMBOL,
                                                  scope_if:       NIL_SYMBOL,
                                                  scope_while:    NIL_SYMBOL, }, };
        table.intern("");
        table.names = WellKnown { nil:            NIL_SYMBOL,
                                  type_float:     table.intern("float"),
                                  type_int:       table.intern("int"),
                                  type_int64:     table.intern("int64"),
                                  type_char:      table.intern("char"),
                                  type_bool:      table.intern("bool"),
                                  type_var:       table.intern("var"),
                                  type_void:      table.intern("void"),
                                  type_undefined: table.intern("undefined"),
                                  scope_global:   table.intern("$_globalScope"),
                                  scope_if:       table.intern("if"),
                                  scope_while:    table.intern("while"), };
        table
    }

    /// Interns `text`, returning the existing handle if the string has been
    /// seen before and a fresh one otherwise.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(symbol) = self.map.get(text) {
            return *symbol;
        }
        let symbol = Symbol(u32::try_from(self.texts.len()).expect("symbol table overflow"));
        self.texts.push(text.to_string());
        self.map.insert(text.to_string(), symbol);
        symbol
    }

    /// Looks up the handle for `text` without interning it.
    ///
    /// Used by hosts inspecting globals after execution: if the name was
    /// never interned, no variable can be bound to it.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.map.get(text).copied()
    }

    /// Returns the text a handle was interned from.
    ///
    /// # Example
    /// ```
    /// use maple::interpreter::symbol::SymbolTable;
    ///
    /// let mut symbols = SymbolTable::new();
    /// let sym = symbols.intern("fib");
    /// assert_eq!(symbols.text(sym), "fib");
    /// ```
    #[must_use]
    pub fn text(&self, symbol: Symbol) -> &str {
        &self.texts[symbol.0 as usize]
    }
}
