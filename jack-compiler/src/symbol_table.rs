//! Two-scope (class + subroutine) symbol table.
//!
//! Kinds map to VM segments at emission time: `STATIC -> static`,
//! `FIELD -> this`, `ARG -> argument`, `VAR -> local`. `STATIC`/`FIELD`
//! live in class scope; `ARG`/`VAR` live in subroutine scope, which is
//! reset at every new subroutine declaration.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
}

impl Kind {
    fn is_class_scoped(self) -> bool {
        matches!(self, Self::Static | Self::Field)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    type_name: String,
    kind: Kind,
    index: u16,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, Entry>,
    subroutine_scope: HashMap<String, Entry>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the subroutine scope; the class scope is left untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
    }

    /// Defines `name` with a running index scoped to `kind` within its
    /// scope. Returns `false` without modifying the table if `name` is
    /// already defined in that scope.
    pub fn define(&mut self, name: &str, type_name: &str, kind: Kind) -> bool {
        let scope = if kind.is_class_scoped() {
            &mut self.class_scope
        } else {
            &mut self.subroutine_scope
        };
        if scope.contains_key(name) {
            return false;
        }
        let index = scope.values().filter(|e| e.kind == kind).count();
        scope.insert(
            name.to_string(),
            Entry {
                type_name: type_name.to_string(),
                kind,
                index: u16::try_from(index).expect("scope has far fewer than 65536 symbols"),
            },
        );
        true
    }

    /// Number of entries of `kind` defined in the scope that kind lives in.
    #[must_use]
    pub fn var_count(&self, kind: Kind) -> u16 {
        let scope = if kind.is_class_scoped() {
            &self.class_scope
        } else {
            &self.subroutine_scope
        };
        u16::try_from(scope.values().filter(|e| e.kind == kind).count())
            .expect("scope has far fewer than 65536 symbols")
    }

    fn lookup(&self, name: &str) -> Option<&Entry> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|e| e.kind)
    }

    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|e| e.type_name.as_str())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|e| e.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_counts_only_within_the_same_kind() {
        let mut st = SymbolTable::new();
        st.start_subroutine();
        assert!(st.define("a", "int", Kind::Var));
        assert!(st.define("b", "int", Kind::Var));
        assert!(st.define("c", "boolean", Kind::Var));

        // All three are VARs: indices 0, 1, 2 regardless of differing types.
        assert_eq!(st.index_of("a"), Some(0));
        assert_eq!(st.index_of("b"), Some(1));
        assert_eq!(st.index_of("c"), Some(2));
        assert_eq!(st.var_count(Kind::Var), 3);
    }

    #[test]
    fn redefining_a_name_in_the_same_scope_is_rejected() {
        let mut st = SymbolTable::new();
        st.start_subroutine();
        assert!(st.define("x", "int", Kind::Arg));
        assert!(!st.define("x", "int", Kind::Arg));
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut st = SymbolTable::new();
        st.define("x", "int", Kind::Field);
        st.start_subroutine();
        st.define("x", "boolean", Kind::Var);

        assert_eq!(st.kind_of("x"), Some(Kind::Var));
        assert_eq!(st.type_of("x"), Some("boolean"));
    }

    #[test]
    fn starting_a_new_subroutine_clears_only_subroutine_scope() {
        let mut st = SymbolTable::new();
        st.define("f", "int", Kind::Field);
        st.start_subroutine();
        st.define("a", "int", Kind::Arg);
        st.start_subroutine();

        assert_eq!(st.kind_of("a"), None);
        assert_eq!(st.kind_of("f"), Some(Kind::Field));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let st = SymbolTable::new();
        assert_eq!(st.kind_of("nope"), None);
        assert_eq!(st.type_of("nope"), None);
        assert_eq!(st.index_of("nope"), None);
    }
}
