//! The expression capability required by the compiler.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::Symbol;

/// The operations the compiler needs from an expression algebra.
///
/// The compiler never inspects the structure of an expression. It only asks
/// which symbols occur free in it and replaces symbols by other expressions,
/// so any algebra that provides these operations can back a model.
pub trait Expression: Clone + PartialEq + fmt::Debug + fmt::Display {
    /// Creates an expression consisting of a single symbol.
    fn symbol(symbol: Symbol) -> Self;

    /// Creates a constant expression.
    fn constant(value: f64) -> Self;

    /// Creates the sum of the given terms.
    ///
    /// An empty list of terms produces the constant zero.
    fn sum(terms: Vec<Self>) -> Self;

    /// Returns the symbols occurring free in the expression, in order of
    /// first occurrence.
    fn free_symbols(&self) -> IndexSet<Symbol>;

    /// Replaces every occurrence of each key symbol by its expression.
    ///
    /// The substitution is simultaneous: replacement expressions are not
    /// themselves searched for further substitutions.
    #[must_use]
    fn substitute_all(&self, substitutions: &IndexMap<Symbol, Self>) -> Self;

    /// Replaces every occurrence of `symbol` by `replacement`.
    #[must_use]
    fn substitute(&self, symbol: &Symbol, replacement: &Self) -> Self {
        let mut substitutions = IndexMap::new();
        substitutions.insert(symbol.clone(), replacement.clone());
        self.substitute_all(&substitutions)
    }

    /// Renames symbols according to `renames`.
    #[must_use]
    fn rename_symbols(&self, renames: &IndexMap<Symbol, Symbol>) -> Self {
        let substitutions = renames
            .iter()
            .map(|(from, to)| (from.clone(), Self::symbol(to.clone())))
            .collect();
        self.substitute_all(&substitutions)
    }

    /// Returns the names of the functions called in the expression.
    ///
    /// Algebras without function calls can rely on the default, which
    /// reports none.
    fn called_functions(&self) -> IndexSet<String> {
        IndexSet::new()
    }
}
