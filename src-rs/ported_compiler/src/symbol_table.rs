use indexmap::IndexSet;
use ported_expr::Symbol;

use crate::{CompileError, util::Scope};

/// The symbols defined by one compiled object.
#[derive(Debug)]
pub struct SymbolTable<'a> {
    scope: &'a Scope,
    defined: IndexSet<Symbol>,
}

impl<'a> SymbolTable<'a> {
    pub fn new(scope: &'a Scope) -> Self {
        Self {
            scope,
            defined: IndexSet::new(),
        }
    }

    /// Records a definition of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NameCollision`] if the symbol is already defined.
    pub fn define(&mut self, symbol: Symbol) -> Result<(), CompileError> {
        if self.defined.contains(&symbol) {
            return Err(CompileError::name_collision(symbol, self.scope.to_string()));
        }

        self.defined.insert(symbol);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::helper::name;

    #[test]
    fn second_definition_collides() {
        let scope = Scope::root(&name("model"));
        let mut table = SymbolTable::new(&scope);

        table.define(Symbol::new("f.x")).expect("first definition should succeed");
        table.define(Symbol::new("g.x")).expect("other symbol should succeed");

        assert_eq!(
            table.define(Symbol::new("f.x")),
            Err(CompileError::name_collision(
                Symbol::new("f.x"),
                "model".to_string()
            ))
        );
    }
}
