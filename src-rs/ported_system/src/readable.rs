//! Short display names for the symbols of a compiled system.

use indexmap::IndexMap;
use ported_expr::{Expression, Symbol};
use ported_shared::HIERARCHY_SEPARATOR;

/// How qualified symbols are shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadableStyle {
    /// Replaces the hierarchy separator by an underscore, so `f.x` becomes
    /// `f_x`.
    Hashed,
    /// Numbers variables as `x_0`, `x_1`, ... and parameters as `a_0`,
    /// `a_1`, ...
    #[default]
    Indexed,
}

/// Maps from system symbols to their display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadableSymbols {
    variables: IndexMap<Symbol, Symbol>,
    parameters: IndexMap<Symbol, Symbol>,
}

impl ReadableSymbols {
    /// Returns the display names of the variables, including time.
    #[must_use]
    pub const fn variables(&self) -> &IndexMap<Symbol, Symbol> {
        &self.variables
    }

    /// Returns the display names of the parameters.
    #[must_use]
    pub const fn parameters(&self) -> &IndexMap<Symbol, Symbol> {
        &self.parameters
    }

    /// Returns the display name of a symbol, if it has one.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&Symbol> {
        self.variables
            .get(symbol)
            .or_else(|| self.parameters.get(symbol))
    }

    /// Rewrites an expression using the display names.
    #[must_use]
    pub fn apply<E: Expression>(&self, expr: &E) -> E {
        let renames = self
            .variables
            .iter()
            .chain(&self.parameters)
            .filter(|(symbol, readable)| symbol != readable)
            .map(|(symbol, readable)| (symbol.clone(), readable.clone()))
            .collect();
        expr.rename_symbols(&renames)
    }
}

pub fn readable_symbols<'a>(
    time: &Symbol,
    variables: impl IntoIterator<Item = &'a Symbol>,
    parameters: impl IntoIterator<Item = &'a Symbol>,
    keep_surface: bool,
    style: ReadableStyle,
) -> ReadableSymbols {
    let mut variables = shorten(variables, keep_surface, style, "x");
    variables.insert(time.clone(), Symbol::new("t"));

    ReadableSymbols {
        variables,
        parameters: shorten(parameters, keep_surface, style, "a"),
    }
}

fn shorten<'a>(
    symbols: impl IntoIterator<Item = &'a Symbol>,
    keep_surface: bool,
    style: ReadableStyle,
    prefix: &str,
) -> IndexMap<Symbol, Symbol> {
    let mut index = 0;
    symbols
        .into_iter()
        .map(|symbol| {
            let readable = if keep_surface && !symbol.is_qualified() {
                symbol.clone()
            } else {
                match style {
                    ReadableStyle::Hashed => {
                        Symbol::new(symbol.as_str().replace(HIERARCHY_SEPARATOR, "_"))
                    }
                    ReadableStyle::Indexed => {
                        let readable = Symbol::new(format!("{prefix}_{index}"));
                        index += 1;
                        readable
                    }
                }
            };
            (symbol.clone(), readable)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ported_expr::Expr;

    use super::*;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(Symbol::new).collect()
    }

    #[test]
    fn indexed_symbols_keep_surface_names() {
        let variables = symbols(&["x", "f.y", "g.y"]);
        let parameters = symbols(&["f.r", "k"]);

        let readable = readable_symbols(
            &Symbol::new("T"),
            &variables,
            &parameters,
            true,
            ReadableStyle::Indexed,
        );

        assert_eq!(
            readable.variables().values().map(Symbol::as_str).collect::<Vec<_>>(),
            vec!["x", "x_0", "x_1", "t"]
        );
        assert_eq!(
            readable.parameters().values().map(Symbol::as_str).collect::<Vec<_>>(),
            vec!["a_0", "k"]
        );
    }

    #[test]
    fn hashed_symbols_replace_the_separator() {
        let variables = symbols(&["x", "f.g.y"]);

        let readable = readable_symbols(
            &Symbol::new("T"),
            &variables,
            &[],
            false,
            ReadableStyle::Hashed,
        );

        assert_eq!(readable.get(&Symbol::new("x")), Some(&Symbol::new("x")));
        assert_eq!(readable.get(&Symbol::new("f.g.y")), Some(&Symbol::new("f_g_y")));
        assert_eq!(readable.get(&Symbol::new("T")), Some(&Symbol::new("t")));
    }

    #[test]
    fn apply_renames_expressions() {
        let variables = symbols(&["f.y"]);
        let parameters = symbols(&["f.r"]);
        let readable = readable_symbols(
            &Symbol::new("T"),
            &variables,
            &parameters,
            true,
            ReadableStyle::Indexed,
        );

        let expr = Expr::var("f.r") * Expr::var("f.y") + Expr::var("T");

        assert_eq!(
            readable.apply(&expr),
            Expr::var("a_0") * Expr::var("x_0") + Expr::var("t")
        );
    }
}
