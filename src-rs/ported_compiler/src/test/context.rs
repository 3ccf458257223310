use std::collections::HashSet;

use ported_expr::Symbol;

use crate::CompileContext;

pub struct TestContext {
    time_symbol: Symbol,
    system_parameters: HashSet<String>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            time_symbol: Symbol::new("T"),
            system_parameters: HashSet::new(),
        }
    }

    pub fn with_time_symbol(mut self, time_symbol: &str) -> Self {
        self.time_symbol = Symbol::new(time_symbol);
        self
    }

    pub fn with_system_parameters<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.system_parameters
            .extend(names.into_iter().map(ToString::to_string));
        self
    }
}

impl CompileContext for TestContext {
    fn time_symbol(&self) -> &Symbol {
        &self.time_symbol
    }

    fn has_system_parameter(&self, name: &str) -> bool {
        self.system_parameters.contains(name)
    }
}
