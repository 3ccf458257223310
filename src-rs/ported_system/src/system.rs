use indexmap::{IndexMap, IndexSet};
use ported_compiler::{CompileContext, CompileError};
use ported_expr::{EvalContext, Evaluate, Expr, Expression, FunctionMap, Symbol};
use ported_ir::{CompiledObject, CompiledParts, Name};
use ported_shared::{HIERARCHY_SEPARATOR, stack::Stack};
use tracing::{debug, info, trace};

use crate::{
    Parameter, ParameterKind, SystemContext, SystemError,
    readable::{self, ReadableStyle, ReadableSymbols},
};

/// A compiled model ready for simulation.
///
/// Holds the differential equations of every variable and the value of every
/// parameter, with system parameters substituted. Initial values and
/// parameter overrides are addressed by readable paths through the lookup
/// table of the compiled model.
#[derive(Debug, Clone)]
pub struct CompiledSystem<E = Expr> {
    name: Name,
    time: Symbol,
    variables: IndexMap<Symbol, E>,
    initial_values: IndexMap<Symbol, f64>,
    parameters: IndexMap<Symbol, Parameter<E>>,
    system_parameters: IndexMap<Symbol, E>,
    lookup: IndexMap<String, Symbol>,
    functions: FunctionMap,
}

/// Turns a compiled object into a system using the globals of `context`.
pub fn build<E: Expression>(
    context: &SystemContext<E>,
    compiled: CompiledObject<E>,
) -> Result<CompiledSystem<E>, SystemError> {
    let CompiledParts {
        name,
        input_ports,
        output_ports,
        variable_ports,
        internal_parameters,
        default_parameters,
        internal_variables,
        mut lookup,
    } = compiled.into_parts();

    let time = context.time_symbol().clone();
    let system_parameters = context.system_parameters();
    let substitute = |expr: &E| {
        if system_parameters.is_empty() {
            expr.clone()
        } else {
            expr.substitute_all(system_parameters)
        }
    };

    let variables: IndexMap<Symbol, E> = variable_ports
        .iter()
        .map(|(port, rhs)| (port.to_symbol(), substitute(rhs)))
        .chain(
            internal_variables
                .iter()
                .map(|(symbol, rhs)| (symbol.clone(), substitute(rhs))),
        )
        .collect();

    let mut parameters = IndexMap::new();
    for (port, expr) in &output_ports {
        parameters.insert(
            port.to_symbol(),
            Parameter::assigned(ParameterKind::Functional, substitute(expr)),
        );
    }
    for (symbol, expr) in &internal_parameters {
        let kind = if default_parameters.contains(symbol) {
            ParameterKind::Default
        } else {
            ParameterKind::Functional
        };
        parameters.insert(symbol.clone(), Parameter::assigned(kind, substitute(expr)));
    }

    if let Some(symbol) = variables
        .keys()
        .chain(parameters.keys())
        .find(|symbol| **symbol == time || system_parameters.contains_key(*symbol))
    {
        return Err(CompileError::name_collision(symbol.clone(), name.to_string()).into());
    }

    for (port, default) in &input_ports {
        if context.global_symbol(port.as_str()).is_some() {
            continue;
        }

        let parameter = match default {
            Some(default) => Parameter::assigned(ParameterKind::Default, substitute(default)),
            None => Parameter::required(),
        };
        parameters.insert(port.to_symbol(), parameter);
    }

    let functions = context.functions();
    check_functions(
        variables
            .values()
            .chain(parameters.values().filter_map(Parameter::value)),
        &functions,
    )?;

    for symbol in undefined_symbols(&time, &variables, &parameters) {
        trace!(parameter = %symbol, "left unresolved symbol as a required parameter");
        parameters.insert(symbol, Parameter::required());
    }

    lookup.insert(time.to_string(), time.clone());

    info!(
        system = %name,
        variables = variables.len(),
        parameters = parameters.len(),
        required = parameters.values().filter(|parameter| parameter.is_required()).count(),
        "compiled system"
    );

    Ok(CompiledSystem {
        name,
        time,
        variables,
        initial_values: IndexMap::new(),
        parameters,
        system_parameters: system_parameters.clone(),
        lookup,
        functions,
    })
}

fn check_functions<'a, E: Expression + 'a>(
    expressions: impl IntoIterator<Item = &'a E>,
    functions: &FunctionMap,
) -> Result<(), SystemError> {
    for expr in expressions {
        if let Some(name) = expr
            .called_functions()
            .into_iter()
            .find(|name| !functions.contains_key(name))
        {
            return Err(SystemError::unknown_function(name));
        }
    }

    Ok(())
}

/// Returns the symbols used by the system that are neither time, a variable
/// nor a parameter.
fn undefined_symbols<E: Expression>(
    time: &Symbol,
    variables: &IndexMap<Symbol, E>,
    parameters: &IndexMap<Symbol, Parameter<E>>,
) -> IndexSet<Symbol> {
    variables
        .values()
        .chain(parameters.values().filter_map(Parameter::value))
        .flat_map(Expression::free_symbols)
        .filter(|symbol| {
            symbol != time && !variables.contains_key(symbol) && !parameters.contains_key(symbol)
        })
        .collect()
}

impl<E: Expression> CompiledSystem<E> {
    /// Returns the name of the compiled model.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the time symbol.
    #[must_use]
    pub const fn time_symbol(&self) -> &Symbol {
        &self.time
    }

    /// Returns the right-hand side of every variable.
    #[must_use]
    pub const fn variables(&self) -> &IndexMap<Symbol, E> {
        &self.variables
    }

    /// Returns every parameter.
    #[must_use]
    pub const fn parameters(&self) -> &IndexMap<Symbol, Parameter<E>> {
        &self.parameters
    }

    /// Returns the initial values that have been set.
    #[must_use]
    pub const fn initial_values(&self) -> &IndexMap<Symbol, f64> {
        &self.initial_values
    }

    /// Returns the lookup table from readable paths to symbols.
    #[must_use]
    pub const fn lookup(&self) -> &IndexMap<String, Symbol> {
        &self.lookup
    }

    /// Returns the functions available to the expressions.
    #[must_use]
    pub const fn functions(&self) -> &FunctionMap {
        &self.functions
    }

    /// Returns the symbol for a readable path such as `model.f_drag.mu`.
    ///
    /// The path may omit the name of the top-level object.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::UnknownPath`] if no symbol is known for the path.
    pub fn symbol_for(&self, path: &str) -> Result<&Symbol, SystemError> {
        let relative = path
            .strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix(HIERARCHY_SEPARATOR));

        self.lookup
            .get(path)
            .or_else(|| relative.and_then(|relative| self.lookup.get(relative)))
            .ok_or_else(|| SystemError::unknown_path(path.to_string()))
    }

    /// Sets the value of a default, required or previously overridden
    /// parameter.
    ///
    /// The value may refer to time and to system parameters only.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is unknown or not a parameter, the
    /// parameter is defined by the model, or the value refers to a forbidden
    /// symbol.
    pub fn set_parameter(&mut self, path: &str, value: impl Into<E>) -> Result<(), SystemError> {
        let symbol = self.symbol_for(path)?.clone();
        let kind = match self.parameters.get(&symbol) {
            Some(parameter) => parameter.kind(),
            None => return Err(SystemError::not_a_parameter(path.to_string())),
        };
        if !kind.is_settable() {
            return Err(SystemError::fixed_parameter(path.to_string(), kind));
        }

        let value = value.into();
        if let Some(symbol) = value
            .free_symbols()
            .into_iter()
            .find(|symbol| *symbol != self.time && !self.system_parameters.contains_key(symbol))
        {
            return Err(SystemError::invalid_parameter_value(path.to_string(), symbol));
        }
        check_functions([&value], &self.functions)?;

        let value = value.substitute_all(&self.system_parameters);
        debug!(parameter = %symbol, value = %value, "set parameter");
        if let Some(parameter) = self.parameters.get_mut(&symbol) {
            parameter.set(value);
        }

        Ok(())
    }

    /// Sets the initial value of a variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is unknown or not a variable.
    pub fn set_initial_value(&mut self, path: &str, value: f64) -> Result<(), SystemError> {
        let symbol = self.symbol_for(path)?.clone();
        if !self.variables.contains_key(&symbol) {
            return Err(SystemError::not_a_variable(path.to_string()));
        }

        debug!(variable = %symbol, value, "set initial value");
        self.initial_values.insert(symbol, value);

        Ok(())
    }

    /// Returns the parameters that still need a value.
    pub fn required_parameters(&self) -> impl Iterator<Item = &Symbol> {
        self.parameters
            .iter()
            .filter(|(_, parameter)| parameter.is_required())
            .map(|(symbol, _)| symbol)
    }

    /// Returns the variables without an initial value.
    pub fn missing_initial_values(&self) -> impl Iterator<Item = &Symbol> {
        self.variables
            .keys()
            .filter(|symbol| !self.initial_values.contains_key(*symbol))
    }

    /// Checks that every parameter has a value and every variable has an
    /// initial value.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::Incomplete`] listing what is missing.
    pub fn ensure_complete(&self) -> Result<(), SystemError> {
        let required: Vec<Symbol> = self.required_parameters().cloned().collect();
        let missing: Vec<Symbol> = self.missing_initial_values().cloned().collect();

        if required.is_empty() && missing.is_empty() {
            Ok(())
        } else {
            Err(SystemError::incomplete(required, missing))
        }
    }

    /// Returns the parameters in an order where every parameter comes after
    /// the parameters its value refers to.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::CyclicParameters`] if parameters depend on
    /// each other.
    pub fn parameter_update_order(&self) -> Result<Vec<Symbol>, SystemError> {
        let mut stack = Stack::new();
        let mut visited = IndexSet::new();
        let mut order = Vec::with_capacity(self.parameters.len());

        for symbol in self.parameters.keys() {
            self.visit_parameter(symbol, &mut stack, &mut visited, &mut order)?;
        }

        Ok(order)
    }

    fn visit_parameter(
        &self,
        symbol: &Symbol,
        stack: &mut Stack<Symbol>,
        visited: &mut IndexSet<Symbol>,
        order: &mut Vec<Symbol>,
    ) -> Result<(), SystemError> {
        if visited.contains(symbol) {
            return Ok(());
        }

        if let Some(cycle) = stack.find_circular_dependency(symbol) {
            return Err(SystemError::cyclic_parameters(cycle));
        }

        stack.push(symbol.clone());
        let dependencies = self
            .parameters
            .get(symbol)
            .and_then(Parameter::value)
            .map(Expression::free_symbols)
            .unwrap_or_default();
        for dependency in &dependencies {
            if self.parameters.contains_key(dependency) {
                self.visit_parameter(dependency, stack, visited, order)?;
            }
        }
        stack.pop();

        visited.insert(symbol.clone());
        order.push(symbol.clone());

        Ok(())
    }

    /// Returns short names for the variables and parameters, for display.
    ///
    /// With `keep_surface`, symbols that are not qualified by a child name
    /// keep their name. Time is always shown as `t`.
    #[must_use]
    pub fn readable_symbols(&self, keep_surface: bool, style: ReadableStyle) -> ReadableSymbols {
        readable::readable_symbols(
            &self.time,
            self.variables.keys(),
            self.parameters.keys(),
            keep_surface,
            style,
        )
    }

    /// Evaluates the right-hand side of every variable at the given time and
    /// state.
    ///
    /// Parameters are evaluated first, in update order.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter has no value, the parameters depend
    /// on each other, or evaluation fails, for example because `state` has
    /// no value for a variable.
    pub fn rates(
        &self,
        time: f64,
        state: &IndexMap<Symbol, f64>,
    ) -> Result<IndexMap<Symbol, f64>, SystemError>
    where
        E: Evaluate,
    {
        let required: Vec<Symbol> = self.required_parameters().cloned().collect();
        if !required.is_empty() {
            return Err(SystemError::incomplete(required, vec![]));
        }

        let mut context = EvalContext::new().with_functions(self.functions.clone());
        context.set_value(self.time.clone(), time);
        for (symbol, value) in state {
            context.set_value(symbol.clone(), *value);
        }

        for symbol in self.parameter_update_order()? {
            if let Some(value) = self.parameters.get(&symbol).and_then(Parameter::value) {
                let value = value.evaluate(&context)?;
                context.set_value(symbol, value);
            }
        }

        self.variables
            .iter()
            .map(|(symbol, rhs)| {
                let rate = rhs.evaluate(&context)?;
                Ok::<_, SystemError>((symbol.clone(), rate))
            })
            .collect()
    }

    /// Returns the initial value of every variable.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::Incomplete`] if a variable has no initial
    /// value.
    pub fn initial_state(&self) -> Result<IndexMap<Symbol, f64>, SystemError> {
        let missing: Vec<Symbol> = self.missing_initial_values().cloned().collect();
        if !missing.is_empty() {
            return Err(SystemError::incomplete(vec![], missing));
        }

        Ok(self
            .variables
            .keys()
            .filter_map(|symbol| {
                self.initial_values
                    .get(symbol)
                    .map(|value| (symbol.clone(), *value))
            })
            .collect())
    }
}
