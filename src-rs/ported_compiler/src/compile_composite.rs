//! Compilation of composite objects.

use indexmap::{IndexMap, IndexSet};
use ported_expr::{Expression, Symbol};
use ported_ir::{
    Aggregation, CompiledObject, CompiledParts, CompositeObject, Connection, Name, PortKind,
    PortRef,
};
use tracing::{debug, instrument, trace};

use crate::{
    CompileContext, CompileError, compile_object,
    qualify::QualifiedChild,
    symbol_table::SymbolTable,
    util::Scope,
    wiring,
};

/// Compiles a composite object.
///
/// Children are compiled and qualified first. The directed wires are then
/// resolved in dependency order, followed by the variable wires. Unconnected
/// child inputs are bound to global symbols or to their defaults, and every
/// identified symbol is finally replaced by its canonical symbol.
#[instrument(skip_all, fields(object = %scope))]
pub fn compile_composite<E: Expression>(
    object: &CompositeObject<E>,
    scope: &Scope,
    context: &impl CompileContext,
) -> Result<CompiledObject<E>, CompileError> {
    let mut children = IndexMap::new();
    for (name, child) in object.children() {
        let compiled = compile_object(child, &scope.child(name), context)?;
        children.insert(name.clone(), QualifiedChild::new(name, compiled, context));
    }
    debug!(children = children.len(), "compiled children");

    let mut flattening = Flattening::new(object);
    for child in children.values() {
        flattening.absorb(child);
    }

    for connection in wiring::resolution_order(object.connections(), &children, scope)? {
        flattening.connect(connection, &children, scope)?;
    }

    for aggregation in object.aggregations() {
        flattening.aggregate(aggregation, &children, scope)?;
    }

    flattening.bind_unconnected(&children, scope, context)?;
    flattening.check_own_ports(object, scope)?;

    flattening.finish(object.name().clone(), scope)
}

/// The flat assignments of a composite while it is being compiled.
///
/// Wires do not copy expressions into their destinations. They record that
/// a destination symbol is identified with a canonical symbol, and every
/// identification is applied once in [`Flattening::finish`].
#[derive(Debug)]
struct Flattening<E> {
    input_ports: IndexMap<Name, Option<E>>,
    output_ports: IndexMap<Name, E>,
    variable_ports: IndexMap<Name, E>,
    internal_parameters: IndexMap<Symbol, E>,
    default_parameters: IndexSet<Symbol>,
    internal_variables: IndexMap<Symbol, E>,
    identifications: IndexMap<Symbol, Symbol>,
    connected_inputs: IndexSet<(Name, Name)>,
    aggregated_variables: IndexSet<(Name, Name)>,
    lookup: IndexMap<String, Symbol>,
}

impl<E: Expression> Flattening<E> {
    fn new(object: &CompositeObject<E>) -> Self {
        let input_ports = object
            .ports()
            .of_kind(PortKind::Input)
            .map(|(name, port)| (name.clone(), port.default().cloned()))
            .collect();

        let mut lookup: IndexMap<String, Symbol> = object
            .ports()
            .iter()
            .map(|(name, _)| (name.to_string(), name.to_symbol()))
            .collect();
        for aggregation in object.aggregations() {
            let identification = aggregation.identification();
            lookup.insert(identification.to_string(), identification.to_symbol());
        }

        Self {
            input_ports,
            output_ports: IndexMap::new(),
            variable_ports: IndexMap::new(),
            internal_parameters: IndexMap::new(),
            default_parameters: IndexSet::new(),
            internal_variables: IndexMap::new(),
            identifications: IndexMap::new(),
            connected_inputs: IndexSet::new(),
            aggregated_variables: IndexSet::new(),
            lookup,
        }
    }

    /// Takes over the internal assignments of a child. Child outputs become
    /// internal parameters until a wire forwards them.
    fn absorb(&mut self, child: &QualifiedChild<E>) {
        self.internal_parameters.extend(
            child
                .internal_parameters
                .iter()
                .map(|(symbol, expr)| (symbol.clone(), expr.clone())),
        );
        self.internal_parameters.extend(
            child
                .outputs
                .values()
                .map(|(symbol, expr)| (symbol.clone(), expr.clone())),
        );
        self.default_parameters
            .extend(child.default_parameters.iter().cloned());
        self.internal_variables.extend(
            child
                .internal_variables
                .iter()
                .map(|(symbol, rhs)| (symbol.clone(), rhs.clone())),
        );
        self.lookup.extend(
            child
                .lookup
                .iter()
                .map(|(path, symbol)| (path.clone(), symbol.clone())),
        );
    }

    fn connect(
        &mut self,
        connection: &Connection,
        children: &IndexMap<Name, QualifiedChild<E>>,
        scope: &Scope,
    ) -> Result<(), CompileError> {
        let (source, is_child_output) = match connection.source() {
            PortRef::Own(port) => (port.to_symbol(), false),
            PortRef::Child { child, port } => {
                let child = children.get(child);
                if let Some((symbol, _)) = child.and_then(|child| child.outputs.get(port)) {
                    (symbol.clone(), true)
                } else if let Some((symbol, _)) = child.and_then(|child| child.variables.get(port))
                {
                    (symbol.clone(), false)
                } else {
                    return Err(CompileError::unresolved_dependency(
                        scope.qualify(connection.source()),
                    ));
                }
            }
        };

        let mut root = source.clone();
        for destination in connection.destinations() {
            let PortRef::Own(output) = destination else {
                continue;
            };

            let forwarded = if is_child_output && !self.identifications.contains_key(&source) {
                self.internal_parameters.shift_remove(&source)
            } else {
                None
            };

            match forwarded {
                Some(expr) => {
                    self.output_ports.insert(output.clone(), expr);
                    self.identify(source.clone(), output.to_symbol());
                    root = output.to_symbol();
                }
                None => {
                    self.output_ports
                        .insert(output.clone(), E::symbol(source.clone()));
                }
            }
        }

        for destination in connection.destinations() {
            let PortRef::Child { child, port } = destination else {
                continue;
            };

            let Some((symbol, _)) = children.get(child).and_then(|c| c.inputs.get(port)) else {
                return Err(CompileError::unresolved_dependency(scope.qualify(destination)));
            };

            self.identify(symbol.clone(), root.clone());
            self.connected_inputs.insert((child.clone(), port.clone()));
        }

        trace!(
            source = %connection.source(),
            destinations = connection.destinations().len(),
            root = %root,
            "resolved directed wire"
        );

        Ok(())
    }

    fn aggregate(
        &mut self,
        aggregation: &Aggregation,
        children: &IndexMap<Name, QualifiedChild<E>>,
        scope: &Scope,
    ) -> Result<(), CompileError> {
        let identification = aggregation.identification().to_symbol();

        let mut terms = Vec::with_capacity(aggregation.children().len());
        for (child, port) in aggregation.children() {
            let Some((symbol, rhs)) = children.get(child).and_then(|c| c.variables.get(port))
            else {
                return Err(CompileError::unresolved_dependency(
                    scope.qualify(format!("{child}.{port}")),
                ));
            };

            terms.push(rhs.clone());
            self.identify(symbol.clone(), identification.clone());
            self.aggregated_variables
                .insert((child.clone(), port.clone()));
        }

        let rhs = E::sum(terms);
        trace!(identification = %identification, rhs = %rhs, "aggregated variables");

        match aggregation.destination() {
            Some(destination) => {
                self.variable_ports.insert(destination.clone(), rhs);
            }
            None => {
                self.internal_variables.insert(identification, rhs);
            }
        }

        Ok(())
    }

    /// Binds child inputs without an incoming wire to the time symbol, to a
    /// system parameter of the same name, or to their default value, in that
    /// order. Child variable ports without an aggregation stay internal.
    fn bind_unconnected(
        &mut self,
        children: &IndexMap<Name, QualifiedChild<E>>,
        scope: &Scope,
        context: &impl CompileContext,
    ) -> Result<(), CompileError> {
        for (child_name, child) in children {
            for (port, (symbol, default)) in &child.inputs {
                if self
                    .connected_inputs
                    .contains(&(child_name.clone(), port.clone()))
                {
                    continue;
                }

                if let Some(global) = context.global_symbol(port.as_str()) {
                    trace!(input = %symbol, global = %global, "bound input to global symbol");
                    self.identify(symbol.clone(), global);
                } else if let Some(default) = default {
                    trace!(input = %symbol, "materialized input default");
                    self.internal_parameters
                        .insert(symbol.clone(), default.clone());
                    self.default_parameters.insert(symbol.clone());
                } else {
                    return Err(CompileError::unresolved_dependency(scope.qualify(symbol)));
                }
            }

            for (port, (symbol, rhs)) in &child.variables {
                if !self
                    .aggregated_variables
                    .contains(&(child_name.clone(), port.clone()))
                {
                    self.internal_variables.insert(symbol.clone(), rhs.clone());
                }
            }
        }

        Ok(())
    }

    fn check_own_ports(
        &self,
        object: &CompositeObject<E>,
        scope: &Scope,
    ) -> Result<(), CompileError> {
        for (name, port) in object.ports().iter() {
            let is_backed = match port.kind() {
                PortKind::Input => true,
                PortKind::Output => self.output_ports.contains_key(name),
                PortKind::Variable => self.variable_ports.contains_key(name),
            };

            if !is_backed {
                return Err(CompileError::unresolved_dependency(scope.qualify(name)));
            }
        }

        Ok(())
    }

    fn identify(&mut self, symbol: Symbol, canonical: Symbol) {
        if symbol != canonical {
            self.identifications.insert(symbol, canonical);
        }
    }

    fn resolve(&self, symbol: &Symbol) -> Symbol {
        let mut current = symbol;
        for _ in 0..=self.identifications.len() {
            match self.identifications.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }

        current.clone()
    }

    /// Applies every identification and checks that each symbol is defined
    /// once.
    fn finish(self, name: Name, scope: &Scope) -> Result<CompiledObject<E>, CompileError> {
        let renames: IndexMap<Symbol, Symbol> = self
            .identifications
            .keys()
            .map(|symbol| (symbol.clone(), self.resolve(symbol)))
            .collect();
        let rename = |expr: &E| {
            if renames.is_empty() {
                expr.clone()
            } else {
                expr.rename_symbols(&renames)
            }
        };

        let mut table = SymbolTable::new(scope);

        let mut input_ports = IndexMap::new();
        for (port, default) in &self.input_ports {
            table.define(port.to_symbol())?;
            input_ports.insert(port.clone(), default.as_ref().map(rename));
        }

        let mut output_ports = IndexMap::new();
        for (port, expr) in &self.output_ports {
            table.define(port.to_symbol())?;
            output_ports.insert(port.clone(), rename(expr));
        }

        let mut variable_ports = IndexMap::new();
        for (port, rhs) in &self.variable_ports {
            table.define(port.to_symbol())?;
            variable_ports.insert(port.clone(), rename(rhs));
        }

        let mut internal_parameters = IndexMap::new();
        for (symbol, expr) in &self.internal_parameters {
            let symbol = self.resolve(symbol);
            table.define(symbol.clone())?;
            internal_parameters.insert(symbol, rename(expr));
        }

        let mut internal_variables = IndexMap::new();
        for (symbol, rhs) in &self.internal_variables {
            let symbol = self.resolve(symbol);
            table.define(symbol.clone())?;
            internal_variables.insert(symbol, rename(rhs));
        }

        let default_parameters = self
            .default_parameters
            .iter()
            .map(|symbol| self.resolve(symbol))
            .filter(|symbol| internal_parameters.contains_key(symbol))
            .collect();

        let lookup = self
            .lookup
            .iter()
            .map(|(path, symbol)| (path.clone(), self.resolve(symbol)))
            .collect();

        debug!(
            identifications = self.identifications.len(),
            internal_parameters = internal_parameters.len(),
            internal_variables = internal_variables.len(),
            "flattened composite"
        );

        Ok(CompiledObject::from_parts(CompiledParts {
            name,
            input_ports,
            output_ports,
            variable_ports,
            internal_parameters,
            default_parameters,
            internal_variables,
            lookup,
        }))
    }
}
