use ported_expr::{Expr, Symbol};

/// Whether an assignment defines a time derivative or an algebraic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentKind {
    /// `d(target)/dt = expression`
    Differential,
    /// `target = expression`
    Parameter,
}

/// Binds one symbol to one expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<E = Expr> {
    target: Symbol,
    expression: E,
    kind: AssignmentKind,
}

impl<E> Assignment<E> {
    /// Creates a differential assignment `d(target)/dt = expression`.
    #[must_use]
    pub const fn differential(target: Symbol, expression: E) -> Self {
        Self {
            target,
            expression,
            kind: AssignmentKind::Differential,
        }
    }

    /// Creates a parameter assignment `target = expression`.
    #[must_use]
    pub const fn parameter(target: Symbol, expression: E) -> Self {
        Self {
            target,
            expression,
            kind: AssignmentKind::Parameter,
        }
    }

    /// Returns the symbol the assignment defines.
    #[must_use]
    pub const fn target(&self) -> &Symbol {
        &self.target
    }

    /// Returns the defining expression.
    #[must_use]
    pub const fn expression(&self) -> &E {
        &self.expression
    }

    /// Returns the kind of the assignment.
    #[must_use]
    pub const fn kind(&self) -> AssignmentKind {
        self.kind
    }
}

/// An assignment as supplied by a model author, before its kind is known.
///
/// The kind is decided by the object the entry is added to. Entries can be
/// written either as this record or as a `(target, expression)` pair; both
/// forms are interchangeable.
///
/// ```rust
/// use ported_expr::Expr;
/// use ported_ir::AssignmentEntry;
///
/// let pair: AssignmentEntry = ("y", Expr::var("a") + Expr::var("b")).into();
/// let record = AssignmentEntry {
///     target: "y".to_string(),
///     expression: Expr::var("a") + Expr::var("b"),
/// };
///
/// assert_eq!(pair, record);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentEntry<E = Expr> {
    /// The name of the defined symbol.
    pub target: String,
    /// The defining expression.
    pub expression: E,
}

impl<E> From<(&str, E)> for AssignmentEntry<E> {
    fn from((target, expression): (&str, E)) -> Self {
        Self {
            target: target.to_string(),
            expression,
        }
    }
}

impl<E> From<(String, E)> for AssignmentEntry<E> {
    fn from((target, expression): (String, E)) -> Self {
        Self { target, expression }
    }
}
