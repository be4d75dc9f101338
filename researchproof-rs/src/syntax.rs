//! Abstract syntax for theorem signatures and proof terms.
//!
//! Both grammars produce values of these types.  Everything here is an owned
//! tree with structural equality, which is exactly what the alpha-normalizer
//! relies on: two signatures are alpha-equivalent iff their normalized trees
//! compare equal with `==`.
//!
//! The `Display` impls print the surface syntax back out.  Parenthesization is
//! minimal but always sufficient for the printed text to re-parse to the same
//! tree, up to the names given to anonymous parameters.

use itertools::Itertools;
use std::fmt;

/// Prefix of the positional names given to parameters declared without a name,
/// as in the second parameter of `(n : Nat) -> Nat -> Nat`.
pub const ANONYMOUS_PARAM_PREFIX: &str = "_param_";

/// A type-level expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A named constant type such as `Nat`.
    Const(String),
    /// A free type variable such as `a`.
    Var(String),
    /// A type constructor applied to arguments, e.g. `List a`.
    App(String, Vec<TypeExpr>),
    /// The type of proofs that two terms are equal.
    Equality(Term, Term),
    /// A function type.  Chains associate to the right.
    Arrow(Box<TypeExpr>, Box<TypeExpr>),
}

/// A term-level expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A variable reference.
    Var(String),
    /// A constant, i.e. any identifier with a leading uppercase letter, or one
    /// of the 0-ary term constants.
    Const(String),
    /// A named function applied to a flat list of arguments.
    App(String, Vec<Term>),
    /// `\param => body`
    Lambda(String, Box<Term>),
}

/// A universally quantified parameter of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// The bound name; positional for anonymous parameters.
    pub name: String,
    /// The declared type.
    pub type_expr: TypeExpr,
}

/// A theorem's type: parameters in declaration order and a result type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// The parameters, explicit ones first, then those flattened out of the
    /// residual arrow chain.
    pub params: Vec<Param>,
    /// The result type, never itself an arrow.
    pub result: TypeExpr,
}

impl TypeExpr {
    /// Split a right-associated arrow chain into its argument types and final
    /// result.
    #[must_use]
    pub fn flatten_arrow(self) -> (Vec<TypeExpr>, TypeExpr) {
        let mut args = vec![];
        let mut current = self;
        while let TypeExpr::Arrow(left, right) = current {
            args.push(*left);
            current = *right;
        }
        (args, current)
    }

    /// Returns the two sides if this is an equality type.
    #[must_use]
    pub const fn as_equality(&self) -> Option<(&Term, &Term)> {
        match self {
            TypeExpr::Equality(left, right) => Some((left, right)),
            _ => None,
        }
    }

    const fn is_atomic(&self) -> bool {
        matches!(self, TypeExpr::Const(_) | TypeExpr::Var(_))
    }
}

impl Term {
    const fn is_atomic(&self) -> bool {
        matches!(self, Term::Var(_) | Term::Const(_))
    }
}

impl Param {
    /// Whether this parameter was declared without a name.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.starts_with(ANONYMOUS_PARAM_PREFIX)
    }
}

/// Prints `term` wrapped in parentheses unless it is atomic.
struct TermAtom<'a>(&'a Term);

impl fmt::Display for TermAtom<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_atomic() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

/// Prints a type in argument position.
struct TypeAtom<'a>(&'a TypeExpr);

impl fmt::Display for TypeAtom<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_atomic() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

/// Prints a type to the left of an arrow, where arrows and equalities need
/// parentheses but applications do not.
struct ArrowLeft<'a>(&'a TypeExpr);

impl fmt::Display for ArrowLeft<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            TypeExpr::Arrow(..) | TypeExpr::Equality(..) => write!(f, "({})", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) | Term::Const(name) => f.write_str(name),
            Term::App(head, args) => {
                write!(f, "{} {}", head, args.iter().map(TermAtom).format(" "))
            }
            Term::Lambda(param, body) => write!(f, "\\{param} => {body}"),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Const(name) | TypeExpr::Var(name) => f.write_str(name),
            TypeExpr::App(head, args) => {
                write!(f, "{} {}", head, args.iter().map(TypeAtom).format(" "))
            }
            TypeExpr::Equality(left, right) => write!(f, "{left} = {right}"),
            TypeExpr::Arrow(left, right) => write!(f, "{} -> {}", ArrowLeft(left), right),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            write!(f, "{}", ArrowLeft(&self.type_expr))
        } else {
            write!(f, "({} : {})", self.name, self.type_expr)
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for param in &self.params {
            write!(f, "{param} -> ")?;
        }
        write!(f, "{}", self.result)
    }
}
