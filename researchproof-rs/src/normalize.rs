//! Canonical renaming of signatures, for alpha-equivalence tests.
//!
//! Two independent renamings are applied in a single left-to-right walk:
//!
//! - type variables become `t0`, `t1`, ... in order of first occurrence
//!   anywhere in the signature;
//! - parameters become `p0`, `p1`, ... in declaration order, and other term
//!   variables (free names in equality types, lambda binders) become `v0`,
//!   `v1`, ... in order of first occurrence.
//!
//! A lambda binder is visible only in its own body, where it shadows any outer
//! name with the same spelling.  A name in head position is renamed like any
//! other occurrence when it is already in scope, so the `f` of
//! `(f : Nat -> Nat) -> f Z = Z` becomes `p0`.  Unbound heads, which includes
//! every builtin and constructor, keep their spelling, so `plus n Z` and
//! `mult n Z` stay distinct.  Type application heads follow the same rule,
//! through the type variable renaming.
//!
//! This is renaming only; there is no unification or instantiation.  A theorem
//! is an instance of a lemma iff both normalize to identical trees.

use crate::parser::is_type_const;
use crate::syntax::{Param, Signature, Term, TypeExpr};
use crate::util::HashMap;

type Scope = HashMap<String, String>;

#[derive(Default)]
struct Normalizer {
    type_vars: Scope,
    term_vars: Scope,
    params: usize,
    fresh: usize,
}

impl Normalizer {
    fn type_var(&mut self, name: &str) -> String {
        let fresh = format!("t{}", self.type_vars.len());
        self.type_vars
            .entry(name.to_owned())
            .or_insert(fresh)
            .clone()
    }

    fn type_expr(&mut self, type_expr: &TypeExpr) -> TypeExpr {
        match type_expr {
            TypeExpr::Const(name) => TypeExpr::Const(name.clone()),
            TypeExpr::Var(name) => TypeExpr::Var(self.type_var(name)),
            TypeExpr::App(name, args) => {
                let head = if is_type_const(name) {
                    name.clone()
                } else {
                    self.type_var(name)
                };
                TypeExpr::App(head, args.iter().map(|arg| self.type_expr(arg)).collect())
            }
            TypeExpr::Equality(left, right) => TypeExpr::Equality(
                normalize_term(left, &mut self.term_vars, &mut self.fresh),
                normalize_term(right, &mut self.term_vars, &mut self.fresh),
            ),
            TypeExpr::Arrow(left, right) => TypeExpr::Arrow(
                Box::new(self.type_expr(left)),
                Box::new(self.type_expr(right)),
            ),
        }
    }

    /// The parameter's name is in scope in its own type.
    fn param(&mut self, param: &Param) -> Param {
        let name = format!("p{}", self.params);
        self.params += 1;
        self.term_vars.insert(param.name.clone(), name.clone());
        Param {
            name,
            type_expr: self.type_expr(&param.type_expr),
        }
    }
}

fn fresh_var(fresh: &mut usize) -> String {
    let name = format!("v{fresh}");
    *fresh += 1;
    name
}

fn normalize_term(term: &Term, scope: &mut Scope, fresh: &mut usize) -> Term {
    match term {
        Term::Const(name) => Term::Const(name.clone()),
        Term::Var(name) => {
            if !scope.contains_key(name) {
                scope.insert(name.clone(), fresh_var(fresh));
            }
            Term::Var(scope[name].clone())
        }
        Term::App(name, args) => {
            let head = scope.get(name).unwrap_or(name).clone();
            Term::App(
                head,
                args.iter()
                    .map(|arg| normalize_term(arg, scope, fresh))
                    .collect(),
            )
        }
        Term::Lambda(param, body) => {
            // free names first seen in the body stay in `scope` afterwards
            let bound = fresh_var(fresh);
            let shadowed = scope.insert(param.clone(), bound.clone());
            let body = normalize_term(body, scope, fresh);
            match shadowed {
                Some(outer) => scope.insert(param.clone(), outer),
                None => scope.remove(param),
            };
            Term::Lambda(bound, Box::new(body))
        }
    }
}

/// Rename every bound and free name of `signature` canonically.
///
/// Normalization is idempotent, and signatures which differ only by a
/// consistent renaming normalize to the same value.
#[must_use]
pub fn normalize_signature(signature: &Signature) -> Signature {
    let mut normalizer = Normalizer::default();
    let params = signature
        .params
        .iter()
        .map(|param| normalizer.param(param))
        .collect();
    let result = normalizer.type_expr(&signature.result);
    Signature { params, result }
}

/// Whether two signatures are equal up to consistent renaming.
#[must_use]
pub fn alpha_equivalent(left: &Signature, right: &Signature) -> bool {
    normalize_signature(left) == normalize_signature(right)
}
