//! The proof checker.
//!
//! Each theorem is checked in one of two ways, selected by its proof text:
//!
//! - `Refl`: the signature's result must be an equality type, and both sides
//!   must evaluate to the same fully reduced value under no bindings.
//! - anything else must be a lemma name, optionally applied to arguments (which
//!   are ignored).  The theorem's signature must be alpha-equivalent to the
//!   lemma's.
//!
//! A batch stops at the first failure.

use crate::catalog::Catalog;
use crate::diag::{CheckError, Diagnostic};
use crate::eval::{evaluate, Env};
use crate::normalize::normalize_signature;
use crate::parser::{parse_signature, parse_term};
use crate::script::{Span, Theorem};
use crate::syntax::{Signature, Term};
use log::{debug, info};

/// Which part of a theorem a failure concerns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Part {
    Signature,
    Proof,
}

impl Part {
    const fn span(self, theorem: &Theorem) -> Span {
        match self {
            Part::Signature => theorem.signature_span,
            Part::Proof => theorem.proof_span,
        }
    }
}

fn locate(theorem: &Theorem, part: Part, diagnostic: Diagnostic) -> CheckError {
    let mut span = part.span(theorem);
    if let Diagnostic::BadCharacter(offset, ch) = diagnostic {
        if !span.is_null() {
            span = span.skip(offset);
            span.end = span.start + ch.len_utf8() as u32;
        }
    }
    CheckError {
        theorem: Some(theorem.name.clone()),
        line_number: theorem.line_number,
        span,
        diagnostic,
    }
}

/// Check a `Refl` proof of `signature`.
///
/// # Errors
///
/// Fails if the result type is not an equality, if either side fails to
/// evaluate or is stuck on a free variable, or if the sides differ.
pub fn check_refl(signature: &Signature) -> Result<(), Diagnostic> {
    let (left, right) = signature
        .result
        .as_equality()
        .ok_or(Diagnostic::ReflNotEquality)?;
    let env = Env::default();
    let left_value = evaluate(left, &env)?;
    let right_value = evaluate(right, &env)?;
    debug!("Refl: {left} ~> {left_value}, {right} ~> {right_value}");

    for (term, value) in [(left, &left_value), (right, &right_value)] {
        if value.is_stuck() {
            return Err(Diagnostic::ReflStuck(term.to_string()));
        }
    }
    if left_value != right_value {
        return Err(Diagnostic::ReflMismatch(left.to_string(), right.to_string()));
    }
    Ok(())
}

/// The lemma a proof term cites.
///
/// # Errors
///
/// Fails with [`Diagnostic::UnsupportedProof`] for a lambda.
pub fn cited_lemma(proof: &Term) -> Result<&str, Diagnostic> {
    match proof {
        Term::Var(name) | Term::Const(name) | Term::App(name, _) => Ok(name),
        Term::Lambda(..) => Err(Diagnostic::UnsupportedProof(proof.to_string())),
    }
}

/// Check that `signature` is an instance of lemma `name`.
///
/// # Errors
///
/// Fails if the lemma is not in the catalog, or if the normalized signatures
/// differ.
pub fn check_lemma(
    signature: &Signature,
    name: &str,
    catalog: &Catalog,
) -> Result<(), Diagnostic> {
    let lemma = catalog
        .get(name)
        .ok_or_else(|| Diagnostic::UnknownLemma(name.to_owned()))?;
    let normalized = normalize_signature(signature);
    if &normalized != lemma {
        debug!("Signature mismatch: {normalized} against {name} : {lemma}");
        return Err(Diagnostic::SignatureMismatch(name.to_owned()));
    }
    Ok(())
}

/// Check one theorem against an already built catalog.
///
/// # Errors
///
/// The first failure found, located at the signature or proof text as
/// appropriate.
pub fn check_theorem(theorem: &Theorem, catalog: &Catalog) -> Result<(), CheckError> {
    debug!("Checking theorem {} (line {})", theorem.name, theorem.line_number);
    let signature =
        parse_signature(&theorem.signature).map_err(|diag| locate(theorem, Part::Signature, diag))?;

    if theorem.proof.trim() == "Refl" {
        debug!("{}: by Refl", theorem.name);
        return check_refl(&signature).map_err(|diag| locate(theorem, Part::Signature, diag));
    }

    let proof = parse_term(&theorem.proof).map_err(|diag| locate(theorem, Part::Proof, diag))?;
    let lemma = cited_lemma(&proof).map_err(|diag| locate(theorem, Part::Proof, diag))?;
    debug!("{}: by lemma {lemma}", theorem.name);
    check_lemma(&signature, lemma, catalog).map_err(|diag| {
        let part = match diag {
            Diagnostic::UnknownLemma(_) => Part::Proof,
            _ => Part::Signature,
        };
        locate(theorem, part, diag)
    })
}

/// Check a batch of theorems in order, stopping at the first failure.
///
/// The lemma catalog is built once for the batch.
///
/// # Errors
///
/// The first failure, attributed to the theorem it was found in.  A catalog
/// entry which fails to parse is reported against the lemma's name.
pub fn verify<'a>(theorems: impl IntoIterator<Item = &'a Theorem>) -> Result<(), CheckError> {
    let catalog = Catalog::build().map_err(|(lemma, diagnostic)| CheckError {
        theorem: Some(lemma.to_owned()),
        line_number: 0,
        span: Span::NULL,
        diagnostic,
    })?;
    let mut count = 0usize;
    for theorem in theorems {
        check_theorem(theorem, &catalog)?;
        count += 1;
    }
    info!("Verified {count} theorem(s)");
    Ok(())
}
