//! A library for checking ResearchProof theorem scripts.
//!
//! Theorems are written in a small Idris-flavored language: a signature,
//! usually an equation between terms over natural numbers, booleans and lists,
//! and a proof which is either `Refl` or the name of a lemma from a fixed
//! catalog.  No external proof assistant is involved.  `Refl` proofs are
//! checked by evaluating both sides of the equation with a fixed set of
//! builtin functions; lemma proofs are checked by comparing signatures up to
//! renaming of bound names.
//!
//! The entry points are [`parse_script`] to read a script, [`verify`] to check
//! the theorems it contains, and [`parse_signature`] for tools which want the
//! structured form of a signature.
//!
//! ```
//! use researchproof_rs::{parse_script, verify};
//!
//! let theorems = parse_script(
//!     "theorem plus_1_0 : plus (S Z) Z = S Z\n\
//!      proof Refl\n\
//!      theorem plus_n_0 : (n : Nat) -> plus n Z = n\n\
//!      proof plusZeroRight n\n",
//! )
//! .unwrap();
//! assert!(verify(&theorems).is_ok());
//! ```

#![warn(missing_docs)]

mod util;

pub mod catalog;
pub mod checker;
pub mod diag;
pub mod eval;
pub mod lexer;
pub mod line_cache;
pub mod normalize;
pub mod parser;
pub mod script;
pub mod syntax;

#[cfg(test)]
mod parser_tests;
#[cfg(test)]
mod script_tests;

pub use checker::verify;
pub use diag::{CheckError, Diagnostic, DiagnosticKind};
pub use parser::parse_signature;
pub use script::{parse_script, SourceInfo, Theorem};
pub use syntax::Signature;
