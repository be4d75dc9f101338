//! The fixed catalog of lemmas a proof may cite by name.
//!
//! The catalog is static text.  [`Catalog::build`] parses and normalizes every
//! entry; the checker does this once per [`verify`](crate::verify) call and
//! shares the result read-only across the batch.

use crate::diag::Diagnostic;
use crate::normalize::normalize_signature;
use crate::parser::parse_signature;
use crate::syntax::Signature;
use crate::util::HashMap;
use log::debug;

/// A lemma as written in the catalog.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LemmaEntry {
    /// The name proofs cite.
    pub name: &'static str,
    /// Signature text, in the same grammar as theorem signatures.
    pub signature: &'static str,
}

const fn lemma(name: &'static str, signature: &'static str) -> LemmaEntry {
    LemmaEntry { name, signature }
}

/// Every lemma known to the checker.
pub static LEMMA_CATALOG: &[LemmaEntry] = &[
    // Natural number addition
    lemma("plusZeroLeft", "(n : Nat) -> plus Z n = n"),
    lemma("plusZeroRight", "(n : Nat) -> plus n Z = n"),
    lemma("plusSuccLeft", "(n : Nat) -> (m : Nat) -> plus (S n) m = S (plus n m)"),
    lemma("plusSuccRight", "(n : Nat) -> (m : Nat) -> plus n (S m) = S (plus n m)"),
    lemma("plusCommutative", "(n : Nat) -> (m : Nat) -> plus n m = plus m n"),
    lemma(
        "plusAssociative",
        "(n : Nat) -> (m : Nat) -> (k : Nat) -> plus n (plus m k) = plus (plus n m) k",
    ),
    lemma("plusOneSucc", "(n : Nat) -> plus n (S Z) = S n"),
    // Multiplication and exponentiation
    lemma("multZeroLeft", "(n : Nat) -> mult Z n = Z"),
    lemma("multZeroRight", "(n : Nat) -> mult n Z = Z"),
    lemma("multOneLeft", "(n : Nat) -> mult (S Z) n = n"),
    lemma("multOneRight", "(n : Nat) -> mult n (S Z) = n"),
    lemma("multCommutative", "(n : Nat) -> (m : Nat) -> mult n m = mult m n"),
    lemma(
        "multAssociative",
        "(n : Nat) -> (m : Nat) -> (k : Nat) -> mult n (mult m k) = mult (mult n m) k",
    ),
    lemma(
        "multDistributesOverPlusRight",
        "(n : Nat) -> (m : Nat) -> (k : Nat) -> mult n (plus m k) = plus (mult n m) (mult n k)",
    ),
    lemma("doubleIsPlus", "(n : Nat) -> double n = plus n n"),
    lemma("powZero", "(n : Nat) -> pow n Z = S Z"),
    lemma("powOne", "(n : Nat) -> pow n (S Z) = n"),
    // Truncated subtraction, min and max
    lemma("predSucc", "(n : Nat) -> pred (S n) = n"),
    lemma("subZeroRight", "(n : Nat) -> sub n Z = n"),
    lemma("subDiag", "(n : Nat) -> sub n n = Z"),
    lemma("subPlusCancel", "(n : Nat) -> (m : Nat) -> sub (plus n m) m = n"),
    lemma("minCommutative", "(n : Nat) -> (m : Nat) -> min n m = min m n"),
    lemma("maxCommutative", "(n : Nat) -> (m : Nat) -> max n m = max m n"),
    lemma("minIdempotent", "(n : Nat) -> min n n = n"),
    lemma("maxIdempotent", "(n : Nat) -> max n n = n"),
    // Order and parity
    lemma("leqRefl", "(n : Nat) -> leq n n = True"),
    lemma("leqZero", "(n : Nat) -> leq Z n = True"),
    lemma("ltIrrefl", "(n : Nat) -> lt n n = False"),
    lemma("eqNatRefl", "(n : Nat) -> eqNat n n = True"),
    lemma("evenDouble", "(n : Nat) -> even (double n) = True"),
    lemma("oddSuccDouble", "(n : Nat) -> odd (S (double n)) = True"),
    lemma("evenSuccOdd", "(n : Nat) -> even (S n) = odd n"),
    // Booleans
    lemma("notInvolutive", "(b : Bool) -> not (not b) = b"),
    lemma("andCommutative", "(a : Bool) -> (b : Bool) -> and a b = and b a"),
    lemma("orCommutative", "(a : Bool) -> (b : Bool) -> or a b = or b a"),
    lemma("xorCommutative", "(a : Bool) -> (b : Bool) -> xor a b = xor b a"),
    lemma("andFalseRight", "(b : Bool) -> and b False = False"),
    lemma("orTrueRight", "(b : Bool) -> or b True = True"),
    lemma("xorSelf", "(b : Bool) -> xor b b = False"),
    lemma("ifThenElseSame", "(b : Bool) -> (n : Nat) -> ifThenElse b n n = n"),
    // Lists
    lemma("appendNilLeft", "(xs : List a) -> append Nil xs = xs"),
    lemma("appendNilRight", "(xs : List a) -> append xs Nil = xs"),
    lemma(
        "appendAssociative",
        "(xs : List a) -> (ys : List a) -> (zs : List a) -> \
            append xs (append ys zs) = append (append xs ys) zs",
    ),
    lemma(
        "lengthAppend",
        "(xs : List a) -> (ys : List a) -> length (append xs ys) = plus (length xs) (length ys)",
    ),
    lemma("lengthReverse", "(xs : List a) -> length (reverse xs) = length xs"),
    lemma("reverseInvolutive", "(xs : List a) -> reverse (reverse xs) = xs"),
    lemma(
        "reverseAppend",
        "(xs : List a) -> (ys : List a) -> \
            reverse (append xs ys) = append (reverse ys) (reverse xs)",
    ),
    lemma("snocIsAppend", "(xs : List a) -> (x : a) -> snoc xs x = append xs (Cons x Nil)"),
    lemma("lengthSnoc", "(xs : List a) -> (x : a) -> length (snoc xs x) = S (length xs)"),
    lemma("lengthReplicate", "(n : Nat) -> (x : a) -> length (replicate n x) = n"),
    lemma("mapLength", "(f : a -> b) -> (xs : List a) -> length (map f xs) = length xs"),
    lemma(
        "mapAppend",
        "(f : a -> b) -> (xs : List a) -> (ys : List a) -> \
            map f (append xs ys) = append (map f xs) (map f ys)",
    ),
    lemma("mapIdentity", "(xs : List a) -> map (\\x => x) xs = xs"),
    lemma(
        "filterAppend",
        "(p : a -> Bool) -> (xs : List a) -> (ys : List a) -> \
            filter p (append xs ys) = append (filter p xs) (filter p ys)",
    ),
    lemma("concatNil", "concat Nil = Nil"),
];

/// The parsed and normalized catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    lemmas: HashMap<&'static str, Signature>,
}

impl Catalog {
    /// Parse and normalize every entry of [`LEMMA_CATALOG`].
    ///
    /// # Errors
    ///
    /// Returns the name of the first entry which fails to parse, with the
    /// reason.
    pub fn build() -> Result<Catalog, (&'static str, Diagnostic)> {
        Self::from_entries(LEMMA_CATALOG)
    }

    pub(crate) fn from_entries(
        entries: &[LemmaEntry],
    ) -> Result<Catalog, (&'static str, Diagnostic)> {
        let mut lemmas = HashMap::default();
        for entry in entries {
            let signature = parse_signature(entry.signature).map_err(|diag| (entry.name, diag))?;
            lemmas.insert(entry.name, normalize_signature(&signature));
        }
        debug!("Lemma catalog built with {} entries", lemmas.len());
        Ok(Catalog { lemmas })
    }

    /// The normalized signature of lemma `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.lemmas.get(name)
    }

    /// Number of lemmas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    /// Whether the catalog has no lemmas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}
