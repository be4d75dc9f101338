//! Reader for proof scripts.
//!
//! A script is a sequence of theorem declarations, each immediately followed
//! (blank lines and comments aside) by its proof:
//!
//! ```text
//! # comments run from '#' to the end of the line
//! theorem plus_zero_right : (n : Nat) -> plus n Z = n
//! proof plusZeroRight n
//! ```
//!
//! This module only splits lines.  Signatures and proofs are kept as raw text
//! for the checker, together with their byte spans in the source so failures
//! can be pointed at.

use crate::diag::{CheckError, Diagnostic};
use std::sync::Arc;

/// Semantic type for file-position indices.
pub type FilePos = u32;

/// A byte range within a source file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Index of first byte of the range.
    pub start: FilePos,
    /// Index one past last byte of the range.
    pub end: FilePos,
}

impl Span {
    /// Coercion from array index pairs.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Span {
        Span {
            start: start as FilePos,
            end: end as FilePos,
        }
    }

    /// Returns the null span.
    pub const NULL: Span = Span::new(0, 0);

    /// Checks for the null span, i.e. zero length at offset zero.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.end == 0
    }

    /// Get the length of the span.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    /// Checks if the span is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.end == self.start
    }

    /// The sub-span starting `offset` bytes in, running to the end.
    #[must_use]
    pub const fn skip(self, offset: usize) -> Span {
        let start = self.start as usize + offset;
        if start >= self.end as usize {
            self
        } else {
            Span::new(start, self.end as usize)
        }
    }
}

/// A named script, for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Name of the source file as loaded.
    pub name: String,
    /// The full source text.
    pub text: Arc<String>,
}

impl SourceInfo {
    /// Wraps loaded text.
    #[must_use]
    pub const fn new(name: String, text: Arc<String>) -> Self {
        Self { name, text }
    }
}

/// One theorem read from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theorem {
    /// The declared name.
    pub name: String,
    /// The signature, unparsed.
    pub signature: String,
    /// The proof expression, unparsed.
    pub proof: String,
    /// 1-based line of the `theorem` declaration.
    pub line_number: u32,
    /// Location of `signature` in the source.
    pub signature_span: Span,
    /// Location of `proof` in the source.
    pub proof_span: Span,
}

impl Theorem {
    /// A theorem which did not come from a script file.
    #[must_use]
    pub fn new(name: &str, signature: &str, proof: &str, line_number: u32) -> Self {
        Theorem {
            name: name.to_owned(),
            signature: signature.to_owned(),
            proof: proof.to_owned(),
            line_number,
            signature_span: Span::NULL,
            proof_span: Span::NULL,
        }
    }
}

/// A line with its comment removed and surrounding whitespace trimmed, and
/// the span of what remains.
struct Line<'a> {
    number: u32,
    text: &'a str,
    raw: &'a str,
    span: Span,
}

fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n').zip(1..).map(move |(raw, number)| {
        let start = offset;
        offset += raw.len();
        let raw = raw.trim_end_matches(['\n', '\r']);
        let content = raw.split_once('#').map_or(raw, |(code, _)| code);
        let trimmed = content.trim_start();
        let lead = content.len() - trimmed.len();
        let trimmed = trimmed.trim_end();
        Line {
            number,
            text: trimmed,
            raw: raw.trim(),
            span: Span::new(start + lead, start + lead + trimmed.len()),
        }
    })
}

/// Span of `part`, which must be a subslice of `line.text`.
fn sub_span(line: &Line<'_>, part: &str) -> Span {
    let offset = part.as_ptr() as usize - line.text.as_ptr() as usize;
    Span::new(
        line.span.start as usize + offset,
        line.span.start as usize + offset + part.len(),
    )
}

fn error(theorem: Option<&str>, line: &Line<'_>, diagnostic: Diagnostic) -> CheckError {
    CheckError {
        theorem: theorem.map(str::to_owned),
        line_number: line.number,
        span: line.span,
        diagnostic,
    }
}

/// Split a script into theorems.
///
/// # Errors
///
/// Fails at the first line which breaks the `theorem` / `proof` structure.
pub fn parse_script(text: &str) -> Result<Vec<Theorem>, CheckError> {
    let mut theorems = vec![];
    let mut iter = lines(text).filter(|line| !line.text.is_empty());

    while let Some(line) = iter.next() {
        let Some(header) = line.text.strip_prefix("theorem ") else {
            return Err(error(
                None,
                &line,
                Diagnostic::ExpectedTheorem(line.raw.to_owned()),
            ));
        };
        let Some((name, signature)) = header.split_once(':') else {
            return Err(error(None, &line, Diagnostic::MissingColon));
        };
        let (name, signature) = (name.trim(), signature.trim());
        if name.is_empty() {
            return Err(error(None, &line, Diagnostic::MissingTheoremName));
        }
        if signature.is_empty() {
            return Err(error(Some(name), &line, Diagnostic::MissingSignature));
        }

        let Some(proof_line) = iter.next() else {
            return Err(error(
                Some(name),
                &line,
                Diagnostic::MissingProof(name.to_owned()),
            ));
        };
        let proof = match proof_line.text.strip_prefix("proof ") {
            Some(proof) => proof.trim(),
            // a bare `proof` with nothing after it
            None if proof_line.text == "proof" => "",
            None => {
                return Err(error(
                    Some(name),
                    &proof_line,
                    Diagnostic::ExpectedProof(name.to_owned(), proof_line.raw.to_owned()),
                ))
            }
        };
        if proof.is_empty() {
            return Err(error(
                Some(name),
                &proof_line,
                Diagnostic::MissingProofExpression(name.to_owned()),
            ));
        }

        theorems.push(Theorem {
            name: name.to_owned(),
            signature: signature.to_owned(),
            proof: proof.to_owned(),
            line_number: line.number,
            signature_span: sub_span(&line, signature),
            proof_span: sub_span(&proof_line, proof),
        });
    }

    Ok(theorems)
}
