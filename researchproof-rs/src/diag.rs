//! Datatypes to represent the failures reported while reading and checking
//! proof scripts.
//!
//! [`Diagnostic`] is the one closed enum every stage reports through, with
//! nested enums for the two stages which have many distinct failure modes
//! (parsing and evaluation).  [`CheckError`] attaches a diagnostic to the
//! theorem and source location it was found at, and knows how to render itself
//! as an annotated source snippet.

use crate::line_cache::LineCache;
use crate::script::{SourceInfo, Span};
use annotate_snippets::{Level, Message, Snippet};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io;
use typed_arena::Arena;

/// Grammar violations in signatures and proof terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input ran out in the middle of a production.
    UnexpectedEnd,
    /// A specific token was required.
    Expected {
        /// Spelling of what was required.
        expected: &'static str,
        /// Spelling of what was found.
        found: String,
    },
    /// A token which cannot start a type or term.
    UnexpectedToken(String),
    /// A complete parse left tokens behind.
    TrailingToken(String),
    /// An identifier which starts with a digit.
    BadIdentifier(String),
    /// An application whose head is not a plain name, e.g. `(f x) y`.
    BadApplication(String),
    /// Two parameters of one signature share a name.
    DuplicateParameter(String),
    /// A parameter or lambda binder spelled like a constant.
    UppercaseBinder(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEnd => f.write_str("unexpected end of input"),
            ParseError::Expected { expected, found } => {
                write!(f, "expected '{expected}', got '{found}'")
            }
            ParseError::UnexpectedToken(token) => write!(f, "unexpected token '{token}'"),
            ParseError::TrailingToken(token) => {
                write!(f, "unexpected token '{token}' after a complete expression")
            }
            ParseError::BadIdentifier(name) => {
                write!(f, "'{name}' is not a valid identifier")
            }
            ParseError::BadApplication(head) => {
                write!(f, "'{head}' cannot be applied; application heads must be names")
            }
            ParseError::DuplicateParameter(name) => {
                write!(f, "parameter '{name}' is declared more than once")
            }
            ParseError::UppercaseBinder(name) => {
                write!(f, "'{name}' cannot be bound; bound names start in lowercase")
            }
        }
    }
}

impl Error for ParseError {}

/// Failures of the definitional-equality evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Application of a name which is neither bound nor a builtin.
    UnknownFunction(String),
    /// A constant with no value, e.g. `Foo`.
    UnknownConstant(String),
    /// A value of the named kind was used as a function.
    NotCallable(&'static str),
    /// A builtin applied to the wrong number of arguments.
    Arity {
        /// The builtin.
        function: String,
        /// Its arity.
        expected: usize,
        /// Number of arguments supplied.
        found: usize,
    },
    /// A builtin applied to a value of the wrong kind.
    TypeMismatch {
        /// The builtin.
        function: String,
        /// Kind of value required.
        expected: &'static str,
        /// Kind of value supplied.
        found: &'static str,
    },
    /// A natural number result does not fit the evaluator's representation.
    Overflow(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnknownFunction(name) => write!(f, "unknown function '{name}'"),
            EvalError::UnknownConstant(name) => write!(f, "unknown constant '{name}'"),
            EvalError::NotCallable(kind) => {
                write!(f, "a {kind} value cannot be used as a function")
            }
            EvalError::Arity {
                function,
                expected,
                found,
            } => write!(
                f,
                "'{function}' takes {expected} argument(s) but was given {found}"
            ),
            EvalError::TypeMismatch {
                function,
                expected,
                found,
            } => write!(f, "'{function}' expected a {expected} but was given a {found}"),
            EvalError::Overflow(function) => {
                write!(f, "result of '{function}' is too large to evaluate")
            }
        }
    }
}

impl Error for EvalError {}

/// The classes of failure a caller may want to tell apart.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unrecognized character.
    Lex,
    /// Grammar violation.
    Parse,
    /// Evaluation failure.
    Eval,
    /// A `Refl` proof did not go through.
    ProofFailed,
    /// The proof text is not a lemma reference.
    UnsupportedProof,
    /// The proof names a lemma which is not in the catalog.
    UnknownLemma,
    /// The theorem is not an instance of the lemma it cites.
    SignatureMismatch,
    /// The script does not follow the `theorem` / `proof` line structure.
    Script,
    /// The script could not be read.
    Io,
}

/// List of all diagnostics.
///
/// Every failure aborts checking of the current theorem and, in a batch, the
/// whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Diagnostic {
    BadCharacter(usize, char),
    Parse(ParseError),
    Eval(EvalError),
    ReflNotEquality,
    ReflStuck(String),
    ReflMismatch(String, String),
    UnsupportedProof(String),
    UnknownLemma(String),
    SignatureMismatch(String),
    ExpectedTheorem(String),
    MissingColon,
    MissingTheoremName,
    MissingSignature,
    ExpectedProof(String, String),
    MissingProof(String),
    MissingProofExpression(String),
    IoError(String),
}
use self::Diagnostic::*;

impl From<io::Error> for Diagnostic {
    fn from(err: io::Error) -> Diagnostic {
        IoError(format!("{err}"))
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic::Parse(err)
    }
}

impl From<EvalError> for Diagnostic {
    fn from(err: EvalError) -> Self {
        Diagnostic::Eval(err)
    }
}

impl Diagnostic {
    /// Which class of failure this is.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        match self {
            BadCharacter(..) => DiagnosticKind::Lex,
            Parse(_) => DiagnosticKind::Parse,
            Eval(_) => DiagnosticKind::Eval,
            ReflNotEquality | ReflStuck(_) | ReflMismatch(..) => DiagnosticKind::ProofFailed,
            UnsupportedProof(_) => DiagnosticKind::UnsupportedProof,
            UnknownLemma(_) => DiagnosticKind::UnknownLemma,
            SignatureMismatch(_) => DiagnosticKind::SignatureMismatch,
            ExpectedTheorem(_)
            | MissingColon
            | MissingTheoremName
            | MissingSignature
            | ExpectedProof(..)
            | MissingProof(_)
            | MissingProofExpression(_) => DiagnosticKind::Script,
            IoError(_) => DiagnosticKind::Io,
        }
    }

    /// A short title for the diagnostic.
    #[must_use]
    pub fn label(&self) -> Cow<'static, str> {
        match self {
            BadCharacter(..) => "Invalid character",
            Parse(_) => "Parse error",
            Eval(_) => "Evaluation error",
            ReflNotEquality | ReflStuck(_) | ReflMismatch(..) => "Proof failed",
            UnsupportedProof(_) => "Unsupported proof",
            UnknownLemma(_) => "Unknown lemma",
            SignatureMismatch(_) => "Signature mismatch",
            ExpectedTheorem(_) | MissingColon | MissingTheoremName | MissingSignature => {
                "Malformed theorem declaration"
            }
            ExpectedProof(..) | MissingProof(_) | MissingProofExpression(_) => "Malformed proof",
            IoError(_) => "I/O error",
        }
        .into()
    }

    fn notes(&self) -> &'static [&'static str] {
        match self {
            ReflNotEquality => &["Refl can only prove equality signatures"],
            ReflStuck(_) => &["terms containing free variables cannot be reduced; \
                cite a lemma from the catalog instead"],
            UnsupportedProof(_) => &["use Refl or a lemma name"],
            ExpectedTheorem(_) => &["declarations have the form: theorem <name> : <type>"],
            ExpectedProof(..) | MissingProof(_) => {
                &["each theorem must be followed by a line of the form: proof <expression>"]
            }
            _ => &[],
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadCharacter(_, ch) => write!(f, "unexpected character '{ch}'"),
            Parse(err) => write!(f, "{err}"),
            Eval(err) => write!(f, "{err}"),
            ReflNotEquality => f.write_str("Refl can only prove equality signatures"),
            ReflStuck(term) => write!(f, "Refl failed: '{term}' does not reduce to a value"),
            ReflMismatch(left, right) => {
                write!(f, "Refl failed: {left} does not normalize to {right}")
            }
            UnsupportedProof(proof) => write!(
                f,
                "unsupported proof expression '{proof}'; use Refl or a lemma name"
            ),
            UnknownLemma(name) => write!(f, "unknown lemma '{name}'"),
            SignatureMismatch(name) => {
                write!(f, "theorem signature does not match lemma '{name}'")
            }
            ExpectedTheorem(line) => {
                write!(f, "expected 'theorem <name> : <type>', got: {line}")
            }
            MissingColon => f.write_str("missing ':' in theorem declaration"),
            MissingTheoremName => f.write_str("missing theorem name"),
            MissingSignature => f.write_str("missing theorem signature"),
            ExpectedProof(name, line) => write!(
                f,
                "expected 'proof <expression>' after theorem '{name}', got: {line}"
            ),
            MissingProof(name) => write!(f, "missing proof for theorem '{name}'"),
            MissingProofExpression(name) => {
                write!(f, "missing proof expression for theorem '{name}'")
            }
            IoError(err) => write!(f, "{err}"),
        }
    }
}

impl Error for Diagnostic {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Parse(err) => Some(err),
            Eval(err) => Some(err),
            _ => None,
        }
    }
}

/// A diagnostic located at a theorem in a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    /// The theorem being read or checked, if its name is known.
    pub theorem: Option<String>,
    /// 1-based line of the theorem declaration (or offending line); 0 if
    /// unknown.
    pub line_number: u32,
    /// Byte range within the source to annotate; may be [`Span::NULL`].
    pub span: Span,
    /// What went wrong.
    pub diagnostic: Diagnostic,
}

impl CheckError {
    /// The class of the underlying diagnostic.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        self.diagnostic.kind()
    }

    /// Creates an annotated snippet for this error against the source it was
    /// read from, and passes it to `f`.
    ///
    /// The snippet only borrows for the duration of the call, hence the
    /// continuation-passing style.
    pub fn to_snippet<T>(
        &self,
        source: &SourceInfo,
        lc: &mut LineCache,
        f: impl for<'a> FnOnce(Message<'a>) -> T,
    ) -> T {
        let arena: Arena<String> = Arena::new();
        let label = self.diagnostic.label();
        let title: &str = match &self.theorem {
            Some(name) => arena.alloc(format!("{label} in theorem '{name}'")).as_str(),
            None => label.as_ref(),
        };
        let footers = self
            .diagnostic
            .notes()
            .iter()
            .map(|note| Level::Note.title(note));
        let message = Level::Error.title(title).footers(footers);

        let text = source.text.as_str();
        if self.span.is_null() || self.span.end as usize > text.len() {
            let detail = arena.alloc(format!("{}", self.diagnostic));
            return f(message.footer(Level::Info.title(detail)));
        }

        let offs = self.span.start as usize;
        let end_offs = self.span.end as usize;
        let (line_start, col) = lc.from_offset(text, offs);
        let source_start = offs + 1 - col as usize;
        let source_end = LineCache::line_end(text, end_offs.max(offs));
        let annotation = Level::Error
            .span(offs - source_start..end_offs - source_start)
            .label(arena.alloc(format!("{}", self.diagnostic)));
        let snippet = Snippet::source(&text[source_start..source_end])
            .line_start(line_start as usize)
            .origin(source.name.as_str())
            .fold(true)
            .annotation(annotation);
        f(message.snippet(snippet))
    }

}

impl From<Diagnostic> for CheckError {
    /// A diagnostic with no theorem or location attached.
    fn from(diagnostic: Diagnostic) -> Self {
        CheckError {
            theorem: None,
            line_number: 0,
            span: Span::NULL,
            diagnostic,
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.theorem, self.line_number) {
            (Some(name), 0) => write!(f, "theorem '{name}': {}", self.diagnostic),
            (Some(name), line) => {
                write!(f, "theorem '{name}' (line {line}): {}", self.diagnostic)
            }
            (None, 0) => write!(f, "{}", self.diagnostic),
            (None, line) => write!(f, "line {line}: {}", self.diagnostic),
        }
    }
}

impl Error for CheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.diagnostic)
    }
}
