//! Recursive-descent parser for signatures and proof terms.
//!
//! The two grammars share a token cursor and the term sub-grammar: an
//! equality type is simply two terms around a top-level `=`.
//!
//! ```text
//! signature     := ( "(" IDENT ":" type_expr ")" "->" )* type_expr
//! type_expr     := equality_type | arrow_type
//! arrow_type    := type_app ( "->" type_expr )?
//! type_app      := type_atom type_atom*
//! type_atom     := "(" type_expr ")" | IDENT
//! equality_type := term "=" term
//! term          := term_atom term_atom*
//! term_atom     := "(" term ")" | "\" IDENT "=>" term | IDENT
//! ```
//!
//! Application in both grammars is flat: a head name followed by an argument
//! list, never a curried chain of binary applications.

use crate::diag::{Diagnostic, ParseError};
use crate::lexer::{tokenize, Token};
use crate::syntax::{Param, Signature, Term, TypeExpr, ANONYMOUS_PARAM_PREFIX};
use crate::util::HashSet;

/// Type names which are constants whatever their spelling.
pub const TYPE_CONSTS: &[&str] = &["Nat", "Bool", "Type", "List"];

/// The 0-ary term constants.
pub const TERM_CONSTS: &[&str] = &["Z", "True", "False", "Nil"];

/// Identifier check applied on top of the lexer's character classes: a name
/// may not start with a digit.
#[must_use]
pub fn is_valid_ident(name: &str) -> bool {
    name.chars().next().is_some_and(|ch| !ch.is_ascii_digit())
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Whether `name` parses as a type constant rather than a type variable.
pub(crate) fn is_type_const(name: &str) -> bool {
    TYPE_CONSTS.contains(&name) || starts_uppercase(name)
}

fn is_term_const(name: &str) -> bool {
    TERM_CONSTS.contains(&name) || starts_uppercase(name)
}

/// A cursor over a token sequence.
///
/// Parse functions take the cursor by exclusive reference and leave it just
/// past whatever they consumed.
#[derive(Debug)]
pub(crate) struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
    index: usize,
}

impl<'a> TokenStream<'a> {
    pub(crate) fn new(text: &'a str) -> Result<Self, Diagnostic> {
        Ok(TokenStream {
            tokens: tokenize(text)?,
            index: 0,
        })
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<Token<'a>> {
        self.tokens.get(self.index + n).copied()
    }

    fn next(&mut self) -> Result<Token<'a>, ParseError> {
        let token = self.peek().ok_or(ParseError::UnexpectedEnd)?;
        self.index += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token<'static>) -> Result<(), ParseError> {
        match self.next()? {
            token if token == expected => Ok(()),
            token => Err(ParseError::Expected {
                expected: expected.as_str(),
                found: token.to_string(),
            }),
        }
    }

    fn ident(&mut self) -> Result<&'a str, ParseError> {
        match self.next()? {
            Token::Ident(name) if is_valid_ident(name) => Ok(name),
            Token::Ident(name) => Err(ParseError::BadIdentifier(name.to_owned())),
            token => Err(ParseError::Expected {
                expected: "identifier",
                found: token.to_string(),
            }),
        }
    }

    /// A name introduced by a parameter or lambda.  Constants cannot be
    /// bound, since every later use of them would parse as the constant.
    fn binder(&mut self) -> Result<&'a str, ParseError> {
        match self.ident()? {
            name if is_term_const(name) => Err(ParseError::UppercaseBinder(name.to_owned())),
            name => Ok(name),
        }
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(ParseError::TrailingToken(token.to_string())),
        }
    }

    /// Scans ahead within the current bracket level for a `=` which comes
    /// before any `->`.
    fn has_top_level_equals(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.index..] {
            match token {
                Token::LParen => depth += 1,
                Token::RParen if depth == 0 => return false,
                Token::RParen => depth -= 1,
                Token::Equals if depth == 0 => return true,
                Token::Arrow if depth == 0 => return false,
                _ => {}
            }
        }
        false
    }

    fn starts_explicit_param(&self) -> bool {
        matches!(
            (self.peek(), self.peek_nth(1), self.peek_nth(2)),
            (Some(Token::LParen), Some(Token::Ident(_)), Some(Token::Colon))
        )
    }

    fn type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        if self.has_top_level_equals() {
            return self.equality_type();
        }
        let left = self.type_app()?;
        if self.peek() == Some(Token::Arrow) {
            self.next()?;
            let right = self.type_expr()?;
            return Ok(TypeExpr::Arrow(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn type_app(&mut self) -> Result<TypeExpr, ParseError> {
        let base = self.type_atom()?;
        let mut args = vec![];
        while let Some(token) = self.peek() {
            if matches!(token, Token::RParen | Token::Arrow | Token::Equals) {
                break;
            }
            args.push(self.type_atom()?);
        }
        if args.is_empty() {
            return Ok(base);
        }
        match base {
            TypeExpr::Const(name) | TypeExpr::Var(name) => Ok(TypeExpr::App(name, args)),
            _ => Err(ParseError::BadApplication(base.to_string())),
        }
    }

    fn type_atom(&mut self) -> Result<TypeExpr, ParseError> {
        match self.peek().ok_or(ParseError::UnexpectedEnd)? {
            Token::LParen => {
                self.next()?;
                let inner = self.type_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(_) => {
                let name = self.ident()?;
                if is_type_const(name) {
                    Ok(TypeExpr::Const(name.to_owned()))
                } else {
                    Ok(TypeExpr::Var(name.to_owned()))
                }
            }
            token => Err(ParseError::UnexpectedToken(token.to_string())),
        }
    }

    fn equality_type(&mut self) -> Result<TypeExpr, ParseError> {
        let left = self.term()?;
        self.expect(Token::Equals)?;
        let right = self.term()?;
        Ok(TypeExpr::Equality(left, right))
    }

    fn term(&mut self) -> Result<Term, ParseError> {
        let head = self.term_atom()?;
        let mut args = vec![];
        while let Some(token) = self.peek() {
            if matches!(
                token,
                Token::RParen | Token::Equals | Token::Arrow | Token::Comma
            ) {
                break;
            }
            args.push(self.term_atom()?);
        }
        if args.is_empty() {
            return Ok(head);
        }
        match head {
            Term::Var(name) | Term::Const(name) => Ok(Term::App(name, args)),
            _ => Err(ParseError::BadApplication(head.to_string())),
        }
    }

    fn term_atom(&mut self) -> Result<Term, ParseError> {
        match self.peek().ok_or(ParseError::UnexpectedEnd)? {
            Token::LParen => {
                self.next()?;
                let inner = self.term()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Lambda => {
                self.next()?;
                let param = self.binder()?;
                self.expect(Token::FatArrow)?;
                let body = self.term()?;
                Ok(Term::Lambda(param.to_owned(), Box::new(body)))
            }
            Token::Ident(_) => {
                let name = self.ident()?;
                if is_term_const(name) {
                    Ok(Term::Const(name.to_owned()))
                } else {
                    Ok(Term::Var(name.to_owned()))
                }
            }
            token => Err(ParseError::UnexpectedToken(token.to_string())),
        }
    }

    fn signature(&mut self) -> Result<Signature, ParseError> {
        let mut params = vec![];
        let mut seen = HashSet::default();

        while self.starts_explicit_param() {
            self.expect(Token::LParen)?;
            let name = self.binder()?;
            self.expect(Token::Colon)?;
            let type_expr = self.type_expr()?;
            self.expect(Token::RParen)?;
            self.expect(Token::Arrow)?;
            if !seen.insert(name) {
                return Err(ParseError::DuplicateParameter(name.to_owned()));
            }
            params.push(Param {
                name: name.to_owned(),
                type_expr,
            });
        }

        let residual = self.type_expr()?;
        self.finish()?;

        let (anonymous, result) = residual.flatten_arrow();
        for (idx, type_expr) in anonymous.into_iter().enumerate() {
            let name = format!("{ANONYMOUS_PARAM_PREFIX}{idx}");
            if seen.contains(name.as_str()) {
                return Err(ParseError::DuplicateParameter(name));
            }
            params.push(Param { name, type_expr });
        }

        Ok(Signature { params, result })
    }
}

/// Parse the text of a theorem or lemma signature.
///
/// # Errors
///
/// Fails with [`Diagnostic::BadCharacter`] if the text does not tokenize, and
/// with [`Diagnostic::Parse`] on any grammar violation, including tokens left
/// over after a complete signature.
pub fn parse_signature(text: &str) -> Result<Signature, Diagnostic> {
    let mut stream = TokenStream::new(text)?;
    Ok(stream.signature()?)
}

/// Parse a complete term, as written in a proof.
///
/// # Errors
///
/// As for [`parse_signature`].
pub fn parse_term(text: &str) -> Result<Term, Diagnostic> {
    let mut stream = TokenStream::new(text)?;
    let term = stream.term()?;
    stream.finish()?;
    Ok(term)
}

/// Parse a complete type expression.
///
/// # Errors
///
/// As for [`parse_signature`].
pub fn parse_type(text: &str) -> Result<TypeExpr, Diagnostic> {
    let mut stream = TokenStream::new(text)?;
    let type_expr = stream.type_expr()?;
    stream.finish()?;
    Ok(type_expr)
}
