//! Tokenizer shared by the signature and proof-term grammars.
//!
//! The token set is tiny: identifiers plus a handful of
//! punctuation marks.  Identifiers are not classified here; deciding whether a
//! name is a constant or a variable is left to the parser, which knows which
//! grammar it is in.

use crate::diag::Diagnostic;
use std::fmt;

/// A single lexical unit, borrowing identifier text from the source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A maximal run of alphanumeric or underscore characters.
    Ident(&'a str),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `=`
    Equals,
    /// `->`
    Arrow,
    /// `=>`
    FatArrow,
    /// `\`, also written `\\` in scripts which were escaped once too often.
    Lambda,
}

impl<'a> Token<'a> {
    /// The source spelling of this token.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        match *self {
            Token::Ident(name) => name,
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Equals => "=",
            Token::Arrow => "->",
            Token::FatArrow => "=>",
            Token::Lambda => "\\",
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Split `text` into tokens.
///
/// Two-character operators are matched before their one-character prefixes.
///
/// # Errors
///
/// Returns [`Diagnostic::BadCharacter`] with the byte offset of the first
/// character which is neither whitespace, punctuation, nor part of an
/// identifier.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, Diagnostic> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }
        let rest = &text[pos..];
        let token = if rest.starts_with("->") {
            chars.next();
            Token::Arrow
        } else if rest.starts_with("=>") {
            chars.next();
            Token::FatArrow
        } else if rest.starts_with("\\\\") {
            chars.next();
            Token::Lambda
        } else {
            match ch {
                '\\' => Token::Lambda,
                '(' => Token::LParen,
                ')' => Token::RParen,
                ':' => Token::Colon,
                ',' => Token::Comma,
                '=' => Token::Equals,
                _ if is_ident_char(ch) => {
                    let mut end = pos + ch.len_utf8();
                    while let Some(&(next_pos, next)) = chars.peek() {
                        if !is_ident_char(next) {
                            break;
                        }
                        end = next_pos + next.len_utf8();
                        chars.next();
                    }
                    Token::Ident(&text[pos..end])
                }
                _ => return Err(Diagnostic::BadCharacter(pos, ch)),
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}
