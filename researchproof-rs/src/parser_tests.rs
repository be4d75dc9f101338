use crate::diag::{Diagnostic, ParseError};
use crate::lexer::{tokenize, Token};
use crate::normalize::alpha_equivalent;
use crate::parser::{parse_signature, parse_term, parse_type};
use crate::syntax::{Param, Signature, Term, TypeExpr};
use assert_matches::assert_matches;

fn var(name: &str) -> Term {
    Term::Var(name.to_owned())
}

fn cons(name: &str) -> Term {
    Term::Const(name.to_owned())
}

fn app(name: &str, args: Vec<Term>) -> Term {
    Term::App(name.to_owned(), args)
}

fn nat() -> TypeExpr {
    TypeExpr::Const("Nat".to_owned())
}

#[test]
fn test_tokenize() {
    use Token::*;
    assert_eq!(
        tokenize("(n : Nat) -> plus n Z = n").unwrap(),
        vec![
            LParen,
            Ident("n"),
            Colon,
            Ident("Nat"),
            RParen,
            Arrow,
            Ident("plus"),
            Ident("n"),
            Ident("Z"),
            Equals,
            Ident("n"),
        ]
    );
    assert_eq!(
        tokenize(r"map (\x => S x) Nil").unwrap(),
        vec![
            Ident("map"),
            LParen,
            Lambda,
            Ident("x"),
            FatArrow,
            Ident("S"),
            Ident("x"),
            RParen,
            Ident("Nil"),
        ]
    );
    // doubled backslash is one lambda marker
    assert_eq!(
        tokenize(r"\\y=>y").unwrap(),
        vec![Lambda, Ident("y"), FatArrow, Ident("y")]
    );
    assert_eq!(tokenize("a,b").unwrap(), vec![Ident("a"), Comma, Ident("b")]);
    assert!(tokenize("  \n\t").unwrap().is_empty());
}

#[test]
fn test_tokenize_identifiers() {
    assert_eq!(
        tokenize("snake_case x1 _y").unwrap(),
        vec![Token::Ident("snake_case"), Token::Ident("x1"), Token::Ident("_y")]
    );
}

#[test]
fn test_tokenize_bad_character() {
    assert_eq!(tokenize("plus n + m"), Err(Diagnostic::BadCharacter(7, '+')));
    assert_matches!(tokenize("a -> b; c"), Err(Diagnostic::BadCharacter(6, ';')));
    // a lone '-' is not an arrow
    assert_matches!(tokenize("a - b"), Err(Diagnostic::BadCharacter(2, '-')));
}

#[test]
fn test_signature_single_param() {
    let signature = parse_signature("(n : Nat) -> plus n Z = n").unwrap();
    assert_eq!(
        signature,
        Signature {
            params: vec![Param {
                name: "n".to_owned(),
                type_expr: nat(),
            }],
            result: TypeExpr::Equality(app("plus", vec![var("n"), cons("Z")]), var("n")),
        }
    );
}

#[test]
fn test_signature_anonymous_params() {
    let signature = parse_signature("(n : Nat) -> Nat -> Nat").unwrap();
    assert_eq!(signature.params.len(), 2);
    assert_eq!(signature.params[0].name, "n");
    assert!(!signature.params[0].is_anonymous());
    assert_eq!(signature.params[1].name, "_param_0");
    assert!(signature.params[1].is_anonymous());
    assert_eq!(signature.params[1].type_expr, nat());
    assert_eq!(signature.result, nat());
}

#[test]
fn test_signature_parenthesized_anonymous_param() {
    let signature = parse_signature("(Nat -> Nat) -> Nat").unwrap();
    assert_eq!(signature.params.len(), 1);
    assert_eq!(
        signature.params[0].type_expr,
        TypeExpr::Arrow(Box::new(nat()), Box::new(nat()))
    );
}

#[test]
fn test_signature_without_params() {
    let signature = parse_signature("plus (S Z) Z = S Z").unwrap();
    assert!(signature.params.is_empty());
    assert_eq!(
        signature.result,
        TypeExpr::Equality(
            app("plus", vec![app("S", vec![cons("Z")]), cons("Z")]),
            app("S", vec![cons("Z")]),
        )
    );
}

#[test]
fn test_type_application() {
    let signature = parse_signature("(xs : List (List a)) -> (f : a -> b) -> List b").unwrap();
    assert_eq!(
        signature.params[0].type_expr,
        TypeExpr::App(
            "List".to_owned(),
            vec![TypeExpr::App(
                "List".to_owned(),
                vec![TypeExpr::Var("a".to_owned())]
            )]
        )
    );
    assert_eq!(
        signature.params[1].type_expr,
        TypeExpr::Arrow(
            Box::new(TypeExpr::Var("a".to_owned())),
            Box::new(TypeExpr::Var("b".to_owned()))
        )
    );
    assert_eq!(
        signature.result,
        TypeExpr::App("List".to_owned(), vec![TypeExpr::Var("b".to_owned())])
    );
}

#[test]
fn test_uppercase_is_constant() {
    // not one of the registered type constants, but still a constant
    assert_eq!(
        parse_type("Vect").unwrap(),
        TypeExpr::Const("Vect".to_owned())
    );
    assert_eq!(parse_term("Foo").unwrap(), cons("Foo"));
    assert_eq!(parse_term("foo").unwrap(), var("foo"));
}

#[test]
fn test_equality_inside_parentheses() {
    let signature = parse_signature("(n : Nat) -> (plus n Z = n) -> Nat").unwrap();
    assert_eq!(signature.params.len(), 2);
    assert_matches!(signature.params[1].type_expr, TypeExpr::Equality(..));
    assert_eq!(signature.result, nat());
}

#[test]
fn test_equality_after_arrow() {
    let signature = parse_signature("Nat -> double Z = Z").unwrap();
    assert_eq!(signature.params.len(), 1);
    assert_matches!(signature.result, TypeExpr::Equality(..));
}

#[test]
fn test_lambda_terms() {
    assert_eq!(
        parse_term(r"map (\x => S x) xs").unwrap(),
        app(
            "map",
            vec![
                Term::Lambda("x".to_owned(), Box::new(app("S", vec![var("x")]))),
                var("xs"),
            ]
        )
    );
    assert_eq!(
        parse_term(r"\x => \y => plus x y").unwrap(),
        Term::Lambda(
            "x".to_owned(),
            Box::new(Term::Lambda(
                "y".to_owned(),
                Box::new(app("plus", vec![var("x"), var("y")]))
            ))
        )
    );
}

#[test]
fn test_application_is_flat() {
    assert_eq!(
        parse_term("plus (mult a b) c").unwrap(),
        app("plus", vec![app("mult", vec![var("a"), var("b")]), var("c")])
    );
}

#[test]
fn test_parse_errors() {
    assert_matches!(
        parse_signature("(n : Nat) ->"),
        Err(Diagnostic::Parse(ParseError::UnexpectedEnd))
    );
    assert_matches!(
        parse_signature("(n : Nat) -> n = n )"),
        Err(Diagnostic::Parse(ParseError::TrailingToken(_)))
    );
    assert_matches!(
        parse_signature("(n : Nat -> n = n"),
        Err(Diagnostic::Parse(_))
    );
    assert_matches!(
        parse_signature("(n : Nat) (m : Nat) -> n = m"),
        Err(Diagnostic::Parse(_))
    );
    assert_matches!(
        parse_term("(f x) y"),
        Err(Diagnostic::Parse(ParseError::BadApplication(_)))
    );
    assert_matches!(
        parse_term(r"\(x) => x"),
        Err(Diagnostic::Parse(ParseError::Expected { expected: "identifier", .. }))
    );
    assert_matches!(
        parse_term(r"\x -> x"),
        Err(Diagnostic::Parse(ParseError::Expected { expected: "=>", .. }))
    );
    assert_matches!(
        parse_term("1x"),
        Err(Diagnostic::Parse(ParseError::BadIdentifier(_)))
    );
    assert_matches!(
        parse_signature("a = b = c"),
        Err(Diagnostic::Parse(ParseError::TrailingToken(_)))
    );
    assert_matches!(parse_signature("n + 1 = n"), Err(Diagnostic::BadCharacter(2, '+')));
}

#[test]
fn test_duplicate_parameter() {
    assert_eq!(
        parse_signature("(n : Nat) -> (n : Nat) -> n = n"),
        Err(Diagnostic::Parse(ParseError::DuplicateParameter(
            "n".to_owned()
        )))
    );
    assert_matches!(
        parse_signature("(_param_0 : Nat) -> Nat -> Nat"),
        Err(Diagnostic::Parse(ParseError::DuplicateParameter(_)))
    );
}

#[test]
fn test_constants_cannot_be_bound() {
    // every use of `S` in the body would be the successor constant
    assert_eq!(
        parse_term(r"map (\S => S) (Cons Z Nil)"),
        Err(Diagnostic::Parse(ParseError::UppercaseBinder(
            "S".to_owned()
        )))
    );
    assert_matches!(
        parse_signature(r"(xs : List Nat) -> map (\Nil => Z) xs = xs"),
        Err(Diagnostic::Parse(ParseError::UppercaseBinder(_)))
    );
    assert_matches!(
        parse_signature("(Z : Nat) -> Z = Z"),
        Err(Diagnostic::Parse(ParseError::UppercaseBinder(_)))
    );
    assert_matches!(parse_term(r"\x => x"), Ok(Term::Lambda(..)));
}

#[test]
fn test_print_reparse() {
    for text in [
        "(n : Nat) -> plus n Z = n",
        "(n : Nat) -> Nat -> Nat",
        "(Nat -> Nat) -> Nat",
        "(xs : List (List a)) -> length (concat xs) = length xs",
        r"(xs : List Nat) -> map (\x => plus x Z) xs = xs",
        "(f : a -> b) -> (h : plus Z Z = Z) -> (plus Z Z = Z) -> Bool",
        "ifThenElse (isZero (pred (S Z))) (Cons Z Nil) Nil = Cons Z Nil",
        r"(\x => x) = \y => y",
    ] {
        let signature = parse_signature(text).unwrap();
        let printed = signature.to_string();
        let reparsed = parse_signature(&printed)
            .unwrap_or_else(|err| panic!("{printed:?} does not reparse: {err}"));
        assert!(
            alpha_equivalent(&signature, &reparsed),
            "{text:?} printed as {printed:?}"
        );
    }
}

#[test]
fn test_print_forms() {
    assert_eq!(
        parse_signature("(n:Nat)->Nat->plus n (S Z)=S n")
            .unwrap()
            .to_string(),
        "(n : Nat) -> Nat -> plus n (S Z) = S n"
    );
    assert_eq!(
        parse_term(r"map (\x=>x) (Cons Z Nil)").unwrap().to_string(),
        r"map (\x => x) (Cons Z Nil)"
    );
}
