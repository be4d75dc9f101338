use crate::diag::{CheckError, Diagnostic, DiagnosticKind};
use crate::line_cache::LineCache;
use crate::script::{parse_script, Span, Theorem};
use assert_matches::assert_matches;

fn slice(text: &str, span: Span) -> &str {
    &text[span.start as usize..span.end as usize]
}

fn script_error(text: &str) -> CheckError {
    match parse_script(text) {
        Ok(theorems) => panic!("{text:?} parsed as {theorems:?}"),
        Err(err) => err,
    }
}

#[test]
fn test_single_theorem() {
    let text = "
        theorem plus_zero_right : (n : Nat) -> plus n Z = n
        proof plusZeroRight n
        ";
    let theorems = parse_script(text).unwrap();
    assert_eq!(theorems.len(), 1);
    let theorem = &theorems[0];
    assert_eq!(theorem.name, "plus_zero_right");
    assert_eq!(theorem.signature, "(n : Nat) -> plus n Z = n");
    assert_eq!(theorem.proof, "plusZeroRight n");
    assert_eq!(theorem.line_number, 2);
    assert_eq!(slice(text, theorem.signature_span), theorem.signature);
    assert_eq!(slice(text, theorem.proof_span), theorem.proof);
}

#[test]
fn test_several_theorems() {
    let text = "theorem a : plus Z Z = Z\nproof Refl\n\ntheorem b:Nat->Nat\n\nproof   lemma   x\n";
    let theorems = parse_script(text).unwrap();
    assert_eq!(
        theorems
            .iter()
            .map(|theorem| (theorem.name.as_str(), theorem.line_number))
            .collect::<Vec<_>>(),
        vec![("a", 1), ("b", 4)]
    );
    assert_eq!(theorems[1].signature, "Nat->Nat");
    assert_eq!(theorems[1].proof, "lemma   x");
    assert_eq!(slice(text, theorems[1].proof_span), "lemma   x");
}

#[test]
fn test_comments_and_blank_lines() {
    let text = "# header\n\n  # indented comment\ntheorem t : plus Z Z = Z # trailing\nproof Refl # by computation\n# done\n";
    let theorems = parse_script(text).unwrap();
    assert_eq!(theorems.len(), 1);
    assert_eq!(theorems[0].signature, "plus Z Z = Z");
    assert_eq!(theorems[0].proof, "Refl");
    assert_eq!(theorems[0].line_number, 4);
    assert_eq!(slice(text, theorems[0].signature_span), "plus Z Z = Z");
    assert_eq!(slice(text, theorems[0].proof_span), "Refl");

    assert!(parse_script("").unwrap().is_empty());
    assert!(parse_script("# nothing here\n\n").unwrap().is_empty());
}

#[test]
fn test_crlf_line_endings() {
    let text = "theorem t : Z = Z\r\nproof Refl\r\n";
    let theorems = parse_script(text).unwrap();
    assert_eq!(theorems[0].signature, "Z = Z");
    assert_eq!(theorems[0].proof, "Refl");
    assert_eq!(slice(text, theorems[0].proof_span), "Refl");
}

#[test]
fn test_requires_theorem_prefix() {
    let text = "
        theorem plus_zero_right : (n : Nat) -> plus n Z = n
        proof plusZeroRight n
        bad line
        ";
    let err = script_error(text);
    assert_eq!(err.diagnostic, Diagnostic::ExpectedTheorem("bad line".to_owned()));
    assert_eq!(err.theorem, None);
    assert_eq!(err.line_number, 4);
    assert_eq!(err.kind(), DiagnosticKind::Script);
    assert_eq!(slice(text, err.span), "bad line");
    assert_eq!(
        err.to_string(),
        "line 4: expected 'theorem <name> : <type>', got: bad line"
    );

    assert_matches!(
        script_error("proof Refl").diagnostic,
        Diagnostic::ExpectedTheorem(_)
    );
    assert_matches!(
        script_error("theorem").diagnostic,
        Diagnostic::ExpectedTheorem(_)
    );
}

#[test]
fn test_requires_proof_line() {
    let err = script_error("theorem missing_proof : (n : Nat) -> n = n");
    assert_eq!(
        err.diagnostic,
        Diagnostic::MissingProof("missing_proof".to_owned())
    );
    assert_eq!(err.theorem.as_deref(), Some("missing_proof"));
    assert_eq!(err.line_number, 1);

    let err = script_error("theorem a : Nat\ntheorem b : Nat\nproof x\n");
    assert_eq!(
        err.diagnostic,
        Diagnostic::ExpectedProof("a".to_owned(), "theorem b : Nat".to_owned())
    );
    assert_eq!(err.line_number, 2);

    for text in ["theorem a : Nat\nproof\n", "theorem a : Nat\nproof   # empty\n"] {
        assert_eq!(
            script_error(text).diagnostic,
            Diagnostic::MissingProofExpression("a".to_owned())
        );
    }
}

#[test]
fn test_malformed_declarations() {
    assert_eq!(
        script_error("theorem no_colon Nat\nproof Refl").diagnostic,
        Diagnostic::MissingColon
    );
    assert_eq!(
        script_error("theorem : Nat\nproof Refl").diagnostic,
        Diagnostic::MissingTheoremName
    );
    let err = script_error("theorem t :   \nproof Refl");
    assert_eq!(err.diagnostic, Diagnostic::MissingSignature);
    assert_eq!(err.theorem.as_deref(), Some("t"));
}

#[test]
fn test_signature_keeps_later_colons() {
    let theorems = parse_script("theorem t : (n : Nat) -> Nat\nproof f\n").unwrap();
    assert_eq!(theorems[0].name, "t");
    assert_eq!(theorems[0].signature, "(n : Nat) -> Nat");
}

#[test]
fn test_theorem_new() {
    let theorem = Theorem::new("t", "Z = Z", "Refl", 7);
    assert_eq!(theorem.line_number, 7);
    assert!(theorem.signature_span.is_null());
    assert!(theorem.proof_span.is_null());
}

#[test]
fn test_span() {
    let span = Span::new(4, 10);
    assert_eq!(span.len(), 6);
    assert!(!span.is_empty());
    assert!(!span.is_null());
    assert_eq!(span.skip(2), Span::new(6, 10));
    // skipping past the end keeps the whole span
    assert_eq!(span.skip(6), span);
    assert!(Span::NULL.is_null());
}

#[test]
fn test_line_cache() {
    let text = "theorem t : Z = Z\nproof Refl\n\nend";
    let mut lc = LineCache::default();
    assert_eq!(lc.from_offset(text, 0), (1, 1));
    assert_eq!(lc.from_offset(text, 12), (1, 13));
    assert_eq!(lc.from_offset(text, 18), (2, 1));
    assert_eq!(lc.from_offset(text, 30), (4, 1));
    assert_eq!(LineCache::line_end(text, 20), 28);
    assert_eq!(LineCache::line_end(text, 30), text.len());
}
