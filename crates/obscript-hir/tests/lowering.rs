mod common;
use common::*;

use obscript_hir::hir::{BinaryOp, Expr};

fn first_expr_of(script: &Script, pred: impl Fn(&Expr) -> bool) -> Option<Expr> {
    let mut found = None;
    script.walk_exprs(&mut |expr| {
        if found.is_none() && pred(expr) {
            found = Some(expr.clone());
        }
    });
    found
}

#[test]
fn test_float_declaration_and_assignment() {
    let source = "ScriptName Test\nfloat f\nset f to 1.5\n";
    assert!(check_errors(source).is_empty());

    let script = lower_script(source);
    assert_eq!(script.name, "Test");
    assert_eq!(
        resolve(&script, script.scopes.root(), "f"),
        Some(("f".to_string(), ExprType::Float))
    );

    let [decl, set] = script.body.as_slice() else {
        panic!("expected two statements, got {:?}", script.body);
    };
    let StmtKind::VarDecl { symbol, init: None } = &decl.kind else {
        panic!("expected declaration");
    };
    let StmtKind::Set { target, value } = &set.kind else {
        panic!("expected set");
    };
    assert_eq!(
        target.kind,
        ExprKind::Name {
            name: "f".into(),
            symbol: Some(*symbol)
        }
    );
    assert_eq!(target.ty, ExprType::Float);
    assert_eq!(value.kind, ExprKind::Float(1.5));
}

#[test]
fn test_declaration_types() {
    let script = lower_script(
        "scn T\nshort a\nint b\nlong c\nfloat d\nref e\nstring_var s\narray_var arr\n",
    );
    let root = script.scopes.root();
    let types: Vec<_> = ["a", "b", "c", "d", "e", "s", "arr"]
        .iter()
        .map(|name| resolve(&script, root, name).unwrap().1)
        .collect();
    assert_eq!(
        types,
        [
            ExprType::Integer,
            ExprType::Integer,
            ExprType::Integer,
            ExprType::Float,
            ExprType::Reference,
            ExprType::String,
            ExprType::Array,
        ]
    );
}

#[test]
fn test_initializer_sees_outer_binding_only() {
    // The initializer is lowered before the name is declared.
    let script = lower_script("scn T\nint x := x + 1\n");
    let name = first_expr_of(&script, |expr| matches!(expr.kind, ExprKind::Name { .. }))
        .unwrap();
    assert_eq!(
        name.kind,
        ExprKind::Name {
            name: "x".into(),
            symbol: None
        }
    );
    assert_eq!(name.ty, ExprType::Ambiguous);
}

#[test]
fn test_unresolved_names_are_ambiguous() {
    let script = lower_script("scn T\nset SomeQuest.stage to 10\n");
    let base = first_expr_of(&script, |expr| matches!(expr.kind, ExprKind::Name { .. }))
        .unwrap();
    assert_eq!(base.ty, ExprType::Ambiguous);
}

#[test]
fn test_calls_and_arguments() {
    let script = lower_script("scn T\nint n\nbegin GameMode\nPrintC \"%g\" n\nend\n");
    let call = first_expr_of(&script, |expr| matches!(expr.kind, ExprKind::Call { .. }))
        .unwrap();
    let ExprKind::Call { name, symbol, args } = call.kind else {
        unreachable!();
    };
    assert_eq!(name, "PrintC");
    assert_eq!(symbol, None);
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].kind, ExprKind::String("%g".into()));
    assert_eq!(args[1].ty, ExprType::Integer);
}

#[test]
fn test_operator_precedence_survives_lowering() {
    let script = lower_script("scn T\nlet r := 1 + 2 * 3\n");
    let StmtKind::Let(expr) = &script.body[0].kind else {
        panic!("expected let");
    };
    let ExprKind::Binary {
        op: BinaryOp::Assign,
        rhs,
        ..
    } = &expr.kind
    else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { op, rhs: product, .. } = &rhs.kind else {
        panic!("expected sum");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        product.kind,
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_large_numbers() {
    let script = lower_script("scn T\nlet a := 99999999999999999999\nlet b := 0xFF\n");
    let mut numbers = Vec::new();
    script.walk_exprs(&mut |expr| match expr.kind {
        ExprKind::Integer(_) | ExprKind::Float(_) => numbers.push((expr.kind.clone(), expr.ty)),
        _ => {}
    });
    assert_eq!(
        numbers,
        [
            (ExprKind::Float(1e20), ExprType::Float),
            (ExprKind::Integer(255), ExprType::Integer),
        ]
    );
}

#[test]
fn test_if_chain_is_right_nested() {
    use obscript_hir::hir::Branch;

    let script = lower_script("scn T\nint a\nif a == 1\nelseif a == 2\nelse\nendif\n");
    let StmtKind::If {
        branch: Some(branch),
        ..
    } = &script.body[1].kind
    else {
        panic!("expected if with branches");
    };
    let Branch::ElseIf {
        next: Some(next), ..
    } = branch.as_ref()
    else {
        panic!("expected elseif");
    };
    assert!(matches!(next.as_ref(), Branch::Else { .. }));
}

#[test]
fn test_deeply_nested_input_lowers() {
    let source = format!(
        "scn T\nint x\nset x to {}1{}\nset x to 2\n",
        "(".repeat(10_000),
        ")".repeat(10_000)
    );
    let script = lower_script(&source);
    // The truncated assignment does not lower.
    assert_eq!(script.body.len(), 2);
    assert_eq!(check_errors(&source), vec![DiagnosticCode::SyntaxError]);
}
