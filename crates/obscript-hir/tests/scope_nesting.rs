mod common;
use common::*;

#[test]
fn test_inner_declarations_are_invisible_outside() {
    let script = lower_script(
        "scn T\nint outer\nbegin GameMode\nint inner\nif outer\nfloat deep\nendif\nend\nbegin MenuMode\nend\n",
    );
    let blocks = scopes_of_kind(&script, ScopeKind::Block);
    let [begin, if_body, sibling] = blocks.as_slice() else {
        panic!("expected three block scopes, got {blocks:?}");
    };
    let root = script.scopes.root();

    assert!(resolve(&script, *if_body, "deep").is_some());
    assert!(resolve(&script, *if_body, "inner").is_some());
    assert!(resolve(&script, *if_body, "outer").is_some());
    assert!(resolve(&script, *begin, "deep").is_none());
    assert!(resolve(&script, root, "inner").is_none());
    assert!(resolve(&script, *sibling, "inner").is_none());
    assert!(resolve(&script, *sibling, "outer").is_some());

    assert_eq!(script.scopes.scope(*if_body).unwrap().parent, Some(*begin));
    assert_eq!(script.scopes.scope(*sibling).unwrap().parent, Some(root));
}

#[test]
fn test_inner_declaration_shadows_outer() {
    let script = lower_script(
        "scn T\nint x\nbegin GameMode\nfloat x\nset x to 1.5\nend\nbegin MenuMode\nset x to 2\nend\n",
    );
    let mut targets = Vec::new();
    script.walk_exprs(&mut |expr| {
        if let ExprKind::Name { symbol: Some(_), .. } = expr.kind {
            targets.push(expr.ty);
        }
    });
    assert_eq!(targets, [ExprType::Float, ExprType::Integer]);
}

#[test]
fn test_foreach_variable_lives_in_header_scope() {
    let script = lower_script(
        "scn T\narray_var items\nforeach array_var entry <- items\nlet entry := entry\nloop\n",
    );
    let headers = scopes_of_kind(&script, ScopeKind::ForeachHeader);
    let [header] = headers.as_slice() else {
        panic!("expected one header scope");
    };
    let header = script.scopes.scope(*header).unwrap();
    assert!(header.symbols.lookup("ENTRY").is_some());
    assert_eq!(header.children.len(), 1);
    assert!(resolve(&script, header.children[0], "entry").is_some());
    assert!(resolve(&script, script.scopes.root(), "entry").is_none());

    let StmtKind::Foreach {
        variable, iterable, ..
    } = &script.body[1].kind
    else {
        panic!("expected foreach");
    };
    assert!(matches!(variable, ForeachVar::Declared(_)));
    assert_eq!(iterable.ty, ExprType::Array);
}

#[test]
fn test_iterable_does_not_see_loop_variable() {
    let script = lower_script("scn T\nforeach array_var items <- items\nloop\n");
    let StmtKind::Foreach { iterable, .. } = &script.body[0].kind else {
        panic!("expected foreach");
    };
    assert_eq!(
        iterable.kind,
        ExprKind::Name {
            name: "items".into(),
            symbol: None
        }
    );
}

#[test]
fn test_lambda_parameters_scope_the_body() {
    let script = lower_script(
        "scn T\nbegin GameMode\nlet f := (begin Function { int a }\nreturn a\nend)\nend\n",
    );
    let params = scopes_of_kind(&script, ScopeKind::LambdaParams);
    let [params] = params.as_slice() else {
        panic!("expected one parameter scope");
    };
    let param_scope = script.scopes.scope(*params).unwrap();
    assert!(param_scope.symbols.lookup("a").is_some());
    let body = param_scope.children[0];
    assert_eq!(
        resolve(&script, body, "a"),
        Some(("a".to_string(), ExprType::Integer))
    );
    assert!(resolve(&script, param_scope.parent.unwrap(), "a").is_none());
}

#[test]
fn test_begin_parameters_are_script_variables() {
    let script = lower_script("scn T\nbegin Function { int count }\nend\n");
    assert!(resolve(&script, script.scopes.root(), "count").is_some());
}
