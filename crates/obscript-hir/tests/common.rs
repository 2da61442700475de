//! Shared helpers for lowering and database tests.
#![allow(dead_code, unused_imports)]

use std::sync::Arc;

pub use obscript_hir::hir::{ExprKind, ForeachVar, Stmt, StmtKind};
pub use obscript_hir::{
    BuiltinCatalog, Database, DiagnosticCode, DiagnosticSeverity, ExprType, FileId,
    GlobalOrigin, Script, ScopeId, ScopeKind, SourceKey, SymbolId,
};

/// Opens `source` in a fresh database and returns its lowered script.
pub fn lower_script(source: &str) -> Arc<Script> {
    let mut db = Database::default();
    let file = db.open(SourceKey::from_virtual("test"), source);
    db.file(file)
        .and_then(|file| file.hir.clone())
        .expect("script should lower")
}

/// The error codes reported for `source`.
pub fn check_errors(source: &str) -> Vec<DiagnosticCode> {
    let mut db = Database::default();
    let file = db.open(SourceKey::from_virtual("test"), source);
    db.diagnostics(file)
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .map(|d| d.code)
        .collect()
}

/// Resolves `name` from `scope`, returning the symbol's name and type.
pub fn resolve(script: &Script, scope: ScopeId, name: &str) -> Option<(String, ExprType)> {
    let (_, id) = script.scopes.resolve(scope, name)?;
    let symbol = script.scopes.symbol(id)?;
    Some((symbol.name.to_string(), symbol.ty))
}

/// Scopes of the given kind, in creation order.
pub fn scopes_of_kind(script: &Script, kind: ScopeKind) -> Vec<ScopeId> {
    script
        .scopes
        .scopes()
        .iter()
        .filter(|scope| scope.kind == kind)
        .map(|scope| scope.id)
        .collect()
}

/// A database over a small catalog.
pub fn database_with_catalog() -> Database {
    let catalog = BuiltinCatalog::from_json(
        r#"[
            { "name": "GetAV", "returnType": "float" },
            { "name": "PrintC", "kind": "command" }
        ]"#,
        r#"{ "PlayerRef": { "type": "reference" } }"#,
    )
    .expect("catalog should load");
    Database::new(Arc::new(catalog))
}
