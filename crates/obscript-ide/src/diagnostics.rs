//! Diagnostics collection and conversion to editor diagnostics.

use lsp_types::{DiagnosticSeverity as LspSeverity, NumberOrString};
use obscript_hir::{Database, Diagnostic, DiagnosticSeverity, FileId};

use crate::line_index::LineIndex;

/// Source name reported with every editor diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "obscript";

/// Collects all diagnostics for a file.
#[must_use]
pub fn collect_diagnostics(db: &Database, file_id: FileId) -> Vec<Diagnostic> {
    db.diagnostics(file_id)
}

/// Returns true if there are any errors.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// A file's diagnostics with line/column ranges.
#[must_use]
pub fn to_lsp(db: &Database, file_id: FileId) -> Vec<lsp_types::Diagnostic> {
    let Some(file) = db.file(file_id) else {
        return Vec::new();
    };
    let index = LineIndex::new(file.text.clone());
    collect_diagnostics(db, file_id)
        .into_iter()
        .map(|diag| {
            let severity = match diag.severity {
                DiagnosticSeverity::Error => LspSeverity::ERROR,
                DiagnosticSeverity::Warning => LspSeverity::WARNING,
            };
            let mut message = diag.message;
            for related in &diag.related {
                message.push_str(&format!(" ({})", related.message));
            }
            lsp_types::Diagnostic {
                range: index.lsp_range(diag.range),
                severity: Some(severity),
                code: Some(NumberOrString::String(diag.code.code().to_string())),
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message,
                ..Default::default()
            }
        })
        .collect()
}
