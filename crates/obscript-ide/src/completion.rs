//! Code completion.
//!
//! Candidates come from the locals visible at the cursor, the keywords, the
//! builtin catalog and the scripts known to the database. After `.` or `->`
//! only functions are offered.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextSize;

use obscript_hir::{normalize_name, Database, FileId, FunctionKind, GlobalOrigin};
use obscript_syntax::algo;
use obscript_syntax::{SyntaxKind, SyntaxToken};
use rowan::NodeOrToken;

use crate::scope::{find_containing_scope, scope_symbol_table};
use crate::util::IdeContext;

const KEYWORDS: &[&str] = &[
    "scriptname",
    "begin",
    "end",
    "if",
    "elseif",
    "else",
    "endif",
    "while",
    "loop",
    "foreach",
    "continue",
    "break",
    "return",
    "set",
    "to",
    "let",
    "short",
    "int",
    "long",
    "float",
    "ref",
    "string_var",
    "array_var",
];

/// The kind of completion item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// A keyword or type name.
    Keyword,
    /// A builtin function or command.
    Function,
    /// A local variable.
    Variable,
    /// A catalog form.
    Form,
    /// Another script.
    Script,
}

/// A completion item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    /// The label shown in the completion list.
    pub label: SmolStr,
    /// The kind of completion.
    pub kind: CompletionKind,
    /// Additional detail (e.g., the type).
    pub detail: Option<SmolStr>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    /// Creates a new completion item.
    pub fn new(label: impl Into<SmolStr>, kind: CompletionKind) -> Self {
        let sort_priority = match kind {
            CompletionKind::Variable => 10,
            CompletionKind::Function => 20,
            CompletionKind::Form | CompletionKind::Script => 30,
            CompletionKind::Keyword => 40,
        };
        Self {
            label: label.into(),
            kind,
            detail: None,
            sort_priority,
        }
    }

    /// Sets the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<SmolStr>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Completion candidates at `offset`, filtered by the identifier prefix
/// under the cursor and sorted by priority then label.
#[must_use]
pub fn completions(db: &Database, file_id: FileId, offset: TextSize) -> Vec<CompletionItem> {
    let Some(context) = IdeContext::new(db, file_id) else {
        return Vec::new();
    };
    let token = algo::token_at_or_before(&context.root, offset);
    let (prefix, before) = match &token {
        Some(token) if token.kind() == SyntaxKind::Ident => {
            let len = offset
                .checked_sub(token.text_range().start())
                .map_or(0, usize::from)
                .min(token.text().len());
            let prefix = token.text().get(..len).unwrap_or_default().to_string();
            (prefix, previous_significant(token))
        }
        Some(token) => (String::new(), Some(token.clone())),
        None => (String::new(), None),
    };
    let after_member = before
        .as_ref()
        .is_some_and(|token| matches!(token.kind(), SyntaxKind::Dot | SyntaxKind::Arrow));

    let mut items = Vec::new();
    if !after_member {
        if let Some(token) = &token {
            items.extend(local_items(db, file_id, token));
        }
        items.extend(
            KEYWORDS
                .iter()
                .map(|keyword| CompletionItem::new(*keyword, CompletionKind::Keyword)),
        );
    }
    for function in db.catalog().functions() {
        let detail = match function.kind {
            FunctionKind::Function => format!("function -> {}", function.return_type),
            FunctionKind::Command => format!("command -> {}", function.return_type),
        };
        items.push(CompletionItem::new(function.name.clone(), CompletionKind::Function).with_detail(detail));
    }
    if !after_member {
        for form in db.catalog().forms() {
            items.push(CompletionItem::new(form.name.clone(), CompletionKind::Form).with_detail(form.ty.name()));
        }
        for entry in db.globals().iter() {
            if matches!(entry.origin, GlobalOrigin::Script(_)) {
                items.push(CompletionItem::new(entry.name.clone(), CompletionKind::Script).with_detail("script"));
            }
        }
    }

    let prefix = normalize_name(&prefix);
    let mut seen = FxHashSet::default();
    let mut items: Vec<CompletionItem> = items
        .into_iter()
        .filter(|item| normalize_name(&item.label).starts_with(prefix.as_str()))
        .filter(|item| seen.insert(normalize_name(&item.label)))
        .collect();
    items.sort_by(|a, b| {
        a.sort_priority
            .cmp(&b.sort_priority)
            .then_with(|| normalize_name(&a.label).cmp(&normalize_name(&b.label)))
    });
    items
}

fn local_items(db: &Database, file_id: FileId, token: &SyntaxToken) -> Vec<CompletionItem> {
    let Some((script, scope)) = find_containing_scope(&NodeOrToken::Token(token.clone()))
        .and_then(|scope| scope_symbol_table(db, file_id, &scope))
    else {
        return Vec::new();
    };
    script
        .scopes
        .visible_symbols(scope)
        .into_iter()
        .filter_map(|id| script.scopes.symbol(id))
        .map(|symbol| {
            CompletionItem::new(symbol.name.clone(), CompletionKind::Variable).with_detail(symbol.ty.name())
        })
        .collect()
}

fn previous_significant(token: &SyntaxToken) -> Option<SyntaxToken> {
    std::iter::successors(token.prev_token(), SyntaxToken::prev_token)
        .find(|token| !token.kind().is_trivia())
}

#[cfg(test)]
mod tests {
    use super::*;
    use obscript_hir::{BuiltinCatalog, SourceKey};
    use std::sync::Arc;

    fn db_with_catalog() -> Database {
        let catalog = BuiltinCatalog::from_json(
            r#"[
                { "name": "GetAV", "returnType": "float" },
                { "name": "PrintC", "kind": "command" }
            ]"#,
            r#"{ "PlayerRef": { "type": "reference" } }"#,
        )
        .unwrap();
        Database::new(Arc::new(catalog))
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn test_prefix_filters_case_insensitively() {
        let mut db = db_with_catalog();
        let source = "scn T\nint getCount\nlet x := get\n";
        let file = db.open(SourceKey::from_virtual("t"), source);
        let offset = TextSize::from(source.rfind("get").unwrap() as u32 + 3);
        let items = completions(&db, file, offset);
        assert_eq!(labels(&items), vec!["getCount", "GetAV"]);
        assert_eq!(items[0].detail.as_deref(), Some("integer"));
    }

    #[test]
    fn test_member_access_offers_functions_only() {
        let mut db = db_with_catalog();
        let source = "scn T\nint stage\nlet x := PlayerRef.\n";
        let file = db.open(SourceKey::from_virtual("t"), source);
        let offset = TextSize::from(source.rfind('.').unwrap() as u32 + 1);
        let items = completions(&db, file, offset);
        assert_eq!(labels(&items), vec!["GetAV", "PrintC"]);
    }

    #[test]
    fn test_inner_locals_are_not_offered_outside() {
        let mut db = db_with_catalog();
        let source = "scn T\nbegin GameMode\nint inner\nend\nset i\n";
        let file = db.open(SourceKey::from_virtual("t"), source);
        let offset = TextSize::from(source.len() as u32 - 1);
        let items = completions(&db, file, offset);
        assert_eq!(labels(&items), vec!["if", "int"]);
    }
}
