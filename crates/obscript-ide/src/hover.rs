//! Hover information.
//!
//! Locals show their declaration as written. Globals show what the catalog
//! or the declaring script knows about them.

use obscript_hir::{Database, FileId, FunctionKind, GlobalEntry, GlobalOrigin};
use obscript_syntax::ast::{self, AstNode};
use text_size::{TextRange, TextSize};

use crate::scope::{definition_at, Definition};

/// Result of a hover request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// The range of the hovered element.
    pub range: Option<TextRange>,
}

impl HoverResult {
    /// Creates a new hover result.
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            range: None,
        }
    }

    /// Sets the range.
    #[must_use]
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Computes hover information at `offset`.
#[must_use]
pub fn hover(db: &Database, file_id: FileId, offset: TextSize) -> Option<HoverResult> {
    let (token, definition) = definition_at(db, file_id, offset)?;
    let contents = match &definition {
        Definition::Local { file, symbol, .. } => {
            let file = db.file(*file)?;
            let script = file.hir.as_ref()?;
            let symbol = script.scopes.symbol(*symbol)?;
            let type_name = symbol
                .decl
                .try_to_node(&file.parse.syntax())
                .and_then(ast::VarDecl::cast)
                .and_then(|decl| decl.type_token())
                .map_or_else(|| symbol.ty.name().to_string(), |t| t.text().to_string());
            code_block(&format!("{type_name} {}", symbol.name))
        }
        Definition::Global(entry) => global_contents(db, entry),
    };
    Some(HoverResult::new(contents).with_range(token.text_range()))
}

fn global_contents(db: &Database, entry: &GlobalEntry) -> String {
    match entry.origin {
        GlobalOrigin::Builtin => {
            let Some(function) = db.catalog().function(&entry.name) else {
                return code_block(&format!("function {}", entry.name));
            };
            let keyword = match function.kind {
                FunctionKind::Function => "function",
                FunctionKind::Command => "command",
            };
            let mut text = code_block(&format!("{keyword} {}", function.name));
            text.push_str(&format!("\n\nReturns `{}`", function.return_type));
            with_origin(text, &function.origin)
        }
        GlobalOrigin::Form => {
            let Some(form) = db.catalog().form(&entry.name) else {
                return code_block(&format!("form {}", entry.name));
            };
            let text = code_block(&format!("{} {}", form.ty, form.name));
            with_origin(text, &form.origin)
        }
        GlobalOrigin::Script(owner) => {
            let mut text = code_block(&format!("scriptname {}", entry.name));
            if let Some(file) = db.file(owner) {
                text.push_str(&format!("\n\nDeclared in `{}`", file.key.display()));
            }
            text
        }
        GlobalOrigin::Implicit => {
            let mut text = code_block(&entry.name);
            text.push_str("\n\nNot declared in any open script");
            text
        }
    }
}

fn with_origin(mut text: String, origin: &str) -> String {
    if !origin.is_empty() {
        text.push_str(&format!("\n\nFrom {origin}"));
    }
    text
}

fn code_block(code: &str) -> String {
    format!("```obscript\n{code}\n```")
}
