//! The file database.
//!
//! Every open file is parsed and lowered eagerly on open and on each change.
//! A change replaces the whole [`File`] entry: the old tree is dropped after
//! its global registrations are retracted, then the new tree registers its
//! script name and the external names it uses.

use std::sync::Arc;

use obscript_syntax::{parse_with_hints, Parse};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, info};

use crate::catalog::BuiltinCatalog;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::globals::GlobalSymbols;
use crate::hir::Script;
use crate::lower::lower;
use crate::project::{FileId, SourceKey, SourceRegistry};
use crate::symbols::normalize_name;

/// One open file.
#[derive(Debug, Clone)]
pub struct File {
    /// The file's source key.
    pub key: SourceKey,
    /// The current text.
    pub text: Arc<str>,
    /// The syntax tree of `text`.
    pub parse: Parse,
    /// The lowered script, `None` when the script has no name.
    pub hir: Option<Arc<Script>>,
}

impl File {
    /// The declared script name, if the file lowered.
    #[must_use]
    pub fn script_name(&self) -> Option<&SmolStr> {
        self.hir.as_ref().map(|script| &script.name)
    }
}

/// Open files, the script name index and the global symbol table.
#[derive(Debug)]
pub struct Database {
    catalog: Arc<BuiltinCatalog>,
    sources: SourceRegistry,
    files: FxHashMap<FileId, File>,
    script_names: FxHashMap<SmolStr, FileId>,
    globals: GlobalSymbols,
}

impl Default for Database {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinCatalog::new()))
    }
}

impl Database {
    /// Creates an empty database over a catalog snapshot.
    #[must_use]
    pub fn new(catalog: Arc<BuiltinCatalog>) -> Self {
        let globals = GlobalSymbols::from_catalog(&catalog);
        Self {
            catalog,
            sources: SourceRegistry::new(),
            files: FxHashMap::default(),
            script_names: FxHashMap::default(),
            globals,
        }
    }

    /// The catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &Arc<BuiltinCatalog> {
        &self.catalog
    }

    /// The global symbol table.
    #[must_use]
    pub fn globals(&self) -> &GlobalSymbols {
        &self.globals
    }

    /// Opens a file, or replaces its text if it is already open.
    pub fn open(&mut self, key: SourceKey, text: impl Into<Arc<str>>) -> FileId {
        let file_id = self.sources.ensure_file_id(key.clone());
        info!("opening {}", key.display());
        self.load(file_id, key, text.into());
        file_id
    }

    /// Replaces the text of an open file. Returns `false` if the file is
    /// not open.
    pub fn change(&mut self, file_id: FileId, text: impl Into<Arc<str>>) -> bool {
        let Some(key) = self.files.get(&file_id).map(|file| file.key.clone()) else {
            debug!("ignoring change to unknown {file_id}");
            return false;
        };
        debug!("reparsing {}", key.display());
        self.load(file_id, key, text.into());
        true
    }

    /// Closes a file and retracts everything it registered. Returns `false`
    /// if the file is not open.
    pub fn close(&mut self, file_id: FileId) -> bool {
        let Some(file) = self.files.get(&file_id) else {
            return false;
        };
        let key = file.key.clone();
        info!("closing {}", key.display());
        self.unregister(file_id, true);
        self.files.remove(&file_id);
        self.sources.remove(&key);
        true
    }

    /// Gets an open file.
    #[must_use]
    pub fn file(&self, file_id: FileId) -> Option<&File> {
        self.files.get(&file_id)
    }

    /// Resolves the id of an open file.
    #[must_use]
    pub fn file_id(&self, key: &SourceKey) -> Option<FileId> {
        self.sources.file_id_for_key(key)
    }

    /// All open files.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &File)> {
        self.files.iter().map(|(id, file)| (*id, file))
    }

    /// The file that owns a script name, ignoring case.
    #[must_use]
    pub fn script_file(&self, name: &str) -> Option<FileId> {
        self.script_names.get(&normalize_name(name)).copied()
    }

    /// The lowered script registered under `name`.
    #[must_use]
    pub fn script(&self, name: &str) -> Option<Arc<Script>> {
        self.file(self.script_file(name)?)?.hir.clone()
    }

    /// Syntax diagnostics of a file plus a duplicate script name check.
    #[must_use]
    pub fn diagnostics(&self, file_id: FileId) -> Vec<Diagnostic> {
        let Some(file) = self.files.get(&file_id) else {
            return Vec::new();
        };
        let mut diagnostics: Vec<Diagnostic> =
            file.parse.errors().iter().map(Diagnostic::from).collect();

        if let Some(script) = &file.hir {
            let owner = self.script_file(&script.name);
            if let Some(owner) = owner.filter(|owner| *owner != file_id) {
                let mut diagnostic = Diagnostic::new(
                    DiagnosticCode::DuplicateScriptName,
                    script.name_range,
                    format!("script name '{}' is already used by another file", script.name),
                );
                if let Some(first) = self.file(owner) {
                    if let Some(first_script) = &first.hir {
                        diagnostic = diagnostic.with_related(
                            first_script.name_range,
                            format!("first declared in {}", first.key.display()),
                        );
                    }
                }
                diagnostics.push(diagnostic);
            }
        }
        diagnostics
    }

    fn load(&mut self, file_id: FileId, key: SourceKey, text: Arc<str>) {
        let parse = parse_with_hints(&text, &*self.catalog);
        let output = parse.script().and_then(|script| lower(&script));
        let (hir, external_names) = match output {
            Some(output) => (Some(Arc::new(output.script)), output.external_names),
            None => {
                debug!("{} has no script name", key.display());
                (None, Vec::new())
            }
        };

        // An edit that keeps the script name keeps its ownership.
        let old_name = self.files.get(&file_id).and_then(File::script_name);
        let new_name = hir.as_ref().map(|script| &script.name);
        let renamed = match (old_name, new_name) {
            (Some(old), Some(new)) => normalize_name(old) != normalize_name(new),
            _ => true,
        };
        self.unregister(file_id, renamed);

        if let Some(script) = &hir {
            self.register_script(&script.name, file_id);
        }
        for name in &external_names {
            self.globals.add_reference(name, file_id);
        }
        debug!(
            "{}: {} syntax errors, {} external names",
            key.display(),
            parse.errors().len(),
            external_names.len()
        );

        self.files.insert(
            file_id,
            File {
                key,
                text,
                parse,
                hir,
            },
        );
    }

    fn register_script(&mut self, name: &str, file_id: FileId) {
        let owner = *self
            .script_names
            .entry(normalize_name(name))
            .or_insert(file_id);
        if owner == file_id && !self.globals.define_script(name, file_id) {
            debug!("script name {name} shadows a catalog entry");
        }
    }

    /// Drops the registrations of the file's current tree, if any. With
    /// `hand_over`, an owned script name passes to the next file declaring it.
    fn unregister(&mut self, file_id: FileId, hand_over: bool) {
        let removed = self.globals.retract_file(file_id);
        if removed > 0 {
            debug!("retracted {removed} global entries for {file_id}");
        }

        let Some(name) = self
            .files
            .get(&file_id)
            .and_then(File::script_name)
            .map(|name| normalize_name(name))
        else {
            return;
        };
        if self.script_names.get(&name) != Some(&file_id) {
            return;
        }
        self.script_names.remove(&name);
        if !hand_over {
            return;
        }

        let successor = self
            .files
            .iter()
            .filter(|(id, file)| {
                **id != file_id
                    && file
                        .script_name()
                        .is_some_and(|other| normalize_name(other) == name)
            })
            .map(|(id, file)| (*id, file.script_name().cloned()))
            .min_by_key(|(id, _)| *id);
        if let Some((successor, Some(display_name))) = successor {
            debug!("script name {} passes to {}", display_name, successor);
            self.register_script(&display_name, successor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globals::GlobalOrigin;

    fn key(name: &str) -> SourceKey {
        SourceKey::from_virtual(name)
    }

    #[test]
    fn test_open_change_close() {
        let mut db = Database::default();
        let file = db.open(key("a"), "scn Alpha\nset Shared to 1\n");
        assert_eq!(db.script_file("ALPHA"), Some(file));
        assert!(db.globals().get("shared").is_some());

        assert!(db.change(file, "scn Alpha\nset Other to 1\n"));
        assert!(db.globals().get("shared").is_none());
        assert!(db.globals().get("other").is_some());

        assert!(db.close(file));
        assert!(db.file(file).is_none());
        assert!(db.script_file("alpha").is_none());
        assert!(db.globals().is_empty());
        assert!(!db.change(file, "scn Alpha\n"));
    }

    #[test]
    fn test_renaming_a_script_moves_the_index() {
        let mut db = Database::default();
        let file = db.open(key("a"), "scn Before\n");
        db.change(file, "scn After\n");
        assert!(db.script_file("before").is_none());
        assert_eq!(db.script_file("after"), Some(file));
        assert!(db.globals().get("before").is_none());
    }

    #[test]
    fn test_duplicate_script_name() {
        let mut db = Database::default();
        let first = db.open(key("a"), "scn Quest\n");
        let second = db.open(key("b"), "scn quest\n");

        assert!(db.diagnostics(first).is_empty());
        let diagnostics = db.diagnostics(second);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::DuplicateScriptName);

        db.close(first);
        assert_eq!(db.script_file("QUEST"), Some(second));
        assert_eq!(
            db.globals().get("quest").unwrap().origin,
            GlobalOrigin::Script(second)
        );
        assert!(db.diagnostics(second).is_empty());
    }

    #[test]
    fn test_catalog_hints_reach_the_parser() {
        let catalog =
            BuiltinCatalog::from_json(r#"[{ "name": "GetSelf" }]"#, "{}").unwrap();
        let mut db = Database::new(Arc::new(catalog));
        let file = db.open(key("a"), "scn T\nlet r := GetSelf\n");
        let tree = db.file(file).unwrap().parse.syntax();
        assert!(tree
            .descendants()
            .any(|node| node.kind() == obscript_syntax::SyntaxKind::FuncExpr));
    }

    #[test]
    fn test_unnamed_file_still_parses() {
        let mut db = Database::default();
        let file = db.open(key("a"), "set x to 1\n");
        let file = db.file(file).unwrap();
        assert!(file.hir.is_none());
        assert!(file.parse.has_errors());
    }
}
