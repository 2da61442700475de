//! Names visible across all open scripts.
//!
//! Every entry records which files reference it. Builtins and forms come from
//! the catalog and live as long as the table. Script names live while the
//! defining file is open or while some file still refers to them. Names that
//! no file declares (`Implicit` entries) live exactly as long as one file
//! refers to them.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::catalog::BuiltinCatalog;
use crate::project::FileId;
use crate::symbols::{normalize_name, SymbolKind};
use crate::types::ExprType;

/// Where a global name comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalOrigin {
    /// A catalog function.
    Builtin,
    /// A catalog form.
    Form,
    /// The `scriptname` of an open file.
    Script(FileId),
    /// Referenced but declared nowhere known.
    Implicit,
}

/// One global name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalEntry {
    /// The name in the casing first seen.
    pub name: SmolStr,
    /// Function, script or variable.
    pub kind: SymbolKind,
    /// The best known type.
    pub ty: ExprType,
    /// Where the name comes from.
    pub origin: GlobalOrigin,
    /// Files that use the name.
    pub referencing_files: FxHashSet<FileId>,
}

impl GlobalEntry {
    fn new(name: SmolStr, kind: SymbolKind, ty: ExprType, origin: GlobalOrigin) -> Self {
        Self {
            name,
            kind,
            ty,
            origin,
            referencing_files: FxHashSet::default(),
        }
    }
}

/// The global symbol table, keyed by case-folded name.
#[derive(Debug, Clone, Default)]
pub struct GlobalSymbols {
    entries: FxHashMap<SmolStr, GlobalEntry>,
}

impl GlobalSymbols {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table with every catalog function and form. A form sharing a
    /// name with a function is shadowed by the function.
    #[must_use]
    pub fn from_catalog(catalog: &BuiltinCatalog) -> Self {
        let mut table = Self::new();
        for form in catalog.forms() {
            table.entries.insert(
                normalize_name(&form.name),
                GlobalEntry::new(
                    form.name.clone(),
                    SymbolKind::Variable,
                    form.ty,
                    GlobalOrigin::Form,
                ),
            );
        }
        for function in catalog.functions() {
            table.entries.insert(
                normalize_name(&function.name),
                GlobalEntry::new(
                    function.name.clone(),
                    SymbolKind::Function,
                    function.return_type,
                    GlobalOrigin::Builtin,
                ),
            );
        }
        table
    }

    /// Looks up a name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GlobalEntry> {
        self.entries.get(&normalize_name(name))
    }

    /// All entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &GlobalEntry> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers `name` as the script defined by `file`.
    ///
    /// Returns `false` when the name already belongs to a builtin, a form or
    /// another script; the existing entry is kept.
    pub fn define_script(&mut self, name: &str, file: FileId) -> bool {
        let key = normalize_name(name);
        match self.entries.get_mut(&key) {
            Some(entry) => match entry.origin {
                GlobalOrigin::Implicit => {
                    entry.name = SmolStr::new(name);
                    entry.kind = SymbolKind::Script;
                    entry.ty = ExprType::Reference;
                    entry.origin = GlobalOrigin::Script(file);
                    true
                }
                GlobalOrigin::Script(owner) => owner == file,
                GlobalOrigin::Builtin | GlobalOrigin::Form => false,
            },
            None => {
                self.entries.insert(
                    key,
                    GlobalEntry::new(
                        SmolStr::new(name),
                        SymbolKind::Script,
                        ExprType::Reference,
                        GlobalOrigin::Script(file),
                    ),
                );
                true
            }
        }
    }

    /// Records that `file` uses `name`, creating an implicit entry for names
    /// not yet known.
    pub fn add_reference(&mut self, name: &str, file: FileId) {
        let entry = self.entries.entry(normalize_name(name)).or_insert_with(|| {
            GlobalEntry::new(
                SmolStr::new(name),
                SymbolKind::Variable,
                ExprType::Ambiguous,
                GlobalOrigin::Implicit,
            )
        });
        entry.referencing_files.insert(file);
    }

    /// Removes every registration made by `file` and collects entries that
    /// nothing keeps alive any more. Returns the number of entries removed.
    pub fn retract_file(&mut self, file: FileId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            entry.referencing_files.remove(&file);
            let referenced = !entry.referencing_files.is_empty();
            match entry.origin {
                GlobalOrigin::Builtin | GlobalOrigin::Form => true,
                GlobalOrigin::Implicit => referenced,
                GlobalOrigin::Script(owner) if owner == file => {
                    if referenced {
                        entry.kind = SymbolKind::Variable;
                        entry.ty = ExprType::Ambiguous;
                        entry.origin = GlobalOrigin::Implicit;
                    }
                    referenced
                }
                GlobalOrigin::Script(_) => true,
            }
        });
        before - self.entries.len()
    }
}
