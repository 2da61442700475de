//! The builtin catalog: engine functions and forms known without a script.
//!
//! A catalog is an immutable snapshot. Loading, extending and saving all go
//! through JSON and produce new values; a [`Database`](crate::Database)
//! holds one snapshot behind an `Arc` for its whole life.
//!
//! The functions file is an array:
//!
//! ```json
//! [{ "name": "GetAV", "kind": "function", "returnType": "float", "origin": "FalloutNV.esm" }]
//! ```
//!
//! The globals file maps form names to their type:
//!
//! ```json
//! { "PlayerRef": { "type": "reference", "origin": "FalloutNV.esm" } }
//! ```

use indexmap::IndexMap;
use obscript_syntax::FunctionHints;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::symbols::normalize_name;
use crate::types::ExprType;

/// Errors while reading or writing catalog files.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The functions file is not valid.
    #[error("invalid functions catalog: {0}")]
    Functions(#[source] serde_json::Error),
    /// The globals file is not valid.
    #[error("invalid globals catalog: {0}")]
    Globals(#[source] serde_json::Error),
    /// Writing the catalog failed.
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),
    /// An entry has an empty name.
    #[error("catalog entry with an empty name")]
    EmptyName,
}

/// Whether a callable is used as a function or as a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    /// Returns a value.
    #[default]
    Function,
    /// Run for its effect.
    Command,
}

/// A builtin function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    /// Name in its canonical casing.
    pub name: SmolStr,
    /// Function or command.
    pub kind: FunctionKind,
    /// The declared return type.
    pub return_type: ExprType,
    /// The plugin or master file providing it.
    pub origin: SmolStr,
}

/// A named form, such as a quest or a persistent reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    /// Name in its canonical casing.
    pub name: SmolStr,
    /// The form's type.
    pub ty: ExprType,
    /// The plugin or master file providing it.
    pub origin: SmolStr,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionRecord {
    name: String,
    #[serde(default)]
    kind: FunctionKind,
    #[serde(default)]
    return_type: ExprType,
    #[serde(default)]
    origin: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct FormRecord {
    #[serde(rename = "type", default)]
    ty: ExprType,
    #[serde(default)]
    origin: String,
}

/// Functions and forms, keyed by case-folded name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinCatalog {
    functions: IndexMap<SmolStr, FunctionEntry>,
    forms: IndexMap<SmolStr, FormEntry>,
}

impl BuiltinCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from the functions and globals files. A name listed
    /// twice in one file keeps its last entry.
    pub fn from_json(functions: &str, globals: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.extend_functions(functions)?;

        let records: IndexMap<String, FormRecord> =
            serde_json::from_str(globals).map_err(CatalogError::Globals)?;
        for (name, record) in records {
            let name = checked_name(&name)?;
            catalog.forms.insert(
                normalize_name(&name),
                FormEntry {
                    name,
                    ty: record.ty,
                    origin: record.origin.into(),
                },
            );
        }

        debug!(
            "loaded catalog: {} functions, {} forms",
            catalog.functions.len(),
            catalog.forms.len()
        );
        Ok(catalog)
    }

    /// Writes the catalog back as `(functions, globals)` JSON.
    pub fn to_json(&self) -> Result<(String, String), CatalogError> {
        let functions: Vec<FunctionRecord> = self
            .functions
            .values()
            .map(|entry| FunctionRecord {
                name: entry.name.to_string(),
                kind: entry.kind,
                return_type: entry.return_type,
                origin: entry.origin.to_string(),
            })
            .collect();
        let forms: IndexMap<String, FormRecord> = self
            .forms
            .values()
            .map(|entry| {
                (
                    entry.name.to_string(),
                    FormRecord {
                        ty: entry.ty,
                        origin: entry.origin.to_string(),
                    },
                )
            })
            .collect();
        let functions =
            serde_json::to_string_pretty(&functions).map_err(CatalogError::Serialize)?;
        let forms = serde_json::to_string_pretty(&forms).map_err(CatalogError::Serialize)?;
        Ok((functions, forms))
    }

    /// A new snapshot with the functions in `json` added. Entries replace
    /// existing ones of the same name.
    pub fn with_functions(&self, json: &str) -> Result<Self, CatalogError> {
        let mut catalog = self.clone();
        catalog.extend_functions(json)?;
        Ok(catalog)
    }

    fn extend_functions(&mut self, json: &str) -> Result<(), CatalogError> {
        let records: Vec<FunctionRecord> =
            serde_json::from_str(json).map_err(CatalogError::Functions)?;
        for record in records {
            let name = checked_name(&record.name)?;
            self.functions.insert(
                normalize_name(&name),
                FunctionEntry {
                    name,
                    kind: record.kind,
                    return_type: record.return_type,
                    origin: record.origin.into(),
                },
            );
        }
        Ok(())
    }

    /// Looks up a function by name, ignoring case.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(&normalize_name(name))
    }

    /// Looks up a form by name, ignoring case.
    #[must_use]
    pub fn form(&self, name: &str) -> Option<&FormEntry> {
        self.forms.get(&normalize_name(name))
    }

    /// All functions, in load order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.functions.values()
    }

    /// All forms, in load order.
    pub fn forms(&self) -> impl Iterator<Item = &FormEntry> {
        self.forms.values()
    }
}

impl FunctionHints for BuiltinCatalog {
    fn is_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }
}

fn checked_name(name: &str) -> Result<SmolStr, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::EmptyName);
    }
    Ok(SmolStr::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUNCTIONS: &str = r#"[
        { "name": "GetAV", "kind": "function", "returnType": "float", "origin": "FalloutNV.esm" },
        { "name": "PrintC", "kind": "command" },
        { "name": "getav", "returnType": "integer", "origin": "override.esp" }
    ]"#;

    const GLOBALS: &str = r#"{
        "PlayerRef": { "type": "reference", "origin": "FalloutNV.esm" },
        "VMS01": { "type": "unknown" }
    }"#;

    #[test]
    fn test_lookup_ignores_case_and_last_wins() {
        let catalog = BuiltinCatalog::from_json(FUNCTIONS, GLOBALS).unwrap();
        assert_eq!(catalog.functions().count(), 2);

        let getav = catalog.function("GETAV").unwrap();
        assert_eq!(getav.name, "getav");
        assert_eq!(getav.return_type, ExprType::Integer);
        assert_eq!(getav.origin, "override.esp");

        let printc = catalog.function("printc").unwrap();
        assert_eq!(printc.kind, FunctionKind::Command);
        assert_eq!(printc.return_type, ExprType::Unknown);

        assert_eq!(catalog.form("playerref").unwrap().ty, ExprType::Reference);
        assert!(catalog.is_function("PrintC"));
        assert!(!catalog.is_function("PlayerRef"));
    }

    #[test]
    fn test_save_and_reload() {
        let catalog = BuiltinCatalog::from_json(FUNCTIONS, GLOBALS).unwrap();
        let (functions, globals) = catalog.to_json().unwrap();
        let reloaded = BuiltinCatalog::from_json(&functions, &globals).unwrap();
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn test_with_functions_leaves_original_untouched() {
        let catalog = BuiltinCatalog::from_json(FUNCTIONS, GLOBALS).unwrap();
        let extended = catalog
            .with_functions(r#"[{ "name": "Ar_Size", "returnType": "integer" }]"#)
            .unwrap();
        assert!(extended.function("ar_size").is_some());
        assert!(catalog.function("ar_size").is_none());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            BuiltinCatalog::from_json("{", "{}"),
            Err(CatalogError::Functions(_))
        ));
        assert!(matches!(
            BuiltinCatalog::from_json("[]", "[]"),
            Err(CatalogError::Globals(_))
        ));
        assert!(matches!(
            BuiltinCatalog::from_json(r#"[{ "name": "  " }]"#, "{}"),
            Err(CatalogError::EmptyName)
        ));
    }
}
