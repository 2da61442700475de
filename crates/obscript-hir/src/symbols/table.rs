use indexmap::IndexMap;
use obscript_syntax::ast::SyntaxNodePtr;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::defs::*;

/// Names declared directly in one scope.
///
/// Keys are case-folded; iteration follows declaration order. Declaring a
/// name twice keeps the first position and the last symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: IndexMap<SmolStr, SymbolId>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `id`. Returns the symbol previously bound to the name.
    pub fn define(&mut self, name: &str, id: SymbolId) -> Option<SymbolId> {
        self.entries.insert(normalize_name(name), id)
    }

    /// Looks up a name in this table only.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.entries.get(&normalize_name(name)).copied()
    }

    /// Symbol ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.entries.values().copied()
    }

    /// Number of names in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no name is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Arena of scopes and the symbols they declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeTree {
    /// Creates a tree holding only the script scope, opened by `root`.
    #[must_use]
    pub fn new(root: SyntaxNodePtr) -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId::ROOT,
                parent: None,
                children: Vec::new(),
                kind: ScopeKind::Script,
                node: root,
                symbols: SymbolTable::new(),
            }],
            symbols: Vec::new(),
        }
    }

    /// The script scope.
    #[must_use]
    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Creates a child of `parent`.
    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind, node: SyntaxNodePtr) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            parent: Some(parent),
            children: Vec::new(),
            kind,
            node,
            symbols: SymbolTable::new(),
        });
        if let Some(parent) = self.scopes.get_mut(parent.0 as usize) {
            parent.children.push(id);
        }
        id
    }

    /// Declares `symbol` in `scope`, replacing any earlier declaration of
    /// the same name there.
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        let name = symbol.name.clone();
        self.symbols.push(symbol);
        if let Some(scope) = self.scopes.get_mut(scope.0 as usize) {
            scope.symbols.define(&name, id);
        }
        id
    }

    /// Gets a scope by id.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    /// Gets a symbol by id.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    /// All scopes, in creation order.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// The scope opened by `node`, if any.
    #[must_use]
    pub fn scope_for_node(&self, node: &SyntaxNodePtr) -> Option<ScopeId> {
        self.scopes
            .iter()
            .find(|scope| &scope.node == node)
            .map(|scope| scope.id)
    }

    /// Scope ids from `scope` up to the script scope, innermost first.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |id| self.scope(*id)?.parent)
            .take_while(move |id| self.scope(*id).is_some())
    }

    /// Resolves `name` from `scope` outwards. Returns the innermost match.
    #[must_use]
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, SymbolId)> {
        let key = normalize_name(name);
        self.ancestors(scope).find_map(|id| {
            let symbol = self.scope(id)?.symbols.entries.get(&key).copied()?;
            Some((id, symbol))
        })
    }

    /// Symbols visible from `scope`, innermost first, shadowed names
    /// omitted. Within one scope the declaration order is kept.
    #[must_use]
    pub fn visible_symbols(&self, scope: ScopeId) -> Vec<SymbolId> {
        let mut seen = FxHashSet::default();
        let mut visible = Vec::new();
        for id in self.ancestors(scope) {
            let Some(scope) = self.scope(id) else {
                continue;
            };
            for (key, symbol) in &scope.symbols.entries {
                if seen.insert(key.clone()) {
                    visible.push(*symbol);
                }
            }
        }
        visible
    }

    /// Returns `true` if `inner` is `outer` or nested inside it.
    #[must_use]
    pub fn is_within(&self, inner: ScopeId, outer: ScopeId) -> bool {
        self.ancestors(inner).any(|id| id == outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExprType;
    use obscript_syntax::parse;
    use text_size::TextRange;

    fn symbol(name: &str, ty: ExprType, ptr: &SyntaxNodePtr) -> Symbol {
        Symbol {
            name: name.into(),
            kind: SymbolKind::Variable,
            ty,
            decl: ptr.clone(),
            name_range: TextRange::default(),
        }
    }

    #[test]
    fn test_resolution_walks_outwards() {
        let parsed = parse("scn T\n");
        let ptr = SyntaxNodePtr::new(&parsed.syntax());
        let mut tree = ScopeTree::new(ptr.clone());
        let outer = tree.define(tree.root(), symbol("Count", ExprType::Integer, &ptr));
        let block = tree.push_scope(tree.root(), ScopeKind::Block, ptr.clone());
        let inner = tree.define(block, symbol("count", ExprType::Float, &ptr));
        let sibling = tree.push_scope(tree.root(), ScopeKind::Block, ptr.clone());

        assert_eq!(tree.resolve(block, "COUNT"), Some((block, inner)));
        assert_eq!(tree.resolve(sibling, "count"), Some((ScopeId::ROOT, outer)));
        assert_eq!(tree.resolve(tree.root(), "count"), Some((ScopeId::ROOT, outer)));
        assert_eq!(tree.resolve(block, "missing"), None);
        assert_eq!(tree.scope(tree.root()).unwrap().children, vec![block, sibling]);
        assert!(tree.is_within(block, ScopeId::ROOT));
        assert!(!tree.is_within(block, sibling));
    }

    #[test]
    fn test_redeclaration_overwrites() {
        let parsed = parse("scn T\n");
        let ptr = SyntaxNodePtr::new(&parsed.syntax());
        let mut tree = ScopeTree::new(ptr.clone());
        tree.define(tree.root(), symbol("a", ExprType::Integer, &ptr));
        tree.define(tree.root(), symbol("b", ExprType::Integer, &ptr));
        let second = tree.define(tree.root(), symbol("A", ExprType::String, &ptr));

        let table = &tree.scope(tree.root()).unwrap().symbols;
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("a"), Some(second));
        let names: Vec<_> = table
            .ids()
            .map(|id| tree.symbol(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["A", "b"]);
    }

    #[test]
    fn test_visible_symbols_hide_shadowed_names() {
        let parsed = parse("scn T\n");
        let ptr = SyntaxNodePtr::new(&parsed.syntax());
        let mut tree = ScopeTree::new(ptr.clone());
        tree.define(tree.root(), symbol("x", ExprType::Integer, &ptr));
        tree.define(tree.root(), symbol("y", ExprType::Integer, &ptr));
        let block = tree.push_scope(tree.root(), ScopeKind::Block, ptr.clone());
        let inner_x = tree.define(block, symbol("X", ExprType::Float, &ptr));

        let visible = tree.visible_symbols(block);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0], inner_x);
    }
}
