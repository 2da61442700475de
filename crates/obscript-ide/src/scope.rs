//! Scope queries over the syntax tree.
//!
//! The syntax tree is the entry point for every editor request. These
//! functions map a position in the tree to the HIR scope that covers it and
//! resolve names the way lowering did.

use std::sync::Arc;

use obscript_hir::{
    normalize_name, Database, FileId, GlobalEntry, Script, ScopeId, SymbolId,
};
use obscript_syntax::algo;
use obscript_syntax::ast::{self, AstNode, SyntaxNodePtr};
use obscript_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::NodeOrToken;
use text_size::{TextRange, TextSize};

use crate::util::IdeContext;

/// A syntax node that opens a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeNode {
    /// The whole script.
    Script(ast::Script),
    /// A block body.
    StmtList(ast::StmtList),
    /// A `foreach` header, holding a declared loop variable.
    Foreach(ast::ForeachStmt),
    /// A lambda parameter list.
    Lambda(ast::LambdaExpr),
}

impl ScopeNode {
    /// Wraps `node` if it opens a scope.
    #[must_use]
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let scope = match node.kind() {
            SyntaxKind::Script => Self::Script(ast::Script::cast(node)?),
            SyntaxKind::StmtList => Self::StmtList(ast::StmtList::cast(node)?),
            SyntaxKind::ForeachStmt => Self::Foreach(ast::ForeachStmt::cast(node)?),
            SyntaxKind::LambdaExpr => Self::Lambda(ast::LambdaExpr::cast(node)?),
            _ => return None,
        };
        Some(scope)
    }

    /// The underlying node.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Script(it) => it.syntax(),
            Self::StmtList(it) => it.syntax(),
            Self::Foreach(it) => it.syntax(),
            Self::Lambda(it) => it.syntax(),
        }
    }

    /// The enclosing scope node.
    #[must_use]
    pub fn parent(&self) -> Option<ScopeNode> {
        find_containing_scope(&NodeOrToken::Node(self.syntax().clone()))
    }
}

/// The innermost scope node containing `element`, the element excluded.
///
/// The iterable of a `foreach` belongs to the scope around the loop: it
/// cannot see the loop variable.
#[must_use]
pub fn find_containing_scope(element: &SyntaxElement) -> Option<ScopeNode> {
    let range = element.text_range();
    algo::ancestors(element).find_map(|node| {
        let scope = ScopeNode::cast(node)?;
        if let ScopeNode::Foreach(foreach) = &scope {
            let in_iterable = foreach
                .iterable()
                .is_some_and(|it| it.syntax().text_range().contains_range(range));
            if in_iterable {
                return None;
            }
        }
        Some(scope)
    })
}

/// The HIR scope opened by `scope`. `None` when the node's statement was
/// dropped during lowering.
#[must_use]
pub fn scope_symbol_table(
    db: &Database,
    file_id: FileId,
    scope: &ScopeNode,
) -> Option<(Arc<Script>, ScopeId)> {
    let script = db.file(file_id)?.hir.clone()?;
    let id = script
        .scopes
        .scope_for_node(&SyntaxNodePtr::new(scope.syntax()))?;
    Some((script, id))
}

/// What a name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// A variable declared in the file.
    Local {
        /// The declaring file.
        file: FileId,
        /// The declaring scope.
        scope: ScopeId,
        /// The symbol.
        symbol: SymbolId,
    },
    /// A builtin, a form, a script name or an undeclared global.
    Global(GlobalEntry),
}

impl Definition {
    /// Returns `true` if both definitions denote the same thing.
    #[must_use]
    pub fn is_same(&self, other: &Definition) -> bool {
        match (self, other) {
            (Self::Global(a), Self::Global(b)) => normalize_name(&a.name) == normalize_name(&b.name),
            _ => self == other,
        }
    }
}

enum MemberRole {
    None,
    /// The name after `.`/`->`.
    Field,
    /// A call after `.`/`->`.
    Method,
}

fn member_role(name_ref: &ast::NameRef) -> MemberRole {
    let is_member_of = |node: &SyntaxNode| {
        node.parent()
            .and_then(ast::MemberExpr::cast)
            .is_some_and(|member| {
                !member.is_index() && member.member().is_some_and(|m| m.syntax() == node)
            })
    };
    let node = name_ref.syntax();
    if is_member_of(node) {
        return MemberRole::Field;
    }
    let callee = node.parent().and_then(ast::FuncExpr::cast);
    if callee.is_some_and(|call| is_member_of(call.syntax())) {
        return MemberRole::Method;
    }
    MemberRole::None
}

fn global_definition(db: &Database, name: &str) -> Option<Definition> {
    db.globals().get(name).cloned().map(Definition::Global)
}

/// Resolves a name reference: locals innermost to outermost, then globals.
/// Member names after `.` or `->` are never resolved.
#[must_use]
pub fn find_definition(db: &Database, file_id: FileId, name_ref: &ast::NameRef) -> Option<Definition> {
    let name = name_ref.text();
    match member_role(name_ref) {
        MemberRole::Field => return None,
        MemberRole::Method => return global_definition(db, &name),
        MemberRole::None => {}
    }

    let element = NodeOrToken::Node(name_ref.syntax().clone());
    let local = find_containing_scope(&element)
        .and_then(|scope| scope_symbol_table(db, file_id, &scope))
        .and_then(|(script, scope)| script.scopes.resolve(scope, &name));
    if let Some((scope, symbol)) = local {
        return Some(Definition::Local {
            file: file_id,
            scope,
            symbol,
        });
    }
    global_definition(db, &name)
}

/// The definition introduced by a declared name: a variable or the script
/// name itself.
#[must_use]
pub fn definition_of_name(db: &Database, file_id: FileId, name: &ast::Name) -> Option<Definition> {
    let parent = name.syntax().parent()?;
    match parent.kind() {
        SyntaxKind::VarDecl => {
            let scope = find_containing_scope(&NodeOrToken::Node(parent))?;
            let (script, scope) = scope_symbol_table(db, file_id, &scope)?;
            let symbol = script.scopes.scope(scope)?.symbols.lookup(&name.text())?;
            Some(Definition::Local {
                file: file_id,
                scope,
                symbol,
            })
        }
        SyntaxKind::ScriptNameDecl => global_definition(db, &name.text()),
        _ => None,
    }
}

/// The definition of the identifier token, whether it declares or uses a
/// name.
#[must_use]
pub fn definition_of_token(db: &Database, file_id: FileId, token: &SyntaxToken) -> Option<Definition> {
    let parent = token.parent()?;
    if let Some(name_ref) = ast::NameRef::cast(parent.clone()) {
        return find_definition(db, file_id, &name_ref);
    }
    definition_of_name(db, file_id, &ast::Name::cast(parent)?)
}

/// The identifier at `offset` and its definition.
#[must_use]
pub fn definition_at(
    db: &Database,
    file_id: FileId,
    offset: TextSize,
) -> Option<(SyntaxToken, Definition)> {
    let context = IdeContext::new(db, file_id)?;
    let token = context.ident_at(offset)?;
    let definition = definition_of_token(db, file_id, &token)?;
    Some((token, definition))
}

/// Ranges in `file_id` naming `definition`, declarations included.
///
/// Local definitions are searched in the subtree of their owning scope;
/// globals in the whole file.
#[must_use]
pub fn find_references(db: &Database, file_id: FileId, definition: &Definition) -> Vec<TextRange> {
    let Some(context) = IdeContext::new(db, file_id) else {
        return Vec::new();
    };
    let (search_root, name) = match definition {
        Definition::Local {
            file,
            scope,
            symbol,
        } => {
            let Some(script) = context.file.hir.as_ref().filter(|_| *file == file_id) else {
                return Vec::new();
            };
            let node = script
                .scopes
                .scope(*scope)
                .and_then(|scope| scope.node.try_to_node(&context.root));
            let Some((node, symbol)) = node.zip(script.scopes.symbol(*symbol)) else {
                return Vec::new();
            };
            (node, symbol.name.clone())
        }
        Definition::Global(entry) => (context.root.clone(), entry.name.clone()),
    };

    let key = normalize_name(&name);
    algo::leaves(&search_root)
        .filter(|token| token.kind() == SyntaxKind::Ident && normalize_name(token.text()) == key)
        .filter(|token| {
            definition_of_token(db, file_id, token).is_some_and(|found| found.is_same(definition))
        })
        .map(|token| token.text_range())
        .collect()
}
