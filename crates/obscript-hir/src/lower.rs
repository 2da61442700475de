//! Lowering from the typed AST to HIR.
//!
//! The lowerer walks the AST once, opening a scope for the script, for every
//! block body, for each `foreach` header and for each lambda parameter list.
//! Names are resolved against the scope chain as they are met, so a use
//! before its declaration does not see it.
//!
//! Lowering is partial: a statement whose parts cannot be lowered (a
//! missing operand, an unparsable literal) is left out of the HIR. The
//! syntax diagnostics already describe the problem.

use indexmap::IndexMap;
use obscript_syntax::ast::{self, AstNode, LiteralKind, SyntaxNodePtr, VarOrVarDecl};
use obscript_syntax::SyntaxKind;
use smol_str::SmolStr;
use tracing::debug;

use crate::hir::{
    BinaryOp, Block, Branch, Expr, ExprKind, ForeachVar, MemberOp, Script, Stmt, StmtKind, UnaryOp,
};
use crate::symbols::{normalize_name, ScopeId, ScopeKind, ScopeTree, Symbol, SymbolId, SymbolKind};
use crate::types::ExprType;

/// The result of lowering one script.
#[derive(Debug, Clone, PartialEq)]
pub struct LowerOutput {
    /// The lowered script.
    pub script: Script,
    /// Names used in the script that no local declaration covers, in first
    /// use order, one entry per case-folded name.
    pub external_names: Vec<SmolStr>,
}

/// Lowers a parsed script. Returns `None` when the script has no name.
#[must_use]
pub fn lower(script: &ast::Script) -> Option<LowerOutput> {
    let Some(name) = script.name_decl().and_then(|decl| decl.name()) else {
        debug!("not lowering script without a name");
        return None;
    };
    let name_range = name.ident_token()?.text_range();

    let mut lowerer = Lowerer::new(SyntaxNodePtr::new(script.syntax()));
    let body = lowerer.lower_stmts(script.stmts());
    let Lowerer {
        scopes, external, ..
    } = lowerer;

    debug!(
        "lowered script {}: {} scopes, {} external names",
        name.text(),
        scopes.scopes().len(),
        external.len()
    );

    Some(LowerOutput {
        script: Script {
            name: name.text(),
            name_range,
            body,
            scopes,
        },
        external_names: external.into_values().collect(),
    })
}

struct Lowerer {
    scopes: ScopeTree,
    stack: Vec<ScopeId>,
    external: IndexMap<SmolStr, SmolStr>,
}

impl Lowerer {
    fn new(root: SyntaxNodePtr) -> Self {
        Self {
            scopes: ScopeTree::new(root),
            stack: vec![ScopeId::ROOT],
            external: IndexMap::new(),
        }
    }

    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::ROOT)
    }

    fn enter(&mut self, kind: ScopeKind, node: &obscript_syntax::SyntaxNode) -> ScopeId {
        let scope = self
            .scopes
            .push_scope(self.current(), kind, SyntaxNodePtr::new(node));
        self.stack.push(scope);
        scope
    }

    fn exit(&mut self) {
        self.stack.pop();
    }

    fn declare(&mut self, decl: &ast::VarDecl) -> Option<SymbolId> {
        let ty = decl
            .type_token()
            .and_then(|token| ExprType::from_keyword(token.kind()))
            .unwrap_or_default();
        let name = decl.name()?;
        let symbol = Symbol {
            name: name.text(),
            kind: SymbolKind::Variable,
            ty,
            decl: SyntaxNodePtr::new(decl.syntax()),
            name_range: name.ident_token()?.text_range(),
        };
        Some(self.scopes.define(self.current(), symbol))
    }

    fn note_external(&mut self, name: &SmolStr) {
        self.external
            .entry(normalize_name(name))
            .or_insert_with(|| name.clone());
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn lower_stmts(&mut self, stmts: impl Iterator<Item = ast::Stmt>) -> Vec<Stmt> {
        stmts.filter_map(|stmt| self.lower_stmt(&stmt)).collect()
    }

    fn lower_block(&mut self, list: Option<ast::StmtList>) -> Option<Block> {
        let list = list?;
        let scope = self.enter(ScopeKind::Block, list.syntax());
        let stmts = self.lower_stmts(list.stmts());
        self.exit();
        Some(Block { scope, stmts })
    }

    fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Option<Stmt> {
        let range = stmt.syntax().text_range();
        let Some(kind) = self.lower_stmt_kind(stmt) else {
            debug!("omitting statement at {range:?}: lowering failed");
            return None;
        };
        Some(Stmt { kind, range })
    }

    fn lower_stmt_kind(&mut self, stmt: &ast::Stmt) -> Option<StmtKind> {
        let kind = match stmt {
            ast::Stmt::VarDeclStmt(it) => {
                let init = it.initializer().and_then(|expr| self.lower_expr(&expr));
                let symbol = self.declare(&it.var_decl()?)?;
                StmtKind::VarDecl { symbol, init }
            }
            ast::Stmt::SetStmt(it) => {
                let target = self.lower_expr(&it.target()?)?;
                let value = self.lower_expr(&it.value()?)?;
                StmtKind::Set { target, value }
            }
            ast::Stmt::LetStmt(it) => StmtKind::Let(self.lower_expr(&it.expr()?)?),
            ast::Stmt::IfStmt(it) => {
                let condition = self.lower_expr(&it.condition()?)?;
                let body = self.lower_block(it.body())?;
                let branch = match it.branch() {
                    Some(branch) => Some(Box::new(self.lower_branch(&branch)?)),
                    None => None,
                };
                StmtKind::If {
                    condition,
                    body,
                    branch,
                }
            }
            ast::Stmt::WhileStmt(it) => {
                let condition = self.lower_expr(&it.condition()?)?;
                let body = self.lower_block(it.body())?;
                StmtKind::While { condition, body }
            }
            ast::Stmt::ForeachStmt(it) => self.lower_foreach(it)?,
            ast::Stmt::BeginStmt(it) => self.lower_begin(it)?,
            ast::Stmt::ReturnStmt(it) => match it.expr() {
                Some(expr) => StmtKind::Return(Some(self.lower_expr(&expr)?)),
                None => StmtKind::Return(None),
            },
            ast::Stmt::BreakStmt(_) => StmtKind::Break,
            ast::Stmt::ContinueStmt(_) => StmtKind::Continue,
            ast::Stmt::ExprStmt(it) => StmtKind::Expr(self.lower_expr(&it.expr()?)?),
        };
        Some(kind)
    }

    fn lower_branch(&mut self, branch: &ast::Branch) -> Option<Branch> {
        let range = branch.syntax().text_range();
        match branch {
            ast::Branch::ElseIfBranch(it) => {
                let condition = self.lower_expr(&it.condition()?)?;
                let body = self.lower_block(it.body())?;
                let next = match it.branch() {
                    Some(next) => Some(Box::new(self.lower_branch(&next)?)),
                    None => None,
                };
                Some(Branch::ElseIf {
                    condition,
                    body,
                    next,
                    range,
                })
            }
            ast::Branch::ElseBranch(it) => Some(Branch::Else {
                body: self.lower_block(it.body())?,
                range,
            }),
        }
    }

    fn lower_foreach(&mut self, foreach: &ast::ForeachStmt) -> Option<StmtKind> {
        // The iterable cannot see the loop variable.
        let iterable = self.lower_expr(&foreach.iterable()?)?;
        let scope = self.enter(ScopeKind::ForeachHeader, foreach.syntax());
        let lowered = self.lower_foreach_inner(foreach, iterable, scope);
        self.exit();
        lowered
    }

    fn lower_foreach_inner(
        &mut self,
        foreach: &ast::ForeachStmt,
        iterable: Expr,
        scope: ScopeId,
    ) -> Option<StmtKind> {
        let variable = match foreach.variable()? {
            VarOrVarDecl::VarDecl(decl) => ForeachVar::Declared(self.declare(&decl)?),
            VarOrVarDecl::NameRef(name_ref) => ForeachVar::Existing(self.lower_name_ref(&name_ref)),
        };
        let body = self.lower_block(foreach.body())?;
        Some(StmtKind::Foreach {
            scope,
            variable,
            iterable,
            body,
        })
    }

    fn lower_begin(&mut self, begin: &ast::BeginStmt) -> Option<StmtKind> {
        let block_type = begin.block_type()?.text();
        let params = match begin.param_list() {
            Some(list) => self.lower_params(&list),
            None => Vec::new(),
        };
        let args = match begin.arg_list() {
            Some(list) => list
                .args()
                .map(|arg| self.lower_expr(&arg))
                .collect::<Option<Vec<_>>>()?,
            None => Vec::new(),
        };
        let body = self.lower_block(begin.body())?;
        Some(StmtKind::Begin {
            block_type,
            params,
            args,
            body,
        })
    }

    /// Declares typed parameters in the current scope; untyped ones must
    /// name a variable that is already visible.
    fn lower_params(&mut self, list: &ast::ParamList) -> Vec<SymbolId> {
        let mut params = Vec::new();
        for param in list.params() {
            let symbol = match param {
                VarOrVarDecl::VarDecl(decl) => self.declare(&decl),
                VarOrVarDecl::NameRef(name_ref) => self
                    .scopes
                    .resolve(self.current(), &name_ref.text())
                    .map(|(_, symbol)| symbol),
            };
            params.extend(symbol);
        }
        params
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn lower_expr(&mut self, expr: &ast::Expr) -> Option<Expr> {
        let range = expr.syntax().text_range();
        let (kind, ty) = match expr {
            ast::Expr::NameRef(it) => return Some(self.lower_name_ref(it)),
            ast::Expr::Literal(it) => lower_literal(it)?,
            ast::Expr::ParenExpr(it) => return self.lower_expr(&it.expr()?),
            ast::Expr::UnaryExpr(it) => {
                let op = unary_op(it.op_token()?.kind())?;
                let operand = self.lower_expr(&it.expr()?)?;
                let kind = ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                };
                (kind, ExprType::Unknown)
            }
            ast::Expr::BinExpr(it) => {
                let op = binary_op(it.op_kind()?)?;
                let lhs = self.lower_expr(&it.lhs()?)?;
                let rhs = self.lower_expr(&it.rhs()?)?;
                let kind = ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
                (kind, ExprType::Unknown)
            }
            ast::Expr::MemberExpr(it) => (self.lower_member(it)?, ExprType::Unknown),
            ast::Expr::FuncExpr(it) => (self.lower_call(it)?, ExprType::Unknown),
            ast::Expr::LambdaExpr(it) => (self.lower_lambda(it)?, ExprType::Unknown),
        };
        Some(Expr { kind, ty, range })
    }

    fn lower_name_ref(&mut self, name_ref: &ast::NameRef) -> Expr {
        let name = name_ref.text();
        let range = name_ref.syntax().text_range();
        match self.scopes.resolve(self.current(), &name) {
            Some((_, symbol)) => {
                let ty = self.scopes.symbol(symbol).map(|s| s.ty).unwrap_or_default();
                Expr {
                    kind: ExprKind::Name {
                        name,
                        symbol: Some(symbol),
                    },
                    ty,
                    range,
                }
            }
            None => {
                self.note_external(&name);
                Expr {
                    kind: ExprKind::Name { name, symbol: None },
                    ty: ExprType::Ambiguous,
                    range,
                }
            }
        }
    }

    fn lower_member(&mut self, member: &ast::MemberExpr) -> Option<ExprKind> {
        let op = match member.op_token()?.kind() {
            SyntaxKind::Dot => MemberOp::Dot,
            SyntaxKind::Arrow => MemberOp::Arrow,
            SyntaxKind::LBracket => MemberOp::Index,
            _ => return None,
        };
        let base = self.lower_expr(&member.base()?)?;
        let target = member.member()?;
        let lowered = match (op, &target) {
            (MemberOp::Index, _) => self.lower_expr(&target)?,
            (_, ast::Expr::NameRef(name_ref)) => Expr {
                kind: ExprKind::Field(name_ref.text()),
                ty: ExprType::Unknown,
                range: name_ref.syntax().text_range(),
            },
            _ => self.lower_expr(&target)?,
        };
        Some(ExprKind::Member {
            op,
            base: Box::new(base),
            member: Box::new(lowered),
        })
    }

    fn lower_call(&mut self, call: &ast::FuncExpr) -> Option<ExprKind> {
        let name = call.name_ref()?.text();
        let symbol = self
            .scopes
            .resolve(self.current(), &name)
            .map(|(_, symbol)| symbol);
        if symbol.is_none() {
            self.note_external(&name);
        }
        let args = call
            .args()
            .map(|arg| self.lower_expr(&arg))
            .collect::<Option<Vec<_>>>()?;
        Some(ExprKind::Call { name, symbol, args })
    }

    fn lower_lambda(&mut self, lambda: &ast::LambdaExpr) -> Option<ExprKind> {
        let block_type = lambda.block_type()?.text();
        let scope = self.enter(ScopeKind::LambdaParams, lambda.syntax());
        let params = match lambda.param_list() {
            Some(list) => self.lower_params(&list),
            None => Vec::new(),
        };
        let body = self.lower_block(lambda.body());
        self.exit();
        Some(ExprKind::Lambda {
            block_type,
            scope,
            params,
            body: body?,
        })
    }
}

fn lower_literal(literal: &ast::Literal) -> Option<(ExprKind, ExprType)> {
    let token = literal.token()?;
    let text = token.text();
    let lowered = match literal.kind()? {
        LiteralKind::Number if text.contains('.') => {
            (ExprKind::Float(text.parse().ok()?), ExprType::Float)
        }
        LiteralKind::Number => match text.parse::<i64>() {
            Ok(value) => (ExprKind::Integer(value), ExprType::Integer),
            // Too large for an integer; the engine stores it as a float.
            Err(_) => (ExprKind::Float(text.parse().ok()?), ExprType::Float),
        },
        LiteralKind::HexNumber => {
            let digits = text.get(2..)?;
            let value = i64::from_str_radix(digits, 16).ok()?;
            (ExprKind::Integer(value), ExprType::Integer)
        }
        LiteralKind::String => (ExprKind::String(unquote(text).into()), ExprType::String),
    };
    Some(lowered)
}

/// Strips the opening quote and, when present, the matching closing one.
fn unquote(text: &str) -> &str {
    let Some(quote) = text.chars().next() else {
        return text;
    };
    let inner = &text[quote.len_utf8()..];
    inner.strip_suffix(quote).unwrap_or(inner)
}

/// Maps a prefix operator token.
#[must_use]
pub fn unary_op(kind: SyntaxKind) -> Option<UnaryOp> {
    let op = match kind {
        SyntaxKind::Bang => UnaryOp::Not,
        SyntaxKind::Minus => UnaryOp::Neg,
        SyntaxKind::Dollar => UnaryOp::ToString,
        SyntaxKind::Hash => UnaryOp::ToNumber,
        SyntaxKind::Star => UnaryOp::Deref,
        SyntaxKind::Amp => UnaryOp::Box,
        _ => return None,
    };
    Some(op)
}

/// Maps an infix or assignment operator token.
#[must_use]
pub fn binary_op(kind: SyntaxKind) -> Option<BinaryOp> {
    let op = match kind {
        SyntaxKind::ColonEq => BinaryOp::Assign,
        SyntaxKind::PlusEq => BinaryOp::AddAssign,
        SyntaxKind::MinusEq => BinaryOp::SubAssign,
        SyntaxKind::StarEq => BinaryOp::MulAssign,
        SyntaxKind::SlashEq => BinaryOp::DivAssign,
        SyntaxKind::CaretEq => BinaryOp::PowAssign,
        SyntaxKind::PipeEq => BinaryOp::OrAssign,
        SyntaxKind::AmpEq => BinaryOp::AndAssign,
        SyntaxKind::PercentEq => BinaryOp::ModAssign,
        SyntaxKind::PipePipe => BinaryOp::Or,
        SyntaxKind::AmpAmp => BinaryOp::And,
        SyntaxKind::Colon => BinaryOp::Slice,
        SyntaxKind::EqEq => BinaryOp::Eq,
        SyntaxKind::BangEq => BinaryOp::Ne,
        SyntaxKind::Lt => BinaryOp::Lt,
        SyntaxKind::Gt => BinaryOp::Gt,
        SyntaxKind::LtEq => BinaryOp::Le,
        SyntaxKind::GtEq => BinaryOp::Ge,
        SyntaxKind::Pipe => BinaryOp::BitOr,
        SyntaxKind::Amp => BinaryOp::BitAnd,
        SyntaxKind::Shl => BinaryOp::Shl,
        SyntaxKind::Shr => BinaryOp::Shr,
        SyntaxKind::Plus => BinaryOp::Add,
        SyntaxKind::Minus => BinaryOp::Sub,
        SyntaxKind::Star => BinaryOp::Mul,
        SyntaxKind::Slash => BinaryOp::Div,
        SyntaxKind::Percent => BinaryOp::Mod,
        SyntaxKind::Caret => BinaryOp::Pow,
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use obscript_syntax::parse;

    fn lower_source(source: &str) -> LowerOutput {
        let parsed = parse(source);
        lower(&parsed.script().unwrap()).unwrap()
    }

    #[test]
    fn test_unnamed_script_is_not_lowered() {
        let parsed = parse("float f\n");
        assert!(lower(&parsed.script().unwrap()).is_none());
    }

    #[test]
    fn test_literals() {
        let output = lower_source("scn T\nlet a := 0x1F\nlet b := \"hi\"\nlet c := 2.5\nlet d := 'x'\n");
        let values: Vec<_> = output
            .script
            .body
            .iter()
            .map(|stmt| match &stmt.kind {
                StmtKind::Let(Expr {
                    kind: ExprKind::Binary { rhs, .. },
                    ..
                }) => (rhs.kind.clone(), rhs.ty),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            values,
            vec![
                (ExprKind::Integer(31), ExprType::Integer),
                (ExprKind::String("hi".into()), ExprType::String),
                (ExprKind::Float(2.5), ExprType::Float),
                (ExprKind::String("x".into()), ExprType::String),
            ]
        );
    }

    #[test]
    fn test_every_prefix_operator_is_classified() {
        for (source, op) in [
            ("!a", UnaryOp::Not),
            ("-a", UnaryOp::Neg),
            ("$a", UnaryOp::ToString),
            ("#a", UnaryOp::ToNumber),
            ("*a", UnaryOp::Deref),
            ("&a", UnaryOp::Box),
        ] {
            let output = lower_source(&format!("scn T\nlet x := {source}\n"));
            let StmtKind::Let(Expr {
                kind: ExprKind::Binary { rhs, .. },
                ..
            }) = &output.script.body[0].kind
            else {
                panic!("expected assignment for {source}");
            };
            assert!(
                matches!(&rhs.kind, ExprKind::Unary { op: found, .. } if *found == op),
                "{source}: {:?}",
                rhs.kind
            );
        }
    }

    #[test]
    fn test_member_names_are_fields() {
        let output = lower_source("scn T\nset q.stage to 1\n");
        let StmtKind::Set { target, .. } = &output.script.body[0].kind else {
            panic!("expected set");
        };
        let ExprKind::Member { op, member, .. } = &target.kind else {
            panic!("expected member access");
        };
        assert_eq!(*op, MemberOp::Dot);
        assert_eq!(member.kind, ExprKind::Field("stage".into()));
        assert_eq!(output.external_names, vec![SmolStr::new("q")]);
    }

    #[test]
    fn test_failed_statement_is_omitted() {
        let output = lower_source("scn T\nint a\nset a to\nset a to 2\n");
        assert_eq!(output.script.body.len(), 2);
    }

    #[test]
    fn test_external_names_are_unique_per_folded_name() {
        let output = lower_source("scn T\nlet x := Foo + foo + FOO\nbegin GameMode\nPrintC \"x\"\nend\n");
        assert_eq!(
            output.external_names,
            vec![SmolStr::new("x"), SmolStr::new("Foo"), SmolStr::new("PrintC")]
        );
    }
}
