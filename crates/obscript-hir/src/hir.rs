//! The lowered representation of a script.
//!
//! HIR drops trivia, punctuation and error nodes, resolves literal values,
//! classifies operators, and binds every local name to the symbol visible
//! at that point.

use smol_str::SmolStr;
use text_size::TextRange;

use crate::symbols::{ScopeId, ScopeTree, SymbolId};
use crate::types::ExprType;

/// A lowered script.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// The declared script name.
    pub name: SmolStr,
    /// The range of the name in the `scriptname` declaration.
    pub name_range: TextRange,
    /// Top-level statements, in the script scope.
    pub body: Vec<Stmt>,
    /// All scopes of the script.
    pub scopes: ScopeTree,
}

/// A statement block with its own scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// The scope opened by the block.
    pub scope: ScopeId,
    /// Statements, in source order.
    pub stmts: Vec<Stmt>,
}

/// A lowered statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// What the statement does.
    pub kind: StmtKind,
    /// Source range of the statement.
    pub range: TextRange,
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `type name [:= init]`
    VarDecl {
        /// The declared symbol.
        symbol: SymbolId,
        /// The initializer, lowered before the declaration.
        init: Option<Expr>,
    },
    /// `set target to value`
    Set {
        /// The assigned expression.
        target: Expr,
        /// The new value.
        value: Expr,
    },
    /// `let expr`
    Let(Expr),
    /// `if cond ... endif`
    If {
        /// The condition.
        condition: Expr,
        /// The `then` block.
        body: Block,
        /// The rest of the chain.
        branch: Option<Box<Branch>>,
    },
    /// `while cond ... loop`
    While {
        /// The condition.
        condition: Expr,
        /// The loop body.
        body: Block,
    },
    /// `foreach var <- iterable ... loop`
    Foreach {
        /// The header scope holding a declared loop variable.
        scope: ScopeId,
        /// The loop variable.
        variable: ForeachVar,
        /// The iterated expression.
        iterable: Expr,
        /// The loop body, nested in the header scope.
        body: Block,
    },
    /// `begin BlockType ... end`
    Begin {
        /// The block type name, such as `GameMode`.
        block_type: SmolStr,
        /// Parameters declared in `{...}`.
        params: Vec<SymbolId>,
        /// Bare block arguments.
        args: Vec<Expr>,
        /// The block body.
        body: Block,
    },
    /// `return [expr]`
    Return(Option<Expr>),
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// An expression statement.
    Expr(Expr),
}

/// The loop variable of a `foreach`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeachVar {
    /// Declared in the header: `foreach array_var entry <- ...`.
    Declared(SymbolId),
    /// An existing variable: `foreach entry <- ...`.
    Existing(Expr),
}

/// The tail of an `if` chain, nested to the right.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    /// `elseif cond ...`
    ElseIf {
        /// The condition.
        condition: Expr,
        /// The branch body.
        body: Block,
        /// The next branch.
        next: Option<Box<Branch>>,
        /// Source range of the branch.
        range: TextRange,
    },
    /// `else ...`
    Else {
        /// The branch body.
        body: Block,
        /// Source range of the branch.
        range: TextRange,
    },
}

/// A lowered expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What the expression computes.
    pub kind: ExprKind,
    /// Best-effort type.
    pub ty: ExprType,
    /// Source range of the expression.
    pub range: TextRange,
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A variable reference. `symbol` is `None` when the name did not
    /// resolve inside the script.
    Name {
        /// The name as written.
        name: SmolStr,
        /// The local symbol it resolves to.
        symbol: Option<SymbolId>,
    },
    /// An integer or hex literal.
    Integer(i64),
    /// A decimal literal.
    Float(f64),
    /// A string literal, quotes stripped.
    String(SmolStr),
    /// `op operand`
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// `lhs op rhs`
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// `base.member`, `base->member`, `base[index]`
    Member {
        /// The access operator.
        op: MemberOp,
        /// The accessed expression.
        base: Box<Expr>,
        /// The member: a [`ExprKind::Field`], a call, or an index expression.
        member: Box<Expr>,
    },
    /// A member name after `.` or `->`. Never resolved locally.
    Field(SmolStr),
    /// A function or command call.
    Call {
        /// The called name.
        name: SmolStr,
        /// A local symbol holding the callee, such as a lambda variable.
        symbol: Option<SymbolId>,
        /// Arguments, in order.
        args: Vec<Expr>,
    },
    /// `(begin Function {params} ... end)`
    Lambda {
        /// The block type name.
        block_type: SmolStr,
        /// The parameter scope.
        scope: ScopeId,
        /// Declared parameters.
        params: Vec<SymbolId>,
        /// The lambda body, nested in the parameter scope.
        body: Block,
    },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
    /// `$`, string conversion.
    ToString,
    /// `#`, numeric conversion.
    ToNumber,
    /// `*`, unboxes an array element.
    Deref,
    /// `&`, boxes a value into an array.
    Box,
}

/// Infix and assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BinaryOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    PowAssign,
    OrAssign,
    AndAssign,
    ModAssign,
    Or,
    And,
    /// `:`, slicing and key-value pairs.
    Slice,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    BitOr,
    BitAnd,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// Returns `true` for `:=` and the compound assignments.
    #[must_use]
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::AddAssign
                | Self::SubAssign
                | Self::MulAssign
                | Self::DivAssign
                | Self::PowAssign
                | Self::OrAssign
                | Self::AndAssign
                | Self::ModAssign
        )
    }
}

/// Member access operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberOp {
    /// `.`
    Dot,
    /// `->`
    Arrow,
    /// `[...]`
    Index,
}

impl Script {
    /// Visits every expression in the script, parents before children.
    pub fn walk_exprs(&self, f: &mut dyn FnMut(&Expr)) {
        for stmt in &self.body {
            walk_stmt(stmt, f);
        }
    }
}

fn walk_block(block: &Block, f: &mut dyn FnMut(&Expr)) {
    for stmt in &block.stmts {
        walk_stmt(stmt, f);
    }
}

fn walk_stmt(stmt: &Stmt, f: &mut dyn FnMut(&Expr)) {
    match &stmt.kind {
        StmtKind::VarDecl { init, .. } => {
            if let Some(init) = init {
                walk_expr(init, f);
            }
        }
        StmtKind::Set { target, value } => {
            walk_expr(target, f);
            walk_expr(value, f);
        }
        StmtKind::Let(expr) | StmtKind::Expr(expr) | StmtKind::Return(Some(expr)) => {
            walk_expr(expr, f);
        }
        StmtKind::If {
            condition,
            body,
            branch,
        } => {
            walk_expr(condition, f);
            walk_block(body, f);
            let mut next = branch.as_deref();
            while let Some(branch) = next {
                match branch {
                    Branch::ElseIf {
                        condition,
                        body,
                        next: tail,
                        ..
                    } => {
                        walk_expr(condition, f);
                        walk_block(body, f);
                        next = tail.as_deref();
                    }
                    Branch::Else { body, .. } => {
                        walk_block(body, f);
                        next = None;
                    }
                }
            }
        }
        StmtKind::While { condition, body } => {
            walk_expr(condition, f);
            walk_block(body, f);
        }
        StmtKind::Foreach {
            variable,
            iterable,
            body,
            ..
        } => {
            if let ForeachVar::Existing(expr) = variable {
                walk_expr(expr, f);
            }
            walk_expr(iterable, f);
            walk_block(body, f);
        }
        StmtKind::Begin { args, body, .. } => {
            for arg in args {
                walk_expr(arg, f);
            }
            walk_block(body, f);
        }
        StmtKind::Return(None) | StmtKind::Break | StmtKind::Continue => {}
    }
}

fn walk_expr(expr: &Expr, f: &mut dyn FnMut(&Expr)) {
    f(expr);
    match &expr.kind {
        ExprKind::Unary { operand, .. } => walk_expr(operand, f),
        ExprKind::Binary { lhs, rhs, .. } => {
            walk_expr(lhs, f);
            walk_expr(rhs, f);
        }
        ExprKind::Member { base, member, .. } => {
            walk_expr(base, f);
            walk_expr(member, f);
        }
        ExprKind::Call { args, .. } => {
            for arg in args {
                walk_expr(arg, f);
            }
        }
        ExprKind::Lambda { body, .. } => walk_block(body, f),
        ExprKind::Name { .. }
        | ExprKind::Integer(_)
        | ExprKind::Float(_)
        | ExprKind::String(_)
        | ExprKind::Field(_) => {}
    }
}
