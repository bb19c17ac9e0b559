//! The traversal protocol every consumer of the IR uses.
//!
//! A pass implements [`Visitor`], overrides the methods for the variants it
//! cares about, and relies on the defaults to descend into children.
//! Dispatch is a closed-set match in [`walk_expr`]/[`walk_stmt`];
//! `accept` on a handle enters the protocol at that node.
use lattice_utils::LatticeResult;

use crate::{
    Add, AssignStmt, Block, Call, Div, Expr, ExprKind, FieldRead, FieldWrite,
    For, ForDomain, ForRange, Func, IfThenElse, IndexExpr, IndexRead,
    IndexSet, IndexedTensor, Length, Literal, Load, Map, Mul, Neg, Pass,
    Stmt, StmtKind, Store, Sub, TensorRead, TensorWrite, TupleRead, VarExpr,
};

/// Result of performing a visit.
pub type VisResult = LatticeResult<Action>;

/// A visit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue the traversal.
    Continue,
    /// Globally abort the traversal.
    Stop,
}

impl Action {
    /// Monadic helper that sequences actions returning a [`VisResult`]:
    /// runs `other` on `Continue` and passes `Stop` through.
    pub fn and_then<F>(self, other: F) -> VisResult
    where
        F: FnOnce() -> VisResult,
    {
        match self {
            Action::Continue => other(),
            x => Ok(x),
        }
    }
}

fn accept_all<V: Visitor + ?Sized>(
    visitor: &mut V,
    exprs: &[Expr],
) -> VisResult {
    for expr in exprs {
        if let Action::Stop = expr.accept(visitor)? {
            return Ok(Action::Stop);
        }
    }
    Ok(Action::Continue)
}

fn accept_index_set<V: Visitor + ?Sized>(
    visitor: &mut V,
    index_set: &IndexSet,
) -> VisResult {
    match index_set {
        IndexSet::Range(_) => Ok(Action::Continue),
        IndexSet::Set(set) => set.accept(visitor),
    }
}

/// The visiting interface for IR trees. Every method defaults to a
/// pre-order recursive descent; a pass overrides the variants it is
/// interested in. Returning [`Action::Stop`] aborts the remainder of the
/// traversal.
pub trait Visitor {
    /// Visit an expression node; dispatches on the variant.
    fn visit_expr(&mut self, expr: &Expr) -> VisResult {
        walk_expr(self, expr)
    }

    /// Visit a statement node; dispatches on the variant.
    fn visit_stmt(&mut self, stmt: &Stmt) -> VisResult {
        walk_stmt(self, stmt)
    }

    /// Visit a function; descends into its body if it has one.
    fn visit_func(&mut self, func: &Func) -> VisResult {
        walk_func(self, func)
    }

    fn visit_literal(&mut self, _node: &Literal) -> VisResult {
        Ok(Action::Continue)
    }

    fn visit_var_expr(&mut self, _node: &VarExpr) -> VisResult {
        Ok(Action::Continue)
    }

    fn visit_field_read(&mut self, node: &FieldRead) -> VisResult {
        node.element_or_set.accept(self)
    }

    fn visit_tensor_read(&mut self, node: &TensorRead) -> VisResult {
        node.tensor
            .accept(self)?
            .and_then(|| accept_all(self, &node.indices))
    }

    fn visit_tuple_read(&mut self, node: &TupleRead) -> VisResult {
        node.tuple.accept(self)?.and_then(|| node.index.accept(self))
    }

    fn visit_index_read(&mut self, node: &IndexRead) -> VisResult {
        node.edge_set.accept(self)
    }

    fn visit_length(&mut self, node: &Length) -> VisResult {
        accept_index_set(self, &node.index_set)
    }

    fn visit_indexed_tensor(&mut self, node: &IndexedTensor) -> VisResult {
        node.tensor.accept(self)
    }

    fn visit_index_expr(&mut self, node: &IndexExpr) -> VisResult {
        node.value.accept(self)
    }

    fn visit_call(&mut self, node: &Call) -> VisResult {
        accept_all(self, &node.actuals)
    }

    fn visit_neg(&mut self, node: &Neg) -> VisResult {
        node.operand.accept(self)
    }

    fn visit_add(&mut self, node: &Add) -> VisResult {
        node.lhs.accept(self)?.and_then(|| node.rhs.accept(self))
    }

    fn visit_sub(&mut self, node: &Sub) -> VisResult {
        node.lhs.accept(self)?.and_then(|| node.rhs.accept(self))
    }

    fn visit_mul(&mut self, node: &Mul) -> VisResult {
        node.lhs.accept(self)?.and_then(|| node.rhs.accept(self))
    }

    fn visit_div(&mut self, node: &Div) -> VisResult {
        node.lhs.accept(self)?.and_then(|| node.rhs.accept(self))
    }

    fn visit_load(&mut self, node: &Load) -> VisResult {
        node.buffer.accept(self)?.and_then(|| node.index.accept(self))
    }

    fn visit_assign(&mut self, node: &AssignStmt) -> VisResult {
        node.value.accept(self)
    }

    fn visit_map(&mut self, node: &Map) -> VisResult {
        node.target.accept(self)?.and_then(|| match &node.neighbors {
            Some(neighbors) => neighbors.accept(self),
            None => Ok(Action::Continue),
        })
    }

    fn visit_field_write(&mut self, node: &FieldWrite) -> VisResult {
        node.element_or_set
            .accept(self)?
            .and_then(|| node.value.accept(self))
    }

    fn visit_tensor_write(&mut self, node: &TensorWrite) -> VisResult {
        node.tensor
            .accept(self)?
            .and_then(|| accept_all(self, &node.indices))?
            .and_then(|| node.value.accept(self))
    }

    fn visit_store(&mut self, node: &Store) -> VisResult {
        node.buffer
            .accept(self)?
            .and_then(|| node.index.accept(self))?
            .and_then(|| node.value.accept(self))
    }

    fn visit_for_range(&mut self, node: &ForRange) -> VisResult {
        node.start
            .accept(self)?
            .and_then(|| node.end.accept(self))?
            .and_then(|| node.body.accept(self))
    }

    fn visit_for(&mut self, node: &For) -> VisResult {
        let domain = match &node.domain {
            ForDomain::IndexSet(is) => accept_index_set(self, is),
            ForDomain::Endpoints { set, .. }
            | ForDomain::Edges { set, .. } => set.accept(self),
        };
        domain?.and_then(|| node.body.accept(self))
    }

    fn visit_if_then_else(&mut self, node: &IfThenElse) -> VisResult {
        node.condition
            .accept(self)?
            .and_then(|| node.then_body.accept(self))?
            .and_then(|| match &node.else_body {
                Some(else_body) => else_body.accept(self),
                None => Ok(Action::Continue),
            })
    }

    fn visit_block(&mut self, node: &Block) -> VisResult {
        node.first.accept(self)?.and_then(|| match &node.rest {
            Some(rest) => rest.accept(self),
            None => Ok(Action::Continue),
        })
    }

    fn visit_pass(&mut self, _node: &Pass) -> VisResult {
        Ok(Action::Continue)
    }
}

/// Dispatch an expression to the visitor method for its variant.
pub fn walk_expr<V: Visitor + ?Sized>(
    visitor: &mut V,
    expr: &Expr,
) -> VisResult {
    match expr.kind() {
        ExprKind::Literal(node) => visitor.visit_literal(node),
        ExprKind::VarExpr(node) => visitor.visit_var_expr(node),
        ExprKind::FieldRead(node) => visitor.visit_field_read(node),
        ExprKind::TensorRead(node) => visitor.visit_tensor_read(node),
        ExprKind::TupleRead(node) => visitor.visit_tuple_read(node),
        ExprKind::IndexRead(node) => visitor.visit_index_read(node),
        ExprKind::Length(node) => visitor.visit_length(node),
        ExprKind::IndexedTensor(node) => visitor.visit_indexed_tensor(node),
        ExprKind::IndexExpr(node) => visitor.visit_index_expr(node),
        ExprKind::Call(node) => visitor.visit_call(node),
        ExprKind::Neg(node) => visitor.visit_neg(node),
        ExprKind::Add(node) => visitor.visit_add(node),
        ExprKind::Sub(node) => visitor.visit_sub(node),
        ExprKind::Mul(node) => visitor.visit_mul(node),
        ExprKind::Div(node) => visitor.visit_div(node),
        ExprKind::Load(node) => visitor.visit_load(node),
    }
}

/// Dispatch a statement to the visitor method for its variant.
pub fn walk_stmt<V: Visitor + ?Sized>(
    visitor: &mut V,
    stmt: &Stmt,
) -> VisResult {
    match stmt.kind() {
        StmtKind::AssignStmt(node) => visitor.visit_assign(node),
        StmtKind::Map(node) => visitor.visit_map(node),
        StmtKind::FieldWrite(node) => visitor.visit_field_write(node),
        StmtKind::TensorWrite(node) => visitor.visit_tensor_write(node),
        StmtKind::Store(node) => visitor.visit_store(node),
        StmtKind::ForRange(node) => visitor.visit_for_range(node),
        StmtKind::For(node) => visitor.visit_for(node),
        StmtKind::IfThenElse(node) => visitor.visit_if_then_else(node),
        StmtKind::Block(node) => visitor.visit_block(node),
        StmtKind::Pass(node) => visitor.visit_pass(node),
    }
}

/// Descend into a function's body, if it has one.
pub fn walk_func<V: Visitor + ?Sized>(
    visitor: &mut V,
    func: &Func,
) -> VisResult {
    match func.body() {
        Some(body) => body.accept(visitor),
        None => Ok(Action::Continue),
    }
}
