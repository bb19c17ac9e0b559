//! Structure-preserving rewriting of IR trees.
//!
//! Because nodes are immutable, a pass "modifies" a tree by building a new
//! one. The default [`Rewriter`] methods rebuild each node through its
//! smart constructor, which revalidates the typing invariants, and return
//! the original handle whenever no child changed, so untouched subtrees
//! are shared between the input and output trees.
use crate::{
    Add, AssignStmt, Block, Call, Div, Expr, ExprKind, FieldRead, FieldWrite,
    For, ForDomain, ForRange, Func, IfThenElse, IndexExpr, IndexRead,
    IndexSet, IndexedTensor, Length, Load, Map, Mul, Neg, Stmt, StmtKind,
    Store, Sub, TensorRead, TensorWrite, TupleRead,
};

/// Rewrites IR trees bottom-up, sharing unchanged subtrees. Override the
/// method for the nodes a pass replaces and delegate the rest to the
/// defaults.
pub trait Rewriter {
    fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
        default_rewrite_expr(self, expr)
    }

    fn rewrite_stmt(&mut self, stmt: &Stmt) -> Stmt {
        default_rewrite_stmt(self, stmt)
    }

    /// Rewrite a function's body and republish it with the same prototype.
    fn rewrite_func(&mut self, func: &Func) -> Func {
        default_rewrite_func(self, func)
    }
}

fn rewrite_all<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    exprs: &[Expr],
) -> (Vec<Expr>, bool) {
    let rewritten: Vec<Expr> =
        exprs.iter().map(|e| rewriter.rewrite_expr(e)).collect();
    let changed = rewritten
        .iter()
        .zip(exprs)
        .any(|(new, old)| !Expr::ptr_eq(new, old));
    (rewritten, changed)
}

fn rewrite_index_set<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    index_set: &IndexSet,
) -> (IndexSet, bool) {
    match index_set {
        IndexSet::Range(_) => (index_set.clone(), false),
        IndexSet::Set(set) => {
            let rewritten = rewriter.rewrite_expr(set);
            let changed = !Expr::ptr_eq(&rewritten, set);
            (IndexSet::Set(rewritten), changed)
        }
    }
}

/// Rebuild an expression from rewritten children, reusing the node when
/// nothing changed.
pub fn default_rewrite_expr<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    expr: &Expr,
) -> Expr {
    match expr.kind() {
        ExprKind::Literal(_) | ExprKind::VarExpr(_) => expr.clone(),
        ExprKind::FieldRead(node) => {
            let base = rewriter.rewrite_expr(&node.element_or_set);
            if Expr::ptr_eq(&base, &node.element_or_set) {
                expr.clone()
            } else {
                FieldRead::make(base, node.field_name)
            }
        }
        ExprKind::TensorRead(node) => {
            let tensor = rewriter.rewrite_expr(&node.tensor);
            let (indices, indices_changed) =
                rewrite_all(rewriter, &node.indices);
            if Expr::ptr_eq(&tensor, &node.tensor) && !indices_changed {
                expr.clone()
            } else {
                TensorRead::make(tensor, indices)
            }
        }
        ExprKind::TupleRead(node) => {
            let tuple = rewriter.rewrite_expr(&node.tuple);
            let index = rewriter.rewrite_expr(&node.index);
            if Expr::ptr_eq(&tuple, &node.tuple)
                && Expr::ptr_eq(&index, &node.index)
            {
                expr.clone()
            } else {
                TupleRead::make(tuple, index)
            }
        }
        ExprKind::IndexRead(node) => {
            let edge_set = rewriter.rewrite_expr(&node.edge_set);
            if Expr::ptr_eq(&edge_set, &node.edge_set) {
                expr.clone()
            } else {
                IndexRead::make(edge_set, node.index_kind)
            }
        }
        ExprKind::Length(node) => {
            let (index_set, changed) =
                rewrite_index_set(rewriter, &node.index_set);
            if changed {
                Length::make(index_set)
            } else {
                expr.clone()
            }
        }
        ExprKind::IndexedTensor(node) => {
            let tensor = rewriter.rewrite_expr(&node.tensor);
            if Expr::ptr_eq(&tensor, &node.tensor) {
                expr.clone()
            } else {
                IndexedTensor::make(tensor, node.index_vars.clone())
            }
        }
        ExprKind::IndexExpr(node) => {
            let value = rewriter.rewrite_expr(&node.value);
            if Expr::ptr_eq(&value, &node.value) {
                expr.clone()
            } else {
                IndexExpr::make(node.result_vars.clone(), value)
            }
        }
        ExprKind::Call(node) => {
            let (actuals, changed) = rewrite_all(rewriter, &node.actuals);
            if changed {
                Call::make(node.func.clone(), actuals)
            } else {
                expr.clone()
            }
        }
        ExprKind::Neg(node) => {
            let operand = rewriter.rewrite_expr(&node.operand);
            if Expr::ptr_eq(&operand, &node.operand) {
                expr.clone()
            } else {
                Neg::make(operand)
            }
        }
        ExprKind::Add(node) => {
            let lhs = rewriter.rewrite_expr(&node.lhs);
            let rhs = rewriter.rewrite_expr(&node.rhs);
            if Expr::ptr_eq(&lhs, &node.lhs) && Expr::ptr_eq(&rhs, &node.rhs)
            {
                expr.clone()
            } else {
                Add::make(lhs, rhs)
            }
        }
        ExprKind::Sub(node) => {
            let lhs = rewriter.rewrite_expr(&node.lhs);
            let rhs = rewriter.rewrite_expr(&node.rhs);
            if Expr::ptr_eq(&lhs, &node.lhs) && Expr::ptr_eq(&rhs, &node.rhs)
            {
                expr.clone()
            } else {
                Sub::make(lhs, rhs)
            }
        }
        ExprKind::Mul(node) => {
            let lhs = rewriter.rewrite_expr(&node.lhs);
            let rhs = rewriter.rewrite_expr(&node.rhs);
            if Expr::ptr_eq(&lhs, &node.lhs) && Expr::ptr_eq(&rhs, &node.rhs)
            {
                expr.clone()
            } else {
                Mul::make(lhs, rhs)
            }
        }
        ExprKind::Div(node) => {
            let lhs = rewriter.rewrite_expr(&node.lhs);
            let rhs = rewriter.rewrite_expr(&node.rhs);
            if Expr::ptr_eq(&lhs, &node.lhs) && Expr::ptr_eq(&rhs, &node.rhs)
            {
                expr.clone()
            } else {
                Div::make(lhs, rhs)
            }
        }
        ExprKind::Load(node) => {
            let buffer = rewriter.rewrite_expr(&node.buffer);
            let index = rewriter.rewrite_expr(&node.index);
            if Expr::ptr_eq(&buffer, &node.buffer)
                && Expr::ptr_eq(&index, &node.index)
            {
                expr.clone()
            } else {
                Load::make(buffer, index)
            }
        }
    }
}

/// Rebuild a statement from rewritten children, reusing the node when
/// nothing changed.
pub fn default_rewrite_stmt<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    stmt: &Stmt,
) -> Stmt {
    match stmt.kind() {
        StmtKind::AssignStmt(node) => {
            let value = rewriter.rewrite_expr(&node.value);
            if Expr::ptr_eq(&value, &node.value) {
                stmt.clone()
            } else {
                AssignStmt::make(node.var.clone(), value)
            }
        }
        StmtKind::Map(node) => {
            let target = rewriter.rewrite_expr(&node.target);
            let neighbors =
                node.neighbors.as_ref().map(|n| rewriter.rewrite_expr(n));
            let changed = !Expr::ptr_eq(&target, &node.target)
                || match (&neighbors, &node.neighbors) {
                    (Some(new), Some(old)) => !Expr::ptr_eq(new, old),
                    _ => false,
                };
            if changed {
                Map::make(
                    node.vars.clone(),
                    node.function.clone(),
                    target,
                    neighbors,
                    node.reduction,
                )
            } else {
                stmt.clone()
            }
        }
        StmtKind::FieldWrite(node) => {
            let base = rewriter.rewrite_expr(&node.element_or_set);
            let value = rewriter.rewrite_expr(&node.value);
            if Expr::ptr_eq(&base, &node.element_or_set)
                && Expr::ptr_eq(&value, &node.value)
            {
                stmt.clone()
            } else {
                FieldWrite::make(base, node.field_name, value)
            }
        }
        StmtKind::TensorWrite(node) => {
            let tensor = rewriter.rewrite_expr(&node.tensor);
            let (indices, indices_changed) =
                rewrite_all(rewriter, &node.indices);
            let value = rewriter.rewrite_expr(&node.value);
            if Expr::ptr_eq(&tensor, &node.tensor)
                && !indices_changed
                && Expr::ptr_eq(&value, &node.value)
            {
                stmt.clone()
            } else {
                TensorWrite::make(tensor, indices, value)
            }
        }
        StmtKind::Store(node) => {
            let buffer = rewriter.rewrite_expr(&node.buffer);
            let index = rewriter.rewrite_expr(&node.index);
            let value = rewriter.rewrite_expr(&node.value);
            if Expr::ptr_eq(&buffer, &node.buffer)
                && Expr::ptr_eq(&index, &node.index)
                && Expr::ptr_eq(&value, &node.value)
            {
                stmt.clone()
            } else {
                Store::make(buffer, index, value)
            }
        }
        StmtKind::ForRange(node) => {
            let start = rewriter.rewrite_expr(&node.start);
            let end = rewriter.rewrite_expr(&node.end);
            let body = rewriter.rewrite_stmt(&node.body);
            if Expr::ptr_eq(&start, &node.start)
                && Expr::ptr_eq(&end, &node.end)
                && Stmt::ptr_eq(&body, &node.body)
            {
                stmt.clone()
            } else {
                ForRange::make(node.var.clone(), start, end, body)
            }
        }
        StmtKind::For(node) => {
            let (domain, domain_changed) = match &node.domain {
                ForDomain::IndexSet(is) => {
                    let (is, changed) = rewrite_index_set(rewriter, is);
                    (ForDomain::IndexSet(is), changed)
                }
                ForDomain::Endpoints { set, var } => {
                    let rewritten = rewriter.rewrite_expr(set);
                    let changed = !Expr::ptr_eq(&rewritten, set);
                    (
                        ForDomain::Endpoints {
                            set: rewritten,
                            var: var.clone(),
                        },
                        changed,
                    )
                }
                ForDomain::Edges { set, var } => {
                    let rewritten = rewriter.rewrite_expr(set);
                    let changed = !Expr::ptr_eq(&rewritten, set);
                    (
                        ForDomain::Edges {
                            set: rewritten,
                            var: var.clone(),
                        },
                        changed,
                    )
                }
            };
            let body = rewriter.rewrite_stmt(&node.body);
            if !domain_changed && Stmt::ptr_eq(&body, &node.body) {
                stmt.clone()
            } else {
                For::make(node.var.clone(), domain, body)
            }
        }
        StmtKind::IfThenElse(node) => {
            let condition = rewriter.rewrite_expr(&node.condition);
            let then_body = rewriter.rewrite_stmt(&node.then_body);
            let else_body =
                node.else_body.as_ref().map(|e| rewriter.rewrite_stmt(e));
            let changed = !Expr::ptr_eq(&condition, &node.condition)
                || !Stmt::ptr_eq(&then_body, &node.then_body)
                || match (&else_body, &node.else_body) {
                    (Some(new), Some(old)) => !Stmt::ptr_eq(new, old),
                    _ => false,
                };
            if changed {
                IfThenElse::make(condition, then_body, else_body)
            } else {
                stmt.clone()
            }
        }
        StmtKind::Block(node) => {
            let first = rewriter.rewrite_stmt(&node.first);
            let rest = node.rest.as_ref().map(|r| rewriter.rewrite_stmt(r));
            let changed = !Stmt::ptr_eq(&first, &node.first)
                || match (&rest, &node.rest) {
                    (Some(new), Some(old)) => !Stmt::ptr_eq(new, old),
                    _ => false,
                };
            if changed {
                Block::make(first, rest)
            } else {
                stmt.clone()
            }
        }
        StmtKind::Pass(_) => stmt.clone(),
    }
}

/// Rewrite a function's body; republish through the prototype-copy
/// constructor only when the body changed.
pub fn default_rewrite_func<R: Rewriter + ?Sized>(
    rewriter: &mut R,
    func: &Func,
) -> Func {
    match func.body() {
        None => func.clone(),
        Some(body) => {
            let rewritten = rewriter.rewrite_stmt(body);
            if Stmt::ptr_eq(&rewritten, body) {
                func.clone()
            } else {
                func.with_body(rewritten)
            }
        }
    }
}
