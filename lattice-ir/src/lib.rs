//! Intermediate representation for the Lattice compiler.
//!
//! The IR is the typed tree the whole compiler manipulates: the frontend
//! produces it, analyses traverse it, transformations rewrite it, and the
//! backend lowers it. Nodes are immutable after construction and shared
//! through cheap reference-counted handles ([`Expr`], [`Stmt`], [`Func`]),
//! so a pass that rewrites a tree reuses every subtree it does not change.
//! All construction goes through smart constructors that enforce the typing
//! invariants; violating one is a bug in the caller and aborts the process.

// Modules defining the IR structures.
mod domain;
mod expr;
mod func;
mod indexvar;
mod printer;
mod rewriter;
mod stmt;
mod tensor_index;
mod types;
mod var;
mod visitor;

/// Registry of built-in functions.
pub mod intrinsics;

// Re-export types at the module level.
pub use domain::{IndexDomain, IndexSet};
pub use expr::{
    block_type, field_type, index_expr_type, Add, Call, Div, Expr, ExprKind,
    FieldRead, IndexExpr, IndexKind, IndexRead, IndexedTensor, Length,
    Literal, Load, Mul, Neg, Sub, TensorRead, TupleRead, VarExpr,
};
pub use func::{Func, FuncKind};
pub use indexvar::{IndexVar, ReductionOperator};
pub use printer::Printer;
pub use rewriter::{
    default_rewrite_expr, default_rewrite_func, default_rewrite_stmt,
    Rewriter,
};
pub use stmt::{
    AssignStmt, Block, FieldWrite, For, ForDomain, ForRange, IfThenElse, Map,
    Pass, Stmt, StmtKind, Store, TensorWrite,
};
pub use tensor_index::{PathExpression, TensorIndex};
pub use types::{
    float, int, is_scalar, ArrayType, ElementType, ScalarKind, ScalarType,
    SetType, TensorType, TupleType, Type, TypeKind,
};
pub use var::Var;
pub use visitor::{
    walk_expr, walk_func, walk_stmt, Action, VisResult, Visitor,
};

// Re-export shared utilities used in the public interface.
pub use lattice_utils::{GetName, Id, LatticeResult};
