//! Statement nodes of the IR.
//!
//! A [`Stmt`] is a handle over a reference-counted, immutable node, like
//! [`Expr`](crate::Expr) but without a cached type.
use std::rc::Rc;

use lattice_utils::Id;

use crate::visitor::{VisResult, Visitor};
use crate::{Expr, Func, IndexSet, ReductionOperator, Var};

/// Handle to an immutable, shared statement node.
#[derive(Debug, Clone)]
pub struct Stmt {
    node: Rc<StmtKind>,
}

impl Stmt {
    fn new(kind: StmtKind) -> Stmt {
        Stmt {
            node: Rc::new(kind),
        }
    }

    pub fn kind(&self) -> &StmtKind {
        &self.node
    }

    /// Node identity: true when both handles reference the same node.
    pub fn ptr_eq(a: &Stmt, b: &Stmt) -> bool {
        Rc::ptr_eq(&a.node, &b.node)
    }

    /// Dispatch to the visitor method for this node's variant.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisResult {
        visitor.visit_stmt(self)
    }
}

/// The statement variants.
#[derive(Debug)]
pub enum StmtKind {
    AssignStmt(AssignStmt),
    Map(Map),
    FieldWrite(FieldWrite),
    TensorWrite(TensorWrite),
    Store(Store),
    ForRange(ForRange),
    For(For),
    IfThenElse(IfThenElse),
    Block(Block),
    Pass(Pass),
}

macro_rules! variant_accessors {
    ($(($variant:ident, $is:ident, $to:ident)),* $(,)?) => {
        impl Stmt {
            $(
                pub fn $is(&self) -> bool {
                    matches!(self.kind(), StmtKind::$variant(_))
                }

                /// Project to the variant payload; the node must be of
                /// that variant.
                pub fn $to(&self) -> &$variant {
                    match self.kind() {
                        StmtKind::$variant(node) => node,
                        _ => panic!(
                            concat!(
                                "statement is not a ",
                                stringify!($variant)
                            )
                        ),
                    }
                }
            )*
        }
    };
}

variant_accessors! {
    (AssignStmt, is_assign, to_assign),
    (Map, is_map, to_map),
    (FieldWrite, is_field_write, to_field_write),
    (TensorWrite, is_tensor_write, to_tensor_write),
    (Store, is_store, to_store),
    (ForRange, is_for_range, to_for_range),
    (For, is_for, to_for),
    (IfThenElse, is_if_then_else, to_if_then_else),
    (Block, is_block, to_block),
    (Pass, is_pass, to_pass),
}

/// Assigns a value to a variable.
#[derive(Debug)]
pub struct AssignStmt {
    pub var: Var,
    pub value: Expr,
}

impl AssignStmt {
    pub fn make(var: Var, value: Expr) -> Stmt {
        Stmt::new(StmtKind::AssignStmt(AssignStmt { var, value }))
    }
}

/// Applies a function to every element of a target set, optionally joining
/// each element with its neighbors, and reduces the per-element results
/// into the bound variables.
#[derive(Debug)]
pub struct Map {
    pub vars: Vec<Var>,
    pub function: Func,
    pub target: Expr,
    pub neighbors: Option<Expr>,
    pub reduction: Option<ReductionOperator>,
}

impl Map {
    pub fn make(
        vars: Vec<Var>,
        function: Func,
        target: Expr,
        neighbors: Option<Expr>,
        reduction: Option<ReductionOperator>,
    ) -> Stmt {
        assert!(
            target.ty().is_set(),
            "map targets are sets, not {}",
            target.ty()
        );
        if let Some(neighbors) = &neighbors {
            assert!(
                neighbors.ty().is_set(),
                "map neighbors are sets, not {}",
                neighbors.ty()
            );
        }
        assert_eq!(
            vars.len(),
            function.results().len(),
            "one bound variable per mapped function result"
        );
        Stmt::new(StmtKind::Map(Map {
            vars,
            function,
            target,
            neighbors,
            reduction,
        }))
    }
}

/// Writes a tensor to an element or set field.
#[derive(Debug)]
pub struct FieldWrite {
    pub element_or_set: Expr,
    pub field_name: Id,
    pub value: Expr,
}

impl FieldWrite {
    pub fn make<N: Into<Id>>(
        element_or_set: Expr,
        field_name: N,
        value: Expr,
    ) -> Stmt {
        Stmt::new(StmtKind::FieldWrite(FieldWrite {
            element_or_set,
            field_name: field_name.into(),
            value,
        }))
    }
}

/// Writes a block to a tensor location.
#[derive(Debug)]
pub struct TensorWrite {
    pub tensor: Expr,
    pub indices: Vec<Expr>,
    pub value: Expr,
}

impl TensorWrite {
    pub fn make(tensor: Expr, indices: Vec<Expr>, value: Expr) -> Stmt {
        Stmt::new(StmtKind::TensorWrite(TensorWrite {
            tensor,
            indices,
            value,
        }))
    }
}

/// Writes one scalar to a buffer.
#[derive(Debug)]
pub struct Store {
    pub buffer: Expr,
    pub index: Expr,
    pub value: Expr,
}

impl Store {
    pub fn make(buffer: Expr, index: Expr, value: Expr) -> Stmt {
        Stmt::new(StmtKind::Store(Store {
            buffer,
            index,
            value,
        }))
    }
}

/// A loop over an integer range.
#[derive(Debug)]
pub struct ForRange {
    pub var: Var,
    pub start: Expr,
    pub end: Expr,
    pub body: Stmt,
}

impl ForRange {
    pub fn make(var: Var, start: Expr, end: Expr, body: Stmt) -> Stmt {
        Stmt::new(StmtKind::ForRange(ForRange {
            var,
            start,
            end,
            body,
        }))
    }
}

/// What a `For` loop iterates over.
#[derive(Debug)]
pub enum ForDomain {
    /// An index set.
    IndexSet(IndexSet),
    /// The endpoints of the edge bound to `var` in the edge set.
    Endpoints { set: Expr, var: Var },
    /// The edges of the set incident to the element bound to `var`.
    Edges { set: Expr, var: Var },
}

impl std::fmt::Display for ForDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForDomain::IndexSet(is) => write!(f, "{}", is),
            ForDomain::Endpoints { set, var } => {
                write!(f, "endpoints({}, {})", crate::Printer::expr_str(set), var)
            }
            ForDomain::Edges { set, var } => {
                write!(f, "edges({}, {})", crate::Printer::expr_str(set), var)
            }
        }
    }
}

/// A loop over a [`ForDomain`].
#[derive(Debug)]
pub struct For {
    pub var: Var,
    pub domain: ForDomain,
    pub body: Stmt,
}

impl For {
    pub fn make(var: Var, domain: ForDomain, body: Stmt) -> Stmt {
        Stmt::new(StmtKind::For(For { var, domain, body }))
    }
}

/// A conditional with an optional else branch.
#[derive(Debug)]
pub struct IfThenElse {
    pub condition: Expr,
    pub then_body: Stmt,
    pub else_body: Option<Stmt>,
}

impl IfThenElse {
    pub fn make(
        condition: Expr,
        then_body: Stmt,
        else_body: Option<Stmt>,
    ) -> Stmt {
        Stmt::new(StmtKind::IfThenElse(IfThenElse {
            condition,
            then_body,
            else_body,
        }))
    }
}

/// A linked pair of statements. Sequences are right-linked chains of
/// blocks.
#[derive(Debug)]
pub struct Block {
    pub first: Stmt,
    pub rest: Option<Stmt>,
}

impl Block {
    pub fn make(first: Stmt, rest: Option<Stmt>) -> Stmt {
        Stmt::new(StmtKind::Block(Block { first, rest }))
    }

    /// Folds a sequence right-to-left into a chain of blocks, so in-order
    /// visitation sees the statements in sequence order.
    pub fn from_stmts(stmts: Vec<Stmt>) -> Stmt {
        assert!(!stmts.is_empty(), "empty block");
        let mut chain: Option<Stmt> = None;
        for stmt in stmts.into_iter().rev() {
            chain = Some(Block::make(stmt, chain));
        }
        chain.unwrap()
    }
}

/// A statement with no effect.
#[derive(Debug)]
pub struct Pass;

impl Pass {
    pub fn make() -> Stmt {
        Stmt::new(StmtKind::Pass(Pass))
    }
}
