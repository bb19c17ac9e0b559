//! Functions: named routines binding a body statement to argument and
//! result variables.
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use lattice_utils::{GetName, Id};

use crate::visitor::{VisResult, Visitor};
use crate::{Stmt, Var};

/// Whether a function's body lives in the IR or in the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKind {
    /// Defined in the program; carries a body.
    Internal,
    /// Provided by the runtime or backend; has no body.
    Intrinsic,
}

#[derive(Debug)]
struct FuncData {
    kind: FuncKind,
    name: Id,
    arguments: Vec<Var>,
    results: Vec<Var>,
    body: Option<Stmt>,
    temporaries: Vec<Var>,
}

/// Handle to a shared function descriptor. Like variables, functions have
/// reference identity.
#[derive(Debug, Clone)]
pub struct Func {
    data: Rc<FuncData>,
}

impl Func {
    /// An internal function with the given body.
    pub fn new<N: Into<Id>>(
        name: N,
        arguments: Vec<Var>,
        results: Vec<Var>,
        body: Stmt,
    ) -> Func {
        Func {
            data: Rc::new(FuncData {
                kind: FuncKind::Internal,
                name: name.into(),
                arguments,
                results,
                body: Some(body),
                temporaries: Vec::new(),
            }),
        }
    }

    /// An intrinsic function. Intrinsics have no body; their implementation
    /// is supplied by the runtime.
    pub fn intrinsic<N: Into<Id>>(
        name: N,
        arguments: Vec<Var>,
        results: Vec<Var>,
    ) -> Func {
        Func {
            data: Rc::new(FuncData {
                kind: FuncKind::Intrinsic,
                name: name.into(),
                arguments,
                results,
                body: None,
                temporaries: Vec::new(),
            }),
        }
    }

    /// A function with the same prototype as this one but a new body. This
    /// is how rewriting passes publish their transformed version.
    pub fn with_body(&self, body: Stmt) -> Func {
        Func {
            data: Rc::new(FuncData {
                kind: self.data.kind,
                name: self.data.name,
                arguments: self.data.arguments.clone(),
                results: self.data.results.clone(),
                body: Some(body),
                temporaries: Vec::new(),
            }),
        }
    }

    /// A function identical to this one with the given temporaries
    /// recorded. Lowering passes publish scratch variables this way.
    pub fn with_temporaries(&self, temporaries: Vec<Var>) -> Func {
        Func {
            data: Rc::new(FuncData {
                kind: self.data.kind,
                name: self.data.name,
                arguments: self.data.arguments.clone(),
                results: self.data.results.clone(),
                body: self.data.body.clone(),
                temporaries,
            }),
        }
    }

    pub fn kind(&self) -> FuncKind {
        self.data.kind
    }

    pub fn arguments(&self) -> &[Var] {
        &self.data.arguments
    }

    pub fn results(&self) -> &[Var] {
        &self.data.results
    }

    pub fn body(&self) -> Option<&Stmt> {
        self.data.body.as_ref()
    }

    pub fn temporaries(&self) -> &[Var] {
        &self.data.temporaries
    }

    /// Dispatch to the visitor's function method.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisResult {
        visitor.visit_func(self)
    }
}

impl GetName for Func {
    fn name(&self) -> Id {
        self.data.name
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Func {}

impl Hash for Func {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.data).hash(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{float, AssignStmt, Expr, Pass};

    #[test]
    fn prototype_copy_shares_the_signature() {
        let a = Var::new("a", float(64));
        let r = Var::new("r", float(64));
        let body_a = AssignStmt::make(r.clone(), Expr::from(a.clone()));
        let f = Func::new("g", vec![a.clone()], vec![r.clone()], body_a.clone());

        let body_b = Pass::make();
        let g = f.with_body(body_b.clone());

        assert_eq!(g.name(), f.name());
        assert_eq!(g.arguments(), f.arguments());
        assert_eq!(g.results(), f.results());
        assert_eq!(g.kind(), f.kind());
        assert!(Stmt::ptr_eq(g.body().unwrap(), &body_b));
        assert!(Stmt::ptr_eq(f.body().unwrap(), &body_a));
        assert_ne!(f, g);
    }

    #[test]
    fn intrinsics_have_no_body() {
        let f = Func::intrinsic(
            "sqrt",
            vec![Var::new("x", float(64))],
            vec![Var::new("r", float(64))],
        );
        assert_eq!(f.kind(), FuncKind::Intrinsic);
        assert!(f.body().is_none());
        assert!(f.temporaries().is_empty());
    }

    #[test]
    fn temporaries_publish_a_new_descriptor() {
        let f = Func::new("h", vec![], vec![], Pass::make());
        let t = Var::new("tmp", float(64));
        let g = f.with_temporaries(vec![t.clone()]);
        assert!(f.temporaries().is_empty());
        assert_eq!(g.temporaries(), &[t]);
        assert!(Stmt::ptr_eq(f.body().unwrap(), g.body().unwrap()));
    }

    #[test]
    fn subtrees_outlive_dropped_functions_only_while_referenced() {
        let value = Expr::from(1.0);
        let weak = value.downgrade();
        let r = Var::new("r", float(64));
        let f = Func::new(
            "k",
            vec![],
            vec![r.clone()],
            AssignStmt::make(r, value),
        );
        // The function's body keeps the literal alive after our handle is
        // gone.
        assert!(weak.upgrade().is_some());
        drop(f);
        assert!(weak.upgrade().is_none());
    }
}
