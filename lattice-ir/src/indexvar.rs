//! Index variables: bound names ranging over index domains.
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use lattice_utils::{GetName, Id};

use crate::IndexDomain;

/// The reduction applied when a variable or map combines contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionOperator {
    Sum,
}

impl std::fmt::Display for ReductionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReductionOperator::Sum => write!(f, "+"),
        }
    }
}

#[derive(Debug)]
struct IndexVarData {
    name: Id,
    domain: IndexDomain,
    reduction: Option<ReductionOperator>,
}

/// A bound name ranging over an [`IndexDomain`]. A free variable appears on
/// the left-hand side of an index expression; a reduction variable combines
/// the values it ranges over with its [`ReductionOperator`].
///
/// Index variables have reference identity: two variables are the same only
/// when they share a descriptor.
#[derive(Debug, Clone)]
pub struct IndexVar {
    data: Rc<IndexVarData>,
}

impl IndexVar {
    /// Create a free index variable.
    pub fn new<N: Into<Id>>(name: N, domain: IndexDomain) -> Self {
        IndexVar {
            data: Rc::new(IndexVarData {
                name: name.into(),
                domain,
                reduction: None,
            }),
        }
    }

    /// Create a reduction index variable.
    pub fn reduction<N: Into<Id>>(
        name: N,
        domain: IndexDomain,
        op: ReductionOperator,
    ) -> Self {
        IndexVar {
            data: Rc::new(IndexVarData {
                name: name.into(),
                domain,
                reduction: Some(op),
            }),
        }
    }

    pub fn domain(&self) -> &IndexDomain {
        &self.data.domain
    }

    pub fn reduction_operator(&self) -> Option<ReductionOperator> {
        self.data.reduction
    }

    pub fn is_free_var(&self) -> bool {
        self.data.reduction.is_none()
    }

    pub fn is_reduction_var(&self) -> bool {
        self.data.reduction.is_some()
    }
}

impl GetName for IndexVar {
    fn name(&self) -> Id {
        self.data.name
    }
}

impl PartialEq for IndexVar {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for IndexVar {}

impl Hash for IndexVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.data).hash(state)
    }
}

impl std::fmt::Display for IndexVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data.name)
    }
}
