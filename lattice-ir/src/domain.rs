//! Index sets and index domains: the dimensions of tensor types.
use itertools::Itertools;

use crate::{Expr, Printer};

/// A collection whose cardinality serves as a tensor dimension.
#[derive(Debug, Clone)]
pub enum IndexSet {
    /// A statically sized range `[0, n)`.
    Range(u64),
    /// The elements of a set-typed expression. The cardinality is only
    /// known at runtime.
    Set(Expr),
}

impl IndexSet {
    pub fn is_range(&self) -> bool {
        matches!(self, IndexSet::Range(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, IndexSet::Set(_))
    }

    /// The cardinality of the index set. Only defined for ranges; the size
    /// of a set-backed index set is a runtime quantity.
    pub fn size(&self) -> u64 {
        match self {
            IndexSet::Range(n) => *n,
            IndexSet::Set(_) => {
                panic!("size of a set-backed index set is not statically known")
            }
        }
    }
}

impl PartialEq for IndexSet {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IndexSet::Range(a), IndexSet::Range(b)) => a == b,
            // Set-backed index sets name a particular set value, so they
            // compare by node identity rather than structure.
            (IndexSet::Set(a), IndexSet::Set(b)) => Expr::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for IndexSet {}

impl std::fmt::Display for IndexSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexSet::Range(n) => write!(f, "0:{}", n),
            IndexSet::Set(e) => write!(f, "{}", Printer::expr_str(e)),
        }
    }
}

/// An ordered product of index sets. Most dimensions are a single index
/// set; blocked tensors carry one factor per nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDomain {
    index_sets: Vec<IndexSet>,
}

impl IndexDomain {
    pub fn new(index_set: IndexSet) -> Self {
        IndexDomain {
            index_sets: vec![index_set],
        }
    }

    /// A domain built from multiple factors, e.g. the rows of a blocked
    /// matrix.
    pub fn compound(index_sets: Vec<IndexSet>) -> Self {
        assert!(!index_sets.is_empty(), "empty index domain");
        IndexDomain { index_sets }
    }

    pub fn index_sets(&self) -> &[IndexSet] {
        &self.index_sets
    }

    /// The cardinality of the domain: the product of its factors.
    pub fn size(&self) -> u64 {
        self.index_sets.iter().map(IndexSet::size).product()
    }
}

impl From<IndexSet> for IndexDomain {
    fn from(index_set: IndexSet) -> Self {
        IndexDomain::new(index_set)
    }
}

impl std::fmt::Display for IndexDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index_sets.iter().join("*"))
    }
}
