//! Tensor indices: descriptors of sparse tensor layouts.
//!
//! A tensor index names the coordinate and sink arrays a sparse layout
//! pass materializes for a tensor whose non-zero structure is described by
//! a path expression. The IR only carries the descriptor; the arrays are
//! populated at runtime.
use lattice_utils::{GetName, Id};

use crate::{ArrayType, ScalarKind, ScalarType, Var};

/// An opaque description of a sparse tensor's non-zero structure. The
/// algebra over path expressions lives in later passes; the IR treats the
/// value as an interned label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    desc: Id,
}

impl PathExpression {
    pub fn new<D: Into<Id>>(desc: D) -> Self {
        PathExpression { desc: desc.into() }
    }
}

impl std::fmt::Display for PathExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.desc)
    }
}

/// Describes the coordinate and sink arrays of one sparse tensor layout.
#[derive(Debug, Clone)]
pub struct TensorIndex {
    name: Id,
    pexpr: PathExpression,
    coord_array: Var,
    sink_array: Var,
}

impl TensorIndex {
    /// Create a tensor index, fabricating its `coords` and `sinks` array
    /// variables. A non-empty name prefixes the array names.
    pub fn new<N: Into<Id>>(name: N, pexpr: PathExpression) -> Self {
        let name = name.into();
        let prefix = if name.is_empty() {
            String::new()
        } else {
            format!("{}_", name)
        };
        let int_array =
            || ArrayType::make(ScalarType::new(ScalarKind::Int, 32));
        TensorIndex {
            name,
            pexpr,
            coord_array: Var::new(format!("{}coords", prefix), int_array()),
            sink_array: Var::new(format!("{}sinks", prefix), int_array()),
        }
    }

    pub fn path_expression(&self) -> &PathExpression {
        &self.pexpr
    }

    pub fn coord_array(&self) -> &Var {
        &self.coord_array
    }

    pub fn sink_array(&self) -> &Var {
        &self.sink_array
    }
}

impl GetName for TensorIndex {
    fn name(&self) -> Id {
        self.name
    }
}

impl std::fmt::Display for TensorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "tensor-index {}: {}", self.name, self.pexpr)?;
        writeln!(f, "  {}", self.coord_array)?;
        write!(f, "  {}", self.sink_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int;

    #[test]
    fn named_indices_prefix_their_arrays() {
        let ti = TensorIndex::new("K", PathExpression::new("v-e-v"));
        assert_eq!(ti.name(), "K");
        assert_eq!(ti.coord_array().name(), "K_coords");
        assert_eq!(ti.sink_array().name(), "K_sinks");
        let expected = ArrayType::make(ScalarType::new(ScalarKind::Int, 32));
        assert_eq!(ti.coord_array().ty(), &expected);
        assert_eq!(ti.sink_array().ty(), &expected);
        assert_ne!(ti.coord_array().ty(), &int(32));
    }

    #[test]
    fn unnamed_indices_use_bare_array_names() {
        let ti = TensorIndex::new("", PathExpression::new("v-e-v"));
        assert_eq!(ti.coord_array().name(), "coords");
        assert_eq!(ti.sink_array().name(), "sinks");
    }

    #[test]
    fn display_lists_the_arrays_one_per_line() {
        let ti = TensorIndex::new("K", PathExpression::new("v-e-v"));
        assert_eq!(
            ti.to_string(),
            "tensor-index K: v-e-v\n  K_coords\n  K_sinks"
        );
    }
}
