//! Named, typed bindings.
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use lattice_utils::{GetName, Id};

use crate::Type;

#[derive(Debug)]
struct VarData {
    name: Id,
    ty: Type,
}

/// A named, typed binding. Variables have reference identity: two variables
/// with the same name and type are distinct unless they share a descriptor,
/// which makes them usable as hash keys throughout the compiler.
#[derive(Debug, Clone)]
pub struct Var {
    data: Rc<VarData>,
}

impl Var {
    pub fn new<N: Into<Id>>(name: N, ty: Type) -> Self {
        Var {
            data: Rc::new(VarData {
                name: name.into(),
                ty,
            }),
        }
    }

    pub fn ty(&self) -> &Type {
        &self.data.ty
    }
}

impl GetName for Var {
    fn name(&self) -> Id {
        self.data.name
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.data).hash(state)
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data.name)
    }
}
