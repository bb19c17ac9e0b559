//! The type system: scalars, tensors, elements, sets, tuples, and arrays.
//!
//! A [`Type`] is a small handle over a shared descriptor; copies are O(1)
//! and observe the same payload. Descriptors are built by the `make`
//! constructors, which enforce the structural invariants, and are immutable
//! afterwards.
use std::rc::Rc;

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;

use lattice_utils::Id;

use crate::IndexDomain;

/// The numeric class of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
}

/// A scalar component type: a numeric class and a bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarType {
    pub kind: ScalarKind,
    pub bits: u16,
}

impl ScalarType {
    pub const fn new(kind: ScalarKind, bits: u16) -> Self {
        ScalarType { kind, bits }
    }

    /// The storage size of one scalar, in bytes.
    pub fn bytes(&self) -> usize {
        (self.bits as usize + 7) / 8
    }

    pub fn is_int(&self) -> bool {
        self.kind == ScalarKind::Int
    }

    pub fn is_float(&self) -> bool {
        self.kind == ScalarKind::Float
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ScalarKind::Int => write!(f, "int{}", self.bits),
            ScalarKind::Float => write!(f, "float{}", self.bits),
        }
    }
}

/// The variant tag of a defined [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Tensor,
    Element,
    Set,
    Tuple,
    Array,
}

/// A type in the IR. Either undefined or exactly one of the variants; the
/// descriptor behind a defined type is shared between all copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Type {
    #[default]
    Undefined,
    Tensor(Rc<TensorType>),
    Element(Rc<ElementType>),
    Set(Rc<SetType>),
    Tuple(Rc<TupleType>),
    Array(Rc<ArrayType>),
}

impl Type {
    pub fn defined(&self) -> bool {
        !matches!(self, Type::Undefined)
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Undefined => panic!("undefined type has no kind"),
            Type::Tensor(_) => TypeKind::Tensor,
            Type::Element(_) => TypeKind::Element,
            Type::Set(_) => TypeKind::Set,
            Type::Tuple(_) => TypeKind::Tuple,
            Type::Array(_) => TypeKind::Array,
        }
    }

    pub fn is_tensor(&self) -> bool {
        matches!(self, Type::Tensor(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Type::Element(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Type::Set(_))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Type::Tuple(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    /// Project to the tensor descriptor. The type must be a tensor; callers
    /// test with [`Type::is_tensor`] first.
    pub fn to_tensor(&self) -> &TensorType {
        match self {
            Type::Tensor(t) => t,
            _ => panic!("type is not a tensor: {}", self),
        }
    }

    pub fn to_element(&self) -> &ElementType {
        match self {
            Type::Element(t) => t,
            _ => panic!("type is not an element: {}", self),
        }
    }

    pub fn to_set(&self) -> &SetType {
        match self {
            Type::Set(t) => t,
            _ => panic!("type is not a set: {}", self),
        }
    }

    pub fn to_tuple(&self) -> &TupleType {
        match self {
            Type::Tuple(t) => t,
            _ => panic!("type is not a tuple: {}", self),
        }
    }

    pub fn to_array(&self) -> &ArrayType {
        match self {
            Type::Array(t) => t,
            _ => panic!("type is not an array: {}", self),
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Undefined => write!(f, "undefined"),
            Type::Tensor(t) => write!(f, "{}", t),
            Type::Element(t) => write!(f, "{}", t),
            Type::Set(t) => write!(f, "{}", t),
            Type::Tuple(t) => write!(f, "{}", t),
            Type::Array(t) => write!(f, "{}", t),
        }
    }
}

/// A dense or blocked tensor over a sequence of index domains. A tensor of
/// order zero is a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorType {
    pub component_type: ScalarType,
    pub dimensions: Vec<IndexDomain>,
    /// Marks the tensor as a column vector. This is frontend metadata; it
    /// participates in equality and nothing else.
    pub column_vector: bool,
}

impl TensorType {
    /// A scalar tensor of the given component type.
    pub fn scalar(component_type: ScalarType) -> Type {
        TensorType::make(component_type, Vec::new(), false)
    }

    pub fn make(
        component_type: ScalarType,
        dimensions: Vec<IndexDomain>,
        column_vector: bool,
    ) -> Type {
        Type::Tensor(Rc::new(TensorType {
            component_type,
            dimensions,
            column_vector,
        }))
    }

    /// The number of dimensions.
    pub fn order(&self) -> usize {
        self.dimensions.len()
    }

    /// The number of components: the product of the dimension sizes.
    pub fn size(&self) -> u64 {
        self.dimensions.iter().map(IndexDomain::size).product()
    }
}

impl std::fmt::Display for TensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.order() == 0 {
            write!(f, "{}", self.component_type)
        } else {
            write!(
                f,
                "tensor[{}]({}){}",
                self.dimensions.iter().join(","),
                self.component_type,
                if self.column_vector { "'" } else { "" }
            )
        }
    }
}

/// A named record type with typed fields; the atoms of a set.
#[derive(Debug, Clone)]
pub struct ElementType {
    pub name: Id,
    /// Field table in declaration order.
    pub fields: LinkedHashMap<Id, Type>,
}

impl ElementType {
    pub fn make<N: Into<Id>>(name: N, fields: Vec<(Id, Type)>) -> Type {
        Type::Element(Rc::new(ElementType {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }))
    }

    pub fn field(&self, name: Id) -> Option<&Type> {
        self.fields.get(&name)
    }
}

/// Field tables compare name-by-name; declaration order is irrelevant.
impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, ty)| other.fields.get(name) == Some(ty))
    }
}

impl Eq for ElementType {}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A collection of elements. An edge set when its elements expose
/// endpoints into other sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetType {
    pub element_type: Type,
}

impl SetType {
    pub fn make(element_type: Type) -> Type {
        assert!(
            element_type.is_element(),
            "sets contain elements, not {}",
            element_type
        );
        Type::Set(Rc::new(SetType { element_type }))
    }
}

impl std::fmt::Display for SetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "set{{{}}}", self.element_type)
    }
}

/// A fixed-size homogeneous collection of elements, used for endpoint
/// bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleType {
    pub element_type: Type,
    pub size: usize,
}

impl TupleType {
    pub fn make(element_type: Type, size: usize) -> Type {
        assert!(
            element_type.is_element(),
            "tuples contain elements, not {}",
            element_type
        );
        assert!(size > 0, "tuple size must be positive");
        Type::Tuple(Rc::new(TupleType { element_type, size }))
    }
}

impl std::fmt::Display for TupleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} * {})", self.element_type, self.size)
    }
}

/// A one-dimensional scalar array of statically unknown length. Backs
/// tensor-index coordinate and sink arrays and `Load`/`Store` buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    pub component_type: ScalarType,
}

impl ArrayType {
    pub fn make(component_type: ScalarType) -> Type {
        Type::Array(Rc::new(ArrayType { component_type }))
    }
}

impl std::fmt::Display for ArrayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[]", self.component_type)
    }
}

/// A scalar integer tensor type with the given bit width.
pub fn int(bits: u16) -> Type {
    TensorType::scalar(ScalarType::new(ScalarKind::Int, bits))
}

/// A scalar floating-point tensor type with the given bit width.
pub fn float(bits: u16) -> Type {
    TensorType::scalar(ScalarType::new(ScalarKind::Float, bits))
}

/// True for tensors of order zero.
pub fn is_scalar(ty: &Type) -> bool {
    matches!(ty, Type::Tensor(t) if t.order() == 0)
}
