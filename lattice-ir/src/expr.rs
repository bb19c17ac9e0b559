//! Expression nodes of the IR.
//!
//! An [`Expr`] is a cheap handle over a reference-counted, immutable node.
//! Every node caches the type computed by its smart constructor, so passes
//! never recompute types while walking a tree. Handles compare by node
//! identity ([`Expr::ptr_eq`]); only literals define structural equality.
use std::rc::Rc;

use lattice_utils::Id;

use crate::visitor::{VisResult, Visitor};
use crate::{
    is_scalar, Func, IndexDomain, IndexSet, IndexVar, ScalarKind, ScalarType,
    TensorType, Type, Var,
};

#[derive(Debug)]
pub(crate) struct ExprNode {
    ty: Type,
    kind: ExprKind,
}

/// Handle to an immutable, shared expression node.
#[derive(Debug, Clone)]
pub struct Expr {
    node: Rc<ExprNode>,
}

impl Expr {
    fn new(ty: Type, kind: ExprKind) -> Expr {
        Expr {
            node: Rc::new(ExprNode { ty, kind }),
        }
    }

    /// The type computed when the node was constructed.
    pub fn ty(&self) -> &Type {
        &self.node.ty
    }

    pub fn kind(&self) -> &ExprKind {
        &self.node.kind
    }

    /// Node identity: true when both handles reference the same node.
    pub fn ptr_eq(a: &Expr, b: &Expr) -> bool {
        Rc::ptr_eq(&a.node, &b.node)
    }

    /// Dispatch to the visitor method for this node's variant.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisResult {
        visitor.visit_expr(self)
    }

    /// Rewrite the type of a literal in place. This is the one mutating
    /// operation on a node, reserved for the parser's early binding of
    /// literal types; the node must not have been shared yet, and the new
    /// type must describe a buffer of the same size.
    pub fn cast(&mut self, ty: Type) {
        assert!(ty.is_tensor(), "literals can only be cast to tensor types");
        let new_size = {
            let t = ty.to_tensor();
            t.size() as usize * t.component_type.bytes()
        };
        let node = Rc::get_mut(&mut self.node)
            .expect("cannot cast a literal that is already shared");
        match &mut node.kind {
            ExprKind::Literal(lit) => {
                assert_eq!(
                    new_size,
                    lit.data.len(),
                    "cast changes the literal's size"
                );
                lit.ty = ty.clone();
            }
            _ => panic!("cast on a non-literal expression"),
        }
        node.ty = ty;
    }

    /// Downgrade the handle to observe node liveness in tests.
    #[cfg(test)]
    pub(crate) fn downgrade(&self) -> std::rc::Weak<ExprNode> {
        Rc::downgrade(&self.node)
    }
}

/// The expression variants.
#[derive(Debug)]
pub enum ExprKind {
    Literal(Literal),
    VarExpr(VarExpr),
    FieldRead(FieldRead),
    TensorRead(TensorRead),
    TupleRead(TupleRead),
    IndexRead(IndexRead),
    Length(Length),
    IndexedTensor(IndexedTensor),
    IndexExpr(IndexExpr),
    Call(Call),
    Neg(Neg),
    Add(Add),
    Sub(Sub),
    Mul(Mul),
    Div(Div),
    Load(Load),
}

macro_rules! variant_accessors {
    ($(($variant:ident, $is:ident, $to:ident)),* $(,)?) => {
        impl Expr {
            $(
                pub fn $is(&self) -> bool {
                    matches!(self.kind(), ExprKind::$variant(_))
                }

                /// Project to the variant payload; the node must be of
                /// that variant.
                pub fn $to(&self) -> &$variant {
                    match self.kind() {
                        ExprKind::$variant(node) => node,
                        _ => panic!(
                            concat!(
                                "expression is not a ",
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
    (Literal, is_literal, to_literal),
    (VarExpr, is_var_expr, to_var_expr),
    (FieldRead, is_field_read, to_field_read),
    (TensorRead, is_tensor_read, to_tensor_read),
    (TupleRead, is_tuple_read, to_tuple_read),
    (IndexRead, is_index_read, to_index_read),
    (Length, is_length, to_length),
    (IndexedTensor, is_indexed_tensor, to_indexed_tensor),
    (IndexExpr, is_index_expr, to_index_expr),
    (Call, is_call, to_call),
    (Neg, is_neg, to_neg),
    (Add, is_add, to_add),
    (Sub, is_sub, to_sub),
    (Mul, is_mul, to_mul),
    (Div, is_div, to_div),
    (Load, is_load, to_load),
}

/// A dense tensor constant carried as a raw byte buffer.
#[derive(Debug)]
pub struct Literal {
    pub ty: Type,
    pub data: Vec<u8>,
}

impl Literal {
    /// A zero-filled literal of the given tensor type.
    pub fn make(ty: Type) -> Expr {
        assert!(ty.is_tensor(), "only tensor literals are supported");
        let size = {
            let t = ty.to_tensor();
            t.size() as usize * t.component_type.bytes()
        };
        Expr::new(
            ty.clone(),
            ExprKind::Literal(Literal {
                ty,
                data: vec![0; size],
            }),
        )
    }

    /// A literal initialized from a byte buffer, which must match the
    /// type's storage size exactly.
    pub fn from_bytes(ty: Type, bytes: &[u8]) -> Expr {
        assert!(ty.is_tensor(), "only tensor literals are supported");
        let size = {
            let t = ty.to_tensor();
            t.size() as usize * t.component_type.bytes()
        };
        assert_eq!(
            bytes.len(),
            size,
            "literal buffer does not match the type's size"
        );
        Expr::new(
            ty.clone(),
            ExprKind::Literal(Literal {
                ty,
                data: bytes.to_vec(),
            }),
        )
    }

    /// A dense float64 literal from component values.
    pub fn from_f64s(ty: Type, values: &[f64]) -> Expr {
        {
            let t = ty.to_tensor();
            assert_eq!(
                t.component_type,
                ScalarType::new(ScalarKind::Float, 64),
                "component values do not match the literal's component type"
            );
            assert_eq!(
                t.size() as usize,
                values.len(),
                "wrong number of components for the literal's type"
            );
        }
        let bytes: Vec<u8> =
            values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        Literal::from_bytes(ty, &bytes)
    }

    /// A dense int32 literal from component values.
    pub fn from_i32s(ty: Type, values: &[i32]) -> Expr {
        {
            let t = ty.to_tensor();
            assert_eq!(
                t.component_type,
                ScalarType::new(ScalarKind::Int, 32),
                "component values do not match the literal's component type"
            );
            assert_eq!(
                t.size() as usize,
                values.len(),
                "wrong number of components for the literal's type"
            );
        }
        let bytes: Vec<u8> =
            values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        Literal::from_bytes(ty, &bytes)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Literals are the one variant with structural equality: same type, same
/// bytes.
impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.data == other.data
    }
}

impl Eq for Literal {}

/// A variable use.
#[derive(Debug)]
pub struct VarExpr {
    pub var: Var,
}

impl VarExpr {
    pub fn make(var: Var) -> Expr {
        let ty = var.ty().clone();
        Expr::new(ty, ExprKind::VarExpr(VarExpr { var }))
    }
}

/// Reads a tensor from an element or set field.
#[derive(Debug)]
pub struct FieldRead {
    pub element_or_set: Expr,
    pub field_name: Id,
}

impl FieldRead {
    pub fn make<N: Into<Id>>(element_or_set: Expr, field_name: N) -> Expr {
        assert!(
            element_or_set.ty().is_element() || element_or_set.ty().is_set(),
            "field reads require an element or set, not {}",
            element_or_set.ty()
        );
        let field_name = field_name.into();
        let ty = field_type(&element_or_set, field_name);
        Expr::new(
            ty,
            ExprKind::FieldRead(FieldRead {
                element_or_set,
                field_name,
            }),
        )
    }
}

/// Reads a block from a tensor location. Each index fixes one leading
/// dimension; the result is the block described by the remaining ones.
#[derive(Debug)]
pub struct TensorRead {
    pub tensor: Expr,
    pub indices: Vec<Expr>,
}

impl TensorRead {
    pub fn make(tensor: Expr, indices: Vec<Expr>) -> Expr {
        assert!(
            tensor.ty().is_tensor(),
            "tensor reads require a tensor, not {}",
            tensor.ty()
        );
        for index in &indices {
            assert!(
                is_scalar(index.ty()) || index.ty().is_element(),
                "tensor indices are scalars or elements, not {}",
                index.ty()
            );
        }
        let ty = block_type(&tensor, indices.len());
        Expr::new(ty, ExprKind::TensorRead(TensorRead { tensor, indices }))
    }
}

/// Reads one element of an endpoint tuple.
#[derive(Debug)]
pub struct TupleRead {
    pub tuple: Expr,
    pub index: Expr,
}

impl TupleRead {
    pub fn make(tuple: Expr, index: Expr) -> Expr {
        assert!(
            tuple.ty().is_tuple(),
            "tuple reads require a tuple, not {}",
            tuple.ty()
        );
        let ty = tuple.ty().to_tuple().element_type.clone();
        Expr::new(ty, ExprKind::TupleRead(TupleRead { tuple, index }))
    }
}

/// The indices an edge set exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// The endpoints of each edge.
    Endpoints,
}

impl IndexKind {
    pub fn name(self) -> &'static str {
        match self {
            IndexKind::Endpoints => "endpoints",
        }
    }
}

/// Retrieves an index from an edge set, e.g. the endpoints of its edges.
#[derive(Debug)]
pub struct IndexRead {
    pub edge_set: Expr,
    pub index_kind: IndexKind,
}

impl IndexRead {
    pub fn make(edge_set: Expr, index_kind: IndexKind) -> Expr {
        assert!(
            edge_set.ty().is_set(),
            "index reads require an edge set, not {}",
            edge_set.ty()
        );
        let ty = TensorType::make(
            ScalarType::new(ScalarKind::Int, 32),
            vec![IndexDomain::new(IndexSet::Set(edge_set.clone()))],
            false,
        );
        Expr::new(
            ty,
            ExprKind::IndexRead(IndexRead {
                edge_set,
                index_kind,
            }),
        )
    }
}

/// The cardinality of an index set.
#[derive(Debug)]
pub struct Length {
    pub index_set: IndexSet,
}

impl Length {
    pub fn make(index_set: IndexSet) -> Expr {
        Expr::new(
            crate::int(32),
            ExprKind::Length(Length { index_set }),
        )
    }
}

/// A tensor with all dimensions bound to index variables; the scalar
/// component at the variables' current coordinates.
#[derive(Debug)]
pub struct IndexedTensor {
    pub tensor: Expr,
    pub index_vars: Vec<IndexVar>,
}

impl IndexedTensor {
    pub fn make(tensor: Expr, index_vars: Vec<IndexVar>) -> Expr {
        assert!(
            tensor.ty().is_tensor(),
            "only tensors can be indexed, not {}",
            tensor.ty()
        );
        let tensor_type = tensor.ty().to_tensor();
        assert_eq!(
            index_vars.len(),
            tensor_type.order(),
            "one index variable per tensor dimension"
        );
        for (var, dim) in index_vars.iter().zip(&tensor_type.dimensions) {
            assert!(
                var.domain() == dim,
                "index variable domain does not match the tensor dimension"
            );
        }
        let ty = TensorType::scalar(tensor_type.component_type);
        Expr::new(
            ty,
            ExprKind::IndexedTensor(IndexedTensor { tensor, index_vars }),
        )
    }
}

/// A tensor defined pointwise: one scalar value per coordinate of the
/// result variables' domains.
#[derive(Debug)]
pub struct IndexExpr {
    pub result_vars: Vec<IndexVar>,
    pub value: Expr,
}

impl IndexExpr {
    pub fn make(result_vars: Vec<IndexVar>, value: Expr) -> Expr {
        assert!(
            is_scalar(value.ty()),
            "index expression values are scalars, not {}",
            value.ty()
        );
        for var in &result_vars {
            assert!(
                var.is_free_var(),
                "reduction variables cannot appear on the left-hand side"
            );
        }
        let ty = index_expr_type(&result_vars, &value);
        Expr::new(
            ty,
            ExprKind::IndexExpr(IndexExpr { result_vars, value }),
        )
    }

    /// The index variables the value ranges over, in first-use order.
    pub fn domain(&self) -> Vec<IndexVar> {
        struct Collector {
            vars: Vec<IndexVar>,
        }
        impl Visitor for Collector {
            fn visit_indexed_tensor(
                &mut self,
                node: &IndexedTensor,
            ) -> VisResult {
                for var in &node.index_vars {
                    if !self.vars.contains(var) {
                        self.vars.push(var.clone());
                    }
                }
                node.tensor.accept(self)
            }
        }
        let mut collector = Collector { vars: Vec::new() };
        self.value
            .accept(&mut collector)
            .expect("index variable collection cannot fail");
        collector.vars
    }
}

/// Calls a function with a single result.
#[derive(Debug)]
pub struct Call {
    pub func: Func,
    pub actuals: Vec<Expr>,
}

impl Call {
    pub fn make(func: Func, actuals: Vec<Expr>) -> Expr {
        assert_eq!(
            func.results().len(),
            1,
            "only calls to functions with a single result are supported"
        );
        let ty = func.results()[0].ty().clone();
        Expr::new(ty, ExprKind::Call(Call { func, actuals }))
    }
}

fn scalar_operand_type(op: &str, operand: &Expr) -> Type {
    assert!(
        is_scalar(operand.ty()),
        "{} requires scalar operands, not {}",
        op,
        operand.ty()
    );
    operand.ty().clone()
}

fn binary_operand_type(op: &str, lhs: &Expr, rhs: &Expr) -> Type {
    let ty = scalar_operand_type(op, lhs);
    assert!(
        lhs.ty() == rhs.ty(),
        "{} requires equal operand types: {} vs {}",
        op,
        lhs.ty(),
        rhs.ty()
    );
    ty
}

/// Scalar negation.
#[derive(Debug)]
pub struct Neg {
    pub operand: Expr,
}

impl Neg {
    pub fn make(operand: Expr) -> Expr {
        let ty = scalar_operand_type("negation", &operand);
        Expr::new(ty, ExprKind::Neg(Neg { operand }))
    }
}

/// Scalar addition.
#[derive(Debug)]
pub struct Add {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Add {
    pub fn make(lhs: Expr, rhs: Expr) -> Expr {
        let ty = binary_operand_type("addition", &lhs, &rhs);
        Expr::new(ty, ExprKind::Add(Add { lhs, rhs }))
    }
}

/// Scalar subtraction.
#[derive(Debug)]
pub struct Sub {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Sub {
    pub fn make(lhs: Expr, rhs: Expr) -> Expr {
        let ty = binary_operand_type("subtraction", &lhs, &rhs);
        Expr::new(ty, ExprKind::Sub(Sub { lhs, rhs }))
    }
}

/// Scalar multiplication.
#[derive(Debug)]
pub struct Mul {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Mul {
    pub fn make(lhs: Expr, rhs: Expr) -> Expr {
        let ty = binary_operand_type("multiplication", &lhs, &rhs);
        Expr::new(ty, ExprKind::Mul(Mul { lhs, rhs }))
    }
}

/// Scalar division.
#[derive(Debug)]
pub struct Div {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Div {
    pub fn make(lhs: Expr, rhs: Expr) -> Expr {
        let ty = binary_operand_type("division", &lhs, &rhs);
        Expr::new(ty, ExprKind::Div(Div { lhs, rhs }))
    }
}

/// Reads one scalar from a buffer.
#[derive(Debug)]
pub struct Load {
    pub buffer: Expr,
    pub index: Expr,
}

impl Load {
    pub fn make(buffer: Expr, index: Expr) -> Expr {
        assert!(
            is_scalar(index.ty()),
            "load indices are scalars, not {}",
            index.ty()
        );
        let component_type = match buffer.ty() {
            Type::Tensor(t) => t.component_type,
            Type::Array(a) => a.component_type,
            other => panic!("load buffers are tensors or arrays, not {}", other),
        };
        let ty = TensorType::scalar(component_type);
        Expr::new(ty, ExprKind::Load(Load { buffer, index }))
    }
}

/// The type of a field looked up on an element, or lifted over a set: a
/// field of tensors on a set is a tensor with the set as its first
/// dimension.
pub fn field_type(element_or_set: &Expr, field_name: Id) -> Type {
    match element_or_set.ty() {
        Type::Element(element) => element
            .field(field_name)
            .cloned()
            .unwrap_or_else(|| {
                panic!("undefined field `{}` on `{}`", field_name, element)
            }),
        Type::Set(set) => {
            let element = set.element_type.to_element();
            let field = element.field(field_name).unwrap_or_else(|| {
                panic!("undefined field `{}` on `{}`", field_name, element)
            });
            match field {
                Type::Tensor(t) => {
                    let mut dimensions = vec![IndexDomain::new(
                        IndexSet::Set(element_or_set.clone()),
                    )];
                    dimensions.extend(t.dimensions.iter().cloned());
                    TensorType::make(t.component_type, dimensions, false)
                }
                other => panic!(
                    "set field `{}` must hold tensors, not {}",
                    field_name, other
                ),
            }
        }
        other => panic!("field lookup on a non-element type: {}", other),
    }
}

/// The type of a tensor read: the trailing dimensions left after the
/// indices consume the leading ones, with the component type preserved.
pub fn block_type(tensor: &Expr, index_count: usize) -> Type {
    let tensor_type = tensor.ty().to_tensor();
    assert!(
        index_count <= tensor_type.order(),
        "more indices than tensor dimensions"
    );
    let dimensions = tensor_type.dimensions[index_count..].to_vec();
    let column_vector = index_count == 0 && tensor_type.column_vector;
    TensorType::make(tensor_type.component_type, dimensions, column_vector)
}

/// The type of an index expression: one dimension per result variable,
/// with the scalar value's component type.
pub fn index_expr_type(result_vars: &[IndexVar], value: &Expr) -> Type {
    let component_type = value.ty().to_tensor().component_type;
    let dimensions =
        result_vars.iter().map(|v| v.domain().clone()).collect();
    TensorType::make(component_type, dimensions, false)
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        VarExpr::make(var)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Literal::from_i32s(crate::int(32), &[value])
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Literal::from_f64s(crate::float(64), &[value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{float, int, ElementType, SetType, TupleType};

    fn dim(n: u64) -> IndexDomain {
        IndexDomain::new(IndexSet::Range(n))
    }

    fn matrix(n: u64) -> Expr {
        let ty = TensorType::make(
            ScalarType::new(ScalarKind::Float, 64),
            vec![dim(n), dim(n)],
            false,
        );
        VarExpr::make(Var::new("M", ty))
    }

    #[test]
    fn addition_preserves_the_operand_type() {
        let v = Var::new("v", float(64));
        let sum = Add::make(
            VarExpr::make(v.clone()),
            VarExpr::make(v.clone()),
        );
        assert_eq!(sum.ty(), &float(64));
        let node = sum.to_add();
        assert_eq!(node.lhs.ty(), node.rhs.ty());
        assert!(is_scalar(node.lhs.ty()));
    }

    #[test]
    #[should_panic(expected = "equal operand types")]
    fn mixed_operand_types_are_fatal() {
        let v = Var::new("v", float(64));
        Add::make(VarExpr::make(v), Expr::from(1));
    }

    #[test]
    #[should_panic(expected = "scalar operands")]
    fn non_scalar_operands_are_fatal() {
        let m = matrix(4);
        Neg::make(m);
    }

    #[test]
    fn tensor_reads_peel_leading_dimensions() {
        let m = matrix(8);
        let i = Expr::from(0);
        let j = Expr::from(1);

        let row = TensorRead::make(m.clone(), vec![i.clone()]);
        assert_eq!(
            row.ty(),
            &TensorType::make(
                ScalarType::new(ScalarKind::Float, 64),
                vec![dim(8)],
                false
            )
        );

        let entry = TensorRead::make(m, vec![i, j]);
        assert_eq!(entry.ty(), &float(64));
        assert!(is_scalar(entry.ty()));
    }

    #[test]
    #[should_panic(expected = "more indices than tensor dimensions")]
    fn over_indexing_is_fatal() {
        let m = matrix(2);
        TensorRead::make(
            m,
            vec![Expr::from(0), Expr::from(0), Expr::from(0)],
        );
    }

    #[test]
    fn zero_filled_literals_and_structural_equality() {
        let ty = TensorType::make(
            ScalarType::new(ScalarKind::Float, 64),
            vec![dim(3)],
            false,
        );
        let zeros = Literal::make(ty.clone());
        let lit = zeros.to_literal();
        assert_eq!(lit.size(), 24);
        assert!(lit.data.iter().all(|b| *b == 0));

        let explicit = Literal::from_f64s(ty.clone(), &[0.0, 0.0, 0.0]);
        assert_eq!(zeros.to_literal(), explicit.to_literal());

        let other = Literal::from_f64s(ty, &[0.0, 1.0, 0.0]);
        assert_ne!(zeros.to_literal(), other.to_literal());

        // Same bytes under a different type are a different literal.
        assert_ne!(
            Expr::from(0).to_literal(),
            Literal::from_bytes(float(32), &[0, 0, 0, 0]).to_literal()
        );
    }

    #[test]
    #[should_panic(expected = "only tensor literals")]
    fn element_literals_are_fatal() {
        Literal::make(ElementType::make("P", vec![]));
    }

    #[test]
    fn casting_an_unshared_literal() {
        let mut lit = Literal::from_i32s(int(32), &[1]);
        lit.cast(float(32));
        assert_eq!(lit.ty(), &float(32));
        assert_eq!(lit.to_literal().ty, float(32));
    }

    #[test]
    #[should_panic(expected = "already shared")]
    fn casting_a_shared_literal_is_fatal() {
        let mut lit = Literal::from_i32s(int(32), &[1]);
        let _alias = lit.clone();
        lit.cast(float(32));
    }

    #[test]
    fn indexed_tensors_are_scalars_over_matching_domains() {
        let m = matrix(4);
        let i = IndexVar::new("i", dim(4));
        let j = IndexVar::new("j", dim(4));
        let indexed = IndexedTensor::make(m, vec![i.clone(), j.clone()]);
        assert_eq!(indexed.ty(), &float(64));

        let node = indexed.to_indexed_tensor();
        assert_eq!(node.index_vars.len(), 2);
        assert_eq!(node.index_vars[0].domain(), &dim(4));
    }

    #[test]
    #[should_panic(expected = "one index variable per tensor dimension")]
    fn indexed_tensor_arity_mismatch_is_fatal() {
        let m = matrix(4);
        IndexedTensor::make(m, vec![IndexVar::new("i", dim(4))]);
    }

    #[test]
    #[should_panic(expected = "domain does not match")]
    fn indexed_tensor_domain_mismatch_is_fatal() {
        let m = matrix(4);
        let i = IndexVar::new("i", dim(4));
        let k = IndexVar::new("k", dim(5));
        IndexedTensor::make(m, vec![i, k]);
    }

    #[test]
    fn index_expressions_build_tensors_over_their_result_vars() {
        let m = matrix(4);
        let i = IndexVar::new("i", dim(4));
        let j = IndexVar::new("j", dim(4));
        let value = IndexedTensor::make(m, vec![i.clone(), j.clone()]);
        let transpose =
            IndexExpr::make(vec![j.clone(), i.clone()], value);
        assert_eq!(
            transpose.ty(),
            &TensorType::make(
                ScalarType::new(ScalarKind::Float, 64),
                vec![dim(4), dim(4)],
                false
            )
        );
        assert_eq!(transpose.to_index_expr().domain(), vec![i, j]);
    }

    #[test]
    #[should_panic(expected = "left-hand side")]
    fn reduction_vars_on_the_lhs_are_fatal() {
        let v = Var::new("v", float(64));
        let r = IndexVar::reduction(
            "r",
            dim(4),
            crate::ReductionOperator::Sum,
        );
        IndexExpr::make(vec![r], VarExpr::make(v));
    }

    #[test]
    fn field_reads_lift_over_sets() {
        let velocity = TensorType::make(
            ScalarType::new(ScalarKind::Float, 64),
            vec![dim(3)],
            false,
        );
        let point = ElementType::make(
            "Point",
            vec![(Id::new("vel"), velocity.clone())],
        );
        let points = VarExpr::make(Var::new(
            "points",
            SetType::make(point.clone()),
        ));

        let lifted = FieldRead::make(points.clone(), "vel");
        let lifted_type = lifted.ty().to_tensor();
        assert_eq!(lifted_type.order(), 2);
        assert_eq!(
            lifted_type.dimensions[0],
            IndexDomain::new(IndexSet::Set(points))
        );
        assert_eq!(lifted_type.dimensions[1], dim(3));

        let p = VarExpr::make(Var::new("p", point));
        let direct = FieldRead::make(p, "vel");
        assert_eq!(direct.ty(), &velocity);
    }

    #[test]
    #[should_panic(expected = "undefined field")]
    fn unknown_fields_are_fatal() {
        let p = VarExpr::make(Var::new(
            "p",
            ElementType::make("Point", vec![]),
        ));
        FieldRead::make(p, "mass");
    }

    #[test]
    fn index_reads_count_the_edge_set() {
        let edge = ElementType::make("Spring", vec![]);
        let springs =
            VarExpr::make(Var::new("springs", SetType::make(edge)));
        let endpoints =
            IndexRead::make(springs.clone(), IndexKind::Endpoints);
        let t = endpoints.ty().to_tensor();
        assert!(t.component_type.is_int());
        assert_eq!(t.order(), 1);
        assert_eq!(
            t.dimensions[0],
            IndexDomain::new(IndexSet::Set(springs))
        );
        assert_eq!(
            endpoints.to_index_read().index_kind.name(),
            "endpoints"
        );
    }

    #[test]
    fn lengths_are_integer_scalars() {
        let len = Length::make(IndexSet::Range(12));
        assert_eq!(len.ty(), &int(32));
    }

    #[test]
    fn tuple_reads_produce_the_element_type() {
        let point = ElementType::make("Point", vec![]);
        let pair = VarExpr::make(Var::new(
            "ends",
            TupleType::make(point.clone(), 2),
        ));
        let end = TupleRead::make(pair, Expr::from(0));
        assert_eq!(end.ty(), &point);
    }

    #[test]
    fn loads_read_scalars_from_arrays() {
        use crate::ArrayType;
        let buffer = VarExpr::make(Var::new(
            "coords",
            ArrayType::make(ScalarType::new(ScalarKind::Int, 32)),
        ));
        let loaded = Load::make(buffer, Expr::from(3));
        assert_eq!(loaded.ty(), &int(32));
    }

    #[test]
    #[should_panic(expected = "single result")]
    fn multi_result_calls_are_fatal() {
        let f = Func::intrinsic(
            "minmax",
            vec![Var::new("x", float(64))],
            vec![Var::new("lo", float(64)), Var::new("hi", float(64))],
        );
        Call::make(f, vec![Expr::from(1.0)]);
    }

    #[test]
    fn calls_take_the_callee_result_type() {
        let f = Func::intrinsic(
            "halve",
            vec![Var::new("x", float(64))],
            vec![Var::new("r", float(64))],
        );
        let call = Call::make(f.clone(), vec![Expr::from(2.0)]);
        assert_eq!(call.ty(), &float(64));
        assert_eq!(call.to_call().func, f);
    }
}
