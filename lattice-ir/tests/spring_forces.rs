//! Builds the IR for a small spring-force program end to end: element and
//! set types, a per-spring force function, a map over the spring set, and
//! the passes a compiler would run over the result.
use lattice_ir::{
    float, intrinsics, is_scalar, Action, Add, AssignStmt, Block, Call,
    ElementType, Expr, ExprKind, FieldRead, Func, GetName, Id, IndexDomain,
    IndexKind, IndexRead, IndexSet, Map, Mul, Pass, Printer,
    ReductionOperator, Rewriter, ScalarKind, ScalarType, SetType, Stmt,
    TensorType, TupleType, Type, Var, VisResult, Visitor,
};

fn vector3() -> Type {
    TensorType::make(
        ScalarType::new(ScalarKind::Float, 64),
        vec![IndexDomain::new(IndexSet::Range(3))],
        false,
    )
}

fn point_element() -> Type {
    ElementType::make(
        "Point",
        vec![(Id::new("x"), vector3()), (Id::new("f"), vector3())],
    )
}

fn spring_element() -> Type {
    ElementType::make(
        "Spring",
        vec![(Id::new("k"), float(64)), (Id::new("l0"), float(64))],
    )
}

/// The per-spring function: fs = k * sqrt(l0).
fn force_func() -> Func {
    let s = Var::new("s", spring_element());
    let fs = Var::new("fs", float(64));
    let stiffness = FieldRead::make(Expr::from(s.clone()), "k");
    let rest_length = FieldRead::make(Expr::from(s.clone()), "l0");
    let magnitude = Mul::make(
        stiffness,
        Call::make(intrinsics::sqrt(), vec![rest_length]),
    );
    Func::new(
        "spring_force",
        vec![s],
        vec![fs.clone()],
        AssignStmt::make(fs, magnitude),
    )
}

fn program() -> (Func, Var, Var) {
    let points = Var::new("points", SetType::make(point_element()));
    let springs = Var::new("springs", SetType::make(spring_element()));
    let total = Var::new("total", float(64));

    let body = Block::from_stmts(vec![
        Pass::make(),
        Map::make(
            vec![total.clone()],
            force_func(),
            Expr::from(springs.clone()),
            Some(Expr::from(points.clone())),
            Some(ReductionOperator::Sum),
        ),
    ]);
    let main = Func::new(
        "compute_forces",
        vec![points.clone(), springs.clone()],
        vec![total],
        body,
    );
    (main, points, springs)
}

#[test]
fn the_program_is_well_typed() {
    let (main, _, springs) = program();

    let map = main
        .body()
        .unwrap()
        .to_block()
        .rest
        .as_ref()
        .unwrap()
        .to_block()
        .first
        .to_map();
    assert_eq!(map.function.name(), "spring_force");
    assert!(map.target.ty().is_set());
    assert_eq!(map.vars.len(), map.function.results().len());

    // Reading a field of the mapped function's argument is a scalar.
    let body = map.function.body().unwrap().to_assign();
    assert!(is_scalar(body.value.ty()));
    assert_eq!(body.value.ty(), &float(64));

    // The endpoints index of the spring set counts the springs.
    let endpoints =
        IndexRead::make(Expr::from(springs), IndexKind::Endpoints);
    let endpoints_type = endpoints.ty().to_tensor();
    assert!(endpoints_type.component_type.is_int());
    assert_eq!(endpoints_type.order(), 1);
}

#[test]
fn tuples_bundle_endpoints() {
    let ends = TupleType::make(point_element(), 2);
    assert_eq!(ends, TupleType::make(point_element(), 2));
    assert_eq!(ends.to_tuple().size, 2);
    assert_eq!(ends.to_tuple().element_type, point_element());
}

#[test]
fn a_pass_counts_the_calls() {
    #[derive(Default)]
    struct CallCounter {
        calls: usize,
    }
    impl Visitor for CallCounter {
        fn visit_call(&mut self, node: &Call) -> VisResult {
            self.calls += 1;
            for actual in &node.actuals {
                actual.accept(self)?;
            }
            Ok(Action::Continue)
        }
    }

    let f = force_func();
    let mut counter = CallCounter::default();
    f.accept(&mut counter).unwrap();
    assert_eq!(counter.calls, 1);
}

#[test]
fn a_rewrite_publishes_a_new_function_and_shares_the_rest() {
    // Replace `sqrt` calls with their argument, leaving everything else
    // untouched.
    struct StripSqrt;
    impl Rewriter for StripSqrt {
        fn rewrite_expr(&mut self, expr: &Expr) -> Expr {
            if let ExprKind::Call(node) = expr.kind() {
                if node.func.name() == "sqrt" {
                    return self.rewrite_expr(&node.actuals[0]);
                }
            }
            lattice_ir::default_rewrite_expr(self, expr)
        }
    }

    let f = force_func();
    let g = StripSqrt.rewrite_func(&f);

    assert_ne!(g, f);
    assert_eq!(g.name(), f.name());
    assert_eq!(g.arguments(), f.arguments());

    let old_product = f.body().unwrap().to_assign().value.to_mul();
    let new_product = g.body().unwrap().to_assign().value.to_mul();
    assert!(new_product.rhs.is_field_read());
    // The untouched factor is shared between the old and new tree.
    assert!(Expr::ptr_eq(&new_product.lhs, &old_product.lhs));
}

#[test]
fn the_program_prints() {
    let (main, _, _) = program();
    let text = Printer::func_str(&main);
    assert!(text.starts_with("func compute_forces("));
    assert!(text.contains(
        "total = map spring_force to springs with points reduce +;"
    ));
    assert!(text.contains("pass;"));

    let v = Var::new("v", float(64));
    let sum = Add::make(Expr::from(v.clone()), Expr::from(v));
    assert_eq!(sum.to_string(), "(v + v)");
}

#[test]
fn handles_share_one_node() {
    let e = Expr::from(1.0);
    let alias = e.clone();
    assert!(Expr::ptr_eq(&e, &alias));
    assert!(!Expr::ptr_eq(&e, &Expr::from(1.0)));
    // Structural equality on literals still holds across distinct nodes.
    assert_eq!(e.to_literal(), Expr::from(1.0).to_literal());

    let s = Pass::make();
    assert!(Stmt::ptr_eq(&s, &s.clone()));
}
