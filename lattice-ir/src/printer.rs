//! Formats IR trees in a compact surface syntax. Printing clones nothing
//! and mutates nothing; `Display` for [`Expr`], [`Stmt`], and [`Func`]
//! delegates here.
use std::io;

use itertools::Itertools;

use lattice_utils::GetName;

use crate::{
    Expr, ExprKind, Func, FuncKind, Literal, ScalarKind, Stmt, StmtKind, Var,
};

/// Printer for the IR.
pub struct Printer;

impl Printer {
    /// Format an expression on one line.
    pub fn expr_str(expr: &Expr) -> String {
        match expr.kind() {
            ExprKind::Literal(lit) => Self::literal_str(lit),
            ExprKind::VarExpr(node) => node.var.to_string(),
            ExprKind::FieldRead(node) => format!(
                "{}.{}",
                Self::expr_str(&node.element_or_set),
                node.field_name
            ),
            ExprKind::TensorRead(node) => format!(
                "{}({})",
                Self::expr_str(&node.tensor),
                node.indices.iter().map(Self::expr_str).join(", ")
            ),
            ExprKind::TupleRead(node) => format!(
                "{}({})",
                Self::expr_str(&node.tuple),
                Self::expr_str(&node.index)
            ),
            ExprKind::IndexRead(node) => format!(
                "{}.{}",
                Self::expr_str(&node.edge_set),
                node.index_kind.name()
            ),
            ExprKind::Length(node) => format!("length({})", node.index_set),
            ExprKind::IndexedTensor(node) => format!(
                "{}({})",
                Self::expr_str(&node.tensor),
                node.index_vars.iter().join(",")
            ),
            ExprKind::IndexExpr(node) => format!(
                "({}) {}",
                node.result_vars.iter().join(","),
                Self::expr_str(&node.value)
            ),
            ExprKind::Call(node) => format!(
                "{}({})",
                node.func.name(),
                node.actuals.iter().map(Self::expr_str).join(", ")
            ),
            ExprKind::Neg(node) => {
                format!("-{}", Self::expr_str(&node.operand))
            }
            ExprKind::Add(node) => format!(
                "({} + {})",
                Self::expr_str(&node.lhs),
                Self::expr_str(&node.rhs)
            ),
            ExprKind::Sub(node) => format!(
                "({} - {})",
                Self::expr_str(&node.lhs),
                Self::expr_str(&node.rhs)
            ),
            ExprKind::Mul(node) => format!(
                "({} * {})",
                Self::expr_str(&node.lhs),
                Self::expr_str(&node.rhs)
            ),
            ExprKind::Div(node) => format!(
                "({} / {})",
                Self::expr_str(&node.lhs),
                Self::expr_str(&node.rhs)
            ),
            ExprKind::Load(node) => format!(
                "{}[{}]",
                Self::expr_str(&node.buffer),
                Self::expr_str(&node.index)
            ),
        }
    }

    fn literal_str(lit: &Literal) -> String {
        let tensor_type = lit.ty.to_tensor();
        let scalar = tensor_type.component_type;
        let components: Option<Vec<String>> = match (scalar.kind, scalar.bits)
        {
            (ScalarKind::Int, 32) => Some(
                lit.data
                    .chunks_exact(4)
                    .map(|c| {
                        i32::from_ne_bytes(c.try_into().unwrap()).to_string()
                    })
                    .collect(),
            ),
            (ScalarKind::Int, 64) => Some(
                lit.data
                    .chunks_exact(8)
                    .map(|c| {
                        i64::from_ne_bytes(c.try_into().unwrap()).to_string()
                    })
                    .collect(),
            ),
            (ScalarKind::Float, 32) => Some(
                lit.data
                    .chunks_exact(4)
                    .map(|c| {
                        format!(
                            "{:?}",
                            f32::from_ne_bytes(c.try_into().unwrap())
                        )
                    })
                    .collect(),
            ),
            (ScalarKind::Float, 64) => Some(
                lit.data
                    .chunks_exact(8)
                    .map(|c| {
                        format!(
                            "{:?}",
                            f64::from_ne_bytes(c.try_into().unwrap())
                        )
                    })
                    .collect(),
            ),
            _ => None,
        };
        match components {
            Some(components) if tensor_type.order() == 0 => {
                components.into_iter().next().unwrap_or_default()
            }
            Some(components) => format!("[{}]", components.join(", ")),
            None => format!("<{} byte literal>", lit.data.len()),
        }
    }

    /// Write a statement, indented, with a trailing newline. Block chains
    /// are flattened: each statement in the sequence starts its own line
    /// at the same indentation.
    pub fn write_stmt<W: io::Write>(
        stmt: &Stmt,
        indent: usize,
        f: &mut W,
    ) -> io::Result<()> {
        let pad = "  ".repeat(indent);
        match stmt.kind() {
            StmtKind::AssignStmt(node) => writeln!(
                f,
                "{}{} = {};",
                pad,
                node.var,
                Self::expr_str(&node.value)
            ),
            StmtKind::Map(node) => {
                write!(
                    f,
                    "{}{} = map {} to {}",
                    pad,
                    node.vars.iter().join(", "),
                    node.function.name(),
                    Self::expr_str(&node.target)
                )?;
                if let Some(neighbors) = &node.neighbors {
                    write!(f, " with {}", Self::expr_str(neighbors))?;
                }
                if let Some(reduction) = &node.reduction {
                    write!(f, " reduce {}", reduction)?;
                }
                writeln!(f, ";")
            }
            StmtKind::FieldWrite(node) => writeln!(
                f,
                "{}{}.{} = {};",
                pad,
                Self::expr_str(&node.element_or_set),
                node.field_name,
                Self::expr_str(&node.value)
            ),
            StmtKind::TensorWrite(node) => writeln!(
                f,
                "{}{}({}) = {};",
                pad,
                Self::expr_str(&node.tensor),
                node.indices.iter().map(Self::expr_str).join(", "),
                Self::expr_str(&node.value)
            ),
            StmtKind::Store(node) => writeln!(
                f,
                "{}{}[{}] = {};",
                pad,
                Self::expr_str(&node.buffer),
                Self::expr_str(&node.index),
                Self::expr_str(&node.value)
            ),
            StmtKind::ForRange(node) => {
                writeln!(
                    f,
                    "{}for {} in {}:{} {{",
                    pad,
                    node.var,
                    Self::expr_str(&node.start),
                    Self::expr_str(&node.end)
                )?;
                Self::write_stmt(&node.body, indent + 1, f)?;
                writeln!(f, "{}}}", pad)
            }
            StmtKind::For(node) => {
                writeln!(
                    f,
                    "{}for {} in {} {{",
                    pad, node.var, node.domain
                )?;
                Self::write_stmt(&node.body, indent + 1, f)?;
                writeln!(f, "{}}}", pad)
            }
            StmtKind::IfThenElse(node) => {
                writeln!(
                    f,
                    "{}if {} {{",
                    pad,
                    Self::expr_str(&node.condition)
                )?;
                Self::write_stmt(&node.then_body, indent + 1, f)?;
                match &node.else_body {
                    Some(else_body) => {
                        writeln!(f, "{}}} else {{", pad)?;
                        Self::write_stmt(else_body, indent + 1, f)?;
                        writeln!(f, "{}}}", pad)
                    }
                    None => writeln!(f, "{}}}", pad),
                }
            }
            StmtKind::Block(node) => {
                Self::write_stmt(&node.first, indent, f)?;
                match &node.rest {
                    Some(rest) => Self::write_stmt(rest, indent, f),
                    None => Ok(()),
                }
            }
            StmtKind::Pass(_) => writeln!(f, "{}pass;", pad),
        }
    }

    fn format_vars(vars: &[Var]) -> String {
        vars.iter()
            .map(|v| format!("{} : {}", v, v.ty()))
            .join(", ")
    }

    /// Write a function: its prototype and, for internal functions, its
    /// body.
    pub fn write_func<W: io::Write>(func: &Func, f: &mut W) -> io::Result<()> {
        write!(
            f,
            "func {}({}) -> ({})",
            func.name(),
            Self::format_vars(func.arguments()),
            Self::format_vars(func.results())
        )?;
        match (func.kind(), func.body()) {
            (FuncKind::Intrinsic, _) | (_, None) => writeln!(f, ";"),
            (FuncKind::Internal, Some(body)) => {
                writeln!(f, " {{")?;
                Self::write_stmt(body, 1, f)?;
                writeln!(f, "}}")
            }
        }
    }

    /// Format a statement as a string, without the trailing newline.
    pub fn stmt_str(stmt: &Stmt) -> String {
        let mut buf = Vec::new();
        Self::write_stmt(stmt, 0, &mut buf)
            .expect("writing to a byte buffer cannot fail");
        let mut s = String::from_utf8_lossy(&buf).into_owned();
        while s.ends_with('\n') {
            s.pop();
        }
        s
    }

    /// Format a function as a string, without the trailing newline.
    pub fn func_str(func: &Func) -> String {
        let mut buf = Vec::new();
        Self::write_func(func, &mut buf)
            .expect("writing to a byte buffer cannot fail");
        let mut s = String::from_utf8_lossy(&buf).into_owned();
        while s.ends_with('\n') {
            s.pop();
        }
        s
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Printer::expr_str(self))
    }
}

impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Printer::stmt_str(self))
    }
}

impl std::fmt::Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Printer::func_str(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        float, int, Add, AssignStmt, Block, ElementType, Expr, FieldRead,
        IndexKind, IndexRead, Neg, Pass, SetType, TensorRead, Type, VarExpr,
    };

    fn spring_set() -> (Expr, Type) {
        let elem = ElementType::make(
            "Spring",
            vec![(crate::Id::new("k"), float(64))],
        );
        let set_ty = SetType::make(elem);
        (
            VarExpr::make(Var::new("springs", set_ty.clone())),
            set_ty,
        )
    }

    #[test]
    fn expressions_render_on_one_line() {
        let v = Var::new("v", float(64));
        let e = Add::make(Expr::from(v.clone()), Expr::from(v));
        assert_eq!(e.to_string(), "(v + v)");

        assert_eq!(Expr::from(3).to_string(), "3");
        assert_eq!(Expr::from(1.5).to_string(), "1.5");
        assert_eq!(Neg::make(Expr::from(2.0)).to_string(), "-2.0");

        let (springs, _) = spring_set();
        assert_eq!(
            FieldRead::make(springs.clone(), "k").to_string(),
            "springs.k"
        );
        assert_eq!(
            IndexRead::make(springs, IndexKind::Endpoints).to_string(),
            "springs.endpoints"
        );
    }

    #[test]
    fn tensor_reads_render_their_indices() {
        use crate::{
            IndexDomain, IndexSet, ScalarKind, ScalarType, TensorType,
        };
        let m = VarExpr::make(Var::new(
            "A",
            TensorType::make(
                ScalarType::new(ScalarKind::Float, 64),
                vec![
                    IndexDomain::new(IndexSet::Range(4)),
                    IndexDomain::new(IndexSet::Range(4)),
                ],
                false,
            ),
        ));
        let read =
            TensorRead::make(m, vec![Expr::from(0), Expr::from(1)]);
        assert_eq!(read.to_string(), "A(0, 1)");
    }

    #[test]
    fn statements_indent_and_blocks_flatten() {
        let v = Var::new("v", int(32));
        let block = Block::from_stmts(vec![
            Pass::make(),
            AssignStmt::make(v, Expr::from(0)),
        ]);
        assert_eq!(block.to_string(), "pass;\nv = 0;");

        let loop_var = Var::new("i", int(32));
        let body = Pass::make();
        let loop_stmt = crate::ForRange::make(
            loop_var,
            Expr::from(0),
            Expr::from(8),
            body,
        );
        assert_eq!(loop_stmt.to_string(), "for i in 0:8 {\n  pass;\n}");
    }

    #[test]
    fn functions_render_their_prototype() {
        let x = Var::new("x", float(64));
        let r = Var::new("r", float(64));
        let f = Func::new(
            "double",
            vec![x.clone()],
            vec![r.clone()],
            AssignStmt::make(
                r,
                Add::make(Expr::from(x.clone()), Expr::from(x)),
            ),
        );
        assert_eq!(
            f.to_string(),
            "func double(x : float64) -> (r : float64) {\n  r = (x + x);\n}"
        );

        let intrinsic = crate::intrinsics::sqrt();
        assert_eq!(
            intrinsic.to_string(),
            "func sqrt(x : float64) -> (r : float64);"
        );
    }

    #[test]
    fn dense_literals_render_componentwise() {
        use crate::{
            IndexDomain, IndexSet, Literal, ScalarKind, ScalarType,
            TensorType,
        };
        let ty = TensorType::make(
            ScalarType::new(ScalarKind::Int, 32),
            vec![IndexDomain::new(IndexSet::Range(3))],
            false,
        );
        let lit = Literal::from_i32s(ty, &[1, 2, 3]);
        assert_eq!(lit.to_string(), "[1, 2, 3]");
    }
}
