//! The registry of built-in functions.
//!
//! Intrinsics are bodiless functions whose implementation the runtime
//! supplies. The registry is built lazily, once per thread: IR handles are
//! single-threaded reference counts and cannot live in process statics,
//! and an IR instance never crosses threads, so a per-thread registry is
//! observationally process-wide.
use std::collections::HashMap;

use crate::{float, int, Func, Var};

thread_local! {
    static REGISTRY: HashMap<&'static str, Func> = build_registry();
}

fn build_registry() -> HashMap<&'static str, Func> {
    fn unary_f64(name: &'static str) -> (&'static str, Func) {
        (
            name,
            Func::intrinsic(
                name,
                vec![Var::new("x", float(64))],
                vec![Var::new("r", float(64))],
            ),
        )
    }

    fn binary_f64(name: &'static str) -> (&'static str, Func) {
        (
            name,
            Func::intrinsic(
                name,
                vec![Var::new("x", float(64)), Var::new("y", float(64))],
                vec![Var::new("r", float(64))],
            ),
        )
    }

    // An intrinsic whose argument shapes the type system cannot quantify;
    // only the scalar result is declared.
    fn polymorphic_f64(name: &'static str) -> (&'static str, Func) {
        (
            name,
            Func::intrinsic(name, vec![], vec![Var::new("r", float(64))]),
        )
    }

    let registry: HashMap<&'static str, Func> = [
        (
            "mod",
            Func::intrinsic(
                "mod",
                vec![Var::new("x", int(32)), Var::new("y", int(32))],
                vec![Var::new("r", int(32))],
            ),
        ),
        unary_f64("sin"),
        unary_f64("cos"),
        binary_f64("atan2"),
        unary_f64("sqrt"),
        unary_f64("log"),
        unary_f64("exp"),
        polymorphic_f64("norm"),
        polymorphic_f64("solve"),
    ]
    .into_iter()
    .collect();
    log::debug!("initialized intrinsic registry with {} entries", registry.len());
    registry
}

/// Look up an intrinsic by name. Returns a handle sharing the registry's
/// descriptor, so repeated lookups yield the same function.
pub fn by_name(name: &str) -> Option<Func> {
    REGISTRY.with(|registry| registry.get(name).cloned())
}

macro_rules! accessors {
    ($(($fn_name:ident, $name:literal)),* $(,)?) => {
        $(
            pub fn $fn_name() -> Func {
                by_name($name).unwrap()
            }
        )*
    };
}

accessors! {
    (modulo, "mod"),
    (sin, "sin"),
    (cos, "cos"),
    (atan2, "atan2"),
    (sqrt, "sqrt"),
    (log, "log"),
    (exp, "exp"),
    (norm, "norm"),
    (solve, "solve"),
}
