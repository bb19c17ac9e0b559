//! Shared utilities for the Lattice compiler.
mod errors;
mod id;

pub use errors::{Error, LatticeResult};
pub use id::{GSym, GetName, Id};
