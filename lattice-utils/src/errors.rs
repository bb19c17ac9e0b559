//! Centralized error handling for the Lattice compiler. Each variant of
//! `Error` represents a different class of failure in a pass or driver.
//! Invariant violations inside the IR itself are not `Error`s: they are
//! bugs in a caller and abort the process with a panic.

/// Convenience alias for results that carry a Lattice [`Error`].
pub type LatticeResult<T> = std::result::Result<T, Error>;

/// Errors generated by passes and drivers built on the IR.
#[derive(Debug)]
pub enum Error {
    /// A pass rejected the program it was given.
    Pass { pass: String, msg: String },
    /// Failed to write an output.
    WriteError(String),
    /// A miscellaneous error. Use this sparingly.
    Misc(String),
}

impl Error {
    pub fn pass<P: ToString, M: ToString>(pass: P, msg: M) -> Self {
        Error::Pass {
            pass: pass.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn misc<M: ToString>(msg: M) -> Self {
        Error::Misc(msg.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Pass { pass, msg } => write!(f, "[{pass}] {msg}"),
            Error::WriteError(msg) => write!(f, "write failed: {msg}"),
            Error::Misc(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::WriteError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::WriteError(err.to_string())
    }
}
