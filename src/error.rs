use std::{error, fmt};

/// Errors raised while assembling or introspecting a function body.
///
/// The builder protocol (see [`crate::function::FunctionBuilder`]) presumes a
/// well-formed stream of calls; these variants exist for defensive testing of
/// malformed call sequences, not for recovering from them.
#[derive(Debug, Clone)]
pub enum Error {
    /// A builder call arrived out of the order the protocol requires, e.g.
    /// `generate_block` before `allocate_blocks`, or more `generate_block`
    /// calls than blocks were allocated.
    ProtocolViolation(&'static str),
    /// A block or symbol-table index was out of range for the current
    /// function.
    IndexOutOfRange { index: u32, len: u32 },
    /// An operand was required to be a constant (or to have a particular
    /// type classification) but was not.
    TypeMismatch(&'static str),
    /// `exit_function` was called while a symbol-table slot still held an
    /// unresolved forward-reference placeholder.
    UnresolvedForwardReference(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProtocolViolation(msg) => write!(f, "protocol violation: {msg}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (len {len})")
            }
            Self::TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            Self::UnresolvedForwardReference(index) => {
                write!(f, "unresolved forward reference at index {index}")
            }
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
