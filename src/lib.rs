//! In-memory function-level IR model for an LLVM bitcode consumer.
//!
//! A bitcode decoder (not part of this crate) drives [`FunctionBuilder`] in
//! stream order — open function, create parameters, allocate the block
//! array, emit instructions block by block, then exit — to assemble a
//! fully linked [`FunctionValue`]. Operands reference each other by
//! integer index into a per-function symbol table that tolerates forward
//! references: an index may be looked up before the symbol occupying it
//! is known, and the model patches every holder of that placeholder once
//! it resolves.

pub mod block;
pub mod constants;
pub mod error;
pub mod function;
pub mod instructions;
pub mod operators;
pub mod symbol;
pub mod symbol_table;
pub mod types;
pub mod visitor;

pub use block::Block;
pub use error::{Error, Result};
pub use function::{FunctionBuilder, FunctionValue};
pub use symbol::{Symbol, SymbolName};
pub use symbol_table::SymbolTable;
pub use types::{Type, TypeRef};
pub use visitor::{CountingVisitor, FunctionVisitor};
