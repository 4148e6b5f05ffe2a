//! Constant values and constant expressions (SPEC_FULL.md §4.3).
//!
//! These share operand shapes with the corresponding instructions but are
//! placed in the symbol table only, never in a block — the function
//! definition's constant-expression protocol routes here instead of to
//! [`crate::block::Block`].

use crate::operators::{BinaryOperator, CastOperator, CompareOperator, InstructionFlags};
use crate::symbol::{Holder, Operand, OperandList, Symbol};
use crate::types::TypeRef;

#[derive(Debug)]
pub enum Constant {
    Integer { ty: TypeRef, bits: u64 },
    Float { ty: TypeRef, bits: u64 },
    Null { ty: TypeRef },
    Undef { ty: TypeRef },
    StringC { ty: TypeRef, bytes: Vec<u8> },
    StringRaw { ty: TypeRef, bytes: Vec<u8> },
    /// A typed scalar array given as raw data rather than resolved
    /// element symbols (e.g. `i8`-array string literals encoded inline).
    AggregateFromData { ty: TypeRef, data: Vec<u64> },
    /// An array/struct/vector over already-resolved constant elements.
    AggregateFromValues { ty: TypeRef, elements: OperandList },
    Binary { ty: TypeRef, operator: BinaryOperator, flags: InstructionFlags, lhs: Operand, rhs: Operand },
    Cast { ty: TypeRef, operator: CastOperator, value: Operand },
    Compare { ty: TypeRef, operator: CompareOperator, lhs: Operand, rhs: Operand },
    GetElementPtr { ty: TypeRef, inbounds: bool, base: Operand, indices: OperandList },
    /// Function symbol + block handle; both are resolved eagerly since
    /// functions and blocks are never forward-referenced as placeholders
    /// the way symbol-table entries are (SPEC_FULL.md §4.2).
    BlockAddress { ty: TypeRef, function: Operand, block: Operand },
}

impl Constant {
    #[must_use]
    pub fn type_of(&self) -> TypeRef {
        match self {
            Constant::Integer { ty, .. }
            | Constant::Float { ty, .. }
            | Constant::Null { ty }
            | Constant::Undef { ty }
            | Constant::StringC { ty, .. }
            | Constant::StringRaw { ty, .. }
            | Constant::AggregateFromData { ty, .. }
            | Constant::AggregateFromValues { ty, .. }
            | Constant::Binary { ty, .. }
            | Constant::Cast { ty, .. }
            | Constant::Compare { ty, .. }
            | Constant::GetElementPtr { ty, .. }
            | Constant::BlockAddress { ty, .. } => ty.clone(),
        }
    }
}

impl Holder for Constant {
    fn replace(&self, old: &Symbol, new: &Symbol) {
        match self {
            Constant::Integer { .. }
            | Constant::Float { .. }
            | Constant::Null { .. }
            | Constant::Undef { .. }
            | Constant::StringC { .. }
            | Constant::StringRaw { .. }
            | Constant::AggregateFromData { .. } => {}
            Constant::AggregateFromValues { elements, .. } => {
                elements.try_replace(old, new);
            }
            Constant::Binary { lhs, rhs, .. } => {
                lhs.try_replace(old, new);
                rhs.try_replace(old, new);
            }
            Constant::Cast { value, .. } => {
                value.try_replace(old, new);
            }
            Constant::Compare { lhs, rhs, .. } => {
                lhs.try_replace(old, new);
                rhs.try_replace(old, new);
            }
            Constant::GetElementPtr { base, indices, .. } => {
                base.try_replace(old, new);
                indices.try_replace(old, new);
            }
            Constant::BlockAddress { function, block, .. } => {
                function.try_replace(old, new);
                block.try_replace(old, new);
            }
        }
    }
}
