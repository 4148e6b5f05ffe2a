//! Decoded forms of the opcode/flag fields the builder protocol accepts.
//!
//! The raw numbering below matches the upstream bitcode encoding (the values
//! "have no fixed relation to the LLVM IR enum values" and must not be
//! renumbered), but callers of this crate never see raw bytes — only the
//! decoded enums and flag sets.

use bitflags::bitflags;
use num_enum::TryFromPrimitive;

use crate::error::{Error, Result};

/// Binary operators, as used by `binary_operator` and by the `BinOp`
/// constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum BinaryOperator {
    Add = 0,
    Sub = 1,
    Mul = 2,
    UDiv = 3,
    /// Overloaded for floating-point division.
    SDiv = 4,
    URem = 5,
    /// Overloaded for floating-point remainder.
    SRem = 6,
    Shl = 7,
    LShr = 8,
    AShr = 9,
    And = 10,
    Or = 11,
    Xor = 12,
}

impl BinaryOperator {
    pub fn decode(raw: u64) -> Result<Self> {
        let raw = u8::try_from(raw).map_err(|_| Error::TypeMismatch("binary opcode out of range"))?;
        Self::try_from_primitive(raw).map_err(|_| Error::TypeMismatch("unknown binary opcode"))
    }
}

/// The sole unary operator the format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum UnaryOperator {
    FNeg = 0,
}

impl UnaryOperator {
    pub fn decode(raw: u64) -> Result<Self> {
        let raw = u8::try_from(raw).map_err(|_| Error::TypeMismatch("unary opcode out of range"))?;
        Self::try_from_primitive(raw).map_err(|_| Error::TypeMismatch("unknown unary opcode"))
    }
}

/// `icmp`/`fcmp` predicates. The two families share no numbering, so the
/// operand type (decided by the caller from the compared operands, not by
/// this enum) picks which table a raw predicate code is decoded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    Integer(IntegerPredicate),
    Float(FloatPredicate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum IntegerPredicate {
    Eq = 32,
    Ne = 33,
    Ugt = 34,
    Uge = 35,
    Ult = 36,
    Ule = 37,
    Sgt = 38,
    Sge = 39,
    Slt = 40,
    Sle = 41,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum FloatPredicate {
    False = 0,
    Oeq = 1,
    Ogt = 2,
    Oge = 3,
    Olt = 4,
    Ole = 5,
    One = 6,
    Ord = 7,
    Uno = 8,
    Ueq = 9,
    Ugt = 10,
    Uge = 11,
    Ult = 12,
    Ule = 13,
    Une = 14,
    True = 15,
}

impl CompareOperator {
    /// `is_float` is decided by the caller from the classification of the
    /// compared operands' type, not carried in the raw predicate code.
    pub fn decode(raw: u64, is_float: bool) -> Result<Self> {
        let raw = u8::try_from(raw).map_err(|_| Error::TypeMismatch("compare predicate out of range"))?;
        if is_float {
            FloatPredicate::try_from_primitive(raw)
                .map(CompareOperator::Float)
                .map_err(|_| Error::TypeMismatch("unknown float predicate"))
        } else {
            IntegerPredicate::try_from_primitive(raw)
                .map(CompareOperator::Integer)
                .map_err(|_| Error::TypeMismatch("unknown integer predicate"))
        }
    }
}

/// Cast operators, as used by `cast` and by the `Cast` constant expression.
///
/// Unlike [`CompareOperator`], a single numbering covers every cast kind
/// regardless of source/destination type — `decode` takes only the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CastOperator {
    Trunc = 0,
    ZExt = 1,
    SExt = 2,
    FpToUi = 3,
    FpToSi = 4,
    UiToFp = 5,
    SiToFp = 6,
    FpTrunc = 7,
    FpExt = 8,
    PtrToInt = 9,
    IntToPtr = 10,
    Bitcast = 11,
    AddrSpaceCast = 12,
}

impl CastOperator {
    pub fn decode(raw: u64) -> Result<Self> {
        let raw = u8::try_from(raw).map_err(|_| Error::TypeMismatch("cast opcode out of range"))?;
        Self::try_from_primitive(raw).map_err(|_| Error::TypeMismatch("unknown cast opcode"))
    }
}

/// Orderings for `fence`, `cmpxchg`, `atomic_rmw`, and atomic `load`/`store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, Default)]
#[repr(u8)]
pub enum AtomicOrdering {
    #[default]
    NotAtomic = 0,
    Unordered = 1,
    Monotonic = 2,
    Acquire = 3,
    Release = 4,
    AcqRel = 5,
    SeqCst = 6,
}

impl AtomicOrdering {
    pub fn decode(raw: u64) -> Result<Self> {
        let raw = u8::try_from(raw).map_err(|_| Error::TypeMismatch("atomic ordering out of range"))?;
        Self::try_from_primitive(raw).map_err(|_| Error::TypeMismatch("unknown atomic ordering"))
    }
}

/// `atomic_rmw`'s operation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
#[non_exhaustive]
pub enum RmwOperation {
    Xchg = 0,
    Add = 1,
    Sub = 2,
    And = 3,
    Nand = 4,
    Or = 5,
    Xor = 6,
    Max = 7,
    Min = 8,
    UMax = 9,
    UMin = 10,
    FAdd = 11,
    FSub = 12,
    FMax = 13,
    FMin = 14,
    UIncWrap = 15,
    UDecWrap = 16,
    USubCond = 17,
    USubSat = 18,
}

impl RmwOperation {
    pub fn decode(raw: u64) -> Result<Self> {
        let raw = u8::try_from(raw).map_err(|_| Error::TypeMismatch("rmw operation out of range"))?;
        Self::try_from_primitive(raw).map_err(|_| Error::TypeMismatch("unknown rmw operation"))
    }
}

bitflags! {
    /// `nuw`/`nsw`/`exact` bits attached to a binary operator or cast.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OverflowFlags: u8 {
        const NO_UNSIGNED_WRAP = 1 << 0;
        const NO_SIGNED_WRAP   = 1 << 1;
        const EXACT            = 1 << 2;
        const DISJOINT         = 1 << 3;
    }
}

bitflags! {
    /// Fast-math flags attached to a floating-point binary operator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FastMathFlags: u8 {
        const ALLOW_REASSOC = 1 << 0;
        const NO_NANS       = 1 << 1;
        const NO_INFS       = 1 << 2;
        const NO_SIGNED_ZEROS  = 1 << 3;
        const ALLOW_RECIPROCAL = 1 << 4;
        const ALLOW_CONTRACT   = 1 << 5;
        const APPROX_FUNC      = 1 << 6;
        const FAST = Self::ALLOW_REASSOC.bits()
            | Self::NO_NANS.bits()
            | Self::NO_INFS.bits()
            | Self::NO_SIGNED_ZEROS.bits()
            | Self::ALLOW_RECIPROCAL.bits()
            | Self::ALLOW_CONTRACT.bits()
            | Self::APPROX_FUNC.bits();
    }
}

/// The flag bits attached to a binary operator or cast, decoded against
/// the operand's type classification: overflow flags for integer
/// operators, fast-math flags for floating-point ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionFlags {
    Overflow(OverflowFlags),
    FastMath(FastMathFlags),
}

impl InstructionFlags {
    #[must_use]
    pub fn decode(raw: u64, is_float: bool) -> Self {
        let bits = (raw & 0xff) as u8;
        if is_float {
            InstructionFlags::FastMath(FastMathFlags::from_bits_truncate(bits))
        } else {
            InstructionFlags::Overflow(OverflowFlags::from_bits_truncate(bits))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_binary_opcode() {
        assert_eq!(BinaryOperator::decode(7).unwrap(), BinaryOperator::Shl);
    }

    #[test]
    fn rejects_unknown_binary_opcode() {
        assert!(BinaryOperator::decode(200).is_err());
    }

    #[test]
    fn compare_operator_picks_table_by_float_flag() {
        assert_eq!(
            CompareOperator::decode(32, false).unwrap(),
            CompareOperator::Integer(IntegerPredicate::Eq)
        );
        assert_eq!(
            CompareOperator::decode(1, true).unwrap(),
            CompareOperator::Float(FloatPredicate::Oeq)
        );
    }

    #[test]
    fn cast_operator_ignores_operand_type() {
        assert_eq!(CastOperator::decode(11).unwrap(), CastOperator::Bitcast);
    }

    #[test]
    fn instruction_flags_pick_family_by_float_flag() {
        match InstructionFlags::decode(0b11, false) {
            InstructionFlags::Overflow(flags) => {
                assert!(flags.contains(OverflowFlags::NO_UNSIGNED_WRAP));
                assert!(flags.contains(OverflowFlags::NO_SIGNED_WRAP));
            }
            InstructionFlags::FastMath(_) => panic!("expected overflow flags"),
        }
    }
}
