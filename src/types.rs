//! Minimal stand-in for the module-wide type table.
//!
//! The real type system is an external collaborator (SPEC_FULL.md §3a): a
//! deduplicating table owned by the enclosing module, built from the
//! bitcode `TYPE_BLOCK`. This crate never builds or interns that table; it
//! only needs to classify a type handle enough to decode operators and to
//! report a function's own type. Handles are `Rc<Type>` and compared by
//! pointer identity, the same discipline the real table would use.

use std::rc::Rc;

/// A type handle as supplied by the type-system collaborator.
pub type TypeRef = Rc<Type>;

/// The classifications this crate needs to decode operators and report
/// function signatures. Not a general-purpose LLVM type representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Void,
    Integer { width: u32 },
    Half,
    BFloat,
    Float,
    Double,
    X86Fp80,
    Fp128,
    PpcFp128,
    Label,
    Metadata,
    Token,
    Pointer { address_space: u32 },
    Array { len: u64, element: TypeRef },
    Vector { len: u64, element: TypeRef },
    Struct { elements: Vec<TypeRef>, packed: bool },
    Function { ret: TypeRef, params: Vec<TypeRef>, vararg: bool },
    /// Internal-only: the type of a forward-reference placeholder before
    /// resolution. Never observed by a consumer past construction.
    Unknown,
}

impl Type {
    #[must_use]
    pub fn is_floating_point(&self) -> bool {
        matches!(
            self,
            Type::Half | Type::BFloat | Type::Float | Type::Double | Type::X86Fp80 | Type::Fp128 | Type::PpcFp128
        )
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer { .. })
    }

    /// True for scalar floating-point types and for vectors whose element
    /// type is floating-point — the classification binary/compare operator
    /// decoding needs (SPEC_FULL.md §4.6).
    #[must_use]
    pub fn is_floating_point_or_vector_of(&self) -> bool {
        match self {
            Type::Vector { element, .. } => element.is_floating_point(),
            other => other.is_floating_point(),
        }
    }

    #[must_use]
    pub fn is_vector(&self) -> bool {
        matches!(self, Type::Vector { .. })
    }

    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer { .. })
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    #[must_use]
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            Type::Array { element, .. } | Type::Vector { element, .. } => Some(element),
            _ => None,
        }
    }

    /// The `pointer-to-function-type` a function reports as its own value
    /// type (SPEC_FULL.md §4.4 Type contract). Under the opaque-pointer
    /// convention (the upstream format's `OPAQUE_POINTER` type code; typed
    /// pointers are obsolete) a function value's type carries no pointee —
    /// the signature itself is tracked separately on the function, not
    /// inside the pointer type.
    #[must_use]
    pub fn pointer(address_space: u32) -> TypeRef {
        Rc::new(Type::Pointer { address_space })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scalar_and_vector_float() {
        let f32_ty = Rc::new(Type::Float);
        assert!(f32_ty.is_floating_point_or_vector_of());
        let vec_ty = Rc::new(Type::Vector { len: 4, element: f32_ty.clone() });
        assert!(vec_ty.is_floating_point_or_vector_of());
        let int_ty = Rc::new(Type::Integer { width: 32 });
        assert!(!int_ty.is_floating_point_or_vector_of());
    }

    #[test]
    fn element_type_reaches_through_array_and_vector() {
        let i8_ty = Rc::new(Type::Integer { width: 8 });
        let arr = Type::Array { len: 3, element: i8_ty.clone() };
        assert_eq!(arr.element_type(), Some(&i8_ty));
    }
}
