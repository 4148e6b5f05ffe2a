//! The polymorphic operand algebra (SPEC_FULL.md §3).
//!
//! `Symbol` is a tagged sum rather than a trait object: the set of kinds is
//! closed (constants, parameters, blocks, value instructions, functions),
//! and every builder operation already knows which kind it is producing or
//! consuming. Equality between symbols is pointer identity on the
//! underlying `Rc`, never structural content — two distinct `add`
//! instructions with identical operands are not the same symbol.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::block::Block;
use crate::constants::Constant;
use crate::function::FunctionValue;
use crate::instructions::Instruction;
use crate::types::{Type, TypeRef};

/// A symbol's assigned name. `Unknown` is the UNKNOWN sentinel from
/// SPEC_FULL.md §4.4 — distinct from `Set(String::new())`, which is how the
/// entry block is named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SymbolName {
    #[default]
    Unknown,
    Set(String),
}

impl SymbolName {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, SymbolName::Unknown)
    }
}

/// Anything that holds `Symbol`-valued operand slots and must be revisited
/// when a forward reference it depends on resolves. A no-op impl is the
/// only reasonable behavior for holders with no rewritable operands.
pub trait Holder: fmt::Debug {
    fn replace(&self, old: &Symbol, new: &Symbol);
}

/// A single forward-reference-capable operand slot.
#[derive(Debug)]
pub struct Operand(RefCell<Symbol>);

impl Operand {
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Operand(RefCell::new(symbol))
    }

    #[must_use]
    pub fn get(&self) -> Symbol {
        self.0.borrow().clone()
    }

    /// Replace the slot's contents if it currently holds `old`. Returns
    /// whether a replacement happened, so a multi-operand holder can tell
    /// whether any of its slots needed patching.
    pub fn try_replace(&self, old: &Symbol, new: &Symbol) -> bool {
        let mut slot = self.0.borrow_mut();
        if *slot == *old {
            *slot = new.clone();
            true
        } else {
            false
        }
    }
}

/// An ordered, forward-reference-capable operand list (phi incoming
/// values, call arguments, gep indices, switch case blocks, ...).
#[derive(Debug)]
pub struct OperandList(RefCell<Vec<Symbol>>);

impl OperandList {
    #[must_use]
    pub fn new(symbols: Vec<Symbol>) -> Self {
        OperandList(RefCell::new(symbols))
    }

    #[must_use]
    pub fn get(&self) -> Vec<Symbol> {
        self.0.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Patch every occurrence of `old` in the list. A placeholder can
    /// legitimately appear more than once (e.g. a phi with two incoming
    /// edges from the same not-yet-built block).
    pub fn try_replace(&self, old: &Symbol, new: &Symbol) -> bool {
        let mut replaced = false;
        for slot in self.0.borrow_mut().iter_mut() {
            if *slot == *old {
                *slot = new.clone();
                replaced = true;
            }
        }
        replaced
    }
}

/// A symbol-table placeholder standing in for an index that has been
/// looked up but not yet filled. Never observed by a consumer past
/// construction (SPEC_FULL.md §4.1).
#[derive(Debug)]
pub struct Placeholder {
    pub index: u32,
    ty: RefCell<TypeRef>,
}

impl Placeholder {
    #[must_use]
    pub fn new(index: u32) -> Self {
        Placeholder { index, ty: RefCell::new(Rc::new(Type::Unknown)) }
    }

    #[must_use]
    pub fn type_of(&self) -> TypeRef {
        self.ty.borrow().clone()
    }
}

/// Anything that carries a type and may appear as an instruction or
/// constant operand.
#[derive(Debug, Clone)]
pub enum Symbol {
    Parameter(Rc<Parameter>),
    Block(Rc<Block>),
    Instruction(Rc<Instruction>),
    Constant(Rc<Constant>),
    Function(Rc<FunctionValue>),
    Placeholder(Rc<Placeholder>),
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Symbol::Parameter(a), Symbol::Parameter(b)) => Rc::ptr_eq(a, b),
            (Symbol::Block(a), Symbol::Block(b)) => Rc::ptr_eq(a, b),
            (Symbol::Instruction(a), Symbol::Instruction(b)) => Rc::ptr_eq(a, b),
            (Symbol::Constant(a), Symbol::Constant(b)) => Rc::ptr_eq(a, b),
            (Symbol::Function(a), Symbol::Function(b)) => Rc::ptr_eq(a, b),
            (Symbol::Placeholder(a), Symbol::Placeholder(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Symbol {
    #[must_use]
    pub fn type_of(&self) -> TypeRef {
        match self {
            Symbol::Parameter(p) => p.ty.clone(),
            Symbol::Block(_) => Rc::new(Type::Label),
            Symbol::Instruction(inst) => inst.type_of().unwrap_or_else(|| Rc::new(Type::Void)),
            Symbol::Constant(c) => c.type_of(),
            Symbol::Function(f) => f.type_of(),
            Symbol::Placeholder(p) => p.type_of(),
        }
    }

    #[must_use]
    pub fn name(&self) -> SymbolName {
        match self {
            Symbol::Parameter(p) => p.name(),
            Symbol::Block(b) => b.name(),
            Symbol::Instruction(inst) => inst.name(),
            Symbol::Constant(_) => SymbolName::Unknown,
            Symbol::Function(f) => f.name(),
            Symbol::Placeholder(_) => SymbolName::Unknown,
        }
    }

    #[must_use]
    pub fn as_holder(&self) -> Option<Rc<dyn Holder>> {
        match self {
            Symbol::Instruction(inst) => Some(Rc::clone(inst) as Rc<dyn Holder>),
            Symbol::Constant(c) => Some(Rc::clone(c) as Rc<dyn Holder>),
            _ => None,
        }
    }
}

/// A function parameter: typed and positional (SPEC_FULL.md §3).
#[derive(Debug)]
pub struct Parameter {
    pub ty: TypeRef,
    pub index: u32,
    name: RefCell<SymbolName>,
}

impl Parameter {
    #[must_use]
    pub fn new(ty: TypeRef, index: u32) -> Self {
        Parameter { ty, index, name: RefCell::new(SymbolName::Unknown) }
    }

    #[must_use]
    pub fn name(&self) -> SymbolName {
        self.name.borrow().clone()
    }

    pub fn set_name(&self, name: String) {
        *self.name.borrow_mut() = SymbolName::Set(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_equality_is_pointer_identity_not_structural() {
        let a = Rc::new(Parameter::new(Rc::new(Type::Integer { width: 32 }), 0));
        let b = Rc::new(Parameter::new(Rc::new(Type::Integer { width: 32 }), 0));
        assert_eq!(Symbol::Parameter(a.clone()), Symbol::Parameter(a));
        assert_ne!(Symbol::Parameter(Rc::new(Parameter::new(Rc::new(Type::Integer { width: 32 }), 0))), Symbol::Parameter(b));
    }

    #[test]
    fn operand_list_replaces_every_occurrence() {
        let placeholder = Symbol::Placeholder(Rc::new(Placeholder::new(3)));
        let real = Symbol::Parameter(Rc::new(Parameter::new(Rc::new(Type::Integer { width: 1 }), 0)));
        let list = OperandList::new(vec![placeholder.clone(), placeholder.clone()]);
        assert!(list.try_replace(&placeholder, &real));
        assert_eq!(list.get(), vec![real.clone(), real]);
    }
}
