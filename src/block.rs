//! Basic blocks: ordered instruction containers that are also targetable
//! symbols (SPEC_FULL.md §4.2).

use std::cell::RefCell;
use std::rc::Rc;

use crate::instructions::Instruction;
use crate::symbol::SymbolName;
use crate::visitor::FunctionVisitor;

#[derive(Debug)]
pub struct Block {
    pub index: u32,
    name: RefCell<SymbolName>,
    instructions: RefCell<Vec<Rc<Instruction>>>,
}

impl Block {
    #[must_use]
    pub fn new(index: u32) -> Self {
        // Entry block (index 0) is named the empty string at allocation
        // time, never UNKNOWN; every other block starts UNKNOWN.
        let name = if index == 0 { SymbolName::Set(String::new()) } else { SymbolName::Unknown };
        Block { index, name: RefCell::new(name), instructions: RefCell::new(Vec::new()) }
    }

    pub fn push(&self, instruction: Rc<Instruction>) {
        self.instructions.borrow_mut().push(instruction);
    }

    #[must_use]
    pub fn instructions(&self) -> Vec<Rc<Instruction>> {
        self.instructions.borrow().clone()
    }

    #[must_use]
    pub fn name(&self) -> SymbolName {
        self.name.borrow().clone()
    }

    pub fn set_name(&self, name: String) {
        *self.name.borrow_mut() = SymbolName::Set(name);
    }

    /// Iterates this block's instructions in insertion order, dispatching
    /// each to the visitor (SPEC_FULL.md §4.5).
    pub fn accept(&self, visitor: &mut dyn FunctionVisitor) {
        for instruction in self.instructions.borrow().iter() {
            instruction.accept(visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_block_is_named_empty_string_not_unknown() {
        let entry = Block::new(0);
        assert_eq!(entry.name(), SymbolName::Set(String::new()));
        let other = Block::new(1);
        assert_eq!(other.name(), SymbolName::Unknown);
    }
}
