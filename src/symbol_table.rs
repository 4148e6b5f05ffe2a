//! Per-function, forward-reference-capable symbol arena (SPEC_FULL.md
//! §4.1). Handles are 32-bit indices; resolution is a subscription list per
//! unfilled slot, patched in registration order on fill.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::symbol::{Holder, Placeholder, Symbol};

#[derive(Debug)]
enum Slot {
    Empty,
    Forward { placeholder: Rc<Placeholder>, subscribers: Vec<Rc<dyn Holder>> },
    Filled(Symbol),
}

/// `next_append` is deliberately distinct from `slots.len()`: a forward
/// lookup can push the vector past the append cursor (by creating
/// placeholder/empty slots for indices not yet reached), and `append`
/// must still land on the cursor, not the vector's current tail.
#[derive(Debug, Default)]
pub struct SymbolTable {
    slots: RefCell<Vec<Slot>>,
    next_append: Cell<u32>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        SymbolTable::default()
    }

    fn ensure_len(slots: &mut Vec<Slot>, len: u32) {
        while slots.len() < len as usize {
            slots.push(Slot::Empty);
        }
    }

    /// Places `symbol` at the next append cursor, patching any holders
    /// registered against a forward-reference placeholder that was
    /// occupying that slot.
    pub fn append(&self, symbol: Symbol) -> u32 {
        let index = self.next_append.get();
        self.next_append.set(index + 1);

        let old = {
            let mut slots = self.slots.borrow_mut();
            Self::ensure_len(&mut slots, index + 1);
            std::mem::replace(&mut slots[index as usize], Slot::Filled(symbol.clone()))
        };

        if let Slot::Forward { placeholder, subscribers } = old {
            let placeholder_symbol = Symbol::Placeholder(placeholder);
            for holder in subscribers {
                holder.replace(&placeholder_symbol, &symbol);
            }
        }

        index
    }

    /// Looks up `index` without registering a holder. Used when the
    /// caller only needs the resolved-or-placeholder value immediately
    /// (e.g. `constants`, which rejects placeholders outright).
    pub fn lookup(&self, index: u32) -> Symbol {
        let mut slots = self.slots.borrow_mut();
        Self::ensure_len(&mut slots, index + 1);
        match &slots[index as usize] {
            Slot::Filled(symbol) => symbol.clone(),
            Slot::Forward { placeholder, .. } => Symbol::Placeholder(placeholder.clone()),
            Slot::Empty => {
                let placeholder = Rc::new(Placeholder::new(index));
                let symbol = Symbol::Placeholder(placeholder.clone());
                slots[index as usize] = Slot::Forward { placeholder, subscribers: Vec::new() };
                symbol
            }
        }
    }

    /// Registers `holder` as a subscriber of `index`'s slot, so it is
    /// revisited when that slot resolves.
    ///
    /// Split from `lookup` rather than combined into one "lookup with
    /// holder" call: the holder is the instruction or constant being
    /// built *from* the looked-up operand, which does not exist yet at
    /// the point the operand is resolved. The usual sequence is `lookup`
    /// each raw operand index, construct the owning symbol, then call
    /// `register_if_placeholder` once per operand that came back as a
    /// placeholder.
    pub fn register_holder(&self, index: u32, holder: Rc<dyn Holder>) {
        let mut slots = self.slots.borrow_mut();
        Self::ensure_len(&mut slots, index + 1);
        match &mut slots[index as usize] {
            Slot::Forward { subscribers, .. } => subscribers.push(holder),
            Slot::Filled(_) => {}
            Slot::Empty => {
                let placeholder = Rc::new(Placeholder::new(index));
                slots[index as usize] = Slot::Forward { placeholder, subscribers: vec![holder] };
            }
        }
    }

    /// Convenience for the common case: register `holder` only if
    /// `symbol` (as returned by an earlier `lookup`) is a placeholder.
    pub fn register_if_placeholder(&self, symbol: &Symbol, holder: &Rc<dyn Holder>) {
        if let Symbol::Placeholder(placeholder) = symbol {
            self.register_holder(placeholder.index, Rc::clone(holder));
        }
    }

    /// Bulk lookup for aggregate construction: every resolved symbol must
    /// be a constant.
    pub fn constants(&self, indices: &[u32]) -> Result<Vec<Symbol>> {
        indices
            .iter()
            .map(|&index| match self.lookup(index) {
                symbol @ Symbol::Constant(_) => Ok(symbol),
                _ => Err(Error::TypeMismatch("aggregate element must resolve to a constant")),
            })
            .collect()
    }

    pub fn set_name(&self, index: u32, name: String) -> Result<()> {
        let slots = self.slots.borrow();
        match slots.get(index as usize) {
            Some(Slot::Filled(Symbol::Parameter(parameter))) => {
                parameter.set_name(name);
                Ok(())
            }
            Some(Slot::Filled(Symbol::Instruction(instruction))) => {
                instruction.set_name(name);
                Ok(())
            }
            Some(Slot::Filled(_)) => Err(Error::TypeMismatch("symbol cannot be named")),
            Some(_) => Err(Error::UnresolvedForwardReference(index)),
            None => Err(Error::IndexOutOfRange { index, len: slots.len() as u32 }),
        }
    }

    /// The index of the first unresolved placeholder still in the table,
    /// if any. Consulted by `exit_function` under `strict-validation`.
    #[must_use]
    pub fn first_unresolved(&self) -> Option<u32> {
        self.slots
            .borrow()
            .iter()
            .position(|slot| matches!(slot, Slot::Forward { .. }))
            .map(|i| i as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::{Instruction, ReturnValue};
    use crate::types::Type;

    #[test]
    fn forward_lookup_then_append_patches_holder() {
        let table = SymbolTable::new();
        let forward = table.lookup(0);
        let holder_inst = Rc::new(Instruction::ReturnValue(ReturnValue::new(forward.clone())));
        table.register_if_placeholder(&forward, &(holder_inst.clone() as Rc<dyn Holder>));

        let real = Symbol::Constant(Rc::new(crate::constants::Constant::Undef { ty: Rc::new(Type::Void) }));
        let index = table.append(real.clone());
        assert_eq!(index, 0);

        if let Instruction::ReturnValue(rv) = &*holder_inst {
            assert_eq!(rv.value.get(), real);
        }
        assert!(table.first_unresolved().is_none());
    }

    #[test]
    fn append_beyond_a_prior_forward_reference_keeps_monotonic_indices() {
        let table = SymbolTable::new();
        let _ = table.lookup(2); // forward reference to a not-yet-appended index
        let ty = Rc::new(Type::Void);
        let first = table.append(Symbol::Constant(Rc::new(crate::constants::Constant::Undef { ty: ty.clone() })));
        let second = table.append(Symbol::Constant(Rc::new(crate::constants::Constant::Undef { ty: ty.clone() })));
        let third = table.append(Symbol::Constant(Rc::new(crate::constants::Constant::Undef { ty })));
        assert_eq!((first, second, third), (0, 1, 2));
        assert!(table.first_unresolved().is_none());
    }

    #[test]
    fn constants_rejects_non_constant_operand() {
        let table = SymbolTable::new();
        let ty = Rc::new(Type::Integer { width: 32 });
        table.append(Symbol::Parameter(Rc::new(crate::symbol::Parameter::new(ty, 0))));
        assert!(table.constants(&[0]).is_err());
    }
}
