//! Read-only double-dispatch walk over function → block → instruction
//! (SPEC_FULL.md §4.5).

use crate::block::Block;
use crate::instructions::*;

/// One method per instruction variant. A default no-op body lets a
/// consumer implement only the variants it cares about, the same way the
/// upstream bitstream visitor lets callers override only the block
/// callbacks they need.
#[allow(unused_variables)]
pub trait FunctionVisitor {
    fn visit_binary(&mut self, inst: &Binary) {}
    fn visit_compare(&mut self, inst: &Compare) {}
    fn visit_cast(&mut self, inst: &Cast) {}
    fn visit_alloca(&mut self, inst: &Alloca) {}
    fn visit_load(&mut self, inst: &Load) {}
    fn visit_store(&mut self, inst: &Store) {}
    fn visit_extract_element(&mut self, inst: &ExtractElement) {}
    fn visit_insert_element(&mut self, inst: &InsertElement) {}
    fn visit_extract_value(&mut self, inst: &ExtractValue) {}
    fn visit_insert_value(&mut self, inst: &InsertValue) {}
    fn visit_shuffle_vector(&mut self, inst: &ShuffleVector) {}
    fn visit_get_element_ptr(&mut self, inst: &GetElementPtr) {}
    fn visit_branch(&mut self, inst: &Branch) {}
    fn visit_conditional_branch(&mut self, inst: &ConditionalBranch) {}
    fn visit_indirect_branch(&mut self, inst: &IndirectBranch) {}
    fn visit_switch(&mut self, inst: &Switch) {}
    fn visit_switch_old(&mut self, inst: &SwitchOld) {}
    fn visit_return(&mut self, inst: &Return) {}
    fn visit_return_value(&mut self, inst: &ReturnValue) {}
    fn visit_unreachable(&mut self, inst: &Unreachable) {}
    fn visit_call(&mut self, inst: &Call) {}
    fn visit_phi(&mut self, inst: &Phi) {}
    fn visit_select(&mut self, inst: &Select) {}
    fn visit_fence(&mut self, inst: &Fence) {}
    fn visit_cmpxchg(&mut self, inst: &Cmpxchg) {}
    fn visit_atomic_rmw(&mut self, inst: &AtomicRmw) {}
    fn visit_resume(&mut self, inst: &Resume) {}
    fn visit_landing_pad(&mut self, inst: &LandingPad) {}
    fn visit_invoke(&mut self, inst: &Invoke) {}
    fn visit_freeze(&mut self, inst: &Freeze) {}
}

/// A visitor that simply counts how many instructions it saw, of each
/// kind it's told to care about; useful as a base for ad-hoc consumers and
/// in tests, the way the upstream crate's `CollectingVisitor` is.
#[derive(Debug, Default)]
pub struct CountingVisitor {
    pub total: usize,
}

impl FunctionVisitor for CountingVisitor {
    fn visit_binary(&mut self, _inst: &Binary) {
        self.total += 1;
    }
    fn visit_compare(&mut self, _inst: &Compare) {
        self.total += 1;
    }
    fn visit_cast(&mut self, _inst: &Cast) {
        self.total += 1;
    }
    fn visit_alloca(&mut self, _inst: &Alloca) {
        self.total += 1;
    }
    fn visit_load(&mut self, _inst: &Load) {
        self.total += 1;
    }
    fn visit_store(&mut self, _inst: &Store) {
        self.total += 1;
    }
    fn visit_extract_element(&mut self, _inst: &ExtractElement) {
        self.total += 1;
    }
    fn visit_insert_element(&mut self, _inst: &InsertElement) {
        self.total += 1;
    }
    fn visit_extract_value(&mut self, _inst: &ExtractValue) {
        self.total += 1;
    }
    fn visit_insert_value(&mut self, _inst: &InsertValue) {
        self.total += 1;
    }
    fn visit_shuffle_vector(&mut self, _inst: &ShuffleVector) {
        self.total += 1;
    }
    fn visit_get_element_ptr(&mut self, _inst: &GetElementPtr) {
        self.total += 1;
    }
    fn visit_branch(&mut self, _inst: &Branch) {
        self.total += 1;
    }
    fn visit_conditional_branch(&mut self, _inst: &ConditionalBranch) {
        self.total += 1;
    }
    fn visit_indirect_branch(&mut self, _inst: &IndirectBranch) {
        self.total += 1;
    }
    fn visit_switch(&mut self, _inst: &Switch) {
        self.total += 1;
    }
    fn visit_switch_old(&mut self, _inst: &SwitchOld) {
        self.total += 1;
    }
    fn visit_return(&mut self, _inst: &Return) {
        self.total += 1;
    }
    fn visit_return_value(&mut self, _inst: &ReturnValue) {
        self.total += 1;
    }
    fn visit_unreachable(&mut self, _inst: &Unreachable) {
        self.total += 1;
    }
    fn visit_call(&mut self, _inst: &Call) {
        self.total += 1;
    }
    fn visit_phi(&mut self, _inst: &Phi) {
        self.total += 1;
    }
    fn visit_select(&mut self, _inst: &Select) {
        self.total += 1;
    }
    fn visit_fence(&mut self, _inst: &Fence) {
        self.total += 1;
    }
    fn visit_cmpxchg(&mut self, _inst: &Cmpxchg) {
        self.total += 1;
    }
    fn visit_atomic_rmw(&mut self, _inst: &AtomicRmw) {
        self.total += 1;
    }
    fn visit_resume(&mut self, _inst: &Resume) {
        self.total += 1;
    }
    fn visit_landing_pad(&mut self, _inst: &LandingPad) {
        self.total += 1;
    }
    fn visit_invoke(&mut self, _inst: &Invoke) {
        self.total += 1;
    }
    fn visit_freeze(&mut self, _inst: &Freeze) {
        self.total += 1;
    }
}

/// Walks a block's instructions in insertion order (SPEC_FULL.md §4.5).
pub fn visit_block(block: &Block, visitor: &mut dyn FunctionVisitor) {
    block.accept(visitor);
}
