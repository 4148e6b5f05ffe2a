//! One variant per IR opcode, including the supplemental forms of
//! SPEC_FULL.md §2a. Each variant owns its operand symbols by handle and
//! is the unit the symbol table's forward-reference patching operates on.

use std::cell::RefCell;
use std::rc::Rc;

use crate::block::Block;
use crate::operators::{AtomicOrdering, BinaryOperator, CastOperator, CompareOperator, InstructionFlags, RmwOperation};
use crate::symbol::{Holder, Operand, OperandList, Symbol, SymbolName};
use crate::types::TypeRef;
use crate::visitor::FunctionVisitor;

#[derive(Debug)]
pub struct Binary {
    pub ty: TypeRef,
    pub operator: BinaryOperator,
    pub flags: InstructionFlags,
    pub lhs: Operand,
    pub rhs: Operand,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Compare {
    pub ty: TypeRef,
    pub operator: CompareOperator,
    pub lhs: Operand,
    pub rhs: Operand,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Cast {
    pub ty: TypeRef,
    pub operator: CastOperator,
    pub value: Operand,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Alloca {
    pub ty: TypeRef,
    pub count: Operand,
    pub align: u32,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Load {
    pub ty: TypeRef,
    pub src: Operand,
    pub align: u32,
    pub volatile: bool,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Store {
    pub dst: Operand,
    pub src: Operand,
    pub align: u32,
    pub volatile: bool,
}

#[derive(Debug)]
pub struct ExtractElement {
    pub ty: TypeRef,
    pub vector: Operand,
    pub index: Operand,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct InsertElement {
    pub ty: TypeRef,
    pub vector: Operand,
    pub element: Operand,
    pub index: Operand,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct ExtractValue {
    pub ty: TypeRef,
    pub aggregate: Operand,
    /// A literal index, unlike `extract_element`'s symbolic one — an
    /// intentional asymmetry, not normalized (SPEC_FULL.md §9).
    pub index: u64,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct InsertValue {
    pub ty: TypeRef,
    pub aggregate: Operand,
    pub element: Operand,
    pub index: u64,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct ShuffleVector {
    pub ty: TypeRef,
    pub lhs: Operand,
    pub rhs: Operand,
    pub mask: Operand,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct GetElementPtr {
    pub ty: TypeRef,
    pub inbounds: bool,
    pub base: Operand,
    pub indices: OperandList,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Branch {
    pub target: Rc<Block>,
}

#[derive(Debug)]
pub struct ConditionalBranch {
    pub condition: Operand,
    pub true_target: Rc<Block>,
    pub false_target: Rc<Block>,
}

#[derive(Debug)]
pub struct IndirectBranch {
    pub address: Operand,
    pub targets: Vec<Rc<Block>>,
}

#[derive(Debug)]
pub struct SwitchCase {
    pub value: Operand,
    pub target: Rc<Block>,
}

#[derive(Debug)]
pub struct Switch {
    pub condition: Operand,
    pub default: Rc<Block>,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug)]
pub struct SwitchOldCase {
    /// Raw 64-bit case constant, kept unresolved rather than rewritten
    /// into a constant symbol (SPEC_FULL.md §9).
    pub value: u64,
    pub target: Rc<Block>,
}

#[derive(Debug)]
pub struct SwitchOld {
    pub condition: Operand,
    pub default: Rc<Block>,
    pub cases: Vec<SwitchOldCase>,
}

#[derive(Debug, Default)]
pub struct Return;

#[derive(Debug)]
pub struct ReturnValue {
    pub value: Operand,
}

#[derive(Debug, Default)]
pub struct Unreachable;

#[derive(Debug)]
pub struct Call {
    pub ty: TypeRef,
    pub target: Operand,
    pub args: OperandList,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct PhiIncoming {
    pub value: Operand,
    pub block: Rc<Block>,
}

#[derive(Debug)]
pub struct Phi {
    pub ty: TypeRef,
    pub incoming: Vec<PhiIncoming>,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Select {
    pub ty: TypeRef,
    pub condition: Operand,
    pub true_value: Operand,
    pub false_value: Operand,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Fence {
    pub ordering: AtomicOrdering,
}

#[derive(Debug)]
pub struct Cmpxchg {
    pub ty: TypeRef,
    pub pointer: Operand,
    pub compare: Operand,
    pub new_value: Operand,
    pub ordering: AtomicOrdering,
    pub failure_ordering: AtomicOrdering,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct AtomicRmw {
    pub ty: TypeRef,
    pub pointer: Operand,
    pub value: Operand,
    pub operation: RmwOperation,
    pub ordering: AtomicOrdering,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Resume {
    pub value: Operand,
}

#[derive(Debug)]
pub struct LandingPad {
    pub ty: TypeRef,
    /// Opaque catch/filter clauses, stored but not interpreted
    /// (SPEC_FULL.md §2a).
    pub clauses: OperandList,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Invoke {
    pub ty: TypeRef,
    pub target: Operand,
    pub args: OperandList,
    pub normal_target: Rc<Block>,
    pub unwind_target: Rc<Block>,
    name: RefCell<SymbolName>,
}

#[derive(Debug)]
pub struct Freeze {
    pub ty: TypeRef,
    pub value: Operand,
    name: RefCell<SymbolName>,
}

macro_rules! named_ctor {
    ($ty:ty) => {
        impl $ty {
            #[must_use]
            pub fn name(&self) -> SymbolName {
                self.name.borrow().clone()
            }

            pub fn set_name(&self, name: String) {
                *self.name.borrow_mut() = SymbolName::Set(name);
            }
        }
    };
}

named_ctor!(Binary);
named_ctor!(Compare);
named_ctor!(Cast);
named_ctor!(Alloca);
named_ctor!(Load);
named_ctor!(ExtractElement);
named_ctor!(InsertElement);
named_ctor!(ExtractValue);
named_ctor!(InsertValue);
named_ctor!(ShuffleVector);
named_ctor!(GetElementPtr);
named_ctor!(Call);
named_ctor!(Phi);
named_ctor!(Select);
named_ctor!(Cmpxchg);
named_ctor!(AtomicRmw);
named_ctor!(LandingPad);
named_ctor!(Invoke);
named_ctor!(Freeze);

fn unnamed() -> RefCell<SymbolName> {
    RefCell::new(SymbolName::Unknown)
}

impl Binary {
    #[must_use]
    pub fn new(ty: TypeRef, operator: BinaryOperator, flags: InstructionFlags, lhs: Symbol, rhs: Symbol) -> Self {
        Binary { ty, operator, flags, lhs: Operand::new(lhs), rhs: Operand::new(rhs), name: unnamed() }
    }
}

impl Compare {
    #[must_use]
    pub fn new(ty: TypeRef, operator: CompareOperator, lhs: Symbol, rhs: Symbol) -> Self {
        Compare { ty, operator, lhs: Operand::new(lhs), rhs: Operand::new(rhs), name: unnamed() }
    }
}

impl Cast {
    #[must_use]
    pub fn new(ty: TypeRef, operator: CastOperator, value: Symbol) -> Self {
        Cast { ty, operator, value: Operand::new(value), name: unnamed() }
    }
}

impl Alloca {
    #[must_use]
    pub fn new(ty: TypeRef, count: Symbol, align: u32) -> Self {
        Alloca { ty, count: Operand::new(count), align, name: unnamed() }
    }
}

impl Load {
    #[must_use]
    pub fn new(ty: TypeRef, src: Symbol, align: u32, volatile: bool) -> Self {
        Load { ty, src: Operand::new(src), align, volatile, name: unnamed() }
    }
}

impl Store {
    #[must_use]
    pub fn new(dst: Symbol, src: Symbol, align: u32, volatile: bool) -> Self {
        Store { dst: Operand::new(dst), src: Operand::new(src), align, volatile }
    }
}

impl ExtractElement {
    #[must_use]
    pub fn new(ty: TypeRef, vector: Symbol, index: Symbol) -> Self {
        ExtractElement { ty, vector: Operand::new(vector), index: Operand::new(index), name: unnamed() }
    }
}

impl InsertElement {
    #[must_use]
    pub fn new(ty: TypeRef, vector: Symbol, element: Symbol, index: Symbol) -> Self {
        InsertElement {
            ty,
            vector: Operand::new(vector),
            element: Operand::new(element),
            index: Operand::new(index),
            name: unnamed(),
        }
    }
}

impl ExtractValue {
    #[must_use]
    pub fn new(ty: TypeRef, aggregate: Symbol, index: u64) -> Self {
        ExtractValue { ty, aggregate: Operand::new(aggregate), index, name: unnamed() }
    }
}

impl InsertValue {
    #[must_use]
    pub fn new(ty: TypeRef, aggregate: Symbol, element: Symbol, index: u64) -> Self {
        InsertValue { ty, aggregate: Operand::new(aggregate), element: Operand::new(element), index, name: unnamed() }
    }
}

impl ShuffleVector {
    #[must_use]
    pub fn new(ty: TypeRef, lhs: Symbol, rhs: Symbol, mask: Symbol) -> Self {
        ShuffleVector { ty, lhs: Operand::new(lhs), rhs: Operand::new(rhs), mask: Operand::new(mask), name: unnamed() }
    }
}

impl GetElementPtr {
    #[must_use]
    pub fn new(ty: TypeRef, inbounds: bool, base: Symbol, indices: Vec<Symbol>) -> Self {
        GetElementPtr { ty, inbounds, base: Operand::new(base), indices: OperandList::new(indices), name: unnamed() }
    }
}

impl ConditionalBranch {
    #[must_use]
    pub fn new(condition: Symbol, true_target: Rc<Block>, false_target: Rc<Block>) -> Self {
        ConditionalBranch { condition: Operand::new(condition), true_target, false_target }
    }
}

impl IndirectBranch {
    #[must_use]
    pub fn new(address: Symbol, targets: Vec<Rc<Block>>) -> Self {
        IndirectBranch { address: Operand::new(address), targets }
    }
}

impl Switch {
    #[must_use]
    pub fn new(condition: Symbol, default: Rc<Block>, cases: Vec<SwitchCase>) -> Self {
        Switch { condition: Operand::new(condition), default, cases }
    }
}

impl SwitchCase {
    #[must_use]
    pub fn new(value: Symbol, target: Rc<Block>) -> Self {
        SwitchCase { value: Operand::new(value), target }
    }
}

impl SwitchOld {
    #[must_use]
    pub fn new(condition: Symbol, default: Rc<Block>, cases: Vec<SwitchOldCase>) -> Self {
        SwitchOld { condition: Operand::new(condition), default, cases }
    }
}

impl ReturnValue {
    #[must_use]
    pub fn new(value: Symbol) -> Self {
        ReturnValue { value: Operand::new(value) }
    }
}

impl Call {
    #[must_use]
    pub fn new(ty: TypeRef, target: Symbol, args: Vec<Symbol>) -> Self {
        Call { ty, target: Operand::new(target), args: OperandList::new(args), name: unnamed() }
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.ty.is_void()
    }
}

impl Phi {
    #[must_use]
    pub fn new(ty: TypeRef, incoming: Vec<PhiIncoming>) -> Self {
        Phi { ty, incoming, name: unnamed() }
    }
}

impl Select {
    #[must_use]
    pub fn new(ty: TypeRef, condition: Symbol, true_value: Symbol, false_value: Symbol) -> Self {
        Select {
            ty,
            condition: Operand::new(condition),
            true_value: Operand::new(true_value),
            false_value: Operand::new(false_value),
            name: unnamed(),
        }
    }
}

impl Cmpxchg {
    #[must_use]
    pub fn new(
        ty: TypeRef,
        pointer: Symbol,
        compare: Symbol,
        new_value: Symbol,
        ordering: AtomicOrdering,
        failure_ordering: AtomicOrdering,
    ) -> Self {
        Cmpxchg {
            ty,
            pointer: Operand::new(pointer),
            compare: Operand::new(compare),
            new_value: Operand::new(new_value),
            ordering,
            failure_ordering,
            name: unnamed(),
        }
    }
}

impl AtomicRmw {
    #[must_use]
    pub fn new(ty: TypeRef, pointer: Symbol, value: Symbol, operation: RmwOperation, ordering: AtomicOrdering) -> Self {
        AtomicRmw { ty, pointer: Operand::new(pointer), value: Operand::new(value), operation, ordering, name: unnamed() }
    }
}

impl Resume {
    #[must_use]
    pub fn new(value: Symbol) -> Self {
        Resume { value: Operand::new(value) }
    }
}

impl LandingPad {
    #[must_use]
    pub fn new(ty: TypeRef, clauses: Vec<Symbol>) -> Self {
        LandingPad { ty, clauses: OperandList::new(clauses), name: unnamed() }
    }
}

impl Invoke {
    #[must_use]
    pub fn new(
        ty: TypeRef,
        target: Symbol,
        args: Vec<Symbol>,
        normal_target: Rc<Block>,
        unwind_target: Rc<Block>,
    ) -> Self {
        Invoke {
            ty,
            target: Operand::new(target),
            args: OperandList::new(args),
            normal_target,
            unwind_target,
            name: unnamed(),
        }
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.ty.is_void()
    }
}

impl Freeze {
    #[must_use]
    pub fn new(ty: TypeRef, value: Symbol) -> Self {
        Freeze { ty, value: Operand::new(value), name: unnamed() }
    }
}

#[derive(Debug)]
pub enum Instruction {
    Binary(Binary),
    Compare(Compare),
    Cast(Cast),
    Alloca(Alloca),
    Load(Load),
    Store(Store),
    ExtractElement(ExtractElement),
    InsertElement(InsertElement),
    ExtractValue(ExtractValue),
    InsertValue(InsertValue),
    ShuffleVector(ShuffleVector),
    GetElementPtr(GetElementPtr),
    Branch(Branch),
    ConditionalBranch(ConditionalBranch),
    IndirectBranch(IndirectBranch),
    Switch(Switch),
    SwitchOld(SwitchOld),
    Return(Return),
    ReturnValue(ReturnValue),
    Unreachable(Unreachable),
    Call(Call),
    Phi(Phi),
    Select(Select),
    Fence(Fence),
    Cmpxchg(Cmpxchg),
    AtomicRmw(AtomicRmw),
    Resume(Resume),
    LandingPad(LandingPad),
    Invoke(Invoke),
    Freeze(Freeze),
}

impl Instruction {
    /// `None` for void instructions, which are never appended to the
    /// symbol table (SPEC_FULL.md §3).
    #[must_use]
    pub fn type_of(&self) -> Option<TypeRef> {
        match self {
            Instruction::Binary(i) => Some(i.ty.clone()),
            Instruction::Compare(i) => Some(i.ty.clone()),
            Instruction::Cast(i) => Some(i.ty.clone()),
            Instruction::Alloca(i) => Some(i.ty.clone()),
            Instruction::Load(i) => Some(i.ty.clone()),
            Instruction::Store(_) => None,
            Instruction::ExtractElement(i) => Some(i.ty.clone()),
            Instruction::InsertElement(i) => Some(i.ty.clone()),
            Instruction::ExtractValue(i) => Some(i.ty.clone()),
            Instruction::InsertValue(i) => Some(i.ty.clone()),
            Instruction::ShuffleVector(i) => Some(i.ty.clone()),
            Instruction::GetElementPtr(i) => Some(i.ty.clone()),
            Instruction::Branch(_) => None,
            Instruction::ConditionalBranch(_) => None,
            Instruction::IndirectBranch(_) => None,
            Instruction::Switch(_) => None,
            Instruction::SwitchOld(_) => None,
            Instruction::Return(_) => None,
            Instruction::ReturnValue(_) => None,
            Instruction::Unreachable(_) => None,
            Instruction::Call(i) => (!i.is_void()).then(|| i.ty.clone()),
            Instruction::Phi(i) => Some(i.ty.clone()),
            Instruction::Select(i) => Some(i.ty.clone()),
            Instruction::Fence(_) => None,
            Instruction::Cmpxchg(i) => Some(i.ty.clone()),
            Instruction::AtomicRmw(i) => Some(i.ty.clone()),
            Instruction::Resume(_) => None,
            Instruction::LandingPad(i) => Some(i.ty.clone()),
            Instruction::Invoke(i) => (!i.is_void()).then(|| i.ty.clone()),
            Instruction::Freeze(i) => Some(i.ty.clone()),
        }
    }

    #[must_use]
    pub fn is_value_producing(&self) -> bool {
        self.type_of().is_some()
    }

    #[must_use]
    pub fn name(&self) -> SymbolName {
        match self {
            Instruction::Binary(i) => i.name(),
            Instruction::Compare(i) => i.name(),
            Instruction::Cast(i) => i.name(),
            Instruction::Alloca(i) => i.name(),
            Instruction::Load(i) => i.name(),
            Instruction::ExtractElement(i) => i.name(),
            Instruction::InsertElement(i) => i.name(),
            Instruction::ExtractValue(i) => i.name(),
            Instruction::InsertValue(i) => i.name(),
            Instruction::ShuffleVector(i) => i.name(),
            Instruction::GetElementPtr(i) => i.name(),
            Instruction::Call(i) if !i.is_void() => i.name(),
            Instruction::Phi(i) => i.name(),
            Instruction::Select(i) => i.name(),
            Instruction::Cmpxchg(i) => i.name(),
            Instruction::AtomicRmw(i) => i.name(),
            Instruction::LandingPad(i) => i.name(),
            Instruction::Invoke(i) if !i.is_void() => i.name(),
            Instruction::Freeze(i) => i.name(),
            _ => SymbolName::Unknown,
        }
    }

    /// Assigns a numeric name during the `exit_function` naming pass.
    /// No-op (and never called) for void instructions.
    pub fn set_name(&self, name: String) {
        match self {
            Instruction::Binary(i) => i.set_name(name),
            Instruction::Compare(i) => i.set_name(name),
            Instruction::Cast(i) => i.set_name(name),
            Instruction::Alloca(i) => i.set_name(name),
            Instruction::Load(i) => i.set_name(name),
            Instruction::ExtractElement(i) => i.set_name(name),
            Instruction::InsertElement(i) => i.set_name(name),
            Instruction::ExtractValue(i) => i.set_name(name),
            Instruction::InsertValue(i) => i.set_name(name),
            Instruction::ShuffleVector(i) => i.set_name(name),
            Instruction::GetElementPtr(i) => i.set_name(name),
            Instruction::Call(i) => i.set_name(name),
            Instruction::Phi(i) => i.set_name(name),
            Instruction::Select(i) => i.set_name(name),
            Instruction::Cmpxchg(i) => i.set_name(name),
            Instruction::AtomicRmw(i) => i.set_name(name),
            Instruction::LandingPad(i) => i.set_name(name),
            Instruction::Invoke(i) => i.set_name(name),
            Instruction::Freeze(i) => i.set_name(name),
            _ => {}
        }
    }

    pub fn accept(&self, visitor: &mut dyn FunctionVisitor) {
        match self {
            Instruction::Binary(i) => visitor.visit_binary(i),
            Instruction::Compare(i) => visitor.visit_compare(i),
            Instruction::Cast(i) => visitor.visit_cast(i),
            Instruction::Alloca(i) => visitor.visit_alloca(i),
            Instruction::Load(i) => visitor.visit_load(i),
            Instruction::Store(i) => visitor.visit_store(i),
            Instruction::ExtractElement(i) => visitor.visit_extract_element(i),
            Instruction::InsertElement(i) => visitor.visit_insert_element(i),
            Instruction::ExtractValue(i) => visitor.visit_extract_value(i),
            Instruction::InsertValue(i) => visitor.visit_insert_value(i),
            Instruction::ShuffleVector(i) => visitor.visit_shuffle_vector(i),
            Instruction::GetElementPtr(i) => visitor.visit_get_element_ptr(i),
            Instruction::Branch(i) => visitor.visit_branch(i),
            Instruction::ConditionalBranch(i) => visitor.visit_conditional_branch(i),
            Instruction::IndirectBranch(i) => visitor.visit_indirect_branch(i),
            Instruction::Switch(i) => visitor.visit_switch(i),
            Instruction::SwitchOld(i) => visitor.visit_switch_old(i),
            Instruction::Return(i) => visitor.visit_return(i),
            Instruction::ReturnValue(i) => visitor.visit_return_value(i),
            Instruction::Unreachable(i) => visitor.visit_unreachable(i),
            Instruction::Call(i) => visitor.visit_call(i),
            Instruction::Phi(i) => visitor.visit_phi(i),
            Instruction::Select(i) => visitor.visit_select(i),
            Instruction::Fence(i) => visitor.visit_fence(i),
            Instruction::Cmpxchg(i) => visitor.visit_cmpxchg(i),
            Instruction::AtomicRmw(i) => visitor.visit_atomic_rmw(i),
            Instruction::Resume(i) => visitor.visit_resume(i),
            Instruction::LandingPad(i) => visitor.visit_landing_pad(i),
            Instruction::Invoke(i) => visitor.visit_invoke(i),
            Instruction::Freeze(i) => visitor.visit_freeze(i),
        }
    }
}

impl Holder for Instruction {
    fn replace(&self, old: &Symbol, new: &Symbol) {
        match self {
            Instruction::Binary(i) => {
                i.lhs.try_replace(old, new);
                i.rhs.try_replace(old, new);
            }
            Instruction::Compare(i) => {
                i.lhs.try_replace(old, new);
                i.rhs.try_replace(old, new);
            }
            Instruction::Cast(i) => {
                i.value.try_replace(old, new);
            }
            Instruction::Alloca(i) => {
                i.count.try_replace(old, new);
            }
            Instruction::Load(i) => {
                i.src.try_replace(old, new);
            }
            Instruction::Store(i) => {
                i.dst.try_replace(old, new);
                i.src.try_replace(old, new);
            }
            Instruction::ExtractElement(i) => {
                i.vector.try_replace(old, new);
                i.index.try_replace(old, new);
            }
            Instruction::InsertElement(i) => {
                i.vector.try_replace(old, new);
                i.element.try_replace(old, new);
                i.index.try_replace(old, new);
            }
            Instruction::ExtractValue(i) => {
                i.aggregate.try_replace(old, new);
            }
            Instruction::InsertValue(i) => {
                i.aggregate.try_replace(old, new);
                i.element.try_replace(old, new);
            }
            Instruction::ShuffleVector(i) => {
                i.lhs.try_replace(old, new);
                i.rhs.try_replace(old, new);
                i.mask.try_replace(old, new);
            }
            Instruction::GetElementPtr(i) => {
                i.base.try_replace(old, new);
                i.indices.try_replace(old, new);
            }
            Instruction::Branch(_) => {}
            Instruction::ConditionalBranch(i) => {
                i.condition.try_replace(old, new);
            }
            Instruction::IndirectBranch(i) => {
                i.address.try_replace(old, new);
            }
            Instruction::Switch(i) => {
                i.condition.try_replace(old, new);
                for case in &i.cases {
                    case.value.try_replace(old, new);
                }
            }
            Instruction::SwitchOld(i) => {
                i.condition.try_replace(old, new);
            }
            Instruction::Return(_) | Instruction::Unreachable(_) | Instruction::Fence(_) => {}
            Instruction::ReturnValue(i) => {
                i.value.try_replace(old, new);
            }
            Instruction::Call(i) => {
                i.target.try_replace(old, new);
                i.args.try_replace(old, new);
            }
            Instruction::Phi(i) => {
                for incoming in &i.incoming {
                    incoming.value.try_replace(old, new);
                }
            }
            Instruction::Select(i) => {
                i.condition.try_replace(old, new);
                i.true_value.try_replace(old, new);
                i.false_value.try_replace(old, new);
            }
            Instruction::Cmpxchg(i) => {
                i.pointer.try_replace(old, new);
                i.compare.try_replace(old, new);
                i.new_value.try_replace(old, new);
            }
            Instruction::AtomicRmw(i) => {
                i.pointer.try_replace(old, new);
                i.value.try_replace(old, new);
            }
            Instruction::Resume(i) => {
                i.value.try_replace(old, new);
            }
            Instruction::LandingPad(i) => {
                i.clauses.try_replace(old, new);
            }
            Instruction::Invoke(i) => {
                i.target.try_replace(old, new);
                i.args.try_replace(old, new);
            }
            Instruction::Freeze(i) => {
                i.value.try_replace(old, new);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Placeholder;
    use crate::types::Type;

    #[test]
    fn void_call_reports_no_type_and_no_name() {
        let call = Instruction::Call(Call::new(Rc::new(Type::Void), placeholder_symbol(0), vec![]));
        assert!(!call.is_value_producing());
        assert_eq!(call.name(), SymbolName::Unknown);
    }

    #[test]
    fn value_call_reports_its_type() {
        let ty = Rc::new(Type::Integer { width: 32 });
        let call = Instruction::Call(Call::new(ty.clone(), placeholder_symbol(0), vec![]));
        assert_eq!(call.type_of(), Some(ty));
    }

    #[test]
    fn phi_replace_patches_matching_incoming_value() {
        let ty = Rc::new(Type::Integer { width: 32 });
        let placeholder = placeholder_symbol(7);
        let block = Rc::new(Block::new(1));
        let phi = Phi::new(ty, vec![PhiIncoming { value: Operand::new(placeholder.clone()), block }]);
        let real = placeholder_symbol(99);
        let inst = Instruction::Phi(phi);
        inst.replace(&placeholder, &real);
        if let Instruction::Phi(p) = &inst {
            assert_eq!(p.incoming[0].value.get(), real);
        }
    }

    fn placeholder_symbol(index: u32) -> Symbol {
        Symbol::Placeholder(Rc::new(Placeholder::new(index)))
    }

    fn dispatch_count(inst: &Instruction) -> usize {
        let mut counter = crate::visitor::CountingVisitor::default();
        inst.accept(&mut counter);
        counter.total
    }

    #[test]
    fn fence_is_void_and_dispatches_to_the_visitor() {
        let fence = Instruction::Fence(Fence { ordering: AtomicOrdering::SeqCst });
        assert!(!fence.is_value_producing());
        assert_eq!(fence.type_of(), None);
        assert_eq!(dispatch_count(&fence), 1);
    }

    #[test]
    fn cmpxchg_reports_its_type_and_dispatches_to_the_visitor() {
        let ty = Rc::new(Type::Integer { width: 32 });
        let cmpxchg = Instruction::Cmpxchg(Cmpxchg::new(
            ty.clone(),
            placeholder_symbol(0),
            placeholder_symbol(1),
            placeholder_symbol(2),
            AtomicOrdering::Acquire,
            AtomicOrdering::Monotonic,
        ));
        assert!(cmpxchg.is_value_producing());
        assert_eq!(cmpxchg.type_of(), Some(ty));
        assert_eq!(dispatch_count(&cmpxchg), 1);
    }

    #[test]
    fn atomic_rmw_reports_its_type_and_dispatches_to_the_visitor() {
        let ty = Rc::new(Type::Integer { width: 32 });
        let rmw = Instruction::AtomicRmw(AtomicRmw::new(
            ty.clone(),
            placeholder_symbol(0),
            placeholder_symbol(1),
            RmwOperation::Add,
            AtomicOrdering::Monotonic,
        ));
        assert!(rmw.is_value_producing());
        assert_eq!(rmw.type_of(), Some(ty));
        assert_eq!(dispatch_count(&rmw), 1);
    }

    #[test]
    fn resume_is_void_and_dispatches_to_the_visitor() {
        let resume = Instruction::Resume(Resume::new(placeholder_symbol(0)));
        assert!(!resume.is_value_producing());
        assert_eq!(resume.type_of(), None);
        assert_eq!(dispatch_count(&resume), 1);
    }

    #[test]
    fn landing_pad_reports_its_type_and_holds_every_clause() {
        let ty = Rc::new(Type::Integer { width: 32 });
        let landing_pad = Instruction::LandingPad(LandingPad::new(
            ty.clone(),
            vec![placeholder_symbol(0), placeholder_symbol(1)],
        ));
        assert!(landing_pad.is_value_producing());
        assert_eq!(landing_pad.type_of(), Some(ty));
        if let Instruction::LandingPad(lp) = &landing_pad {
            assert_eq!(lp.clauses.len(), 2);
        }
        assert_eq!(dispatch_count(&landing_pad), 1);
    }

    #[test]
    fn invoke_is_void_only_when_its_return_type_is_void() {
        let block = Rc::new(Block::new(0));
        let void_invoke = Instruction::Invoke(Invoke::new(
            Rc::new(Type::Void),
            placeholder_symbol(0),
            vec![],
            block.clone(),
            block.clone(),
        ));
        assert!(!void_invoke.is_value_producing());

        let ty = Rc::new(Type::Integer { width: 32 });
        let value_invoke =
            Instruction::Invoke(Invoke::new(ty.clone(), placeholder_symbol(0), vec![], block.clone(), block));
        assert!(value_invoke.is_value_producing());
        assert_eq!(value_invoke.type_of(), Some(ty));
        assert_eq!(dispatch_count(&value_invoke), 1);
    }

    #[test]
    fn freeze_reports_its_type_and_dispatches_to_the_visitor() {
        let ty = Rc::new(Type::Integer { width: 32 });
        let freeze = Instruction::Freeze(Freeze::new(ty.clone(), placeholder_symbol(0)));
        assert!(freeze.is_value_producing());
        assert_eq!(freeze.type_of(), Some(ty));
        assert_eq!(dispatch_count(&freeze), 1);
    }
}
