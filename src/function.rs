//! Function definitions and the builder protocol that assembles them
//! (SPEC_FULL.md §4.4, §4.7).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, trace};

use crate::block::Block;
use crate::constants::Constant;
use crate::error::{Error, Result};
use crate::instructions::*;
use crate::operators::{
    AtomicOrdering, BinaryOperator, CastOperator, CompareOperator, InstructionFlags, RmwOperation,
};
use crate::symbol::{Holder, Operand, Parameter, Symbol, SymbolName};
use crate::symbol_table::SymbolTable;
use crate::types::{Type, TypeRef};
use crate::visitor::{self, FunctionVisitor};

/// A function definition: the callable symbol produced by a build. Its
/// own value type is pointer-to-function-type, per the standard LLVM
/// convention (SPEC_FULL.md §4.4) — under the opaque-pointer stand-in of
/// §3a that is a plain `Pointer`, with the signature tracked separately
/// on `signature()` rather than nested inside the pointer type.
#[derive(Debug)]
pub struct FunctionValue {
    name: RefCell<SymbolName>,
    return_type: TypeRef,
    param_types: Vec<TypeRef>,
    vararg: bool,
    self_type: TypeRef,
    parameters: RefCell<Vec<Rc<Parameter>>>,
    blocks: RefCell<Vec<Rc<Block>>>,
    symbols: SymbolTable,
}

impl FunctionValue {
    fn new(return_type: TypeRef, param_types: Vec<TypeRef>, vararg: bool) -> Rc<Self> {
        Rc::new(FunctionValue {
            name: RefCell::new(SymbolName::Unknown),
            return_type,
            param_types,
            vararg,
            self_type: Type::pointer(0),
            parameters: RefCell::new(Vec::new()),
            blocks: RefCell::new(Vec::new()),
            symbols: SymbolTable::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> SymbolName {
        self.name.borrow().clone()
    }

    /// Stores `name` decorated with the leading `@` LLVM function names
    /// always carry (SPEC_FULL.md §3, §6).
    pub fn set_name(&self, name: String) {
        *self.name.borrow_mut() = SymbolName::Set(format!("@{name}"));
    }

    #[must_use]
    pub fn type_of(&self) -> TypeRef {
        self.self_type.clone()
    }

    /// The classification LLVM would store as the pointee of a typed
    /// function pointer: return type, parameter types, varargs flag.
    #[must_use]
    pub fn signature(&self) -> Type {
        Type::Function { ret: self.return_type.clone(), params: self.param_types.clone(), vararg: self.vararg }
    }

    #[must_use]
    pub fn parameters(&self) -> Vec<Rc<Parameter>> {
        self.parameters.borrow().clone()
    }

    #[must_use]
    pub fn block_count(&self) -> u32 {
        self.blocks.borrow().len() as u32
    }

    pub fn block(&self, index: u32) -> Result<Rc<Block>> {
        self.blocks
            .borrow()
            .get(index as usize)
            .cloned()
            .ok_or(Error::IndexOutOfRange { index, len: self.block_count() })
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Walks every block in insertion order, dispatching each of its
    /// instructions to `visitor` (SPEC_FULL.md §4.5). The per-block
    /// `get-block(i)`/`block_count()` accessors are a supplementary way to
    /// reach a single block directly; this is the model's own visitor
    /// surface.
    pub fn accept(&self, visitor: &mut dyn FunctionVisitor) {
        for block in self.blocks.borrow().iter() {
            visitor::visit_block(block, visitor);
        }
    }
}

/// Drives construction of a single [`FunctionValue`] from an ordered
/// stream of builder calls (SPEC_FULL.md §4.7). Every method corresponds
/// to one call the decoder issues; violating the documented call order
/// returns [`Error::ProtocolViolation`] rather than panicking.
#[derive(Debug)]
pub struct FunctionBuilder {
    function: Rc<FunctionValue>,
    blocks_allocated: Cell<bool>,
    next_block_index: Cell<u32>,
    open_block: RefCell<Option<Rc<Block>>>,
    exited: Cell<bool>,
}

impl FunctionBuilder {
    #[must_use]
    pub fn new(return_type: TypeRef, param_types: Vec<TypeRef>, vararg: bool) -> Self {
        FunctionBuilder {
            function: FunctionValue::new(return_type, param_types, vararg),
            blocks_allocated: Cell::new(false),
            next_block_index: Cell::new(0),
            open_block: RefCell::new(None),
            exited: Cell::new(false),
        }
    }

    #[must_use]
    pub fn function(&self) -> Rc<FunctionValue> {
        self.function.clone()
    }

    fn current_block(&self) -> Result<Rc<Block>> {
        self.open_block.borrow().clone().ok_or(Error::ProtocolViolation("no block is currently open"))
    }

    fn lookup(&self, index: u32) -> Symbol {
        self.function.symbols.lookup(index)
    }

    fn block_target(&self, index: u32) -> Result<Rc<Block>> {
        self.function.block(index)
    }

    /// Registers forward-reference holders *before* appending to the
    /// symbol table, then appends (if value-producing) and finally pushes
    /// to the current block. The registration must come first: a true
    /// self-reference (an operand naming this instruction's own
    /// not-yet-assigned index, e.g. a phi incoming from its own block)
    /// would otherwise find its slot already filled by the time it tries
    /// to subscribe, and never get patched (SPEC_FULL.md §4.2, §8 forward
    /// self-reference case).
    fn finish_instruction(&self, inst: Rc<Instruction>, operands: &[Symbol]) -> Result<Symbol> {
        let symbol = Symbol::Instruction(inst.clone());
        let holder = inst.clone() as Rc<dyn Holder>;
        for operand in operands {
            if matches!(operand, Symbol::Placeholder(_)) {
                trace!("registering forward-reference holder for instruction operand");
            }
            self.function.symbols.register_if_placeholder(operand, &holder);
        }
        if inst.is_value_producing() {
            self.function.symbols.append(symbol.clone());
        }
        self.current_block()?.push(inst);
        Ok(symbol)
    }

    fn finish_constant(&self, constant: Rc<Constant>, operands: &[Symbol]) -> Symbol {
        let symbol = Symbol::Constant(constant.clone());
        let holder = constant.clone() as Rc<dyn Holder>;
        for operand in operands {
            self.function.symbols.register_if_placeholder(operand, &holder);
        }
        self.function.symbols.append(symbol.clone());
        symbol
    }

    // ---- protocol: parameters, blocks, naming, exit ----------------

    pub fn create_parameter(&self, ty: TypeRef) -> Result<Symbol> {
        if self.blocks_allocated.get() {
            return Err(Error::ProtocolViolation("create_parameter called after allocate_blocks"));
        }
        let index = self.function.parameters.borrow().len() as u32;
        let parameter = Rc::new(Parameter::new(ty, index));
        self.function.parameters.borrow_mut().push(parameter.clone());
        let symbol = Symbol::Parameter(parameter);
        self.function.symbols.append(symbol.clone());
        Ok(symbol)
    }

    pub fn allocate_blocks(&self, count: u32) -> Result<()> {
        if self.blocks_allocated.get() {
            return Err(Error::ProtocolViolation("allocate_blocks called more than once"));
        }
        let mut blocks = self.function.blocks.borrow_mut();
        for i in 0..count {
            blocks.push(Rc::new(Block::new(i)));
        }
        drop(blocks);
        self.blocks_allocated.set(true);
        trace!("allocated {count} blocks");
        Ok(())
    }

    pub fn generate_block(&self) -> Result<Rc<Block>> {
        if !self.blocks_allocated.get() {
            return Err(Error::ProtocolViolation("generate_block called before allocate_blocks"));
        }
        let index = self.next_block_index.get();
        let block = self
            .function
            .blocks
            .borrow()
            .get(index as usize)
            .cloned()
            .ok_or(Error::ProtocolViolation("generate_block called more times than blocks were allocated"))?;
        self.next_block_index.set(index + 1);
        *self.open_block.borrow_mut() = Some(block.clone());
        Ok(block)
    }

    pub fn name_block(&self, index: u32, name: String) -> Result<()> {
        self.function.block(index)?.set_name(name);
        Ok(())
    }

    pub fn name_entry(&self, index: u32, name: String) -> Result<()> {
        self.function.symbols.set_name(index, name)
    }

    /// `offset` is the upstream format's legacy `VST_FNENTRY` field,
    /// obsolete whenever a string table is present; accepted and ignored
    /// (SPEC_FULL.md §4.4).
    pub fn name_function(&self, _index: u32, _offset: u64, name: String) {
        self.function.set_name(name);
    }

    /// Assigns numeric names to every still-unknown block and
    /// value-producing instruction, in block-index / insertion order,
    /// from a single counter starting at 1. Under `strict-validation`
    /// (default-on), also rejects a function with a still-unresolved
    /// forward reference.
    pub fn exit_function(&self) -> Result<()> {
        if self.exited.get() {
            return Err(Error::ProtocolViolation("exit_function called more than once"));
        }
        self.exited.set(true);

        let mut counter: u32 = 1;
        for block in self.function.blocks.borrow().iter() {
            if block.index != 0 && block.name().is_unknown() {
                block.set_name(counter.to_string());
                debug!("named block {} as \"{counter}\"", block.index);
                counter += 1;
            }
            for inst in block.instructions() {
                if inst.is_value_producing() && inst.name().is_unknown() {
                    inst.set_name(counter.to_string());
                    debug!("named value instruction as \"{counter}\"");
                    counter += 1;
                }
            }
        }

        #[cfg(feature = "strict-validation")]
        if let Some(index) = self.function.symbols.first_unresolved() {
            return Err(Error::UnresolvedForwardReference(index));
        }

        Ok(())
    }

    // ---- instructions ------------------------------------------------

    pub fn create_binary(&self, ty: TypeRef, opcode: u64, raw_flags: u64, lhs: u32, rhs: u32) -> Result<Symbol> {
        let lhs = self.lookup(lhs);
        let rhs = self.lookup(rhs);
        let operator = BinaryOperator::decode(opcode)?;
        let flags = InstructionFlags::decode(raw_flags, ty.is_floating_point_or_vector_of());
        let inst = Rc::new(Instruction::Binary(Binary::new(ty, operator, flags, lhs.clone(), rhs.clone())));
        self.finish_instruction(inst, &[lhs, rhs])
    }

    pub fn create_compare(&self, ty: TypeRef, opcode: u64, lhs: u32, rhs: u32) -> Result<Symbol> {
        let lhs = self.lookup(lhs);
        let rhs = self.lookup(rhs);
        let operator = CompareOperator::decode(opcode, ty.is_floating_point_or_vector_of())?;
        let inst = Rc::new(Instruction::Compare(Compare::new(ty, operator, lhs.clone(), rhs.clone())));
        self.finish_instruction(inst, &[lhs, rhs])
    }

    pub fn create_cast(&self, ty: TypeRef, opcode: u64, value: u32) -> Result<Symbol> {
        let value = self.lookup(value);
        let operator = CastOperator::decode(opcode)?;
        let inst = Rc::new(Instruction::Cast(Cast::new(ty, operator, value.clone())));
        self.finish_instruction(inst, &[value])
    }

    pub fn create_allocation(&self, ty: TypeRef, count: u32, align: u32) -> Result<Symbol> {
        let count = self.lookup(count);
        let inst = Rc::new(Instruction::Alloca(Alloca::new(ty, count.clone(), align)));
        self.finish_instruction(inst, &[count])
    }

    pub fn create_load(&self, ty: TypeRef, src: u32, align: u32, volatile: bool) -> Result<Symbol> {
        let src = self.lookup(src);
        let inst = Rc::new(Instruction::Load(Load::new(ty, src.clone(), align, volatile)));
        self.finish_instruction(inst, &[src])
    }

    pub fn create_store(&self, dst: u32, src: u32, align: u32, volatile: bool) -> Result<Symbol> {
        let dst = self.lookup(dst);
        let src = self.lookup(src);
        let inst = Rc::new(Instruction::Store(Store::new(dst.clone(), src.clone(), align, volatile)));
        self.finish_instruction(inst, &[dst, src])
    }

    pub fn create_extract_element(&self, ty: TypeRef, vector: u32, index: u32) -> Result<Symbol> {
        let vector = self.lookup(vector);
        let index = self.lookup(index);
        let inst = Rc::new(Instruction::ExtractElement(ExtractElement::new(ty, vector.clone(), index.clone())));
        self.finish_instruction(inst, &[vector, index])
    }

    pub fn create_insert_element(&self, ty: TypeRef, vector: u32, element: u32, index: u32) -> Result<Symbol> {
        let vector = self.lookup(vector);
        let element = self.lookup(element);
        let index = self.lookup(index);
        let inst = Rc::new(Instruction::InsertElement(InsertElement::new(
            ty,
            vector.clone(),
            element.clone(),
            index.clone(),
        )));
        self.finish_instruction(inst, &[vector, element, index])
    }

    pub fn create_extract_value(&self, ty: TypeRef, aggregate: u32, index: u64) -> Result<Symbol> {
        let aggregate = self.lookup(aggregate);
        let inst = Rc::new(Instruction::ExtractValue(ExtractValue::new(ty, aggregate.clone(), index)));
        self.finish_instruction(inst, &[aggregate])
    }

    pub fn create_insert_value(&self, ty: TypeRef, aggregate: u32, element: u32, index: u64) -> Result<Symbol> {
        let aggregate = self.lookup(aggregate);
        let element = self.lookup(element);
        let inst = Rc::new(Instruction::InsertValue(InsertValue::new(ty, aggregate.clone(), element.clone(), index)));
        self.finish_instruction(inst, &[aggregate, element])
    }

    pub fn create_shuffle_vector(&self, ty: TypeRef, lhs: u32, rhs: u32, mask: u32) -> Result<Symbol> {
        let lhs = self.lookup(lhs);
        let rhs = self.lookup(rhs);
        let mask = self.lookup(mask);
        let inst = Rc::new(Instruction::ShuffleVector(ShuffleVector::new(ty, lhs.clone(), rhs.clone(), mask.clone())));
        self.finish_instruction(inst, &[lhs, rhs, mask])
    }

    pub fn create_get_element_ptr(&self, ty: TypeRef, inbounds: bool, base: u32, indices: &[u32]) -> Result<Symbol> {
        let base = self.lookup(base);
        let indices: Vec<Symbol> = indices.iter().map(|&i| self.lookup(i)).collect();
        let inst = Rc::new(Instruction::GetElementPtr(GetElementPtr::new(ty, inbounds, base.clone(), indices.clone())));
        let mut operands = indices;
        operands.push(base);
        self.finish_instruction(inst, &operands)
    }

    pub fn create_branch(&self, target: u32) -> Result<Symbol> {
        let target = self.block_target(target)?;
        let inst = Rc::new(Instruction::Branch(Branch { target }));
        self.finish_instruction(inst, &[])
    }

    pub fn create_conditional_branch(&self, cond: u32, true_target: u32, false_target: u32) -> Result<Symbol> {
        let condition = self.lookup(cond);
        let true_target = self.block_target(true_target)?;
        let false_target = self.block_target(false_target)?;
        let inst =
            Rc::new(Instruction::ConditionalBranch(ConditionalBranch::new(condition.clone(), true_target, false_target)));
        self.finish_instruction(inst, &[condition])
    }

    pub fn create_indirect_branch(&self, address: u32, targets: &[u32]) -> Result<Symbol> {
        let address = self.lookup(address);
        let targets = targets.iter().map(|&i| self.block_target(i)).collect::<Result<Vec<_>>>()?;
        let inst = Rc::new(Instruction::IndirectBranch(IndirectBranch::new(address.clone(), targets)));
        self.finish_instruction(inst, &[address])
    }

    pub fn create_switch(&self, cond: u32, default: u32, case_values: &[u32], case_blocks: &[u32]) -> Result<Symbol> {
        if case_values.len() != case_blocks.len() {
            return Err(Error::ProtocolViolation("switch case values/blocks length mismatch"));
        }
        let condition = self.lookup(cond);
        let default = self.block_target(default)?;
        let mut operands = vec![condition.clone()];
        let mut cases = Vec::with_capacity(case_values.len());
        for (&value_index, &block_index) in case_values.iter().zip(case_blocks) {
            let value = self.lookup(value_index);
            let target = self.block_target(block_index)?;
            operands.push(value.clone());
            cases.push(SwitchCase::new(value, target));
        }
        let inst = Rc::new(Instruction::Switch(Switch::new(condition, default, cases)));
        self.finish_instruction(inst, &operands)
    }

    pub fn create_switch_old(&self, cond: u32, default: u32, case_values: &[u64], case_blocks: &[u32]) -> Result<Symbol> {
        if case_values.len() != case_blocks.len() {
            return Err(Error::ProtocolViolation("switch_old case values/blocks length mismatch"));
        }
        let condition = self.lookup(cond);
        let default = self.block_target(default)?;
        let mut cases = Vec::with_capacity(case_values.len());
        for (&value, &block_index) in case_values.iter().zip(case_blocks) {
            cases.push(SwitchOldCase { value, target: self.block_target(block_index)? });
        }
        let inst = Rc::new(Instruction::SwitchOld(SwitchOld::new(condition.clone(), default, cases)));
        self.finish_instruction(inst, &[condition])
    }

    pub fn create_return(&self) -> Result<Symbol> {
        self.finish_instruction(Rc::new(Instruction::Return(Return)), &[])
    }

    pub fn create_return_value(&self, value: u32) -> Result<Symbol> {
        let value = self.lookup(value);
        let inst = Rc::new(Instruction::ReturnValue(ReturnValue::new(value.clone())));
        self.finish_instruction(inst, &[value])
    }

    pub fn create_unreachable(&self) -> Result<Symbol> {
        self.finish_instruction(Rc::new(Instruction::Unreachable(Unreachable)), &[])
    }

    pub fn create_call(&self, ty: TypeRef, target: u32, args: &[u32]) -> Result<Symbol> {
        let target = self.lookup(target);
        let args: Vec<Symbol> = args.iter().map(|&i| self.lookup(i)).collect();
        let inst = Rc::new(Instruction::Call(Call::new(ty, target.clone(), args.clone())));
        let mut operands = args;
        operands.push(target);
        self.finish_instruction(inst, &operands)
    }

    pub fn create_phi(&self, ty: TypeRef, values: &[u32], blocks: &[u32]) -> Result<Symbol> {
        if values.len() != blocks.len() {
            return Err(Error::ProtocolViolation("phi values/blocks length mismatch"));
        }
        let mut operands = Vec::with_capacity(values.len());
        let mut incoming = Vec::with_capacity(values.len());
        for (&value_index, &block_index) in values.iter().zip(blocks) {
            let value = self.lookup(value_index);
            let block = self.block_target(block_index)?;
            operands.push(value.clone());
            incoming.push(PhiIncoming { value: Operand::new(value), block });
        }
        let inst = Rc::new(Instruction::Phi(Phi::new(ty, incoming)));
        self.finish_instruction(inst, &operands)
    }

    pub fn create_select(&self, ty: TypeRef, condition: u32, true_value: u32, false_value: u32) -> Result<Symbol> {
        let condition = self.lookup(condition);
        let true_value = self.lookup(true_value);
        let false_value = self.lookup(false_value);
        let inst = Rc::new(Instruction::Select(Select::new(
            ty,
            condition.clone(),
            true_value.clone(),
            false_value.clone(),
        )));
        self.finish_instruction(inst, &[condition, true_value, false_value])
    }

    pub fn create_fence(&self, ordering: u64) -> Result<Symbol> {
        let ordering = AtomicOrdering::decode(ordering)?;
        self.finish_instruction(Rc::new(Instruction::Fence(Fence { ordering })), &[])
    }

    pub fn create_cmpxchg(
        &self,
        ty: TypeRef,
        pointer: u32,
        compare: u32,
        new_value: u32,
        ordering: u64,
        failure_ordering: u64,
    ) -> Result<Symbol> {
        let pointer = self.lookup(pointer);
        let compare = self.lookup(compare);
        let new_value = self.lookup(new_value);
        let ordering = AtomicOrdering::decode(ordering)?;
        let failure_ordering = AtomicOrdering::decode(failure_ordering)?;
        let inst = Rc::new(Instruction::Cmpxchg(Cmpxchg::new(
            ty,
            pointer.clone(),
            compare.clone(),
            new_value.clone(),
            ordering,
            failure_ordering,
        )));
        self.finish_instruction(inst, &[pointer, compare, new_value])
    }

    pub fn create_atomic_rmw(&self, ty: TypeRef, pointer: u32, value: u32, operation: u64, ordering: u64) -> Result<Symbol> {
        let pointer = self.lookup(pointer);
        let value = self.lookup(value);
        let operation = RmwOperation::decode(operation)?;
        let ordering = AtomicOrdering::decode(ordering)?;
        let inst = Rc::new(Instruction::AtomicRmw(AtomicRmw::new(ty, pointer.clone(), value.clone(), operation, ordering)));
        self.finish_instruction(inst, &[pointer, value])
    }

    pub fn create_resume(&self, value: u32) -> Result<Symbol> {
        let value = self.lookup(value);
        let inst = Rc::new(Instruction::Resume(Resume::new(value.clone())));
        self.finish_instruction(inst, &[value])
    }

    pub fn create_landing_pad(&self, ty: TypeRef, clauses: &[u32]) -> Result<Symbol> {
        let clauses: Vec<Symbol> = clauses.iter().map(|&i| self.lookup(i)).collect();
        let inst = Rc::new(Instruction::LandingPad(LandingPad::new(ty, clauses.clone())));
        self.finish_instruction(inst, &clauses)
    }

    pub fn create_invoke(
        &self,
        ty: TypeRef,
        target: u32,
        args: &[u32],
        normal_target: u32,
        unwind_target: u32,
    ) -> Result<Symbol> {
        let target = self.lookup(target);
        let args: Vec<Symbol> = args.iter().map(|&i| self.lookup(i)).collect();
        let normal_target = self.block_target(normal_target)?;
        let unwind_target = self.block_target(unwind_target)?;
        let inst =
            Rc::new(Instruction::Invoke(Invoke::new(ty, target.clone(), args.clone(), normal_target, unwind_target)));
        let mut operands = args;
        operands.push(target);
        self.finish_instruction(inst, &operands)
    }

    pub fn create_freeze(&self, ty: TypeRef, value: u32) -> Result<Symbol> {
        let value = self.lookup(value);
        let inst = Rc::new(Instruction::Freeze(Freeze::new(ty, value.clone())));
        self.finish_instruction(inst, &[value])
    }

    // ---- constant expressions -----------------------------------------

    pub fn create_integer_constant(&self, ty: TypeRef, bits: u64) -> Symbol {
        self.finish_constant(Rc::new(Constant::Integer { ty, bits }), &[])
    }

    pub fn create_float_constant(&self, ty: TypeRef, bits: u64) -> Symbol {
        self.finish_constant(Rc::new(Constant::Float { ty, bits }), &[])
    }

    pub fn create_null_constant(&self, ty: TypeRef) -> Symbol {
        self.finish_constant(Rc::new(Constant::Null { ty }), &[])
    }

    pub fn create_undef_constant(&self, ty: TypeRef) -> Symbol {
        self.finish_constant(Rc::new(Constant::Undef { ty }), &[])
    }

    pub fn create_string_constant(&self, ty: TypeRef, bytes: Vec<u8>, raw: bool) -> Symbol {
        let constant = if raw { Constant::StringRaw { ty, bytes } } else { Constant::StringC { ty, bytes } };
        self.finish_constant(Rc::new(constant), &[])
    }

    pub fn create_aggregate_from_data(&self, ty: TypeRef, data: Vec<u64>) -> Symbol {
        self.finish_constant(Rc::new(Constant::AggregateFromData { ty, data }), &[])
    }

    pub fn create_aggregate_from_values(&self, ty: TypeRef, indices: &[u32]) -> Result<Symbol> {
        let elements = self.function.symbols.constants(indices)?;
        let symbol = self.finish_constant(
            Rc::new(Constant::AggregateFromValues { ty, elements: crate::symbol::OperandList::new(elements.clone()) }),
            &elements,
        );
        Ok(symbol)
    }

    pub fn create_binary_constant_expression(&self, ty: TypeRef, opcode: u64, lhs: u32, rhs: u32) -> Result<Symbol> {
        let lhs = self.lookup(lhs);
        let rhs = self.lookup(rhs);
        let operator = BinaryOperator::decode(opcode)?;
        let flags = InstructionFlags::decode(0, ty.is_floating_point_or_vector_of());
        let constant = Rc::new(Constant::Binary { ty, operator, flags, lhs: Operand::new(lhs.clone()), rhs: Operand::new(rhs.clone()) });
        Ok(self.finish_constant(constant, &[lhs, rhs]))
    }

    /// Ignores `ty`'s floating-point classification when choosing the
    /// cast table, matching the upstream `createCastExpression`'s
    /// behavior: `CastOperator::decode` takes only the opcode
    /// (SPEC_FULL.md §9, resolved Open Question).
    pub fn create_cast_constant_expression(&self, ty: TypeRef, opcode: u64, value: u32) -> Result<Symbol> {
        let value = self.lookup(value);
        let operator = CastOperator::decode(opcode)?;
        let constant = Rc::new(Constant::Cast { ty, operator, value: Operand::new(value.clone()) });
        Ok(self.finish_constant(constant, &[value]))
    }

    pub fn create_compare_constant_expression(&self, ty: TypeRef, opcode: u64, lhs: u32, rhs: u32) -> Result<Symbol> {
        let lhs = self.lookup(lhs);
        let rhs = self.lookup(rhs);
        let operator = CompareOperator::decode(opcode, ty.is_floating_point_or_vector_of())?;
        let constant = Rc::new(Constant::Compare { ty, operator, lhs: Operand::new(lhs.clone()), rhs: Operand::new(rhs.clone()) });
        Ok(self.finish_constant(constant, &[lhs, rhs]))
    }

    pub fn create_gep_constant_expression(&self, ty: TypeRef, inbounds: bool, base: u32, indices: &[u32]) -> Symbol {
        let base = self.lookup(base);
        let indices: Vec<Symbol> = indices.iter().map(|&i| self.lookup(i)).collect();
        let constant = Rc::new(Constant::GetElementPtr {
            ty,
            inbounds,
            base: Operand::new(base.clone()),
            indices: crate::symbol::OperandList::new(indices.clone()),
        });
        let mut operands = indices;
        operands.push(base);
        self.finish_constant(constant, &operands)
    }

    pub fn create_block_address_constant(&self, ty: TypeRef, function: u32, block: u32) -> Result<Symbol> {
        let function = self.lookup(function);
        let block_symbol = Symbol::Block(self.block_target(block)?);
        let constant = Rc::new(Constant::BlockAddress {
            ty,
            function: Operand::new(function.clone()),
            block: Operand::new(block_symbol.clone()),
        });
        Ok(self.finish_constant(constant, &[function, block_symbol]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visitor::CountingVisitor;

    fn i32_ty() -> TypeRef {
        Rc::new(Type::Integer { width: 32 })
    }

    fn ptr_ty() -> TypeRef {
        Type::pointer(0)
    }

    #[test]
    fn function_name_is_decorated_with_leading_at() {
        let builder = FunctionBuilder::new(i32_ty(), vec![], false);
        builder.name_function(0, 0, "foo".to_string());
        assert_eq!(builder.function().name(), SymbolName::Set("@foo".to_string()));
    }

    #[test]
    fn create_switch_old_preserves_raw_case_constants() {
        let builder = FunctionBuilder::new(i32_ty(), vec![], false);
        builder.allocate_blocks(2).unwrap();
        builder.generate_block().unwrap();
        let _cond = builder.create_integer_constant(i32_ty(), 1); // index 0

        let switch = builder.create_switch_old(0, 1, &[10, 20], &[1, 1]).unwrap();
        let Symbol::Instruction(inst) = &switch else { panic!("expected an instruction symbol") };
        match &**inst {
            Instruction::SwitchOld(so) => {
                assert_eq!(so.cases.len(), 2);
                assert_eq!(so.cases[0].value, 10);
                assert_eq!(so.cases[1].value, 20);
                assert!(Rc::ptr_eq(&so.cases[0].target, &so.default));
                assert!(Rc::ptr_eq(&so.cases[1].target, &so.default));
            }
            other => panic!("expected a switch_old instruction, got {other:?}"),
        }
    }

    #[test]
    fn create_indirect_branch_resolves_every_target_block() {
        let builder = FunctionBuilder::new(i32_ty(), vec![], false);
        builder.allocate_blocks(3).unwrap();
        builder.generate_block().unwrap();
        let address = builder.create_integer_constant(ptr_ty(), 0xdead); // index 0

        let branch = builder.create_indirect_branch(0, &[1, 2]).unwrap();
        let Symbol::Instruction(inst) = &branch else { panic!("expected an instruction symbol") };
        match &**inst {
            Instruction::IndirectBranch(ib) => {
                assert_eq!(ib.targets.len(), 2);
                assert_eq!(ib.address.get(), address);
            }
            other => panic!("expected an indirect branch, got {other:?}"),
        }
    }

    #[test]
    fn create_select_builds_a_value_producing_instruction() {
        let builder = FunctionBuilder::new(i32_ty(), vec![], false);
        builder.allocate_blocks(1).unwrap();
        builder.generate_block().unwrap();
        let condition = builder.create_integer_constant(i32_ty(), 1); // index 0
        let true_value = builder.create_integer_constant(i32_ty(), 2); // index 1
        let false_value = builder.create_integer_constant(i32_ty(), 3); // index 2

        let select = builder.create_select(i32_ty(), 0, 1, 2).unwrap();
        let Symbol::Instruction(inst) = &select else { panic!("expected an instruction symbol") };
        assert!(inst.is_value_producing());
        match &**inst {
            Instruction::Select(sel) => {
                assert_eq!(sel.condition.get(), condition);
                assert_eq!(sel.true_value.get(), true_value);
                assert_eq!(sel.false_value.get(), false_value);
            }
            other => panic!("expected a select instruction, got {other:?}"),
        }
    }

    #[test]
    fn create_get_element_ptr_collects_base_and_indices_as_operands() {
        let builder = FunctionBuilder::new(i32_ty(), vec![], false);
        let base = builder.create_integer_constant(ptr_ty(), 0); // index 0
        let index0 = builder.create_integer_constant(i32_ty(), 0); // index 1
        let index1 = builder.create_integer_constant(i32_ty(), 1); // index 2

        let gep = builder.create_get_element_ptr(ptr_ty(), true, 0, &[1, 2]).unwrap();
        let Symbol::Instruction(inst) = &gep else { panic!("expected an instruction symbol") };
        match &**inst {
            Instruction::GetElementPtr(g) => {
                assert!(g.inbounds);
                assert_eq!(g.base.get(), base);
                assert_eq!(g.indices.get(), vec![index0, index1]);
            }
            other => panic!("expected a get_element_ptr instruction, got {other:?}"),
        }
    }

    #[test]
    fn create_shuffle_vector_builds_with_all_three_operands() {
        let vec_ty = Rc::new(Type::Vector { len: 4, element: i32_ty() });
        let builder = FunctionBuilder::new(i32_ty(), vec![], false);
        let lhs = builder.create_integer_constant(vec_ty.clone(), 1); // index 0
        let rhs = builder.create_integer_constant(vec_ty.clone(), 2); // index 1
        let mask = builder.create_integer_constant(vec_ty.clone(), 3); // index 2

        let shuffled = builder.create_shuffle_vector(vec_ty, 0, 1, 2).unwrap();
        let Symbol::Instruction(inst) = &shuffled else { panic!("expected an instruction symbol") };
        match &**inst {
            Instruction::ShuffleVector(sv) => {
                assert_eq!(sv.lhs.get(), lhs);
                assert_eq!(sv.rhs.get(), rhs);
                assert_eq!(sv.mask.get(), mask);
            }
            other => panic!("expected a shuffle_vector instruction, got {other:?}"),
        }
    }

    #[test]
    fn function_accept_visits_every_block_in_insertion_order() {
        let builder = FunctionBuilder::new(i32_ty(), vec![], false);
        builder.allocate_blocks(2).unwrap();
        builder.generate_block().unwrap();
        builder.create_return().unwrap();
        builder.generate_block().unwrap();
        builder.create_unreachable().unwrap();

        let mut counter = CountingVisitor::default();
        builder.function().accept(&mut counter);
        assert_eq!(counter.total, 2);
    }
}
