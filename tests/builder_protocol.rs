use std::rc::Rc;

use llvm_ir_function::constants::Constant;
use llvm_ir_function::instructions::Instruction;
use llvm_ir_function::{FunctionBuilder, Symbol, SymbolName, Type, TypeRef};

fn i32_ty() -> TypeRef {
    Rc::new(Type::Integer { width: 32 })
}

fn ptr_ty() -> TypeRef {
    Type::pointer(0)
}

#[test]
fn forward_self_phi_resolves_to_itself() {
    let builder = FunctionBuilder::new(i32_ty(), vec![], false);
    builder.allocate_blocks(1).unwrap();
    builder.generate_block().unwrap();

    // The phi is the first value-producing symbol created, so it will be
    // assigned index 0 — the same index its own incoming value names.
    let phi_symbol = builder.create_phi(i32_ty(), &[0], &[0]).unwrap();

    match &phi_symbol {
        Symbol::Instruction(inst) => match &**inst {
            Instruction::Phi(phi) => {
                assert_eq!(phi.incoming.len(), 1);
                assert_eq!(phi.incoming[0].value.get(), phi_symbol.clone());
            }
            other => panic!("expected a phi instruction, got {other:?}"),
        },
        other => panic!("expected an instruction symbol, got {other:?}"),
    }

    builder.exit_function().unwrap();
}

#[test]
fn anonymous_values_and_blocks_get_sequential_numeric_names() {
    let builder = FunctionBuilder::new(i32_ty(), vec![], false);
    builder.allocate_blocks(2).unwrap();

    builder.generate_block().unwrap();
    let count = builder.create_integer_constant(i32_ty(), 1);
    let count_index = match &count {
        Symbol::Constant(_) => 0,
        other => panic!("expected a constant, got {other:?}"),
    };
    let alloca = builder.create_allocation(ptr_ty(), count_index, 4).unwrap();
    builder.create_branch(1).unwrap();

    let second_block = builder.generate_block().unwrap();
    builder.create_return().unwrap();

    builder.exit_function().unwrap();

    let Symbol::Instruction(alloca) = alloca else { panic!("expected an instruction symbol") };
    assert_eq!(alloca.name(), SymbolName::Set("1".to_string()));
    assert_eq!(second_block.name(), SymbolName::Set("2".to_string()));
}

#[test]
fn void_call_is_never_named_or_appended_to_the_symbol_table() {
    let builder = FunctionBuilder::new(Rc::new(Type::Void), vec![ptr_ty()], false);
    let target = builder.create_parameter(ptr_ty()).unwrap();
    let target_index = match &target {
        Symbol::Parameter(p) => p.index,
        other => panic!("expected a parameter, got {other:?}"),
    };

    builder.allocate_blocks(1).unwrap();
    builder.generate_block().unwrap();
    let call = builder.create_call(Rc::new(Type::Void), target_index, &[]).unwrap();

    let Symbol::Instruction(inst) = &call else { panic!("expected an instruction symbol") };
    assert!(!inst.is_value_producing());
    assert_eq!(inst.name(), SymbolName::Unknown);

    builder.create_return().unwrap();
    builder.exit_function().unwrap();
}

#[test]
fn block_address_constant_carries_the_function_and_block_operands() {
    let builder = FunctionBuilder::new(i32_ty(), vec![], false);
    builder.allocate_blocks(1).unwrap();
    let block0 = builder.generate_block().unwrap();

    let function_operand = builder.create_integer_constant(i32_ty(), 42);
    let address = builder.create_block_address_constant(ptr_ty(), 0, 0).unwrap();

    let Symbol::Constant(constant) = &address else { panic!("expected a constant symbol") };
    match &**constant {
        Constant::BlockAddress { function, block, ty } => {
            assert_eq!(function.get(), function_operand);
            assert_eq!(block.get(), Symbol::Block(block0));
            assert!(ty.is_pointer());
        }
        other => panic!("expected a block address constant, got {other:?}"),
    }
}

#[test]
fn aggregate_from_values_preserves_mixed_index_order() {
    let builder = FunctionBuilder::new(i32_ty(), vec![], false);
    let c0 = builder.create_integer_constant(i32_ty(), 1);
    let c1 = builder.create_integer_constant(i32_ty(), 2);
    let c2 = builder.create_integer_constant(i32_ty(), 3);

    let array_ty = Rc::new(Type::Array { len: 3, element: i32_ty() });
    let aggregate = builder.create_aggregate_from_values(array_ty, &[2, 0, 1]).unwrap();

    let Symbol::Constant(constant) = &aggregate else { panic!("expected a constant symbol") };
    match &**constant {
        Constant::AggregateFromValues { elements, .. } => {
            assert_eq!(elements.get(), vec![c2, c0, c1]);
        }
        other => panic!("expected an aggregate, got {other:?}"),
    }
}

#[test]
fn switch_with_every_case_equal_to_default_keeps_them_as_distinct_entries() {
    let builder = FunctionBuilder::new(i32_ty(), vec![], false);
    builder.allocate_blocks(2).unwrap();
    builder.generate_block().unwrap();

    let condition = builder.create_integer_constant(i32_ty(), 7);
    let condition_index = match &condition {
        Symbol::Constant(_) => 0,
        other => panic!("expected a constant, got {other:?}"),
    };
    let case_a = builder.create_integer_constant(i32_ty(), 1);
    let case_b = builder.create_integer_constant(i32_ty(), 2);
    let case_a_index = match &case_a {
        Symbol::Constant(_) => 1,
        other => panic!("expected a constant, got {other:?}"),
    };
    let case_b_index = match &case_b {
        Symbol::Constant(_) => 2,
        other => panic!("expected a constant, got {other:?}"),
    };

    // Every case target, and the default, point at block 1 — a degenerate
    // but well-formed switch.
    let switch = builder
        .create_switch(condition_index, 1, &[case_a_index, case_b_index], &[1, 1])
        .unwrap();

    let Symbol::Instruction(inst) = &switch else { panic!("expected an instruction symbol") };
    match &**inst {
        Instruction::Switch(sw) => {
            assert_eq!(sw.cases.len(), 2);
            assert!(Rc::ptr_eq(&sw.cases[0].target, &sw.default));
            assert!(Rc::ptr_eq(&sw.cases[1].target, &sw.default));
            assert_eq!(sw.cases[0].value.get(), case_a);
            assert_eq!(sw.cases[1].value.get(), case_b);
        }
        other => panic!("expected a switch instruction, got {other:?}"),
    }
}
