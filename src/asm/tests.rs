use super::{Code, Instruction, JumpOp, Opcode, ShiftOp};
use crate::spot::{Reg, Spot};

#[test]
fn std_renders_mnemonic_and_operands() {
    let inst = super::std(Opcode::Add, &Spot::Reg(Reg::S0), &Spot::Reg(Reg::S1), 4).unwrap();
    assert_eq!("\tadd s0, s1", inst.render().unwrap());
}

#[test]
fn unary_renders_single_operand() {
    let inst = super::unary(Opcode::Neg, &Spot::Reg(Reg::S4), 4).unwrap();
    assert_eq!("\tneg s4", inst.render().unwrap());
}

#[test]
fn load_from_memory() {
    let inst = super::load(&Spot::Reg(Reg::S2), &Spot::sym("x"), 8).unwrap();
    assert_eq!("\tload s2, [x]", inst.render().unwrap());
}

#[test]
fn shift_renders_count_at_one_byte() {
    let inst = super::shift(ShiftOp::Sl0, &Spot::Reg(Reg::S1), &Spot::Literal(3), 4).unwrap();
    assert_eq!("\tsl0 s1, 3", inst.render().unwrap());
}

#[test]
fn jump_mnemonics_carry_their_condition() {
    let jump = |op| Instruction::Jump {
        op,
        target: ".L7".to_string(),
    };

    assert_eq!("\tjump .L7", jump(JumpOp::Jump).render().unwrap());
    assert_eq!("\tjump z .L7", jump(JumpOp::JumpZ).render().unwrap());
    assert_eq!("\tjump nz .L7", jump(JumpOp::JumpNZ).render().unwrap());
    assert_eq!("\tjump c .L7", jump(JumpOp::JumpC).render().unwrap());
    assert_eq!("\tjump nc .L7", jump(JumpOp::JumpNC).render().unwrap());
}

#[test]
fn call_and_return_render() {
    let call = Instruction::Call {
        target: "s3".to_string(),
    };

    assert_eq!("\tcall s3", call.render().unwrap());
    assert_eq!("\treturn", Instruction::Return.render().unwrap());
}

#[test]
fn label_renders_with_colon() {
    let label = Instruction::Label("main".to_string());
    assert_eq!("main:", label.render().unwrap());
}

#[test]
fn comment_sentinel_renders_nothing() {
    let visible = Instruction::Comment(Some("spill".to_string()));
    assert_eq!("\t; spill", visible.render().unwrap());

    assert_eq!(None, Instruction::Comment(None).render());
}

#[test]
fn lea_renders_wide_dest_and_bare_address() {
    let addr = Spot::sym("table").shift(4, None).unwrap();
    let inst = super::lea(&Spot::Reg(Reg::S6), &addr).unwrap();

    assert_eq!("\tlea s6, [table+4]", inst.render().unwrap());
}

#[test]
fn fresh_labels_are_unique() {
    let mut code = Code::new();

    assert_eq!(".L0", code.fresh_label());
    assert_eq!(".L1", code.fresh_label());
    assert_eq!(".L2", code.fresh_label());
}

#[test]
fn buffer_renders_in_order_and_skips_sentinels() {
    let mut code = Code::new();
    assert!(code.is_empty());

    code.add(Instruction::Label("f".to_string()));
    code.add(Instruction::Comment(None));
    code.add(super::load(&Spot::Reg(Reg::S0), &Spot::Literal(1), 4).unwrap());
    code.add(Instruction::Return);

    assert_eq!("f:\n\tload s0, 1\n\treturn\n", code.render());
    assert_eq!(4, code.instructions().len());
}
