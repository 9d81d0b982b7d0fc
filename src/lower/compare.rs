use crate::alloc::{RegisterSource, SpotMap};
use crate::asm::{self, Code, Instruction, JumpOp, Opcode};
use crate::error::LowerError;
use crate::il::Binary;
use crate::spot::Spot;

/// The six relations the comparison commands test. The target has no
/// set-if instruction, so all of them are synthesized from its compare
/// primitive plus a conditional branch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Relation {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEq,
    GreaterOrEq,
}

impl Relation {
    /// Branch taken when the relation holds. The carry flag encodes
    /// "below", so Greater and LessOrEq compare with their operands
    /// reversed and reuse the carry branches; see [`Relation::mirrored`].
    fn branch(&self) -> JumpOp {
        match self {
            Relation::Equal => JumpOp::JumpZ,
            Relation::NotEqual => JumpOp::JumpNZ,
            Relation::Less => JumpOp::JumpC,
            Relation::GreaterOrEq => JumpOp::JumpNC,
            Relation::Greater => JumpOp::JumpC,
            Relation::LessOrEq => JumpOp::JumpNC,
        }
    }

    fn mirrored(&self) -> bool {
        matches!(self, Relation::Greater | Relation::LessOrEq)
    }
}

/// Shared lowering for all six comparison commands.
///
/// Loads 1 into a result register, compares, branches past a load of 0 when
/// the relation holds, and copies the result out if the allocator put the
/// output elsewhere. Operands must already share a bit-comparable
/// representation; no promotion happens here.
pub(crate) fn lower(
    cmd: &Binary,
    relation: Relation,
    spotmap: &SpotMap,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(), LowerError> {
    let out_spot = spotmap.spot(&cmd.output)?.clone();
    let arg1_spot = spotmap.spot(&cmd.arg1)?.clone();
    let arg2_spot = spotmap.spot(&cmd.arg2)?.clone();

    let mut taken = Vec::new();
    let result = regs.get_reg(
        &[out_spot.clone()],
        &[arg1_spot.clone(), arg2_spot.clone()],
    );
    taken.push(result.clone());

    let out_size = cmd.output.ty.size;
    code.add(asm::load(&result, &Spot::Literal(1), out_size)?);

    let arg_size = cmd.arg1.ty.size;
    let (arg1_spot, arg2_spot) =
        fix_both_literal_or_mem(arg1_spot, arg2_spot, &mut taken, arg_size, regs, code)?;
    let (arg1_spot, arg2_spot) =
        fix_either_imm64(arg1_spot, arg2_spot, &taken, arg_size, regs, code)?;
    let (arg1_spot, arg2_spot) = fix_literal_wrong_order(arg1_spot, arg2_spot);

    let label = code.fresh_label();

    if relation.mirrored() {
        code.add(asm::std(Opcode::Compare, &arg2_spot, &arg1_spot, arg_size)?);
    } else {
        code.add(asm::std(Opcode::Compare, &arg1_spot, &arg2_spot, arg_size)?);
    }
    code.add(Instruction::Jump {
        op: relation.branch(),
        target: label.clone(),
    });

    code.add(asm::load(&result, &Spot::Literal(0), out_size)?);
    code.add(Instruction::Label(label));

    if result != out_spot {
        code.add(asm::load(&out_spot, &result, out_size)?);
    }

    Ok(())
}

/// The compare instruction cannot take two non-register operands, so when
/// both are literal or both are memory, materialize the first into a
/// scratch register.
fn fix_both_literal_or_mem(
    arg1_spot: Spot,
    arg2_spot: Spot,
    taken: &mut Vec<Spot>,
    size: usize,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(Spot, Spot), LowerError> {
    let both_literal = arg1_spot.is_imm() && arg2_spot.is_imm();
    let both_mem = matches!(arg1_spot, Spot::Mem(_)) && matches!(arg2_spot, Spot::Mem(_));

    if both_literal || both_mem {
        // The scratch cannot overlap arg1 or arg2 here, since neither is a
        // register.
        let r = regs.get_reg(&[], taken);
        taken.push(r.clone());
        code.add(asm::load(&r, &arg1_spot, size)?);
        Ok((r, arg2_spot))
    } else {
        Ok((arg1_spot, arg2_spot))
    }
}

/// The target cannot encode a 64-bit immediate as a direct operand, so move
/// one into a register. Both operands cannot be imm64 at once because
/// `fix_both_literal_or_mem` ran first.
fn fix_either_imm64(
    arg1_spot: Spot,
    arg2_spot: Spot,
    taken: &[Spot],
    size: usize,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(Spot, Spot), LowerError> {
    if arg1_spot.is_imm64() {
        let mut avoid = taken.to_vec();
        avoid.push(arg2_spot.clone());

        let r = regs.get_reg(&[], &avoid);
        code.add(asm::load(&r, &arg1_spot, size)?);
        Ok((r, arg2_spot))
    } else if arg2_spot.is_imm64() {
        let mut avoid = taken.to_vec();
        avoid.push(arg1_spot.clone());

        let r = regs.get_reg(&[], &avoid);
        code.add(asm::load(&r, &arg2_spot, size)?);
        Ok((arg1_spot, r))
    } else {
        Ok((arg1_spot, arg2_spot))
    }
}

/// The compare instruction wants the literal, if any, second.
fn fix_literal_wrong_order(arg1_spot: Spot, arg2_spot: Spot) -> (Spot, Spot) {
    if arg1_spot.is_imm() {
        (arg2_spot, arg1_spot)
    } else {
        (arg1_spot, arg2_spot)
    }
}
