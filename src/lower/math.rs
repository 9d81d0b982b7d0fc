use crate::alloc::{RegisterSource, SpotMap};
use crate::asm::{self, Code, Opcode, ShiftOp};
use crate::error::LowerError;
use crate::il::{Binary, Unary};
use crate::spot::{self, Reg, Spot};

/// Shared lowering for Add, Subtr, and Mult.
///
/// Works in a register the allocator would like to coincide with an operand
/// or the output. When it coincides with arg2 and the operator is not
/// commutative, the operands have effectively swapped, so a negate fixes
/// the sign afterwards. 64-bit immediates cannot be encoded directly and go
/// through a second scratch register; two of them at once means the front
/// end skipped a constant fold, which is a contract error.
pub(crate) fn add_mult(
    cmd: &Binary,
    op: Opcode,
    commutative: bool,
    spotmap: &SpotMap,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(), LowerError> {
    let size = cmd.arg1.ty.size;

    let out_spot = spotmap.spot(&cmd.output)?.clone();
    let arg1_spot = spotmap.spot(&cmd.arg1)?.clone();
    let arg2_spot = spotmap.spot(&cmd.arg2)?.clone();

    let temp = regs.get_reg(
        &[out_spot.clone(), arg1_spot.clone(), arg2_spot.clone()],
        &[],
    );

    if temp == arg1_spot {
        if !arg2_spot.is_imm64() {
            code.add(asm::std(op, &temp, &arg2_spot, size)?);
        } else {
            let temp2 = regs.get_reg(&[], &[temp.clone()]);
            code.add(asm::load(&temp2, &arg2_spot, size)?);
            code.add(asm::std(op, &temp, &temp2, size)?);
        }
    } else if temp == arg2_spot {
        if !arg1_spot.is_imm64() {
            code.add(asm::std(op, &temp, &arg1_spot, size)?);
        } else {
            let temp2 = regs.get_reg(&[], &[temp.clone()]);
            code.add(asm::load(&temp2, &arg1_spot, size)?);
            code.add(asm::std(op, &temp, &temp2, size)?);
        }

        if !commutative {
            code.add(asm::unary(Opcode::Neg, &temp, size)?);
        }
    } else if !arg2_spot.is_imm64() {
        // Covers arg1 being imm64: a load handles any literal width.
        code.add(asm::load(&temp, &arg1_spot, size)?);
        code.add(asm::std(op, &temp, &arg2_spot, size)?);
    } else if !arg1_spot.is_imm64() {
        code.add(asm::load(&temp, &arg2_spot, size)?);
        code.add(asm::std(op, &temp, &arg1_spot, size)?);

        if !commutative {
            code.add(asm::unary(Opcode::Neg, &temp, size)?);
        }
    } else {
        return Err(LowerError::DualImmediate);
    }

    if temp != out_spot {
        code.add(asm::load(&out_spot, &temp, size)?);
    }

    Ok(())
}

/// Shared lowering for the bit shifts.
///
/// The ISA takes the shift count as an 8-bit immediate or in the one
/// designated count register, nothing else. When the count has to move
/// there, a base operand squatting in that register is relocated first.
pub(crate) fn bit_shift(
    cmd: &Binary,
    op: ShiftOp,
    spotmap: &SpotMap,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(), LowerError> {
    let count_reg = Spot::Reg(spot::SHIFT_COUNT_REG);

    let out_spot = spotmap.spot(&cmd.output)?.clone();
    let mut arg1_spot = spotmap.spot(&cmd.arg1)?.clone();
    let arg1_size = cmd.arg1.ty.size;
    let mut arg2_spot = spotmap.spot(&cmd.arg2)?.clone();
    let arg2_size = cmd.arg2.ty.size;

    if !arg2_spot.is_imm8() && arg2_spot != count_reg {
        if arg1_spot == count_reg {
            let temp = regs.get_reg(
                &[out_spot.clone(), arg1_spot.clone()],
                &[arg2_spot.clone(), count_reg.clone()],
            );
            code.add(asm::load(&temp, &arg1_spot, arg1_size)?);
            arg1_spot = temp;
        }

        code.add(asm::load(&count_reg, &arg2_spot, arg2_size)?);
        arg2_spot = count_reg;
    }

    if out_spot == arg1_spot {
        code.add(asm::shift(op, &arg1_spot, &arg2_spot, arg1_size)?);
    } else {
        let temp = regs.get_reg(&[out_spot.clone(), arg1_spot.clone()], &[arg2_spot.clone()]);
        if arg1_spot != temp {
            code.add(asm::load(&temp, &arg1_spot, arg1_size)?);
        }
        code.add(asm::shift(op, &temp, &arg2_spot, arg1_size)?);
        if temp != out_spot {
            code.add(asm::load(&out_spot, &temp, arg1_size)?);
        }
    }

    Ok(())
}

/// Shared lowering for Div and Mod, which differ only in whether the wanted
/// result sits in the quotient or the remainder register afterwards.
///
/// The dividend must reach the quotient register before the divide runs,
/// and the divisor may be neither a literal nor in either designated
/// register. Unsigned division zeroes the remainder register first. Both
/// designated registers are clobbered either way, and the divisor's runtime
/// value is never inspected: dividing by a runtime zero faults on the
/// target, not here.
pub(crate) fn div_mod(
    cmd: &Binary,
    result_reg: Reg,
    spotmap: &SpotMap,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(), LowerError> {
    let size = cmd.arg1.ty.size;
    let signed = cmd.arg1.ty.signed;

    let quotient = Spot::Reg(spot::QUOTIENT_REG);
    let remainder = Spot::Reg(spot::REMAINDER_REG);

    let output_spot = spotmap.spot(&cmd.output)?.clone();
    let arg1_spot = spotmap.spot(&cmd.arg1)?.clone();
    let arg2_spot = spotmap.spot(&cmd.arg2)?.clone();

    // Move the dividend early when that cannot clobber the divisor.
    let mut moved = false;
    if arg1_spot != quotient && arg2_spot != quotient {
        moved = true;
        code.add(asm::load(&quotient, &arg1_spot, size)?);
    }

    let arg2_final = if arg2_spot.is_imm() || arg2_spot == quotient || arg2_spot == remainder {
        let r = regs.get_reg(&[], &[quotient.clone(), remainder.clone()]);
        code.add(asm::load(&r, &arg2_spot, size)?);
        r
    } else {
        arg2_spot
    };

    if !moved && arg1_spot != quotient {
        code.add(asm::load(&quotient, &arg1_spot, size)?);
    }

    if signed {
        code.add(asm::unary(Opcode::Idiv, &arg2_final, size)?);
    } else {
        code.add(asm::std(Opcode::Xor, &remainder, &remainder, size)?);
        code.add(asm::unary(Opcode::Div, &arg2_final, size)?);
    }

    let result = Spot::Reg(result_reg);
    if output_spot != result {
        code.add(asm::load(&output_spot, &result, size)?);
    }

    Ok(())
}

/// Shared lowering for the unary Neg and Not: copy into place, then apply
/// in place. No promotion happens here.
pub(crate) fn neg_not(
    cmd: &Unary,
    op: Opcode,
    spotmap: &SpotMap,
    code: &mut Code,
) -> Result<(), LowerError> {
    let size = cmd.arg.ty.size;

    let output_spot = spotmap.spot(&cmd.output)?;
    let arg_spot = spotmap.spot(&cmd.arg)?;

    if output_spot != arg_spot {
        code.add(asm::load(output_spot, arg_spot, size)?);
    }
    code.add(asm::unary(op, output_spot, size)?);

    Ok(())
}
