use crate::alloc::{RegisterSource, SpotMap};
use crate::asm::{self, Code, Instruction, JumpOp, Opcode};
use crate::error::LowerError;
use crate::il::{CallData, CondJump, Value};
use crate::spot::{self, Spot};

/// Jump to `label` when the condition is zero (`JumpZ`) or nonzero
/// (`JumpNZ`).
pub(crate) fn cond_jump(
    cmd: &CondJump,
    branch: JumpOp,
    spotmap: &SpotMap,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(), LowerError> {
    let size = cmd.cond.ty.size;
    let cond_spot = spotmap.spot(&cmd.cond)?.clone();

    // The compare primitive cannot take literal against literal.
    let cond_spot = if cond_spot.is_imm() {
        let r = regs.get_reg(&[], &[]);
        code.add(asm::load(&r, &cond_spot, size)?);
        r
    } else {
        cond_spot
    };

    code.add(asm::std(
        Opcode::Compare,
        &cond_spot,
        &Spot::Literal(0),
        size,
    )?);
    code.add(Instruction::Jump {
        op: branch,
        target: cmd.label.clone(),
    });

    Ok(())
}

/// Return from the function, with the value in the return register when one
/// is carried. Only values that fit in one register are supported.
pub(crate) fn ret(
    arg: Option<&Value>,
    spotmap: &SpotMap,
    code: &mut Code,
) -> Result<(), LowerError> {
    if let Some(arg) = arg {
        let arg_spot = spotmap.spot(arg)?;
        if *arg_spot != Spot::Reg(spot::RETURN_REG) {
            code.add(asm::load(
                &Spot::Reg(spot::RETURN_REG),
                arg_spot,
                arg.ty.size,
            )?);
        }
    }

    code.add(Instruction::Return);
    Ok(())
}

/// Call through a function pointer with register-encoded arguments.
///
/// Each argument binds to one register in table order; more arguments than
/// registers is a lowering failure, checked before anything is emitted. The
/// function pointer moves out of the way first if the allocator left it in
/// an argument register the copies below would clobber.
pub(crate) fn call(
    cmd: &CallData,
    spotmap: &SpotMap,
    regs: &mut dyn RegisterSource,
    code: &mut Code,
) -> Result<(), LowerError> {
    if cmd.args.len() > spot::REGISTERS.len() {
        return Err(LowerError::TooManyArgs(cmd.args.len()));
    }

    let arg_regs: Vec<Spot> = spot::REGISTERS[..cmd.args.len()]
        .iter()
        .map(|r| Spot::Reg(*r))
        .collect();

    let mut func_spot = spotmap.spot(&cmd.func)?.clone();
    if arg_regs.contains(&func_spot) {
        let r = regs.get_reg(&[], &arg_regs);
        code.add(asm::load(&r, &func_spot, cmd.func.ty.size)?);
        func_spot = r;
    }

    for (arg, reg) in cmd.args.iter().zip(spot::REGISTERS.iter()) {
        let arg_spot = spotmap.spot(arg)?;
        if *arg_spot == Spot::Reg(*reg) {
            continue;
        }
        code.add(asm::load(&Spot::Reg(*reg), arg_spot, arg.ty.size)?);
    }

    code.add(Instruction::Call {
        target: func_spot.render(cmd.func.ty.size)?,
    });

    if let Some(ret) = &cmd.ret {
        let ret_spot = spotmap.spot(ret)?;
        if *ret_spot != Spot::Reg(spot::RETURN_REG) {
            code.add(asm::load(
                ret_spot,
                &Spot::Reg(spot::RETURN_REG),
                ret.ty.size,
            )?);
        }
    }

    Ok(())
}
