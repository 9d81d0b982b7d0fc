use std::collections::HashMap;

use super::Value;
use crate::alloc::{RegisterSource, SpotMap};
use crate::asm::{Code, Instruction, JumpOp, Opcode, ShiftOp};
use crate::error::LowerError;
use crate::lower::{compare, control, math};
use crate::lower::compare::Relation;
use crate::spot::{self, Spot};

/// Two-operand command payload.
#[derive(Clone, Debug)]
pub struct Binary {
    pub output: Value,
    pub arg1: Value,
    pub arg2: Value,
}

/// One-operand command payload.
#[derive(Clone, Debug)]
pub struct Unary {
    pub output: Value,
    pub arg: Value,
}

/// Condition-and-target payload for the conditional jumps.
#[derive(Clone, Debug)]
pub struct CondJump {
    pub cond: Value,
    pub label: String,
}

/// Payload for a function call. `ret` is `None` for void calls. Arguments
/// are in left-to-right order and each binds to one argument register.
#[derive(Clone, Debug)]
pub struct CallData {
    pub func: Value,
    pub args: Vec<Value>,
    pub ret: Option<Value>,
}

/// One IL command.
///
/// A closed set: one tag per concrete instruction the front end can emit.
/// The constraint methods below feed the register allocator before lowering
/// starts; `lower` then emits assembly against whatever spots the allocator
/// chose. Families share their lowering logic as free functions in
/// [`crate::lower`], parameterized by the per-tag differences (opcode,
/// commutativity, designated registers).
#[derive(Clone, Debug)]
pub enum Command {
    EqualCmp(Binary),
    NotEqualCmp(Binary),
    LessCmp(Binary),
    GreaterCmp(Binary),
    LessOrEqCmp(Binary),
    GreaterOrEqCmp(Binary),

    Label(String),
    Jump(String),
    JumpZero(CondJump),
    JumpNotZero(CondJump),
    Return(Option<Value>),
    Call(CallData),

    Add(Binary),
    Subtr(Binary),
    Mult(Binary),
    Div(Binary),
    Mod(Binary),
    LBitShift(Binary),
    RBitShift(Binary),
    Neg(Unary),
    Not(Unary),
}

use Command::*;

impl Command {
    /// Values this command reads. The allocator uses these for liveness.
    pub fn inputs(&self) -> Vec<Value> {
        match self {
            EqualCmp(b) | NotEqualCmp(b) | LessCmp(b) | GreaterCmp(b) | LessOrEqCmp(b)
            | GreaterOrEqCmp(b) | Add(b) | Subtr(b) | Mult(b) | Div(b) | Mod(b)
            | LBitShift(b) | RBitShift(b) => vec![b.arg1, b.arg2],

            Neg(u) | Not(u) => vec![u.arg],

            JumpZero(j) | JumpNotZero(j) => vec![j.cond],
            Return(arg) => arg.iter().copied().collect(),
            Call(call) => {
                let mut inputs = vec![call.func];
                inputs.extend(call.args.iter().copied());
                inputs
            }

            Label(_) | Jump(_) => Vec::new(),
        }
    }

    /// Values this command writes.
    pub fn outputs(&self) -> Vec<Value> {
        match self {
            EqualCmp(b) | NotEqualCmp(b) | LessCmp(b) | GreaterCmp(b) | LessOrEqCmp(b)
            | GreaterOrEqCmp(b) | Add(b) | Subtr(b) | Mult(b) | Div(b) | Mod(b)
            | LBitShift(b) | RBitShift(b) => vec![b.output],

            Neg(u) | Not(u) => vec![u.output],

            Call(call) => call.ret.iter().copied().collect(),

            Label(_) | Jump(_) | JumpZero(_) | JumpNotZero(_) | Return(_) => Vec::new(),
        }
    }

    /// Labels this command may transfer control to.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Jump(label) => vec![label.as_str()],
            JumpZero(j) | JumpNotZero(j) => vec![j.label.as_str()],
            _ => Vec::new(),
        }
    }

    /// Spots whose previous contents this command destroys as a side effect.
    pub fn clobber(&self) -> Vec<Spot> {
        match self {
            Return(_) => vec![Spot::Reg(spot::RETURN_REG)],

            // Fully caller-saved convention: a call destroys everything.
            Call(_) => spot::REGISTERS.iter().map(|r| Spot::Reg(*r)).collect(),

            LBitShift(_) | RBitShift(_) => vec![Spot::Reg(spot::SHIFT_COUNT_REG)],

            Div(_) | Mod(_) => vec![
                Spot::Reg(spot::QUOTIENT_REG),
                Spot::Reg(spot::REMAINDER_REG),
            ],

            _ => Vec::new(),
        }
    }

    /// Concrete spots each value would best be assigned to. Hints only.
    pub fn abs_spot_pref(&self) -> HashMap<Value, Vec<Spot>> {
        match self {
            Return(Some(arg)) => HashMap::from([(*arg, vec![Spot::Reg(spot::RETURN_REG)])]),

            Call(call) => {
                let mut prefs = HashMap::new();
                if let Some(ret) = call.ret {
                    prefs.insert(ret, vec![Spot::Reg(spot::RETURN_REG)]);
                }
                for (arg, reg) in call.args.iter().zip(spot::REGISTERS.iter()) {
                    prefs.insert(*arg, vec![Spot::Reg(*reg)]);
                }
                prefs
            }

            LBitShift(b) | RBitShift(b) => {
                HashMap::from([(b.arg2, vec![Spot::Reg(spot::SHIFT_COUNT_REG)])])
            }

            Div(b) => HashMap::from([
                (b.output, vec![Spot::Reg(spot::QUOTIENT_REG)]),
                (b.arg1, vec![Spot::Reg(spot::QUOTIENT_REG)]),
            ]),
            Mod(b) => HashMap::from([
                (b.output, vec![Spot::Reg(spot::REMAINDER_REG)]),
                (b.arg1, vec![Spot::Reg(spot::QUOTIENT_REG)]),
            ]),

            _ => HashMap::new(),
        }
    }

    /// Values each value would best share a spot with. Hints only.
    pub fn rel_spot_pref(&self) -> HashMap<Value, Vec<Value>> {
        match self {
            Add(b) | Subtr(b) | Mult(b) => HashMap::from([(b.output, vec![b.arg1, b.arg2])]),
            LBitShift(b) | RBitShift(b) => HashMap::from([(b.output, vec![b.arg1])]),
            Neg(u) | Not(u) => HashMap::from([(u.output, vec![u.arg])]),
            _ => HashMap::new(),
        }
    }

    /// Concrete spots each value must not be assigned to.
    pub fn abs_spot_conf(&self) -> HashMap<Value, Vec<Spot>> {
        match self {
            Div(b) | Mod(b) => HashMap::from([(
                b.arg2,
                vec![
                    Spot::Reg(spot::REMAINDER_REG),
                    Spot::Reg(spot::QUOTIENT_REG),
                ],
            )]),

            // The function pointer must stay clear of the registers its own
            // arguments are about to occupy.
            Call(call) => HashMap::from([(
                call.func,
                spot::REGISTERS[..call.args.len().min(spot::REGISTERS.len())]
                    .iter()
                    .map(|r| Spot::Reg(*r))
                    .collect(),
            )]),

            _ => HashMap::new(),
        }
    }

    /// Values that must not share a spot with the listed other values.
    pub fn rel_spot_conf(&self) -> HashMap<Value, Vec<Value>> {
        match self {
            EqualCmp(b) | NotEqualCmp(b) | LessCmp(b) | GreaterCmp(b) | LessOrEqCmp(b)
            | GreaterOrEqCmp(b) => HashMap::from([(b.output, vec![b.arg1, b.arg2])]),
            _ => HashMap::new(),
        }
    }

    /// Values read through a pointer rather than by value.
    pub fn indir_read(&self) -> Vec<Value> {
        match self {
            Call(call) => call.args.clone(),
            _ => Vec::new(),
        }
    }

    /// Values written through a pointer rather than by value.
    pub fn indir_write(&self) -> Vec<Value> {
        match self {
            Call(call) => call.args.clone(),
            _ => Vec::new(),
        }
    }

    /// Emit the assembly implementing this command, given the spots the
    /// allocator chose. Extra scratch registers come from `regs`.
    pub fn lower(
        &self,
        spotmap: &SpotMap,
        _home_spots: &SpotMap,
        regs: &mut dyn RegisterSource,
        code: &mut Code,
    ) -> Result<(), LowerError> {
        match self {
            EqualCmp(b) => compare::lower(b, Relation::Equal, spotmap, regs, code),
            NotEqualCmp(b) => compare::lower(b, Relation::NotEqual, spotmap, regs, code),
            LessCmp(b) => compare::lower(b, Relation::Less, spotmap, regs, code),
            GreaterCmp(b) => compare::lower(b, Relation::Greater, spotmap, regs, code),
            LessOrEqCmp(b) => compare::lower(b, Relation::LessOrEq, spotmap, regs, code),
            GreaterOrEqCmp(b) => compare::lower(b, Relation::GreaterOrEq, spotmap, regs, code),

            Label(name) => {
                code.add(Instruction::Label(name.clone()));
                Ok(())
            }
            Jump(label) => {
                code.add(Instruction::Jump {
                    op: JumpOp::Jump,
                    target: label.clone(),
                });
                Ok(())
            }
            JumpZero(j) => control::cond_jump(j, JumpOp::JumpZ, spotmap, regs, code),
            JumpNotZero(j) => control::cond_jump(j, JumpOp::JumpNZ, spotmap, regs, code),
            Return(arg) => control::ret(arg.as_ref(), spotmap, code),
            Call(call) => control::call(call, spotmap, regs, code),

            Add(b) => math::add_mult(b, Opcode::Add, true, spotmap, regs, code),
            Subtr(b) => math::add_mult(b, Opcode::Sub, false, spotmap, regs, code),
            Mult(b) => math::add_mult(b, Opcode::Imul, true, spotmap, regs, code),
            Div(b) => math::div_mod(b, spot::QUOTIENT_REG, spotmap, regs, code),
            Mod(b) => math::div_mod(b, spot::REMAINDER_REG, spotmap, regs, code),
            LBitShift(b) => math::bit_shift(b, ShiftOp::Sl0, spotmap, regs, code),
            RBitShift(b) => math::bit_shift(b, ShiftOp::Sr0, spotmap, regs, code),
            Neg(u) => math::neg_not(u, Opcode::Neg, spotmap, code),
            Not(u) => math::neg_not(u, Opcode::Not, spotmap, code),
        }
    }
}
