#[cfg(test)]
mod tests;

use crate::error::LowerError;
use crate::spot::Spot;

/// Mnemonics whose operands share one width.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Opcode {
    Load,
    Add,
    Addcy,
    Sub,
    Subcy,
    Imul,
    Div,
    Idiv,
    Neg,
    Not,
    And,
    Or,
    Xor,
    Compare,
}

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Load => "load",
            Opcode::Add => "add",
            Opcode::Addcy => "addcy",
            Opcode::Sub => "sub",
            Opcode::Subcy => "subcy",
            Opcode::Imul => "imul",
            Opcode::Div => "div",
            Opcode::Idiv => "idiv",
            Opcode::Neg => "neg",
            Opcode::Not => "not",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Compare => "compare",
        }
    }
}

/// The shift family. These encode their destination at the operand width but
/// their count at a single byte.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ShiftOp {
    Sl0,
    Sl1,
    Sla,
    Slx,
    Sr0,
    Sr1,
    Sra,
    Srx,
}

impl ShiftOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ShiftOp::Sl0 => "sl0",
            ShiftOp::Sl1 => "sl1",
            ShiftOp::Sla => "sla",
            ShiftOp::Slx => "slx",
            ShiftOp::Sr0 => "sr0",
            ShiftOp::Sr1 => "sr1",
            ShiftOp::Sra => "sra",
            ShiftOp::Srx => "srx",
        }
    }
}

/// Unconditional and flag-conditional jumps. The carry flag is the target's
/// only relational primitive, so `JumpC`/`JumpNC` double as the ordering
/// branches.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JumpOp {
    Jump,
    JumpZ,
    JumpNZ,
    JumpC,
    JumpNC,
}

impl JumpOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            JumpOp::Jump => "jump",
            JumpOp::JumpZ => "jump z",
            JumpOp::JumpNZ => "jump nz",
            JumpOp::JumpC => "jump c",
            JumpOp::JumpNC => "jump nc",
        }
    }
}

/// One line of output assembly.
///
/// Purely syntactic: operands are strings already rendered at the width the
/// producing IL command chose, and no variant checks that its operands are
/// legal for the target. That responsibility stays with the lowering code
/// that built the instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Instruction {
    Std {
        op: Opcode,
        dest: String,
        source: Option<String>,
    },
    Shift {
        op: ShiftOp,
        dest: String,
        count: String,
    },
    Jump {
        op: JumpOp,
        target: String,
    },
    Call {
        target: String,
    },
    Return,
    Label(String),

    /// `None` is the zero-width sentinel: the comment renders to no line at
    /// all.
    Comment(Option<String>),
    Lea {
        dest: String,
        source: String,
    },
}

impl Instruction {
    /// The text of this instruction, or `None` for the comment sentinel.
    pub fn render(&self) -> Option<String> {
        match self {
            Instruction::Std { op, dest, source } => {
                let mut line = format!("\t{} {dest}", op.mnemonic());
                if let Some(source) = source {
                    line.push_str(", ");
                    line.push_str(source);
                }
                Some(line)
            }

            Instruction::Shift { op, dest, count } => {
                Some(format!("\t{} {dest}, {count}", op.mnemonic()))
            }

            Instruction::Jump { op, target } => Some(format!("\t{} {target}", op.mnemonic())),
            Instruction::Call { target } => Some(format!("\tcall {target}")),
            Instruction::Return => Some("\treturn".to_string()),

            Instruction::Label(name) => Some(format!("{name}:")),

            Instruction::Comment(None) => None,
            Instruction::Comment(Some(text)) => Some(format!("\t; {text}")),

            Instruction::Lea { dest, source } => Some(format!("\tlea {dest}, {source}")),
        }
    }
}

/// Two-operand instruction with both operands at `width`.
pub fn std(op: Opcode, dest: &Spot, source: &Spot, width: usize) -> Result<Instruction, LowerError> {
    Ok(Instruction::Std {
        op,
        dest: dest.render(width)?,
        source: Some(source.render(width)?),
    })
}

/// Single-operand instruction at `width`.
pub fn unary(op: Opcode, dest: &Spot, width: usize) -> Result<Instruction, LowerError> {
    Ok(Instruction::Std {
        op,
        dest: dest.render(width)?,
        source: None,
    })
}

pub fn load(dest: &Spot, source: &Spot, width: usize) -> Result<Instruction, LowerError> {
    std(Opcode::Load, dest, source, width)
}

/// Shift with the destination at `width` and the count at one byte.
pub fn shift(op: ShiftOp, dest: &Spot, count: &Spot, width: usize) -> Result<Instruction, LowerError> {
    Ok(Instruction::Shift {
        op,
        dest: dest.render(width)?,
        count: count.render(1)?,
    })
}

/// Load-effective-address: the destination is a full-width register and the
/// source renders as a bare address.
pub fn lea(dest: &Spot, source: &Spot) -> Result<Instruction, LowerError> {
    Ok(Instruction::Lea {
        dest: dest.render(8)?,
        source: source.render(0)?,
    })
}

/// The output buffer one compilation unit lowers into.
///
/// Instructions only ever append, and the label counter only ever grows, so
/// every name handed out by [`Code::fresh_label`] is unique within the
/// buffer.
#[derive(Debug, Default)]
pub struct Code {
    instructions: Vec<Instruction>,
    labels: usize,
}

impl Code {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
            labels: 0,
        }
    }

    pub fn add(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn fresh_label(&mut self) -> String {
        let id = self.labels;
        self.labels += 1;
        format!(".L{id}")
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The whole buffer as text, one line per instruction in buffer order.
    /// Sentinel comments contribute nothing.
    pub fn render(&self) -> String {
        let mut text = String::new();
        for instruction in self.instructions.iter() {
            if let Some(line) = instruction.render() {
                text.push_str(&line);
                text.push('\n');
            }
        }
        text
    }
}
