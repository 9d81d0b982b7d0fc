#[cfg(test)]
mod tests;

use crate::error::LowerError;

/// The sixteen general-purpose registers of the target, in argument-passing
/// order. The target has no accumulator and no callee-saved registers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Reg {
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    SA,
    SB,
    SC,
    SD,
    SE,
    SF,
}

#[rustfmt::skip]
pub const REGISTERS: [Reg; 16] = [
    Reg::S0, Reg::S1, Reg::S2, Reg::S3,
    Reg::S4, Reg::S5, Reg::S6, Reg::S7,
    Reg::S8, Reg::S9, Reg::SA, Reg::SB,
    Reg::SC, Reg::SD, Reg::SE, Reg::SF,
];

/// Register holding a function's return value.
pub const RETURN_REG: Reg = Reg::S0;

/// The only register the shift instructions accept as a count operand.
pub const SHIFT_COUNT_REG: Reg = Reg::S2;

/// Registers holding the quotient and remainder after a divide.
pub const QUOTIENT_REG: Reg = Reg::S0;
pub const REMAINDER_REG: Reg = Reg::S3;

impl Reg {
    pub fn name(&self) -> &'static str {
        match self {
            Reg::S0 => "s0",
            Reg::S1 => "s1",
            Reg::S2 => "s2",
            Reg::S3 => "s3",
            Reg::S4 => "s4",
            Reg::S5 => "s5",
            Reg::S6 => "s6",
            Reg::S7 => "s7",
            Reg::S8 => "s8",
            Reg::S9 => "s9",
            Reg::SA => "sA",
            Reg::SB => "sB",
            Reg::SC => "sC",
            Reg::SD => "sD",
            Reg::SE => "sE",
            Reg::SF => "sF",
        }
    }

    pub fn spot(&self) -> Spot {
        Spot::Reg(*self)
    }
}

/// A place in the machine where an IL value can live.
///
/// Two spots are equal when they have the same kind and the same detail, so
/// equality on spots is exactly "same storage location". Spots are immutable;
/// `shift` builds new ones.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Spot {
    Reg(Reg),
    Mem(MemSpot),

    /// A literal is not really a storage location, but treating immediates
    /// as spots lets the allocator leave folded constants unallocated.
    Literal(i64),
}

/// A region of memory, like a global or a frame slot.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MemSpot {
    pub base: Base,
    pub offset: i64,
    pub chunk: i64,
    pub count: Option<Box<Spot>>,
}

/// The base of a memory spot: a symbolic name for external storage, or
/// another spot such as a register holding a frame base.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Base {
    Sym(String),
    Spot(Box<Spot>),
}

impl Spot {
    /// Memory spot addressing a symbolic name.
    pub fn sym(name: impl Into<String>) -> Spot {
        Spot::Mem(MemSpot {
            base: Base::Sym(name.into()),
            offset: 0,
            chunk: 0,
            count: None,
        })
    }

    /// Memory spot addressing `offset` bytes past the location in `base`.
    pub fn mem(base: Spot, offset: i64) -> Spot {
        Spot::Mem(MemSpot {
            base: Base::Spot(Box::new(base)),
            offset,
            chunk: 0,
            count: None,
        })
    }

    /// The assembly form of this spot for an operand of `width` bytes.
    ///
    /// Registers keep one name at every width on this target. The supported
    /// widths are 0 (width-independent address contexts), 1, 2, 4, and 8.
    pub fn render(&self, width: usize) -> Result<String, LowerError> {
        if !matches!(width, 0 | 1 | 2 | 4 | 8) {
            return Err(LowerError::UnsupportedWidth {
                spot: format!("{self:?}"),
                width,
            });
        }

        match self {
            Spot::Reg(reg) => Ok(reg.name().to_string()),
            Spot::Literal(value) => Ok(value.to_string()),
            Spot::Mem(mem) => mem.render(),
        }
    }

    /// Offset from the frame base, for frame-relative memory spots.
    ///
    /// The register allocator sums these to size stack frames. Spots that are
    /// not memory relative to a register report 0.
    pub fn frame_offset(&self) -> i64 {
        match self {
            Spot::Mem(mem) => match mem.base {
                Base::Spot(ref base) if matches!(**base, Spot::Reg(_)) => -mem.offset,
                _ => 0,
            },
            _ => 0,
        }
    }

    /// A new spot shifted relative to this one.
    ///
    /// Only memory spots can actually shift; for the other kinds this is the
    /// identity when `chunk` is 0 and no count is given, and an error
    /// otherwise. See [`MemSpot::shift`] for the memory rules.
    pub fn shift(&self, chunk: i64, count: Option<Spot>) -> Result<Spot, LowerError> {
        match self {
            Spot::Mem(mem) => mem.shift(chunk, count).map(Spot::Mem),
            _ if chunk == 0 && count.is_none() => Ok(self.clone()),
            _ => Err(LowerError::CannotShift),
        }
    }

    pub fn is_imm(&self) -> bool {
        matches!(self, Spot::Literal(_))
    }

    /// True for literals the shift instructions can encode directly.
    pub fn is_imm8(&self) -> bool {
        matches!(self, Spot::Literal(value) if (0..256).contains(value))
    }

    /// True for literals too wide to appear as a direct instruction operand.
    pub fn is_imm64(&self) -> bool {
        matches!(self, Spot::Literal(value)
            if *value > i32::MAX as i64 || *value < i32::MIN as i64)
    }
}

impl MemSpot {
    fn render(&self) -> Result<String, LowerError> {
        let base = match &self.base {
            Base::Sym(name) => name.clone(),
            Base::Spot(spot) => spot.render(0)?,
        };

        // A pending chunk with no count is just more constant offset.
        let mut total = self.offset;
        if self.count.is_none() {
            total += self.chunk;
        }

        let mut inner = match total {
            0 => base,
            n if n > 0 => format!("{base}+{n}"),
            n => format!("{base}-{}", -n),
        };

        if let Some(count) = &self.count {
            let count = count.render(8)?;
            if self.chunk > 0 {
                inner = format!("{inner}+{}*{count}", self.chunk);
            } else if self.chunk < 0 {
                inner = format!("{inner}-{}*{count}", -self.chunk);
            }
        }

        Ok(format!("[{inner}]"))
    }

    /// A new memory spot offset from this one.
    ///
    /// With no `count`, the spot moves by `chunk` bytes. With a `count` spot
    /// (a register holding a runtime element index), `chunk` is the element
    /// size and must be 1, 2, 4, or 8; any chunk already pending on this spot
    /// folds into the constant offset. A spot that already carries a count
    /// cannot take a second one.
    fn shift(&self, chunk: i64, count: Option<Spot>) -> Result<MemSpot, LowerError> {
        match count {
            Some(count) => {
                if self.count.is_some() {
                    return Err(LowerError::DoubleIndex);
                }
                if !matches!(chunk, 1 | 2 | 4 | 8) {
                    return Err(LowerError::BadScale(chunk));
                }

                Ok(MemSpot {
                    base: self.base.clone(),
                    offset: self.offset + self.chunk,
                    chunk,
                    count: Some(Box::new(count)),
                })
            }

            None => Ok(MemSpot {
                base: self.base.clone(),
                offset: self.offset + chunk,
                chunk: self.chunk,
                count: self.count.clone(),
            }),
        }
    }
}
