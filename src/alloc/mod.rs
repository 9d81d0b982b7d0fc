use std::collections::HashMap;

use crate::error::LowerError;
use crate::il::Value;
use crate::spot::{Spot, REGISTERS};

/// Where each live IL value sits at some program point.
///
/// Built by the register allocator, read-only during lowering. Every value a
/// command declares as an input or output must have an entry by the time
/// that command lowers; a missing entry is a protocol violation and fails
/// the compilation.
#[derive(Clone, Debug, Default)]
pub struct SpotMap {
    spots: HashMap<Value, Spot>,
}

impl SpotMap {
    pub fn new() -> Self {
        Self {
            spots: HashMap::new(),
        }
    }

    pub fn assign(&mut self, value: Value, spot: Spot) {
        self.spots.insert(value, spot);
    }

    pub fn spot(&self, value: &Value) -> Result<&Spot, LowerError> {
        self.spots
            .get(value)
            .ok_or(LowerError::MissingSpot(value.id))
    }
}

/// The one callback lowering needs from the allocator: a free register.
///
/// Implementations must return a register spot disjoint from `avoid` and
/// should return one from `prefer` when that is possible. The call is
/// synchronous and must not fail; whether satisfying it forces a spill is
/// the allocator's business and invisible here.
pub trait RegisterSource {
    fn get_reg(&mut self, prefer: &[Spot], avoid: &[Spot]) -> Spot;
}

/// Round-robin register source.
///
/// Not a real allocator: it hands out registers with no notion of liveness.
/// It satisfies the [`RegisterSource`] contract, which is all the lowering
/// layer asks of its collaborator, so it serves as the test double and
/// suffices for straight-line drivers.
#[derive(Debug, Default)]
pub struct Rotation {
    next: usize,
}

impl Rotation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegisterSource for Rotation {
    fn get_reg(&mut self, prefer: &[Spot], avoid: &[Spot]) -> Spot {
        for spot in prefer {
            if matches!(spot, Spot::Reg(_)) && !avoid.contains(spot) {
                return spot.clone();
            }
        }

        for _ in 0..REGISTERS.len() {
            let reg = REGISTERS[self.next % REGISTERS.len()];
            self.next += 1;

            let spot = Spot::Reg(reg);
            if !avoid.contains(&spot) {
                return spot;
            }
        }

        unreachable!("every register is excluded")
    }
}
