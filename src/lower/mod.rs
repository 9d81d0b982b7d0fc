pub(crate) mod compare;
pub(crate) mod control;
pub(crate) mod math;


use log::{debug, trace};

use crate::alloc::{RegisterSource, SpotMap};
use crate::asm::Code;
use crate::error::LowerError;
use crate::il::Command;

/// Lower a command stream in program order into a fresh output buffer.
///
/// Lowering is strictly sequential: commands never observe each other, and
/// the buffer with its label counter is the only shared state. The first
/// contract violation aborts the whole compilation.
pub fn lower(
    commands: &[Command],
    spotmap: &SpotMap,
    home_spots: &SpotMap,
    regs: &mut dyn RegisterSource,
) -> Result<Code, LowerError> {
    trace!("lowering {} commands", commands.len());

    let mut code = Code::new();
    for command in commands {
        command.lower(spotmap, home_spots, regs, &mut code)?;
    }

    debug!("lowered into {} instructions", code.instructions().len());
    Ok(code)
}
