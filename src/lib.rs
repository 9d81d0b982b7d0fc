pub mod alloc;
pub mod asm;
pub mod il;
pub mod lower;
pub mod spot;

pub use error::LowerError;

mod error;
